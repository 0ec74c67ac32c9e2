//! Integration tests for the serialized-tree entry point.
//!
//! These tests verify that a syntax tree serialized by the external
//! parser deserializes into the AST and produces the same analysis
//! verdicts as a tree built in memory.

use brio_sema::ast::{BinaryOp, Decl, DeclKind, Expr, ExprKind, Program, Stmt, StmtKind, VarDecl};
use brio_sema::common::Span;
use brio_sema::{SemanticAnalyzer, SemanticError};

fn analyze(program: &Program) -> Result<(), SemanticError> {
    SemanticAnalyzer::new().analyze(program)
}

#[test]
fn test_valid_tree_from_json() {
    // var x = 1; print "x = " + x;
    let json = r#"{
        "declarations": [
            {
                "kind": {"Var": {
                    "name": "x",
                    "init": {"kind": {"Number": 1.0}, "span": {"start": 8, "end": 9}},
                    "span": {"start": 0, "end": 10}
                }},
                "span": {"start": 0, "end": 10}
            },
            {
                "kind": {"Stmt": {
                    "kind": {"Print": {
                        "kind": {"Binary": {
                            "op": "Add",
                            "left": {"kind": {"Str": "x = "}, "span": {"start": 17, "end": 23}},
                            "right": {"kind": {"Variable": "x"}, "span": {"start": 26, "end": 27}}
                        }},
                        "span": {"start": 17, "end": 27}
                    }},
                    "span": {"start": 11, "end": 28}
                }},
                "span": {"start": 11, "end": 28}
            }
        ]
    }"#;

    let program: Program = serde_json::from_str(json).unwrap();
    assert!(analyze(&program).is_ok());
}

#[test]
fn test_type_mismatch_reported_from_json() {
    // var a = 1; a = "s";
    let json = r#"{
        "declarations": [
            {
                "kind": {"Var": {
                    "name": "a",
                    "init": {"kind": {"Number": 1.0}, "span": {"start": 8, "end": 9}},
                    "span": {"start": 0, "end": 10}
                }},
                "span": {"start": 0, "end": 10}
            },
            {
                "kind": {"Stmt": {
                    "kind": {"Expr": {
                        "kind": {"Assign": {
                            "name": "a",
                            "value": {"kind": {"Str": "s"}, "span": {"start": 15, "end": 18}}
                        }},
                        "span": {"start": 11, "end": 18}
                    }},
                    "span": {"start": 11, "end": 19}
                }},
                "span": {"start": 11, "end": 19}
            }
        ]
    }"#;

    let program: Program = serde_json::from_str(json).unwrap();
    let err = analyze(&program).unwrap_err();
    assert!(matches!(err, SemanticError::TypeMismatch { .. }));
    // The span of the offending assignment survives the wire format.
    assert_eq!(err.span(), Span::new(11, 18));
}

#[test]
fn test_undeclared_name_reported_from_json() {
    // print y;
    let json = r#"{
        "declarations": [
            {
                "kind": {"Stmt": {
                    "kind": {"Print": {"kind": {"Variable": "y"}, "span": {"start": 6, "end": 7}}},
                    "span": {"start": 0, "end": 8}
                }},
                "span": {"start": 0, "end": 8}
            }
        ]
    }"#;

    let program: Program = serde_json::from_str(json).unwrap();
    let err = analyze(&program).unwrap_err();
    assert!(matches!(err, SemanticError::UndeclaredName { .. }));
}

#[test]
fn test_missing_optional_fields_deserialize_as_absent() {
    // var x;  -- no initializer in the wire format at all
    let json = r#"{
        "declarations": [
            {
                "kind": {"Var": {"name": "x", "span": {"start": 0, "end": 6}}},
                "span": {"start": 0, "end": 6}
            }
        ]
    }"#;

    let program: Program = serde_json::from_str(json).unwrap();
    assert!(analyze(&program).is_ok());
}

#[test]
fn test_round_trip_preserves_verdict() {
    let program = Program::new(vec![
        Decl::new(
            DeclKind::Var(VarDecl {
                name: "a".to_string(),
                init: Some(Expr::new(ExprKind::Number(1.0), Span::new(8, 9))),
                span: Span::new(0, 10),
            }),
            Span::new(0, 10),
        ),
        Decl::new(
            DeclKind::Stmt(Stmt::new(
                StmtKind::Expr(Expr::new(
                    ExprKind::Binary {
                        op: BinaryOp::Eq,
                        left: Box::new(Expr::new(
                            ExprKind::Variable("a".to_string()),
                            Span::new(11, 12),
                        )),
                        right: Box::new(Expr::new(
                            ExprKind::Str("a".to_string()),
                            Span::new(16, 19),
                        )),
                    },
                    Span::new(11, 19),
                )),
                Span::new(11, 20),
            )),
            Span::new(11, 20),
        ),
    ]);

    let direct = analyze(&program).unwrap_err();
    assert!(matches!(direct, SemanticError::TypeMismatch { .. }));

    let json = serde_json::to_string(&program).unwrap();
    let reparsed: Program = serde_json::from_str(&json).unwrap();
    let wired = analyze(&reparsed).unwrap_err();
    assert_eq!(
        std::mem::discriminant(&direct),
        std::mem::discriminant(&wired)
    );
}
