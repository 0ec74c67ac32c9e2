//! Semantic analyzer
//!
//! A single-threaded walk over the syntax tree that drives scope
//! entry/exit at block boundaries, declares variables and functions,
//! infers expression types bottom-up, and stops at the first semantic
//! violation. One analyzer is built per run; rerunning a tree through
//! a fresh analyzer always yields the same verdict.

use super::entity::{DeclaredEntity, EntityKind, Function, Variable};
use super::scope::{ScopeManager, Symbol};
use super::types::{describe, Type, TypeChecker};
use crate::ast::{
    Block, Decl, DeclKind, Expr, ExprKind, ForInit, FunDecl, Program, Stmt, StmtKind, VarDecl,
};
use crate::common::{SemanticError, SemanticResult};
use tracing::debug;

/// Semantic analyzer for a single program
pub struct SemanticAnalyzer {
    scopes: ScopeManager,
    types: TypeChecker,
    in_print_ctx: bool,
    in_return_ctx: bool,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeManager::new(),
            types: TypeChecker::new(),
            in_print_ctx: false,
            in_return_ctx: false,
        }
    }

    /// The scope tree built by the walk; useful for diagnostics and
    /// for downstream consumers after `analyze` returns
    pub fn scopes(&self) -> &ScopeManager {
        &self.scopes
    }

    /// Analyze a complete program, stopping at the first violation
    #[tracing::instrument(level = "debug", skip_all, fields(declarations = program.declarations.len()))]
    pub fn analyze(&mut self, program: &Program) -> SemanticResult<()> {
        for decl in &program.declarations {
            self.analyze_decl(decl)?;
        }
        Ok(())
    }

    /// Run `f` inside a fresh child scope, exiting on success and
    /// error paths alike so an aborted walk cannot leave the cursor
    /// inside a dead scope
    fn with_scope<T>(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> SemanticResult<T>,
    ) -> SemanticResult<T> {
        self.scopes.enter_scope(label);
        let result = f(self);
        self.scopes.exit_scope();
        result
    }

    fn with_print_context<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> SemanticResult<T>,
    ) -> SemanticResult<T> {
        let previous = self.in_print_ctx;
        self.in_print_ctx = true;
        let result = f(self);
        self.in_print_ctx = previous;
        result
    }

    fn with_return_context<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> SemanticResult<T>,
    ) -> SemanticResult<T> {
        let previous = self.in_return_ctx;
        self.in_return_ctx = true;
        let result = f(self);
        self.in_return_ctx = previous;
        result
    }

    fn analyze_decl(&mut self, decl: &Decl) -> SemanticResult<()> {
        match &decl.kind {
            DeclKind::Var(var) => self.analyze_var_decl(var),
            DeclKind::Fun(fun) => self.analyze_fun_decl(fun),
            DeclKind::Stmt(stmt) => self.analyze_stmt(stmt),
        }
    }

    fn analyze_var_decl(&mut self, var: &VarDecl) -> SemanticResult<()> {
        let name = &var.name;
        debug!(%name, scope = self.scopes.current_label(), "declaring variable");

        if self
            .scopes
            .lookup_local(name, Some(EntityKind::Variable))
            .is_some()
        {
            return Err(SemanticError::duplicate(
                format!("variable '{}' already declared in this scope", name),
                var.span,
            ));
        }

        self.scopes
            .add_symbol(Symbol::new(name, DeclaredEntity::Variable(Variable::untyped())))
            .map_err(|e| SemanticError::duplicate(e, var.span))?;

        // Without an initializer the type stays absent until the first
        // assignment binds it.
        if let Some(init) = &var.init {
            let ty = self.infer_expr(init)?;
            if let Some(symbol) = self.scopes.lookup_mut(name, Some(EntityKind::Variable)) {
                if let Some(variable) = symbol.entity.as_variable_mut() {
                    variable.ty = ty;
                }
            }
            debug!(%name, ty = describe(ty), "inferred variable type");
        }

        Ok(())
    }

    fn analyze_fun_decl(&mut self, fun: &FunDecl) -> SemanticResult<()> {
        let name = &fun.name;
        debug!(%name, scope = self.scopes.current_label(), "declaring function");

        if self
            .scopes
            .lookup_local(name, Some(EntityKind::Function))
            .is_some()
        {
            return Err(SemanticError::duplicate(
                format!("function '{}' already declared in this scope", name),
                fun.span,
            ));
        }

        // Declared before its own scope opens, so the body can resolve
        // recursive calls.
        self.scopes
            .add_symbol(Symbol::new(name, DeclaredEntity::Function(Function::new())))
            .map_err(|e| SemanticError::duplicate(e, fun.span))?;

        let label = format!("function '{}'", name);
        self.with_scope(&label, |this| {
            for param in &fun.params {
                if this
                    .scopes
                    .lookup_local(&param.name, Some(EntityKind::Variable))
                    .is_some()
                {
                    return Err(SemanticError::duplicate(
                        format!("parameter '{}' already declared in this parameter list", param.name),
                        param.span,
                    ));
                }
                this.scopes
                    .add_symbol(Symbol::new(
                        &param.name,
                        DeclaredEntity::Variable(Variable::untyped()),
                    ))
                    .map_err(|e| SemanticError::duplicate(e, param.span))?;
            }

            if let Some(body) = &fun.body {
                this.analyze_block(body, &format!("function '{}' body", name))?;
            }

            // Parameter types may have been bound by assignments in the
            // body; collect the finalized list and write it back to the
            // declaring scope, which sits above the one we are in.
            let parameters: Vec<Variable> = fun
                .params
                .iter()
                .map(|param| {
                    this.scopes
                        .lookup_local(&param.name, Some(EntityKind::Variable))
                        .and_then(|sym| sym.entity.as_variable())
                        .cloned()
                        .unwrap_or_default()
                })
                .collect();

            this.scopes
                .update_symbol(
                    name,
                    DeclaredEntity::Function(Function {
                        return_type: None,
                        parameters,
                    }),
                    Some(EntityKind::Function),
                )
                .map_err(|e| SemanticError::unknown_symbol(e, fun.span))
        })
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) -> SemanticResult<()> {
        self.analyze_stmt_labeled(stmt, "block")
    }

    /// `label` names the scope a block statement opens; non-block
    /// statements cannot declare anything and need no scope of their
    /// own
    fn analyze_stmt_labeled(&mut self, stmt: &Stmt, label: &str) -> SemanticResult<()> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.infer_expr(expr)?;
                Ok(())
            }

            StmtKind::Print(expr) => self.with_print_context(|this| {
                this.infer_expr(expr)?;
                Ok(())
            }),

            StmtKind::Return(expr) => {
                if let Some(expr) = expr {
                    self.with_return_context(|this| {
                        this.infer_expr(expr)?;
                        Ok(())
                    })?;
                }
                Ok(())
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.analyze_if(stmt, condition.as_ref(), then_branch.as_deref(), else_branch.as_deref()),

            StmtKind::While { condition, body } => {
                let condition = condition.as_ref().ok_or_else(|| {
                    SemanticError::malformed("while loop has no condition", stmt.span)
                })?;
                let condition_ty = self.infer_expr(condition)?;
                self.types
                    .expect_boolean(condition_ty, " in while loop condition", condition.span)?;

                match body {
                    Some(body) => self.analyze_stmt_labeled(body, "while loop"),
                    None => Ok(()),
                }
            }

            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => self.analyze_for(init.as_ref(), condition.as_ref(), update.as_ref(), body.as_deref()),

            StmtKind::Block(block) => self.analyze_block(block, label),
        }
    }

    fn analyze_if(
        &mut self,
        stmt: &Stmt,
        condition: Option<&Expr>,
        then_branch: Option<&Stmt>,
        else_branch: Option<&Stmt>,
    ) -> SemanticResult<()> {
        let condition = condition
            .ok_or_else(|| SemanticError::malformed("if statement has no condition", stmt.span))?;
        let condition_ty = self.infer_expr(condition)?;
        self.types
            .expect_boolean(condition_ty, " in if statement", condition.span)?;

        let then_branch = then_branch
            .ok_or_else(|| SemanticError::malformed("if statement has no body", stmt.span))?;
        self.analyze_stmt_labeled(then_branch, "if block")?;

        if let Some(else_branch) = else_branch {
            self.analyze_stmt_labeled(else_branch, "else block")?;
        }
        Ok(())
    }

    /// A for loop opens one enclosing scope for its initializer, then
    /// a nested one for the body, so the induction variable is visible
    /// in the condition and update but gone after the loop exits
    fn analyze_for(
        &mut self,
        init: Option<&ForInit>,
        condition: Option<&Expr>,
        update: Option<&Expr>,
        body: Option<&Stmt>,
    ) -> SemanticResult<()> {
        self.with_scope("for loop", |this| {
            match init {
                Some(ForInit::Var(var)) => this.analyze_var_decl(var)?,
                Some(ForInit::Expr(expr)) => {
                    this.infer_expr(expr)?;
                }
                None => {}
            }

            // No condition means an unbounded loop; that is permitted.
            if let Some(condition) = condition {
                let condition_ty = this.infer_expr(condition)?;
                this.types.expect_boolean(
                    condition_ty,
                    " in for loop condition",
                    condition.span,
                )?;
            }

            if let Some(update) = update {
                this.infer_expr(update)?;
            }

            match body {
                Some(body) => this.with_scope("for loop body", |this| this.analyze_stmt(body)),
                None => Ok(()),
            }
        })
    }

    fn analyze_block(&mut self, block: &Block, label: &str) -> SemanticResult<()> {
        self.with_scope(label, |this| {
            for decl in &block.declarations {
                this.analyze_decl(decl)?;
            }
            Ok(())
        })
    }

    /// Bottom-up type inference. `None` means the expression's type
    /// is not known: an unbound variable read, a call of a function
    /// with no annotated return, or the relaxed print-`+` result.
    fn infer_expr(&mut self, expr: &Expr) -> SemanticResult<Option<Type>> {
        match &expr.kind {
            ExprKind::Number(_) => Ok(Some(Type::Number)),
            ExprKind::Str(_) => Ok(Some(Type::String)),
            ExprKind::Bool(_) => Ok(Some(Type::Boolean)),
            ExprKind::Nil => Ok(Some(Type::Nil)),

            ExprKind::Variable(name) => self.infer_variable(name, expr),

            ExprKind::Assign { name, value } => self.infer_assign(name, value, expr),

            ExprKind::Unary { op, operand } => {
                let operand_ty = self.infer_expr(operand)?;
                self.types.unary_result_type(*op, operand_ty, expr.span)
            }

            ExprKind::Binary { op, left, right } => {
                let left_ty = self.infer_expr(left)?;
                let right_ty = self.infer_expr(right)?;
                self.types
                    .binary_result_type(*op, left_ty, right_ty, expr.span, self.in_print_ctx)
            }

            ExprKind::Call { callee, args } => self.infer_call(callee, args, expr),
        }
    }

    fn infer_variable(&mut self, name: &str, expr: &Expr) -> SemanticResult<Option<Type>> {
        match self.scopes.lookup(name, Some(EntityKind::Variable)) {
            Some(symbol) => Ok(symbol.entity.as_variable().and_then(|v| v.ty)),
            None => Err(SemanticError::undeclared(
                format!("variable '{}' is not declared in the current scope", name),
                expr.span,
            )),
        }
    }

    fn infer_assign(&mut self, name: &str, value: &Expr, expr: &Expr) -> SemanticResult<Option<Type>> {
        // The target must exist before the value is even considered.
        if self
            .scopes
            .lookup(name, Some(EntityKind::Variable))
            .is_none()
        {
            return Err(SemanticError::undeclared(
                format!("variable '{}' is not declared in the current scope", name),
                expr.span,
            ));
        }

        let value_ty = self.infer_expr(value)?;

        let Some(symbol) = self.scopes.lookup_mut(name, Some(EntityKind::Variable)) else {
            return Err(SemanticError::unknown_symbol(
                format!("variable '{}' disappeared during assignment", name),
                expr.span,
            ));
        };
        let Some(variable) = symbol.entity.as_variable_mut() else {
            return Err(SemanticError::unknown_symbol(
                format!("symbol '{}' is not a variable", name),
                expr.span,
            ));
        };

        match variable.ty {
            // First binding fixes the variable's type for the rest of
            // the declaring scope's lifetime.
            None => {
                variable.ty = value_ty;
                debug!(%name, ty = describe(value_ty), "bound variable type");
            }
            Some(expected) => {
                if value_ty != Some(expected) {
                    return Err(SemanticError::type_mismatch(
                        format!(
                            "cannot assign '{}' to variable '{}' of type '{}'",
                            describe(value_ty),
                            name,
                            expected
                        ),
                        expr.span,
                    ));
                }
            }
        }

        Ok(variable.ty)
    }

    fn infer_call(&mut self, callee: &str, args: &[Expr], expr: &Expr) -> SemanticResult<Option<Type>> {
        let return_type = match self.scopes.lookup(callee, Some(EntityKind::Function)) {
            Some(symbol) => symbol.entity.as_function().and_then(|f| f.return_type),
            None => {
                return Err(SemanticError::undeclared(
                    format!("function '{}' is not declared in the current scope", callee),
                    expr.span,
                ));
            }
        };

        for arg in args {
            self.infer_expr(arg)?;
        }

        Ok(return_type)
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
