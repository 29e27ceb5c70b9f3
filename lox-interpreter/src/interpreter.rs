use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use lox_core::{Token, Type};
use tracing::{debug, trace};

use crate::ast::{Expr, ExprVisitor, Stmt, StmtVisitor};
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::Value;

type ExprResult = Result<Value, RuntimeError>;
type StmtResult = Result<(), RuntimeError>;

/// Tree-walking evaluator. The global scope outlives a single `interpret` call, so a REPL
/// session can refer to what earlier lines defined.
pub struct Interpreter<'a> {
    globals: Rc<RefCell<Environment>>,
    env: Rc<RefCell<Environment>>,
    stdout: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(stdout: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new()));
        Interpreter {
            env: globals.clone(),
            globals,
            stdout,
        }
    }

    /// Executes `statements` in order. The first runtime error aborts the remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt]) -> StmtResult {
        debug!(statements = statements.len(), "interpreting");
        for stmt in statements {
            if let Err(err) = self.visit_stmt(stmt) {
                // blocks restore their parent on the way out, so this is the global scope again
                debug_assert!(Rc::ptr_eq(&self.env, &self.globals));
                return Err(err);
            }
        }
        Ok(())
    }

    /// The sink `print` statements write to.
    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.stdout
    }

    fn execute_block_with_env(
        &mut self,
        stmts: &[Stmt],
        env: Rc<RefCell<Environment>>,
    ) -> StmtResult {
        let current = std::mem::replace(&mut self.env, env);
        trace!(statements = stmts.len(), "entering block");

        let res = stmts.iter().try_for_each(|stmt| self.visit_stmt(stmt));

        // the previous scope is restored whether the block completed or failed
        self.env = current;
        trace!(ok = res.is_ok(), "leaving block");
        res
    }

    fn number_operands(
        operator: &Token,
        left: &Value,
        right: &Value,
    ) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Value::Num(left), Value::Num(right)) => Ok((*left, *right)),
            _ => Err(RuntimeError::type_error(
                operator,
                "Operands must be numbers.",
            )),
        }
    }
}

impl ExprVisitor for Interpreter<'_> {
    type Item = ExprResult;

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> ExprResult {
        let value = self.visit_expr(value)?;
        self.env
            .borrow_mut()
            .assign(&name.lexeme, value.clone())
            .map_err(|_| RuntimeError::undefined_variable(name))?;

        Ok(value)
    }

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> ExprResult {
        let left = self.visit_expr(left)?;
        let right = self.visit_expr(right)?;

        match operator.ty {
            Type::Plus => match (left, right) {
                (Value::Str(left), Value::Str(right)) => {
                    Ok(Value::from(String::from(left.as_str()) + &right))
                }
                (Value::Num(left), Value::Num(right)) => Ok(Value::Num(left + right)),
                _ => Err(RuntimeError::type_error(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },
            Type::Minus => {
                let (left, right) = Self::number_operands(operator, &left, &right)?;
                Ok(Value::Num(left - right))
            }
            Type::Star => {
                let (left, right) = Self::number_operands(operator, &left, &right)?;
                Ok(Value::Num(left * right))
            }
            Type::Slash => {
                let (left, right) = Self::number_operands(operator, &left, &right)?;
                if right == 0.0 {
                    Err(RuntimeError::DivisionByZero {
                        token: operator.clone(),
                    })
                } else {
                    Ok(Value::Num(left / right))
                }
            }
            Type::Greater => {
                let (left, right) = Self::number_operands(operator, &left, &right)?;
                Ok(Value::Bool(left > right))
            }
            Type::GreaterEqual => {
                let (left, right) = Self::number_operands(operator, &left, &right)?;
                Ok(Value::Bool(left >= right))
            }
            Type::Less => {
                let (left, right) = Self::number_operands(operator, &left, &right)?;
                Ok(Value::Bool(left < right))
            }
            Type::LessEqual => {
                let (left, right) = Self::number_operands(operator, &left, &right)?;
                Ok(Value::Bool(left <= right))
            }
            Type::EqualEqual => Ok(Value::Bool(left == right)),
            Type::BangEqual => Ok(Value::Bool(left != right)),
            // the parser only builds binary nodes out of the operators above
            _ => unreachable!("invalid binary operator {:?}", operator.ty),
        }
    }

    fn visit_grouping(&mut self, expression: &Expr) -> ExprResult {
        self.visit_expr(expression)
    }

    fn visit_literal(&mut self, value: &Value) -> ExprResult {
        Ok(value.clone())
    }

    fn visit_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> ExprResult {
        let left = self.visit_expr(left)?;

        // The right side is only evaluated when the left side doesn't decide the result.
        // Whichever operand decides is returned as is, not converted to a boolean.
        if operator.ty == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.visit_expr(right)
    }

    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> ExprResult {
        let right = self.visit_expr(right)?;
        match (operator.ty, right) {
            (Type::Minus, Value::Num(val)) => Ok(Value::Num(-val)),
            (Type::Minus, _) => Err(RuntimeError::type_error(
                operator,
                "Operand must be a number.",
            )),
            (_, val) => Ok(Value::Bool(!val.is_truthy())),
        }
    }

    fn visit_variable(&mut self, name: &Token) -> ExprResult {
        self.env
            .borrow()
            .get(&name.lexeme)
            .map_err(|_| RuntimeError::undefined_variable(name))
    }
}

impl StmtVisitor for Interpreter<'_> {
    type Item = StmtResult;

    fn visit_block(&mut self, statements: &[Stmt]) -> StmtResult {
        let env = Rc::new(RefCell::new(Environment::with(self.env.clone())));
        self.execute_block_with_env(statements, env)
    }

    fn visit_expression(&mut self, expression: &Expr) -> StmtResult {
        self.visit_expr(expression)?;
        Ok(())
    }

    fn visit_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> StmtResult {
        if self.visit_expr(condition)?.is_truthy() {
            self.visit_stmt(then_branch)
        } else if let Some(else_branch) = else_branch {
            self.visit_stmt(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_print(&mut self, expression: &Expr) -> StmtResult {
        let value = self.visit_expr(expression)?;
        writeln!(self.stdout, "{}", value)?;
        Ok(())
    }

    fn visit_var(&mut self, name: &Token, init: Option<&Expr>) -> StmtResult {
        let value = match init {
            Some(init) => self.visit_expr(init)?,
            None => Value::Nil,
        };

        self.env.borrow_mut().define(&name.lexeme, value);
        Ok(())
    }
}
