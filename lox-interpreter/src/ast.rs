use lox_core::Token;

use crate::value::Value;

// Tokens are cloned into the nodes during parsing. Every node owns its children, so a program
// is a plain tree without any sharing.

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Grouping {
        expression: Box<Expr>,
    },
    Literal {
        value: Value,
    },
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block {
        statements: Vec<Stmt>,
    },
    Expression {
        expression: Expr,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Print {
        expression: Expr,
    },
    Var {
        name: Token,
        init: Option<Expr>,
    },
}

pub trait ExprVisitor {
    type Item;

    fn visit_expr(&mut self, expr: &Expr) -> Self::Item {
        match expr {
            Expr::Assign { name, value } => self.visit_assign(name, value),
            Expr::Binary {
                left,
                operator,
                right,
            } => self.visit_binary(left, operator, right),
            Expr::Grouping { expression } => self.visit_grouping(expression),
            Expr::Literal { value } => self.visit_literal(value),
            Expr::Logical {
                left,
                operator,
                right,
            } => self.visit_logical(left, operator, right),
            Expr::Unary { operator, right } => self.visit_unary(operator, right),
            Expr::Variable { name } => self.visit_variable(name),
        }
    }

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> Self::Item;
    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Self::Item;
    fn visit_grouping(&mut self, expression: &Expr) -> Self::Item;
    fn visit_literal(&mut self, value: &Value) -> Self::Item;
    fn visit_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Self::Item;
    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> Self::Item;
    fn visit_variable(&mut self, name: &Token) -> Self::Item;
}

pub trait StmtVisitor {
    type Item;

    fn visit_stmt(&mut self, stmt: &Stmt) -> Self::Item {
        match stmt {
            Stmt::Block { statements } => self.visit_block(statements),
            Stmt::Expression { expression } => self.visit_expression(expression),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => self.visit_if(condition, then_branch, else_branch.as_deref()),
            Stmt::Print { expression } => self.visit_print(expression),
            Stmt::Var { name, init } => self.visit_var(name, init.as_ref()),
        }
    }

    fn visit_block(&mut self, statements: &[Stmt]) -> Self::Item;
    fn visit_expression(&mut self, expression: &Expr) -> Self::Item;
    fn visit_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> Self::Item;
    fn visit_print(&mut self, expression: &Expr) -> Self::Item;
    fn visit_var(&mut self, name: &Token, init: Option<&Expr>) -> Self::Item;
}

// Creator methods, mostly to keep the parser and the tests free of `Box::new` noise.
impl Expr {
    pub fn assign(name: Token, value: Expr) -> Self {
        Expr::Assign {
            name,
            value: Box::new(value),
        }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn grouping(expression: Expr) -> Self {
        Expr::Grouping {
            expression: Box::new(expression),
        }
    }

    pub fn literal<T>(value: T) -> Self
    where
        Value: From<T>,
    {
        Expr::Literal {
            value: Value::from(value),
        }
    }

    pub fn nil() -> Self {
        Expr::Literal { value: Value::Nil }
    }

    pub fn logical(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Logical {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }

    pub fn variable(name: Token) -> Self {
        Expr::Variable { name }
    }
}

impl Stmt {
    pub fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block { statements }
    }

    pub fn expression(expression: Expr) -> Self {
        Stmt::Expression { expression }
    }

    pub fn if_(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Self {
        Stmt::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub fn print(expression: Expr) -> Self {
        Stmt::Print { expression }
    }

    pub fn var(name: Token, init: Option<Expr>) -> Self {
        Stmt::Var { name, init }
    }
}
