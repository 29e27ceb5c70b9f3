//! Prints ASTs back as Lox source.
//!
//! Every compound expression is wrapped in parentheses, so the output makes the parse tree
//! explicit while still being a valid program. Parsing the printed form gives back an
//! equivalent tree, and printing that tree again gives the same text.

use lox_core::Token;

use crate::ast::{Expr, ExprVisitor, Stmt, StmtVisitor};
use crate::value::Value;

const INDENT: &str = "    ";

// 10^309 is the smallest power of ten above f64::MAX
const OVERFLOWING_EXPONENT: usize = 309;

pub fn print_program(statements: &[Stmt]) -> String {
    let mut printer = Printer::default();
    statements
        .iter()
        .map(|stmt| printer.visit_stmt(stmt) + "\n")
        .collect()
}

pub fn print_expr(expr: &Expr) -> String {
    Printer::default().visit_expr(expr)
}

#[derive(Default)]
struct Printer {
    depth: usize,
}

impl Printer {
    fn offset(&self) -> String {
        INDENT.repeat(self.depth)
    }
}

impl ExprVisitor for Printer {
    type Item = String;

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> String {
        format!("({} = {})", name.lexeme, self.visit_expr(value))
    }

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> String {
        format!(
            "({} {} {})",
            self.visit_expr(left),
            operator.lexeme,
            self.visit_expr(right)
        )
    }

    // Compound expressions are already parenthesized, a grouping adds nothing on top
    fn visit_grouping(&mut self, expression: &Expr) -> String {
        self.visit_expr(expression)
    }

    fn visit_literal(&mut self, value: &Value) -> String {
        match value {
            Value::Str(val) => format!("\"{}\"", val),
            // `inf` would read back as a variable, a literal past f64::MAX overflows again
            Value::Num(val) if val.is_infinite() => {
                let digits = format!("1{}", "0".repeat(OVERFLOWING_EXPONENT));
                if val.is_sign_negative() {
                    format!("(-{})", digits)
                } else {
                    digits
                }
            }
            val => val.to_string(),
        }
    }

    fn visit_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> String {
        self.visit_binary(left, operator, right)
    }

    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> String {
        format!("({}{})", operator.lexeme, self.visit_expr(right))
    }

    fn visit_variable(&mut self, name: &Token) -> String {
        name.lexeme.clone()
    }
}

// Statements are printed without their leading indentation, the enclosing block adds it.
impl StmtVisitor for Printer {
    type Item = String;

    fn visit_block(&mut self, statements: &[Stmt]) -> String {
        if statements.is_empty() {
            return String::from("{}");
        }

        self.depth += 1;
        let mut out = String::from("{\n");
        for stmt in statements {
            let line = self.visit_stmt(stmt);
            out.push_str(&self.offset());
            out.push_str(&line);
            out.push('\n');
        }
        self.depth -= 1;

        out.push_str(&self.offset());
        out.push('}');
        out
    }

    fn visit_expression(&mut self, expression: &Expr) -> String {
        format!("{};", self.visit_expr(expression))
    }

    fn visit_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> String {
        let mut out = format!(
            "if ({}) {}",
            self.visit_expr(condition),
            self.visit_stmt(then_branch)
        );
        if let Some(else_branch) = else_branch {
            out.push_str(" else ");
            out.push_str(&self.visit_stmt(else_branch));
        }
        out
    }

    fn visit_print(&mut self, expression: &Expr) -> String {
        format!("print {};", self.visit_expr(expression))
    }

    fn visit_var(&mut self, name: &Token, init: Option<&Expr>) -> String {
        match init {
            Some(init) => format!("var {} = {};", name.lexeme, self.visit_expr(init)),
            None => format!("var {};", name.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use lox_core::scan;
    use pretty_assertions::assert_eq;

    use crate::ast::Stmt;
    use crate::interpreter::Interpreter;
    use crate::parser::Parser;
    use crate::printer::{print_expr, print_program};

    fn parse(src: &str) -> Vec<Stmt> {
        let scanned = scan(src);
        let parsed = Parser::new(&scanned.tokens).parse();
        assert!(!parsed.has_errors(), "unexpected syntax errors in {:?}", src);
        parsed.statements
    }

    fn output_of(statements: &[Stmt]) -> String {
        let mut output: Vec<u8> = Vec::new();
        Interpreter::new(&mut output)
            .interpret(statements)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_expressions() {
        let tests = [
            ("1 + 2 * 3;", "(1 + (2 * 3))"),
            ("(1 + 2) * 3;", "((1 + 2) * 3)"),
            ("-a - -b;", "((-a) - (-b))"),
            ("!!true;", "(!(!true))"),
            ("a = b = \"str\";", "(a = (b = \"str\"))"),
            ("x or y and nil;", "(x or (y and nil))"),
            ("2.5 >= 1 == false;", "((2.5 >= 1) == false)"),
        ];

        for (src, expected) in tests {
            match &parse(src)[..] {
                [Stmt::Expression { expression }] => {
                    assert_eq!(print_expr(expression), expected, "source: {}", src)
                }
                other => panic!("expected one expression statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_statements() {
        let src = "var a = 1; var b; { var a = 2; if (a > 1) { print a; } else print b; {} } \
                   if (true) if (false) print 1; else print 2;";

        assert_eq!(
            print_program(&parse(src)),
            "var a = 1;\n\
             var b;\n\
             {\n\
             \x20   var a = 2;\n\
             \x20   if ((a > 1)) {\n\
             \x20       print a;\n\
             \x20   } else print b;\n\
             \x20   {}\n\
             }\n\
             if (true) if (false) print 1; else print 2;\n"
        );
    }

    #[test]
    fn test_printed_program_is_stable() {
        let src = "var s = \"a\" + (\"b\" + \"c\"); { var n = (1 + 2) * -3; print n / 2; } \
                   print s; print nil or \"x\"; if (!false) print 1 <= 2;";
        let original = parse(src);
        let printed = print_program(&original);
        let reparsed = parse(&printed);

        assert_eq!(print_program(&reparsed), printed);
        assert_eq!(output_of(&reparsed), output_of(&original));
        assert_eq!(output_of(&original), "-4.5\nabc\nx\ntrue\n");
    }

    #[test]
    fn test_overflowing_number_stays_a_number() {
        let src = format!("print {}; print -{};", "9".repeat(400), "9".repeat(400));
        let original = parse(&src);
        let printed = print_program(&original);
        let reparsed = parse(&printed);

        assert_eq!(printed, format!("print 1{0};\nprint (-1{0});\n", "0".repeat(309)));
        assert_eq!(print_program(&reparsed), printed);
        assert_eq!(output_of(&reparsed), "inf\n-inf\n");
        assert_eq!(output_of(&original), output_of(&reparsed));
    }
}
