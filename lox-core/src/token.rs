use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    SemiColon,
    Slash,
    Star,

    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    Identifier,
    String,
    Number,

    And,
    Class,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl Type {
    /// Keywords that plausibly begin a new statement, used by the parser to find a restart
    /// point after a syntax error.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Type::Class
                | Type::Fun
                | Type::Var
                | Type::For
                | Type::If
                | Type::While
                | Type::Print
                | Type::Return
        )
    }
}

/// Value carried by `String` and `Number` tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(String::from(value))
    }
}

macro_rules! impl_from_num_for_literal {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for Literal {
                fn from(n: $t) -> Literal {
                    Literal::Num(n as f64)
                }
            }
        )*
    }
}

impl_from_num_for_literal!(u8 i8 u16 i16 u32 i32 u64 i64 usize isize f32 f64);

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Str(val) => write!(f, "{}", val),
            Literal::Num(val) => write!(f, "{}", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: Type,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
}

impl Token {
    pub fn new(ty: Type, lexeme: String, literal: Option<Literal>, line: usize) -> Self {
        Token {
            ty,
            lexeme,
            literal,
            line,
        }
    }

    /// Where a diagnostic about this token points, e.g. ` at 'foo'` or ` at end`.
    pub fn location(&self) -> String {
        match self.ty {
            Type::Eof => String::from(" at end"),
            _ => format!(" at '{}'", self.lexeme),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{:?} {} {}", self.ty, self.lexeme, literal),
            None => write!(f, "{:?} {} nil", self.ty, self.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::{Literal, Token, Type};

    #[test]
    fn test_display() {
        let number = Token::new(Type::Number, String::from("1.5"), Some(Literal::Num(1.5)), 1);
        let paren = Token::new(Type::LeftParen, String::from("("), None, 1);

        assert_eq!(number.to_string(), "Number 1.5 1.5");
        assert_eq!(paren.to_string(), "LeftParen ( nil");
    }

    #[test]
    fn test_location() {
        let ident = Token::new(Type::Identifier, String::from("foo"), None, 3);
        let eof = Token::new(Type::Eof, String::new(), None, 3);

        assert_eq!(ident.location(), " at 'foo'");
        assert_eq!(eof.location(), " at end");
    }
}
