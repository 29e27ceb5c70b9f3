use phf::{phf_map, Map};
use tracing::debug;

use crate::error::Error;
use crate::token::{Literal, Token, Type};

pub struct Scanner;

impl Scanner {
    const KEYWORDS: Map<&'static str, Type> = phf_map! {
        "and" => Type::And,
        "else" => Type::Else,
        "for" => Type::For,
        "if" => Type::If,
        "or" => Type::Or,
        "return" => Type::Return,
        "this" => Type::This,
        "var" => Type::Var,
        "class" => Type::Class,
        "false" => Type::False,
        "fun" => Type::Fun,
        "nil" => Type::Nil,
        "print" => Type::Print,
        "super" => Type::Super,
        "true" => Type::True,
        "while" => Type::While,
    };

    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Scanner
    }

    pub fn scan_tokens(&mut self, src: &str) -> TokenStream {
        TokenStream::new(src)
    }
}

/// Tokens and lexical errors of a whole source text. `tokens` always ends with `Eof`, even
/// when `errors` is not empty.
#[derive(Debug, PartialEq)]
pub struct Scanned {
    pub tokens: Vec<Token>,
    pub errors: Vec<Error>,
}

impl Scanned {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn scan(src: &str) -> Scanned {
    let mut stream = Scanner::new().scan_tokens(src);
    let tokens: Vec<Token> = stream.by_ref().collect();
    let errors = stream.take_errors();
    debug!(tokens = tokens.len(), errors = errors.len(), "scanned source");
    Scanned { tokens, errors }
}

pub struct TokenStream {
    src: Vec<char>,
    line: usize,

    // `start` and `current` points to the start and end of the token being scanned
    start: usize,
    current: usize,

    // This flag is set to `true` if the eof is reached and the eof token has been emitted.
    // This is required because the iterator needs to distinguish between when eof is reached but
    // the token is not emitted, and eof is reached and token has been emitted.
    eof: bool,

    // Lexical errors don't stop the stream, they are collected here and the scanning moves on
    errors: Vec<Error>,
}

impl TokenStream {
    pub fn new(src: &str) -> Self {
        TokenStream {
            src: src.chars().collect(),
            line: 1,
            start: 0,
            current: 0,
            eof: false,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    fn scan_token(&mut self) -> Result<Option<Token>, Error> {
        let c = self.advance();

        let token = match c {
            '(' => Some(self.make_token(Type::LeftParen)),
            ')' => Some(self.make_token(Type::RightParen)),
            '{' => Some(self.make_token(Type::LeftBrace)),
            '}' => Some(self.make_token(Type::RightBrace)),
            ',' => Some(self.make_token(Type::Comma)),
            '.' => Some(self.make_token(Type::Dot)),
            '-' => Some(self.make_token(Type::Minus)),
            '+' => Some(self.make_token(Type::Plus)),
            ';' => Some(self.make_token(Type::SemiColon)),
            '*' => Some(self.make_token(Type::Star)),

            '!' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::BangEqual))
                } else {
                    Some(self.make_token(Type::Bang))
                }
            }

            '=' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::EqualEqual))
                } else {
                    Some(self.make_token(Type::Equal))
                }
            }

            '<' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::LessEqual))
                } else {
                    Some(self.make_token(Type::Less))
                }
            }

            '>' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::GreaterEqual))
                } else {
                    Some(self.make_token(Type::Greater))
                }
            }

            '/' => {
                if self.match_char('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                    None
                } else {
                    Some(self.make_token(Type::Slash))
                }
            }

            '"' => Some(self.string()?),

            // White spaces, do nothing
            ' ' | '\t' | '\r' => None,

            // Increment for new line
            '\n' => {
                self.line += 1;
                None
            }

            _ => {
                if c.is_ascii_digit() {
                    Some(self.number())
                } else if is_alpha(c) {
                    Some(self.identifier())
                } else {
                    return Err(Error::UnexpectedCharacter {
                        ch: c,
                        line: self.line,
                    });
                }
            }
        };

        Ok(token)
    }

    fn string(&mut self) -> Result<Token, Error> {
        let opened_at = self.line;
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::UnterminatedString { line: opened_at });
        }

        // consume the closing "
        self.advance();
        let value: String = self.src[self.start + 1..self.current - 1].iter().collect();
        Ok(self.make_token_with_val(Type::String, Literal::from(value)))
    }

    fn number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // digits with at most one interior dot always parse as f64
        let value = self.text().parse::<f64>().unwrap_or(f64::NAN);
        self.make_token_with_val(Type::Number, Literal::Num(value))
    }

    fn identifier(&mut self) -> Token {
        while is_alpha(self.peek()) || self.peek().is_ascii_digit() {
            self.advance();
        }

        let text = self.text();
        match Scanner::KEYWORDS.get(text.as_str()) {
            None => self.make_token(Type::Identifier),
            Some(keyword) => self.make_token(*keyword),
        }
    }

    fn text(&self) -> String {
        self.src[self.start..self.current].iter().collect()
    }

    fn peek(&self) -> char {
        self.src.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.src.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let res = self.peek();
        self.current += 1;
        res
    }

    fn match_char(&mut self, c: char) -> bool {
        if self.is_at_end() || self.peek() != c {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.src.len()
    }

    fn make_token(&self, ty: Type) -> Token {
        let lexeme = match ty {
            Type::Eof => String::new(),
            _ => self.text(),
        };

        Token::new(ty, lexeme, None, self.line)
    }

    fn make_token_with_val(&self, ty: Type, val: Literal) -> Token {
        Token::new(ty, self.text(), Some(val), self.line)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        while !self.is_at_end() {
            self.start = self.current;

            match self.scan_token() {
                Ok(None) => continue,
                Ok(Some(token)) => return Some(token),
                Err(err) => self.errors.push(err),
            }
        }

        self.start = self.current;
        self.eof = true;
        Some(self.make_token(Type::Eof))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::Error;
    use crate::scanner::{scan, Scanner};
    use crate::token::{Literal, Token, Type};

    macro_rules! token {
        ($ty:ident, $lex:literal, $line:literal) => {
            Token::new(Type::$ty, String::from($lex), None, $line)
        };
    }

    fn types(src: &str) -> Vec<Type> {
        scan(src).tokens.into_iter().map(|token| token.ty).collect()
    }

    #[test]
    fn test_basic_scanning() {
        let source = "class fun {} var foo bar 12.45 \"hello\" true false nil // this is a comment";
        let mut scanner = Scanner::new();
        let stream = scanner.scan_tokens(source);

        assert_eq!(
            stream.collect::<Vec<Token>>(),
            vec![
                token!(Class, "class", 1),
                token!(Fun, "fun", 1),
                token!(LeftBrace, "{", 1),
                token!(RightBrace, "}", 1),
                token!(Var, "var", 1),
                token!(Identifier, "foo", 1),
                token!(Identifier, "bar", 1),
                Token::new(
                    Type::Number,
                    String::from("12.45"),
                    Some(Literal::Num(12.45)),
                    1
                ),
                Token::new(
                    Type::String,
                    String::from("\"hello\""),
                    Some(Literal::from("hello")),
                    1
                ),
                token!(True, "true", 1),
                token!(False, "false", 1),
                token!(Nil, "nil", 1),
                token!(Eof, "", 1),
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            types("! != = == < <= > >= / *"),
            vec![
                Type::Bang,
                Type::BangEqual,
                Type::Equal,
                Type::EqualEqual,
                Type::Less,
                Type::LessEqual,
                Type::Greater,
                Type::GreaterEqual,
                Type::Slash,
                Type::Star,
                Type::Eof,
            ]
        );
        assert_eq!(
            types("!==="),
            vec![Type::BangEqual, Type::EqualEqual, Type::Eof]
        );
    }

    #[test]
    fn test_numbers() {
        let scanned = scan("12 3.25 4. .5");
        let literals: Vec<Option<Literal>> =
            scanned.tokens.into_iter().map(|token| token.literal).collect();

        // neither a trailing nor a leading dot belongs to the number
        assert_eq!(
            literals,
            vec![
                Some(Literal::Num(12.0)),
                Some(Literal::Num(3.25)),
                Some(Literal::Num(4.0)),
                None,
                None,
                Some(Literal::Num(5.0)),
                None,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            types("_foo bar_1 android orchid while"),
            vec![
                Type::Identifier,
                Type::Identifier,
                Type::Identifier,
                Type::Identifier,
                Type::While,
                Type::Eof,
            ]
        );
    }

    #[test]
    fn test_line_counting() {
        let scanned = scan("var a;\n// comment\n\"multi\nline\" b");
        let lines: Vec<usize> = scanned.tokens.iter().map(|token| token.line).collect();

        assert_eq!(lines, vec![1, 1, 1, 4, 4, 4]);
    }

    #[test]
    fn test_unterminated_string() {
        let scanned = scan("var a = 1;\n\"hello\nworld");

        assert_eq!(scanned.errors, vec![Error::UnterminatedString { line: 2 }]);
        assert_eq!(scanned.tokens.last().map(|token| token.ty), Some(Type::Eof));
        assert_eq!(scanned.tokens.len(), 6);
    }

    #[test]
    fn test_errors_accumulate_while_streaming() {
        let mut scanner = Scanner::new();
        let mut stream = scanner.scan_tokens("@ 1 # 2");

        assert_eq!(stream.next().map(|token| token.ty), Some(Type::Number));
        assert_eq!(
            stream.errors(),
            &[Error::UnexpectedCharacter { ch: '@', line: 1 }]
        );

        assert_eq!(stream.by_ref().count(), 2);
        assert_eq!(stream.errors().len(), 2);
        assert_eq!(stream.take_errors().len(), 2);
        assert!(stream.errors().is_empty());
    }

    #[test]
    fn test_unexpected_character_continues() {
        let scanned = scan("1 @ 2 #\n3");

        assert_eq!(
            scanned.errors,
            vec![
                Error::UnexpectedCharacter { ch: '@', line: 1 },
                Error::UnexpectedCharacter { ch: '#', line: 1 },
            ]
        );
        assert_eq!(
            scanned.tokens.iter().map(|token| token.ty).collect::<Vec<_>>(),
            vec![Type::Number, Type::Number, Type::Number, Type::Eof]
        );
    }

    #[test]
    fn test_empty_source() {
        let scanned = scan("");

        assert!(!scanned.has_errors());
        assert_eq!(scanned.tokens, vec![token!(Eof, "", 1)]);
    }
}
