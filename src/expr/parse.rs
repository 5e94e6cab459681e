//! Recursive descent parser for formula text.
//!
//! Operator precedence follows Python, which is how the formulas are usually
//! written: `**` binds tighter than unary minus, so `-x**2` is `-(x**2)`, and
//! unary minus binds tighter than `*` and `/`.

use std::{iter::Peekable, str::CharIndices};

use thiserror::Error;

use super::{Expr, Func};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    #[error("the formula is empty")]
    Empty,

    #[error("unexpected character `{ch}` at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number `{text}` at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unexpected `{found}` at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("unknown function `{name}` at position {pos}")]
    UnknownFunction { name: String, pos: usize },

    #[error("function `{name}` at position {pos} must be called with an argument")]
    MissingArgument { name: String, pos: usize },

    #[error("unclosed parenthesis at position {pos}")]
    Unclosed { pos: usize },

    #[error("the formula is nested too deeply at position {pos}")]
    TooDeep { pos: usize },
}

/// Bound on the depth of the parsed tree, counting nested operators and
/// parentheses as well as chained binary operators.
const MAX_DEPTH: usize = 512;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Num(v) => v.to_string(),
            Self::Ident(name) => name.clone(),
            Self::Plus => "+".to_owned(),
            Self::Minus => "-".to_owned(),
            Self::Star => "*".to_owned(),
            Self::Slash => "/".to_owned(),
            Self::Pow => "**".to_owned(),
            Self::LParen => "(".to_owned(),
            Self::RParen => ")".to_owned(),
        }
    }
}

struct Lexer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>, ParseError> {
        let mut tokens = vec![];
        while let Some(&(pos, ch)) = self.chars.peek() {
            let token = match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                    continue;
                }
                '0'..='9' | '.' => self.number(pos)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.ident(pos),
                '*' => {
                    self.chars.next();
                    if self.chars.next_if(|&(_, c)| c == '*').is_some() {
                        Token::Pow
                    } else {
                        Token::Star
                    }
                }
                _ => {
                    self.chars.next();
                    match ch {
                        '+' => Token::Plus,
                        '-' => Token::Minus,
                        '/' => Token::Slash,
                        '^' => Token::Pow,
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        _ => return Err(ParseError::UnexpectedChar { ch, pos }),
                    }
                }
            };
            tokens.push((token, pos));
        }
        Ok(tokens)
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while self.chars.next_if(|(_, c)| c.is_ascii_digit()).is_some() {
            count += 1;
        }
        count
    }

    fn end(&mut self) -> usize {
        self.chars.peek().map_or(self.text.len(), |&(pos, _)| pos)
    }

    fn number(&mut self, start: usize) -> Result<Token, ParseError> {
        let mut digits = self.eat_digits();
        if self.chars.next_if(|&(_, c)| c == '.').is_some() {
            digits += self.eat_digits();
        }

        // only treat `e` as an exponent marker when digits follow it
        let source = self.text;
        let rest = &source[self.end()..];
        let mut exp = rest.chars();
        if matches!(exp.next(), Some('e' | 'E')) {
            let mut next = exp.next();
            if matches!(next, Some('+' | '-')) {
                next = exp.next();
            }
            if next.is_some_and(|c| c.is_ascii_digit()) {
                self.chars.next();
                self.chars.next_if(|&(_, c)| c == '+' || c == '-');
                self.eat_digits();
            }
        }

        let text = &source[start..self.end()];
        if digits == 0 {
            return Err(ParseError::InvalidNumber {
                text: text.to_owned(),
                pos: start,
            });
        }
        text.parse::<f64>()
            .map(Token::Num)
            .map_err(|_| ParseError::InvalidNumber {
                text: text.to_owned(),
                pos: start,
            })
    }

    /// Identifiers may be dotted so that `np.exp` reaches the function lookup.
    fn ident(&mut self, start: usize) -> Token {
        let source = self.text;
        loop {
            while self
                .chars
                .next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
                .is_some()
            {}
            let rest = &source[self.end()..];
            let mut after_dot = rest.chars();
            if after_dot.next() == Some('.')
                && after_dot
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            {
                self.chars.next();
            } else {
                break;
            }
        }
        Token::Ident(source[start..self.end()].to_owned())
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    /// Byte offset of the current token, or of the last one at the end.
    fn position(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .or_else(|| self.tokens.last())
            .map_or(0, |&(_, pos)| pos)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                pos: self.position(),
            });
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// sum := product (('+' | '-') product)*
    fn sum(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut lhs = self.product()?;
        loop {
            if self.eat(&Token::Plus) {
                self.enter()?;
                lhs = Expr::add(lhs, self.product()?);
            } else if self.eat(&Token::Minus) {
                self.enter()?;
                lhs = Expr::sub(lhs, self.product()?);
            } else {
                self.depth = depth;
                return Ok(lhs);
            }
        }
    }

    /// product := unary (('*' | '/') unary)*
    fn product(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut lhs = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                self.enter()?;
                lhs = Expr::mul(lhs, self.unary()?);
            } else if self.eat(&Token::Slash) {
                self.enter()?;
                lhs = Expr::div(lhs, self.unary()?);
            } else {
                self.depth = depth;
                return Ok(lhs);
            }
        }
    }

    /// unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = if self.eat(&Token::Minus) {
            Expr::neg(self.unary()?)
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(expr)
    }

    /// power := atom ('**' unary)?, right associative
    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom()?;
        if self.eat(&Token::Pow) {
            return Ok(Expr::pow(base, self.unary()?));
        }
        Ok(base)
    }

    /// atom := number | name | name '(' sum ')' | '(' sum ')'
    fn atom(&mut self) -> Result<Expr, ParseError> {
        let (token, pos) = self.next().ok_or(ParseError::UnexpectedEnd)?;
        match token {
            Token::Num(v) => Ok(Expr::Num(v)),
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LParen) {
                    let func = Func::from_name(&name)
                        .ok_or(ParseError::UnknownFunction { name, pos })?;
                    let open = self.tokens[self.cursor].1;
                    self.cursor += 1;
                    let arg = self.sum()?;
                    self.close(open)?;
                    Ok(Expr::call(func, arg))
                } else if Func::from_name(&name).is_some() {
                    Err(ParseError::MissingArgument { name, pos })
                } else if name.contains('.') {
                    Err(ParseError::UnexpectedToken { found: name, pos })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Token::LParen => {
                let inner = self.sum()?;
                self.close(pos)?;
                Ok(inner)
            }
            other => Err(ParseError::UnexpectedToken {
                found: other.describe(),
                pos,
            }),
        }
    }

    fn close(&mut self, open: usize) -> Result<(), ParseError> {
        match self.next() {
            Some((Token::RParen, _)) => Ok(()),
            Some((other, pos)) => Err(ParseError::UnexpectedToken {
                found: other.describe(),
                pos,
            }),
            None => Err(ParseError::Unclosed { pos: open }),
        }
    }
}

/// Parses a formula into an expression tree.
///
/// # Errors
/// Returns a [`ParseError`] describing the first problem found, with the byte
/// offset into `text` where applicable.
///
/// # Examples
///
/// ```
/// use logistic_roots::expr::parse;
///
/// let e = parse("x**2 - 4").unwrap();
/// assert_eq!(e.eval(&|_| 3.0), 5.0);
/// ```
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = Lexer::new(text).tokenize()?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.sum()?;
    match parser.next() {
        None => Ok(expr),
        Some((token, pos)) => Err(ParseError::UnexpectedToken {
            found: token.describe(),
            pos,
        }),
    }
}

#[cfg(test)]
mod test {
    use super::{parse, ParseError};
    use crate::expr::{Expr, Func};

    #[test]
    fn precedence() {
        assert_eq!(
            parse("1 + 2*x").unwrap(),
            Expr::add(Expr::Num(1.0), Expr::mul(Expr::Num(2.0), Expr::var("x")))
        );
        assert_eq!(
            parse("-x**2").unwrap(),
            Expr::neg(Expr::pow(Expr::var("x"), Expr::Num(2.0)))
        );
        assert_eq!(
            parse("-r*t").unwrap(),
            Expr::mul(Expr::neg(Expr::var("r")), Expr::var("t"))
        );
        // right associative
        assert_eq!(
            parse("2^3^2").unwrap(),
            Expr::pow(Expr::Num(2.0), Expr::pow(Expr::Num(3.0), Expr::Num(2.0)))
        );
        // left associative
        assert_eq!(
            parse("a - b - c").unwrap(),
            Expr::sub(Expr::sub(Expr::var("a"), Expr::var("b")), Expr::var("c"))
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(parse("1e-5").unwrap(), Expr::Num(1e-5));
        assert_eq!(parse("2.5E+3").unwrap(), Expr::Num(2500.0));
        assert_eq!(parse(".5").unwrap(), Expr::Num(0.5));
        assert_eq!(parse("3.").unwrap(), Expr::Num(3.0));
        assert!(matches!(
            parse("."),
            Err(ParseError::InvalidNumber { pos: 0, .. })
        ));
        // `2e` is a number followed by a name, which is not valid
        assert!(matches!(
            parse("2e"),
            Err(ParseError::UnexpectedToken { pos: 1, .. })
        ));
    }

    #[test]
    fn functions() {
        assert_eq!(
            parse("np.exp(-0.01*t)").unwrap(),
            Expr::call(
                Func::Exp,
                Expr::mul(Expr::neg(Expr::Num(0.01)), Expr::var("t"))
            )
        );
        assert!(matches!(
            parse("gamma(x)"),
            Err(ParseError::UnknownFunction { pos: 0, .. })
        ));
        assert!(matches!(
            parse("exp + 1"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse("foo.bar + 1"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn malformed() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("x +"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse("(x + 1"), Err(ParseError::Unclosed { pos: 0 }));
        assert_eq!(parse("sin(x"), Err(ParseError::Unclosed { pos: 3 }));
        assert_eq!(
            parse("x $ 2"),
            Err(ParseError::UnexpectedChar { ch: '$', pos: 2 })
        );
        assert_eq!(
            parse("x 2"),
            Err(ParseError::UnexpectedToken {
                found: "2".to_owned(),
                pos: 2
            })
        );
        assert_eq!(
            parse("x)"),
            Err(ParseError::UnexpectedToken {
                found: ")".to_owned(),
                pos: 1
            })
        );
    }

    #[test]
    fn nesting_limit() {
        let nested = |open: &str, close: &str, n: usize| {
            format!("{}x{}", open.repeat(n), close.repeat(n))
        };
        assert!(parse(&nested("-", "", 100)).is_ok());
        assert!(parse(&nested("(", ")", 100)).is_ok());
        assert!(parse(&nested("sin(", ")", 100)).is_ok());
        assert!(parse(&format!("x{}", "+x".repeat(100))).is_ok());

        assert!(matches!(
            parse(&nested("-", "", 1_000_000)),
            Err(ParseError::TooDeep { .. })
        ));
        assert!(matches!(
            parse(&nested("(", ")", 100_000)),
            Err(ParseError::TooDeep { .. })
        ));
        assert!(matches!(
            parse(&nested("2**", "", 100_000)),
            Err(ParseError::TooDeep { .. })
        ));
        assert!(matches!(
            parse(&format!("x{}", "*x".repeat(100_000))),
            Err(ParseError::TooDeep { .. })
        ));
    }
}
