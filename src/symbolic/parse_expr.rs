//! a module turns a String expression into a symbolic expression
//!
//! Infix grammar, in increasing precedence:
//! ```text
//! expression := term   (('+' | '-') term)*
//! term       := power  (('*' | '/') power)*
//! power      := primary ('^' primary)*
//! primary    := INTEGER
//!             | IDENT                      -- variable, interned on sight
//!             | FUN '(' expression ')'     -- the 16 unary functions
//!             | "log" '(' expression ',' expression ')'
//!             | '(' expression ')'
//! ```
//! Numeric literals are unsigned integers only; fractional or negative
//! constants enter a tree through the prefix form, through subtraction, or
//! through computation. Reading stops at the first newline, anything after
//! it (plot-range hints and the like) is ignored.

use super::symbolic_engine::{Expr, UnaryFn};
use super::var_table::VarTable;
use std::fmt;
use std::str::FromStr;

/// Parse failure with the byte offset in the input where it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub pos: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "parse error at position {}: {}", self.pos, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses an infix expression, interning every variable it meets into `table`.
pub fn parse_expression(input: &str, table: &mut VarTable) -> Result<Expr, ParseError> {
    let line = match input.find('\n') {
        Some(end) => &input[..end],
        None => input,
    };
    let mut parser = Parser {
        chars: line.char_indices().peekable(),
        len: line.len(),
        table,
    };
    let expr = parser.expression()?;
    parser.skip_ws();
    match parser.chars.peek() {
        None => Ok(expr),
        Some(&(pos, c)) => Err(ParseError {
            pos,
            message: format!("unexpected character '{}'", c),
        }),
    }
}

struct Parser<'a, 'b> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    len: usize,
    table: &'b mut VarTable,
}

impl Parser<'_, '_> {
    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(&(_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    /// Consumes `expected` if it is the next non-space character.
    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if matches!(self.chars.peek(), Some(&(_, c)) if c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            let pos = self.chars.peek().map_or(self.len, |&(p, _)| p);
            Err(ParseError {
                pos,
                message: format!("expected '{}'", expected),
            })
        }
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        loop {
            if self.eat('+') {
                lhs = lhs + self.term()?;
            } else if self.eat('-') {
                lhs = lhs - self.term()?;
            } else {
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.power()?;
        loop {
            if self.eat('*') {
                lhs = lhs * self.power()?;
            } else if self.eat('/') {
                lhs = lhs / self.power()?;
            } else {
                return Ok(lhs);
            }
        }
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.primary()?;
        while self.eat('^') {
            lhs = lhs.pow(self.primary()?);
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        let &(pos, c) = self.chars.peek().ok_or_else(|| ParseError {
            pos: self.len,
            message: "unexpected end of input".to_string(),
        })?;
        if c == '(' {
            self.chars.next();
            let inner = self.expression()?;
            self.expect(')')?;
            return Ok(inner);
        }
        if c.is_ascii_digit() {
            return self.integer();
        }
        if c.is_ascii_alphabetic() || c == '_' {
            return self.identifier();
        }
        Err(ParseError {
            pos,
            message: format!("unexpected character '{}'", c),
        })
    }

    fn integer(&mut self) -> Result<Expr, ParseError> {
        let &(start, _) = self.chars.peek().unwrap();
        let mut digits = String::new();
        while matches!(self.chars.peek(), Some(&(_, c)) if c.is_ascii_digit()) {
            digits.push(self.chars.next().unwrap().1);
        }
        // a '.' here would start a fractional literal, which the infix form
        // does not have
        if matches!(self.chars.peek(), Some(&(_, '.'))) {
            return Err(ParseError {
                pos: start,
                message: format!("fractional literal '{}.' not allowed", digits),
            });
        }
        digits.parse::<u64>().map(|n| Expr::Const(n as f64)).map_err(|_| ParseError {
            pos: start,
            message: format!("integer literal '{}' out of range", digits),
        })
    }

    fn identifier(&mut self) -> Result<Expr, ParseError> {
        let &(start, _) = self.chars.peek().unwrap();
        let mut name = String::new();
        while matches!(self.chars.peek(), Some(&(_, c)) if c.is_ascii_alphanumeric() || c == '_') {
            name.push(self.chars.next().unwrap().1);
        }
        if name == "log" {
            self.expect('(')?;
            let base = self.expression()?;
            self.expect(',')?;
            let arg = self.expression()?;
            self.expect(')')?;
            return Ok(Expr::Log(base.boxed(), arg.boxed()));
        }
        if let Ok(fun) = UnaryFn::from_str(&name) {
            self.expect('(')?;
            let arg = self.expression()?;
            self.expect(')')?;
            return Ok(Expr::unary(fun, arg));
        }
        // an unknown name followed by '(' reads as a call to a function we do
        // not have, which deserves an error rather than a variable
        self.skip_ws();
        if matches!(self.chars.peek(), Some(&(_, '('))) {
            return Err(ParseError {
                pos: start,
                message: format!("unknown function '{}'", name),
            });
        }
        Ok(Expr::Var(self.table.intern(&name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (Expr, VarTable) {
        let mut table = VarTable::new();
        let expr = parse_expression(input, &mut table).unwrap();
        (expr, table)
    }

    #[test]
    fn precedence_and_associativity() {
        let (expr, _) = parse("1+2*3");
        assert_eq!(
            expr,
            Expr::Const(1.0) + Expr::Const(2.0) * Expr::Const(3.0)
        );
        let (expr, _) = parse("1-2-3");
        assert_eq!(
            expr,
            (Expr::Const(1.0) - Expr::Const(2.0)) - Expr::Const(3.0)
        );
    }

    #[test]
    fn functions_and_variables() {
        let (expr, table) = parse("sin(x) + log(2, y)");
        assert_eq!(table.slot_of("x"), Some(0));
        assert_eq!(table.slot_of("y"), Some(1));
        assert_eq!(
            expr,
            Expr::sin(Expr::Var(0).boxed())
                + Expr::Log(Expr::Const(2.0).boxed(), Expr::Var(1).boxed())
        );
    }

    #[test]
    fn literals_carry_no_sign() {
        // negatives are spelled through subtraction, "-x" on its own is not
        // in the grammar
        let mut table = VarTable::new();
        assert!(parse_expression("-x", &mut table).is_err());
        let expr = parse_expression("0-x", &mut table).unwrap();
        assert_eq!(expr, Expr::Const(0.0) - Expr::Var(0));
    }

    #[test]
    fn reading_stops_at_newline() {
        let mut table = VarTable::new();
        let expr = parse_expression("x+1\n-5 5", &mut table).unwrap();
        assert_eq!(expr, Expr::Var(0) + Expr::Const(1.0));
    }

    #[test]
    fn unknown_function_is_an_error() {
        let mut table = VarTable::new();
        let err = parse_expression("foo(x)", &mut table).unwrap_err();
        assert!(err.message.contains("unknown function"));
        assert_eq!(err.pos, 0);
    }

    #[test]
    fn fractional_literal_is_an_error() {
        let mut table = VarTable::new();
        assert!(parse_expression("1.5*x", &mut table).is_err());
    }

    #[test]
    fn reports_position_of_bad_character() {
        let mut table = VarTable::new();
        let err = parse_expression("x + $", &mut table).unwrap_err();
        assert_eq!(err.pos, 4);
    }
}
