//! Reading and writing expression trees.
//!
//! Two textual forms are supported. The infix form (see
//! [`parse_expr`](crate::symbolic::parse_expr)) is for humans. The prefix form
//! is the round-trippable serialization:
//! ```text
//! (+ (* 2 x) 5)          sugar: leaves may appear bare
//! (^ (- 0 1) 0.5)        fractional constants are allowed here
//! (sin nil x)            unary operators keep an explicit nil left child
//! ```
//! A node is `(op left right)` where an absent child is written `nil`;
//! a leaf may appear bare as a number or a variable name, or fully
//! parenthesized with two nil children, `(5 nil nil)` / `(x nil nil)`.

use super::parse_expr::ParseError;
use super::symbolic_engine::{Expr, UnaryFn};
use super::var_table::VarTable;
use std::path::Path;
use std::str::FromStr;

/// Renders the tree in infix form with the real variable names.
pub fn to_infix(expr: &Expr, table: &VarTable) -> String {
    match expr {
        Expr::Var(slot) => table
            .name_of(*slot)
            .map(|s| s.to_owned())
            .unwrap_or_else(|| format!("#{}", slot)),
        Expr::Const(val) => format!("{}", val),
        Expr::Add(l, r) => format!("({} + {})", to_infix(l, table), to_infix(r, table)),
        Expr::Sub(l, r) => format!("({} - {})", to_infix(l, table), to_infix(r, table)),
        Expr::Mul(l, r) => format!("({} * {})", to_infix(l, table), to_infix(r, table)),
        Expr::Div(l, r) => format!("({} / {})", to_infix(l, table), to_infix(r, table)),
        Expr::Pow(l, r) => format!("({} ^ {})", to_infix(l, table), to_infix(r, table)),
        Expr::Log(l, r) => format!("log({}, {})", to_infix(l, table), to_infix(r, table)),
        _ => {
            let (fun, arg) = expr.unary_parts().unwrap();
            format!("{}({})", fun, to_infix(arg, table))
        }
    }
}

/// Renders the tree in prefix form. Leaves are bare, inner nodes are
/// `(op left right)` with `nil` for a missing child.
pub fn to_prefix(expr: &Expr, table: &VarTable) -> String {
    match expr {
        Expr::Var(slot) => table
            .name_of(*slot)
            .map(|s| s.to_owned())
            .unwrap_or_else(|| format!("#{}", slot)),
        Expr::Const(val) => format!("{}", val),
        Expr::Add(l, r) => format!("(+ {} {})", to_prefix(l, table), to_prefix(r, table)),
        Expr::Sub(l, r) => format!("(- {} {})", to_prefix(l, table), to_prefix(r, table)),
        Expr::Mul(l, r) => format!("(* {} {})", to_prefix(l, table), to_prefix(r, table)),
        Expr::Div(l, r) => format!("(/ {} {})", to_prefix(l, table), to_prefix(r, table)),
        Expr::Pow(l, r) => format!("(^ {} {})", to_prefix(l, table), to_prefix(r, table)),
        Expr::Log(l, r) => format!("(log {} {})", to_prefix(l, table), to_prefix(r, table)),
        _ => {
            let (fun, arg) = expr.unary_parts().unwrap();
            format!("({} nil {})", fun, to_prefix(arg, table))
        }
    }
}

/// Parses the prefix form, interning variables into `table`.
pub fn parse_prefix(input: &str, table: &mut VarTable) -> Result<Expr, ParseError> {
    let mut reader = PrefixReader {
        chars: input.char_indices().peekable(),
        len: input.len(),
        table,
    };
    let expr = reader.node()?.ok_or_else(|| ParseError {
        pos: 0,
        message: "empty tree (nil at top level)".to_string(),
    })?;
    reader.skip_ws();
    match reader.chars.peek() {
        None => Ok(expr),
        Some(&(pos, c)) => Err(ParseError {
            pos,
            message: format!("unexpected character '{}'", c),
        }),
    }
}

struct PrefixReader<'a, 'b> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    len: usize,
    table: &'b mut VarTable,
}

impl PrefixReader<'_, '_> {
    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(&(_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    /// Reads one node. `Ok(None)` is a `nil` child.
    fn node(&mut self) -> Result<Option<Expr>, ParseError> {
        self.skip_ws();
        let &(pos, c) = self.chars.peek().ok_or_else(|| ParseError {
            pos: self.len,
            message: "unexpected end of input".to_string(),
        })?;
        if c == '(' {
            self.chars.next();
            let expr = self.parenthesized(pos)?;
            return Ok(Some(expr));
        }
        let atom = self.atom()?;
        if atom == "nil" {
            return Ok(None);
        }
        Ok(Some(self.leaf(pos, &atom)?))
    }

    fn parenthesized(&mut self, open_pos: usize) -> Result<Expr, ParseError> {
        self.skip_ws();
        let op_pos = self.chars.peek().map_or(self.len, |&(p, _)| p);
        let op = self.atom()?;
        let left = self.node()?;
        let right = self.node()?;
        self.skip_ws();
        match self.chars.next() {
            Some((_, ')')) => {}
            _ => {
                return Err(ParseError {
                    pos: open_pos,
                    message: "unbalanced '(' in prefix tree".to_string(),
                });
            }
        }
        let both = |l: Option<Expr>, r: Option<Expr>| -> Result<(Box<Expr>, Box<Expr>), ParseError> {
            match (l, r) {
                (Some(l), Some(r)) => Ok((l.boxed(), r.boxed())),
                _ => Err(ParseError {
                    pos: op_pos,
                    message: format!("operator '{}' needs two children", op),
                }),
            }
        };
        match op.as_str() {
            "+" => both(left, right).map(|(l, r)| Expr::Add(l, r)),
            "-" => both(left, right).map(|(l, r)| Expr::Sub(l, r)),
            "*" => both(left, right).map(|(l, r)| Expr::Mul(l, r)),
            "/" => both(left, right).map(|(l, r)| Expr::Div(l, r)),
            "^" => both(left, right).map(|(l, r)| Expr::Pow(l, r)),
            "log" => both(left, right).map(|(l, r)| Expr::Log(l, r)),
            name => {
                if let Ok(fun) = UnaryFn::from_str(name) {
                    return match (left, right) {
                        (None, Some(arg)) => Ok(Expr::unary(fun, arg)),
                        _ => Err(ParseError {
                            pos: op_pos,
                            message: format!("'{}' takes nil and one argument", name),
                        }),
                    };
                }
                // a fully parenthesized leaf, `(5 nil nil)` or `(x nil nil)`
                if left.is_none() && right.is_none() {
                    return self.leaf(op_pos, name);
                }
                Err(ParseError {
                    pos: op_pos,
                    message: format!("unknown operator '{}'", name),
                })
            }
        }
    }

    fn atom(&mut self) -> Result<String, ParseError> {
        self.skip_ws();
        let mut atom = String::new();
        while matches!(self.chars.peek(), Some(&(_, c)) if !c.is_whitespace() && c != '(' && c != ')')
        {
            atom.push(self.chars.next().unwrap().1);
        }
        if atom.is_empty() {
            let pos = self.chars.peek().map_or(self.len, |&(p, _)| p);
            return Err(ParseError {
                pos,
                message: "expected an atom".to_string(),
            });
        }
        Ok(atom)
    }

    /// Bare leaf: a numeric literal (fractions allowed here) or a variable name.
    fn leaf(&mut self, pos: usize, atom: &str) -> Result<Expr, ParseError> {
        if atom
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.')
        {
            return atom.parse::<f64>().map(Expr::Const).map_err(|_| ParseError {
                pos,
                message: format!("bad numeric literal '{}'", atom),
            });
        }
        if VarTable::valid_name(atom) {
            Ok(Expr::Var(self.table.intern(atom)))
        } else {
            Err(ParseError {
                pos,
                message: format!("bad leaf '{}'", atom),
            })
        }
    }
}

/// Writes the prefix form of the tree, with a trailing newline, to `path`.
pub fn save_tree(expr: &Expr, table: &VarTable, path: &Path) -> Result<(), String> {
    let text = format!("{}\n", to_prefix(expr, table));
    std::fs::write(path, text).map_err(|e| format!("cannot write {}: {}", path.display(), e))
}

/// Reads a prefix-form tree from `path`, interning variables into `table`.
pub fn load_tree(path: &Path, table: &mut VarTable) -> Result<Expr, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    parse_prefix(text.trim(), table).map_err(|e| format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_reads_bare_leaves() {
        let mut table = VarTable::new();
        let expr = parse_prefix("(+ (* 2 x) 5)", &mut table).unwrap();
        assert_eq!(
            expr,
            Expr::Const(2.0) * Expr::Var(0) + Expr::Const(5.0)
        );
    }

    #[test]
    fn prefix_reads_parenthesized_leaves() {
        let mut table = VarTable::new();
        let expr = parse_prefix("(+ (2 nil nil) (x nil nil))", &mut table).unwrap();
        assert_eq!(expr, Expr::Const(2.0) + Expr::Var(0));
        let mut table2 = VarTable::new();
        let bare = parse_prefix("(+ 2 x)", &mut table2).unwrap();
        assert_eq!(expr, bare);
        // a leaf node still cannot carry children
        assert!(parse_prefix("(5 x nil)", &mut table).is_err());
    }

    #[test]
    fn prefix_allows_fractional_constants() {
        let mut table = VarTable::new();
        let expr = parse_prefix("(^ (- 0 1) 0.5)", &mut table).unwrap();
        assert_eq!(
            expr,
            (Expr::Const(0.0) - Expr::Const(1.0)).pow(Expr::Const(0.5))
        );
    }

    #[test]
    fn unary_requires_nil_left_child() {
        let mut table = VarTable::new();
        assert!(parse_prefix("(sin nil x)", &mut table).is_ok());
        assert!(parse_prefix("(sin x nil)", &mut table).is_err());
    }

    #[test]
    fn prefix_round_trip() {
        let mut table = VarTable::new();
        let expr = parse_prefix("(log 2 (+ x (sin nil y)))", &mut table).unwrap();
        let text = to_prefix(&expr, &table);
        let mut table2 = VarTable::new();
        let again = parse_prefix(&text, &mut table2).unwrap();
        assert_eq!(expr, again);
        assert_eq!(table.names(), table2.names());
    }

    #[test]
    fn infix_rendering_uses_names() {
        let mut table = VarTable::new();
        let expr = parse_prefix("(+ x 1)", &mut table).unwrap();
        assert_eq!(to_infix(&expr, &table), "(x + 1)");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.txt");
        let mut table = VarTable::new();
        let expr = parse_prefix("(* (cos nil x) (^ x 3))", &mut table).unwrap();
        save_tree(&expr, &table, &path).unwrap();
        let mut table2 = VarTable::new();
        let loaded = load_tree(&path, &mut table2).unwrap();
        assert_eq!(expr, loaded);
    }
}
