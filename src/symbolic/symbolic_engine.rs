//! # Symbolic Engine Module
//!
//! Core expression-tree type of the differentiator. A mathematical expression is
//! stored as a recursive enum: leaves are numeric constants or variables (a variable
//! node carries the slot index of its entry in the [`VarTable`](crate::symbolic::var_table::VarTable)),
//! inner nodes are one of the 22 supported operators.
//!
//! ## Operator set
//!
//! - **Binary**: `Add`, `Sub`, `Mul`, `Div`, `Pow`, `Log` (where `Log(base, arg)`)
//! - **Unary**: the 4 trigonometric functions, their inverses, the 4 hyperbolic
//!   functions and their inverses — 16 in total, each holding only its argument.
//!
//! The enum owns its children through `Box`, so a tree is dropped recursively and
//! a deep copy is just `clone()`. There are no parent links: every algorithm that
//! needs context (printing, simplification splices) threads it through recursion.

#![allow(non_camel_case_types)]

use std::fmt;
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

/// Tolerance for every "is this value zero/one/at a domain boundary" comparison
/// shared by the evaluator and the simplifier.
pub const EPS: f64 = 1e-7;

/// Symbolic expression tree.
///
/// Variables are identified by their slot index in the session's variable table,
/// not by name; the table is the single owner of the names. This keeps nodes
/// cheap to compare and lets several trees of one session share variables.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::Var(0);
/// let expr = Expr::Add(x.boxed(), Expr::Const(2.0).boxed()); // x + 2
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Variable, payload is the slot index in the `VarTable`
    Var(usize),
    /// Numerical constant
    Const(f64),
    /// Addition: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Logarithm of `right` to base `left`
    Log(Box<Expr>, Box<Expr>),

    sin(Box<Expr>),
    cos(Box<Expr>),
    tan(Box<Expr>),
    cot(Box<Expr>),

    asin(Box<Expr>),
    acos(Box<Expr>),
    atan(Box<Expr>),
    acot(Box<Expr>),

    sinh(Box<Expr>),
    cosh(Box<Expr>),
    tanh(Box<Expr>),
    coth(Box<Expr>),

    asinh(Box<Expr>),
    acosh(Box<Expr>),
    atanh(Box<Expr>),
    acoth(Box<Expr>),
}

/// Tag for the 16 unary operators. The parser resolves reserved identifiers
/// through `UnaryFn::from_str` and the tests iterate the whole family with
/// `UnaryFn::iter()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Cot,
    Asin,
    Acos,
    Atan,
    Acot,
    Sinh,
    Cosh,
    Tanh,
    Coth,
    Asinh,
    Acosh,
    Atanh,
    Acoth,
}

impl Expr {
    /// Convenience wrapper, `Expr` variants take boxed children.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn num(value: f64) -> Expr {
        Expr::Const(value)
    }

    pub fn var(slot: usize) -> Expr {
        Expr::Var(slot)
    }

    /// Builds the unary operator node for a function tag.
    pub fn unary(fun: UnaryFn, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match fun {
            UnaryFn::Sin => Expr::sin(arg),
            UnaryFn::Cos => Expr::cos(arg),
            UnaryFn::Tan => Expr::tan(arg),
            UnaryFn::Cot => Expr::cot(arg),
            UnaryFn::Asin => Expr::asin(arg),
            UnaryFn::Acos => Expr::acos(arg),
            UnaryFn::Atan => Expr::atan(arg),
            UnaryFn::Acot => Expr::acot(arg),
            UnaryFn::Sinh => Expr::sinh(arg),
            UnaryFn::Cosh => Expr::cosh(arg),
            UnaryFn::Tanh => Expr::tanh(arg),
            UnaryFn::Coth => Expr::coth(arg),
            UnaryFn::Asinh => Expr::asinh(arg),
            UnaryFn::Acosh => Expr::acosh(arg),
            UnaryFn::Atanh => Expr::atanh(arg),
            UnaryFn::Acoth => Expr::acoth(arg),
        }
    }

    /// Splits a unary node into its function tag and argument.
    pub fn unary_parts(&self) -> Option<(UnaryFn, &Expr)> {
        match self {
            Expr::sin(a) => Some((UnaryFn::Sin, a)),
            Expr::cos(a) => Some((UnaryFn::Cos, a)),
            Expr::tan(a) => Some((UnaryFn::Tan, a)),
            Expr::cot(a) => Some((UnaryFn::Cot, a)),
            Expr::asin(a) => Some((UnaryFn::Asin, a)),
            Expr::acos(a) => Some((UnaryFn::Acos, a)),
            Expr::atan(a) => Some((UnaryFn::Atan, a)),
            Expr::acot(a) => Some((UnaryFn::Acot, a)),
            Expr::sinh(a) => Some((UnaryFn::Sinh, a)),
            Expr::cosh(a) => Some((UnaryFn::Cosh, a)),
            Expr::tanh(a) => Some((UnaryFn::Tanh, a)),
            Expr::coth(a) => Some((UnaryFn::Coth, a)),
            Expr::asinh(a) => Some((UnaryFn::Asinh, a)),
            Expr::acosh(a) => Some((UnaryFn::Acosh, a)),
            Expr::atanh(a) => Some((UnaryFn::Atanh, a)),
            Expr::acoth(a) => Some((UnaryFn::Acoth, a)),
            _ => None,
        }
    }

    /// Immutable view on the (left, right) children. Unary operators carry
    /// their argument in the right child, leaves have none.
    pub fn children(&self) -> (Option<&Expr>, Option<&Expr>) {
        match self {
            Expr::Var(_) | Expr::Const(_) => (None, None),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r)
            | Expr::Log(l, r) => (Some(l), Some(r)),
            Expr::sin(a)
            | Expr::cos(a)
            | Expr::tan(a)
            | Expr::cot(a)
            | Expr::asin(a)
            | Expr::acos(a)
            | Expr::atan(a)
            | Expr::acot(a)
            | Expr::sinh(a)
            | Expr::cosh(a)
            | Expr::tanh(a)
            | Expr::coth(a)
            | Expr::asinh(a)
            | Expr::acosh(a)
            | Expr::atanh(a)
            | Expr::acoth(a) => (None, Some(a)),
        }
    }

    /// Mutable counterpart of [`Expr::children`].
    pub fn children_mut(&mut self) -> (Option<&mut Expr>, Option<&mut Expr>) {
        match self {
            Expr::Var(_) | Expr::Const(_) => (None, None),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r)
            | Expr::Log(l, r) => (Some(l), Some(r)),
            Expr::sin(a)
            | Expr::cos(a)
            | Expr::tan(a)
            | Expr::cot(a)
            | Expr::asin(a)
            | Expr::acos(a)
            | Expr::atan(a)
            | Expr::acot(a)
            | Expr::sinh(a)
            | Expr::cosh(a)
            | Expr::tanh(a)
            | Expr::coth(a)
            | Expr::asinh(a)
            | Expr::acosh(a)
            | Expr::atanh(a)
            | Expr::acoth(a) => (None, Some(a)),
        }
    }

    /// Checks whether the expression mentions the variable in `slot`.
    /// Recursive OR across children; constants never do, a variable node
    /// only when the slots match.
    pub fn contains_variable(&self, slot: usize) -> bool {
        match self {
            Expr::Var(idx) => *idx == slot,
            Expr::Const(_) => false,
            _ => {
                let (left, right) = self.children();
                left.is_some_and(|l| l.contains_variable(slot))
                    || right.is_some_and(|r| r.contains_variable(slot))
            }
        }
    }

    /// Constant equal to zero, within [`EPS`].
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if val.abs() < EPS)
    }

    /// Constant equal to one, within [`EPS`].
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if (val - 1.0).abs() < EPS)
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let (left, right) = self.children();
        1 + left.map_or(0, |l| l.node_count()) + right.map_or(0, |r| r.node_count())
    }

    /// Consistency check over the whole tree: every variable slot must exist in
    /// the table and constants must not hide an infinity smuggled in by a caller.
    /// Broken trees are programming errors, so the check is meant for debug
    /// assertions and tests, not for user input validation.
    pub fn verify(&self, var_count: usize) -> Result<(), String> {
        match self {
            Expr::Var(slot) if *slot >= var_count => Err(format!(
                "variable slot {} out of range (table holds {} variables)",
                slot, var_count
            )),
            Expr::Const(val) if val.is_infinite() => {
                Err(format!("non-finite constant {} in tree", val))
            }
            _ => {
                let (left, right) = self.children();
                if let Some(l) = left {
                    l.verify(var_count)?;
                }
                if let Some(r) = right {
                    r.verify(var_count)?;
                }
                Ok(())
            }
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Expr::Const(-1.0).boxed(), self.boxed())
    }
}

impl Expr {
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Logarithm of `self` to the given base.
    pub fn log(self, base: Expr) -> Expr {
        Expr::Log(base.boxed(), self.boxed())
    }

    /// Natural logarithm, sugar for `Log(e, self)`.
    pub fn ln(self) -> Expr {
        Expr::Log(Expr::Const(std::f64::consts::E).boxed(), self.boxed())
    }
}

/// Debug-oriented printing: variables render as `#slot` because the table with
/// their names lives in the session. Use `to_infix` / `to_prefix` from the
/// `tree_io` module for human-readable output.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(slot) => write!(f, "#{}", slot),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Log(base, arg) => write!(f, "log({}, {})", base, arg),
            _ => {
                let (fun, arg) = self.unary_parts().expect("non-unary handled above");
                write!(f, "{}({})", fun, arg)
            }
        }
    }
}
