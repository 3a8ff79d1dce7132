//! Simplification of expression trees.
//!
//! `optimize` mutates the tree in place and runs to a fixed point: it repeats
//! {constant fold; algebraic identities} until a full round changes nothing.
//! Constant folding is post-order, any operator whose children have already
//! collapsed to constants is replaced by one constant node holding the
//! evaluated result (a NaN result folds too, the tree is undefined either
//! way). The identity pass knows only the arithmetic rules below; there are
//! deliberately no rules for the transcendental operators beyond folding.
//!
//! All "is this zero/one" checks share [`EPS`](crate::symbolic::symbolic_engine::EPS)
//! with the evaluator.

use super::symbolic_engine::Expr;
use super::symbolic_evaluate::evaluate;

impl Expr {
    /// Runs constant folding and identity simplification to a fixed point.
    pub fn optimize(&mut self) {
        loop {
            let folded = self.fold_constants();
            let simplified = self.simplify_identities();
            if !folded && !simplified {
                break;
            }
        }
    }

    /// One post-order constant-folding pass. Returns whether the tree changed.
    pub fn fold_constants(&mut self) -> bool {
        let mut changed = {
            let (left, right) = self.children_mut();
            let l = left.map(|l| l.fold_constants()).unwrap_or(false);
            let r = right.map(|r| r.fold_constants()).unwrap_or(false);
            l || r
        };
        let foldable = match self {
            Expr::Var(_) | Expr::Const(_) => false,
            _ => {
                let (left, right) = self.children();
                left.is_none_or(|l| matches!(l, Expr::Const(_)))
                    && right.is_some_and(|r| matches!(r, Expr::Const(_)))
            }
        };
        if foldable {
            *self = Expr::Const(evaluate(self, &[]));
            changed = true;
        }
        changed
    }

    /// One bottom-up identity pass. Returns whether the tree changed.
    ///
    /// - `0 + x`, `x + 0`, `x - 0` drop the zero
    /// - `0 * x`, `x * 0`, `0 / x` collapse to 0
    /// - `1 * x`, `x * 1`, `x / 1` drop the one
    /// - `0 ^ x` is 0, `1 ^ x` and `x ^ 0` are 1, `x ^ 1` is x
    pub fn simplify_identities(&mut self) -> bool {
        let mut changed = {
            let (left, right) = self.children_mut();
            let l = left.map(|l| l.simplify_identities()).unwrap_or(false);
            let r = right.map(|r| r.simplify_identities()).unwrap_or(false);
            l || r
        };
        let replacement = match self {
            Expr::Add(l, r) if l.is_zero() => Some(take(r)),
            Expr::Add(l, r) if r.is_zero() => Some(take(l)),
            Expr::Sub(l, r) if r.is_zero() => Some(take(l)),
            Expr::Mul(l, r) if l.is_zero() || r.is_zero() => Some(Expr::Const(0.0)),
            Expr::Mul(l, r) if l.is_one() => Some(take(r)),
            Expr::Mul(l, r) if r.is_one() => Some(take(l)),
            Expr::Div(l, _) if l.is_zero() => Some(Expr::Const(0.0)),
            Expr::Div(l, r) if r.is_one() => Some(take(l)),
            Expr::Pow(l, _) if l.is_zero() => Some(Expr::Const(0.0)),
            Expr::Pow(l, r) if l.is_one() || r.is_zero() => Some(Expr::Const(1.0)),
            Expr::Pow(l, r) if r.is_one() => Some(take(l)),
            _ => None,
        };
        if let Some(new) = replacement {
            // node splice, the node keeps its place in the parent
            *self = new;
            changed = true;
        }
        changed
    }
}

fn take(child: &mut Expr) -> Expr {
    std::mem::replace(child, Expr::Const(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr::parse_expression;
    use crate::symbolic::var_table::VarTable;
    use approx::assert_relative_eq;

    fn parsed(input: &str) -> Expr {
        let mut table = VarTable::new();
        parse_expression(input, &mut table).unwrap()
    }

    #[test]
    fn constant_tree_folds_to_single_number() {
        let mut expr = parsed("2*3+sin(0)+log(2, 8)");
        expr.optimize();
        match expr {
            Expr::Const(val) => assert_relative_eq!(val, 9.0, max_relative = 1e-12),
            other => panic!("expected a single constant, got {}", other),
        }
    }

    #[test]
    fn identities_drop_noise() {
        let mut expr = parsed("0*x + 1*y + z^1 - 0");
        expr.optimize();
        assert_eq!(expr, Expr::Var(1) + Expr::Var(2));
    }

    #[test]
    fn derivative_of_linear_becomes_constant() {
        let mut expr = parsed("3*x+2").diff(0);
        expr.optimize();
        assert_eq!(expr, Expr::Const(3.0));
    }

    #[test]
    fn derivative_of_square_becomes_two_x() {
        let mut expr = parsed("x^2").diff(0);
        expr.optimize();
        // 2 * x^1 simplifies down to 2 * x
        assert_eq!(expr, Expr::Const(2.0) * Expr::Var(0));
    }

    #[test]
    fn optimize_reaches_a_fixed_point() {
        let mut expr = parsed("sin(x)*1 + (2+3)*0 + x^1");
        expr.optimize();
        let snapshot = expr.clone();
        expr.optimize();
        assert_eq!(expr, snapshot);
    }

    #[test]
    fn undefined_constants_fold_to_nan() {
        let mut expr = parsed("1/0 + x");
        expr.optimize();
        match expr {
            Expr::Add(l, _) => assert!(matches!(*l, Expr::Const(v) if v.is_nan())),
            other => panic!("unexpected shape {}", other),
        }
    }

    #[test]
    fn near_zero_counts_as_zero() {
        let mut expr = Expr::Const(1e-9) * Expr::Var(0);
        expr.optimize();
        assert_eq!(expr, Expr::Const(0.0));
    }
}
