//! Symbolic differentiation.
//!
//! `diff` produces the raw derivative tree with respect to one variable slot.
//! No cleanup happens here, the result is full of `0 * ...` and `... ^ 1`
//! noise by construction; run the simplifier from
//! [`symbolic_simplify`](crate::symbolic::symbolic_simplify) afterwards.
//!
//! `Pow` and `Log` each branch three ways on which side actually mentions the
//! differentiation variable, so `x^2` takes the plain power rule while `2^x`
//! takes the exponential rule and `x^x` the combined one.

use super::symbolic_engine::{Expr, UnaryFn};

impl Expr {
    /// Derivative of the expression with respect to the variable in `slot`.
    pub fn diff(&self, slot: usize) -> Expr {
        match self {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Var(idx) => {
                if *idx == slot {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Add(l, r) => l.diff(slot) + r.diff(slot),
            Expr::Sub(l, r) => l.diff(slot) - r.diff(slot),
            Expr::Mul(l, r) => {
                l.diff(slot) * (**r).clone() + (**l).clone() * r.diff(slot)
            }
            Expr::Div(l, r) => {
                (l.diff(slot) * (**r).clone() - (**l).clone() * r.diff(slot))
                    / (**r).clone().pow(Expr::Const(2.0))
            }
            Expr::Pow(base, exp) => diff_pow(base, exp, slot),
            Expr::Log(base, arg) => diff_log(base, arg, slot),
            _ => {
                let (fun, arg) = self.unary_parts().expect("non-unary handled above");
                diff_unary(fun, arg, slot)
            }
        }
    }
}

fn diff_pow(base: &Expr, exp: &Expr, slot: usize) -> Expr {
    let in_base = base.contains_variable(slot);
    let in_exp = exp.contains_variable(slot);
    match (in_base, in_exp) {
        (false, false) => Expr::Const(0.0),
        // power rule: n * base^(n-1) * base'
        (true, false) => {
            exp.clone() * base.clone().pow(exp.clone() - Expr::Const(1.0)) * base.diff(slot)
        }
        // exponential rule: base^exp * ln(base) * exp'
        (false, true) => base.clone().pow(exp.clone()) * base.clone().ln() * exp.diff(slot),
        // general case: (exp' * ln(base) + exp/base * base') * base^exp
        (true, true) => {
            (exp.diff(slot) * base.clone().ln()
                + (exp.clone() / base.clone()) * base.diff(slot))
                * base.clone().pow(exp.clone())
        }
    }
}

fn diff_log(base: &Expr, arg: &Expr, slot: usize) -> Expr {
    let in_base = base.contains_variable(slot);
    let in_arg = arg.contains_variable(slot);
    match (in_base, in_arg) {
        (false, false) => Expr::Const(0.0),
        // d/dx log_b(a) with only the base varying:
        // -ln(a) * b' / (ln(b)^2 * b)
        (true, false) => {
            (Expr::Const(-1.0) * arg.clone().ln() * base.diff(slot))
                / (base.clone().ln().pow(Expr::Const(2.0)) * base.clone())
        }
        // only the argument varying: a' / (a * ln(b))
        (false, true) => arg.diff(slot) / (arg.clone() * base.clone().ln()),
        // both varying:
        // (a' ln(b)/a - b' ln(a)/b) / ln(b)^2
        (true, true) => {
            (arg.diff(slot) * base.clone().ln() / arg.clone()
                - base.diff(slot) * arg.clone().ln() / base.clone())
                / base.clone().ln().pow(Expr::Const(2.0))
        }
    }
}

fn diff_unary(fun: UnaryFn, arg: &Expr, slot: usize) -> Expr {
    let u = arg.clone();
    let du = arg.diff(slot);
    match fun {
        UnaryFn::Sin => Expr::cos(u.boxed()) * du,
        UnaryFn::Cos => -Expr::sin(u.boxed()) * du,
        UnaryFn::Tan => du / Expr::cos(u.boxed()).pow(Expr::Const(2.0)),
        UnaryFn::Cot => -(du / Expr::sin(u.boxed()).pow(Expr::Const(2.0))),
        UnaryFn::Asin => {
            (Expr::Const(1.0) - u.pow(Expr::Const(2.0))).pow(Expr::Const(-0.5)) * du
        }
        UnaryFn::Acos => {
            -((Expr::Const(1.0) - u.pow(Expr::Const(2.0))).pow(Expr::Const(-0.5))) * du
        }
        UnaryFn::Atan => du / (Expr::Const(1.0) + u.pow(Expr::Const(2.0))),
        UnaryFn::Acot => -(du / (Expr::Const(1.0) + u.pow(Expr::Const(2.0)))),
        UnaryFn::Sinh => Expr::cosh(u.boxed()) * du,
        UnaryFn::Cosh => Expr::sinh(u.boxed()) * du,
        UnaryFn::Tanh => du / Expr::cosh(u.boxed()).pow(Expr::Const(2.0)),
        UnaryFn::Coth => -(du / Expr::sinh(u.boxed()).pow(Expr::Const(2.0))),
        UnaryFn::Asinh => {
            (u.pow(Expr::Const(2.0)) + Expr::Const(1.0)).pow(Expr::Const(-0.5)) * du
        }
        UnaryFn::Acosh => {
            (u.pow(Expr::Const(2.0)) - Expr::Const(1.0)).pow(Expr::Const(-0.5)) * du
        }
        UnaryFn::Atanh | UnaryFn::Acoth => du / (Expr::Const(1.0) - u.pow(Expr::Const(2.0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_evaluate::evaluate;
    use approx::assert_relative_eq;

    #[test]
    fn constants_and_other_variables_vanish() {
        assert_eq!(Expr::Const(4.0).diff(0), Expr::Const(0.0));
        assert_eq!(Expr::Var(1).diff(0), Expr::Const(0.0));
        assert_eq!(Expr::Var(0).diff(0), Expr::Const(1.0));
    }

    #[test]
    fn power_rule_value() {
        // d/dx x^2 at x=5 is 10, even before simplification
        let expr = Expr::Var(0).pow(Expr::Const(2.0));
        let d = expr.diff(0);
        assert_relative_eq!(evaluate(&d, &[5.0]), 10.0, max_relative = 1e-9);
    }

    #[test]
    fn exponential_rule_value() {
        // d/dx 2^x = 2^x ln 2
        let expr = Expr::Const(2.0).pow(Expr::Var(0));
        let d = expr.diff(0);
        let x = 1.5_f64;
        assert_relative_eq!(
            evaluate(&d, &[x]),
            2f64.powf(x) * 2f64.ln(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn x_to_the_x() {
        // d/dx x^x = x^x (ln x + 1)
        let expr = Expr::Var(0).pow(Expr::Var(0));
        let d = expr.diff(0);
        let x = 2.0_f64;
        assert_relative_eq!(
            evaluate(&d, &[x]),
            x.powf(x) * (x.ln() + 1.0),
            max_relative = 1e-9
        );
    }

    #[test]
    fn log_with_varying_base() {
        // d/db log_b(a) = -ln(a) / (b ln(b)^2)
        let expr = Expr::Log(Expr::Var(0).boxed(), Expr::Const(8.0).boxed());
        let d = expr.diff(0);
        let b = 2.0_f64;
        assert_relative_eq!(
            evaluate(&d, &[b]),
            -8f64.ln() / (b * b.ln() * b.ln()),
            max_relative = 1e-9
        );
    }
}
