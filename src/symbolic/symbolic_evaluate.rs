//! Numeric evaluation of expression trees.
//!
//! Evaluation never fails: a domain violation (division by a near-zero value,
//! logarithm of a non-positive argument and so on) produces `f64::NAN`, which
//! then propagates upward through every operator. All boundary comparisons
//! use `EPS` so values within the tolerance of a singular point are treated
//! as sitting on it. Each violation is reported once through `log::warn!`;
//! an operand that is already NaN stays silent, the warning was emitted where
//! the NaN was born.

use super::symbolic_engine::{Expr, UnaryFn, EPS};
use log::warn;

/// Evaluates the tree with variable values taken from `values`, indexed by
/// slot. Out-of-range slots evaluate to NaN.
pub fn evaluate(expr: &Expr, values: &[f64]) -> f64 {
    match expr {
        Expr::Var(slot) => match values.get(*slot) {
            Some(v) => *v,
            None => {
                warn!("no value bound for variable slot {}", slot);
                f64::NAN
            }
        },
        Expr::Const(val) => *val,
        Expr::Add(l, r) => evaluate(l, values) + evaluate(r, values),
        Expr::Sub(l, r) => evaluate(l, values) - evaluate(r, values),
        Expr::Mul(l, r) => evaluate(l, values) * evaluate(r, values),
        Expr::Div(l, r) => {
            let a = evaluate(l, values);
            let b = evaluate(r, values);
            if b.is_nan() || a.is_nan() {
                f64::NAN
            } else if b.abs() < EPS {
                warn!("division by {} (treated as zero)", b);
                f64::NAN
            } else {
                a / b
            }
        }
        Expr::Pow(base, exp) => {
            let a = evaluate(base, values);
            let b = evaluate(exp, values);
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else if a <= EPS {
                // only strictly positive bases, fractional exponents make
                // anything else ill-defined
                warn!("power with non-positive base {}", a);
                f64::NAN
            } else {
                a.powf(b)
            }
        }
        Expr::Log(base, arg) => {
            let b = evaluate(base, values);
            let a = evaluate(arg, values);
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else if b.abs() <= EPS || (b - 1.0).abs() < EPS || a.abs() <= EPS {
                warn!("log outside domain: base {}, argument {}", b, a);
                f64::NAN
            } else {
                a.ln() / b.ln()
            }
        }
        _ => {
            let (fun, arg) = expr.unary_parts().expect("non-unary handled above");
            let x = evaluate(arg, values);
            if x.is_nan() {
                return f64::NAN;
            }
            eval_unary(fun, x)
        }
    }
}

fn eval_unary(fun: UnaryFn, x: f64) -> f64 {
    match fun {
        UnaryFn::Sin => x.sin(),
        UnaryFn::Cos => x.cos(),
        UnaryFn::Tan => x.tan(),
        UnaryFn::Cot => {
            if x.abs() < EPS {
                warn!("cot of {} (treated as zero)", x);
                f64::NAN
            } else {
                1.0 / x.tan()
            }
        }
        UnaryFn::Asin => {
            if x.abs() > 1.0 + EPS {
                warn!("asin of {} outside [-1, 1]", x);
                f64::NAN
            } else {
                x.asin()
            }
        }
        UnaryFn::Acos => {
            if x.abs() > 1.0 + EPS {
                warn!("acos of {} outside [-1, 1]", x);
                f64::NAN
            } else {
                x.acos()
            }
        }
        UnaryFn::Atan => x.atan(),
        UnaryFn::Acot => (1.0 / x).atan(),
        UnaryFn::Sinh => x.sinh(),
        UnaryFn::Cosh => x.cosh(),
        UnaryFn::Tanh => x.tanh(),
        UnaryFn::Coth => {
            if x.abs() < EPS {
                warn!("coth of {} (treated as zero)", x);
                f64::NAN
            } else {
                1.0 / x.tanh()
            }
        }
        UnaryFn::Asinh => x.asinh(),
        UnaryFn::Acosh => {
            if x < 1.0 + EPS {
                warn!("acosh of {} below 1", x);
                f64::NAN
            } else {
                x.acosh()
            }
        }
        UnaryFn::Atanh => {
            if x.abs() > 1.0 - EPS {
                warn!("atanh of {} outside (-1, 1)", x);
                f64::NAN
            } else {
                x.atanh()
            }
        }
        UnaryFn::Acoth => {
            if x.abs() < 1.0 + EPS {
                warn!("acoth of {} inside [-1, 1]", x);
                f64::NAN
            } else {
                (1.0 / x).atanh()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr::parse_expression;
    use crate::symbolic::tree_io::parse_prefix;
    use crate::symbolic::var_table::VarTable;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn eval_str(input: &str, vals: &[(&str, f64)]) -> f64 {
        let mut table = VarTable::new();
        let expr = parse_expression(input, &mut table).unwrap();
        for (name, v) in vals {
            table.set_value(name, *v).unwrap();
        }
        evaluate(&expr, table.values())
    }

    #[test]
    fn arithmetic_and_variables() {
        assert_relative_eq!(eval_str("2*x+5", &[("x", 3.0)]), 11.0);
        assert_relative_eq!(eval_str("x^2/y", &[("x", 4.0), ("y", 2.0)]), 8.0);
    }

    #[test]
    fn division_by_zero_is_nan() {
        assert!(eval_str("1/0", &[]).is_nan());
        // within tolerance of zero counts as zero
        let mut table = VarTable::new();
        let expr = parse_expression("1/x", &mut table).unwrap();
        table.set_value("x", 1e-9).unwrap();
        assert!(evaluate(&expr, table.values()).is_nan());
    }

    #[test]
    fn pow_rejects_non_positive_base() {
        let mut table = VarTable::new();
        let expr = parse_prefix("(^ (- 0 1) 0.5)", &mut table).unwrap();
        assert!(evaluate(&expr, table.values()).is_nan());
        assert!(eval_str("0^2", &[]).is_nan());
    }

    #[test]
    fn log_domain_guards() {
        assert!(eval_str("log(1, 2)", &[]).is_nan());
        assert!(eval_str("log(0, 2)", &[]).is_nan());
        assert!(eval_str("log(2, 0)", &[]).is_nan());
        assert_relative_eq!(eval_str("log(2, 8)", &[]), 3.0, max_relative = 1e-12);
    }

    #[test]
    fn inverse_function_domains() {
        assert!(eval_str("asin(2)", &[]).is_nan());
        assert!(eval_str("acos(2)", &[]).is_nan());
        assert!(eval_str("atanh(1)", &[]).is_nan());
        assert!(eval_str("acosh(0)", &[]).is_nan());
        assert!(eval_str("acoth(0)", &[]).is_nan());
        assert_relative_eq!(eval_str("asin(1)", &[]), FRAC_PI_2, max_relative = 1e-12);
    }

    #[test]
    fn nan_propagates_to_the_root() {
        assert!(eval_str("sin(1/0) + 5", &[]).is_nan());
        assert!(eval_str("2 * log(1, x)", &[("x", 3.0)]).is_nan());
    }

    #[test]
    fn acot_of_zero_is_half_pi() {
        assert_relative_eq!(eval_str("acot(0)", &[]), FRAC_PI_2, max_relative = 1e-12);
    }
}
