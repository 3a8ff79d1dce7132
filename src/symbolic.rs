#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedDiff::symbolic::parse_expr::parse_expression;
/// use RustedDiff::symbolic::var_table::VarTable;
/// let mut table = VarTable::new();
/// let parsed_expression = parse_expression("3*x+2", &mut table).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// the expression tree type itself: 22 operator kinds, constants and
/// variable slots, with operator-overload sugar for building trees by hand
///# Example#
/// ```
/// use RustedDiff::symbolic::symbolic_engine::Expr;
/// let expr = Expr::Var(0).pow(Expr::Const(2.0)) + Expr::Const(1.0);
/// println!("{}", expr);
/// ```
pub mod symbolic_engine;
/// differentiation rules for every operator kind, `Expr::diff(slot)`
///# Example#
/// ```
/// use RustedDiff::symbolic::symbolic_engine::Expr;
/// let df = Expr::Var(0).pow(Expr::Const(2.0)).diff(0);
/// println!("{}", df);
/// ```
pub mod symbolic_engine_derivatives;
/// numeric evaluation with NaN for domain violations
pub mod symbolic_evaluate;
/// constant folding and algebraic identities, run to a fixed point
pub mod symbolic_simplify;
/// the session object: variable table plus the forest of derivative trees,
/// Taylor series, file round-trips
pub mod differentiator;
/// prefix (round-trippable) and infix rendering and the prefix reader
pub mod tree_io;
/// insertion-ordered name/value table behind variable slots
pub mod var_table;
/// the collection of small numeric helpers (linspace, finite differences)
pub mod utils;
