use RustedDiff::symbolic::differentiator::{Differentiator, InputMode};
use RustedDiff::symbolic::parse_expr::parse_expression;
use RustedDiff::symbolic::symbolic_evaluate::evaluate;
use RustedDiff::symbolic::var_table::VarTable;
use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use std::hint::black_box;

const INPUT: &str = "sin(x)^2 * log(2, x + 3) + x^x / (1 + cosh(x))";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse infix", |b| {
        b.iter(|| {
            let mut table = VarTable::new();
            parse_expression(black_box(INPUT), &mut table).unwrap()
        })
    });
}

fn bench_diff_and_optimize(c: &mut Criterion) {
    let mut table = VarTable::new();
    let expr = parse_expression(INPUT, &mut table).unwrap();
    c.bench_function("differentiate", |b| b.iter(|| black_box(&expr).diff(0)));
    c.bench_function("differentiate and optimize", |b| {
        b.iter(|| {
            let mut d = black_box(&expr).diff(0);
            d.optimize();
            d
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let mut table = VarTable::new();
    let expr = parse_expression(INPUT, &mut table).unwrap();
    let derivative = expr.diff(0);
    let mut rng = rand::rng();
    let points: Vec<f64> = (0..256).map(|_| rng.random_range(0.5..3.0)).collect();
    c.bench_function("evaluate derivative at 256 points", |b| {
        b.iter(|| {
            points
                .iter()
                .map(|&x| evaluate(black_box(&derivative), &[x]))
                .sum::<f64>()
        })
    });
}

fn bench_derivative_chain(c: &mut Criterion) {
    c.bench_function("derivative chain to order 4", |b| {
        b.iter(|| {
            let mut session = Differentiator::new();
            session.parse(black_box(INPUT), InputMode::Infix).unwrap();
            session.set_diff_variable("x").unwrap();
            session.compute_derivatives(4).unwrap();
            session.forest_len()
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_diff_and_optimize,
    bench_evaluate,
    bench_derivative_chain
);
criterion_main!(benches);
