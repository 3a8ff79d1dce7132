#![allow(non_snake_case)]
pub mod symbolic;

use crate::symbolic::differentiator::{Differentiator, InputMode};
use log::info;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};

fn main() {
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    if logger_instance.is_err() {
        eprintln!("logger already initialized, continuing without");
    }

    let example = 2;
    match example {
        0 => {
            // parse an infix expression and walk the derivative chain
            let mut session = Differentiator::new();
            session.parse("x^2 + sin(x)", InputMode::Infix).unwrap();
            session.set_diff_variable("x").unwrap();
            session.compute_derivatives(2).unwrap();
            for k in 0..session.forest_len() {
                println!("d{}: {}", k, session.to_infix(k).unwrap());
            }
            session.set_value("x", 0.5).unwrap();
            println!("f'(0.5) = {}", session.evaluate_tree(1).unwrap());
        }
        1 => {
            // prefix form round trip
            let mut session = Differentiator::new();
            session.parse("(+ (* 2 x) 5)", InputMode::Prefix).unwrap();
            println!("infix:  {}", session.to_infix(0).unwrap());
            println!("prefix: {}", session.to_prefix(0).unwrap());
            session.set_value("x", 3.0).unwrap();
            println!("at x=3: {}", session.evaluate_tree(0).unwrap());
        }
        2 => {
            // Taylor polynomial of sin around 0
            let mut session = Differentiator::new();
            session.parse("sin(x)", InputMode::Infix).unwrap();
            session.set_diff_variable("x").unwrap();
            let series = session.taylor_series(0.0, 7).unwrap();
            println!(
                "sin(x) ~ {}",
                crate::symbolic::tree_io::to_infix(&series, session.var_table())
            );
            info!("Program ended");
        }
        _ => {
            println!("no such example");
        }
    }
}
