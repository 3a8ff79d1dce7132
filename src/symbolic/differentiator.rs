//! Differentiation session.
//!
//! A [`Differentiator`] owns one variable table and a forest of trees: slot 0
//! is the parsed input expression, slot k (k >= 1) its k-th derivative with
//! respect to the chosen variable. Trees in the forest share the table and
//! nothing else; every derivative is simplified before it is stored so the
//! chain does not blow up in size.
//!
//! Session-level failures (unknown variables, missing trees, file trouble) are
//! reported as `Result<_, String>`; parse failures keep their position through
//! [`ParseError`](crate::symbolic::parse_expr::ParseError)'s `Display`.

use super::parse_expr::parse_expression;
use super::symbolic_engine::{Expr, EPS};
use super::symbolic_evaluate::evaluate;
use super::tree_io::{self, parse_prefix};
use super::var_table::VarTable;
use log::info;
use std::path::Path;

/// Input syntax accepted by [`Differentiator::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Infix,
    Prefix,
}

#[derive(Debug, Default)]
pub struct Differentiator {
    table: VarTable,
    forest: Vec<Expr>,
    diff_slot: Option<usize>,
}

impl Differentiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `input` and installs it as tree 0, discarding any previous
    /// forest. Variables keep their slots across calls within one session.
    pub fn parse(&mut self, input: &str, mode: InputMode) -> Result<(), String> {
        let expr = match mode {
            InputMode::Infix => parse_expression(input, &mut self.table),
            InputMode::Prefix => parse_prefix(input.trim(), &mut self.table),
        }
        .map_err(|e| e.to_string())?;
        info!("parsed expression with {} nodes", expr.node_count());
        self.forest = vec![expr];
        Ok(())
    }

    /// Loads a prefix-form tree file as tree 0.
    pub fn load(&mut self, path: &Path) -> Result<(), String> {
        let expr = tree_io::load_tree(path, &mut self.table)?;
        self.forest = vec![expr];
        Ok(())
    }

    /// Writes tree `index` to `path` in prefix form.
    pub fn save(&self, index: usize, path: &Path) -> Result<(), String> {
        tree_io::save_tree(self.tree(index)?, &self.table, path)
    }

    /// Chooses the differentiation variable by name. The name must already
    /// appear in the parsed expression.
    pub fn set_diff_variable(&mut self, name: &str) -> Result<(), String> {
        match self.table.slot_of(name) {
            Some(slot) => {
                self.diff_slot = Some(slot);
                Ok(())
            }
            None => Err(format!("unknown variable '{}'", name)),
        }
    }

    pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), String> {
        self.table.set_value(name, value)
    }

    pub fn var_table(&self) -> &VarTable {
        &self.table
    }

    pub fn tree(&self, index: usize) -> Result<&Expr, String> {
        self.forest
            .get(index)
            .ok_or_else(|| format!("no tree at index {} (forest holds {})", index, self.forest.len()))
    }

    /// Number of trees currently in the forest (input plus derivatives).
    pub fn forest_len(&self) -> usize {
        self.forest.len()
    }

    /// Extends the forest so it holds derivatives up to order `order`,
    /// simplifying each new tree before the next differentiation.
    pub fn compute_derivatives(&mut self, order: usize) -> Result<(), String> {
        let slot = self
            .diff_slot
            .ok_or_else(|| "differentiation variable not set".to_string())?;
        if self.forest.is_empty() {
            return Err("no expression parsed".to_string());
        }
        while self.forest.len() <= order {
            let prev = self.forest.last().unwrap();
            let mut next = prev.diff(slot);
            next.optimize();
            info!(
                "derivative {} has {} nodes",
                self.forest.len(),
                next.node_count()
            );
            self.forest.push(next);
        }
        Ok(())
    }

    /// Evaluates tree `index` with the table's current variable values.
    pub fn evaluate_tree(&self, index: usize) -> Result<f64, String> {
        Ok(evaluate(self.tree(index)?, self.table.values()))
    }

    /// Simplifies tree `index` in place.
    pub fn optimize_tree(&mut self, index: usize) -> Result<(), String> {
        let len = self.forest.len();
        match self.forest.get_mut(index) {
            Some(tree) => {
                tree.optimize();
                Ok(())
            }
            None => Err(format!("no tree at index {} (forest holds {})", index, len)),
        }
    }

    pub fn to_infix(&self, index: usize) -> Result<String, String> {
        Ok(tree_io::to_infix(self.tree(index)?, &self.table))
    }

    pub fn to_prefix(&self, index: usize) -> Result<String, String> {
        Ok(tree_io::to_prefix(self.tree(index)?, &self.table))
    }

    /// Taylor polynomial of the input expression around `center`, up to and
    /// including order `order`. Terms whose coefficient is within `EPS` of
    /// zero are skipped; the result is simplified before it is returned.
    pub fn taylor_series(&mut self, center: f64, order: usize) -> Result<Expr, String> {
        let slot = self
            .diff_slot
            .ok_or_else(|| "differentiation variable not set".to_string())?;
        self.compute_derivatives(order)?;
        let saved = self.table.value_of(slot);
        self.table.set_value_by_slot(slot, center)?;
        let mut series = Expr::Const(0.0);
        let mut factorial = 1.0;
        for k in 0..=order {
            if k > 0 {
                factorial *= k as f64;
            }
            let coeff = evaluate(&self.forest[k], self.table.values()) / factorial;
            if coeff.abs() < EPS {
                continue;
            }
            let offset = Expr::Var(slot) - Expr::Const(center);
            series = series + Expr::Const(coeff) * offset.pow(Expr::Const(k as f64));
        }
        if let Some(v) = saved {
            self.table.set_value_by_slot(slot, v)?;
        }
        series.optimize();
        Ok(series)
    }
}
