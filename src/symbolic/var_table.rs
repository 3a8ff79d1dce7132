//! Variable table of a differentiation session. Owns the variable names and
//! their current numeric values; expression trees refer to entries only by
//! slot index, so interning a name is done exactly once per session.

use super::symbolic_engine::UnaryFn;
use std::str::FromStr;

/// Insertion-ordered table mapping variable names to slots and values.
///
/// Slots are assigned in order of first appearance during parsing and are
/// stable for the lifetime of the session. Values default to 0.0 until set.
#[derive(Clone, Debug, Default)]
pub struct VarTable {
    names: Vec<String>,
    values: Vec<f64>,
}

impl VarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interned variables.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Interns `name`, returning its slot. An already known name returns the
    /// existing slot; new names get the next slot with value 0.0.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(slot) = self.slot_of(name) {
            return slot;
        }
        self.names.push(name.to_owned());
        self.values.push(0.0);
        self.names.len() - 1
    }

    /// Slot of a known name, `None` otherwise.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Name stored in `slot`.
    pub fn name_of(&self, slot: usize) -> Option<&str> {
        self.names.get(slot).map(|s| s.as_str())
    }

    /// Current value of `slot`.
    pub fn value_of(&self, slot: usize) -> Option<f64> {
        self.values.get(slot).copied()
    }

    /// Sets the value of a variable by name. Unknown names are an error so a
    /// typo in a scripted session does not silently create a fresh variable.
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), String> {
        match self.slot_of(name) {
            Some(slot) => {
                self.values[slot] = value;
                Ok(())
            }
            None => Err(format!("unknown variable '{}'", name)),
        }
    }

    pub fn set_value_by_slot(&mut self, slot: usize, value: f64) -> Result<(), String> {
        match self.values.get_mut(slot) {
            Some(v) => {
                *v = value;
                Ok(())
            }
            None => Err(format!("variable slot {} out of range", slot)),
        }
    }

    /// Snapshot of the values, indexed by slot. The evaluator takes this flat
    /// view instead of the table itself.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Names in slot order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Checks that a candidate identifier can be used as a variable name:
    /// leading letter or underscore, alphanumerics/underscores after, and not
    /// one of the reserved function names.
    pub fn valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        let head_ok = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        head_ok
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && name != "log"
            && UnaryFn::from_str(name).is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut table = VarTable::new();
        let x = table.intern("x");
        let y = table.intern("y");
        assert_eq!(table.intern("x"), x);
        assert_eq!((x, y), (0, 1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn set_value_rejects_unknown_names() {
        let mut table = VarTable::new();
        table.intern("x");
        assert!(table.set_value("x", 3.0).is_ok());
        assert_eq!(table.value_of(0), Some(3.0));
        assert!(table.set_value("q", 1.0).is_err());
    }

    #[test]
    fn reserved_names_are_invalid() {
        assert!(VarTable::valid_name("x"));
        assert!(VarTable::valid_name("_tmp1"));
        assert!(!VarTable::valid_name("sin"));
        assert!(!VarTable::valid_name("log"));
        assert!(!VarTable::valid_name("2x"));
    }
}
