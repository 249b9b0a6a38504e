//! Variable state at one program point
//!
//! Maps each defined variable to its `AbstractValue`. Variables missing from
//! the map are undefined at that point (bottom): a join keeps the side where
//! the variable is defined.

use super::allocation::{AbstractValue, PointerValue};
use super::symbolic_value::SymbolicValue;
use crate::shared::models::VarId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Variable → value mapping for one program point
///
/// Backed by a `BTreeMap` so equality and iteration do not depend on
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableState {
    values: BTreeMap<VarId, AbstractValue>,
}

impl VariableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &str) -> Option<&AbstractValue> {
        self.values.get(var)
    }

    /// Integer value of `var`; undefined variables are `Unknown`
    pub fn scalar(&self, var: &str) -> SymbolicValue {
        self.values
            .get(var)
            .map_or(SymbolicValue::Unknown, AbstractValue::as_scalar)
    }

    pub fn pointer(&self, var: &str) -> Option<&PointerValue> {
        self.values.get(var).and_then(AbstractValue::as_pointer)
    }

    pub fn bind(&mut self, var: impl Into<VarId>, value: AbstractValue) {
        self.values.insert(var.into(), value);
    }

    pub fn bind_scalar(&mut self, var: impl Into<VarId>, value: SymbolicValue) {
        self.bind(var, AbstractValue::Scalar(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VarId, &AbstractValue)> {
        self.values.iter()
    }

    /// Pointwise join with `other`
    pub fn join(&self, other: &VariableState) -> VariableState {
        let mut values = self.values.clone();
        for (var, theirs) in &other.values {
            let merged = match values.get(var) {
                Some(ours) => ours.join(theirs),
                None => theirs.clone(),
            };
            values.insert(var.clone(), merged);
        }
        VariableState { values }
    }

    /// Variables whose value differs between `self` and `other`
    pub fn changed_variables(&self, other: &VariableState) -> Vec<VarId> {
        let mut changed: Vec<VarId> = self
            .values
            .iter()
            .filter(|(var, value)| other.values.get(*var) != Some(*value))
            .map(|(var, _)| var.clone())
            .collect();
        changed.extend(
            other
                .values
                .keys()
                .filter(|var| !self.values.contains_key(*var))
                .cloned(),
        );
        changed
    }

    /// Force `vars` to the top element of their kind
    pub fn widen(&mut self, vars: &[VarId]) {
        for var in vars {
            if let Some(value) = self.values.get_mut(var) {
                *value = value.widened();
            }
        }
    }
}

impl fmt::Display for VariableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", var, value)?;
        }
        write!(f, "}}")
    }
}
