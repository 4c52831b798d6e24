//! Parameter values of one phase's equation of state.

use crate::catalog::{EosKind, EosVariant};
use crate::error::{EosError, EosResult};
use std::collections::BTreeMap;
use xp_core::ensure_finite;

/// Mapping from parameter key to value, bound to one catalog variant.
///
/// Every parameter the variant declares is present once the set exists; keys the variant
/// does not declare are carried along untouched and ignored by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct EosParameterSet {
    kind: EosKind,
    values: BTreeMap<String, f64>,
}

impl EosParameterSet {
    /// Build a set from supplied values, filling catalog defaults for the rest.
    pub fn new<K, I>(kind: EosKind, supplied: I) -> EosResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut values = BTreeMap::new();
        for (key, value) in supplied {
            let key = key.into();
            ensure_finite(value, "EOS parameter")?;
            values.insert(key, value);
        }

        let variant = kind.variant();
        for descriptor in variant.params {
            if values.contains_key(descriptor.key) {
                continue;
            }
            match descriptor.default {
                Some(default) => {
                    values.insert(descriptor.key.to_string(), default);
                }
                None => {
                    return Err(EosError::MissingParameter {
                        variant: variant.id,
                        key: descriptor.key.to_string(),
                    });
                }
            }
        }

        Ok(Self { kind, values })
    }

    pub fn kind(&self) -> EosKind {
        self.kind
    }

    pub fn variant(&self) -> &'static EosVariant {
        self.kind.variant()
    }

    pub fn get(&self, key: &str) -> EosResult<f64> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| EosError::MissingParameter {
                variant: self.kind.id(),
                key: key.to_string(),
            })
    }

    /// Set one value. Returns the previous value, if any.
    pub fn set(&mut self, key: &str, value: f64) -> EosResult<Option<f64>> {
        ensure_finite(value, "EOS parameter")?;
        Ok(self.values.insert(key.to_string(), value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Values the variant does not declare.
    pub fn extras(&self) -> impl Iterator<Item = (&str, f64)> {
        let variant = self.variant();
        self.iter().filter(move |(k, _)| !variant.has_parameter(k))
    }
}
