//! Request Signatures
//!
//! A signature deterministically identifies a logical read request: the
//! endpoint plus its arguments. Arguments live in a BTreeMap, so two
//! signatures built with the same pairs in any order produce identical keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// == Signature ==
/// Deterministic identifier for a read request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    endpoint: String,
    args: BTreeMap<String, String>,
}

impl Signature {
    /// Creates a signature for an endpoint with no arguments.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            args: BTreeMap::new(),
        }
    }

    /// Adds an argument; later values for the same name win.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.args.insert(name.into(), value.to_string());
        self
    }

    /// The endpoint path, without arguments.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Canonical cache key: `endpoint?a=1&b=2` with arguments in sorted
    /// order, or just the endpoint when there are none.
    pub fn key(&self) -> String {
        if self.args.is_empty() {
            return self.endpoint.clone();
        }
        let query: Vec<String> = self
            .args
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{}?{}", self.endpoint, query.join("&"))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_without_args() {
        assert_eq!(Signature::new("outlets/42").key(), "outlets/42");
    }

    #[test]
    fn test_key_with_sorted_args() {
        let sig = Signature::new("outlets")
            .with_arg("page", 1)
            .with_arg("limit", 50);
        assert_eq!(sig.key(), "outlets?limit=50&page=1");
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let a = Signature::new("outlets")
            .with_arg("territoryId", "T1")
            .with_arg("page", 2)
            .with_arg("limit", 25);
        let b = Signature::new("outlets")
            .with_arg("limit", 25)
            .with_arg("page", 2)
            .with_arg("territoryId", "T1");

        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_later_value_for_same_arg_wins() {
        let sig = Signature::new("outlets")
            .with_arg("page", 1)
            .with_arg("page", 3);
        assert_eq!(sig.key(), "outlets?page=3");
    }

    #[test]
    fn test_different_args_different_keys() {
        let a = Signature::new("outlets").with_arg("page", 1);
        let b = Signature::new("outlets").with_arg("page", 2);
        assert_ne!(a.key(), b.key());
    }
}
