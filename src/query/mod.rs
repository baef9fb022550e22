//! Query layer
//!
//! Provides the two lookups the report is built from:
//! - Function resolution by id
//! - Clone pair correlation with symmetric pair matching

pub mod resolver;
pub mod correlator;

pub use resolver::{FunctionResolver, FunctionLookup, FunctionRecord};
pub use correlator::{CloneCorrelator, ClonePairs, ClonePairRecord};

use std::fmt;
use crate::{Error, Result};

/// The ids requested on one run: a single function or a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Single(i64),
    Pair(i64, i64),
}

impl Lookup {
    /// Build a lookup from one or two ids
    pub fn from_ids(ids: &[i64]) -> Result<Self> {
        match *ids {
            [id] => Ok(Lookup::Single(id)),
            [a, b] => Ok(Lookup::Pair(a, b)),
            _ => Err(Error::InvalidIdCount(ids.len())),
        }
    }

    /// Ids in input order
    pub fn ids(&self) -> Vec<i64> {
        match *self {
            Lookup::Single(id) => vec![id],
            Lookup::Pair(a, b) => vec![a, b],
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Single(id) => write!(f, "{}", id),
            Lookup::Pair(a, b) => write!(f, "{} and {}", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ids() {
        assert_eq!(Lookup::from_ids(&[5]).unwrap(), Lookup::Single(5));
        assert_eq!(Lookup::from_ids(&[5, 9]).unwrap(), Lookup::Pair(5, 9));
        assert!(matches!(Lookup::from_ids(&[]), Err(Error::InvalidIdCount(0))));
        assert!(matches!(Lookup::from_ids(&[1, 2, 3]), Err(Error::InvalidIdCount(3))));
    }

    #[test]
    fn test_ids_keep_input_order() {
        assert_eq!(Lookup::Pair(9, 5).ids(), vec![9, 5]);
        assert_eq!(Lookup::Pair(9, 5).to_string(), "9 and 5");
    }
}
