use crate::core::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered atom correspondence between two compounds.
///
/// Each pair is `(index in mol_a, index in mol_b)`. Neither side may repeat an index,
/// which is enforced on construction and when a core is read back from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[usize; 2]>", into = "Vec<[usize; 2]>")]
pub struct AtomCore {
    pairs: Vec<(usize, usize)>,
}

impl AtomCore {
    /// Builds a core from index pairs, rejecting duplicated indices on either side.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateCoreIndex`] naming the first repeated index.
    pub fn new(pairs: Vec<(usize, usize)>) -> Result<Self, ValidationError> {
        let mut seen_a = HashSet::with_capacity(pairs.len());
        let mut seen_b = HashSet::with_capacity(pairs.len());
        for &(a, b) in &pairs {
            if !seen_a.insert(a) {
                return Err(ValidationError::DuplicateCoreIndex {
                    side: "mol_a",
                    index: a,
                });
            }
            if !seen_b.insert(b) {
                return Err(ValidationError::DuplicateCoreIndex {
                    side: "mol_b",
                    index: b,
                });
            }
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Number of mapped atom pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Checks that every index addresses an existing atom of its compound.
    pub fn check_bounds(
        &self,
        mol_a: (&str, usize),
        mol_b: (&str, usize),
    ) -> Result<(), ValidationError> {
        for &(a, b) in &self.pairs {
            for (index, (compound, num_atoms)) in [(a, mol_a), (b, mol_b)] {
                if index >= num_atoms {
                    return Err(ValidationError::CoreIndexOutOfRange {
                        compound: compound.to_string(),
                        index,
                        num_atoms,
                    });
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<[usize; 2]>> for AtomCore {
    type Error = ValidationError;

    fn try_from(pairs: Vec<[usize; 2]>) -> Result<Self, Self::Error> {
        Self::new(pairs.into_iter().map(|[a, b]| (a, b)).collect())
    }
}

impl From<AtomCore> for Vec<[usize; 2]> {
    fn from(core: AtomCore) -> Self {
        core.pairs.into_iter().map(|(a, b)| [a, b]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_unique_indices_and_keeps_order() {
        let core = AtomCore::new(vec![(2, 0), (0, 1), (1, 3)]).unwrap();
        assert_eq!(core.pairs(), &[(2, 0), (0, 1), (1, 3)]);
        assert_eq!(core.len(), 3);
        assert!(!core.is_empty());
    }

    #[test]
    fn new_rejects_duplicate_index_on_side_a() {
        let err = AtomCore::new(vec![(0, 0), (0, 1)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateCoreIndex {
                side: "mol_a",
                index: 0
            }
        );
    }

    #[test]
    fn new_rejects_duplicate_index_on_side_b() {
        let err = AtomCore::new(vec![(0, 4), (1, 4)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateCoreIndex {
                side: "mol_b",
                index: 4
            }
        );
    }

    #[test]
    fn deserializes_from_nested_json_arrays() {
        let core: AtomCore = serde_json::from_str("[[0, 1], [3, 2]]").unwrap();
        assert_eq!(core.pairs(), &[(0, 1), (3, 2)]);
        assert_eq!(serde_json::to_string(&core).unwrap(), "[[0,1],[3,2]]");
    }

    #[test]
    fn deserialization_rejects_duplicates_and_non_pairs() {
        assert!(serde_json::from_str::<AtomCore>("[[0, 1], [0, 2]]").is_err());
        assert!(serde_json::from_str::<AtomCore>("[[0, 1, 2]]").is_err());
    }

    #[test]
    fn check_bounds_reports_out_of_range_index() {
        let core = AtomCore::new(vec![(0, 0), (1, 5)]).unwrap();
        assert!(core.check_bounds(("a", 2), ("b", 6)).is_ok());
        let err = core.check_bounds(("a", 2), ("b", 5)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CoreIndexOutOfRange {
                compound: "b".to_string(),
                index: 5,
                num_atoms: 5
            }
        );
    }
}
