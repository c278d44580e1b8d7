use crate::core::validation::ValidationError;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use std::collections::BTreeMap;

/// A named compound as handed over by the structure loader.
///
/// The structural record itself is opaque to this crate: only the canonical structure
/// string, the atom count and the free-form properties travel through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compound {
    pub name: String,
    /// Canonical structure string (e.g. SMILES).
    pub structure: String,
    pub num_atoms: usize,
    /// External comparison score (e.g. a docking score), if the loader provides one.
    pub score: Option<f64>,
    properties: BTreeMap<String, String>,
}

impl Compound {
    pub fn new(name: impl Into<String>, structure: impl Into<String>, num_atoms: usize) -> Self {
        Self {
            name: name.into(),
            structure: structure.into(),
            num_atoms,
            score: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Copies the value of property `source` into property `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingProperty`] if `source` is not set.
    pub fn alias_property(&mut self, target: &str, source: &str) -> Result<(), ValidationError> {
        let value = self
            .property(source)
            .ok_or_else(|| ValidationError::MissingProperty {
                compound: self.name.clone(),
                property: source.to_string(),
            })?
            .to_string();
        self.properties.insert(target.to_string(), value);
        Ok(())
    }
}

/// An ordered collection of compounds addressable by their unique names.
///
/// Enumeration order is the order in which the compounds were supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundSet {
    compounds: IndexMap<String, Compound>,
}

impl CompoundSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from compounds in enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateCompound`] for the first repeated name, since a
    /// repeated name would make every lookup by that name ambiguous.
    pub fn from_compounds(
        compounds: impl IntoIterator<Item = Compound>,
    ) -> Result<Self, ValidationError> {
        let mut set = Self::new();
        for compound in compounds {
            set.insert(compound)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, compound: Compound) -> Result<(), ValidationError> {
        match self.compounds.entry(compound.name.clone()) {
            Entry::Occupied(entry) => Err(ValidationError::DuplicateCompound(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(compound);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Compound> {
        self.compounds.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Compound> {
        self.compounds.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.compounds.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Compound> {
        self.compounds.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.compounds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_compounds_preserves_enumeration_order() {
        let set = CompoundSet::from_compounds(vec![
            Compound::new("c", "C", 5),
            Compound::new("a", "CC", 8),
            Compound::new("b", "CCC", 11),
        ])
        .unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("a").unwrap().num_atoms, 8);
        assert!(!set.contains("d"));
    }

    #[test]
    fn from_compounds_rejects_duplicate_names() {
        let err = CompoundSet::from_compounds(vec![
            Compound::new("a", "C", 5),
            Compound::new("a", "CC", 8),
        ])
        .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateCompound("a".to_string()));
    }

    #[test]
    fn alias_property_copies_existing_value() {
        let mut compound = Compound::new("a", "C", 5);
        compound.set_property("AM1Cache", "0.1,0.2");
        compound.alias_property("AM1ELF10Cache", "AM1Cache").unwrap();
        assert_eq!(compound.property("AM1ELF10Cache"), Some("0.1,0.2"));
        assert_eq!(compound.property("AM1Cache"), Some("0.1,0.2"));
    }

    #[test]
    fn alias_property_fails_when_source_is_missing() {
        let mut compound = Compound::new("a", "C", 5);
        let err = compound.alias_property("AM1ELF10Cache", "AM1Cache").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingProperty {
                compound: "a".to_string(),
                property: "AM1Cache".to_string()
            }
        );
    }
}
