use super::edge::{Edge, EdgeRecord};
use super::params::RunParams;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Where an upserted record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted(usize),
    Replaced(usize),
}

impl Upsert {
    pub fn position(&self) -> usize {
        match *self {
            Upsert::Inserted(position) | Upsert::Replaced(position) => position,
        }
    }
}

/// The persisted state of one pipeline output: frozen global parameters plus the
/// edge records in insertion order.
///
/// Records are indexed by their `(mol_a, mol_b)` key, so lookups and in-place
/// replacement are O(1) while the on-disk order stays stable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "DocumentRepr")]
pub struct ResultDocument {
    params: RunParams,
    edges: IndexMap<Edge, EdgeRecord>,
}

impl ResultDocument {
    pub fn new(params: RunParams) -> Self {
        Self {
            params,
            edges: IndexMap::new(),
        }
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn get(&self, edge: &Edge) -> Option<&EdgeRecord> {
        self.edges.get(edge)
    }

    pub fn position(&self, edge: &Edge) -> Option<usize> {
        self.edges.get_index_of(edge)
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &EdgeRecord> {
        self.edges.values()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Replaces the record with the same key at its existing position, or appends it.
    pub fn upsert(&mut self, record: EdgeRecord) -> Upsert {
        match self.edges.insert_full(record.key(), record) {
            (position, Some(_)) => Upsert::Replaced(position),
            (position, None) => Upsert::Inserted(position),
        }
    }
}

impl Serialize for ResultDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct DocumentRef<'a> {
            #[serde(flatten)]
            params: &'a RunParams,
            #[serde(serialize_with = "serialize_records")]
            edges: &'a IndexMap<Edge, EdgeRecord>,
        }

        DocumentRef {
            params: &self.params,
            edges: &self.edges,
        }
        .serialize(serializer)
    }
}

fn serialize_records<S: Serializer>(
    edges: &&IndexMap<Edge, EdgeRecord>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(edges.values())
}

#[derive(Deserialize)]
struct DocumentRepr {
    #[serde(flatten)]
    params: RunParams,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

impl TryFrom<DocumentRepr> for ResultDocument {
    type Error = String;

    fn try_from(repr: DocumentRepr) -> Result<Self, Self::Error> {
        let mut document = ResultDocument::new(repr.params);
        for record in repr.edges {
            let key = record.key();
            if document.edges.contains_key(&key) {
                return Err(format!(
                    "duplicate edge record for ({}, {})",
                    key.mol_a, key.mol_b
                ));
            }
            document.edges.insert(key, record);
        }
        Ok(document)
    }
}
