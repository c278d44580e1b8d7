use super::atom_core::AtomCore;
use super::leg::{Leg, LegResult};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// An ordered pair of compound names; the uniqueness key of an [`EdgeRecord`].
///
/// Serialized as a two-element JSON array, the shape used by edge-list files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Edge {
    pub mol_a: String,
    pub mol_b: String,
}

impl Edge {
    pub fn new(mol_a: impl Into<String>, mol_b: impl Into<String>) -> Self {
        Self {
            mol_a: mol_a.into(),
            mol_b: mol_b.into(),
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.mol_a == self.mol_b
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.mol_a, self.mol_b)
    }
}

impl From<(String, String)> for Edge {
    fn from((mol_a, mol_b): (String, String)) -> Self {
        Self { mol_a, mol_b }
    }
}

impl From<Edge> for (String, String) {
    fn from(edge: Edge) -> Self {
        (edge.mol_a, edge.mol_b)
    }
}

/// Everything known about one edge: its atom core and whichever legs have finished.
///
/// A leg absent from the record has not been computed yet. On disk each finished leg is
/// flattened into four `<leg>_*` fields next to `mol_a`, `mol_b` and `core`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "EdgeRecordRepr")]
pub struct EdgeRecord {
    pub mol_a: String,
    pub mol_b: String,
    pub core: Option<AtomCore>,
    legs: BTreeMap<Leg, LegResult>,
}

impl EdgeRecord {
    pub fn new(edge: &Edge) -> Self {
        Self {
            mol_a: edge.mol_a.clone(),
            mol_b: edge.mol_b.clone(),
            core: None,
            legs: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> Edge {
        Edge::new(self.mol_a.clone(), self.mol_b.clone())
    }

    pub fn leg(&self, leg: Leg) -> Option<&LegResult> {
        self.legs.get(&leg)
    }

    pub fn has_leg(&self, leg: Leg) -> bool {
        self.legs.contains_key(&leg)
    }

    pub fn set_leg(&mut self, leg: Leg, result: LegResult) {
        self.legs.insert(leg, result);
    }

    /// Finished legs in attempt order.
    pub fn legs(&self) -> impl Iterator<Item = (Leg, &LegResult)> {
        self.legs.iter().map(|(leg, result)| (*leg, result))
    }

    /// True once the core and all three legs are present.
    pub fn is_complete(&self) -> bool {
        self.core.is_some() && Leg::ALL.iter().all(|leg| self.has_leg(*leg))
    }
}

impl Serialize for EdgeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("mol_a", &self.mol_a)?;
        map.serialize_entry("mol_b", &self.mol_b)?;
        if let Some(core) = &self.core {
            map.serialize_entry("core", core)?;
        }
        for (leg, result) in &self.legs {
            map.serialize_entry(&format!("{leg}_pred_ddg"), &result.pred_ddg)?;
            map.serialize_entry(&format!("{leg}_pred_ddg_err"), &result.pred_ddg_err)?;
            map.serialize_entry(&format!("{leg}_windows"), &result.windows)?;
            map.serialize_entry(&format!("{leg}_min_overlap"), &result.min_overlap)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct EdgeRecordRepr {
    mol_a: String,
    mol_b: String,
    #[serde(default)]
    core: Option<AtomCore>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl TryFrom<EdgeRecordRepr> for EdgeRecord {
    type Error = String;

    fn try_from(repr: EdgeRecordRepr) -> Result<Self, Self::Error> {
        let mut legs = BTreeMap::new();
        for leg in Leg::ALL {
            // A leg counts as finished iff its ddG is present.
            if !repr.fields.contains_key(&format!("{leg}_pred_ddg")) {
                continue;
            }
            let result = LegResult {
                pred_ddg: leg_number(&repr, leg, "pred_ddg")?,
                pred_ddg_err: leg_number(&repr, leg, "pred_ddg_err")?,
                windows: leg_count(&repr, leg, "windows")?,
                min_overlap: leg_number(&repr, leg, "min_overlap")?,
            };
            legs.insert(leg, result);
        }
        Ok(Self {
            mol_a: repr.mol_a,
            mol_b: repr.mol_b,
            core: repr.core,
            legs,
        })
    }
}

fn leg_field<'a>(repr: &'a EdgeRecordRepr, leg: Leg, suffix: &str) -> Result<&'a Value, String> {
    let key = format!("{leg}_{suffix}");
    repr.fields.get(&key).ok_or_else(|| {
        format!(
            "edge ({}, {}) has a {leg} result but no '{key}' field",
            repr.mol_a, repr.mol_b
        )
    })
}

fn leg_number(repr: &EdgeRecordRepr, leg: Leg, suffix: &str) -> Result<f64, String> {
    leg_field(repr, leg, suffix)?
        .as_f64()
        .ok_or_else(|| format!("field '{leg}_{suffix}' must be a number"))
}

fn leg_count(repr: &EdgeRecordRepr, leg: Leg, suffix: &str) -> Result<usize, String> {
    leg_field(repr, leg, suffix)?
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| format!("field '{leg}_{suffix}' must be a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_result(ddg: f64) -> LegResult {
        LegResult {
            pred_ddg: ddg,
            pred_ddg_err: 0.25,
            windows: 24,
            min_overlap: 0.41,
        }
    }

    #[test]
    fn edge_serializes_as_pair() {
        let edge = Edge::new("hub", "lig");
        assert_eq!(serde_json::to_value(&edge).unwrap(), json!(["hub", "lig"]));
        let parsed: Edge = serde_json::from_value(json!(["hub", "lig"])).unwrap();
        assert_eq!(parsed, edge);
        assert_eq!(edge.to_string(), "hub -> lig");
    }

    #[test]
    fn record_serializes_legs_as_flat_prefixed_fields() {
        let mut record = EdgeRecord::new(&Edge::new("a", "b"));
        record.core = Some(AtomCore::new(vec![(0, 0), (1, 2)]).unwrap());
        record.set_leg(Leg::Solvent, sample_result(-1.5));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "mol_a": "a",
                "mol_b": "b",
                "core": [[0, 0], [1, 2]],
                "solvent_pred_ddg": -1.5,
                "solvent_pred_ddg_err": 0.25,
                "solvent_windows": 24,
                "solvent_min_overlap": 0.41
            })
        );
    }

    #[test]
    fn record_without_core_omits_the_field() {
        let record = EdgeRecord::new(&Edge::new("a", "b"));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"mol_a": "a", "mol_b": "b"}));
    }

    #[test]
    fn record_deserializes_partial_legs() {
        let record: EdgeRecord = serde_json::from_value(json!({
            "mol_a": "a",
            "mol_b": "b",
            "core": [[0, 1]],
            "vacuum_pred_ddg": 0.5,
            "vacuum_pred_ddg_err": 0.1,
            "vacuum_windows": 2,
            "vacuum_min_overlap": 0.6
        }))
        .unwrap();

        assert!(record.has_leg(Leg::Vacuum));
        assert!(!record.has_leg(Leg::Solvent));
        assert!(!record.is_complete());
        assert_eq!(record.leg(Leg::Vacuum).unwrap().windows, 2);
        assert_eq!(record.key(), Edge::new("a", "b"));
    }

    #[test]
    fn record_with_incomplete_leg_fields_is_rejected() {
        let result = serde_json::from_value::<EdgeRecord>(json!({
            "mol_a": "a",
            "mol_b": "b",
            "complex_pred_ddg": -3.0,
            "complex_windows": 24
        }));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("complex_pred_ddg_err"), "{message}");
    }

    #[test]
    fn is_complete_requires_core_and_every_leg() {
        let mut record = EdgeRecord::new(&Edge::new("a", "b"));
        for leg in Leg::ALL {
            record.set_leg(leg, sample_result(1.0));
        }
        assert!(!record.is_complete());
        record.core = Some(AtomCore::new(vec![(0, 0)]).unwrap());
        assert!(record.is_complete());
        assert_eq!(
            record.legs().map(|(leg, _)| leg).collect::<Vec<_>>(),
            Leg::ALL.to_vec()
        );
    }
}
