use crate::core::models::edge::Edge;
use crate::core::validation::ValidationError;
use std::collections::HashSet;
use tracing::debug;

/// Generates the star map centered on `hub`: an edge `(hub, leaf)` for every other
/// compound, in the order the names are supplied.
///
/// # Errors
///
/// Returns [`ValidationError::DuplicateCompound`] if a name occurs twice and
/// [`ValidationError::MissingHub`] if `hub` is not among the names.
pub fn star_map<'a>(
    names: impl IntoIterator<Item = &'a str>,
    hub: &str,
) -> Result<Vec<Edge>, ValidationError> {
    let mut seen = HashSet::new();
    let mut leaves = Vec::new();
    let mut hub_found = false;

    for name in names {
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateCompound(name.to_string()));
        }
        if name == hub {
            hub_found = true;
        } else {
            leaves.push(name);
        }
    }

    if !hub_found {
        return Err(ValidationError::MissingHub(hub.to_string()));
    }

    debug!(hub, leaves = leaves.len(), "Generated star map");
    Ok(leaves.into_iter().map(|leaf| Edge::new(hub, leaf)).collect())
}
