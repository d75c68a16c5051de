//! Raw record normalization and name-based deduplication.

use hashbrown::HashSet;
use tracing::debug;

use crate::models::{RawRecord, Spot};

/// Tag keys consulted for the subtype, highest priority first.
pub const SUBTYPE_KEYS: &[&str] = &["amenity", "historic", "tourism", "natural"];

/// Subtype used when none of [`SUBTYPE_KEYS`] is present.
pub const GENERIC_SUBTYPE: &str = "スポット";

pub fn derive_subtype(record: &RawRecord) -> String {
    SUBTYPE_KEYS
        .iter()
        .find_map(|key| record.tag(key))
        .unwrap_or(GENERIC_SUBTYPE)
        .to_string()
}

/// Turn one record into a spot; records without a name are dropped.
pub fn to_spot(record: RawRecord) -> Option<Spot> {
    let name = record.tag("name").filter(|n| !n.is_empty())?.to_string();
    let subtype = derive_subtype(&record);
    let position = record.position();

    Some(Spot {
        osm_type: record.osm_type,
        osm_id: record.id,
        name,
        subtype,
        position,
        tags: record.tags,
    })
}

pub fn normalize(raw: Vec<RawRecord>) -> Vec<Spot> {
    let total = raw.len();
    let spots: Vec<Spot> = raw.into_iter().filter_map(to_spot).collect();
    debug!("Normalized {} of {} records", spots.len(), total);
    spots
}

/// Keep the first spot for each distinct name, in input order.
pub fn dedup(spots: Vec<Spot>) -> Vec<Spot> {
    let mut seen: HashSet<String> = HashSet::with_capacity(spots.len());
    let total = spots.len();

    let unique: Vec<Spot> = spots
        .into_iter()
        .filter(|spot| seen.insert(spot.name.clone()))
        .collect();

    debug!("Dropped {} duplicate spots", total - unique.len());
    unique
}
