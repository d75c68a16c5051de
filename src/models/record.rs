//! Raw Overpass elements as they arrive over the wire.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::GeoPoint;

/// OSM tag map
pub type Tags = BTreeMap<String, String>;

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
    /// Element types this crate does not care about (e.g. `area`)
    #[serde(other)]
    Other,
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
            OsmType::Other => write!(f, "other"),
        }
    }
}

/// One element of the Overpass `elements` array.
///
/// Nodes carry `lat`/`lon` directly; ways and relations carry a `center`
/// when the query asked for `out center`. Member nodes pulled in by
/// recursion usually have no tags at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "type")]
    pub osm_type: OsmType,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
    #[serde(default)]
    pub tags: Tags,
}

impl RawRecord {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Point coordinates, falling back to the computed centroid.
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => self.center,
        }
    }
}
