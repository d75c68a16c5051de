//! Keyword/attribute filtering and result ordering.

use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, Spot};

/// User-supplied narrowing criteria. All active criteria must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotFilter {
    /// Case-sensitive substring of the name; empty means no keyword
    pub keyword: Option<String>,
    pub require_website: bool,
    pub require_wikipedia: bool,
    pub require_hours: bool,
}

impl SpotFilter {
    pub fn is_noop(&self) -> bool {
        self.keyword().is_none()
            && !self.require_website
            && !self.require_wikipedia
            && !self.require_hours
    }

    fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    pub fn matches(&self, spot: &Spot) -> bool {
        if let Some(keyword) = self.keyword() {
            if !spot.name.contains(keyword) {
                return false;
            }
        }

        (!self.require_website || spot.has_website())
            && (!self.require_wikipedia || spot.has_wikipedia())
            && (!self.require_hours || spot.has_opening_hours())
    }

    pub fn apply(&self, spots: Vec<Spot>) -> Vec<Spot> {
        if self.is_noop() {
            return spots;
        }
        spots.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// As returned by the service
    #[default]
    Response,
    /// Nearest to `origin` first, spots without coordinates last
    Distance,
}

impl SortOrder {
    pub fn apply(self, mut spots: Vec<Spot>, origin: GeoPoint) -> Vec<Spot> {
        if self == SortOrder::Distance {
            // stable, so equal distances keep response order
            spots.sort_by(|a, b| {
                let da = a.position.map(|p| origin.distance_to(&p));
                let db = b.position.map(|p| origin.distance_to(&p));
                match (da, db) {
                    (Some(da), Some(db)) => da.total_cmp(&db),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
        }
        spots
    }
}
