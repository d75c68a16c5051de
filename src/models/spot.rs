//! Display-ready points of interest.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{GeoPoint, OsmType, Tags};
use crate::config::SearchLinkConfig;

/// A named point of interest derived from one raw record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spot {
    pub osm_type: OsmType,
    pub osm_id: i64,
    /// Value of the `name` tag, never empty
    pub name: String,
    /// Value of the first of amenity/historic/tourism/natural present
    pub subtype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
    pub tags: Tags,
}

impl Spot {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn has_website(&self) -> bool {
        self.has_tag("website")
    }

    pub fn has_wikipedia(&self) -> bool {
        self.has_tag("wikipedia")
    }

    pub fn has_opening_hours(&self) -> bool {
        self.has_tag("opening_hours")
    }

    /// Detail flags in display order.
    pub fn details(&self) -> Vec<DetailFlag> {
        DetailFlag::ALL
            .iter()
            .copied()
            .filter(|flag| self.has_tag(flag.tag_key()))
            .collect()
    }

    /// External map search for "<name> <suffix>".
    pub fn search_url(&self, link: &SearchLinkConfig) -> Result<Url, url::ParseError> {
        let query = if link.suffix.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, link.suffix)
        };
        Url::parse_with_params(&link.maps_url, &[("api", "1"), ("query", query.as_str())])
    }

    pub fn source_id(&self) -> String {
        format!("{}/{}", self.osm_type, self.osm_id)
    }
}

/// Extra information a spot advertises through its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailFlag {
    Wikipedia,
    Website,
    OpeningHours,
}

impl DetailFlag {
    pub const ALL: [DetailFlag; 3] = [
        DetailFlag::Wikipedia,
        DetailFlag::Website,
        DetailFlag::OpeningHours,
    ];

    pub fn tag_key(self) -> &'static str {
        match self {
            DetailFlag::Wikipedia => "wikipedia",
            DetailFlag::Website => "website",
            DetailFlag::OpeningHours => "opening_hours",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailFlag::Wikipedia => "📖 Wikiあり",
            DetailFlag::Website => "🔗 公式HPあり",
            DetailFlag::OpeningHours => "🕒 営業時間情報あり",
        }
    }
}

/// Everything a result card needs, no further lookups required.
#[derive(Debug, Clone, Serialize)]
pub struct SpotView {
    pub id: String,
    pub name: String,
    pub subtype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
    /// Metres from the centre of the searched region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    pub details: Vec<DetailFlag>,
    pub detail_labels: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
    pub tags: Tags,
}

impl SpotView {
    pub fn new(spot: &Spot, origin: Option<GeoPoint>, link: &SearchLinkConfig) -> Self {
        let details = spot.details();
        let distance_m = match (origin, spot.position) {
            (Some(origin), Some(position)) => Some(origin.distance_to(&position)),
            _ => None,
        };

        Self {
            id: spot.source_id(),
            name: spot.name.clone(),
            subtype: spot.subtype.clone(),
            position: spot.position,
            distance_m,
            detail_labels: details.iter().map(|d| d.label()).collect(),
            details,
            search_url: spot.search_url(link).ok().map(String::from),
            tags: spot.tags.clone(),
        }
    }
}
