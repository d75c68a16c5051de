//! Search regions: bounding boxes derived from drawn polygons.

use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, Coord, LineString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in metres.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        use geo::{Distance, Haversine, Point};
        Haversine.distance(
            Point::new(self.lon, self.lat),
            Point::new(other.lon, other.lat),
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    #[error("region polygon has no vertices")]
    EmptyRing,
    #[error("bounding box coordinates must be finite")]
    NotFinite,
    #[error("bounding box is inverted (south={south}, north={north}, west={west}, east={east})")]
    Inverted {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
    #[error("bounding box is outside valid latitude/longitude ranges")]
    OutOfRange,
    #[error("expected \"south,west,north,east\", got {0:?}")]
    Unparsable(String),
}

/// Rectangular search extent in degrees, in Overpass order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, RegionError> {
        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(RegionError::NotFinite);
        }
        if south > north || west > east {
            return Err(RegionError::Inverted {
                south,
                west,
                north,
                east,
            });
        }
        if south < -90.0 || north > 90.0 || west < -180.0 || east > 180.0 {
            return Err(RegionError::OutOfRange);
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// Envelope of a single polygon ring given as `[lon, lat]` pairs.
    pub fn from_ring(ring: &[[f64; 2]]) -> Result<Self, RegionError> {
        let line: LineString<f64> = ring
            .iter()
            .map(|[lon, lat]| Coord { x: *lon, y: *lat })
            .collect();

        let rect = line.bounding_rect().ok_or(RegionError::EmptyRing)?;
        Self::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Bounds in the order Overpass expects them.
    pub fn bounds(&self) -> [f64; 4] {
        [self.south, self.west, self.north, self.east]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl FromStr for BoundingBox {
    type Err = RegionError;

    /// Parse bbox string "south,west,north,east"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| RegionError::Unparsable(s.to_string()))?;

        match parts.as_slice() {
            [south, west, north, east] => Self::new(*south, *west, *north, *east),
            _ => Err(RegionError::Unparsable(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_drawn_rectangle() {
        // Leaflet rectangles come back as a closed ring of [lon, lat]
        let ring = [
            [135.75, 34.98],
            [135.75, 34.99],
            [135.76, 34.99],
            [135.76, 34.98],
            [135.75, 34.98],
        ];
        let bbox = BoundingBox::from_ring(&ring).unwrap();
        assert_eq!(bbox.south, 34.98);
        assert_eq!(bbox.west, 135.75);
        assert_eq!(bbox.north, 34.99);
        assert_eq!(bbox.east, 135.76);
    }

    #[test]
    fn test_bbox_from_irregular_polygon() {
        let ring = [[135.7, 35.0], [135.9, 34.9], [135.8, 35.1], [135.7, 35.0]];
        let bbox = BoundingBox::from_ring(&ring).unwrap();
        assert_eq!(bbox.bounds(), [34.9, 135.7, 35.1, 135.9]);
    }

    #[test]
    fn test_bbox_from_empty_ring() {
        assert_eq!(BoundingBox::from_ring(&[]), Err(RegionError::EmptyRing));
    }

    #[test]
    fn test_bbox_rejects_inverted() {
        assert!(matches!(
            BoundingBox::new(35.0, 135.0, 34.0, 136.0),
            Err(RegionError::Inverted { .. })
        ));
        assert!(matches!(
            BoundingBox::new(34.0, 136.0, 35.0, 135.0),
            Err(RegionError::Inverted { .. })
        ));
    }

    #[test]
    fn test_bbox_rejects_out_of_range() {
        assert_eq!(
            BoundingBox::new(-91.0, 0.0, 0.0, 1.0),
            Err(RegionError::OutOfRange)
        );
        assert_eq!(
            BoundingBox::new(0.0, 0.0, f64::NAN, 1.0),
            Err(RegionError::NotFinite)
        );
    }

    #[test]
    fn test_bbox_parse() {
        let bbox: BoundingBox = "34.98, 135.75, 34.99, 135.76".parse().unwrap();
        assert_eq!(bbox.bounds(), [34.98, 135.75, 34.99, 135.76]);
        assert_eq!(bbox.to_string(), "34.98,135.75,34.99,135.76");

        assert!(matches!(
            "34.98,135.75,34.99".parse::<BoundingBox>(),
            Err(RegionError::Unparsable(_))
        ));
        assert!(matches!(
            "a,b,c,d".parse::<BoundingBox>(),
            Err(RegionError::Unparsable(_))
        ));
    }

    #[test]
    fn test_center_and_distance() {
        let bbox = BoundingBox::new(34.0, 135.0, 36.0, 137.0).unwrap();
        assert_eq!(bbox.center(), GeoPoint::new(35.0, 136.0));

        let kyoto = GeoPoint::new(35.0116, 135.7681);
        let osaka = GeoPoint::new(34.6937, 135.5023);
        let d = kyoto.distance_to(&osaka);
        assert!(d > 40_000.0 && d < 45_000.0, "distance was {}", d);
        assert_eq!(kyoto.distance_to(&kyoto), 0.0);
    }
}
