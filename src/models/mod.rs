//! Core data models for the spot search pipeline.

pub mod record;
pub mod region;
pub mod spot;

pub use record::{OsmType, RawRecord, Tags};
pub use region::{BoundingBox, GeoPoint, RegionError};
pub use spot::{DetailFlag, Spot, SpotView};
