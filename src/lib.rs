//! Tabimap - tourist spot search over the Overpass API
//!
//! This library provides the search pipeline shared by the `serve` and `spots` binaries:
//! a region and a category selection go in, a deduplicated, filtered list of spots comes out.

pub mod catalog;
pub mod config;
pub mod models;
pub mod overpass;
pub mod pipeline;

pub use catalog::{Category, CategoryCatalog};
pub use config::Config;
pub use models::{BoundingBox, GeoPoint, RawRecord, Spot, SpotView};
pub use overpass::{ClientError, ErrorKind, GeodataSource, OverpassClient};
pub use pipeline::{
    SearchOutcome, SearchRequest, SearchStatus, SortOrder, SpotFilter, SpotPipeline,
};
