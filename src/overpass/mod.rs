//! Overpass API query building and execution.

mod client;
mod error;
mod query;

pub use client::{GeodataSource, OverpassClient};
pub use error::{excerpt, ClientError, ErrorKind, BODY_EXCERPT_CHARS};
pub use query::{QueryBuilder, QueryDocument};
