//! The search pipeline: build → fetch → normalize → dedup → filter.
//!
//! A run is a function of the request and the geodata source only, so it
//! can be driven from the HTTP API, the CLI or a test without any UI.

mod filter;
mod normalize;

use std::time::Instant;

use serde::Serialize;
use tracing::info;

pub use filter::{SortOrder, SpotFilter};
pub use normalize::{dedup, derive_subtype, normalize, to_spot, GENERIC_SUBTYPE, SUBTYPE_KEYS};

use crate::catalog::CategoryCatalog;
use crate::models::{BoundingBox, Spot};
use crate::overpass::{ClientError, GeodataSource, QueryBuilder};

/// One user-initiated search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub bbox: BoundingBox,
    pub categories: Vec<String>,
    pub filter: SpotFilter,
    pub sort: SortOrder,
}

/// Terminal, non-error states of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No known category selected; nothing was requested
    EmptySelection,
    /// The service answered but nothing survived normalization and filtering
    NoResults,
    Found(Vec<Spot>),
}

/// Wire name of an outcome, shared by the API and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Found,
    NoResults,
    EmptySelection,
}

impl SearchOutcome {
    pub fn status(&self) -> SearchStatus {
        match self {
            SearchOutcome::Found(_) => SearchStatus::Found,
            SearchOutcome::NoResults => SearchStatus::NoResults,
            SearchOutcome::EmptySelection => SearchStatus::EmptySelection,
        }
    }

    pub fn spots(&self) -> &[Spot] {
        match self {
            SearchOutcome::Found(spots) => spots,
            _ => &[],
        }
    }

    pub fn into_spots(self) -> Vec<Spot> {
        match self {
            SearchOutcome::Found(spots) => spots,
            _ => Vec::new(),
        }
    }
}

pub struct SpotPipeline<'a, S> {
    catalog: &'a CategoryCatalog,
    source: &'a S,
    server_timeout_secs: u32,
}

impl<'a, S: GeodataSource + Sync> SpotPipeline<'a, S> {
    pub fn new(catalog: &'a CategoryCatalog, source: &'a S, server_timeout_secs: u32) -> Self {
        Self {
            catalog,
            source,
            server_timeout_secs,
        }
    }

    pub async fn run(&self, request: &SearchRequest) -> Result<SearchOutcome, ClientError> {
        let doc = QueryBuilder::new(self.catalog, self.server_timeout_secs)
            .build(&request.bbox, &request.categories);
        if doc.is_empty() {
            info!("No known category selected, skipping search");
            return Ok(SearchOutcome::EmptySelection);
        }

        let fetch_start = Instant::now();
        let raw = self.source.execute(&doc).await?;
        let fetch_ms = fetch_start.elapsed().as_millis();

        let raw_count = raw.len();
        let unique = dedup(normalize(raw));
        let unique_count = unique.len();
        let spots = request
            .sort
            .apply(request.filter.apply(unique), request.bbox.center());

        info!(
            "Search in {}: {} records, {} unique spots, {} after filtering (fetch {}ms)",
            request.bbox,
            raw_count,
            unique_count,
            spots.len(),
            fetch_ms
        );

        if spots.is_empty() {
            Ok(SearchOutcome::NoResults)
        } else {
            Ok(SearchOutcome::Found(spots))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OsmType, RawRecord};
    use crate::overpass::{ErrorKind, QueryDocument};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns canned records and counts calls.
    struct FakeSource {
        calls: AtomicUsize,
        records: Vec<RawRecord>,
        fail_with: Option<u16>,
    }

    impl FakeSource {
        fn with_records(records: Vec<RawRecord>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                records,
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                records: Vec::new(),
                fail_with: Some(status),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GeodataSource for FakeSource {
        async fn execute(&self, doc: &QueryDocument) -> Result<Vec<RawRecord>, ClientError> {
            assert!(!doc.is_empty());
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(status) => Err(ClientError::ServiceStatus {
                    status,
                    excerpt: "Gateway Timeout".to_string(),
                }),
                None => Ok(self.records.clone()),
            }
        }
    }

    fn named(osm_type: OsmType, id: i64, name: &str, extra: &[(&str, &str)]) -> RawRecord {
        let mut tags: crate::models::Tags = extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if !name.is_empty() {
            tags.insert("name".to_string(), name.to_string());
        }
        RawRecord {
            osm_type,
            id,
            lat: Some(34.985),
            lon: Some(135.755),
            center: None,
            tags,
        }
    }

    fn request(categories: &[&str], filter: SpotFilter) -> SearchRequest {
        SearchRequest {
            bbox: BoundingBox::new(34.98, 135.75, 34.99, 135.76).unwrap(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            filter,
            sort: SortOrder::Response,
        }
    }

    #[tokio::test]
    async fn test_empty_selection_never_calls_source() {
        let catalog = CategoryCatalog::builtin();
        let source = FakeSource::with_records(Vec::new());
        let pipeline = SpotPipeline::new(&catalog, &source, 60);

        let outcome = pipeline.run(&request(&[], SpotFilter::default())).await.unwrap();
        assert_eq!(outcome, SearchOutcome::EmptySelection);

        let outcome = pipeline
            .run(&request(&["🍜 グルメ"], SpotFilter::default()))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::EmptySelection);
        assert_eq!(outcome.status(), SearchStatus::EmptySelection);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_shrine_collapses() {
        let catalog = CategoryCatalog::builtin();
        let source = FakeSource::with_records(vec![
            named(OsmType::Node, 1, "北野天満宮", &[("amenity", "place_of_worship")]),
            named(OsmType::Way, 2, "北野天満宮", &[("amenity", "place_of_worship")]),
            named(OsmType::Node, 3, "", &[]),
            named(OsmType::Node, 4, "", &[]),
        ]);
        let pipeline = SpotPipeline::new(&catalog, &source, 60);

        let outcome = pipeline
            .run(&request(&["⛩️ 歴史・神社仏閣"], SpotFilter::default()))
            .await
            .unwrap();

        let spots = outcome.spots();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].name, "北野天満宮");
        assert_eq!(spots[0].osm_type, OsmType::Node);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_service_status_is_surfaced() {
        let catalog = CategoryCatalog::builtin();
        let source = FakeSource::failing(504);
        let pipeline = SpotPipeline::new(&catalog, &source, 60);

        let err = pipeline
            .run(&request(&["📸 絶景・自然"], SpotFilter::default()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceStatus);
        assert_eq!(err.status(), Some(504));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_filter_runs_after_dedup() {
        let catalog = CategoryCatalog::builtin();
        // The second copy has a website, but the first one wins and lacks it
        let source = FakeSource::with_records(vec![
            named(OsmType::Node, 1, "八坂神社", &[]),
            named(OsmType::Way, 2, "八坂神社", &[("website", "https://www.yasaka-jinja.or.jp/")]),
            named(OsmType::Node, 3, "白峯神宮", &[("website", "https://shiraminejingu.or.jp/")]),
            named(OsmType::Node, 4, "北野天満宮", &[]),
            named(OsmType::Node, 5, "野宮神社", &[("website", "https://www.nonomiya.com/")]),
            named(OsmType::Node, 6, "上賀茂神社", &[("website", "https://www.kamigamojinja.jp/")]),
        ]);
        let pipeline = SpotPipeline::new(&catalog, &source, 60);

        let filter = SpotFilter {
            keyword: Some("神社".to_string()),
            require_website: true,
            ..Default::default()
        };
        let outcome = pipeline
            .run(&request(&["⛩️ 歴史・神社仏閣"], filter))
            .await
            .unwrap();

        let names: Vec<&str> = outcome.spots().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["野宮神社", "上賀茂神社"]);
    }

    #[tokio::test]
    async fn test_no_results_states() {
        let catalog = CategoryCatalog::builtin();

        let source = FakeSource::with_records(Vec::new());
        let pipeline = SpotPipeline::new(&catalog, &source, 60);
        let outcome = pipeline
            .run(&request(&["🎨 芸術・博物館"], SpotFilter::default()))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::NoResults);
        assert_eq!(outcome.status(), SearchStatus::NoResults);
        assert!(outcome.into_spots().is_empty());

        let source = FakeSource::with_records(vec![named(OsmType::Node, 1, "京都国立博物館", &[])]);
        let pipeline = SpotPipeline::new(&catalog, &source, 60);
        let filter = SpotFilter {
            require_hours: true,
            ..Default::default()
        };
        let outcome = pipeline
            .run(&request(&["🎨 芸術・博物館"], filter))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::NoResults);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            SearchOutcome::Found(Vec::new()).status(),
            SearchStatus::Found
        );
        assert_eq!(
            serde_json::to_value(SearchStatus::NoResults).unwrap(),
            "no_results"
        );
        assert_eq!(
            serde_json::to_value(SearchOutcome::EmptySelection.status()).unwrap(),
            "empty_selection"
        );
    }
}
