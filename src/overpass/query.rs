//! Overpass QL query building.

use crate::catalog::CategoryCatalog;
use crate::models::BoundingBox;

/// Textual Overpass QL payload for one search.
///
/// An empty document means nothing was selected and no request should be made.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryDocument {
    text: String,
    fragment_count: usize,
}

impl QueryDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fragment_count == 0
    }

    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Shapes a bbox + category selection into an Overpass query.
pub struct QueryBuilder<'a> {
    catalog: &'a CategoryCatalog,
    server_timeout_secs: u32,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(catalog: &'a CategoryCatalog, server_timeout_secs: u32) -> Self {
        Self {
            catalog,
            server_timeout_secs,
        }
    }

    /// Build the query for `labels` inside `bbox`.
    ///
    /// Each fragment is emitted once with the bounds in Overpass order
    /// (south, west, north, east). The union is recursed down to member
    /// nodes and printed with `out center` so ways and relations carry a
    /// centroid.
    pub fn build<S: AsRef<str>>(&self, bbox: &BoundingBox, labels: &[S]) -> QueryDocument {
        let predicates = self.catalog.predicates_for(labels);
        if predicates.is_empty() {
            return QueryDocument::empty();
        }

        let mut body = String::new();
        for predicate in &predicates {
            body.push_str(&format!("  {}({});\n", predicate, bbox));
        }

        let text = format!(
            "[out:json][timeout:{}];\n(\n{});\n(._; >;);\nout center body;\n",
            self.server_timeout_secs, body
        );

        QueryDocument {
            text,
            fragment_count: predicates.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kyoto_bbox() -> BoundingBox {
        BoundingBox::new(34.98, 135.75, 34.99, 135.76).unwrap()
    }

    #[test]
    fn test_nature_query() {
        let catalog = CategoryCatalog::builtin();
        let builder = QueryBuilder::new(&catalog, 60);
        let doc = builder.build(&kyoto_bbox(), &["📸 絶景・自然"]);

        assert!(!doc.is_empty());
        assert_eq!(doc.fragment_count(), 6);

        let text = doc.as_str();
        let bounds = "(34.98,135.75,34.99,135.76);";
        for fragment in [
            r#"node["tourism"="viewpoint"]"#,
            r#"node["natural"="peak"]"#,
            r#"node["waterway"="waterfall"]"#,
            r#"node["natural"="beach"]"#,
            r#"way["natural"="beach"]"#,
            r#"node["leisure"="park"]"#,
        ] {
            let clause = format!("{}{}", fragment, bounds);
            assert_eq!(text.matches(&clause).count(), 1, "missing {}", clause);
        }
        assert_eq!(text.matches(r#""beach"]"#).count(), 2);
        assert_eq!(text.matches(bounds).count(), 6);
    }

    #[test]
    fn test_query_envelope() {
        let catalog = CategoryCatalog::builtin();
        let doc = QueryBuilder::new(&catalog, 25).build(&kyoto_bbox(), &["🎨 芸術・博物館"]);
        let text = doc.as_str();

        assert!(text.starts_with("[out:json][timeout:25];"));
        assert!(text.contains("(._; >;);"));
        assert!(text.trim_end().ends_with("out center body;"));
    }

    #[test]
    fn test_one_clause_per_selected_pair() {
        let catalog = CategoryCatalog::builtin();
        let builder = QueryBuilder::new(&catalog, 60);
        let doc = builder.build(
            &kyoto_bbox(),
            &["⛩️ 歴史・神社仏閣", "📸 絶景・自然", "⛩️ 歴史・神社仏閣"],
        );
        assert_eq!(doc.fragment_count(), 11);
        assert_eq!(doc.as_str().matches(");\n").count(), 11 + 2);
        assert_eq!(
            doc.as_str()
                .matches(r#"node["amenity"="place_of_worship"]"#)
                .count(),
            1
        );
    }

    #[test]
    fn test_empty_selection_is_empty_document() {
        let catalog = CategoryCatalog::builtin();
        let builder = QueryBuilder::new(&catalog, 60);

        let none: Vec<String> = Vec::new();
        assert!(builder.build(&kyoto_bbox(), &none).is_empty());
        assert!(builder.build(&kyoto_bbox(), &["unknown"]).is_empty());
        assert_eq!(builder.build(&kyoto_bbox(), &none).as_str(), "");
    }
}
