//! Category catalog: thematic labels mapped to Overpass predicate fragments.

use serde::{Deserialize, Serialize};

/// A thematic grouping of feature-selection predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    /// Overpass QL selectors without a bbox, e.g. `node["tourism"="viewpoint"]`
    pub predicates: Vec<String>,
}

impl Category {
    pub fn new(label: &str, predicates: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            predicates: predicates.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Immutable registry of categories, in definition order.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

/// Number of leading built-in categories selected by default in UIs.
const DEFAULT_SELECTION: usize = 3;

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Tourism-focused categories.
    pub fn builtin() -> Self {
        Self::new(vec![
            Category::new(
                "📸 絶景・自然",
                &[
                    r#"node["tourism"="viewpoint"]"#,
                    r#"node["natural"="peak"]"#,
                    r#"node["waterway"="waterfall"]"#,
                    r#"node["natural"="beach"]"#,
                    r#"way["natural"="beach"]"#,
                    r#"node["leisure"="park"]"#,
                ],
            ),
            Category::new(
                "⛩️ 歴史・神社仏閣",
                &[
                    r#"node["historic"~"castle|ruins|memorial|monument"]"#,
                    r#"way["historic"~"castle|ruins"]"#,
                    r#"node["amenity"="place_of_worship"]"#,
                    r#"way["amenity"="place_of_worship"]"#,
                    r#"node["historic"="wayside_shrine"]"#,
                ],
            ),
            Category::new(
                "🎨 芸術・博物館",
                &[
                    r#"node["tourism"="museum"]"#,
                    r#"node["tourism"="artwork"]"#,
                    r#"node["tourism"="gallery"]"#,
                    r#"way["tourism"="museum"]"#,
                ],
            ),
            Category::new(
                "♨️ 温泉・リラックス",
                &[
                    r#"node["amenity"="public_bath"]"#,
                    r#"node["natural"="hot_spring"]"#,
                    r#"node["tourism"="hotel"]"#,
                ],
            ),
            Category::new(
                "🎡 エンタメ・体験",
                &[
                    r#"node["tourism"="theme_park"]"#,
                    r#"node["tourism"="zoo"]"#,
                    r#"node["tourism"="aquarium"]"#,
                    r#"node["leisure"="resort"]"#,
                ],
            ),
        ])
    }

    pub fn get(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.label.as_str())
    }

    pub fn default_labels(&self) -> Vec<&str> {
        self.labels().take(DEFAULT_SELECTION).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Fragments for the selected labels.
    ///
    /// Labels are visited in the order given, fragments in catalog order.
    /// Unknown labels are ignored and a repeated label contributes once.
    pub fn predicates_for<S: AsRef<str>>(&self, labels: &[S]) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(labels.len());
        let mut predicates = Vec::new();

        for label in labels {
            let label = label.as_ref();
            if seen.contains(&label) {
                continue;
            }
            seen.push(label);

            if let Some(category) = self.get(label) {
                predicates.extend(category.predicates.iter().map(String::as_str));
            }
        }

        predicates
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
