use std::collections::HashMap;

/// Reserved dimension row for labels outside the fixed enumerations.
///
/// Unrecognized categorical labels are routed here rather than rejected,
/// so a crawl never fails on vocabulary the registry does not know.
pub const UNKNOWN_ID: i64 = 0;
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Content rating vocabulary, film certificates first, then television.
///
/// Ids are explicit constants: reordering or extending the table must not
/// change the meaning of previously persisted foreign keys.
pub const CONTENT_RATINGS: &[(i64, &str)] = &[
    (UNKNOWN_ID, UNKNOWN_LABEL),
    (1, "G"),
    (2, "PG"),
    (3, "PG-13"),
    (4, "R"),
    (5, "NC-17"),
    (6, "Not Rated"),
    (7, "Unrated"),
    (8, "Passed"),
    (9, "Approved"),
    (10, "X"),
    (11, "TV-Y"),
    (12, "TV-Y7"),
    (13, "TV-Y7-FV"),
    (14, "TV-G"),
    (15, "TV-PG"),
    (16, "TV-14"),
    (17, "TV-MA"),
];

pub const GENRES: &[(i64, &str)] = &[
    (UNKNOWN_ID, UNKNOWN_LABEL),
    (1, "Action"),
    (2, "Adventure"),
    (3, "Animation"),
    (4, "Biography"),
    (5, "Comedy"),
    (6, "Crime"),
    (7, "Documentary"),
    (8, "Drama"),
    (9, "Family"),
    (10, "Fantasy"),
    (11, "Film-Noir"),
    (12, "History"),
    (13, "Horror"),
    (14, "Music"),
    (15, "Musical"),
    (16, "Mystery"),
    (17, "Romance"),
    (18, "Sci-Fi"),
    (19, "Sport"),
    (20, "Thriller"),
    (21, "War"),
    (22, "Western"),
];

pub const SHOW_TYPES: &[(i64, &str)] = &[
    (UNKNOWN_ID, UNKNOWN_LABEL),
    (1, "TV Series"),
    (2, "TV Mini Series"),
    (3, "TV Movie"),
    (4, "TV Special"),
    (5, "TV Short"),
    (6, "TV Episode"),
];

/// Label → id lookups over the fixed dimension enumerations.
///
/// Built once per run and passed by reference to whatever needs to
/// normalize free-text categorical fields into foreign keys.
pub struct CategoryRegistry {
    content_ratings: HashMap<&'static str, i64>,
    genres: HashMap<&'static str, i64>,
    show_types: HashMap<&'static str, i64>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self {
            content_ratings: CONTENT_RATINGS.iter().copied().map(|(id, l)| (l, id)).collect(),
            genres: GENRES.iter().copied().map(|(id, l)| (l, id)).collect(),
            show_types: SHOW_TYPES.iter().copied().map(|(id, l)| (l, id)).collect(),
        }
    }

    pub fn content_rating_id(&self, label: &str) -> Option<i64> {
        self.content_ratings.get(label).copied()
    }

    pub fn genre_id(&self, label: &str) -> Option<i64> {
        self.genres.get(label).copied()
    }

    pub fn show_type_id(&self, label: &str) -> Option<i64> {
        self.show_types.get(label).copied()
    }

    pub fn is_content_rating(&self, label: &str) -> bool {
        self.content_ratings.contains_key(label)
    }

    /// Resolve a possibly-missing genre label, routing anything the
    /// enumeration does not know to the Unknown row.
    pub fn genre_id_or_unknown(&self, label: Option<&str>) -> i64 {
        label.and_then(|l| self.genre_id(l)).unwrap_or(UNKNOWN_ID)
    }

    pub fn show_type_id_or_unknown(&self, label: Option<&str>) -> i64 {
        label.and_then(|l| self.show_type_id(l)).unwrap_or(UNKNOWN_ID)
    }

    pub fn content_rating_id_or_unknown(&self, label: Option<&str>) -> i64 {
        label
            .and_then(|l| self.content_rating_id(l))
            .unwrap_or(UNKNOWN_ID)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_table_positions() {
        let registry = CategoryRegistry::new();
        for (id, label) in GENRES {
            assert_eq!(registry.genre_id(label), Some(*id));
        }
        for (id, label) in CONTENT_RATINGS {
            assert_eq!(registry.content_rating_id(label), Some(*id));
        }
        for (id, label) in SHOW_TYPES {
            assert_eq!(registry.show_type_id(label), Some(*id));
        }
    }

    #[test]
    fn known_labels_resolve() {
        let registry = CategoryRegistry::new();
        assert_eq!(registry.genre_id("Crime"), Some(6));
        assert_eq!(registry.content_rating_id("R"), Some(4));
        assert_eq!(registry.show_type_id("TV Mini Series"), Some(2));
        assert!(registry.is_content_rating("TV-MA"));
    }

    #[test]
    fn unknown_labels_route_to_unknown_row() {
        let registry = CategoryRegistry::new();
        assert_eq!(registry.genre_id("Telenovela"), None);
        assert_eq!(registry.genre_id_or_unknown(Some("Telenovela")), UNKNOWN_ID);
        assert_eq!(registry.genre_id_or_unknown(None), UNKNOWN_ID);
        assert_eq!(registry.show_type_id_or_unknown(Some("Webcast")), UNKNOWN_ID);
        assert_eq!(registry.content_rating_id_or_unknown(None), UNKNOWN_ID);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = CategoryRegistry::new();
        assert_eq!(registry.genre_id("crime"), None);
    }

    #[test]
    fn dimension_ids_are_unique() {
        for table in [CONTENT_RATINGS, GENRES, SHOW_TYPES] {
            let mut ids: Vec<i64> = table.iter().map(|(id, _)| *id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), table.len());
        }
    }
}
