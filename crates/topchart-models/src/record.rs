use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display sentinels substituted for fields that could not be extracted.
///
/// Extracted records keep missing fields as `None`; these strings only
/// appear at presentation and persistence time.
pub mod sentinel {
    pub const NO_TITLE: &str = "No Title";
    pub const NO_RELEASE_YEAR: &str = "No Release Year";
    pub const NO_AIR_YEARS: &str = "No Air Year(s)";
    pub const NOT_RATED: &str = "Not Rated";
    pub const NO_GENRE: &str = "No Genre";
    pub const NO_COUNTRY: &str = "No Country";
    pub const NO_SHOW_TYPE: &str = "No Show Type";
    pub const NO_LENGTH: &str = "No Length";
    pub const NO_RATING: &str = "No Rating";
}

/// Which top-rated chart a crawl targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movies,
    Shows,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movies => write!(f, "movies"),
            MediaKind::Shows => write!(f, "shows"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movies),
            "show" | "shows" | "tv" => Ok(MediaKind::Shows),
            other => Err(format!("unrecognized media kind: {other:?}")),
        }
    }
}

fn display<'a>(field: &'a Option<String>, sentinel: &'a str) -> &'a str {
    field.as_deref().unwrap_or(sentinel)
}

/// Attributes extracted from a movie detail page.
///
/// All fields are `None` when the source markup was missing or malformed;
/// a record is created once per detail page and never updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieRecord {
    pub title: Option<String>,
    pub release_year: Option<String>,
    pub content_rating: Option<String>,
    /// Ordered genre list; the first entry is the primary genre.
    pub genres: Vec<String>,
    pub country: Option<String>,
    pub runtime: Option<String>,
    pub rating: Option<String>,
}

impl MovieRecord {
    pub fn title(&self) -> &str {
        display(&self.title, sentinel::NO_TITLE)
    }

    pub fn release_year(&self) -> &str {
        display(&self.release_year, sentinel::NO_RELEASE_YEAR)
    }

    pub fn content_rating(&self) -> &str {
        display(&self.content_rating, sentinel::NOT_RATED)
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }

    pub fn genres_display(&self) -> String {
        if self.genres.is_empty() {
            sentinel::NO_GENRE.to_string()
        } else {
            self.genres.join(", ")
        }
    }

    pub fn country(&self) -> &str {
        display(&self.country, sentinel::NO_COUNTRY)
    }

    pub fn runtime(&self) -> &str {
        display(&self.runtime, sentinel::NO_LENGTH)
    }

    pub fn rating(&self) -> &str {
        display(&self.rating, sentinel::NO_RATING)
    }

    /// One-line summary in the fixed report order.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, {}): Is a {} film rated {}, {} long with a {} rating out of 10.",
            self.title(),
            self.country(),
            self.release_year(),
            self.genres_display(),
            self.content_rating(),
            self.runtime(),
            self.rating(),
        )
    }
}

/// Attributes extracted from a TV show detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowRecord {
    pub title: Option<String>,
    pub air_years: Option<String>,
    pub content_rating: Option<String>,
    /// Ordered genre list; the first entry is the primary genre.
    pub genres: Vec<String>,
    pub show_type: Option<String>,
    pub runtime: Option<String>,
    pub rating: Option<String>,
}

impl ShowRecord {
    pub fn title(&self) -> &str {
        display(&self.title, sentinel::NO_TITLE)
    }

    pub fn air_years(&self) -> &str {
        display(&self.air_years, sentinel::NO_AIR_YEARS)
    }

    pub fn content_rating(&self) -> &str {
        display(&self.content_rating, sentinel::NOT_RATED)
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }

    pub fn genres_display(&self) -> String {
        if self.genres.is_empty() {
            sentinel::NO_GENRE.to_string()
        } else {
            self.genres.join(", ")
        }
    }

    pub fn show_type(&self) -> &str {
        display(&self.show_type, sentinel::NO_SHOW_TYPE)
    }

    pub fn runtime(&self) -> &str {
        display(&self.runtime, sentinel::NO_LENGTH)
    }

    pub fn rating(&self) -> &str {
        display(&self.rating, sentinel::NO_RATING)
    }

    /// One-line summary in the fixed report order.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}): Is a {} rated {}, Genre(s) - {}, {} long with a {} rating out of 10.",
            self.title(),
            self.air_years(),
            self.show_type(),
            self.content_rating(),
            self.genres_display(),
            self.runtime(),
            self.rating(),
        )
    }
}

/// A single extracted title, movie or show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRecord {
    Movie(MovieRecord),
    Show(ShowRecord),
}

impl MediaRecord {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaRecord::Movie(_) => MediaKind::Movies,
            MediaRecord::Show(_) => MediaKind::Shows,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MediaRecord::Movie(m) => m.title(),
            MediaRecord::Show(s) => s.title(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            MediaRecord::Movie(m) => m.summary(),
            MediaRecord::Show(s) => s.summary(),
        }
    }
}
