//! The fixed catalogue of aggregate reports over the catalog.
//!
//! Every report is a pure read. Grouped averages are rounded to two
//! decimals and ordered by average descending, then label; dump reports
//! return full joined rows in insertion order.

use rusqlite::Connection;
use topchart_models::record::sentinel;

use crate::catalog::Catalog;
use crate::error::StoreError;

/// Selector for the fixed report catalogue, numbered as presented to the
/// user (1–7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    MovieRatingByGenre,
    MovieRatingByContentRating,
    ShowRatingByGenre,
    ShowRatingByContentRating,
    ShowRatingByShowType,
    AllMovies,
    AllShows,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::MovieRatingByGenre,
        ReportKind::MovieRatingByContentRating,
        ReportKind::ShowRatingByGenre,
        ReportKind::ShowRatingByContentRating,
        ReportKind::ShowRatingByShowType,
        ReportKind::AllMovies,
        ReportKind::AllShows,
    ];

    pub fn from_selector(n: usize) -> Option<ReportKind> {
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportKind::MovieRatingByGenre => "Average movie rating by primary genre",
            ReportKind::MovieRatingByContentRating => "Average movie rating by content rating",
            ReportKind::ShowRatingByGenre => "Average show rating by primary genre",
            ReportKind::ShowRatingByContentRating => "Average show rating by content rating",
            ReportKind::ShowRatingByShowType => "Average show rating by show type",
            ReportKind::AllMovies => "All movies with joined labels",
            ReportKind::AllShows => "All shows with joined labels",
        }
    }
}

/// One (group label, rounded average) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage {
    pub label: String,
    pub average: f64,
}

/// A movie fact row with its dimension labels joined in.
#[derive(Debug, Clone)]
pub struct MovieRow {
    pub title: Option<String>,
    pub content_rating: String,
    pub country: Option<String>,
    pub release_year: Option<String>,
    pub primary_genre: String,
    pub length: Option<String>,
    pub number_rating: Option<f64>,
}

impl MovieRow {
    pub fn display_line(&self) -> String {
        format!(
            "{} ({}, {}) | {} / {} | {} | {}",
            self.title.as_deref().unwrap_or(sentinel::NO_TITLE),
            self.country.as_deref().unwrap_or(sentinel::NO_COUNTRY),
            self.release_year.as_deref().unwrap_or(sentinel::NO_RELEASE_YEAR),
            self.primary_genre,
            self.content_rating,
            self.length.as_deref().unwrap_or(sentinel::NO_LENGTH),
            self.number_rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| sentinel::NO_RATING.to_string()),
        )
    }
}

/// A show fact row with its dimension labels joined in.
#[derive(Debug, Clone)]
pub struct ShowRow {
    pub title: Option<String>,
    pub content_rating: String,
    pub years_aired: Option<String>,
    pub primary_genre: String,
    pub show_type: String,
    pub length: Option<String>,
    pub number_rating: Option<f64>,
}

impl ShowRow {
    pub fn display_line(&self) -> String {
        format!(
            "{} ({}) | {} | {} / {} | {} | {}",
            self.title.as_deref().unwrap_or(sentinel::NO_TITLE),
            self.years_aired.as_deref().unwrap_or(sentinel::NO_AIR_YEARS),
            self.show_type,
            self.primary_genre,
            self.content_rating,
            self.length.as_deref().unwrap_or(sentinel::NO_LENGTH),
            self.number_rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| sentinel::NO_RATING.to_string()),
        )
    }
}

/// Result of running one report.
#[derive(Debug, Clone)]
pub enum Report {
    Averages(Vec<GroupAverage>),
    Movies(Vec<MovieRow>),
    Shows(Vec<ShowRow>),
}

/// Read-only reports over a catalog.
pub struct QueryEngine<'a> {
    conn: &'a Connection,
}

impl<'a> QueryEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            conn: catalog.connection(),
        }
    }

    pub fn run(&self, kind: ReportKind) -> Result<Report, StoreError> {
        match kind {
            ReportKind::MovieRatingByGenre => Ok(Report::Averages(self.grouped_average(
                "Movies",
                "Genres",
                "PrimaryGenreId",
            )?)),
            ReportKind::MovieRatingByContentRating => Ok(Report::Averages(
                self.grouped_average("Movies", "ContentRatings", "ContentRatingId")?,
            )),
            ReportKind::ShowRatingByGenre => Ok(Report::Averages(self.grouped_average(
                "Shows",
                "Genres",
                "PrimaryGenreId",
            )?)),
            ReportKind::ShowRatingByContentRating => Ok(Report::Averages(
                self.grouped_average("Shows", "ContentRatings", "ContentRatingId")?,
            )),
            ReportKind::ShowRatingByShowType => Ok(Report::Averages(self.grouped_average(
                "Shows",
                "ShowTypes",
                "ShowTypeId",
            )?)),
            ReportKind::AllMovies => Ok(Report::Movies(self.all_movies()?)),
            ReportKind::AllShows => Ok(Report::Shows(self.all_shows()?)),
        }
    }

    /// Average NumberRating of `fact_table` grouped by a dimension label.
    /// Rows with a NULL rating do not contribute.
    fn grouped_average(
        &self,
        fact_table: &str,
        dim_table: &str,
        fk_column: &str,
    ) -> Result<Vec<GroupAverage>, StoreError> {
        let sql = format!(
            "SELECT d.Label, ROUND(AVG(f.NumberRating), 2) \
             FROM {fact_table} f JOIN {dim_table} d ON d.Id = f.{fk_column} \
             WHERE f.NumberRating IS NOT NULL \
             GROUP BY d.Id, d.Label \
             ORDER BY AVG(f.NumberRating) DESC, d.Label"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(GroupAverage {
                    label: row.get(0)?,
                    average: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn all_movies(&self) -> Result<Vec<MovieRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT m.Title, c.Label, m.Country, m.ReleaseYear, g.Label, m.Length, m.NumberRating \
             FROM Movies m \
             JOIN ContentRatings c ON c.Id = m.ContentRatingId \
             JOIN Genres g ON g.Id = m.PrimaryGenreId \
             ORDER BY m.Id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(MovieRow {
                    title: row.get(0)?,
                    content_rating: row.get(1)?,
                    country: row.get(2)?,
                    release_year: row.get(3)?,
                    primary_genre: row.get(4)?,
                    length: row.get(5)?,
                    number_rating: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn all_shows(&self) -> Result<Vec<ShowRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT s.Title, c.Label, s.YearsAired, g.Label, t.Label, s.Length, s.NumberRating \
             FROM Shows s \
             JOIN ContentRatings c ON c.Id = s.ContentRatingId \
             JOIN Genres g ON g.Id = s.PrimaryGenreId \
             JOIN ShowTypes t ON t.Id = s.ShowTypeId \
             ORDER BY s.Id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ShowRow {
                    title: row.get(0)?,
                    content_rating: row.get(1)?,
                    years_aired: row.get(2)?,
                    primary_genre: row.get(3)?,
                    show_type: row.get(4)?,
                    length: row.get(5)?,
                    number_rating: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
