use std::path::Path;

use rusqlite::Connection;
use topchart_models::categories::{self, CategoryRegistry, UNKNOWN_ID};
use topchart_models::record::{sentinel, MediaRecord, MovieRecord, ShowRecord};

use crate::error::StoreError;
use crate::schema;

/// The relational catalog of crawled titles.
///
/// Holds one connection for the run; every ingest commits on its own, so
/// a crawl killed midway leaves all completed rows durable.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (or create) the catalog database at `path` and initialize the
    /// schema: fact tables are created if absent, dimension tables are
    /// dropped, recreated and reseeded from the fixed enumerations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let catalog = Self { conn };
        catalog.init()?;
        Ok(catalog)
    }

    /// In-memory catalog for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let catalog = Self {
            conn: Connection::open_in_memory()?,
        };
        catalog.init()?;
        Ok(catalog)
    }

    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(schema::DIMENSION_TABLE_DDL)?;
        self.conn.execute_batch(schema::FACT_TABLE_DDL)?;
        self.seed_dimensions()?;
        Ok(())
    }

    /// Insert the fixed enumerations in table order, ids included, so the
    /// persisted dimension rows always mirror the in-code constants.
    fn seed_dimensions(&self) -> Result<(), StoreError> {
        let seed = |table: &str, rows: &[(i64, &str)]| -> Result<(), rusqlite::Error> {
            let sql = format!("INSERT INTO {table} (Id, Label) VALUES (?1, ?2)");
            let mut stmt = self.conn.prepare(&sql)?;
            for (id, label) in rows {
                stmt.execute(rusqlite::params![id, label])?;
            }
            Ok(())
        };
        seed("ContentRatings", categories::CONTENT_RATINGS)?;
        seed("Genres", categories::GENRES)?;
        seed("ShowTypes", categories::SHOW_TYPES)?;
        tracing::debug!("Seeded dimension tables");
        Ok(())
    }

    /// Append one fact row (and its genre child rows) for a record.
    ///
    /// Foreign keys resolve through the registry; labels outside the
    /// enumerations land on the reserved Unknown row. Missing content
    /// ratings persist as the "Not Rated" row. No dedup: ingesting the
    /// same title twice stores two rows.
    pub fn ingest(
        &mut self,
        record: &MediaRecord,
        registry: &CategoryRegistry,
    ) -> Result<i64, StoreError> {
        match record {
            MediaRecord::Movie(movie) => self.ingest_movie(movie, registry),
            MediaRecord::Show(show) => self.ingest_show(show, registry),
        }
    }

    fn ingest_movie(
        &mut self,
        movie: &MovieRecord,
        registry: &CategoryRegistry,
    ) -> Result<i64, StoreError> {
        let content_rating_id = resolve_content_rating(registry, movie.content_rating.as_deref());
        let primary_genre_id = registry.genre_id_or_unknown(movie.primary_genre());
        let number_rating = parse_rating(movie.rating.as_deref());

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO Movies \
             (Title, ContentRatingId, Country, ReleaseYear, PrimaryGenreId, Length, NumberRating) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                movie.title,
                content_rating_id,
                movie.country,
                movie.release_year,
                primary_genre_id,
                movie.runtime,
                number_rating,
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_genre_rows(&tx, "MovieGenres", "MovieId", id, &movie.genres, registry)?;
        tx.commit()?;
        Ok(id)
    }

    fn ingest_show(
        &mut self,
        show: &ShowRecord,
        registry: &CategoryRegistry,
    ) -> Result<i64, StoreError> {
        let content_rating_id = resolve_content_rating(registry, show.content_rating.as_deref());
        let primary_genre_id = registry.genre_id_or_unknown(show.primary_genre());
        let show_type_id = registry.show_type_id_or_unknown(show.show_type.as_deref());
        let number_rating = parse_rating(show.rating.as_deref());

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO Shows \
             (Title, ContentRatingId, YearsAired, PrimaryGenreId, ShowTypeId, Length, NumberRating) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                show.title,
                content_rating_id,
                show.air_years,
                primary_genre_id,
                show_type_id,
                show.runtime,
                number_rating,
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_genre_rows(&tx, "ShowGenres", "ShowId", id, &show.genres, registry)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn movie_count(&self) -> Result<usize, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM Movies", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn show_count(&self) -> Result<usize, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM Shows", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// A missing certificate persists as the "Not Rated" dimension row; a
/// token the enumeration does not know falls back to Unknown.
fn resolve_content_rating(registry: &CategoryRegistry, label: Option<&str>) -> i64 {
    let label = label.unwrap_or(sentinel::NOT_RATED);
    registry.content_rating_id(label).unwrap_or(UNKNOWN_ID)
}

fn parse_rating(rating: Option<&str>) -> Option<f64> {
    rating.and_then(|r| r.trim().parse::<f64>().ok())
}

fn insert_genre_rows(
    tx: &rusqlite::Transaction<'_>,
    table: &str,
    fk_column: &str,
    fact_id: i64,
    genres: &[String],
    registry: &CategoryRegistry,
) -> Result<(), rusqlite::Error> {
    let sql =
        format!("INSERT INTO {table} ({fk_column}, Position, GenreId) VALUES (?1, ?2, ?3)");
    let mut stmt = tx.prepare_cached(&sql)?;
    for (position, genre) in genres.iter().enumerate() {
        let genre_id = registry.genre_id_or_unknown(Some(genre));
        stmt.execute(rusqlite::params![fact_id, position as i64, genre_id])?;
    }
    Ok(())
}
