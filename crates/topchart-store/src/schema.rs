//! Catalog schema: two fact tables referencing three dimension tables,
//! plus child tables carrying the full genre sequence per title.
//!
//! Fact tables survive across runs (a resumed crawl appends; there is no
//! uniqueness constraint on titles, so re-ingesting duplicates rows by
//! design). Dimension tables are dropped and reseeded on every catalog
//! initialization so their ids always match the in-code enumerations.

/// Fact and child tables, created once and kept across runs.
pub const FACT_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS Movies (
    Id              INTEGER PRIMARY KEY AUTOINCREMENT,
    Title           TEXT,
    ContentRatingId INTEGER NOT NULL REFERENCES ContentRatings(Id),
    Country         TEXT,
    ReleaseYear     TEXT,
    PrimaryGenreId  INTEGER NOT NULL REFERENCES Genres(Id),
    Length          TEXT,
    NumberRating    REAL
);
CREATE TABLE IF NOT EXISTS Shows (
    Id              INTEGER PRIMARY KEY AUTOINCREMENT,
    Title           TEXT,
    ContentRatingId INTEGER NOT NULL REFERENCES ContentRatings(Id),
    YearsAired      TEXT,
    PrimaryGenreId  INTEGER NOT NULL REFERENCES Genres(Id),
    ShowTypeId      INTEGER NOT NULL REFERENCES ShowTypes(Id),
    Length          TEXT,
    NumberRating    REAL
);
CREATE TABLE IF NOT EXISTS MovieGenres (
    MovieId  INTEGER NOT NULL REFERENCES Movies(Id),
    Position INTEGER NOT NULL,
    GenreId  INTEGER NOT NULL REFERENCES Genres(Id),
    PRIMARY KEY (MovieId, Position)
);
CREATE TABLE IF NOT EXISTS ShowGenres (
    ShowId   INTEGER NOT NULL REFERENCES Shows(Id),
    Position INTEGER NOT NULL,
    GenreId  INTEGER NOT NULL REFERENCES Genres(Id),
    PRIMARY KEY (ShowId, Position)
);
";

/// Dimension tables, dropped and recreated on every init before reseeding.
pub const DIMENSION_TABLE_DDL: &str = "\
DROP TABLE IF EXISTS ContentRatings;
DROP TABLE IF EXISTS Genres;
DROP TABLE IF EXISTS ShowTypes;
CREATE TABLE ContentRatings (
    Id    INTEGER PRIMARY KEY,
    Label TEXT NOT NULL UNIQUE
);
CREATE TABLE Genres (
    Id    INTEGER PRIMARY KEY,
    Label TEXT NOT NULL UNIQUE
);
CREATE TABLE ShowTypes (
    Id    INTEGER PRIMARY KEY,
    Label TEXT NOT NULL UNIQUE
);
";
