//! Input enumeration from the relational store
//!
//! The database is the source of truth for which identifiers exist, so
//! the traversal derives every request path from rows rather than from a
//! hardcoded fixture. All queries are read-only; identifiers are opaque
//! and passed through to URL construction without validation.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::error::HarnessResult;

/// Status value marking a book as published and visible through the API
pub const PUBLISHED_STATUS: i32 = 4;

// Column names follow the live schema; the collections table keys its
// rows by collectionID, not id.
const COLLECTIONS_QUERY: &str = "SELECT name FROM HadithCollection ORDER BY collectionID";
const BOOKS_QUERY: &str = "SELECT ourBookID FROM Book WHERE collection = ? AND status = ?";
const CHAPTERS_QUERY: &str =
    "SELECT CAST(babID AS DOUBLE) FROM Chapter WHERE collection = ? AND arabicBookID = ?";
const HADITH_NUMBERS_QUERY: &str = "SELECT hadithNumber FROM Hadith WHERE collection = ?";
const URNS_QUERY: &str =
    "SELECT DISTINCT arabicURN FROM Hadith UNION SELECT DISTINCT englishURN FROM Hadith";

/// Read-only enumerator over the hadith schema
#[derive(Debug, Clone)]
pub struct Enumerator {
    pool: MySqlPool,
}

impl Enumerator {
    /// Connect a small pool to the given MySQL URL
    ///
    /// Connections are acquired per query and returned to the pool when
    /// the query future completes, regardless of outcome.
    pub async fn connect(database_url: &str) -> HarnessResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// All collection names, ordered by their assigned id
    ///
    /// The order carries no meaning; it only keeps runs reproducible.
    pub async fn list_collections(&self) -> HarnessResult<Vec<String>> {
        let names = sqlx::query_scalar(COLLECTIONS_QUERY)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    /// Book numbers in a collection, restricted to published books
    pub async fn list_books(&self, collection: &str) -> HarnessResult<Vec<String>> {
        let ids: Vec<i64> = sqlx::query_scalar(BOOKS_QUERY)
            .bind(collection)
            .bind(PUBLISHED_STATUS)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().map(|id| id.to_string()).collect())
    }

    /// Chapter ids scoped to one book of one collection
    ///
    /// babID is a DECIMAL column; the query casts so it decodes as a
    /// plain double.
    pub async fn list_chapters(&self, collection: &str, book: &str) -> HarnessResult<Vec<f64>> {
        let ids = sqlx::query_scalar(CHAPTERS_QUERY)
            .bind(collection)
            .bind(book)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Hadith numbers scoped to one collection
    pub async fn list_hadith_numbers(&self, collection: &str) -> HarnessResult<Vec<String>> {
        let numbers = sqlx::query_scalar(HADITH_NUMBERS_QUERY)
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;
        Ok(numbers)
    }

    /// Every URN in either language column, deduplicated
    ///
    /// Arabic and English URNs share one namespace; UNION gives set
    /// semantics, so a URN present in both columns appears once.
    pub async fn list_urns(&self) -> HarnessResult<Vec<i64>> {
        let urns = sqlx::query_scalar(URNS_QUERY).fetch_all(&self.pool).await?;
        Ok(urns)
    }
}

/// Render a chapter id for use in a float-typed path segment
///
/// The baseline route's float converter rejects paths without a decimal
/// point, so integral ids are rendered with one forced decimal place.
pub fn format_chapter_id(id: f64) -> String {
    if id.fract() == 0.0 {
        format!("{id:.1}")
    } else {
        format!("{id}")
    }
}
