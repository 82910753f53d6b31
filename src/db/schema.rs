// Database schema types and query helpers

use rusqlite::{ffi, params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};

// ----- Movie -----

/// A full movie record as written at creation time.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub id: String,
    pub name: String,
    pub movie_blob: Vec<u8>,
    pub cover_blob: Option<Vec<u8>>,
}

/// Projection of a movie row without the movie payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: String,
    pub name: String,
    #[serde(skip)]
    pub cover_blob: Option<Vec<u8>>,
    pub movie_size: i64,
    pub added_at: String,
}

pub fn insert_movie(conn: &Connection, movie: &NewMovie) -> Result<()> {
    let added_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let result = conn.execute(
        "INSERT INTO movies (id, name, movie_blob, cover_blob, movie_size, added_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            movie.id,
            movie.name,
            movie.movie_blob,
            movie.cover_blob,
            movie.movie_blob.len() as i64,
            added_at,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Err(LibraryError::DuplicateKey(movie.id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// List every movie in insertion order. Never reads `movie_blob`.
pub fn list_movies(conn: &Connection) -> Result<Vec<MovieSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, cover_blob, movie_size, added_at FROM movies ORDER BY rowid"
    )?;

    let movies = stmt.query_map([], map_summary)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(movies)
}

pub fn get_movie_summary(conn: &Connection, id: &str) -> Result<Option<MovieSummary>> {
    let result = conn.query_row(
        "SELECT id, name, cover_blob, movie_size, added_at FROM movies WHERE id = ?1",
        params![id],
        map_summary,
    ).optional()?;
    Ok(result)
}

pub fn get_movie_blob(conn: &Connection, id: &str) -> Result<Option<Vec<u8>>> {
    let result = conn.query_row(
        "SELECT movie_blob FROM movies WHERE id = ?1",
        params![id],
        |row| row.get(0),
    ).optional()?;
    Ok(result)
}

/// Replace the cover payload. Returns false when no row has this id.
pub fn update_movie_cover(conn: &Connection, id: &str, cover_blob: &[u8]) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE movies SET cover_blob = ?1 WHERE id = ?2",
        params![cover_blob, id],
    )?;
    Ok(changed > 0)
}

fn map_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<MovieSummary> {
    Ok(MovieSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        cover_blob: row.get(2)?,
        movie_size: row.get(3)?,
        added_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Connection {
        crate::db::open_in_memory().unwrap()
    }

    fn new_movie(id: &str, bytes: &[u8]) -> NewMovie {
        NewMovie {
            id: id.to_string(),
            name: format!("Movie {}", id),
            movie_blob: bytes.to_vec(),
            cover_blob: None,
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let conn = setup_test_db();
        insert_movie(&conn, &new_movie("a", b"frames")).unwrap();

        assert_eq!(get_movie_blob(&conn, "a").unwrap().unwrap(), b"frames");
        let summary = get_movie_summary(&conn, "a").unwrap().unwrap();
        assert_eq!(summary.name, "Movie a");
        assert_eq!(summary.movie_size, 6);
        assert!(summary.cover_blob.is_none());
        assert!(summary.added_at.ends_with('Z'));
    }

    #[test]
    fn test_duplicate_insert_does_not_overwrite() {
        let conn = setup_test_db();
        insert_movie(&conn, &new_movie("a", b"first")).unwrap();

        let err = insert_movie(&conn, &new_movie("a", b"second")).unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(get_movie_blob(&conn, "a").unwrap().unwrap(), b"first");
        assert_eq!(list_movies(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let conn = setup_test_db();
        for id in ["z", "a", "m"] {
            insert_movie(&conn, &new_movie(id, b"x")).unwrap();
        }
        let ids: Vec<String> = list_movies(&conn).unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_update_cover_reports_missing_row() {
        let conn = setup_test_db();
        insert_movie(&conn, &new_movie("a", b"x")).unwrap();

        assert!(update_movie_cover(&conn, "a", &[0xFF, 0xD8]).unwrap());
        assert!(!update_movie_cover(&conn, "missing", &[0xFF]).unwrap());

        let summary = get_movie_summary(&conn, "a").unwrap().unwrap();
        assert_eq!(summary.cover_blob.unwrap(), vec![0xFF, 0xD8]);
    }
}
