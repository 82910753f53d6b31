// Filmshelf - Library Entry Point

pub mod constants;
pub mod error;
pub mod config;
pub mod db;
pub mod hash;
pub mod store;
pub mod handles;
pub mod library;

pub use error::{LibraryError, Result};
pub use handles::{HandleKind, HandleUrl};
pub use library::{CoverRequest, LibraryEvent, ListEntry, MovieLibrary, PlaybackSession};
pub use store::{MovieStore, SqliteMovieStore};
