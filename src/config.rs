// Library configuration
// Resolves where the library lives and how the list is paged.

use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, LIBRARY_ENV_VAR, MOVIES_PER_PAGE};
use crate::db;
use crate::error::{LibraryError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryConfig {
    pub root: PathBuf,
    pub page_size: usize,
}

impl LibraryConfig {
    /// Resolve the library root: explicit flag, then `FILMSHELF_LIBRARY`,
    /// then the platform data directory.
    pub fn resolve(explicit_root: Option<PathBuf>, page_size: Option<usize>) -> Result<Self> {
        let env_root = std::env::var_os(LIBRARY_ENV_VAR).map(PathBuf::from);
        Self::resolve_with(explicit_root, env_root, page_size)
    }

    fn resolve_with(
        explicit_root: Option<PathBuf>,
        env_root: Option<PathBuf>,
        page_size: Option<usize>,
    ) -> Result<Self> {
        let root = match explicit_root.or(env_root) {
            Some(root) => root,
            None => default_library_root()?,
        };

        let page_size = page_size.unwrap_or(MOVIES_PER_PAGE);
        if page_size == 0 {
            return Err(LibraryError::InvalidInput("page size must be at least 1".to_string()));
        }

        Ok(Self { root, page_size })
    }

    pub fn db_path(&self) -> PathBuf {
        db::get_db_path(&self.root)
    }

    pub fn is_initialized(&self) -> bool {
        self.db_path().exists()
    }
}

/// Platform data directory, e.g. ~/.local/share/filmshelf
pub fn default_library_root() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .ok_or_else(|| LibraryError::InvalidInput("could not determine home directory".to_string()))?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Make sure the folder layout exists before the database is opened.
pub fn prepare_library_root(root: &Path) -> Result<()> {
    db::init_library_folders(root)
}
