// Filmshelf Constants

// Paths
pub const FILMSHELF_FOLDER: &str = ".filmshelf";
pub const DB_FILENAME: &str = "filmshelf.db";
pub const LIBRARY_ENV_VAR: &str = "FILMSHELF_LIBRARY";

// App identity (used for the platform data directory)
pub const APP_QUALIFIER: &str = "org";
pub const APP_ORGANIZATION: &str = "filmshelf";
pub const APP_NAME: &str = "filmshelf";

// Database
pub const DB_BUSY_TIMEOUT_MS: u32 = 5000;

// Browsing
pub const MOVIES_PER_PAGE: usize = 30;

// Handles
pub const HANDLE_SCHEME: &str = "blob:filmshelf/";

// Hashing
pub const HASH_ALGORITHM: &str = "blake3";
pub const HASH_FULL_SCHEME: &str = "full";

// Import
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "wmv", "mpg", "mpeg", "ogv", "3gp",
];
