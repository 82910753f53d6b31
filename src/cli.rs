// Filmshelf CLI binary

use std::path::{Path, PathBuf};
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use walkdir::WalkDir;

use filmshelf_lib::config::{self, LibraryConfig};
use filmshelf_lib::constants::VIDEO_EXTENSIONS;
use filmshelf_lib::hash;
use filmshelf_lib::library::events::LogSink;
use filmshelf_lib::library::pagination;
use filmshelf_lib::{HandleUrl, LibraryError, MovieLibrary, SqliteMovieStore};

#[derive(Parser)]
#[command(name = "filmshelf")]
#[command(about = "Filmshelf - A personal movie library", long_about = None)]
#[command(version)]
struct Cli {
    /// Library root (defaults to $FILMSHELF_LIBRARY, then the platform data dir)
    #[arg(short, long, global = true)]
    library: Option<PathBuf>,

    /// Log library activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new library
    Init,

    /// Add a movie file, or every video file under a directory
    Add {
        /// File or directory to import
        path: PathBuf,
    },

    /// List movies one page at a time
    List {
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Movies per page
        #[arg(long)]
        page_size: Option<usize>,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a movie: resolve its payload and write it out
    Play {
        /// Movie ID
        id: String,
        /// Write the movie payload to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace a movie's cover image
    Cover {
        /// Movie ID
        id: String,
        /// Image file
        image: PathBuf,
    },

    /// Show movie details
    Show {
        /// Movie ID
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let page_size = match &cli.command {
        Commands::List { page_size, .. } => *page_size,
        _ => None,
    };
    let config = LibraryConfig::resolve(cli.library, page_size)?;

    match cli.command {
        Commands::Init => cmd_init(&config),
        Commands::Add { path } => cmd_add(&config, &path),
        Commands::List { page, json, .. } => cmd_list(&config, page, json),
        Commands::Play { id, out } => cmd_play(&config, &id, out),
        Commands::Cover { id, image } => cmd_cover(&config, &id, &image),
        Commands::Show { id } => cmd_show(&config, &id),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn cmd_init(config: &LibraryConfig) -> Result<()> {
    if config.is_initialized() {
        anyhow::bail!("Library already exists at {}", config.root.display());
    }

    config::prepare_library_root(&config.root)?;
    SqliteMovieStore::open(&config.db_path())?;

    println!("Initialized library at {}", config.root.display());
    println!("  .filmshelf/filmshelf.db   - Movies and covers");

    Ok(())
}

fn cmd_add(config: &LibraryConfig, path: &Path) -> Result<()> {
    let files = discover_movies(path)?;
    if files.is_empty() {
        println!("No video files found at {}", path.display());
        return Ok(());
    }

    let (added, failed) = open_library(config)?.run_then_teardown(|library| -> Result<(usize, usize)> {
        let mut added = 0;
        let mut failed = 0;
        for file in &files {
            let hint = file.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.to_string_lossy().to_string());

            let result = std::fs::read(file)
                .map_err(LibraryError::from)
                .and_then(|bytes| library.add_movie(&hint, bytes));

            match result {
                Ok(session) => {
                    println!("Added '{}' ({})", session.name, session.id);
                    library.end_playback_session(&session);
                    added += 1;
                }
                Err(e) => {
                    log::error!("Failed to add {}: {}", file.display(), e);
                    failed += 1;
                }
            }
        }
        Ok((added, failed))
    })?;

    println!();
    println!("Import complete:");
    println!("  Added:   {}", added);
    println!("  Failed:  {}", failed);

    Ok(())
}

fn cmd_list(config: &LibraryConfig, page: usize, json: bool) -> Result<()> {
    open_library(config)?.run_then_teardown(|library| -> Result<()> {
        let entries = library.entries();
        let total_pages = pagination::page_count(entries.len(), config.page_size);
        pagination::check_page(page, total_pages)?;
        let shown = pagination::page(entries, page, config.page_size);

        if json {
            println!("{}", serde_json::to_string_pretty(shown)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No movies yet. Use 'filmshelf add <path>' to import some.");
            return Ok(());
        }

        println!("{:<36}  {:>5}  {}", "ID", "Cover", "Name");
        println!("{}", "-".repeat(70));
        for entry in shown {
            let cover = if entry.cover_handle.is_some() { "yes" } else { "-" };
            println!("{:<36}  {:>5}  {}", entry.id, cover, entry.name);
        }

        println!();
        println!("Page {} of {} ({} movies)", page, total_pages.max(1), entries.len());
        Ok(())
    })
}

fn cmd_play(config: &LibraryConfig, id: &str, out: Option<PathBuf>) -> Result<()> {
    open_library(config)?.run_then_teardown(|library| -> Result<()> {
        let session = match library.request_playback(id) {
            Ok(session) => session,
            Err(e) if e.is_not_found() => {
                anyhow::bail!("Movie file not found. Try adding the movie again.")
            }
            Err(e) => return Err(e.into()),
        };

        // The session must end on every path out of here
        let result = play_session(library, &session.movie_handle, out.as_deref());
        library.end_playback_session(&session);

        let digest = result?;
        println!("Playing '{}'", session.name);
        println!("  Handle:  {}", session.movie_handle);
        println!("  Digest:  {}", digest);
        Ok(())
    })
}

fn play_session(
    library: &MovieLibrary<SqliteMovieStore>,
    handle: &HandleUrl,
    out: Option<&Path>,
) -> Result<String> {
    let payload = library.resolve(handle)
        .ok_or_else(|| anyhow::anyhow!("Playback handle {} is no longer live", handle))?;

    let digest = hash::digest_bytes(&payload);
    if let Some(out) = out {
        write_verified(out, &payload, &digest)?;
        println!("Wrote {} bytes to {} (verified)", payload.len(), out.display());
    }
    Ok(digest)
}

/// Write a payload and read it back, failing unless the copy on disk
/// matches `digest`.
fn write_verified(out: &Path, payload: &[u8], digest: &str) -> Result<()> {
    std::fs::write(out, payload)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    let written = std::fs::read(out)
        .with_context(|| format!("Failed to read back {}", out.display()))?;
    if !hash::verify_digest(&written, digest) {
        anyhow::bail!("{} does not match the stored movie ({})", out.display(), hash::short_digest(digest));
    }
    Ok(())
}

fn cmd_cover(config: &LibraryConfig, id: &str, image: &Path) -> Result<()> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read {}", image.display()))?;

    open_library(config)?.run_then_teardown(|library| -> Result<()> {
        let request = library.begin_cover_selection(id)?;
        let entry = library.complete_cover_selection(request, bytes)?;
        println!("Updated cover for '{}'", entry.name);
        Ok(())
    })
}

fn cmd_show(config: &LibraryConfig, id: &str) -> Result<()> {
    open_library(config)?.run_then_teardown(|library| -> Result<()> {
        let summary = match library.details(id) {
            Ok(summary) => summary,
            Err(e) if e.is_not_found() => anyhow::bail!("Movie {} not found", id),
            Err(e) => return Err(e.into()),
        };

        println!("Movie {}", summary.id);
        println!();
        println!("Name:      {}", summary.name);
        println!("Size:      {}", format_size(summary.movie_size));
        println!("Added:     {}", summary.added_at);
        match &summary.cover_blob {
            Some(cover) => println!(
                "Cover:     {} ({})",
                format_size(cover.len() as i64),
                hash::short_digest(&hash::digest_bytes(cover))
            ),
            None => println!("Cover:     -"),
        }
        Ok(())
    })
}

fn open_library(config: &LibraryConfig) -> Result<MovieLibrary<SqliteMovieStore>> {
    if !config.is_initialized() {
        anyhow::bail!(
            "No library found at {}. Use 'filmshelf init' to create one.",
            config.root.display()
        );
    }

    let store = SqliteMovieStore::open(&config.db_path())?;
    let mut library = MovieLibrary::with_sink(store, Box::new(LogSink));
    library.initialize()?;
    Ok(library)
}

/// A single file is taken as-is; directories are walked for video files.
fn discover_movies(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_video_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
