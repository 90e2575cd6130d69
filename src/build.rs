//! Exports the [`build_site`] function which stitches together the
//! high-level steps of a run: parsing the CSV into rows ([`crate::row`]),
//! rendering a page per row ([`crate::render`]), hash-gating the writes
//! against prior run state ([`crate::state`]), writing the sitemap
//! ([`crate::sitemap`]), and persisting updated state.
//!
//! The flow is strictly sequential and synchronous by design. This is a
//! batch job run to completion; the first error aborts the whole run.

use crate::config::Config;
use crate::render;
use crate::row::{self, Row};
use crate::sitemap;
use crate::state::{self, State};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Counts of what a run did, mainly so tests can assert that a no-change
/// rerun writes nothing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Post files written (new or changed).
    pub written: usize,

    /// Post files skipped because they exist on disk with a matching
    /// recorded hash.
    pub skipped: usize,
}

/// Runs the whole pipeline against a [`Config`].
///
/// With `change_detection` enabled, prior state is loaded first and a post
/// file is skipped whenever its recorded hash matches the fresh render.
/// State is flushed back to disk as the final
/// step, after the sitemap, so a failed run records nothing. With
/// `change_detection` disabled every file is written unconditionally and no
/// state is read or produced.
pub fn build_site(config: &Config) -> Result<Summary> {
    let text = std::fs::read_to_string(&config.csv_path).map_err(|err| Error::ReadCsv {
        path: config.csv_path.clone(),
        err,
    })?;
    let rows = row::parse_rows(&text).map_err(|err| Error::Csv {
        path: config.csv_path.clone(),
        err,
    })?;

    let mut state = match config.change_detection {
        true => State::load(&config.state_path)?,
        false => State::default(),
    };

    std::fs::create_dir_all(&config.posts_directory).map_err(|err| Error::Write {
        path: config.posts_directory.clone(),
        err,
    })?;

    let mut summary = Summary::default();
    for (i, row) in rows.iter().enumerate() {
        // Without a date the output file cannot be named. Line numbers are
        // 1-based and account for the header row.
        let date = row.date().ok_or(Error::MissingDate { line: i + 2 })?;
        let file_name = format!("{}.html", date);
        let file_path = config.posts_directory.join(&file_name);

        // Positional adjacency: the row at the next index is the previous
        // day's entry, and vice versa. The CSV's order is the contract.
        let prev = rows.get(i + 1);
        let next = i.checked_sub(1).map(|j| &rows[j]);

        let html = render::post_page(row, prev, next, config);
        let digest = state::content_hash(&html);

        // A matching recorded hash means the write is skipped even when the
        // file has been deleted from disk: a deleted-but-hash-recorded file
        // stays absent. The existence check only decides whether the skip
        // is reported as "unchanged".
        if config.change_detection && state.hashes.get(&file_name) == Some(&digest) {
            match file_path.exists() {
                true => info!(file = %file_name, "unchanged, skipped"),
                false => info!(file = %file_name, "absent with current hash, not regenerated"),
            }
            summary.skipped += 1;
        } else {
            std::fs::write(&file_path, &html).map_err(|err| Error::Write {
                path: file_path.clone(),
                err,
            })?;
            state.hashes.insert(file_name.clone(), digest);
            info!(file = %file_name, "generated");
            summary.written += 1;
        }
    }

    let xml = sitemap::sitemap_xml(&rows, &config.site_origin);
    std::fs::write(&config.sitemap_path, xml).map_err(|err| Error::Write {
        path: config.sitemap_path.clone(),
        err,
    })?;
    info!(path = %config.sitemap_path.display(), "sitemap written");

    if config.change_detection {
        state.last_date = rows.last().and_then(Row::date).map(str::to_owned);
        state.save(&config.state_path)?;
        info!(path = %config.state_path.display(), "state saved");
    }

    Ok(summary)
}

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site.
#[derive(Debug)]
pub enum Error {
    /// Returned when the source CSV cannot be read.
    ReadCsv { path: PathBuf, err: std::io::Error },

    /// Returned when the source CSV is empty or has no data rows.
    Csv { path: PathBuf, err: row::Error },

    /// Returned when a data row has no `date` value. `line` is the 1-based
    /// CSV line number.
    MissingDate { line: usize },

    /// Returned for errors loading or saving run state.
    State(state::Error),

    /// Returned for errors writing output files.
    Write { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ReadCsv { path, err } => {
                write!(f, "Reading CSV '{}': {}", path.display(), err)
            }
            Error::Csv { path, err } => {
                write!(f, "Parsing CSV '{}': {}", path.display(), err)
            }
            Error::MissingDate { line } => {
                write!(f, "CSV line {} has no date value", line)
            }
            Error::State(err) => err.fmt(f),
            Error::Write { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadCsv { path: _, err } => Some(err),
            Error::Csv { path: _, err } => Some(err),
            Error::MissingDate { line: _ } => None,
            Error::State(err) => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}

impl From<state::Error> for Error {
    /// Converts [`state::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: state::Error) -> Error {
        Error::State(err)
    }
}
