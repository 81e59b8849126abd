use std::path::Path;

use csv::{ErrorKind, Position, ReaderBuilder, StringRecord};
use log::{debug, info, warn};

use super::genre::mapping_values;
use super::model::{Appearance, Dataset, Movie, MovieId, PlotSummary};
use crate::error::LoadError;

pub const MOVIE_FILE: &str = "movie.metadata.tsv";
pub const CHARACTER_FILE: &str = "character.metadata.tsv";
pub const SUMMARY_FILE: &str = "plot_summaries.txt";

const MOVIE_COLUMNS: usize = 9;
const CHARACTER_COLUMNS: usize = 13;
const SUMMARY_COLUMNS: usize = 2;

/// Token the corpus uses for missing values.
const NULL_TOKEN: &str = "\\N";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the three tables from an extracted `MovieSummaries` directory.
///
/// The movie and character files are mandatory. The plot-summary file is
/// optional and yields an empty table when absent.
pub fn load_dir(dir: &Path) -> Result<Dataset, LoadError> {
    let movies = read_table(&require(dir, MOVIE_FILE)?, MOVIE_COLUMNS, parse_movie)?;
    let appearances = read_table(
        &require(dir, CHARACTER_FILE)?,
        CHARACTER_COLUMNS,
        parse_appearance,
    )?;

    let summary_path = dir.join(SUMMARY_FILE);
    let summaries = if summary_path.exists() {
        read_table(&summary_path, SUMMARY_COLUMNS, parse_summary)?
    } else {
        info!("{} not found, continuing without plot summaries", summary_path.display());
        Vec::new()
    };

    Ok(Dataset::new(movies, appearances, summaries))
}

fn require(dir: &Path, name: &str) -> Result<std::path::PathBuf, LoadError> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(LoadError::MissingFile(path))
    }
}

// ---------------------------------------------------------------------------
// TSV reader
// ---------------------------------------------------------------------------

/// Read a header-less, unquoted TSV file.
///
/// Lines with more than `columns` fields, invalid UTF-8, or a row the parser
/// rejects are skipped and counted. Missing trailing fields read as absent.
fn read_table<T>(
    path: &Path,
    columns: usize,
    parse_row: fn(&StringRecord) -> Option<T>,
) -> Result<Vec<T>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), ErrorKind::Io(_)) => {
                return Err(LoadError::Csv {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                debug!("{}:{}: {err}", path.display(), line_of(err.position()));
                skipped += 1;
                continue;
            }
        };

        match (record.len() <= columns).then(|| parse_row(&record)).flatten() {
            Some(row) => rows.push(row),
            None => {
                debug!(
                    "{}:{}: skipping malformed line",
                    path.display(),
                    line_of(record.position())
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("{}: skipped {skipped} malformed lines", path.display());
    }
    info!("{}: loaded {} rows", path.display(), rows.len());
    Ok(rows)
}

/// 1-based file line of a record, or 0 when the reader did not track it.
fn line_of(pos: Option<&Position>) -> u64 {
    pos.map_or(0, Position::line)
}

// ---------------------------------------------------------------------------
// Row parsers
// ---------------------------------------------------------------------------

fn parse_movie(rec: &StringRecord) -> Option<Movie> {
    Some(Movie {
        movie_id: parse_id(rec)?,
        freebase_id: text(rec, 1),
        title: text(rec, 2).unwrap_or_default(),
        release_date: text(rec, 3),
        box_office: number(rec, 4),
        runtime: number(rec, 5),
        languages: list(rec, 6),
        countries: list(rec, 7),
        genres: text(rec, 8),
    })
}

fn parse_appearance(rec: &StringRecord) -> Option<Appearance> {
    Some(Appearance {
        movie_id: parse_id(rec)?,
        freebase_movie_id: text(rec, 1),
        movie_release_date: text(rec, 2),
        character_name: text(rec, 3),
        actor_birthdate: text(rec, 4),
        gender: text(rec, 5),
        height: number(rec, 6),
        ethnicity: text(rec, 7),
        actor_name: text(rec, 8),
        actor_age: number(rec, 9),
        character_actor_map_id: text(rec, 10),
        character_id: text(rec, 11),
        actor_id: text(rec, 12),
    })
}

fn parse_summary(rec: &StringRecord) -> Option<PlotSummary> {
    if rec.len() != SUMMARY_COLUMNS {
        return None;
    }
    Some(PlotSummary {
        movie_id: parse_id(rec)?,
        summary: text(rec, 1).unwrap_or_default(),
    })
}

// -- Field helpers --

fn parse_id(rec: &StringRecord) -> Option<MovieId> {
    rec.get(0)?.trim().parse().ok()
}

/// A present, non-null field.
fn text(rec: &StringRecord, idx: usize) -> Option<String> {
    rec.get(idx)
        .filter(|s| !s.is_empty() && *s != NULL_TOKEN)
        .map(str::to_string)
}

/// A numeric field; unparseable or non-finite values read as absent.
fn number(rec: &StringRecord, idx: usize) -> Option<f64> {
    text(rec, idx)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn list(rec: &StringRecord, idx: usize) -> Vec<String> {
    mapping_values(text(rec, idx).as_deref()).unwrap_or_default()
}
