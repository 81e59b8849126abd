use chrono::NaiveDate;
use serde::Serialize;

/// Wikipedia movie id, the join key across all three files.
pub type MovieId = u64;

// ---------------------------------------------------------------------------
// Movie – one row of movie.metadata.tsv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Movie {
    pub movie_id: MovieId,
    pub freebase_id: Option<String>,
    pub title: String,
    /// Raw release date text; see [`parse_date`].
    pub release_date: Option<String>,
    pub box_office: Option<f64>,
    /// Runtime in minutes.
    pub runtime: Option<f64>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    /// Raw JSON genre mapping, parsed on demand by [`super::genre`].
    pub genres: Option<String>,
}

// ---------------------------------------------------------------------------
// Appearance – one row of character.metadata.tsv
// ---------------------------------------------------------------------------

/// One character appearance. Actors are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Appearance {
    pub movie_id: MovieId,
    pub freebase_movie_id: Option<String>,
    pub movie_release_date: Option<String>,
    pub character_name: Option<String>,
    pub actor_birthdate: Option<String>,
    pub gender: Option<String>,
    /// Height in meters. Implausible values are kept as-is.
    pub height: Option<f64>,
    pub ethnicity: Option<String>,
    pub actor_name: Option<String>,
    pub actor_age: Option<f64>,
    pub character_actor_map_id: Option<String>,
    pub character_id: Option<String>,
    pub actor_id: Option<String>,
}

impl Appearance {
    /// Gender as used by the actor filter: absent reads as `"Unknown"`.
    pub fn gender_label(&self) -> &str {
        self.gender.as_deref().unwrap_or("Unknown")
    }
}

// ---------------------------------------------------------------------------
// PlotSummary – one row of plot_summaries.txt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSummary {
    pub movie_id: MovieId,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Dataset – the three loaded tables
// ---------------------------------------------------------------------------

/// The loaded corpus. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub movies: Vec<Movie>,
    pub appearances: Vec<Appearance>,
    pub summaries: Vec<PlotSummary>,
}

impl Dataset {
    pub fn new(
        movies: Vec<Movie>,
        appearances: Vec<Appearance>,
        summaries: Vec<PlotSummary>,
    ) -> Self {
        Dataset {
            movies,
            appearances,
            summaries,
        }
    }
}

// ---------------------------------------------------------------------------
// MovieInfo – the random-movie payload
// ---------------------------------------------------------------------------

/// A movie joined with its plot summary and parsed genres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieInfo {
    pub movie_id: MovieId,
    pub title: String,
    /// Empty when the movie has no summary.
    pub summary: String,
    pub genres_list: Vec<String>,
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse the corpus's date formats: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`, with
/// any `T…` time suffix ignored. Missing components default to the first
/// day / month.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().split('T').next()?;
    let mut parts = date.split('-');

    let year = parse_component(parts.next()?, 4)?;
    let month = match parts.next() {
        Some(m) => parse_component(m, 2)?,
        None => 1,
    };
    let day = match parts.next() {
        Some(d) => parse_component(d, 2)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn parse_component(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
