use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::str::FromStr;

use chrono::Datelike;
use log::{debug, info};
use rand::Rng;

use super::filter::{
    filter_appearances, GenderFilter, HeightHistogram, HeightWindow, HISTOGRAM_BINS,
};
use super::genre::{display_genres, match_genres};
use super::model::{parse_date, Appearance, Dataset, Movie, MovieId, MovieInfo};
use super::table::CountTable;
use super::{fetch::DatasetSource, loader};
use crate::error::{Error, InvalidArgument, Result, Table};

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Grouping for [`Analyzer::birth_histogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BirthMode {
    #[default]
    Year,
    Month,
}

impl FromStr for BirthMode {
    type Err = std::convert::Infallible;

    /// Exactly `"M"` or `"Month"` selects months; anything else, including
    /// lowercase spellings, falls back to years.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "M" | "Month" => BirthMode::Month,
            _ => BirthMode::Year,
        })
    }
}

/// Births grouped by year or by month of the year.
#[derive(Debug, Clone, PartialEq)]
pub enum BirthHistogram {
    Year(CountTable<i32>),
    Month(CountTable<u32>),
}

impl BirthHistogram {
    pub fn is_empty(&self) -> bool {
        match self {
            BirthHistogram::Year(t) => t.is_empty(),
            BirthHistogram::Month(t) => t.is_empty(),
        }
    }

    pub fn total(&self) -> usize {
        match self {
            BirthHistogram::Year(t) => t.total(),
            BirthHistogram::Month(t) => t.total(),
        }
    }
}

/// Result of [`Analyzer::filter_actors`].
#[derive(Debug, Clone)]
pub struct ActorSelection<'a> {
    pub rows: Vec<&'a Appearance>,
    /// Present when chart data was requested.
    pub histogram: Option<HeightHistogram>,
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Aggregations over a loaded [`Dataset`]. Every query recomputes its result
/// from the immutable base tables.
#[derive(Debug, Clone)]
pub struct Analyzer {
    dataset: Dataset,
}

impl Analyzer {
    pub fn new(dataset: Dataset) -> Self {
        Analyzer { dataset }
    }

    /// Fetch (if needed), extract and load the corpus described by `source`.
    pub fn load(source: &DatasetSource) -> Result<Self> {
        let dir = source.ensure()?;
        Self::from_dir(&dir)
    }

    /// Load from an already extracted directory, without touching the network.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let dataset = loader::load_dir(dir)?;
        info!(
            "Loaded {} movies, {} appearances, {} summaries",
            dataset.movies.len(),
            dataset.appearances.len(),
            dataset.summaries.len()
        );
        Ok(Self::new(dataset))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn movies(&self) -> Result<&[Movie]> {
        if self.dataset.movies.is_empty() {
            return Err(Error::DataNotLoaded(Table::Movies));
        }
        Ok(&self.dataset.movies)
    }

    fn appearances(&self) -> Result<&[Appearance]> {
        if self.dataset.appearances.is_empty() {
            return Err(Error::DataNotLoaded(Table::Appearances));
        }
        Ok(&self.dataset.appearances)
    }

    /// The `top_n` most common genres, most frequent first.
    ///
    /// Each movie contributes one count per genre; movies without a readable
    /// genre field count towards `"Unknown"`. Equal counts keep the order in
    /// which the genres were first seen.
    pub fn genre_frequency(&self, top_n: usize) -> Result<CountTable<String>> {
        if top_n == 0 {
            return Err(InvalidArgument::TopN(top_n).into());
        }
        let movies = self.movies()?;

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut rows: Vec<(String, usize)> = Vec::new();
        for movie in movies {
            for genre in display_genres(movie.genres.as_deref()) {
                match index.get(&genre) {
                    Some(&i) => rows[i].1 += 1,
                    None => {
                        index.insert(genre.clone(), rows.len());
                        rows.push((genre, 1));
                    }
                }
            }
        }

        // Stable: ties stay in first-seen order.
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows.truncate(top_n);
        Ok(CountTable::new("Movie_Type", "Count", rows))
    }

    /// Histogram of distinct actor names per movie, ascending by actor count.
    pub fn actor_count_histogram(&self) -> Result<CountTable<usize>> {
        let appearances = self.appearances()?;

        let mut per_movie: HashMap<MovieId, BTreeSet<&str>> = HashMap::new();
        for row in appearances {
            let names = per_movie.entry(row.movie_id).or_default();
            if let Some(name) = row.actor_name.as_deref() {
                names.insert(name);
            }
        }

        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        for names in per_movie.values() {
            *histogram.entry(names.len()).or_default() += 1;
        }
        Ok(CountTable::new(
            "Number_of_Actors",
            "Movie_Count",
            histogram.into_iter().collect(),
        ))
    }

    /// Appearances matching `gender` (`"All"` for any) whose height lies in
    /// `[min_height, max_height]`. With `plot`, also returns a 20-bin height
    /// distribution of the selection.
    ///
    /// The bounds are validated before the actor table is inspected.
    pub fn filter_actors(
        &self,
        gender: &str,
        min_height: f64,
        max_height: f64,
        plot: bool,
    ) -> Result<ActorSelection<'_>> {
        let window = HeightWindow::new(min_height, max_height)?;
        let appearances = self.appearances()?;

        let rows = filter_appearances(appearances, GenderFilter::from_param(gender), window);
        debug!("filter_actors({gender}, {min_height}, {max_height}): {} rows", rows.len());

        let histogram = plot.then(|| {
            let heights: Vec<f64> = rows.iter().filter_map(|r| r.height).collect();
            HeightHistogram::from_heights(&heights, HISTOGRAM_BINS)
        });
        Ok(ActorSelection { rows, histogram })
    }

    /// Movies released per year, optionally restricted to one genre.
    ///
    /// `None` and the literal `"None"` both mean no genre filter. Movies with
    /// an unparseable release date are not counted. A movie without a
    /// readable genre field never matches a genre.
    pub fn releases_by_year(&self, genre: Option<&str>) -> Result<CountTable<i32>> {
        let movies = self.movies()?;
        let genre = genre.filter(|g| *g != "None");

        let mut years: BTreeMap<i32, usize> = BTreeMap::new();
        for movie in movies {
            let Some(date) = movie.release_date.as_deref().and_then(parse_date) else {
                continue;
            };
            if let Some(wanted) = genre {
                if !match_genres(movie.genres.as_deref()).iter().any(|g| g == wanted) {
                    continue;
                }
            }
            *years.entry(date.year()).or_default() += 1;
        }
        Ok(CountTable::new("Year", "Count", years.into_iter().collect()))
    }

    /// Actor births per year or per calendar month, ascending. Rows with an
    /// unparseable birthdate are not counted.
    pub fn birth_histogram(&self, mode: BirthMode) -> Result<BirthHistogram> {
        let appearances = self.appearances()?;
        let births = appearances
            .iter()
            .filter_map(|row| row.actor_birthdate.as_deref().and_then(parse_date));

        Ok(match mode {
            BirthMode::Year => {
                let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
                for date in births {
                    *counts.entry(date.year()).or_default() += 1;
                }
                BirthHistogram::Year(CountTable::new(
                    "Birth_Year",
                    "Count",
                    counts.into_iter().collect(),
                ))
            }
            BirthMode::Month => {
                let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
                for date in births {
                    *counts.entry(date.month()).or_default() += 1;
                }
                BirthHistogram::Month(CountTable::new(
                    "Birth_Month",
                    "Count",
                    counts.into_iter().collect(),
                ))
            }
        })
    }

    /// One row drawn uniformly from the movie × summary left join.
    pub fn random_movie<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<MovieInfo> {
        let movies = self.movies()?;

        let mut summaries: HashMap<MovieId, Vec<&str>> = HashMap::new();
        for s in &self.dataset.summaries {
            summaries.entry(s.movie_id).or_default().push(&s.summary);
        }

        // A movie with several summaries contributes one joined row per summary.
        let joined: Vec<(&Movie, Option<&str>)> = movies
            .iter()
            .flat_map(|movie| match summaries.get(&movie.movie_id) {
                Some(texts) => texts.iter().map(|t| (movie, Some(*t))).collect::<Vec<_>>(),
                None => vec![(movie, None)],
            })
            .collect();

        let (movie, summary) = joined[rng.gen_range(0..joined.len())];
        Ok(MovieInfo {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            summary: summary.unwrap_or_default().to_string(),
            genres_list: match_genres(movie.genres.as_deref()),
        })
    }
}
