//! Aggregate statistics over the CMU Movie Summary Corpus.

pub mod config;
pub mod data;
pub mod error;
pub mod prompt;

pub use data::aggregate::{ActorSelection, Analyzer, BirthHistogram, BirthMode};
pub use data::fetch::DatasetSource;
pub use data::model::{Appearance, Dataset, Movie, MovieInfo, PlotSummary};
pub use data::table::CountTable;
pub use error::{Error, InvalidArgument, LoadError, Result, Table};
