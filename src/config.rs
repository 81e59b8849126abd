use std::path::PathBuf;

use clap::Args;
use log::info;

use crate::data::aggregate::Analyzer;
use crate::data::fetch::{DatasetSource, DEFAULT_URL};
use crate::error::Result;

/// Where the corpus lives. Each option falls back to an environment variable.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Cache directory for the archive and its extracted files.
    #[arg(long, env = "REEL_DATA_DIR", default_value = "downloads", global = true)]
    pub data_dir: PathBuf,

    /// Archive to download when the cache is empty.
    #[arg(long, env = "REEL_DATASET_URL", default_value = DEFAULT_URL, global = true)]
    pub dataset_url: String,

    /// Already extracted MovieSummaries directory; skips fetching entirely.
    #[arg(long, env = "REEL_DATASET_DIR", global = true)]
    pub dataset_dir: Option<PathBuf>,
}

impl Settings {
    pub fn source(&self) -> DatasetSource {
        DatasetSource::new(&self.data_dir).with_url(&self.dataset_url)
    }

    pub fn load_analyzer(&self) -> Result<Analyzer> {
        match &self.dataset_dir {
            Some(dir) => {
                info!("Loading extracted corpus from {}", dir.display());
                Analyzer::from_dir(dir)
            }
            None => Analyzer::load(&self.source()),
        }
    }
}
