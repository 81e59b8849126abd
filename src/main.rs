use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use reel_stats::config::Settings;
use reel_stats::data::table::{appearances_batch, histogram_batch};
use reel_stats::prompt::genre_check_prompt;
use reel_stats::{Analyzer, BirthHistogram, BirthMode};

#[derive(Parser)]
#[command(name = "reel-stats", version, about = "Statistics over the CMU Movie Summary Corpus")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download and extract the corpus without running a query.
    Fetch,
    /// Most common genres.
    Genres {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Histogram of distinct actors per movie.
    ActorCounts,
    /// Actors filtered by gender and height (meters).
    Actors {
        #[arg(long, default_value = "All")]
        gender: String,
        #[arg(long, default_value_t = 1.0)]
        min_height: f64,
        #[arg(long, default_value_t = 2.5)]
        max_height: f64,
        /// Also print the height distribution.
        #[arg(long)]
        histogram: bool,
        /// Maximum number of rows to print.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Movie releases per year.
    Releases {
        #[arg(long)]
        genre: Option<String>,
    },
    /// Actor births per year (Y) or month (M).
    Births {
        #[arg(long, default_value = "Y")]
        mode: String,
    },
    /// A random movie with its summary and genres.
    Random {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Genre-check prompt for a random movie, ready for a chat model.
    Prompt {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Command::Fetch = cli.command {
        let dir = cli.settings.source().ensure().context("fetching dataset")?;
        println!("Dataset ready in {}", dir.display());
        return Ok(());
    }

    let analyzer = cli.settings.load_analyzer().context("could not load data")?;
    run(&analyzer, cli.command)
}

fn run(analyzer: &Analyzer, command: Command) -> Result<()> {
    match command {
        Command::Fetch => {}
        Command::Genres { top } => {
            let table = analyzer.genre_frequency(top).context("computing genres")?;
            print_table(table.to_record_batch()?, table.is_empty(), "No genres found.")?;
        }
        Command::ActorCounts => {
            let table = analyzer.actor_count_histogram().context("computing actor counts")?;
            print_table(table.to_record_batch()?, table.is_empty(), "No actor data found.")?;
        }
        Command::Actors {
            gender,
            min_height,
            max_height,
            histogram,
            limit,
        } => {
            let selection = analyzer
                .filter_actors(&gender, min_height, max_height, histogram)
                .context("filtering actors")?;
            println!("{} matching appearances", selection.rows.len());
            let shown: Vec<_> = selection.rows.iter().copied().take(limit).collect();
            print_table(appearances_batch(&shown)?, shown.is_empty(), "No actors match.")?;
            if let Some(hist) = &selection.histogram {
                println!("Actor Height Distribution");
                print_table(histogram_batch(hist)?, hist.is_empty(), "No Data")?;
            }
        }
        Command::Releases { genre } => {
            let table = analyzer
                .releases_by_year(genre.as_deref())
                .context("computing releases")?;
            print_table(
                table.to_record_batch()?,
                table.is_empty(),
                "No movies found for that genre or the data is missing.",
            )?;
        }
        Command::Births { mode } => {
            let mode: BirthMode = mode.parse()?;
            let empty_msg = "No valid actor birthdate data found.";
            match analyzer.birth_histogram(mode).context("computing births")? {
                BirthHistogram::Year(t) => print_table(t.to_record_batch()?, t.is_empty(), empty_msg)?,
                BirthHistogram::Month(t) => print_table(t.to_record_batch()?, t.is_empty(), empty_msg)?,
            }
        }
        Command::Random { seed } => {
            let info = analyzer.random_movie(&mut rng(seed))?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Prompt { seed } => {
            let info = analyzer.random_movie(&mut rng(seed))?;
            println!("{}\n", info.title);
            println!("{}", genre_check_prompt(&info));
        }
    }
    Ok(())
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn print_table(batch: RecordBatch, empty: bool, empty_msg: &str) -> Result<()> {
    if empty {
        println!("{empty_msg}");
        return Ok(());
    }
    print_batches(&[batch])?;
    Ok(())
}
