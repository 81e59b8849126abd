//! Write a small synthetic `MovieSummaries` directory for offline use:
//!
//! ```text
//! cargo run --bin generate_sample -- sample_data/MovieSummaries
//! reel-stats --dataset-dir sample_data/MovieSummaries genres
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value as JsonValue};

use reel_stats::data::loader::{CHARACTER_FILE, MOVIE_FILE, SUMMARY_FILE};

const GENRES: [(&str, &str); 8] = [
    ("/m/07s9rl0", "Drama"),
    ("/m/01z4y", "Comedy"),
    ("/m/02kdv5l", "Action"),
    ("/m/02l7c8", "Romance"),
    ("/m/03npn", "Horror"),
    ("/m/01jfsb", "Thriller"),
    ("/m/06n90", "Science Fiction"),
    ("/m/0lsxr", "Crime Fiction"),
];

const FIRST_NAMES: [&str; 10] = [
    "Ada", "Bruno", "Chloe", "Dmitri", "Elena", "Farid", "Greta", "Hugo", "Ines", "Jonas",
];
const LAST_NAMES: [&str; 8] = [
    "Almeida", "Berger", "Castro", "Dubois", "Eriksen", "Fischer", "Garcia", "Holm",
];

const MOVIES: u64 = 120;
const ACTOR_POOL: usize = 60;

struct Actor {
    name: String,
    gender: Option<&'static str>,
    height: Option<f64>,
    birthdate: Option<String>,
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data/MovieSummaries"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);
    let actors = actor_pool(&mut rng);

    let mut movies = tsv_writer(&out_dir.join(MOVIE_FILE))?;
    let mut characters = tsv_writer(&out_dir.join(CHARACTER_FILE))?;
    let mut summaries = tsv_writer(&out_dir.join(SUMMARY_FILE))?;

    let mut appearances = 0usize;
    for i in 0..MOVIES {
        let movie_id = 100_000 + i * 37;
        let freebase_id = format!("/m/sample{i:03}");
        let title = format!("Sample Picture {}", i + 1);
        let release = release_date(&mut rng);

        let genres = genre_field(&mut rng);
        movies.write_record([
            movie_id.to_string(),
            freebase_id.clone(),
            title.clone(),
            release.clone().unwrap_or_default(),
            String::new(),
            format!("{:.1}", rng.gen_range(75.0..160.0)),
            r#"{"/m/02h40lc": "English Language"}"#.to_string(),
            r#"{"/m/09c7w0": "United States of America"}"#.to_string(),
            genres,
        ])?;

        let cast_size = rng.gen_range(1..=8);
        for (slot, actor) in actors.choose_multiple(&mut rng, cast_size).enumerate() {
            characters.write_record([
                movie_id.to_string(),
                freebase_id.clone(),
                release.clone().unwrap_or_default(),
                format!("Character {}", slot + 1),
                actor.birthdate.clone().unwrap_or_default(),
                actor.gender.unwrap_or_default().to_string(),
                actor.height.map(|h| format!("{h:.3}")).unwrap_or_default(),
                String::new(),
                actor.name.clone(),
                String::new(),
                format!("/m/map{movie_id}_{slot}"),
                format!("/m/char{movie_id}_{slot}"),
                format!("/m/actor_{}", actor.name.replace(' ', "_")),
            ])?;
            appearances += 1;
        }

        // Roughly a quarter of the movies have no summary.
        if rng.gen_bool(0.75) {
            summaries.write_record([
                movie_id.to_string(),
                format!("{title} follows an unlikely crew through one very long night."),
            ])?;
        }
    }

    movies.flush()?;
    characters.flush()?;
    summaries.flush()?;

    println!(
        "Wrote {MOVIES} movies and {appearances} appearances to {}",
        out_dir.display()
    );
    Ok(())
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))
}

fn actor_pool(rng: &mut StdRng) -> Vec<Actor> {
    (0..ACTOR_POOL)
        .map(|i| {
            let gender = match rng.gen_range(0..10) {
                0 => None,
                1..=5 => Some("F"),
                _ => Some("M"),
            };
            let mean = if gender == Some("F") { 1.65 } else { 1.78 };
            // A few heights are missing or implausible, as in the real corpus.
            let height = match rng.gen_range(0..20) {
                0 | 1 => None,
                2 => Some(rng.gen_range(2.6..3.2)),
                _ => Some(gauss(rng, mean, 0.07)),
            };
            let birthdate = match rng.gen_range(0..10) {
                0 => None,
                1 => Some(format!("{}", rng.gen_range(1930..2000))),
                _ => Some(format!(
                    "{}-{:02}-{:02}",
                    rng.gen_range(1930..2000),
                    rng.gen_range(1..=12),
                    rng.gen_range(1..=28)
                )),
            };
            Actor {
                name: format!(
                    "{} {}",
                    FIRST_NAMES[i % FIRST_NAMES.len()],
                    LAST_NAMES[(i / FIRST_NAMES.len() + i) % LAST_NAMES.len()]
                ),
                gender,
                height,
                birthdate,
            }
        })
        .collect()
}

fn release_date(rng: &mut StdRng) -> Option<String> {
    let year = rng.gen_range(1950..2013);
    match rng.gen_range(0..10) {
        0 => None,
        1 => Some(year.to_string()),
        2 => Some(format!("{year}-{:02}", rng.gen_range(1..=12))),
        _ => Some(format!(
            "{year}-{:02}-{:02}",
            rng.gen_range(1..=12),
            rng.gen_range(1..=28)
        )),
    }
}

fn genre_field(rng: &mut StdRng) -> String {
    let count = match rng.gen_range(0..10) {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        _ => 3,
    };
    let mut map = Map::new();
    for (code, name) in GENRES.choose_multiple(rng, count) {
        map.insert((*code).to_string(), JsonValue::String((*name).to_string()));
    }
    JsonValue::Object(map).to_string()
}

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.gen::<f64>().max(1e-15);
    let u2 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}
