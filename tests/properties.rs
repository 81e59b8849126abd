use std::collections::HashSet;
use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;

use reel_stats::data::loader::{CHARACTER_FILE, MOVIE_FILE, SUMMARY_FILE};
use reel_stats::{Analyzer, Appearance, Dataset, Error, InvalidArgument, Movie, Table};

fn movie(id: u64, date: Option<&str>, genres: Option<&str>) -> Movie {
    Movie {
        movie_id: id,
        title: format!("Title {id}"),
        release_date: date.map(str::to_string),
        genres: genres.map(str::to_string),
        ..Default::default()
    }
}

fn actor(name: &str, gender: Option<&str>, height: Option<f64>) -> Appearance {
    Appearance {
        movie_id: 1,
        actor_name: Some(name.to_string()),
        gender: gender.map(str::to_string),
        height,
        ..Default::default()
    }
}

fn sample_movies() -> Vec<Movie> {
    let genres = [
        Some(r#"{"a": "Drama"}"#),
        Some(r#"{"a": "Comedy", "b": "Drama"}"#),
        Some("{}"),
        None,
        Some(r#"{"c": "Horror"}"#),
        Some("not json"),
        Some(r#"{"b": "Comedy"}"#),
    ];
    let dates = [Some("1990-01-02"), Some("1991"), None, Some("bad"), Some("1990-07")];
    (0..40)
        .map(|i| movie(i, dates[i as usize % dates.len()], genres[i as usize % genres.len()]))
        .collect()
}

fn movies_only(movies: Vec<Movie>) -> Analyzer {
    Analyzer::new(Dataset::new(movies, Vec::new(), Vec::new()))
}

#[test]
fn genre_frequency_is_bounded_and_descending() {
    let analyzer = movies_only(sample_movies());
    for n in 1..=8 {
        let table = analyzer.genre_frequency(n).unwrap();
        assert!(table.len() <= n);
        for pair in table.rows.windows(2) {
            assert!(pair[0].1 >= pair[1].1, "not descending for N={n}: {:?}", table.rows);
        }
    }
}

#[test]
fn empty_genre_field_is_unknown_for_counts_but_never_matches() {
    let analyzer = movies_only(vec![movie(1, Some("2000-01-01"), Some("{}"))]);

    let counts = analyzer.genre_frequency(5).unwrap();
    assert_eq!(counts.rows, vec![("Unknown".to_string(), 1)]);

    for genre in ["Unknown", "Drama", "Comedy"] {
        assert!(analyzer.releases_by_year(Some(genre)).unwrap().is_empty());
    }
}

#[test]
fn height_validation_happens_before_data_access() {
    let empty = Analyzer::new(Dataset::default());
    let bad_windows = [(1.8, 1.8), (2.0, 1.5), (0.9, 2.0), (1.2, 2.51), (0.0, 3.0)];
    for (min, max) in bad_windows {
        match empty.filter_actors("All", min, max, false) {
            Err(Error::InvalidArgument(
                InvalidArgument::HeightOutOfRange { .. } | InvalidArgument::InvertedHeightWindow { .. },
            )) => {}
            other => panic!("({min}, {max}) should be rejected, got {other:?}"),
        }
    }
    assert!(matches!(
        empty.filter_actors("All", 1.0, 2.0, false),
        Err(Error::DataNotLoaded(Table::Appearances))
    ));
}

#[test]
fn all_genders_is_union_of_parts_and_respects_window() {
    let appearances = vec![
        actor("a", Some("F"), Some(1.55)),
        actor("b", Some("M"), Some(1.92)),
        actor("c", None, Some(1.70)),
        actor("d", Some("F"), Some(2.30)),
        actor("e", Some("M"), None),
        actor("f", Some("M"), Some(0.4)),
    ];
    let analyzer = Analyzer::new(Dataset::new(Vec::new(), appearances, Vec::new()));
    let (min, max) = (1.5, 2.0);

    let names = |gender: &str| -> HashSet<String> {
        analyzer
            .filter_actors(gender, min, max, false)
            .unwrap()
            .rows
            .iter()
            .map(|r| r.actor_name.clone().unwrap())
            .collect()
    };

    let all = names("All");
    let parts: HashSet<String> = names("F")
        .into_iter()
        .chain(names("M"))
        .chain(names("Unknown"))
        .collect();
    assert!(all.is_subset(&parts));
    assert_eq!(all, HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()]));

    let selection = analyzer.filter_actors("All", min, max, true).unwrap();
    assert!(selection
        .rows
        .iter()
        .all(|r| r.height.is_some_and(|h| (min..=max).contains(&h))));
    assert_eq!(selection.histogram.unwrap().total(), 3);
}

#[test]
fn female_filter_example() {
    let appearances = vec![
        actor("one", Some("F"), Some(1.5)),
        actor("two", Some("M"), Some(1.8)),
        actor("three", Some("F"), Some(2.6)),
        actor("four", None, None),
    ];
    let analyzer = Analyzer::new(Dataset::new(Vec::new(), appearances, Vec::new()));

    let selection = analyzer.filter_actors("F", 1.0, 2.0, false).unwrap();
    assert_eq!(selection.rows.len(), 1);
    assert_eq!(selection.rows[0].height, Some(1.5));
    assert!(selection.histogram.is_none());
}

#[test]
fn release_counts_sum_to_dated_movies_and_bound_filtered_counts() {
    let movies = sample_movies();
    let dated = movies
        .iter()
        .filter(|m| m.release_date.as_deref().and_then(reel_stats::data::model::parse_date).is_some())
        .count();
    let analyzer = movies_only(movies);

    let all = analyzer.releases_by_year(None).unwrap();
    assert_eq!(all.total(), dated);

    let comedy = analyzer.releases_by_year(Some("Comedy")).unwrap();
    assert!(!comedy.is_empty());
    for (year, count) in &comedy.rows {
        assert!(*count <= all.count_of(year).unwrap());
    }
}

#[test]
fn random_movie_always_has_list_and_summary() {
    let analyzer = movies_only(sample_movies());
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..25 {
        let info = analyzer.random_movie(&mut rng).unwrap();
        assert!(info.movie_id < 40);
        assert_eq!(info.summary, "");
        assert!(info.genres_list.iter().all(|g| g != "Unknown"));
    }
}

#[test]
fn loads_an_extracted_directory_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(MOVIE_FILE),
        "10\t/m/a\tFirst\t1999-03-31\t\t136\t{}\t{}\t{\"/m/1\": \"Action\", \"/m/2\": \"Science Fiction\"}\n\
         11\t/m/b\tSecond\t\\N\t\t\\N\t{}\t{}\t{}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join(CHARACTER_FILE),
        "10\t/m/a\t1999-03-31\tNeo\t1964-09-02\tM\t1.86\t\tKeanu Reeves\t34\t/m/x\t/m/y\t/m/z\n\
         10\t/m/a\t1999-03-31\tTrinity\t1967-08-21\tF\t1.74\t\tCarrie-Anne Moss\t31\t/m/x\t/m/y\t/m/z\n\
         11\t/m/b\t\tSomeone\t\\N\t\\N\t\\N\t\t\\N\t\t\t\t\n",
    )
    .unwrap();
    fs::write(dir.path().join(SUMMARY_FILE), "10\tA hacker learns the truth.\n").unwrap();

    let analyzer = Analyzer::from_dir(dir.path()).unwrap();

    assert_eq!(analyzer.releases_by_year(None).unwrap().rows, vec![(1999, 1)]);
    assert_eq!(analyzer.actor_count_histogram().unwrap().rows, vec![(0, 1), (2, 1)]);
    assert_eq!(analyzer.filter_actors("All", 1.0, 2.5, false).unwrap().rows.len(), 2);

    let top = analyzer.genre_frequency(1).unwrap();
    assert_eq!(top.rows, vec![("Action".to_string(), 1)]);
}
