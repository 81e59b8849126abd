//! Prompt for checking a movie's stored genres against a language model's
//! reading of its plot summary, and cleanup of the model's reply.
//!
//! Sending the prompt is left to whichever chat client the caller uses.

use std::sync::LazyLock;

use regex::Regex;

use crate::data::model::MovieInfo;

static REASONING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

static VERDICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)do they match the database\?[ \t]*\(?[ \t]*(yes|no)[ \t]*\)?[ \t]*[.!]?[ \t]*$")
        .expect("valid regex")
});

/// Ask the model to list the genres of `movie` and say whether they match
/// the stored ones.
pub fn genre_check_prompt(movie: &MovieInfo) -> String {
    format!(
        "\nYou are a concise movie-genre classifier and verifier.\n\
         Given the following movie summary and the database genres, determine the genres that apply, then verify if they match the database.\n\
         Output in this format:\n\
         \n\
         (START OF FORMAT DONT OUTPUT THIS LINE)\n\
         I've identified the genres: (LIST GENRES HERE)\n\
         Do they match the database? (YES/NO)\n\
         (END OF FORMAT DONT OUTPUT THIS LINE)\n\
         \n\
         \n\
         Movie Summary:\n\
         {}\n\
         \n\
         Database Genres:\n\
         {}\n",
        movie.summary,
        movie.genres_list.join(", ")
    )
}

/// Drop `<think>…</think>` blocks and surrounding whitespace.
pub fn strip_reasoning(reply: &str) -> String {
    REASONING.replace_all(reply, "").trim().to_string()
}

/// The YES/NO answer of a reply in the requested format. The answer must
/// close its line, so an echoed `(YES/NO)` template reads as no answer.
pub fn match_verdict(reply: &str) -> Option<bool> {
    let caps = VERDICT.captures(reply)?;
    Some(caps[1].eq_ignore_ascii_case("yes"))
}
