use serde::Deserialize;
use std::{collections::HashMap, io::Read, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::RawMovie,
};

/// Columns read from `tmdb_5000_movies.csv`; the rest are ignored
#[derive(Debug, Deserialize)]
struct MovieRow {
    title: String,
    #[serde(default)]
    overview: Option<String>,
    genres: String,
    keywords: String,
}

/// Columns read from `tmdb_5000_credits.csv`
#[derive(Debug, Deserialize)]
struct CreditsRow {
    movie_id: i64,
    title: String,
    cast: String,
    crew: String,
}

/// Loads and joins the two TMDB exports from disk
pub fn load_movies(
    movies_path: impl AsRef<Path>,
    credits_path: impl AsRef<Path>,
) -> AppResult<Vec<RawMovie>> {
    let movies_path = movies_path.as_ref();
    let credits_path = credits_path.as_ref();
    tracing::info!(
        movies = %movies_path.display(),
        credits = %credits_path.display(),
        "Loading TMDB dataset"
    );

    let movies = read_rows(csv::Reader::from_path(movies_path)?)?;
    let credits = read_rows(csv::Reader::from_path(credits_path)?)?;
    Ok(join(movies, credits))
}

/// Same as [`load_movies`] over arbitrary readers
pub fn load_movies_from_readers<M: Read, C: Read>(
    movies: M,
    credits: C,
) -> AppResult<Vec<RawMovie>> {
    let movies = read_rows(csv::Reader::from_reader(movies))?;
    let credits = read_rows(csv::Reader::from_reader(credits))?;
    Ok(join(movies, credits))
}

fn read_rows<R: Read, T: serde::de::DeserializeOwned>(mut reader: csv::Reader<R>) -> AppResult<Vec<T>> {
    reader
        .deserialize()
        .map(|row| row.map_err(AppError::from))
        .collect()
}

/// Inner join on title, movies order first, then credits order per title
fn join(movies: Vec<MovieRow>, credits: Vec<CreditsRow>) -> Vec<RawMovie> {
    let movie_count = movies.len();
    let credits_count = credits.len();

    let mut by_title: HashMap<String, Vec<CreditsRow>> = HashMap::new();
    for row in credits {
        by_title.entry(row.title.clone()).or_default().push(row);
    }

    let mut joined = Vec::with_capacity(movie_count);
    for movie in movies {
        let Some(matches) = by_title.get(&movie.title) else {
            tracing::debug!(title = %movie.title, "No credits for movie, dropping");
            continue;
        };
        for credit in matches {
            joined.push(RawMovie {
                id: credit.movie_id,
                title: movie.title.clone(),
                overview: movie.overview.clone(),
                genres: movie.genres.clone(),
                keywords: movie.keywords.clone(),
                cast: credit.cast.clone(),
                crew: credit.crew.clone(),
            });
        }
    }

    tracing::info!(
        movies = movie_count,
        credits = credits_count,
        joined = joined.len(),
        "Joined TMDB exports on title"
    );
    joined
}
