//! Tag normalization: raw TMDB attribute payloads into a [`TagDocument`].

use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, RawMovie, TagDocument},
};

const MAX_CAST: usize = 3;
const DIRECTOR_JOB: &str = "Director";

impl MovieRecord {
    /// Validates and extracts the attributes used for tagging
    pub fn from_raw(raw: &RawMovie) -> AppResult<Self> {
        let title = raw.title.as_str();

        let genres = names(&parse_entries(title, "genres", &raw.genres)?, title, "genres")?;
        let keywords = names(
            &parse_entries(title, "keywords", &raw.keywords)?,
            title,
            "keywords",
        )?;

        let mut cast_entries = parse_entries(title, "cast", &raw.cast)?;
        cast_entries.truncate(MAX_CAST);
        let cast = names(&cast_entries, title, "cast")?;

        let crew = directors(&parse_entries(title, "crew", &raw.crew)?, title)?;

        Ok(Self {
            id: raw.id,
            title: raw.title.clone(),
            genres,
            keywords,
            cast,
            crew,
        })
    }
}

impl From<&MovieRecord> for TagDocument {
    /// genres, keywords, cast, crew; joined by single spaces, then lowercased
    fn from(record: &MovieRecord) -> Self {
        let joined = record
            .genres
            .iter()
            .chain(&record.keywords)
            .chain(&record.cast)
            .chain(&record.crew)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        TagDocument::new(joined)
    }
}

/// Parses a serialized collection into its objects
fn parse_entries(
    title: &str,
    field: &'static str,
    payload: &str,
) -> AppResult<Vec<Map<String, Value>>> {
    let parse_error = |message: String| AppError::Parse {
        title: title.to_string(),
        field,
        message,
    };

    let value: Value = serde_json::from_str(payload).map_err(|e| parse_error(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(parse_error("expected an array of objects".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(parse_error(format!("entry {} is not an object: {}", i, other))),
        })
        .collect()
}

fn string_field<'a>(
    entry: &'a Map<String, Value>,
    key: &str,
    index: usize,
    title: &str,
    field: &'static str,
) -> AppResult<&'a str> {
    match entry.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(AppError::Schema {
            title: title.to_string(),
            field,
            message: format!("entry {} has non-string \"{}\": {}", index, key, other),
        }),
        None => Err(AppError::Schema {
            title: title.to_string(),
            field,
            message: format!("entry {} is missing \"{}\"", index, key),
        }),
    }
}

fn names(entries: &[Map<String, Value>], title: &str, field: &'static str) -> AppResult<Vec<String>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| string_field(entry, "name", i, title, field).map(str::to_string))
        .collect()
}

fn directors(entries: &[Map<String, Value>], title: &str) -> AppResult<Vec<String>> {
    let mut directors = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let job = string_field(entry, "job", i, title, "crew")?;
        let name = string_field(entry, "name", i, title, "crew")?;
        if job == DIRECTOR_JOB {
            directors.push(name.to_string());
        }
    }
    Ok(directors)
}
