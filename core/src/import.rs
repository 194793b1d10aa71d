//! Conversion of raw Jamendo track JSON into [`CatalogTrack`] records.
//!
//! Jamendo encodes most numeric ids as strings, so integer fields accept
//! either form. Release dates that do not parse are dropped rather than
//! failing the record.

use crate::error::{CatalogError, Result};
use crate::models::CatalogTrack;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

impl CatalogTrack {
    pub fn from_jamendo(data: &Value) -> Result<Self> {
        let record = data
            .as_object()
            .ok_or_else(|| CatalogError::InvalidField {
                field: "track",
                value: data.to_string(),
            })?;

        let stats = record.get("stats").and_then(Value::as_object);
        let tags = record
            .get("musicinfo")
            .and_then(|info| info.get("tags"))
            .and_then(Value::as_object);

        Ok(Self {
            jamendo_id: required_int(record, "id")?,
            name: required_str(record, "name")?,
            artist_name: required_str(record, "artist_name")?,
            artist_id: required_int(record, "artist_id")?,
            album_name: optional_str(record, "album_name"),
            album_id: record.get("album_id").and_then(lenient_int),
            duration: required_int(record, "duration")?,
            position: record.get("position").and_then(lenient_int).unwrap_or(1),
            releasedate: record
                .get("releasedate")
                .and_then(Value::as_str)
                .and_then(parse_release_date),
            audio: required_str(record, "audio")?,
            audiodownload: required_str(record, "audiodownload")?,
            image: optional_str(record, "image"),
            album_image: optional_str(record, "album_image"),
            musicinfo_tags_genres: encode_tag_list(tags, "genres")?,
            musicinfo_tags_instruments: encode_tag_list(tags, "instruments")?,
            musicinfo_tags_vartags: encode_tag_list(tags, "vartags")?,
            stats_rate: stats
                .and_then(|s| s.get("rate"))
                .and_then(lenient_float)
                .unwrap_or(0.0),
            stats_downloads_total: stats
                .and_then(|s| s.get("downloads_total"))
                .and_then(lenient_int)
                .unwrap_or(0),
            stats_playlisted: stats
                .and_then(|s| s.get("playlisted"))
                .and_then(lenient_int)
                .unwrap_or(0),
        })
    }
}

/// Pull the track list out of a Jamendo response body. Accepts the usual
/// `{"results": [...]}` envelope or a bare array.
pub fn response_results(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

/// Result of importing a batch of Jamendo records.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), RELEASE_DATE_FORMAT).ok()
}

fn present<'a>(record: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value> {
    match record.get(field) {
        None | Some(Value::Null) => Err(CatalogError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn required_int(record: &Map<String, Value>, field: &'static str) -> Result<i64> {
    let value = present(record, field)?;
    lenient_int(value).ok_or_else(|| CatalogError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn required_str(record: &Map<String, Value>, field: &'static str) -> Result<String> {
    match present(record, field)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(CatalogError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn optional_str(record: &Map<String, Value>, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn encode_tag_list(tags: Option<&Map<String, Value>>, name: &str) -> Result<String> {
    let list: Vec<&str> = tags
        .and_then(|t| t.get(name))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    Ok(serde_json::to_string(&list)?)
}
