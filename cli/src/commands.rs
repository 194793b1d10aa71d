use indicatif::{ProgressBar, ProgressStyle};
use jamcache_core::{
    ImportReport, ResponseCache, SqliteStore, StoreCounts, StoredTrack, response_results,
};
use serde_json::Value;
use std::{error::Error, fs, path::Path};

/// Import a saved Jamendo response, showing progress per record.
pub fn import_file(store: &SqliteStore, file: &Path) -> Result<ImportReport, Box<dyn Error>> {
    let raw = fs::read_to_string(file)
        .map_err(|e| format!("Could not read {}: {}", file.display(), e))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|e| format!("{} is not valid JSON: {}", file.display(), e))?;

    let total = response_results(&payload).len();
    if total == 0 {
        return Err(format!("No track records found in {}", file.display()).into());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} tracks")?
            .progress_chars("#>-"),
    );

    let report = store.import_with_progress(&payload, |done| pb.set_position(done as u64))?;
    pb.finish_and_clear();
    Ok(report)
}

pub fn purge_cache(store: SqliteStore) -> Result<usize, Box<dyn Error>> {
    Ok(ResponseCache::new(store).purge_expired()?)
}

pub fn catalog_stats(store: &SqliteStore) -> Result<StoreCounts, Box<dyn Error>> {
    Ok(store.counts()?)
}

pub fn top_tracks(store: &SqliteStore, limit: usize) -> Result<Vec<StoredTrack>, Box<dyn Error>> {
    if limit == 0 {
        return Err("--limit must be at least 1".into());
    }
    Ok(store.top_tracks(limit)?)
}
