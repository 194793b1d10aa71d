mod fixtures;

use jamcache::colors::ColorScheme;
use jamcache::display::{format_counts, format_import_report, format_top_track};
use jamcache::format_number;
use jamcache_core::{CatalogTrack, ImportReport, SqliteStore, StoreCounts};

#[test]
fn format_number_groups_thousands() {
    assert_eq!(format_number(0), "0");
    assert_eq!(format_number(999), "999");
    assert_eq!(format_number(1000), "1,000");
    assert_eq!(format_number(1234567), "1,234,567");
}

#[test]
fn import_report_lists_skip_reasons() {
    let colors = ColorScheme::new(false);
    let report = ImportReport {
        imported: 1200,
        skipped: 1,
        errors: vec!["missing required Jamendo field: audio".to_string()],
    };

    let text = format_import_report(&report, &colors);
    assert!(text.starts_with("✅ Imported 1,200 tracks, 1 skipped"));
    assert!(text.contains("- missing required Jamendo field: audio"));
}

#[test]
fn counts_split_live_and_expired_cache() {
    let colors = ColorScheme::new(false);
    let counts = StoreCounts {
        tracks: 12,
        favorites: 3,
        plays: 4500,
        cache_entries: 5,
        expired_cache_entries: 2,
    };

    let lines = format_counts(&counts, &colors);
    assert_eq!(lines.len(), 4);
    assert!(lines[2].ends_with("4,500"));
    assert!(lines[3].contains("(3 live, 2 expired)"));
}

#[test]
fn top_track_line_shows_rating_and_duration() {
    let colors = ColorScheme::new(false);
    let store = SqliteStore::open_in_memory().unwrap();
    let data = fixtures::track("168", "Beauty Mark", 4.5, 1200);
    let stored = store
        .upsert_track(&CatalogTrack::from_jamendo(&data).unwrap())
        .unwrap();

    let line = format_top_track(1, &stored, &colors);
    assert_eq!(
        line,
        " 1. \"Beauty Mark\" by Tryad [4.5 rating, 1,200 downloads, 0 favorites] 03:05"
    );
}
