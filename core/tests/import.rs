mod fixtures;

use fixtures::{jamendo_track, store_with_clock};
use jamcache_core::{CatalogError, CatalogTrack};
use serde_json::json;

#[test]
fn imports_full_jamendo_record() {
    let data = jamendo_track("168", "Beauty Mark", &["electronic", "ambient"]);
    let track = CatalogTrack::from_jamendo(&data).unwrap();

    assert_eq!(track.jamendo_id, 168);
    assert_eq!(track.artist_id, 7890);
    assert_eq!(track.album_id, Some(1234));
    assert_eq!(track.position, 3);
    assert_eq!(track.duration_formatted(), "04:05");
    assert_eq!(track.releasedate.unwrap().to_string(), "2008-03-17");
    assert_eq!(track.genres(), vec!["electronic", "ambient"]);
    assert_eq!(track.instruments(), vec!["synthesizer"]);
    assert_eq!(track.vartags(), vec!["energetic"]);
    assert_eq!(track.stats_rate, 4.5);
    assert_eq!(track.stats_downloads_total, 1200);
}

#[test]
fn missing_required_field_is_named() {
    for field in ["id", "name", "artist_name", "artist_id", "duration", "audio", "audiodownload"] {
        let mut data = jamendo_track("168", "Beauty Mark", &[]);
        data.as_object_mut().unwrap().remove(field);

        let err = CatalogTrack::from_jamendo(&data).unwrap_err();
        assert!(
            matches!(err, CatalogError::MissingField(name) if name == field),
            "expected MissingField({field}), got {err:?}"
        );
        assert!(err.to_string().contains(field));
    }
}

#[test]
fn null_required_field_counts_as_missing() {
    let mut data = jamendo_track("168", "Beauty Mark", &[]);
    data["audio"] = json!(null);
    assert!(matches!(
        CatalogTrack::from_jamendo(&data),
        Err(CatalogError::MissingField("audio"))
    ));
}

#[test]
fn non_numeric_id_is_invalid() {
    let data = jamendo_track("abc", "Beauty Mark", &[]);
    assert!(matches!(
        CatalogTrack::from_jamendo(&data),
        Err(CatalogError::InvalidField { field: "id", .. })
    ));
}

#[test]
fn unparseable_release_date_is_left_unset() {
    let mut data = jamendo_track("168", "Beauty Mark", &[]);
    data["releasedate"] = json!("17/03/2008");

    let track = CatalogTrack::from_jamendo(&data).unwrap();
    assert_eq!(track.releasedate, None);
    assert_eq!(track.name, "Beauty Mark");
}

#[test]
fn optional_fields_take_defaults() {
    let data = json!({
        "id": 9,
        "name": "Bare",
        "artist_name": "Someone",
        "artist_id": 3,
        "duration": 0,
        "audio": "https://example.com/a.mp3",
        "audiodownload": "https://example.com/a.zip",
        "album_id": ""
    });
    let track = CatalogTrack::from_jamendo(&data).unwrap();

    assert_eq!(track.album_name, "");
    assert_eq!(track.album_id, None);
    assert_eq!(track.position, 1);
    assert_eq!(track.releasedate, None);
    assert_eq!(track.stats_rate, 0.0);
    assert_eq!(track.stats_playlisted, 0);
    assert!(track.genres().is_empty());
    assert_eq!(track.duration_formatted(), "00:00");
}

#[test]
fn corrupt_tag_text_reads_as_empty() {
    let mut track = CatalogTrack::from_jamendo(&jamendo_track("1", "x", &["rock"])).unwrap();
    track.musicinfo_tags_genres = "[\"rock\"".to_string();
    assert!(track.genres().is_empty());
}

#[test]
fn batch_import_skips_bad_records() {
    let (store, _clock) = store_with_clock();
    let mut broken = jamendo_track("2", "Broken", &[]);
    broken.as_object_mut().unwrap().remove("artist_name");

    let payload = json!({
        "headers": {"status": "success", "results_count": 3},
        "results": [
            jamendo_track("1", "One", &["rock"]),
            broken,
            jamendo_track("3", "Three", &["jazz"]),
        ]
    });

    let report = store.import_results(&payload).unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);
    assert!(report.errors[0].contains("artist_name"));
    assert_eq!(store.counts().unwrap().tracks, 2);
    assert!(store.find_track_by_jamendo_id(3).unwrap().is_some());
    assert!(store.find_track_by_jamendo_id(2).unwrap().is_none());
}

#[test]
fn top_tracks_follow_rating_then_downloads() {
    let (store, _clock) = store_with_clock();
    let mut low = jamendo_track("1", "Low", &[]);
    low["stats"] = json!({"rate": 1.0, "downloads_total": 9000});
    let mut tie_a = jamendo_track("2", "TieA", &[]);
    tie_a["stats"] = json!({"rate": 4.0, "downloads_total": 10});
    let mut tie_b = jamendo_track("3", "TieB", &[]);
    tie_b["stats"] = json!({"rate": 4.0, "downloads_total": 500});

    store.import_results(&json!([low, tie_a, tie_b])).unwrap();

    let names: Vec<String> = store
        .top_tracks(10)
        .unwrap()
        .into_iter()
        .map(|t| t.track.name)
        .collect();
    assert_eq!(names, vec!["TieB", "TieA", "Low"]);
    assert_eq!(store.top_tracks(1).unwrap().len(), 1);
}
