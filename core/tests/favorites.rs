mod fixtures;

use chrono::Duration;
use fixtures::{seed_track, store_with_clock};
use jamcache_core::{CatalogError, CatalogTrack, SqliteStore};

#[test]
fn favoriting_increments_counter() {
    let (store, _clock) = store_with_clock();
    let track = seed_track(&store, 168, &["electronic"]);
    assert_eq!(track.track.stats_playlisted, 2);

    let change = store.add_favorite("alice", track.id).unwrap();
    assert!(change.favorited);
    assert_eq!(change.favorite_count, 3);

    let change = store.add_favorite("bob", track.id).unwrap();
    assert_eq!(change.favorite_count, 4);
    assert!(store.is_favorite("alice", track.id).unwrap());
}

#[test]
fn favoriting_twice_is_rejected() {
    let (store, _clock) = store_with_clock();
    let track = seed_track(&store, 168, &[]);

    store.add_favorite("alice", track.id).unwrap();
    let err = store.add_favorite("alice", track.id).unwrap_err();

    assert!(matches!(err, CatalogError::AlreadyFavorited { ref user_id, track_id }
        if user_id == "alice" && track_id == track.id));
    // the rejected insert must not have touched the counter
    let stored = store.find_track(track.id).unwrap().unwrap();
    assert_eq!(stored.track.stats_playlisted, 3);
    assert_eq!(store.counts().unwrap().favorites, 1);
}

#[test]
fn unfavoriting_decrements_counter() {
    let (store, _clock) = store_with_clock();
    let track = seed_track(&store, 168, &[]);

    store.add_favorite("alice", track.id).unwrap();
    let change = store.remove_favorite("alice", track.id).unwrap();

    assert!(!change.favorited);
    assert_eq!(change.favorite_count, 2);
    assert!(!store.is_favorite("alice", track.id).unwrap());
}

#[test]
fn reimport_keeps_local_counter() {
    let (store, _clock) = store_with_clock();
    let track = seed_track(&store, 168, &[]);
    store.add_favorite("alice", track.id).unwrap();

    let mut refreshed = track.track.clone();
    refreshed.stats_playlisted = 0;
    refreshed.name = "Beauty Mark (remaster)".to_string();
    let stored = store.upsert_track(&refreshed).unwrap();

    assert_eq!(stored.id, track.id);
    assert_eq!(stored.track.name, "Beauty Mark (remaster)");
    assert_eq!(stored.track.stats_playlisted, 3);
}

#[test]
fn unfavorite_at_zero_stays_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.sqlite3");
    let store = SqliteStore::open(&path).unwrap();

    let mut data = fixtures::jamendo_track("500", "Quiet", &[]);
    data["stats"]["playlisted"] = serde_json::json!(0);
    let track = store
        .upsert_track(&CatalogTrack::from_jamendo(&data).unwrap())
        .unwrap();
    store.add_favorite("alice", track.id).unwrap();

    // an out-of-band writer resets the counter while the mark still exists
    let other = rusqlite::Connection::open(&path).unwrap();
    other
        .execute("UPDATE jamendo_tracks SET stats_playlisted = 0", [])
        .unwrap();

    let change = store.remove_favorite("alice", track.id).unwrap();
    assert_eq!(change.favorite_count, 0);
    assert_eq!(store.find_track(track.id).unwrap().unwrap().track.stats_playlisted, 0);
}

#[test]
fn removing_missing_favorite_fails_without_side_effects() {
    let (store, _clock) = store_with_clock();
    let track = seed_track(&store, 168, &[]);

    let err = store.remove_favorite("alice", track.id).unwrap_err();
    assert!(matches!(err, CatalogError::FavoriteNotFound { .. }));
    assert_eq!(store.find_track(track.id).unwrap().unwrap().track.stats_playlisted, 2);
}

#[test]
fn favoriting_unknown_track_fails() {
    let (store, _clock) = store_with_clock();
    let err = store.add_favorite("alice", 9999).unwrap_err();
    assert!(matches!(err, CatalogError::TrackNotFound(9999)));
}

#[test]
fn favorites_list_newest_first() {
    let (store, clock) = store_with_clock();
    let first = seed_track(&store, 1, &[]);
    let second = seed_track(&store, 2, &[]);

    store.add_favorite("alice", first.id).unwrap();
    clock.advance(Duration::seconds(5));
    store.add_favorite("alice", second.id).unwrap();
    store.add_favorite("bob", first.id).unwrap();

    let ids: Vec<i64> = store
        .list_favorites("alice")
        .unwrap()
        .iter()
        .map(|t| t.track.jamendo_id)
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(store.list_favorites("nobody").unwrap().is_empty());
}

#[test]
fn favorite_count_is_per_user() {
    let (store, _clock) = store_with_clock();
    let first = seed_track(&store, 1, &[]);
    let second = seed_track(&store, 2, &[]);

    store.add_favorite("alice", first.id).unwrap();
    store.add_favorite("alice", second.id).unwrap();
    store.add_favorite("bob", first.id).unwrap();
    assert_eq!(store.favorite_count("alice").unwrap(), 2);
    assert_eq!(store.favorite_count("bob").unwrap(), 1);

    store.remove_favorite("alice", first.id).unwrap();
    assert_eq!(store.favorite_count("alice").unwrap(), 1);
    assert_eq!(store.favorite_count("nobody").unwrap(), 0);
}
