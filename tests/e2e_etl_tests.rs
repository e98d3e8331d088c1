//! End-to-end tests for the Sparkify load.
//!
//! Each test builds a song/log data tree in a temp directory, provisions an
//! empty warehouse and runs the full pipeline against it.

mod common;

use common::*;
use sparkify_etl::{run, EtlError, ReorderPolicy};

const DESREE: &str = "Des'ree";
const YOU_GOTTA_BE: &str = "You Gotta Be";

fn with_known_song() -> TestData {
    let data = TestData::new();
    data.write_song(
        "A/A/A/TRAAAAW128F429D538.json",
        &song(
            "SOBONKR12A58A7A7E0",
            YOU_GOTTA_BE,
            "AR5KOSW1187FB35FF4",
            DESREE,
            SONG_DURATION,
        ),
    );
    data
}

#[test]
fn test_run_loads_songs_and_plays() {
    let data = with_known_song();
    data.write_log(
        "2018/11/2018-11-01-events.json",
        &[
            play(1_541_105_830_796, 8, "free", YOU_GOTTA_BE, DESREE, SONG_DURATION),
            play(1_541_106_106_796, 8, "free", "Unknown Song", "Nobody", 200.0),
        ],
    );

    let summary = run(&data.config()).unwrap();

    assert_eq!(summary.songs.files_processed, 1);
    assert_eq!(summary.logs.files_processed, 1);
    assert_eq!(summary.logs.totals.songplays, 2);
    assert_eq!(summary.logs.totals.unmatched_songplays, 1);
    assert_eq!(
        summary.table_counts,
        vec![
            ("songplays", 2),
            ("users", 1),
            ("songs", 1),
            ("artists", 1),
            ("time", 2),
        ]
    );
}

#[test]
fn test_rerun_leaves_dimensions_unchanged() {
    let data = with_known_song();
    data.write_log(
        "2018/11/a.json",
        &[
            play(100, 7, "free", YOU_GOTTA_BE, DESREE, SONG_DURATION),
            play(200, 7, "paid", YOU_GOTTA_BE, DESREE, SONG_DURATION),
        ],
    );
    data.write_log(
        "2018/11/b.json",
        &[play(300, 9, "free", "Unknown Song", "Nobody", 1.0)],
    );

    run(&data.config()).unwrap();
    let dimensions = ["users", "songs", "artists", "time"];
    let first: Vec<_> = dimensions.iter().map(|t| data.dump_table(t)).collect();
    assert_eq!(data.count("songplays"), 3);

    run(&data.config()).unwrap();
    let second: Vec<_> = dimensions.iter().map(|t| data.dump_table(t)).collect();

    assert_eq!(first, second);
    // Songplays get a fresh surrogate key on every insert.
    assert_eq!(data.count("songplays"), 6);
}

#[test]
fn test_log_files_replay_in_timestamp_order() {
    let data = TestData::new();
    // Discovery order is a, b, c; replay order must be b, c, a.
    data.write_log("a.json", &[play(300, 7, "paid", "S", "A", 1.0)]);
    data.write_log("b.json", &[play(100, 7, "free", "S", "A", 1.0)]);
    data.write_log("c.json", &[play(200, 7, "free", "S", "A", 1.0)]);

    run(&data.config()).unwrap();

    let starts: Vec<i64> = data.songplays().into_iter().map(|p| p.0).collect();
    assert_eq!(starts, vec![100, 200, 300]);
    assert_eq!(data.user_level(7), Some("paid".to_string()));
}

#[test]
fn test_file_keyed_by_earliest_event_of_any_page() {
    let data = TestData::new();
    // b.json has a later song play but an earlier page view, so it loads first.
    data.write_log("a.json", &[play(200, 7, "paid", "S", "A", 1.0)]);
    data.write_log(
        "b.json",
        &[
            page_view(50, Some(7), "Home"),
            play(400, 7, "free", "S", "A", 1.0),
        ],
    );

    run(&data.config()).unwrap();

    let starts: Vec<i64> = data.songplays().into_iter().map(|p| p.0).collect();
    assert_eq!(starts, vec![400, 200]);
    assert_eq!(data.user_level(7), Some("paid".to_string()));
}

#[test]
fn test_latest_level_wins_within_a_file() {
    let data = TestData::new();
    data.write_log(
        "events.json",
        &[
            play(500, 7, "paid", "S", "A", 1.0),
            play(100, 7, "free", "S", "A", 1.0),
        ],
    );

    run(&data.config()).unwrap();

    assert_eq!(data.user_level(7), Some("paid".to_string()));
    // Songplays keep file order.
    let starts: Vec<i64> = data.songplays().into_iter().map(|p| p.0).collect();
    assert_eq!(starts, vec![500, 100]);
}

#[test]
fn test_unmatched_plays_get_null_references() {
    let data = with_known_song();
    data.write_log(
        "events.json",
        &[
            play(100, 7, "free", YOU_GOTTA_BE, DESREE, SONG_DURATION),
            play(200, 7, "free", YOU_GOTTA_BE, DESREE, SONG_DURATION + 1.0),
            play(300, 7, "free", YOU_GOTTA_BE, "Someone Else", SONG_DURATION),
        ],
    );

    run(&data.config()).unwrap();

    let plays = data.songplays();
    assert_eq!(
        plays[0],
        (
            100,
            7,
            Some("SOBONKR12A58A7A7E0".to_string()),
            Some("AR5KOSW1187FB35FF4".to_string())
        )
    );
    assert_eq!(plays[1], (200, 7, None, None));
    assert_eq!(plays[2], (300, 7, None, None));
}

#[test]
fn test_time_row_derivation() {
    let data = TestData::new();
    // 2018-11-11 02:33:56.796 UTC, a Sunday.
    data.write_log(
        "events.json",
        &[play(1_541_903_636_796, 7, "free", "S", "A", 1.0)],
    );

    run(&data.config()).unwrap();

    let row: (i64, i64, i64, i64, i64, i64, i64) = data
        .conn()
        .query_row(
            "SELECT start_time, hour, day, week_of_year, month, year, weekday FROM time",
            [],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .unwrap();
    assert_eq!(row, (1_541_903_636_796, 2, 11, 45, 11, 2018, 6));
}

#[test]
fn test_only_next_song_events_are_loaded() {
    let data = TestData::new();
    data.write_log(
        "events.json",
        &[
            page_view(100, None, "Home"),
            page_view(150, Some(3), "Settings"),
            play(200, 7, "free", "S", "A", 1.0),
            page_view(300, Some(7), "Logout"),
        ],
    );

    let summary = run(&data.config()).unwrap();

    assert_eq!(summary.logs.totals.skipped_events, 3);
    assert_eq!(data.count("songplays"), 1);
    assert_eq!(data.count("time"), 1);
    assert_eq!(data.count("users"), 1);
    assert_eq!(data.user_level(3), None);
}

#[test]
fn test_duplicate_start_keep_all_loads_both_in_path_order() {
    let data = TestData::new();
    data.write_log("x.json", &[play(100, 1, "free", "S", "A", 1.0)]);
    data.write_log("y.json", &[play(100, 2, "paid", "S", "A", 1.0)]);

    let summary = run(&data.config_with_policy(ReorderPolicy::KeepAll)).unwrap();

    assert_eq!(summary.logs.files_found, 2);
    assert_eq!(summary.logs.files_scheduled, 2);
    assert_eq!(summary.logs.files_processed, 2);
    let users: Vec<i64> = data.songplays().into_iter().map(|p| p.1).collect();
    assert_eq!(users, vec![1, 2]);
}

#[test]
fn test_duplicate_start_collapse_keeps_last_file() {
    let data = TestData::new();
    data.write_log("x.json", &[play(100, 1, "free", "S", "A", 1.0)]);
    data.write_log("y.json", &[play(100, 2, "paid", "S", "A", 1.0)]);
    data.write_log("z.json", &[play(50, 3, "free", "S", "A", 1.0)]);

    let summary = run(&data.config_with_policy(ReorderPolicy::CollapseDuplicates)).unwrap();

    assert_eq!(summary.logs.files_found, 3);
    assert_eq!(summary.logs.files_scheduled, 2);
    assert_eq!(summary.logs.files_processed, 2);
    let users: Vec<i64> = data.songplays().into_iter().map(|p| p.1).collect();
    assert_eq!(users, vec![3, 2]);
    assert_eq!(data.count("users"), 2);
}

#[test]
fn test_invalid_play_aborts_batch_after_committed_files() {
    let data = with_known_song();
    data.write_log("a.json", &[play(100, 7, "free", "S", "A", 1.0)]);
    let mut broken = play(200, 8, "free", "S", "A", 1.0);
    broken["userId"] = serde_json::json!("");
    data.write_log("b.json", &[play(150, 8, "paid", "S", "A", 1.0), broken]);
    data.write_log("c.json", &[play(300, 9, "free", "S", "A", 1.0)]);

    let result = run(&data.config());
    assert!(matches!(
        result,
        Err(EtlError::MissingField {
            line: 2,
            field: "userId",
            ..
        })
    ));

    // Songs and the first log file stay committed; b.json rolled back.
    assert_eq!(data.count("songs"), 1);
    assert_eq!(data.count("users"), 1);
    assert_eq!(data.user_level(7), Some("free".to_string()));
    let starts: Vec<i64> = data.songplays().into_iter().map(|p| p.0).collect();
    assert_eq!(starts, vec![100]);
}

#[test]
fn test_run_against_missing_database_creates_nothing() {
    let data = TestData::new();
    let mut config = data.config();
    config.db_path = data.dir.path().join("typo.db");

    let result = run(&config);
    assert!(matches!(result, Err(EtlError::Database(_))));
    assert!(!config.db_path.exists());
}

#[test]
fn test_run_requires_provisioned_warehouse() {
    let data = TestData::new();
    let mut config = data.config();
    config.db_path = data.dir.path().join("empty.db");
    rusqlite::Connection::open(&config.db_path)
        .unwrap()
        .close()
        .unwrap();

    let result = run(&config);
    assert!(matches!(result, Err(EtlError::Schema(_))));
}

#[test]
fn test_empty_log_file_aborts_reordering() {
    let data = TestData::new();
    data.write_log("a.json", &[play(100, 7, "free", "S", "A", 1.0)]);
    data.write_log("empty.json", &[]);

    let result = run(&data.config());
    assert!(matches!(result, Err(EtlError::EmptyFile(_))));
    assert_eq!(data.count("songplays"), 0);
}
