use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use lucky_draw::history::{HistorySink, JsonlHistory, MemoryHistory};
use lucky_draw::state::DrawRecord;

fn record(sequence: u64, prize: Option<&str>, winners: &[&str]) -> DrawRecord {
    DrawRecord {
        sequence,
        timestamp: Utc::now(),
        prize: prize.map(str::to_string),
        winners: winners.iter().map(|w| w.to_string()).collect(),
        total_participants: 10,
        total_tickets: 14,
    }
}

fn scratch_file(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("lucky-draw-{tag}-{}-{nanos}.jsonl", std::process::id()))
}

#[test]
fn test_memory_history_lists_most_recent_last() {
    let history = MemoryHistory::new();
    assert_eq!(history.last_sequence().unwrap(), None);

    for sequence in 1..=4 {
        history.append(&record(sequence, None, &["a"])).unwrap();
    }

    let recent = history.list_recent(2).unwrap();
    let sequences: Vec<u64> = recent.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, [3, 4]);
    assert_eq!(history.list_recent(50).unwrap().len(), 4);
    assert_eq!(history.last_sequence().unwrap(), Some(4));
}

#[test]
fn test_appended_record_comes_back_unchanged() {
    let history = MemoryHistory::new();
    let drawn = record(7, Some("Headphones"), &["carol", "bob"]);

    history.append(&drawn).unwrap();

    let recent = history.list_recent(1).unwrap();
    assert_eq!(recent[0].sequence, 7);
    assert_eq!(recent[0].prize.as_deref(), Some("Headphones"));
    assert_eq!(recent[0].winners, ["carol", "bob"]);
}

#[test]
fn test_jsonl_history_survives_reopen() {
    let path = scratch_file("reopen");

    {
        let history = JsonlHistory::open(&path).unwrap();
        history.append(&record(1, Some("Mug"), &["alice"])).unwrap();
        history.append(&record(2, None, &["bob", "erin"])).unwrap();
        assert_eq!(history.export_path(), path.as_path());
    }

    let reopened = JsonlHistory::open(&path).unwrap();
    assert_eq!(reopened.last_sequence().unwrap(), Some(2));

    let recent = reopened.list_recent(10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].prize.as_deref(), Some("Mug"));
    assert_eq!(recent[1].winners, ["bob", "erin"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_jsonl_history_skips_damaged_lines() {
    let path = scratch_file("damaged");
    let good = serde_json::to_string(&record(3, None, &["zed"])).unwrap();
    std::fs::write(&path, format!("{good}\nnot json\n\n")).unwrap();

    let history = JsonlHistory::open(&path).unwrap();
    assert_eq!(history.list_recent(10).unwrap().len(), 1);
    assert_eq!(history.last_sequence().unwrap(), Some(3));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_jsonl_history_recovers_from_torn_append() {
    let path = scratch_file("torn");
    let first = serde_json::to_string(&record(1, None, &["amy"])).unwrap();
    let second = serde_json::to_string(&record(2, Some("Mug"), &["ben"])).unwrap();
    let torn = &second[..second.len() / 2];
    std::fs::write(&path, format!("{first}\n{torn}")).unwrap();

    let history = JsonlHistory::open(&path).unwrap();
    // The torn draw's number stays used
    assert_eq!(history.last_sequence().unwrap(), Some(2));
    history.append(&record(3, None, &["cat"])).unwrap();

    let reopened = JsonlHistory::open(&path).unwrap();
    let sequences: Vec<u64> = reopened
        .list_recent(10)
        .unwrap()
        .iter()
        .map(|r| r.sequence)
        .collect();
    assert_eq!(sequences, [1, 3]);
    assert_eq!(reopened.last_sequence().unwrap(), Some(3));

    let _ = std::fs::remove_file(&path);
}
