use super::*;
use std::sync::Arc;

fn lines(tap: &TapPoint) -> Vec<String> {
    tap.recent().into_iter().map(|e| e.data).collect()
}

#[test]
fn test_from_config_disabled() {
    let config = TapConfig::default();
    assert!(TapPoint::from_config(&config).is_none());
}

#[test]
fn test_from_config_enabled() {
    let config = TapConfig {
        enabled: true,
        echo: true,
        capacity: 2,
    };
    let tap = TapPoint::from_config(&config).unwrap();

    for line in ["a", "b", "c"] {
        tap.record(&TapEntry::new(line));
    }

    assert_eq!(tap.tap_count(), 3);
    assert_eq!(lines(&tap), vec!["b", "c"]);
}

#[test]
fn test_zero_capacity_keeps_last_line() {
    let tap = TapPoint::new(0, false);
    tap.record(&TapEntry::new("first"));
    tap.record(&TapEntry::new("second"));

    assert_eq!(lines(&tap), vec!["second"]);
    assert_eq!(tap.tap_count(), 2);
}

#[test]
fn test_entries_keep_timestamp() {
    let tap = TapPoint::new(4, false);
    let entry = TapEntry::new("x");
    tap.record(&entry);

    assert_eq!(tap.recent()[0].timestamp, entry.timestamp);
}

#[test]
fn test_replay_to_log_reports_retained_lines() {
    let tap = TapPoint::new(3, false);
    assert_eq!(tap.replay_to_log(), 0);

    for i in 0..5 {
        tap.record(&TapEntry::new(format!("line-{i}")));
    }
    assert_eq!(tap.replay_to_log(), 3);
    // Replaying does not consume
    assert_eq!(lines(&tap), vec!["line-2", "line-3", "line-4"]);
}

#[test]
fn test_concurrent_records_are_all_counted() {
    let tap = Arc::new(TapPoint::new(8, false));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let tap = Arc::clone(&tap);
            std::thread::spawn(move || {
                for i in 0..50 {
                    tap.record(&TapEntry::new(format!("{t}-{i}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tap.tap_count(), 200);
    assert_eq!(tap.recent().len(), 8);
}
