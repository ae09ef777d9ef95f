//! Unit tests for queue status parsing and display

use signalq::models::queue::QueueStatus;

#[test]
fn status_round_trips_through_strings() {
    for status in [
        QueueStatus::Pending,
        QueueStatus::Entered,
        QueueStatus::Cancelled,
    ] {
        let parsed: QueueStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
        assert_eq!(status.to_string(), status.as_str());
    }
}

#[test]
fn status_parse_rejects_unknown_values() {
    assert!("pending".parse::<QueueStatus>().is_err());
    assert!("DONE".parse::<QueueStatus>().is_err());
    assert!("".parse::<QueueStatus>().is_err());
}
