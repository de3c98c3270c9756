//! Edge case tests for chatpulse
//!
//! These tests cover boundary conditions that the regular unit and
//! integration tests do not: odd input, empty results and unusual text.

use chatpulse::analysis::events::{EventKind, classify, extract_event};
use chatpulse::analysis::topics::EXAMPLE_CHARS;
use chatpulse::core::cache::sort_chronologically;
use chatpulse::prelude::*;
use chatpulse::timestamp::normalize_timestamp;

fn msg(ts: &str, sender: &str, body: &str) -> Message {
    Message::new(ts, sender, body)
}

// =========================================================================
// Parser edge cases
// =========================================================================

#[test]
fn test_empty_and_blank_input() {
    let parser = LogParser::new();
    assert!(parser.parse_str("").is_empty());
    assert!(parser.parse_str("\n\n   \n").is_empty());
}

#[test]
fn test_orphan_lines_are_dropped() {
    let messages = LogParser::new().parse_str(
        "exported by some tool\nanother stray line\n1/15/24, 9:00 AM - Alice: first",
    );
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body, "first");
}

#[test]
fn test_sender_stops_at_first_colon() {
    let messages = LogParser::new().parse_str("1/15/24, 9:00 AM - Bob: Re: the meeting at 10:30");
    assert_eq!(messages[0].sender, "Bob");
    assert_eq!(messages[0].body, "Re: the meeting at 10:30");
}

#[test]
fn test_phone_number_sender() {
    let messages = LogParser::new().parse_str("1/15/24, 9:00 AM - +1 (555) 010-0199: hello");
    assert_eq!(messages[0].sender, "+1 (555) 010-0199");
}

#[test]
fn test_unicode_senders_and_bodies() {
    let export = "\
1/15/24, 9:00 AM - Иван: Привет мир!
1/15/24, 9:01 AM - 田中太郎: こんにちは世界！
1/15/24, 9:02 AM - محمد: مرحبا بالعالم
1/15/24, 9:03 AM - User 🎉: Hello 👋 World 🌍";
    let messages = LogParser::new().parse_str(export);
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].sender, "Иван");
    assert_eq!(messages[1].body, "こんにちは世界！");
    assert_eq!(messages[3].sender, "User 🎉");
}

#[test]
fn test_blank_lines_inside_message_are_skipped() {
    let messages = LogParser::new().parse_str("1/15/24, 9:00 AM - Alice: one\n\n   \ntwo");
    assert_eq!(messages[0].body, "one\ntwo");
}

#[test]
fn test_empty_first_line_takes_continuation() {
    let mut message = msg("1/15/24, 9:00 AM", "Alice", "");
    message.append_line("media omitted");
    assert_eq!(message.body, "media omitted");
}

// =========================================================================
// Timestamp edge cases
// =========================================================================

#[test]
fn test_unparseable_timestamps() {
    assert!(normalize_timestamp("").is_none());
    assert!(normalize_timestamp("   ").is_none());
    assert!(normalize_timestamp("yesterday").is_none());
    assert!(normalize_timestamp("13/13/24, 10:00").is_none());
    assert!(normalize_timestamp("1/15/24, 25:00").is_none());
}

#[test]
fn test_unparseable_sort_first_and_keep_order() {
    let mut messages = vec![
        msg("1/16/24, 9:00 AM", "A", "late"),
        msg("garbled", "B", "x"),
        msg("1/15/24, 9:00 AM", "C", "early"),
        msg("also garbled", "D", "y"),
    ];
    sort_chronologically(&mut messages);
    let bodies: Vec<&str> = messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["x", "y", "early", "late"]);
}

// =========================================================================
// Filter edge cases
// =========================================================================

#[test]
fn test_invalid_filter_dates() {
    for bad in ["15/01/2024", "2024-13-01", "2024-02-30", "", "tomorrow"] {
        let err = filter_by_date(Vec::new(), Some(bad), None).unwrap_err();
        assert!(err.is_invalid_date(), "{bad} should be rejected");
    }
}

#[test]
fn test_end_date_covers_whole_day() {
    let messages = vec![
        msg("15/01/2024, 23:59:59", "A", "last second"),
        msg("16/01/2024, 00:00:00", "B", "next day"),
    ];
    let filtered = filter_by_date(messages, None, Some("2024-01-15")).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].body, "last second");
}

#[test]
fn test_date_filter_drops_unparseable_timestamps() {
    let messages = vec![msg("garbled", "A", "x"), msg("1/15/24, 9:00 AM", "B", "y")];
    let filtered = filter_by_date(messages.clone(), Some("2000-01-01"), None).unwrap();
    assert_eq!(filtered.len(), 1);

    // without bounds they stay
    assert_eq!(filter_by_date(messages, None, None).unwrap().len(), 2);
}

#[test]
fn test_inverted_range_is_empty() {
    let messages = vec![msg("1/15/24, 9:00 AM", "A", "x")];
    let filtered = filter_by_date(messages, Some("2024-01-20"), Some("2024-01-10")).unwrap();
    assert!(filtered.is_empty());
}

// =========================================================================
// Event edge cases
// =========================================================================

#[test]
fn test_left_keyword_inside_other_text() {
    // classified as `left` but still a plain message in a real chat
    let event = extract_event(&msg("t", "Bob", "I left my keys at the garden")).unwrap();
    assert_eq!(event.kind, EventKind::Left);
    assert_eq!(event.actor, "I");
}

#[test]
fn test_keyword_without_capture_is_not_an_event() {
    assert_eq!(classify("removed"), Some(EventKind::Removed));
    assert!(extract_event(&msg("t", "Bob", "removed")).is_none());
}

#[test]
fn test_curly_apostrophe_icon_change() {
    let event = extract_event(&msg("t", "Ann", "Ann changed this group\u{2019}s icon")).unwrap();
    assert_eq!(event.kind, EventKind::ChangedIcon);
    assert_eq!(event.actor, "Ann");
}

#[test]
fn test_event_matching_is_case_insensitive() {
    let event = extract_event(&msg("t", "Ann", "ANN ADDED BOB")).unwrap();
    assert_eq!(event.kind, EventKind::Added);
    assert_eq!(event.target.as_deref(), Some("BOB"));
}

#[test]
fn test_no_events_timeline_is_no_data() {
    let log = extract_events(&[msg("1/15/24, 9:00 AM", "A", "hello")]);
    assert!(log.is_empty());
    assert!(log.timeline(5).unwrap_err().is_no_data());
}

// =========================================================================
// Engine edge cases
// =========================================================================

#[test]
fn test_empty_input_is_no_data_everywhere() {
    let config = AnalysisConfig::default();
    assert!(analyze_sentiment(&[], &config).unwrap_err().is_no_data());
    assert!(extract_topics(&[], 5, &config).unwrap_err().is_no_data());
    assert!(calculate_activity(&[], &config).unwrap_err().is_no_data());
    assert!(compose_report(&[], Feature::all(), &config).unwrap_err().is_no_data());
}

#[test]
fn test_emoji_only_chat() {
    let messages = vec![
        msg("1/15/24, 9:00 AM", "A", "🎉🎉"),
        msg("1/15/24, 9:01 AM", "B", "👍"),
    ];
    let config = AnalysisConfig::default();

    let sentiment = analyze_sentiment(&messages, &config).unwrap();
    assert_eq!(sentiment.scoring_failures, 2);
    assert_eq!(sentiment.overall_sentiment.neutral, 2);
    assert!(sentiment.sentiment_scores.is_empty());

    assert!(extract_topics(&messages, 5, &config).unwrap_err().is_no_data());

    let report = compose_report(&messages, Feature::all(), &config).unwrap();
    assert!(report.topics.is_none());
    assert!(report.sentiment.is_some());
}

#[test]
fn test_undated_messages_are_counted_but_not_bucketed() {
    let messages = vec![msg("garbled", "A", "great news everyone")];
    let config = AnalysisConfig::default();

    let sentiment = analyze_sentiment(&messages, &config).unwrap();
    assert_eq!(sentiment.overall_sentiment.total(), 1);
    assert!(sentiment.daily_sentiment.is_empty());
    assert!(sentiment.sentiment_trend.is_empty());

    let activity = calculate_activity(&messages, &config).unwrap();
    assert_eq!(activity.total_messages, 1);
    assert!(activity.activity_by_hour.is_empty());
    assert!(activity.activity_by_day.is_empty());
}

#[test]
fn test_topic_examples_are_truncated() {
    let body = format!("marathon {}", "word ".repeat(40));
    let topics =
        extract_topics(&[msg("1/15/24, 9:00 AM", "A", &body)], 1, &AnalysisConfig::default())
            .unwrap();
    let example = &topics[0].examples[0].message;
    assert!(example.ends_with("..."));
    assert_eq!(example.chars().count(), EXAMPLE_CHARS + 3);
}

#[test]
fn test_threshold_is_strict() {
    let config = AnalysisConfig::default().with_sentiment_threshold(1.0);
    let report = analyze_sentiment(
        &[msg("1/15/24, 9:00 AM", "A", "I love this, it is wonderful!!!")],
        &config,
    )
    .unwrap();
    // polarity is clamped to 1.0 and must exceed the threshold to count
    assert_eq!(report.overall_sentiment.neutral, 1);
}

#[test]
fn test_unknown_names_are_errors() {
    assert!(matches!(
        "joined".parse::<EventKind>(),
        Err(ChatpulseError::UnknownEventKind(_))
    ));
    assert!(matches!(
        "summary".parse::<Feature>(),
        Err(ChatpulseError::UnknownFeature(_))
    ));
    assert!(matches!(
        ActivityScope::from_args(None, Some("2024-01-01"), None),
        Err(ChatpulseError::InvalidConfig { .. })
    ));
}
