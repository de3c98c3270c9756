//! Message groupings prepared for an external summarizer.
//!
//! Nothing here calls a summarization service; these functions only shape a
//! filtered message list into the views such a service consumes.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::Message;
use crate::error::{ChatpulseError, Result};

/// Display format for per-user listings.
pub const DISPLAY_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// A message as shown in a per-user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMessage {
    /// Formatted with [`DISPLAY_FORMAT`], or the raw text if it does not parse
    pub timestamp: String,
    pub message: String,
}

impl UserMessage {
    fn from_message(msg: &Message) -> Self {
        let timestamp = msg
            .instant()
            .map(|ts| ts.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| msg.timestamp.clone());
        Self {
            timestamp,
            message: msg.body.clone(),
        }
    }
}

/// Messages from one calendar week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub messages: Vec<Message>,
}

/// Distinct senders in sorted order.
pub fn users_in(messages: &[Message]) -> Vec<String> {
    let mut users: Vec<String> = messages.iter().map(|m| m.sender.clone()).collect();
    users.sort();
    users.dedup();
    users
}

/// Every sender's messages in file order.
pub fn messages_by_user(messages: &[Message]) -> Result<BTreeMap<String, Vec<UserMessage>>> {
    if messages.is_empty() {
        return Err(ChatpulseError::no_data("messages by user: no messages"));
    }
    let mut grouped: BTreeMap<String, Vec<UserMessage>> = BTreeMap::new();
    for msg in messages {
        grouped
            .entry(msg.sender.clone())
            .or_default()
            .push(UserMessage::from_message(msg));
    }
    Ok(grouped)
}

/// Messages from one sender (exact name).
pub fn messages_for_user(messages: &[Message], user: &str) -> Result<Vec<UserMessage>> {
    let listing: Vec<UserMessage> = messages
        .iter()
        .filter(|m| m.sender == user)
        .map(UserMessage::from_message)
        .collect();
    if listing.is_empty() {
        return Err(ChatpulseError::no_data(format!("no messages from {user}")));
    }
    Ok(listing)
}

/// Returns the Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Groups dated messages by week, oldest first.
///
/// Messages without a parseable timestamp are left out.
pub fn weekly_buckets(messages: &[Message]) -> Result<Vec<WeekBucket>> {
    let mut weeks: BTreeMap<NaiveDate, Vec<Message>> = BTreeMap::new();
    for msg in messages {
        if let Some(date) = msg.date() {
            weeks.entry(week_start(date)).or_default().push(msg.clone());
        }
    }
    if weeks.is_empty() {
        return Err(ChatpulseError::no_data("weekly buckets: no dated messages"));
    }
    Ok(weeks
        .into_iter()
        .map(|(week_start, messages)| WeekBucket {
            week_start,
            messages,
        })
        .collect())
}

/// Renders `sender: body` lines, keeping the last `max_chars` characters.
pub fn transcript(messages: &[Message], max_chars: usize) -> Result<String> {
    if messages.is_empty() {
        return Err(ChatpulseError::no_data("transcript: no messages"));
    }
    let full = messages
        .iter()
        .map(Message::transcript_line)
        .collect::<Vec<_>>()
        .join("\n");

    let len = full.chars().count();
    if len <= max_chars {
        return Ok(full);
    }
    Ok(full.chars().skip(len - max_chars).collect())
}
