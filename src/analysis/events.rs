//! Group membership and administrative events.
//!
//! WhatsApp records joins, departures, removals and group changes as ordinary
//! lines in the export. Extraction is two-step: a cheap lowercase keyword
//! check picks **one** [`EventKind`] per message in priority order, then that
//! kind's capture pattern pulls out the actor and target. A keyword hit whose
//! pattern does not match yields no event and no other kind is tried.
//!
//! Priority order: `added`, `left`, `removed`, `changed_subject`,
//! `changed_icon`, `created`.
//!
//! ```rust
//! use chatpulse::analysis::events::{EventKind, extract_events};
//! use chatpulse::Message;
//!
//! let log = extract_events(&[
//!     Message::new("1/15/24, 9:00 AM", "System", "Alice added Bob"),
//!     Message::new("1/15/24, 9:05 AM", "System", "Carol left"),
//!     Message::new("1/15/24, 9:10 AM", "Dave", "good morning"),
//! ]);
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.of_kind(EventKind::Added).next().unwrap().target.as_deref(), Some("Bob"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::{OrderedCounter, percentage};
use crate::Message;
use crate::core::filter::FilterConfig;
use crate::error::{ChatpulseError, Result};
use crate::timestamp::normalize_timestamp;

/// Kind of a group event, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Someone added one or more participants
    Added,
    /// A participant left
    Left,
    /// Someone removed a participant
    Removed,
    /// The group subject changed
    ChangedSubject,
    /// The group icon changed
    ChangedIcon,
    /// The group was created
    Created,
}

impl EventKind {
    /// Every kind in classification priority order.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Added,
            EventKind::Left,
            EventKind::Removed,
            EventKind::ChangedSubject,
            EventKind::ChangedIcon,
            EventKind::Created,
        ]
    }

    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Added => "added",
            EventKind::Left => "left",
            EventKind::Removed => "removed",
            EventKind::ChangedSubject => "changed_subject",
            EventKind::ChangedIcon => "changed_icon",
            EventKind::Created => "created",
        }
    }

    /// Lowercase substrings that select this kind.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            EventKind::Added => &["added"],
            EventKind::Left => &["left"],
            EventKind::Removed => &["removed"],
            EventKind::ChangedSubject => &["changed the subject to"],
            EventKind::ChangedIcon => &["changed this group's icon", "changed this group\u{2019}s icon"],
            EventKind::Created => &["created group"],
        }
    }

    /// Capture pattern: group 1 is the actor, group 2 (if any) the target or new subject.
    pub fn pattern(self) -> &'static str {
        match self {
            EventKind::Added => r"(?i)(.+?) added (.+)",
            EventKind::Left => r"(?i)(.+?) left",
            EventKind::Removed => r"(?i)(.+?) removed (.+)",
            EventKind::ChangedSubject => r#"(?i)(.+?) changed the subject to ["\u{201C}](.+)["\u{201D}]"#,
            EventKind::ChangedIcon => r"(?i)(.+?) changed this group['\u{2019}]s icon",
            EventKind::Created => r"(?i)(.+?) created group",
        }
    }

    fn regex(self) -> &'static Regex {
        &EVENT_REGEXES[self as usize]
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ChatpulseError;

    fn from_str(s: &str) -> Result<Self> {
        EventKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChatpulseError::UnknownEventKind(s.to_string()))
    }
}

/// Indexed by `EventKind as usize`.
static EVENT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    EventKind::all()
        .iter()
        .map(|kind| Regex::new(kind.pattern()).expect("event patterns are valid regexes"))
        .collect()
});

/// One extracted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupEvent {
    /// What happened
    #[serde(skip)]
    pub kind: EventKind,
    /// Raw timestamp of the source message
    pub timestamp: String,
    /// Who did it; for `left` this is the person who left
    pub actor: String,
    /// Who it was done to (`added`, `removed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// New subject (`changed_subject`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Body of the source message
    pub raw_message: String,
}

impl GroupEvent {
    /// Returns `true` if `user` appears in the actor or target, ignoring case.
    pub fn involves(&self, user: &str) -> bool {
        let needle = user.to_lowercase();
        self.actor.to_lowercase().contains(&needle)
            || self
                .target
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&needle))
    }

    /// Converts to the uniform record used by drill-down views.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            event_type: self.kind,
            timestamp: self.timestamp.clone(),
            actor: self.actor.clone(),
            target: self.target.clone(),
            details: self.subject.clone(),
        }
    }
}

/// Kind-independent view of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub event_type: EventKind,
    pub timestamp: String,
    pub actor: String,
    pub target: Option<String>,
    pub details: Option<String>,
}

/// Picks the event kind a message body belongs to, if any.
///
/// Only the keyword check runs here; the capture pattern may still reject it.
pub fn classify(body: &str) -> Option<EventKind> {
    let lower = body.to_lowercase();
    EventKind::all()
        .iter()
        .copied()
        .find(|kind| kind.keywords().iter().any(|kw| lower.contains(kw)))
}

/// Extracts the event carried by a single message.
pub fn extract_event(msg: &Message) -> Option<GroupEvent> {
    let kind = classify(&msg.body)?;
    let caps = kind.regex().captures(&msg.body)?;
    let actor = caps.get(1)?.as_str().trim().to_string();
    let second = caps.get(2).map(|m| m.as_str().trim().to_string());

    let (target, subject) = match kind {
        EventKind::ChangedSubject => (None, second),
        _ => (second, None),
    };

    Some(GroupEvent {
        kind,
        timestamp: msg.timestamp.clone(),
        actor,
        target,
        subject,
        raw_message: msg.body.clone(),
    })
}

/// Scans messages for group events.
pub fn extract_events(messages: &[Message]) -> EventLog {
    let events = messages.iter().filter_map(extract_event).collect();
    EventLog { events }
}

/// Extracted events in encounter order.
///
/// Serializes as one list per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GroupEvent>,
}

impl EventLog {
    /// Returns every event in encounter order.
    pub fn events(&self) -> &[GroupEvent] {
        &self.events
    }

    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no events were found.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of one kind in encounter order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &GroupEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Number of events per kind.
    pub fn counts(&self) -> EventCounts {
        let mut counts = EventCounts::default();
        for event in &self.events {
            counts.increment(event.kind);
        }
        counts
    }

    /// The `limit` actors with the most removals, ties in first-seen order.
    pub fn top_removers(&self, limit: usize) -> Vec<(String, usize)> {
        let mut counter = OrderedCounter::new();
        for event in self.of_kind(EventKind::Removed) {
            counter.add(&event.actor);
        }
        counter.most_common(limit)
    }

    /// Events of one kind, optionally restricted to a date range.
    ///
    /// With a range, events whose timestamp does not normalize are excluded.
    pub fn details(&self, kind: EventKind, range: Option<&FilterConfig>) -> Vec<&GroupEvent> {
        self.of_kind(kind)
            .filter(|event| match range {
                Some(range) if range.has_date_filter() => {
                    normalize_timestamp(&event.timestamp).is_some_and(|ts| range.contains(ts))
                }
                _ => true,
            })
            .collect()
    }

    /// Events where `user` appears as actor or target, ignoring case.
    pub fn involving(&self, user: &str) -> Vec<&GroupEvent> {
        self.events.iter().filter(|e| e.involves(user)).collect()
    }

    /// Every event as a uniform record, in encounter order.
    pub fn records(&self) -> Vec<EventRecord> {
        self.events.iter().map(GroupEvent::to_record).collect()
    }

    /// Day-by-day counts, kind distribution, peak day and top contributors.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::NoData`] if there are no events.
    pub fn timeline(&self, contributor_limit: usize) -> Result<EventTimeline> {
        if self.events.is_empty() {
            return Err(ChatpulseError::no_data("event timeline: no events"));
        }

        let mut daily: BTreeMap<NaiveDate, EventCounts> = BTreeMap::new();
        let mut contributors = OrderedCounter::new();
        for event in &self.events {
            if let Some(ts) = normalize_timestamp(&event.timestamp) {
                daily.entry(ts.date()).or_default().increment(event.kind);
            }
            contributors.add(&event.actor);
        }

        let daily: Vec<DailyEvents> = daily
            .into_iter()
            .map(|(date, counts)| DailyEvents {
                date,
                total: counts.total(),
                counts,
            })
            .collect();

        let mut peak_day: Option<&DailyEvents> = None;
        for day in &daily {
            if peak_day.is_none_or(|peak| day.total > peak.total) {
                peak_day = Some(day);
            }
        }
        let peak_day = peak_day.cloned();

        let counts = self.counts();
        let total = counts.total();
        let distribution = EventKind::all()
            .iter()
            .map(|&kind| EventShare {
                event_type: kind,
                count: counts.get(kind),
                percentage: percentage(counts.get(kind), total),
            })
            .collect();

        Ok(EventTimeline {
            total_events: total,
            daily,
            distribution,
            peak_day,
            top_contributors: contributors.most_common(contributor_limit),
        })
    }
}

impl Serialize for EventLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EventKind::all().len()))?;
        for &kind in EventKind::all() {
            let events: Vec<&GroupEvent> = self.of_kind(kind).collect();
            map.serialize_entry(kind.as_str(), &events)?;
        }
        map.end()
    }
}

/// Number of events per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub added: usize,
    pub left: usize,
    pub removed: usize,
    pub changed_subject: usize,
    pub changed_icon: usize,
    pub created: usize,
}

impl EventCounts {
    /// Returns the count for `kind`.
    pub fn get(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Added => self.added,
            EventKind::Left => self.left,
            EventKind::Removed => self.removed,
            EventKind::ChangedSubject => self.changed_subject,
            EventKind::ChangedIcon => self.changed_icon,
            EventKind::Created => self.created,
        }
    }

    fn increment(&mut self, kind: EventKind) {
        let slot = match kind {
            EventKind::Added => &mut self.added,
            EventKind::Left => &mut self.left,
            EventKind::Removed => &mut self.removed,
            EventKind::ChangedSubject => &mut self.changed_subject,
            EventKind::ChangedIcon => &mut self.changed_icon,
            EventKind::Created => &mut self.created,
        };
        *slot += 1;
    }

    /// Sum over all kinds.
    pub fn total(&self) -> usize {
        EventKind::all().iter().map(|&k| self.get(k)).sum()
    }
}

/// Event counts for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyEvents {
    pub date: NaiveDate,
    pub total: usize,
    pub counts: EventCounts,
}

/// Share of one kind among all events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventShare {
    pub event_type: EventKind,
    pub count: usize,
    pub percentage: f64,
}

/// Aggregate view of events over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTimeline {
    pub total_events: usize,
    /// Only events with a parseable timestamp, oldest day first
    pub daily: Vec<DailyEvents>,
    pub distribution: Vec<EventShare>,
    /// Busiest day; the earliest one on ties
    pub peak_day: Option<DailyEvents>,
    pub top_contributors: Vec<(String, usize)>,
}
