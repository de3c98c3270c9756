//! Parsed-export cache owned by the caller.
//!
//! A [`ChatCache`] maps group names to their parsed messages. Each group's
//! messages are stored once as an immutable [`Snapshot`]; requests clone the
//! `Arc` and read it without locking, while the owner of the cache decides
//! when to [`invalidate`](ChatCache::invalidate) or [`reload`](ChatCache::reload).
//!
//! Messages are sorted once at load time by their normalized timestamp.
//! The sort is stable and unparseable timestamps order before every parsed
//! one, so their relative file order is kept.
//!
//! ```rust
//! use chatpulse::core::cache::ChatCache;
//! use chatpulse::Message;
//!
//! let mut cache = ChatCache::new();
//! cache.insert_messages("Family", vec![
//!     Message::new("1/16/24, 9:00 AM", "Bob", "later"),
//!     Message::new("1/15/24, 9:00 AM", "Alice", "earlier"),
//! ]);
//!
//! let snapshot = cache.snapshot("Family")?;
//! assert_eq!(snapshot[0].body, "earlier");
//! # Ok::<(), chatpulse::ChatpulseError>(())
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::Message;
use crate::error::{ChatpulseError, Result};
use crate::parser::LogParser;

/// Read-only view of one group's messages.
pub type Snapshot = Arc<[Message]>;

/// A cached group.
#[derive(Debug, Clone)]
struct CachedGroup {
    source: Option<PathBuf>,
    messages: Snapshot,
}

/// Outcome of [`ChatCache::reload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Groups that were parsed again
    pub reloaded: Vec<String>,
    /// Groups whose source could not be read; their previous snapshot is kept
    pub failed: Vec<String>,
}

/// Cache of parsed chat exports keyed by group name.
#[derive(Debug, Clone, Default)]
pub struct ChatCache {
    parser: LogParser,
    groups: BTreeMap<String, CachedGroup>,
}

impl ChatCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an export and stores it under a name derived from the filename.
    ///
    /// Returns the group name.
    pub fn load_file(&mut self, path: &Path) -> Result<String> {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = group_name_from_file(&filename);
        self.insert_file(name.clone(), path)?;
        Ok(name)
    }

    /// Parses an export and stores it under `name`, replacing any previous entry.
    pub fn insert_file(&mut self, name: impl Into<String>, path: &Path) -> Result<()> {
        let name = name.into();
        let messages = self.parser.parse_file(path)?;
        info!(group = %name, count = messages.len(), path = %path.display(), "loaded export");
        self.groups.insert(
            name,
            CachedGroup {
                source: Some(path.to_path_buf()),
                messages: sorted_snapshot(messages),
            },
        );
        Ok(())
    }

    /// Stores already-parsed messages under `name`.
    ///
    /// Groups inserted this way have no source and are skipped by [`reload`](Self::reload).
    pub fn insert_messages(&mut self, name: impl Into<String>, messages: Vec<Message>) {
        self.groups.insert(
            name.into(),
            CachedGroup {
                source: None,
                messages: sorted_snapshot(messages),
            },
        );
    }

    /// Returns the messages of a group.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::UnknownGroup`] if the group is not cached.
    pub fn snapshot(&self, name: &str) -> Result<Snapshot> {
        self.groups
            .get(name)
            .map(|g| Arc::clone(&g.messages))
            .ok_or_else(|| ChatpulseError::UnknownGroup(name.to_string()))
    }

    /// Returns the cached group names in sorted order.
    pub fn groups(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Returns `true` if the group is cached.
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Drops a group. Outstanding snapshots stay valid.
    ///
    /// Returns `true` if the group was cached.
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.groups.remove(name).is_some()
    }

    /// Parses every file-backed group again.
    ///
    /// A group whose source can no longer be read keeps its old snapshot and
    /// is listed in [`ReloadSummary::failed`].
    pub fn reload(&mut self) -> ReloadSummary {
        let mut summary = ReloadSummary::default();

        for (name, group) in &mut self.groups {
            let Some(source) = group.source.as_deref() else {
                continue;
            };
            match self.parser.parse_file(source) {
                Ok(messages) => {
                    group.messages = sorted_snapshot(messages);
                    summary.reloaded.push(name.clone());
                }
                Err(err) => {
                    warn!(group = %name, path = %source.display(), error = %err, "reload failed");
                    summary.failed.push(name.clone());
                }
            }
        }

        info!(
            reloaded = summary.reloaded.len(),
            failed = summary.failed.len(),
            "cache reloaded"
        );
        summary
    }
}

/// Sorts messages by normalized timestamp, keeping file order for ties.
///
/// Messages without a parseable timestamp come first.
pub fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by_cached_key(Message::instant);
}

fn sorted_snapshot(mut messages: Vec<Message>) -> Snapshot {
    sort_chronologically(&mut messages);
    Arc::from(messages)
}

/// Derives a display name from an export filename.
///
/// Drops the extension, turns `_` and `-` into spaces and capitalizes each word.
///
/// ```
/// use chatpulse::core::cache::group_name_from_file;
///
/// assert_eq!(group_name_from_file("family_chat-2024.txt"), "Family Chat 2024");
/// ```
pub fn group_name_from_file(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
