//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - one subcommand per analysis
//! - [`OutputFormat`] - JSON layout of the printed result
//!
//! [`run`] executes a parsed command and returns the JSON value the binary
//! prints, so every subcommand can be exercised without spawning a process.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::Message;
use crate::analysis::activity::{ActivityScope, analyze_activity};
use crate::analysis::digest;
use crate::analysis::events::{EventKind, extract_events};
use crate::analysis::report::{Feature, compose_report};
use crate::analysis::sentiment::analyze_sentiment;
use crate::analysis::topics::extract_topics;
use crate::config::AnalysisConfig;
use crate::core::cache::ChatCache;
use crate::core::filter::{FilterConfig, apply_filters};
use crate::error::{ChatpulseError, Result};

/// Analyze exported WhatsApp group chats: membership events, sentiment,
/// topics and activity.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatpulse")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatpulse parse family.txt
    chatpulse sentiment family.txt --after 2024-01-01 --before 2024-01-31
    chatpulse topics family.txt --top 10
    chatpulse activity family.txt --day 2024-03-02
    chatpulse events family.txt --kind removed
    chatpulse report family.txt --features sentiment,events -f compact")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// JSON file overriding analysis settings
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output layout
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

/// The export to read and which of its messages to keep.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct InputArgs {
    /// Path to a WhatsApp TXT export
    pub input: PathBuf,

    /// Only messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Only messages on or before the end of this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Only messages from this sender; for `events`, events naming this user
    #[arg(long, value_name = "USER")]
    pub from: Option<String>,
}

impl InputArgs {
    /// Date filter from `--after` / `--before`.
    pub fn date_filter(&self) -> Result<FilterConfig> {
        FilterConfig::from_bounds(self.after.as_deref(), self.before.as_deref())
    }
}

/// Available analyses.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the parsed messages
    Parse {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Sentiment tallies, per-message scores and explained negative messages
    Sentiment {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Keywords and topic clusters
    Topics {
        #[command(flatten)]
        input: InputArgs,

        /// Number of topics to return
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// Message counts by user, hour and weekday, plus keyword frequencies
    Activity {
        #[command(flatten)]
        input: InputArgs,

        /// Hour-by-hour view of one day (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", conflicts_with_all = ["week_start", "week_end"])]
        day: Option<String>,

        /// First day of a weekly view (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", requires = "week_end")]
        week_start: Option<String>,

        /// Last day of a weekly view (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", requires = "week_start")]
        week_end: Option<String>,
    },

    /// Membership and administrative events
    Events {
        #[command(flatten)]
        input: InputArgs,

        /// List the events of one kind
        #[arg(long, value_name = "KIND")]
        kind: Option<String>,

        /// Day-by-day counts, distribution, peak day and top contributors
        #[arg(long, conflicts_with = "kind")]
        timeline: bool,
    },

    /// Users, per-user listings, weekly buckets and a transcript for summarizers
    Digest {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Several analyses in one result
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Comma-separated sections: sentiment, topics, activity, events, messages, all
        #[arg(long, value_delimiter = ',', default_value = "all")]
        features: Vec<String>,
    },
}

impl Command {
    /// The input options shared by every subcommand.
    pub fn input(&self) -> &InputArgs {
        match self {
            Command::Parse { input }
            | Command::Sentiment { input }
            | Command::Topics { input, .. }
            | Command::Activity { input, .. }
            | Command::Events { input, .. }
            | Command::Digest { input }
            | Command::Report { input, .. } => input,
        }
    }
}

/// JSON layout of the printed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented JSON (default)
    #[default]
    Pretty,

    /// Single-line JSON
    Compact,
}

impl OutputFormat {
    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["pretty", "compact"]
    }

    /// Serializes `value` in this layout.
    pub fn render(self, value: &Value) -> Result<String> {
        let rendered = match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
            OutputFormat::Compact => serde_json::to_string(value)?,
        };
        Ok(rendered)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Compact => write!(f, "compact"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "compact" | "json" => Ok(OutputFormat::Compact),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

impl Args {
    /// Loads the analysis settings, falling back to defaults.
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path),
            None => Ok(AnalysisConfig::default()),
        }
    }
}

/// Runs the command and returns its JSON result.
///
/// # Errors
///
/// Propagates file, date, configuration and "no data" errors.
pub fn run(args: &Args) -> Result<Value> {
    let config = args.analysis_config()?;
    let input = args.command.input();

    // validate dates before touching the file
    let date_filter = input.date_filter()?;
    let messages = load(&input.input)?;

    // events match --from against actor and target instead of the sender
    let filter = match (&args.command, &input.from) {
        (Command::Events { .. }, _) | (_, None) => date_filter,
        (_, Some(user)) => date_filter.with_sender(user.clone()),
    };
    let messages = apply_filters(messages, &filter);

    let value = match &args.command {
        Command::Parse { .. } => {
            if messages.is_empty() {
                return Err(ChatpulseError::no_data("no messages match the filters"));
            }
            serde_json::to_value(&messages)?
        }
        Command::Sentiment { .. } => serde_json::to_value(analyze_sentiment(&messages, &config)?)?,
        Command::Topics { top, .. } => {
            json!({ "topics": extract_topics(&messages, *top, &config)? })
        }
        Command::Activity {
            day,
            week_start,
            week_end,
            ..
        } => {
            let scope =
                ActivityScope::from_args(day.as_deref(), week_start.as_deref(), week_end.as_deref())?;
            serde_json::to_value(analyze_activity(&messages, scope, &config)?)?
        }
        Command::Events { kind, timeline, .. } => events(
            &messages,
            input.from.as_deref(),
            kind.as_deref(),
            *timeline,
            &config,
        )?,
        Command::Digest { .. } => digest_view(&messages, &config)?,
        Command::Report { features, .. } => {
            let features = Feature::parse_list(features)?;
            serde_json::to_value(compose_report(&messages, &features, &config)?)?
        }
    };
    Ok(value)
}

fn load(input: &Path) -> Result<Vec<Message>> {
    let mut cache = ChatCache::new();
    let group = cache.load_file(input)?;
    let snapshot = cache.snapshot(&group)?;
    info!(group = %group, messages = snapshot.len(), "export loaded");
    Ok(snapshot.to_vec())
}

fn events(
    messages: &[Message],
    user: Option<&str>,
    kind: Option<&str>,
    timeline: bool,
    config: &AnalysisConfig,
) -> Result<Value> {
    if messages.is_empty() {
        return Err(ChatpulseError::no_data("no messages match the filters"));
    }
    let log = extract_events(messages);

    if timeline {
        return Ok(serde_json::to_value(log.timeline(config.top_removers_limit)?)?);
    }

    if let Some(kind) = kind {
        let kind: EventKind = kind.parse()?;
        let details: Vec<_> = log
            .details(kind, None)
            .into_iter()
            .filter(|e| user.is_none_or(|u| e.involves(u)))
            .map(|e| e.to_record())
            .collect();
        return Ok(json!({ "event_type": kind, "events": details }));
    }

    if let Some(user) = user {
        let records: Vec<_> = log.involving(user).into_iter().map(|e| e.to_record()).collect();
        return Ok(json!({ "user": user, "events": records }));
    }

    Ok(json!({
        "event_counts": log.counts(),
        "top_removers": log.top_removers(config.top_removers_limit),
        "events": log,
    }))
}

fn digest_view(messages: &[Message], config: &AnalysisConfig) -> Result<Value> {
    let weeks: Vec<Value> = match digest::weekly_buckets(messages) {
        Ok(weeks) => weeks
            .iter()
            .map(|w| json!({ "week_start": w.week_start, "message_count": w.messages.len() }))
            .collect(),
        Err(err) if err.is_no_data() => Vec::new(),
        Err(err) => return Err(err),
    };

    Ok(json!({
        "users": digest::users_in(messages),
        "messages_by_user": digest::messages_by_user(messages)?,
        "weeks": weeks,
        "transcript": digest::transcript(messages, config.max_transcript_chars)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
1/15/24, 9:00 AM - Alice: Welcome to the garden club!
1/15/24, 9:01 AM - Alice: Alice added Bob
1/15/24, 9:05 AM - Bob: Thanks, I love this group
1/16/24, 6:30 PM - Carol: The delivery was late and the seeds are terrible
1/16/24, 6:31 PM - Alice: Alice removed Carol
";

    fn args_for(dir: &tempfile::TempDir, extra: &[&str]) -> Args {
        let path = dir.path().join("garden_club.txt");
        std::fs::write(&path, EXPORT).unwrap();
        let mut argv = vec!["chatpulse".to_string(), extra[0].to_string()];
        argv.push(path.to_string_lossy().into_owned());
        argv.extend(extra[1..].iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("pretty".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Compact);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_render() {
        let value = json!({ "a": 1 });
        assert_eq!(OutputFormat::Compact.render(&value).unwrap(), r#"{"a":1}"#);
        assert!(OutputFormat::Pretty.render(&value).unwrap().contains('\n'));
    }

    #[test]
    fn test_parse_command() {
        let dir = tempfile::tempdir().unwrap();
        let value = run(&args_for(&dir, &["parse"])).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 5);
        assert_eq!(value[0]["sender"], "Alice");
    }

    #[test]
    fn test_sender_filter() {
        let dir = tempfile::tempdir().unwrap();
        let value = run(&args_for(&dir, &["parse", "--from", "bob"])).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_events_command() {
        let dir = tempfile::tempdir().unwrap();
        let value = run(&args_for(&dir, &["events"])).unwrap();
        assert_eq!(value["event_counts"]["added"], 1);
        assert_eq!(value["top_removers"][0][0], "Alice");

        let value = run(&args_for(&dir, &["events", "--kind", "removed"])).unwrap();
        assert_eq!(value["events"][0]["target"], "Carol");

        let value = run(&args_for(&dir, &["events", "--from", "carol"])).unwrap();
        assert_eq!(value["events"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_events_default_view_honors_remover_limit() {
        let messages = vec![
            Message::new("1/15/24, 9:00 AM", "Alice", "Alice removed Carol"),
            Message::new("1/15/24, 9:01 AM", "Bob", "Bob removed Dave"),
            Message::new("1/15/24, 9:02 AM", "Bob", "Bob removed Erin"),
        ];
        let config = AnalysisConfig::default().with_top_removers_limit(1);
        let value = events(&messages, None, None, false, &config).unwrap();

        assert_eq!(value["event_counts"]["removed"], 3);
        assert_eq!(value["top_removers"], json!([["Bob", 2]]));
        assert_eq!(value["events"]["removed"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_event_kind() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args_for(&dir, &["events", "--kind", "joined"])).unwrap_err();
        assert!(matches!(err, ChatpulseError::UnknownEventKind(_)));
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args_for(&dir, &["sentiment", "--after", "15/01/2024"])).unwrap_err();
        assert!(err.is_invalid_date());
    }

    #[test]
    fn test_empty_filter_result_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args_for(&dir, &["sentiment", "--after", "2030-01-01"])).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_report_and_digest() {
        let dir = tempfile::tempdir().unwrap();
        let value = run(&args_for(&dir, &["report", "--features", "events,activity"])).unwrap();
        assert!(value.get("events").is_some());
        assert!(value.get("sentiment").is_none());

        let value = run(&args_for(&dir, &["digest"])).unwrap();
        assert_eq!(value["users"], json!(["Alice", "Bob", "Carol"]));
        assert_eq!(value["weeks"][0]["message_count"], 5);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["chatpulse", "sentiment"]).is_err());
    }

    #[test]
    fn test_week_range_needs_both_ends() {
        assert!(
            Args::try_parse_from(["chatpulse", "activity", "x.txt", "--week-start", "2024-01-01"])
                .is_err()
        );
    }
}
