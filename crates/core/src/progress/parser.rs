//! Classification of fetch tool output lines into progress signals.
//!
//! The tool's output is not a stable contract, so recognition is a table of
//! independent rules. Each rule belongs to a [`SignalKind`]; for a given line
//! the first matching rule of each kind wins and lines matching nothing are
//! ignored. New patterns are added to the table, not to control flow.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

use super::types::ProgressRecord;
use crate::album::title_from_path;

/// Category of a recognized signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    PlaylistSize,
    ItemProgress,
    Title,
    Completion,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlaylistSize => "playlist_size",
            Self::ItemProgress => "item_progress",
            Self::Title => "title",
            Self::Completion => "completion",
        }
    }
}

/// A progress fact extracted from one output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressSignal {
    /// The playlist announced how many entries it has.
    PlaylistSize(u32),
    /// Item `current` of `total` started downloading.
    ItemProgress { current: u32, total: u32 },
    /// Title of the item being fetched.
    Title(String),
    /// An item finished downloading or extracting.
    Completion,
}

impl ProgressSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::PlaylistSize(_) => SignalKind::PlaylistSize,
            Self::ItemProgress { .. } => SignalKind::ItemProgress,
            Self::Title(_) => SignalKind::Title,
            Self::Completion => SignalKind::Completion,
        }
    }

    /// Applies the signal to a record.
    pub fn apply(&self, record: &mut ProgressRecord) {
        match self {
            Self::PlaylistSize(total) => {
                // Later announcements may be scoped differently; the first one sticks
                if !record.total_discovered {
                    record.total = *total;
                    record.total_discovered = true;
                    record.clamp();
                }
                record.mark_downloading();
            }
            Self::ItemProgress { current, total } => {
                record.total = *total;
                record.total_discovered = true;
                record.advance_to(*current);
                record.mark_downloading();
            }
            Self::Title(title) => {
                record.current_title = Some(title.clone());
            }
            Self::Completion => {
                // Only meaningful for single items, which never see ItemProgress
                if record.total == 1 && record.current == 0 {
                    record.current = 1;
                    record.mark_downloading();
                }
            }
        }
    }
}

/// One entry of the rule table.
struct LineRule {
    kind: SignalKind,
    pattern: Regex,
    extract: fn(&Captures<'_>) -> Option<ProgressSignal>,
}

impl LineRule {
    fn new(
        kind: SignalKind,
        pattern: &str,
        extract: fn(&Captures<'_>) -> Option<ProgressSignal>,
    ) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("progress rule pattern"),
            extract,
        }
    }
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn playlist_size(caps: &Captures<'_>) -> Option<ProgressSignal> {
    number(caps, 1).map(ProgressSignal::PlaylistSize)
}

fn item_progress(caps: &Captures<'_>) -> Option<ProgressSignal> {
    Some(ProgressSignal::ItemProgress {
        current: number(caps, 1)?,
        total: number(caps, 2)?,
    })
}

fn title(caps: &Captures<'_>) -> Option<ProgressSignal> {
    title_from_path(caps.get(1)?.as_str()).map(ProgressSignal::Title)
}

fn completion(_: &Captures<'_>) -> Option<ProgressSignal> {
    Some(ProgressSignal::Completion)
}

static RULES: Lazy<Vec<LineRule>> = Lazy::new(|| {
    vec![
        // [youtube:tab] Playlist Mix: Downloading 3 items of 3
        LineRule::new(
            SignalKind::PlaylistSize,
            r"(?i)^\[[^\]]+\]\s+playlist\b.*:\s*downloading\s+(\d+)\s+(?:videos|items|entries)\b",
            playlist_size,
        ),
        // Loose fallback: "[extractor] Playlist ... 12 videos"
        LineRule::new(
            SignalKind::PlaylistSize,
            r"(?i)^\[[^\]]+\]\s+(?:downloading\s+)?playlist\b.*?\b(\d+)\s+(?:videos|items|entries)\b",
            playlist_size,
        ),
        // [download] Downloading item 2 of 3
        LineRule::new(
            SignalKind::ItemProgress,
            r"(?i)^\[[^\]]+\]\s+downloading\s+(?:video|item)\s+(\d+)\s+of\s+(\d+)",
            item_progress,
        ),
        // [download] Destination: /data/jobs/<id>/01 - Song.webm
        LineRule::new(SignalKind::Title, r"\bDestination:\s*(.+?)\s*$", title),
        // [download] /data/jobs/<id>/01 - Song.mp3 has already been downloaded
        LineRule::new(
            SignalKind::Title,
            r"^\[download\]\s+(.+?)\s+has already been downloaded",
            title,
        ),
        // [download] 100% of 3.51MiB in 00:00:01
        LineRule::new(
            SignalKind::Completion,
            r"^\[download\]\s+100(?:\.0+)?%",
            completion,
        ),
        // [ExtractAudio] Destination: ... / Not converting audio ...
        LineRule::new(SignalKind::Completion, r"^\[ExtractAudio\]", completion),
    ]
});

/// Extracts every signal carried by one output line, in rule-table order.
pub fn parse_line(line: &str) -> Vec<ProgressSignal> {
    let line = line.trim_end();
    let mut matched: Vec<SignalKind> = Vec::new();
    let mut signals = Vec::new();

    for rule in RULES.iter() {
        if matched.contains(&rule.kind) {
            continue;
        }
        let Some(caps) = rule.pattern.captures(line) else {
            continue;
        };
        if let Some(signal) = (rule.extract)(&caps) {
            matched.push(rule.kind);
            signals.push(signal);
        }
    }

    signals
}
