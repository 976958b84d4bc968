//! Bounded, newest-first history of classification results.
//!
//! The history serializes to a JSON array of
//! `{thumbnail, result, result_detail, confidence, date}` objects, the
//! format kept under [`HISTORY_STORAGE_KEY`] in browser local storage.
//! Where it is persisted is abstracted behind [`HistoryStore`].

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::classify::Classification;

/// Maximum number of retained records.
pub const HISTORY_CAPACITY: usize = 50;

/// Local storage key holding the serialized history.
pub const HISTORY_STORAGE_KEY: &str = "skinScanHistory";

/// One saved classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The exported image (`data:` URL) that was classified.
    pub thumbnail: String,
    /// Headline label.
    pub result: String,
    /// Human-readable detail.
    pub result_detail: String,
    /// Confidence in percent.
    pub confidence: f64,
    /// When the record was saved.
    #[serde(serialize_with = "serialize_iso_millis")]
    pub date: DateTime<Utc>,
}

fn serialize_iso_millis<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl HistoryRecord {
    /// Record a classification of `thumbnail` made at `date`.
    #[must_use]
    pub fn new(thumbnail: String, classification: &Classification, date: DateTime<Utc>) -> Self {
        Self {
            thumbnail,
            result: classification.label.clone(),
            result_detail: classification.detail.clone(),
            confidence: classification.confidence_percent,
            date,
        }
    }

    /// The classification as originally displayed. Disclaimers are not
    /// stored, so the restored value has none.
    #[must_use]
    pub fn classification(&self) -> Classification {
        Classification {
            label: self.result.clone(),
            detail: self.result_detail.clone(),
            confidence_percent: self.confidence,
            disclaimer: None,
            raw_score: None,
        }
    }

    /// The save date in local time, e.g. `Oct 19, 2026, 03:04 PM`.
    #[must_use]
    pub fn formatted_date(&self) -> String {
        format_date(self.date)
    }
}

/// Format a date in local time, e.g. `Oct 19, 2026, 03:04 PM`.
#[must_use]
pub fn format_date(date: DateTime<Utc>) -> String {
    format_date_in(date, &chrono::Local)
}

/// Format a date in the given time zone.
#[must_use]
pub fn format_date_in<Tz>(date: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(tz)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}

/// Newest-first list of at most [`HISTORY_CAPACITY`] records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    /// An empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Parse stored JSON. Missing, corrupt or non-array data yields an
    /// empty history; oversized data is truncated.
    #[must_use]
    pub fn from_json(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::new();
        };
        match serde_json::from_str::<Option<Vec<HistoryRecord>>>(json) {
            Ok(records) => {
                let mut records = records.unwrap_or_default();
                records.truncate(HISTORY_CAPACITY);
                Self { records }
            }
            Err(e) => {
                tracing::warn!("discarding unreadable history: {e}");
                Self::new()
            }
        }
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.records)
    }

    /// Insert a record at the front, evicting the oldest beyond capacity.
    pub fn push_front(&mut self, record: HistoryRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAPACITY);
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// The record at `index` (0 is newest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryRecord> {
        self.records.get(index)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Persistent backing for a [`History`].
pub trait HistoryStore {
    /// Error from writing to the store.
    type Error: std::error::Error;

    /// Load the stored history. Unreadable data loads as empty.
    fn load(&self) -> History;

    /// Replace the stored history.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    fn store(&mut self, history: &History) -> Result<(), Self::Error>;

    /// Remove the stored history entirely.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the removal fails.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Load, prepend `record`, truncate and store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    fn append(&mut self, record: HistoryRecord) -> Result<History, Self::Error> {
        let mut history = self.load();
        history.push_front(record);
        self.store(&history)?;
        Ok(history)
    }
}

/// In-memory store holding the serialized form, for tests and headless
/// use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    /// A store pre-filled with raw JSON.
    #[must_use]
    pub const fn with_json(json: String) -> Self {
        Self { json: Some(json) }
    }

    /// The raw stored JSON, if any.
    #[must_use]
    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl HistoryStore for MemoryStore {
    type Error = serde_json::Error;

    fn load(&self) -> History {
        History::from_json(self.json.as_deref())
    }

    fn store(&mut self, history: &History) -> Result<(), Self::Error> {
        self.json = Some(history.to_json()?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.json = None;
        Ok(())
    }
}
