pub mod extractor;
pub mod normalize;
pub mod rules;
pub mod stats;
pub mod utils;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One extracted video entry. Field order matches the JSON key order of
/// the output document. Every field except `duration_seconds` may be
/// absent independently; `id` and `date` are omitted from the JSON
/// entirely when absent, the rest serialize as explicit null.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct VideoRecord {
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub duration: Option<String>,
    /// Normalized duration; 0 when the label is absent or unparsable.
    /// Not part of the output document.
    #[serde(skip)]
    pub duration_seconds: u64,
    pub thumbnail: Option<String>,
    pub video_asset: Option<String>,
    pub title: Option<String>,
    pub recorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub avatar_url: Option<String>,
}

/// Summary statistics over the full record sequence.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LibrarySummary {
    pub total_videos: usize,
    pub total_duration: String,
    pub total_duration_seconds: u64,
    pub recorders: RecorderCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_date: Option<String>,
}

/// The final output document: summary plus records in document order.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LibraryReport {
    pub summary: LibrarySummary,
    pub videos: Vec<VideoRecord>,
}

/// Recorder label → video count, kept as a vector so iteration order
/// (count descending, first-seen on ties) survives serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecorderCounts(Vec<(String, u64)>);

impl RecorderCounts {
    pub fn bump(&mut self, label: &str) {
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 += 1,
            None => self.0.push((label.to_string(), 1)),
        }
    }

    /// Stable sort by count descending; equal counts keep first-seen order.
    pub fn sorted_by_count(mut self) -> Self {
        self.0.sort_by(|a, b| b.1.cmp(&a.1));
        self
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, c)| c).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, u64)> {
        self.0.iter()
    }
}

impl Serialize for RecorderCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// One per-block extraction result: the record plus the names of the
/// output fields that defaulted because their sub-element was missing.
/// The diagnostics never reach the output document.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: VideoRecord,
    pub missing_fields: Vec<&'static str>,
}
