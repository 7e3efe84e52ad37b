use crate::normalize;
use crate::{LibrarySummary, RecorderCounts, VideoRecord};

/// Label used when a record carries no recorder.
pub const UNKNOWN_RECORDER: &str = "Unknown";

/// Fold the full record sequence into summary statistics.
pub fn aggregate(videos: &[VideoRecord]) -> LibrarySummary {
    let total_duration_seconds: u64 = videos.iter().map(|v| v.duration_seconds).sum();

    let recorders = videos
        .iter()
        .fold(RecorderCounts::default(), |mut counts, video| {
            counts.bump(video.recorder.as_deref().unwrap_or(UNKNOWN_RECORDER));
            counts
        })
        .sorted_by_count();

    // Plain lexicographic maximum; the date labels are free text and are
    // never interpreted as calendar dates.
    let most_recent_date = videos
        .iter()
        .filter_map(|v| v.date.as_deref())
        .max()
        .map(str::to_string);

    LibrarySummary {
        total_videos: videos.len(),
        total_duration: normalize::format_duration(total_duration_seconds),
        total_duration_seconds,
        recorders,
        most_recent_date,
    }
}
