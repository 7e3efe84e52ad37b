use crate::rules::AssetRewrite;

/// Convert a duration label into total seconds.
/// The label may be in MM:SS or HH:MM:SS form; anything else, including
/// a missing or empty label, normalizes to 0.
pub fn parse_duration(text: Option<&str>) -> u64 {
    let Some(text) = text else { return 0 };
    if text.is_empty() {
        return 0;
    }

    let mut parts = Vec::new();
    for part in text.split(':') {
        match part.parse::<u64>() {
            Ok(n) => parts.push(n),
            Err(_) => return 0,
        }
    }

    match parts.as_slice() {
        [minutes, seconds] => minutes * 60 + seconds,
        [hours, minutes, seconds] => hours * 3600 + minutes * 60 + seconds,
        _ => 0,
    }
}

/// Format total seconds as HH:MM:SS, zero-padded. Hours are not wrapped
/// at 24.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Derive the playable asset URL from a thumbnail URL by rewriting the
/// storage-area segment and the frame-index suffix. Purely textual: a
/// thumbnail that does not follow the naming convention passes through
/// the replacements unchanged and yields a URL that may not resolve.
pub fn derive_video_asset(thumbnail: Option<&str>, rewrite: &AssetRewrite) -> Option<String> {
    thumbnail.map(|url| {
        url.replace(&rewrite.thumbnail_segment, &rewrite.asset_segment)
            .replace(&rewrite.thumbnail_suffix, &rewrite.asset_suffix)
    })
}

/// Capture the substring after the last literal `.` in a quote line,
/// trimmed. None when there is no `.` or nothing but whitespace follows.
pub fn date_tail(text: &str) -> Option<String> {
    let dot = text.rfind('.')?;
    let tail = text[dot + 1..].trim();
    if tail.is_empty() {
        None
    } else {
        Some(tail.to_string())
    }
}
