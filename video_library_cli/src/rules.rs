use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Extraction rules as plain strings. The defaults encode the structural
/// conventions of the video-library page (card container classes,
/// alt-text sentinels, the watch-URL shape, the thumbnail→asset naming
/// convention). When the upstream markup drifts, override these from a
/// JSON file instead of touching code.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExtractionRules {
    /// Selector matching one video card.
    pub container: String,
    /// Selector for the card's link element.
    pub link: String,
    /// Attribute holding the link target.
    pub link_attr: String,
    /// Regex capturing the video id from the link target (group 1).
    pub id_pattern: String,
    /// Selector for the duration label (visible only off-hover).
    pub duration: String,
    /// Selector for the thumbnail image.
    pub thumbnail: String,
    /// Selector for the recorder's avatar image.
    pub avatar: String,
    /// Attribute holding image sources.
    pub source_attr: String,
    /// Selector for the card title.
    pub title: String,
    /// Selector for the recorder label.
    pub recorder: String,
    /// Selector for the quote block carrying the date line.
    pub date: String,
    /// Path segment replaced when deriving the playable asset URL.
    pub thumbnail_segment: String,
    pub asset_segment: String,
    /// Filename suffix replaced when deriving the playable asset URL.
    pub thumbnail_suffix: String,
    pub asset_suffix: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            container:
                "div.group.relative.flex.cursor-pointer.flex-col.overflow-hidden.rounded-xl"
                    .to_string(),
            link: "a[href]".to_string(),
            link_attr: "href".to_string(),
            id_pattern: r"/watch/(\d+)".to_string(),
            duration: r#"div[class~="group-hover:hidden"]"#.to_string(),
            thumbnail: r#"img[alt="video-thumbnail"]"#.to_string(),
            avatar: r#"img[alt="@video-user-avatar"]"#.to_string(),
            source_attr: "src".to_string(),
            title: "h3".to_string(),
            recorder: "span.max-w-24".to_string(),
            date: "blockquote".to_string(),
            thumbnail_segment: "thumbnails".to_string(),
            asset_segment: "recall".to_string(),
            thumbnail_suffix: ".0000000.jpg".to_string(),
            asset_suffix: ".mp4".to_string(),
        }
    }
}

impl ExtractionRules {
    /// Parse every selector and pattern once, up front. Any invalid
    /// entry is a configuration error and aborts the run.
    pub fn compile(&self) -> Result<CompiledRules, Box<dyn std::error::Error>> {
        Ok(CompiledRules {
            container: parse_selector(&self.container)?,
            link: parse_selector(&self.link)?,
            link_attr: self.link_attr.clone(),
            id_pattern: Regex::new(&self.id_pattern)
                .map_err(|e| format!("invalid id pattern {:?}: {}", self.id_pattern, e))?,
            duration: parse_selector(&self.duration)?,
            thumbnail: parse_selector(&self.thumbnail)?,
            avatar: parse_selector(&self.avatar)?,
            source_attr: self.source_attr.clone(),
            title: parse_selector(&self.title)?,
            recorder: parse_selector(&self.recorder)?,
            date: parse_selector(&self.date)?,
            asset_rewrite: AssetRewrite {
                thumbnail_segment: self.thumbnail_segment.clone(),
                asset_segment: self.asset_segment.clone(),
                thumbnail_suffix: self.thumbnail_suffix.clone(),
                asset_suffix: self.asset_suffix.clone(),
            },
        })
    }
}

fn parse_selector(raw: &str) -> Result<Selector, Box<dyn std::error::Error>> {
    Selector::parse(raw).map_err(|e| format!("invalid selector {:?}: {}", raw, e).into())
}

/// Ready-to-use form of the rules: selectors and the id regex parsed.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub container: Selector,
    pub link: Selector,
    pub link_attr: String,
    pub id_pattern: Regex,
    pub duration: Selector,
    pub thumbnail: Selector,
    pub avatar: Selector,
    pub source_attr: String,
    pub title: Selector,
    pub recorder: Selector,
    pub date: Selector,
    pub asset_rewrite: AssetRewrite,
}

/// The textual thumbnail→asset naming convention.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRewrite {
    pub thumbnail_segment: String,
    pub asset_segment: String,
    pub thumbnail_suffix: String,
    pub asset_suffix: String,
}
