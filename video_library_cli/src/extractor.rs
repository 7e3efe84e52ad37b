use crate::rules::{CompiledRules, ExtractionRules};
use crate::{normalize, stats, Extraction, LibraryReport, VideoRecord};
use scraper::{ElementRef, Html, Selector};

/// Walks a parsed snapshot of the video-library page: finds every card
/// matching the container signature (in document order) and pulls the
/// per-card fields out. Every field lookup is independent; a card
/// missing a sub-element yields a record with that field absent, never
/// an error.
pub struct Extractor {
    rules: CompiledRules,
}

impl Extractor {
    pub fn new(rules: &ExtractionRules) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            rules: rules.compile()?,
        })
    }

    /// Matched cards in document order, one extraction per card.
    /// No matches is an empty vector, not an error.
    pub fn extract_all(&self, doc: &Html) -> Vec<Extraction> {
        doc.select(&self.rules.container)
            .map(|block| self.extract_block(block))
            .collect()
    }

    /// Full pipeline: match, extract, aggregate.
    pub fn run(&self, doc: &Html) -> LibraryReport {
        Self::assemble(self.extract_all(doc))
    }

    /// Assemble the output document from per-card extractions,
    /// preserving their order. Split out of `run` so callers can
    /// inspect the diagnostics first.
    pub fn assemble(extractions: Vec<Extraction>) -> LibraryReport {
        let videos: Vec<VideoRecord> = extractions.into_iter().map(|e| e.record).collect();
        let summary = stats::aggregate(&videos);
        LibraryReport { summary, videos }
    }

    fn extract_block(&self, block: ElementRef) -> Extraction {
        let rules = &self.rules;

        let url = first_attr(block, &rules.link, &rules.link_attr);
        let id = url.as_deref().and_then(|target| {
            rules
                .id_pattern
                .captures(target)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        });

        let duration = first_text(block, &rules.duration);
        let duration_seconds = normalize::parse_duration(duration.as_deref());

        let thumbnail = first_attr(block, &rules.thumbnail, &rules.source_attr);
        let video_asset =
            normalize::derive_video_asset(thumbnail.as_deref(), &rules.asset_rewrite);

        let title = first_text(block, &rules.title);
        let recorder = first_text(block, &rules.recorder);

        let date = first_text(block, &rules.date)
            .and_then(|quote| normalize::date_tail(&quote));

        let avatar_url = first_attr(block, &rules.avatar, &rules.source_attr);

        let record = VideoRecord {
            url,
            id,
            duration,
            duration_seconds,
            thumbnail,
            video_asset,
            title,
            recorder,
            date,
            avatar_url,
        };

        let mut missing_fields = Vec::new();
        for (name, present) in [
            ("url", record.url.is_some()),
            ("id", record.id.is_some()),
            ("duration", record.duration.is_some()),
            ("thumbnail", record.thumbnail.is_some()),
            ("video_asset", record.video_asset.is_some()),
            ("title", record.title.is_some()),
            ("recorder", record.recorder.is_some()),
            ("date", record.date.is_some()),
            ("avatar_url", record.avatar_url.is_some()),
        ] {
            if !present {
                missing_fields.push(name);
            }
        }

        Extraction {
            record,
            missing_fields,
        }
    }
}

fn first_text(block: ElementRef, selector: &Selector) -> Option<String> {
    block
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn first_attr(block: ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    block
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::UNKNOWN_RECORDER;

    const CARD_CLASSES: &str =
        "group relative flex cursor-pointer flex-col overflow-hidden rounded-xl";

    fn two_card_page() -> String {
        format!(
            r#"<html><body>
            <div class="{cls}">
              <a href="/watch/415672"><span>open</span></a>
              <div class="absolute group-hover:hidden"> 5:00 </div>
              <img alt="video-thumbnail" src="https://cdn.test/139/videos/a/thumbnails/a.0000000.jpg">
              <h3>Weekly sync</h3>
              <span class="max-w-24 truncate">Alice</span>
              <blockquote>Recorded by Alice. Jan 1, 2024</blockquote>
              <img alt="@video-user-avatar" src="https://cdn.test/avatars/alice.png">
            </div>
            <div class="group relative flex">not a card</div>
            <div class="{cls}">
              <p>card with nothing extractable</p>
            </div>
            </body></html>"#,
            cls = CARD_CLASSES
        )
    }

    fn run_on(html: &str) -> LibraryReport {
        let extractor = Extractor::new(&ExtractionRules::default()).unwrap();
        extractor.run(&Html::parse_document(html))
    }

    #[test]
    fn extracts_all_fields_from_a_full_card() {
        let report = run_on(&two_card_page());
        let first = &report.videos[0];
        assert_eq!(first.url.as_deref(), Some("/watch/415672"));
        assert_eq!(first.id.as_deref(), Some("415672"));
        assert_eq!(first.duration.as_deref(), Some("5:00"));
        assert_eq!(first.duration_seconds, 300);
        assert_eq!(
            first.thumbnail.as_deref(),
            Some("https://cdn.test/139/videos/a/thumbnails/a.0000000.jpg")
        );
        assert_eq!(
            first.video_asset.as_deref(),
            Some("https://cdn.test/139/videos/a/recall/a.mp4")
        );
        assert_eq!(first.title.as_deref(), Some("Weekly sync"));
        assert_eq!(first.recorder.as_deref(), Some("Alice"));
        assert_eq!(first.date.as_deref(), Some("Jan 1, 2024"));
        assert_eq!(
            first.avatar_url.as_deref(),
            Some("https://cdn.test/avatars/alice.png")
        );
    }

    #[test]
    fn empty_card_yields_all_absent_fields() {
        let report = run_on(&two_card_page());
        let second = &report.videos[1];
        assert_eq!(second.url, None);
        assert_eq!(second.id, None);
        assert_eq!(second.duration, None);
        assert_eq!(second.duration_seconds, 0);
        assert_eq!(second.thumbnail, None);
        assert_eq!(second.video_asset, None);
        assert_eq!(second.title, None);
        assert_eq!(second.recorder, None);
        assert_eq!(second.date, None);
        assert_eq!(second.avatar_url, None);
    }

    #[test]
    fn partial_container_class_set_does_not_match() {
        let report = run_on(&two_card_page());
        assert_eq!(report.videos.len(), 2);
    }

    #[test]
    fn summary_covers_both_cards() {
        let report = run_on(&two_card_page());
        assert_eq!(report.summary.total_videos, 2);
        assert_eq!(report.summary.total_duration_seconds, 300);
        assert_eq!(report.summary.total_duration, "00:05:00");
        assert_eq!(report.summary.recorders.get("Alice"), Some(1));
        assert_eq!(report.summary.recorders.get(UNKNOWN_RECORDER), Some(1));
        assert_eq!(report.summary.recorders.total(), 2);
        assert_eq!(report.summary.most_recent_date.as_deref(), Some("Jan 1, 2024"));
    }

    #[test]
    fn json_omits_id_and_date_but_nulls_the_rest() {
        let report = run_on(&two_card_page());
        let value = serde_json::to_value(&report).unwrap();

        let second = value["videos"][1].as_object().unwrap();
        assert!(!second.contains_key("id"));
        assert!(!second.contains_key("date"));
        assert!(!second.contains_key("duration_seconds"));
        assert!(second["url"].is_null());
        assert!(second["duration"].is_null());
        assert!(second["thumbnail"].is_null());
        assert!(second["video_asset"].is_null());
        assert!(second["title"].is_null());
        assert!(second["recorder"].is_null());
        assert!(second["avatar_url"].is_null());

        let first = value["videos"][0].as_object().unwrap();
        assert!(first.contains_key("id"));
        assert!(first.contains_key("date"));
    }

    #[test]
    fn undated_library_omits_most_recent_date_key() {
        let html = format!(
            r#"<div class="{cls}"><h3>untitled</h3></div>"#,
            cls = CARD_CLASSES
        );
        let report = run_on(&html);
        let value = serde_json::to_value(&report).unwrap();
        let summary = value["summary"].as_object().unwrap();
        assert!(!summary.contains_key("most_recent_date"));
    }

    #[test]
    fn no_matching_cards_still_produces_a_report() {
        let report = run_on("<html><body><div class=\"group\">nope</div></body></html>");
        assert!(report.videos.is_empty());
        assert_eq!(report.summary.total_videos, 0);
        assert!(report.summary.recorders.is_empty());
        assert_eq!(report.summary.most_recent_date, None);
    }

    #[test]
    fn cards_keep_document_order() {
        let html = format!(
            r#"<div class="{cls}"><h3>first</h3></div>
               <div class="{cls}"><h3>second</h3></div>
               <div class="{cls}"><h3>third</h3></div>"#,
            cls = CARD_CLASSES
        );
        let report = run_on(&html);
        let titles: Vec<_> = report
            .videos
            .iter()
            .map(|v| v.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn link_without_watch_path_leaves_id_absent() {
        let html = format!(
            r#"<div class="{cls}"><a href="/library">all videos</a></div>"#,
            cls = CARD_CLASSES
        );
        let report = run_on(&html);
        assert_eq!(report.videos[0].url.as_deref(), Some("/library"));
        assert_eq!(report.videos[0].id, None);
    }

    #[test]
    fn diagnostics_name_defaulted_fields() {
        let extractor = Extractor::new(&ExtractionRules::default()).unwrap();
        let doc = Html::parse_document(&two_card_page());
        let extractions = extractor.extract_all(&doc);
        assert!(extractions[0].missing_fields.is_empty());
        assert_eq!(
            extractions[1].missing_fields,
            vec![
                "url",
                "id",
                "duration",
                "thumbnail",
                "video_asset",
                "title",
                "recorder",
                "date",
                "avatar_url"
            ]
        );
    }

    #[test]
    fn repeated_runs_serialize_identically() {
        let extractor = Extractor::new(&ExtractionRules::default()).unwrap();
        let doc = Html::parse_document(&two_card_page());
        let first = serde_json::to_string_pretty(&extractor.run(&doc)).unwrap();
        let second = serde_json::to_string_pretty(&extractor.run(&doc)).unwrap();
        assert_eq!(first, second);
    }
}
