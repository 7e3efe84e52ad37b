use clap::Parser;
use scraper::Html;
use std::fs;
use video_library_cli::{extractor::Extractor, rules::ExtractionRules, utils};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the saved video-library page snapshot
    #[arg(short, long, default_value = "video-library.html")]
    input: String,

    /// Path for the extracted JSON document
    #[arg(short, long, default_value = "video_library_data.json")]
    output: String,

    /// JSON file overriding the default extraction rules
    #[arg(short, long)]
    rules: Option<String>,

    /// Report fields that could not be extracted, per video
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 1) Load the extraction rules and compile the selectors
    let rules = match &args.rules {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => ExtractionRules::default(),
    };
    let extractor = Extractor::new(&rules)?;

    // 2) Read and parse the page snapshot; an unreadable input aborts
    //    the run with no output document
    let html = fs::read_to_string(&args.input)?;
    let doc = Html::parse_document(&html);

    // 3) Extract one record per matched card, in document order
    let extractions = extractor.extract_all(&doc);
    if args.verbose {
        for (index, extraction) in extractions.iter().enumerate() {
            if !extraction.missing_fields.is_empty() {
                eprintln!(
                    "⚠️ video {}: missing {}",
                    index,
                    extraction.missing_fields.join(", ")
                );
            }
        }
    }

    // 4) Aggregate and save the output document
    let report = Extractor::assemble(extractions);
    println!(
        "✅ Extracted information for {} videos.",
        report.summary.total_videos
    );
    println!("✅ Total duration: {}", report.summary.total_duration);
    utils::save_json(&serde_json::to_value(&report)?, &args.output)?;

    Ok(())
}
