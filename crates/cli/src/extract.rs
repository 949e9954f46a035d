// wardpop extract - page dump to population CSV

use std::path::{Path, PathBuf};

use serde::Serialize;
use wardpop_extract::{ExtractConfig, ExtractionStats, Extractor};

use crate::config::PipelineConfig;
use crate::{to_json, CliError};

#[derive(Debug, Serialize)]
pub struct ExtractSummary {
    pub pages: usize,
    pub records: usize,
    pub output: PathBuf,
    pub stats: ExtractionStats,
}

pub fn cmd_extract(
    pages: PathBuf,
    out: PathBuf,
    config: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let extract_config = match config {
        Some(path) => PipelineConfig::load(&path)?.extract,
        None => ExtractConfig::default(),
    };

    let summary = run_extract(&pages, &out, extract_config)?;

    if json {
        println!("{}", to_json(&summary)?);
    } else if !quiet {
        print_summary(&summary);
    }
    Ok(())
}

/// Read the page dump, extract, and write the CSV.
pub fn run_extract(pages: &Path, out: &Path, config: ExtractConfig) -> Result<ExtractSummary, CliError> {
    let extractor = Extractor::new(config)?;
    let dump = wardpop_io::read_pages(pages)?;
    let page_count = dump.len();

    let extraction = extractor.extract(dump);
    if extraction.records.is_empty() {
        log::warn!("no ward records found in {}", pages.display());
    }
    wardpop_io::write_population(out, &extraction.records)?;

    Ok(ExtractSummary {
        pages: page_count,
        records: extraction.records.len(),
        output: out.to_path_buf(),
        stats: extraction.stats,
    })
}

pub fn print_summary(summary: &ExtractSummary) {
    let stats = &summary.stats;
    eprintln!("extract: {} pages, {} ward records", summary.pages, summary.records);
    eprintln!(
        "  regions entered: {}  councils entered: {}  summary pages skipped: {}",
        stats.region_changes, stats.council_changes, stats.summary_pages,
    );
    if stats.duplicates_removed > 0 {
        eprintln!("  duplicates removed: {}", stats.duplicates_removed);
    }
    let rejected = stats.rejected_total();
    if rejected > 0 {
        let detail: Vec<String> = stats
            .rejected
            .iter()
            .map(|(reason, count)| format!("{reason}: {count}"))
            .collect();
        eprintln!("  rows rejected: {} ({})", rejected, detail.join(", "));
    }
    eprintln!("  wrote {}", summary.output.display());
}
