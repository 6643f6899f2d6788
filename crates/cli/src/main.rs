//! CLI tool for extracting documentation updates from PowerPoint session decks.

use anyhow::{Context, Result};
use clap::Parser;
use slidedoc_core::{
    default_report_filename, module_acronym, CorpusExtractor, CorpusResults, DeckRecord,
    ReportModel,
};
use slidedoc_docx::DocxReportWriter;
use slidedoc_pptx::PptxParser;
use std::path::{Path, PathBuf};

/// Maximum characters of a goal, assessment or material shown in the breakdown.
const BREAKDOWN_ITEM_CHARS: usize = 50;

/// Extract vocabulary, goals, assessments, careers and materials from
/// PowerPoint files into a documentation updates report.
#[derive(Parser, Debug)]
#[command(name = "slidedoc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing PowerPoint files (default: current directory)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Output Word document filename (default: "<ACRONYM>_Doc Updates & Tickets.docx")
    #[arg(short, long)]
    output: Option<String>,

    /// Module acronym (default: taken from the first file name)
    #[arg(short, long)]
    acronym: Option<String>,

    /// Show color and formatting analysis of every run
    #[arg(long)]
    debug: bool,

    /// Print the extracted records as JSON instead of writing the report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let directory = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    // stdout carries only the records in JSON mode
    let verbose = !args.json;
    if verbose {
        println!("Scanning directory: {}", directory.display());
    }

    let decks = find_decks(&directory)?;
    if decks.is_empty() {
        eprintln!("No PowerPoint files found in the directory.");
        return Ok(());
    }

    if verbose {
        println!("Found {} PowerPoint files to process:", decks.len());
        for deck in &decks {
            println!("  - {}", file_name(deck));
        }
        println!("\nProcessing files...");
    }

    let results = CorpusExtractor::new().extract_all(&PptxParser::new(), &decks);

    if args.json {
        let json = serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
        println!("{}", json);
        return Ok(());
    }

    if results.is_empty() {
        println!("No content found in any PowerPoint files.");
        return Ok(());
    }

    let acronym = args
        .acronym
        .clone()
        .unwrap_or_else(|| module_acronym(&file_name(&decks[0])));
    let output_path = directory.join(output_filename(&args, &acronym));

    let model = ReportModel::build(acronym.as_str(), &results);
    DocxReportWriter::new()
        .write_to_path(&model, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    println!("\nWord document saved as: {}", output_path.display());

    print_summary(&results, &model, &output_path);
    Ok(())
}

/// All `.pptx` files in a directory, sorted by file name. Office lock files
/// (`~$deck.pptx`) are skipped.
fn find_decks(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("Failed to read directory {}", directory.display()))?;

    let mut decks = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", directory.display()))?
            .path();
        if path.is_file() && is_deck_file(&path) {
            decks.push(path);
        }
    }
    decks.sort_by_key(|p| file_name(p));
    Ok(decks)
}

fn is_deck_file(path: &Path) -> bool {
    let is_pptx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pptx"));
    is_pptx && !file_name(path).starts_with("~$")
}

fn file_name(path: &Path) -> String {
    slidedoc_core::corpus::display_name(path)
}

/// An explicit acronym always decides the output name; otherwise `--output`
/// or the default name for the detected acronym.
fn output_filename(args: &Args, acronym: &str) -> String {
    match (&args.acronym, &args.output) {
        (Some(_), _) | (None, None) => default_report_filename(acronym),
        (None, Some(output)) => output.clone(),
    }
}

fn truncate_item(item: &str) -> String {
    if item.chars().count() > BREAKDOWN_ITEM_CHARS {
        let head: String = item.chars().take(BREAKDOWN_ITEM_CHARS).collect();
        format!("{}...", head)
    } else {
        item.to_string()
    }
}

fn print_summary(results: &CorpusResults, model: &ReportModel, output_path: &Path) {
    let summary = &model.summary;
    println!("\nSummary:");
    println!("  - Files processed: {}", results.entries.len());
    println!("  - Total vocabulary terms extracted: {}", summary.vocabulary);
    println!("  - Total session goals extracted: {}", summary.goals);
    println!("  - Total assessment items extracted: {}", summary.assessments);
    println!("  - Total careers extracted: {}", summary.careers);
    println!("  - Total session materials extracted: {}", summary.materials);
    println!("  - Output file: {}", output_path.display());
    if !results.skipped.is_empty() {
        println!("  - Files skipped: {}", results.skipped.join(", "));
    }

    println!("\nDetailed breakdown:");
    for entry in &results.entries {
        print_breakdown(&entry.filename, &entry.record);
    }
}

fn print_breakdown(filename: &str, record: &DeckRecord) {
    println!(
        "  {}: {} vocab, {} goals, {} assessments, {} careers, {} materials",
        filename,
        record.vocabulary.len(),
        record.goals.len(),
        record.assessments.len(),
        record.careers.len(),
        record.materials.len()
    );
    for item in &record.vocabulary {
        println!("    • Vocab: {}", item.term);
    }
    for goal in &record.goals {
        println!("    • Goal: {}", truncate_item(goal));
    }
    for assessment in &record.assessments {
        println!("    • Assessment: {}", truncate_item(assessment));
    }
    for career in &record.careers {
        println!("    • Career: {}", career);
    }
    for material in &record.materials {
        println!("    • Material: {}", truncate_item(material));
    }
}
