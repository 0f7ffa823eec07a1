mod csv;
mod fetch;
mod parser;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::warn;

/// Exam page scraped when no URL argument is given.
const DEFAULT_EXAM_URL: &str =
    "https://itexamanswers.net/ccna-2-v7-0-final-exam-answers-full-switching-routing-and-wireless-essentials.html";

const DEFAULT_ANSWER_FILE: &str = "scraped_numbered_questions_final.csv";

#[derive(Parser)]
#[command(name = "exam_scraper", about = "Numbered question/answer scraper for exam pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one exam page and save its numbered questions to CSV
    Scrape {
        /// Page URL to scrape
        #[arg(default_value = DEFAULT_EXAM_URL)]
        url: String,
        /// Destination CSV file
        #[arg(short, long, default_value = DEFAULT_ANSWER_FILE)]
        out: PathBuf,
        /// Skip echoing each extracted pair
        #[arg(short, long)]
        quiet: bool,
    },
    /// Search a saved answer file by question text
    Search {
        /// Text to look for (case-insensitive)
        query: String,
        /// Answer file to search
        #[arg(short, long, default_value = DEFAULT_ANSWER_FILE)]
        file: PathBuf,
        /// Max matches to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show summary counts for a saved answer file
    Stats {
        /// Answer file to summarize
        #[arg(short, long, default_value = DEFAULT_ANSWER_FILE)]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { url, out, quiet } => run_scrape(&url, &out, quiet),
        Commands::Search { query, file, limit } => {
            if csv::query_too_short(&query) {
                println!("Query too short (minimum {} characters).", csv::MIN_QUERY_LEN);
                return Ok(());
            }

            let pairs = csv::read_pairs(&file)?;
            println!("{} answers loaded from {}", pairs.len(), file.display());

            let found = csv::search_pairs(&pairs, &query, limit);
            if found.total == 0 {
                println!("No questions match \"{query}\".");
                return Ok(());
            }
            for pair in &found.hits {
                println!("\n**Q:** {}", pair.question);
                println!("**A:** {}", pair.answer);
            }
            if found.total > found.hits.len() {
                println!("\nShowing {} of {} matches.", found.hits.len(), found.total);
            }
            Ok(())
        }
        Commands::Stats { file } => {
            let pairs = csv::read_pairs(&file)?;
            let images = pairs.iter().filter(|p| p.is_image_answer()).count();
            let unanswered = pairs.iter().filter(|p| p.is_unanswered()).count();

            println!("Answer file: {}", file.display());
            println!("  Total:      {}", pairs.len());
            println!("  Answered:   {}", pairs.len() - images - unanswered);
            println!("  Images:     {}", images);
            println!("  Unanswered: {}", unanswered);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// One scrape run: fetch, extract, echo, save. A failed fetch or an empty
/// extraction is reported and leaves the destination untouched.
fn run_scrape(url: &str, out: &Path, quiet: bool) -> anyhow::Result<()> {
    let page = match fetch::fetch_page(url) {
        Ok(page) => page,
        Err(e) => {
            warn!("fetch failed: {e}");
            println!("Error fetching the URL: {e}");
            return Ok(());
        }
    };

    let pairs = parser::extract_pairs(&page.body, &page.url);
    if pairs.is_empty() {
        println!("No data to save.");
        return Ok(());
    }

    if !quiet {
        echo_pairs(&pairs);
    }

    csv::write_pairs(out, &pairs)?;
    println!("Data successfully saved to {}", out.display());
    Ok(())
}

/// Print every extracted pair as the labeled block mirrored by the CSV.
fn echo_pairs(pairs: &[csv::QaPair]) {
    for (i, pair) in pairs.iter().enumerate() {
        println!("## Question {}:", i + 1);
        println!("**Q:** {}", pair.question);
        println!("**A:** {}\n", pair.answer);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
