use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use topchart::models::record::MediaKind;
use topchart::models::{CategoryRegistry, CrawlConfig, TopchartConfig};
use topchart::store::{Catalog, QueryEngine, Report, ReportKind};

#[derive(Parser, Debug)]
#[command(
    name = "topchart",
    about = "Scrape top-rated movie and TV show charts into a local catalog and run aggregate reports over it"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/topchart.toml")]
    config: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let registry = CategoryRegistry::new();
    let mut fetcher = topchart::build_fetcher(&config)?;
    let mut catalog = topchart::open_catalog(&config)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let Some(kind) = prompt_kind(&mut lines)? else {
        println!("Goodbye!");
        return Ok(());
    };
    let count = prompt_count(&mut lines, &config.crawl)?;

    let records =
        topchart::ingest_top_rated(&mut fetcher, &mut catalog, &registry, &config, kind, count)?;
    for (i, record) in records.iter().enumerate() {
        println!("[{}] {}", i + 1, record.summary());
    }
    println!();

    query_loop(&mut lines, &catalog)?;
    println!("This is the end of the program. Goodbye!");
    Ok(())
}

/// Read the config file if it exists, otherwise fall back to defaults.
fn load_config(path: &str) -> Result<TopchartConfig> {
    if std::path::Path::new(path).exists() {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config: {path}"))
    } else {
        tracing::info!(path, "No config file, using defaults");
        Ok(TopchartConfig::default())
    }
}

fn read_answer(lines: &mut impl Iterator<Item = io::Result<String>>, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Ask for movies/shows until a valid answer arrives; `None` means exit.
fn prompt_kind(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<MediaKind>> {
    loop {
        let Some(answer) = read_answer(
            lines,
            "Top rated movies or shows? (movies/shows, or \"exit\"): ",
        )?
        else {
            return Ok(None);
        };
        if answer.eq_ignore_ascii_case("exit") {
            return Ok(None);
        }
        match answer.parse::<MediaKind>() {
            Ok(kind) => return Ok(Some(kind)),
            Err(_) => println!("[Error] Incorrect input!"),
        }
    }
}

/// Ask for an item count within the configured bounds until valid.
fn prompt_count(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    crawl: &CrawlConfig,
) -> Result<usize> {
    loop {
        let prompt = format!(
            "How many titles to crawl? ({}-{}): ",
            crawl.min_items, crawl.max_items
        );
        let Some(answer) = read_answer(lines, &prompt)? else {
            // Stdin closed; use the smallest bound rather than hanging.
            return Ok(crawl.min_items);
        };
        match answer.parse::<usize>() {
            Ok(n) if n >= crawl.min_items && n <= crawl.max_items => return Ok(n),
            Ok(_) => println!("[Error] Count out of range!"),
            Err(_) => println!("[Error] Incorrect input!"),
        }
    }
}

/// Report menu loop: a selector in 1-7 runs a report, "exit" leaves.
fn query_loop(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    catalog: &Catalog,
) -> Result<()> {
    let engine = QueryEngine::new(catalog);
    loop {
        println!("Available reports:");
        for (i, kind) in ReportKind::ALL.iter().enumerate() {
            println!("  [{}] {}", i + 1, kind.description());
        }
        let Some(answer) = read_answer(lines, "Pick a report (1-7, or \"exit\"): ")? else {
            return Ok(());
        };
        if answer.eq_ignore_ascii_case("exit") {
            return Ok(());
        }
        let kind = match answer.parse::<usize>().ok().and_then(ReportKind::from_selector) {
            Some(kind) => kind,
            None => {
                println!("[Error] Incorrect input!");
                continue;
            }
        };
        print_report(&engine.run(kind)?);
        println!();
    }
}

fn print_report(report: &Report) {
    match report {
        Report::Averages(rows) => {
            if rows.is_empty() {
                println!("No rated titles ingested yet.");
            }
            for row in rows {
                println!("{}: {}", row.label, row.average);
            }
        }
        Report::Movies(rows) => {
            for (i, row) in rows.iter().enumerate() {
                println!("[{}] {}", i + 1, row.display_line());
            }
        }
        Report::Shows(rows) => {
            for (i, row) in rows.iter().enumerate() {
                println!("[{}] {}", i + 1, row.display_line());
            }
        }
    }
}
