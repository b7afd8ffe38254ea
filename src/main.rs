use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use geo_photo_index::{AppConfig, NameMatch, PhotoIndex, PhotoRecord, Query};
use log::info;
use std::path::PathBuf;

/// Index geotagged photos listed in a manifest and search them by name,
/// city, country or capture date.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Manifest file, one image path per line. Defaults to `manifest_path` from config.
    manifest: Option<PathBuf>,

    /// Match against the file name (substring unless --exact-name or config says otherwise).
    #[arg(long)]
    name: Option<String>,

    /// Require the whole file name to match.
    #[arg(long)]
    exact_name: bool,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    country: Option<String>,

    /// Captured on this day (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date, conflicts_with_all = ["from", "to"])]
    date: Option<NaiveDate>,

    /// Captured on or after this day (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Captured on or before this day (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Print matches as a JSON array.
    #[arg(long)]
    json: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

impl Cli {
    fn to_query(&self, default_mode: NameMatch) -> Query {
        let mut query = Query::new().name_match(if self.exact_name { NameMatch::Exact } else { default_mode });
        query.name = self.name.clone();
        query.city = self.city.clone();
        query.country = self.country.clone();
        if let Some(day) = self.date {
            query = query.on(day);
        } else if self.from.is_some() || self.to.is_some() {
            query = query.date_range(self.from, self.to);
        }
        query
    }
}

fn print_text(found: &[&PhotoRecord]) {
    for record in found {
        println!("{}\n", record);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new()?;

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting geo-photo-index");

    let manifest_path = cli.manifest.clone().unwrap_or_else(|| PathBuf::from(&config.manifest_path));
    let index = PhotoIndex::from_manifest_file(&manifest_path, &config)?;

    println!("{} photos indexed, {} skipped", index.len(), index.skipped().len());
    for entry in index.skipped() {
        println!("  skipped {}: {}", entry.path, entry.reason);
    }

    let query = cli.to_query(config.name_match);
    let found = index.query(&query);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else if found.is_empty() {
        println!("No matching photos.");
    } else {
        print_text(&found);
    }

    info!("geo-photo-index finished");

    Ok(())
}
