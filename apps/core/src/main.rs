use std::io::{BufRead, Write};
use std::path::PathBuf;

use calcfind_core::catalog;
use calcfind_core::config::{self, Config};
use calcfind_core::contract::EngineSnapshot;
use calcfind_core::engine::{EngineSettings, SearchEngine};
use calcfind_core::model::Locale;
use calcfind_core::navigation::UrlResolver;
use calcfind_core::recent::RecentSearchStore;
use calcfind_core::storage::{ResilientStore, SqliteStore};
use calcfind_core::transport::handle_json;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Calculator search engine host", long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog file or directory, overrides the config
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Active locale (en or tr)
    #[arg(short, long)]
    locale: Option<Locale>,

    /// Base URL for resolved destinations
    #[arg(long, default_value = "")]
    base_url: String,

    /// Run one search, print the snapshot and exit
    #[arg(short, long)]
    query: Option<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(error) = run(args) {
        eprintln!("[calcfind-core] {error}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = match &args.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    config::validate(&cfg)?;
    if let Err(error) = calcfind_core::logging::init(&cfg.log_dir, log::LevelFilter::Info) {
        eprintln!("[calcfind-core] logging disabled: {error}");
    }

    let catalog_path = args.catalog.clone().unwrap_or_else(|| cfg.catalog_path.clone());
    let (index, labels) = catalog::load_path(&catalog_path)?.into_index()?;
    let history = ResilientStore::open_or_noop(SqliteStore::open_file(&cfg.history_path));

    let mut settings = EngineSettings::from(&cfg);
    if let Some(locale) = args.locale {
        settings.locale = locale;
    }
    let mut engine = SearchEngine::new(
        index,
        labels,
        RecentSearchStore::new(history, cfg.recent_limit),
        settings,
    );
    let resolver = UrlResolver::new(&args.base_url);

    if let Some(query) = &args.query {
        engine.update_query(query);
        engine.submit();
        let snapshot = EngineSnapshot::capture(&engine, &resolver);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        engine.tick();
        writeln!(stdout, "{}", handle_json(&mut engine, &resolver, &line))?;
        stdout.flush()?;
    }

    Ok(())
}
