use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storefind::catalog::{self, Record};
use storefind::chips;
use storefind::config::{self, Config};
use storefind::suggest;
use storefind::taxonomy;
use storefind::{FieldUpdate, FilterEngine, SetField};

#[derive(Parser, Debug)]
#[command(name = "storefind")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON file; overrides `catalog` from the config
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter the catalog and print matching stores
    Search(SearchArgs),
    /// Print typeahead suggestions for a partial query
    Suggest(SuggestArgs),
    /// Print the known cuisines, dietary tags, food types, etc.
    Taxonomy,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Free-text search over name, cuisine and food type
    query: Option<String>,

    #[arg(long)]
    day: Option<String>,

    #[arg(long)]
    window: Option<String>,

    /// Repeatable; a store passes if its food type is any of these
    #[arg(long = "food-type")]
    food_types: Vec<String>,

    /// Repeatable; a store passes if it has any of these tags
    #[arg(long)]
    diet: Vec<String>,

    /// Repeatable; a store passes if its cuisine is any of these
    #[arg(long = "cuisine")]
    cuisines: Vec<String>,

    /// Maximum distance in miles
    #[arg(long)]
    max_distance: Option<f64>,

    #[arg(long)]
    price: Option<String>,

    /// Print matching records as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct SuggestArgs {
    query: String,

    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search(args) => {
            let records = load_records(cli.catalog, &config)?;
            handle_search(args, &records, &config)
        }
        Command::Suggest(args) => {
            let records = load_records(cli.catalog, &config)?;
            handle_suggest(args, &records, &config);
            Ok(())
        }
        Command::Taxonomy => {
            handle_taxonomy();
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info,storefind=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_records(flag: Option<PathBuf>, config: &Config) -> Result<Vec<Record>> {
    let path = flag.or_else(|| config.catalog.clone()).ok_or_else(|| {
        anyhow!("no catalog given; pass --catalog or set `catalog` in the configuration")
    })?;
    catalog::load_catalog(&path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))
}

fn build_engine(args: &SearchArgs) -> FilterEngine {
    let mut engine = FilterEngine::new();

    if let Some(query) = &args.query {
        engine.set_field(FieldUpdate::Query(query.clone()));
    }
    if let Some(day) = &args.day {
        engine.set_field(FieldUpdate::PickupDay(day.clone()));
    }
    if let Some(window) = &args.window {
        engine.set_field(FieldUpdate::PickupWindow(window.clone()));
    }

    let multi = [
        (SetField::FoodTypes, &args.food_types),
        (SetField::Diet, &args.diet),
        (SetField::Cuisines, &args.cuisines),
    ];
    for (field, values) in multi {
        for value in values {
            // repeated flags select once
            if !engine.filters().set(field).contains(value) {
                engine.toggle_set_member(field, value);
            }
        }
    }

    engine.set_field(FieldUpdate::Distance(args.max_distance));
    engine.set_field(FieldUpdate::Price(args.price.clone()));
    engine
}

fn handle_search(args: SearchArgs, records: &[Record], config: &Config) -> Result<()> {
    let engine = build_engine(&args);
    let results = engine.evaluate(records);

    if args.json {
        let out = serde_json::to_string_pretty(&results)?;
        println!("{}", out);
        return Ok(());
    }

    let active = engine.active_filter_count();
    if active > 0 {
        println!("{}", chips::summary(active));
        for chip in chips::active_chips(engine.filters(), config.chip_query_max_len) {
            println!("  [{}] {}", chip.field, chip.label);
        }
    }

    if results.is_empty() {
        println!("No results found");
        return Ok(());
    }

    println!(
        "{} store{} found",
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    );
    for r in results {
        println!(
            "{}\t{}\t{} / {}\t{}\t{} mi\t{} {}",
            r.id,
            r.name,
            r.cuisine,
            r.food_type,
            r.price_bucket,
            r.distance_mi,
            r.pickup_day,
            r.pickup_window
        );
    }

    Ok(())
}

fn handle_suggest(args: SuggestArgs, records: &[Record], config: &Config) {
    let limit = args.limit.unwrap_or(config.suggestion_limit);
    for s in suggest::suggestions(records, &args.query, limit) {
        println!("{}\t{}", s.kind, s.text);
    }
}

fn handle_taxonomy() {
    for (heading, values) in taxonomy::text_lists() {
        println!("{}: {}", heading, values.join(", "));
    }
    let distances: Vec<String> = taxonomy::DISTANCES.iter().map(|d| d.to_string()).collect();
    println!("distance: {}", distances.join(", "));
}
