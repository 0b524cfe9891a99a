use clap::Parser;
use stalkdex::domain::{Pattern, SLOT_COUNT};

const DAYS: [&str; 6] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Parser)]
#[command(name = "stalkdex", about = "Turnip market pattern predictor")]
struct Cli {
    /// Directory holding the saved week
    #[arg(long, default_value = "data")]
    data_dir: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Predict this week's pattern from the recorded prices
    Predict {
        /// Sunday buy price (90-110)
        #[arg(short, long)]
        anchor: Option<u32>,
        /// Up to 12 comma-separated half-day prices, blank or '-' = unknown
        /// (e.g. "95,92,-,120")
        #[arg(short, long)]
        prices: Option<String>,
        /// Last week's pattern: fluctuating, large-spike, decreasing or
        /// small-spike
        #[arg(short, long)]
        last_pattern: Option<Pattern>,
        /// Don't persist the merged inputs
        #[arg(long)]
        no_save: bool,
    },
    /// Show the currently saved week
    Show,
    /// Clear the saved week
    Reset,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let path = stalkdex::store::store_path(&cli.data_dir);

    match cli.command {
        Commands::Predict {
            anchor,
            prices,
            last_pattern,
            no_save,
        } => run_predict(&path, anchor, prices.as_deref(), last_pattern, no_save)?,
        Commands::Show => run_show(&path),
        Commands::Reset => {
            stalkdex::store::clear(&path)?;
            println!("Saved week cleared");
        }
    }

    Ok(())
}

fn run_predict(
    path: &str,
    anchor: Option<u32>,
    prices: Option<&str>,
    last_pattern: Option<Pattern>,
    no_save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut saved = stalkdex::store::load(path);
    if saved.is_stale() {
        println!(
            "Note: saved readings are {:.0} days old - a new week has likely started (use reset)",
            saved.age_hours() / 24.0
        );
    }

    // Flags override the saved week field by field
    let mut obs = saved.observation.clone();
    if let Some(a) = anchor {
        obs.anchor_price = Some(a);
    }
    if let Some(list) = prices {
        obs.slots = parse_prices(list)?;
    }
    if let Some(p) = last_pattern {
        obs.prior_pattern = Some(p);
    }

    let Some(anchor_price) = obs.anchor_price else {
        return Err("no anchor price: pass --anchor (Sunday buy price, 90-110)".into());
    };

    let results = stalkdex::engine::predict(anchor_price, &obs.slots, obs.prior_pattern)?;

    if !no_save {
        saved = stalkdex::store::SavedWeek::now(obs.clone());
        stalkdex::store::save(&saved, path)?;
    }

    println!("=== Turnip Pattern Forecast ===");
    println!("Anchor price: {} bells", anchor_price);
    println!("Readings: {}/{} half-days entered", obs.observed_count(), SLOT_COUNT);
    match obs.prior_pattern {
        Some(p) => println!("Last week: {}", p.label()),
        None => println!("Last week: unknown (stationary prior)"),
    }
    println!();
    println!(
        "  {:13} {:>6}  {:>11}  Advice",
        "Pattern", "Prob%", "Range"
    );
    for r in &results {
        println!(
            "  {:13} {:>5.1}%  {:>4}-{:<6}  {}",
            r.pattern.label(),
            r.probability * 100.0,
            r.expected_range.min,
            r.expected_range.max,
            r.recommendation
        );
    }
    println!();
    println!("{}", results[0].description);
    println!("More prices = better predictions!");

    Ok(())
}

fn run_show(path: &str) {
    let saved = stalkdex::store::load(path);
    let obs = &saved.observation;

    if obs.is_empty() {
        println!("No saved week");
        return;
    }

    match obs.anchor_price {
        Some(a) => println!("Anchor price: {} bells", a),
        None => println!("Anchor price: not entered"),
    }
    match obs.prior_pattern {
        Some(p) => println!("Last week: {}", p.label()),
        None => println!("Last week: unknown"),
    }
    for (day, pair) in DAYS.iter().zip(obs.slots.chunks(2)) {
        let fmt = |s: Option<u32>| s.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
        println!("  {}  AM {:>4}  PM {:>4}", day, fmt(pair[0]), fmt(pair[1]));
    }
    if saved.is_stale() {
        println!(
            "Saved {:.0} days ago - likely a finished week",
            saved.age_hours() / 24.0
        );
    }
}

/// Parse up to 12 comma-separated prices; blank, '-' or '?' entries are
/// unknown slots, missing trailing entries stay unknown.
fn parse_prices(list: &str) -> Result<[Option<u32>; SLOT_COUNT], Box<dyn std::error::Error>> {
    let entries: Vec<&str> = list.split(',').map(|s| s.trim()).collect();
    if entries.len() > SLOT_COUNT {
        return Err(format!(
            "{} prices given, at most {} half-day slots exist",
            entries.len(),
            SLOT_COUNT
        )
        .into());
    }

    let mut slots = [None; SLOT_COUNT];
    for (i, entry) in entries.iter().enumerate() {
        if entry.is_empty() || *entry == "-" || *entry == "?" {
            continue;
        }
        let price: u32 = entry
            .parse()
            .map_err(|_| format!("invalid price '{}' in slot {}", entry, i + 1))?;
        slots[i] = Some(price);
    }
    Ok(slots)
}
