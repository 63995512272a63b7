use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::Context;
use scoreboard_rust::GameRegistry;
use scoreboard_rust::handler::run_feed;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("SCOREBOARD_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    // Logging must never stop the feed from being processed.
    let _ = if json {
        builder.json().with_current_span(false).with_ansi(false).try_init()
    } else {
        builder.try_init()
    };
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let input: Box<dyn BufRead> = match env::var("SCOREBOARD_FEED") {
        Ok(path) => {
            let file = File::open(&path).with_context(|| format!("opening feed {}", path))?;
            info!(feed = %path, "Reading commands from file");
            Box::new(BufReader::new(file))
        }
        Err(_) => Box::new(io::stdin().lock()),
    };

    let registry = GameRegistry::new();
    let processed = run_feed(&registry, input, io::stdout().lock())?;
    info!(processed, active_games = registry.len(), "Feed finished");
    Ok(())
}
