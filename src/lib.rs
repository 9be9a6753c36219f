pub mod config;
pub mod models;
pub mod triage;

use std::io::{Read, Write};

use tracing_subscriber::EnvFilter;

use triage::{diagnose_with_fallback, TriageEngine, TriageError, TriageRequest, TriageRules};

/// Initialise tracing on stderr, honouring RUST_LOG. Call once per process.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read a JSON triage request from stdin and write the diagnosis outcome
/// as JSON to stdout.
pub fn run() -> Result<(), TriageError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let rules = TriageRules::resolve(config::rules_dir().as_deref())?;
    let engine = TriageEngine::new(&rules);

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let request: TriageRequest = serde_json::from_str(&input)?;

    let outcome = diagnose_with_fallback(None, &engine, &request)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &outcome)?;
    writeln!(stdout)?;
    Ok(())
}
