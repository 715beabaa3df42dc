use crate::config::AppConfig;
use std::{borrow::Cow, fs, path::Path};
use tracing_subscriber::EnvFilter;
use tripsplit_application::{LedgerService, TripId};
use tripsplit_infrastructure::TextLedgerSource;
use tripsplit_presentation::LedgerPresenter;

pub type CliResult<T> = Result<T, Cow<'static, str>>;

/// Initialize logging and tracing. Logs go to stderr so reports stay clean on stdout.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Load `.env`, set up logging, and print the report for the configured ledger.
pub fn run() -> CliResult<()> {
    let _ = dotenvy::dotenv();
    init_logging();

    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    let output = render_ledger_file(&config)?;
    print!("{output}");
    Ok(())
}

pub fn render_ledger_file(config: &AppConfig) -> CliResult<String> {
    let path = &config.ledger_path;
    let text = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;

    render_ledger_text(trip_id_for(path), text, config)
}

pub fn render_ledger_text(trip: TripId, text: String, config: &AppConfig) -> CliResult<String> {
    let source = TextLedgerSource::new().with_ledger(trip.clone(), text);
    let service = LedgerService::new(&source, config.policy);

    let report = service.report(&trip).map_err(|err| {
        tracing::error!(trip = %trip, caller_error = err.is_caller_error(), "Ledger report failed");
        err.to_string()
    })?;

    tracing::info!(
        trip = %trip,
        row_count = report.balances.len(),
        settlement_count = report.settlements.len(),
        "Ledger report ready"
    );

    Ok(LedgerPresenter::render(&report))
}

fn trip_id_for(path: &Path) -> TripId {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    TripId::new(stem)
}
