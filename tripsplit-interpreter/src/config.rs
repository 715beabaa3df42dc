use std::path::PathBuf;
use thiserror::Error;
use tripsplit_domain::{Money, SettlementPolicy, SettlementPolicyError};

pub const TOLERANCE_ENV: &str = "TRIPSPLIT_TOLERANCE_MINOR_UNITS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Usage: tripsplit-interpreter <ledger-file>")]
    MissingLedgerPath,
    #[error("{TOLERANCE_ENV} must be an integer (found '{0}')")]
    InvalidTolerance(String),
    #[error(transparent)]
    Policy(#[from] SettlementPolicyError),
}

/// Runtime configuration: the ledger to read and how settlements are planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub ledger_path: PathBuf,
    pub policy: SettlementPolicy,
}

impl AppConfig {
    /// Reads the ledger path from the command line and the tolerance from the
    /// environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::args().skip(1),
            std::env::var(TOLERANCE_ENV).ok(),
        )
    }

    pub fn from_parts(
        args: impl IntoIterator<Item = String>,
        tolerance: Option<String>,
    ) -> Result<Self, ConfigError> {
        let ledger_path = args
            .into_iter()
            .next()
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingLedgerPath)?;

        let policy = match tolerance.as_deref().map(str::trim) {
            None | Some("") => SettlementPolicy::default(),
            Some(raw) => {
                let units: i64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidTolerance(raw.to_string()))?;
                SettlementPolicy::with_tolerance(Money::from_minor(units))?
            }
        };

        Ok(Self {
            ledger_path,
            policy,
        })
    }
}
