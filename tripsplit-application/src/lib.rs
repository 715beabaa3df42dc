#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use error::{LedgerReportError, SnapshotError};
pub use ledger_service::LedgerService;
pub use model::{LedgerReport, MemberBalanceRow, TripId, TripSnapshot};
pub use ports::TripSnapshotSource;
