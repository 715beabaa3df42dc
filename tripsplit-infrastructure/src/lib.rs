#![warn(clippy::uninlined_format_args)]

pub mod text_ledger;

pub use text_ledger::{LedgerLoadError, TextLedgerSource, load_snapshot};
