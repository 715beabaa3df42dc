use crate::model::TripId;
use thiserror::Error;
use tripsplit_domain::{CurrencyCode, LedgerError, MemberId, Money};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Trip '{0}' was not found")]
    TripNotFound(TripId),
    #[error("Trip snapshot could not be loaded: {0}")]
    Unavailable(String),
}

/// Everything a host can get back from a ledger report request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerReportError {
    #[error("Trip '{0}' was not found")]
    TripNotFound(TripId),
    #[error("Trip snapshot could not be loaded: {0}")]
    Snapshot(String),
    #[error("Expense '{expense_id}' references '{member}', who is not a trip member")]
    InvalidExpenseReference {
        expense_id: String,
        member: MemberId,
    },
    #[error("Balances in {currency} do not sum to zero (residual {residual} minor units)")]
    ImbalancedLedger {
        currency: CurrencyCode,
        residual: Money,
    },
    #[error("Trip has no members")]
    EmptyMemberSet,
    #[error("Totals in {currency} exceed the representable range")]
    AmountOverflow { currency: CurrencyCode },
}

impl LedgerReportError {
    /// `true` when the trip data itself must be fixed upstream; `false` for
    /// failures inside the engine or its storage.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::TripNotFound(_) | Self::InvalidExpenseReference { .. } | Self::EmptyMemberSet
        )
    }
}

impl From<LedgerError> for LedgerReportError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidExpenseReference { expense_id, member } => {
                LedgerReportError::InvalidExpenseReference { expense_id, member }
            }
            LedgerError::ImbalancedLedger { currency, residual } => {
                LedgerReportError::ImbalancedLedger { currency, residual }
            }
            LedgerError::EmptyMemberSet => LedgerReportError::EmptyMemberSet,
            LedgerError::AmountOverflow { currency } => {
                LedgerReportError::AmountOverflow { currency }
            }
        }
    }
}

impl From<SnapshotError> for LedgerReportError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::TripNotFound(trip) => LedgerReportError::TripNotFound(trip),
            SnapshotError::Unavailable(detail) => LedgerReportError::Snapshot(detail),
        }
    }
}
