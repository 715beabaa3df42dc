use crate::model::{CurrencyCode, MemberId, Money};
use thiserror::Error;

/// Failures of the balance and settlement computations. None of them yield a
/// partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
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
    #[error("No trip members were supplied")]
    EmptyMemberSet,
    #[error("Totals in {currency} exceed the representable range")]
    AmountOverflow { currency: CurrencyCode },
}
