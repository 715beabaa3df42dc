#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::LedgerError;
pub use model::{
    Balance, CurrencyBalances, CurrencyCode, CurrencyCodeError, Expense, ExpenseBuildError,
    LedgerBalances, MemberId, MemberNets, Money, MoneyConversionError, Settlement,
};
pub use services::{
    BalanceCalculator, SettlementPlanner, SettlementPolicy, SettlementPolicyError,
    apply_settlements, split_shares,
};
