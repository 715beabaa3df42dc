pub mod balance_calculator;
pub mod settlement_planner;
pub mod share_splitter;

pub use balance_calculator::BalanceCalculator;
pub use settlement_planner::{
    SettlementPlanner, SettlementPolicy, SettlementPolicyError, apply_settlements,
};
pub use share_splitter::split_shares;
