use std::fmt;
use tripsplit_domain::{CurrencyCode, Expense, MemberId, Money, Settlement};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripId(String);

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Consistent view of a trip at one point in time: owner and collaborators
/// plus every recorded expense.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripSnapshot {
    pub members: Vec<MemberId>,
    pub expenses: Vec<Expense>,
}

impl TripSnapshot {
    pub fn new(members: Vec<MemberId>, expenses: Vec<Expense>) -> Self {
        Self { members, expenses }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBalanceRow {
    pub member: MemberId,
    pub currency: CurrencyCode,
    pub paid: Money,
    pub owed: Money,
    pub net: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerReport {
    /// Ordered by currency code, then by the snapshot's member order.
    pub balances: Vec<MemberBalanceRow>,
    pub settlements: Vec<Settlement>,
}

impl LedgerReport {
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}
