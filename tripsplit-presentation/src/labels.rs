pub const MEMBER: &str = "Member";
pub const CURRENCY: &str = "Currency";
pub const PAID: &str = "Paid";
pub const OWED: &str = "Owed";
pub const NET: &str = "Net";
pub const FROM: &str = "From";
pub const TO: &str = "To";
pub const AMOUNT: &str = "Amount";
pub const BALANCES: &str = "Balances";
pub const SETTLEMENTS: &str = "Settlements";
pub const ALL_SETTLED: &str = "All settled.";
pub const NO_EXPENSES: &str = "No expenses recorded.";
