use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tripsplit_application::{SnapshotError, TripId, TripSnapshot, TripSnapshotSource};
use tripsplit_domain::{
    CurrencyCode, CurrencyCodeError, Expense, ExpenseBuildError, MemberId, Money,
    MoneyConversionError,
};
use tripsplit_parser::{ExpenseWithLine, ParseError, SplitSpec, parse_ledger};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerLoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Member '{name}' is declared more than once")]
    DuplicateMember { name: String },
    #[error("Line {line}: {source}")]
    Currency {
        line: usize,
        source: CurrencyCodeError,
    },
    #[error("Line {line}: {source}")]
    Amount {
        line: usize,
        source: MoneyConversionError,
    },
    #[error("Line {line}: {source}")]
    Expense {
        line: usize,
        source: ExpenseBuildError,
    },
}

/// Builds a trip snapshot from ledger text.
///
/// Member references are not checked against the declaration here; that is
/// left to the balance calculation so a stale reference surfaces as an
/// invalid expense reference.
pub fn load_snapshot(source: &str) -> Result<TripSnapshot, LedgerLoadError> {
    let ledger = parse_ledger(source)?;

    let mut declared: IndexSet<&str> = IndexSet::with_capacity(ledger.members.len());
    for &name in &ledger.members {
        if !declared.insert(name) {
            return Err(LedgerLoadError::DuplicateMember {
                name: name.to_string(),
            });
        }
    }
    let members: Vec<MemberId> = declared.iter().copied().map(MemberId::from).collect();

    let expenses = ledger
        .expenses
        .into_iter()
        .map(|entry| to_expense(entry, &members))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        member_count = members.len(),
        expense_count = expenses.len(),
        "Ledger text loaded"
    );

    Ok(TripSnapshot::new(members, expenses))
}

fn to_expense(entry: ExpenseWithLine<'_>, members: &[MemberId]) -> Result<Expense, LedgerLoadError> {
    let ExpenseWithLine { line, expense } = entry;

    let currency = CurrencyCode::parse(expense.currency)
        .map_err(|source| LedgerLoadError::Currency { line, source })?;
    let amount = Money::from_major(expense.amount, currency)
        .map_err(|source| LedgerLoadError::Amount { line, source })?;
    let split_between = match expense.split {
        SplitSpec::All => members.to_vec(),
        SplitSpec::Members(names) => names.into_iter().map(MemberId::from).collect(),
    };

    let mut built = Expense::try_new(
        expense.id,
        amount,
        currency,
        MemberId::from(expense.payer),
        split_between,
    )
    .map_err(|source| LedgerLoadError::Expense { line, source })?;
    if let Some(date) = expense.date {
        built = built.with_date(date);
    }
    if let Some(category) = expense.category {
        built = built.with_category(category);
    }
    Ok(built)
}

/// Ledger texts keyed by trip. Every snapshot re-parses the stored text.
#[derive(Debug, Clone, Default)]
pub struct TextLedgerSource {
    ledgers: IndexMap<TripId, String>,
}

impl TextLedgerSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, trip: TripId, text: impl Into<String>) {
        self.ledgers.insert(trip, text.into());
    }

    pub fn with_ledger(mut self, trip: TripId, text: impl Into<String>) -> Self {
        self.insert(trip, text);
        self
    }
}

impl TripSnapshotSource for TextLedgerSource {
    fn snapshot(&self, trip: &TripId) -> Result<TripSnapshot, SnapshotError> {
        let text = self
            .ledgers
            .get(trip)
            .ok_or_else(|| SnapshotError::TripNotFound(trip.clone()))?;

        load_snapshot(text).map_err(|err| {
            tracing::warn!(trip = %trip, error = %err, "Ledger text rejected");
            SnapshotError::Unavailable(err.to_string())
        })
    }
}
