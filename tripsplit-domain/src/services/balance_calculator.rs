use crate::{
    error::LedgerError,
    model::{Balance, CurrencyBalances, Expense, LedgerBalances, MemberId},
    services::share_splitter::split_shares,
};
use fxhash::FxHashSet;

/// Folds expenses into per-member paid/owed totals, one table per currency.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Compute balances for every member in every currency the expenses use.
    ///
    /// # Errors
    /// * `EmptyMemberSet` - `members` is empty
    /// * `InvalidExpenseReference` - an expense's payer or split member is not in `members`
    ///   (the first offending expense in input order is reported)
    /// * `AmountOverflow` - a running total left the `i64` minor-unit range
    pub fn compute_balances(
        &self,
        members: &[MemberId],
        expenses: &[Expense],
    ) -> Result<LedgerBalances, LedgerError> {
        if members.is_empty() {
            return Err(LedgerError::EmptyMemberSet);
        }

        let known: FxHashSet<&MemberId> = members.iter().collect();
        for expense in expenses {
            if let Some(stranger) = expense
                .referenced_members()
                .find(|member| !known.contains(member))
            {
                tracing::warn!(
                    expense_id = expense.id(),
                    member = %stranger,
                    "Expense references a member outside the trip"
                );
                return Err(LedgerError::InvalidExpenseReference {
                    expense_id: expense.id().to_string(),
                    member: stranger.clone(),
                });
            }
        }

        let mut ledger = LedgerBalances::new();
        for expense in expenses {
            let currency = expense.currency();
            let balances = ledger
                .entry(currency)
                .or_insert_with(|| zeroed_balances(members));
            let overflow = LedgerError::AmountOverflow { currency };

            let payer = balances.entry(expense.paid_by().clone()).or_default();
            payer.paid = payer
                .paid
                .checked_add(expense.amount())
                .ok_or(overflow.clone())?;

            let shares = split_shares(expense.amount(), expense.split_between().len());
            for (member, share) in expense.split_between().iter().zip(shares) {
                let balance = balances.entry(member.clone()).or_default();
                balance.owed = balance.owed.checked_add(share).ok_or(overflow.clone())?;
            }
        }

        tracing::debug!(
            member_count = known.len(),
            expense_count = expenses.len(),
            currency_count = ledger.len(),
            "Balances computed"
        );

        Ok(ledger)
    }
}

fn zeroed_balances(members: &[MemberId]) -> CurrencyBalances {
    members
        .iter()
        .cloned()
        .map(|member| (member, Balance::default()))
        .collect()
}
