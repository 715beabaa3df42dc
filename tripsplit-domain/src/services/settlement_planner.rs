use crate::{
    error::LedgerError,
    model::{CurrencyBalances, CurrencyCode, LedgerBalances, MemberId, MemberNets, Money, Settlement},
};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementPolicyError {
    #[error("Settlement tolerance must be between 0 and {max} minor units (found {found})")]
    ToleranceOutOfRange { found: Money, max: Money },
}

/// How far a currency's nets may sum away from zero and still be planned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementPolicy {
    tolerance: Money,
}

impl SettlementPolicy {
    pub const MAX_TOLERANCE: Money = Money::from_minor(1);

    /// Zero tolerance: nets must sum to exactly zero.
    pub fn exact() -> Self {
        Self {
            tolerance: Money::ZERO,
        }
    }

    pub fn with_tolerance(tolerance: Money) -> Result<Self, SettlementPolicyError> {
        if tolerance < Money::ZERO || tolerance > Self::MAX_TOLERANCE {
            return Err(SettlementPolicyError::ToleranceOutOfRange {
                found: tolerance,
                max: Self::MAX_TOLERANCE,
            });
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(self) -> Money {
        self.tolerance
    }
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self::exact()
    }
}

/// Greedy debtor-to-creditor matcher, run independently per currency.
///
/// The largest remaining debt is always paid towards the largest remaining
/// credit. This keeps the transfer count at most `creditors + debtors - 1`
/// but does not search for the minimum. Every nonzero net takes part in
/// matching; the policy tolerance only bounds the accepted residual, which is
/// left with a single member.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementPlanner {
    policy: SettlementPolicy,
}

impl SettlementPlanner {
    pub fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    /// Plan transfers that bring every net balance to zero.
    ///
    /// Output is grouped by currency (ascending code), then in match order.
    /// Fails with `ImbalancedLedger` before emitting anything if any currency's
    /// nets do not sum to zero within tolerance, and with `AmountOverflow` if a
    /// net or the sum leaves the range where it can be negated.
    pub fn plan_settlements(&self, balances: &LedgerBalances) -> Result<Vec<Settlement>, LedgerError> {
        let tolerance = self.policy.tolerance;

        for (&currency, members) in balances {
            let residual = net_sum(members).ok_or(LedgerError::AmountOverflow { currency })?;
            if residual.abs() > tolerance {
                tracing::error!(
                    reject_reason = "input_imbalance",
                    currency = %currency,
                    residual = residual.minor_units(),
                    tolerance = tolerance.minor_units(),
                    member_count = members.len(),
                    "Settlement planning rejected due to imbalanced ledger"
                );
                return Err(LedgerError::ImbalancedLedger { currency, residual });
            }
        }

        let mut settlements = Vec::new();
        for (&currency, members) in balances {
            self.plan_currency(currency, members, &mut settlements);
        }
        Ok(settlements)
    }

    fn plan_currency(
        &self,
        currency: CurrencyCode,
        members: &CurrencyBalances,
        settlements: &mut Vec<Settlement>,
    ) {
        let mut creditors: Vec<(&MemberId, Money)> = Vec::new();
        let mut debtors: Vec<(&MemberId, Money)> = Vec::new();

        // Nets were range-checked by `net_sum`.
        for (member, balance) in members {
            let net = balance.net();
            if net.is_positive() {
                creditors.push((member, net));
            } else if !net.is_zero() {
                debtors.push((member, -net));
            }
        }

        sort_largest_first(&mut creditors);
        sort_largest_first(&mut debtors);

        let emitted_before = settlements.len();
        let (mut creditor_idx, mut debtor_idx) = (0, 0);
        while creditor_idx < creditors.len() && debtor_idx < debtors.len() {
            let (creditor, credit) = creditors[creditor_idx];
            let (debtor, debt) = debtors[debtor_idx];
            let amount = credit.min(debt);

            settlements.push(Settlement {
                from: debtor.clone(),
                to: creditor.clone(),
                amount,
                currency,
            });

            creditors[creditor_idx].1 -= amount;
            debtors[debtor_idx].1 -= amount;

            if creditors[creditor_idx].1.is_zero() {
                creditor_idx += 1;
            }
            if debtors[debtor_idx].1.is_zero() {
                debtor_idx += 1;
            }
        }

        tracing::debug!(
            currency = %currency,
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            settlement_count = settlements.len() - emitted_before,
            "Settlements planned"
        );
    }
}

fn sort_largest_first(entries: &mut [(&MemberId, Money)]) {
    entries.sort_by(|(id_a, amount_a), (id_b, amount_b)| {
        amount_b.cmp(amount_a).then_with(|| id_a.cmp(id_b))
    });
}

fn net_sum(members: &CurrencyBalances) -> Option<Money> {
    let sum = members.values().try_fold(Money::ZERO, |acc, balance| {
        let net = balance.checked_net()?;
        net.checked_neg()?;
        acc.checked_add(net)
    })?;
    sum.checked_neg().map(|_| sum)
}

/// Nets per member after every settlement has been paid.
///
/// A debtor's (negative) net rises by each amount they pay and a creditor's
/// (positive) net falls by each amount they receive. Saturates at the `i64`
/// bounds instead of wrapping.
pub fn apply_settlements(
    balances: &LedgerBalances,
    settlements: &[Settlement],
) -> BTreeMap<CurrencyCode, MemberNets> {
    let mut nets: BTreeMap<CurrencyCode, MemberNets> = balances
        .iter()
        .map(|(&currency, members)| {
            let members = members
                .iter()
                .map(|(member, balance)| {
                    (member.clone(), balance.paid.saturating_sub(balance.owed))
                })
                .collect();
            (currency, members)
        })
        .collect();

    for settlement in settlements {
        let members = nets.entry(settlement.currency).or_default();
        let from = members.entry(settlement.from.clone()).or_default();
        *from = from.saturating_add(settlement.amount);
        let to = members.entry(settlement.to.clone()).or_default();
        *to = to.saturating_sub(settlement.amount);
    }

    nets
}
