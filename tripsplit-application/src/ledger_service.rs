use crate::{
    error::LedgerReportError,
    model::{LedgerReport, MemberBalanceRow, TripId, TripSnapshot},
    ports::TripSnapshotSource,
};
use tripsplit_domain::{
    BalanceCalculator, LedgerBalances, MemberId, SettlementPlanner, SettlementPolicy,
};

/// Read side of the expense ledger: trip id in, balances and settlements out.
#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    source: &'a dyn TripSnapshotSource,
    planner: SettlementPlanner,
}

impl<'a> LedgerService<'a> {
    pub fn new(source: &'a dyn TripSnapshotSource, policy: SettlementPolicy) -> Self {
        Self {
            source,
            planner: SettlementPlanner::new(policy),
        }
    }

    pub fn report(&self, trip: &TripId) -> Result<LedgerReport, LedgerReportError> {
        let snapshot = self.source.snapshot(trip).inspect_err(|err| {
            tracing::warn!(trip = %trip, error = %err, "Trip snapshot unavailable");
        })?;

        tracing::debug!(
            trip = %trip,
            member_count = snapshot.members.len(),
            expense_count = snapshot.expenses.len(),
            "Building ledger report"
        );

        self.report_for_snapshot(&snapshot)
    }

    pub fn report_for_snapshot(
        &self,
        snapshot: &TripSnapshot,
    ) -> Result<LedgerReport, LedgerReportError> {
        let balances = BalanceCalculator.compute_balances(&snapshot.members, &snapshot.expenses)?;
        let settlements = self.planner.plan_settlements(&balances)?;

        Ok(LedgerReport {
            balances: balance_rows(&snapshot.members, &balances),
            settlements,
        })
    }
}

fn balance_rows(members: &[MemberId], balances: &LedgerBalances) -> Vec<MemberBalanceRow> {
    let mut seen = fxhash::FxHashSet::default();
    let ordered: Vec<&MemberId> = members.iter().filter(|member| seen.insert(*member)).collect();

    balances
        .iter()
        .flat_map(|(&currency, table)| {
            ordered.iter().filter_map(move |&member| {
                table.get(member).map(|balance| MemberBalanceRow {
                    member: member.clone(),
                    currency,
                    paid: balance.paid,
                    owed: balance.owed,
                    net: balance.net(),
                })
            })
        })
        .collect()
}
