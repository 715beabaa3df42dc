use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tripsplit_application::{LedgerService, TripId, TripSnapshot};
use tripsplit_domain::{CurrencyCode, Expense, MemberId, Money, SettlementPolicy};

const NAMES: [&str; 5] = ["A", "B", "C", "D", "E"];

fn snapshot_strategy() -> impl Strategy<Value = TripSnapshot> {
    let expense = (1i64..=50_000, 0usize..2, 0usize..NAMES.len(), 1u8..=31);
    (2usize..=NAMES.len(), prop::collection::vec(expense, 0..=25)).prop_map(|(count, raw)| {
        let members: Vec<MemberId> = NAMES[..count].iter().copied().map(MemberId::from).collect();
        let expenses = raw
            .into_iter()
            .enumerate()
            .map(|(idx, (amount, currency_idx, payer, mask))| {
                let mut split: Vec<MemberId> = (0..count)
                    .filter(|member| mask & (1 << member) != 0)
                    .map(|member| members[member].clone())
                    .collect();
                if split.is_empty() {
                    split.push(members[0].clone());
                }
                let currency = CurrencyCode::parse(["INR", "USD"][currency_idx]).expect("currency");
                Expense::try_new(
                    format!("e{idx}"),
                    Money::from_minor(amount),
                    currency,
                    members[payer % count].clone(),
                    split,
                )
                .expect("valid expense")
            })
            .collect();
        TripSnapshot::new(members, expenses)
    })
}

proptest! {
    #[test]
    fn report_rows_and_settlements_are_consistent(snapshot in snapshot_strategy()) {
        let trip = TripId::new("trip");
        let source = HashMap::from([(trip.clone(), snapshot.clone())]);
        let service = LedgerService::new(&source, SettlementPolicy::default());
        let report = service.report(&trip).expect("report");

        let mut nets: BTreeMap<(CurrencyCode, MemberId), Money> = BTreeMap::new();
        let mut totals: BTreeMap<CurrencyCode, Money> = BTreeMap::new();
        for row in &report.balances {
            prop_assert_eq!(row.net, row.paid - row.owed);
            nets.insert((row.currency, row.member.clone()), row.net);
            *totals.entry(row.currency).or_default() += row.net;
        }
        for total in totals.values() {
            prop_assert_eq!(*total, Money::ZERO);
        }

        for settlement in &report.settlements {
            *nets.entry((settlement.currency, settlement.from.clone())).or_default() += settlement.amount;
            *nets.entry((settlement.currency, settlement.to.clone())).or_default() -= settlement.amount;
        }
        prop_assert!(nets.values().all(|net| net.is_zero()));
    }
}
