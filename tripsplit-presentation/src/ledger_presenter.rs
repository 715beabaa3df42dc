use crate::{
    labels,
    text_table::{Alignment, TextTableBuilder},
};
use std::{borrow::Cow, fmt::Write as _};
use tripsplit_application::{LedgerReport, MemberBalanceRow};
use tripsplit_domain::{CurrencyCode, Money, Settlement};

pub struct LedgerPresenter;

impl LedgerPresenter {
    pub fn render(report: &LedgerReport) -> String {
        let mut out = String::with_capacity(1024);

        if report.balances.is_empty() {
            let _ = writeln!(&mut out, "{}", labels::NO_EXPENSES);
            return out;
        }

        let _ = writeln!(&mut out, "{}", labels::BALANCES);
        out.push_str(&Self::build_balance_table(&report.balances));
        out.push('\n');

        let _ = writeln!(&mut out, "{}", labels::SETTLEMENTS);
        if report.is_settled() {
            let _ = writeln!(&mut out, "{}", labels::ALL_SETTLED);
        } else {
            out.push_str(&Self::build_settlement_table(&report.settlements));
        }

        out
    }

    pub fn build_balance_table(rows: &[MemberBalanceRow]) -> String {
        let headers = [
            Cow::Borrowed(labels::MEMBER),
            Cow::Borrowed(labels::CURRENCY),
            Cow::Borrowed(labels::PAID),
            Cow::Borrowed(labels::OWED),
            Cow::Borrowed(labels::NET),
        ];
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&headers);

        for row in rows {
            let sign = if row.net.signum() >= 0 { "+" } else { "" };
            builder = builder.row([
                Cow::Borrowed(row.member.as_str()),
                Cow::Borrowed(row.currency.as_str()),
                Cow::Owned(format_amount(row.paid, row.currency)),
                Cow::Owned(format_amount(row.owed, row.currency)),
                Cow::Owned(format!("{sign}{}", format_amount(row.net, row.currency))),
            ]);
        }

        builder.build()
    }

    pub fn build_settlement_table(settlements: &[Settlement]) -> String {
        let headers = [
            Cow::Borrowed(labels::FROM),
            Cow::Borrowed(labels::TO),
            Cow::Borrowed(labels::AMOUNT),
            Cow::Borrowed(labels::CURRENCY),
        ];
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
                Alignment::Left,
            ])
            .headers(&headers);

        for settlement in settlements {
            builder = builder.row([
                Cow::Borrowed(settlement.from.as_str()),
                Cow::Borrowed(settlement.to.as_str()),
                Cow::Owned(format_amount(settlement.amount, settlement.currency)),
                Cow::Borrowed(settlement.currency.as_str()),
            ]);
        }

        builder.build()
    }
}

/// Major-unit rendering with the currency's full number of decimals.
pub fn format_amount(amount: Money, currency: CurrencyCode) -> String {
    amount.to_major(currency).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tripsplit_domain::MemberId;

    fn currency(code: &str) -> CurrencyCode {
        CurrencyCode::parse(code).expect("currency")
    }

    fn row(member: &str, code: &str, paid: i64, owed: i64) -> MemberBalanceRow {
        MemberBalanceRow {
            member: MemberId::from(member),
            currency: currency(code),
            paid: Money::from_minor(paid),
            owed: Money::from_minor(owed),
            net: Money::from_minor(paid - owed),
        }
    }

    #[rstest]
    #[case::rupees(5_000, "INR", "50.00")]
    #[case::cents(7, "USD", "0.07")]
    #[case::negative(-1_250, "USD", "-12.50")]
    #[case::yen(1_500, "JPY", "1500")]
    #[case::dinar(1_005, "KWD", "1.005")]
    fn formats_minor_units(#[case] minor: i64, #[case] code: &str, #[case] expected: &str) {
        assert_eq!(format_amount(Money::from_minor(minor), currency(code)), expected);
    }

    #[test]
    fn renders_balances_and_settlements() {
        let report = LedgerReport {
            balances: vec![row("A", "INR", 10_000, 5_000), row("B", "INR", 0, 5_000)],
            settlements: vec![Settlement {
                from: MemberId::from("B"),
                to: MemberId::from("A"),
                amount: Money::from_minor(5_000),
                currency: currency("INR"),
            }],
        };

        let text = LedgerPresenter::render(&report);

        assert_eq!(
            text,
            "Balances\n\
             Member  Currency    Paid   Owed     Net\n\
             ---------------------------------------\n\
             A       INR       100.00  50.00  +50.00\n\
             B       INR         0.00  50.00  -50.00\n\
             \n\
             Settlements\n\
             From  To  Amount  Currency\n\
             --------------------------\n\
             B     A    50.00  INR\n"
        );
    }

    #[test]
    fn settled_report_says_so() {
        let report = LedgerReport {
            balances: vec![row("A", "USD", 500, 500)],
            settlements: Vec::new(),
        };

        let text = LedgerPresenter::render(&report);

        assert!(text.contains("+0.00"));
        assert!(text.ends_with("Settlements\nAll settled.\n"));
    }

    #[test]
    fn empty_report_has_no_tables() {
        assert_eq!(
            LedgerPresenter::render(&LedgerReport::default()),
            "No expenses recorded.\n"
        );
    }
}
