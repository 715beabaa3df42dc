use fxhash::FxHashSet;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};
use thiserror::Error;

/// Opaque identifier of a trip participant (owner or collaborator).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyCodeError {
    #[error("Currency code must be exactly three ASCII letters (found '{0}')")]
    Malformed(String),
}

/// ISO-style three letter currency code, stored uppercase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub fn parse(code: &str) -> Result<Self, CurrencyCodeError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CurrencyCodeError::Malformed(code.to_string()));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    pub fn as_str(&self) -> &str {
        // Constructed from validated ASCII only.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Number of decimal places of the currency's minor unit (ISO 4217).
    pub fn minor_unit_exponent(self) -> u32 {
        match &self.0 {
            b"BIF" | b"CLP" | b"DJF" | b"GNF" | b"ISK" | b"JPY" | b"KMF" | b"KRW" | b"PYG"
            | b"RWF" | b"UGX" | b"UYI" | b"VND" | b"VUV" | b"XAF" | b"XOF" | b"XPF" => 0,
            b"BHD" | b"IQD" | b"JOD" | b"KWD" | b"LYD" | b"OMR" | b"TND" => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyConversionError {
    #[error("{amount} has more fractional digits than {currency} allows ({max_digits})")]
    TooManyFractionalDigits {
        amount: Decimal,
        currency: CurrencyCode,
        max_digits: u32,
    },
    #[error("{amount} {currency} is out of the representable range")]
    OutOfRange {
        amount: Decimal,
        currency: CurrencyCode,
    },
}

/// Signed amount counted in minor units of some currency (cents, paise, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// Converts a major-unit decimal (e.g. `12.50`) into minor units of `currency`.
    pub fn from_major(amount: Decimal, currency: CurrencyCode) -> Result<Self, MoneyConversionError> {
        let exponent = currency.minor_unit_exponent();
        let out_of_range = || MoneyConversionError::OutOfRange { amount, currency };
        let factor = Decimal::from(10_i64.pow(exponent));
        let units = amount.checked_mul(factor).ok_or_else(out_of_range)?;
        if !units.fract().is_zero() {
            return Err(MoneyConversionError::TooManyFractionalDigits {
                amount,
                currency,
                max_digits: exponent,
            });
        }
        units.to_i64().map(Self).ok_or_else(out_of_range)
    }

    pub fn to_major(self, currency: CurrencyCode) -> Decimal {
        Decimal::new(self.0, currency.minor_unit_exponent())
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseBuildError {
    #[error("Expense id must not be empty")]
    EmptyId,
    #[error("Expense '{id}' must have a positive amount (found {amount})")]
    NonPositiveAmount { id: String, amount: Money },
    #[error("Expense '{id}' must be split between at least one member")]
    EmptySplit { id: String },
    #[error("Expense '{id}' lists member '{member}' more than once")]
    DuplicateSplitMember { id: String, member: MemberId },
}

/// A single recorded expense. Validated at construction so balance math never
/// sees a non-positive amount or an empty split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    id: String,
    amount: Money,
    currency: CurrencyCode,
    paid_by: MemberId,
    split_between: Vec<MemberId>,
    date: Option<String>,
    category: Option<String>,
}

impl Expense {
    pub fn try_new(
        id: impl Into<String>,
        amount: Money,
        currency: CurrencyCode,
        paid_by: MemberId,
        split_between: Vec<MemberId>,
    ) -> Result<Self, ExpenseBuildError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ExpenseBuildError::EmptyId);
        }
        if !amount.is_positive() {
            return Err(ExpenseBuildError::NonPositiveAmount { id, amount });
        }
        if split_between.is_empty() {
            return Err(ExpenseBuildError::EmptySplit { id });
        }

        let mut seen: FxHashSet<&MemberId> = FxHashSet::default();
        if let Some(duplicate) = split_between.iter().find(|member| !seen.insert(*member)) {
            let member = duplicate.clone();
            return Err(ExpenseBuildError::DuplicateSplitMember { id, member });
        }

        Ok(Self {
            id,
            amount,
            currency,
            paid_by,
            split_between,
            date: None,
            category: None,
        })
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn paid_by(&self) -> &MemberId {
        &self.paid_by
    }

    /// Members sharing the cost, in remainder-distribution order.
    pub fn split_between(&self) -> &[MemberId] {
        &self.split_between
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Every member this expense refers to, payer first.
    pub fn referenced_members(&self) -> impl Iterator<Item = &MemberId> + '_ {
        std::iter::once(&self.paid_by).chain(self.split_between.iter())
    }
}

/// Per member, per currency totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balance {
    pub paid: Money,
    pub owed: Money,
}

impl Balance {
    pub fn new(paid: Money, owed: Money) -> Self {
        Self { paid, owed }
    }

    /// Positive: others owe this member. Negative: this member owes others.
    pub fn net(&self) -> Money {
        self.paid - self.owed
    }

    pub fn checked_net(&self) -> Option<Money> {
        self.paid.checked_sub(self.owed)
    }
}

pub type CurrencyBalances = BTreeMap<MemberId, Balance>;
pub type LedgerBalances = BTreeMap<CurrencyCode, CurrencyBalances>;
pub type MemberNets = BTreeMap<MemberId, Money>;

/// `from` owes `to` the given amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
    pub currency: CurrencyCode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn code(value: &str) -> CurrencyCode {
        CurrencyCode::parse(value).expect("valid currency code")
    }

    fn members(ids: &[&str]) -> Vec<MemberId> {
        ids.iter().copied().map(MemberId::from).collect()
    }

    #[rstest]
    #[case::upper("INR", "INR")]
    #[case::lower("usd", "USD")]
    #[case::mixed("jPy", "JPY")]
    fn currency_code_is_normalized(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(code(input).as_str(), expected);
    }

    #[rstest]
    #[case::too_short("IN")]
    #[case::too_long("INRS")]
    #[case::digits("1NR")]
    #[case::empty("")]
    #[case::non_ascii("ÉUR")]
    fn currency_code_rejects_malformed(#[case] input: &str) {
        assert_eq!(
            CurrencyCode::parse(input),
            Err(CurrencyCodeError::Malformed(input.to_string()))
        );
    }

    #[rstest]
    #[case::jpy("JPY", 0)]
    #[case::inr("INR", 2)]
    #[case::usd("USD", 2)]
    #[case::kwd("KWD", 3)]
    fn minor_unit_exponents(#[case] currency: &str, #[case] expected: u32) {
        assert_eq!(code(currency).minor_unit_exponent(), expected);
    }

    #[rstest]
    #[case::whole_inr("100", "INR", 10_000)]
    #[case::cents("12.5", "USD", 1_250)]
    #[case::two_digits("0.01", "USD", 1)]
    #[case::yen("1500", "JPY", 1_500)]
    #[case::dinar("1.234", "KWD", 1_234)]
    fn converts_major_to_minor(#[case] amount: &str, #[case] currency: &str, #[case] minor: i64) {
        let amount = Decimal::from_str(amount).expect("decimal literal");
        let money = Money::from_major(amount, code(currency)).expect("convertible amount");
        assert_eq!(money, Money::from_minor(minor));
        assert_eq!(money.to_major(code(currency)), amount);
    }

    #[rstest]
    #[case::sub_cent("0.005", "USD")]
    #[case::fractional_yen("10.5", "JPY")]
    fn rejects_excess_fractional_digits(#[case] amount: &str, #[case] currency: &str) {
        let amount = Decimal::from_str(amount).expect("decimal literal");
        let result = Money::from_major(amount, code(currency));
        assert!(matches!(
            result,
            Err(MoneyConversionError::TooManyFractionalDigits { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_amounts() {
        let amount = Decimal::from_str("100000000000000000000").expect("decimal literal");
        let result = Money::from_major(amount, code("USD"));
        assert!(matches!(result, Err(MoneyConversionError::OutOfRange { .. })));
    }

    #[test]
    fn expense_keeps_split_order_and_metadata() {
        let expense = Expense::try_new(
            "dinner",
            Money::from_minor(10_000),
            code("INR"),
            MemberId::from("A"),
            members(&["C", "A", "B"]),
        )
        .expect("valid expense")
        .with_date("2024-05-01")
        .with_category("food");

        assert_eq!(expense.split_between(), members(&["C", "A", "B"]).as_slice());
        assert_eq!(expense.date(), Some("2024-05-01"));
        assert_eq!(expense.category(), Some("food"));
        let referenced: Vec<&str> = expense.referenced_members().map(MemberId::as_str).collect();
        assert_eq!(referenced, ["A", "C", "A", "B"]);
    }

    #[rstest]
    #[case::empty_id("", 100, &["A"], ExpenseBuildError::EmptyId)]
    #[case::zero_amount(
        "e1",
        0,
        &["A"],
        ExpenseBuildError::NonPositiveAmount { id: "e1".into(), amount: Money::ZERO }
    )]
    #[case::negative_amount(
        "e1",
        -5,
        &["A"],
        ExpenseBuildError::NonPositiveAmount { id: "e1".into(), amount: Money::from_minor(-5) }
    )]
    #[case::empty_split("e1", 100, &[], ExpenseBuildError::EmptySplit { id: "e1".into() })]
    #[case::duplicate_split(
        "e1",
        100,
        &["A", "B", "A"],
        ExpenseBuildError::DuplicateSplitMember { id: "e1".into(), member: MemberId::from("A") }
    )]
    fn expense_rejects_invalid_input(
        #[case] id: &str,
        #[case] amount: i64,
        #[case] split: &[&str],
        #[case] expected: ExpenseBuildError,
    ) {
        let result = Expense::try_new(
            id,
            Money::from_minor(amount),
            code("INR"),
            MemberId::from("A"),
            members(split),
        );
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn balance_net_is_paid_minus_owed() {
        let balance = Balance::new(Money::from_minor(100), Money::from_minor(150));
        assert_eq!(balance.net(), Money::from_minor(-50));
    }
}
