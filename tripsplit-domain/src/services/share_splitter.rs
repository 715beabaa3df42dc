use crate::model::Money;

/// Splits `amount` into `participants` shares that sum exactly to `amount`.
///
/// Every share gets `amount / participants` minor units; the leftover
/// `amount % participants` units go one each to the first participants in
/// the given order.
pub fn split_shares(amount: Money, participants: usize) -> Vec<Money> {
    if participants == 0 {
        return Vec::new();
    }

    let count = participants as i64;
    let total = amount.minor_units();
    let base = total / count;
    let remainder = (total % count).unsigned_abs() as usize;
    let step = total.signum();

    (0..participants)
        .map(|idx| {
            let mut share = base;
            if idx < remainder {
                share += step;
            }
            Money::from_minor(share)
        })
        .collect()
}
