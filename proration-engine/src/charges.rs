//! Money-side helpers built on [`Proration`].
//!
//! The engine itself works in `f64`. These helpers express its result as
//! `Decimal` charge lines, the way invoice generation consumes it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::proration::Proration;

/// Decimal places kept on prorated amounts.
pub const AMOUNT_SCALE: u32 = 4;

/// A single charge line produced for a billing cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProrationCharge {
    pub description: String,
    pub amount: Decimal,
    pub is_prorated: bool,
    pub proration_factor: Option<Decimal>,
    pub prorated_days: i64,
}

/// Credit for the old plan and charge for the new one over the same partial period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanChange {
    pub credit: Decimal,
    pub charge: Decimal,
    /// Positive means the customer owes money, negative means a refund.
    pub net: Decimal,
}

impl PlanChange {
    pub fn is_refund(&self) -> bool {
        self.net < Decimal::ZERO
    }
}

/// Charge line for `price`, prorated when possible and at full price otherwise.
pub fn prorated_charge(
    proration: &Proration,
    description: impl Into<String>,
    price: Decimal,
) -> ProrationCharge {
    let description = description.into();

    match prorated_amount(proration, price) {
        Some((amount, factor)) => ProrationCharge {
            description,
            amount,
            is_prorated: true,
            proration_factor: Some(factor),
            prorated_days: proration.prorate_days(),
        },
        None => {
            tracing::debug!(
                period = %proration.period(),
                %price,
                "Proration not applicable, billing full price"
            );
            ProrationCharge {
                description,
                amount: price,
                is_prorated: false,
                proration_factor: None,
                prorated_days: 0,
            }
        }
    }
}

/// Price difference for switching plans mid-cycle.
///
/// A side that cannot be prorated contributes zero.
pub fn plan_change(
    old: &Proration,
    old_price: Decimal,
    new: &Proration,
    new_price: Decimal,
) -> PlanChange {
    let credit = prorated_amount(old, old_price).map_or(Decimal::ZERO, |(amount, _)| amount);
    let charge = prorated_amount(new, new_price).map_or(Decimal::ZERO, |(amount, _)| amount);

    PlanChange {
        credit,
        charge,
        net: charge - credit,
    }
}

fn prorated_amount(proration: &Proration, price: Decimal) -> Option<(Decimal, Decimal)> {
    let (days, cycle_days) = proration.day_counts()?;
    let factor = Decimal::from(days).checked_div(Decimal::from(cycle_days))?;
    let amount = price.checked_mul(factor)?.round_dp(AMOUNT_SCALE);
    Some((amount, factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    #[test]
    fn test_prorated_charge_one_of_thirty_one_days() {
        let proration = Proration::new("2015-01-31T12:00:00-08:00", 1, 1, Period::Month).unwrap();
        let charge = prorated_charge(&proration, "Hosting (prorated)", Decimal::new(10000, 2));

        assert!(charge.is_prorated);
        assert_eq!(charge.amount, Decimal::new(32258, 4));
        assert_eq!(charge.prorated_days, 1);
        assert_eq!(
            charge.proration_factor.map(|f| f.round_dp(6)),
            Some(Decimal::new(32258, 6))
        );
    }

    #[test]
    fn test_prorated_charge_falls_back_to_full_price() {
        let proration = Proration::new("2015-02-01T00:00:00-08:00", 1, 1, Period::Month).unwrap();
        let charge = prorated_charge(&proration, "Hosting", Decimal::new(10000, 2));

        assert!(!charge.is_prorated);
        assert_eq!(charge.amount, Decimal::new(10000, 2));
        assert_eq!(charge.proration_factor, None);
    }

    #[test]
    fn test_plan_change_refund() {
        let start = "2015-01-31T12:00:00-08:00";
        let old = Proration::new(start, 1, 1, Period::Month).unwrap();
        let new = Proration::new(start, 1, 1, Period::Month).unwrap();

        let change = plan_change(&old, Decimal::new(3100, 2), &new, Decimal::new(1550, 2));
        assert_eq!(change.credit, Decimal::ONE);
        assert_eq!(change.charge, Decimal::new(5, 1));
        assert_eq!(change.net, Decimal::new(-5, 1));
        assert!(change.is_refund());
    }
}
