//! Plan change (upgrade/downgrade) tests for proration-engine.
//!
//! Two prorations over the same start date, one per plan, subtracted.

mod common;

use common::{proration, round4};
use proration_engine::{plan_change, prorated_charge, Period, Proration};
use rust_decimal::Decimal;

const START: &str = "2015-01-31T12:00:00-08:00";

fn plan(term: u32, period: Period) -> Proration {
    proration(START, 1, term, period).with_proratable_periods([Period::Day, Period::Month])
}

#[test]
fn price_difference_matches_reference_table() {
    // (old term, old period, old price, new term, new period, new price, expected diff)
    let cases = [
        (1, Period::Month, 100.0, 7, Period::Day, 20.0, 0.3687),
        (1, Period::Month, 100.0, 3, Period::Month, 100.0, 2.1388),
        (1, Period::Day, 5.0, 1, Period::Month, 100.0, 1.7742),
        (1, Period::Month, 31.0, 1, Period::Month, 15.5, 0.5),
    ];

    for (old_term, old_period, old_price, new_term, new_period, new_price, expected) in cases {
        let old = plan(old_term, old_period);
        let new = plan(new_term, new_period);
        assert!(old.can_prorate() && new.can_prorate());

        let diff = old.prorate_price(old_price) - new.prorate_price(new_price);
        assert_eq!(
            round4(diff),
            expected,
            "{old_term} {old_period} @ {old_price} vs {new_term} {new_period} @ {new_price}"
        );
    }
}

#[test]
fn unproratable_side_contributes_nothing() {
    let old = plan(1, Period::Month);
    let new = proration(START, 1, 1, Period::Week)
        .with_proratable_periods([Period::Day, Period::Month]);
    assert!(!new.can_prorate());

    let diff = old.prorate_price(100.0) - new.prorate_price(70.0);
    assert_eq!(round4(diff), 3.2258);
}

#[test]
fn decimal_plan_change_nets_charge_against_credit() {
    let old = plan(1, Period::Month);
    let new = plan(3, Period::Month);

    let change = plan_change(&old, Decimal::new(10000, 2), &new, Decimal::new(10000, 2));
    assert_eq!(change.credit, Decimal::new(32258, 4));
    assert_eq!(change.charge, Decimal::new(10870, 4));
    assert_eq!(change.net, Decimal::new(-21388, 4));
    assert!(change.is_refund());
}

#[test]
fn decimal_plan_change_upgrade() {
    let old = plan(1, Period::Month);
    let new = plan(1, Period::Month);

    let change = plan_change(&old, Decimal::new(3100, 2), &new, Decimal::new(6200, 2));
    assert_eq!(change.net, Decimal::ONE);
    assert!(!change.is_refund());
}

#[test]
fn decimal_plan_change_with_unproratable_old_plan() {
    let old = proration(START, 1, 1, Period::Onetime);
    let new = plan(1, Period::Month);

    let change = plan_change(&old, Decimal::new(5000, 2), &new, Decimal::new(3100, 2));
    assert_eq!(change.credit, Decimal::ZERO);
    assert_eq!(change.net, Decimal::ONE);
}

#[test]
fn invoice_line_falls_back_to_full_price() {
    let p = proration(START, 1, 1, Period::Week);
    let line = prorated_charge(&p, "Weekly backup", Decimal::new(700, 2));
    assert!(!line.is_prorated);
    assert_eq!(line.amount, Decimal::new(700, 2));
    assert_eq!(line.prorated_days, 0);
}
