//! Money rounding helpers.
//!
//! All allocation arithmetic is carried out in whole cents so that split
//! amounts always add back up to the rounded budget.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every monetary amount.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to cents, half away from zero, at exactly two decimal
/// places.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("33.335").unwrap()).to_string(), "33.34");
/// assert_eq!(round_money(Decimal::from(100)).to_string(), "100.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}

/// Largest amount the engine accepts for a budget, salary, override or
/// principal (one quadrillion).
///
/// Whole-cent products of two such amounts stay inside `i128`, and money
/// sums stay far inside `Decimal` range.
pub const MAX_MONEY_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// True for amounts in `0..=MAX_MONEY_AMOUNT`.
pub fn is_valid_money(amount: Decimal) -> bool {
    amount >= Decimal::ZERO && amount <= MAX_MONEY_AMOUNT
}

/// Converts an amount to a whole number of cents after rounding.
///
/// Returns `None` for negative amounts and amounts above
/// [`MAX_MONEY_AMOUNT`].
pub(crate) fn to_cents(amount: Decimal) -> Option<i128> {
    if !is_valid_money(amount) {
        return None;
    }
    // round_money always lands on scale 2 inside the accepted range.
    Some(round_money(amount).mantissa())
}

/// Converts a whole number of cents back to an amount with two decimal
/// places.
///
/// `cents` must come from [`to_cents`] or be a share of such a value.
pub(crate) fn from_cents(cents: i128) -> Decimal {
    Decimal::from_i128_with_scale(cents, MONEY_DECIMAL_PLACES)
}
