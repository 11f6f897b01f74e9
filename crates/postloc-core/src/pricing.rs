//! Distance surcharges and price display.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown in every price element until a location is known.
pub const PRICE_MASK: &str = "____.__";

/// Surcharge step, in kilometres and in currency units.
const TIER_STEP: f64 = 100.0;

/// Leading numeric literal as `parseFloat` accepts it: optional sign, digits
/// with an optional fraction (or a bare fraction), optional exponent.
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("valid numeric prefix regex")
});

/// Reads a base price from element text the way a browser `parseFloat` does:
/// the longest leading numeric prefix wins, anything unparseable is zero.
///
/// `"4999.00"` → `4999.00`, `"12.5kg"` → `12.5`, `"1.5e3"` → `1500`,
/// `"TBA"` → `0`. Values outside the `Decimal` range clamp to
/// `Decimal::MAX` / `Decimal::MIN`.
#[must_use]
pub fn parse_base_price(text: &str) -> Decimal {
    let Some(found) = NUMERIC_PREFIX.find(text.trim()) else {
        return Decimal::ZERO;
    };
    let literal = found.as_str();
    decimal_from_literal(literal).unwrap_or_else(|| clamped_decimal(literal))
}

/// Exact conversion; `None` when the value does not fit a `Decimal`.
fn decimal_from_literal(literal: &str) -> Option<Decimal> {
    let (mantissa, exponent) = match literal.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e.parse::<i64>().ok()?)),
        None => (literal, None),
    };

    let unsigned = mantissa.trim_start_matches(['+', '-']).trim_end_matches('.');
    let unsigned = if unsigned.starts_with('.') {
        format!("0{unsigned}")
    } else {
        unsigned.to_owned()
    };
    let mantissa = if mantissa.starts_with('-') {
        format!("-{unsigned}")
    } else {
        unsigned
    };

    match exponent {
        None => Decimal::from_str(&mantissa).ok(),
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{exp}")).ok(),
    }
}

fn clamped_decimal(literal: &str) -> Decimal {
    let Ok(value) = literal.parse::<f64>() else {
        return Decimal::ZERO;
    };
    if value.abs() < 1.0 {
        // Underflow below the smallest representable scale.
        return Decimal::from_f64(value).unwrap_or(Decimal::ZERO);
    }
    Decimal::from_f64(value).unwrap_or(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Rounds a distance to the two decimals it is persisted with, so a fresh
/// resolution and a later cache hit price identically.
#[must_use]
pub fn round_distance_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Flat surcharge of 100 for every full 100 km to the nearest fulfillment
/// point. Step function: `99.99 → 0`, `100 → 100`, `250 → 200`.
///
/// Callers pass the distance after [`round_distance_km`], so a raw
/// `99.996` km becomes `100.00` and carries the first tier.
///
/// Negative or non-finite distances carry no surcharge.
#[must_use]
pub fn surcharge_for_distance(distance_km: f64) -> Decimal {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return Decimal::ZERO;
    }
    let tiers = (distance_km / TIER_STEP).floor();
    Decimal::from_f64(tiers).map_or(Decimal::ZERO, |t| t * Decimal::ONE_HUNDRED)
}

#[must_use]
pub fn adjusted_price(base: Decimal, distance_km: f64) -> Decimal {
    base.saturating_add(surcharge_for_distance(distance_km))
}

/// Formats an amount with thousands separators and exactly two decimals,
/// e.g. `10099.5` → `"10,099.50"`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}.{frac_part}")
    } else {
        format!("{grouped}.{frac_part}")
    }
}
