//! Statistical math utilities for performance metric calculations.

use rust_decimal::Decimal;

use super::constants::{TOLERANCE, TWO};

/// Sum that clamps at the `Decimal` range instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Calculate mean of a slice of decimals.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = saturating_sum(values.iter().copied());
    Some(sum / Decimal::from(values.len() as u64))
}

/// Calculate the median of a slice of decimals.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] / TWO).saturating_add(sorted[mid] / TWO))
    } else {
        Some(sorted[mid])
    }
}

/// Calculate the population standard deviation (divides by `n`).
///
/// Deviations are scaled by the largest one before squaring, so the
/// intermediate sums stay within range for any input. `None` if a
/// deviation itself is not representable.
pub fn population_std_dev(values: &[Decimal]) -> Option<Decimal> {
    let avg = mean(values)?;
    let deviations = values
        .iter()
        .map(|v| v.checked_sub(avg))
        .collect::<Option<Vec<Decimal>>>()?;

    let scale = deviations
        .iter()
        .map(|d| d.abs())
        .max()
        .unwrap_or(Decimal::ZERO);
    if scale.is_zero() {
        return Some(Decimal::ZERO);
    }

    let scaled_sum = saturating_sum(deviations.iter().map(|d| {
        let ratio = *d / scale;
        ratio * ratio
    }));
    let variance = scaled_sum / Decimal::from(values.len() as u64);

    sqrt_decimal(variance)?.checked_mul(scale)
}

/// Approximate square root using Newton's method.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = if value > Decimal::ONE {
        value / TWO
    } else {
        Decimal::ONE
    };

    for _ in 0..100 {
        let next = (guess + value / guess) / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}
