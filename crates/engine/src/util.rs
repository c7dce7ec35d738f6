//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim a required name and reject blank values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, mapping blank values to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Largest magnitude accepted for a cost or an opening balance.
///
/// Leaves headroom so impact differences (at most `2 * MAX_AMOUNT`) and
/// balances stay representable.
pub const MAX_AMOUNT: Money = Money::new(i64::MAX / 4);

fn amount_too_large() -> EngineError {
    EngineError::InvalidAmount(format!("amount must be at most {MAX_AMOUNT}"))
}

/// A cost is a magnitude: zero is accepted, negative values are not.
pub(crate) fn validate_cost(cost: Money) -> ResultEngine<Money> {
    if cost.is_negative() {
        return Err(EngineError::InvalidAmount(
            "cost must be >= 0".to_string(),
        ));
    }
    if cost > MAX_AMOUNT {
        return Err(amount_too_large());
    }
    Ok(cost)
}

/// Raised when balance arithmetic would leave the `i64` range.
pub(crate) fn balance_out_of_range() -> EngineError {
    EngineError::Validation("wallet balance out of range".to_string())
}

/// Opening balances may be negative but share the cost bound.
pub(crate) fn validate_opening_balance(amount: Money) -> ResultEngine<Money> {
    match amount.checked_abs() {
        Some(magnitude) if magnitude <= MAX_AMOUNT => Ok(amount),
        _ => Err(amount_too_large()),
    }
}
