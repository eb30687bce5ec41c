//! # Meridian Validator Crate
//!
//! Pure input validation: raw strings in, a normalized `OrderRequest` or
//! `TwapCampaignSpec` out. Nothing here touches the network or any state, and
//! validation errors never reach the exchange gateway. Rules are applied in a
//! fixed order (symbol, side, quantity, prices) and fail fast on the first
//! violation.

use core_types::{OrderKind, OrderRequest, OrderSide, TwapCampaignSpec};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

pub mod error;

pub use error::ValidationError;

/// Validates and normalizes a MARKET order.
pub fn validate_market(
    quantity_step: Decimal,
    raw_symbol: &str,
    raw_side: &str,
    raw_quantity: &str,
) -> Result<OrderRequest, ValidationError> {
    let symbol = normalize_symbol(raw_symbol)?;
    let side = normalize_side(raw_side)?;
    let quantity = parse_quantity(quantity_step, raw_quantity)?;

    Ok(OrderRequest {
        symbol,
        side,
        quantity,
        kind: OrderKind::Market,
    })
}

/// Validates and normalizes a LIMIT order.
pub fn validate_limit(
    quantity_step: Decimal,
    raw_symbol: &str,
    raw_side: &str,
    raw_quantity: &str,
    raw_price: Option<&str>,
) -> Result<OrderRequest, ValidationError> {
    let symbol = normalize_symbol(raw_symbol)?;
    let side = normalize_side(raw_side)?;
    let quantity = parse_quantity(quantity_step, raw_quantity)?;
    let price = parse_price("price", raw_price)?;

    Ok(OrderRequest {
        symbol,
        side,
        quantity,
        kind: OrderKind::Limit { price },
    })
}

/// Validates and normalizes a STOP (stop-limit) order.
///
/// No ordering constraint is imposed between the limit price and the trigger
/// price; the exchange owns the trigger semantics for each side.
pub fn validate_stop(
    quantity_step: Decimal,
    raw_symbol: &str,
    raw_side: &str,
    raw_quantity: &str,
    raw_price: Option<&str>,
    raw_trigger_price: Option<&str>,
) -> Result<OrderRequest, ValidationError> {
    let symbol = normalize_symbol(raw_symbol)?;
    let side = normalize_side(raw_side)?;
    let quantity = parse_quantity(quantity_step, raw_quantity)?;
    let price = parse_price("price", raw_price)?;
    let trigger_price = parse_price("trigger price", raw_trigger_price)?;

    Ok(OrderRequest {
        symbol,
        side,
        quantity,
        kind: OrderKind::Stop {
            price,
            trigger_price,
        },
    })
}

/// Validates the parameters of a TWAP campaign.
///
/// The aggregate quantity is validated once here; the slicing arithmetic is
/// trusted afterwards. The check on the base slice quantity guarantees no
/// slice degenerates below the exchange quantity step.
pub fn validate_campaign(
    quantity_step: Decimal,
    raw_symbol: &str,
    raw_side: &str,
    raw_total_quantity: &str,
    slice_count: u32,
    interval: Duration,
) -> Result<TwapCampaignSpec, ValidationError> {
    let symbol = normalize_symbol(raw_symbol)?;
    let side = normalize_side(raw_side)?;
    let total_quantity = parse_quantity(quantity_step, raw_total_quantity)?;

    if slice_count < 1 {
        return Err(ValidationError::InvalidSliceCount(slice_count));
    }

    let spec = TwapCampaignSpec {
        symbol,
        side,
        total_quantity,
        slice_count,
        interval,
    };

    let quantities = spec.slice_quantities(quantity_step);
    if quantities[0] < quantity_step {
        return Err(ValidationError::InvalidQuantity(format!(
            "total quantity {total_quantity} is too small to split into {slice_count} slices of at least {quantity_step}"
        )));
    }

    Ok(spec)
}

fn normalize_symbol(raw: &str) -> Result<String, ValidationError> {
    let symbol = raw.trim().to_uppercase();
    let well_formed = (3..=20).contains(&symbol.len())
        && symbol.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !well_formed {
        return Err(ValidationError::InvalidSymbol(raw.to_string()));
    }
    Ok(symbol)
}

fn normalize_side(raw: &str) -> Result<OrderSide, ValidationError> {
    let side = raw.trim();
    if side.eq_ignore_ascii_case("BUY") {
        Ok(OrderSide::Buy)
    } else if side.eq_ignore_ascii_case("SELL") {
        Ok(OrderSide::Sell)
    } else {
        Err(ValidationError::InvalidSide(raw.to_string()))
    }
}

fn parse_quantity(quantity_step: Decimal, raw: &str) -> Result<Decimal, ValidationError> {
    let quantity = Decimal::from_str(raw.trim())
        .map_err(|_| ValidationError::InvalidQuantity(format!("{raw:?} is not a number")))?;
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::InvalidQuantity(format!(
            "{quantity} is not positive"
        )));
    }
    if quantity < quantity_step {
        return Err(ValidationError::InvalidQuantity(format!(
            "{quantity} is below the minimum quantity step {quantity_step}"
        )));
    }
    Ok(quantity)
}

fn parse_price(field: &'static str, raw: Option<&str>) -> Result<Decimal, ValidationError> {
    let raw = raw.ok_or(ValidationError::MissingPrice(field))?;
    let price = Decimal::from_str(raw.trim()).map_err(|_| ValidationError::InvalidPrice {
        field,
        value: raw.to_string(),
    })?;
    if price <= Decimal::ZERO {
        return Err(ValidationError::InvalidPrice {
            field,
            value: raw.to_string(),
        });
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const STEP: Decimal = dec!(0.001);

    #[test]
    fn accepts_and_normalizes_a_market_order() {
        let order = validate_market(STEP, " btcusdt ", "buy", "0.01").unwrap();
        assert_eq!(order.symbol, "BTCUSDT");
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.quantity, dec!(0.01));
        assert_eq!(order.kind, OrderKind::Market);
    }

    #[test]
    fn rejects_malformed_symbols() {
        for bad in ["", "BT", "BTC-USDT", "btc usdt", "AVERYLONGSYMBOLNAME12345"] {
            let err = validate_market(STEP, bad, "BUY", "0.01").unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidSymbol(_)),
                "symbol {bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_unknown_sides() {
        let err = validate_market(STEP, "BTCUSDT", "HOLD", "0.01").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSide(_)));
    }

    #[test]
    fn side_is_case_insensitive() {
        let order = validate_market(STEP, "BTCUSDT", "SeLl", "0.01").unwrap();
        assert_eq!(order.side, OrderSide::Sell);
    }

    #[test]
    fn rejects_zero_negative_and_non_numeric_quantities() {
        for bad in ["0", "-1", "abc", ""] {
            let err = validate_market(STEP, "BTCUSDT", "BUY", bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidQuantity(_)),
                "quantity {bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_quantity_below_the_step() {
        let err = validate_market(STEP, "BTCUSDT", "BUY", "0.0001").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidQuantity(_)));
    }

    #[test]
    fn limit_requires_a_price() {
        let err = validate_limit(STEP, "BTCUSDT", "SELL", "0.01", None).unwrap_err();
        assert_eq!(err, ValidationError::MissingPrice("price"));

        let order = validate_limit(STEP, "BTCUSDT", "SELL", "0.01", Some("75000")).unwrap();
        assert_eq!(order.kind, OrderKind::Limit { price: dec!(75000) });
    }

    #[test]
    fn stop_requires_both_prices() {
        let err =
            validate_stop(STEP, "BTCUSDT", "BUY", "0.01", Some("75000"), None).unwrap_err();
        assert_eq!(err, ValidationError::MissingPrice("trigger price"));

        let order = validate_stop(
            STEP,
            "BTCUSDT",
            "BUY",
            "0.01",
            Some("75000"),
            Some("74000"),
        )
        .unwrap();
        assert_eq!(
            order.kind,
            OrderKind::Stop {
                price: dec!(75000),
                trigger_price: dec!(74000)
            }
        );
    }

    #[test]
    fn rejects_non_positive_prices() {
        let err =
            validate_limit(STEP, "BTCUSDT", "SELL", "0.01", Some("-5")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPrice { field: "price", .. }));
    }

    #[test]
    fn no_ordering_constraint_between_stop_prices() {
        // A BUY stop with trigger above or below its limit price is accepted
        // either way; the exchange owns that rule.
        for trigger in ["74000", "76000"] {
            validate_stop(STEP, "BTCUSDT", "BUY", "0.01", Some("75000"), Some(trigger))
                .unwrap();
        }
    }

    #[test]
    fn campaign_requires_at_least_one_slice() {
        let err = validate_campaign(
            STEP,
            "BTCUSDT",
            "BUY",
            "0.01",
            0,
            Duration::from_secs(10),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidSliceCount(0));
    }

    #[test]
    fn campaign_rejects_totals_too_small_to_slice() {
        let err = validate_campaign(
            STEP,
            "BTCUSDT",
            "BUY",
            "0.002",
            5,
            Duration::from_secs(10),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidQuantity(_)));
    }

    #[test]
    fn campaign_accepts_a_zero_interval() {
        let spec =
            validate_campaign(STEP, "BTCUSDT", "SELL", "0.01", 5, Duration::ZERO).unwrap();
        assert_eq!(spec.interval, Duration::ZERO);
        assert_eq!(spec.slice_count, 5);
    }
}
