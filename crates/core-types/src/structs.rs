use crate::enums::{OrderSide, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The kind of an order, with each variant carrying exactly the price fields
/// that kind requires. A LIMIT request without a price is unrepresentable,
/// so a missing field is caught at construction time rather than by the
/// exchange's error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderKind {
    Market,
    Limit {
        price: Decimal,
    },
    /// A stop-limit order: sits dormant until `trigger_price` trades, then
    /// becomes an active limit order at `price`.
    Stop {
        price: Decimal,
        trigger_price: Decimal,
    },
}

impl OrderKind {
    /// Returns the kind as the exchange expects it in the `type` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Market => "MARKET",
            OrderKind::Limit { .. } => "LIMIT",
            OrderKind::Stop { .. } => "STOP",
        }
    }
}

/// A fully validated order, ready to be turned into wire parameters.
///
/// Values of this type are only produced by the validator; the executor can
/// therefore assume the symbol is normalized and all quantities and prices
/// are strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub kind: OrderKind,
}

/// The normalized outcome of a successfully submitted order.
///
/// Constructed once from a parsed exchange response and immutable afterwards.
/// `raw` carries the untouched response body for the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub order_id: i64,
    pub status: OrderStatus,
    pub executed_qty: Decimal,
    /// Average fill price. `None` until the exchange reports a fill.
    pub avg_price: Option<Decimal>,
    pub raw: serde_json::Value,
}

/// The parameters of a TWAP campaign, validated up front.
///
/// The scheduler treats this as read-only input; the mutable campaign state
/// lives in the scheduler's own aggregate while the run is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwapCampaignSpec {
    pub symbol: String,
    pub side: OrderSide,
    pub total_quantity: Decimal,
    pub slice_count: u32,
    pub interval: Duration,
}

impl TwapCampaignSpec {
    /// Splits the total quantity into `slice_count` slices, flooring each of
    /// the first `n - 1` to the exchange quantity step and letting the final
    /// slice absorb the rounding remainder. The returned quantities always
    /// sum to `total_quantity` exactly.
    pub fn slice_quantities(&self, step: Decimal) -> Vec<Decimal> {
        let n = Decimal::from(self.slice_count);
        let base = ((self.total_quantity / n) / step).floor() * step;

        let mut quantities = vec![base; (self.slice_count - 1) as usize];
        quantities.push(self.total_quantity - base * (n - Decimal::ONE));
        quantities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spec(total: Decimal, slices: u32) -> TwapCampaignSpec {
        TwapCampaignSpec {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            total_quantity: total,
            slice_count: slices,
            interval: Duration::from_secs(10),
        }
    }

    #[test]
    fn even_split_has_equal_slices() {
        let quantities = spec(dec!(0.01), 5).slice_quantities(dec!(0.001));
        assert_eq!(quantities, vec![dec!(0.002); 5]);
        assert_eq!(quantities.iter().sum::<Decimal>(), dec!(0.01));
    }

    #[test]
    fn final_slice_absorbs_remainder() {
        let quantities = spec(dec!(0.011), 5).slice_quantities(dec!(0.001));
        assert_eq!(
            quantities,
            vec![dec!(0.002), dec!(0.002), dec!(0.002), dec!(0.002), dec!(0.003)]
        );
        assert_eq!(quantities.iter().sum::<Decimal>(), dec!(0.011));
    }

    #[test]
    fn single_slice_is_the_total() {
        let quantities = spec(dec!(0.007), 1).slice_quantities(dec!(0.001));
        assert_eq!(quantities, vec![dec!(0.007)]);
    }

    #[test]
    fn sums_are_exact_across_awkward_totals() {
        for (total, slices) in [
            (dec!(1), 3u32),
            (dec!(0.005), 4),
            (dec!(2.5), 7),
            (dec!(0.123), 10),
        ] {
            let quantities = spec(total, slices).slice_quantities(dec!(0.001));
            assert_eq!(quantities.len(), slices as usize);
            assert_eq!(quantities.iter().sum::<Decimal>(), total, "total {total}");
        }
    }

    #[test]
    fn order_kind_wire_names() {
        assert_eq!(OrderKind::Market.as_str(), "MARKET");
        assert_eq!(OrderKind::Limit { price: dec!(100) }.as_str(), "LIMIT");
        assert_eq!(
            OrderKind::Stop {
                price: dec!(100),
                trigger_price: dec!(99)
            }
            .as_str(),
            "STOP"
        );
    }

    #[test]
    fn unknown_status_string_maps_to_error() {
        let status: OrderStatus = serde_json::from_str("\"EXPIRED\"").unwrap();
        assert_eq!(status, OrderStatus::Error);
        let status: OrderStatus = serde_json::from_str("\"PARTIALLY_FILLED\"").unwrap();
        assert_eq!(status, OrderStatus::PartiallyFilled);
    }
}
