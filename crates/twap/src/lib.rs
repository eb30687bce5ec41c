//! # Meridian TWAP Crate
//!
//! Time-weighted execution: splits a total quantity into `n` market-order
//! slices and submits them strictly sequentially with a configured wait
//! between consecutive slices. The point of the strategy is temporal
//! spreading, so there are deliberately no concurrent slices.
//!
//! A slice failure is recorded in the campaign and the run continues; `run`
//! itself never fails. Interrupting the process between slices leaves the
//! already-completed slices as valid, immutable, audited results.

use audit::{AuditRecord, AuditSink};
use clock::Sleeper;
use core_types::{OrderKind, OrderRequest, OrderResult, TwapCampaignSpec};
use executor::{ExecutionError, Executor};
use rust_decimal::Decimal;
use std::sync::Arc;

pub mod campaign;

pub use campaign::{SliceOutcome, TwapCampaign};

const COMPONENT: &str = "twap";

/// Drives a TWAP campaign to completion.
pub struct TwapScheduler {
    executor: Arc<dyn Executor>,
    sleeper: Arc<dyn Sleeper>,
    audit: Arc<dyn AuditSink>,
    /// The exchange quantity step used to floor per-slice quantities.
    quantity_step: Decimal,
}

impl TwapScheduler {
    pub fn new(
        executor: Arc<dyn Executor>,
        sleeper: Arc<dyn Sleeper>,
        audit: Arc<dyn AuditSink>,
        quantity_step: Decimal,
    ) -> Self {
        Self {
            executor,
            sleeper,
            audit,
            quantity_step,
        }
    }

    /// Runs the campaign to completion, one slice at a time.
    ///
    /// The wait is observed between consecutive slices, never after the
    /// last. Placement and logging time add on top of the interval, so the
    /// observed spacing is a lower bound, not an exact cadence.
    pub async fn run(&self, spec: TwapCampaignSpec) -> TwapCampaign {
        let quantities = spec.slice_quantities(self.quantity_step);
        let slice_count = quantities.len();

        tracing::info!(
            symbol = %spec.symbol,
            side = %spec.side,
            total = %spec.total_quantity,
            slices = slice_count,
            interval_secs = spec.interval.as_secs_f64(),
            "starting TWAP campaign"
        );
        self.record(AuditRecord::info(
            COMPONENT,
            format!(
                "starting TWAP: symbol={} side={} total={} slices={} interval={:?}",
                spec.symbol, spec.side, spec.total_quantity, slice_count, spec.interval
            ),
        ));

        let mut outcomes: Vec<SliceOutcome> = Vec::with_capacity(slice_count);

        for (index, quantity) in quantities.into_iter().enumerate() {
            if index > 0 {
                self.sleeper.sleep(spec.interval).await;
            }

            tracing::info!(
                slice = index + 1,
                of = slice_count,
                quantity = %quantity,
                "placing TWAP slice"
            );

            let order = OrderRequest {
                symbol: spec.symbol.clone(),
                side: spec.side,
                quantity,
                kind: OrderKind::Market,
            };

            let result = self.executor.place_market(&order).await;
            self.record_slice(index, quantity, &result);
            outcomes.push(SliceOutcome {
                index: index as u32,
                quantity,
                result,
            });
        }

        let campaign = TwapCampaign::new(spec, outcomes);
        self.record(AuditRecord::info(
            COMPONENT,
            format!(
                "TWAP complete: attempted={} succeeded={} executed={}",
                campaign.attempted(),
                campaign.succeeded(),
                campaign.executed_quantity()
            ),
        ));
        tracing::info!(
            attempted = campaign.attempted(),
            succeeded = campaign.succeeded(),
            executed = %campaign.executed_quantity(),
            "TWAP campaign complete"
        );

        campaign
    }

    fn record_slice(
        &self,
        index: usize,
        quantity: Decimal,
        result: &Result<OrderResult, ExecutionError>,
    ) {
        let record = match result {
            Ok(order) => AuditRecord::info(
                COMPONENT,
                format!(
                    "slice {} filled qty={} orderId={} status={}",
                    index + 1,
                    quantity,
                    order.order_id,
                    order.status
                ),
            ),
            Err(e) => AuditRecord::error(
                COMPONENT,
                format!("slice {} failed qty={}: {e}", index + 1, quantity),
            ),
        };
        self.record(record);
    }

    fn record(&self, record: AuditRecord) {
        if let Err(e) = self.audit.append(record) {
            tracing::error!(error = %e, "failed to append audit record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use audit::MemoryAuditSink;
    use clock::RecordingSleeper;
    use core_types::{OrderSide, OrderStatus};
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// An executor that replays scripted outcomes and records each slice's
    /// request.
    struct ScriptedExecutor {
        script: Mutex<VecDeque<Result<OrderResult, ExecutionError>>>,
        requests: Mutex<Vec<OrderRequest>>,
    }

    impl ScriptedExecutor {
        fn new(script: Vec<Result<OrderResult, ExecutionError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<OrderRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Executor for ScriptedExecutor {
        async fn place_market(
            &self,
            order: &OrderRequest,
        ) -> Result<OrderResult, ExecutionError> {
            self.requests.lock().unwrap().push(order.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("executor called more times than scripted")
        }

        async fn place_limit(
            &self,
            _order: &OrderRequest,
        ) -> Result<OrderResult, ExecutionError> {
            unreachable!("TWAP only places market orders")
        }

        async fn place_stop(
            &self,
            _order: &OrderRequest,
        ) -> Result<OrderResult, ExecutionError> {
            unreachable!("TWAP only places market orders")
        }
    }

    fn fill(order_id: i64, qty: Decimal) -> Result<OrderResult, ExecutionError> {
        Ok(OrderResult {
            order_id,
            status: OrderStatus::Filled,
            executed_qty: qty,
            avg_price: Some(dec!(64000)),
            raw: serde_json::json!({"orderId": order_id}),
        })
    }

    fn rejected() -> Result<OrderResult, ExecutionError> {
        Err(ExecutionError::Rejected {
            code: -2019,
            reason: "Margin is insufficient.".to_string(),
        })
    }

    fn spec(total: Decimal, slices: u32, interval: Duration) -> TwapCampaignSpec {
        TwapCampaignSpec {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            total_quantity: total,
            slice_count: slices,
            interval,
        }
    }

    struct Harness {
        executor: Arc<ScriptedExecutor>,
        sleeper: Arc<RecordingSleeper>,
        scheduler: TwapScheduler,
    }

    fn harness(script: Vec<Result<OrderResult, ExecutionError>>) -> Harness {
        let executor = Arc::new(ScriptedExecutor::new(script));
        let sleeper = Arc::new(RecordingSleeper::new());
        let scheduler = TwapScheduler::new(
            executor.clone(),
            sleeper.clone(),
            Arc::new(MemoryAuditSink::new()),
            dec!(0.001),
        );
        Harness {
            executor,
            sleeper,
            scheduler,
        }
    }

    #[tokio::test]
    async fn slices_reconstruct_the_total_exactly() {
        let h = harness(vec![
            fill(1, dec!(0.002)),
            fill(2, dec!(0.002)),
            fill(3, dec!(0.002)),
            fill(4, dec!(0.002)),
            fill(5, dec!(0.003)),
        ]);
        let campaign = h
            .scheduler
            .run(spec(dec!(0.011), 5, Duration::from_secs(10)))
            .await;

        let requested: Vec<Decimal> = h.executor.requests().iter().map(|r| r.quantity).collect();
        assert_eq!(
            requested,
            vec![dec!(0.002), dec!(0.002), dec!(0.002), dec!(0.002), dec!(0.003)]
        );
        assert_eq!(requested.iter().sum::<Decimal>(), dec!(0.011));
        assert_eq!(campaign.attempted(), 5);
        assert_eq!(campaign.succeeded(), 5);
    }

    #[tokio::test]
    async fn interval_is_observed_between_slices_but_not_after_the_last() {
        let h = harness(vec![
            fill(1, dec!(0.002)),
            fill(2, dec!(0.002)),
            fill(3, dec!(0.002)),
            fill(4, dec!(0.002)),
            fill(5, dec!(0.002)),
        ]);
        h.scheduler
            .run(spec(dec!(0.01), 5, Duration::from_secs(10)))
            .await;

        assert_eq!(h.sleeper.recorded(), vec![Duration::from_secs(10); 4]);
    }

    #[tokio::test]
    async fn a_single_slice_never_waits() {
        let h = harness(vec![fill(1, dec!(0.01))]);
        h.scheduler
            .run(spec(dec!(0.01), 1, Duration::from_secs(10)))
            .await;
        assert!(h.sleeper.recorded().is_empty());
    }

    #[tokio::test]
    async fn a_failed_slice_does_not_abort_the_campaign() {
        let h = harness(vec![
            fill(1, dec!(0.003)),
            rejected(),
            fill(3, dec!(0.004)),
        ]);
        let campaign = h
            .scheduler
            .run(spec(dec!(0.01), 3, Duration::from_secs(1)))
            .await;

        assert_eq!(campaign.attempted(), 3);
        assert_eq!(campaign.succeeded(), 2);
        assert_eq!(campaign.failed(), 1);

        // Original slice order is preserved in the outcome list.
        let outcomes = campaign.outcomes();
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert!(outcomes[2].result.is_ok());
        assert_eq!(outcomes[1].index, 1);
    }

    #[tokio::test]
    async fn executed_quantity_counts_only_fills() {
        let h = harness(vec![
            fill(1, dec!(0.003)),
            rejected(),
            fill(3, dec!(0.004)),
        ]);
        let campaign = h
            .scheduler
            .run(spec(dec!(0.01), 3, Duration::ZERO))
            .await;
        assert_eq!(campaign.executed_quantity(), dec!(0.007));
    }

    #[tokio::test]
    async fn every_slice_is_attempted_even_when_all_fail() {
        let h = harness(vec![rejected(), rejected(), rejected()]);
        let campaign = h
            .scheduler
            .run(spec(dec!(0.01), 3, Duration::ZERO))
            .await;
        assert_eq!(campaign.attempted(), 3);
        assert_eq!(campaign.succeeded(), 0);
        assert_eq!(h.executor.requests().len(), 3);
    }

    #[tokio::test]
    async fn slices_are_market_orders_on_the_campaign_symbol_and_side() {
        let h = harness(vec![fill(1, dec!(0.005)), fill(2, dec!(0.005))]);
        h.scheduler
            .run(spec(dec!(0.01), 2, Duration::ZERO))
            .await;
        for request in h.executor.requests() {
            assert_eq!(request.symbol, "BTCUSDT");
            assert_eq!(request.side, OrderSide::Buy);
            assert_eq!(request.kind, OrderKind::Market);
        }
    }
}
