use core_types::{OrderResult, TwapCampaignSpec};
use executor::ExecutionError;
use rust_decimal::Decimal;

/// The outcome of one slice: either the exchange's result or the error that
/// stopped it. `index` is the zero-based execution position.
#[derive(Debug, Clone)]
pub struct SliceOutcome {
    pub index: u32,
    pub quantity: Decimal,
    pub result: Result<OrderResult, ExecutionError>,
}

/// A completed TWAP campaign: the spec it ran under plus the ordered
/// per-slice outcomes. Only the scheduler mutates campaign state, and only
/// while the run is in flight; what callers receive is final.
#[derive(Debug, Clone)]
pub struct TwapCampaign {
    spec: TwapCampaignSpec,
    outcomes: Vec<SliceOutcome>,
}

impl TwapCampaign {
    pub(crate) fn new(spec: TwapCampaignSpec, outcomes: Vec<SliceOutcome>) -> Self {
        Self { spec, outcomes }
    }

    pub fn spec(&self) -> &TwapCampaignSpec {
        &self.spec
    }

    /// Per-slice outcomes in execution order.
    pub fn outcomes(&self) -> &[SliceOutcome] {
        &self.outcomes
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|s| s.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Total quantity the exchange reports as executed across all filled
    /// slices. Failed slices contribute nothing.
    pub fn executed_quantity(&self) -> Decimal {
        self.outcomes
            .iter()
            .filter_map(|s| s.result.as_ref().ok())
            .map(|r| r.executed_qty)
            .sum()
    }
}
