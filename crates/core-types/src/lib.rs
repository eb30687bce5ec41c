//! # Meridian Core Types Crate
//!
//! The shared vocabulary of the application: order sides, kinds, statuses,
//! and the request/result structures that flow between the validator, the
//! executor, and the TWAP scheduler. This crate performs no I/O and has no
//! knowledge of the exchange wire format beyond the status strings it
//! deserializes.

pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{OrderSide, OrderStatus};
pub use structs::{OrderKind, OrderRequest, OrderResult, TwapCampaignSpec};
