//! Fee and resource-bound policy.
//!
//! # Responsibilities
//! - Produce the resource-bound parameters attached to every submission
//! - Keep the relay's fee exposure capped by static configuration
//! - Serialize bounds in the wire shape the session service expects
//!
//! # Design Decisions
//! - Deterministic: constants from config, no price oracle, no estimation
//! - Both bound kinds are always present; the execution-layer kind is
//!   explicitly zeroed, never omitted
//! - One constant set for every submission path

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::config::schema::FeeConfig;

/// Transaction envelope version the session service signs.
pub const TRANSACTION_VERSION: u8 = 3;

/// Bounds for one resource kind: how much may be consumed, and at what unit
/// price. Quantities serialize as 0x-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBounds {
    pub max_amount: U256,
    pub max_price_per_unit: U256,
}

impl ResourceBounds {
    /// Explicitly zeroed bounds for an unused resource kind.
    pub fn zero() -> Self {
        Self {
            max_amount: U256::ZERO,
            max_price_per_unit: U256::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.max_amount.is_zero() && self.max_price_per_unit.is_zero()
    }
}

/// Bounds for every resource kind the chain meters.
///
/// The settlement-layer kind (`l1_gas`) carries the real caps; the
/// execution-layer kind (`l2_gas`) is zeroed under the single-channel fee
/// policy but always serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBoundsMapping {
    pub l1_gas: ResourceBounds,
    pub l2_gas: ResourceBounds,
}

/// Mode selecting where fee data is made available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataAvailabilityMode {
    L1,
    L2,
}

/// Complete fee metadata attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFees {
    /// Transaction envelope version.
    pub version: u8,

    /// Overall fee ceiling.
    pub max_fee: U256,

    /// Where fee data is made available.
    pub fee_data_availability_mode: DataAvailabilityMode,

    /// Priority tip.
    pub tip: U256,

    /// Reserved for sponsored-fee flows; always empty today.
    pub paymaster_data: Vec<U256>,

    /// Per-kind resource caps.
    pub resource_bounds: ResourceBoundsMapping,
}

/// Computes fee parameters for submissions from configured constants.
#[derive(Debug, Clone)]
pub struct FeePolicy {
    config: FeeConfig,
}

impl FeePolicy {
    pub fn new(config: &FeeConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Resource bounds for a submission. Same output for every call.
    pub fn resource_bounds(&self) -> ResourceBoundsMapping {
        ResourceBoundsMapping {
            l1_gas: ResourceBounds {
                max_amount: U256::from(self.config.max_gas_amount),
                max_price_per_unit: U256::from(self.config.max_gas_price),
            },
            l2_gas: ResourceBounds::zero(),
        }
    }

    /// Full fee metadata for a submission.
    pub fn execution_fees(&self) -> ExecutionFees {
        ExecutionFees {
            version: TRANSACTION_VERSION,
            max_fee: U256::from(self.config.max_fee),
            fee_data_availability_mode: DataAvailabilityMode::L1,
            tip: U256::from(self.config.tip),
            paymaster_data: Vec::new(),
            resource_bounds: self.resource_bounds(),
        }
    }
}
