//! Pet statistics.
//!
//! Read-only view of the pet's on-chain state. Stats queries go straight to
//! the RPC as `eth_call`s; they are never signed and never touch the session
//! allowlist.

use std::sync::Arc;

use alloy::dyn_abi::FunctionExt;
use serde::{Deserialize, Serialize};

use crate::chain::client::ChainClient;
use crate::chain::contract::PetContract;
use crate::chain::types::{ChainError, ChainResult};

const STATS_METHOD: &str = "get_stats";

/// The pet's current condition, as the contract reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetStats {
    pub hunger: u8,
    pub happiness: u8,
    pub energy: u8,
}

impl std::fmt::Display for PetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hunger {}, happiness {}, energy {}",
            self.hunger, self.happiness, self.energy
        )
    }
}

/// Reads pet stats through the chain client.
#[derive(Debug, Clone)]
pub struct StatsReader {
    contract: Arc<PetContract>,
    client: Arc<ChainClient>,
}

impl StatsReader {
    pub fn new(contract: Arc<PetContract>, client: Arc<ChainClient>) -> Self {
        Self { contract, client }
    }

    /// Fetch the current stats from the contract.
    pub async fn read(&self) -> ChainResult<PetStats> {
        let call = self.contract.populate_view(STATS_METHOD, &[])?;
        let output = self.client.call(&call).await?;

        let function = self.contract.function(STATS_METHOD)?;
        decode_stats(function, &output)
    }
}

/// Decode the `get_stats` return data.
pub fn decode_stats(function: &alloy::json_abi::Function, data: &[u8]) -> ChainResult<PetStats> {
    let values = function
        .abi_decode_output(data)
        .map_err(|e| ChainError::InvalidData(format!("stats output: {}", e)))?;

    let mut stats = values.iter().filter_map(|v| {
        let (value, _) = v.as_uint()?;
        u8::try_from(value).ok()
    });

    match (stats.next(), stats.next(), stats.next()) {
        (Some(hunger), Some(happiness), Some(energy)) => Ok(PetStats {
            hunger,
            happiness,
            energy,
        }),
        _ => Err(ChainError::InvalidData(
            "stats output did not decode to three u8 values".to_string(),
        )),
    }
}
