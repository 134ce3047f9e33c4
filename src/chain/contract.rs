//! Pet contract handle and call building.
//!
//! # Responsibilities
//! - Hold the deployed address, the embedded ABI, and the session allowlist
//! - Resolve an action to a selector-prefixed, ABI-encoded call
//! - Reject unknown or unauthorized methods before any network I/O
//!
//! # Design Decisions
//! - The allowlist and the ABI are both checked in one place; a method
//!   missing from either is the same `UnknownMethod` error
//! - View methods bypass the allowlist (the session never signs them) but
//!   still resolve through the ABI

use std::str::FromStr;

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::Address;

use crate::chain::call::{ActionCall, PopulatedCall};
use crate::chain::session::MethodAllowlist;
use crate::chain::types::{ChainError, ChainResult};
use crate::config::schema::{ContractConfig, SessionConfig};

/// ABI of the pet contract, embedded at compile time.
const PET_ABI_JSON: &str = r#"[
  {"type": "function", "name": "feed", "inputs": [], "outputs": [], "stateMutability": "nonpayable"},
  {"type": "function", "name": "play", "inputs": [], "outputs": [], "stateMutability": "nonpayable"},
  {"type": "function", "name": "rest", "inputs": [], "outputs": [], "stateMutability": "nonpayable"},
  {"type": "function", "name": "test_set_stats_to_half", "inputs": [], "outputs": [], "stateMutability": "nonpayable"},
  {"type": "function", "name": "get_stats", "inputs": [], "outputs": [
    {"name": "hunger", "type": "uint8"},
    {"name": "happiness", "type": "uint8"},
    {"name": "energy", "type": "uint8"}
  ], "stateMutability": "view"}
]"#;

/// Handle to the deployed pet contract.
#[derive(Debug, Clone)]
pub struct PetContract {
    address: Address,
    abi: JsonAbi,
    allowlist: MethodAllowlist,
}

impl PetContract {
    /// Build a handle for the deployed contract with the session's allowlist.
    pub fn new(address: Address, allowlist: MethodAllowlist) -> ChainResult<Self> {
        let abi: JsonAbi = serde_json::from_str(PET_ABI_JSON)
            .map_err(|e| ChainError::InvalidData(format!("embedded ABI: {}", e)))?;

        Ok(Self {
            address,
            abi,
            allowlist,
        })
    }

    /// Build a handle straight from configuration sections.
    pub fn from_config(contract: &ContractConfig, session: &SessionConfig) -> ChainResult<Self> {
        let address = Address::from_str(&contract.address)
            .map_err(|e| ChainError::InvalidData(format!("contract address: {}", e)))?;
        Self::new(address, MethodAllowlist::from(session))
    }

    /// Contract address this handle targets.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Resolve a typed action into a ready-to-submit call.
    pub fn populate(&self, call: &ActionCall) -> ChainResult<PopulatedCall> {
        self.populate_raw(call.action().method(), &call.args())
    }

    /// Resolve a method by name into a ready-to-submit call.
    ///
    /// Fails with `UnknownMethod` before any I/O when the method is absent
    /// from the session allowlist or the ABI.
    pub fn populate_raw(&self, method: &str, args: &[DynSolValue]) -> ChainResult<PopulatedCall> {
        if !self.allowlist.permits(method) {
            return Err(ChainError::UnknownMethod(method.to_string()));
        }
        let function = self.function(method)?;
        self.encode(function, args)
    }

    /// Resolve a read-only method into a call for `eth_call`-style execution.
    /// Not gated by the session allowlist.
    pub fn populate_view(&self, method: &str, args: &[DynSolValue]) -> ChainResult<PopulatedCall> {
        let function = self.function(method)?;
        self.encode(function, args)
    }

    /// Look a function up in the embedded ABI.
    pub fn function(&self, method: &str) -> ChainResult<&Function> {
        self.abi
            .function(method)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| ChainError::UnknownMethod(method.to_string()))
    }

    fn encode(&self, function: &Function, args: &[DynSolValue]) -> ChainResult<PopulatedCall> {
        let calldata = function
            .abi_encode_input(args)
            .map_err(|e| ChainError::Encoding {
                method: function.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(PopulatedCall {
            target: self.address,
            method: function.name.clone(),
            selector: function.selector(),
            calldata: calldata.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn contract() -> PetContract {
        PetContract::new(
            address!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            MethodAllowlist::new(["feed", "play", "rest", "test_set_stats_to_half"]),
        )
        .unwrap()
    }

    #[test]
    fn test_populate_feed_is_selector_only() {
        let call = contract().populate(&ActionCall::Feed).unwrap();

        assert_eq!(call.method, "feed");
        assert_eq!(call.calldata.len(), 4);
        assert_eq!(&call.calldata[..4], call.selector.as_slice());
    }

    #[test]
    fn test_unknown_method_rejected_before_any_io() {
        let err = contract().populate_raw("unlock_admin", &[]).unwrap_err();
        assert!(matches!(err, ChainError::UnknownMethod(m) if m == "unlock_admin"));
    }

    #[test]
    fn test_allowlisted_but_missing_from_abi_rejected() {
        let handle = PetContract::new(
            Address::ZERO,
            MethodAllowlist::new(["feed", "evolve"]),
        )
        .unwrap();

        let err = handle.populate_raw("evolve", &[]).unwrap_err();
        assert!(matches!(err, ChainError::UnknownMethod(m) if m == "evolve"));
    }

    #[test]
    fn test_view_method_bypasses_allowlist() {
        let handle = contract();

        // get_stats is not in the session allowlist.
        assert!(handle.populate_raw("get_stats", &[]).is_err());
        let view = handle.populate_view("get_stats", &[]).unwrap();
        assert_eq!(view.method, "get_stats");
        assert_eq!(view.calldata.len(), 4);
    }

    #[test]
    fn test_selectors_are_distinct_per_method() {
        let handle = contract();
        let feed = handle.populate(&ActionCall::Feed).unwrap();
        let play = handle.populate(&ActionCall::Play).unwrap();

        assert_ne!(feed.selector, play.selector);
        assert_eq!(feed.target, play.target);
    }

    #[test]
    fn test_wrong_arity_is_an_encoding_error() {
        let err = contract()
            .populate_raw("feed", &[DynSolValue::Uint(alloy::primitives::U256::from(1u8), 8)])
            .unwrap_err();
        assert!(matches!(err, ChainError::Encoding { method, .. } if method == "feed"));
    }
}
