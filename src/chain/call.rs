//! Actions and contract-call data.
//!
//! Everything here is pure data: the closed set of pet actions, the typed
//! call request for each, and the fully-encoded call the submitter hands to
//! the session account.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, Selector};
use serde::{Deserialize, Serialize};

/// The closed set of pet actions this relay can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Feed,
    Play,
    Rest,
    /// Test-only helper on the contract, kept in the session allowlist for
    /// integration environments.
    SetStatsToHalf,
}

impl Action {
    /// Contract method name this action invokes.
    pub fn method(&self) -> &'static str {
        match self {
            Action::Feed => "feed",
            Action::Play => "play",
            Action::Rest => "rest",
            Action::SetStatsToHalf => "test_set_stats_to_half",
        }
    }

    /// Look an action up by its contract method name.
    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.method() == method)
    }

    /// Message shown to the user when the action finalizes successfully.
    pub fn success_message(&self) -> &'static str {
        match self {
            Action::Feed => "Your pet enjoyed the meal!",
            Action::Play => "Your pet had a great time playing!",
            Action::Rest => "Your pet is well rested!",
            Action::SetStatsToHalf => "Pet stats reset to half.",
        }
    }

    /// Message shown to the user when the action does not finalize.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Feed => "Could not feed your pet.",
            Action::Play => "Could not play with your pet.",
            Action::Rest => "Could not put your pet to rest.",
            Action::SetStatsToHalf => "Could not reset pet stats.",
        }
    }

    pub const ALL: [Action; 4] = [
        Action::Feed,
        Action::Play,
        Action::Rest,
        Action::SetStatsToHalf,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method())
    }
}

/// A typed call request, keyed by action.
///
/// Today every action is nullary; the variant payloads are where future
/// argument-bearing actions get their typed fields, and `args` is the single
/// place they are lowered for ABI encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionCall {
    Feed,
    Play,
    Rest,
    SetStatsToHalf,
}

impl ActionCall {
    /// The action this call performs.
    pub fn action(&self) -> Action {
        match self {
            ActionCall::Feed => Action::Feed,
            ActionCall::Play => Action::Play,
            ActionCall::Rest => Action::Rest,
            ActionCall::SetStatsToHalf => Action::SetStatsToHalf,
        }
    }

    /// Arguments in ABI-encoding order.
    pub fn args(&self) -> Vec<DynSolValue> {
        match self {
            ActionCall::Feed | ActionCall::Play | ActionCall::Rest | ActionCall::SetStatsToHalf => {
                Vec::new()
            }
        }
    }
}

impl From<Action> for ActionCall {
    fn from(action: Action) -> Self {
        match action {
            Action::Feed => ActionCall::Feed,
            Action::Play => ActionCall::Play,
            Action::Rest => ActionCall::Rest,
            Action::SetStatsToHalf => ActionCall::SetStatsToHalf,
        }
    }
}

/// A fully-resolved contract call, ready for submission.
///
/// `calldata` is the selector-prefixed ABI encoding; `selector` is duplicated
/// out of it for logging and session-side checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedCall {
    /// Contract the call targets.
    pub target: Address,
    /// Method name, as it appears in the ABI and the session allowlist.
    pub method: String,
    /// Four-byte function selector.
    pub selector: Selector,
    /// Selector-prefixed ABI-encoded call data.
    pub calldata: Bytes,
}
