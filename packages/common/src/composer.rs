//! Composer registry interface.
//!
//! The registry custodies tokens credited for composed transfers until the
//! designated composer executes its follow-on logic for the message GUID.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

/// Execute messages accepted by the composer registry
#[cw_serde]
pub enum ComposerRegistryExecuteMsg {
    /// Record tokens already transferred to the registry for `composer`,
    /// keyed by the GUID of the delivered message.
    Deposit {
        guid: Binary,
        composer: String,
        /// cw20 token contract the deposit is denominated in
        token: String,
        amount: Uint128,
    },
}
