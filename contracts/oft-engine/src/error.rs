//! Error types for the OFT engine contract

use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only the messaging endpoint can call this entry point")]
    OnlyEndpoint,

    #[error("Unauthorized: packet sender is not the peer registered for eid {eid}")]
    OnlyPeer { eid: u32 },

    // ========================================================================
    // Engine State Errors
    // ========================================================================

    #[error("OFT is paused")]
    Paused,

    #[error("Invalid local decimals: shared decimals {shared} exceed local decimals {local}")]
    InvalidLocalDecimals { local: u8, shared: u8 },

    #[error("No peer registered for eid {eid}")]
    NoPeer { eid: u32 },

    #[error("Redundant config value: {field} is already set to the requested value")]
    RedundantConfigValue { field: String },

    // ========================================================================
    // Fee Errors
    // ========================================================================

    #[error("Invalid fee bps: {fee_bps} exceeds 10000")]
    InvalidFeeBps { fee_bps: u16 },

    #[error("Invalid fee deposit address")]
    InvalidFeeDepositAddress,

    // ========================================================================
    // Amount & Funds Errors
    // ========================================================================

    #[error("Slippage exceeded: amount received {amount_received} is below minimum {min_amount}")]
    SlippageExceeded {
        amount_received: Uint128,
        min_amount: Uint128,
    },

    #[error("Insufficient escrow balance: available {available}, requested {requested}")]
    InsufficientEscrowBalance {
        available: Uint128,
        requested: Uint128,
    },

    #[error("Amount {amount_ld} exceeds the 64-bit shared amount range")]
    AmountSdOverflow { amount_ld: Uint128 },

    // ========================================================================
    // Rate Limit Errors
    // ========================================================================

    #[error("Rate limit exceeded: {direction} capacity for eid {eid} is {available}, requested {requested}")]
    RateLimitExceeded {
        eid: u32,
        direction: String,
        available: Uint128,
        requested: Uint128,
    },

    #[error("Invalid rate limit: window must be greater than zero seconds")]
    InvalidRateLimit,

    // ========================================================================
    // Send / Receive Errors
    // ========================================================================

    #[error("Send request does not match the pending send record")]
    MismatchedSendContext,

    #[error("Compose message not allowed on this entry point")]
    ComposeNotAllowed,

    #[error("Compose message required on this entry point")]
    ComposeRequired,

    #[error("Invalid compose target: queue composer is {expected}, message targets {got}")]
    InvalidComposeTarget { expected: String, got: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },

    #[error("Invalid options: {reason}")]
    InvalidOptions { reason: String },

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },
}
