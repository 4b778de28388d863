//! Message types for the OFT engine contract
//!
//! The execute surface is a superset of the endpoint's OApp call-backs
//! (`ConfirmSend`, `LzReceive`, `LzReceiveWithCompose`) so the endpoint can
//! call the engine with `common::OAppExecuteMsg` directly.

use common::endpoint::{MessagingFee, MessagingParams, MessagingReceipt, Origin, SendRequest};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use crate::fee_manager::FeeDetail;
use crate::rate_limiter::RateLimit;
use crate::state::{OftReceipt, PendingSend};

pub use crate::rate_limiter::Direction;

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Treasury strategy selected at instantiation
#[cw_serde]
pub enum TreasuryKind {
    /// Burn on send, mint on receive (engine must be the cw20 minter)
    MintBurn,
    /// Lock on send, release on receive
    EscrowRelease,
}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// cw20 token contract bridged by this engine
    pub token: String,
    /// Messaging endpoint contract
    pub endpoint: String,
    /// Composer registry contract
    pub composer_registry: String,
    /// Precision used on the wire (must not exceed the token's decimals)
    pub shared_decimals: u8,
    pub treasury: TreasuryKind,
    /// Initial fee in basis points (default 0)
    pub fee_bps: Option<u16>,
    /// Fee deposit address; sends fail until one is configured
    pub fee_deposit_address: Option<String>,
    /// Prefix for recipients decoded from the wire (default "terra")
    pub bech32_prefix: Option<String>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Parameters of an outbound transfer
#[cw_serde]
pub struct SendParam {
    /// Destination endpoint id
    pub dst_eid: u32,
    /// Recipient on the destination chain (32 bytes)
    pub to: Binary,
    /// Amount to debit, local decimals
    pub amount_ld: Uint128,
    /// Minimum amount credited on the destination, local decimals
    pub min_amount_ld: Uint128,
    /// Caller options merged with the enforced options (type 3 or empty)
    pub extra_options: Binary,
    /// Compose payload for the recipient (empty = plain transfer)
    pub compose_msg: Binary,
}

/// Enforced options for one pathway and message type
#[cw_serde]
pub struct EnforcedOptionParam {
    pub eid: u32,
    pub msg_type: u16,
    /// Type 3 options, empty to clear
    pub options: Binary,
}

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Outbound Transfers
    // ========================================================================
    /// Debit the sender and dispatch a transfer to `send_param.dst_eid`.
    ///
    /// The transport fee is attached as native funds. The sender must have
    /// granted the engine a cw20 allowance covering the full debit.
    Send {
        send_param: SendParam,
        /// Receives unspent transport fee (defaults to the sender)
        refund_address: Option<String>,
    },

    /// Endpoint call-back completing a `Send`
    ///
    /// Authorization: messaging endpoint only
    ConfirmSend {
        request: SendRequest,
        receipt: MessagingReceipt,
    },

    // ========================================================================
    // Inbound Transfers
    // ========================================================================
    /// Deliver a plain transfer
    ///
    /// Authorization: messaging endpoint only
    LzReceive {
        origin: Origin,
        guid: Binary,
        message: Binary,
        /// Account executing the delivery; attached funds go back to it
        executor: String,
        extra_data: Binary,
    },

    /// Deliver a transfer carrying a compose payload
    ///
    /// Authorization: messaging endpoint only
    LzReceiveWithCompose {
        origin: Origin,
        guid: Binary,
        message: Binary,
        executor: String,
        extra_data: Binary,
        /// Compose queue whose composer must be the transfer's recipient
        compose_queue: String,
    },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Pause or unpause sends and receives
    SetPause { paused: bool },

    /// Register the remote OApp for an endpoint id
    SetPeer { eid: u32, peer: Binary },

    /// Set the delegate allowed to configure this OApp on the endpoint
    SetDelegate { delegate: String },

    /// Set enforced options for pathways
    SetEnforcedOptions { options: Vec<EnforcedOptionParam> },

    /// Configure (or reset) a rate limit bucket
    SetRateLimit {
        eid: u32,
        direction: Direction,
        limit: Uint128,
        window_seconds: u64,
    },

    /// Remove a rate limit bucket (pathway becomes unlimited)
    UnsetRateLimit { eid: u32, direction: Direction },

    /// Set the fee in basis points (0..=10000)
    SetFeeBps { fee_bps: u16 },

    /// Set the fee deposit address
    SetFeeDepositAddress { address: String },

    /// Register with the endpoint; metadata is generated when omitted
    RegisterOApp { lz_receive_info: Option<Binary> },
}

/// Data attached to the `Send` response
#[cw_serde]
pub struct SendResponseData {
    pub request: SendRequest,
    pub pending: PendingSend,
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(FeeConfigResponse)]
    FeeConfig {},

    #[returns(TreasuryResponse)]
    Treasury {},

    #[returns(PeerResponse)]
    Peer { eid: u32 },

    /// Enforced options for a pathway and message type (empty when unset)
    #[returns(OptionsResponse)]
    EnforcedOptions { eid: u32, msg_type: u16 },

    /// Enforced options merged with `extra_options`
    #[returns(OptionsResponse)]
    CombineOptions {
        eid: u32,
        msg_type: u16,
        extra_options: Binary,
    },

    /// Bucket state, available capacity and in-flight at block time
    #[returns(RateLimitResponse)]
    RateLimit { eid: u32, direction: Direction },

    #[returns(Option<PendingSend>)]
    PendingSend { request_id: u64 },

    /// Limits, fee breakdown and receipt of a prospective send
    #[returns(QuoteOftResponse)]
    QuoteOft { send_param: SendParam },

    /// Build the endpoint quote request for a prospective send
    #[returns(QuoteRequest)]
    QuoteSend {
        sender: String,
        send_param: SendParam,
        pay_in_zro: bool,
    },

    /// Resolve a quote request into a transport fee
    #[returns(MessagingFee)]
    ConfirmQuoteSend { request: QuoteRequest },

    /// Receive-execution metadata the engine registers with the endpoint
    #[returns(Binary)]
    LzReceiveInfo {},
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub token: Addr,
    pub local_decimals: u8,
    pub shared_decimals: u8,
    pub decimal_conversion_rate: Uint128,
    pub endpoint: Addr,
    pub composer_registry: Addr,
    pub bech32_prefix: String,
}

#[cw_serde]
pub struct FeeConfigResponse {
    pub fee_bps: u16,
    pub fee_deposit_address: Option<Addr>,
}

#[cw_serde]
pub struct TreasuryResponse {
    /// "mint_burn" or "escrow_release"
    pub kind: String,
    /// Locked balance (zero for mint/burn)
    pub escrow_balance: Uint128,
}

#[cw_serde]
pub struct PeerResponse {
    pub eid: u32,
    pub peer: Option<Binary>,
}

#[cw_serde]
pub struct OptionsResponse {
    pub options: Binary,
}

#[cw_serde]
pub struct RateLimitResponse {
    pub eid: u32,
    pub direction: Direction,
    /// None when the pathway is unlimited
    pub rate_limit: Option<RateLimit>,
    pub available_capacity: Option<Uint128>,
    pub in_flight: Option<Uint128>,
}

/// Bounds on a send amount, local decimals
#[cw_serde]
pub struct OftLimit {
    pub min_amount_ld: Uint128,
    pub max_amount_ld: Uint128,
}

#[cw_serde]
pub struct QuoteOftResponse {
    pub limit: OftLimit,
    pub fee_details: Vec<FeeDetail>,
    pub receipt: OftReceipt,
}

/// Pending quote: the endpoint `Quote` query a send would issue
#[cw_serde]
pub struct QuoteRequest {
    /// OApp the quote is for
    pub sender: String,
    pub params: MessagingParams,
    pub receipt: OftReceipt,
}
