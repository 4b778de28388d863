//! State definitions for the OFT engine contract
//!
//! Fee, rate limiter and treasury state live next to their logic in
//! `fee_manager`, `rate_limiter` and `treasury`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether sends and receives are currently paused
    pub paused: bool,
    /// cw20 token bridged by this engine
    pub token: Addr,
    /// Decimals of the cw20 token
    pub local_decimals: u8,
    /// Precision used on the wire
    pub shared_decimals: u8,
    /// 10^(local_decimals - shared_decimals), fixed at instantiation
    pub decimal_conversion_rate: Uint128,
    /// Messaging endpoint contract
    pub endpoint: Addr,
    /// Composer registry receiving composed-transfer deposits
    pub composer_registry: Addr,
    /// Bech32 prefix used when decoding 32-byte recipients into local addresses
    pub bech32_prefix: String,
}

/// Amounts computed for one outbound transfer (local decimals)
#[cw_serde]
pub struct OftReceipt {
    /// Amount debited from the sender, fee included
    pub amount_sent_ld: Uint128,
    /// Amount credited on the destination chain
    pub amount_received_ld: Uint128,
}

/// Record linking a dispatched send to its confirmation
#[cw_serde]
pub struct PendingSend {
    pub request_id: u64,
    pub sender: Addr,
    pub dst_eid: u32,
    pub receipt: OftReceipt,
    /// Where unspent transport fee goes (sender when unset)
    pub refund_address: Option<Addr>,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:oft-engine";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bech32 prefix for decoded recipients
pub const DEFAULT_BECH32_PREFIX: &str = "terra";

/// Plain transfer message type
pub const SEND: u16 = 1;

/// Transfer carrying a compose payload
pub const SEND_AND_CALL: u16 = 2;

// ============================================================================
// Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Remote OApp per endpoint id
/// Key: eid, Value: 32-byte peer address
pub const PEERS: Map<u32, Binary> = Map::new("peers");

/// Enforced executor options
/// Key: (eid, msg_type), Value: type 3 options
pub const ENFORCED_OPTIONS: Map<(u32, u16), Binary> = Map::new("enforced_options");

/// Next send request id
pub const NEXT_REQUEST_ID: Item<u64> = Item::new("next_request_id");

/// Sends dispatched to the endpoint and not yet confirmed
/// Key: request id, Value: PendingSend
pub const PENDING_SENDS: Map<u64, PendingSend> = Map::new("pending_sends");
