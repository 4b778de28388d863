//! OFT Engine - Omnichain Fungible Token transfer engine for a cw20 token
//!
//! The engine moves a cw20 balance across chains through a messaging
//! endpoint. Amounts are normalized to shared decimals on the wire.
//!
//! # Outbound Flow
//! 1. User approves the engine and executes `Send` with the transport fee attached
//! 2. Fee is split off, dust removed, rate limits updated, tokens burned or escrowed
//! 3. The packet is dispatched to the endpoint with a send request handle
//! 4. The endpoint calls `ConfirmSend`, which consumes the pending record
//!
//! # Inbound Flow
//! 1. The endpoint delivers a packet from a registered peer via `LzReceive`
//! 2. Rate limits are updated and the recipient credited (mint or release)
//! 3. Compose transfers credit the composer registry and enqueue a compose envelope
//!
//! # Security
//! - Admin-only configuration and pause
//! - Endpoint-only call-backs, peer-authenticated deliveries
//! - Per-pathway net-flow rate limiting in both directions

pub mod address_codec;
pub mod codec;
pub mod contract;
pub mod decimals;
pub mod error;
mod execute;
pub mod fee_manager;
pub mod msg;
pub mod options;
mod query;
pub mod rate_limiter;
pub mod state;
pub mod treasury;

pub use crate::address_codec::UniversalAddress;
pub use crate::codec::{ComposeEnvelope, OftMessage};
pub use crate::error::ContractError;
pub use crate::fee_manager::{apply_fee, FeeConfig};
pub use crate::treasury::Treasury;
