//! Wire formats of the engine.
//!
//! ## Transfer message
//!
//! ```text
//! | send_to (32) | amount_sd (u64 BE, 8) |                                    plain, 40 bytes
//! | send_to (32) | amount_sd (u64 BE, 8) | compose_from (32) | compose_msg |  compose, >= 72 bytes
//! ```
//!
//! ## Compose envelope
//!
//! Handed to the composer once an inbound compose transfer is credited.
//! `amount_ld` is in local decimals and carries the full `Uint128` range, since
//! `u64::MAX` shared units scale past 64 bits for any token with more local
//! than shared decimals.
//!
//! ```text
//! | nonce (u64 BE) | src_eid (u32 BE) | amount_ld (u128 BE, 16) | compose_from (32) | compose_msg |
//! ```

use cosmwasm_std::{Binary, Uint128};

use crate::error::ContractError;

const SEND_TO_OFFSET: usize = 0;
const AMOUNT_SD_OFFSET: usize = 32;
const COMPOSE_FROM_OFFSET: usize = 40;
const COMPOSE_MSG_OFFSET: usize = 72;

const ENVELOPE_SRC_EID_OFFSET: usize = 8;
const ENVELOPE_AMOUNT_LD_OFFSET: usize = 12;
const ENVELOPE_COMPOSE_FROM_OFFSET: usize = 28;
const ENVELOPE_HEADER_LEN: usize = 60;

/// Compose part of a transfer message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposePayload {
    pub compose_from: [u8; 32],
    pub compose_msg: Vec<u8>,
}

/// Decoded transfer message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OftMessage {
    pub send_to: [u8; 32],
    pub amount_sd: u64,
    pub compose: Option<ComposePayload>,
}

impl OftMessage {
    pub fn is_composed(&self) -> bool {
        self.compose.is_some()
    }

    pub fn encode(&self) -> Binary {
        let mut out = Vec::with_capacity(
            COMPOSE_FROM_OFFSET
                + self
                    .compose
                    .as_ref()
                    .map_or(0, |c| 32 + c.compose_msg.len()),
        );
        out.extend_from_slice(&self.send_to);
        out.extend_from_slice(&self.amount_sd.to_be_bytes());
        if let Some(compose) = &self.compose {
            out.extend_from_slice(&compose.compose_from);
            out.extend_from_slice(&compose.compose_msg);
        }
        Binary::from(out)
    }

    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        let len = data.len();
        if len != COMPOSE_FROM_OFFSET && len < COMPOSE_MSG_OFFSET {
            return Err(ContractError::InvalidMessage {
                reason: format!(
                    "length {} is neither {} (plain) nor at least {} (compose)",
                    len, COMPOSE_FROM_OFFSET, COMPOSE_MSG_OFFSET
                ),
            });
        }

        let compose = (len >= COMPOSE_MSG_OFFSET).then(|| ComposePayload {
            compose_from: bytes32_at(data, COMPOSE_FROM_OFFSET),
            compose_msg: data[COMPOSE_MSG_OFFSET..].to_vec(),
        });

        Ok(Self {
            send_to: bytes32_at(data, SEND_TO_OFFSET),
            amount_sd: u64_at(data, AMOUNT_SD_OFFSET),
            compose,
        })
    }
}

/// Envelope delivered to a composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeEnvelope {
    pub nonce: u64,
    pub src_eid: u32,
    pub amount_ld: Uint128,
    pub compose_from: [u8; 32],
    pub compose_msg: Vec<u8>,
}

impl ComposeEnvelope {
    pub fn new(nonce: u64, src_eid: u32, amount_ld: Uint128, compose: ComposePayload) -> Self {
        Self {
            nonce,
            src_eid,
            amount_ld,
            compose_from: compose.compose_from,
            compose_msg: compose.compose_msg,
        }
    }

    pub fn encode(&self) -> Binary {
        let mut out = Vec::with_capacity(ENVELOPE_HEADER_LEN + self.compose_msg.len());
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&self.src_eid.to_be_bytes());
        out.extend_from_slice(&self.amount_ld.u128().to_be_bytes());
        out.extend_from_slice(&self.compose_from);
        out.extend_from_slice(&self.compose_msg);
        Binary::from(out)
    }

    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        if data.len() < ENVELOPE_HEADER_LEN {
            return Err(ContractError::InvalidMessage {
                reason: format!("compose envelope too short: {} bytes", data.len()),
            });
        }
        let mut src_eid = [0u8; 4];
        src_eid.copy_from_slice(&data[ENVELOPE_SRC_EID_OFFSET..ENVELOPE_AMOUNT_LD_OFFSET]);
        let mut amount_ld = [0u8; 16];
        amount_ld.copy_from_slice(&data[ENVELOPE_AMOUNT_LD_OFFSET..ENVELOPE_COMPOSE_FROM_OFFSET]);
        Ok(Self {
            nonce: u64_at(data, 0),
            src_eid: u32::from_be_bytes(src_eid),
            amount_ld: Uint128::new(u128::from_be_bytes(amount_ld)),
            compose_from: bytes32_at(data, ENVELOPE_COMPOSE_FROM_OFFSET),
            compose_msg: data[ENVELOPE_HEADER_LEN..].to_vec(),
        })
    }
}

/// Copy 32 bytes at `offset`; caller checks bounds
fn bytes32_at(data: &[u8], offset: usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&data[offset..offset + 32]);
    out
}

fn u64_at(data: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[offset..offset + 8]);
    u64::from_be_bytes(buf)
}
