//! 32-byte cross-chain addresses.
//!
//! Recipients and compose senders travel on the wire as 32 bytes:
//!
//! ```text
//! | Chain Type (4 bytes) | Raw Address (20 bytes) | Reserved (8 bytes) |
//! ```
//!
//! Only the Cosmos chain type (`0x00000002`) can be turned into a local
//! recipient. The raw 20 bytes are the bech32 payload of the account.

use bech32::{FromBase32, ToBase32, Variant};
use cosmwasm_std::{Addr, Api, StdError, StdResult};

use crate::error::ContractError;

/// Chain type for EVM-compatible chains
pub const CHAIN_TYPE_EVM: u32 = 1;

/// Chain type for Cosmos chains
pub const CHAIN_TYPE_COSMOS: u32 = 2;

// ============================================================================
// Universal Address Structure
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniversalAddress {
    pub chain_type: u32,
    pub raw_address: [u8; 20],
    pub reserved: [u8; 8],
}

impl UniversalAddress {
    pub fn new(chain_type: u32, raw_address: [u8; 20]) -> StdResult<Self> {
        if chain_type == 0 {
            return Err(StdError::generic_err("Invalid chain type: 0"));
        }
        Ok(Self {
            chain_type,
            raw_address,
            reserved: [0u8; 8],
        })
    }

    /// Create a Cosmos address from a bech32 string (e.g., "terra1...")
    pub fn from_cosmos(addr: &str) -> StdResult<Self> {
        let (_, raw) = decode_bech32_address(addr)?;
        Self::new(CHAIN_TYPE_COSMOS, raw)
    }

    /// Layout: | chain_type (4) | raw_address (20) | reserved (8) |
    pub fn to_bytes32(&self) -> [u8; 32] {
        let mut result = [0u8; 32];
        result[0..4].copy_from_slice(&self.chain_type.to_be_bytes());
        result[4..24].copy_from_slice(&self.raw_address);
        result[24..32].copy_from_slice(&self.reserved);
        result
    }

    pub fn from_bytes32(bytes: &[u8; 32]) -> StdResult<Self> {
        let chain_type = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if chain_type == 0 {
            return Err(StdError::generic_err("Invalid chain type: 0"));
        }

        let mut raw_address = [0u8; 20];
        raw_address.copy_from_slice(&bytes[4..24]);
        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&bytes[24..32]);

        Ok(Self {
            chain_type,
            raw_address,
            reserved,
        })
    }

    /// Convert to Cosmos bech32 string with given prefix
    pub fn to_cosmos_string(&self, hrp: &str) -> StdResult<String> {
        if self.chain_type != CHAIN_TYPE_COSMOS {
            return Err(StdError::generic_err(format!(
                "Expected Cosmos chain type (2), got {}",
                self.chain_type
            )));
        }
        encode_bech32_address(&self.raw_address, hrp)
    }
}

// ============================================================================
// Engine Helpers
// ============================================================================

/// Resolve a 32-byte wire address into a validated local account.
pub fn recipient_from_bytes32(
    api: &dyn Api,
    bytes: &[u8; 32],
    hrp: &str,
) -> Result<Addr, ContractError> {
    let human = UniversalAddress::from_bytes32(bytes)
        .and_then(|addr| addr.to_cosmos_string(hrp))
        .map_err(|e| ContractError::InvalidAddress {
            reason: e.to_string(),
        })?;
    Ok(api.addr_validate(&human)?)
}

/// Encode a local account as a 32-byte wire address.
pub fn addr_to_bytes32(addr: &Addr) -> Result<[u8; 32], ContractError> {
    UniversalAddress::from_cosmos(addr.as_str())
        .map(|a| a.to_bytes32())
        .map_err(|e| ContractError::InvalidAddress {
            reason: format!("{}: {}", addr, e),
        })
}

// ============================================================================
// Bech32
// ============================================================================

/// Decode a bech32 address into its prefix and raw 20 bytes, verifying the checksum
pub fn decode_bech32_address(addr: &str) -> StdResult<(String, [u8; 20])> {
    let (hrp, data, variant) = bech32::decode(addr)
        .map_err(|e| StdError::generic_err(format!("Invalid bech32 address: {}", e)))?;
    if variant != Variant::Bech32 {
        return Err(StdError::generic_err("Invalid bech32 address: bech32m checksum"));
    }

    let bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| StdError::generic_err(format!("Invalid base32 data: {}", e)))?;
    let raw: [u8; 20] = bytes.as_slice().try_into().map_err(|_| {
        StdError::generic_err(format!(
            "Invalid address length: expected 20 bytes, got {}",
            bytes.len()
        ))
    })?;
    Ok((hrp, raw))
}

/// Encode raw 20 bytes to a bech32 address with given prefix
pub fn encode_bech32_address(bytes: &[u8; 20], hrp: &str) -> StdResult<String> {
    bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| StdError::generic_err(format!("Failed to encode bech32: {}", e)))
}
