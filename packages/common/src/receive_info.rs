//! Receive-execution metadata.
//!
//! An OApp registers this metadata with the endpoint so the executor knows
//! which calls to build when a packet for the OApp is delivered.
//!
//! ## Layout
//!
//! ```text
//! | version (u16, big-endian) | JSON-encoded Vec<CallDescriptor> |
//! ```

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, to_json_vec, Binary, StdError, StdResult};

/// Current metadata version
pub const LZ_RECEIVE_INFO_VERSION: u16 = 1;

/// One call the executor must perform
#[cw_serde]
pub struct CallDescriptor {
    /// Contract to call
    pub target: String,
    /// Entry point on the target (execute message variant name)
    pub function: String,
    /// Arguments in call order
    pub arguments: Vec<CallArgument>,
    /// Whether this call completes the delivery
    pub is_terminal: bool,
}

/// Typed call argument
#[cw_serde]
pub enum CallArgument {
    /// A fixed address
    Address { value: String },
    /// A fixed pure value
    Pure { value: Binary },
    /// A value only known at execution time
    Placeholder { placeholder: ArgumentPlaceholder },
}

/// Values resolved by the executor when the delivery is executed
#[cw_serde]
pub enum ArgumentPlaceholder {
    /// The verified packet (origin, guid, message)
    VerifiedMessage,
    /// The block clock
    Clock,
    /// The executing account
    Executor,
    /// The compose queue bound to the composer a compose message targets
    ComposeQueue,
}

/// Encode call descriptors as versioned metadata
pub fn encode_lz_receive_info(calls: &[CallDescriptor]) -> StdResult<Binary> {
    let body = to_json_vec(calls)?;
    let mut out = Vec::with_capacity(2 + body.len());
    out.extend_from_slice(&LZ_RECEIVE_INFO_VERSION.to_be_bytes());
    out.extend_from_slice(&body);
    Ok(Binary::from(out))
}

/// Decode versioned metadata back into call descriptors
pub fn decode_lz_receive_info(data: &[u8]) -> StdResult<Vec<CallDescriptor>> {
    if data.len() < 2 {
        return Err(StdError::generic_err("lz_receive_info too short"));
    }
    let version = u16::from_be_bytes([data[0], data[1]]);
    if version != LZ_RECEIVE_INFO_VERSION {
        return Err(StdError::generic_err(format!(
            "Unsupported lz_receive_info version: {}",
            version
        )));
    }
    from_json(&data[2..])
}
