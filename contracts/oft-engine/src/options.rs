//! Executor options handling.
//!
//! Options are "type 3" byte strings: a `0x0003` big-endian prefix followed by
//! concatenated worker options. Options the admin enforces for a pathway are
//! merged with the caller's extra options on every send.

use cosmwasm_std::{Binary, StdResult, Storage};

use crate::error::ContractError;
use crate::state::ENFORCED_OPTIONS;

/// Options format version prefix
pub const OPTIONS_TYPE_3: u16 = 3;

/// Reject anything that is not a type 3 option string
pub fn assert_options_type3(options: &[u8]) -> Result<(), ContractError> {
    if options.len() < 2 {
        return Err(ContractError::InvalidOptions {
            reason: format!("options too short: {} bytes", options.len()),
        });
    }
    let option_type = u16::from_be_bytes([options[0], options[1]]);
    if option_type != OPTIONS_TYPE_3 {
        return Err(ContractError::InvalidOptions {
            reason: format!("unsupported options type {}", option_type),
        });
    }
    Ok(())
}

/// Merge enforced and extra options.
///
/// Empty enforced options pass extra options through untouched and vice
/// versa. Otherwise the extra options' type prefix is dropped and the rest is
/// appended to the enforced options.
pub fn combine_options(enforced: &[u8], extra: &[u8]) -> Result<Binary, ContractError> {
    if enforced.is_empty() {
        return Ok(Binary::from(extra));
    }
    if extra.is_empty() {
        return Ok(Binary::from(enforced));
    }
    assert_options_type3(extra)?;

    let mut combined = Vec::with_capacity(enforced.len() + extra.len() - 2);
    combined.extend_from_slice(enforced);
    combined.extend_from_slice(&extra[2..]);
    Ok(Binary::from(combined))
}

/// Enforced options for a pathway and message type (empty when unset)
pub fn enforced_options(storage: &dyn Storage, eid: u32, msg_type: u16) -> StdResult<Binary> {
    Ok(ENFORCED_OPTIONS
        .may_load(storage, (eid, msg_type))?
        .unwrap_or_default())
}

/// Combine the stored enforced options for `(eid, msg_type)` with `extra`
pub fn combine_with_enforced(
    storage: &dyn Storage,
    eid: u32,
    msg_type: u16,
    extra: &[u8],
) -> Result<Binary, ContractError> {
    let enforced = enforced_options(storage, eid, msg_type)?;
    combine_options(enforced.as_slice(), extra)
}
