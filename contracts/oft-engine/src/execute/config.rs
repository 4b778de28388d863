//! Configuration handlers.
//!
//! Peers, enforced options, rate limits and fees. All require the admin.

use common::endpoint::{EndpointExecuteMsg, EndpointQueryMsg};
use cosmwasm_std::{to_json_binary, Binary, DepsMut, Env, MessageInfo, Response, Uint128, WasmMsg};

use crate::error::ContractError;
use crate::execute::admin::load_config_as_admin;
use crate::fee_manager::{set_fee_bps, set_fee_deposit_address};
use crate::msg::{Direction, EnforcedOptionParam};
use crate::options::assert_options_type3;
use crate::state::{ENFORCED_OPTIONS, PEERS};

// ============================================================================
// Peers
// ============================================================================

/// Register the remote OApp for `eid`.
///
/// Opens the channel on the endpoint when it reports the pathway uninitialized.
pub fn execute_set_peer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    eid: u32,
    peer: Binary,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.as_ref(), &info)?;
    if peer.len() != 32 {
        return Err(ContractError::InvalidAddress {
            reason: format!("peer must be 32 bytes, got {}", peer.len()),
        });
    }

    PEERS.save(deps.storage, eid, &peer)?;

    let initialized: bool = deps.querier.query_wasm_smart(
        config.endpoint.to_string(),
        &EndpointQueryMsg::IsChannelInitialized {
            oapp: env.contract.address.to_string(),
            remote_eid: eid,
            remote_oapp: peer.clone(),
        },
    )?;

    let mut response = Response::new();
    if !initialized {
        response = response.add_message(WasmMsg::Execute {
            contract_addr: config.endpoint.to_string(),
            msg: to_json_binary(&EndpointExecuteMsg::InitChannel {
                remote_eid: eid,
                remote_oapp: peer.clone(),
            })?,
            funds: vec![],
        });
    }

    Ok(response
        .add_attribute("action", "set_peer")
        .add_attribute("eid", eid.to_string())
        .add_attribute("peer", format!("0x{}", hex::encode(peer.as_slice())))
        .add_attribute("init_channel", (!initialized).to_string()))
}

// ============================================================================
// Enforced Options
// ============================================================================

/// Set enforced options; empty options clear the entry.
pub fn execute_set_enforced_options(
    deps: DepsMut,
    info: MessageInfo,
    options: Vec<EnforcedOptionParam>,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.as_ref(), &info)?;

    for param in &options {
        if param.options.is_empty() {
            ENFORCED_OPTIONS.remove(deps.storage, (param.eid, param.msg_type));
        } else {
            assert_options_type3(param.options.as_slice())?;
            ENFORCED_OPTIONS.save(deps.storage, (param.eid, param.msg_type), &param.options)?;
        }
    }

    Ok(Response::new()
        .add_attribute("action", "set_enforced_options")
        .add_attribute("count", options.len().to_string()))
}

// ============================================================================
// Rate Limits
// ============================================================================

/// Configure (or reset to full) the bucket of one direction of a pathway.
pub fn execute_set_rate_limit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    eid: u32,
    direction: Direction,
    limit: Uint128,
    window_seconds: u64,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.as_ref(), &info)?;

    direction.limiter().configure(
        deps.storage,
        eid,
        limit,
        window_seconds,
        env.block.time.seconds(),
    )?;

    Ok(Response::new()
        .add_attribute("action", "set_rate_limit")
        .add_attribute("eid", eid.to_string())
        .add_attribute("direction", direction.as_str())
        .add_attribute("limit", limit)
        .add_attribute("window_seconds", window_seconds.to_string()))
}

/// Remove the bucket of one direction of a pathway.
pub fn execute_unset_rate_limit(
    deps: DepsMut,
    info: MessageInfo,
    eid: u32,
    direction: Direction,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.as_ref(), &info)?;

    let removed = direction.limiter().unconfigure(deps.storage, eid);

    Ok(Response::new()
        .add_attribute("action", "unset_rate_limit")
        .add_attribute("eid", eid.to_string())
        .add_attribute("direction", direction.as_str())
        .add_attribute("removed", removed.to_string()))
}

// ============================================================================
// Fees
// ============================================================================

pub fn execute_set_fee_bps(
    deps: DepsMut,
    info: MessageInfo,
    fee_bps: u16,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.as_ref(), &info)?;
    let fee_config = set_fee_bps(deps.storage, fee_bps)?;

    Ok(Response::new()
        .add_attribute("action", "set_fee_bps")
        .add_attribute("fee_bps", fee_config.fee_bps.to_string()))
}

pub fn execute_set_fee_deposit_address(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    load_config_as_admin(deps.as_ref(), &info)?;
    let fee_config = set_fee_deposit_address(deps.storage, deps.api, &address)?;

    Ok(Response::new()
        .add_attribute("action", "set_fee_deposit_address")
        .add_attribute(
            "fee_deposit_address",
            fee_config
                .fee_deposit_address
                .map(|a| a.to_string())
                .unwrap_or_default(),
        ))
}
