//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause of sends and receives
//! - Endpoint registration (OApp metadata and delegate)

use common::endpoint::EndpointExecuteMsg;
use common::receive_info::{
    encode_lz_receive_info, ArgumentPlaceholder, CallArgument, CallDescriptor,
};
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, WasmMsg,
};

use crate::error::ContractError;
use crate::state::{Config, CONFIG};

/// Load the config and check the caller is the admin.
pub(crate) fn load_config_as_admin(
    deps: Deps,
    info: &MessageInfo,
) -> Result<Config, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(config)
}

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause or unpause the engine.
pub fn execute_set_pause(
    deps: DepsMut,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(deps.as_ref(), &info)?;
    if config.paused == paused {
        return Err(ContractError::RedundantConfigValue {
            field: "paused".to_string(),
        });
    }

    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_pause")
        .add_attribute("paused", paused.to_string()))
}

// ============================================================================
// Endpoint Registration
// ============================================================================

/// Receive-execution metadata describing how the executor delivers to `oapp`.
///
/// Two alternative terminal calls are listed. The executor inspects the
/// verified message and calls `lz_receive_with_compose` when it carries a
/// compose part, `lz_receive` otherwise.
pub fn build_lz_receive_info(oapp: &Addr) -> StdResult<Binary> {
    let packet_arguments = || {
        vec![
            CallArgument::Placeholder {
                placeholder: ArgumentPlaceholder::VerifiedMessage,
            },
            CallArgument::Placeholder {
                placeholder: ArgumentPlaceholder::Clock,
            },
        ]
    };

    let mut compose_arguments = packet_arguments();
    compose_arguments.push(CallArgument::Placeholder {
        placeholder: ArgumentPlaceholder::ComposeQueue,
    });

    encode_lz_receive_info(&[
        CallDescriptor {
            target: oapp.to_string(),
            function: "lz_receive".to_string(),
            arguments: packet_arguments(),
            is_terminal: true,
        },
        CallDescriptor {
            target: oapp.to_string(),
            function: "lz_receive_with_compose".to_string(),
            arguments: compose_arguments,
            is_terminal: true,
        },
    ])
}

/// Register the engine with the endpoint.
pub fn execute_register_oapp(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    lz_receive_info: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.as_ref(), &info)?;

    let lz_receive_info = match lz_receive_info {
        Some(info) => info,
        None => build_lz_receive_info(&env.contract.address)?,
    };

    let msg = WasmMsg::Execute {
        contract_addr: config.endpoint.to_string(),
        msg: to_json_binary(&EndpointExecuteMsg::RegisterOApp { lz_receive_info })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(msg)
        .add_attribute("action", "register_oapp")
        .add_attribute("endpoint", config.endpoint))
}

/// Set the delegate allowed to configure the engine on the endpoint.
pub fn execute_set_delegate(
    deps: DepsMut,
    info: MessageInfo,
    delegate: String,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(deps.as_ref(), &info)?;
    let delegate = deps.api.addr_validate(&delegate)?;

    let msg = WasmMsg::Execute {
        contract_addr: config.endpoint.to_string(),
        msg: to_json_binary(&EndpointExecuteMsg::SetDelegate {
            delegate: delegate.to_string(),
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(msg)
        .add_attribute("action", "set_delegate")
        .add_attribute("delegate", delegate))
}
