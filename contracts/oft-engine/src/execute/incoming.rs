//! Inbound transfer handlers (LzReceive and LzReceiveWithCompose).

use common::composer::ComposerRegistryExecuteMsg;
use common::endpoint::{ComposeQueueResponse, EndpointExecuteMsg, EndpointQueryMsg, Origin};
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env, MessageInfo, Response,
    Uint128, WasmMsg,
};

use crate::address_codec::recipient_from_bytes32;
use crate::codec::{ComposeEnvelope, OftMessage};
use crate::decimals::to_local;
use crate::error::ContractError;
use crate::execute::outgoing::hex_guid;
use crate::rate_limiter::{INBOUND_RATE_LIMITER, OUTBOUND_RATE_LIMITER};
use crate::state::{Config, CONFIG, PEERS};
use crate::treasury::TREASURY;

/// A verified and accounted inbound transfer, not yet credited
struct InboundTransfer {
    config: Config,
    message: OftMessage,
    amount_ld: Uint128,
    to: Addr,
}

/// Authenticate the delivery, decode it and run the limiter accounting.
fn accept_inbound(
    deps: &mut DepsMut,
    env: &Env,
    info: &MessageInfo,
    origin: &Origin,
    message: &Binary,
) -> Result<InboundTransfer, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::Paused);
    }
    if info.sender != config.endpoint {
        return Err(ContractError::OnlyEndpoint);
    }
    let peer = PEERS.may_load(deps.storage, origin.src_eid)?;
    if peer.as_ref() != Some(&origin.sender) {
        return Err(ContractError::OnlyPeer {
            eid: origin.src_eid,
        });
    }

    let message = OftMessage::decode(message.as_slice())?;
    let amount_ld = to_local(message.amount_sd, config.decimal_conversion_rate)?;
    let to = recipient_from_bytes32(deps.api, &message.send_to, &config.bech32_prefix)?;

    // Net-flow accounting: inbound traffic frees outbound capacity
    let now = env.block.time.seconds();
    OUTBOUND_RATE_LIMITER.release(deps.storage, origin.src_eid, amount_ld, now)?;
    INBOUND_RATE_LIMITER.try_consume(deps.storage, origin.src_eid, amount_ld, now)?;

    Ok(InboundTransfer {
        config,
        message,
        amount_ld,
        to,
    })
}

/// Hand funds attached by the executor back to it
fn return_value(executor: &Addr, funds: Vec<Coin>) -> Option<CosmosMsg> {
    let funds: Vec<Coin> = funds.into_iter().filter(|c| !c.amount.is_zero()).collect();
    if funds.is_empty() {
        return None;
    }
    Some(
        BankMsg::Send {
            to_address: executor.to_string(),
            amount: funds,
        }
        .into(),
    )
}

// ============================================================================
// Plain Receive
// ============================================================================

/// Credit a plain transfer to its recipient.
#[allow(clippy::too_many_arguments)]
pub fn execute_lz_receive(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin: Origin,
    guid: Binary,
    message: Binary,
    executor: String,
    _extra_data: Binary,
) -> Result<Response, ContractError> {
    let executor = deps.api.addr_validate(&executor)?;
    let inbound = accept_inbound(&mut deps, &env, &info, &origin, &message)?;
    if inbound.message.is_composed() {
        return Err(ContractError::ComposeNotAllowed);
    }

    let mut treasury = TREASURY.load(deps.storage)?;
    let messages = treasury.credit(&inbound.config.token, &inbound.to, inbound.amount_ld)?;
    TREASURY.save(deps.storage, &treasury)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_messages(return_value(&executor, info.funds))
        .add_attribute("action", "oft_received")
        .add_attribute("guid", hex_guid(&guid))
        .add_attribute("src_eid", origin.src_eid.to_string())
        .add_attribute("nonce", origin.nonce.to_string())
        .add_attribute("to", inbound.to)
        .add_attribute("amount_received_ld", inbound.amount_ld))
}

// ============================================================================
// Receive With Compose
// ============================================================================

/// Credit a compose transfer to the composer registry and enqueue the compose
/// envelope for the composer.
#[allow(clippy::too_many_arguments)]
pub fn execute_lz_receive_with_compose(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin: Origin,
    guid: Binary,
    message: Binary,
    executor: String,
    _extra_data: Binary,
    compose_queue: String,
) -> Result<Response, ContractError> {
    let executor = deps.api.addr_validate(&executor)?;
    let inbound = accept_inbound(&mut deps, &env, &info, &origin, &message)?;
    let compose = inbound
        .message
        .compose
        .clone()
        .ok_or(ContractError::ComposeRequired)?;

    let queue: ComposeQueueResponse = deps.querier.query_wasm_smart(
        inbound.config.endpoint.to_string(),
        &EndpointQueryMsg::ComposeQueue {
            queue: compose_queue.clone(),
        },
    )?;
    if queue.composer != inbound.to.as_str() {
        return Err(ContractError::InvalidComposeTarget {
            expected: queue.composer,
            got: inbound.to.to_string(),
        });
    }

    let registry = &inbound.config.composer_registry;
    let mut treasury = TREASURY.load(deps.storage)?;
    let mut messages = treasury.credit(&inbound.config.token, registry, inbound.amount_ld)?;
    TREASURY.save(deps.storage, &treasury)?;

    let envelope = ComposeEnvelope::new(origin.nonce, origin.src_eid, inbound.amount_ld, compose);

    messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: inbound.config.endpoint.to_string(),
        msg: to_json_binary(&EndpointExecuteMsg::SendCompose {
            to: queue.composer.clone(),
            guid: guid.clone(),
            index: 0,
            message: envelope.encode(),
        })?,
        funds: vec![],
    }));
    messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: registry.to_string(),
        msg: to_json_binary(&ComposerRegistryExecuteMsg::Deposit {
            guid: guid.clone(),
            composer: queue.composer.clone(),
            token: inbound.config.token.to_string(),
            amount: inbound.amount_ld,
        })?,
        funds: vec![],
    }));

    Ok(Response::new()
        .add_messages(messages)
        .add_messages(return_value(&executor, info.funds))
        .add_attribute("action", "oft_received")
        .add_attribute("guid", hex_guid(&guid))
        .add_attribute("src_eid", origin.src_eid.to_string())
        .add_attribute("nonce", origin.nonce.to_string())
        .add_attribute("to", inbound.to)
        .add_attribute("amount_received_ld", inbound.amount_ld)
        .add_attribute("compose_queue", compose_queue)
        .add_attribute("composer", queue.composer))
}
