//! Outbound transfer handlers (Send and ConfirmSend).
//!
//! A send is split in two transactions' worth of work joined by the endpoint:
//! `Send` debits the sender, records a `PendingSend` and dispatches the packet;
//! the endpoint then calls `ConfirmSend`, which consumes the pending record and
//! forwards the unspent transport fee.

use common::endpoint::{EndpointExecuteMsg, MessagingParams, MessagingReceipt, SendRequest};
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Response,
    Uint128, WasmMsg,
};

use crate::address_codec::addr_to_bytes32;
use crate::codec::{ComposePayload, OftMessage};
use crate::decimals::to_shared;
use crate::error::ContractError;
use crate::fee_manager::{debit_view, FEE_CONFIG};
use crate::msg::{SendParam, SendResponseData};
use crate::options::combine_with_enforced;
use crate::rate_limiter::{INBOUND_RATE_LIMITER, OUTBOUND_RATE_LIMITER};
use crate::state::{
    Config, OftReceipt, PendingSend, CONFIG, NEXT_REQUEST_ID, PEERS, PENDING_SENDS, SEND,
    SEND_AND_CALL,
};
use crate::treasury::{collect_fee, TREASURY};

// ============================================================================
// Send Preparation
// ============================================================================

/// Everything a send needs that does not touch state
pub(crate) struct PreparedSend {
    pub receipt: OftReceipt,
    pub fee_deposit_address: Addr,
    pub params: MessagingParams,
}

/// Compute amounts, payload and options for a send by `sender`.
///
/// Shared by `Send` and the `QuoteSend` query so both see the same numbers.
pub(crate) fn prepare_send(
    deps: Deps,
    config: &Config,
    sender: &Addr,
    send_param: &SendParam,
    pay_in_zro: bool,
) -> Result<PreparedSend, ContractError> {
    if config.paused {
        return Err(ContractError::Paused);
    }

    let peer = PEERS
        .may_load(deps.storage, send_param.dst_eid)?
        .ok_or(ContractError::NoPeer {
            eid: send_param.dst_eid,
        })?;

    let send_to: [u8; 32] =
        send_param
            .to
            .as_slice()
            .try_into()
            .map_err(|_| ContractError::InvalidAddress {
                reason: format!("recipient must be 32 bytes, got {}", send_param.to.len()),
            })?;

    let fee_config = FEE_CONFIG.load(deps.storage)?;
    let receipt = debit_view(
        &fee_config,
        send_param.amount_ld,
        send_param.min_amount_ld,
        config.decimal_conversion_rate,
    )?;
    let fee_deposit_address = fee_config
        .fee_deposit_address
        .ok_or(ContractError::InvalidFeeDepositAddress)?;

    let amount_sd = to_shared(receipt.amount_received_ld, config.decimal_conversion_rate)?;

    let compose = if send_param.compose_msg.is_empty() {
        None
    } else {
        Some(ComposePayload {
            compose_from: addr_to_bytes32(sender)?,
            compose_msg: send_param.compose_msg.to_vec(),
        })
    };
    let msg_type = if compose.is_some() { SEND_AND_CALL } else { SEND };

    let message = OftMessage {
        send_to,
        amount_sd,
        compose,
    };
    let options = combine_with_enforced(
        deps.storage,
        send_param.dst_eid,
        msg_type,
        send_param.extra_options.as_slice(),
    )?;

    Ok(PreparedSend {
        receipt,
        fee_deposit_address,
        params: MessagingParams {
            dst_eid: send_param.dst_eid,
            receiver: peer,
            message: message.encode(),
            options,
            pay_in_zro,
        },
    })
}

// ============================================================================
// Send
// ============================================================================

/// Debit the sender and hand the transfer to the endpoint.
///
/// Attached native funds pay the transport fee and are passed through to the
/// endpoint untouched.
pub fn execute_send(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    send_param: SendParam,
    refund_address: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let refund_address = refund_address
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;

    let prepared = prepare_send(deps.as_ref(), &config, &info.sender, &send_param, false)?;
    let receipt = prepared.receipt.clone();
    let now = env.block.time.seconds();

    // Net-flow accounting: outbound traffic frees inbound capacity
    INBOUND_RATE_LIMITER.release(
        deps.storage,
        send_param.dst_eid,
        receipt.amount_received_ld,
        now,
    )?;
    OUTBOUND_RATE_LIMITER.try_consume(
        deps.storage,
        send_param.dst_eid,
        receipt.amount_received_ld,
        now,
    )?;

    let mut treasury = TREASURY.load(deps.storage)?;
    let mut messages = treasury.debit(
        &config.token,
        &info.sender,
        &env.contract.address,
        receipt.amount_received_ld,
    )?;
    TREASURY.save(deps.storage, &treasury)?;

    let fee = receipt.amount_sent_ld.checked_sub(receipt.amount_received_ld)?;
    messages.extend(collect_fee(
        &config.token,
        &info.sender,
        &prepared.fee_deposit_address,
        fee,
    )?);

    let request_id = NEXT_REQUEST_ID.load(deps.storage)?;
    NEXT_REQUEST_ID.save(deps.storage, &(request_id + 1))?;

    let pending = PendingSend {
        request_id,
        sender: info.sender.clone(),
        dst_eid: send_param.dst_eid,
        receipt: receipt.clone(),
        refund_address,
    };
    PENDING_SENDS.save(deps.storage, request_id, &pending)?;

    let request = SendRequest {
        id: request_id,
        sender: info.sender.to_string(),
    };
    let dispatch = WasmMsg::Execute {
        contract_addr: config.endpoint.to_string(),
        msg: to_json_binary(&EndpointExecuteMsg::Send {
            request: request.clone(),
            params: prepared.params,
        })?,
        funds: info.funds,
    };

    Ok(Response::new()
        .add_messages(messages)
        .add_message(dispatch)
        .set_data(to_json_binary(&SendResponseData { request, pending })?)
        .add_attribute("action", "send")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("sender", info.sender)
        .add_attribute("dst_eid", send_param.dst_eid.to_string())
        .add_attribute("amount_sent_ld", receipt.amount_sent_ld)
        .add_attribute("amount_received_ld", receipt.amount_received_ld)
        .add_attribute("fee_ld", fee))
}

// ============================================================================
// Confirm Send
// ============================================================================

/// Outcome of a confirmed send
#[derive(Debug, PartialEq)]
pub(crate) struct ConfirmedSend {
    pub sender: Addr,
    pub dst_eid: u32,
    pub receipt: OftReceipt,
    pub refund_to: Addr,
}

/// Match a request handle against its pending record, consuming the record.
pub(crate) fn confirm_send(
    pending: PendingSend,
    request: &SendRequest,
) -> Result<ConfirmedSend, ContractError> {
    if request.id != pending.request_id || request.sender != pending.sender.as_str() {
        return Err(ContractError::MismatchedSendContext);
    }
    let refund_to = pending
        .refund_address
        .unwrap_or_else(|| pending.sender.clone());
    Ok(ConfirmedSend {
        sender: pending.sender,
        dst_eid: pending.dst_eid,
        receipt: pending.receipt,
        refund_to,
    })
}

/// Endpoint call-back completing a send.
///
/// Funds attached by the endpoint are the unspent transport fee.
pub fn execute_confirm_send(
    deps: DepsMut,
    info: MessageInfo,
    request: SendRequest,
    receipt: MessagingReceipt,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.endpoint {
        return Err(ContractError::OnlyEndpoint);
    }

    let pending = PENDING_SENDS
        .may_load(deps.storage, request.id)?
        .ok_or(ContractError::MismatchedSendContext)?;
    let confirmed = confirm_send(pending, &request)?;
    PENDING_SENDS.remove(deps.storage, request.id);

    let mut messages: Vec<CosmosMsg> = vec![];
    if info.funds.iter().any(|c| !c.amount.is_zero()) {
        messages.push(
            BankMsg::Send {
                to_address: confirmed.refund_to.to_string(),
                amount: info
                    .funds
                    .into_iter()
                    .filter(|c| !c.amount.is_zero())
                    .collect(),
            }
            .into(),
        );
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "oft_sent")
        .add_attribute("guid", hex_guid(&receipt.guid))
        .add_attribute("nonce", receipt.nonce.to_string())
        .add_attribute("dst_eid", confirmed.dst_eid.to_string())
        .add_attribute("from", confirmed.sender)
        .add_attribute("amount_sent_ld", confirmed.receipt.amount_sent_ld)
        .add_attribute("amount_received_ld", confirmed.receipt.amount_received_ld)
        .add_attribute("native_fee", receipt.fee.native_fee)
        .add_attribute("refund_to", confirmed.refund_to))
}

pub(crate) fn hex_guid(guid: &Binary) -> String {
    format!("0x{}", hex::encode(guid.as_slice()))
}

/// Largest local amount a send can move before the shared amount overflows
pub(crate) fn max_sendable_ld(rate: Uint128) -> Uint128 {
    Uint128::from(u64::MAX).saturating_mul(rate)
}
