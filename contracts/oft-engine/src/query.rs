//! Query handlers for the OFT engine contract.
//!
//! Contract errors raised while quoting are surfaced as generic `StdError`s
//! carrying the same message.

use common::endpoint::{EndpointQueryMsg, MessagingFee};
use cosmwasm_std::{Binary, Deps, Env, StdError, StdResult, Uint128};

use crate::error::ContractError;
use crate::execute::build_lz_receive_info;
use crate::execute::outgoing::{max_sendable_ld, prepare_send};
use crate::fee_manager::{debit_view, fee_details, FEE_CONFIG};
use crate::msg::{
    ConfigResponse, Direction, FeeConfigResponse, OftLimit, OptionsResponse, PeerResponse,
    QuoteOftResponse, QuoteRequest, RateLimitResponse, SendParam, TreasuryResponse,
};
use crate::options::{combine_with_enforced, enforced_options};
use crate::rate_limiter::OUTBOUND_RATE_LIMITER;
use crate::state::{PendingSend, CONFIG, PEERS, PENDING_SENDS};
use crate::treasury::TREASURY;

fn to_std(err: ContractError) -> StdError {
    match err {
        ContractError::Std(e) => e,
        other => StdError::generic_err(other.to_string()),
    }
}

// ============================================================================
// State Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        token: config.token,
        local_decimals: config.local_decimals,
        shared_decimals: config.shared_decimals,
        decimal_conversion_rate: config.decimal_conversion_rate,
        endpoint: config.endpoint,
        composer_registry: config.composer_registry,
        bech32_prefix: config.bech32_prefix,
    })
}

pub fn query_fee_config(deps: Deps) -> StdResult<FeeConfigResponse> {
    let fee_config = FEE_CONFIG.load(deps.storage)?;
    Ok(FeeConfigResponse {
        fee_bps: fee_config.fee_bps,
        fee_deposit_address: fee_config.fee_deposit_address,
    })
}

pub fn query_treasury(deps: Deps) -> StdResult<TreasuryResponse> {
    let treasury = TREASURY.load(deps.storage)?;
    Ok(TreasuryResponse {
        kind: treasury.kind().to_string(),
        escrow_balance: treasury.escrow_balance(),
    })
}

pub fn query_peer(deps: Deps, eid: u32) -> StdResult<PeerResponse> {
    Ok(PeerResponse {
        eid,
        peer: PEERS.may_load(deps.storage, eid)?,
    })
}

pub fn query_enforced_options(deps: Deps, eid: u32, msg_type: u16) -> StdResult<OptionsResponse> {
    Ok(OptionsResponse {
        options: enforced_options(deps.storage, eid, msg_type)?,
    })
}

pub fn query_combine_options(
    deps: Deps,
    eid: u32,
    msg_type: u16,
    extra_options: Binary,
) -> StdResult<OptionsResponse> {
    let options = combine_with_enforced(deps.storage, eid, msg_type, extra_options.as_slice())
        .map_err(to_std)?;
    Ok(OptionsResponse { options })
}

/// Query a bucket as of the current block time.
pub fn query_rate_limit(
    deps: Deps,
    env: Env,
    eid: u32,
    direction: Direction,
) -> StdResult<RateLimitResponse> {
    let limiter = direction.limiter();
    let now = env.block.time.seconds();
    Ok(RateLimitResponse {
        eid,
        direction,
        rate_limit: limiter.get(deps.storage, eid)?,
        available_capacity: limiter.available_capacity(deps.storage, eid, now)?,
        in_flight: limiter.in_flight(deps.storage, eid, now)?,
    })
}

pub fn query_pending_send(deps: Deps, request_id: u64) -> StdResult<Option<PendingSend>> {
    PENDING_SENDS.may_load(deps.storage, request_id)
}

// ============================================================================
// Quotes
// ============================================================================

/// Limits, fee breakdown and receipt for a prospective send.
pub fn query_quote_oft(deps: Deps, env: Env, send_param: SendParam) -> StdResult<QuoteOftResponse> {
    let config = CONFIG.load(deps.storage)?;
    let fee_config = FEE_CONFIG.load(deps.storage)?;
    let receipt = debit_view(
        &fee_config,
        send_param.amount_ld,
        send_param.min_amount_ld,
        config.decimal_conversion_rate,
    )
    .map_err(to_std)?;

    let mut max_amount_ld = max_sendable_ld(config.decimal_conversion_rate);
    if let Some(available) = OUTBOUND_RATE_LIMITER.available_capacity(
        deps.storage,
        send_param.dst_eid,
        env.block.time.seconds(),
    )? {
        max_amount_ld = max_amount_ld.min(available);
    }

    Ok(QuoteOftResponse {
        limit: OftLimit {
            min_amount_ld: Uint128::zero(),
            max_amount_ld,
        },
        fee_details: fee_details(&receipt),
        receipt,
    })
}

/// Build the endpoint quote request a send by `sender` would issue.
pub fn query_quote_send(
    deps: Deps,
    env: Env,
    sender: String,
    send_param: SendParam,
    pay_in_zro: bool,
) -> StdResult<QuoteRequest> {
    let config = CONFIG.load(deps.storage)?;
    let sender = deps.api.addr_validate(&sender)?;
    let prepared =
        prepare_send(deps, &config, &sender, &send_param, pay_in_zro).map_err(to_std)?;

    Ok(QuoteRequest {
        sender: env.contract.address.to_string(),
        params: prepared.params,
        receipt: prepared.receipt,
    })
}

/// Resolve a quote request into a transport fee by asking the endpoint.
pub fn query_confirm_quote_send(deps: Deps, request: QuoteRequest) -> StdResult<MessagingFee> {
    let config = CONFIG.load(deps.storage)?;
    deps.querier.query_wasm_smart(
        config.endpoint.to_string(),
        &EndpointQueryMsg::Quote {
            sender: request.sender,
            params: request.params,
        },
    )
}

pub fn query_lz_receive_info(env: Env) -> StdResult<Binary> {
    build_lz_receive_info(&env.contract.address)
}
