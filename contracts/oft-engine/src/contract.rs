//! OFT Engine Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    Uint128,
};
use cw2::set_contract_version;
use cw20::{Cw20QueryMsg, TokenInfoResponse};

use crate::decimals::conversion_rate;
use crate::error::ContractError;
use crate::execute::{
    execute_confirm_send, execute_lz_receive, execute_lz_receive_with_compose,
    execute_register_oapp, execute_send, execute_set_delegate, execute_set_enforced_options,
    execute_set_fee_bps, execute_set_fee_deposit_address, execute_set_pause, execute_set_peer,
    execute_set_rate_limit, execute_unset_rate_limit,
};
use crate::fee_manager::{is_zero_address, FeeConfig, FEE_CONFIG, MAX_FEE_BPS};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, TreasuryKind};
use crate::query::{
    query_combine_options, query_config, query_confirm_quote_send, query_enforced_options,
    query_fee_config, query_lz_receive_info, query_peer, query_pending_send, query_quote_oft,
    query_quote_send, query_rate_limit, query_treasury,
};
use crate::state::{
    Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, DEFAULT_BECH32_PREFIX, NEXT_REQUEST_ID,
};
use crate::treasury::{Treasury, TREASURY};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let token = deps.api.addr_validate(&msg.token)?;
    let endpoint = deps.api.addr_validate(&msg.endpoint)?;
    let composer_registry = deps.api.addr_validate(&msg.composer_registry)?;

    // Local decimals come from the token itself
    let token_info: TokenInfoResponse = deps
        .querier
        .query_wasm_smart(token.to_string(), &Cw20QueryMsg::TokenInfo {})?;
    let decimal_conversion_rate = conversion_rate(token_info.decimals, msg.shared_decimals)?;

    let fee_bps = msg.fee_bps.unwrap_or(0);
    if fee_bps > MAX_FEE_BPS {
        return Err(ContractError::InvalidFeeBps { fee_bps });
    }
    let fee_deposit_address = match msg.fee_deposit_address {
        Some(addr) if is_zero_address(&addr) => {
            return Err(ContractError::InvalidFeeDepositAddress)
        }
        Some(addr) => Some(deps.api.addr_validate(&addr)?),
        None => None,
    };

    let bech32_prefix = msg
        .bech32_prefix
        .unwrap_or_else(|| DEFAULT_BECH32_PREFIX.to_string());
    if bech32_prefix.is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "bech32 prefix must not be empty".to_string(),
        });
    }

    let config = Config {
        admin,
        paused: false,
        token,
        local_decimals: token_info.decimals,
        shared_decimals: msg.shared_decimals,
        decimal_conversion_rate,
        endpoint,
        composer_registry,
        bech32_prefix,
    };
    CONFIG.save(deps.storage, &config)?;

    FEE_CONFIG.save(
        deps.storage,
        &FeeConfig {
            fee_bps,
            fee_deposit_address,
        },
    )?;

    let treasury = match msg.treasury {
        TreasuryKind::MintBurn => Treasury::MintBurn {},
        TreasuryKind::EscrowRelease => Treasury::EscrowRelease {
            balance: Uint128::zero(),
        },
    };
    TREASURY.save(deps.storage, &treasury)?;

    NEXT_REQUEST_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "oft_created")
        .add_attribute("admin", config.admin)
        .add_attribute("token", config.token)
        .add_attribute("treasury", treasury.kind())
        .add_attribute("local_decimals", config.local_decimals.to_string())
        .add_attribute("shared_decimals", config.shared_decimals.to_string())
        .add_attribute("fee_bps", fee_bps.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Outbound transfers
        ExecuteMsg::Send {
            send_param,
            refund_address,
        } => execute_send(deps, env, info, send_param, refund_address),
        ExecuteMsg::ConfirmSend { request, receipt } => {
            execute_confirm_send(deps, info, request, receipt)
        }

        // Inbound transfers
        ExecuteMsg::LzReceive {
            origin,
            guid,
            message,
            executor,
            extra_data,
        } => execute_lz_receive(deps, env, info, origin, guid, message, executor, extra_data),
        ExecuteMsg::LzReceiveWithCompose {
            origin,
            guid,
            message,
            executor,
            extra_data,
            compose_queue,
        } => execute_lz_receive_with_compose(
            deps,
            env,
            info,
            origin,
            guid,
            message,
            executor,
            extra_data,
            compose_queue,
        ),

        // Admin operations
        ExecuteMsg::SetPause { paused } => execute_set_pause(deps, info, paused),
        ExecuteMsg::SetDelegate { delegate } => execute_set_delegate(deps, info, delegate),
        ExecuteMsg::RegisterOApp { lz_receive_info } => {
            execute_register_oapp(deps, env, info, lz_receive_info)
        }

        // Configuration
        ExecuteMsg::SetPeer { eid, peer } => execute_set_peer(deps, env, info, eid, peer),
        ExecuteMsg::SetEnforcedOptions { options } => {
            execute_set_enforced_options(deps, info, options)
        }
        ExecuteMsg::SetRateLimit {
            eid,
            direction,
            limit,
            window_seconds,
        } => execute_set_rate_limit(deps, env, info, eid, direction, limit, window_seconds),
        ExecuteMsg::UnsetRateLimit { eid, direction } => {
            execute_unset_rate_limit(deps, info, eid, direction)
        }
        ExecuteMsg::SetFeeBps { fee_bps } => execute_set_fee_bps(deps, info, fee_bps),
        ExecuteMsg::SetFeeDepositAddress { address } => {
            execute_set_fee_deposit_address(deps, info, address)
        }
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::FeeConfig {} => to_json_binary(&query_fee_config(deps)?),
        QueryMsg::Treasury {} => to_json_binary(&query_treasury(deps)?),
        QueryMsg::Peer { eid } => to_json_binary(&query_peer(deps, eid)?),
        QueryMsg::EnforcedOptions { eid, msg_type } => {
            to_json_binary(&query_enforced_options(deps, eid, msg_type)?)
        }
        QueryMsg::CombineOptions {
            eid,
            msg_type,
            extra_options,
        } => to_json_binary(&query_combine_options(deps, eid, msg_type, extra_options)?),
        QueryMsg::RateLimit { eid, direction } => {
            to_json_binary(&query_rate_limit(deps, env, eid, direction)?)
        }
        QueryMsg::PendingSend { request_id } => {
            to_json_binary(&query_pending_send(deps, request_id)?)
        }

        // Quotes
        QueryMsg::QuoteOft { send_param } => to_json_binary(&query_quote_oft(deps, env, send_param)?),
        QueryMsg::QuoteSend {
            sender,
            send_param,
            pay_in_zro,
        } => to_json_binary(&query_quote_send(deps, env, sender, send_param, pay_in_zro)?),
        QueryMsg::ConfirmQuoteSend { request } => {
            to_json_binary(&query_confirm_quote_send(deps, request)?)
        }
        QueryMsg::LzReceiveInfo {} => to_json_binary(&query_lz_receive_info(env)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
