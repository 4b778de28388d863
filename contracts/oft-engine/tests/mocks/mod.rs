//! Shared test harness: mock messaging endpoint, mock composer registry and
//! a suite wiring them to a cw20 token and the OFT engine.

#![allow(dead_code)]

use common::composer::ComposerRegistryExecuteMsg;
use common::endpoint::{
    compute_guid, ComposeQueueResponse, MessagingFee, MessagingParams, MessagingReceipt,
    OAppExecuteMsg, Origin, SendRequest,
};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coin, coins, to_json_binary, Addr, Binary, Coin, Deps, DepsMut, Empty, Env, MessageInfo,
    Response, StdError, StdResult, Uint128, WasmMsg,
};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};
use cw_storage_plus::{Item, Map};

use oft_engine::address_codec::{addr_to_bytes32, encode_bech32_address};
use oft_engine::codec::{ComposePayload, OftMessage};
use oft_engine::msg::{
    Direction, ExecuteMsg, InstantiateMsg, QueryMsg, RateLimitResponse, SendParam,
    TreasuryKind, TreasuryResponse,
};
use oft_engine::state::PendingSend;

// ============================================================================
// Constants
// ============================================================================

pub const LOCAL_EID: u32 = 30_145;
pub const REMOTE_EID: u32 = 30_101;
pub const DENOM: &str = "uluna";
pub const NATIVE_FEE: u128 = 1_000;
pub const USER_TOKENS: u128 = 10_000_000_000;
pub const USER_NATIVE: u128 = 1_000_000;

/// 20-byte bech32 account, decodable from the wire
pub fn account(seed: u8) -> Addr {
    Addr::unchecked(encode_bech32_address(&[seed; 20], "terra").unwrap())
}

pub fn remote_peer() -> Binary {
    Binary::from(vec![0xEE; 32])
}

// ============================================================================
// Mock Endpoint
// ============================================================================

#[cw_serde]
pub struct MockEndpointInstantiateMsg {
    pub native_fee: Uint128,
    /// Echo a different sender on ConfirmSend
    pub tamper_request: bool,
    /// Accept Send without calling ConfirmSend back
    pub skip_confirm: bool,
}

#[cw_serde]
pub enum MockEndpointExecuteMsg {
    RegisterOApp { lz_receive_info: Binary },
    SetDelegate { delegate: String },
    InitChannel { remote_eid: u32, remote_oapp: Binary },
    Send {
        request: SendRequest,
        params: MessagingParams,
    },
    SendCompose {
        to: String,
        guid: Binary,
        index: u16,
        message: Binary,
    },
    /// Test helper: bind a composer to a queue
    SetComposeQueue { queue: String, composer: String },
}

#[cw_serde]
pub enum MockEndpointQueryMsg {
    Quote {
        sender: String,
        params: MessagingParams,
    },
    IsChannelInitialized {
        oapp: String,
        remote_eid: u32,
        remote_oapp: Binary,
    },
    ComposeQueue {
        queue: String,
    },
    LastSend {},
    Composes {},
    Registration {},
    Delegate {},
}

#[cw_serde]
pub struct RecordedSend {
    pub oapp: String,
    pub request: SendRequest,
    pub params: MessagingParams,
    pub guid: Binary,
    pub nonce: u64,
    pub paid: Uint128,
}

#[cw_serde]
pub struct RecordedCompose {
    pub from: String,
    pub to: String,
    pub guid: Binary,
    pub index: u16,
    pub message: Binary,
}

const NATIVE_FEE_CONFIG: Item<Uint128> = Item::new("native_fee");
const TAMPER: Item<bool> = Item::new("tamper");
const SKIP_CONFIRM: Item<bool> = Item::new("skip_confirm");
const OUTBOUND_NONCE: Item<u64> = Item::new("nonce");
const LAST_SEND: Item<RecordedSend> = Item::new("last_send");
const CHANNELS: Map<u32, Binary> = Map::new("channels");
const COMPOSE_QUEUES: Map<&str, String> = Map::new("compose_queues");
const COMPOSES: Item<Vec<RecordedCompose>> = Item::new("composes");
const REGISTRATION: Item<Binary> = Item::new("registration");
const DELEGATE: Item<String> = Item::new("delegate");

fn endpoint_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: MockEndpointInstantiateMsg,
) -> StdResult<Response> {
    NATIVE_FEE_CONFIG.save(deps.storage, &msg.native_fee)?;
    TAMPER.save(deps.storage, &msg.tamper_request)?;
    SKIP_CONFIRM.save(deps.storage, &msg.skip_confirm)?;
    OUTBOUND_NONCE.save(deps.storage, &0)?;
    COMPOSES.save(deps.storage, &vec![])?;
    Ok(Response::new())
}

fn endpoint_execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: MockEndpointExecuteMsg,
) -> StdResult<Response> {
    match msg {
        MockEndpointExecuteMsg::RegisterOApp { lz_receive_info } => {
            REGISTRATION.save(deps.storage, &lz_receive_info)?;
            Ok(Response::new())
        }
        MockEndpointExecuteMsg::SetDelegate { delegate } => {
            DELEGATE.save(deps.storage, &delegate)?;
            Ok(Response::new())
        }
        MockEndpointExecuteMsg::InitChannel {
            remote_eid,
            remote_oapp,
        } => {
            CHANNELS.save(deps.storage, remote_eid, &remote_oapp)?;
            Ok(Response::new().add_attribute("action", "init_channel"))
        }
        MockEndpointExecuteMsg::Send { request, params } => {
            let fee = NATIVE_FEE_CONFIG.load(deps.storage)?;
            let paid = info
                .funds
                .iter()
                .find(|c| c.denom == DENOM)
                .map(|c| c.amount)
                .unwrap_or_default();
            if paid < fee {
                return Err(StdError::generic_err(format!(
                    "insufficient native fee: paid {}, required {}",
                    paid, fee
                )));
            }

            let nonce = OUTBOUND_NONCE.load(deps.storage)? + 1;
            OUTBOUND_NONCE.save(deps.storage, &nonce)?;
            let guid = Binary::from(compute_guid(
                nonce,
                LOCAL_EID,
                info.sender.as_bytes(),
                params.dst_eid,
                params.receiver.as_slice(),
            ));

            LAST_SEND.save(
                deps.storage,
                &RecordedSend {
                    oapp: info.sender.to_string(),
                    request: request.clone(),
                    params,
                    guid: guid.clone(),
                    nonce,
                    paid,
                },
            )?;

            if SKIP_CONFIRM.load(deps.storage)? {
                return Ok(Response::new().add_attribute("action", "send_accepted"));
            }

            let mut echoed = request;
            if TAMPER.load(deps.storage)? {
                echoed.sender = "terra1tampered".to_string();
            }
            let refund = paid - fee;
            let callback = WasmMsg::Execute {
                contract_addr: info.sender.to_string(),
                msg: to_json_binary(&OAppExecuteMsg::ConfirmSend {
                    request: echoed,
                    receipt: MessagingReceipt {
                        guid,
                        nonce,
                        fee: MessagingFee {
                            native_fee: fee,
                            zro_fee: Uint128::zero(),
                        },
                    },
                })?,
                funds: if refund.is_zero() {
                    vec![]
                } else {
                    coins(refund.u128(), DENOM)
                },
            };
            Ok(Response::new().add_message(callback))
        }
        MockEndpointExecuteMsg::SendCompose {
            to,
            guid,
            index,
            message,
        } => {
            let mut composes = COMPOSES.load(deps.storage)?;
            composes.push(RecordedCompose {
                from: info.sender.to_string(),
                to,
                guid,
                index,
                message,
            });
            COMPOSES.save(deps.storage, &composes)?;
            Ok(Response::new())
        }
        MockEndpointExecuteMsg::SetComposeQueue { queue, composer } => {
            COMPOSE_QUEUES.save(deps.storage, &queue, &composer)?;
            Ok(Response::new())
        }
    }
}

fn endpoint_query(deps: Deps, _env: Env, msg: MockEndpointQueryMsg) -> StdResult<Binary> {
    match msg {
        MockEndpointQueryMsg::Quote { .. } => to_json_binary(&MessagingFee {
            native_fee: NATIVE_FEE_CONFIG.load(deps.storage)?,
            zro_fee: Uint128::zero(),
        }),
        MockEndpointQueryMsg::IsChannelInitialized {
            remote_eid,
            remote_oapp,
            ..
        } => {
            let channel = CHANNELS.may_load(deps.storage, remote_eid)?;
            to_json_binary(&(channel == Some(remote_oapp)))
        }
        MockEndpointQueryMsg::ComposeQueue { queue } => {
            let composer = COMPOSE_QUEUES
                .may_load(deps.storage, &queue)?
                .ok_or_else(|| StdError::generic_err(format!("unknown compose queue {}", queue)))?;
            to_json_binary(&ComposeQueueResponse { composer })
        }
        MockEndpointQueryMsg::LastSend {} => to_json_binary(&LAST_SEND.may_load(deps.storage)?),
        MockEndpointQueryMsg::Composes {} => to_json_binary(&COMPOSES.load(deps.storage)?),
        MockEndpointQueryMsg::Registration {} => {
            to_json_binary(&REGISTRATION.may_load(deps.storage)?)
        }
        MockEndpointQueryMsg::Delegate {} => to_json_binary(&DELEGATE.may_load(deps.storage)?),
    }
}

pub fn contract_endpoint() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        endpoint_execute,
        endpoint_instantiate,
        endpoint_query,
    ))
}

// ============================================================================
// Mock Composer Registry
// ============================================================================

#[cw_serde]
pub struct MockRegistryInstantiateMsg {}

#[cw_serde]
pub enum MockRegistryQueryMsg {
    Deposits {},
}

#[cw_serde]
pub struct RecordedDeposit {
    pub guid: Binary,
    pub composer: String,
    pub token: String,
    pub amount: Uint128,
}

const DEPOSITS: Item<Vec<RecordedDeposit>> = Item::new("deposits");

fn registry_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: MockRegistryInstantiateMsg,
) -> StdResult<Response> {
    DEPOSITS.save(deps.storage, &vec![])?;
    Ok(Response::new())
}

fn registry_execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: ComposerRegistryExecuteMsg,
) -> StdResult<Response> {
    match msg {
        ComposerRegistryExecuteMsg::Deposit {
            guid,
            composer,
            token,
            amount,
        } => {
            let mut deposits = DEPOSITS.load(deps.storage)?;
            deposits.push(RecordedDeposit {
                guid,
                composer,
                token,
                amount,
            });
            DEPOSITS.save(deps.storage, &deposits)?;
            Ok(Response::new())
        }
    }
}

fn registry_query(deps: Deps, _env: Env, msg: MockRegistryQueryMsg) -> StdResult<Binary> {
    match msg {
        MockRegistryQueryMsg::Deposits {} => to_json_binary(&DEPOSITS.load(deps.storage)?),
    }
}

pub fn contract_registry() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        registry_execute,
        registry_instantiate,
        registry_query,
    ))
}

// ============================================================================
// Real Contracts
// ============================================================================

pub fn contract_oft() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        oft_engine::contract::execute,
        oft_engine::contract::instantiate,
        oft_engine::contract::query,
    )
    .with_migrate(oft_engine::contract::migrate);
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

// ============================================================================
// Suite
// ============================================================================

pub struct SuiteConfig {
    pub treasury: TreasuryKind,
    pub token_decimals: u8,
    pub shared_decimals: u8,
    pub fee_bps: Option<u16>,
    pub with_fee_deposit: bool,
    pub tamper_request: bool,
    pub skip_confirm: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            treasury: TreasuryKind::MintBurn,
            token_decimals: 6,
            shared_decimals: 6,
            fee_bps: None,
            with_fee_deposit: true,
            tamper_request: false,
            skip_confirm: false,
        }
    }
}

pub struct Suite {
    pub app: App,
    pub admin: Addr,
    pub user: Addr,
    pub fee_deposit: Addr,
    pub token: Addr,
    pub endpoint: Addr,
    pub registry: Addr,
    pub oft: Addr,
}

impl Suite {
    pub fn new(cfg: SuiteConfig) -> Self {
        let mut app = App::default();

        let admin = Addr::unchecked("terra1admin");
        let user = account(1);
        let fee_deposit = account(2);

        app.init_modules(|router, _, storage| {
            router
                .bank
                .init_balance(storage, &user, coins(USER_NATIVE, DENOM))
                .unwrap();
        });

        let endpoint_code = app.store_code(contract_endpoint());
        let registry_code = app.store_code(contract_registry());
        let cw20_code = app.store_code(contract_cw20());
        let oft_code = app.store_code(contract_oft());

        let endpoint = app
            .instantiate_contract(
                endpoint_code,
                admin.clone(),
                &MockEndpointInstantiateMsg {
                    native_fee: Uint128::new(NATIVE_FEE),
                    tamper_request: cfg.tamper_request,
                    skip_confirm: cfg.skip_confirm,
                },
                &[],
                "endpoint",
                None,
            )
            .unwrap();

        let registry = app
            .instantiate_contract(
                registry_code,
                admin.clone(),
                &MockRegistryInstantiateMsg {},
                &[],
                "composer-registry",
                None,
            )
            .unwrap();

        let token = app
            .instantiate_contract(
                cw20_code,
                admin.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: "Omni Token".to_string(),
                    symbol: "OMNI".to_string(),
                    decimals: cfg.token_decimals,
                    initial_balances: vec![Cw20Coin {
                        address: user.to_string(),
                        amount: Uint128::new(USER_TOKENS),
                    }],
                    mint: Some(cw20::MinterResponse {
                        minter: admin.to_string(),
                        cap: None,
                    }),
                    marketing: None,
                },
                &[],
                "omni-token",
                None,
            )
            .unwrap();

        let oft = app
            .instantiate_contract(
                oft_code,
                admin.clone(),
                &InstantiateMsg {
                    admin: admin.to_string(),
                    token: token.to_string(),
                    endpoint: endpoint.to_string(),
                    composer_registry: registry.to_string(),
                    shared_decimals: cfg.shared_decimals,
                    treasury: cfg.treasury.clone(),
                    fee_bps: cfg.fee_bps,
                    fee_deposit_address: cfg.with_fee_deposit.then(|| fee_deposit.to_string()),
                    bech32_prefix: None,
                },
                &[],
                "oft-engine",
                Some(admin.to_string()),
            )
            .unwrap();

        if cfg.treasury == TreasuryKind::MintBurn {
            app.execute_contract(
                admin.clone(),
                token.clone(),
                &Cw20ExecuteMsg::UpdateMinter {
                    new_minter: Some(oft.to_string()),
                },
                &[],
            )
            .unwrap();
        }

        app.execute_contract(
            admin.clone(),
            oft.clone(),
            &ExecuteMsg::SetPeer {
                eid: REMOTE_EID,
                peer: remote_peer(),
            },
            &[],
        )
        .unwrap();

        app.execute_contract(
            user.clone(),
            token.clone(),
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: oft.to_string(),
                amount: Uint128::new(USER_TOKENS),
                expires: None,
            },
            &[],
        )
        .unwrap();

        Self {
            app,
            admin,
            user,
            fee_deposit,
            token,
            endpoint,
            registry,
            oft,
        }
    }

    pub fn send_param(&self, amount_ld: u128, min_amount_ld: u128) -> SendParam {
        SendParam {
            dst_eid: REMOTE_EID,
            to: Binary::from(addr_to_bytes32(&account(7)).unwrap().to_vec()),
            amount_ld: Uint128::new(amount_ld),
            min_amount_ld: Uint128::new(min_amount_ld),
            extra_options: Binary::default(),
            compose_msg: Binary::default(),
        }
    }

    pub fn send(
        &mut self,
        send_param: SendParam,
        funds: &[Coin],
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.user.clone(),
            self.oft.clone(),
            &ExecuteMsg::Send {
                send_param,
                refund_address: None,
            },
            funds,
        )
    }

    pub fn fee_funds() -> Vec<Coin> {
        vec![coin(NATIVE_FEE, DENOM)]
    }

    /// Deliver a transfer as the endpoint
    pub fn receive(
        &mut self,
        to: &Addr,
        amount_sd: u64,
        nonce: u64,
    ) -> anyhow::Result<AppResponse> {
        let message = OftMessage {
            send_to: addr_to_bytes32(to).unwrap(),
            amount_sd,
            compose: None,
        };
        self.deliver(ExecuteMsg::LzReceive {
            origin: self.origin(nonce),
            guid: Binary::from(vec![nonce as u8; 32]),
            message: message.encode(),
            executor: account(5).to_string(),
            extra_data: Binary::default(),
        })
    }

    /// Deliver a compose transfer as the endpoint
    pub fn receive_compose(
        &mut self,
        composer: &Addr,
        amount_sd: u64,
        nonce: u64,
        compose_queue: &str,
        compose_msg: &[u8],
    ) -> anyhow::Result<AppResponse> {
        let message = OftMessage {
            send_to: addr_to_bytes32(composer).unwrap(),
            amount_sd,
            compose: Some(ComposePayload {
                compose_from: [0xCD; 32],
                compose_msg: compose_msg.to_vec(),
            }),
        };
        self.deliver(ExecuteMsg::LzReceiveWithCompose {
            origin: self.origin(nonce),
            guid: Binary::from(vec![nonce as u8; 32]),
            message: message.encode(),
            executor: account(5).to_string(),
            extra_data: Binary::default(),
            compose_queue: compose_queue.to_string(),
        })
    }

    pub fn origin(&self, nonce: u64) -> Origin {
        Origin {
            src_eid: REMOTE_EID,
            sender: remote_peer(),
            nonce,
        }
    }

    pub fn deliver(&mut self, msg: ExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(self.endpoint.clone(), self.oft.clone(), &msg, &[])
    }

    pub fn set_rate_limit(&mut self, direction: Direction, limit: u128, window_seconds: u64) {
        self.app
            .execute_contract(
                self.admin.clone(),
                self.oft.clone(),
                &ExecuteMsg::SetRateLimit {
                    eid: REMOTE_EID,
                    direction,
                    limit: Uint128::new(limit),
                    window_seconds,
                },
                &[],
            )
            .unwrap();
    }

    pub fn set_compose_queue(&mut self, queue: &str, composer: &Addr) {
        self.app
            .execute_contract(
                self.admin.clone(),
                self.endpoint.clone(),
                &MockEndpointExecuteMsg::SetComposeQueue {
                    queue: queue.to_string(),
                    composer: composer.to_string(),
                },
                &[],
            )
            .unwrap();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn token_balance(&self, addr: &Addr) -> u128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.token,
                &Cw20QueryMsg::Balance {
                    address: addr.to_string(),
                },
            )
            .unwrap();
        res.balance.u128()
    }

    pub fn total_supply(&self) -> u128 {
        let res: cw20::TokenInfoResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.token, &Cw20QueryMsg::TokenInfo {})
            .unwrap();
        res.total_supply.u128()
    }

    pub fn native_balance(&self, addr: &Addr) -> u128 {
        self.app
            .wrap()
            .query_balance(addr, DENOM)
            .unwrap()
            .amount
            .u128()
    }

    pub fn treasury(&self) -> TreasuryResponse {
        self.app
            .wrap()
            .query_wasm_smart(&self.oft, &QueryMsg::Treasury {})
            .unwrap()
    }

    pub fn rate_limit(&self, direction: Direction) -> RateLimitResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.oft,
                &QueryMsg::RateLimit {
                    eid: REMOTE_EID,
                    direction,
                },
            )
            .unwrap()
    }

    pub fn available(&self, direction: Direction) -> u128 {
        self.rate_limit(direction)
            .available_capacity
            .map(|a| a.u128())
            .unwrap_or(u128::MAX)
    }

    pub fn pending_send(&self, request_id: u64) -> Option<PendingSend> {
        self.app
            .wrap()
            .query_wasm_smart(&self.oft, &QueryMsg::PendingSend { request_id })
            .unwrap()
    }

    pub fn last_send(&self) -> Option<RecordedSend> {
        self.app
            .wrap()
            .query_wasm_smart(&self.endpoint, &MockEndpointQueryMsg::LastSend {})
            .unwrap()
    }

    pub fn composes(&self) -> Vec<RecordedCompose> {
        self.app
            .wrap()
            .query_wasm_smart(&self.endpoint, &MockEndpointQueryMsg::Composes {})
            .unwrap()
    }

    pub fn deposits(&self) -> Vec<RecordedDeposit> {
        self.app
            .wrap()
            .query_wasm_smart(&self.registry, &MockRegistryQueryMsg::Deposits {})
            .unwrap()
    }
}

/// Root cause of a failed execution, as text
pub fn err_string(res: anyhow::Result<AppResponse>) -> String {
    res.unwrap_err().root_cause().to_string()
}
