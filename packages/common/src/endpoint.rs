//! Messaging channel (endpoint) interface.
//!
//! The endpoint transports OApp payloads between chains. It enforces peer
//! authenticity and ordered, exactly-once delivery, assigns nonces and GUIDs,
//! quotes transport fees and drives the call-backs into the OApp.
//!
//! ## Send handshake
//!
//! 1. The OApp executes [`EndpointExecuteMsg::Send`] with the transport fee
//!    attached and a [`SendRequest`] handle.
//! 2. The endpoint dispatches the packet and executes
//!    [`OAppExecuteMsg::ConfirmSend`] on the OApp, echoing the handle, with the
//!    unspent fee attached.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint128};
use tiny_keccak::{Hasher, Keccak};

// ============================================================================
// Shared Types
// ============================================================================

/// Parameters of an outbound packet
#[cw_serde]
pub struct MessagingParams {
    /// Destination endpoint id
    pub dst_eid: u32,
    /// Receiving OApp on the destination chain (32 bytes)
    pub receiver: Binary,
    /// OApp payload
    pub message: Binary,
    /// Executor options (type 3)
    pub options: Binary,
    /// Pay the transport fee in the ZRO token instead of native
    pub pay_in_zro: bool,
}

/// Transport fee quote
#[cw_serde]
#[derive(Default)]
pub struct MessagingFee {
    pub native_fee: Uint128,
    pub zro_fee: Uint128,
}

/// Receipt of a dispatched packet
#[cw_serde]
pub struct MessagingReceipt {
    /// Globally unique id of the packet (32 bytes)
    pub guid: Binary,
    /// Outbound nonce on the pathway
    pub nonce: u64,
    /// Fee actually charged
    pub fee: MessagingFee,
}

/// Handle of one in-flight send request.
///
/// Issued by the OApp, carried through the endpoint untouched and presented
/// back on `ConfirmSend`.
#[cw_serde]
pub struct SendRequest {
    pub id: u64,
    /// Account on whose behalf the OApp dispatched the packet
    pub sender: String,
}

/// Origin of a delivered packet
#[cw_serde]
pub struct Origin {
    pub src_eid: u32,
    /// Sending OApp on the source chain (32 bytes)
    pub sender: Binary,
    pub nonce: u64,
}

/// Composer bound to a compose queue
#[cw_serde]
pub struct ComposeQueueResponse {
    pub composer: String,
}

// ============================================================================
// Messages
// ============================================================================

/// Execute messages accepted by the endpoint
#[cw_serde]
pub enum EndpointExecuteMsg {
    /// Register the calling OApp with its receive-execution metadata
    RegisterOApp { lz_receive_info: Binary },

    /// Set the delegate allowed to configure the calling OApp
    SetDelegate { delegate: String },

    /// Open the pathway between the calling OApp and a remote OApp
    InitChannel { remote_eid: u32, remote_oapp: Binary },

    /// Dispatch a packet; the transport fee is attached as funds
    Send {
        request: SendRequest,
        params: MessagingParams,
    },

    /// Enqueue a compose message for `to`
    SendCompose {
        to: String,
        guid: Binary,
        index: u16,
        message: Binary,
    },
}

/// Query messages answered by the endpoint
#[cw_serde]
#[derive(QueryResponses)]
pub enum EndpointQueryMsg {
    #[returns(MessagingFee)]
    Quote {
        sender: String,
        params: MessagingParams,
    },

    #[returns(bool)]
    IsChannelInitialized {
        oapp: String,
        remote_eid: u32,
        remote_oapp: Binary,
    },

    #[returns(ComposeQueueResponse)]
    ComposeQueue { queue: String },
}

/// Call-backs the endpoint executes on an OApp
#[cw_serde]
pub enum OAppExecuteMsg {
    ConfirmSend {
        request: SendRequest,
        receipt: MessagingReceipt,
    },
    LzReceive {
        origin: Origin,
        guid: Binary,
        message: Binary,
        executor: String,
        extra_data: Binary,
    },
    LzReceiveWithCompose {
        origin: Origin,
        guid: Binary,
        message: Binary,
        executor: String,
        extra_data: Binary,
        compose_queue: String,
    },
}

// ============================================================================
// GUID
// ============================================================================

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Compute the GUID of a packet.
///
/// `keccak256(nonce (8) | src_eid (4) | sender | dst_eid (4) | receiver)`
pub fn compute_guid(
    nonce: u64,
    src_eid: u32,
    sender: &[u8],
    dst_eid: u32,
    receiver: &[u8],
) -> [u8; 32] {
    let mut data = Vec::with_capacity(16 + sender.len() + receiver.len());
    data.extend_from_slice(&nonce.to_be_bytes());
    data.extend_from_slice(&src_eid.to_be_bytes());
    data.extend_from_slice(sender);
    data.extend_from_slice(&dst_eid.to_be_bytes());
    data.extend_from_slice(receiver);
    keccak256(&data)
}
