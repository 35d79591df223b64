use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Json, Router,
};
use common::{
    eth_sign_request, parse_call_data, parse_evm_address, personal_sign_request,
    typed_data_request, EvmAddress, MessageData, RecoveryByte, SignRequestResponse,
    SignatureEncoding, SignatureVerifier, TransactionBatchBuilder, DEFAULT_MESSAGE,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{config::AgentConfig, error::ApiError, fixtures, manifest};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AgentConfig>,
    pub batch_builder: TransactionBatchBuilder,
    pub verifier: SignatureVerifier,
}

impl AppState {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            batch_builder: TransactionBatchBuilder::new(config.chain_id),
            verifier: SignatureVerifier::new(),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/.well-known/ai-plugin.json", get(plugin_manifest))
        .route("/api/tools/sendTransaction", get(send_transaction))
        .route("/api/tools/eth_sign", get(eth_sign))
        .route("/api/tools/personal_sign", get(personal_sign))
        .route("/api/tools/eth_signTypedData", get(sign_typed_data))
        .route("/api/tools/validate", get(validate_query).post(validate_body))
        .route("/api/tools/cow-quote", get(cow_quote))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn plugin_manifest(State(state): State<AppState>) -> Json<Value> {
    Json(manifest::plugin_manifest(&state.config))
}

async fn cow_quote() -> Json<Value> {
    Json(fixtures::cow_quote())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionQuery {
    pub evm_address: String,
    pub num_success: usize,
    #[serde(default)]
    pub num_fail: usize,
    pub call_data: Option<String>,
}

async fn send_transaction(
    State(state): State<AppState>,
    query: Result<Query<SendTransactionQuery>, QueryRejection>,
) -> Result<Json<SignRequestResponse>, ApiError> {
    let Query(query) = query?;
    let to = EvmAddress::parse(&query.evm_address)?;
    if query.num_success == 0 {
        return Err(ApiError::bad_request("numSuccess must be at least 1"));
    }
    let total = query.num_success.saturating_add(query.num_fail);
    if total > state.config.max_transactions {
        return Err(ApiError::bad_request(format!(
            "at most {} transactions per request, got {total}",
            state.config.max_transactions
        )));
    }
    let call_data = query.call_data.as_deref().map(parse_call_data).transpose()?;

    info!(
        %to,
        num_success = query.num_success,
        num_fail = query.num_fail,
        "building transaction batch"
    );
    Ok(Json(state.batch_builder.build_send_transactions(
        &to,
        query.num_success,
        query.num_fail,
        call_data,
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageQuery {
    pub evm_address: String,
    pub message: Option<String>,
}

impl SignMessageQuery {
    fn message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(DEFAULT_MESSAGE)
    }
}

async fn eth_sign(
    State(state): State<AppState>,
    query: Result<Query<SignMessageQuery>, QueryRejection>,
) -> Result<Json<SignRequestResponse>, ApiError> {
    let Query(query) = query?;
    let address = parse_evm_address(&query.evm_address)?;
    debug!(%address, "eth_sign request");
    Ok(Json(eth_sign_request(state.config.chain_id, address, query.message())))
}

async fn personal_sign(
    State(state): State<AppState>,
    query: Result<Query<SignMessageQuery>, QueryRejection>,
) -> Result<Json<SignRequestResponse>, ApiError> {
    let Query(query) = query?;
    let address = parse_evm_address(&query.evm_address)?;
    debug!(%address, "personal_sign request");
    Ok(Json(personal_sign_request(state.config.chain_id, address, query.message())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataQuery {
    pub evm_address: String,
}

async fn sign_typed_data(
    State(state): State<AppState>,
    query: Result<Query<TypedDataQuery>, QueryRejection>,
) -> Result<Json<SignRequestResponse>, ApiError> {
    let Query(query) = query?;
    let address = parse_evm_address(&query.evm_address)?;
    debug!(%address, "eth_signTypedData request");
    Ok(Json(typed_data_request(state.config.chain_id, address)))
}

/// Query-string form of a validation request. The signature comes either
/// packed in `signature` or split into `r`, `s` and `v`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateQuery {
    pub evm_address: String,
    pub message: String,
    pub signature: Option<String>,
    pub r: Option<String>,
    pub s: Option<String>,
    pub v: Option<String>,
}

impl ValidateQuery {
    fn signature(&self) -> Result<SignatureEncoding, ApiError> {
        if let Some(signature) = &self.signature {
            return Ok(SignatureEncoding::Packed(signature.clone()));
        }
        match (&self.r, &self.s, &self.v) {
            (Some(r), Some(s), Some(v)) => Ok(SignatureEncoding::Decomposed {
                r: r.clone(),
                s: s.clone(),
                v: RecoveryByte::Text(v.clone()),
            }),
            _ => Err(ApiError::bad_request(
                "Provide either signature or all of r, s and v",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateBody {
    pub evm_address: String,
    pub message: MessageData,
    pub signature: SignatureEncoding,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResponse {
    pub valid: bool,
}

async fn validate_query(
    State(state): State<AppState>,
    query: Result<Query<ValidateQuery>, QueryRejection>,
) -> Result<Json<ValidationResponse>, ApiError> {
    let Query(query) = query?;
    let signature = query.signature()?;
    validate(&state, &query.evm_address, &MessageData::Text(query.message), &signature)
}

async fn validate_body(
    State(state): State<AppState>,
    body: Result<Json<ValidateBody>, JsonRejection>,
) -> Result<Json<ValidationResponse>, ApiError> {
    let Json(body) = body?;
    validate(&state, &body.evm_address, &body.message, &body.signature)
}

fn validate(
    state: &AppState,
    evm_address: &str,
    message: &MessageData,
    signature: &SignatureEncoding,
) -> Result<Json<ValidationResponse>, ApiError> {
    let claimed = parse_evm_address(evm_address)?;
    let valid = state.verifier.verify(claimed, message, signature)?;
    info!(%claimed, valid, "validated signature");
    Ok(Json(ValidationResponse { valid }))
}
