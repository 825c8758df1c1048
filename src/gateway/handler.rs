use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{info, instrument};

use crate::constants::{DEFAULT_PAPER_LIMIT, is_valid_paper_limit};
use crate::gateway::error::GatewayError;
use crate::gateway::state::AppState;
use crate::pipeline::Claim;
use crate::verify::{Decoded, SourceText};

#[derive(Debug, Deserialize)]
pub struct SearchCheckRequest {
    pub claim: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub core_api_key: Option<String>,
    #[serde(default)]
    pub ai_api_key: Option<String>,
}

fn default_limit() -> u32 {
    DEFAULT_PAPER_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct TextInput {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<TextInput> for SourceText {
    fn from(input: TextInput) -> Self {
        SourceText {
            title: input.title.unwrap_or_else(|| "Unknown".to_string()),
            text: input.text,
            url: input.url,
            ..SourceText::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TextsCheckRequest {
    pub claim: String,
    pub texts: Vec<TextInput>,
    #[serde(default)]
    pub ai_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub claim: String,
    #[serde(default)]
    pub ai_api_key: Option<String>,
}

pub(crate) fn parse_request<T: DeserializeOwned>(
    request: serde_json::Value,
) -> Result<T, GatewayError> {
    serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

fn require_claim(claim: &str) -> Result<(), GatewayError> {
    if claim.trim().is_empty() {
        return Err(GatewayError::InvalidRequest("claim must not be empty".to_string()));
    }
    Ok(())
}

#[instrument(skip(state, request))]
pub async fn search_check_handler(
    State(state): State<AppState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: SearchCheckRequest = parse_request(request)?;
    require_claim(&request.claim)?;
    if !is_valid_paper_limit(request.limit) {
        return Err(GatewayError::InvalidRequest(format!(
            "limit must be between 1 and 10, got {}",
            request.limit
        )));
    }

    let checker = state.checker_for(
        request.core_api_key.as_deref(),
        request.ai_api_key.as_deref(),
    )?;

    let mut claim = Claim::new(request.claim);
    if let Some(query) = request.query {
        claim = claim.with_query(query);
    }

    let result = checker.check_claim(&claim, request.limit).await?;
    info!(final_verdict = %result.final_verdict, "Search fact-check served");
    Ok(Json(result).into_response())
}

#[instrument(skip(state, request))]
pub async fn texts_check_handler(
    State(state): State<AppState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: TextsCheckRequest = parse_request(request)?;
    require_claim(&request.claim)?;

    let checker = state.checker_for(None, request.ai_api_key.as_deref())?;
    let texts: Vec<SourceText> = request.texts.into_iter().map(SourceText::from).collect();

    let result = checker.check_claim_with_texts(&request.claim, texts).await?;
    info!(final_verdict = %result.final_verdict, "Texts fact-check served");
    Ok(Json(result).into_response())
}

#[instrument(skip(state, request))]
pub async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ClassifyRequest = parse_request(request)?;
    require_claim(&request.claim)?;

    let checker = state.checker_for(None, request.ai_api_key.as_deref())?;

    let body = match checker.classify_claim(&request.claim).await? {
        Decoded::Parsed(classification) => json!(classification),
        Decoded::Unparsed(failure) => json!({
            "raw_response": failure.raw,
            "parse_error": failure.reason,
        }),
    };
    Ok(Json(body).into_response())
}
