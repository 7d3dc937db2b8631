//! HTTP routes for the development gateway

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use fhevm_core::{parse_address, AccessChange};

use crate::error::{GatewayError, Result};
use crate::metrics;
use crate::state::SharedState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub chain_id: u64,
    pub acl_address: String,
    pub grants: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    pub ciphertext: Vec<u8>,
    pub contract_address: String,
    #[serde(default)]
    pub user_address: Option<String>,
}

#[derive(Serialize)]
pub struct DecryptResponse {
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Body of `POST /acl/grant` and `POST /acl/revoke`, also the query of `GET /acl/check`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclRequest {
    pub acl_address: String,
    pub contract_address: String,
    pub user_address: String,
}

impl AclRequest {
    fn to_change(&self) -> Result<AccessChange> {
        Ok(AccessChange {
            acl_address: parse_address(&self.acl_address)?,
            contract_address: parse_address(&self.contract_address)?,
            user_address: parse_address(&self.user_address)?,
        })
    }
}

#[derive(Serialize)]
pub struct AclCheckResponse {
    pub allowed: bool,
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready".to_string(),
        chain_id: state.config.chain_id,
        acl_address: state.acl_address().to_checksum(None),
        grants: state.grant_count().await,
    })
}

async fn decrypt(
    State(state): State<SharedState>,
    Json(req): Json<DecryptRequest>,
) -> Result<Json<DecryptResponse>> {
    let start = Instant::now();
    let result = state
        .decrypt(&req.ciphertext, &req.contract_address, req.user_address.as_deref())
        .await;

    let outcome = match &result {
        Ok(_) => metrics::OUTCOME_OK,
        Err(GatewayError::Forbidden { .. }) => metrics::OUTCOME_DENIED,
        Err(_) => metrics::OUTCOME_CLIENT_ERROR,
    };
    metrics::record_decrypt(outcome, start.elapsed());

    let (value, ty) = result?;
    tracing::debug!(contract = %req.contract_address, ty = %ty, "Decrypted value");

    Ok(Json(DecryptResponse {
        value,
        ty: ty.as_str().to_string(),
    }))
}

async fn acl_grant(State(state): State<SharedState>, Json(req): Json<AclRequest>) -> Result<StatusCode> {
    metrics::record_acl(metrics::ACTION_GRANT);
    state.grant(req.to_change()?).await?;
    tracing::info!(contract = %req.contract_address, user = %req.user_address, "Access granted");
    Ok(StatusCode::NO_CONTENT)
}

async fn acl_revoke(State(state): State<SharedState>, Json(req): Json<AclRequest>) -> Result<StatusCode> {
    metrics::record_acl(metrics::ACTION_REVOKE);
    state.revoke(req.to_change()?).await?;
    tracing::info!(contract = %req.contract_address, user = %req.user_address, "Access revoked");
    Ok(StatusCode::NO_CONTENT)
}

async fn acl_check(
    State(state): State<SharedState>,
    Query(req): Query<AclRequest>,
) -> Result<Json<AclCheckResponse>> {
    metrics::record_acl(metrics::ACTION_CHECK);
    let allowed = state.check(req.to_change()?).await?;
    Ok(Json(AclCheckResponse { allowed }))
}

async fn prometheus_metrics(State(state): State<SharedState>) -> Response {
    match state.render_metrics() {
        Some(body) => body.into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Browser dapps call the gateway cross-origin
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/decrypt", post(decrypt))
        .route("/acl/grant", post(acl_grant))
        .route("/acl/revoke", post(acl_revoke))
        .route("/acl/check", get(acl_check))
        .route("/metrics", get(prometheus_metrics))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::state::create_shared_state;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use fhevm_core::mock::encode_ciphertext;
    use fhevm_core::{EncryptionType, TypedPlaintext, U256};
    use tower::ServiceExt;

    fn addr(c: char) -> String {
        format!("0x{}", c.to_string().repeat(40))
    }

    fn router() -> Router {
        create_router(create_shared_state(GatewayConfig::default()).unwrap())
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let resp = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ready");
        assert_eq!(json["chainId"], 31337);
    }

    #[tokio::test]
    async fn test_decrypt_route() {
        let data = encode_ciphertext(&[TypedPlaintext {
            ty: EncryptionType::Uint32,
            value: U256::from(123456u32),
        }]);
        let resp = router()
            .oneshot(post_json(
                "/decrypt",
                serde_json::json!({"ciphertext": data, "contractAddress": addr('a')}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["value"], 123456);
        assert_eq!(json["type"], "uint32");
    }

    #[tokio::test]
    async fn test_decrypt_route_errors() {
        let resp = router()
            .oneshot(post_json(
                "/decrypt",
                serde_json::json!({"ciphertext": [1, 2, 3], "contractAddress": addr('a')}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let data = encode_ciphertext(&[TypedPlaintext {
            ty: EncryptionType::Bool,
            value: U256::from(1),
        }]);
        let resp = router()
            .oneshot(post_json(
                "/decrypt",
                serde_json::json!({
                    "ciphertext": data,
                    "contractAddress": addr('a'),
                    "userAddress": addr('b'),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_acl_routes() {
        let app = router();
        let acl = GatewayConfig::default().acl_address;
        let body = serde_json::json!({
            "aclAddress": acl,
            "contractAddress": addr('c'),
            "userAddress": addr('d'),
        });
        let check_uri = format!(
            "/acl/check?aclAddress={}&contractAddress={}&userAddress={}",
            acl,
            addr('c'),
            addr('d')
        );

        let resp = app.clone().oneshot(post_json("/acl/grant", body.clone())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .clone()
            .oneshot(Request::get(&check_uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["allowed"], true);

        let resp = app.clone().oneshot(post_json("/acl/revoke", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .oneshot(Request::get(&check_uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["allowed"], false);
    }

    #[tokio::test]
    async fn test_acl_rejects_bad_address() {
        let resp = router()
            .oneshot(post_json(
                "/acl/grant",
                serde_json::json!({
                    "aclAddress": "0x1",
                    "contractAddress": addr('c'),
                    "userAddress": addr('d'),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let resp = router()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
