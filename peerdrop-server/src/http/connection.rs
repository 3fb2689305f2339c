//! `/api/connection`: placeholder for out-of-band offer storage. It stores
//! nothing and is not part of negotiation; peers negotiate over `/ws`.

use axum::Json;
use axum::extract::Query;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOffer {
    pub connection_id: String,
    pub offer: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectionAck {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionQuery {
    pub id: Option<String>,
}

pub async fn post_connection(Json(body): Json<ConnectionOffer>) -> Json<ConnectionAck> {
    debug!("Connection offer stub hit for {}", body.connection_id);

    Json(ConnectionAck {
        success: true,
        message: "Connection offer received".to_owned(),
    })
}

pub async fn get_connection(
    Query(query): Query<ConnectionQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(id) = query.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Connection ID is required" })),
        );
    };
    debug!("Connection lookup stub hit for {}", id);

    (
        StatusCode::OK,
        Json(json!({ "success": true, "offer": { "type": "offer", "sdp": "dummy-sdp-for-demo" } })),
    )
}
