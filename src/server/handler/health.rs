use actix_web::get;
use actix_web::web::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::handler::ApiResult;
use crate::server::StoreData;

/// The health data of this server
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = 1337)]
    registered_accounts: u64,
    #[schema(example = 42)]
    pending_requests: u64,
    #[schema(example = 23)]
    friendships: u64,
}

/// Request health data from this server.
///
/// `registered_accounts` are the currently registered user accounts,
/// `pending_requests` the unresolved friend requests and `friendships`
/// the confirmed friendships, each pair counted once.
#[utoipa::path(
    tag = "Server status",
    responses(
        (status = 200, description = "Health data of this server", body = HealthResponse),
    ),
)]
#[get("/api/v2/health")]
pub async fn health(store: StoreData) -> ApiResult<Json<HealthResponse>> {
    let store = store.lock().await;

    Ok(Json(HealthResponse {
        registered_accounts: store.user_count() as u64,
        pending_requests: store.pending_request_count() as u64,
        friendships: store.friendship_count() as u64,
    }))
}
