//! All handlers for the friend endpoints live in here

use actix_web::web::{Json, Path};
use actix_web::{get, post, HttpResponse};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::server::handler::{ApiError, ApiErrorResponse, ApiResult, PathUsername};
use crate::server::StoreData;

/// The request of a new friendship
#[derive(Deserialize, ToSchema)]
pub struct CreateFriendRequest {
    /// The username of the executing user
    #[schema(example = "arnau")]
    username: String,
    #[schema(example = "secret_pw_1")]
    password: String,
    /// The username of the new friend
    #[schema(example = "user321")]
    to: String,
}

/// Create a new friend request
///
/// The executing user authenticates with the credentials in the request
/// body. The addressed user must exist and must neither be a friend
/// already nor have an unresolved friend request with the executing user
/// in either direction.
#[utoipa::path(
    tag = "Friends",
    responses(
        (status = 200, description = "Friend request has been created"),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 401, description = "Invalid credentials", body = ApiErrorResponse),
    ),
    request_body = CreateFriendRequest,
)]
#[post("/api/v2/friends/request")]
pub async fn create_friend_request(
    req: Json<CreateFriendRequest>,
    store: StoreData,
) -> ApiResult<HttpResponse> {
    let mut store = store.lock().await;

    if !store.verify_credentials(&req.username, &req.password) {
        return Err(ApiError::LoginFailed);
    }

    if !store.user_exists(&req.to) {
        return Err(ApiError::InvalidUsername);
    }

    store.send_friend_request(&req.username, &req.to)?;

    Ok(HttpResponse::Ok().finish())
}

/// The decision on an open friend request
#[derive(Deserialize, ToSchema)]
pub struct RespondToFriendRequest {
    /// The username of the responding user
    #[schema(example = "sergi")]
    username: String,
    #[schema(example = "secret_pw_1")]
    password: String,
    /// The username of the user that sent the request
    #[schema(example = "arnau")]
    from: String,
    /// "1" accepts the request, "0" declines it
    #[schema(example = "1")]
    accept: String,
}

/// Accept or decline an open friend request
///
/// Only the addressed user may respond. Accepting creates the friendship,
/// declining resolves the request without one; both consume the request,
/// so a declined request may be sent anew.
#[utoipa::path(
    tag = "Friends",
    responses(
        (status = 200, description = "The friend request has been resolved"),
        (status = 400, description = "Client error", body = ApiErrorResponse),
        (status = 401, description = "Invalid credentials", body = ApiErrorResponse),
    ),
    request_body = RespondToFriendRequest,
)]
#[post("/api/v2/friends/respond")]
pub async fn respond_to_friend_request(
    req: Json<RespondToFriendRequest>,
    store: StoreData,
) -> ApiResult<HttpResponse> {
    let accept = match req.accept.as_str() {
        "1" => true,
        "0" => false,
        _ => return Err(ApiError::InvalidAcceptFlag),
    };

    let mut store = store.lock().await;

    if !store.verify_credentials(&req.username, &req.password) {
        return Err(ApiError::LoginFailed);
    }

    if !store.user_exists(&req.from) {
        return Err(ApiError::InvalidUsername);
    }

    store.respond_to_friend_request(&req.username, &req.from, accept)?;

    Ok(HttpResponse::Ok().finish())
}

/// The friends and open incoming friend requests of an account
#[derive(Serialize, ToSchema)]
pub struct GetFriendsResponse {
    pub(crate) friends: Vec<String>,
    /// Usernames that have an unresolved friend request addressed to this
    /// account
    pub(crate) friend_requests: Vec<String>,
}

/// Retrieve the friends of an account
///
/// `friend_requests` holds the usernames of accounts with an open friend
/// request addressed to `username`. The order of both lists carries no
/// meaning.
#[utoipa::path(
    tag = "Friends",
    responses(
        (status = 200, description = "Returns friends and open requests", body = GetFriendsResponse),
        (status = 400, description = "Client error", body = ApiErrorResponse),
    ),
    params(PathUsername),
)]
#[get("/api/v2/friends/{username}")]
pub async fn get_friends(
    path: Path<PathUsername>,
    store: StoreData,
) -> ApiResult<Json<GetFriendsResponse>> {
    let store = store.lock().await;

    if !store.user_exists(&path.username) {
        return Err(ApiError::InvalidUsername);
    }

    Ok(Json(GetFriendsResponse {
        friends: store.friends_of(&path.username).into_iter().sorted().collect(),
        friend_requests: store
            .incoming_requests(&path.username)
            .into_iter()
            .sorted()
            .collect(),
    }))
}
