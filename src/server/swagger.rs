//! This module holds the definition of the swagger declaration

use utoipa::OpenApi;

use crate::server::handler;

/// Helper struct for the openapi definitions.
#[derive(OpenApi)]
#[openapi(
    paths(
        handler::register_account,
        handler::get_users,
        handler::create_friend_request,
        handler::respond_to_friend_request,
        handler::get_friends,
        handler::health,
        handler::version,
    ),
    components(schemas(
        handler::ApiErrorResponse,
        handler::ApiStatusCode,
        handler::AccountRegistrationRequest,
        handler::GetUsersResponse,
        handler::CreateFriendRequest,
        handler::RespondToFriendRequest,
        handler::GetFriendsResponse,
        handler::HealthResponse,
        handler::VersionResponse,
    ))
)]
pub struct ApiDoc;
