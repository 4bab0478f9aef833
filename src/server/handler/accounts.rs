//! All handlers for the account endpoints live in here

use actix_web::web::Json;
use actix_web::{get, post, HttpResponse};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::server::handler::{ApiError, ApiErrorResponse, ApiResult};
use crate::server::StoreData;

// the pattern is a literal, it always compiles
static VALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new("^[a-zA-Z0-9_]*$").unwrap());

const USERNAME_RULES: &str = "Username must be unique, from 5 to 10 alphanumeric characters.";
const PASSWORD_RULES: &str = "Password must have from 8 to 12 alphanumeric characters.";

/// Checks username and password for the shape required at registration.
///
/// The username must consist of 5 to 10 characters, the password of 8 to
/// 12, both drawn from `[a-zA-Z0-9_]`. The error message collects one
/// sentence per violated rule.
fn check_username_and_password(username: &str, password: &str) -> Result<(), String> {
    let mut msg = String::new();

    if !VALID_CHARS.is_match(username) {
        msg.push_str(&format!("Username has invalid characters! {USERNAME_RULES}"));
    }

    if !VALID_CHARS.is_match(password) {
        msg.push_str(&format!("Password has invalid characters! {PASSWORD_RULES}"));
    }

    // byte length equals character count here, the accepted alphabet is
    // pure ascii
    if username.len() < 5 {
        msg.push_str(&format!("Username too short! {USERNAME_RULES}"));
    } else if username.len() > 10 {
        msg.push_str(&format!("Username too long! {USERNAME_RULES}"));
    }

    if password.len() < 8 {
        msg.push_str(&format!("Password too short! {PASSWORD_RULES}"));
    } else if password.len() > 12 {
        msg.push_str(&format!("Password too long! {PASSWORD_RULES}"));
    }

    if msg.is_empty() {
        Ok(())
    } else {
        Err(msg)
    }
}

/// The content to register a new account
#[derive(Debug, Deserialize, ToSchema)]
pub struct AccountRegistrationRequest {
    #[schema(example = "user123")]
    username: String,
    #[schema(example = "secret_pw_1")]
    password: String,
}

/// Register a new account
///
/// The username must consist of 5 to 10 characters, the password of 8 to
/// 12 characters, both drawn from `[a-zA-Z0-9_]`.
#[utoipa::path(
    tag = "Accounts",
    responses(
        (status = 200, description = "Account got created"),
        (status = 400, description = "Client error", body = ApiErrorResponse),
    ),
    request_body = AccountRegistrationRequest,
)]
#[post("/api/v2/accounts/register")]
pub async fn register_account(
    req: Json<AccountRegistrationRequest>,
    store: StoreData,
) -> ApiResult<HttpResponse> {
    check_username_and_password(&req.username, &req.password)
        .map_err(ApiError::InvalidAccountData)?;

    let mut store = store.lock().await;
    store.register(&req.username, &req.password)?;

    Ok(HttpResponse::Ok().finish())
}

/// The usernames of all registered accounts
#[derive(Serialize, ToSchema)]
pub struct GetUsersResponse {
    pub(crate) usernames: Vec<String>,
}

/// Retrieve the usernames of all registered accounts
///
/// The order of the returned names carries no meaning.
#[utoipa::path(
    tag = "Accounts",
    responses(
        (status = 200, description = "Returns all registered usernames", body = GetUsersResponse),
    ),
)]
#[get("/api/v2/accounts")]
pub async fn get_users(store: StoreData) -> ApiResult<Json<GetUsersResponse>> {
    let store = store.lock().await;

    Ok(Json(GetUsersResponse {
        usernames: store.usernames().into_iter().sorted().collect(),
    }))
}
