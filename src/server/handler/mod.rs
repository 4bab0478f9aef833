//! This module holds the handler of amistat

use std::fmt::{Display, Formatter};

use actix_web::body::BoxBody;
use actix_web::HttpResponse;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_repr::Serialize_repr;
use utoipa::{IntoParams, ToSchema};

use crate::store::StoreError;

pub use crate::server::handler::accounts::*;
pub use crate::server::handler::friends::*;
pub use crate::server::handler::health::*;
pub use crate::server::handler::version::*;

pub mod accounts;
pub mod friends;
pub mod health;
pub mod version;

/// The result that is used throughout the complete api.
pub type ApiResult<T> = Result<T, ApiError>;

/// The username of an account as path parameter
#[derive(Deserialize, IntoParams)]
pub struct PathUsername {
    #[param(example = "arnau")]
    pub(crate) username: String,
}

#[derive(Serialize_repr, ToSchema)]
#[repr(u16)]
pub(crate) enum ApiStatusCode {
    LoginFailed = 1000,
    UsernameAlreadyOccupied = 1001,
    InvalidAccountData = 1002,
    InvalidUsername = 1003,
    FriendshipAlreadyRequested = 1004,
    AlreadyFriends = 1005,
    NoSuchFriendRequest = 1006,
    InvalidAcceptFlag = 1007,
    MalformedJson = 1008,
    NotFound = 1009,
}

#[derive(Serialize, ToSchema)]
pub(crate) struct ApiErrorResponse {
    #[schema(example = "Error message is here")]
    message: String,
    #[schema(example = 1000)]
    status_code: ApiStatusCode,
}

impl ApiErrorResponse {
    pub(crate) fn new(status_code: ApiStatusCode, message: String) -> Self {
        Self {
            message,
            status_code,
        }
    }
}

/// This enum holds all possible error types that can occur in the API
#[derive(Debug)]
pub enum ApiError {
    /// The credential check was not successful. Can be caused by an
    /// unknown username or an incorrect password
    LoginFailed,
    /// The username is already occupied
    UsernameAlreadyOccupied,
    /// Username or password don't have the required shape. The message
    /// collects one sentence per violated rule
    InvalidAccountData(String),
    /// The referenced user is not registered
    InvalidUsername,
    /// A friend request between the two users is already awaiting a decision
    FriendshipAlreadyRequested,
    /// The two users are already friends
    AlreadyFriends,
    /// There is no open friend request to respond to
    NoSuchFriendRequest,
    /// The accept flag was neither "1" nor "0"
    InvalidAcceptFlag,
    /// The request body could not be parsed
    MalformedJson(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::LoginFailed => write!(f, "The credential check was not successful"),
            ApiError::UsernameAlreadyOccupied => write!(f, "Username is already occupied"),
            ApiError::InvalidAccountData(msg) => write!(f, "{msg}"),
            ApiError::InvalidUsername => write!(f, "User does not exist"),
            ApiError::FriendshipAlreadyRequested => {
                write!(f, "Friendship request already exists")
            }
            ApiError::AlreadyFriends => write!(f, "Users are already friends"),
            ApiError::NoSuchFriendRequest => write!(
                f,
                "Cannot respond to friendship request because request does not exist"
            ),
            ApiError::InvalidAcceptFlag => {
                write!(f, "accept field must be either \"1\" or \"0\"")
            }
            ApiError::MalformedJson(msg) => write!(f, "{msg}"),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            ApiError::LoginFailed => {
                debug!("Credential check failed");

                HttpResponse::Unauthorized().json(ApiErrorResponse::new(
                    ApiStatusCode::LoginFailed,
                    self.to_string(),
                ))
            }
            ApiError::UsernameAlreadyOccupied => {
                debug!("Username is already occupied");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::UsernameAlreadyOccupied,
                    self.to_string(),
                ))
            }
            ApiError::InvalidAccountData(msg) => {
                debug!("Invalid account data: {msg}");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::InvalidAccountData,
                    self.to_string(),
                ))
            }
            ApiError::InvalidUsername => {
                debug!("Referenced user does not exist");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::InvalidUsername,
                    self.to_string(),
                ))
            }
            ApiError::FriendshipAlreadyRequested => {
                debug!("Friendship request already exists");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::FriendshipAlreadyRequested,
                    self.to_string(),
                ))
            }
            ApiError::AlreadyFriends => {
                debug!("Users are already friends");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::AlreadyFriends,
                    self.to_string(),
                ))
            }
            ApiError::NoSuchFriendRequest => {
                debug!("No friend request to respond to");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::NoSuchFriendRequest,
                    self.to_string(),
                ))
            }
            ApiError::InvalidAcceptFlag => {
                debug!("Invalid accept flag");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::InvalidAcceptFlag,
                    self.to_string(),
                ))
            }
            ApiError::MalformedJson(msg) => {
                trace!("Malformed json body: {msg}");

                HttpResponse::BadRequest().json(ApiErrorResponse::new(
                    ApiStatusCode::MalformedJson,
                    self.to_string(),
                ))
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UsernameTaken => Self::UsernameAlreadyOccupied,
            StoreError::RequestAlreadyPending => Self::FriendshipAlreadyRequested,
            StoreError::AlreadyFriends => Self::AlreadyFriends,
            StoreError::NoSuchPendingRequest => Self::NoSuchFriendRequest,
        }
    }
}
