use actix_web::error::JsonPayloadError;
use actix_web::HttpRequest;

use crate::server::handler::ApiError;

/// Converts errors of the json extractor into the api's error type
pub(crate) fn json_extractor_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::MalformedJson(err.to_string()).into()
}
