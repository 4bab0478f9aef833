//! This module holds the server definition

use std::fmt::{Display, Formatter};
use std::io;
use std::net::SocketAddr;

use actix_toolbox::tb_middleware::{setup_logging_mw, LoggingMiddlewareConfig};
use actix_web::http::StatusCode;
use actix_web::middleware::{Compress, ErrorHandlers};
use actix_web::web::{Data, JsonConfig, PayloadConfig};
use actix_web::{App, HttpServer};
use log::info;
use tokio::sync::Mutex;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::server::handler::{
    create_friend_request, get_friends, get_users, health, register_account,
    respond_to_friend_request, version,
};
use crate::server::middleware::{handle_not_found, json_extractor_error};
use crate::server::swagger::ApiDoc;
use crate::store::RelationStore;

pub mod handler;
pub mod middleware;
pub mod swagger;

#[cfg(test)]
mod tests;

/// This type holds the relationship store all handlers work on.
///
/// Every handler takes the store-wide lock, so the collections are only
/// ever observed and mutated atomically.
pub type StoreData = Data<Mutex<RelationStore>>;

/// The errors that can occur during server startup
#[derive(Debug)]
pub enum StartServerError {
    /// IO error that can occur
    IO(io::Error),
}

impl Display for StartServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StartServerError::IO(err) => write!(f, "{err}"),
        }
    }
}

impl From<io::Error> for StartServerError {
    fn from(value: io::Error) -> Self {
        Self::IO(value)
    }
}

/// Start the amistat server
///
/// **Parameter**:
/// - `config`: Reference to a [Config] struct
pub async fn start_server(config: &Config) -> Result<(), StartServerError> {
    let s_addr = SocketAddr::new(config.server.listen_address, config.server.listen_port);

    info!("Starting to listen on {}", s_addr);

    let store: StoreData = Data::new(Mutex::new(RelationStore::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(PayloadConfig::default())
            .app_data(JsonConfig::default().error_handler(json_extractor_error))
            .app_data(store.clone())
            .wrap(setup_logging_mw(LoggingMiddlewareConfig::default()))
            .wrap(Compress::default())
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, handle_not_found))
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()))
            .service(register_account)
            .service(get_users)
            .service(create_friend_request)
            .service(respond_to_friend_request)
            .service(get_friends)
            .service(health)
            .service(version)
    })
    .bind(s_addr)?
    .run()
    .await?;

    Ok(())
}
