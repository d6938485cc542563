#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use config::Config;
use powerzcst_rs::api;
use powerzcst_rs::fetcher::{Fetcher, DEFAULT_INTERVAL_SECS};
use powerzcst_rs::model::DEFAULT_ENDPOINT;
use powerzcst_rs::registry::{Account, AccountRegistry, RegisterError};
use powerzcst_rs::sensor;
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod metrics;

#[derive(Clone, serde::Deserialize)]
pub struct PowerzcstConfig {
    endpoint: String,
    username: String,
    password: String,
    interval: u64,
}

/// Structure containing state for API handlers.
pub struct StateData {
    registry: AccountRegistry,
    interval: u64,
}

pub fn read_settings() -> PowerzcstConfig {
    let mut settings = Config::default();
    settings
        .merge(config::Environment::with_prefix("PZCST"))
        .unwrap()
        .set_default("endpoint", DEFAULT_ENDPOINT)
        .unwrap()
        .set_default("username", "")
        .unwrap()
        .set_default("password", "")
        .unwrap()
        .set_default("interval", DEFAULT_INTERVAL_SECS as i64)
        .unwrap();

    settings.try_into().expect("Configuration error")
}

/// Start the polling fetcher for `account`, plus a subscriber task feeding
/// every published state into the exporter gauges.
fn spawn_poller(account: &Account, interval_secs: u64) {
    let fetcher = Fetcher::new(account.api.clone());
    let mut updates = fetcher.subscribe();
    let username = account.api.username.clone();

    rocket::tokio::spawn(fetcher.run(Duration::from_secs(interval_secs)));
    rocket::tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            metrics::publish(&username, &state);
        }
    });
}

#[get("/metrics")]
async fn metrics_route() -> Result<String, api::Error> {
    metrics::read().await
}

#[get("/sensors")]
fn sensors_route() -> Json<Vec<sensor::SensorMeta>> {
    Json(sensor::catalog())
}

#[get("/accounts")]
fn accounts_route(state: &State<StateData>) -> Json<Vec<String>> {
    Json(state.registry.titles())
}

#[derive(Deserialize)]
struct RegisterRequest {
    username: String,
    password: String,
    endpoint: Option<String>,
}

#[derive(Serialize)]
struct RegisterResponse {
    title: String,
}

#[post("/accounts", format = "json", data = "<request>")]
async fn register_route(
    state: &State<StateData>,
    request: Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, RegisterError> {
    let request = request.into_inner();
    let api = api::api(
        request
            .endpoint
            .unwrap_or_else(|| String::from(DEFAULT_ENDPOINT)),
        request.username,
        request.password,
    );

    let account = state.registry.register(api).await?;
    log::info!("registered account {}", account.title);
    spawn_poller(&account, state.interval);

    Ok(Json(RegisterResponse {
        title: account.title,
    }))
}

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    env_logger::init();

    let settings = read_settings();
    let registry = AccountRegistry::new();

    if settings.username.is_empty() {
        log::info!("no account configured in the environment; waiting for registrations");
    } else {
        let api = api::api(
            settings.endpoint.clone(),
            settings.username.clone(),
            settings.password.clone(),
        );
        match registry.register(api).await {
            Ok(account) => spawn_poller(&account, settings.interval),
            Err(e) => log::error!("unable to register account from the environment: {:?}", e),
        }
    }

    rocket::build()
        .manage(StateData {
            registry,
            interval: settings.interval,
        })
        .mount(
            "/",
            routes![metrics_route, sensors_route, accounts_route, register_route],
        )
        .launch()
        .await?;

    Ok(())
}
