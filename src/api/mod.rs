pub mod endpoint;
pub mod error;
pub mod response;

use crate::model;
pub use error::Error;

const API_SUCCESS: i64 = 200;
const UNKNOWN_ERROR_MSG: &str = "unknown error";

pub fn api(endpoint: String, username: String, password: String) -> model::Api {
    model::Api {
        endpoint,
        username,
        password,
    }
}

/// Map transport-level reqwest errors to `Error::CannotConnect`.
fn map_transport_err(error: reqwest::Error) -> Error {
    Error::CannotConnect(error.to_string())
}

/// Process the `{code, msg}` pair of an HTTP-successful response. A non-200
/// `code` is a server-side error carrying `msg` as the human-readable reason.
fn check_payload_code(code: i64, msg: Option<String>) -> Result<(), Error> {
    if code == API_SUCCESS {
        Ok(())
    } else {
        Err(Error::ApiError(
            msg.unwrap_or_else(|| String::from(UNKNOWN_ERROR_MSG)),
        ))
    }
}

/// Read the body of an HTTP-successful response and decode it as `T`.
/// Non-success statuses and undecodable bodies both mean the endpoint is
/// not usable, so they map to `Error::CannotConnect`.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    let status = response.status();
    if status != http::StatusCode::OK {
        return Err(Error::CannotConnect(format!(
            "server responded with HTTP {}",
            status
        )));
    }

    let body = response.text().await.map_err(map_transport_err)?;
    serde_json::from_str(&body)
        .map_err(|e| Error::CannotConnect(format!("unreadable response: {} ({})", e, body)))
}

/// Log in with `api` credentials. On success the session cookie is retained
/// by the returned client's cookie store for the rest of the cycle.
pub async fn login(api: &model::Api) -> Result<model::LoggedInApi, Error> {
    let client = reqwest::ClientBuilder::new()
        .cookie_store(true)
        .build()
        .or(Err(Error::InternalError))?;
    let url = format!("{}{}", api.endpoint, endpoint::LOGIN);

    let response = client
        .get(url)
        .query(&[
            ("username", api.username.as_str()),
            ("password", api.password.as_str()),
        ])
        .send()
        .await
        .map_err(map_transport_err)?;

    let login = decode::<response::login::Login>(response).await?;
    check_payload_code(login.code, login.msg)?;

    Ok(model::LoggedInApi {
        endpoint: api.endpoint.to_owned(),
        client,
    })
}

/// Read the balance detail of the logged-in account.
pub async fn balance(api: &model::LoggedInApi) -> Result<model::Balance, Error> {
    let url = format!("{}{}", api.endpoint, endpoint::BALANCE);

    let response = api
        .client
        .get(url)
        .query(&[("detail", "1")])
        .send()
        .await
        .map_err(map_transport_err)?;

    let balance = decode::<response::balance::Balance>(response).await?;
    check_payload_code(balance.code, balance.msg)?;

    let data = balance.data.unwrap_or_default();
    Ok(model::Balance {
        remain: data.remain,
        balance: data.balance,
        average_usage: data.average_usage,
        expected_remain: data.expected_remain,
        daily_usage: data.daily_usage,
        device_name: data.device_name,
        room_name: data.room_name,
    })
}

/// One-shot login used while registering an account. Returns the display
/// title under which the account is shown.
pub async fn validate(api: &model::Api) -> Result<String, Error> {
    login(api).await?;
    Ok(format!("PowerZCST: {}", api.username))
}
