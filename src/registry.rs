use crate::api;
use crate::model::Api;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;
use std::sync::Mutex;

/// Outcome classification surfaced to whoever registers an account.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterError {
    AlreadyExists,
    CannotConnect(String),
    InvalidAuth(String),
    ApiError(String),
    Unknown,
}

impl From<api::Error> for RegisterError {
    fn from(error: api::Error) -> RegisterError {
        match error {
            api::Error::CannotConnect(s) => RegisterError::CannotConnect(s),
            api::Error::InvalidAuth(s) => RegisterError::InvalidAuth(s),
            api::Error::ApiError(s) => RegisterError::ApiError(s),
            _ => RegisterError::Unknown,
        }
    }
}

impl RegisterError {
    pub fn kind(&self) -> &'static str {
        match self {
            RegisterError::AlreadyExists => "already_exists",
            RegisterError::CannotConnect(_) => "cannot_connect",
            RegisterError::InvalidAuth(_) => "invalid_auth",
            RegisterError::ApiError(_) => "api_error",
            RegisterError::Unknown => "unknown",
        }
    }

    fn status(&self) -> Status {
        match self {
            RegisterError::AlreadyExists => Status::Conflict,
            RegisterError::CannotConnect(_) => Status::BadGateway,
            RegisterError::InvalidAuth(_) => Status::Forbidden,
            RegisterError::ApiError(_) => Status::BadRequest,
            RegisterError::Unknown => Status::InternalServerError,
        }
    }

    /// Detail message, verbatim from the server where one exists.
    fn message(&self) -> Option<&str> {
        match self {
            RegisterError::CannotConnect(s)
            | RegisterError::InvalidAuth(s)
            | RegisterError::ApiError(s) => Some(s),
            _ => None,
        }
    }
}

impl<'r> Responder<'r, 'static> for RegisterError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = serde_json::json!({
            "error": self.kind(),
            "msg": self.message(),
        })
        .to_string();

        Response::build()
            .status(self.status())
            .sized_body(body.len(), Cursor::new(body))
            .header(ContentType::JSON)
            .ok()
    }
}

/// A successfully registered account.
#[derive(Debug, Clone)]
pub struct Account {
    pub title: String,
    pub api: Api,
}

/// Registered accounts. Owned by the process and handed to the registration
/// handler instead of living as ambient global state.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Mutex<Vec<Account>>,
}

impl AccountRegistry {
    pub fn new() -> AccountRegistry {
        AccountRegistry::default()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts
            .lock()
            .map(|accounts| accounts.iter().any(|a| a.api.username == username))
            .unwrap_or(false)
    }

    pub fn titles(&self) -> Vec<String> {
        self.accounts
            .lock()
            .map(|accounts| accounts.iter().map(|a| a.title.clone()).collect())
            .unwrap_or_default()
    }

    /// Register `api` as a new account. Duplicate usernames are rejected
    /// before any network request; credentials are then confirmed with a
    /// one-shot login.
    pub async fn register(&self, api: Api) -> Result<Account, RegisterError> {
        if self.contains(&api.username) {
            return Err(RegisterError::AlreadyExists);
        }

        let title = api::validate(&api).await?;
        let account = Account { title, api };

        let mut accounts = self.accounts.lock().or(Err(RegisterError::Unknown))?;
        if accounts
            .iter()
            .any(|a| a.api.username == account.api.username)
        {
            return Err(RegisterError::AlreadyExists);
        }
        accounts.push(account.clone());
        Ok(account)
    }
}
