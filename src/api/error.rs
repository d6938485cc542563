use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Transport failure, non-success HTTP status or an unreadable body.
    CannotConnect(String),
    /// Reserved: the observed API reports bad credentials through the
    /// payload `code`/`msg` pair, never through an HTTP-level signal.
    InvalidAuth(String),
    /// Server-reported business error, carrying the server's `msg`.
    ApiError(String),
    FormatError,
    InternalError,
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match self {
            Error::CannotConnect(s) => {
                let error = format!("<html><body><h3>502 Bad Gateway</h3>Error while contacting the account API: <code>{}</code></body></html>", s);
                Response::build()
                    .status(Status::BadGateway)
                    .sized_body(error.len(), Cursor::new(error))
                    .header(ContentType::new("text", "html"))
                    .ok()
            }
            Error::InvalidAuth(s) => {
                let error = format!("<html><body><h3>403 Forbidden</h3>Error while authenticating to the account API: <code>{}</code></body></html>", s);
                Response::build()
                    .status(Status::Forbidden)
                    .sized_body(error.len(), Cursor::new(error))
                    .header(ContentType::new("text", "html"))
                    .ok()
            }
            _ => {
                let error = format!(
                    "<html><body><h3>Unknown exception</h3><code>{:?}</code></body></html>",
                    self
                );
                Response::build()
                    .status(Status::InternalServerError)
                    .sized_body(error.len(), Cursor::new(error))
                    .header(ContentType::new("text", "html"))
                    .ok()
            }
        }
    }
}
