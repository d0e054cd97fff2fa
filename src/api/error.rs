use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}: Authentication Error")]
    AuthenticationError(u16),
    #[error("Request error: {0}")]
    RequestError(u16),
    #[error("Device request did not succeed")]
    DeviceOffline,
    #[error("Request timed out")]
    Timeout,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("invalid API response ({1}): {0}")]
    InvalidResponse(String, String),
    #[error("unexpected API response")]
    UnexpectedApiResponse,
    #[error("unable to format output")]
    FormatError,
    #[error("internal error")]
    InternalError,
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, error) = match self {
            Error::AuthenticationError(code) => (
                Status::Forbidden,
                format!("<html><body><h3>403 Forbidden</h3>Downstream API refused credentials with status <code>{}</code></body></html>", code),
            ),
            Error::DeviceOffline => (
                Status::ServiceUnavailable,
                "<html><body><h3>503 Service Unavailable</h3>Inverter is offline</body></html>".to_string(),
            ),
            Error::Timeout => (
                Status::GatewayTimeout,
                "<html><body><h3>504 Gateway Timeout</h3>Downstream API did not answer in time</body></html>".to_string(),
            ),
            _ => (
                Status::InternalServerError,
                format!(
                    "<html><body><h3>Unknown exception</h3><code>{:?}</code></body></html>",
                    self
                ),
            ),
        };

        Response::build()
            .status(status)
            .sized_body(error.len(), Cursor::new(error))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}
