pub mod command;
pub mod error;
pub mod request;
pub mod response;

#[cfg(test)]
mod mock_server;

use crate::model;
use command::Command;
pub use error::Error;
use response::CommandResponse;
use serde_json::Value;

const AUTH_KEY: &str = "Authorization";
const CLIENT_AUTH_KEY: &str = "client";
const CONTENT_TYPE: &str = "application/json";

/// Inverter `thing_serial` of account `client`, talking to the public ZCS endpoint.
pub fn inverter(client: String, thing_serial: String, name: Option<String>) -> model::Inverter {
    inverter_with(model::Api::default(), client, thing_serial, name)
}

pub fn inverter_with(
    api: model::Api,
    client: String,
    thing_serial: String,
    name: Option<String>,
) -> model::Inverter {
    let name = name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| thing_serial.clone());

    model::Inverter {
        api,
        client,
        thing_serial,
        name,
    }
}

/// Map transport-level failure to Error
fn map_api_err(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::ApiError(error.to_string())
    }
}

/// Reject non-2xx HTTP responses before the body is looked at.
fn map_response_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    match response.status() {
        http::StatusCode::UNAUTHORIZED => Err(Error::AuthenticationError(
            http::StatusCode::UNAUTHORIZED.as_u16(),
        )),
        status if !status.is_success() => Err(Error::RequestError(status.as_u16())),
        _ => Ok(response),
    }
}

/// POST `command` for `inverter` and return the part of the response keyed by `command`.
async fn post(
    inverter: &model::Inverter,
    command: &Command,
    required_values: &[&str],
) -> Result<CommandResponse, Error> {
    let client = reqwest::ClientBuilder::new()
        .timeout(inverter.api.timeout)
        .build()
        .or(Err(Error::InternalError))?;

    let data = request::envelope(command, &inverter.thing_serial, required_values);

    log::debug!(
        "post to {} with client {}, data {:?}",
        inverter.api.api_url,
        inverter.client,
        data
    );

    let response_text = client
        .post(inverter.api.api_url.as_str())
        .header(AUTH_KEY, inverter.api.auth_value.as_str())
        .header(CLIENT_AUTH_KEY, inverter.client.as_str())
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .json(&data)
        .send()
        .await
        .map_err(map_api_err)
        .and_then(map_response_status)?
        .text()
        .await
        .map_err(map_api_err)?;

    log::trace!("command: {}, response_text: {}", command, response_text);

    let value = serde_json::from_str::<Value>(&response_text)
        .map_err(|e| Error::InvalidResponse(response_text.to_owned(), e.to_string()))?;

    let response = match value {
        Value::Object(mut envelope) => envelope.remove(command),
        _ => None,
    }
    .ok_or(Error::UnexpectedApiResponse)?;

    log::debug!("fetched {} {}", command, response);

    serde_json::from_value::<CommandResponse>(response).or(Err(Error::UnexpectedApiResponse))
}

/// Read realtime data of `inverter`, limited to `required_values` (all values when empty).
pub async fn realtime_data(
    inverter: &model::Inverter,
    required_values: &[&str],
) -> Result<model::DataRecord, Error> {
    post(inverter, command::REALTIME_DATA, required_values)
        .await?
        .into_record(&inverter.thing_serial)
}

/// Read alarms of `inverter`.
pub async fn alarms(inverter: &model::Inverter) -> Result<model::DataRecord, Error> {
    post(inverter, command::DEVICE_ALARM, &[])
        .await?
        .into_record(&inverter.thing_serial)
}

/// Check whether `inverter` answers a realtime data request.
///
/// HTTP errors and an offline device report `false`. Failures below HTTP (timeout, unreachable
/// endpoint, unreadable response) are still returned as errors.
pub async fn check_connection(inverter: &model::Inverter) -> Result<bool, Error> {
    match realtime_data(inverter, &[]).await {
        Ok(_) => Ok(true),
        Err(e @ Error::AuthenticationError(_))
        | Err(e @ Error::RequestError(_))
        | Err(e @ Error::DeviceOffline) => {
            log::debug!("connection check of {} failed: {}", inverter.identifier(), e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
