use serde_json::{Map, Value};
use std::time::Duration;

pub const API_URL: &str = "https://third.zcsazzurroportal.com:19003";
pub const AUTH_VALUE: &str = "Zcs eHWAeEq0aYO0";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Data record of a single device, as returned by the API.
pub type DataRecord = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Api {
    pub api_url: String,
    pub auth_value: String,
    pub timeout: Duration,
}

impl Default for Api {
    fn default() -> Self {
        Api {
            api_url: API_URL.to_string(),
            auth_value: AUTH_VALUE.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Single inverter bound to the account of `client`.
#[derive(Debug, Clone)]
pub struct Inverter {
    pub api: Api,
    pub client: String,
    pub thing_serial: String,
    pub name: String,
}

impl Inverter {
    pub fn identifier(&self) -> String {
        format!("{}_{}", self.client, self.thing_serial)
    }
}
