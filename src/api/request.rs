use super::command::{self, Command};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub thing_key: String,
    pub required_values: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandRequest<'a> {
    pub command: &'a Command,
    pub params: Params,
}

/// Request body, keyed by command name: `{"<command>": {"command": ..., "params": ...}}`
pub type Envelope<'a> = HashMap<&'a Command, CommandRequest<'a>>;

/// Join `required_values` into the form expected by the API. Empty list requests every value.
pub fn required_values(required_values: &[&str]) -> String {
    if required_values.is_empty() {
        command::REQUIRED_VALUES_ALL.to_string()
    } else {
        required_values.join(command::REQUIRED_VALUES_SEP)
    }
}

pub fn envelope<'a>(command: &'a Command, thing_serial: &str, required: &[&str]) -> Envelope<'a> {
    HashMap::from([(
        command,
        CommandRequest {
            command,
            params: Params {
                thing_key: thing_serial.to_owned(),
                required_values: required_values(required),
                start: None,
                end: None,
            },
        },
    )])
}
