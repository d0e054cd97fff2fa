use crate::api::Error;
use crate::model::DataRecord;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct Params {
    pub value: Vec<DataRecord>,
}

/* Body of a single command, found under the command name of the response */
#[derive(Debug, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    /* Shape is only known for successful responses, decoded in `into_record` */
    #[serde(default)]
    pub params: Option<Value>,
}

impl CommandResponse {
    /// Take the data record of `thing_serial` out of `params.value[0]`.
    ///
    /// Non-true `success` means the device did not report, which is signalled with
    /// `Error::DeviceOffline` rather than an API error.
    pub fn into_record(self, thing_serial: &str) -> Result<DataRecord, Error> {
        if !self.success {
            return Err(Error::DeviceOffline);
        }

        match self
            .params
            .and_then(|params| serde_json::from_value::<Params>(params).ok())
            .and_then(|params| params.value.into_iter().next())
            .and_then(|mut devices| devices.remove(thing_serial))
        {
            Some(Value::Object(record)) => Ok(record),
            _ => Err(Error::UnexpectedApiResponse),
        }
    }
}
