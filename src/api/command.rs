pub type Command = str;

pub const REALTIME_DATA: &Command = "realtimeData";
pub const DEVICE_ALARM: &Command = "deviceAlarm";
// pub const HISTORIC_DATA: &Command = "historicData";

pub const REQUIRED_VALUES_ALL: &str = "*";
pub const REQUIRED_VALUES_SEP: &str = ",";
