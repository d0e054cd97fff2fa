#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use config::Config;
use rocket::{Build, Rocket, State};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use zcs_azzurro_rs::{api, model};

mod metrics;

const DEFAULT_INTERVAL: i64 = 60;

#[derive(Clone, serde::Deserialize)]
pub struct ZcsConfig {
    client: String,
    thing_serial: String,
    name: Option<String>,
    /// Comma separated list of realtime values to export, all of them when unset.
    required_values: Option<String>,
    api_url: String,
    timeout: u64,
    interval: u64,
}

/// Structure containing state for API handlers.
pub struct StateData {
    inverter: model::Inverter,
    required_values: Vec<String>,
    interval: u64,
    /// Timestamp of last successful metric collection via `metrics::collect()`
    timestamp: Mutex<Option<Instant>>,
}

impl StateData {
    /// Updates `timestamp` to `now()`.
    fn touch(&self) {
        if let Ok(mut ts) = self.timestamp.lock() {
            *ts = Some(Instant::now());
        } else {
            log::trace!("Unable to lock timestamp mutex, will refresh again")
        }
    }

    /// Checks whether `interval_seconds` elapsed since last `touch()`
    fn interval_elapsed(&self, interval_secs: u64) -> bool {
        let elapsed_opt = self
            .timestamp
            .lock()
            .ok()
            .and_then(|a| a.map(|b| b.elapsed().as_secs()));

        if let Some(elapsed) = elapsed_opt {
            elapsed > interval_secs
        } else {
            /* If there is None timestamp/elapsed, always return true to trigger action */
            true
        }
    }

    fn required_values(&self) -> Vec<&str> {
        self.required_values.iter().map(String::as_str).collect()
    }
}

pub fn read_settings() -> Result<ZcsConfig, config::ConfigError> {
    let mut settings = Config::default();
    settings
        .merge(config::Environment::with_prefix("ZCS"))?
        .set_default("api_url", model::API_URL)?
        .set_default("timeout", model::REQUEST_TIMEOUT.as_secs() as i64)?
        .set_default("interval", DEFAULT_INTERVAL)?;

    settings.try_into()
}

fn parse_required_values(required_values: Option<&str>) -> Vec<String> {
    required_values
        .map(|values| {
            values
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[get("/metrics")]
async fn metrics_route(state: &State<StateData>) -> Result<String, api::Error> {
    if state.interval_elapsed(state.interval) {
        metrics::collect(&state.inverter, &state.required_values()).await?;
        state.touch();
    } else {
        log::info!("interval time not yet elapsed since last run; returning cached result")
    }
    metrics::read().await
}

#[get("/realtime")]
async fn realtime_route(state: &State<StateData>) -> Result<String, api::Error> {
    let record = api::realtime_data(&state.inverter, &state.required_values()).await?;

    serde_json::to_string_pretty(&record).or(Err(api::Error::FormatError))
}

#[get("/alarms")]
async fn alarms_route(state: &State<StateData>) -> Result<String, api::Error> {
    let record = api::alarms(&state.inverter).await?;

    serde_json::to_string_pretty(&record).or(Err(api::Error::FormatError))
}

#[launch]
fn rocket() -> Rocket<Build> {
    env_logger::init();

    let settings = read_settings().expect("Configuration error");
    let api = model::Api {
        api_url: settings.api_url,
        timeout: Duration::from_secs(settings.timeout),
        ..model::Api::default()
    };
    let inverter = api::inverter_with(api, settings.client, settings.thing_serial, settings.name);

    log::info!(
        "exporting inverter {} ({})",
        inverter.identifier(),
        inverter.name
    );

    let state = StateData {
        inverter,
        required_values: parse_required_values(settings.required_values.as_deref()),
        interval: settings.interval,
        timestamp: Mutex::new(None),
    };

    rocket::build()
        .manage(state)
        .mount("/", routes![metrics_route, realtime_route, alarms_route])
}
