use prometheus::{Encoder, GaugeVec, TextEncoder};
use serde_json::Value;
use zcs_azzurro_rs::api;
use zcs_azzurro_rs::model::{DataRecord, Inverter};

lazy_static! {
    static ref REALTIME_VALUE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("zcs_realtime_value", "realtime value reported by inverter",),
        &["inverter", "field"],
    )
    .unwrap();
    static ref INVERTER_ONLINE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "zcs_inverter_online",
            "whether inverter returned data on last collection",
        ),
        &["inverter", "name"],
    )
    .unwrap();
}

/// Numeric value of `value`, if it can be exported as a gauge. Booleans map to 0/1.
fn gauge_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Feed realtime `record` of `inverter` to Prometheus metrics.
fn process_realtime_data(record: &DataRecord, inverter: &Inverter) {
    let identifier = inverter.identifier();

    for (field, value) in record {
        match gauge_value(value) {
            Some(v) => REALTIME_VALUE_GAUGE
                .with_label_values(&[identifier.as_str(), field.as_str()])
                .set(v),
            None => log::trace!("skipping field {} of {}: {}", field, identifier, value),
        }
    }
}

/// Feed outcome of a realtime data request of `inverter` to Prometheus metrics.
///
/// Offline inverter is not an error here. Any failure marks the inverter as not online.
fn process_collection(
    inverter: &Inverter,
    result: Result<DataRecord, api::Error>,
) -> Result<(), api::Error> {
    let identifier = inverter.identifier();
    let online =
        INVERTER_ONLINE_GAUGE.with_label_values(&[identifier.as_str(), inverter.name.as_str()]);

    match result {
        Ok(record) => {
            process_realtime_data(&record, inverter);
            online.set(1.0);
            Ok(())
        }
        Err(api::Error::DeviceOffline) => {
            log::warn!("inverter {} is offline", identifier);
            online.set(0.0);
            Ok(())
        }
        Err(e) => {
            log::warn!("collecting realtime data of {} failed: {}", identifier, e);
            online.set(0.0);
            Err(e)
        }
    }
}

/// Collect realtime data of `inverter`, updating Prometheus exporter registry.
pub async fn collect(inverter: &Inverter, required_values: &[&str]) -> Result<(), api::Error> {
    process_collection(
        inverter,
        api::realtime_data(inverter, required_values).await,
    )
}

/// Read metrics from Prometheus exporter registry.
pub async fn read() -> Result<String, api::Error> {
    // Gather the metrics.
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .or(Err(api::Error::FormatError))?;
    String::from_utf8(buffer).or(Err(api::Error::FormatError))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn online(inverter: &Inverter) -> f64 {
        INVERTER_ONLINE_GAUGE
            .with_label_values(&[inverter.identifier().as_str(), inverter.name.as_str()])
            .get()
    }

    #[test]
    fn failed_collection_marks_inverter_not_online() {
        let inverter = api::inverter("acme".to_string(), "SN-FAILING".to_string(), None);

        let record = json!({"powerGenerating": 2053}).as_object().unwrap().to_owned();
        assert_eq!(Ok(()), process_collection(&inverter, Ok(record)));
        assert_eq!(1.0, online(&inverter));
        assert_eq!(
            2053.0,
            REALTIME_VALUE_GAUGE
                .with_label_values(&["acme_SN-FAILING", "powerGenerating"])
                .get()
        );

        assert_eq!(
            Err(api::Error::Timeout),
            process_collection(&inverter, Err(api::Error::Timeout))
        );
        assert_eq!(0.0, online(&inverter));
    }

    #[test]
    fn offline_collection_is_not_an_error() {
        let inverter = api::inverter("acme".to_string(), "SN-OFFLINE".to_string(), None);

        assert_eq!(
            Ok(()),
            process_collection(&inverter, Err(api::Error::DeviceOffline))
        );
        assert_eq!(0.0, online(&inverter));

        assert_eq!(
            Err(api::Error::AuthenticationError(401)),
            process_collection(&inverter, Err(api::Error::AuthenticationError(401)))
        );
        assert_eq!(0.0, online(&inverter));
    }

    #[test]
    fn numeric_values() {
        assert_eq!(Some(2053.0), gauge_value(&json!(2053)));
        assert_eq!(Some(31.5), gauge_value(&json!(31.5)));
        assert_eq!(Some(1.0), gauge_value(&json!(true)));
        assert_eq!(Some(0.0), gauge_value(&json!(false)));
    }

    #[test]
    fn non_numeric_values() {
        assert_eq!(None, gauge_value(&json!("2023-02-14T11:32:05.000Z")));
        assert_eq!(None, gauge_value(&json!([])));
        assert_eq!(None, gauge_value(&Value::Null));
    }
}
