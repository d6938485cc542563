use powerzcst_rs::fetcher::SlotState;
use powerzcst_rs::model::{UNKNOWN_DEVICE, UNKNOWN_ROOM};
use powerzcst_rs::sensor::Metric;
use prometheus::{Encoder, GaugeVec, TextEncoder};
use std::collections::HashMap;

lazy_static! {
    static ref ACCOUNT_GAUGES: HashMap<Metric, GaugeVec> = Metric::ALL
        .iter()
        .map(|metric| {
            let help = match metric.unit().symbol() {
                Some(symbol) => format!("{} (in {})", metric.label(), symbol),
                None => String::from(metric.label()),
            };
            let gauge = register_gauge_vec!(
                opts!(metric.key(), help.as_str()),
                &["account", "device", "room"],
            )
            .unwrap();
            (*metric, gauge)
        })
        .collect();
}

/// Mirror one published slot state into the per-account gauges. Metrics the
/// state carries no value for keep whatever was exported last.
pub fn publish(account: &str, state: &SlotState) {
    let device = state
        .snapshot
        .as_ref()
        .map(|s| s.device_name.as_str())
        .unwrap_or(UNKNOWN_DEVICE);
    let room = state
        .snapshot
        .as_ref()
        .map(|s| s.room_name.as_str())
        .unwrap_or(UNKNOWN_ROOM);

    for metric in Metric::ALL.iter() {
        if let Some(value) = metric.value(state) {
            ACCOUNT_GAUGES[metric]
                .with_label_values(&[account, device, room])
                .set(value);
        }
    }
}

/// Read metrics from the exporter registry in prometheus text format.
pub async fn read() -> Result<String, powerzcst_rs::Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).or(Err(powerzcst_rs::Error::FormatError))
}
