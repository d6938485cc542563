use crate::fetcher::SlotState;
use serde::Serialize;

/// Unit of measurement attached to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Energy,
    Currency,
    Days,
    None,
}

impl Unit {
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Unit::Energy => Some("kWh"),
            Unit::Currency => Some("CNY"),
            Unit::Days => Some("days"),
            Unit::None => None,
        }
    }
}

/// The fixed set of metrics published for every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    RemainingPower,
    Balance,
    AverageUsage,
    ExpectedRemainDays,
    DailyUsage,
    DeviceStatus,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::RemainingPower,
        Metric::Balance,
        Metric::AverageUsage,
        Metric::ExpectedRemainDays,
        Metric::DailyUsage,
        Metric::DeviceStatus,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::RemainingPower => "remaining_power",
            Metric::Balance => "balance",
            Metric::AverageUsage => "average_usage",
            Metric::ExpectedRemainDays => "expected_remain_days",
            Metric::DailyUsage => "daily_usage",
            Metric::DeviceStatus => "device_status",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::RemainingPower => "Remaining Power",
            Metric::Balance => "Balance",
            Metric::AverageUsage => "Average Usage",
            Metric::ExpectedRemainDays => "Expected Remaining Days",
            Metric::DailyUsage => "Daily Usage",
            Metric::DeviceStatus => "Device Status",
        }
    }

    pub fn label_zh(&self) -> &'static str {
        match self {
            Metric::RemainingPower => "剩余电量",
            Metric::Balance => "账户余额",
            Metric::AverageUsage => "平均用电量",
            Metric::ExpectedRemainDays => "预计可用天数",
            Metric::DailyUsage => "日电量",
            Metric::DeviceStatus => "设备状态",
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Metric::RemainingPower | Metric::AverageUsage | Metric::DailyUsage => Unit::Energy,
            Metric::Balance => Unit::Currency,
            Metric::ExpectedRemainDays => Unit::Days,
            Metric::DeviceStatus => Unit::None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Metric::RemainingPower | Metric::DailyUsage => "mdi:lightning-bolt",
            Metric::Balance => "mdi:wallet",
            Metric::AverageUsage => "mdi:chart-line",
            Metric::ExpectedRemainDays => "mdi:calendar-clock",
            Metric::DeviceStatus => "mdi:lan-connect",
        }
    }

    /// Metric value derived from a published slot state. `DeviceStatus`
    /// reflects the freshness flag; the others read the snapshot.
    pub fn value(&self, state: &SlotState) -> Option<f64> {
        if let Metric::DeviceStatus = self {
            return Some(if state.fresh { 1.0 } else { 0.0 });
        }

        let snapshot = state.snapshot.as_ref()?;
        match self {
            Metric::RemainingPower => snapshot.remaining_power,
            Metric::Balance => snapshot.balance,
            Metric::AverageUsage => snapshot.average_usage,
            Metric::ExpectedRemainDays => snapshot.expected_remain_days,
            Metric::DailyUsage => snapshot.daily_usage,
            Metric::DeviceStatus => None,
        }
    }
}

/// Display metadata for one metric, as presented to host platforms.
#[derive(Debug, Serialize)]
pub struct SensorMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub label_zh: &'static str,
    pub unit: Option<&'static str>,
    pub icon: &'static str,
}

/// Catalog of all published metrics.
pub fn catalog() -> Vec<SensorMeta> {
    Metric::ALL
        .iter()
        .map(|metric| SensorMeta {
            key: metric.key(),
            label: metric.label(),
            label_zh: metric.label_zh(),
            unit: metric.unit().symbol(),
            icon: metric.icon(),
        })
        .collect()
}
