type KWh = f64;

pub const DEFAULT_ENDPOINT: &str = "https://api.zcst.ltdsa.cn";

/* Placeholders used when the balance detail omits the device metadata. */
pub const UNKNOWN_DEVICE: &str = "unknown device";
pub const UNKNOWN_ROOM: &str = "unknown room";

/// Credentials of one electricity account, fixed once registered.
#[derive(Debug, Clone)]
pub struct Api {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

/// Session established by `api::login`. The session cookie lives inside the
/// client's cookie store and is dropped with it at the end of the cycle.
#[derive(Debug)]
pub struct LoggedInApi {
    pub endpoint: String,
    pub client: reqwest::Client,
}

/// Balance detail as returned by the API. Fields the response omits stay
/// `None` instead of failing the fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub remain: Option<KWh>,
    pub balance: Option<f64>,
    pub average_usage: Option<KWh>,
    pub expected_remain: Option<f64>,
    pub daily_usage: Option<KWh>,
    pub device_name: Option<String>,
    pub room_name: Option<String>,
}

/// One complete fetch result, published wholesale after a successful cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub remaining_power: Option<KWh>,
    pub balance: Option<f64>,
    pub average_usage: Option<KWh>,
    pub expected_remain_days: Option<f64>,
    pub daily_usage: Option<KWh>,
    pub device_name: String,
    pub room_name: String,
}

impl From<Balance> for Snapshot {
    fn from(balance: Balance) -> Snapshot {
        Snapshot {
            remaining_power: balance.remain,
            balance: balance.balance,
            average_usage: balance.average_usage,
            expected_remain_days: balance.expected_remain,
            daily_usage: balance.daily_usage,
            device_name: balance
                .device_name
                .unwrap_or_else(|| String::from(UNKNOWN_DEVICE)),
            room_name: balance
                .room_name
                .unwrap_or_else(|| String::from(UNKNOWN_ROOM)),
        }
    }
}
