pub mod login {
    use serde::Deserialize;

    /// `GET /login/` envelope. `code == 200` means the credentials were
    /// accepted and the response carries the session cookie.
    #[derive(Deserialize)]
    pub struct Login {
        pub code: i64,
        pub msg: Option<String>,
    }
}

pub mod balance {
    use serde::Deserialize;

    #[derive(Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct Data {
        pub remain: Option<f64>,
        pub balance: Option<f64>,
        pub average_usage: Option<f64>,
        pub expected_remain: Option<f64>,
        pub daily_usage: Option<f64>,
        pub device_name: Option<String>,
        pub room_name: Option<String>,
    }

    /// `GET /electric/balance/?detail=1` envelope.
    #[derive(Deserialize)]
    pub struct Balance {
        pub code: i64,
        pub msg: Option<String>,
        pub data: Option<Data>,
    }
}
