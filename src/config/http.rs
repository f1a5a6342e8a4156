use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug, Deserialize)]
pub struct Http {
    /// **Environment variables**:
    /// - `AUTHUSER_HTTP_ADDRESS`
    #[serde(default = "Http::default_address")]
    pub address: IpAddr,
    /// **Environment variables**:
    /// - `AUTHUSER_HTTP_PORT`
    #[serde(default = "Http::default_port")]
    pub port: u16,
    /// Amount of HTTP workers. Defaults to the number of CPUs.
    ///
    /// **Environment variables**:
    /// - `AUTHUSER_HTTP_WORKERS`
    pub workers: Option<usize>,
}

impl Http {
    const fn default_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    const fn default_port() -> u16 {
        8087
    }
}

impl Default for Http {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
            workers: None,
        }
    }
}
