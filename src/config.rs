use crate::models::clamp_stress;
use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: [u8; 4],
    pub port: u16,
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
    /// Initial position of every day's stress slider.
    pub default_stress: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: [0, 0, 0, 0],
            port: 8080,
            session_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
            default_stress: 1,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparsable keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup_parse(&lookup, "HOST")
                .map(|ip: std::net::Ipv4Addr| ip.octets())
                .unwrap_or(defaults.host),
            port: lookup_parse(&lookup, "PORT").unwrap_or(defaults.port),
            session_ttl: lookup_parse(&lookup, "SESSION_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),
            sweep_interval: lookup_parse(&lookup, "SWEEP_INTERVAL_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            default_stress: lookup_parse(&lookup, "DEFAULT_STRESS")
                .map(clamp_stress)
                .unwrap_or(defaults.default_stress),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

fn lookup_parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring invalid {key}={value:?}");
            None
        }
    }
}
