//! Application configuration from environment variables.
//!
//! | Variable            | Default                        |
//! |---------------------|--------------------------------|
//! | `GBFS_BASE_URL`     | Barcelona Bicing, English feeds |
//! | `GBFS_LANGUAGE`     | `en`                           |
//! | `GBFS_TIMEOUT_SECS` | unset (client default)         |
//! | `BIND_ADDR`         | `127.0.0.1:3000`               |
//! | `MIN_BIKES`         | `5`                            |

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use crate::gbfs::GbfsConfig;

/// Default address for `serve`.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));

/// Default bike threshold for the report.
pub const DEFAULT_REPORT_MIN_BIKES: u32 = 5;

/// A variable was set to a value that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {name}: {value:?} ({reason})")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything the binary needs to run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gbfs: GbfsConfig,
    pub bind_addr: SocketAddr,
    /// Threshold for the "stations with at least N bikes" report line
    pub report_min_bikes: u32,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if it is set. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut gbfs = GbfsConfig::new();
        if let Some(url) = get("GBFS_BASE_URL") {
            gbfs = gbfs.with_base_url(url.trim());
        }
        if let Some(language) = get("GBFS_LANGUAGE") {
            gbfs = gbfs.with_language(language.trim());
        }
        if let Some(secs) = parse_var::<u64>("GBFS_TIMEOUT_SECS", get("GBFS_TIMEOUT_SECS"))? {
            gbfs = gbfs.with_timeout(secs);
        }

        let bind_addr =
            parse_var::<SocketAddr>("BIND_ADDR", get("BIND_ADDR"))?.unwrap_or(DEFAULT_BIND_ADDR);

        let report_min_bikes =
            parse_var::<u32>("MIN_BIKES", get("MIN_BIKES"))?.unwrap_or(DEFAULT_REPORT_MIN_BIKES);

        Ok(Self {
            gbfs,
            bind_addr,
            report_min_bikes,
        })
    }
}

fn parse_var<T>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.gbfs.base_url, crate::gbfs::DEFAULT_BASE_URL);
        assert_eq!(config.gbfs.language, "en");
        assert_eq!(config.gbfs.timeout_secs, None);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.report_min_bikes, DEFAULT_REPORT_MIN_BIKES);
    }

    #[test]
    fn reads_all_variables() {
        let config = from_pairs(&[
            ("GBFS_BASE_URL", "http://localhost:9000/gbfs/es/"),
            ("GBFS_LANGUAGE", "es"),
            ("GBFS_TIMEOUT_SECS", "15"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("MIN_BIKES", " 3 "),
        ])
        .unwrap();

        assert_eq!(config.gbfs.base_url, "http://localhost:9000/gbfs/es");
        assert_eq!(config.gbfs.language, "es");
        assert_eq!(config.gbfs.timeout_secs, Some(15));
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.report_min_bikes, 3);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = from_pairs(&[("GBFS_TIMEOUT_SECS", ""), ("MIN_BIKES", "  ")]).unwrap();
        assert_eq!(config.gbfs.timeout_secs, None);
        assert_eq!(config.report_min_bikes, DEFAULT_REPORT_MIN_BIKES);
    }

    #[test]
    fn rejects_unparseable_values() {
        let err = from_pairs(&[("MIN_BIKES", "-1")]).unwrap_err();
        assert_eq!(err.name, "MIN_BIKES");
        assert_eq!(err.value, "-1");

        let err = from_pairs(&[("BIND_ADDR", "localhost")]).unwrap_err();
        assert_eq!(err.name, "BIND_ADDR");
        assert!(err.to_string().starts_with("invalid value for BIND_ADDR: \"localhost\""));

        let err = from_pairs(&[("GBFS_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(err.name, "GBFS_TIMEOUT_SECS");
    }
}
