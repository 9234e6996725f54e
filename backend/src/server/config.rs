//! Server settings loaded via OrthoConfig and the resolved server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use backend::inbound::http::state::PublicUrls;
use backend::outbound::persistence::{DEFAULT_MAX_CONNECTIONS, DbPool};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "http://localhost:8080/media";

/// Invalid or missing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database URL missing: set FOODGRAM_DATABASE_URL or --database-url")]
    MissingDatabaseUrl,
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid {key} {value:?}: {source}")]
    Url {
        key: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Settings layered from CLI flags, `FOODGRAM_*` environment variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Frontend base; short links redirect to recipe pages beneath it.
    pub site_url: Option<String>,
    /// Public API base; short links are rendered beneath it.
    pub public_url: Option<String>,
    /// Directory uploaded images are written to.
    pub media_root: Option<PathBuf>,
    /// Public base URL the media root is served from.
    pub media_url: Option<String>,
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::Url {
        key,
        value: value.to_owned(),
        source,
    })
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// The database URL; there is no default.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    pub fn public_urls(&self) -> Result<PublicUrls, SettingsError> {
        let public_url = parse_url(
            "public_url",
            self.public_url.as_deref().unwrap_or(DEFAULT_PUBLIC_URL),
        )?;
        let site_url = parse_url(
            "site_url",
            self.site_url.as_deref().unwrap_or(DEFAULT_SITE_URL),
        )?;
        Ok(PublicUrls::new(public_url, site_url))
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn media_url(&self) -> Result<String, SettingsError> {
        let value = self.media_url.as_deref().unwrap_or(DEFAULT_MEDIA_URL);
        parse_url("media_url", value)?;
        Ok(value.to_owned())
    }
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) urls: PublicUrls,
    pub(crate) media_root: PathBuf,
    pub(crate) media_url: String,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, urls: PublicUrls) -> Self {
        Self {
            bind_addr,
            db_pool,
            urls,
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            media_url: DEFAULT_MEDIA_URL.to_owned(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Store uploads beneath `root`, served from `url`.
    #[must_use]
    pub fn with_media(mut self, root: PathBuf, url: String) -> Self {
        self.media_root = root;
        self.media_url = url;
        self
    }

    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings layering and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 7] = [
        "FOODGRAM_BIND_ADDR",
        "FOODGRAM_DATABASE_URL",
        "FOODGRAM_DB_MAX_CONNECTIONS",
        "FOODGRAM_SITE_URL",
        "FOODGRAM_PUBLIC_URL",
        "FOODGRAM_MEDIA_ROOT",
        "FOODGRAM_MEDIA_URL",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("foodgram-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_except_database_url() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("constant")
        );
        assert!(matches!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        ));
        assert_eq!(settings.db_max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.media_root(), PathBuf::from(DEFAULT_MEDIA_ROOT));
        assert_eq!(settings.media_url().expect("default media url"), DEFAULT_MEDIA_URL);
        let urls = settings.public_urls().expect("default urls");
        assert_eq!(urls.site_url.as_str(), "http://localhost:3000/");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(KEYS.map(|key| {
            let value = match key {
                "FOODGRAM_BIND_ADDR" => "127.0.0.1:9000",
                "FOODGRAM_DATABASE_URL" => "postgres://foodgram@db/foodgram",
                "FOODGRAM_DB_MAX_CONNECTIONS" => "4",
                "FOODGRAM_SITE_URL" => "https://foodgram.example",
                "FOODGRAM_PUBLIC_URL" => "https://api.foodgram.example",
                "FOODGRAM_MEDIA_ROOT" => "/srv/media",
                _ => "https://cdn.foodgram.example/media",
            };
            (key, Some(value.to_owned()))
        }));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(
            settings.database_url().expect("database url"),
            "postgres://foodgram@db/foodgram"
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.media_root(), PathBuf::from("/srv/media"));
        let urls = settings.public_urls().expect("urls");
        assert_eq!(urls.public_url.as_str(), "https://api.foodgram.example/");
    }

    #[rstest]
    #[case("FOODGRAM_BIND_ADDR", "not-an-address")]
    #[case("FOODGRAM_SITE_URL", "no scheme")]
    fn malformed_values_are_reported(#[case] key: &str, #[case] value: &str) {
        let _guard = lock_env(KEYS.map(|candidate| {
            (
                candidate,
                (candidate == key).then(|| value.to_owned()),
            )
        }));

        let settings = load_from_empty_args();
        let failed = settings.bind_addr().is_err() || settings.public_urls().is_err();
        assert!(failed, "{key}={value} should be rejected");
    }

    #[rstest]
    fn blank_database_url_counts_as_missing() {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: Some("   ".into()),
            db_max_connections: None,
            site_url: None,
            public_url: None,
            media_root: None,
            media_url: None,
        };
        assert!(matches!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        ));
    }
}
