use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub variable: Option<String>,
    pub timeout_secs: Option<u64>,
    /// "auto" | "fixed" | "coordinates"
    pub timezone_mode: Option<String>,
    /// IANA zone name, used when timezone_mode = "fixed"
    pub timezone: Option<String>,
}

/// Default site shown when no query parameters are supplied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    pub provider: Option<ProviderConfig>,
    /// Parameter schema profile: "basic" or "full"
    pub schema: Option<String>,
    pub site: Option<SiteConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from SOLGEN_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SOLGEN_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let cfg = if Path::new(&path).exists() {
            let s = fs::read_to_string(&path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
    }

    /// Forecast provider endpoint (default: the public Open-Meteo API)
    pub fn provider_base_url(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.base_url.clone())
            .unwrap_or_else(|| "https://api.open-meteo.com/v1/forecast".to_string())
    }

    /// Requested hourly weather variable (default direct_radiation)
    pub fn weather_variable(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.variable.clone())
            .unwrap_or_else(|| "direct_radiation".to_string())
    }

    /// Provider request timeout in seconds (default 5)
    pub fn fetch_timeout_secs(&self) -> u64 {
        self.provider
            .as_ref()
            .and_then(|p| p.timeout_secs)
            .unwrap_or(5)
    }

    /// Timezone resolution mode (default "auto")
    pub fn timezone_mode(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.timezone_mode.clone())
            .unwrap_or_else(|| "auto".to_string())
    }

    /// Fixed IANA zone name, if one is configured
    pub fn fixed_timezone(&self) -> Option<String> {
        self.provider.as_ref().and_then(|p| p.timezone.clone())
    }

    /// Parameter schema profile (default "full")
    pub fn schema_profile(&self) -> String {
        self.schema.clone().unwrap_or_else(|| "full".to_string())
    }

    pub fn default_latitude(&self) -> f64 {
        self.site
            .as_ref()
            .and_then(|s| s.latitude)
            .unwrap_or(4.624335)
    }

    pub fn default_longitude(&self) -> f64 {
        self.site
            .as_ref()
            .and_then(|s| s.longitude)
            .unwrap_or(-74.063644)
    }

    pub fn default_area(&self) -> f64 {
        self.site.as_ref().and_then(|s| s.area).unwrap_or(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_is_8080() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.http_bind(), "0.0.0.0:8080");
    }

    #[test]
    fn defaults_cover_the_pipeline() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.weather_variable(), "direct_radiation");
        assert_eq!(cfg.fetch_timeout_secs(), 5);
        assert_eq!(cfg.timezone_mode(), "auto");
        assert_eq!(cfg.schema_profile(), "full");
        assert_eq!(cfg.default_area(), 100.0);
    }

    #[test]
    fn parses_toml_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            schema = "basic"

            [server]
            bind = "127.0.0.1:9090"

            [provider]
            variable = "direct_normal_irradiance"
            timezone_mode = "fixed"
            timezone = "America/Bogota"

            [site]
            latitude = 6.2442
            longitude = -75.5812
            area = 250.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.http_bind(), "127.0.0.1:9090");
        assert_eq!(cfg.weather_variable(), "direct_normal_irradiance");
        assert_eq!(cfg.timezone_mode(), "fixed");
        assert_eq!(cfg.fixed_timezone().as_deref(), Some("America/Bogota"));
        assert_eq!(cfg.schema_profile(), "basic");
        assert_eq!(cfg.default_latitude(), 6.2442);
    }
}
