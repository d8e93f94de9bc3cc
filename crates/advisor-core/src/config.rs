use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
/// Large enough for a few camera photos sent as base64 `data:` URLs.
pub const DEFAULT_HTTP_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Typed configuration, read once at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub admin_id: i64,

    // AI provider
    pub ai_api_url: String,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_timeout: Duration,
    pub ai_response_language: String,

    // HTTP
    pub http_bind_addr: SocketAddr,
    pub http_max_body_bytes: usize,
    pub cors_allowed_origins: Vec<String>,

    // Decoded photos are staged here until sent.
    pub temp_dir: PathBuf,
}

impl Config {
    /// Load from the process environment, after applying `.env` if present.
    pub fn load() -> Result<Self> {
        // Existing env vars win over `.env` entries.
        let _ = dotenvy::dotenv();
        let cfg = Self::from_lookup(|key| env::var(key).ok())?;
        std::fs::create_dir_all(&cfg.temp_dir)?;
        Ok(cfg)
    }

    /// Build a config from an arbitrary key lookup (env, map in tests, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let telegram_bot_token = get("BOT_TOKEN")
            .or_else(|| get("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| {
                Error::Config("BOT_TOKEN environment variable is required".to_string())
            })?;

        let admin_raw = get("ADMIN_ID").ok_or_else(|| {
            Error::Config("ADMIN_ID environment variable is required".to_string())
        })?;
        let admin_id = admin_raw.trim().parse::<i64>().map_err(|_| {
            Error::Config(format!("ADMIN_ID must be an integer, got {admin_raw:?}"))
        })?;

        let ai_api_url = get("AI_API_URL").unwrap_or_else(|| DEFAULT_AI_API_URL.to_string());
        // Absence of a key is a supported mode: every request goes to the admin.
        let ai_api_key = get("AI_API_KEY");
        let ai_model = get("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string());
        let ai_timeout =
            Duration::from_secs(parse_or("AI_TIMEOUT_SECS", get("AI_TIMEOUT_SECS"), 20)?);
        let ai_response_language =
            get("AI_RESPONSE_LANGUAGE").unwrap_or_else(|| "Persian".to_string());

        let bind_raw = get("HTTP_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let http_bind_addr = bind_raw.trim().parse::<SocketAddr>().map_err(|e| {
            Error::Config(format!("HTTP_BIND_ADDR is not a socket address ({bind_raw}): {e}"))
        })?;
        let http_max_body_bytes = match get("HTTP_MAX_BODY_BYTES") {
            None => DEFAULT_HTTP_MAX_BODY_BYTES,
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::Config(format!(
                    "HTTP_MAX_BODY_BYTES must be a non-negative integer, got {raw:?}"
                ))
            })?,
        };
        let cors_allowed_origins = parse_csv(get("CORS_ALLOWED_ORIGINS"));

        let temp_dir = get("TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("advisor-photos"));

        Ok(Self {
            telegram_bot_token,
            admin_id,
            ai_api_url,
            ai_api_key,
            ai_model,
            ai_timeout,
            ai_response_language,
            http_bind_addr,
            http_max_body_bytes,
            cors_allowed_origins,
            temp_dir,
        })
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_api_key.is_some()
    }
}

fn parse_or(key: &str, raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {s:?}"))),
    }
}

fn parse_csv(v: Option<String>) -> Vec<String> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn minimal_env_uses_defaults() {
        let cfg = Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("ADMIN_ID", "42")])).unwrap();
        assert_eq!(cfg.admin_id, 42);
        assert_eq!(cfg.ai_api_url, DEFAULT_AI_API_URL);
        assert_eq!(cfg.ai_model, DEFAULT_AI_MODEL);
        assert_eq!(cfg.ai_timeout, Duration::from_secs(20));
        assert_eq!(cfg.http_bind_addr.port(), 8000);
        assert_eq!(cfg.http_max_body_bytes, 10 * 1024 * 1024);
        assert!(cfg.cors_allowed_origins.is_empty());
        assert!(!cfg.ai_enabled());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("ADMIN_ID", "1"),
            ("AI_API_KEY", "   "),
        ]))
        .unwrap();
        assert!(cfg.ai_api_key.is_none());
    }

    #[test]
    fn telegram_token_alias_and_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "alias"),
            ("ADMIN_ID", " 7 "),
            ("AI_API_KEY", "sk-test"),
            ("AI_TIMEOUT_SECS", "5"),
            ("HTTP_BIND_ADDR", "127.0.0.1:9000"),
            ("HTTP_MAX_BODY_BYTES", "20971520"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
        ]))
        .unwrap();
        assert_eq!(cfg.telegram_bot_token, "alias");
        assert_eq!(cfg.admin_id, 7);
        assert!(cfg.ai_enabled());
        assert_eq!(cfg.ai_timeout, Duration::from_secs(5));
        assert_eq!(cfg.http_bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(cfg.http_max_body_bytes, 20 * 1024 * 1024);
        assert_eq!(cfg.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn missing_or_invalid_required_values_fail() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("ADMIN_ID", "1")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("BOT_TOKEN", "t")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("ADMIN_ID", "admin")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[
                ("BOT_TOKEN", "t"),
                ("ADMIN_ID", "1"),
                ("AI_TIMEOUT_SECS", "soon"),
            ])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[
                ("BOT_TOKEN", "t"),
                ("ADMIN_ID", "1"),
                ("HTTP_MAX_BODY_BYTES", "10MB"),
            ])),
            Err(Error::Config(_))
        ));
    }
}
