use serde::{Deserialize, Serialize};
use std::env;

use crate::wheel::Lang;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    /// 动画额外整圈数下限
    #[serde(default = "default_min_extra_turns")]
    pub min_extra_turns: u32,
    /// 动画额外整圈数上限
    #[serde(default = "default_max_extra_turns")]
    pub max_extra_turns: u32,
    /// 待兑现奖品保留时长 (小时)
    #[serde(default = "default_pending_ttl_hours")]
    pub pending_ttl_hours: i64,
    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    /// 过期待兑现奖品清理间隔 (秒)
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

fn default_min_extra_turns() -> u32 {
    8
}

fn default_max_extra_turns() -> u32 {
    12
}

fn default_pending_ttl_hours() -> i64 {
    14 * 24
}

fn default_session_cookie_name() -> String {
    "wheel_session".to_string()
}

fn default_language() -> String {
    "ar".to_string()
}

fn default_purge_interval_secs() -> u64 {
    3600
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            min_extra_turns: default_min_extra_turns(),
            max_extra_turns: default_max_extra_turns(),
            pending_ttl_hours: default_pending_ttl_hours(),
            session_cookie_name: default_session_cookie_name(),
            default_language: default_language(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

impl WheelConfig {
    pub fn extra_turns(&self) -> std::ops::RangeInclusive<u32> {
        self.min_extra_turns..=self.max_extra_turns.max(self.min_extra_turns)
    }

    pub fn fallback_lang(&self) -> Lang {
        Lang::from_code(&self.default_language).unwrap_or(Lang::Ar)
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and config.toml was not found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                    },
                    wheel: WheelConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Unable to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }

        // Wheel
        if let Ok(v) = env::var("WHEEL_MIN_EXTRA_TURNS")
            && let Ok(n) = v.parse()
        {
            config.wheel.min_extra_turns = n;
        }
        if let Ok(v) = env::var("WHEEL_MAX_EXTRA_TURNS")
            && let Ok(n) = v.parse()
        {
            config.wheel.max_extra_turns = n;
        }
        if let Ok(v) = env::var("WHEEL_PENDING_TTL_HOURS")
            && let Ok(n) = v.parse()
        {
            config.wheel.pending_ttl_hours = n;
        }
        if let Ok(v) = env::var("WHEEL_SESSION_COOKIE_NAME") {
            config.wheel.session_cookie_name = v;
        }
        if let Ok(v) = env::var("WHEEL_DEFAULT_LANGUAGE") {
            config.wheel.default_language = v;
        }
        if let Ok(v) = env::var("WHEEL_PURGE_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.wheel.purge_interval_secs = n;
        }

        Ok(config)
    }
}
