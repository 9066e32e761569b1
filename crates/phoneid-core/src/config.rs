//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. phoneid-gateway.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Default config file looked up by [`Config::load`]
pub const DEFAULT_CONFIG_FILE: &str = "phoneid-gateway.toml";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL the OAuth client was registered against
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

/// Google OAuth provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client ID
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret
    #[serde(default, skip_serializing)]
    pub client_secret: String,

    /// Scopes every access token must carry
    #[serde(default = "default_required_scopes")]
    pub required_scopes: Vec<String>,

    /// Token introspection endpoint
    #[serde(default = "default_tokeninfo_url")]
    pub tokeninfo_url: String,

    /// Userinfo endpoint used to resolve claims
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            required_scopes: default_required_scopes(),
            tokeninfo_url: default_tokeninfo_url(),
            userinfo_url: default_userinfo_url(),
        }
    }
}

/// Telesign PhoneID API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelesignConfig {
    /// Customer ID (Basic auth username)
    pub customer_id: Option<String>,

    /// API key (Basic auth password)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(default = "default_telesign_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds
    #[serde(default = "default_telesign_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TelesignConfig {
    fn default() -> Self {
        Self {
            customer_id: None,
            api_key: None,
            base_url: default_telesign_base_url(),
            timeout_secs: default_telesign_timeout_secs(),
        }
    }
}

impl TelesignConfig {
    /// Whether any credential half was set through configuration
    pub fn has_configured_credentials(&self) -> bool {
        self.customer_id.is_some() || self.api_key.is_some()
    }
}

/// Main configuration for phoneid-gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub google: GoogleConfig,

    #[serde(default)]
    pub telesign: TelesignConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_public_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_required_scopes() -> Vec<String> {
    vec![
        "openid".to_string(),
        "https://www.googleapis.com/auth/userinfo.email".to_string(),
    ]
}

fn default_tokeninfo_url() -> String {
    "https://oauth2.googleapis.com/tokeninfo".to_string()
}

fn default_userinfo_url() -> String {
    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
}

fn default_telesign_base_url() -> String {
    "https://rest-ww.telesign.com".to_string()
}

fn default_telesign_timeout_secs() -> u64 {
    30
}

/// Read an environment variable, treating empty values as unset
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換され、
    /// その後に環境変数による上書きが適用されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_env_overrides();

        Ok(cfg)
    }

    /// Parse a TOML document after `${VAR}` expansion, without env overrides
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded = Self::expand_env_vars(content);
        let mut cfg: Config = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        // 展開後に空になった資格情報は未設定として扱う
        cfg.telesign.customer_id = cfg.telesign.customer_id.filter(|v| !v.is_empty());
        cfg.telesign.api_key = cfg.telesign.api_key.filter(|v| !v.is_empty());

        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./phoneid-gateway.toml` があればそれを使い、
    /// 見つからない場合は環境変数のみから構築します。
    pub fn load() -> crate::Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Ok(Self::from_env())
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        if let Some(host) = non_empty_env("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty_env("SERVER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = non_empty_env("SERVER_URL") {
            self.server.public_url = url;
        }

        if let Some(id) = non_empty_env("GOOGLE_CLIENT_ID") {
            self.google.client_id = id;
        }
        if let Some(secret) = non_empty_env("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = secret;
        }

        if let Some(id) = non_empty_env("TELESIGN_ID") {
            self.telesign.customer_id = Some(id);
        }
        if let Some(token) = non_empty_env("TELESIGN_TOKEN") {
            self.telesign.api_key = Some(token);
        }
        if let Some(url) = non_empty_env("TELESIGN_BASE_URL") {
            self.telesign.base_url = url;
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    /// Check the settings the OAuth provider needs at startup
    ///
    /// Telesign credentials are intentionally not checked here; a missing
    /// pair is reported per invocation by the PhoneID tool.
    pub fn validate(&self) -> crate::Result<()> {
        if self.google.client_id.is_empty() {
            return Err(Error::Config("GOOGLE_CLIENT_ID not set".to_string()));
        }
        if self.google.client_secret.is_empty() {
            return Err(Error::Config("GOOGLE_CLIENT_SECRET not set".to_string()));
        }
        if !self.server.public_url.starts_with("http://")
            && !self.server.public_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "SERVER_URL must be an http(s) URL: {}",
                self.server.public_url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.public_url, "http://localhost:8000");
    }

    #[test]
    fn test_google_config_default_scopes() {
        let config = GoogleConfig::default();
        assert_eq!(
            config.required_scopes,
            vec!["openid", "https://www.googleapis.com/auth/userinfo.email"]
        );
        assert!(config.client_id.is_empty());
    }

    #[test]
    fn test_telesign_config_default() {
        let config = TelesignConfig::default();
        assert_eq!(config.base_url, "https://rest-ww.telesign.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.has_configured_credentials());
    }

    #[test]
    fn test_expand_env_vars() {
        unsafe {
            std::env::set_var("PHONEID_GATEWAY_TEST_VAR", "test_value");
        }

        let result = Config::expand_env_vars("prefix_${PHONEID_GATEWAY_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");

        let result = Config::expand_env_vars("prefix_${PHONEID_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("PHONEID_GATEWAY_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_no_braces() {
        assert_eq!(Config::expand_env_vars("no_vars_here"), "no_vars_here");
        assert_eq!(Config::expand_env_vars("$HOME"), "$HOME");
    }

    #[test]
    fn test_expand_env_vars_empty_name() {
        assert_eq!(Config::expand_env_vars("${}_content"), "_content");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000
public_url = "https://mcp.example.com"

[google]
client_id = "client.apps.googleusercontent.com"
client_secret = "secret"
required_scopes = ["openid"]

[telesign]
customer_id = "customer"
api_key = "key"
base_url = "https://telesign.test"
timeout_secs = 10
"#;

        let config = Config::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.public_url, "https://mcp.example.com");
        assert_eq!(config.google.client_id, "client.apps.googleusercontent.com");
        assert_eq!(config.google.client_secret, "secret");
        assert_eq!(config.google.required_scopes, vec!["openid"]);
        assert_eq!(
            config.google.tokeninfo_url,
            "https://oauth2.googleapis.com/tokeninfo"
        );
        assert_eq!(config.telesign.customer_id.as_deref(), Some("customer"));
        assert_eq!(config.telesign.api_key.as_deref(), Some("key"));
        assert_eq!(config.telesign.base_url, "https://telesign.test");
        assert_eq!(config.telesign.timeout_secs, 10);
        assert!(config.telesign.has_configured_credentials());
    }

    #[test]
    fn test_toml_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.telesign.timeout_secs, 30);
        assert!(config.telesign.customer_id.is_none());
    }

    #[test]
    fn test_toml_unset_credential_expands_to_absent() {
        let toml_content = r#"
[telesign]
customer_id = "${PHONEID_UNSET_CUSTOMER_ID}"
"#;
        let config = Config::from_toml_str(toml_content).unwrap();
        assert!(config.telesign.customer_id.is_none());
    }

    #[test]
    fn test_toml_parse_error() {
        let result = Config::from_toml_str("[server\nport = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8123").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        // SERVER_PORT が設定されていれば環境変数が優先される
        if std::env::var("SERVER_PORT").is_err() {
            assert_eq!(config.server.port, 8123);
        }
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = Config::from_toml_file("/nonexistent/phoneid-gateway.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_requires_client_id() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_missing_telesign_credentials() {
        let mut config = Config::default();
        config.google.client_id = "client".to_string();
        config.google.client_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_public_url() {
        let mut config = Config::default();
        config.google.client_id = "client".to_string();
        config.google.client_secret = "secret".to_string();
        config.server.public_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());
    }
}
