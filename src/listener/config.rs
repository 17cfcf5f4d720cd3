//! リスナー設定
//!
//! `config.toml` の構造と読み込み処理。
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [[listeners]]
//! address = "0.0.0.0:443"
//! mode = "quic_only"
//! protocols = ["h1", "h2", "h3"]
//! on_missing = "empty"
//! ```

use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use ftlog::LevelFilter;
use rustls::ServerConfig;
use rustls_pemfile::{certs, private_key};
use serde::Deserialize;

use super::mode::validate_mode;
use super::resolver::MissingProtocolPolicy;
use crate::error::{ConfigError, ConfigResult};
use crate::protocol::Protocol;

/// デフォルト値関数
fn default_address() -> String { "0.0.0.0:443".to_string() }
fn default_log_level() -> String { "info".to_string() }

/// 1 リスナー分の設定
///
/// `mode` は検証前の生の文字列のまま保持します。
/// 不正な値の診断メッセージに元の表記を出すためです。
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ListenerConfig {
    /// リスナーアドレス
    ///
    /// デフォルト: "0.0.0.0:443"
    #[serde(default = "default_address")]
    pub address: String,

    /// リスナーモード
    ///
    /// - `"quic_only"`: HTTP/3 (UDP) のみ
    /// - `"tcp_only"`: HTTP/1.1 と HTTP/2 (TCP) のみ
    /// - `"default"` または未設定: サーバーのプロトコル設定に従う
    #[serde(default)]
    pub mode: String,

    /// 候補プロトコル
    ///
    /// 未設定の場合はサーバー側のプロトコルリストを使う
    #[serde(default)]
    pub protocols: Option<Vec<Protocol>>,

    /// 制限モードで何も残らない場合の扱い
    ///
    /// デフォルト: "empty"
    #[serde(default)]
    pub on_missing: MissingProtocolPolicy,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            mode: String::new(),
            protocols: None,
            on_missing: MissingProtocolPolicy::default(),
        }
    }
}

impl ListenerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        validate_mode(&self.mode)?;
        Ok(())
    }
}

/// ログ設定
#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// 最大ログレベル (off / error / warn / info / debug / trace)
    ///
    /// デフォルト: "info"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl LoggingConfig {
    /// 認識できないレベルは `Info`
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// TLS 設定
#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct TlsConfigSection {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// 設定ファイル全体
///
/// 未知のキーはパースエラー
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub listeners: Vec<ListenerConfig>,
    #[serde(default)]
    pub tls: Option<TlsConfigSection>,
}

impl Config {
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let config_str = fs::read_to_string(path)?;
        Self::from_toml_str(&config_str)
    }

    /// 全リスナーを検証（最初のエラーで中断）
    pub fn validate(&self) -> ConfigResult<()> {
        for listener in &self.listeners {
            listener.validate()?;
        }
        Ok(())
    }
}

/// PEM ファイルから rustls の ServerConfig を構築
///
/// ALPN は未設定のまま返します。
pub fn load_tls_config(tls: &TlsConfigSection) -> ConfigResult<ServerConfig> {
    let cert_file = fs::File::open(&tls.cert_path)?;
    let key_file = fs::File::open(&tls.key_path)?;

    let mut cert_reader = BufReader::new(cert_file);
    let cert_chain = certs(&mut cert_reader).collect::<Result<Vec<_>, io::Error>>()?;

    let mut key_reader = BufReader::new(key_file);
    let key = private_key(&mut key_reader)?
        .ok_or_else(|| ConfigError::Tls("private key not found".to_string()))?;

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .map_err(|e| ConfigError::Tls(e.to_string()))
}
