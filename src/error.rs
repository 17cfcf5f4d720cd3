//! # エラー定義
//!
//! リスナーモードの検証エラーと、設定読み込み時のエラーを提供します。
//! プロトコル解決 (`resolve`) 自体は失敗しないため、ここに実行時エラーはありません。

use std::fmt;
use std::io;

/// 受け付けるモード文字列の一覧（診断メッセージ用）
pub const VALID_MODES: &str = "quic_only, tcp_only, default";

/// 不正なモード文字列
///
/// 設定検証時にのみ発生します。問題の値をそのまま保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidModeError {
    /// 設定に書かれていた値
    pub value: String,
}

impl InvalidModeError {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

impl fmt::Display for InvalidModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid mode: {} (must be one of: {})", self.value, VALID_MODES)
    }
}

impl std::error::Error for InvalidModeError {}

/// 設定エラー
#[derive(Debug)]
pub enum ConfigError {
    /// 設定ファイルの読み込み失敗
    Io(io::Error),
    /// TOML パースエラー
    Parse(String),
    /// 不正なモード
    InvalidMode(InvalidModeError),
    /// 未知のプロトコルタグ
    UnknownProtocol(String),
    /// 未知の欠落時ポリシー
    UnknownPolicy(String),
    /// ディレクティブブロックの構文エラー (行番号は 1 始まり)
    Directive { line: usize, message: String },
    /// 証明書・秘密鍵の読み込み失敗
    Tls(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(msg) => write!(f, "TOML parse error: {}", msg),
            Self::InvalidMode(e) => write!(f, "{}", e),
            Self::UnknownProtocol(p) => {
                write!(f, "unknown protocol: '{}', expected 'h1', 'h2', or 'h3'", p)
            }
            Self::UnknownPolicy(p) => {
                write!(f, "unknown missing-protocol policy: '{}', expected 'empty' or 'inject'", p)
            }
            Self::Directive { line, message } => write!(f, "line {}: {}", line, message),
            Self::Tls(msg) => write!(f, "TLS error: {}", msg),
        }
    }
}

// Display が内側のエラーを含むため source() は返さない
impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<InvalidModeError> for ConfigError {
    fn from(e: InvalidModeError) -> Self {
        Self::InvalidMode(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// 設定処理の結果
pub type ConfigResult<T> = Result<T, ConfigError>;
