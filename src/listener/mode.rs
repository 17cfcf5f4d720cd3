//! リスナーモード

use std::fmt;
use std::str::FromStr;

use crate::error::InvalidModeError;

/// リスナーモード
///
/// 未設定（空文字列）は `Default` と同じ扱いです。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ListenerMode {
    /// HTTP/3 (UDP) のみ
    QuicOnly,
    /// HTTP/1.1 と HTTP/2 (TCP) のみ
    TcpOnly,
    /// サーバーのプロトコル設定をそのまま使う
    #[default]
    Default,
}

impl ListenerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ListenerMode::QuicOnly => "quic_only",
            ListenerMode::TcpOnly => "tcp_only",
            ListenerMode::Default => "default",
        }
    }

    /// 不正な値を `Default` として扱うパース
    ///
    /// 検証済みでない文字列を解決に渡す経路向け。
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for ListenerMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quic_only" => Ok(ListenerMode::QuicOnly),
            "tcp_only" => Ok(ListenerMode::TcpOnly),
            "default" | "" => Ok(ListenerMode::Default),
            other => Err(InvalidModeError::new(other)),
        }
    }
}

impl fmt::Display for ListenerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// モード文字列を検証
///
/// `quic_only` / `tcp_only` / `default` / 空文字列 のみ受け付けます。
/// 大文字小文字は区別します。
pub fn validate_mode(mode: &str) -> Result<(), InvalidModeError> {
    mode.parse::<ListenerMode>().map(|_| ())
}
