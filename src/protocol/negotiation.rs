//! # プロトコル定義と ALPN
//!
//! リスナーが扱う HTTP プロトコル (h1 / h2 / h3) と、
//! それぞれのトランスポート・ALPN 識別子を定義します。
//!
//! ## サポートするプロトコル
//!
//! - `h1`: HTTP/1.1 (TCP, ALPN `http/1.1`)
//! - `h2`: HTTP/2 (TCP, ALPN `h2`)
//! - `h3`: HTTP/3 (UDP/QUIC, ALPN `h3`)

use std::fmt;
use std::str::FromStr;

use rustls::ServerConfig;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// HTTP プロトコル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// HTTP/1.1
    Http1_1,
    /// HTTP/2
    Http2,
    /// HTTP/3
    Http3,
}

/// プロトコルが載るトランスポート
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Udp,
}

impl Protocol {
    /// サーバーのデフォルトプロトコルリスト
    pub const ALL: [Protocol; 3] = [Protocol::Http1_1, Protocol::Http2, Protocol::Http3];

    /// 設定で使う短いタグ
    pub fn tag(self) -> &'static str {
        match self {
            Protocol::Http1_1 => "h1",
            Protocol::Http2 => "h2",
            Protocol::Http3 => "h3",
        }
    }

    #[inline]
    pub fn transport(self) -> Transport {
        match self {
            Protocol::Http1_1 | Protocol::Http2 => Transport::Tcp,
            Protocol::Http3 => Transport::Udp,
        }
    }

    /// ALPN プロトコル識別子
    #[inline]
    pub fn alpn_id(self) -> &'static [u8] {
        match self {
            Protocol::Http1_1 => b"http/1.1",
            Protocol::Http2 => b"h2",
            Protocol::Http3 => b"h3",
        }
    }

    /// ALPN での優先順位（小さいほど優先）
    fn alpn_rank(self) -> u8 {
        match self {
            Protocol::Http3 => 0,
            Protocol::Http2 => 1,
            Protocol::Http1_1 => 2,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http1_1 => write!(f, "HTTP/1.1"),
            Protocol::Http2 => write!(f, "HTTP/2"),
            Protocol::Http3 => write!(f, "HTTP/3"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h1" => Ok(Protocol::Http1_1),
            "h2" => Ok(Protocol::Http2),
            "h3" => Ok(Protocol::Http3),
            _ => Err(ConfigError::UnknownProtocol(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Protocol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// タグのリストをパース
///
/// 最初の未知のタグでエラーを返します。
pub fn parse_protocol_list<S: AsRef<str>>(tags: &[S]) -> ConfigResult<Vec<Protocol>> {
    tags.iter().map(|t| t.as_ref().parse()).collect()
}

/// 指定トランスポートの ALPN リストを生成
///
/// 重複を除き、優先順位 (h3 > h2 > http/1.1) で並べます。
/// サーバー側 ALPN は自身のリストの先頭から選ぶため、順序が意味を持ちます。
pub fn alpn_protocols(protocols: &[Protocol], transport: Transport) -> Vec<Vec<u8>> {
    let mut selected: Vec<Protocol> = Vec::with_capacity(protocols.len());
    for &p in protocols {
        if p.transport() == transport && !selected.contains(&p) {
            selected.push(p);
        }
    }
    selected.sort_by_key(|p| p.alpn_rank());
    selected.into_iter().map(|p| p.alpn_id().to_vec()).collect()
}

/// rustls ServerConfig に TCP 側の ALPN を設定
///
/// # Arguments
///
/// * `config` - rustls ServerConfig
/// * `protocols` - 解決済みのプロトコル集合
///
/// # Returns
///
/// ALPN が設定された ServerConfig（TCP プロトコルが無い場合は空リスト）
pub fn configure_alpn(mut config: ServerConfig, protocols: &[Protocol]) -> ServerConfig {
    config.alpn_protocols = alpn_protocols(protocols, Transport::Tcp);
    config
}
