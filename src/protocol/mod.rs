//! # プロトコルモジュール
//!
//! HTTP/1.1, HTTP/2, HTTP/3 の識別子と ALPN の扱いを提供します。

pub mod negotiation;

pub use negotiation::{Protocol, Transport, alpn_protocols, configure_alpn, parse_protocol_list};
