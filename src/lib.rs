//! # listener-mode
//!
//! HTTP サーバーのリスナー層向けに、モード指定 (QUIC-only / TCP-only / default)
//! から有効にする HTTP/1.1・HTTP/2・HTTP/3 を決定するライブラリ。
//!
//! ## 特徴
//!
//! - **純粋な解決関数**: `resolve()` は入力の部分列を返すだけで、状態も I/O も持たない
//! - **設定検証**: 不正なモードはリスナー生成前に `InvalidModeError` で拒否
//! - **設定形式**: TOML (`Config`) と行指向ディレクティブ (`parse_directives`)
//! - **ALPN**: 解決結果から TCP / QUIC それぞれの ALPN リストを生成
//!
//! ## 非対応
//!
//! ソケット単位での QUIC-only / TCP-only の強制は行いません。
//! `ListenerPlan` を受け取ったホストがリスナーを生成します。
//!
//! ```
//! use listener_mode::{ListenerMode, Protocol, resolve};
//!
//! let all = [Protocol::Http1_1, Protocol::Http2, Protocol::Http3];
//! assert_eq!(resolve(ListenerMode::QuicOnly, &all), vec![Protocol::Http3]);
//! ```

pub mod error;
pub mod listener;
pub mod protocol;

pub use error::{ConfigError, ConfigResult, InvalidModeError};
pub use listener::{
    Config, ListenerConfig, ListenerMode, ListenerPlan, ListenerWrapper, MissingProtocolPolicy,
    ProtocolResolver, ProvisionedWrapper, parse_directives, resolve, resolve_lenient, validate_mode,
};
pub use protocol::{Protocol, Transport};
