//! # リスナーモードモジュール
//!
//! QUIC-only / TCP-only / default のモード指定に従い、
//! リスナーで有効にする HTTP プロトコルを決定します。
//!
//! ## 構成
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  ListenerWrapper                         │
//! │  ├─ ListenerConfig (TOML / directive)    │← モード・候補プロトコル
//! │  ├─ ProtocolResolver                     │← 純粋なフィルタ
//! │  └─ ListenerPlan                         │← TCP/UDP と ALPN
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## 使用例
//!
//! ```toml
//! [[listeners]]
//! address = "0.0.0.0:443"
//! mode = "quic_only"
//! ```

mod config;
mod directive;
mod mode;
mod resolver;
mod wrapper;

pub use config::{Config, ListenerConfig, LoggingConfig, TlsConfigSection, load_tls_config};
pub use directive::{BLOCK_NAME, parse_directives};
pub use mode::{ListenerMode, validate_mode};
pub use resolver::{MissingProtocolPolicy, ProtocolResolver, resolve, resolve_lenient};
pub use wrapper::{ListenerPlan, ListenerWrapper, ProvisionedWrapper};
