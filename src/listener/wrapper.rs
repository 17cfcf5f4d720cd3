//! # リスナーラッパー
//!
//! ホスト側リスナー層の拡張ポイント（検証 → プロビジョニング → ラップ）に
//! 対応するライフサイクルを提供します。
//!
//! ## 設計ポイント
//!
//! - **明示的な登録**: グローバルなモジュール登録は行わない。
//!   ホストのエントリポイントがリスナーごとに `ListenerWrapper` を生成する
//! - **明示的な依存渡し**: サーバーのプロトコルリストは `wrap()` の引数で受け取る
//! - **強制はしない**: ソケットの生成・accept の制御はホストの責務。
//!   ここでは開くべきトランスポートと ALPN を `ListenerPlan` として返すだけ

use ftlog::{debug, info};
use rustls::ServerConfig;

use super::config::ListenerConfig;
use super::mode::ListenerMode;
use super::resolver::ProtocolResolver;
use crate::error::ConfigResult;
use crate::protocol::{Protocol, Transport, alpn_protocols, configure_alpn};

/// 未プロビジョニングのリスナーラッパー
#[derive(Clone, Debug)]
pub struct ListenerWrapper {
    config: ListenerConfig,
}

impl ListenerWrapper {
    pub fn new(config: ListenerConfig) -> Self {
        Self { config }
    }

    /// モードを検証
    pub fn validate(&self) -> ConfigResult<()> {
        self.config.validate()
    }

    /// 検証してから解決器を組み立てる
    ///
    /// 不正なモードの場合はこのリスナーのプロビジョニングを中断します。
    pub fn provision(self) -> ConfigResult<ProvisionedWrapper> {
        self.validate()?;
        let mode: ListenerMode = self.config.mode.parse()?;
        let resolver = ProtocolResolver::new(mode).with_policy(self.config.on_missing);

        info!(
            "Provisioning listener wrapper: address={}, mode={}, on_missing={}",
            self.config.address,
            mode,
            self.config.on_missing.as_str()
        );

        Ok(ProvisionedWrapper {
            address: self.config.address,
            protocols: self.config.protocols,
            resolver,
        })
    }
}

/// プロビジョニング済みのリスナーラッパー
#[derive(Clone, Debug)]
pub struct ProvisionedWrapper {
    address: String,
    protocols: Option<Vec<Protocol>>,
    resolver: ProtocolResolver,
}

impl ProvisionedWrapper {
    #[inline]
    pub fn resolver(&self) -> ProtocolResolver {
        self.resolver
    }

    /// リスナーに適用するプロトコルを決定
    ///
    /// ラッパー自身に `protocols` が設定されていればサーバー側のリストより優先します。
    pub fn wrap(&self, server_protocols: &[Protocol]) -> ListenerPlan {
        let mode = self.resolver.mode();
        info!("Listener wrapper applied: address={}, mode={}", self.address, mode);

        match mode {
            ListenerMode::QuicOnly => info!("QUIC-only mode enabled - will only allow HTTP/3 traffic"),
            ListenerMode::TcpOnly => {
                info!("TCP-only mode enabled - will only allow HTTP/1.1 and HTTP/2 traffic")
            }
            ListenerMode::Default => info!("Default mode enabled - allowing all protocols"),
        }

        let candidates = self.protocols.as_deref().unwrap_or(server_protocols);
        let protocols = self.resolver.resolve(candidates);

        debug!(
            "Resolved protocols for {}: [{}] -> [{}]",
            self.address,
            join_tags(candidates),
            join_tags(&protocols)
        );

        ListenerPlan { address: self.address.clone(), mode, protocols }
    }
}

fn join_tags(protocols: &[Protocol]) -> String {
    protocols.iter().map(|p| p.tag()).collect::<Vec<_>>().join(", ")
}

/// 1 リスナー分の解決結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerPlan {
    pub address: String,
    pub mode: ListenerMode,
    /// 有効にするプロトコル（解決結果の順序のまま）
    pub protocols: Vec<Protocol>,
}

impl ListenerPlan {
    /// TCP リスナーが必要か (h1 / h2)
    #[inline]
    pub fn needs_tcp(&self) -> bool {
        self.protocols.iter().any(|p| p.transport() == Transport::Tcp)
    }

    /// UDP (QUIC) リスナーが必要か (h3)
    #[inline]
    pub fn needs_udp(&self) -> bool {
        self.protocols.iter().any(|p| p.transport() == Transport::Udp)
    }

    /// 開くべきリスナーが無い
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    pub fn tcp_alpn(&self) -> Vec<Vec<u8>> {
        alpn_protocols(&self.protocols, Transport::Tcp)
    }

    pub fn quic_alpn(&self) -> Vec<Vec<u8>> {
        alpn_protocols(&self.protocols, Transport::Udp)
    }

    /// TCP 側の TLS 設定に ALPN を適用
    pub fn apply_tls_alpn(&self, config: ServerConfig) -> ServerConfig {
        configure_alpn(config, &self.protocols)
    }

    pub fn protocol_tags(&self) -> String {
        join_tags(&self.protocols)
    }
}
