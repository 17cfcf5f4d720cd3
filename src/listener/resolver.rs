//! # プロトコル解決
//!
//! モードと候補プロトコル列から、リスナーで有効にするプロトコル列を求めます。
//!
//! - 入力の順序・重複はそのまま保持し、フィルタ以外の並べ替えはしない
//! - デフォルトの欠落時ポリシー (`Empty`) では入力に無いプロトコルを追加しない
//! - 副作用なし。どのスレッドからでも同時に呼び出せる

use serde::Deserialize;

use super::mode::ListenerMode;
use crate::error::ConfigError;
use crate::protocol::Protocol;

/// 制限モードで残るプロトコルが無い場合の扱い
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MissingProtocolPolicy {
    /// 空のまま返す
    #[default]
    Empty,
    /// モードが要求するプロトコルを補う
    ///
    /// QUIC-only なら `[h3]`、TCP-only なら `[h1, h2]`。
    Inject,
}

impl MissingProtocolPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MissingProtocolPolicy::Empty => "empty",
            MissingProtocolPolicy::Inject => "inject",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(MissingProtocolPolicy::Empty),
            "inject" => Ok(MissingProtocolPolicy::Inject),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for MissingProtocolPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MissingProtocolPolicy::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// モードに応じてプロトコル列をフィルタ
///
/// 入力に無いプロトコルは決して追加しません。
pub fn resolve(mode: ListenerMode, protocols: &[Protocol]) -> Vec<Protocol> {
    match mode {
        ListenerMode::QuicOnly => protocols
            .iter()
            .copied()
            .filter(|p| *p == Protocol::Http3)
            .collect(),
        ListenerMode::TcpOnly => protocols
            .iter()
            .copied()
            .filter(|p| matches!(p, Protocol::Http1_1 | Protocol::Http2))
            .collect(),
        ListenerMode::Default => protocols.to_vec(),
    }
}

/// 未検証のモード文字列で解決
///
/// 認識できない値は `default` として扱います。
pub fn resolve_lenient(raw_mode: &str, protocols: &[Protocol]) -> Vec<Protocol> {
    let mode = match raw_mode.parse::<ListenerMode>() {
        Ok(mode) => mode,
        Err(e) => {
            ftlog::warn!("{} - falling back to default", e);
            ListenerMode::Default
        }
    };
    resolve(mode, protocols)
}

/// 検証済みモードと欠落時ポリシーの組
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ProtocolResolver {
    mode: ListenerMode,
    policy: MissingProtocolPolicy,
}

impl ProtocolResolver {
    pub fn new(mode: ListenerMode) -> Self {
        Self { mode, policy: MissingProtocolPolicy::Empty }
    }

    pub fn with_policy(mut self, policy: MissingProtocolPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn mode(&self) -> ListenerMode {
        self.mode
    }

    #[inline]
    pub fn policy(&self) -> MissingProtocolPolicy {
        self.policy
    }

    pub fn resolve(&self, protocols: &[Protocol]) -> Vec<Protocol> {
        let resolved = resolve(self.mode, protocols);
        if !resolved.is_empty() || self.policy == MissingProtocolPolicy::Empty {
            return resolved;
        }
        match self.mode {
            ListenerMode::QuicOnly => vec![Protocol::Http3],
            ListenerMode::TcpOnly => vec![Protocol::Http1_1, Protocol::Http2],
            // 入力が空の場合のみここに来る
            ListenerMode::Default => resolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Protocol::{Http1_1 as H1, Http2 as H2, Http3 as H3};

    const MODES: [ListenerMode; 3] = [ListenerMode::QuicOnly, ListenerMode::TcpOnly, ListenerMode::Default];

    /// 長さ 0〜4 の全プロトコル列
    fn all_sequences() -> Vec<Vec<Protocol>> {
        let mut out = vec![Vec::new()];
        let mut frontier = vec![Vec::new()];
        for _ in 0..4 {
            let mut next = Vec::new();
            for seq in &frontier {
                for p in Protocol::ALL {
                    let mut s: Vec<Protocol> = seq.clone();
                    s.push(p);
                    next.push(s);
                }
            }
            out.extend(next.iter().cloned());
            frontier = next;
        }
        out
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(resolve(ListenerMode::QuicOnly, &[H1, H2, H3]), vec![H3]);
        assert_eq!(resolve(ListenerMode::QuicOnly, &[H1, H2]), Vec::<Protocol>::new());
        assert_eq!(resolve(ListenerMode::TcpOnly, &[H1, H2, H3]), vec![H1, H2]);
        assert_eq!(resolve(ListenerMode::TcpOnly, &[H3]), Vec::<Protocol>::new());
        assert_eq!(resolve(ListenerMode::Default, &[H1, H2, H3]), vec![H1, H2, H3]);
        assert_eq!(resolve(ListenerMode::Default, &[]), Vec::<Protocol>::new());
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        assert_eq!(resolve(ListenerMode::TcpOnly, &[H2, H3, H1, H2]), vec![H2, H1, H2]);
        assert_eq!(resolve(ListenerMode::QuicOnly, &[H3, H1, H3]), vec![H3, H3]);
    }

    #[test]
    fn test_default_is_identity() {
        for seq in all_sequences() {
            assert_eq!(resolve(ListenerMode::Default, &seq), seq);
        }
    }

    #[test]
    fn test_quic_only_keeps_exactly_h3() {
        for seq in all_sequences() {
            let out = resolve(ListenerMode::QuicOnly, &seq);
            let expected: Vec<Protocol> = seq.iter().copied().filter(|p| *p == H3).collect();
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_tcp_only_keeps_exactly_h1_h2() {
        for seq in all_sequences() {
            let out = resolve(ListenerMode::TcpOnly, &seq);
            assert!(!out.contains(&H3));
            let expected: Vec<Protocol> = seq.iter().copied().filter(|p| *p != H3).collect();
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_idempotent_for_both_policies() {
        for policy in [MissingProtocolPolicy::Empty, MissingProtocolPolicy::Inject] {
            for mode in MODES {
                let resolver = ProtocolResolver::new(mode).with_policy(policy);
                for seq in all_sequences() {
                    let once = resolver.resolve(&seq);
                    assert_eq!(resolver.resolve(&once), once, "{:?}/{:?} on {:?}", mode, policy, seq);
                }
            }
        }
    }

    #[test]
    fn test_empty_policy_never_adds() {
        for mode in MODES {
            let resolver = ProtocolResolver::new(mode);
            for seq in all_sequences() {
                assert!(resolver.resolve(&seq).iter().all(|p| seq.contains(p)));
            }
        }
    }

    #[test]
    fn test_inject_policy() {
        let quic = ProtocolResolver::new(ListenerMode::QuicOnly).with_policy(MissingProtocolPolicy::Inject);
        assert_eq!(quic.resolve(&[H1, H2]), vec![H3]);
        assert_eq!(quic.resolve(&[]), vec![H3]);
        assert_eq!(quic.resolve(&[H3, H1, H3]), vec![H3, H3]);

        let tcp = ProtocolResolver::new(ListenerMode::TcpOnly).with_policy(MissingProtocolPolicy::Inject);
        assert_eq!(tcp.resolve(&[H3]), vec![H1, H2]);
        assert_eq!(tcp.resolve(&[H2]), vec![H2]);

        let default = ProtocolResolver::new(ListenerMode::Default).with_policy(MissingProtocolPolicy::Inject);
        assert_eq!(default.resolve(&[]), Vec::<Protocol>::new());
    }

    #[test]
    fn test_resolve_lenient() {
        assert_eq!(resolve_lenient("quic_only", &[H1, H3]), vec![H3]);
        assert_eq!(resolve_lenient("", &[H1, H3]), vec![H1, H3]);
        assert_eq!(resolve_lenient("h3_only", &[H1, H3]), vec![H1, H3]);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(MissingProtocolPolicy::parse("empty").unwrap(), MissingProtocolPolicy::Empty);
        assert_eq!(MissingProtocolPolicy::parse("Inject").unwrap(), MissingProtocolPolicy::Inject);
        assert_eq!(MissingProtocolPolicy::parse("EMPTY").unwrap(), MissingProtocolPolicy::Empty);
        assert!(matches!(
            MissingProtocolPolicy::parse("force"),
            Err(ConfigError::UnknownPolicy(ref v)) if v == "force"
        ));
    }
}
