//! # listener-mode
//!
//! 設定ファイルを読み込み、リスナーごとに有効にするプロトコルを決定して
//! ログに出力します。ソケットは開きません。
//!
//! ```bash
//! listener-mode config.toml
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use ftlog::{error, info, warn};
use rustls::crypto::CryptoProvider;

use listener_mode::listener::load_tls_config;
use listener_mode::{Config, ListenerPlan, ListenerWrapper, Protocol};

fn main() -> ExitCode {
    // プロセスレベルで暗号プロバイダーをインストール（ring使用）
    let _ = CryptoProvider::install_default(rustls::crypto::ring::default_provider());

    let path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = match Config::load(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config load error ({}): {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match ftlog::Builder::new()
        .max_log_level(config.logging.level_filter())
        .try_init()
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logger init error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    config.validate().context("listener configuration rejected")?;

    let mut plans = Vec::with_capacity(config.listeners.len());
    for listener in &config.listeners {
        let provisioned = ListenerWrapper::new(listener.clone())
            .provision()
            .with_context(|| format!("failed to provision listener {}", listener.address))?;
        plans.push(provisioned.wrap(&Protocol::ALL));
    }

    if let Some(tls) = &config.tls {
        let tls_config = load_tls_config(tls).context("failed to load TLS config")?;
        for plan in plans.iter().filter(|p| p.needs_tcp()) {
            let applied = plan.apply_tls_alpn(tls_config.clone());
            info!(
                "{}: TLS ALPN = [{}]",
                plan.address,
                format_alpn(&applied.alpn_protocols)
            );
        }
    }

    for plan in &plans {
        log_plan(plan);
    }

    Ok(())
}

fn log_plan(plan: &ListenerPlan) {
    if plan.is_empty() {
        warn!(
            "{}: mode {} leaves no protocols enabled - listener skipped",
            plan.address, plan.mode
        );
        return;
    }
    info!(
        "{}: mode={}, protocols=[{}], tcp={}, udp={}",
        plan.address,
        plan.mode,
        plan.protocol_tags(),
        plan.needs_tcp(),
        plan.needs_udp()
    );
    if plan.needs_udp() {
        info!("{}: QUIC ALPN = [{}]", plan.address, format_alpn(&plan.quic_alpn()));
    }
}

fn format_alpn(ids: &[Vec<u8>]) -> String {
    ids.iter()
        .map(|id| String::from_utf8_lossy(id).into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}
