//! テスト用共通ヘルパーモジュール
//!
//! 統合テストで使用する証明書生成・設定ファイル書き出し・
//! メモリ上での TLS ハンドシェイクを提供します。

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ClientConnection, RootCertStore, ServerConfig, ServerConnection};

/// 生成したテスト用証明書
pub struct TestCerts {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub cert_der: CertificateDer<'static>,
}

/// テスト用の自己署名TLS証明書を生成
pub fn generate_test_certs(output_dir: &Path) -> std::io::Result<TestCerts> {
    use rcgen::{generate_simple_self_signed, CertifiedKey};

    let subject_alt_names = vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
    ];

    let CertifiedKey { cert, key_pair } = generate_simple_self_signed(subject_alt_names)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let cert_path = output_dir.join("test_cert.pem");
    let key_path = output_dir.join("test_key.pem");

    std::fs::write(&cert_path, cert.pem())?;
    std::fs::write(&key_path, key_pair.serialize_pem())?;

    Ok(TestCerts {
        cert_path,
        key_path,
        cert_der: cert.der().clone(),
    })
}

/// 設定ファイルを書き出してパスを返す
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("test_config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// 片方向に TLS レコードを流す
fn pump_client_to_server(client: &mut ClientConnection, server: &mut ServerConnection) {
    let mut buf = Vec::new();
    while client.wants_write() {
        client.write_tls(&mut buf).unwrap();
    }
    let mut rd = &buf[..];
    while !rd.is_empty() {
        server.read_tls(&mut rd).unwrap();
        server.process_new_packets().unwrap();
    }
}

fn pump_server_to_client(server: &mut ServerConnection, client: &mut ClientConnection) {
    let mut buf = Vec::new();
    while server.wants_write() {
        server.write_tls(&mut buf).unwrap();
    }
    let mut rd = &buf[..];
    while !rd.is_empty() {
        client.read_tls(&mut rd).unwrap();
        client.process_new_packets().unwrap();
    }
}

/// メモリ上でハンドシェイクし、サーバーが選んだ ALPN を返す
pub fn negotiate_alpn(
    server_config: ServerConfig,
    trusted: CertificateDer<'static>,
    client_alpn: &[&[u8]],
) -> Option<Vec<u8>> {
    let mut roots = RootCertStore::empty();
    roots.add(trusted).unwrap();

    let mut client_config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    client_config.alpn_protocols = client_alpn.iter().map(|p| p.to_vec()).collect();

    let server_name = ServerName::try_from("localhost").unwrap();
    let mut client = ClientConnection::new(Arc::new(client_config), server_name).unwrap();
    let mut server = ServerConnection::new(Arc::new(server_config)).unwrap();

    for _ in 0..10 {
        if !client.is_handshaking() && !server.is_handshaking() {
            break;
        }
        pump_client_to_server(&mut client, &mut server);
        pump_server_to_client(&mut server, &mut client);
    }
    assert!(!client.is_handshaking() && !server.is_handshaking(), "handshake did not complete");

    server.alpn_protocol().map(|p| p.to_vec())
}
