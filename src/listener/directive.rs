//! # ディレクティブブロックのパーサ
//!
//! 行指向の設定ブロックから `ListenerConfig` を組み立てます。
//!
//! ```text
//! quic_only {
//!     mode quic_only
//!     protocols h1 h2 h3
//!     on_missing empty
//! }
//! ```
//!
//! - 空行と `#` 以降のコメントは無視
//! - 外側の `quic_only { ... }` は省略可能
//! - `mode` は引数をちょうど 1 つ取る（`""` は未設定扱い）

use super::config::ListenerConfig;
use super::mode::validate_mode;
use super::resolver::MissingProtocolPolicy;
use crate::error::{ConfigError, ConfigResult};

/// ブロック名
pub const BLOCK_NAME: &str = "quic_only";

fn directive_error(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Directive { line, message: message.into() }
}

/// 行をトークンに分割
///
/// ダブルクォートで囲まれた部分は 1 トークン（空文字列も可）。
fn tokenize(line_no: usize, line: &str) -> ConfigResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '#' {
            break;
        }
        if c == '"' {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                token.push(c);
            }
            if !closed {
                return Err(directive_error(line_no, "unterminated quoted string"));
            }
            tokens.push(token);
            continue;
        }
        let mut token = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() || c == '#' {
                break;
            }
            token.push(c);
            chars.next();
        }
        tokens.push(token);
    }

    Ok(tokens)
}

/// ディレクティブブロックをパース
///
/// モード値はここで検証され、不正な値は `ConfigError::InvalidMode` になります。
pub fn parse_directives(input: &str) -> ConfigResult<ListenerConfig> {
    let mut config = ListenerConfig::default();
    let mut seen_mode = false;
    let mut seen_on_missing = false;
    // None: ブロック外, Some(false): ブロック内, Some(true): ブロック終了済み
    let mut block: Option<bool> = None;
    let mut last_line = 0;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let tokens = tokenize(line_no, raw)?;
        let Some((keyword, args)) = tokens.split_first() else {
            continue;
        };

        if block == Some(true) {
            return Err(directive_error(line_no, "unexpected content after closing '}'"));
        }

        match keyword.as_str() {
            BLOCK_NAME if block.is_none() && !seen_mode && config.protocols.is_none() && !seen_on_missing => {
                if args.len() != 1 || args[0] != "{" {
                    return Err(directive_error(line_no, format!("expected '{} {{'", BLOCK_NAME)));
                }
                block = Some(false);
            }
            "}" => {
                if block != Some(false) || !args.is_empty() {
                    return Err(directive_error(line_no, "unmatched '}'"));
                }
                block = Some(true);
            }
            "mode" => {
                if seen_mode {
                    return Err(directive_error(line_no, "duplicate 'mode' directive"));
                }
                if args.len() != 1 {
                    return Err(directive_error(
                        line_no,
                        format!("'mode' takes exactly one argument, got {}", args.len()),
                    ));
                }
                validate_mode(&args[0])?;
                config.mode = args[0].clone();
                seen_mode = true;
            }
            "protocols" => {
                if config.protocols.is_some() {
                    return Err(directive_error(line_no, "duplicate 'protocols' directive"));
                }
                if args.is_empty() {
                    return Err(directive_error(line_no, "'protocols' requires at least one argument"));
                }
                let protocols = args
                    .iter()
                    .map(|a| a.parse())
                    .collect::<ConfigResult<Vec<_>>>()?;
                config.protocols = Some(protocols);
            }
            "on_missing" => {
                if seen_on_missing {
                    return Err(directive_error(line_no, "duplicate 'on_missing' directive"));
                }
                if args.len() != 1 {
                    return Err(directive_error(line_no, "'on_missing' takes exactly one argument"));
                }
                config.on_missing = MissingProtocolPolicy::parse(&args[0])?;
                seen_on_missing = true;
            }
            other => {
                return Err(directive_error(line_no, format!("unknown directive '{}'", other)));
            }
        }
    }

    if block == Some(false) {
        return Err(directive_error(last_line, "missing closing '}'"));
    }

    Ok(config)
}
