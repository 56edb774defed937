//! JSON-lines request protocol.
//!
//! One request object per input line, one response object per output line:
//!
//! ```text
//! {"op":"check_permission","wallet":"W1"}
//! {"ok":true,"result":{"Limit":5000}}
//! ```

use sentinel_core::{AuthorityKey, SignatureBytes, WalletId};
use sentinel_crypto::{RiskAssertion, SignatureVerifier};
use sentinel_ledger::{Clock, Sentinel};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use tracing::debug;

/// Failure kind for lines that do not parse as a request.
pub const BAD_REQUEST: &str = "BadRequest";

const DEFAULT_EVENTS_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Initialize {
        pubkey: AuthorityKey,
    },
    SubmitRisk {
        payload: RiskAssertion,
        signature: SignatureBytes,
    },
    CheckPermission {
        wallet: WalletId,
    },
    GetRisk {
        wallet: WalletId,
    },
    IsFrozen {
        wallet: WalletId,
    },
    GetOraclePubkey,
    Events {
        #[serde(default = "default_from")]
        from: u64,
        #[serde(default = "default_limit")]
        limit: usize,
    },
}

fn default_from() -> u64 {
    1
}

fn default_limit() -> usize {
    DEFAULT_EVENTS_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
            message: None,
        }
    }

    pub fn failure(kind: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(kind.to_string()),
            message: Some(message.into()),
        }
    }
}

/// Execute one parsed request.
pub fn dispatch<V: SignatureVerifier, C: Clock>(
    sentinel: &mut Sentinel<V, C>,
    request: Request,
) -> sentinel_ledger::Result<Value> {
    let result = match request {
        Request::Initialize { pubkey } => {
            sentinel.initialize(pubkey)?;
            json!({ "key_id": pubkey.key_id() })
        }
        Request::SubmitRisk { payload, signature } => {
            json!(sentinel.submit_risk(&payload, &signature)?)
        }
        Request::CheckPermission { wallet } => json!(sentinel.check_permission(&wallet)),
        Request::GetRisk { wallet } => json!(sentinel.get_risk(&wallet)),
        Request::IsFrozen { wallet } => json!(sentinel.is_frozen(&wallet)),
        Request::GetOraclePubkey => json!(sentinel.get_oracle_pubkey()?),
        Request::Events { from, limit } => json!(sentinel.events_since(from, limit)),
    };

    Ok(result)
}

/// Parse and execute one input line.
pub fn handle_line<V: SignatureVerifier, C: Clock>(
    sentinel: &mut Sentinel<V, C>,
    line: &str,
) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Unparseable request line");
            return Response::failure(BAD_REQUEST, e.to_string());
        }
    };

    match dispatch(sentinel, request) {
        Ok(result) => Response::success(result),
        Err(e) => Response::failure(e.kind(), e.to_string()),
    }
}

/// Serve requests until `input` is exhausted. Blank lines are skipped.
///
/// Lines that are not valid UTF-8 are answered with `BadRequest`; only I/O
/// errors end the loop.
pub fn serve<V, C, R, W>(
    sentinel: &mut Sentinel<V, C>,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    V: SignatureVerifier,
    C: Clock,
    R: BufRead,
    W: Write,
{
    for raw in input.split(b'\n') {
        let raw = raw?;
        let response = match std::str::from_utf8(&raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(sentinel, line),
            Err(e) => {
                debug!(error = %e, "Request line is not valid UTF-8");
                Response::failure(BAD_REQUEST, format!("request line is not valid UTF-8: {}", e))
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }

    Ok(())
}
