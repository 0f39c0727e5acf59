//! Response error classification
//!
//! Peatio embeds failures in the body as `{"error": {"code": N, "message": "..."}}`,
//! or occasionally as a bare `{"error": "..."}` string.

use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Authentication or permission failure
pub const CODE_UNAUTHORIZED: i64 = 2001;

/// Order is already cancelled
pub const CODE_CANCELED: i64 = 2003;

/// Fail if the response carries an `error` object, pass it through otherwise
pub fn check_response(response: &Value) -> ExchangeResult<()> {
    let Some(error) = response.as_object().and_then(|obj| obj.get("error")) else {
        return Ok(());
    };

    let (code, message) = match error {
        Value::String(msg) => (None, msg.clone()),
        _ => {
            let message = match error.get("message") {
                Some(Value::String(msg)) => msg.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            (error.get("code").and_then(code_of), message)
        }
    };

    tracing::warn!(
        exchange = "peatio",
        code = ?code,
        message = %message,
        "Exchange reported an error"
    );

    Err(match code {
        Some(CODE_UNAUTHORIZED) => ExchangeError::Unauthorized(message),
        Some(CODE_CANCELED) => ExchangeError::Canceled(message),
        _ => ExchangeError::Api { code, message },
    })
}

/// Codes arrive as numbers, occasionally as numeric strings
fn code_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
