//! Response handling shared by every transport.
//!
//! Non-2xx bodies are mined for a human-readable message: the analysis
//! service answers `{"detail": "..."}`, the storage service answers
//! `{"error": {"message": "..."}}`, and some gateways answer `{"message": "..."}`.

use contrato_core::{SchemaError, Service, TransportError};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Map a reqwest send/read failure onto the transport taxonomy.
pub fn request_error(service: Service, err: reqwest::Error) -> TransportError {
    if err.is_connect() {
        TransportError::Unreachable {
            service,
            reason: err.to_string(),
        }
    } else if err.is_timeout() {
        TransportError::Network {
            service,
            reason: format!("Request to the {} timed out", service),
        }
    } else {
        TransportError::Network {
            service,
            reason: err.to_string(),
        }
    }
}

/// Extract the server-supplied message from an error body, if any.
pub fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    let message = match &value {
        Value::Object(map) => match (map.get("detail"), map.get("error"), map.get("message")) {
            (Some(Value::String(detail)), _, _) => Some(detail.clone()),
            // FastAPI validation errors: [{"loc": [...], "msg": "...", ...}]
            (Some(Value::Array(items)), _, _) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string),
            (_, Some(Value::Object(error)), _) => error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            (_, Some(Value::String(error)), _) => Some(error.clone()),
            (_, _, Some(Value::String(message))) => Some(message.clone()),
            _ => None,
        },
        _ => None,
    };

    message.filter(|m| !m.trim().is_empty())
}

/// Check the status, then parse the body as `T`.
pub async fn read_json<T: DeserializeOwned>(
    service: Service,
    response: Response,
) -> Result<T, TransportError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| request_error(service, e))?;

    if !status.is_success() {
        let server_message = server_message(&body);
        tracing::warn!(
            service = %service,
            status = status.as_u16(),
            detail = server_message.as_deref().unwrap_or(""),
            "Request failed"
        );
        return Err(TransportError::Status {
            service,
            status: status.as_u16(),
            server_message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| {
        SchemaError {
            service,
            reason: e.to_string(),
        }
        .into()
    })
}
