use crate::lsp::types::{Message, Notification, ResponseError, ResponseMessage};
use anyhow::anyhow;

pub fn parse_notification(json: &serde_json::Value) -> anyhow::Result<Option<Notification>> {
    if json.get("method").is_some() {
        let notification: Notification = serde_json::from_value(json.clone())?;
        return Ok(Some(notification));
    }
    Ok(None)
}

pub fn parse_response(json: &serde_json::Value) -> anyhow::Result<Option<Message>> {
    if json.get("id").is_some() {
        if json.get("result").is_some() {
            let response: ResponseMessage = serde_json::from_value(json.clone())?;
            return Ok(Some(Message::Response(response)));
        } else {
            let response: ResponseError = serde_json::from_value(json.clone())?;
            return Ok(Some(Message::Error(response)));
        }
    }
    Ok(None)
}

/// Parse a full JSON payload (bytes) into a `Message` (Notification/Response/Error).
pub fn parse_message_from_slice(s: &[u8]) -> anyhow::Result<Message> {
    let json: serde_json::Value = serde_json::from_slice(s)?;
    parse_message_from_value(json)
}

/// Classify an already-decoded value as a `Message`. This is the shared
/// "is this a valid message" judgment; the boosted read path calls it on
/// binary-decoded values before falling back to plain JSON.
pub fn parse_message_from_value(json: serde_json::Value) -> anyhow::Result<Message> {
    if let Some(notification) = parse_notification(&json)? {
        return Ok(Message::Notification(notification));
    }
    if let Some(response) = parse_response(&json)? {
        return Ok(response);
    }
    Err(anyhow!("value is not a jsonrpc message"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_notification() {
        let message =
            parse_message_from_slice(br#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#)
                .unwrap();
        assert!(matches!(message, Message::Notification(n) if n.method == "initialized"));
    }

    #[test]
    fn classifies_response_and_error() {
        let response =
            parse_message_from_value(json!({"jsonrpc":"2.0","id":1,"result":{"ok":true}}))
                .unwrap();
        assert!(matches!(response, Message::Response(r) if r.id == 1));

        let error = parse_message_from_value(
            json!({"jsonrpc":"2.0","id":2,"error":{"code":-32601,"message":"nope"}}),
        )
        .unwrap();
        assert!(matches!(error, Message::Error(e) if e.id == 2));
    }

    #[test]
    fn rejects_non_messages() {
        assert!(parse_message_from_value(json!("hello")).is_err());
        assert!(parse_message_from_value(json!({"jsonrpc":"2.0"})).is_err());
        assert!(parse_message_from_slice(b"{broken").is_err());
    }
}
