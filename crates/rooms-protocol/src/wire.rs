//! Wire-level constants and inbound sanitization.
//!
//! This module defines:
//! - Field length limits enforced at the protocol boundary.
//! - Sanitizers applied to client-supplied display fields before they
//!   reach the lobby.
//!
//! The actual encode/decode logic lives in `json_codec`.

use rooms_core::ClientRequest;

/// Longest display name kept; anything longer is truncated.
pub const MAX_NAME_LEN: usize = 20;

/// Longest access PIN kept; anything longer is truncated.
pub const MAX_PIN_LEN: usize = 4;

/// Reader-side cap on a single protocol line. A peer that streams this
/// much without a newline is broken or hostile and gets disconnected.
pub const MAX_LINE_LEN: usize = 8 * 1024;

/// Truncate to [`MAX_NAME_LEN`] characters, then strip characters that
/// could smuggle markup into client UIs.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .take(MAX_NAME_LEN)
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect()
}

/// Truncate to [`MAX_PIN_LEN`] characters.
pub fn sanitize_pin(raw: &str) -> String {
    raw.chars().take(MAX_PIN_LEN).collect()
}

/// Apply the field sanitizers to a freshly decoded request. Names and
/// PINs that end up blank collapse to `None` so rooms fall back to
/// their defaults.
pub fn sanitize_request(request: ClientRequest) -> ClientRequest {
    match request {
        ClientRequest::CreateRoom {
            player_name,
            pin,
            color,
        } => ClientRequest::CreateRoom {
            player_name: clean(player_name, sanitize_name),
            pin: clean(pin, sanitize_pin),
            color,
        },
        ClientRequest::JoinRoom {
            room_id,
            player_name,
            pin,
        } => ClientRequest::JoinRoom {
            room_id,
            player_name: clean(player_name, sanitize_name),
            pin: clean(pin, sanitize_pin),
        },
        other => other,
    }
}

fn clean(field: Option<String>, sanitize: fn(&str) -> String) -> Option<String> {
    field
        .map(|raw| sanitize(&raw))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_truncated_then_stripped() {
        assert_eq!(sanitize_name("alice"), "alice");
        assert_eq!(sanitize_name("<script>\"x\"'y'</s>"), "scriptxy/s");
        let long = "a".repeat(40);
        assert_eq!(sanitize_name(&long).len(), MAX_NAME_LEN);
    }

    #[test]
    fn pins_are_truncated() {
        assert_eq!(sanitize_pin("123456"), "1234");
        assert_eq!(sanitize_pin("12"), "12");
    }

    #[test]
    fn blank_fields_collapse_to_none() {
        let request = sanitize_request(ClientRequest::CreateRoom {
            player_name: Some("<>".into()),
            pin: Some(String::new()),
            color: None,
        });
        assert_eq!(
            request,
            ClientRequest::CreateRoom {
                player_name: None,
                pin: None,
                color: None,
            }
        );
    }

    #[test]
    fn join_fields_are_sanitized_but_the_room_id_is_untouched() {
        let request = sanitize_request(ClientRequest::JoinRoom {
            room_id: "ab12cd".into(),
            player_name: Some("bob<the>builder".into()),
            pin: Some("98765".into()),
        });
        assert_eq!(
            request,
            ClientRequest::JoinRoom {
                room_id: "ab12cd".into(),
                player_name: Some("bobthebuilder".into()),
                pin: Some("9876".into()),
            }
        );
    }
}
