//! Wire frames for the gateway protocol
//!
//! Everything on the socket is JSON text, tagged by `type`. A client invokes
//! an action with an `event` frame whose positional `params` feed the
//! action's input shape; when the client wants an acknowledgment it attaches
//! an `ack` id and the server answers with an `ack` frame carrying the same
//! id and the validated output values. `emit` frames flow server to client,
//! outside any acknowledgment exchange.

use action_core::ROOT_NAMESPACE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages exchanged over a gateway connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// Client-sent action invocation
    Event {
        /// Namespace path
        #[serde(default = "default_namespace")]
        namespace: String,
        /// Event name
        event: String,
        /// Positional data parameters
        #[serde(default)]
        params: Vec<Value>,
        /// Acknowledgment id, present when the client wants a callback
        #[serde(skip_serializing_if = "Option::is_none")]
        ack: Option<u64>,
    },

    /// Server acknowledgment of an `event` frame
    Ack {
        /// Id echoed from the originating event frame
        ack: u64,
        /// Validated output values, in positional order
        values: Vec<Value>,
    },

    /// Server-pushed event
    Emit {
        /// Namespace path
        namespace: String,
        /// Event name
        event: String,
        /// Positional values
        params: Vec<Value>,
    },
}

fn default_namespace() -> String {
    ROOT_NAMESPACE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_frame_round_trips() {
        let frame = Frame::Event {
            namespace: "/chat".to_string(),
            event: "send".to_string(),
            params: vec![json!("room"), json!({"text": "hi"})],
            ack: Some(7),
        };

        let wire = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            wire,
            json!({
                "type": "event",
                "namespace": "/chat",
                "event": "send",
                "params": ["room", {"text": "hi"}],
                "ack": 7,
            })
        );

        let parsed: Frame = serde_json::from_value(wire).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn omitted_namespace_and_params_default() {
        let parsed: Frame =
            serde_json::from_str(r#"{"type": "event", "event": "ping"}"#).unwrap();
        assert_eq!(
            parsed,
            Frame::Event {
                namespace: "/".to_string(),
                event: "ping".to_string(),
                params: Vec::new(),
                ack: None,
            }
        );
    }

    #[test]
    fn absent_ack_is_not_serialized() {
        let frame = Frame::Event {
            namespace: "/".to_string(),
            event: "ping".to_string(),
            params: Vec::new(),
            ack: None,
        };
        let wire = serde_json::to_value(&frame).unwrap();
        assert!(wire.get("ack").is_none());
    }

    #[test]
    fn ack_and_emit_frames_have_their_tags() {
        let wire = serde_json::to_value(Frame::Ack {
            ack: 3,
            values: vec![json!(1)],
        })
        .unwrap();
        assert_eq!(wire["type"], json!("ack"));

        let wire = serde_json::to_value(Frame::Emit {
            namespace: "/".to_string(),
            event: "tick".to_string(),
            params: Vec::new(),
        })
        .unwrap();
        assert_eq!(wire["type"], json!("emit"));
    }
}
