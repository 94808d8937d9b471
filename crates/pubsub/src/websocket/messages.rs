// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Data structures for PubSub edge WebSocket frames.
//!
//! The wire protocol is JSON, one frame per text message, discriminated by an
//! uppercase `type` field. Control requests carry a correlation `nonce` which the
//! edge echoes in the matching RESPONSE frame.

use serde::{Deserialize, Serialize};

use super::error::{PubSubError, PubSubResult};

/// Request payload shared by LISTEN and UNLISTEN control frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicData {
    /// Topics to subscribe or unsubscribe.
    pub topics: Vec<String>,
    /// OAuth token, omitted from the payload when not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// Frames sent to the PubSub edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    /// Keep-alive probe.
    #[serde(rename = "PING")]
    Ping,
    /// Subscribe to topics.
    #[serde(rename = "LISTEN")]
    Listen {
        /// Correlation nonce echoed in the RESPONSE frame.
        nonce: String,
        /// Topics and auth token.
        data: TopicData,
    },
    /// Unsubscribe from topics.
    #[serde(rename = "UNLISTEN")]
    Unlisten {
        /// Correlation nonce echoed in the RESPONSE frame.
        nonce: String,
        /// Topics and auth token.
        data: TopicData,
    },
}

/// Topic payload delivered by a MESSAGE frame.
///
/// The `message` body is opaque to this client and passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMessage {
    /// The topic this payload was published on.
    pub topic: String,
    /// The raw payload; interpretation is the consumer's job.
    pub message: serde_json::Value,
}

/// Frames received from the PubSub edge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    /// Keep-alive probe acknowledgment.
    #[serde(rename = "PONG")]
    Pong,
    /// The edge requests that the client reconnect.
    #[serde(rename = "RECONNECT")]
    Reconnect,
    /// Response to a LISTEN/UNLISTEN request; empty `error` signals success.
    #[serde(rename = "RESPONSE")]
    Response {
        /// Correlation nonce of the originating request.
        #[serde(default)]
        nonce: Option<String>,
        /// Remote error message, empty on success.
        #[serde(default)]
        error: String,
    },
    /// Topic payload delivery.
    #[serde(rename = "MESSAGE")]
    Message {
        /// Topic and opaque payload.
        data: TopicMessage,
    },
}

/// Events delivered to client subscriptions.
#[derive(Debug, Clone)]
pub enum PubSubEvent {
    /// A connection attempt has started.
    Connecting,
    /// The transport is established and resubscription has been issued.
    Connected,
    /// The connection was torn down.
    Disconnected,
    /// The client lost its connection and will re-establish it after the
    /// reconnect delay.
    Reconnecting,
    /// A non-fatal transport or protocol error.
    Error(PubSubError),
    /// A topic payload, delivered for every inbound MESSAGE frame regardless
    /// of whether the topic is registered.
    Message(TopicMessage),
}

/// Parses a raw JSON text frame into a [`ServerFrame`].
///
/// # Errors
///
/// Returns [`PubSubError::Json`] when the text is not valid JSON and
/// [`PubSubError::Protocol`] when it does not match a known frame type.
pub fn parse_server_frame(text: &str) -> PubSubResult<ServerFrame> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| PubSubError::Json(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| PubSubError::Protocol(e.to_string()))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn test_serialize_ping() {
        let json = serde_json::to_string(&ClientFrame::Ping).unwrap();
        assert_eq!(json, r#"{"type":"PING"}"#);
    }

    #[rstest]
    fn test_serialize_listen_with_auth_token() {
        let frame = ClientFrame::Listen {
            nonce: "abcDEF123".to_string(),
            data: TopicData {
                topics: vec!["chat_moderator_actions.123".to_string()],
                auth_token: Some("oauth-token".to_string()),
            },
        };

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "LISTEN",
                "nonce": "abcDEF123",
                "data": {
                    "topics": ["chat_moderator_actions.123"],
                    "auth_token": "oauth-token",
                },
            })
        );
    }

    #[rstest]
    fn test_serialize_unlisten_omits_missing_auth_token() {
        let frame = ClientFrame::Unlisten {
            nonce: "n1".to_string(),
            data: TopicData {
                topics: vec!["channel-points.42".to_string()],
                auth_token: None,
            },
        };

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "UNLISTEN");
        assert!(value["data"].get("auth_token").is_none());
    }

    #[rstest]
    #[case(r#"{"type":"PONG"}"#, ServerFrame::Pong)]
    #[case(r#"{"type":"RECONNECT"}"#, ServerFrame::Reconnect)]
    fn test_parse_simple_frames(#[case] text: &str, #[case] expected: ServerFrame) {
        assert_eq!(parse_server_frame(text).unwrap(), expected);
    }

    #[rstest]
    fn test_parse_success_response() {
        let frame = parse_server_frame(r#"{"type":"RESPONSE","nonce":"n1","error":""}"#).unwrap();
        assert_eq!(
            frame,
            ServerFrame::Response {
                nonce: Some("n1".to_string()),
                error: String::new(),
            }
        );
    }

    #[rstest]
    fn test_parse_error_response() {
        let frame =
            parse_server_frame(r#"{"type":"RESPONSE","nonce":"n2","error":"ERR_BADAUTH"}"#)
                .unwrap();
        let ServerFrame::Response { nonce, error } = frame else {
            panic!("expected response frame");
        };
        assert_eq!(nonce.as_deref(), Some("n2"));
        assert_eq!(error, "ERR_BADAUTH");
    }

    #[rstest]
    fn test_parse_message_frame() {
        let text = r#"{
            "type": "MESSAGE",
            "data": {
                "topic": "channel-points.42",
                "message": "{\"reward\":\"hydrate\"}"
            }
        }"#;

        let ServerFrame::Message { data } = parse_server_frame(text).unwrap() else {
            panic!("expected message frame");
        };
        assert_eq!(data.topic, "channel-points.42");
        assert!(data.message.is_string());
    }

    #[rstest]
    fn test_parse_unknown_type_is_protocol_error() {
        let result = parse_server_frame(r#"{"type":"BOGUS"}"#);
        assert!(matches!(result, Err(PubSubError::Protocol(_))));
    }

    #[rstest]
    fn test_parse_malformed_json_is_json_error() {
        let result = parse_server_frame("not json at all");
        assert!(matches!(result, Err(PubSubError::Json(_))));
    }
}
