//! WebSocket relay connector.
//!
//! Speaks the relay wire protocol for one-shot queries:
//! `["REQ", sub, filter]`, collect `["EVENT", sub, event]` until
//! `["EOSE", sub]`, then `["CLOSE", sub]` and close the socket.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use shared_types::{Event, Filter};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::ports::outbound::{RelayConnection, RelayConnector, RelayError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Relay message relevant to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    /// A stored event for a subscription.
    Event {
        /// Subscription id.
        subscription: String,
        /// The event.
        event: Box<Event>,
    },
    /// End of stored events.
    Eose {
        /// Subscription id.
        subscription: String,
    },
    /// The relay refused or ended the subscription.
    Closed {
        /// Subscription id.
        subscription: String,
        /// Relay-supplied reason.
        reason: String,
    },
    /// Human-readable relay notice.
    Notice(String),
}

impl RelayMessage {
    /// Parse a relay text frame. Frames of other types or malformed frames
    /// yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) else {
            return None;
        };
        let label = items.first()?.as_str()?;
        let text_at = |i: usize| items.get(i).and_then(Value::as_str).map(str::to_string);

        match label {
            "EVENT" => {
                let event = serde_json::from_value(items.get(2)?.clone()).ok()?;
                Some(Self::Event {
                    subscription: text_at(1)?,
                    event: Box::new(event),
                })
            }
            "EOSE" => Some(Self::Eose {
                subscription: text_at(1)?,
            }),
            "CLOSED" => Some(Self::Closed {
                subscription: text_at(1)?,
                reason: text_at(2).unwrap_or_default(),
            }),
            "NOTICE" => Some(Self::Notice(text_at(1).unwrap_or_default())),
            _ => None,
        }
    }
}

fn req_frame(subscription: &str, filter: &Filter) -> String {
    json!(["REQ", subscription, filter]).to_string()
}

fn close_frame(subscription: &str) -> String {
    json!(["CLOSE", subscription]).to_string()
}

/// Connector opening one WebSocket per lookup.
#[derive(Clone, Debug, Default)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    /// Create a connector.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RelayConnector for WebSocketConnector {
    type Connection = WebSocketConnection;

    async fn connect(&self, url: &str, timeout: Duration) -> Result<WebSocketConnection, RelayError> {
        debug!("[cc-01] Connecting to relay {}", url);
        let (stream, _) = tokio::time::timeout(timeout, connect_async(url))
            .await
            .map_err(|_| RelayError::ConnectTimeout {
                url: url.to_string(),
            })?
            .map_err(|e| RelayError::Connect {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(WebSocketConnection {
            url: url.to_string(),
            stream: Some(stream),
            subscription: None,
        })
    }
}

/// One open relay socket. Dropping it drops the socket.
pub struct WebSocketConnection {
    url: String,
    stream: Option<WsStream>,
    subscription: Option<String>,
}

impl WebSocketConnection {
    fn query_error(&self, reason: impl ToString) -> RelayError {
        RelayError::Query {
            url: self.url.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl RelayConnection for WebSocketConnection {
    fn url(&self) -> &str {
        &self.url
    }

    async fn query_sync(&mut self, filter: &Filter) -> Result<Vec<Event>, RelayError> {
        let subscription = Uuid::new_v4().simple().to_string();
        let url = self.url.clone();
        let Some(stream) = self.stream.as_mut() else {
            return Err(RelayError::Query {
                url,
                reason: "connection closed".to_string(),
            });
        };

        stream
            .send(Message::Text(req_frame(&subscription, filter).into()))
            .await
            .map_err(|e| RelayError::Query {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        self.subscription = Some(subscription.clone());

        let mut events = Vec::new();
        loop {
            let Some(stream) = self.stream.as_mut() else {
                return Err(self.query_error("connection closed"));
            };
            let frame = match stream.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => return Err(self.query_error(e)),
                None => return Err(self.query_error("connection closed by relay")),
            };

            let text = match frame {
                Message::Text(text) => text,
                Message::Ping(data) => {
                    let _ = stream.send(Message::Pong(data)).await;
                    continue;
                }
                Message::Close(_) => return Err(self.query_error("connection closed by relay")),
                _ => continue,
            };

            match RelayMessage::parse(text.as_str()) {
                Some(RelayMessage::Event {
                    subscription: sub,
                    event,
                }) if sub == subscription => events.push(*event),
                Some(RelayMessage::Eose { subscription: sub }) if sub == subscription => {
                    trace!("[cc-01] {} sent EOSE after {} events", self.url, events.len());
                    return Ok(events);
                }
                Some(RelayMessage::Closed {
                    subscription: sub,
                    reason,
                }) if sub == subscription => {
                    self.subscription = None;
                    return Err(RelayError::Closed {
                        url: self.url.clone(),
                        reason,
                    });
                }
                Some(RelayMessage::Notice(notice)) => return Err(self.query_error(notice)),
                _ => {}
            }
        }
    }

    async fn close(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        if let Some(subscription) = self.subscription.take() {
            let _ = stream
                .send(Message::Text(close_frame(&subscription).into()))
                .await;
        }
        let _ = stream.close(None).await;
        debug!("[cc-01] Closed relay connection {}", self.url);
    }
}
