//! Outbound notifications to the host and the background delivery worker.
//!
//! Delivery is best-effort: callers never wait for an acknowledgment, and a
//! failed POST is only logged.

use anyhow::{Result, anyhow};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};

/// A committed user choice sent to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// An option was chosen inside a list category.
    Select { mod_type: String, index: i64 },
    /// The callsign field was submitted.
    SetCallsign { callsign: String },
    /// The user asked to dismiss the overlay.
    Close,
}

impl Notification {
    /// Path segment appended to the host endpoint.
    pub fn event(&self) -> &'static str {
        match self {
            Notification::Select { .. } => "select",
            Notification::SetCallsign { .. } => "setCallsign",
            Notification::Close => "close",
        }
    }

    /// JSON body posted for this notification.
    pub fn body(&self) -> Value {
        match self {
            // The host expects the index in its string form.
            Notification::Select { mod_type, index } => {
                json!({ "modType": mod_type, "index": index.to_string() })
            }
            Notification::SetCallsign { callsign } => json!({ "callsign": callsign }),
            Notification::Close => json!({}),
        }
    }
}

/// One-way notification sink. Implementations must not block.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Notifier that hands notifications to the delivery worker.
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        let event = notification.event();
        match self.tx.try_send(notification) {
            Ok(()) => tracing::debug!("queued {event}"),
            Err(TrySendError::Full(_)) => tracing::warn!("notification queue full, dropped {event}"),
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("notification worker stopped, dropped {event}")
            }
        }
    }
}

/// Build the URL for an event under the configured endpoint.
pub fn event_url(endpoint: &str, event: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), event)
}

/// Worker loop: deliver notifications in order until the sender is dropped.
/// Each POST is bounded by `timeout` so a stalled host cannot hold back later ones.
pub async fn run(mut rx: mpsc::Receiver<Notification>, endpoint: String, timeout: Duration) {
    // Shared HTTP client for all host calls. The host is local, so proxies are bypassed.
    let http = match Client::builder().no_proxy().timeout(timeout).build() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("HTTP client init failed: {e}");
            return;
        }
    };
    tracing::info!("notification worker started: {endpoint}");

    while let Some(notification) = rx.recv().await {
        let event = notification.event();
        match post(&http, &endpoint, &notification).await {
            Ok(()) => tracing::info!("posted {event}"),
            Err(e) => tracing::warn!("failed to post to {event}: {e}"),
        }
    }
    tracing::info!("notification worker stopped");
}

/// POST a single notification; the response body is ignored.
async fn post(http: &Client, endpoint: &str, notification: &Notification) -> Result<()> {
    let url = event_url(endpoint, notification.event());
    http.post(url)
        .header("Content-Type", "application/json; charset=UTF-8")
        .json(&notification.body())
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow!("host rejected notification: {e}"))?;
    Ok(())
}

#[cfg(test)]
pub mod testing {
    use super::{Notification, Notifier};
    use std::{cell::RefCell, rc::Rc};

    /// Notifier that records everything it is given.
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        pub sent: Rc<RefCell<Vec<Notification>>>,
    }

    impl RecordingNotifier {
        pub fn take(&self) -> Vec<Notification> {
            self.sent.borrow_mut().drain(..).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.sent.borrow_mut().push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    #[test]
    fn test_bodies() {
        let select = Notification::Select {
            mod_type: "48".into(),
            index: 2,
        };
        assert_eq!(select.event(), "select");
        assert_eq!(select.body(), json!({"modType": "48", "index": "2"}));

        let callsign = Notification::SetCallsign {
            callsign: " ".into(),
        };
        assert_eq!(callsign.event(), "setCallsign");
        assert_eq!(callsign.body(), json!({"callsign": " "}));

        assert_eq!(Notification::Close.event(), "close");
        assert_eq!(Notification::Close.body(), json!({}));
    }

    #[test]
    fn test_event_url() {
        assert_eq!(
            event_url("http://127.0.0.1:30120/overlay/", "close"),
            "http://127.0.0.1:30120/overlay/close"
        );
        assert_eq!(event_url("http://host", "select"), "http://host/select");
    }

    #[test]
    fn test_channel_notifier_never_blocks() {
        let (tx, mut rx) = mpsc::channel(1);
        let notifier = ChannelNotifier::new(tx);
        notifier.notify(Notification::Close);
        // The second one is dropped because the queue is full.
        notifier.notify(Notification::SetCallsign {
            callsign: "x".into(),
        });
        assert_eq!(rx.try_recv().unwrap(), Notification::Close);
        assert!(rx.try_recv().is_err());

        drop(rx);
        notifier.notify(Notification::Close);
    }

    /// Accept one HTTP request and return its request line and body.
    async fn accept_one(listener: &TcpListener) -> (String, String) {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before full request");
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let head = &text[..head_end];
                let len = head
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                let body = &text[head_end + 4..];
                if body.len() >= len {
                    sock.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                        .await
                        .unwrap();
                    let request_line = head.lines().next().unwrap_or_default().to_string();
                    return (request_line, body[..len].to_string());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_worker_posts_in_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/overlay", listener.local_addr().unwrap());

        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::spawn(run(rx, endpoint, Duration::from_secs(5)));
        let notifier = ChannelNotifier::new(tx);
        notifier.notify(Notification::Select {
            mod_type: "48".into(),
            index: 1,
        });
        notifier.notify(Notification::Close);

        let (line, body) = accept_one(&listener).await;
        assert_eq!(line, "POST /overlay/select HTTP/1.1");
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"modType": "48", "index": "1"}));

        let (line, body) = accept_one(&listener).await;
        assert_eq!(line, "POST /overlay/close HTTP/1.1");
        assert_eq!(body, "{}");

        drop(notifier);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_stalled_request_does_not_block_later_ones() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::spawn(run(rx, endpoint, Duration::from_millis(200)));
        tx.send(Notification::Close).await.unwrap();
        tx.send(Notification::SetCallsign {
            callsign: "N7".into(),
        })
        .await
        .unwrap();

        // The first connection is accepted and held open without a response.
        let (stalled, _) = listener.accept().await.unwrap();
        let (line, body) = tokio::time::timeout(Duration::from_secs(5), accept_one(&listener))
            .await
            .unwrap();
        assert_eq!(line, "POST /setCallsign HTTP/1.1");
        assert_eq!(body, r#"{"callsign":"N7"}"#);

        drop(stalled);
        drop(tx);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_survives_unreachable_host() {
        // Bind then drop to get a port with nothing listening.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::spawn(run(rx, format!("http://{addr}"), Duration::from_secs(5)));
        tx.send(Notification::Close).await.unwrap();
        tx.send(Notification::Close).await.unwrap();
        drop(tx);
        worker.await.unwrap();
    }
}
