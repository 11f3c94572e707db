//! HTTP client for the hub's inventory and maintenance endpoints.
//!
//! Everything that is not event-shaped goes over plain HTTP: inventory
//! snapshots are fetched with GET requests, while scanning, discoverability,
//! capture/filter settings, password changes, and service control are
//! form-encoded POSTs.  [`HubApiClient`] is the single reqwest-backed
//! adapter for all of them and implements the application layer's
//! [`InventoryGateway`] port.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use hub_core::{BtInventory, HidInventory};

use crate::application::ports::InventoryGateway;
use crate::domain::ConsoleConfig;

/// Errors from the hub's HTTP endpoints.
#[derive(Debug, thiserror::Error)]
pub enum HubApiError {
    /// Transport-level failure: connection refused, timeout, bad TLS.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The hub answered, but not with success.
    #[error("hub returned {status} for {endpoint}")]
    Status {
        status: reqwest::StatusCode,
        endpoint: &'static str,
    },
}

/// reqwest-backed client for the hub's HTTP surface.
#[derive(Debug, Clone)]
pub struct HubApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HubApiClient {
    /// Builds the client from the console configuration.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying TLS backend cannot be initialised.
    pub fn new(config: &ConsoleConfig) -> Result<Self, HubApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.hub_http_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client against an explicit base URL with a custom timeout.
    /// Used by tests against an in-process server.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, HubApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // ── Scanning and discoverability ──────────────────────────────────────────

    /// Starts Bluetooth device discovery on the hub.
    pub async fn start_scanning(&self) -> Result<(), HubApiError> {
        self.post_empty("/startscanning").await
    }

    /// Stops Bluetooth device discovery.
    pub async fn stop_scanning(&self) -> Result<(), HubApiError> {
        self.post_empty("/stopscanning").await
    }

    /// Makes the hub discoverable to pairing devices.
    pub async fn start_discoverable(&self) -> Result<(), HubApiError> {
        self.post_empty("/startdiscoverable").await
    }

    /// Ends the hub's discoverable window.
    pub async fn stop_discoverable(&self) -> Result<(), HubApiError> {
        self.post_empty("/stopdiscoverable").await
    }

    // ── Maintenance ───────────────────────────────────────────────────────────

    /// Restarts the hub's bridge service process.
    pub async fn restart_service(&self) -> Result<(), HubApiError> {
        self.post_empty("/restartservice").await
    }

    /// Reboots the hub machine.
    pub async fn reboot(&self) -> Result<(), HubApiError> {
        self.post_empty("/reboot").await
    }

    /// Changes the hub's operator password.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), HubApiError> {
        self.post_form(
            "/changepassword",
            &[
                ("current_password", current_password),
                ("new_password", new_password),
            ],
        )
        .await
    }

    // ── Per-device settings ───────────────────────────────────────────────────

    /// Toggles exclusive capture for an input device.
    pub async fn set_device_capture(
        &self,
        device_id: &str,
        capture: bool,
    ) -> Result<(), HubApiError> {
        self.post_form(
            "/setdevicecapture",
            &[
                ("device_id", device_id),
                ("capture", if capture { "true" } else { "false" }),
            ],
        )
        .await
    }

    /// Assigns a report filter to an input device.
    pub async fn set_device_filter(
        &self,
        device_id: &str,
        filter: &str,
    ) -> Result<(), HubApiError> {
        self.post_form(
            "/setdevicefilter",
            &[("device_id", device_id), ("filter", filter)],
        )
        .await
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, HubApiError> {
        debug!(endpoint, "GET");
        let response = self
            .http
            .get(format!("{}{endpoint}", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HubApiError::Status { status, endpoint });
        }
        Ok(response.json().await?)
    }

    async fn post_empty(&self, endpoint: &'static str) -> Result<(), HubApiError> {
        self.post_form(endpoint, &[]).await
    }

    async fn post_form(
        &self,
        endpoint: &'static str,
        fields: &[(&str, &str)],
    ) -> Result<(), HubApiError> {
        debug!(endpoint, "POST");
        let response = self
            .http
            .post(format!("{}{endpoint}", self.base_url))
            .form(fields)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HubApiError::Status { status, endpoint });
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryGateway for HubApiClient {
    async fn bluetooth_devices(&self) -> anyhow::Result<BtInventory> {
        Ok(self.get_json("/bluetoothdevices").await?)
    }

    async fn hid_devices(&self) -> anyhow::Result<HidInventory> {
        Ok(self.get_json("/hiddevices").await?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal one-request HTTP server: answers with the given body and
    /// returns the raw request head it saw.
    async fn one_shot_http(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_http_request(&mut stream).await;
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            request
        });
        (format!("http://{addr}"), handle)
    }

    /// Reads one full HTTP request (head + content-length body); a single
    /// read() may split them across TCP segments.
    async fn read_http_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = vec![0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let body_len = text
                    .lines()
                    .find_map(|line| line.to_ascii_lowercase().strip_prefix("content-length:").map(str::to_string))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn client(base_url: &str) -> HubApiClient {
        HubApiClient::with_base_url(base_url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_bluetooth_devices_parses_inventory_json() {
        let (url, server) = one_shot_http(
            "HTTP/1.1 200 OK",
            r#"{"devices":[{"path":"/org/bluez/hci0/dev_AA_BB","alias":"Keyboard","paired":true}],"scanning":true}"#,
        )
        .await;

        let inventory = client(&url).bluetooth_devices().await.unwrap();

        assert!(inventory.scanning);
        assert_eq!(inventory.devices.len(), 1);
        assert_eq!(inventory.devices[0].alias, "Keyboard");
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /bluetoothdevices"));
    }

    #[tokio::test]
    async fn test_hid_devices_hits_the_hid_endpoint() {
        let (url, server) =
            one_shot_http("HTTP/1.1 200 OK", r#"{"devices":[],"filters":[]}"#).await;

        let inventory = client(&url).hid_devices().await.unwrap();

        assert!(inventory.devices.is_empty());
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /hiddevices"));
    }

    #[tokio::test]
    async fn test_set_device_capture_posts_form_fields() {
        let (url, server) = one_shot_http("HTTP/1.1 200 OK", "").await;

        client(&url)
            .set_device_capture("001:004", true)
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /setdevicecapture"));
        assert!(request.contains("device_id=001%3A004"));
        assert!(request.contains("capture=true"));
    }

    #[tokio::test]
    async fn test_change_password_posts_both_fields() {
        let (url, server) = one_shot_http("HTTP/1.1 200 OK", "").await;

        client(&url)
            .change_password("old-secret", "new-secret")
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.contains("current_password=old-secret"));
        assert!(request.contains("new_password=new-secret"));
    }

    #[tokio::test]
    async fn test_error_status_is_surfaced_with_endpoint() {
        let (url, _server) = one_shot_http("HTTP/1.1 403 Forbidden", "").await;

        let err = client(&url).reboot().await.unwrap_err();

        match err {
            HubApiError::Status { status, endpoint } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
                assert_eq!(endpoint, "/reboot");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_http_error() {
        // Port 9 (discard) refuses connections on loopback.
        let err = client("http://127.0.0.1:9")
            .start_scanning()
            .await
            .unwrap_err();

        assert!(matches!(err, HubApiError::Http(_)));
    }
}
