//! HTTP client for the appointment API.

use std::time::Duration;

use anyhow::{Context, Result};
use fieldsched_core::appointment::AppointmentPayload;
use fieldsched_core::config::SchedConfig;
use fieldsched_core::error::{ScheduleError, ScheduleResult};
use fieldsched_core::submit::AppointmentSink;
use tokio::time::timeout;

/// Creates appointments with `POST {api_url}/Appointment` (or the company-scoped path).
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
}

impl ApiClient {
    pub fn from_config(config: &SchedConfig, company_id: Option<&str>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fieldsched/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let scoped = SchedConfig {
            company_id: company_id.map(str::to_string).or_else(|| config.company_id.clone()),
            ..config.clone()
        };

        Ok(ApiClient {
            http,
            endpoint: scoped.appointment_endpoint(),
            token: config.api_token.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(config.request_timeout_secs.max(1)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, payload: &AppointmentPayload) -> ScheduleResult<String> {
        let mut request = self.http.post(&self.endpoint).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScheduleError::Api(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScheduleError::Api(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ScheduleError::Api(format!("{}: {}", status, body.trim())));
        }

        Ok(created_id(&body))
    }
}

impl AppointmentSink for ApiClient {
    async fn create(&self, payload: &AppointmentPayload) -> ScheduleResult<String> {
        timeout(self.timeout, self.post(payload))
            .await
            .map_err(|_| ScheduleError::ApiTimeout(self.timeout.as_secs()))?
    }
}

/// Pull the new appointment's id out of a create response, if it has one.
fn created_id(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return String::new();
    };

    ["id", "Id", "appointmentId", "_id"]
        .iter()
        .find_map(|key| match value.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldsched_core::AppointmentTemplate;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One-shot HTTP server: answers a single request with `status` and
    /// `body` after `delay`, and hands back the raw request it received.
    async fn stub_server(
        status: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn client(url: &str, token: Option<&str>, timeout_secs: u64) -> ApiClient {
        let config = SchedConfig {
            api_url: url.to_string(),
            api_token: token.map(str::to_string),
            request_timeout_secs: timeout_secs,
            ..SchedConfig::default()
        };
        ApiClient::from_config(&config, None).unwrap()
    }

    fn payload() -> AppointmentPayload {
        AppointmentPayload {
            template: AppointmentTemplate::new("Boiler check"),
            start: "2025-03-14T09:00:00.000Z".into(),
            end: "2025-03-14T10:00:00.000Z".into(),
        }
    }

    #[tokio::test]
    async fn created_response_yields_id() {
        let (url, server) = stub_server("201 Created", r#"{"id":"apt-7"}"#, Duration::ZERO).await;

        let id = client(&url, Some("secret"), 5).create(&payload()).await.unwrap();
        assert_eq!(id, "apt-7");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /Appointment "), "{}", request);
        assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));
        assert!(request.contains(r#""title":"Boiler check""#));
        assert!(request.contains(r#""start":"2025-03-14T09:00:00.000Z""#));
    }

    #[tokio::test]
    async fn no_token_sends_no_authorization() {
        let (url, server) = stub_server("200 OK", "{}", Duration::ZERO).await;

        let id = client(&url, None, 5).create(&payload()).await.unwrap();
        assert_eq!(id, "");

        let request = server.await.unwrap();
        assert!(!request.to_ascii_lowercase().contains("authorization:"), "{}", request);
    }

    #[tokio::test]
    async fn error_status_carries_status_and_body() {
        let (url, _server) =
            stub_server("400 Bad Request", r#"{"error":"teamId is required"}"#, Duration::ZERO)
                .await;

        let err = client(&url, None, 5).create(&payload()).await.unwrap_err();
        match err {
            ScheduleError::Api(message) => {
                assert!(message.contains("400"), "{}", message);
                assert!(message.contains("teamId is required"), "{}", message);
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let (url, _server) = stub_server("201 Created", "{}", Duration::from_secs(5)).await;

        let err = client(&url, None, 1).create(&payload()).await.unwrap_err();
        assert!(matches!(err, ScheduleError::ApiTimeout(1)), "{:?}", err);
    }

    #[test]
    fn zero_timeout_is_raised_to_one_second() {
        let client = client("http://localhost:8080/api", None, 0);
        assert_eq!(client.timeout, Duration::from_secs(1));
    }

    #[test]
    fn extracts_id_variants() {
        assert_eq!(created_id(r#"{"id": "a1b2"}"#), "a1b2");
        assert_eq!(created_id(r#"{"Id": 42, "title": "x"}"#), "42");
        assert_eq!(created_id(r#"{"appointmentId": "z"}"#), "z");
        assert_eq!(created_id(r#"{"ok": true}"#), "");
        assert_eq!(created_id(""), "");
        assert_eq!(created_id("Created"), "");
    }

    #[test]
    fn company_flag_overrides_config() {
        let config = SchedConfig {
            api_url: "https://api.example.com/".into(),
            company_id: Some("from-config".into()),
            ..SchedConfig::default()
        };

        let client = ApiClient::from_config(&config, Some("acme")).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/Company/acme/Appointment");

        let client = ApiClient::from_config(&config, None).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.example.com/Company/from-config/Appointment"
        );
    }

    #[test]
    fn unscoped_endpoint() {
        let client = ApiClient::from_config(&SchedConfig::default(), None).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/api/Appointment");
    }
}
