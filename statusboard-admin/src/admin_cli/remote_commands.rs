use clap::Subcommand;
use reqwest::{Client, RequestBuilder, StatusCode};
use statusboard_api::api::status::UpdateResponse;
use statusboard_api::error::ErrorResponse;
use statusboard_api::models::{StatusRecord, StatusUpdate};

use super::utils::endpoint;

/// Service-token headers understood by the access gateway in front of the
/// write endpoint.
pub const ACCESS_CLIENT_ID_HEADER: &str = "CF-Access-Client-Id";
pub const ACCESS_CLIENT_SECRET_HEADER: &str = "CF-Access-Client-Secret";

pub const ACCESS_CLIENT_ID_ENV: &str = "STATUSBOARD_ACCESS_CLIENT_ID";
pub const ACCESS_CLIENT_SECRET_ENV: &str = "STATUSBOARD_ACCESS_CLIENT_SECRET";

#[derive(Subcommand)]
pub enum RemoteAction {
    #[command(about = "Fetch the current status from a running service")]
    Fetch {
        #[arg(short, long, default_value = "http://localhost:8000", help = "Base URL of the service")]
        url: String,
        #[arg(long, help = "Read the public endpoint instead of /api/status")]
        public: bool,
    },
    #[command(about = "Publish a new status to a running service")]
    Publish {
        #[arg(short, long, default_value = "http://localhost:8000", help = "Base URL of the service")]
        url: String,
        #[arg(short, long, help = "New status: ONLINE, OFFLINE or UNKNOWN (any case)")]
        status: String,
        #[arg(short, long, help = "Message shown next to the status")]
        message: String,
        #[arg(long, help = "Access service token id (defaults to STATUSBOARD_ACCESS_CLIENT_ID)")]
        client_id: Option<String>,
        #[arg(long, help = "Access service token secret (defaults to STATUSBOARD_ACCESS_CLIENT_SECRET)")]
        client_secret: Option<String>,
    },
}

pub async fn handle_remote_command(action: RemoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    match action {
        RemoteAction::Fetch { url, public } => {
            let record = fetch_status(&client, &url, public).await?;
            println!("Status:  {}", record.status);
            println!("Message: {}", record.message);
        }
        RemoteAction::Publish {
            url,
            status,
            message,
            client_id,
            client_secret,
        } => {
            let credentials = AccessCredentials::resolve(client_id, client_secret);
            let update = StatusUpdate {
                status: Some(status),
                message: Some(message),
            };
            let response = publish_status(&client, &url, &update, credentials.as_ref()).await?;
            println!("{}", response.message);
        }
    }
    Ok(())
}

/// Service token presented to the access gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl AccessCredentials {
    /// Flags win over the environment. Both halves are needed; a lone id or
    /// secret is ignored with a warning.
    pub fn resolve(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        let client_id = client_id.or_else(|| std::env::var(ACCESS_CLIENT_ID_ENV).ok());
        let client_secret = client_secret.or_else(|| std::env::var(ACCESS_CLIENT_SECRET_ENV).ok());

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(Self {
                client_id,
                client_secret,
            }),
            (None, None) => None,
            _ => {
                tracing::warn!("access token id and secret must be given together; sending none");
                None
            }
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ACCESS_CLIENT_ID_HEADER, &self.client_id)
            .header(ACCESS_CLIENT_SECRET_HEADER, &self.client_secret)
    }
}

pub async fn fetch_status(
    client: &Client,
    base_url: &str,
    public: bool,
) -> Result<StatusRecord, Box<dyn std::error::Error>> {
    let path = if public { "/status-public" } else { "/api/status" };
    let url = endpoint(base_url, path);
    tracing::debug!(%url, "fetching status");

    let response = client.get(&url).send().await?;
    let code = response.status();
    let body = response.text().await?;

    // The public endpoint reports failures as a record, so parse first.
    if let Ok(record) = serde_json::from_str::<StatusRecord>(&body) {
        if code.is_success() || public {
            return Ok(record);
        }
    }
    Err(describe_failure(code, &body).into())
}

pub async fn publish_status(
    client: &Client,
    base_url: &str,
    update: &StatusUpdate,
    credentials: Option<&AccessCredentials>,
) -> Result<UpdateResponse, Box<dyn std::error::Error>> {
    // Validate locally so obvious mistakes never leave the machine.
    update.clone().validate()?;

    let url = endpoint(base_url, "/api/status");
    tracing::debug!(%url, authenticated = credentials.is_some(), "publishing status");

    let mut request = client.post(&url).json(update);
    if let Some(credentials) = credentials {
        request = credentials.apply(request);
    }

    let response = request.send().await?;
    let code = response.status();
    let body = response.text().await?;

    if code.is_success() {
        match serde_json::from_str::<UpdateResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            // The gateway answers unauthenticated requests with a login page.
            Err(_) => Err(format!(
                "Unexpected response from {} ({}); is an access token required?",
                url, code
            )
            .into()),
        }
    } else {
        Err(describe_failure(code, &body).into())
    }
}

/// Turns an error response into a one-line message.
pub fn describe_failure(code: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error,
            details: Some(details),
        }) => format!("Server returned {}: {}: {}", code, error, details),
        Ok(ErrorResponse { error, details: None }) => format!("Server returned {}: {}", code, error),
        Err(_) => format!("Server returned {}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_need_both_halves() {
        let both = AccessCredentials::resolve(Some("id".into()), Some("secret".into()));
        assert_eq!(
            both,
            Some(AccessCredentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            })
        );
    }

    #[test]
    fn failure_includes_error_details() {
        let body = r#"{"error":"Invalid data format","details":"missing required field(s): message"}"#;
        assert_eq!(
            describe_failure(StatusCode::BAD_REQUEST, body),
            "Server returned 400 Bad Request: Invalid data format: missing required field(s): message"
        );
    }

    #[test]
    fn failure_without_json_body() {
        assert_eq!(
            describe_failure(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
            "Server returned 405 Method Not Allowed"
        );
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_before_sending() {
        let client = Client::new();
        let update = StatusUpdate {
            status: Some("SIDEWAYS".into()),
            message: Some("x".into()),
        };
        // Port 9 is never contacted because validation fails first.
        let err = publish_status(&client, "http://127.0.0.1:9", &update, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SIDEWAYS"));
    }
}
