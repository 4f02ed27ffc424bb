use std::path::PathBuf;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{HealthReport, ProgressReport, ServiceError, StartAck, StatusReport, StopAck};

/// A staged input file as the engine sees it: display name plus the path the
/// bytes are read from when the start request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputArtifact {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Backend base URL without a trailing slash, e.g. `http://host:5000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The backend job-service contract. One implementation talks HTTP; tests
/// and the poller only see this trait.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// Upload the staged files and start the bulk send.
    async fn start(
        &self,
        recipients: &InputArtifact,
        attachment: Option<&InputArtifact>,
    ) -> Result<StartAck, ServiceError>;

    /// Fetch the current progress of the running job.
    async fn progress(&self) -> Result<ProgressReport, ServiceError>;

    /// Fetch the terminal status after the job stopped being active.
    async fn status(&self) -> Result<StatusReport, ServiceError>;

    /// Ask the backend to abort the running job.
    async fn stop(&self) -> Result<StopAck, ServiceError>;

    /// Backend liveness probe.
    async fn health(&self) -> Result<HealthReport, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobService {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestJobService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn read_part(artifact: &InputArtifact) -> Result<Part, ServiceError> {
        let bytes = tokio::fs::read(&artifact.path)
            .await
            .map_err(|source| ServiceError::Io {
                path: artifact.path.clone(),
                source,
            })?;
        Ok(Part::bytes(bytes).file_name(artifact.name.clone()))
    }
}

#[async_trait::async_trait]
impl JobService for ReqwestJobService {
    async fn start(
        &self,
        recipients: &InputArtifact,
        attachment: Option<&InputArtifact>,
    ) -> Result<StartAck, ServiceError> {
        let mut form = Form::new().part("recipientsFile", Self::read_part(recipients).await?);
        if let Some(artifact) = attachment {
            form = form.part("attachmentFile", Self::read_part(artifact).await?);
        }

        let response = self
            .client
            .post(self.url("/api/send"))
            .multipart(form)
            .send()
            .await
            .map_err(map_transport)?;
        decode_or_reject(response).await
    }

    async fn progress(&self) -> Result<ProgressReport, ServiceError> {
        let response = self
            .client
            .get(self.url("/api/progress"))
            .send()
            .await
            .map_err(map_transport)?;
        decode_or_reject(response).await
    }

    async fn status(&self) -> Result<StatusReport, ServiceError> {
        let response = self
            .client
            .get(self.url("/api/status"))
            .send()
            .await
            .map_err(map_transport)?;
        decode_or_reject(response).await
    }

    async fn stop(&self) -> Result<StopAck, ServiceError> {
        let response = self
            .client
            .post(self.url("/api/stop"))
            .send()
            .await
            .map_err(map_transport)?;
        decode_or_reject(response).await
    }

    async fn health(&self) -> Result<HealthReport, ServiceError> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(map_transport)?;
        decode_or_reject(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Decode a 2xx body as `T`; otherwise prefer the backend's `{error}`
/// message over the bare status code.
async fn decode_or_reject<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    let text = response.text().await.map_err(map_transport)?;

    if status.is_success() {
        return serde_json::from_str(&text).map_err(|err| ServiceError::Decode(err.to_string()));
    }

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => Err(ServiceError::Rejected {
            message: body.error,
        }),
        Err(_) => Err(ServiceError::Http {
            status: status.as_u16(),
        }),
    }
}

fn map_transport(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Transport("request timed out".to_string());
    }
    ServiceError::Transport(err.to_string())
}
