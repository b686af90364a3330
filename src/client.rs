use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, Failure};
use crate::models::{
    CreateCulturalClassDto, CreateEnrollmentDto, CulturalClass, Enrollment, UpdateCulturalClassDto,
};

/// Remote cultural classes API. Page controllers only talk to this trait.
#[async_trait]
pub trait CulturalApi: Send + Sync {
    async fn list_classes(&self) -> Result<Vec<CulturalClass>, ApiError>;

    async fn get_class(&self, id: i64) -> Result<CulturalClass, ApiError>;

    async fn create_class(&self, dto: &CreateCulturalClassDto) -> Result<CulturalClass, ApiError>;

    async fn update_class(
        &self,
        id: i64,
        dto: &UpdateCulturalClassDto,
    ) -> Result<CulturalClass, ApiError>;

    /// Rejected by the server while the class has active enrollments.
    async fn delete_class(&self, id: i64) -> Result<(), ApiError>;

    async fn create_enrollment(&self, dto: &CreateEnrollmentDto) -> Result<Enrollment, ApiError>;

    async fn cancel_enrollment(&self, id: i64) -> Result<(), ApiError>;

    async fn list_enrollments_by_class(&self, class_id: i64) -> Result<Vec<Enrollment>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
}

impl HttpApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn send(&self, request: RequestBuilder, failure: Failure) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "API request did not reach the server");
            ApiError::Network(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        warn!(%status, message = ?message, "API request failed");
        Err(failure.into_error(status, message))
    }
}

async fn error_message(response: Response) -> Option<String> {
    let body: ErrorBody = response.json().await.ok()?;
    body.message.filter(|message| !message.trim().is_empty())
}

#[async_trait]
impl CulturalApi for HttpApiClient {
    async fn list_classes(&self) -> Result<Vec<CulturalClass>, ApiError> {
        let url = self.endpoint("/cultural-classes");
        debug!(%url, "listing cultural classes");
        let response = self
            .send(
                self.client.get(&url),
                Failure::Server("Failed to load cultural classes".into()),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn get_class(&self, id: i64) -> Result<CulturalClass, ApiError> {
        let url = self.endpoint(&format!("/cultural-classes/{id}"));
        debug!(%url, "fetching cultural class");
        let response = self
            .send(
                self.client.get(&url),
                Failure::NotFound(format!("Failed to load cultural class with id {id}")),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn create_class(&self, dto: &CreateCulturalClassDto) -> Result<CulturalClass, ApiError> {
        let url = self.endpoint("/cultural-classes");
        debug!(%url, name = %dto.name, "creating cultural class");
        let response = self
            .send(
                self.client.post(&url).json(dto),
                Failure::Validation("Failed to create cultural class".into()),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn update_class(
        &self,
        id: i64,
        dto: &UpdateCulturalClassDto,
    ) -> Result<CulturalClass, ApiError> {
        let url = self.endpoint(&format!("/cultural-classes/{id}"));
        debug!(%url, "updating cultural class");
        let response = self
            .send(
                self.client.put(&url).json(dto),
                Failure::Validation("Failed to update cultural class".into()),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn delete_class(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/cultural-classes/{id}"));
        debug!(%url, "deleting cultural class");
        self.send(
            self.client.delete(&url),
            Failure::Conflict("Failed to delete cultural class".into()),
        )
        .await?;
        Ok(())
    }

    async fn create_enrollment(&self, dto: &CreateEnrollmentDto) -> Result<Enrollment, ApiError> {
        let url = self.endpoint("/enrollments");
        debug!(%url, class_id = dto.class_id, "creating enrollment");
        let response = self
            .send(
                self.client.post(&url).json(dto),
                Failure::Validation("Failed to create enrollment".into()),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn cancel_enrollment(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/enrollments/{id}"));
        debug!(%url, "cancelling enrollment");
        self.send(
            self.client.delete(&url),
            Failure::Conflict("Failed to cancel enrollment".into()),
        )
        .await?;
        Ok(())
    }

    async fn list_enrollments_by_class(&self, class_id: i64) -> Result<Vec<Enrollment>, ApiError> {
        let url = self.endpoint(&format!("/enrollments/class/{class_id}"));
        debug!(%url, "listing enrollments");
        let response = self
            .send(
                self.client.get(&url),
                Failure::Server(format!(
                    "Failed to load enrollments for class with id {class_id}"
                )),
            )
            .await?;
        Ok(response.json().await?)
    }
}
