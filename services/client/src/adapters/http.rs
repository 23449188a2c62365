//! services/client/src/adapters/http.rs
//!
//! This module contains the adapter for the remote course backend.
//! It implements both the `CourseCatalogService` and `QuestionAnsweringService`
//! ports over HTTP/JSON.

use crate::adapters::wire::{AnswerDto, AskBody, CourseDto, FileDto};
use async_trait::async_trait;
use coursehub_core::domain::{AcademicContext, AskRequest, Course, CourseFile, FileQuery};
use coursehub_core::ports::{
    CourseCatalogService, PortError, PortResult, QuestionAnsweringService,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that talks to the course backend with `reqwest`.
///
/// No timeout is configured beyond the client default, and nothing is retried.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` rooted at `base_url`.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("coursehub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortError::Unexpected(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> PortResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        debug!(bytes = bytes.len(), "Backend response received.");
        serde_json::from_slice(&bytes).map_err(|e| PortError::Decode(e.to_string()))
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl CourseCatalogService for HttpBackend {
    async fn list_courses(&self, context: &AcademicContext) -> PortResult<Vec<Course>> {
        let url = self.endpoint(&["courses"])?;
        let request = self.http.get(url).query(&context.query_pairs());
        let courses: Vec<CourseDto> = Self::fetch_json(request).await?;
        Ok(courses.into_iter().map(Course::from).collect())
    }

    async fn list_files(&self, query: &FileQuery) -> PortResult<Vec<CourseFile>> {
        let url = self.endpoint(&["courses", query.course_id.as_str(), "files"])?;
        let mut params = vec![("category", query.category.key())];
        params.extend(query.context.query_pairs());
        let request = self.http.get(url).query(&params);
        let files: Vec<FileDto> = Self::fetch_json(request).await?;
        Ok(files.into_iter().map(CourseFile::from).collect())
    }
}

#[async_trait]
impl QuestionAnsweringService for HttpBackend {
    async fn answer_question(&self, request: &AskRequest) -> PortResult<Option<String>> {
        let url = self.endpoint(&["ask"])?;
        let body = AskBody {
            course_id: &request.course_id,
            category: request.category.map(|c| c.key()),
            question: &request.question,
        };
        let answer: AnswerDto = Self::fetch_json(self.http.post(url).json(&body)).await?;
        Ok(answer.answer)
    }
}
