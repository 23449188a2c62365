//! services/client/src/adapters/wire.rs
//!
//! Defines the JSON message formats exchanged with the course backend, and their
//! conversions into the core domain types.

use coursehub_core::domain::{Course, CourseFile};
use serde::{Deserialize, Deserializer, Serialize};

//=========================================================================================
// Responses FROM the Backend
//=========================================================================================

/// One entry of `GET /courses`.
#[derive(Deserialize, Debug)]
pub struct CourseDto {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// One entry of `GET /courses/{id}/files`.
#[derive(Deserialize, Debug)]
pub struct FileDto {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub date: Option<String>,
}

/// The body of a `POST /ask` response. The answer field may be absent or null.
#[derive(Deserialize, Debug, Default)]
pub struct AnswerDto {
    #[serde(default)]
    pub answer: Option<String>,
}

//=========================================================================================
// Requests TO the Backend
//=========================================================================================

/// The body of `POST /ask`. `category` is serialized as `null` when unset.
#[derive(Serialize, Debug)]
pub struct AskBody<'a> {
    pub course_id: &'a str,
    pub category: Option<&'static str>,
    pub question: &'a str,
}

//=========================================================================================
// Conversions
//=========================================================================================

impl From<CourseDto> for Course {
    fn from(dto: CourseDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            code: dto.code,
        }
    }
}

impl From<FileDto> for CourseFile {
    fn from(dto: FileDto) -> Self {
        Self {
            id: dto.id,
            label: dto.label,
            url: dto.url,
            date: dto.date,
        }
    }
}

/// Ids are opaque; some backends emit them as numbers.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
