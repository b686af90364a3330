use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CulturalClassCategory {
    Dance,
    Theater,
    Singing,
    Instruments,
}

impl CulturalClassCategory {
    pub const ALL: [CulturalClassCategory; 4] = [
        CulturalClassCategory::Dance,
        CulturalClassCategory::Theater,
        CulturalClassCategory::Singing,
        CulturalClassCategory::Instruments,
    ];

    /// Wire name, as the API sends and expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            CulturalClassCategory::Dance => "DANCE",
            CulturalClassCategory::Theater => "THEATER",
            CulturalClassCategory::Singing => "SINGING",
            CulturalClassCategory::Instruments => "INSTRUMENTS",
        }
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Colour of the category badge in the class table.
    pub fn badge_color(&self) -> &'static str {
        match self {
            CulturalClassCategory::Dance => "blue",
            CulturalClassCategory::Theater => "purple",
            CulturalClassCategory::Singing => "green",
            CulturalClassCategory::Instruments => "orange",
        }
    }
}

impl fmt::Display for CulturalClassCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for CulturalClassCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CulturalClass {
    pub id: i64,
    #[schema(example = "Salsa Nivel 1")]
    pub name: String,
    pub category: CulturalClassCategory,
    pub max_capacity: i32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64, example = 1767290400000i64)]
    pub start_date_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64, example = 1767294000000i64)]
    pub end_date_time: DateTime<Utc>,
    /// Computed by the server from capacity and cancellation.
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCulturalClassDto {
    pub name: String,
    pub category: CulturalClassCategory,
    pub max_capacity: i32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub start_date_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub end_date_time: DateTime<Utc>,
}

/// Partial update. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCulturalClassDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CulturalClassCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i32>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl From<CreateCulturalClassDto> for UpdateCulturalClassDto {
    fn from(dto: CreateCulturalClassDto) -> Self {
        Self {
            name: Some(dto.name),
            category: Some(dto.category),
            max_capacity: Some(dto.max_capacity),
            start_date_time: Some(dto.start_date_time),
            end_date_time: Some(dto.end_date_time),
            available: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i64,
    #[schema(example = "Juan Pérez")]
    pub student_name: String,
    pub class_id: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub enrollment_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentDto {
    pub student_name: String,
    pub class_id: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub enrollment_date_time: DateTime<Utc>,
}
