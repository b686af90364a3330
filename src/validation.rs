use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{
    CreateCulturalClassDto, CreateEnrollmentDto, CulturalClass, CulturalClassCategory,
};

pub const MIN_NAME_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("unknown category '{0}', expected one of DANCE, THEATER, SINGING, INSTRUMENTS")]
    UnknownCategory(String),
    #[error("capacity must be greater than 0")]
    CapacityTooLow,
    #[error("start date cannot be earlier than today")]
    StartInPast,
    #[error("end date and time must be after the start date and time")]
    EndNotAfterStart,
    #[error("class {0} is not one of the loaded classes")]
    UnknownClass(i64),
    #[error("enrollment date cannot be later than today")]
    EnrollmentInFuture,
}

/// Class form as typed by the user, before any rule has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub max_capacity: Option<i32>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schema(value_type = Option<i64>)]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schema(value_type = Option<i64>)]
    pub end_date_time: Option<DateTime<Utc>>,
}

impl ClassForm {
    /// Initial values of the "create class" form.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            category: Some(CulturalClassCategory::Dance.as_str().to_string()),
            max_capacity: Some(1),
            start_date_time: None,
            end_date_time: None,
        }
    }

    pub fn for_class(class: &CulturalClass) -> Self {
        Self {
            name: class.name.clone(),
            category: Some(class.category.as_str().to_string()),
            max_capacity: Some(class.max_capacity),
            start_date_time: Some(class.start_date_time),
            end_date_time: Some(class.end_date_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentForm {
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schema(value_type = Option<i64>)]
    pub enrollment_date_time: Option<DateTime<Utc>>,
}

impl EnrollmentForm {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            student_name: String::new(),
            class_id: None,
            enrollment_date_time: Some(now),
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

fn validate_name(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(FormError::TooShort {
            field,
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

/// Checks a class form. `editing` is the class being edited, if any: its
/// start may already lie in the past as long as the form leaves it alone.
pub fn validate_class(
    form: &ClassForm,
    today: NaiveDate,
    editing: Option<&CulturalClass>,
) -> Result<CreateCulturalClassDto, FormError> {
    let name = validate_name("name", &form.name)?;

    let category = form
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or(FormError::Required("category"))?;
    let category = category
        .parse::<CulturalClassCategory>()
        .map_err(|err| FormError::UnknownCategory(err.0))?;

    let max_capacity = form
        .max_capacity
        .ok_or(FormError::Required("maxCapacity"))?;
    if max_capacity < 1 {
        return Err(FormError::CapacityTooLow);
    }

    let start = form
        .start_date_time
        .ok_or(FormError::Required("startDateTime"))?;
    let end = form
        .end_date_time
        .ok_or(FormError::Required("endDateTime"))?;

    let start_unchanged = editing.is_some_and(|class| class.start_date_time == start);
    if !start_unchanged && local_date(start) < today {
        return Err(FormError::StartInPast);
    }
    if end <= start {
        return Err(FormError::EndNotAfterStart);
    }

    Ok(CreateCulturalClassDto {
        name,
        category,
        max_capacity,
        start_date_time: start,
        end_date_time: end,
    })
}

pub fn validate_enrollment(
    form: &EnrollmentForm,
    classes: &[CulturalClass],
    today: NaiveDate,
) -> Result<CreateEnrollmentDto, FormError> {
    let student_name = validate_name("studentName", &form.student_name)?;

    let class_id = form.class_id.ok_or(FormError::Required("classId"))?;
    if !classes.iter().any(|class| class.id == class_id) {
        return Err(FormError::UnknownClass(class_id));
    }

    let enrolled_at = form
        .enrollment_date_time
        .ok_or(FormError::Required("enrollmentDateTime"))?;
    if local_date(enrolled_at) > today {
        return Err(FormError::EnrollmentInFuture);
    }

    Ok(CreateEnrollmentDto {
        student_name,
        class_id,
        enrollment_date_time: enrolled_at,
    })
}
