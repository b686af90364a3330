//! View-state pieces shared by both pages.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// The list-fetch axis of a page.
///
/// A failed refetch keeps the previously loaded items (status stays
/// `Loaded`); only a list that never loaded ends up in `Error`.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    status: ListStatus,
    items: Vec<T>,
    error: Option<String>,
    has_loaded: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            status: ListStatus::Idle,
            items: Vec::new(),
            error: None,
            has_loaded: false,
        }
    }
}

impl<T> ListState<T> {
    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_loading(&mut self) {
        self.status = ListStatus::Loading;
    }

    pub fn finish(&mut self, result: Result<Vec<T>, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(items) => {
                self.items = items;
                self.status = ListStatus::Loaded;
                self.error = None;
                self.has_loaded = true;
                Ok(())
            }
            Err(err) => {
                if self.has_loaded {
                    self.status = ListStatus::Loaded;
                } else {
                    self.status = ListStatus::Error;
                    self.error = Some(err.message());
                }
                Err(err)
            }
        }
    }

    /// Back to `Idle` with nothing displayed.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message shown once to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub(crate) struct Notifications(Vec<Notification>);

impl Notifications {
    pub(crate) fn success(&mut self, message: impl Into<String>) {
        self.0.push(Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        });
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.0.push(Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        });
    }

    pub(crate) fn pending(&self) -> &[Notification] {
        &self.0
    }

    pub(crate) fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.0)
    }
}
