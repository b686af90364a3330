use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::client::CulturalApi;
use crate::error::ApiError;
use crate::models::{CulturalClass, Enrollment};
use crate::validation::{EnrollmentForm, today, validate_enrollment};
use crate::view::{ListState, ListStatus, Notification, Notifications};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EnrollmentDialog {
    Closed,
    Form,
    ConfirmCancel { id: i64 },
}

/// An enrollment fetch that has been issued but not yet applied.
///
/// Only the most recently issued fetch is applied; anything older is
/// dropped by [`EnrollmentsPage::apply_enrollments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct EnrollmentFetch {
    class_id: i64,
    seq: u64,
}

impl EnrollmentFetch {
    pub fn class_id(&self) -> i64 {
        self.class_id
    }

    pub async fn run(&self, api: &dyn CulturalApi) -> Result<Vec<Enrollment>, ApiError> {
        api.list_enrollments_by_class(self.class_id).await
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentsView {
    pub selected_class_id: Option<i64>,
    pub classes_status: ListStatus,
    pub classes: Vec<CulturalClass>,
    pub status: ListStatus,
    pub error: Option<String>,
    pub enrollments: Vec<Enrollment>,
    pub empty_text: String,
    pub dialog: EnrollmentDialog,
    pub form: Option<EnrollmentForm>,
    pub notifications: Vec<Notification>,
}

pub struct EnrollmentsPage {
    api: Arc<dyn CulturalApi>,
    classes: ListState<CulturalClass>,
    enrollments: ListState<Enrollment>,
    selected_class_id: Option<i64>,
    /// Class whose enrollments are currently in the list.
    shown_class_id: Option<i64>,
    last_fetch: u64,
    dialog: EnrollmentDialog,
    notifications: Notifications,
}

impl EnrollmentsPage {
    pub fn new(api: Arc<dyn CulturalApi>) -> Self {
        Self {
            api,
            classes: ListState::default(),
            enrollments: ListState::default(),
            selected_class_id: None,
            shown_class_id: None,
            last_fetch: 0,
            dialog: EnrollmentDialog::Closed,
            notifications: Notifications::default(),
        }
    }

    pub fn api(&self) -> Arc<dyn CulturalApi> {
        self.api.clone()
    }

    pub fn classes(&self) -> &[CulturalClass] {
        self.classes.items()
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        self.enrollments.items()
    }

    pub fn status(&self) -> ListStatus {
        self.enrollments.status()
    }

    pub fn selected_class_id(&self) -> Option<i64> {
        self.selected_class_id
    }

    pub fn dialog(&self) -> &EnrollmentDialog {
        &self.dialog
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.pending()
    }

    /// Runs on every visit: reloads the class list used by the selector and
    /// the form, then the enrollments of the selected class.
    pub async fn mount(&mut self) {
        self.refresh_classes().await;
        self.reload_selected().await;
    }

    pub async fn refresh_classes(&mut self) {
        self.classes.begin_loading();
        let result = self.api.list_classes().await;
        if let Err(err) = self.classes.finish(result) {
            warn!(error = %err, "failed to load cultural classes");
            self.notifications
                .error(format!("Error loading cultural classes: {}", err.message()));
        }
    }

    fn begin_fetch(&mut self, class_id: i64) -> EnrollmentFetch {
        self.last_fetch += 1;
        self.enrollments.begin_loading();
        EnrollmentFetch {
            class_id,
            seq: self.last_fetch,
        }
    }

    /// Changes the selected class. Returns the fetch to run for the new
    /// selection; clearing the selection empties the list without one.
    pub fn select_class(&mut self, class_id: Option<i64>) -> Option<EnrollmentFetch> {
        self.selected_class_id = class_id;
        match class_id {
            Some(class_id) => Some(self.begin_fetch(class_id)),
            None => {
                // Invalidate whatever is still in flight.
                self.last_fetch += 1;
                self.enrollments.clear();
                self.shown_class_id = None;
                None
            }
        }
    }

    /// Applies the outcome of `fetch`. Returns false when a newer fetch has
    /// been issued since, in which case the result is dropped.
    pub fn apply_enrollments(
        &mut self,
        fetch: EnrollmentFetch,
        result: Result<Vec<Enrollment>, ApiError>,
    ) -> bool {
        if fetch.seq != self.last_fetch {
            debug!(
                class_id = fetch.class_id,
                seq = fetch.seq,
                latest = self.last_fetch,
                "dropping stale enrollment response"
            );
            return false;
        }
        match &result {
            Ok(_) => self.shown_class_id = Some(fetch.class_id),
            // Rows of another class must not stand in for this one.
            Err(_) if self.shown_class_id != Some(fetch.class_id) => {
                self.enrollments.clear();
                self.shown_class_id = None;
            }
            Err(_) => {}
        }
        if let Err(err) = self.enrollments.finish(result) {
            warn!(class_id = fetch.class_id, error = %err, "failed to load enrollments");
            self.notifications.error(format!(
                "Error loading enrollments for the class: {}",
                err.message()
            ));
        }
        true
    }

    pub async fn change_selection(&mut self, class_id: Option<i64>) {
        if let Some(fetch) = self.select_class(class_id) {
            let result = fetch.run(&*self.api).await;
            self.apply_enrollments(fetch, result);
        }
    }

    async fn reload_selected(&mut self) {
        if let Some(class_id) = self.selected_class_id {
            let fetch = self.begin_fetch(class_id);
            let result = fetch.run(&*self.api).await;
            self.apply_enrollments(fetch, result);
        }
    }

    pub fn open_form(&mut self) {
        self.dialog = EnrollmentDialog::Form;
    }

    pub fn close_form(&mut self) {
        if self.dialog == EnrollmentDialog::Form {
            self.dialog = EnrollmentDialog::Closed;
        }
    }

    /// Validates and submits the enrollment form. Returns whether the
    /// enrollment was created.
    pub async fn submit(&mut self, form: &EnrollmentForm) -> bool {
        if self.dialog != EnrollmentDialog::Form {
            self.notifications.error("No enrollment form is open");
            return false;
        }

        let dto = match validate_enrollment(form, self.classes.items(), today()) {
            Ok(dto) => dto,
            Err(err) => {
                self.notifications.error(err.to_string());
                return false;
            }
        };

        match self.api.create_enrollment(&dto).await {
            Ok(enrollment) => {
                info!(
                    id = enrollment.id,
                    class_id = enrollment.class_id,
                    "enrollment created"
                );
                self.notifications.success("Student enrolled successfully");
                self.dialog = EnrollmentDialog::Closed;
                if self.selected_class_id == Some(dto.class_id) {
                    self.reload_selected().await;
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to create enrollment");
                self.notifications
                    .error(format!("Error enrolling student: {}", err.message()));
                false
            }
        }
    }

    pub fn request_cancellation(&mut self, id: i64) {
        if self.enrollments.items().iter().any(|e| e.id == id) {
            self.dialog = EnrollmentDialog::ConfirmCancel { id };
        } else {
            self.notifications
                .error(format!("Enrollment {id} is not in the list"));
        }
    }

    pub fn dismiss_confirmation(&mut self) {
        if matches!(self.dialog, EnrollmentDialog::ConfirmCancel { .. }) {
            self.dialog = EnrollmentDialog::Closed;
        }
    }

    pub async fn confirm_cancellation(&mut self) {
        let EnrollmentDialog::ConfirmCancel { id } = self.dialog else {
            self.notifications
                .error("No cancellation is awaiting confirmation");
            return;
        };
        self.dialog = EnrollmentDialog::Closed;

        match self.api.cancel_enrollment(id).await {
            Ok(()) => {
                info!(id, "enrollment cancelled");
                self.notifications.success("Enrollment cancelled successfully");
                self.reload_selected().await;
            }
            Err(err) => {
                warn!(id, error = %err, "failed to cancel enrollment");
                self.notifications
                    .error(format!("Error cancelling enrollment: {}", err.message()));
            }
        }
    }

    /// Current view. Pending notifications are handed out once.
    pub fn snapshot(&mut self) -> EnrollmentsView {
        let empty_text = if self.selected_class_id.is_some() {
            "No enrollments for this class."
        } else {
            "Select a class to see its enrollments."
        };
        let form = (self.dialog == EnrollmentDialog::Form)
            .then(|| EnrollmentForm::starting_at(Utc::now()));
        EnrollmentsView {
            selected_class_id: self.selected_class_id,
            classes_status: self.classes.status(),
            classes: self.classes.items().to_vec(),
            status: self.enrollments.status(),
            error: self.enrollments.error().map(str::to_string),
            enrollments: self.enrollments.items().to_vec(),
            empty_text: empty_text.to_string(),
            dialog: self.dialog.clone(),
            form,
            notifications: self.notifications.drain(),
        }
    }
}
