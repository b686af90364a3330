use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::client::CulturalApi;
use crate::models::{CulturalClass, UpdateCulturalClassDto};
use crate::validation::{ClassForm, today, validate_class};
use crate::view::{ListState, ListStatus, Notification, Notifications};

/// Modal axis of the classes page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClassDialog {
    Closed,
    Form { editing: Option<CulturalClass> },
    ConfirmDelete { id: i64 },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassRow {
    #[serde(flatten)]
    pub class: CulturalClass,
    pub category_label: String,
    pub badge_color: String,
    pub deletable: bool,
}

impl From<&CulturalClass> for ClassRow {
    fn from(class: &CulturalClass) -> Self {
        Self {
            class: class.clone(),
            category_label: class.category.label(),
            badge_color: class.category.badge_color().to_string(),
            deletable: class.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassesView {
    pub status: ListStatus,
    pub error: Option<String>,
    pub classes: Vec<ClassRow>,
    pub dialog: ClassDialog,
    /// Initial values for the open form, if any.
    pub form: Option<ClassForm>,
    pub notifications: Vec<Notification>,
}

pub struct ClassesPage {
    api: Arc<dyn CulturalApi>,
    classes: ListState<CulturalClass>,
    dialog: ClassDialog,
    notifications: Notifications,
}

impl ClassesPage {
    pub fn new(api: Arc<dyn CulturalApi>) -> Self {
        Self {
            api,
            classes: ListState::default(),
            dialog: ClassDialog::Closed,
            notifications: Notifications::default(),
        }
    }

    pub fn status(&self) -> ListStatus {
        self.classes.status()
    }

    pub fn classes(&self) -> &[CulturalClass] {
        self.classes.items()
    }

    pub fn dialog(&self) -> &ClassDialog {
        &self.dialog
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.pending()
    }

    fn find(&self, id: i64) -> Option<&CulturalClass> {
        self.classes.items().iter().find(|class| class.id == id)
    }

    /// Deletion is only offered for available classes.
    pub fn can_delete(&self, id: i64) -> bool {
        self.find(id).is_some_and(|class| class.available)
    }

    /// Runs on every visit; the list is always fetched fresh.
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        self.classes.begin_loading();
        let result = self.api.list_classes().await;
        if let Err(err) = self.classes.finish(result) {
            warn!(error = %err, "failed to load cultural classes");
            self.notifications
                .error(format!("Error loading classes: {}", err.message()));
        }
    }

    pub fn open_create(&mut self) {
        self.dialog = ClassDialog::Form { editing: None };
    }

    pub fn open_edit(&mut self, id: i64) {
        match self.find(id).cloned() {
            Some(class) => {
                self.dialog = ClassDialog::Form {
                    editing: Some(class),
                }
            }
            None => self
                .notifications
                .error(format!("Class {id} is not in the list")),
        }
    }

    pub fn close_form(&mut self) {
        if matches!(self.dialog, ClassDialog::Form { .. }) {
            self.dialog = ClassDialog::Closed;
        }
    }

    /// Validates and saves the open form. Returns whether the class was saved.
    pub async fn submit(&mut self, form: &ClassForm) -> bool {
        let editing = match &self.dialog {
            ClassDialog::Form { editing } => editing.clone(),
            _ => {
                self.notifications.error("No class form is open");
                return false;
            }
        };

        let dto = match validate_class(form, today(), editing.as_ref()) {
            Ok(dto) => dto,
            Err(err) => {
                self.notifications.error(err.to_string());
                return false;
            }
        };

        let saved = match &editing {
            Some(class) => {
                let update = UpdateCulturalClassDto::from(dto);
                self.api
                    .update_class(class.id, &update)
                    .await
                    .map(|saved| (saved, "Class updated successfully"))
            }
            None => self
                .api
                .create_class(&dto)
                .await
                .map(|saved| (saved, "Class created successfully")),
        };

        match saved {
            Ok((class, message)) => {
                info!(id = class.id, name = %class.name, "cultural class saved");
                self.notifications.success(message);
                self.dialog = ClassDialog::Closed;
                self.refresh().await;
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to save cultural class");
                self.notifications
                    .error(format!("Error saving class: {}", err.message()));
                false
            }
        }
    }

    pub fn request_delete(&mut self, id: i64) {
        if self.can_delete(id) {
            self.dialog = ClassDialog::ConfirmDelete { id };
        } else {
            self.notifications
                .error(format!("Class {id} cannot be deleted"));
        }
    }

    pub fn dismiss_confirmation(&mut self) {
        if matches!(self.dialog, ClassDialog::ConfirmDelete { .. }) {
            self.dialog = ClassDialog::Closed;
        }
    }

    pub async fn confirm_delete(&mut self) {
        let ClassDialog::ConfirmDelete { id } = self.dialog else {
            self.notifications.error("No deletion is awaiting confirmation");
            return;
        };
        self.dialog = ClassDialog::Closed;

        match self.api.delete_class(id).await {
            Ok(()) => {
                info!(id, "cultural class deleted");
                self.notifications.success("Class deleted successfully");
                self.refresh().await;
            }
            Err(err) => {
                warn!(id, error = %err, "failed to delete cultural class");
                self.notifications
                    .error(format!("Error deleting class: {}", err.message()));
            }
        }
    }

    /// Current view. Pending notifications are handed out once.
    pub fn snapshot(&mut self) -> ClassesView {
        let form = match &self.dialog {
            ClassDialog::Form { editing: Some(class) } => Some(ClassForm::for_class(class)),
            ClassDialog::Form { editing: None } => Some(ClassForm::blank()),
            _ => None,
        };
        ClassesView {
            status: self.classes.status(),
            error: self.classes.error().map(str::to_string),
            classes: self.classes.items().iter().map(ClassRow::from).collect(),
            dialog: self.dialog.clone(),
            form,
            notifications: self.notifications.drain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use http::StatusCode;

    use super::*;
    use crate::error::ApiError;
    use crate::models::{CulturalClassCategory, Enrollment};
    use crate::pages::fake::FakeApi;
    use crate::view::NotificationLevel;

    fn tomorrow_at(hour: u32) -> DateTime<Utc> {
        let date = Local::now().date_naive().succ_opt().unwrap();
        Local
            .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn class(id: i64, name: &str, available: bool) -> CulturalClass {
        let start = tomorrow_at(10);
        CulturalClass {
            id,
            name: name.to_string(),
            category: CulturalClassCategory::Theater,
            max_capacity: 8,
            start_date_time: start,
            end_date_time: start + Duration::hours(2),
            available,
        }
    }

    fn salsa_form() -> ClassForm {
        let start = tomorrow_at(18);
        ClassForm {
            name: "Salsa Nivel 1".to_string(),
            category: Some("DANCE".to_string()),
            max_capacity: Some(10),
            start_date_time: Some(start),
            end_date_time: Some(start + Duration::milliseconds(3_600_000)),
        }
    }

    fn page(api: &Arc<FakeApi>) -> ClassesPage {
        ClassesPage::new(api.clone())
    }

    #[tokio::test]
    async fn test_every_visit_refetches() {
        let api = Arc::new(FakeApi::with_classes(vec![class(1, "Teatro", true)]));
        let mut page = page(&api);
        assert_eq!(page.status(), ListStatus::Idle);

        page.mount().await;
        assert_eq!(page.classes().len(), 1);

        api.add_class(class(2, "Coro", true));
        page.mount().await;

        assert_eq!(page.status(), ListStatus::Loaded);
        assert_eq!(page.classes().len(), 2);
        assert_eq!(api.calls(), vec!["list_classes", "list_classes"]);
    }

    #[tokio::test]
    async fn test_snapshot_lists_every_row() {
        let classes = (1..=15).map(|id| class(id, "Teatro", true)).collect();
        let api = Arc::new(FakeApi::with_classes(classes));
        let mut page = page(&api);
        page.mount().await;

        assert_eq!(page.snapshot().classes.len(), 15);
    }

    #[tokio::test]
    async fn test_listing_twice_is_stable() {
        let api = Arc::new(FakeApi::with_classes(vec![
            class(1, "Teatro", true),
            class(2, "Coro", false),
        ]));
        let mut page = page(&api);
        page.refresh().await;
        let first = page.classes().to_vec();
        page.refresh().await;
        assert_eq!(first, page.classes());
    }

    #[tokio::test]
    async fn test_mount_failure_is_error_state() {
        let api = Arc::new(FakeApi::default());
        api.fail_next(ApiError::Server {
            status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            message: "Failed to load cultural classes".into(),
        });
        let mut page = page(&api);
        page.mount().await;

        let view = page.snapshot();
        assert_eq!(view.status, ListStatus::Error);
        assert_eq!(view.error.as_deref(), Some("Failed to load cultural classes"));
        assert_eq!(view.notifications.len(), 1);
        assert_eq!(view.notifications[0].level, NotificationLevel::Error);
        assert!(page.snapshot().notifications.is_empty());
    }

    #[tokio::test]
    async fn test_create_class() {
        let api = Arc::new(FakeApi::default());
        let mut page = page(&api);
        page.mount().await;
        page.open_create();
        assert_eq!(page.dialog(), &ClassDialog::Form { editing: None });

        assert!(page.submit(&salsa_form()).await);

        assert_eq!(page.dialog(), &ClassDialog::Closed);
        let created = &page.classes()[0];
        assert_eq!(created.name, "Salsa Nivel 1");
        assert!(created.available);
        assert_eq!(
            api.calls(),
            vec!["list_classes", "create_class Salsa Nivel 1", "list_classes"]
        );
        assert_eq!(
            page.notifications().last().unwrap().message,
            "Class created successfully"
        );
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_call() {
        let api = Arc::new(FakeApi::default());
        let mut page = page(&api);
        page.open_create();

        let mut form = salsa_form();
        form.end_date_time = form.start_date_time;
        assert!(!page.submit(&form).await);

        let mut form = salsa_form();
        form.name = "Sa".to_string();
        assert!(!page.submit(&form).await);

        assert!(api.calls().is_empty());
        assert!(matches!(page.dialog(), ClassDialog::Form { .. }));
        let view = page.snapshot();
        assert_eq!(view.notifications.len(), 2);
        assert!(view.notifications[0].message.contains("after the start"));
    }

    #[tokio::test]
    async fn test_submit_without_open_form() {
        let api = Arc::new(FakeApi::default());
        let mut page = page(&api);
        assert!(!page.submit(&salsa_form()).await);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_class() {
        let api = Arc::new(FakeApi::with_classes(vec![class(3, "Teatro", true)]));
        let mut page = page(&api);
        page.mount().await;
        page.open_edit(3);

        let view = page.snapshot();
        let form = view.form.expect("edit form is prefilled");
        assert_eq!(form.name, "Teatro");
        assert_eq!(form.max_capacity, Some(8));

        let mut form = form;
        form.name = "Teatro Avanzado".to_string();
        assert!(page.submit(&form).await);
        assert_eq!(page.classes()[0].name, "Teatro Avanzado");
        assert!(api.calls().contains(&"update_class 3".to_string()));
    }

    #[tokio::test]
    async fn test_edit_unknown_class() {
        let api = Arc::new(FakeApi::default());
        let mut page = page(&api);
        page.mount().await;
        page.open_edit(42);
        assert_eq!(page.dialog(), &ClassDialog::Closed);
        assert_eq!(page.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_form_open() {
        let api = Arc::new(FakeApi::default());
        let mut page = page(&api);
        page.mount().await;
        page.open_create();
        api.fail_next(ApiError::Validation {
            status: StatusCode::BAD_REQUEST,
            message: "Name already taken".into(),
        });

        assert!(!page.submit(&salsa_form()).await);

        assert!(matches!(page.dialog(), ClassDialog::Form { editing: None }));
        assert_eq!(
            page.notifications().last().unwrap().message,
            "Error saving class: Name already taken"
        );
    }

    #[tokio::test]
    async fn test_unavailable_class_not_deletable() {
        let api = Arc::new(FakeApi::with_classes(vec![
            class(1, "Teatro", true),
            class(2, "Coro", false),
        ]));
        let mut page = page(&api);
        page.mount().await;

        let view = page.snapshot();
        assert!(view.classes[0].deletable);
        assert!(!view.classes[1].deletable);

        page.request_delete(2);
        assert_eq!(page.dialog(), &ClassDialog::Closed);
        page.confirm_delete().await;
        assert!(!api.calls().iter().any(|c| c.starts_with("delete_class")));
    }

    #[tokio::test]
    async fn test_delete_after_confirmation() {
        let api = Arc::new(FakeApi::with_classes(vec![class(1, "Teatro", true)]));
        let mut page = page(&api);
        page.mount().await;

        page.request_delete(1);
        assert_eq!(page.dialog(), &ClassDialog::ConfirmDelete { id: 1 });
        page.dismiss_confirmation();
        assert_eq!(page.dialog(), &ClassDialog::Closed);
        assert_eq!(api.calls(), vec!["list_classes"]);

        page.request_delete(1);
        page.confirm_delete().await;
        assert_eq!(page.dialog(), &ClassDialog::Closed);
        assert!(page.classes().is_empty());
        assert_eq!(
            api.calls(),
            vec!["list_classes", "delete_class 1", "list_classes"]
        );
    }

    #[tokio::test]
    async fn test_delete_conflict_keeps_list() {
        let api = Arc::new(FakeApi::with_classes(vec![class(1, "Teatro", true)]));
        api.add_enrollment(Enrollment {
            id: 10,
            student_name: "Ana María".into(),
            class_id: 1,
            enrollment_date_time: Utc::now(),
        });
        let mut page = page(&api);
        page.mount().await;

        page.request_delete(1);
        page.confirm_delete().await;

        assert_eq!(page.dialog(), &ClassDialog::Closed);
        assert_eq!(page.classes().len(), 1);
        assert_eq!(page.status(), ListStatus::Loaded);
        assert_eq!(
            page.notifications().last().unwrap().message,
            "Error deleting class: Class has active enrollments"
        );
    }

    #[tokio::test]
    async fn test_refetch_failure_keeps_stale_rows() {
        let api = Arc::new(FakeApi::with_classes(vec![class(1, "Teatro", true)]));
        let mut page = page(&api);
        page.mount().await;
        api.fail_next(ApiError::Server {
            status: None,
            message: "down".into(),
        });
        page.refresh().await;
        assert_eq!(page.status(), ListStatus::Loaded);
        assert_eq!(page.classes().len(), 1);
    }
}
