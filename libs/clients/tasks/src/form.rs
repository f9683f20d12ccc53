//! Create/edit form state with the same rules the server enforces, checked
//! before anything is sent.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::types::{CreateTaskInput, Task, TaskPriority, TaskStatus, UpdateTaskInput};

pub const TITLE_MAX_LEN: usize = 255;

/// Field name → first error message for that field.
pub type FormErrors = BTreeMap<String, String>;

/// Raw form fields as typed by the user. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct TaskForm {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    pub description: String,
    #[validate(custom(function = "validate_status"))]
    pub status: String,
    #[validate(custom(function = "validate_priority"))]
    pub priority: String,
    #[validate(custom(function = "validate_due_date"))]
    pub due_date: String,
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(error("required", "Title is required"));
    }
    if len > TITLE_MAX_LEN {
        return Err(error(
            "length",
            "Title must be at most 255 characters",
        ));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    parse_optional::<TaskStatus>(status)
        .map(|_| ())
        .map_err(|_| error("enum", "Status must be one of PENDING, IN_PROGRESS, COMPLETED, CANCELLED"))
}

fn validate_priority(priority: &str) -> Result<(), ValidationError> {
    parse_optional::<TaskPriority>(priority)
        .map(|_| ())
        .map_err(|_| error("enum", "Priority must be one of LOW, MEDIUM, HIGH"))
}

fn validate_due_date(due_date: &str) -> Result<(), ValidationError> {
    parse_due_date(due_date)
        .map(|_| ())
        .map_err(|_| error("date", "Due date must be a valid date (YYYY-MM-DD or RFC 3339)"))
}

fn parse_optional<T: std::str::FromStr>(raw: &str) -> Result<Option<T>, T::Err> {
    let raw = raw.trim();
    if raw.is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

/// Accepts a full RFC 3339 timestamp or a bare date (midnight UTC).
pub fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
    Ok(date.and_hms_opt(0, 0, 0).map(|at| at.and_utc()))
}

fn collect(errors: &ValidationErrors) -> FormErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

fn optional_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

impl TaskForm {
    /// Prefill for editing an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.to_string(),
            priority: task.priority.map(|p| p.to_string()).unwrap_or_default(),
            due_date: task.due_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
        }
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(|e| collect(&e))
    }

    pub fn to_create_input(&self) -> Result<CreateTaskInput, FormErrors> {
        self.check()?;
        Ok(CreateTaskInput {
            title: self.title.trim().to_string(),
            description: optional_text(&self.description),
            status: parse_optional(&self.status).ok().flatten(),
            priority: parse_optional(&self.priority).ok().flatten(),
            due_date: parse_due_date(&self.due_date).ok().flatten(),
        })
    }

    /// Build an update that only carries fields that differ from `original`.
    ///
    /// Blank optional fields that were previously set are sent as `null`.
    pub fn to_update_input(&self, original: &Task) -> Result<UpdateTaskInput, FormErrors> {
        self.check()?;

        let status = match parse_optional::<TaskStatus>(&self.status).ok().flatten() {
            Some(status) => status,
            None => {
                let mut errors = FormErrors::new();
                errors.insert("status".to_string(), "Status is required".to_string());
                return Err(errors);
            }
        };

        let description = optional_text(&self.description);
        let priority = parse_optional(&self.priority).ok().flatten();
        let due_date = parse_due_date(&self.due_date).ok().flatten();

        Ok(UpdateTaskInput {
            title: self.title.trim().to_string(),
            status,
            description: (description != original.description).then_some(description),
            priority: (priority != original.priority).then_some(priority),
            due_date: (due_date != original.due_date).then_some(due_date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn stored() -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            title: "Buy milk".to_string(),
            description: Some("2 litres".to_string()),
            status: TaskStatus::Pending,
            priority: Some(TaskPriority::Low),
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_requires_title() {
        let errors = TaskForm::default().to_create_input().unwrap_err();
        assert_eq!(errors["title"], "Title is required");

        let form = TaskForm {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert!(form.to_create_input().is_err());
    }

    #[test]
    fn test_title_length_boundary() {
        let ok = TaskForm {
            title: "a".repeat(255),
            ..Default::default()
        };
        assert!(ok.check().is_ok());

        let too_long = TaskForm {
            title: "a".repeat(256),
            ..Default::default()
        };
        assert!(too_long.check().unwrap_err().contains_key("title"));
    }

    #[test]
    fn test_create_parses_optional_fields() {
        let form = TaskForm {
            title: " Buy milk ".to_string(),
            status: "in_progress".to_string(),
            priority: "high".to_string(),
            due_date: "2030-01-02".to_string(),
            ..Default::default()
        };
        let input = form.to_create_input().unwrap();
        assert_eq!(input.title, "Buy milk");
        assert_eq!(input.description, None);
        assert_eq!(input.status, Some(TaskStatus::InProgress));
        assert_eq!(input.priority, Some(TaskPriority::High));
        assert_eq!(
            input.due_date.map(|d| d.to_rfc3339()),
            Some("2030-01-02T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_bad_enum_and_date_are_reported_per_field() {
        let form = TaskForm {
            title: "x".to_string(),
            status: "DONE".to_string(),
            priority: "URGENT".to_string(),
            due_date: "next week".to_string(),
            ..Default::default()
        };
        let errors = form.check().unwrap_err();
        assert!(errors.contains_key("status"));
        assert!(errors.contains_key("priority"));
        assert!(errors.contains_key("due_date"));
        assert!(!errors.contains_key("title"));
    }

    #[test]
    fn test_update_requires_status() {
        let form = TaskForm {
            title: "x".to_string(),
            ..Default::default()
        };
        let errors = form.to_update_input(&stored()).unwrap_err();
        assert_eq!(errors["status"], "Status is required");
    }

    #[test]
    fn test_update_sends_only_changes() {
        let task = stored();
        let mut form = TaskForm::from_task(&task);
        form.status = "COMPLETED".to_string();
        form.description.clear();

        let input = form.to_update_input(&task).unwrap();
        assert_eq!(input.status, TaskStatus::Completed);
        // Cleared field becomes an explicit null
        assert_eq!(input.description, Some(None));
        // Unchanged fields are left out
        assert_eq!(input.priority, None);
        assert_eq!(input.due_date, None);
    }
}
