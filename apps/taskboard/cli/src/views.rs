//! Plain-text rendering of store state.

use std::fmt::{self, Write};
use tasks_client::{FormErrors, Pagination, Task, TaskFilters, TaskForm, TaskState};

const TITLE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// One-line notification for the outcome of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.kind {
            ToastKind::Success => "✔",
            ToastKind::Error => "✖",
        };
        write!(f, "{} {}", icon, self.message)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

fn filter_summary(filters: &TaskFilters) -> Option<String> {
    if filters.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    if let Some(status) = filters.status {
        parts.push(format!("status={}", status));
    }
    if let Some(priority) = filters.priority {
        parts.push(format!("priority={}", priority));
    }
    if let Some(ref search) = filters.search {
        parts.push(format!("search={:?}", search));
    }
    Some(format!("Filters: {}", parts.join(" ")))
}

fn pagination_footer(pagination: &Pagination) -> String {
    let noun = if pagination.total == 1 { "task" } else { "tasks" };
    format!(
        "Page {} of {} ({} {})",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total,
        noun
    )
}

/// Task table with filter summary and pagination footer.
pub fn render_list(state: &TaskState) -> String {
    let mut out = String::new();

    if let Some(summary) = filter_summary(&state.filters) {
        let _ = writeln!(out, "{}", summary);
    }

    if state.tasks.is_empty() {
        let _ = writeln!(out, "No tasks found.");
    } else {
        let _ = writeln!(
            out,
            "{:<36}  {:<w$}  {:<11}  {:<8}  {:<10}",
            "ID",
            "TITLE",
            "STATUS",
            "PRIORITY",
            "DUE",
            w = TITLE_WIDTH
        );
        for task in &state.tasks {
            let _ = writeln!(
                out,
                "{:<36}  {:<w$}  {:<11}  {:<8}  {:<10}",
                task.id,
                truncate(&task.title, TITLE_WIDTH),
                task.status.label(),
                task.priority.map(|p| p.label()).unwrap_or("-"),
                task.due_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                w = TITLE_WIDTH
            );
        }
    }

    let _ = write!(out, "{}", pagination_footer(&state.pagination));
    out
}

pub fn render_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", task.title);
    let _ = writeln!(out, "{}", "=".repeat(task.title.chars().count().min(60)));
    let _ = writeln!(out, "ID:          {}", task.id);
    let _ = writeln!(out, "Status:      {}", task.status.label());
    let _ = writeln!(
        out,
        "Priority:    {}",
        task.priority.map(|p| p.label()).unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "Due:         {}",
        task.due_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(out, "Created:     {}", task.created_at.to_rfc3339());
    let _ = writeln!(out, "Updated:     {}", task.updated_at.to_rfc3339());
    if let Some(ref description) = task.description {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", description);
    }
    out.trim_end().to_string()
}

/// The form as submitted, with a message under each invalid field.
pub fn render_form(heading: &str, form: &TaskForm, errors: &FormErrors) -> String {
    let fields = [
        ("title", "Title", &form.title),
        ("description", "Description", &form.description),
        ("status", "Status", &form.status),
        ("priority", "Priority", &form.priority),
        ("due_date", "Due date", &form.due_date),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);
    for (key, label, value) in fields {
        let shown = if value.is_empty() { "-" } else { value.as_str() };
        let _ = writeln!(out, "  {:<12} {}", format!("{}:", label), shown);
        if let Some(message) = errors.get(key) {
            let _ = writeln!(out, "  {:<12} ↳ {}", "", message);
        }
    }
    out.trim_end().to_string()
}

/// Inline page-level error with the command that retries the view.
pub fn render_page_error(message: &str, retry_command: &str) -> String {
    format!("Error: {}\nRetry with: {}", message, retry_command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tasks_client::{TaskPriority, TaskStatus};

    const SAMPLE_ID: &str = "0191f2c4-8c1e-7b4a-9a51-3c0e2d7f1a10";

    fn task(title: &str) -> Task {
        let at = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        Task {
            id: SAMPLE_ID.parse().unwrap(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: Some(TaskPriority::High),
            due_date: Some(at),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_list_shows_rows_filters_and_footer() {
        let state = TaskState {
            tasks: vec![task("Buy milk")],
            filters: TaskFilters {
                status: Some(TaskStatus::InProgress),
                search: Some("milk".to_string()),
                ..Default::default()
            },
            pagination: Pagination {
                page: 2,
                limit: 10,
                total: 11,
                total_pages: 2,
            },
            ..Default::default()
        };

        let out = render_list(&state);
        assert!(out.starts_with("Filters: status=IN_PROGRESS search=\"milk\""));
        assert!(out.contains("Buy milk"));
        assert!(out.contains("In progress"));
        assert!(out.contains("2030-01-02"));
        assert!(out.ends_with("Page 2 of 2 (11 tasks)"));
    }

    #[test]
    fn test_empty_list() {
        let out = render_list(&TaskState::default());
        assert!(out.contains("No tasks found."));
        assert!(out.ends_with("Page 1 of 1 (0 tasks)"));
        assert!(!out.contains("Filters:"));
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let long = "x".repeat(100);
        let out = render_list(&TaskState {
            tasks: vec![task(&long)],
            ..Default::default()
        });
        assert!(!out.contains(&long));
        assert!(out.contains('…'));
    }

    #[test]
    fn test_detail() {
        let mut t = task("Buy milk");
        t.description = Some("2 litres".to_string());
        let out = render_detail(&t);
        assert!(out.starts_with("Buy milk\n========"));
        assert!(out.contains("Priority:    High"));
        assert!(out.ends_with("2 litres"));
    }

    #[test]
    fn test_form_errors_sit_under_their_field() {
        let form = TaskForm {
            status: "DONE".to_string(),
            ..Default::default()
        };
        let mut errors = FormErrors::new();
        errors.insert("title".to_string(), "Title is required".to_string());

        let out = render_form("New task", &form, &errors);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "New task");
        assert!(lines[1].contains("Title:"));
        assert!(lines[2].contains("↳ Title is required"));
        assert!(out.contains("DONE"));
    }

    #[test]
    fn test_toast_and_page_error() {
        assert_eq!(Toast::success("Task created").to_string(), "✔ Task created");
        assert_eq!(Toast::error("Boom").to_string(), "✖ Boom");
        assert_eq!(
            render_page_error("Network error", "taskboard list"),
            "Error: Network error\nRetry with: taskboard list"
        );
    }
}
