//! One function per command. Each drives the store and renders the screen
//! the user ends up on.

use clap::Args;
use tasks_client::store::{
    CREATE_TASK_FAILED, DELETE_TASK_FAILED, FETCH_TASK_FAILED, UPDATE_TASK_FAILED,
};
use tasks_client::{
    FormErrors, TaskApi, TaskFilters, TaskForm, TaskPriority, TaskQuery, TaskStatus, TaskStore,
};

use crate::views::{Toast, render_detail, render_form, render_list, render_page_error};

/// Rendered output and whether the command succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub output: String,
    pub ok: bool,
}

impl Screen {
    fn ok(output: String) -> Self {
        Self { output, ok: true }
    }

    fn failed(output: String) -> Self {
        Self { output, ok: false }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// PENDING, IN_PROGRESS, COMPLETED or CANCELLED
    #[arg(short, long)]
    pub status: Option<TaskStatus>,

    /// LOW, MEDIUM or HIGH
    #[arg(short, long)]
    pub priority: Option<TaskPriority>,

    /// Case-insensitive match on title or description
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: u64,

    #[arg(short, long)]
    pub limit: Option<u64>,
}

impl ListArgs {
    fn command_line(&self) -> String {
        let mut cmd = String::from("taskboard list");
        if let Some(status) = self.status {
            cmd.push_str(&format!(" --status {}", status));
        }
        if let Some(priority) = self.priority {
            cmd.push_str(&format!(" --priority {}", priority));
        }
        if let Some(ref search) = self.search {
            cmd.push_str(&format!(" --search {:?}", search));
        }
        if self.page > 1 {
            cmd.push_str(&format!(" --page {}", self.page));
        }
        if let Some(limit) = self.limit {
            cmd.push_str(&format!(" --limit {}", limit));
        }
        cmd
    }
}

/// Form fields as flags. An empty value clears an optional field.
#[derive(Debug, Clone, Default, Args)]
pub struct FormArgs {
    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub status: Option<String>,

    #[arg(short, long)]
    pub priority: Option<String>,

    /// YYYY-MM-DD or an RFC 3339 timestamp
    #[arg(long = "due")]
    pub due_date: Option<String>,
}

impl FormArgs {
    fn apply(self, form: &mut TaskForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(priority) = self.priority {
            form.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            form.due_date = due_date;
        }
    }
}

fn last_error<A: TaskApi>(store: &TaskStore<A>, fallback: &str) -> String {
    store
        .snapshot()
        .error
        .unwrap_or_else(|| fallback.to_string())
}

/// Form still open after a rejected submit, with a toast on top.
fn form_with_toast(toast: Toast, heading: &str, form: &TaskForm, errors: &FormErrors) -> Screen {
    Screen::failed(format!("{}\n\n{}", toast, render_form(heading, form, errors)))
}

pub async fn list<A: TaskApi>(store: &TaskStore<A>, args: ListArgs) -> Screen {
    store.set_filters(TaskFilters {
        status: args.status,
        priority: args.priority,
        search: args.search.clone().filter(|s| !s.trim().is_empty()),
    });
    if let Some(limit) = args.limit {
        store.set_limit(limit);
    }
    store.set_page(args.page);

    store.fetch_tasks(TaskQuery::default()).await;

    let state = store.snapshot();
    match state.error {
        Some(ref message) => Screen::failed(render_page_error(message, &args.command_line())),
        None => Screen::ok(render_list(&state)),
    }
}

pub async fn show<A: TaskApi>(store: &TaskStore<A>, id: &str) -> Screen {
    store.fetch_task_by_id(id).await;

    let state = store.snapshot();
    match (state.error, state.selected_task) {
        (Some(message), _) => Screen::failed(render_page_error(
            &message,
            &format!("taskboard show {}", id),
        )),
        (None, Some(task)) => Screen::ok(render_detail(&task)),
        (None, None) => Screen::failed(render_page_error(
            FETCH_TASK_FAILED,
            &format!("taskboard show {}", id),
        )),
    }
}

pub async fn new_task<A: TaskApi>(store: &TaskStore<A>, args: FormArgs) -> Screen {
    const HEADING: &str = "New task";

    let mut form = TaskForm::default();
    args.apply(&mut form);

    let input = match form.to_create_input() {
        Ok(input) => input,
        Err(errors) => return Screen::failed(render_form(HEADING, &form, &errors)),
    };

    match store.create_task(&input).await {
        Ok(task) => Screen::ok(format!(
            "{}\n\n{}",
            Toast::success(format!("Task \"{}\" created", task.title)),
            render_detail(&task)
        )),
        Err(_) => form_with_toast(
            Toast::error(last_error(store, CREATE_TASK_FAILED)),
            HEADING,
            &form,
            &FormErrors::new(),
        ),
    }
}

pub async fn edit<A: TaskApi>(store: &TaskStore<A>, id: &str, args: FormArgs) -> Screen {
    const HEADING: &str = "Edit task";

    store.fetch_task_by_id(id).await;
    let Some(task) = store.snapshot().selected_task else {
        return Screen::failed(render_page_error(
            &last_error(store, FETCH_TASK_FAILED),
            &format!("taskboard edit {}", id),
        ));
    };

    let mut form = TaskForm::from_task(&task);
    args.apply(&mut form);

    let input = match form.to_update_input(&task) {
        Ok(input) => input,
        Err(errors) => return Screen::failed(render_form(HEADING, &form, &errors)),
    };

    match store.update_task(id, &input).await {
        Ok(task) => Screen::ok(format!(
            "{}\n\n{}",
            Toast::success("Task updated"),
            render_detail(&task)
        )),
        Err(_) => form_with_toast(
            Toast::error(last_error(store, UPDATE_TASK_FAILED)),
            HEADING,
            &form,
            &FormErrors::new(),
        ),
    }
}

pub async fn delete<A: TaskApi>(store: &TaskStore<A>, id: &str) -> Screen {
    match store.delete_task(id).await {
        Ok(()) => Screen::ok(Toast::success("Task deleted").to_string()),
        Err(_) => Screen::failed(Toast::error(last_error(store, DELETE_TASK_FAILED)).to_string()),
    }
}
