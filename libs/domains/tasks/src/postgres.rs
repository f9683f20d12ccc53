use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::{
    entity,
    error::TaskResult,
    models::{Task, TaskPage, TaskQuery},
    repository::TaskRepository,
};

pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(query: &TaskQuery) -> Select<entity::Entity> {
        let mut select = entity::Entity::find();

        if let Some(status) = query.status {
            select = select.filter(entity::Column::Status.eq(status));
        }

        if let Some(priority) = query.priority {
            select = select.filter(entity::Column::Priority.eq(priority));
        }

        if let Some(ref search) = query.search {
            let pattern = like_pattern(search);
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        r#"LOWER("tasks"."title") LIKE $1 ESCAPE '\'"#,
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        r#"LOWER("tasks"."description") LIKE $1 ESCAPE '\'"#,
                        [pattern],
                    )),
            );
        }

        select
    }
}

/// `%term%` for a case-insensitive LIKE, with the term's wildcards taken literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: Task) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = task.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(task_id = %model.id, "Created task");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_page(&self, query: TaskQuery) -> TaskResult<TaskPage> {
        let total = Self::filtered(&query).count(&self.db).await?;

        let models = Self::filtered(&query)
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .limit(query.limit)
            .offset(query.offset())
            .all(&self.db)
            .await?;

        Ok(TaskPage {
            tasks: models.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn update(&self, task: Task) -> TaskResult<Option<Task>> {
        let id = task.id;
        let active_model: entity::ActiveModel = task.clone().into();

        let result = entity::Entity::update_many()
            .set(active_model)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        tracing::info!(task_id = %id, "Updated task");
        Ok(Some(task))
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
