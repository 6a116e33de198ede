/// PostgreSQL store
///
/// Plain runtime-checked sqlx queries. Task writes run in a transaction
/// covering the `tasks` row and its `task_labels` links; the composed task is
/// read back inside the same transaction.
///
/// Constraint violations are translated here:
///
/// - `23505` unique violation: [`StoreError::Conflict`]
/// - `23503` foreign key violation on delete: [`StoreError::InUse`]
/// - `23503` foreign key violation on write: [`StoreError::MissingReference`]

use async_trait::async_trait;
use sqlx::{postgres::PgPool, PgConnection, Postgres, QueryBuilder};
use std::collections::HashMap;
use tracing::debug;

use super::{LabelStore, StatusStore, Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::db::pool;
use crate::filter::TaskPredicate;
use crate::models::{
    label::Label,
    status::Status,
    task::{NewTask, Task, TaskRow},
    user::{NewUser, User},
    EntityId, EntityKind,
};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, created_at";
const TASK_COLUMNS: &str =
    "t.id, t.name, t.description, t.task_status_id, t.author_id, t.executor_id, t.created_at";

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Maps errors from inserts and updates
fn write_error(err: sqlx::Error, conflict: impl FnOnce() -> String) -> StoreError {
    match error_code(&err).as_deref() {
        Some(UNIQUE_VIOLATION) => StoreError::Conflict(conflict()),
        Some(FOREIGN_KEY_VIOLATION) => {
            let constraint = match &err {
                sqlx::Error::Database(db) => db.constraint().unwrap_or("foreign key").to_string(),
                _ => "foreign key".to_string(),
            };
            StoreError::MissingReference(constraint)
        }
        _ => StoreError::Database(err),
    }
}

/// Maps errors from deletes
fn delete_error(err: sqlx::Error, entity: EntityKind, id: EntityId) -> StoreError {
    match error_code(&err).as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => StoreError::InUse { entity, id },
        _ => StoreError::Database(err),
    }
}

fn email_conflict(email: &str) -> impl FnOnce() -> String + '_ {
    move || format!("Email {} is already registered", email)
}

/// Label joined with the task it is attached to
#[derive(sqlx::FromRow)]
struct LabelLink {
    task_id: EntityId,
    id: EntityId,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Resolves the references of `rows` with three batched queries
async fn hydrate(conn: &mut PgConnection, rows: Vec<TaskRow>) -> StoreResult<Vec<Task>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let task_ids: Vec<EntityId> = rows.iter().map(|r| r.id).collect();
    let status_ids: Vec<EntityId> = rows.iter().map(|r| r.task_status_id).collect();
    let user_ids: Vec<EntityId> = rows
        .iter()
        .flat_map(|r| std::iter::once(r.author_id).chain(r.executor_id))
        .collect();

    let statuses: HashMap<EntityId, Status> = sqlx::query_as::<_, Status>(
        "SELECT id, name, created_at FROM statuses WHERE id = ANY($1)",
    )
    .bind(&status_ids[..])
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|s| (s.id, s))
    .collect();

    let users: HashMap<EntityId, User> = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = ANY($1)",
        USER_COLUMNS
    ))
    .bind(&user_ids[..])
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|u| (u.id, u))
    .collect();

    let mut labels: HashMap<EntityId, Vec<Label>> = HashMap::new();
    let links = sqlx::query_as::<_, LabelLink>(
        "SELECT tl.task_id, l.id, l.name, l.created_at \
         FROM task_labels tl JOIN labels l ON l.id = tl.label_id \
         WHERE tl.task_id = ANY($1)",
    )
    .bind(&task_ids[..])
    .fetch_all(&mut *conn)
    .await?;
    for link in links {
        labels.entry(link.task_id).or_default().push(Label {
            id: link.id,
            name: link.name,
            created_at: link.created_at,
        });
    }

    let missing_user = |id: EntityId| StoreError::MissingReference(format!("user {}", id));

    rows.into_iter()
        .map(|row| {
            let status = statuses
                .get(&row.task_status_id)
                .cloned()
                .ok_or_else(|| StoreError::MissingReference(format!("status {}", row.task_status_id)))?;
            let author = users
                .get(&row.author_id)
                .cloned()
                .ok_or_else(|| missing_user(row.author_id))?;
            let executor = match row.executor_id {
                Some(id) => Some(users.get(&id).cloned().ok_or_else(|| missing_user(id))?),
                None => None,
            };
            let task_labels = labels.remove(&row.id).unwrap_or_default();

            Ok(row.compose(status, author, executor, task_labels))
        })
        .collect()
}

async fn link_labels(
    conn: &mut PgConnection,
    task_id: EntityId,
    label_ids: &[EntityId],
) -> StoreResult<()> {
    if label_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO task_labels (task_id, label_id) \
         SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
    )
    .bind(task_id)
    .bind(label_ids)
    .execute(&mut *conn)
    .await
    .map_err(|e| write_error(e, || "duplicate label link".to_string()))?;

    Ok(())
}

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_user(&self, id: EntityId) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, email_conflict(&user.email)))?;

        debug!(user_id = created.id, "Inserted user");
        Ok(created)
    }

    async fn update_user(&self, id: EntityId, user: NewUser) -> StoreResult<Option<User>> {
        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET first_name = $1, last_name = $2, email = $3, password_hash = $4 \
             WHERE id = $5 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, email_conflict(&user.email)))?;

        Ok(updated)
    }

    async fn delete_user(&self, id: EntityId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, EntityKind::User, id))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl StatusStore for PgStore {
    async fn list_statuses(&self) -> StoreResult<Vec<Status>> {
        let statuses =
            sqlx::query_as::<_, Status>("SELECT id, name, created_at FROM statuses ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(statuses)
    }

    async fn find_status(&self, id: EntityId) -> StoreResult<Option<Status>> {
        let status =
            sqlx::query_as::<_, Status>("SELECT id, name, created_at FROM statuses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(status)
    }

    async fn insert_status(&self, name: &str) -> StoreResult<Status> {
        let status = sqlx::query_as::<_, Status>(
            "INSERT INTO statuses (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(status)
    }

    async fn update_status(&self, id: EntityId, name: &str) -> StoreResult<Option<Status>> {
        let status = sqlx::query_as::<_, Status>(
            "UPDATE statuses SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn delete_status(&self, id: EntityId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, EntityKind::Status, id))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl LabelStore for PgStore {
    async fn list_labels(&self) -> StoreResult<Vec<Label>> {
        let labels = sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(labels)
    }

    async fn find_label(&self, id: EntityId) -> StoreResult<Option<Label>> {
        let label = sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(label)
    }

    async fn find_labels(&self, ids: &[EntityId]) -> StoreResult<Vec<Label>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let labels = sqlx::query_as::<_, Label>(
            "SELECT id, name, created_at FROM labels WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(labels)
    }

    async fn insert_label(&self, name: &str) -> StoreResult<Label> {
        let label = sqlx::query_as::<_, Label>(
            "INSERT INTO labels (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(label)
    }

    async fn update_label(&self, id: EntityId, name: &str) -> StoreResult<Option<Label>> {
        let label = sqlx::query_as::<_, Label>(
            "UPDATE labels SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(label)
    }

    async fn delete_label(&self, id: EntityId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, EntityKind::Label, id))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, predicate: &TaskPredicate) -> StoreResult<Vec<Task>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tasks t", TASK_COLUMNS));
        predicate.push_where(&mut qb);
        qb.push(" ORDER BY t.id");

        let mut conn = self.pool.acquire().await?;
        let rows = qb.build_query_as::<TaskRow>().fetch_all(&mut *conn).await?;

        debug!(
            conditions = predicate.conditions().len(),
            matched = rows.len(),
            "Listed tasks"
        );
        hydrate(&mut conn, rows).await
    }

    async fn find_task(&self, id: EntityId) -> StoreResult<Option<Task>> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks t WHERE t.id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(hydrate(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (name, description, task_status_id, author_id, executor_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, description, task_status_id, author_id, executor_id, created_at",
        )
        .bind(task.name.as_str())
        .bind(task.description.as_deref())
        .bind(task.task_status_id)
        .bind(task.author_id)
        .bind(task.executor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, || "duplicate task".to_string()))?;

        let id = row.id;
        link_labels(&mut tx, id, &task.label_ids).await?;
        let composed = hydrate(&mut tx, vec![row]).await?.pop();
        tx.commit().await?;

        debug!(task_id = id, labels = task.label_ids.len(), "Inserted task");
        composed.ok_or_else(|| StoreError::MissingReference(format!("task {}", id)))
    }

    async fn update_task(&self, id: EntityId, task: NewTask) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks SET name = $1, description = $2, task_status_id = $3, \
             author_id = $4, executor_id = $5 WHERE id = $6 \
             RETURNING id, name, description, task_status_id, author_id, executor_id, created_at",
        )
        .bind(task.name.as_str())
        .bind(task.description.as_deref())
        .bind(task.task_status_id)
        .bind(task.author_id)
        .bind(task.executor_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, || "duplicate task".to_string()))?;

        // Dropping the transaction rolls it back
        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_labels(&mut tx, id, &task.label_ids).await?;

        let composed = hydrate(&mut tx, vec![row]).await?.pop();
        tx.commit().await?;

        Ok(composed)
    }

    async fn delete_task(&self, id: EntityId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, EntityKind::Task, id))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        pool::ping(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        assert!(matches!(
            write_error(sqlx::Error::RowNotFound, || "x".to_string()),
            StoreError::Database(sqlx::Error::RowNotFound)
        ));
        assert!(matches!(
            delete_error(sqlx::Error::PoolTimedOut, EntityKind::Status, 1),
            StoreError::Database(sqlx::Error::PoolTimedOut)
        ));
    }
}
