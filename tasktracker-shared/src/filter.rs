/// Task list filtering
///
/// [`TaskFilterBinder`] turns query-string pairs into a [`TaskPredicate`]:
/// a conjunction of [`Condition`]s over a fixed set of task fields. Nothing a
/// client sends is ever interpreted as a column name or spliced into SQL;
/// keys are matched against a closed table and values are bound parameters.
///
/// # Filterable fields
///
/// | Key(s) | Condition |
/// |---|---|
/// | `taskStatus`, `taskStatus.id`, `taskStatusId` | status id is one of the values |
/// | `executor`, `executor.id`, `executorId` | executor id is one of the values |
/// | `author`, `author.id`, `authorId` | author id is one of the values |
/// | `labels`, `labels.id`, `labelId`, `labelIds` | task carries every listed label |
/// | `taskStatus.name`, `labels.name` | name contains the value, ignoring case |
/// | `author.*`, `executor.*` with `email`, `firstName`, `lastName` | user field contains the value, ignoring case |
///
/// The task's own `id`, `name`, `description` and `createdAt` are not
/// filterable, nor is any other nested field. Such keys are skipped in
/// [`FilterMode::Lenient`] and rejected in [`FilterMode::Strict`].
///
/// Id values may be repeated (`labelId=1&labelId=2`) or comma-separated
/// (`labelId=1,2`); blank entries are dropped. Text fields use the first
/// non-blank value as is. A value that is not an integer on an id field is a
/// validation failure in either mode, and every such failure is reported at
/// once.
///
/// # Evaluation
///
/// The same predicate is evaluated in two places: [`TaskPredicate::matches`]
/// for the in-memory store and [`TaskPredicate::push_where`] for PostgreSQL,
/// which renders a `WHERE` clause with bound parameters.
///
/// # Example
///
/// ```
/// use tasktracker_shared::filter::{Condition, FilterMode, TaskFilterBinder};
///
/// let binder = TaskFilterBinder::new(FilterMode::Lenient);
/// let predicate = binder
///     .bind([("executorId", "2"), ("labelIds", "5,7"), ("sort", "name")])
///     .unwrap();
///
/// assert_eq!(
///     predicate.conditions(),
///     &[Condition::ExecutorIn(vec![2]), Condition::HasAllLabels(vec![5, 7])]
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use std::fmt;
use std::str::FromStr;

use crate::error::{FieldViolation, ServiceResult};
use crate::models::{task::Task, user::User, EntityId};
use crate::validation;

/// What to do with keys outside the filterable set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Skip them
    #[default]
    Lenient,

    /// Report them as validation failures
    Strict,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(FilterMode::Lenient),
            "strict" => Ok(FilterMode::Strict),
            other => Err(format!(
                "unknown filter mode '{}', expected 'lenient' or 'strict'",
                other
            )),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Lenient => f.write_str("lenient"),
            FilterMode::Strict => f.write_str("strict"),
        }
    }
}

/// Which user reference of a task a condition looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Author,
    Executor,
}

impl UserRole {
    fn column(&self) -> &'static str {
        match self {
            UserRole::Author => "t.author_id",
            UserRole::Executor => "t.executor_id",
        }
    }

    fn pick<'a>(&self, task: &'a Task) -> Option<&'a User> {
        match self {
            UserRole::Author => Some(&task.author),
            UserRole::Executor => task.executor.as_ref(),
        }
    }
}

/// Text attribute of a referenced user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAttribute {
    Email,
    FirstName,
    LastName,
}

impl UserAttribute {
    fn column(&self) -> &'static str {
        match self {
            UserAttribute::Email => "u.email",
            UserAttribute::FirstName => "u.first_name",
            UserAttribute::LastName => "u.last_name",
        }
    }

    fn value<'a>(&self, user: &'a User) -> &'a str {
        match self {
            UserAttribute::Email => &user.email,
            UserAttribute::FirstName => &user.first_name,
            UserAttribute::LastName => &user.last_name,
        }
    }
}

/// A single constraint on a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Status id is one of the ids
    StatusIn(Vec<EntityId>),

    /// Author id is one of the ids
    AuthorIn(Vec<EntityId>),

    /// Executor is set and its id is one of the ids
    ExecutorIn(Vec<EntityId>),

    /// Label set contains every id
    HasAllLabels(Vec<EntityId>),

    /// Status name contains the needle, ignoring case
    StatusNameContains(String),

    /// Some label name contains the needle, ignoring case
    LabelNameContains(String),

    /// The referenced user's attribute contains the needle, ignoring case
    UserContains {
        role: UserRole,
        attribute: UserAttribute,
        needle: String,
    },
}

impl Condition {
    /// Evaluates the condition against a composed task
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Condition::StatusIn(ids) => ids.contains(&task.task_status.id),
            Condition::AuthorIn(ids) => ids.contains(&task.author.id),
            Condition::ExecutorIn(ids) => task
                .executor
                .as_ref()
                .is_some_and(|executor| ids.contains(&executor.id)),
            Condition::HasAllLabels(ids) => ids
                .iter()
                .all(|id| task.labels.iter().any(|label| label.id == *id)),
            Condition::StatusNameContains(needle) => {
                contains_ignore_case(&task.task_status.name, needle)
            }
            Condition::LabelNameContains(needle) => task
                .labels
                .iter()
                .any(|label| contains_ignore_case(&label.name, needle)),
            Condition::UserContains {
                role,
                attribute,
                needle,
            } => role
                .pick(task)
                .is_some_and(|user| contains_ignore_case(attribute.value(user), needle)),
        }
    }

    /// Appends the SQL form of the condition; the task table is aliased `t`
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Condition::StatusIn(ids) => push_any(qb, "t.task_status_id", ids),
            Condition::AuthorIn(ids) => push_any(qb, "t.author_id", ids),
            Condition::ExecutorIn(ids) => push_any(qb, "t.executor_id", ids),
            Condition::HasAllLabels(ids) => {
                if ids.is_empty() {
                    qb.push("TRUE");
                    return;
                }

                qb.push("(");
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        qb.push(" AND ");
                    }
                    qb.push(
                        "EXISTS (SELECT 1 FROM task_labels tl \
                         WHERE tl.task_id = t.id AND tl.label_id = ",
                    );
                    qb.push_bind(*id);
                    qb.push(")");
                }
                qb.push(")");
            }
            Condition::StatusNameContains(needle) => {
                qb.push(
                    "EXISTS (SELECT 1 FROM statuses s \
                     WHERE s.id = t.task_status_id AND s.name ILIKE ",
                );
                qb.push_bind(like_pattern(needle));
                qb.push(")");
            }
            Condition::LabelNameContains(needle) => {
                qb.push(
                    "EXISTS (SELECT 1 FROM task_labels tl JOIN labels l ON l.id = tl.label_id \
                     WHERE tl.task_id = t.id AND l.name ILIKE ",
                );
                qb.push_bind(like_pattern(needle));
                qb.push(")");
            }
            Condition::UserContains {
                role,
                attribute,
                needle,
            } => {
                qb.push("EXISTS (SELECT 1 FROM users u WHERE u.id = ");
                qb.push(role.column());
                qb.push(" AND ");
                qb.push(attribute.column());
                qb.push(" ILIKE ");
                qb.push_bind(like_pattern(needle));
                qb.push(")");
            }
        }
    }
}

fn push_any(qb: &mut QueryBuilder<'_, Postgres>, column: &'static str, ids: &[EntityId]) {
    qb.push(column);
    qb.push(" = ANY(");
    qb.push_bind(ids.to_vec());
    qb.push(")");
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `%needle%` with LIKE metacharacters escaped (backslash is the default
/// escape character in PostgreSQL)
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Conjunction of conditions; empty means every task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPredicate {
    conditions: Vec<Condition>,
}

impl TaskPredicate {
    /// Predicate accepting every task
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds a condition
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_unconstrained(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.conditions.iter().all(|c| c.matches(task))
    }

    /// Appends ` WHERE ...` when there is at least one condition
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            condition.push_sql(qb);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdField {
    TaskStatus,
    Executor,
    Author,
    Labels,
}

impl IdField {
    fn condition(self, ids: Vec<EntityId>) -> Condition {
        match self {
            IdField::TaskStatus => Condition::StatusIn(ids),
            IdField::Executor => Condition::ExecutorIn(ids),
            IdField::Author => Condition::AuthorIn(ids),
            IdField::Labels => Condition::HasAllLabels(ids),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    StatusName,
    LabelName,
    User(UserRole, UserAttribute),
}

impl TextField {
    fn condition(self, needle: String) -> Condition {
        match self {
            TextField::StatusName => Condition::StatusNameContains(needle),
            TextField::LabelName => Condition::LabelNameContains(needle),
            TextField::User(role, attribute) => Condition::UserContains {
                role,
                attribute,
                needle,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKey {
    Ids(IdField),
    Text(TextField),
}

fn parse_key(key: &str) -> Option<FilterKey> {
    use UserAttribute::*;
    use UserRole::*;

    let parsed = match key {
        "taskStatus" | "taskStatus.id" | "taskStatusId" => FilterKey::Ids(IdField::TaskStatus),
        "executor" | "executor.id" | "executorId" => FilterKey::Ids(IdField::Executor),
        "author" | "author.id" | "authorId" => FilterKey::Ids(IdField::Author),
        "labels" | "labels.id" | "labelId" | "labelIds" => FilterKey::Ids(IdField::Labels),
        "taskStatus.name" => FilterKey::Text(TextField::StatusName),
        "labels.name" => FilterKey::Text(TextField::LabelName),
        "author.email" => FilterKey::Text(TextField::User(Author, Email)),
        "author.firstName" => FilterKey::Text(TextField::User(Author, FirstName)),
        "author.lastName" => FilterKey::Text(TextField::User(Author, LastName)),
        "executor.email" => FilterKey::Text(TextField::User(Executor, Email)),
        "executor.firstName" => FilterKey::Text(TextField::User(Executor, FirstName)),
        "executor.lastName" => FilterKey::Text(TextField::User(Executor, LastName)),
        _ => return None,
    };

    Some(parsed)
}

/// Parses every id in `values`, deduplicated in first-seen order
fn parse_ids(key: &str, values: &[String], violations: &mut Vec<FieldViolation>) -> Vec<EntityId> {
    let mut ids = Vec::new();

    for raw in values.iter().flat_map(|v| v.split(',')).map(str::trim) {
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<EntityId>() {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => violations.push(FieldViolation::new(
                key,
                format!("'{}' is not a valid id", raw),
            )),
        }
    }

    ids
}

/// Binds query-string pairs to a [`TaskPredicate`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilterBinder {
    mode: FilterMode,
}

impl TaskFilterBinder {
    pub fn new(mode: FilterMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Builds the predicate for a list of key/value pairs
    ///
    /// Conditions appear in the order their keys first appear. A key listed
    /// only with blank values adds no condition.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` with one violation per malformed id and, in strict
    /// mode, per unsupported key.
    pub fn bind<I, K, V>(&self, params: I) -> ServiceResult<TaskPredicate>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (key, value) in params {
            let key = key.as_ref().trim();
            let value = value.as_ref().to_string();
            match grouped.iter_mut().find(|(existing, _)| existing == key) {
                Some((_, values)) => values.push(value),
                None => grouped.push((key.to_string(), vec![value])),
            }
        }

        let mut predicate = TaskPredicate::all();
        let mut violations = Vec::new();

        for (key, values) in grouped {
            match parse_key(&key) {
                Some(FilterKey::Ids(field)) => {
                    let ids = parse_ids(&key, &values, &mut violations);
                    if !ids.is_empty() {
                        predicate = predicate.and(field.condition(ids));
                    }
                }
                Some(FilterKey::Text(field)) => {
                    let needle = values.iter().map(|v| v.trim()).find(|v| !v.is_empty());
                    if let Some(needle) = needle {
                        predicate = predicate.and(field.condition(needle.to_string()));
                    }
                }
                None => match self.mode {
                    FilterMode::Lenient => {
                        tracing::debug!(field = %key, "Ignoring unsupported task filter field");
                    }
                    FilterMode::Strict => violations.push(FieldViolation::new(
                        key,
                        "Filtering on this field is not supported",
                    )),
                },
            }
        }

        validation::finish(violations)?;
        Ok(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::models::{label::Label, status::Status};
    use chrono::Utc;

    fn user(id: EntityId, first: &str, email: &str) -> User {
        User {
            id,
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn label(id: EntityId, name: &str) -> Label {
        Label {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn task(status: (EntityId, &str), executor: Option<User>, labels: Vec<Label>) -> Task {
        Task {
            id: 1,
            name: "Write docs".to_string(),
            description: None,
            task_status: Status {
                id: status.0,
                name: status.1.to_string(),
                created_at: Utc::now(),
            },
            author: user(1, "Ada", "ada@example.com"),
            executor,
            labels,
            created_at: Utc::now(),
        }
    }

    fn lenient() -> TaskFilterBinder {
        TaskFilterBinder::new(FilterMode::Lenient)
    }

    fn strict() -> TaskFilterBinder {
        TaskFilterBinder::new(FilterMode::Strict)
    }

    fn violations(result: ServiceResult<TaskPredicate>) -> Vec<FieldViolation> {
        match result {
            Err(ServiceError::ValidationFailed(v)) => v,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_mode_from_str() {
        assert_eq!("lenient".parse::<FilterMode>(), Ok(FilterMode::Lenient));
        assert_eq!(" STRICT ".parse::<FilterMode>(), Ok(FilterMode::Strict));
        assert!("loose".parse::<FilterMode>().is_err());
        assert_eq!(FilterMode::default(), FilterMode::Lenient);
        assert_eq!(FilterMode::Strict.to_string(), "strict");
    }

    #[test]
    fn test_no_params_is_unconstrained() {
        let predicate = lenient().bind(Vec::<(String, String)>::new()).unwrap();
        assert!(predicate.is_unconstrained());
    }

    #[test]
    fn test_key_aliases() {
        for key in ["taskStatus", "taskStatus.id", "taskStatusId"] {
            assert_eq!(
                lenient().bind([(key, "3")]).unwrap().conditions(),
                &[Condition::StatusIn(vec![3])]
            );
        }
        for key in ["executor", "executor.id", "executorId"] {
            assert_eq!(
                lenient().bind([(key, "2")]).unwrap().conditions(),
                &[Condition::ExecutorIn(vec![2])]
            );
        }
        for key in ["author", "author.id", "authorId"] {
            assert_eq!(
                lenient().bind([(key, "1")]).unwrap().conditions(),
                &[Condition::AuthorIn(vec![1])]
            );
        }
        for key in ["labels", "labels.id", "labelId", "labelIds"] {
            assert_eq!(
                lenient().bind([(key, "5")]).unwrap().conditions(),
                &[Condition::HasAllLabels(vec![5])]
            );
        }
    }

    #[test]
    fn test_repeated_and_comma_separated_values() {
        let predicate = lenient()
            .bind([("labelId", "5, 6"), ("labelId", "6"), ("labelId", ""), ("labelId", "7")])
            .unwrap();

        assert_eq!(predicate.conditions(), &[Condition::HasAllLabels(vec![5, 6, 7])]);
    }

    #[test]
    fn test_blank_values_add_no_condition() {
        let predicate = lenient()
            .bind([("executorId", " "), ("taskStatus.name", "")])
            .unwrap();
        assert!(predicate.is_unconstrained());
    }

    #[test]
    fn test_text_paths_use_first_value() {
        let predicate = lenient()
            .bind([("author.firstName", "ad"), ("author.firstName", "zz")])
            .unwrap();

        assert_eq!(
            predicate.conditions(),
            &[Condition::UserContains {
                role: UserRole::Author,
                attribute: UserAttribute::FirstName,
                needle: "ad".to_string(),
            }]
        );
    }

    #[test]
    fn test_excluded_fields_ignored_in_lenient_mode() {
        let predicate = lenient()
            .bind([
                ("id", "1"),
                ("name", "docs"),
                ("description", "x"),
                ("createdAt", "2024-01-01"),
                ("author.password", "secret"),
                ("name'; DROP TABLE tasks; --", "x"),
                ("executorId", "2"),
            ])
            .unwrap();

        assert_eq!(predicate.conditions(), &[Condition::ExecutorIn(vec![2])]);
    }

    #[test]
    fn test_excluded_fields_rejected_in_strict_mode() {
        let found = violations(strict().bind([("name", "docs"), ("author.createdAt", "x")]));

        assert_eq!(
            found,
            vec![
                FieldViolation::new("name", "Filtering on this field is not supported"),
                FieldViolation::new("author.createdAt", "Filtering on this field is not supported"),
            ]
        );
    }

    #[test]
    fn test_malformed_ids_fail_in_both_modes() {
        for binder in [lenient(), strict()] {
            let found = violations(binder.bind([("executorId", "abc"), ("labelIds", "1,x")]));
            assert_eq!(
                found,
                vec![
                    FieldViolation::new("executorId", "'abc' is not a valid id"),
                    FieldViolation::new("labelIds", "'x' is not a valid id"),
                ]
            );
        }
    }

    #[test]
    fn test_matches_id_conditions() {
        let t = task((1, "new"), Some(user(2, "Bob", "bob@example.com")), vec![label(5, "bug")]);

        assert!(TaskPredicate::all().and(Condition::StatusIn(vec![1, 9])).matches(&t));
        assert!(!TaskPredicate::all().and(Condition::StatusIn(vec![9])).matches(&t));
        assert!(TaskPredicate::all().and(Condition::ExecutorIn(vec![2])).matches(&t));
        assert!(TaskPredicate::all().and(Condition::AuthorIn(vec![1])).matches(&t));
        assert!(!TaskPredicate::all().and(Condition::AuthorIn(vec![2])).matches(&t));

        let unassigned = task((1, "new"), None, Vec::new());
        assert!(!TaskPredicate::all().and(Condition::ExecutorIn(vec![2])).matches(&unassigned));
    }

    #[test]
    fn test_label_filter_requires_every_label() {
        let t = task((1, "new"), None, vec![label(5, "bug"), label(6, "ui")]);

        assert!(TaskPredicate::all().and(Condition::HasAllLabels(vec![5])).matches(&t));
        assert!(TaskPredicate::all().and(Condition::HasAllLabels(vec![5, 6])).matches(&t));
        assert!(!TaskPredicate::all().and(Condition::HasAllLabels(vec![5, 7])).matches(&t));
    }

    #[test]
    fn test_text_conditions_ignore_case() {
        let t = task(
            (1, "In Review"),
            Some(user(2, "Bob", "bob@example.com")),
            vec![label(5, "Backend")],
        );

        assert!(Condition::StatusNameContains("review".to_string()).matches(&t));
        assert!(Condition::LabelNameContains("END".to_string()).matches(&t));
        assert!(Condition::UserContains {
            role: UserRole::Executor,
            attribute: UserAttribute::Email,
            needle: "BOB@".to_string(),
        }
        .matches(&t));
        assert!(!Condition::UserContains {
            role: UserRole::Author,
            attribute: UserAttribute::FirstName,
            needle: "bob".to_string(),
        }
        .matches(&t));
    }

    #[test]
    fn test_conditions_combine_with_and() {
        let t = task((1, "new"), Some(user(2, "Bob", "bob@example.com")), vec![label(5, "bug")]);

        let predicate = lenient()
            .bind([("executorId", "2"), ("taskStatusId", "1"), ("labelIds", "5")])
            .unwrap();
        assert!(predicate.matches(&t));

        let predicate = lenient().bind([("executorId", "2"), ("taskStatusId", "4")]).unwrap();
        assert!(!predicate.matches(&t));
    }

    #[test]
    fn test_push_where_binds_parameters() {
        let predicate = TaskPredicate::all()
            .and(Condition::StatusIn(vec![1, 2]))
            .and(Condition::HasAllLabels(vec![5, 6]));

        let mut qb = QueryBuilder::<Postgres>::new("SELECT t.id FROM tasks t");
        predicate.push_where(&mut qb);

        assert_eq!(
            qb.sql(),
            "SELECT t.id FROM tasks t WHERE t.task_status_id = ANY($1) AND (\
             EXISTS (SELECT 1 FROM task_labels tl WHERE tl.task_id = t.id AND tl.label_id = $2) AND \
             EXISTS (SELECT 1 FROM task_labels tl WHERE tl.task_id = t.id AND tl.label_id = $3))"
        );
    }

    #[test]
    fn test_push_where_never_splices_text() {
        let predicate = lenient()
            .bind([("author.email", "x' OR '1'='1"), ("labels.name", "50%_off")])
            .unwrap();

        let mut qb = QueryBuilder::<Postgres>::new("SELECT t.id FROM tasks t");
        predicate.push_where(&mut qb);
        let sql = qb.sql();

        assert!(!sql.contains("OR '1'"));
        assert!(!sql.contains("50%"));
        assert!(sql.contains("u.id = t.author_id AND u.email ILIKE $1"));
        assert!(sql.contains("l.name ILIKE $2"));
    }

    #[test]
    fn test_unconstrained_predicate_adds_no_where() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT t.id FROM tasks t");
        TaskPredicate::all().push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT t.id FROM tasks t");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("bug"), "%bug%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
