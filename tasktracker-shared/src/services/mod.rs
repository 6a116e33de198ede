/// CRUD orchestration for users, statuses, labels and tasks
///
/// Services validate input, resolve references, run ownership checks and
/// hand resolved records to the [`Store`]. They never read a global "current
/// user": guarded operations take the acting [`User`](crate::models::user::User)
/// as an explicit argument, resolved beforehand by
/// [`resolve_identity`](crate::auth::identity::resolve_identity).
///
/// Guarded writes check, in order: input validation, resource existence
/// (`NotFound`), ownership (`AccessDenied`), then mutate.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tasktracker_shared::auth::password::Argon2Hasher;
/// use tasktracker_shared::models::status::StatusInput;
/// use tasktracker_shared::services::{ServicePolicy, Services};
/// use tasktracker_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let services = Services::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(Argon2Hasher::default()),
///     ServicePolicy::default(),
/// );
///
/// let status = services.statuses.create(StatusInput { name: "draft".to_string() }).await?;
/// assert_eq!(services.statuses.find_by_id(status.id).await?.name, "draft");
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::auth::password::CredentialHasher;
use crate::filter::FilterMode;
use crate::store::Store;

pub mod label;
pub mod status;
pub mod task;
pub mod user;

pub use label::LabelService;
pub use status::StatusService;
pub use task::TaskService;
pub use user::UserService;

/// What to do with label ids that do not resolve on task create/update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelResolution {
    /// Drop them silently
    #[default]
    Lenient,

    /// Fail with `NotFound{Label, id}` for the first unknown id
    Strict,
}

impl FromStr for LabelResolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(LabelResolution::Lenient),
            "strict" => Ok(LabelResolution::Strict),
            other => Err(format!(
                "unknown label resolution '{}', expected 'lenient' or 'strict'",
                other
            )),
        }
    }
}

impl fmt::Display for LabelResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelResolution::Lenient => f.write_str("lenient"),
            LabelResolution::Strict => f.write_str("strict"),
        }
    }
}

/// Switches between lenient and strict handling of client input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServicePolicy {
    pub filter_mode: FilterMode,
    pub label_resolution: LabelResolution,
}

/// The four entity services sharing one store
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub statuses: StatusService,
    pub labels: LabelService,
    pub tasks: TaskService,
    store: Arc<dyn Store>,
}

impl Services {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: Arc<dyn CredentialHasher>,
        policy: ServicePolicy,
    ) -> Self {
        Self {
            users: UserService::new(store.clone(), hasher),
            statuses: StatusService::new(store.clone()),
            labels: LabelService::new(store.clone()),
            tasks: TaskService::new(store.clone(), policy),
            store,
        }
    }

    /// The underlying store, for identity resolution and health checks
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
