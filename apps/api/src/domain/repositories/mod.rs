// Repository contracts (ports)
// Implemented by the adapters in crate::infrastructure::repositories

pub mod directory;
pub mod people;

use thiserror::Error;

pub use directory::{ChildRepository, GroupRepository, OrganizationRepository};
pub use people::{EmployeeRepository, MergeOutcome, ParentRepository, UserRepository};

/// Failures reported by repository implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A referenced record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The write would break a uniqueness or ownership rule
    #[error("{0}")]
    Conflict(String),

    /// The storage backend failed
    #[error("database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Everything the HTTP handlers need from storage
///
/// Handlers hold an `Arc<dyn Store>` so the backing implementation is
/// chosen once at startup.
pub trait Store:
    OrganizationRepository
    + GroupRepository
    + ChildRepository
    + ParentRepository
    + EmployeeRepository
    + UserRepository
{
}

impl<T> Store for T where
    T: OrganizationRepository
        + GroupRepository
        + ChildRepository
        + ParentRepository
        + EmployeeRepository
        + UserRepository
{
}
