// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod memory;
pub mod postgres_child_repository;
pub mod postgres_employee_repository;
pub mod postgres_group_repository;
pub mod postgres_organization_repository;
pub mod postgres_parent_repository;
pub mod postgres_store;
pub mod postgres_user_repository;

pub use memory::MemoryStore;
pub use postgres_store::PostgresStore;
