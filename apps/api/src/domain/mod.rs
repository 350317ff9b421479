// Domain layer module exports
// Entities and value objects for the daycare backend
// Domain is independent of infrastructure concerns

pub mod child;
pub mod employee;
pub mod errors;
pub mod group;
pub mod organization;
pub mod parent;
pub mod repositories;
pub mod value_objects;

pub use child::Child;
pub use employee::Employee;
pub use errors::DomainError;
pub use group::Group;
pub use organization::Organization;
pub use parent::Parent;
pub use value_objects::{Phone, TelegramId};
