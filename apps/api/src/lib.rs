//! Daycare API Library
//!
//! HTTP backend for organizations, groups, parents, employees and children:
//! the route table, CORS policy and auth-error translation, plus the domain
//! types and storage adapters behind the handlers.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
