// Infrastructure layer module
// Storage adapters: PostgreSQL, plus an in-memory store for development and tests
// Follows Hexagonal Architecture

pub mod repositories;
