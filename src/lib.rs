//! todo - Personal Task Manager Library
//!
//! This library provides the core functionality for the todo CLI tool:
//! per-user task records, pluggable persistence, and the query engine
//! (search, filter, sort) over one user's tasks.
//!
//! # Core Concepts
//!
//! - **Tasks**: Title, description, priority, due date, completion flag
//! - **Users**: Every task belongs to exactly one registered user
//! - **Stores**: `TaskStore` backends partitioned by username
//! - **Service**: Id assignment, timestamps, and queries over a store
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.todo.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for concurrency safety
//! - `model`: Task, priority and sort field types
//! - `output`: Human and JSON output for commands
//! - `service`: Task service (add, complete, delete, search, filter, sort)
//! - `store`: In-memory and JSON-file task stores
//! - `users`: User registration and authentication
//! - `validate`: Input validation helpers

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod service;
pub mod store;
pub mod users;
pub mod validate;

pub use error::{Error, Result};
