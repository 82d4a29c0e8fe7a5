//! # Bmark Architecture
//!
//! Bmark is a **UI-agnostic bookmark library**. The CLI binary is a thin
//! client; everything interesting lives behind the API facade so the same
//! core could serve another front end unchanged.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs + args.rs)                              │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Carries the store policy (folder_tags)                   │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic                                      │
//! │  - Operates on Rust types, returns Rust types               │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract RecordStore trait                               │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//!
//! A bookmark's ID is a short hash of its normalized URL. The file path
//! is only a location: renaming or moving a record never changes its ID,
//! and two records for the same URL collide on purpose (that is what
//! `dedupe` leans on).
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, commands, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//!
//! The store root is an explicit value threaded into the `FileStore`, not
//! ambient state, so tests can spin up as many stores as they like.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Record`, `Summary`) and time helpers
//! - [`frontmatter`]: The record file codec
//! - [`slug`]: URL normalization, stable IDs, filename slugs
//! - [`query`]: Filtering and full-text search
//! - [`netscape`]: Browser bookmark HTML import/export and dedupe
//! - [`config`]: Store root resolution and the folder-tags policy
//! - [`git`]: Git sync collaborator
//! - [`editor`]: External editor integration
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod frontmatter;
pub mod git;
pub mod model;
pub mod netscape;
pub mod query;
pub mod slug;
pub mod store;
