// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SyncUp - Shared Task List Service
//!
//! Users own task lists, invite collaborators and manage tasks inside them.
//! Requests authenticate with a signed bearer token; every list and task
//! operation is gated on ownership vs. collaboration membership.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, verification and request authentication
//! - `storage` - JSON file storage, audit trail and the access guard
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;
