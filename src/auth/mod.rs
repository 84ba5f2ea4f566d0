// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the SyncUp API.
//!
//! ## Auth Flow
//!
//! 1. Client registers, then logs in with username + password
//! 2. Server verifies the Argon2id hash and issues a signed token
//!    (`sub` = username, `exp` = now + TTL)
//! 3. Client sends `Authorization: Bearer <token>` on every request
//! 4. Middleware:
//!    - Verifies structure, expiry and HMAC signature
//!    - Resolves `sub` to an existing account
//!    - Binds the [`Identity`] to the request
//!
//! ## Security
//!
//! - Every credential failure yields the same 401 body
//! - Signatures are compared in constant time
//! - Unknown usernames at login still cost one hash verification
//! - Tokens are not revocable; they end at `exp`

pub mod clock;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{TokenClaims, TokenCodec, VerifiedToken};
pub use error::AuthError;
pub use extractor::Auth;
pub use identity::Identity;
pub use middleware::authenticate_request;
pub use service::{AuthService, IdentityStore};
