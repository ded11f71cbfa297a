// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability token generation for client response links.
//!
//! Each trip gets two tokens at creation: one redeems as accept, one as
//! decline. A token is the client's only credential, so it must be
//! unguessable within the trip's lifetime and unique across all trips.
//! Uniqueness is ultimately enforced by the storage layer's unique
//! indexes; a collision on insert is retried with fresh tokens.
//!
//! Tokens carry no independent expiry. A token is valid exactly as long
//! as the trip's state permits the transition it names.

use thiserror::Error;

/// Number of times a trip insert is retried with fresh tokens when the
/// storage layer reports a token collision.
///
/// Collisions on 256-bit tokens mean something is wrong with the entropy
/// source, so the bound is small and exhaustion is an internal error.
pub const MAX_TOKEN_INSERT_ATTEMPTS: usize = 3;

/// Token generation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Every insert attempt collided with an existing token.
    #[error("Token collision persisted after {attempts} insert attempts")]
    CollisionRetriesExhausted {
        /// How many attempts were made.
        attempts: usize,
    },
}

/// Generates one response token: 256 bits of randomness, hex-encoded.
///
/// The result is 64 lowercase hex characters, URL-safe without escaping.
#[must_use]
pub fn generate_token() -> String {
    let high: u128 = rand::random();
    let low: u128 = rand::random();
    format!("{high:032x}{low:032x}")
}

/// Generates the acceptance/decline token pair for a new trip.
///
/// The two tokens are guaranteed distinct from each other; global
/// uniqueness is the storage layer's job.
#[must_use]
pub fn generate_token_pair() -> (String, String) {
    let acceptance: String = generate_token();
    let mut decline: String = generate_token();
    while decline == acceptance {
        decline = generate_token();
    }
    (acceptance, decline)
}
