// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tripdesk_audit::AuditActor;

/// Who is driving a transition and why, as data only.
///
/// Every transition trigger builds one of these. The optional reason
/// overrides the per-transition default recorded in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Who drives the transition.
    pub actor: AuditActor,
    /// Caller-supplied reason. When `None` the transition's default is
    /// recorded instead.
    pub reason: Option<String>,
}

impl TransitionRequest {
    /// Creates a new `TransitionRequest`.
    ///
    /// # Arguments
    ///
    /// * `actor` - Who drives the transition
    /// * `reason` - Caller-supplied reason, or `None` for the default
    #[must_use]
    pub const fn new(actor: AuditActor, reason: Option<String>) -> Self {
        Self { actor, reason }
    }

    /// Creates a request driven by a staff member.
    ///
    /// # Arguments
    ///
    /// * `staff_id` - The acting staff member's identifier
    /// * `reason` - Caller-supplied reason, or `None` for the default
    #[must_use]
    pub const fn staff(staff_id: i64, reason: Option<String>) -> Self {
        Self {
            actor: AuditActor::staff(staff_id),
            reason,
        }
    }

    /// Creates a request driven by the client through a response token.
    ///
    /// Clients never supply a reason; the default is always recorded.
    #[must_use]
    pub const fn client() -> Self {
        Self {
            actor: AuditActor::client(),
            reason: None,
        }
    }

    /// Creates a request driven by the auto-decline sweep.
    ///
    /// The sweep records the canonical auto-decline reason.
    #[must_use]
    pub const fn sweep() -> Self {
        Self {
            actor: AuditActor::sweep(),
            reason: None,
        }
    }
}
