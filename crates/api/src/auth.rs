// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff identity and authorization for the trip lifecycle surfaces.
//!
//! Session issuance is handled by the fronting auth layer; by the time a
//! request reaches this crate the staff member is already identified.
//! This module decides what an identified staff member may do.

use tripdesk_audit::AuditActor;

use crate::error::AuthError;

/// Staff roles for authorization.
///
/// Roles determine what actions an identified staff member may perform.
/// Clients are never staff: they act anonymously through response tokens
/// and carry no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Manager role: full control over the trip lifecycle.
    ///
    /// Managers may:
    /// - review and confirm pending trips (setting the price)
    /// - cancel pending or confirmed trips
    /// - trigger a manual auto-decline sweep pass
    /// - view trips and audit timelines
    Manager,
    /// Dispatcher role: day-to-day trip handling without review authority.
    ///
    /// Dispatchers may:
    /// - cancel pending or confirmed trips
    /// - view trips and audit timelines
    ///
    /// Dispatchers may not confirm trips or trigger sweeps.
    Dispatcher,
}

impl Role {
    /// Returns the string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Dispatcher => "dispatcher",
        }
    }

    /// Parses a role from its string representation, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the string names no
    /// known role.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value.to_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "dispatcher" => Ok(Self::Dispatcher),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown staff role: '{value}'. Must be 'manager' or 'dispatcher'"),
            }),
        }
    }
}

/// An identified staff member with an associated role.
///
/// This represents a staff member whose identity was established by the
/// fronting auth layer and who may perform certain actions based on
/// their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffActor {
    /// The staff member's identifier.
    pub staff_id: i64,
    /// The role assigned to this staff member.
    pub role: Role,
}

impl StaffActor {
    /// Creates a new staff actor.
    ///
    /// # Arguments
    ///
    /// * `staff_id` - The staff member's identifier
    /// * `role` - The role assigned to this staff member
    #[must_use]
    pub const fn new(staff_id: i64, role: Role) -> Self {
        Self { staff_id, role }
    }

    /// Converts this staff actor into an audit actor.
    ///
    /// This is used when recording audit entries to attribute state
    /// changes to the acting staff member.
    #[must_use]
    pub const fn to_audit_actor(&self) -> AuditActor {
        AuditActor::staff(self.staff_id)
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether a staff actor has permission to
/// perform a specific action based on their role.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor is authorized to confirm a trip.
    ///
    /// Only Manager actors carry the review capability.
    ///
    /// # Arguments
    ///
    /// * `actor` - The staff actor
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Manager role.
    pub fn authorize_confirm_trip(actor: &StaffActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Manager => Ok(()),
            Role::Dispatcher => Err(AuthError::Unauthorized {
                action: String::from("confirm_trip"),
                required_role: String::from("Manager"),
            }),
        }
    }

    /// Checks if an actor is authorized to cancel a trip.
    ///
    /// # Arguments
    ///
    /// * `actor` - The staff actor
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have permission.
    pub const fn authorize_cancel_trip(_actor: &StaffActor) -> Result<(), AuthError> {
        // Both Manager and Dispatcher carry the write capability
        Ok(())
    }

    /// Checks if an actor is authorized to trigger a sweep pass.
    ///
    /// Only Manager actors may trigger the auto-decline sweep manually.
    ///
    /// # Arguments
    ///
    /// * `actor` - The staff actor
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Manager role.
    pub fn authorize_run_sweep(actor: &StaffActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Manager => Ok(()),
            Role::Dispatcher => Err(AuthError::Unauthorized {
                action: String::from("run_sweep"),
                required_role: String::from("Manager"),
            }),
        }
    }

    /// Checks if an actor is authorized to view trips and audit
    /// timelines.
    ///
    /// # Arguments
    ///
    /// * `actor` - The staff actor
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have permission.
    pub const fn authorize_view_trips(_actor: &StaffActor) -> Result<(), AuthError> {
        // All staff roles may read
        Ok(())
    }
}
