// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::event::NotificationKind;
use tripdesk_audit::AuditEntry;
use tripdesk_domain::ScheduledTrip;

/// The result of a successfully evaluated transition.
///
/// Nothing has been persisted yet when one of these is produced. The caller
/// must write `updated_trip` and `audit_entry` in one transaction, and only
/// after that commits dispatch `notification`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The trip as it must be persisted after the transition.
    pub updated_trip: ScheduledTrip,
    /// The audit entry to write in the same transaction.
    pub audit_entry: AuditEntry,
    /// The notification to dispatch once the transaction commits.
    pub notification: NotificationKind,
}
