// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::ClientContact;
use time::OffsetDateTime;

/// Validates the fields supplied when a trip is created.
///
/// This function checks that required fields are present and plausible.
/// It does NOT check token uniqueness (that requires the store).
///
/// # Arguments
///
/// * `client` - The requesting client's contact details
/// * `pickup_location` - Where the client is picked up
/// * `dropoff_location` - Where the client is dropped off
///
/// # Returns
///
/// * `Ok(())` if the fields are valid
/// * `Err(DomainError)` if any field is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The client's name, email, or phone is empty
/// - The email has no '@' separating a local part and a domain
/// - Either location is empty
pub fn validate_trip_fields(
    client: &ClientContact,
    pickup_location: &str,
    dropoff_location: &str,
) -> Result<(), DomainError> {
    // Rule: client name must not be empty
    if client.name.trim().is_empty() {
        return Err(DomainError::InvalidClientName(String::from(
            "Client name cannot be empty",
        )));
    }

    // Rule: email must have a local part and a domain
    let email = client.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => {
            return Err(DomainError::InvalidClientEmail(String::from(
                "Client email must contain a local part and a domain",
            )));
        }
    }

    // Rule: phone must not be empty
    if client.phone.trim().is_empty() {
        return Err(DomainError::InvalidClientPhone(String::from(
            "Client phone cannot be empty",
        )));
    }

    // Rule: both locations must not be empty
    if pickup_location.trim().is_empty() {
        return Err(DomainError::InvalidPickupLocation(String::from(
            "Pickup location cannot be empty",
        )));
    }
    if dropoff_location.trim().is_empty() {
        return Err(DomainError::InvalidDropoffLocation(String::from(
            "Dropoff location cannot be empty",
        )));
    }

    Ok(())
}

/// Validates that a pickup datetime is in the future.
///
/// Trips cannot be created for pickups that have already happened.
/// This function is pure; the caller supplies the current time.
///
/// # Arguments
///
/// * `pickup_datetime` - The requested pickup time
/// * `now` - The current time
///
/// # Returns
///
/// * `Ok(())` if the pickup is in the future
/// * `Err(DomainError::InvalidPickupDatetime)` otherwise
///
/// # Errors
///
/// Returns an error if the pickup is at or before `now`.
pub fn validate_pickup_in_future(
    pickup_datetime: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    // Rule: pickups must be future-dated at creation
    if pickup_datetime <= now {
        return Err(DomainError::InvalidPickupDatetime(String::from(
            "Pickup datetime must be in the future",
        )));
    }
    Ok(())
}
