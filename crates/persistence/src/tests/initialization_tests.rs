// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::SqlitePersistence;
use crate::tests::create_test_trip;
use tripdesk::creation_entry;

#[test]
fn test_new_in_memory_initializes() {
    let persistence = SqlitePersistence::new_in_memory();
    assert!(persistence.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.verify_foreign_key_enforcement().unwrap();
}

#[test]
fn test_migrations_create_empty_tables() {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.list_trips(None).unwrap().is_empty());
    assert!(persistence.get_audit_timeline(1).unwrap().is_empty());
}

#[test]
fn test_in_memory_instances_are_isolated() {
    let mut first: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let mut second: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();

    let trip = create_test_trip("accept-isolated", "decline-isolated");
    first.create_trip(&trip, &creation_entry()).unwrap();

    assert_eq!(first.list_trips(None).unwrap().len(), 1);
    assert!(second.list_trips(None).unwrap().is_empty());
}
