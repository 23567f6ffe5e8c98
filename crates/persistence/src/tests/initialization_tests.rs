// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use crate::Persistence;
use crate::backend::sqlite::{enable_wal_mode, verify_foreign_key_enforcement};
use crate::tests::create_test_rule;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, crate::error::PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    db1.sync_operator("admin", "correct horse battery").unwrap();
    db1.upsert_working_hours(&create_test_rule(0, "09:00", "18:00", true))
        .unwrap();

    assert!(db1.get_operator_by_login("admin").unwrap().is_some());
    let leaked = db2.get_operator_by_login("admin").unwrap();
    assert!(leaked.is_none(), "db2 should be isolated");
    assert!(db2.list_working_hours().unwrap().is_empty());
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "paygate_persistence_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .upsert_working_hours(&create_test_rule(2, "10:00", "16:00", true))
            .unwrap();
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let rules = reopened.list_working_hours().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].hours_label(), "10:00 - 16:00");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_file_database_journals_in_wal_mode() {
    let path = std::env::temp_dir().join(format!(
        "paygate_persistence_wal_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let mut persistence = Persistence::new_with_file(&path).unwrap();
    assert_eq!(enable_wal_mode(&mut persistence.conn).unwrap(), "wal");
    assert!(verify_foreign_key_enforcement(&mut persistence.conn).is_ok());

    drop(persistence);
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[test]
fn test_in_memory_database_keeps_memory_journal() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(enable_wal_mode(&mut persistence.conn).unwrap(), "memory");
}
