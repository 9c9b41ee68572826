use chrono::NaiveDate;
use stride_core::db::open_db_in_memory;
use stride_core::{
    RoutineDraft, RoutinePatch, RoutineStore, SqliteSlotStorage, StoreError, SubTargetDraft,
    SubTargetPatch, ValidationError,
};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(title: &str, start: NaiveDate, end: NaiveDate) -> RoutineDraft {
    RoutineDraft {
        title: title.to_string(),
        description: None,
        start_date: start,
        end_date: end,
    }
}

fn sub_target(name: &str) -> SubTargetDraft {
    SubTargetDraft {
        name: name.to_string(),
        description: None,
    }
}

#[test]
fn add_routine_starts_with_empty_sub_entities() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));

    let added = store
        .add_routine(draft("morning block", day(2026, 8, 1), day(2026, 8, 7)))
        .unwrap();
    assert!(added.sub_targets.is_empty());
    assert!(added.daily_progress.is_empty());
    assert_eq!(store.routine_by_id(added.id).unwrap(), added);
}

#[test]
fn add_routine_rejects_inverted_range() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));

    let err = store
        .add_routine(draft("backwards", day(2026, 8, 7), day(2026, 8, 1)))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Validation(ValidationError::DateRangeInverted {
            start: day(2026, 8, 7),
            end: day(2026, 8, 1),
        })
    );
    assert!(store.all_routines().is_empty());
}

#[test]
fn update_routine_revalidates_the_merged_range() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));
    let added = store
        .add_routine(draft("stretching", day(2026, 8, 1), day(2026, 8, 7)))
        .unwrap();

    // Moving only the end bound before the start must fail on the merged
    // record and leave the stored routine untouched.
    let err = store
        .update_routine(
            added.id,
            RoutinePatch {
                end_date: Some(day(2026, 7, 20)),
                ..RoutinePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.routine_by_id(added.id).unwrap().end_date, day(2026, 8, 7));

    let updated = store
        .update_routine(
            added.id,
            RoutinePatch {
                start_date: Some(day(2026, 8, 2)),
                end_date: Some(day(2026, 8, 14)),
                ..RoutinePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.start_date, day(2026, 8, 2));
    assert_eq!(updated.end_date, day(2026, 8, 14));
}

#[test]
fn sub_target_crud_stamps_the_parent() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));
    let routine = store
        .add_routine(draft("reading", day(2026, 8, 1), day(2026, 8, 31)))
        .unwrap();

    let st = store
        .add_sub_target(routine.id, sub_target("20 pages"))
        .unwrap();
    let after_add = store.routine_by_id(routine.id).unwrap();
    assert_eq!(after_add.sub_targets.len(), 1);
    assert!(after_add.updated_at >= routine.updated_at);

    let renamed = store
        .update_sub_target(
            routine.id,
            st.id,
            SubTargetPatch {
                name: Some("30 pages".to_string()),
                ..SubTargetPatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "30 pages");
    assert!(renamed.updated_at >= st.updated_at);

    let err = store
        .update_sub_target(
            routine.id,
            st.id,
            SubTargetPatch {
                name: Some("  ".to_string()),
                ..SubTargetPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::EmptyName));
}

#[test]
fn sub_target_operations_demand_an_existing_routine() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));

    let missing = Uuid::new_v4();
    assert_eq!(
        store
            .add_sub_target(missing, sub_target("orphan"))
            .unwrap_err(),
        StoreError::NotFound(missing)
    );
    assert!(!store.delete_sub_target(missing, Uuid::new_v4()));
}

#[test]
fn delete_sub_target_cascades_its_progress_rows() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));
    let routine = store
        .add_routine(draft("workout", day(2026, 8, 1), day(2026, 8, 7)))
        .unwrap();
    let push_ups = store.add_sub_target(routine.id, sub_target("push-ups")).unwrap();
    let plank = store.add_sub_target(routine.id, sub_target("plank")).unwrap();

    for d in 1..=3 {
        store
            .update_daily_progress(routine.id, push_ups.id, day(2026, 8, d), true)
            .unwrap();
        store
            .update_daily_progress(routine.id, plank.id, day(2026, 8, d), true)
            .unwrap();
    }

    assert!(store.delete_sub_target(routine.id, push_ups.id));

    let remaining = store.routine_by_id(routine.id).unwrap();
    assert_eq!(remaining.sub_targets.len(), 1);
    assert_eq!(remaining.daily_progress.len(), 3);
    assert!(remaining
        .daily_progress
        .iter()
        .all(|row| row.sub_target_id != push_ups.id));

    // Deleting again reports no removal.
    assert!(!store.delete_sub_target(routine.id, push_ups.id));
}

#[test]
fn daily_progress_upserts_one_row_per_key() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));
    let routine = store
        .add_routine(draft("meditation", day(2026, 8, 1), day(2026, 8, 7)))
        .unwrap();
    let st = store.add_sub_target(routine.id, sub_target("10 minutes")).unwrap();
    let date = day(2026, 8, 3);

    store
        .update_daily_progress(routine.id, st.id, date, true)
        .unwrap();
    store
        .update_daily_progress(routine.id, st.id, date, false)
        .unwrap();
    store
        .update_daily_progress(routine.id, st.id, date, false)
        .unwrap();

    let loaded = store.routine_by_id(routine.id).unwrap();
    assert_eq!(loaded.daily_progress.len(), 1);
    assert!(!loaded.daily_progress[0].completed);
    assert!(!store.daily_progress(routine.id, st.id, date));

    store
        .update_daily_progress(routine.id, st.id, date, true)
        .unwrap();
    assert!(store.daily_progress(routine.id, st.id, date));
    assert_eq!(store.routine_by_id(routine.id).unwrap().daily_progress.len(), 1);
}

#[test]
fn daily_progress_rejects_unknown_sub_target() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));
    let routine = store
        .add_routine(draft("journal", day(2026, 8, 1), day(2026, 8, 7)))
        .unwrap();

    let missing = Uuid::new_v4();
    assert_eq!(
        store
            .update_daily_progress(routine.id, missing, day(2026, 8, 2), true)
            .unwrap_err(),
        StoreError::NotFound(missing)
    );
    assert!(store.routine_by_id(routine.id).unwrap().daily_progress.is_empty());
}

#[test]
fn absent_progress_reads_as_not_completed() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));
    let routine = store
        .add_routine(draft("water", day(2026, 8, 1), day(2026, 8, 7)))
        .unwrap();
    let st = store.add_sub_target(routine.id, sub_target("2 liters")).unwrap();

    assert!(!store.daily_progress(routine.id, st.id, day(2026, 8, 2)));
    assert!(!store.daily_progress(Uuid::new_v4(), st.id, day(2026, 8, 2)));
}

#[test]
fn active_routines_contain_today() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RoutineStore::new(SqliteSlotStorage::new(&conn));

    let current = store
        .add_routine(draft("current", day(2026, 8, 1), day(2026, 8, 31)))
        .unwrap();
    store
        .add_routine(draft("finished", day(2026, 7, 1), day(2026, 7, 31)))
        .unwrap();
    store
        .add_routine(draft("upcoming", day(2026, 9, 1), day(2026, 9, 30)))
        .unwrap();

    let active = store.active_routines(day(2026, 8, 15));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, current.id);
}
