use stride_core::db::open_db_in_memory;
use stride_core::{
    Category, GoalDraft, GoalPatch, GoalStore, GoalTimeframe, SqliteSlotStorage, StoreError,
    ValidationError,
};
use uuid::Uuid;

fn draft(title: &str, timeframe: GoalTimeframe) -> GoalDraft {
    GoalDraft {
        title: title.to_string(),
        description: None,
        target: 5,
        timeframe,
        category: Category::Work,
        color: "blue".to_string(),
    }
}

#[test]
fn add_then_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let mut store = GoalStore::new(SqliteSlotStorage::new(&conn));

    let added = store.add_goal(draft("ship weekly", GoalTimeframe::Weekly)).unwrap();
    assert_eq!(added.target, 5);
    assert_eq!(store.goal_by_id(added.id).unwrap(), added);
}

#[test]
fn add_rejects_zero_target_and_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let mut store = GoalStore::new(SqliteSlotStorage::new(&conn));

    let zero_target = GoalDraft {
        target: 0,
        ..draft("unreachable", GoalTimeframe::Weekly)
    };
    assert_eq!(
        store.add_goal(zero_target).unwrap_err(),
        StoreError::Validation(ValidationError::TargetNotPositive)
    );
    assert_eq!(
        store.add_goal(draft(" ", GoalTimeframe::Weekly)).unwrap_err(),
        StoreError::Validation(ValidationError::EmptyTitle)
    );
    assert!(store.all_goals().is_empty());
}

#[test]
fn update_merges_patch_and_rejects_zero_target() {
    let conn = open_db_in_memory().unwrap();
    let mut store = GoalStore::new(SqliteSlotStorage::new(&conn));
    let added = store.add_goal(draft("exercise", GoalTimeframe::Weekly)).unwrap();

    let updated = store
        .update_goal(
            added.id,
            GoalPatch {
                target: Some(12),
                timeframe: Some(GoalTimeframe::Monthly),
                category: Some(Category::Health),
                ..GoalPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.target, 12);
    assert_eq!(updated.timeframe, GoalTimeframe::Monthly);
    assert_eq!(updated.category, Category::Health);

    let err = store
        .update_goal(
            added.id,
            GoalPatch {
                target: Some(0),
                ..GoalPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Validation(ValidationError::TargetNotPositive)
    );
    assert_eq!(store.goal_by_id(added.id).unwrap().target, 12);
}

#[test]
fn update_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut store = GoalStore::new(SqliteSlotStorage::new(&conn));

    let missing = Uuid::new_v4();
    assert_eq!(
        store
            .update_goal(missing, GoalPatch::default())
            .unwrap_err(),
        StoreError::NotFound(missing)
    );
}

#[test]
fn delete_reports_whether_removal_occurred() {
    let conn = open_db_in_memory().unwrap();
    let mut store = GoalStore::new(SqliteSlotStorage::new(&conn));
    let added = store.add_goal(draft("temporary", GoalTimeframe::Monthly)).unwrap();

    assert!(store.delete_goal(added.id));
    assert!(!store.delete_goal(added.id));
}

#[test]
fn timeframe_and_category_queries_filter() {
    let conn = open_db_in_memory().unwrap();
    let mut store = GoalStore::new(SqliteSlotStorage::new(&conn));

    store.add_goal(draft("weekly work", GoalTimeframe::Weekly)).unwrap();
    store
        .add_goal(GoalDraft {
            category: Category::Health,
            ..draft("monthly health", GoalTimeframe::Monthly)
        })
        .unwrap();
    store.add_goal(draft("yearly work", GoalTimeframe::Yearly)).unwrap();

    assert_eq!(store.goals_by_timeframe(GoalTimeframe::Weekly).len(), 1);
    assert_eq!(store.goals_by_timeframe(GoalTimeframe::Monthly).len(), 1);
    assert_eq!(store.goals_by_category(Category::Work).len(), 2);
    assert_eq!(store.goals_by_category(Category::Finance).len(), 0);
}
