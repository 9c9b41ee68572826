//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable that verifies `stride_core` wiring end to
//!   end: storage bootstrap, one store round trip, one stats pass.
//! - Keep output stable for quick local sanity checks.

use chrono::Utc;
use stride_core::db::open_db_in_memory;
use stride_core::{
    task_stats, Category, Priority, SqliteSlotStorage, TaskDraft, TaskStore,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("stride_core version={}", stride_core::core_version());

    let conn = open_db_in_memory()?;
    let mut store = TaskStore::new(SqliteSlotStorage::new(&conn));

    let task = store.add_task(TaskDraft {
        title: "smoke task".to_string(),
        description: None,
        category: Category::Personal,
        priority: Priority::Medium,
        due_date: None,
        tags: Vec::new(),
    })?;
    store.toggle_task_status(task.id)?;

    let stats = task_stats(&store.all_tasks(), Utc::now());
    println!(
        "tasks total={} completed={} pending={}",
        stats.total, stats.completed, stats.pending
    );
    Ok(())
}
