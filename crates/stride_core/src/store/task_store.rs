//! Task entity store.
//!
//! # Responsibility
//! - Own the in-memory task collection and its subscriber list.
//! - Provide CRUD, the status toggle, and pure query helpers.
//!
//! # Invariants
//! - `completed_at` is `Some` iff `status == Completed`; only
//!   `toggle_task_status` writes that pair.
//! - Every successful mutation persists the full snapshot, then notifies.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::model::task::{Category, Priority, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::model::EntityId;
use crate::storage::{SlotStorage, TASKS_SLOT};
use crate::store::subscription::{SubscriberId, SubscriberRegistry};
use crate::store::{StoreError, StoreResult};

pub struct TaskStore<S: SlotStorage> {
    storage: S,
    tasks: Vec<Task>,
    subscribers: SubscriberRegistry,
}

impl<S: SlotStorage> TaskStore<S> {
    /// Creates a store and eagerly loads the persisted snapshot.
    ///
    /// A missing or unreadable snapshot yields an empty collection; the
    /// storage layer has already logged the cause.
    pub fn new(storage: S) -> Self {
        let tasks = storage.load(TASKS_SLOT);
        Self {
            storage,
            tasks,
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Registers a change listener; it fires after every successful
    /// mutation. See `SubscriberRegistry` for the reentrancy contract.
    pub fn subscribe(&mut self, listener: impl Fn() + 'static) -> SubscriberId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Snapshot copy; mutating it never affects store state.
    pub fn all_tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn task_by_id(&self, id: EntityId) -> Option<Task> {
        self.tasks.iter().find(|task| task.id == id).cloned()
    }

    /// Validates the draft, stamps identity and timestamps, and appends.
    /// New tasks always start `Pending`.
    pub fn add_task(&mut self, draft: TaskDraft) -> StoreResult<Task> {
        draft.validate()?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            status: TaskStatus::Pending,
            due_date: draft.due_date,
            completed_at: None,
            created_at: now,
            updated_at: now,
            tags: draft.tags,
        };

        self.tasks.push(task.clone());
        self.commit();
        Ok(task)
    }

    /// Merges the patch into the stored record and stamps `updated_at`.
    pub fn update_task(&mut self, id: EntityId, patch: TaskPatch) -> StoreResult<Task> {
        patch.validate()?;

        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(task);
        task.updated_at = Utc::now();
        let updated = task.clone();

        self.commit();
        Ok(updated)
    }

    /// Removes by id. Persists and notifies only when a record was removed.
    pub fn delete_task(&mut self, id: EntityId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.commit();
        true
    }

    /// Flips pending/completed. Completing stamps `completed_at`; reopening
    /// clears it. The one place the cross-field invariant is written.
    pub fn toggle_task_status(&mut self, id: EntityId) -> StoreResult<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let now = Utc::now();
        match task.status {
            TaskStatus::Pending => {
                task.status = TaskStatus::Completed;
                task.completed_at = Some(now);
            }
            TaskStatus::Completed => {
                task.status = TaskStatus::Pending;
                task.completed_at = None;
            }
        }
        task.updated_at = now;
        let toggled = task.clone();

        self.commit();
        Ok(toggled)
    }

    pub fn tasks_by_category(&self, category: Category) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.category == category)
            .cloned()
            .collect()
    }

    pub fn tasks_by_priority(&self, priority: Priority) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.priority == priority)
            .cloned()
            .collect()
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.status == status)
            .cloned()
            .collect()
    }

    /// Pending tasks due within the next `days` days, soonest first.
    /// Already-overdue tasks are included; they are still "upcoming work".
    pub fn upcoming_tasks(&self, days: u32, now: DateTime<Utc>) -> Vec<Task> {
        let horizon = now + Duration::days(i64::from(days));
        let mut upcoming: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| {
                task.status == TaskStatus::Pending
                    && task.due_date.is_some_and(|due| due <= horizon)
            })
            .cloned()
            .collect();
        upcoming.sort_by_key(|task| task.due_date);
        upcoming
    }

    /// Pending tasks whose due instant has passed, oldest first.
    pub fn overdue_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        let mut overdue: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| {
                task.status == TaskStatus::Pending && task.due_date.is_some_and(|due| due < now)
            })
            .cloned()
            .collect();
        overdue.sort_by_key(|task| task.due_date);
        overdue
    }

    fn commit(&mut self) {
        self.storage.save(TASKS_SLOT, &self.tasks);
        self.subscribers.notify_all();
    }
}
