//! Goal entity store.
//!
//! # Responsibility
//! - Own the in-memory goal collection and its subscriber list.
//! - Provide CRUD plus timeframe/category queries.
//!
//! # Invariants
//! - Stored goals always satisfy `target > 0`.
//! - Goals never hold derived progress; see `stats::goal_progress`.

use chrono::Utc;
use uuid::Uuid;

use crate::model::goal::{Goal, GoalDraft, GoalPatch, GoalTimeframe};
use crate::model::task::Category;
use crate::model::EntityId;
use crate::storage::{SlotStorage, GOALS_SLOT};
use crate::store::subscription::{SubscriberId, SubscriberRegistry};
use crate::store::{StoreError, StoreResult};

pub struct GoalStore<S: SlotStorage> {
    storage: S,
    goals: Vec<Goal>,
    subscribers: SubscriberRegistry,
}

impl<S: SlotStorage> GoalStore<S> {
    /// Creates a store and eagerly loads the persisted snapshot.
    pub fn new(storage: S) -> Self {
        let goals = storage.load(GOALS_SLOT);
        Self {
            storage,
            goals,
            subscribers: SubscriberRegistry::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn() + 'static) -> SubscriberId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Snapshot copy; mutating it never affects store state.
    pub fn all_goals(&self) -> Vec<Goal> {
        self.goals.clone()
    }

    pub fn goal_by_id(&self, id: EntityId) -> Option<Goal> {
        self.goals.iter().find(|goal| goal.id == id).cloned()
    }

    pub fn add_goal(&mut self, draft: GoalDraft) -> StoreResult<Goal> {
        draft.validate()?;

        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            target: draft.target,
            timeframe: draft.timeframe,
            category: draft.category,
            color: draft.color,
            created_at: now,
            updated_at: now,
        };

        self.goals.push(goal.clone());
        self.commit();
        Ok(goal)
    }

    pub fn update_goal(&mut self, id: EntityId, patch: GoalPatch) -> StoreResult<Goal> {
        patch.validate()?;

        let goal = self
            .goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(goal);
        goal.updated_at = Utc::now();
        let updated = goal.clone();

        self.commit();
        Ok(updated)
    }

    /// Removes by id. Persists and notifies only when a record was removed.
    pub fn delete_goal(&mut self, id: EntityId) -> bool {
        let before = self.goals.len();
        self.goals.retain(|goal| goal.id != id);
        if self.goals.len() == before {
            return false;
        }
        self.commit();
        true
    }

    pub fn goals_by_timeframe(&self, timeframe: GoalTimeframe) -> Vec<Goal> {
        self.goals
            .iter()
            .filter(|goal| goal.timeframe == timeframe)
            .cloned()
            .collect()
    }

    pub fn goals_by_category(&self, category: Category) -> Vec<Goal> {
        self.goals
            .iter()
            .filter(|goal| goal.category == category)
            .cloned()
            .collect()
    }

    fn commit(&mut self) {
        self.storage.save(GOALS_SLOT, &self.goals);
        self.subscribers.notify_all();
    }
}
