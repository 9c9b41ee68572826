//! Routine entity store, including sub-target and daily-progress writes.
//!
//! # Responsibility
//! - Own the in-memory routine collection and its subscriber list.
//! - Provide routine CRUD, nested sub-target CRUD, and the daily-progress
//!   upsert, all through one commit cycle.
//!
//! # Invariants
//! - Stored routines always satisfy `start_date <= end_date`.
//! - Progress rows only ever reference an owned sub-target; deleting a
//!   sub-target cascades its rows away.
//! - At most one progress row per `(date, sub_target_id)` pair.
//! - Sub-entity mutations stamp the parent routine's `updated_at`.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::model::routine::{
    DailyProgress, Routine, RoutineDraft, RoutinePatch, SubTarget, SubTargetDraft, SubTargetPatch,
};
use crate::model::{EntityId, ValidationError};
use crate::storage::{SlotStorage, ROUTINES_SLOT};
use crate::store::subscription::{SubscriberId, SubscriberRegistry};
use crate::store::{StoreError, StoreResult};

pub struct RoutineStore<S: SlotStorage> {
    storage: S,
    routines: Vec<Routine>,
    subscribers: SubscriberRegistry,
}

impl<S: SlotStorage> RoutineStore<S> {
    /// Creates a store and eagerly loads the persisted snapshot.
    pub fn new(storage: S) -> Self {
        let routines = storage.load(ROUTINES_SLOT);
        Self {
            storage,
            routines,
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
    pub fn all_routines(&self) -> Vec<Routine> {
        self.routines.clone()
    }

    pub fn routine_by_id(&self, id: EntityId) -> Option<Routine> {
        self.routines.iter().find(|routine| routine.id == id).cloned()
    }

    /// Routines whose date range contains `today`.
    pub fn active_routines(&self, today: NaiveDate) -> Vec<Routine> {
        self.routines
            .iter()
            .filter(|routine| routine.contains_day(today))
            .cloned()
            .collect()
    }

    pub fn add_routine(&mut self, draft: RoutineDraft) -> StoreResult<Routine> {
        draft.validate()?;

        let now = Utc::now();
        let routine = Routine {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            sub_targets: Vec::new(),
            daily_progress: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.routines.push(routine.clone());
        self.commit();
        Ok(routine)
    }

    pub fn update_routine(&mut self, id: EntityId, patch: RoutinePatch) -> StoreResult<Routine> {
        patch.validate()?;

        let routine = self
            .routines
            .iter_mut()
            .find(|routine| routine.id == id)
            .ok_or(StoreError::NotFound(id))?;

        // Range validity can only be judged on the merged record, so merge a
        // scratch copy first and keep the stored one untouched on rejection.
        let mut merged = routine.clone();
        patch.apply(&mut merged);
        if merged.start_date > merged.end_date {
            return Err(ValidationError::DateRangeInverted {
                start: merged.start_date,
                end: merged.end_date,
            }
            .into());
        }
        merged.updated_at = Utc::now();
        *routine = merged.clone();

        self.commit();
        Ok(merged)
    }

    /// Removes by id. Persists and notifies only when a record was removed.
    pub fn delete_routine(&mut self, id: EntityId) -> bool {
        let before = self.routines.len();
        self.routines.retain(|routine| routine.id != id);
        if self.routines.len() == before {
            return false;
        }
        self.commit();
        true
    }

    pub fn add_sub_target(
        &mut self,
        routine_id: EntityId,
        draft: SubTargetDraft,
    ) -> StoreResult<SubTarget> {
        draft.validate()?;

        let routine = self
            .routines
            .iter_mut()
            .find(|routine| routine.id == routine_id)
            .ok_or(StoreError::NotFound(routine_id))?;

        let now = Utc::now();
        let sub_target = SubTarget {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
        };
        routine.sub_targets.push(sub_target.clone());
        routine.updated_at = now;

        self.commit();
        Ok(sub_target)
    }

    pub fn update_sub_target(
        &mut self,
        routine_id: EntityId,
        sub_target_id: EntityId,
        patch: SubTargetPatch,
    ) -> StoreResult<SubTarget> {
        patch.validate()?;

        let routine = self
            .routines
            .iter_mut()
            .find(|routine| routine.id == routine_id)
            .ok_or(StoreError::NotFound(routine_id))?;
        let sub_target = routine
            .sub_targets
            .iter_mut()
            .find(|st| st.id == sub_target_id)
            .ok_or(StoreError::NotFound(sub_target_id))?;

        let now = Utc::now();
        patch.apply(sub_target);
        sub_target.updated_at = now;
        let updated = sub_target.clone();
        routine.updated_at = now;

        self.commit();
        Ok(updated)
    }

    /// Removes a sub-target and cascades away every progress row that
    /// referenced it. Persists and notifies only when a removal occurred.
    pub fn delete_sub_target(&mut self, routine_id: EntityId, sub_target_id: EntityId) -> bool {
        let Some(routine) = self
            .routines
            .iter_mut()
            .find(|routine| routine.id == routine_id)
        else {
            return false;
        };

        let before = routine.sub_targets.len();
        routine.sub_targets.retain(|st| st.id != sub_target_id);
        if routine.sub_targets.len() == before {
            return false;
        }

        routine
            .daily_progress
            .retain(|row| row.sub_target_id != sub_target_id);
        routine.updated_at = Utc::now();

        self.commit();
        true
    }

    /// Upserts the completion state for `(date, sub_target_id)`.
    ///
    /// Idempotent under repeated identical calls; never creates a second
    /// row for the same key. An unknown routine or sub-target is a
    /// `NotFound`, keeping progress rows inside the owning routine.
    pub fn update_daily_progress(
        &mut self,
        routine_id: EntityId,
        sub_target_id: EntityId,
        date: NaiveDate,
        completed: bool,
    ) -> StoreResult<()> {
        let routine = self
            .routines
            .iter_mut()
            .find(|routine| routine.id == routine_id)
            .ok_or(StoreError::NotFound(routine_id))?;
        if !routine.sub_targets.iter().any(|st| st.id == sub_target_id) {
            return Err(StoreError::NotFound(sub_target_id));
        }

        let now = Utc::now();
        match routine
            .daily_progress
            .iter_mut()
            .find(|row| row.sub_target_id == sub_target_id && row.date == date)
        {
            Some(row) => {
                row.completed = completed;
                row.updated_at = now;
            }
            None => routine.daily_progress.push(DailyProgress {
                date,
                sub_target_id,
                completed,
                updated_at: now,
            }),
        }
        routine.updated_at = now;

        self.commit();
        Ok(())
    }

    /// Closed-world completion lookup: `false` for a missing routine,
    /// sub-target, or record.
    pub fn daily_progress(
        &self,
        routine_id: EntityId,
        sub_target_id: EntityId,
        date: NaiveDate,
    ) -> bool {
        self.routines
            .iter()
            .find(|routine| routine.id == routine_id)
            .map(|routine| routine.progress_on(sub_target_id, date))
            .unwrap_or(false)
    }

    fn commit(&mut self) {
        self.storage.save(ROUTINES_SLOT, &self.routines);
        self.subscribers.notify_all();
    }
}
