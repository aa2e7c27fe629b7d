//! Habit store: the in-memory habit list and its persisted mirror.
//!
//! # Responsibility
//! - Own the ordered habit collection for the process lifetime.
//! - Mirror every mutation to the `habits` slot as one whole value.
//! - Notify subscribers synchronously after every collection change.
//!
//! # Invariants
//! - Ids are unique within the collection.
//! - Insertion order is preserved; toggle and delete never reorder
//!   survivors.
//! - Persistence failures never reach the caller; in-memory state stays the
//!   source of truth and the persisted copy may be left stale.

use crate::model::habit::{Habit, HabitId};
use crate::repo::slot_repo::{SlotRepository, HABITS_SLOT_KEY};
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashSet};

/// Why the collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Collection was replaced by the persisted copy.
    Loaded,
    Added(HabitId),
    Toggled(HabitId),
    Deleted { removed: usize },
}

/// Event delivered to subscribers.
#[derive(Debug, Clone, Copy)]
pub enum StoreEvent<'a> {
    CollectionChanged {
        kind: ChangeKind,
        habits: &'a [Habit],
    },
}

/// Handle returned by [`HabitStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent<'_>) + Send>;

/// Owner of the habit list.
pub struct HabitStore<R: SlotRepository> {
    repo: R,
    habits: Vec<Habit>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<R: SlotRepository> HabitStore<R> {
    /// Creates an empty store. Call [`HabitStore::load`] to pull the
    /// persisted copy.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            habits: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Current position of a habit, for callers that need to delete by id.
    pub fn position_of(&self, id: HabitId) -> Option<usize> {
        self.habits.iter().position(|habit| habit.id() == id)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Registers a change observer.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&StoreEvent<'_>) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Replaces the in-memory list with the persisted copy.
    ///
    /// A missing slot, a failed read, or a value that does not decode into a
    /// valid collection all yield an empty list.
    pub fn load(&mut self) -> &[Habit] {
        self.habits = read_persisted(&self.repo);
        info!(
            "event=habits_load module=store status=ok count={}",
            self.habits.len()
        );
        self.emit(ChangeKind::Loaded);
        &self.habits
    }

    /// Appends a new incomplete habit.
    ///
    /// Returns `None` without touching storage when `name` is empty.
    /// Whitespace-only names are accepted as-is.
    pub fn add(&mut self, name: impl Into<String>) -> Option<HabitId> {
        let habit = Habit::new(name).ok()?;
        let id = habit.id();
        self.habits.push(habit);
        self.persist();
        self.emit(ChangeKind::Added(id));
        Some(id)
    }

    /// Flips completion of the habit with `id`.
    ///
    /// Returns `false` and does nothing when no such habit exists.
    pub fn toggle_completion(&mut self, id: HabitId) -> bool {
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id() == id) else {
            return false;
        };
        habit.toggle();
        self.persist();
        self.emit(ChangeKind::Toggled(id));
        true
    }

    /// Removes the habits at `positions` in the current ordering.
    ///
    /// Duplicate and out-of-range positions are ignored. Returns the number
    /// of removed habits; nothing is persisted when that is zero.
    pub fn delete(&mut self, positions: impl IntoIterator<Item = usize>) -> usize {
        let len = self.habits.len();
        let targets: BTreeSet<usize> = positions
            .into_iter()
            .filter(|position| *position < len)
            .collect();
        if targets.is_empty() {
            return 0;
        }

        for position in targets.iter().rev() {
            self.habits.remove(*position);
        }
        let removed = targets.len();
        self.persist();
        self.emit(ChangeKind::Deleted { removed });
        removed
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.habits) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "event=habits_save module=store status=error error_code=encode_failed error={}",
                    err
                );
                return;
            }
        };

        match self.repo.write_slot(HABITS_SLOT_KEY, &encoded) {
            Ok(()) => debug!(
                "event=habits_save module=store status=ok count={}",
                self.habits.len()
            ),
            Err(err) => warn!(
                "event=habits_save module=store status=error error_code=write_failed error={}",
                err
            ),
        }
    }

    fn emit(&mut self, kind: ChangeKind) {
        let event = StoreEvent::CollectionChanged {
            kind,
            habits: &self.habits,
        };
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }
}

fn read_persisted(repo: &impl SlotRepository) -> Vec<Habit> {
    let raw = match repo.read_slot(HABITS_SLOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(
                "event=habits_load module=store status=error error_code=read_failed error={}",
                err
            );
            return Vec::new();
        }
    };

    let habits: Vec<Habit> = match serde_json::from_str(&raw) {
        Ok(habits) => habits,
        Err(err) => {
            warn!(
                "event=habits_load module=store status=error error_code=decode_failed error={}",
                err
            );
            return Vec::new();
        }
    };

    let mut seen = HashSet::with_capacity(habits.len());
    if !habits.iter().all(|habit| seen.insert(habit.id())) {
        warn!("event=habits_load module=store status=error error_code=duplicate_id");
        return Vec::new();
    }

    habits
}
