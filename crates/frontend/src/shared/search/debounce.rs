use crate::shared::clock::Millis;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Pending<A> {
    action: A,
    deadline: Millis,
}

/// Per-field debounce timers, one pending slot per field.
///
/// The scheduler only tracks deadlines; the host wakes up at
/// [`next_deadline`](Self::next_deadline) and calls
/// [`fire_due`](Self::fire_due). Actions carry no input value: the caller
/// reads the field's current value when the action fires, so the last
/// keystroke always wins.
#[derive(Debug, Clone)]
pub struct DebounceScheduler<F, A> {
    pending: HashMap<F, Pending<A>>,
}

impl<F, A> Default for DebounceScheduler<F, A> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<F: Eq + Hash + Copy, A> DebounceScheduler<F, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending timer of `field` with a new one firing at
    /// `now + delay_ms`; returns the deadline
    pub fn schedule(&mut self, field: F, action: A, delay_ms: Millis, now: Millis) -> Millis {
        let deadline = now + delay_ms;
        self.pending.insert(field, Pending { action, deadline });
        deadline
    }

    /// Drop the pending timer of `field` without firing it
    pub fn cancel(&mut self, field: F) -> bool {
        self.pending.remove(&field).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, field: F) -> bool {
        self.pending.contains_key(&field)
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Remove and return every timer whose deadline has passed, earliest first
    pub fn fire_due(&mut self, now: Millis) -> Vec<(F, A)> {
        let due: Vec<F> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(field, _)| *field)
            .collect();

        let mut fired: Vec<(Millis, F, A)> = due
            .into_iter()
            .filter_map(|field| {
                self.pending
                    .remove(&field)
                    .map(|p| (p.deadline, field, p.action))
            })
            .collect();
        fired.sort_by_key(|(deadline, _, _)| *deadline);
        fired.into_iter().map(|(_, field, action)| (field, action)).collect()
    }
}
