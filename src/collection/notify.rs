//! Two-channel change notification

use serde::{Deserialize, Serialize};

/// Which channel a notification was delivered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Remaining time moved without affecting grouping
    Values,
    /// Membership or finished/active classification changed
    Structure,
}

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut() + Send>;

/// Observer lists for the value-changed and structure-changed channels.
///
/// Delivery is synchronous, in subscription order, on the emitting thread.
#[derive(Default)]
pub struct Notifier {
    next_id: u64,
    values: Vec<(SubscriptionId, Observer)>,
    structure: Vec<(SubscriptionId, Observer)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_values_changed<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut() + Send + 'static,
    {
        let id = self.next_id();
        self.values.push((id, Box::new(observer)));
        id
    }

    pub fn on_structure_changed<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut() + Send + 'static,
    {
        let id = self.next_id();
        self.structure.push((id, Box::new(observer)));
        id
    }

    /// Drop a subscription from whichever channel holds it
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.values.len() + self.structure.len();
        self.values.retain(|(sid, _)| *sid != id);
        self.structure.retain(|(sid, _)| *sid != id);
        self.values.len() + self.structure.len() != before
    }

    pub fn emit(&mut self, kind: ChangeKind) {
        let observers = match kind {
            ChangeKind::Values => &mut self.values,
            ChangeKind::Structure => &mut self.structure,
        };
        for (_, observer) in observers.iter_mut() {
            observer();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.values.len() + self.structure.len()
    }

    fn next_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("values", &self.values.len())
            .field("structure", &self.structure.len())
            .finish()
    }
}
