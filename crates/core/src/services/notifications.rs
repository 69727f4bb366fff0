use std::collections::HashMap;

use uuid::Uuid;

use crate::models::input::{Notification, Topic};

/// Handle returned by [`NotificationBus::subscribe`].
pub type SubscriptionId = Uuid;

/// A registered handler. Runs on the single UI thread, so no `Send` bound.
pub type Handler = Box<dyn FnMut(&Notification)>;

/// Topic-keyed publish/subscribe registry.
///
/// The host glue publishes what the rendering surface and the document
/// report; components register for the topics they care about. Delivery is
/// synchronous and in subscription order. There is no queue: a later
/// notification simply supersedes the effect of an earlier one.
#[derive(Default)]
pub struct NotificationBus {
    handlers: HashMap<Topic, Vec<(SubscriptionId, Handler)>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`.
    pub fn subscribe(&mut self, topic: Topic, handler: Handler) -> SubscriptionId {
        let id = Uuid::new_v4();
        self.handlers.entry(topic).or_default().push((id, handler));
        id
    }

    /// Remove a handler. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for list in self.handlers.values_mut() {
            let before = list.len();
            list.retain(|(sid, _)| *sid != id);
            removed |= list.len() != before;
        }
        removed
    }

    /// Deliver `notification` to every handler of its topic.
    /// Returns how many handlers ran.
    pub fn publish(&mut self, notification: &Notification) -> usize {
        match self.handlers.get_mut(&notification.topic()) {
            Some(list) => {
                for (_, handler) in list.iter_mut() {
                    handler(notification);
                }
                list.len()
            }
            None => 0,
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.handlers.get(&topic).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<(Topic, usize)> =
            self.handlers.iter().map(|(t, l)| (*t, l.len())).collect();
        counts.sort_by_key(|(t, _)| format!("{t:?}"));
        f.debug_struct("NotificationBus")
            .field("subscribers", &counts)
            .finish()
    }
}
