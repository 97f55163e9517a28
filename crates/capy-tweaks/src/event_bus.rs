//! Shared layout event bus.
//!
//! Modules never connect to the layout source's shared events directly.
//! They subscribe here with their own handler id; the bus keeps exactly one
//! underlying layout subscription per event while anyone listens, and fans
//! each emission out to the registered handlers in registration order.
//!
//! Re-subscribing with the same handler id replaces the old handler, so a
//! module toggled off and on quickly can never fire twice per event.

use crate::layout::{LayoutEvent, LayoutSource};
use crate::signal::HandlerId;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Identifies a subscriber (one per module).
pub type SubscriberId = &'static str;

type Handler = Rc<dyn Fn()>;

struct Subscription {
    underlying: HandlerId,
    handlers: Vec<(SubscriberId, Handler)>,
}

#[derive(Default)]
struct BusState {
    subscriptions: HashMap<LayoutEvent, Subscription>,
}

#[derive(Clone)]
pub struct SharedEventBus {
    layout: Rc<dyn LayoutSource>,
    state: Rc<RefCell<BusState>>,
}

impl SharedEventBus {
    pub fn new(layout: Rc<dyn LayoutSource>) -> Self {
        Self {
            layout,
            state: Rc::new(RefCell::new(BusState::default())),
        }
    }

    /// Register `handler` for `event` under `subscriber`.
    pub fn subscribe<F>(&self, event: LayoutEvent, subscriber: SubscriberId, handler: F)
    where
        F: Fn() + 'static,
    {
        let handler: Handler = Rc::new(handler);

        let needs_underlying = !self.state.borrow().subscriptions.contains_key(&event);
        if needs_underlying {
            let weak = Rc::downgrade(&self.state);
            let underlying = self
                .layout
                .connect(event, Box::new(move || dispatch(&weak, event)));
            debug!("Connected shared {} listener ({:?})", event, underlying);
            self.state.borrow_mut().subscriptions.insert(
                event,
                Subscription {
                    underlying,
                    handlers: Vec::new(),
                },
            );
        }

        let mut state = self.state.borrow_mut();
        let Some(subscription) = state.subscriptions.get_mut(&event) else {
            return;
        };

        match subscription
            .handlers
            .iter_mut()
            .find(|(id, _)| *id == subscriber)
        {
            Some(slot) => {
                debug!("{} re-subscribed to {}, replacing handler", subscriber, event);
                slot.1 = handler;
            }
            None => subscription.handlers.push((subscriber, handler)),
        }
    }

    /// Remove `subscriber`'s handler. The underlying layout subscription is
    /// released with the last handler. Unknown subscribers are ignored.
    pub fn unsubscribe(&self, event: LayoutEvent, subscriber: SubscriberId) {
        let released = {
            let mut state = self.state.borrow_mut();
            let Some(subscription) = state.subscriptions.get_mut(&event) else {
                return;
            };

            subscription.handlers.retain(|(id, _)| *id != subscriber);
            if subscription.handlers.is_empty() {
                state.subscriptions.remove(&event).map(|s| s.underlying)
            } else {
                None
            }
        };

        if let Some(underlying) = released {
            debug!("Released shared {} listener ({:?})", event, underlying);
            self.layout.disconnect(underlying);
        }
    }

    /// Drop every handler registered under `subscriber`.
    pub fn unsubscribe_all(&self, subscriber: SubscriberId) {
        for event in LayoutEvent::ALL {
            self.unsubscribe(event, subscriber);
        }
    }

    /// Number of handlers registered for `event`.
    pub fn refcount(&self, event: LayoutEvent) -> usize {
        self.state
            .borrow()
            .subscriptions
            .get(&event)
            .map(|s| s.handlers.len())
            .unwrap_or(0)
    }

    /// Whether the bus holds an underlying layout subscription for `event`.
    pub fn is_connected(&self, event: LayoutEvent) -> bool {
        self.state.borrow().subscriptions.contains_key(&event)
    }

    pub fn subscribers(&self, event: LayoutEvent) -> Vec<SubscriberId> {
        self.state
            .borrow()
            .subscriptions
            .get(&event)
            .map(|s| s.handlers.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }
}

// === Internal implementation ===

fn dispatch(state: &Weak<RefCell<BusState>>, event: LayoutEvent) {
    let Some(state) = state.upgrade() else {
        return;
    };

    // Snapshot so handlers may (un)subscribe while we iterate.
    let handlers: Vec<(SubscriberId, Handler)> = match state.borrow().subscriptions.get(&event) {
        Some(subscription) => subscription.handlers.clone(),
        None => return,
    };

    debug!("Dispatching {} to {} handler(s)", event, handlers.len());

    for (subscriber, handler) in handlers {
        // Skip handlers removed or replaced by an earlier handler in this round.
        let still_registered = state
            .borrow()
            .subscriptions
            .get(&event)
            .map(|s| {
                s.handlers
                    .iter()
                    .any(|(id, h)| *id == subscriber && Rc::ptr_eq(h, &handler))
            })
            .unwrap_or(false);

        if still_registered {
            handler();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLayout;
    use std::cell::{Cell, RefCell};

    fn bus() -> (Rc<FakeLayout>, SharedEventBus) {
        let layout = Rc::new(FakeLayout::new());
        let bus = SharedEventBus::new(layout.clone());
        (layout, bus)
    }

    #[test]
    fn test_single_underlying_subscription() {
        let (layout, bus) = bus();
        bus.subscribe(LayoutEvent::MonitorsChanged, "a", || {});
        bus.subscribe(LayoutEvent::MonitorsChanged, "b", || {});
        bus.subscribe(LayoutEvent::MonitorsChanged, "c", || {});

        assert_eq!(bus.refcount(LayoutEvent::MonitorsChanged), 3);
        assert_eq!(layout.handler_count(LayoutEvent::MonitorsChanged), 1);
    }

    #[test]
    fn test_refcount_after_partial_unsubscribe() {
        let (layout, bus) = bus();
        let ids = ["a", "b", "c", "d"];
        for id in ids {
            bus.subscribe(LayoutEvent::WorkareasChanged, id, || {});
        }

        for (removed, id) in ids.iter().enumerate() {
            bus.unsubscribe(LayoutEvent::WorkareasChanged, *id);
            let expected = ids.len() - removed - 1;
            assert_eq!(bus.refcount(LayoutEvent::WorkareasChanged), expected);
            assert_eq!(bus.is_connected(LayoutEvent::WorkareasChanged), expected > 0);
            assert_eq!(
                layout.handler_count(LayoutEvent::WorkareasChanged),
                usize::from(expected > 0)
            );
        }
    }

    #[test]
    fn test_resubscribe_replaces_handler() {
        let (layout, bus) = bus();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = first.clone();
        bus.subscribe(LayoutEvent::MonitorsChanged, "corners", move || {
            counter.set(counter.get() + 1)
        });
        let counter = second.clone();
        bus.subscribe(LayoutEvent::MonitorsChanged, "corners", move || {
            counter.set(counter.get() + 1)
        });

        layout.emit(LayoutEvent::MonitorsChanged);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(bus.refcount(LayoutEvent::MonitorsChanged), 1);
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let (layout, bus) = bus();
        let order = Rc::new(RefCell::new(Vec::new()));
        for id in ["first", "second", "third"] {
            let order = order.clone();
            bus.subscribe(LayoutEvent::StartupComplete, id, move || {
                order.borrow_mut().push(id)
            });
        }

        layout.emit(LayoutEvent::StartupComplete);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let (layout, bus) = bus();
        bus.unsubscribe(LayoutEvent::MonitorsChanged, "ghost");
        bus.subscribe(LayoutEvent::MonitorsChanged, "a", || {});
        bus.unsubscribe(LayoutEvent::MonitorsChanged, "a");
        bus.unsubscribe(LayoutEvent::MonitorsChanged, "a");

        assert_eq!(bus.refcount(LayoutEvent::MonitorsChanged), 0);
        assert_eq!(layout.handler_count(LayoutEvent::MonitorsChanged), 0);
    }

    #[test]
    fn test_handler_removed_mid_dispatch_does_not_fire() {
        let (layout, bus) = bus();
        let fired = Rc::new(Cell::new(false));

        let inner = bus.clone();
        bus.subscribe(LayoutEvent::MonitorsChanged, "remover", move || {
            inner.unsubscribe(LayoutEvent::MonitorsChanged, "victim");
        });
        let flag = fired.clone();
        bus.subscribe(LayoutEvent::MonitorsChanged, "victim", move || flag.set(true));

        layout.emit(LayoutEvent::MonitorsChanged);
        assert!(!fired.get());
        assert_eq!(bus.subscribers(LayoutEvent::MonitorsChanged), vec!["remover"]);
    }

    #[test]
    fn test_unsubscribe_all_releases_every_event() {
        let (layout, bus) = bus();
        for event in LayoutEvent::ALL {
            bus.subscribe(event, "corners", || {});
        }
        bus.unsubscribe_all("corners");

        for event in LayoutEvent::ALL {
            assert!(!bus.is_connected(event));
            assert_eq!(layout.handler_count(event), 0);
        }
    }
}
