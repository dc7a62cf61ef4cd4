//! Explicit listener bookkeeping.
//!
//! Every `EventListener` a surface registers lives in a [`ListenerSet`],
//! grouped by what it belongs to, so a group can be detached without
//! removing nodes. Dropping a gloo listener unregisters it.
//!
//! A listener must not be dropped while its own callback is running, so
//! groups cleared during event dispatch are released on the next tick.

use std::cell::Cell;
use std::collections::HashMap;

use gloo_events::EventListener;

thread_local! {
    static DISPATCH_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Marks the current stack as running inside a DOM event callback.
pub struct DispatchGuard(());

impl DispatchGuard {
    pub fn enter() -> Self {
        DISPATCH_DEPTH.with(|d| d.set(d.get() + 1));
        DispatchGuard(())
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

pub fn in_dispatch() -> bool {
    DISPATCH_DEPTH.with(|d| d.get() > 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerGroup {
    /// Upload trigger click.
    Trigger,
    /// Ready/error on the current media element.
    Media,
    /// Pointer-down on the resize handles.
    Handles,
    /// Document-level move/up while resizing.
    Drag,
    /// Hidden file input.
    Picker,
}

#[derive(Default)]
pub struct ListenerSet {
    groups: HashMap<ListenerGroup, Vec<EventListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, group: ListenerGroup, listener: EventListener) {
        self.groups.entry(group).or_default().push(listener);
    }

    pub fn count(&self, group: ListenerGroup) -> usize {
        self.groups.get(&group).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach every listener in `group`.
    pub fn clear(&mut self, group: ListenerGroup) {
        if let Some(listeners) = self.groups.remove(&group) {
            retire(listeners);
        }
    }

    /// Detach everything.
    pub fn clear_all(&mut self) {
        let listeners: Vec<_> = self.groups.drain().flat_map(|(_, l)| l).collect();
        retire(listeners);
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear_all();
    }
}

fn retire(listeners: Vec<EventListener>) {
    if listeners.is_empty() {
        return;
    }
    if in_dispatch() {
        tracing::trace!(count = listeners.len(), "deferring listener release");
        wasm_bindgen_futures::spawn_local(async move {
            drop(listeners);
        });
    } else {
        drop(listeners);
    }
}
