// Event bus: named, ordered chains of Lua handlers.
//
// Each event name maps to the list of handlers in subscription order.
// Activation threads a value through the chain: every handler is called
// with the previous handler's return values, and the last handler's
// return values are the result of the activation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use mlua::{Function, Lua, MultiValue};
use tracing::{debug, trace};

/// An owned handler registry for one engine instance.
///
/// Cloning yields another handle to the same registry; separate `new()`
/// calls yield fully independent buses. Handler lists grow monotonically:
/// there is no unsubscribe, duplicates are kept, and order is preserved
/// exactly as handlers were subscribed.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Rc<RefCell<HashMap<String, Vec<Function>>>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the chain for `event`, creating the chain on
    /// first use. Callers keep event names non-empty; the engine entry
    /// points enforce this before reaching the bus.
    pub fn subscribe(&self, event: &str, handler: Function) {
        let mut handlers = self.handlers.borrow_mut();
        let chain = handlers.entry(event.to_owned()).or_default();
        chain.push(handler);
        debug!(
            target: "scripting",
            "Subscribed handler #{} to event '{}'",
            chain.len(),
            event
        );
    }

    /// Run the chain for `event`, feeding `args` to the first handler and
    /// each handler's return values to the next. Returns the last handler's
    /// return values.
    ///
    /// With no handlers subscribed this is a no-op that returns `args`
    /// unchanged. A handler that raises aborts the rest of the chain and the
    /// error propagates to the caller unmodified.
    pub fn activate(&self, event: &str, args: MultiValue) -> mlua::Result<MultiValue> {
        // Snapshot the chain: handlers are allowed to subscribe while it
        // runs, and new subscriptions only affect later activations.
        let chain = self
            .handlers
            .borrow()
            .get(event)
            .cloned()
            .unwrap_or_default();

        if chain.is_empty() {
            trace!(target: "scripting", "No handlers for '{}', passing arguments through", event);
            return Ok(args);
        }

        trace!(
            target: "scripting",
            "Activating '{}' with {} handler(s) and {} argument(s)",
            event,
            chain.len(),
            args.len()
        );

        let mut acc = args;
        for handler in &chain {
            acc = handler.call::<MultiValue>(acc)?;
        }
        Ok(acc)
    }

    /// Number of handlers currently subscribed to `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .borrow()
            .get(event)
            .map_or(0, |chain| chain.len())
    }

    /// Number of distinct event names with at least one handler.
    pub fn event_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

/// Expose the bus to scripts as the `subscribe` and `activate` globals.
///
/// Called once per interpreter, during engine construction, before any user
/// script runs.
pub(crate) fn install_globals(lua: &Lua, bus: &EventBus) -> mlua::Result<()> {
    let globals = lua.globals();

    let subscribe_bus = bus.clone();
    let subscribe = lua.create_function(move |_, (event, handler): (String, Function)| {
        if event.is_empty() {
            return Err(mlua::Error::RuntimeError(
                "subscribe: event name must not be empty".to_owned(),
            ));
        }
        subscribe_bus.subscribe(&event, handler);
        Ok(())
    })?;
    globals.set("subscribe", subscribe)?;

    let activate_bus = bus.clone();
    let activate = lua.create_function(move |_, (event, args): (String, MultiValue)| {
        if event.is_empty() {
            return Err(mlua::Error::RuntimeError(
                "activate: event name must not be empty".to_owned(),
            ));
        }
        activate_bus.activate(&event, args)
    })?;
    globals.set("activate", activate)?;

    Ok(())
}
