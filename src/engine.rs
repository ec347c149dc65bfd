//! The script engine: owns the interpreter, the virtual module table, and
//! the event bus, and runs the entry script on construction.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use mlua::{Function, IntoLuaMulti, Lua, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::bridge;
use crate::events::{self, EventBus};
use crate::modules::{self, ModuleRegistry};

/// The prelude lua standard library. Contains the script-facing event API.
///
/// Exposed to lua code as the module "prelua"; any host-supplied module
/// under that name is replaced.
const STDLIB_SRC: &str = include_str!("stdlib.lua");

/// Reserved module name the built-in standard library is registered under.
pub const STDLIB_MODULE: &str = "prelua";

/// Name of the entry script. It is executed during construction instead of
/// being registered as a requireable module.
pub const ENTRY_MODULE: &str = "init";

/// An error raised while constructing the engine or calling into scripts.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The interpreter failed to compile or run script code.
    #[error(transparent)]
    Lua(#[from] mlua::Error),
    /// No global function with the requested name exists.
    #[error("no script function named '{name}'")]
    UnknownFunction { name: String },
    /// Event names must be non-empty.
    #[error("event name must not be empty")]
    EmptyEventName,
}

/// Handles the scripts, their state, and their execution.
pub struct ScriptEngine {
    /// The interpreter used for the scripts.
    lua: Lua,
    /// Modules resolvable by `require` from script code.
    modules: Rc<ModuleRegistry>,
    /// Registry of event handlers, shared with the script-facing globals.
    bus: EventBus,
}

impl ScriptEngine {
    /// Construct an engine and load the given scripts.
    ///
    /// The interpreter is initialized with the lua standard library and the
    /// prelude standard library. Every entry in `scripts` becomes a
    /// requireable module, except the `init` entry, which is executed here
    /// as the entry script.
    pub fn new(mut scripts: HashMap<String, String>) -> Result<Self, ScriptError> {
        scripts.insert(STDLIB_MODULE.to_owned(), STDLIB_SRC.to_owned());
        let entry = scripts.remove(ENTRY_MODULE);

        let lua = Lua::new();
        let bus = EventBus::new();
        events::install_globals(&lua, &bus)?;

        let modules = Rc::new(ModuleRegistry::new(scripts));
        modules::install_searcher(&lua, Rc::clone(&modules))?;

        debug!(
            target: "scripting",
            "Engine initialized with {} module(s)",
            modules.len()
        );

        if let Some(source) = entry {
            info!(target: "scripting", "Running entry script '{}'", ENTRY_MODULE);
            lua.load(&source)
                .set_name(format!("={ENTRY_MODULE}"))
                .exec()?;
        }

        Ok(ScriptEngine { lua, modules, bus })
    }

    /// The underlying interpreter.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// The modules resolvable by `require` from script code.
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Run a chunk of script source in the engine's interpreter.
    pub fn exec(&self, source: &str) -> Result<(), ScriptError> {
        self.lua.load(source).exec()?;
        Ok(())
    }

    /// Subscribe a handler to an event from the host side.
    ///
    /// Handlers run in subscription order, interleaved with any the scripts
    /// registered through the `subscribe` global.
    pub fn subscribe(&self, event: &str, handler: Function) -> Result<(), ScriptError> {
        if event.is_empty() {
            return Err(ScriptError::EmptyEventName);
        }
        self.bus.subscribe(event, handler);
        Ok(())
    }

    /// Activate an event with the given arguments.
    ///
    /// Every handler subscribed to `event` is called in registration order,
    /// each receiving the previous handler's return values. The last
    /// handler's returns are the result; with no handlers subscribed the
    /// arguments come back unchanged.
    pub fn emit(&self, event: &str, args: impl IntoLuaMulti) -> Result<Vec<Value>, ScriptError> {
        if event.is_empty() {
            return Err(ScriptError::EmptyEventName);
        }
        let args = args.into_lua_multi(&self.lua)?;
        let ret = self.bus.activate(event, args)?;
        Ok(ret.into_iter().collect())
    }

    /// Call the global script function `name`, returning its first return
    /// value (`Nil` if it returns nothing).
    pub fn call_function(
        &self,
        name: &str,
        args: impl IntoLuaMulti,
    ) -> Result<Value, ScriptError> {
        bridge::call_global(&self.lua, name, args)
    }

    /// Call the global script function `name` for its side effects.
    pub fn notify(&self, name: &str, args: impl IntoLuaMulti) -> Result<(), ScriptError> {
        bridge::notify_global(&self.lua, name, args)
    }
}

impl fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("modules", &self.modules.len())
            .field("events", &self.bus.event_count())
            .finish_non_exhaustive()
    }
}
