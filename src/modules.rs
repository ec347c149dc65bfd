// Virtual module registry and the searcher that serves it to `require`.

use std::collections::HashMap;
use std::rc::Rc;

use mlua::{Lua, Table, Value};
use tracing::debug;

/// Host-supplied module sources, keyed by module name.
///
/// Populated once at engine construction and read-only afterwards. A name
/// missing from the registry is an expected miss that `require` resolves
/// through the interpreter's default searchers, not an error.
pub struct ModuleRegistry {
    sources: HashMap<String, String>,
}

impl ModuleRegistry {
    pub fn new(sources: HashMap<String, String>) -> Self {
        Self { sources }
    }

    /// Source text for `name`, if the host supplied it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of all registered modules, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

/// Install a searcher for `registry` at the front of `package.searchers`.
///
/// The searcher compiles a fresh loader from the registered source on every
/// hit. Nothing is memoized here; `require` keeps its usual `package.loaded`
/// caching above us. On a miss it returns the conventional message string so
/// `require` falls through to the default searchers. A present entry that
/// fails to compile raises the syntax error at the `require` call site.
///
/// Called once per interpreter, during engine construction.
pub(crate) fn install_searcher(lua: &Lua, registry: Rc<ModuleRegistry>) -> mlua::Result<()> {
    let searcher = lua.create_function(move |lua, name: String| {
        let Some(source) = registry.get(&name) else {
            let message = format!("\n\tno module '{name}' in host module table");
            return Ok(Value::String(lua.create_string(message)?));
        };
        debug!(target: "scripting", "Resolving module '{}' ({} bytes)", name, source.len());
        let loader = lua.load(source).set_name(format!("={name}")).into_function()?;
        Ok(Value::Function(loader))
    })?;

    let package: Table = lua.globals().get("package")?;
    let searchers: Table = package.get("searchers")?;
    searchers.raw_insert(1, searcher)?;
    Ok(())
}
