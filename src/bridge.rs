// Call-by-name bridge into the script global namespace.
//
// mlua expresses variadic calls directly, so there is no shared
// name/args/ret slot: each call is a stateless lookup plus invocation.

use mlua::{Function, IntoLuaMulti, Lua, Value};
use tracing::trace;

use crate::engine::ScriptError;

/// Call the global function `name` with `args` spread positionally and
/// return its first return value (`Nil` if it returns nothing).
pub(crate) fn call_global(
    lua: &Lua,
    name: &str,
    args: impl IntoLuaMulti,
) -> Result<Value, ScriptError> {
    let target = lookup_global(lua, name)?;
    trace!(target: "scripting", "Calling script function '{}'", name);
    Ok(target.call::<Value>(args)?)
}

/// Call the global function `name` for its side effects, discarding any
/// return values.
pub(crate) fn notify_global(
    lua: &Lua,
    name: &str,
    args: impl IntoLuaMulti,
) -> Result<(), ScriptError> {
    let target = lookup_global(lua, name)?;
    trace!(target: "scripting", "Notifying script function '{}'", name);
    target.call::<()>(args)?;
    Ok(())
}

fn lookup_global(lua: &Lua, name: &str) -> Result<Function, ScriptError> {
    match lua.globals().get::<Function>(name) {
        Ok(function) => Ok(function),
        // The global is nil or not callable; anything else is a real error.
        Err(mlua::Error::FromLuaConversionError { .. }) => Err(ScriptError::UnknownFunction {
            name: name.to_owned(),
        }),
        Err(err) => Err(err.into()),
    }
}
