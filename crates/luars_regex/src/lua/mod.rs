// Lua binding for the regex module
// Builds the `regex` table, publishes it as a global and in package.loaded.
pub mod expr;
pub mod marshal;

use luars::LuaValue;
use luars::lua_vm::{LuaResult, LuaState};

use crate::module_info::{MODULE_NAME, MODULE_VERSION, query_info};

/// Open the regex library in `l`.
///
/// The state is passed in explicitly; nothing is remembered between calls, so
/// each Lua state gets its own module table. Calling this twice on one state
/// replaces the table with an equivalent fresh one.
pub fn open_regex(l: &mut LuaState) -> LuaResult<LuaValue> {
    let module = create_regex_table(l)?;

    l.set_global(MODULE_NAME, module.clone())?;

    let names = query_info().names();
    publish_loaded(l, &names, &module)?;

    tracing::debug!(module = MODULE_NAME, version = %MODULE_VERSION, "registered lua module");
    Ok(module)
}

fn create_regex_table(l: &mut LuaState) -> LuaResult<LuaValue> {
    let table = l.create_table(0, 4)?;

    let constructor = LuaValue::cfunction(expr::regex_expr);
    for name in ["expr", "new"] {
        let key = l.create_string(name)?;
        l.raw_set(&table, key, constructor.clone());
    }

    let key = l.create_string("_NAME")?;
    let value = l.create_string(MODULE_NAME)?;
    l.raw_set(&table, key, value);

    let key = l.create_string("_VERSION")?;
    let value = l.create_string(&MODULE_VERSION.to_string())?;
    l.raw_set(&table, key, value);

    Ok(table)
}

/// Record the module in `package.loaded` so `require` hands back this table.
/// States opened without the package library are left alone.
fn publish_loaded(l: &mut LuaState, names: &[&str], module: &LuaValue) -> LuaResult<()> {
    let Some(package) = l.get_global("package")? else {
        return Ok(());
    };
    if !package.is_table() {
        return Ok(());
    }

    let loaded_key = l.create_string("loaded")?;
    let Some(loaded) = l.raw_get(&package, &loaded_key) else {
        return Ok(());
    };
    if !loaded.is_table() {
        return Ok(());
    }

    for name in names {
        let key = l.create_string(name)?;
        l.raw_set(&loaded, key, module.clone());
    }
    Ok(())
}
