// Extension metadata
// A host queries this record once at load time, then calls `register` for
// each Lua state that should see the module.
use std::fmt;

use luars::LuaValue;
use luars::lua_vm::{LuaResult, LuaState};
use serde::Serialize;

/// Installs the module into one Lua state and returns the module table.
pub type RegisterFn = fn(&mut LuaState) -> LuaResult<LuaValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleVersion {
    pub major: u16,
    pub minor: u16,
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Clone, Copy, Serialize)]
pub struct ModuleInfo {
    pub name: &'static str,
    /// Extra names the module answers to in `package.loaded`.
    pub aliases: &'static [&'static str],
    pub version: ModuleVersion,
    #[serde(skip)]
    pub register: RegisterFn,
}

impl ModuleInfo {
    /// Every name the module is reachable under, primary name first,
    /// without duplicates.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = vec![self.name];
        for alias in self.aliases {
            if !names.contains(alias) {
                names.push(alias);
            }
        }
        names
    }

    pub fn register(&self, l: &mut LuaState) -> LuaResult<LuaValue> {
        (self.register)(l)
    }
}

impl fmt::Debug for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleInfo")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

pub const MODULE_NAME: &str = "regex";
pub const MODULE_VERSION: ModuleVersion = ModuleVersion { major: 1, minor: 0 };

pub fn query_info() -> ModuleInfo {
    ModuleInfo {
        name: MODULE_NAME,
        aliases: &["regex"],
        version: MODULE_VERSION,
        register: crate::lua::open_regex,
    }
}
