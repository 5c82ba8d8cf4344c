// Native match results → Lua values
//
// - absent → nil
// - captures → sequence table of strings (1-based, group order)
// - list of captures → sequence table of sequence tables
//
// Byte strings that are valid UTF-8 become Lua strings; anything else
// becomes a binary string so no byte is lost.
use luars::LuaValue;
use luars::lua_vm::{LuaResult, LuaState};

use crate::matcher::Captures;

// ── Scalars ─────────────────────────────────────────────────────────────

pub fn bytes_to_lua(l: &mut LuaState, bytes: &[u8]) -> LuaResult<LuaValue> {
    match std::str::from_utf8(bytes) {
        Ok(s) => l.create_string(s),
        Err(_) => l.create_binary(bytes.to_vec()),
    }
}

/// Borrow the bytes of a Lua string or binary string argument.
pub fn lua_to_bytes(value: &LuaValue) -> Option<&[u8]> {
    if let Some(s) = value.as_str() {
        Some(s.as_bytes())
    } else {
        value.as_binary()
    }
}

// ── Tables ──────────────────────────────────────────────────────────────

pub fn captures_to_lua(l: &mut LuaState, captures: &Captures) -> LuaResult<LuaValue> {
    let table = l.create_table(captures.len(), 0)?;
    for (i, group) in captures.iter().enumerate() {
        let value = bytes_to_lua(l, group)?;
        l.raw_seti(&table, (i + 1) as i64, value);
    }
    Ok(table)
}

pub fn match_to_lua(l: &mut LuaState, result: Option<Captures>) -> LuaResult<LuaValue> {
    match result {
        Some(captures) => captures_to_lua(l, &captures),
        None => Ok(LuaValue::nil()),
    }
}

pub fn matches_to_lua(l: &mut LuaState, result: Option<Vec<Captures>>) -> LuaResult<LuaValue> {
    let Some(matches) = result else {
        return Ok(LuaValue::nil());
    };

    let outer = l.create_table(matches.len(), 0)?;
    for (i, captures) in matches.iter().enumerate() {
        let entry = captures_to_lua(l, captures)?;
        l.raw_seti(&outer, (i + 1) as i64, entry);
    }
    Ok(outer)
}
