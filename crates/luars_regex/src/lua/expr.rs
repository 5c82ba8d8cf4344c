// regex.expr userdata
// Implements: expr (constructor), compile, partial_match, find_all
// Fields: group_count, pattern (read-only, nil before the first compile)
use luars::lua_value::userdata_trait::{UdValue, UserDataTrait};
use luars::lua_vm::{CFunction, LuaError, LuaResult, LuaState};
use luars::{LuaUserdata, LuaValue};

use super::marshal;
use crate::error::MatcherError;
use crate::matcher::PatternMatcher;

pub const TYPE_NAME: &str = "regex.expr";

/// A [`PatternMatcher`] owned by Lua.
pub struct RegexExpr {
    matcher: PatternMatcher,
}

impl RegexExpr {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }
}

impl UserDataTrait for RegexExpr {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn get_field(&self, key: &str) -> Option<UdValue> {
        match key {
            "group_count" => self
                .matcher
                .group_count()
                .map(|n| UdValue::Integer(n as i64)),
            "pattern" => self.matcher.pattern().map(|p| UdValue::Str(p.to_string())),
            _ => lookup_method(key).map(UdValue::Function),
        }
    }

    fn set_field(&mut self, key: &str, _value: UdValue) -> Option<Result<(), String>> {
        match key {
            "group_count" | "pattern" => Some(Err(format!("field '{}' is read-only", key))),
            _ => None,
        }
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["group_count", "pattern"]
    }

    fn lua_tostring(&self) -> Option<String> {
        Some(match self.matcher.pattern() {
            Some(p) => format!("{}({})", TYPE_NAME, p),
            None => format!("{}(<uninitialized>)", TYPE_NAME),
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

fn lookup_method(key: &str) -> Option<CFunction> {
    match key {
        "compile" => Some(expr_compile),
        "partial_match" => Some(expr_partial_match),
        "find_all" => Some(expr_find_all),
        _ => None,
    }
}

fn raise(l: &mut LuaState, err: MatcherError) -> LuaError {
    l.error(err.to_string())
}

/// Resolve the `self` argument of a method call.
fn check_expr<'a>(
    l: &mut LuaState,
    value: &'a Option<LuaValue>,
    method: &str,
) -> LuaResult<&'a mut RegexExpr> {
    value
        .as_ref()
        .and_then(|v| v.as_userdata_mut())
        .and_then(|ud| ud.downcast_mut::<RegexExpr>())
        .ok_or_else(|| {
            l.error(format!(
                "calling '{}' on bad self ({} expected)",
                method, TYPE_NAME
            ))
        })
}

/// Fetch a string-or-binary argument.
fn check_bytes_arg(l: &mut LuaState, index: usize, func: &str) -> LuaResult<LuaValue> {
    match l.get_arg(index) {
        Some(v) if marshal::lua_to_bytes(&v).is_some() => Ok(v),
        _ => Err(l.error(format!(
            "bad argument #{} to '{}' (string expected)",
            index - 1,
            func
        ))),
    }
}

/// regex.expr([pattern]) - Create a matcher, compiling `pattern` if given
pub fn regex_expr(l: &mut LuaState) -> LuaResult<usize> {
    let mut matcher = PatternMatcher::new();

    if let Some(pattern_value) = l.get_arg(1).filter(|v| !v.is_nil()) {
        let Some(pattern) = marshal::lua_to_bytes(&pattern_value) else {
            return Err(l.error("bad argument #1 to 'expr' (string expected)".to_string()));
        };
        if let Err(e) = matcher.compile_bytes(pattern) {
            return Err(raise(l, e));
        }
    }

    let ud = l.create_userdata(LuaUserdata::new(RegexExpr::new(matcher)))?;
    l.push_value(ud)?;
    Ok(1)
}

/// e:compile(pattern) - Replace the compiled pattern; keeps the old one on error
fn expr_compile(l: &mut LuaState) -> LuaResult<usize> {
    let self_value = l.get_arg(1);
    let this = check_expr(l, &self_value, "compile")?;

    let pattern_value = l.get_arg(2);
    let Some(pattern) = pattern_value.as_ref().and_then(marshal::lua_to_bytes) else {
        return Err(l.error("bad argument #1 to 'compile' (string expected)".to_string()));
    };

    if let Err(e) = this.matcher.compile_bytes(pattern) {
        return Err(raise(l, e));
    }
    Ok(0)
}

/// e:partial_match(s) - Captures of the leftmost match, or nil
fn expr_partial_match(l: &mut LuaState) -> LuaResult<usize> {
    let self_value = l.get_arg(1);
    let this = check_expr(l, &self_value, "partial_match")?;
    let input_value = check_bytes_arg(l, 2, "partial_match")?;
    let input = marshal::lua_to_bytes(&input_value).unwrap_or_default();

    let result = match this.matcher.partial_match(input) {
        Ok(r) => r,
        Err(e) => return Err(raise(l, e)),
    };

    let value = marshal::match_to_lua(l, result)?;
    l.push_value(value)?;
    Ok(1)
}

/// e:find_all(s) - Captures of every non-overlapping match, or nil
fn expr_find_all(l: &mut LuaState) -> LuaResult<usize> {
    let self_value = l.get_arg(1);
    let this = check_expr(l, &self_value, "find_all")?;
    let input_value = check_bytes_arg(l, 2, "find_all")?;
    let input = marshal::lua_to_bytes(&input_value).unwrap_or_default();

    let result = match this.matcher.find_all(input) {
        Ok(r) => r,
        Err(e) => return Err(raise(l, e)),
    };

    let value = marshal::matches_to_lua(l, result)?;
    l.push_value(value)?;
    Ok(1)
}
