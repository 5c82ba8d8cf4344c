// Tests for the Lua-facing regex module
use luars::lua_vm::{LuaVM, SafeOption};
use luars::{LuaValue, Stdlib};

use crate::*;

fn new_vm() -> Box<LuaVM> {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();
    open_regex(vm.main_state()).unwrap();
    vm
}

fn run(code: &str) -> luars::LuaResult<Vec<LuaValue>> {
    let mut vm = new_vm();
    vm.main_state().execute(code)
}

#[test]
fn test_find_all() {
    let result = run(
        r#"
        local e = regex.expr("(\\d+)-(\\d+)")
        local all = e:find_all("12-34 and 56-78")
        assert(#all == 2)
        assert(all[1][1] == "12" and all[1][2] == "34")
        assert(all[2][1] == "56" and all[2][2] == "78")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_find_all_anchor_restarts_after_match() {
    let result = run(
        r#"
        assert(#regex.expr("^a"):find_all("aaa") == 3)
        assert(#regex.expr("\\ba"):find_all("aaa") == 3)
        assert(regex.expr("^a"):find_all("baa") == nil)
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_no_match_returns_nil() {
    let result = run(
        r#"
        local e = regex.expr("(\\d+)-(\\d+)")
        assert(e:find_all("no numbers here") == nil)
        assert(e:partial_match("no numbers here") == nil)
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_zero_groups_returns_empty_table() {
    let result = run(
        r#"
        local e = regex.expr("abc")
        local m = e:partial_match("xxabcxx")
        assert(type(m) == "table")
        assert(#m == 0)
        assert(e.group_count == 0)
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_partial_match_captures() {
    let result = run(
        r#"
        local e = regex.expr("(\\w+)@(\\w+)\\.com")
        local m = e:partial_match("contact: alice@example.com, bob@test.com")
        assert(#m == 2)
        assert(m[1] == "alice")
        assert(m[2] == "example")
        assert(e.group_count == 2)
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_invalid_pattern_is_catchable() {
    let result = run(
        r#"
        local ok, err = pcall(regex.expr, "(")
        assert(not ok)
        assert(string.find(tostring(err), "invalid regexp", 1, true))
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_failed_compile_keeps_pattern() {
    let result = run(
        r#"
        local e = regex.expr("(\\d+)")
        local ok = pcall(function() e:compile("(a|") end)
        assert(not ok)
        local m = e:partial_match("abc 123")
        assert(m[1] == "123")
        assert(e.pattern == "(\\d+)")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_default_construct_then_compile() {
    let result = run(
        r#"
        local e = regex.expr()
        assert(e.group_count == nil)
        assert(e.pattern == nil)

        local ok, err = pcall(function() return e:partial_match("abc") end)
        assert(not ok)
        assert(string.find(tostring(err), "no pattern compiled", 1, true))

        e:compile("(b)(c)")
        local m = e:partial_match("abc")
        assert(m[1] == "b" and m[2] == "c")

        e:compile("(a)")
        local all = e:find_all("banana")
        assert(#all == 3)
        assert(#all[1] == 1)
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_results_are_independent_tables() {
    let result = run(
        r#"
        local e = regex.expr("(\\d+)")
        local a = e:partial_match("x1")
        local b = e:partial_match("x22")
        assert(a ~= b)
        assert(a[1] == "1")
        assert(b[1] == "22")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_binary_input() {
    let result = run(
        r#"
        local e = regex.expr("k=(.)")
        local m = e:partial_match("k=\xff\xfe")
        assert(m[1] == "\xff")

        e:compile("(\\d)")
        local all = e:find_all("\xfe1\xff2")
        assert(#all == 2)
        assert(all[1][1] == "1" and all[2][1] == "2")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_binary_pattern() {
    let result = run(
        r#"
        local e = regex.expr("\xff(.)")
        assert(e.group_count == 1)
        local m = e:partial_match("a\xffbc")
        assert(m[1] == "b")
        assert(e:partial_match("abc") == nil)

        local d = regex.expr()
        d:compile("(.)\xfe")
        local all = d:find_all("x\xfey\xfe")
        assert(#all == 2)
        assert(all[1][1] == "x" and all[2][1] == "y")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_bad_arguments() {
    let result = run(
        r#"
        local e = regex.expr("a")
        local ok, err = pcall(function() return e:partial_match(42) end)
        assert(not ok)
        assert(string.find(tostring(err), "string expected", 1, true))

        ok = pcall(function() return e:find_all() end)
        assert(not ok)

        ok = pcall(regex.expr, {})
        assert(not ok)
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_read_only_fields() {
    let result = run(
        r#"
        local e = regex.expr("(a)")
        local ok = pcall(function() e.group_count = 5 end)
        assert(not ok)
        assert(e.group_count == 1)
        ok = pcall(function() e.pattern = "b" end)
        assert(not ok)
        assert(e.pattern == "(a)")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_tostring() {
    let result = run(
        r#"
        assert(tostring(regex.expr("(a)")) == "regex.expr((a))")
        assert(tostring(regex.expr()) == "regex.expr(<uninitialized>)")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_require_returns_module() {
    let result = run(
        r#"
        local r = require("regex")
        assert(r == regex)
        assert(r.expr == r.new)
        assert(r._NAME == "regex")
        assert(r._VERSION == "1.0")
    "#,
    );

    assert!(result.is_ok());
}

#[test]
fn test_register_through_module_info() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let info = query_info();
    let module = info.register(vm.main_state()).unwrap();
    assert!(module.is_table());

    let result = vm.main_state().execute(
        r#"
        assert(regex ~= nil)
        assert(regex.expr("x"):partial_match("x") ~= nil)
    "#,
    );
    assert!(result.is_ok());
}

#[test]
fn test_states_are_independent() {
    let mut first = new_vm();
    let mut second = LuaVM::new(SafeOption::default());
    second.open_stdlib(Stdlib::All).unwrap();

    assert!(first.main_state().execute("assert(regex ~= nil)").is_ok());
    assert!(second.main_state().execute("assert(regex == nil)").is_ok());
}

#[test]
fn test_reopen_is_harmless() {
    let mut vm = new_vm();
    open_regex(vm.main_state()).unwrap();

    let result = vm.main_state().execute(
        r#"
        assert(require("regex") == regex)
        assert(#regex.expr("(a)(b)"):find_all("abab") == 2)
    "#,
    );
    assert!(result.is_ok());
}
