use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use luars::lua_vm::{LuaState, LuaVM, SafeOption};
use luars::{LuaResult, Stdlib};

/// luare: run Lua scripts with the `regex` module preloaded.
#[derive(Parser)]
#[command(name = "luare", version, about)]
struct Cli {
    /// Execute a chunk of Lua before the script. May be repeated.
    #[arg(short = 'e', value_name = "STAT")]
    execute: Vec<String>,

    /// Print the extension's metadata as JSON and exit.
    #[arg(long)]
    info: bool,

    /// Script to run; `-` reads from stdin.
    script: Option<PathBuf>,

    /// Arguments passed to the script through the global `arg` table.
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

/// Enable with `RUST_LOG=luars_regex=debug`.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn setup_arg_table(state: &mut LuaState, script: Option<&str>, args: &[String]) -> LuaResult<()> {
    // arg[0] = script name, arg[1..] = script arguments
    let arg_table = state.create_table(args.len(), 1)?;

    if let Some(name) = script {
        let s = state.create_string(name)?;
        state.raw_seti(&arg_table, 0, s);
    }

    for (i, a) in args.iter().enumerate() {
        let s = state.create_string(a)?;
        state.raw_seti(&arg_table, (i + 1) as i64, s);
    }

    state.set_global("arg", arg_table)
}

fn run_chunk(state: &mut LuaState, code: &str, chunk_name: &str) -> Result<(), String> {
    match state.execute(code) {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("{}: {}", chunk_name, state.get_error_msg(e))),
    }
}

fn read_script(script: &PathBuf) -> Result<String, String> {
    if script.as_os_str() == "-" {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .map_err(|e| format!("error reading stdin: {}", e))?;
        return Ok(code);
    }
    fs::read_to_string(script).map_err(|e| format!("cannot open {}: {}", script.display(), e))
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All)
        .map_err(|e| format!("failed to open standard library: {:?}", e))?;

    let state = vm.main_state();
    luars_regex::open_regex(state).map_err(|e| state.get_error_msg(e))?;

    let script_name = cli.script.as_ref().map(|p| p.display().to_string());
    setup_arg_table(state, script_name.as_deref(), &cli.args)
        .map_err(|e| state.get_error_msg(e))?;

    for code in &cli.execute {
        run_chunk(state, code, "(command line)")?;
    }

    if let Some(script) = &cli.script {
        let code = read_script(script)?;
        let name = script_name.as_deref().unwrap_or("stdin");
        run_chunk(state, &code, name)?;
    }

    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.info {
        match serde_json::to_string_pretty(&luars_regex::query_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("luare: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(msg) = run(&cli) {
        eprintln!("luare: {}", msg);
        process::exit(1);
    }
}
