use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use argent_argparse::{Payload, ResolvedArgs, Schema, SchemaError, Value, help};
use serde_json::json;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    init_tracing();

    let argv: Vec<String> = std::env::args().collect();
    let schema = build_schema().context("invalid CLI definition")?;

    let resolved = match schema.parse(&argv) {
        Ok(resolved) => resolved,
        Err(diagnostic) => {
            let mut err = StandardStream::stderr(color_choice(std::io::stderr().is_terminal()));
            help::render(&schema, Some(&diagnostic), &argv, &mut err)?;
            std::process::exit(2);
        }
    };

    if flag_bool(&resolved, "help")? {
        return print_help(&schema, &argv);
    }

    run(&schema, &resolved, &argv)
}

fn build_schema() -> Result<Schema, SchemaError> {
    let mut schema = Schema::new("argent", "Showcase CLI built on the argent argument parser");

    schema.register_command("greet", "g", "Print a greeting for the given name", "world")?;
    schema.register_command("farewell", "f", "Print a farewell for the given name", "world")?;

    schema.register_flag("help", "h", "Show this help text", false)?;
    schema.register_flag("json", "j", "Emit the resolved arguments as JSON", false)?;
    schema.register_flag("quiet", "q", "Suppress all output", false)?;
    schema.register_flag("repeat", "n", "How many times to print the message", 1i64)?;
    schema.register_flag("delay", "d", "Seconds to pause between repeats", 0.0f64)?;

    Ok(schema)
}

fn run(schema: &Schema, resolved: &ResolvedArgs, argv: &[String]) -> Result<()> {
    if flag_bool(resolved, "json")? {
        return print_json(resolved);
    }

    let Some(command) = resolved.command() else {
        return print_help(schema, argv);
    };
    tracing::debug!(command, "executing command");

    let name: String = resolved
        .command_value(command)
        .with_context(|| format!("command `{command}` is not registered"))?
        .get()?;
    let message = match command {
        "greet" => format!("Hello, {name}!"),
        "farewell" => format!("Goodbye, {name}!"),
        other => bail!("command `{other}` is registered but not implemented"),
    };

    emit(resolved, &message)
}

fn emit(resolved: &ResolvedArgs, message: &str) -> Result<()> {
    if flag_bool(resolved, "quiet")? {
        return Ok(());
    }

    let repeat = flag(resolved, "repeat")?.get::<i64>()?;
    let delay = flag(resolved, "delay")?.get::<f64>()?;
    for i in 0..repeat {
        if i > 0 && delay > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(delay));
        }
        println!("{message}");
    }

    Ok(())
}

fn print_json(resolved: &ResolvedArgs) -> Result<()> {
    let mut flags = serde_json::Map::new();
    for (name, value) in resolved.flags() {
        flags.insert(name.to_string(), payload_json(value));
    }
    let argument = resolved
        .command()
        .and_then(|command| resolved.command_value(command))
        .map(payload_json);

    let report = json!({
        "command": resolved.command(),
        "argument": argument,
        "flags": flags,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn payload_json(value: &Value) -> serde_json::Value {
    match value.payload() {
        Payload::Str(s) => json!(s),
        Payload::Int(i) => json!(i),
        Payload::Float(x) => json!(x),
        Payload::Bool(b) => json!(b),
    }
}

fn print_help(schema: &Schema, argv: &[String]) -> Result<()> {
    let mut out = StandardStream::stdout(color_choice(std::io::stdout().is_terminal()));
    help::render(schema, None, argv, &mut out)?;
    Ok(())
}

fn flag<'a>(resolved: &'a ResolvedArgs, name: &str) -> Result<&'a Value> {
    resolved
        .flag(name)
        .with_context(|| format!("flag `{name}` is not registered"))
}

fn flag_bool(resolved: &ResolvedArgs, name: &str) -> Result<bool> {
    Ok(flag(resolved, name)?.get::<bool>()?)
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal { ColorChoice::Auto } else { ColorChoice::Never }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
