//! Help-screen rendering over a [`Schema`], with an optional diagnostic
//! banner pointing at the offending argv token.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::parse::Diagnostic;
use crate::schema::Schema;
use crate::value::Value;

/// Renders the full help screen to `out`.
///
/// `argv` is the argument list the diagnostic (if any) refers to; `argv[0]`
/// supplies the binary name for the usage and error context lines. When the
/// diagnostic carries no token index, the binary name itself is underlined.
pub fn render(
    schema: &Schema,
    diagnostic: Option<&Diagnostic>,
    argv: &[String],
    out: &mut dyn WriteColor,
) -> io::Result<()> {
    let bin = argv.first().map(String::as_str).unwrap_or_else(|| schema.name());

    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "{}", schema.name())?;
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(out, "{}", schema.description())?;
    out.reset()?;
    writeln!(out)?;

    if let Some(diag) = diagnostic {
        render_error(diag, argv, bin, out)?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    writeln!(out, "Usage:")?;
    out.reset()?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
    write!(out, "  {bin} ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    write!(out, "[--flags] ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "<command> ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    write!(out, "[<args>] ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    writeln!(out, "[--flags]")?;
    out.reset()?;
    writeln!(out)?;

    if !schema.commands.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "Available commands:")?;
        out.reset()?;
        for (name, value) in schema.commands.iter() {
            let alias = schema.commands.alias_of(name).unwrap_or("");
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, "  {name}, {alias}")?;
            write_entry_info(value, out)?;
        }
        writeln!(out)?;
    }

    if !schema.flags.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "Available flags:")?;
        out.reset()?;
        for (name, value) in schema.flags.iter() {
            let alias = schema.flags.alias_of(name).unwrap_or("");
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
            write!(out, "  --{name}, -{alias}")?;
            write_entry_info(value, out)?;
        }
    }

    out.reset()?;
    Ok(())
}

/// Renders to an in-memory buffer with colors disabled. Handy for tests and
/// for non-terminal output.
pub fn render_plain(schema: &Schema, diagnostic: Option<&Diagnostic>, argv: &[String]) -> String {
    let mut buf = Buffer::no_color();
    // Writes to an in-memory buffer do not fail.
    let _ = render(schema, diagnostic, argv, &mut buf);
    String::from_utf8_lossy(buf.as_slice()).into_owned()
}

fn render_error(
    diag: &Diagnostic,
    argv: &[String],
    bin: &str,
    out: &mut dyn WriteColor,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "Error: ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    writeln!(out, "{}", diag.kind().message())?;
    out.reset()?;

    write!(out, "  ➤ ")?;
    match diag.token(argv) {
        Some(token) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
            write!(out, "{bin}")?;
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, " ... ")?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_underline(true))?;
            writeln!(out, "{token}")?;
        }
        None => {
            // No specific token to blame; point at the invocation itself.
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_underline(true))?;
            writeln!(out, "{bin}")?;
        }
    }
    out.reset()?;

    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(out, "    ⤷ help: {}", diag.kind().hint())?;
    out.reset()?;
    writeln!(out)
}

fn write_entry_info(value: &Value, out: &mut dyn WriteColor) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(out, " ~ {}", value.description())?;
    writeln!(out, "    [type={}, default={}]", value.kind(), value.payload())?;
    out.reset()
}
