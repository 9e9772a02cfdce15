use std::collections::HashSet;
use std::fmt;

use crate::schema::{Namespace, Schema};
use crate::value::{Payload, Value, ValueKind};

/// What a parse run tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A bare token where a command was expected, matching nothing.
    UnknownCommand,
    /// A `--`/`-` token matching no registered flag.
    UnknownFlag,
    /// A non-bool command or flag with no usable value token after it.
    ExpectedValue,
    /// A stray token after the command was already matched.
    NotExpectedValue,
    /// A value token that failed numeric coercion.
    TypeMismatch,
}

impl DiagnosticKind {
    /// One-line error message for the help banner.
    pub fn message(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownCommand => "Unknown command",
            DiagnosticKind::UnknownFlag => "Unknown flag",
            DiagnosticKind::ExpectedValue => "Expected a value",
            DiagnosticKind::NotExpectedValue => "Unexpected value",
            DiagnosticKind::TypeMismatch => "Type mismatch",
        }
    }

    /// Suggested fix shown under the offending token.
    pub fn hint(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownCommand => "use --help to see a list of commands",
            DiagnosticKind::UnknownFlag => "use --help to see a list of flags",
            DiagnosticKind::ExpectedValue => "add a value after this",
            DiagnosticKind::NotExpectedValue => "remove this",
            DiagnosticKind::TypeMismatch => "change the value to match the expected type",
        }
    }
}

/// The single diagnostic a failed parse produces: what went wrong plus the
/// offending token's position in the argv that was parsed.
///
/// The index counts from the start of the full argv (the program path sits at
/// index 0 and is never itself scanned). `None` means the error has no
/// specific token to point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    index: Option<usize>,
}

impl Diagnostic {
    fn at(kind: DiagnosticKind, index: usize) -> Self {
        Diagnostic { kind, index: Some(index) }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The offending token, looked up in the argv the parse ran over.
    pub fn token<'a>(&self, argv: &'a [String]) -> Option<&'a str> {
        argv.get(self.index?).map(String::as_str)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{} at argv index {i}", self.kind.message()),
            None => f.write_str(self.kind.message()),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Read-only view over the schema after a successful parse: every matched
/// command/flag carries its parsed payload, everything else keeps the
/// declared default.
#[derive(Debug, Clone)]
pub struct ResolvedArgs {
    commands: Namespace,
    flags: Namespace,
    command: Option<String>,
    explicit_flags: HashSet<String>,
}

impl ResolvedArgs {
    /// Canonical name of the matched command, if any.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Flag lookup by canonical name or alias.
    pub fn flag(&self, key: &str) -> Option<&Value> {
        self.flags.get(key)
    }

    /// Command lookup by canonical name or alias. Returns the entry whether
    /// or not it was matched; combine with [`ResolvedArgs::command`].
    pub fn command_value(&self, key: &str) -> Option<&Value> {
        self.commands.get(key)
    }

    /// Whether the flag appeared in argv (as opposed to holding its default).
    pub fn is_explicit(&self, key: &str) -> bool {
        self.flags
            .resolve(key)
            .is_some_and(|name| self.explicit_flags.contains(name))
    }

    /// Flags in registration order.
    pub fn flags(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.flags.iter()
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.commands.iter()
    }
}

impl Schema {
    /// Runs the classification state machine over the full process argv.
    ///
    /// `argv[0]` is the program invocation path and is not scanned, but
    /// diagnostic indices refer to positions in `argv` exactly as given.
    /// Scanning stops at the first offending token; no later token is
    /// inspected and at most one diagnostic is produced per call.
    pub fn parse(&self, argv: &[String]) -> Result<ResolvedArgs, Diagnostic> {
        let mut commands = self.commands.clone();
        let mut flags = self.flags.clone();
        let mut command: Option<String> = None;
        let mut explicit_flags: HashSet<String> = HashSet::new();

        let mut i = 1;
        while i < argv.len() {
            let token = argv[i].as_str();

            if let Some(rest) = token.strip_prefix("--") {
                // Long form matches the canonical name only, never an alias.
                let Some((name, kind)) = self.flags.lookup_name(rest) else {
                    return Err(Diagnostic::at(DiagnosticKind::UnknownFlag, i));
                };
                let (payload, next) = self.take_value(kind, i, argv)?;
                if let Some(value) = flags.get_mut(&name) {
                    value.set_payload(payload);
                }
                explicit_flags.insert(name);
                i = next;
            } else if let Some(rest) = token.strip_prefix('-') {
                // Short form resolves through the alias table only.
                let Some((name, kind)) = self.flags.lookup_alias(rest) else {
                    return Err(Diagnostic::at(DiagnosticKind::UnknownFlag, i));
                };
                let (payload, next) = self.take_value(kind, i, argv)?;
                if let Some(value) = flags.get_mut(&name) {
                    value.set_payload(payload);
                }
                explicit_flags.insert(name);
                i = next;
            } else if command.is_none() {
                let Some((name, kind)) = self.commands.lookup(token) else {
                    return Err(Diagnostic::at(DiagnosticKind::UnknownCommand, i));
                };
                let (payload, next) = self.take_value(kind, i, argv)?;
                if let Some(value) = commands.get_mut(&name) {
                    value.set_payload(payload);
                }
                tracing::debug!(command = %name, "matched command");
                command = Some(name);
                i = next;
            } else {
                // At most one command per invocation; once it is matched, a
                // bare token belongs to nothing.
                return Err(Diagnostic::at(DiagnosticKind::NotExpectedValue, i));
            }
        }

        Ok(ResolvedArgs { commands, flags, command, explicit_flags })
    }

    /// Presence/value semantics for the entry matched at `at`. Returns the
    /// payload to store and the index of the next unread token.
    ///
    /// Bool entries are pure switches: presence sets `true` and the following
    /// token, even a literal `true`/`false`, is left for normal
    /// classification. Every other kind requires the next token as its value.
    fn take_value(
        &self,
        kind: ValueKind,
        at: usize,
        argv: &[String],
    ) -> Result<(Payload, usize), Diagnostic> {
        if kind == ValueKind::Bool {
            return Ok((Payload::Bool(true), at + 1));
        }

        let Some(candidate) = argv.get(at + 1) else {
            return Err(Diagnostic::at(DiagnosticKind::ExpectedValue, at));
        };
        if self.is_known_token(candidate) {
            // A registered flag or command can never be consumed as a value.
            return Err(Diagnostic::at(DiagnosticKind::ExpectedValue, at));
        }

        match coerce(kind, candidate) {
            Some(payload) => Ok((payload, at + 2)),
            None => Err(Diagnostic::at(DiagnosticKind::TypeMismatch, at + 1)),
        }
    }
}

fn coerce(kind: ValueKind, raw: &str) -> Option<Payload> {
    match kind {
        ValueKind::Str => Some(Payload::Str(raw.to_string())),
        ValueKind::Int => parse_int(raw).map(Payload::Int),
        ValueKind::Float => parse_float(raw).map(Payload::Float),
        // Bool entries never consume a value token.
        ValueKind::Bool => None,
    }
}

/// Strict decimal integer grammar: optional leading sign, then digits only.
/// Out-of-range literals are rejected like any other non-integer.
fn parse_int(raw: &str) -> Option<i64> {
    let body = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Strict decimal/exponent grammar. `f64::from_str` alone would accept
/// `inf`/`NaN`, which the grammar does not.
fn parse_float(raw: &str) -> Option<f64> {
    if !is_float_literal(raw) {
        return None;
    }
    raw.parse().ok()
}

fn is_float_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let mantissa_ok = match mantissa.split_once('.') {
        // "5.", ".5", "5.5" are all fine; a lone "." is not.
        Some(("", "")) => false,
        Some(("", frac)) => all_digits(frac),
        Some((int, "")) => all_digits(int),
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(mantissa),
    };

    let exponent_ok = match exponent {
        Some(e) => all_digits(e.strip_prefix(['+', '-']).unwrap_or(e)),
        None => true,
    };

    mantissa_ok && exponent_ok
}
