//! Schema-driven command line argument parsing.
//!
//! The crate owns a flat schema of commands and flags. Each entry has a
//! canonical name (matched in `--long` form for flags, or as a bare token for
//! commands), a short alias (matched in `-short` form, or as an alternate
//! command token), a description, and a typed default payload.
//!
//! [`Schema::parse`] runs the full argv through a small classification state
//! machine and either returns a [`ResolvedArgs`] snapshot (defaults plus
//! whatever argv overrode) or the first offending token as a [`Diagnostic`].
//! No second diagnostic is ever produced for one parse call.
//!
//! Help rendering over the same schema, including the diagnostic banner,
//! lives in [`help`].

pub mod help;
mod parse;
mod schema;
mod value;

pub use parse::{Diagnostic, DiagnosticKind, ResolvedArgs};
pub use schema::{Schema, SchemaError};
pub use value::{FromPayload, Payload, TypeMismatch, Value, ValueKind};
