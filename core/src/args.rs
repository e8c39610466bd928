//! Command-line encoding for platforms that take one flat command string
//!
//! Windows `CreateProcessW` receives a single command line which the child's
//! C runtime splits back into `argv`. The functions here produce a string
//! that the MSVC argument parser (and `CommandLineToArgvW`) turns back into
//! exactly the logical arguments given:
//!
//! - an argument with no whitespace and no `"` is emitted as-is
//! - an argument containing whitespace (or an empty argument) is wrapped in `"`
//! - an embedded `"` is escaped as `\"`, and any backslashes immediately
//!   preceding it (or preceding the closing quote) are doubled
//!
//! The first argument is special. The runtime reads the program name without
//! any backslash processing: a `"` only toggles quoting and can never be part
//! of the name. [`quote_program_name`] emits it under that rule, so
//! `C:\Program Files\hatch\` keeps its single trailing backslash, and a
//! name containing `"` is rejected.
//!
//! POSIX platforms hand `argv` to `exec` directly and never need this step.

use crate::{CoreError, Result};
use std::borrow::Cow;

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b')
}

/// Quote a single argument so it survives command-line splitting unchanged
pub fn quote_argument(arg: &str) -> Cow<'_, str> {
    let wrap = arg.is_empty() || arg.chars().any(is_separator);
    if !wrap && !arg.contains('"') {
        return Cow::Borrowed(arg);
    }

    let mut out = String::with_capacity(arg.len() + 2);
    if wrap {
        out.push('"');
    }

    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                continue;
            }
            '"' => {
                // 2n+1 backslashes produce n literal backslashes and a literal quote
                push_backslashes(&mut out, backslashes * 2 + 1);
                out.push('"');
            }
            _ => {
                push_backslashes(&mut out, backslashes);
                out.push(c);
            }
        }
        backslashes = 0;
    }

    if wrap {
        // Trailing backslashes would otherwise escape the closing quote
        push_backslashes(&mut out, backslashes * 2);
        out.push('"');
    } else {
        push_backslashes(&mut out, backslashes);
    }

    Cow::Owned(out)
}

fn push_backslashes(out: &mut String, count: usize) {
    out.extend(std::iter::repeat('\\').take(count));
}

/// Quote the program name, the first element of a command line
///
/// # Errors
///
/// Returns [`CoreError::ProcessSpawn`] if `name` contains `"`, which the
/// runtime cannot deliver as part of a program name.
pub fn quote_program_name(name: &str) -> Result<Cow<'_, str>> {
    if name.contains('"') {
        return Err(CoreError::ProcessSpawn(format!(
            "program name {:?} contains a double quote",
            name
        )));
    }
    if name.is_empty() || name.chars().any(is_separator) {
        Ok(Cow::Owned(format!("\"{}\"", name)))
    } else {
        Ok(Cow::Borrowed(name))
    }
}

/// Join logical arguments into one command line, quoting where required
///
/// The first element is encoded with [`quote_program_name`], the rest with
/// [`quote_argument`].
///
/// ```
/// use hatch_core::args::encode_command_line;
///
/// let line = encode_command_line(&["probe.exe", "exten\"sion-te\"st", "socket name"]).unwrap();
/// assert_eq!(line, r#"probe.exe exten\"sion-te\"st "socket name""#);
/// ```
///
/// # Errors
///
/// Fails when the program name cannot be represented; see [`quote_program_name`].
pub fn encode_command_line<S: AsRef<str>>(args: &[S]) -> Result<String> {
    let Some((program, rest)) = args.split_first() else {
        return Ok(String::new());
    };

    let mut parts = Vec::with_capacity(args.len());
    parts.push(quote_program_name(program.as_ref())?);
    parts.extend(rest.iter().map(|arg| quote_argument(arg.as_ref())));
    Ok(parts.join(" "))
}
