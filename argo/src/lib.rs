//! Native Rust implementation of the argo argument tokenizer.
//!
//! Small declarative command-line tokenizer:
//! - the caller builds a table of [`ArgOption`] rows (short name, long name,
//!   value type, description)
//! - [`tokenize`] scans argv left to right, marks matched options `found`,
//!   binds the following token to non-boolean options, and returns the
//!   unformatted tail introduced by a literal `--`
//! - errors come back as a [`TokenizeError`] value carrying the offending
//!   position and token; the library itself never prints
//!
//! Deliberately out of scope: `--opt=value` syntax, repeated-occurrence
//! accumulation (last match wins) and value parsing (an `Integer` option
//! still binds a plain string; the caller converts it).

use std::io;
use std::io::Write;

// ============================================================================
// Result and Error types
// ============================================================================

pub type Result<T> = std::result::Result<T, TokenizeError>;

/// First failure encountered during one [`tokenize`] call.
///
/// `arg_pos` is always an index into the argv slice handed to [`tokenize`]
/// (so position 1 is the first token after the program name).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// A `--name` token whose name is not in the table. Carries the name
    /// without the leading dashes.
    #[error("unknown flag (argv {arg_pos}, {name})")]
    UnknownLongFlag { arg_pos: usize, name: String },

    /// A character of a short token (`-x` or a cluster `-xyz`) matched no
    /// table entry. Carries both the character and the full token.
    #[error("unknown flag (argv {arg_pos}, {short}, {arg})")]
    UnknownShortFlag {
        arg_pos: usize,
        arg: String,
        short: char,
    },

    /// A token that does not parse as a flag showed up where a flag was
    /// expected (bare `-`, `---x`, or a word outside the `--` tail).
    #[error("expected flag (argv {arg_pos}, {arg})")]
    ExpectedFlag { arg_pos: usize, arg: String },

    /// A non-boolean flag matched as the last token, with nothing left to
    /// bind as its value.
    #[error("expected value (argv {arg_pos}, {arg})")]
    ExpectedValue { arg_pos: usize, arg: String },

    /// A table entry uses `'-'` as its short name. Malformed table, not
    /// malformed input; never produced by well-formed callers.
    #[error("found dash as short name in option table (contact program developer)")]
    DashAsShort,
}

// ============================================================================
// Flag classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Long,
    Short,
    Unformatted,
    NotAFlag,
}

/// Classify a single token.
///
/// `Long` is `--name` (non-empty, no third dash), `Short` is `-x...` with at
/// least one character after the dash, `Unformatted` is exactly `--`, and
/// everything else (bare `-`, `---...`, plain words) is `NotAFlag`.
pub fn flag_kind(arg: &str) -> FlagKind {
    if arg.starts_with("--") {
        let rest = &arg[2..];
        if rest.is_empty() {
            return FlagKind::Unformatted;
        }
        if rest.starts_with('-') {
            return FlagKind::NotAFlag;
        }
        return FlagKind::Long;
    }

    if arg.starts_with('-') && arg.len() > 1 {
        return FlagKind::Short;
    }

    FlagKind::NotAFlag
}

// ============================================================================
// Option table
// ============================================================================

/// Value type of an option. Descriptive only: it selects the help hint and
/// decides whether the flag consumes a following token, nothing is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Boolean,
    Integer,
    Float,
    String,
}

/// One row of the option table.
///
/// `found` and `value` start out unset and are written by [`tokenize`]; the
/// remaining fields are the caller's declaration. Entries may omit the short
/// name, the long name, or both (a nameless row can never match and only
/// shows up in help output).
#[derive(Debug, Clone)]
pub struct ArgOption {
    pub short_name: Option<char>,
    pub long_name: Option<String>,
    pub arg_type: ArgType,
    pub description: String,
    pub found: bool,
    pub value: Option<String>,
}

impl ArgOption {
    pub fn new(arg_type: ArgType, description: &str) -> Self {
        ArgOption {
            short_name: None,
            long_name: None,
            arg_type,
            description: description.to_string(),
            found: false,
            value: None,
        }
    }

    pub fn short(mut self, c: char) -> Self {
        self.short_name = Some(c);
        self
    }

    pub fn long(mut self, name: &str) -> Self {
        self.long_name = Some(name.to_string());
        self
    }
}

// ============================================================================
// Table lookup and matching
// ============================================================================

fn find_long_option(options: &[ArgOption], name: &str) -> Option<usize> {
    options
        .iter()
        .position(|opt| opt.long_name.as_deref() == Some(name))
}

fn find_short_option(options: &[ArgOption], c: char) -> Result<Option<usize>> {
    for (i, opt) in options.iter().enumerate() {
        match opt.short_name {
            None => continue,
            Some('-') => return Err(TokenizeError::DashAsShort),
            Some(short) if short == c => return Ok(Some(i)),
            Some(_) => {}
        }
    }
    Ok(None)
}

/// Match a `--name` token against the table. First match in table order
/// wins; duplicate long names are a caller precondition violation.
fn match_long_option(
    options: &mut [ArgOption],
    arg: &str,
    arg_pos: usize,
    ignore_unknown_flags: bool,
) -> Result<Option<usize>> {
    let name = &arg[2..];
    match find_long_option(options, name) {
        Some(i) => {
            options[i].found = true;
            Ok(Some(i))
        }
        None if ignore_unknown_flags => Ok(None),
        None => Err(TokenizeError::UnknownLongFlag {
            arg_pos,
            name: name.to_string(),
        }),
    }
}

/// Match a short token, possibly a cluster like `-abc`, one character at a
/// time. Returns the last matched entry and whether the token combined more
/// than one character (ignored unknown characters count toward that).
///
/// A non-boolean option packed into a multi-character cluster is marked
/// `found` but the combined marker keeps the driver from consuming the next
/// token as its value. Only a lone single-character short flag binds a value.
fn match_short_cluster(
    options: &mut [ArgOption],
    arg: &str,
    arg_pos: usize,
    ignore_unknown_flags: bool,
) -> Result<(Option<usize>, bool)> {
    let mut matched = None;
    let mut seen = 0usize;

    for c in arg[1..].chars() {
        seen += 1;
        match find_short_option(options, c)? {
            Some(i) => {
                options[i].found = true;
                matched = Some(i);
            }
            None => {
                if !ignore_unknown_flags {
                    return Err(TokenizeError::UnknownShortFlag {
                        arg_pos,
                        arg: arg.to_string(),
                        short: c,
                    });
                }
            }
        }
    }

    Ok((matched, seen > 1))
}

// ============================================================================
// Scan driver
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenMode {
    Flag,
    Value,
}

/// Scan `argv` against the option table.
///
/// `argv[0]` is taken to be the program name and skipped. Tokens are
/// classified and matched in order; matched options get `found` set and, for
/// non-boolean types matched as a long flag or a lone short flag, the next
/// token is bound verbatim as `value` (it is never classified, so `-o -v`
/// binds the literal string `-v`). A later match of the same option
/// overwrites the earlier value.
///
/// The literal token `--` ends the scan successfully: `Ok(Some(tail))` is
/// the run of remaining tokens, untouched and unvalidated, or `Ok(None)` if
/// `--` was the last token. `Ok(None)` is also the plain everything-matched
/// outcome.
///
/// With `ignore_unknown_flags` set, unmatched long flags and unmatched
/// characters of short clusters are skipped instead of failing. The scan
/// stops at the first error in every other case.
pub fn tokenize<'a>(
    options: &mut [ArgOption],
    argv: &'a [String],
    ignore_unknown_flags: bool,
) -> Result<Option<&'a [String]>> {
    let mut mode = TokenMode::Flag;
    let mut value_target = 0usize;

    for (arg_pos, arg) in argv.iter().enumerate().skip(1) {
        match mode {
            TokenMode::Flag => match flag_kind(arg) {
                FlagKind::Long => {
                    if let Some(i) = match_long_option(options, arg, arg_pos, ignore_unknown_flags)?
                    {
                        if options[i].arg_type != ArgType::Boolean {
                            value_target = i;
                            mode = TokenMode::Value;
                        }
                    }
                }
                FlagKind::Short => {
                    let (matched, combined) =
                        match_short_cluster(options, arg, arg_pos, ignore_unknown_flags)?;
                    if let Some(i) = matched {
                        if !combined && options[i].arg_type != ArgType::Boolean {
                            value_target = i;
                            mode = TokenMode::Value;
                        }
                    }
                }
                FlagKind::Unformatted => {
                    if arg_pos + 1 < argv.len() {
                        return Ok(Some(&argv[arg_pos + 1..]));
                    }
                    return Ok(None);
                }
                FlagKind::NotAFlag => {
                    return Err(TokenizeError::ExpectedFlag {
                        arg_pos,
                        arg: arg.clone(),
                    });
                }
            },
            TokenMode::Value => {
                options[value_target].value = Some(arg.clone());
                mode = TokenMode::Flag;
            }
        }
    }

    if mode == TokenMode::Value {
        // The flag demanding the value is the last token.
        let arg_pos = argv.len() - 1;
        return Err(TokenizeError::ExpectedValue {
            arg_pos,
            arg: argv[arg_pos].clone(),
        });
    }

    Ok(None)
}

// ============================================================================
// Help rendering
// ============================================================================

fn type_hint(arg_type: ArgType) -> &'static str {
    match arg_type {
        ArgType::Boolean => "",
        ArgType::Integer => " <int>",
        ArgType::Float => " <num>",
        ArgType::String => " <str>",
    }
}

fn flag_column(opt: &ArgOption) -> String {
    let hint = type_hint(opt.arg_type);
    match (opt.short_name, opt.long_name.as_deref()) {
        (Some(short), Some(long)) => format!("  -{}, --{}{}", short, long, hint),
        (Some(short), None) => format!("  -{}{}", short, hint),
        (None, Some(long)) => format!("      --{}{}", long, hint),
        (None, None) => format!("  (none){}", hint),
    }
}

/// Render the option table as help text: one line per option, flag column
/// left-aligned to the widest row, trailing blank line.
pub fn write_help<W: Write>(options: &[ArgOption], out: &mut W) -> io::Result<()> {
    let max_flag_len = options
        .iter()
        .map(|opt| flag_column(opt).len())
        .max()
        .unwrap_or(0);

    for opt in options {
        write!(
            out,
            "{:<width$} {}\n",
            flag_column(opt),
            opt.description,
            width = max_flag_len
        )?;
    }
    write!(out, "\n")?;

    Ok(())
}

pub fn print_help(options: &[ArgOption]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = write_help(options, &mut out);
}

// ============================================================================
// Terminal width
// ============================================================================

/// Column count of the attached terminal, or 80 when stdout is not a
/// terminal (or the platform gives us no way to ask).
#[cfg(unix)]
pub fn terminal_width() -> usize {
    use nix::libc::{ioctl, winsize, STDOUT_FILENO, TIOCGWINSZ};

    let mut ws = winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let rc = unsafe { ioctl(STDOUT_FILENO, TIOCGWINSZ as _, &mut ws) };
    if rc == 0 && ws.ws_col > 0 {
        ws.ws_col as usize
    } else {
        80
    }
}

#[cfg(not(unix))]
pub fn terminal_width() -> usize {
    80
}

// ============================================================================
// Tests
// ============================================================================
