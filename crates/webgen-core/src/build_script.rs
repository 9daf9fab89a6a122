//! Surgical patching of the generated build script
//!
//! The Gruntfile template ships with an empty `grunt.initConfig({})` call.
//! After composition, the single argument of that call is replaced with the
//! serialized build-task config and the whole file is re-indented. The call
//! is located structurally (string- and nesting-aware scan), never by
//! regex splicing. Exactly one call with arity one must exist; anything
//! else means the template was corrupted or the target name changed, and is
//! a fatal error.

use crate::error::GenerateError;
use serde_json::Value;

/// The one call expression this patcher recognizes
pub const PATCH_CALLEE: &str = "grunt.initConfig";

const INDENT: &str = "  ";

/// A located call expression with a single argument slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CallSite {
    /// Byte offset just after the opening parenthesis
    arg_start: usize,
    /// Byte offset of the closing parenthesis
    arg_end: usize,
    arity: usize,
}

/// Replace the argument of the single `grunt.initConfig(...)` call
pub fn patch_init_config(source: &str, config: &Value) -> Result<String, GenerateError> {
    let sites: Vec<CallSite> = find_call_sites(source, PATCH_CALLEE)
        .into_iter()
        .filter(|site| site.arity == 1)
        .collect();

    if sites.len() != 1 {
        return Err(GenerateError::PatchTarget {
            callee: PATCH_CALLEE,
            matches: sites.len(),
        });
    }

    let site = sites[0];
    let literal = serde_json::to_string_pretty(config).unwrap_or_else(|_| "{}".to_string());

    let mut patched = String::with_capacity(source.len() + literal.len());
    patched.push_str(&source[..site.arg_start]);
    patched.push_str(&literal);
    patched.push_str(&source[site.arg_end..]);

    Ok(reindent(&patched))
}

/// Locate every `callee(...)` call expression outside strings and comments
fn find_call_sites(source: &str, callee: &str) -> Vec<CallSite> {
    let bytes = source.as_bytes();
    let mut sites = Vec::new();
    let mut scanner = Scanner::default();
    let mut i = 0;

    while i < bytes.len() {
        if !scanner.in_code() {
            scanner.step(bytes, &mut i);
            continue;
        }
        if bytes[i..].starts_with(callee.as_bytes()) && is_boundary(bytes, i, callee.len()) {
            let after = i + callee.len();
            if let Some(open) = next_non_space(bytes, after).filter(|&p| bytes[p] == b'(') {
                if let Some(site) = scan_argument(source, open) {
                    sites.push(site);
                    i = site.arg_end + 1;
                    continue;
                }
            }
        }
        scanner.step(bytes, &mut i);
    }

    sites
}

/// Walk from the opening parenthesis to its match, counting top-level commas
fn scan_argument(source: &str, open: usize) -> Option<CallSite> {
    let bytes = source.as_bytes();
    let mut scanner = Scanner::default();
    let mut depth = 0usize;
    let mut commas = 0usize;
    let mut i = open;

    while i < bytes.len() {
        if scanner.in_code() {
            match bytes[i] {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let arg = source[open + 1..i].trim();
                        let arity = if arg.is_empty() { 0 } else { commas + 1 };
                        return Some(CallSite {
                            arg_start: open + 1,
                            arg_end: i,
                            arity,
                        });
                    }
                }
                b',' if depth == 1 => commas += 1,
                _ => {}
            }
        }
        scanner.step(bytes, &mut i);
    }

    None
}

/// Normalize the whole source to two-space indentation
///
/// Line-based: a line opening brackets indents the lines after it, a line
/// starting with closers dedents itself. Bracket counting is string- and
/// comment-aware so literal braces inside strings do not skew depth.
fn reindent(source: &str) -> String {
    let mut out = String::new();
    let mut depth = 0usize;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push('\n');
            continue;
        }

        let leading_closers = trimmed
            .bytes()
            .take_while(|b| matches!(b, b')' | b']' | b'}'))
            .count();
        let line_depth = depth.saturating_sub(leading_closers);

        for _ in 0..line_depth {
            out.push_str(INDENT);
        }
        out.push_str(trimmed);
        out.push('\n');

        let (opens, closes) = bracket_balance(trimmed);
        depth = (depth + opens).saturating_sub(closes);
    }

    out
}

fn bracket_balance(line: &str) -> (usize, usize) {
    let bytes = line.as_bytes();
    let mut scanner = Scanner::default();
    let mut opens = 0;
    let mut closes = 0;
    let mut i = 0;

    while i < bytes.len() {
        if scanner.in_code() {
            match bytes[i] {
                b'(' | b'[' | b'{' => opens += 1,
                b')' | b']' | b'}' => closes += 1,
                _ => {}
            }
        }
        scanner.step(bytes, &mut i);
    }

    (opens, closes)
}

fn is_boundary(bytes: &[u8], start: usize, len: usize) -> bool {
    let before_ok = start == 0 || !is_ident_byte(bytes[start - 1]);
    let after_ok = start + len >= bytes.len() || !is_ident_byte(bytes[start + len]);
    before_ok && after_ok
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.'
}

fn next_non_space(bytes: &[u8], mut i: usize) -> Option<usize> {
    while i < bytes.len() {
        if !bytes[i].is_ascii_whitespace() {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Tracks string-literal and comment state byte by byte
///
/// Recognizes quoted strings (`'`, `"`, backtick) and `//` / `/* */`
/// comments. Regex literals are not modeled; the only inputs are build
/// scripts generated from the embedded template, which contain none.
#[derive(Default)]
struct Scanner {
    string_delim: Option<u8>,
    escaped: bool,
    in_line_comment: bool,
    in_block_comment: bool,
    prev: u8,
}

impl Scanner {
    fn in_code(&self) -> bool {
        self.string_delim.is_none() && !self.in_line_comment && !self.in_block_comment
    }

    fn step(&mut self, bytes: &[u8], i: &mut usize) {
        let b = bytes[*i];

        if let Some(delim) = self.string_delim {
            if self.escaped {
                self.escaped = false;
            } else if b == b'\\' {
                self.escaped = true;
            } else if b == delim {
                self.string_delim = None;
            }
        } else if self.in_line_comment {
            if b == b'\n' {
                self.in_line_comment = false;
            }
        } else if self.in_block_comment {
            if self.prev == b'*' && b == b'/' {
                self.in_block_comment = false;
            }
        } else {
            match b {
                b'"' | b'\'' | b'`' => self.string_delim = Some(b),
                b'/' if bytes.get(*i + 1) == Some(&b'/') => self.in_line_comment = true,
                b'/' if bytes.get(*i + 1) == Some(&b'*') => self.in_block_comment = true,
                _ => {}
            }
        }

        self.prev = b;
        *i += 1;
    }
}
