//! Path pattern compilation.
//!
//! Turns a canonical path such as `/users/{id}/posts/{slug:[a-z0-9-]+}` into an
//! anchored regex that extracts the placeholders in left-to-right order.
//!
//! - Characters outside placeholders are literal and escaped with
//!   [`regex::escape`], so `/v1.0/files` only matches a literal dot.
//! - `{name}` matches one or more characters other than `/`.
//! - `{name:fragment}` matches `fragment` verbatim. Braces inside the fragment
//!   (e.g. `{year:\d{4}}`) are balanced; `\{`/`\}` and braces inside a
//!   character class (`[^}]`) are skipped. Each fragment must be a valid
//!   regex on its own.
//! - The whole expression is anchored at both ends.
//!
//! Placeholder names are `[A-Za-z0-9_]+` and must be unique within a pattern.
//! Capture groups are given internal slot names (`__p0`, `__p1`, ...) so names
//! starting with a digit work and groups inside a fragment do not shift the
//! parameter positions.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

use super::core::ParamVec;
use crate::error::RouterError;

/// Default expression for a bare `{name}` placeholder.
const DEFAULT_SEGMENT: &str = "[^/]+";

/// A path pattern compiled into an anchored matcher.
#[derive(Clone)]
pub struct CompiledPattern {
    /// Source pattern, e.g. `/api/users/{id}`
    path: String,
    regex: Regex,
    /// Placeholder names in the order they appear in `path`
    param_names: Vec<Arc<str>>,
    /// Regex group name used for each entry of `param_names`
    slots: Vec<String>,
}

impl CompiledPattern {
    /// Compile `path` into a matcher.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] for an unmatched `{` or `}`, an empty or
    /// non-`[A-Za-z0-9_]` name, an empty fragment, a duplicate name, or a
    /// fragment the regex engine rejects.
    pub fn compile(path: &str) -> Result<Self, RouterError> {
        let mut expr = String::with_capacity(path.len() * 2 + 2);
        expr.push('^');
        let placeholders = path.matches('{').count();
        let mut param_names: Vec<Arc<str>> = Vec::with_capacity(placeholders);
        let mut slots = Vec::with_capacity(placeholders);

        let mut rest = path;
        while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
            let (literal, tail) = rest.split_at(pos);
            expr.push_str(&regex::escape(literal));

            if tail.starts_with('}') {
                return Err(RouterError::invalid_pattern(path, "unmatched '}'"));
            }
            let close = placeholder_end(tail)
                .ok_or_else(|| RouterError::invalid_pattern(path, "unclosed '{'"))?;

            let body = &tail[1..close];
            let (name, fragment) = match body.split_once(':') {
                Some((name, fragment)) => (name, Some(fragment)),
                None => (body, None),
            };
            validate_name(path, name)?;
            if param_names.iter().any(|n| n.as_ref() == name) {
                return Err(RouterError::invalid_pattern(
                    path,
                    format!("duplicate parameter '{name}'"),
                ));
            }
            let fragment = match fragment {
                Some("") => {
                    return Err(RouterError::invalid_pattern(
                        path,
                        format!("empty expression for parameter '{name}'"),
                    ))
                }
                // A fragment must be a regex on its own so it cannot close
                // its capture group early.
                Some(fragment) => {
                    Regex::new(fragment).map_err(|e| {
                        RouterError::invalid_pattern(
                            path,
                            format!("invalid expression for parameter '{name}': {e}"),
                        )
                    })?;
                    fragment
                }
                None => DEFAULT_SEGMENT,
            };

            let slot = format!("__p{}", slots.len());
            expr.push_str("(?P<");
            expr.push_str(&slot);
            expr.push('>');
            expr.push_str(fragment);
            expr.push(')');

            param_names.push(Arc::from(name));
            slots.push(slot);
            rest = &tail[close + 1..];
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex =
            Regex::new(&expr).map_err(|e| RouterError::invalid_pattern(path, e.to_string()))?;

        Ok(Self {
            path: path.to_string(),
            regex,
            param_names,
            slots,
        })
    }

    /// The source pattern this matcher was compiled from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The generated regular expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Placeholder names in left-to-right order.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    #[inline]
    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// Match `subject` and extract the parameters.
    ///
    /// Returns `None` when the subject does not match. The whole-match group
    /// is never part of the result.
    #[must_use]
    pub fn captures(&self, subject: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(subject)?;
        let mut params = ParamVec::new();
        for (name, slot) in self.param_names.iter().zip(&self.slots) {
            if let Some(m) = caps.name(slot) {
                params.push((Arc::clone(name), m.as_str().to_string()));
            }
        }
        Some(params)
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("path", &self.path)
            .field("regex", &self.regex.as_str())
            .field("param_names", &self.param_names)
            .finish()
    }
}

/// Position inside a `[...]` character class.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassState {
    /// Right after `[`: `^` negates and `]` is literal
    Open,
    /// Right after `[^`: `]` is literal
    Negated,
    Body,
}

/// Byte offset of the `}` closing the placeholder that `tail` starts with.
///
/// Braces inside a character class (`[^}]`, `[{]`) and escaped braces are
/// not counted.
fn placeholder_end(tail: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    let mut class: Option<ClassState> = None;
    for (idx, c) in tail.char_indices().skip(1) {
        if escaped {
            escaped = false;
            if class.is_some() {
                class = Some(ClassState::Body);
            }
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if let Some(state) = class {
            class = match (state, c) {
                (ClassState::Open, '^') => Some(ClassState::Negated),
                (ClassState::Open | ClassState::Negated, _) => Some(ClassState::Body),
                (ClassState::Body, ']') => None,
                (ClassState::Body, _) => Some(ClassState::Body),
            };
            continue;
        }
        match c {
            '[' => class = Some(ClassState::Open),
            '{' => depth += 1,
            '}' if depth == 0 => return Some(idx),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn validate_name(path: &str, name: &str) -> Result<(), RouterError> {
    if name.is_empty() {
        return Err(RouterError::invalid_pattern(path, "empty parameter name"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RouterError::invalid_pattern(
            path,
            format!("invalid parameter name '{name}'"),
        ));
    }
    Ok(())
}
