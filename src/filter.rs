use std::collections::{hash_set, HashSet};

use tracing::debug;

use crate::{COMMENT_PREFIX, EXTRAS_DELIMITER, URL_DELIMITER, VERSION_PIN};

/// Canonical form of a package name: drop any extras qualifier
/// (`foo[security]` => `foo`), trim, and lower-case.
///
/// Both exclusion entries and names pulled out of manifest lines go through
/// this, so the two sides always agree on what a package name is.
pub fn normalize(name: &str) -> String {
    let name = match name.split_once(EXTRAS_DELIMITER) {
        Some((head, _extras)) => head,
        None => name,
    };
    name.trim().to_lowercase()
}

/// Extract the normalized package name from a manifest line.
///
/// Returns `None` for blank and comment lines. Only pinned (`name==1.0`) and
/// direct reference (`name @ https://...`) forms are split; anything else is
/// taken whole, so e.g. `foo>=1.0` yields the name `foo>=1.0`.
pub fn extract_name(line: &str) -> Option<String> {
    match classify(line) {
        LineKind::PassThrough => None,
        LineKind::Requirement(name) => Some(name),
    }
}

/// How a single manifest line is treated by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Blank line or comment; always retained.
    PassThrough,
    /// A requirement specifier, carrying its normalized package name.
    Requirement(String),
}

/// Classify a raw manifest line.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return LineKind::PassThrough;
    }
    let spec = line.split_once(VERSION_PIN).map_or(line, |(head, _)| head);
    let spec = spec.split_once(URL_DELIMITER).map_or(spec, |(head, _)| head);
    LineKind::Requirement(normalize(spec))
}

/// The set of package names to drop from a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is excluded; `name` is normalized before the lookup.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&normalize(name))
    }

    /// Apply the decision rule to a raw manifest line.
    pub fn is_excluded(&self, line: &str) -> bool {
        match classify(line) {
            LineKind::PassThrough => false,
            LineKind::Requirement(name) => self.names.contains(&name),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate the normalized names, in no particular order.
    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.names.iter()
    }
}

impl<S: AsRef<str>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names
            .extend(iter.into_iter().map(|name| normalize(name.as_ref())));
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Characters that end a manifest line. Besides `\n` and `\r` (with `\r\n`
/// counting once) this covers the vertical tab, form feed, the ASCII
/// file/group/record separators, NEL and the Unicode line/paragraph separators.
const LINE_TERMINATORS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Iterator over the lines of a manifest, see [`manifest_lines`].
#[derive(Debug, Clone)]
pub struct ManifestLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for ManifestLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(idx) = self.rest.find(LINE_TERMINATORS) else {
            return Some(std::mem::take(&mut self.rest));
        };
        let line = &self.rest[..idx];
        let tail = &self.rest[idx..];
        let skip = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(0, char::len_utf8)
        };
        self.rest = &tail[skip..];
        Some(line)
    }
}

/// Split a manifest into lines without their terminators. A lone `\r` ends a
/// line just like `\n`, and a trailing terminator does not yield an empty
/// final line.
pub fn manifest_lines(manifest: &str) -> ManifestLines<'_> {
    ManifestLines { rest: manifest }
}

/// Lazily yield the lines that survive `exclusions`, in input order.
///
/// With an empty set the input is passed through untouched.
pub fn filter_lines<'l, 'e, I>(
    lines: I,
    exclusions: &'e ExclusionSet,
) -> impl Iterator<Item = &'l str> + 'e
where
    I: IntoIterator<Item = &'l str>,
    I::IntoIter: 'e,
    'l: 'e,
{
    let lines = lines.into_iter();
    if exclusions.is_empty() {
        either::Left(lines)
    } else {
        either::Right(lines.enumerate().filter_map(move |(idx, line)| {
            if exclusions.is_excluded(line) {
                debug!(lineno = idx + 1, "excluding {}", line.trim());
                None
            } else {
                Some(line)
            }
        }))
    }
}
