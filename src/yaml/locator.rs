//! Indentation-driven key-path lookup.
//!
//! The locator does not parse YAML. It walks the document one line at a time,
//! treating every two leading whitespace characters as one level of mapping
//! nesting, and looks for each path segment at exactly the level reached by
//! the segments before it. The walk is a single forward pass: once a segment
//! matches, earlier siblings can no longer be reached.
//!
//! The expected level only ever narrows when a shallower line shows up. A
//! sibling with the wrong key at the expected level does not close the scope,
//! and a shallower line outside the intended parent keeps the search going at
//! its level, so a same-named key elsewhere in the document can still match.
//! Callers that care should pass a path specific enough to avoid that.

use crate::yaml::query::KeyPath;
use log::debug;

/// Leading whitespace characters per nesting level.
const INDENT_UNIT: usize = 2;

/// A located key token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Byte offset of the first byte of the key token
    pub offset: usize,
    /// The matched key text (trimmed)
    pub key: String,
    /// 1-based line number of the matched line
    pub line: usize,
}

impl MatchResult {
    /// Byte offset just past the key token, where the colon is expected.
    pub fn key_end(&self) -> usize {
        self.offset + self.key.len()
    }
}

/// Per-call scan state. Nothing here outlives a single [`locate`].
#[derive(Debug)]
struct ScanState<'p> {
    /// Byte offset of the start of the current line
    pos: usize,
    expected_indent: usize,
    /// Segments not yet matched; the head is the one being sought
    remaining: &'p [String],
}

enum Step {
    Continue,
    Found { offset: usize, key: String },
}

impl<'p> ScanState<'p> {
    fn new(remaining: &'p [String]) -> Self {
        Self {
            pos: 0,
            expected_indent: 0,
            remaining,
        }
    }

    fn step(&mut self, line: &str) -> Step {
        let step = self.inspect(line);
        // +1 for the newline stripped by the split
        self.pos += line.len() + 1;
        step
    }

    fn inspect(&mut self, line: &str) -> Step {
        if line.is_empty() || line.starts_with('#') {
            return Step::Continue;
        }

        let cur_indent = indent_level(line);
        if cur_indent < self.expected_indent {
            self.expected_indent = cur_indent;
        }
        if cur_indent != self.expected_indent {
            return Step::Continue;
        }

        let Some((left, _)) = line.split_once(':') else {
            return Step::Continue;
        };
        let key = left.trim();

        let Some((segment, rest)) = self.remaining.split_first() else {
            return Step::Continue;
        };
        if key != segment {
            return Step::Continue;
        }

        if rest.is_empty() {
            let column = line.find(key).unwrap_or(0);
            return Step::Found {
                offset: self.pos + column,
                key: key.to_string(),
            };
        }

        debug!(
            "matched segment '{}' at indent {}, descending",
            segment, cur_indent
        );
        self.remaining = rest;
        self.expected_indent += 1;
        Step::Continue
    }
}

/// Nesting level of a line: leading whitespace characters divided by two.
///
/// A tab counts as one character, same as a space.
pub fn indent_level(line: &str) -> usize {
    let leading = line.chars().take_while(char::is_ascii_whitespace).count();
    leading / INDENT_UNIT
}

/// Find the key token at the end of `path`, or `None` if the path does not
/// resolve. An empty path never resolves.
pub fn locate(document: &str, path: &KeyPath) -> Option<MatchResult> {
    if path.is_empty() {
        return None;
    }

    let mut state = ScanState::new(path.parts());
    for (index, line) in document.split('\n').enumerate() {
        if let Step::Found { offset, key } = state.step(line) {
            debug!("located '{}' at byte {} (line {})", path, offset, index + 1);
            return Some(MatchResult {
                offset,
                key,
                line: index + 1,
            });
        }
    }

    debug!("key path '{}' not found", path);
    None
}
