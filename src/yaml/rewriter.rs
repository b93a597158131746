use crate::edit::{Edit, EditError};
use crate::yaml::errors::YamlError;
use crate::yaml::locator::MatchResult;
use std::path::PathBuf;

pub(crate) const BUFFER_NAME: &str = "<yaml-buffer>";

/// Render a replacement scalar.
///
/// A value whose first character is an ASCII digit is wrapped in double
/// quotes so `1.20` stays a string; anything else goes in verbatim. Floats
/// written as `.5`, negatives and booleans are not detected. Pre-quote those.
pub fn quote_value(value: &str) -> Result<String, YamlError> {
    let first = value.chars().next().ok_or(YamlError::EmptyValue)?;
    if first.is_ascii_digit() {
        Ok(format!("\"{}\"", value))
    } else {
        Ok(value.to_string())
    }
}

/// Plan the replacement of everything after the matched key up to the end of
/// its line with `": " + value`.
///
/// The line feed itself, and everything after it, is left alone. With no
/// line feed the span runs to the end of the document.
pub fn plan_rewrite(
    file: impl Into<PathBuf>,
    document: &str,
    m: &MatchResult,
    value: &str,
) -> Result<Edit, YamlError> {
    let quoted = quote_value(value)?;

    let key_end = m.key_end();
    let tail = document.get(key_end..).ok_or(EditError::InvalidByteRange {
        byte_start: key_end,
        byte_end: key_end,
        len: document.len(),
    })?;
    let line_end = tail.find('\n').map_or(document.len(), |i| key_end + i);

    Ok(Edit::new(
        file,
        key_end,
        line_end,
        format!(": {}", quoted),
        &document[key_end..line_end],
    ))
}

/// Rewrite the value of the matched key and return the new document.
pub fn rewrite(document: &str, m: &MatchResult, value: &str) -> Result<String, YamlError> {
    let edit = plan_rewrite(BUFFER_NAME, document, m, value)?;
    Ok(edit.apply_to(document)?)
}
