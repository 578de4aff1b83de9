//! Byte-range splicing over a document buffer
//!
//! All offsets are byte offsets into the UTF-8 text. Every operation checks
//! its range before touching the buffer, so a rejected splice leaves the
//! text exactly as it was.

use std::ops::Range;

use crate::{AaError, Result};

/// Remove `length` bytes starting at `start`
pub fn erase(text: &mut String, start: usize, length: usize) -> Result<()> {
    let end = start
        .checked_add(length)
        .ok_or_else(|| AaError::splice_error(format!("range {start}+{length} overflows")))?;
    check_range(text, start..end)?;
    text.replace_range(start..end, "");
    Ok(())
}

/// Insert `literal` before the byte at `offset`; `offset == len` appends
pub fn insert(text: &mut String, offset: usize, literal: &str) -> Result<()> {
    check_offset(text, offset)?;
    text.insert_str(offset, literal);
    Ok(())
}

fn check_offset(text: &str, offset: usize) -> Result<()> {
    if offset > text.len() {
        return Err(AaError::splice_error(format!(
            "offset {offset} is past the end of the text ({} bytes)",
            text.len()
        )));
    }
    if !text.is_char_boundary(offset) {
        return Err(AaError::splice_error(format!(
            "offset {offset} is not on a character boundary"
        )));
    }
    Ok(())
}

fn check_range(text: &str, range: Range<usize>) -> Result<()> {
    if range.start > range.end {
        return Err(AaError::splice_error(format!(
            "range {}..{} is reversed",
            range.start, range.end
        )));
    }
    check_offset(text, range.start)?;
    check_offset(text, range.end)
}

/// Represents a text edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Range to replace
    pub range: Range<usize>,
    /// New text to insert
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range<usize>, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Create an insertion edit
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset..offset, text)
    }

    /// Create a deletion edit
    pub fn delete(range: Range<usize>) -> Self {
        Self::new(range, String::new())
    }

    /// Create a replacement edit; the new text starts where the old range did
    pub fn replace(range: Range<usize>, new_text: impl Into<String>) -> Self {
        Self::new(range, new_text)
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && !self.new_text.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        !self.range.is_empty() && self.new_text.is_empty()
    }

    pub fn is_replacement(&self) -> bool {
        !self.range.is_empty() && !self.new_text.is_empty()
    }

    /// Get the length change caused by this edit
    pub fn length_delta(&self) -> i64 {
        self.new_text.len() as i64 - self.range.len() as i64
    }

    /// Apply the edit as an erase followed by an insert at the range start
    pub fn apply(&self, text: &mut String) -> Result<()> {
        check_range(text, self.range.clone())?;
        erase(text, self.range.start, self.range.len())?;
        insert(text, self.range.start, &self.new_text)
    }
}
