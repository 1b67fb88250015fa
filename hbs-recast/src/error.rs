// MIT License
//
// Copyright (c) 2024 Jerome Johnson
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Error handling for parsing and transforming templates
//!
//! Parse failures carry the offset they were detected at and a short slice of
//! the template leading up to it. Everything else that can go wrong during a
//! transform is an [`Error`] variant; all of them abort the transform.

use thiserror::Error;

use crate::ast::NodeKind;

/// Boxed error a visitor handler may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for template parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} near \"{near}\" (offset {offset})")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the template.
    pub offset: usize,
    /// The template text leading up to `offset`.
    pub near: String,
}

/// Returns the last 32 bytes of a string for error context, widened to a char boundary
pub(crate) fn rcap(src: &str) -> &str {
    static CAP_AT: usize = 32;

    if src.len() > CAP_AT {
        let mut start = src.len() - CAP_AT;
        while !src.is_char_boundary(start) {
            start += 1;
        }
        &src[start..]
    } else {
        src
    }
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, src: &str, offset: usize) -> Self {
        let mut end = offset.min(src.len());
        while !src.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            message: message.into(),
            offset,
            near: rcap(&src[..end]).to_string(),
        }
    }

    /// Creates an error for constructs that are opened and never closed
    pub(crate) fn unclosed(what: &str, src: &str, offset: usize) -> Self {
        Self::new(format!("unclosed {what}"), src, offset)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A handler returned a node that cannot live in the slot it replaced.
    #[error("cannot place a {found} in {slot}: expected {expected}")]
    SlotMismatch {
        slot: &'static str,
        expected: &'static str,
        found: NodeKind,
    },

    /// A handler failed; its error is kept as the source.
    #[error("{kind} handler failed: {source}")]
    Handler {
        kind: NodeKind,
        #[source]
        source: BoxError,
    },

    /// The printer could not line up a mutated node with its original text.
    #[error("cannot reprint {kind}: {reason}")]
    Reconcile { kind: NodeKind, reason: String },
}

impl Error {
    pub(crate) fn reconcile(kind: NodeKind, reason: impl Into<String>) -> Self {
        Error::Reconcile {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type for parsing and transforming templates
pub type Result<T> = std::result::Result<T, Error>;
