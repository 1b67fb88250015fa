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

//! Low level scanning over the template buffer
//!
//! All positions are byte offsets into the template. The syntax is ASCII, so
//! every offset the scanner stops at is a char boundary even when text nodes
//! carry multi-byte characters.
//!
//! # Mustache markers
//!
//! After `{{` (and an optional `~`) the next characters decide what follows:
//! ```text
//! {{! comment }}       Comment
//! {{#helper ...}}      Open
//! {{/helper}}          Close
//! {{else}}             Else
//! {{{raw}}}            Triple
//! {{path ...}}         Plain
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// What an opening `{{` introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    Comment,
    Open,
    Close,
    Else,
    Triple,
    Partial,
    Inverse,
    Raw,
    Plain,
}

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?").expect("number pattern"));

static HASH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_@][A-Za-z0-9_\-:.]*=").expect("hash key pattern"));

/// Characters that end a bare token inside a mustache
fn is_token_end(c: char) -> bool {
    c.is_whitespace() || "(){}|=~\"'".contains(c)
}

/// Finds the end of a token by looking for whitespace or special characters
pub(crate) fn find_end(src: &str) -> usize {
    for (i, c) in src.char_indices() {
        if is_token_end(c) {
            return i;
        }
    }
    src.len()
}

/// Finds the closing quote of a string literal starting at `src[0]`, returning
/// the offset just past it
pub(crate) fn find_end_of_string(src: &str) -> Option<usize> {
    let quote = src.chars().next()?;
    let clipped = &src[quote.len_utf8()..];
    let mut escaped = false;
    for (i, c) in clipped.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            c if c == quote && !escaped => return Some(i + 2),
            _ => escaped = false,
        }
    }
    None
}

/// Removes the backslash from escaped quotes
pub(crate) fn unescape(raw: &str, quote: char) -> String {
    let escaped = format!("\\{quote}");
    raw.replace(&escaped, &quote.to_string())
}

/// Length of a numeric literal at the start of `src`, if the whole token is one
pub(crate) fn number_len(src: &str) -> Option<usize> {
    let found = NUMBER.find(src)?;
    let end = found.end();
    match src[end..].chars().next() {
        None => Some(end),
        Some(c) if is_token_end(c) => Some(end),
        Some(_) => None,
    }
}

/// Length of `key=` at the start of `src`
pub(crate) fn hash_key_len(src: &str) -> Option<usize> {
    HASH_KEY.find(src).map(|found| found.end())
}

/// Length of leading whitespace
pub(crate) fn whitespace_len(src: &str) -> usize {
    src.len() - src.trim_start().len()
}

/// Classifies the mustache starting at `src`, which must begin with `{{`
pub(crate) fn marker(src: &str) -> Marker {
    let rest = &src[2..];
    if rest.starts_with("{{") {
        return Marker::Raw;
    }
    if rest.starts_with('{') {
        return Marker::Triple;
    }
    let rest = rest.strip_prefix('~').unwrap_or(rest);
    match rest.chars().next() {
        Some('!') => Marker::Comment,
        Some('#') => Marker::Open,
        Some('/') => Marker::Close,
        Some('>') => Marker::Partial,
        Some('^') => Marker::Inverse,
        _ => {
            let trimmed = rest.trim_start();
            let else_end = |c: char| c.is_whitespace() || c == '~' || c == '}';
            match trimmed.strip_prefix("else") {
                Some(after) if after.starts_with(else_end) => Marker::Else,
                _ => Marker::Plain,
            }
        }
    }
}

/// Whether `src` starts an element, a close tag or an HTML comment
pub(crate) fn starts_tag(src: &str) -> bool {
    let Some(rest) = src.strip_prefix('<') else {
        return false;
    };
    rest.starts_with('/')
        || rest.starts_with("!--")
        || rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '@' || c == ':')
}

/// Length of the text run before the next mustache or tag
pub(crate) fn text_len(src: &str) -> usize {
    let mut from = 0;
    while let Some(found) = src[from..].find(['{', '<']) {
        let at = from + found;
        let rest = &src[at..];
        if rest.starts_with("{{") || starts_tag(rest) {
            return at;
        }
        from = at + 1;
    }
    src.len()
}

/// Length of an element or attribute name
pub(crate) fn name_len(src: &str) -> usize {
    src.find(|c: char| c.is_whitespace() || "=>/\"'".contains(c))
        .unwrap_or(src.len())
}
