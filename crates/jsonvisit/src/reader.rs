//! The parser state machine.
//!
//! [`Reader`] drives a byte-by-byte finite-state automaton over a contiguous
//! buffer and invokes a caller-supplied handler once per discovered entry.
//! One [`parse`](Reader::parse) call consumes exactly one container body (a
//! *level*); the handler descends into a nested container by calling `parse`
//! again on the reader it is handed, or returns [`Step::Skip`] to let the
//! engine discard the subtree without materializing anything.
//!
//! The automaton makes a single left-to-right pass with no backtracking;
//! number and string lexing boundaries are resolved at the terminating
//! delimiter, and the byte that ends a number is reprocessed by the next
//! state. The first unacceptable byte latches an error permanently for the
//! instance (see [`ReadError`]).
//!
//! Numbers follow the JSON grammar; a leading `+` is rejected. `//` line
//! comments are accepted wherever an entry may begin or end, and are never
//! reported to the handler.

use alloc::{borrow::Cow, string::String, vec::Vec};
use core::mem;

use crate::{
    error::{ErrorKind, ReadError},
    value::{Number, Value},
};

/// Whether the outermost container of the buffer is an object or an array.
///
/// Determined once, by sniffing the first significant byte at construction
/// time; never re-derived during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// The buffer's first significant byte is `{`.
    Object,
    /// The buffer's first significant byte is `[`.
    Array,
}

/// The label under which a value was found: its key inside an object, its
/// position inside an array.
///
/// Keys are zero-copy slices of the input unless the key itself contained
/// escapes, in which case the unescaped form was materialized. Each key is
/// handed to exactly one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<'a> {
    /// Object member name.
    Key(Cow<'a, str>),
    /// Zero-based array index.
    Index(usize),
}

impl Entry<'_> {
    /// The member name.
    ///
    /// # Panics
    ///
    /// Panics if the entry is an array index.
    #[must_use]
    pub fn as_key(&self) -> &str {
        match self {
            Self::Key(k) => k.as_ref(),
            Self::Index(i) => panic!("as_key called on index entry {i}"),
        }
    }

    /// The array index.
    ///
    /// # Panics
    ///
    /// Panics if the entry is an object key.
    #[must_use]
    pub fn as_index(&self) -> usize {
        match self {
            Self::Index(i) => *i,
            Self::Key(k) => panic!("as_index called on key entry {k:?}"),
        }
    }
}

/// Handler verdict for one reported entry.
///
/// This is the explicit descent protocol: the engine never infers from
/// cursor movement whether the handler consumed a nested container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The handler descended into the reported container itself (by calling
    /// [`Reader::parse`]). For scalar values this is equivalent to
    /// [`Skip`](Step::Skip). Returning `Consumed` for a container without
    /// actually descending leaves the cursor on its opening delimiter and
    /// the parse fails on the next byte.
    Consumed,
    /// Leave the value alone. For containers the engine discards the
    /// subtree itself, in time proportional to its length.
    Skip,
    /// Abandon the whole parse, unwinding every open level. Not an error:
    /// the cursor stays wherever the stop happened and no further handler
    /// invocations occur for this `parse` call.
    Stop,
}

/// Configuration for a [`Reader`].
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Maximum number of nested levels the reader will enter, counting the
    /// root container as one. Checked before each level, for caller-driven
    /// descents and engine-internal skips alike, so that adversarial
    /// nesting fails with [`ErrorKind::DepthLimitExceeded`] instead of
    /// exhausting the call stack.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

type Handler<'h, 'a> = &'h mut dyn FnMut(&mut Reader<'a>, Entry<'a>, Value<'a>) -> Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitRoot,
    Key,
    Colon,
    Value,
    Number,
    String,
    Comment,
    Next,
}

/// A callback-driven JSON parser over one contiguous byte buffer.
///
/// The reader is a pure view: it never copies input except for escaped
/// substrings, and the buffer must stay valid and unmodified for the
/// reader's lifetime. Constructing the reader sniffs the root container
/// kind; [`parse`](Reader::parse) then consumes one level per call.
///
/// The first failure latches permanently: every later `parse` call is a
/// no-op until a new reader is built over a fresh buffer.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    root: Option<RootKind>,
    error: Option<ReadError>,
    depth: usize,
    stopped: bool,
    max_depth: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over `buf` with default [`ReaderOptions`].
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_options(buf, ReaderOptions::default())
    }

    /// Creates a reader over `buf`, sniffing the root container kind.
    ///
    /// If no `{` or `[` is found before the first significant byte (or the
    /// buffer is empty), [`ErrorKind::NoRootContainer`] is latched and
    /// every `parse` call will be a no-op.
    #[must_use]
    pub fn with_options(buf: &'a [u8], options: ReaderOptions) -> Self {
        let mut reader = Self {
            buf,
            pos: 0,
            root: None,
            error: None,
            depth: 0,
            stopped: false,
            max_depth: options.max_depth,
        };
        reader.sniff_root();
        reader
    }

    /// The root container kind, or `None` if the buffer had no root.
    #[must_use]
    pub fn root_kind(&self) -> Option<RootKind> {
        self.root
    }

    /// The latched error, if any. Check after every top-level `parse`.
    #[must_use]
    pub fn error(&self) -> Option<ReadError> {
        self.error
    }

    /// Current cursor position as a byte offset into the buffer.
    ///
    /// After a successfully parsed level this points just past the level's
    /// closing delimiter.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Parses one container level, invoking `handler` once per entry.
    ///
    /// The handler receives the reader itself, the entry label, and the
    /// value. For container-marker values the handler may descend by
    /// calling `parse` on the reader it was handed and returning
    /// [`Step::Consumed`]; otherwise the engine skips the subtree. The
    /// first call on a fresh reader consumes the root container.
    ///
    /// No-op if an error is already latched.
    pub fn parse<F>(&mut self, mut handler: F)
    where
        F: FnMut(&mut Reader<'a>, Entry<'a>, Value<'a>) -> Step,
    {
        self.parse_level(Some(&mut handler));
    }

    fn sniff_root(&mut self) {
        let mut i = 0;
        while i < self.buf.len() {
            match self.buf[i] {
                b' ' | b'\t' | b'\r' | b'\n' => i += 1,
                b'{' => {
                    self.root = Some(RootKind::Object);
                    return;
                }
                b'[' => {
                    self.root = Some(RootKind::Array);
                    return;
                }
                _ => break,
            }
        }
        self.error = Some(ReadError {
            offset: i,
            kind: ErrorKind::NoRootContainer,
        });
    }

    fn parse_level(&mut self, mut handler: Option<Handler<'_, 'a>>) {
        if self.error.is_some() || self.stopped {
            return;
        }
        if self.depth >= self.max_depth {
            self.fail_at(self.pos, ErrorKind::DepthLimitExceeded(self.max_depth));
            return;
        }
        self.depth += 1;
        self.run_level(&mut handler);
        self.depth -= 1;
        if self.depth == 0 {
            self.stopped = false;
        }
    }

    #[expect(clippy::too_many_lines)]
    fn run_level(&mut self, handler: &mut Option<Handler<'_, 'a>>) {
        let buf = self.buf;
        // Skip parses do no unescaping work and no allocation.
        let collecting = handler.is_some();

        let mut state = State::AwaitRoot;
        let mut in_object = false;
        let mut index = 0usize;
        let mut key: Cow<'a, str> = Cow::Borrowed("");

        let mut lex_start = 0usize;
        let mut is_key = false;
        let mut escape_pending = false;
        let mut had_escape = false;
        let mut scratch: Vec<u8> = Vec::new();
        let mut comment_return = State::Key;

        while self.pos < buf.len() {
            if self.stopped {
                return;
            }
            let b = buf[self.pos];
            match state {
                State::AwaitRoot => match b {
                    b'{' => {
                        state = State::Key;
                        in_object = true;
                    }
                    b'[' => {
                        state = State::Value;
                        in_object = false;
                    }
                    b' ' | b'\t' | b'\r' | b'\n' => {}
                    _ => return self.fail(ErrorKind::UnexpectedByte(b)),
                },
                State::Key => match b {
                    b'"' => {
                        state = State::String;
                        lex_start = self.pos + 1;
                        is_key = true;
                        had_escape = false;
                    }
                    // Also reached after a trailing comma; both end the level.
                    b'}' => {
                        self.pos += 1;
                        return;
                    }
                    b'/' => {
                        comment_return = state;
                        state = State::Comment;
                    }
                    b' ' | b'\t' | b'\r' | b'\n' => {}
                    _ => return self.fail(ErrorKind::UnexpectedByte(b)),
                },
                State::Colon => match b {
                    b':' => state = State::Value,
                    b' ' | b'\t' | b'\r' | b'\n' => {}
                    _ => return self.fail(ErrorKind::UnexpectedByte(b)),
                },
                State::Value => match b {
                    b'{' | b'[' => {
                        let marker = if b == b'{' { Value::Object } else { Value::Array };
                        let step = match handler.as_mut() {
                            Some(h) => {
                                let entry = Self::entry(in_object, &mut key, &mut index);
                                h(self, entry, marker)
                            }
                            None => Step::Skip,
                        };
                        match step {
                            Step::Stop => {
                                self.stopped = true;
                                return;
                            }
                            Step::Skip => self.parse_level(None),
                            Step::Consumed => {}
                        }
                        if self.error.is_some() || self.stopped {
                            return;
                        }
                        state = State::Next;
                        // The cursor is already past the closing delimiter.
                        continue;
                    }
                    b']' if !in_object => {
                        self.pos += 1;
                        return;
                    }
                    b'"' => {
                        state = State::String;
                        lex_start = self.pos + 1;
                        is_key = false;
                        had_escape = false;
                    }
                    b'-' | b'0'..=b'9' => {
                        state = State::Number;
                        lex_start = self.pos;
                    }
                    b'/' if !in_object => {
                        comment_return = state;
                        state = State::Comment;
                    }
                    b' ' | b'\t' | b'\r' | b'\n' => {}
                    _ => {
                        // `true` / `false` / `null`, matched through fixed
                        // windows with at least five bytes remaining.
                        if buf.len() - self.pos < 5 {
                            return self.fail(ErrorKind::UnexpectedByte(b));
                        }
                        let word = &buf[self.pos..self.pos + 5];
                        let (value, len) = if &word[..4] == b"true" {
                            (Value::Boolean(true), 4)
                        } else if &word[..4] == b"null" {
                            (Value::Null, 4)
                        } else if word == b"false" {
                            (Value::Boolean(false), 5)
                        } else {
                            return self.fail(ErrorKind::UnexpectedByte(b));
                        };
                        self.pos += len;
                        state = State::Next;
                        if let Some(h) = handler.as_mut() {
                            let entry = Self::entry(in_object, &mut key, &mut index);
                            if h(self, entry, value) == Step::Stop {
                                self.stopped = true;
                                return;
                            }
                        }
                        continue;
                    }
                },
                State::Number => match b {
                    b'-' | b'+' | b'0'..=b'9' | b'.' | b'e' | b'E' => {}
                    _ => {
                        let Some(number) = convert_number(&buf[lex_start..self.pos]) else {
                            return self.fail_at(lex_start, ErrorKind::InvalidNumber);
                        };
                        state = State::Next;
                        if let Some(h) = handler.as_mut() {
                            let entry = Self::entry(in_object, &mut key, &mut index);
                            if h(self, entry, Value::Number(number)) == Step::Stop {
                                self.stopped = true;
                                return;
                            }
                        }
                        // Reprocess the boundary byte in the next state.
                        continue;
                    }
                },
                State::String => {
                    if escape_pending {
                        escape_pending = false;
                        if collecting {
                            scratch.push(unescape(b));
                        }
                    } else {
                        match b {
                            b'"' => {
                                let text = if !collecting {
                                    Cow::Borrowed("")
                                } else if had_escape {
                                    match String::from_utf8(mem::take(&mut scratch)) {
                                        Ok(s) => Cow::Owned(s),
                                        Err(_) => {
                                            return self
                                                .fail_at(lex_start, ErrorKind::InvalidUtf8);
                                        }
                                    }
                                } else {
                                    match core::str::from_utf8(&buf[lex_start..self.pos]) {
                                        Ok(s) => Cow::Borrowed(s),
                                        Err(_) => {
                                            return self
                                                .fail_at(lex_start, ErrorKind::InvalidUtf8);
                                        }
                                    }
                                };
                                if is_key {
                                    is_key = false;
                                    key = text;
                                    state = State::Colon;
                                } else {
                                    state = State::Next;
                                    if let Some(h) = handler.as_mut() {
                                        let entry = Self::entry(in_object, &mut key, &mut index);
                                        if h(self, entry, Value::String(text)) == Step::Stop {
                                            self.stopped = true;
                                            return;
                                        }
                                    }
                                }
                            }
                            b'\\' => {
                                escape_pending = true;
                                if collecting && !had_escape {
                                    // Bulk-copy the escape-free prefix.
                                    scratch.clear();
                                    scratch.extend_from_slice(&buf[lex_start..self.pos]);
                                }
                                had_escape = true;
                            }
                            _ => {
                                if collecting && had_escape {
                                    scratch.push(b);
                                }
                            }
                        }
                    }
                }
                State::Next => match b {
                    b',' => state = if in_object { State::Key } else { State::Value },
                    b'}' => {
                        if !in_object {
                            return self.fail(ErrorKind::UnexpectedByte(b));
                        }
                        self.pos += 1;
                        return;
                    }
                    b']' => {
                        if in_object {
                            return self.fail(ErrorKind::UnexpectedByte(b));
                        }
                        self.pos += 1;
                        return;
                    }
                    b'/' => {
                        comment_return = state;
                        state = State::Comment;
                    }
                    b' ' | b'\t' | b'\r' | b'\n' => {}
                    _ => return self.fail(ErrorKind::UnexpectedByte(b)),
                },
                State::Comment => match b {
                    b'\r' | b'\n' => state = comment_return,
                    _ => {}
                },
            }
            self.pos += 1;
        }

        match state {
            State::String => self.fail_at(self.pos, ErrorKind::UnterminatedString),
            // Nothing opened on this level; a whitespace tail is benign.
            State::AwaitRoot => {}
            _ => self.fail_at(self.pos, ErrorKind::UnexpectedEndOfInput),
        }
    }

    fn entry(in_object: bool, key: &mut Cow<'a, str>, index: &mut usize) -> Entry<'a> {
        if in_object {
            Entry::Key(mem::take(key))
        } else {
            let entry = Entry::Index(*index);
            *index += 1;
            entry
        }
    }

    fn fail(&mut self, kind: ErrorKind) {
        self.fail_at(self.pos, kind);
    }

    fn fail_at(&mut self, offset: usize, kind: ErrorKind) {
        if self.error.is_none() {
            self.error = Some(ReadError { offset, kind });
        }
    }
}

/// Converts a number lexeme, rejecting forms `str::parse` is laxer about
/// than JSON: a `.` must be followed by a digit.
fn convert_number(raw: &[u8]) -> Option<Number<'_>> {
    for (i, &b) in raw.iter().enumerate() {
        if b == b'.' && raw.get(i + 1).is_none_or(|next| !next.is_ascii_digit()) {
            return None;
        }
    }
    let lexeme = core::str::from_utf8(raw).ok()?;
    let value: f64 = lexeme.parse().ok()?;
    Some(Number::new(value, lexeme))
}

/// Translates the byte following a backslash. `\uXXXX` is not decoded;
/// unknown escapes pass the byte through, so `\u` yields a literal `u` and
/// `\/` yields `/`.
fn unescape(b: u8) -> u8 {
    match b {
        b't' => b'\t',
        b'n' => b'\n',
        b'r' => b'\r',
        b'f' => 0x0c,
        b'b' => 0x08,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use alloc::{
        borrow::Cow,
        format,
        string::{String, ToString},
        vec,
        vec::Vec,
    };

    use rstest::rstest;

    use super::{Entry, Reader, ReaderOptions, RootKind, Step};
    use crate::{ErrorKind, ReadError, Value};

    fn label(entry: &Entry<'_>) -> String {
        match entry {
            Entry::Key(k) => k.to_string(),
            Entry::Index(i) => format!("#{i}"),
        }
    }

    fn render(value: &Value<'_>) -> String {
        match value {
            Value::Number(n) => format!("{}", n.get()),
            Value::String(s) => format!("{s:?}"),
            Value::Boolean(b) => b.to_string(),
            Value::Array => "<array>".to_string(),
            Value::Object => "<object>".to_string(),
            Value::Null => "null".to_string(),
        }
    }

    /// Collects one level's entries without descending.
    fn collect_level(reader: &mut Reader<'_>) -> Vec<(String, String)> {
        let mut out = Vec::new();
        reader.parse(|_, entry, value| {
            out.push((label(&entry), render(&value)));
            Step::Skip
        });
        out
    }

    #[test]
    fn empty_object() {
        let mut reader = Reader::new(b"{}");
        assert_eq!(reader.root_kind(), Some(RootKind::Object));
        assert!(collect_level(&mut reader).is_empty());
        assert_eq!(reader.error(), None);
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn empty_array() {
        let mut reader = Reader::new(b"[]");
        assert_eq!(reader.root_kind(), Some(RootKind::Array));
        assert!(collect_level(&mut reader).is_empty());
        assert_eq!(reader.error(), None);
    }

    #[test]
    fn root_kind_skips_leading_whitespace() {
        let reader = Reader::new(b"  \r\n\t [1]");
        assert_eq!(reader.root_kind(), Some(RootKind::Array));
    }

    #[rstest]
    #[case(b"", 0)]
    #[case(b"   ", 3)]
    #[case(b"xyz", 0)]
    #[case(b"  42", 2)]
    fn no_root_container(#[case] input: &[u8], #[case] offset: usize) {
        let mut reader = Reader::new(input);
        assert_eq!(
            reader.error(),
            Some(ReadError {
                offset,
                kind: ErrorKind::NoRootContainer
            })
        );
        // The latch makes parse a no-op.
        assert!(collect_level(&mut reader).is_empty());
    }

    #[test]
    fn array_entries_are_indexed() {
        let mut reader = Reader::new(b"[1, \"two\", true, false, null, -2.5e2]");
        let got = collect_level(&mut reader);
        assert_eq!(reader.error(), None);
        assert_eq!(
            got,
            vec![
                ("#0".to_string(), "1".to_string()),
                ("#1".to_string(), "\"two\"".to_string()),
                ("#2".to_string(), "true".to_string()),
                ("#3".to_string(), "false".to_string()),
                ("#4".to_string(), "null".to_string()),
                ("#5".to_string(), "-250".to_string()),
            ]
        );
    }

    #[test]
    fn raw_lexeme_is_exposed() {
        let mut reader = Reader::new(b"[9007199254740993, -2.5e2]");
        let mut raws = Vec::new();
        reader.parse(|_, _, value| {
            raws.push(value.as_raw_number().to_string());
            Step::Skip
        });
        assert_eq!(reader.error(), None);
        assert_eq!(raws, vec!["9007199254740993", "-2.5e2"]);
    }

    #[test]
    fn nested_skip_scenario() {
        // Only `cc` and then `cc.ee` are descended; `dd` is reported as an
        // object value but its subtree is discarded by the engine.
        let input = br#"{"aa":"bb","cc":{"dd":{"skip":{"null":null}},"ee":{"ff":"gg"}}}"#;
        let mut log = Vec::new();
        let mut reader = Reader::new(input);
        reader.parse(|reader, entry, value| {
            if entry.as_key() == "cc" {
                assert!(value.is_object());
                reader.parse(|reader, entry, value| {
                    if entry.as_key() == "ee" {
                        reader.parse(|_, entry, value| {
                            log.push(format!("ee.{}={}", entry.as_key(), value.as_str()));
                            Step::Skip
                        });
                        return Step::Consumed;
                    }
                    log.push(format!("cc.{}={}", entry.as_key(), render(&value)));
                    Step::Skip
                });
                return Step::Consumed;
            }
            log.push(format!("{}={}", entry.as_key(), render(&value)));
            Step::Skip
        });
        assert_eq!(reader.error(), None);
        assert_eq!(log, vec!["aa=\"bb\"", "cc.dd=<object>", "ee.ff=gg"]);
    }

    #[test]
    fn skip_and_descend_agree_on_cursor() {
        let input = br#"{"a":{"deep":[1,{"x":"y"},3]},"b":2}"#;
        let mut skipped = Reader::new(input);
        skipped.parse(|_, _, _| Step::Skip);

        let mut descended = Reader::new(input);
        fn walk<'a>(reader: &mut Reader<'a>) {
            reader.parse(|reader, _, value| {
                if value.is_object() || value.is_array() {
                    walk(reader);
                    Step::Consumed
                } else {
                    Step::Skip
                }
            });
        }
        walk(&mut descended);

        assert_eq!(skipped.error(), None);
        assert_eq!(descended.error(), None);
        assert_eq!(skipped.offset(), descended.offset());
        assert_eq!(skipped.offset(), input.len());
    }

    #[test]
    fn parent_sequence_unaffected_by_skip() {
        let input = br#"{"before":1,"inner":{"x":[true]},"after":2}"#;
        let mut reader = Reader::new(input);
        let got = collect_level(&mut reader);
        assert_eq!(reader.error(), None);
        assert_eq!(
            got,
            vec![
                ("before".to_string(), "1".to_string()),
                ("inner".to_string(), "<object>".to_string()),
                ("after".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_literal_positions_error() {
        let mut reader = Reader::new(b"{\"a\": tru}");
        let got = collect_level(&mut reader);
        assert!(got.is_empty());
        assert_eq!(
            reader.error(),
            Some(ReadError {
                offset: 6,
                kind: ErrorKind::UnexpectedByte(b't')
            })
        );
    }

    #[rstest]
    #[case(b"{\"a\" 1}", 5, ErrorKind::UnexpectedByte(b'1'))]
    #[case(b"{\"a\":+1}", 5, ErrorKind::UnexpectedByte(b'+'))]
    #[case(b"[1.]", 1, ErrorKind::InvalidNumber)]
    #[case(b"[1e]", 1, ErrorKind::InvalidNumber)]
    #[case(b"[-]", 1, ErrorKind::InvalidNumber)]
    #[case(b"[\"a\"}", 4, ErrorKind::UnexpectedByte(b'}'))]
    #[case(b"{\"a\":1]", 6, ErrorKind::UnexpectedByte(b']'))]
    #[case(b"{\"a\":}", 5, ErrorKind::UnexpectedByte(b'}'))]
    #[case(b"{\"a\":\"x", 7, ErrorKind::UnterminatedString)]
    #[case(b"{\"a\":1", 6, ErrorKind::UnexpectedEndOfInput)]
    #[case(b"[1, 2", 5, ErrorKind::UnexpectedEndOfInput)]
    #[case(b"{\"a\": //c\n1}", 6, ErrorKind::UnexpectedByte(b'/'))]
    fn syntax_errors(#[case] input: &[u8], #[case] offset: usize, #[case] kind: ErrorKind) {
        let mut reader = Reader::new(input);
        reader.parse(|_, _, _| Step::Skip);
        assert_eq!(reader.error(), Some(ReadError { offset, kind }));
    }

    #[test]
    fn error_is_latched() {
        let mut reader = Reader::new(b"{\"a\": tru}");
        reader.parse(|_, _, _| Step::Skip);
        let first = reader.error();
        assert!(first.is_some());

        let mut calls = 0;
        reader.parse(|_, _, _| {
            calls += 1;
            Step::Skip
        });
        assert_eq!(calls, 0);
        assert_eq!(reader.error(), first);
    }

    #[test]
    fn comments_are_transparent() {
        let with = br#"{
            // leading note
            "a": 1, // entry note
            "b": [1, // first
                  2 // last
            ] // tail
            // and another
        }"#;
        let without = br#"{"a": 1, "b": [1, 2]}"#;
        let mut log_with = Vec::new();
        let mut log_without = Vec::new();

        fn walk<'a>(reader: &mut Reader<'a>, log: &mut Vec<String>) {
            reader.parse(|reader, entry, value| {
                if value.is_object() || value.is_array() {
                    log.push(format!("{}:{}", label(&entry), render(&value)));
                    walk(reader, log);
                    Step::Consumed
                } else {
                    log.push(format!("{}={}", label(&entry), render(&value)));
                    Step::Skip
                }
            });
        }
        let mut reader = Reader::new(with);
        walk(&mut reader, &mut log_with);
        assert_eq!(reader.error(), None);

        let mut reader = Reader::new(without);
        walk(&mut reader, &mut log_without);
        assert_eq!(reader.error(), None);

        assert_eq!(log_with, log_without);
    }

    #[test]
    fn escapes_are_decoded() {
        let input = b"{\"k\":\"a\\tb\\nc\\\"d\\\\e\\ff\\bg\\rh\"}";
        let mut got = None;
        let mut reader = Reader::new(input);
        reader.parse(|_, _, value| {
            got = Some(value.as_str().to_string());
            Step::Skip
        });
        assert_eq!(reader.error(), None);
        assert_eq!(got.as_deref(), Some("a\tb\nc\"d\\e\u{c}f\u{8}g\rh"));
    }

    #[test]
    fn unknown_escapes_pass_through() {
        let input = b"[\"a\\/b\", \"\\u0041\"]";
        let mut got = Vec::new();
        let mut reader = Reader::new(input);
        reader.parse(|_, _, value| {
            got.push(value.as_str().to_string());
            Step::Skip
        });
        assert_eq!(reader.error(), None);
        assert_eq!(got, vec!["a/b", "u0041"]);
    }

    #[test]
    fn strings_without_escapes_borrow_the_input() {
        let input = br#"{"plain":"text","esc\"aped":"va\tl"}"#;
        let mut reader = Reader::new(input);
        let mut seen = Vec::new();
        reader.parse(|_, entry, value| {
            let Entry::Key(key) = entry else { unreachable!() };
            let Value::String(text) = value else { unreachable!() };
            seen.push((
                matches!(key, Cow::Borrowed(_)),
                matches!(text, Cow::Borrowed(_)),
                key.to_string(),
                text.to_string(),
            ));
            Step::Skip
        });
        assert_eq!(reader.error(), None);
        assert_eq!(
            seen,
            vec![
                (true, true, "plain".to_string(), "text".to_string()),
                (false, false, "esc\"aped".to_string(), "va\tl".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_utf8_in_string_errors() {
        let mut reader = Reader::new(b"{\"a\":\"\xff\"}");
        reader.parse(|_, _, _| Step::Skip);
        assert_eq!(
            reader.error().map(|e| e.kind),
            Some(ErrorKind::InvalidUtf8)
        );
    }

    #[test]
    fn raw_utf8_passes_through_unescaped() {
        let input = "[\"héllo — ☃\"]".as_bytes();
        let mut got = None;
        let mut reader = Reader::new(input);
        reader.parse(|_, _, value| {
            got = Some(value.as_str().to_string());
            Step::Skip
        });
        assert_eq!(reader.error(), None);
        assert_eq!(got.as_deref(), Some("héllo — ☃"));
    }

    #[test]
    fn stop_unwinds_every_level() {
        let input = br#"{"a":{"b":{"c":1,"d":2}},"never":3}"#;
        let mut log = Vec::new();
        let mut reader = Reader::new(input);
        reader.parse(|reader, entry, _| {
            log.push(label(&entry));
            reader.parse(|reader, entry, _| {
                log.push(label(&entry));
                reader.parse(|_, entry, _| {
                    log.push(label(&entry));
                    Step::Stop
                });
                Step::Consumed
            });
            Step::Consumed
        });
        assert_eq!(reader.error(), None);
        assert_eq!(log, vec!["a", "b", "c"]);
    }

    #[test]
    fn depth_limit_is_latched_before_recursing() {
        let options = ReaderOptions { max_depth: 2 };
        let mut reader = Reader::with_options(b"[[[1]]]", options);
        fn walk<'a>(reader: &mut Reader<'a>) {
            reader.parse(|reader, _, value| {
                if value.is_array() {
                    walk(reader);
                    Step::Consumed
                } else {
                    Step::Skip
                }
            });
        }
        walk(&mut reader);
        assert_eq!(
            reader.error().map(|e| e.kind),
            Some(ErrorKind::DepthLimitExceeded(2))
        );
    }

    #[test]
    fn depth_limit_applies_to_engine_skips() {
        let options = ReaderOptions { max_depth: 2 };
        let mut reader = Reader::with_options(b"[[[1]]]", options);
        // Never descend; the engine's own skip recursion hits the limit.
        reader.parse(|_, _, _| Step::Skip);
        assert_eq!(
            reader.error().map(|e| e.kind),
            Some(ErrorKind::DepthLimitExceeded(2))
        );
    }

    #[test]
    fn trailing_commas_are_tolerated() {
        let mut reader = Reader::new(b"{\"a\":1,}");
        assert_eq!(
            collect_level(&mut reader),
            vec![("a".to_string(), "1".to_string())]
        );
        assert_eq!(reader.error(), None);

        let mut reader = Reader::new(b"[1,]");
        assert_eq!(
            collect_level(&mut reader),
            vec![("#0".to_string(), "1".to_string())]
        );
        assert_eq!(reader.error(), None);
    }

    #[test]
    fn literals_at_buffer_tail() {
        for input in [&b"[true]"[..], b"[false]", b"[null]"] {
            let mut reader = Reader::new(input);
            let got = collect_level(&mut reader);
            assert_eq!(reader.error(), None, "{input:?}");
            assert_eq!(got.len(), 1);
        }
    }

    #[test]
    fn whitespace_everywhere() {
        let input = b" { \"a\" \t: \r\n 1 , \"b\" : [ ] } ";
        let mut reader = Reader::new(input);
        let got = collect_level(&mut reader);
        assert_eq!(reader.error(), None);
        assert_eq!(
            got,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "<array>".to_string()),
            ]
        );
    }
}
