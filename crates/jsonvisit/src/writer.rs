//! The builder that emits JSON text.
//!
//! [`Writer`] owns a growable output buffer and produces indented or
//! single-line JSON through nested callback scopes. Nesting depth, trailing
//! comma bookkeeping, and single-line suppression are tracked internally;
//! the scoped builder types make structurally invalid output impossible to
//! request, so the writer has no error channel.
//!
//! Every scalar is followed by a comma whose position is remembered. Closing
//! a container erases the dangling comma: indented output overwrites it with
//! a space so that later positions stay stable (a comment may follow it),
//! single-line output truncates it outright.

use alloc::string::String;
use core::fmt::Write as _;

/// A scalar accepted by [`ValueScope::value`] and [`ArrayScope::value`].
///
/// Floats use Rust's shortest-round-trip formatting; non-finite floats
/// degrade to `null` silently. Integers are written without going through
/// `f64`, so the full `i64` range survives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// `true` or `false`.
    Bool(bool),
    /// The `null` literal.
    Null,
    /// A string, escaped on output.
    Str(&'a str),
    /// A double-precision number.
    Float(f64),
    /// A 64-bit integer, formatted exactly.
    Int(i64),
}

impl From<bool> for Scalar<'_> {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Scalar<'_> {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Scalar<'_> {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Scalar<'_> {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for Scalar<'_> {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(v: &'a str) -> Self {
        Self::Str(v)
    }
}

/// A fluent, stack-validated JSON text builder.
///
/// The writer is reusable: each top-level [`object`](Writer::object) or
/// [`array`](Writer::array) call clears the buffer and resets all transient
/// state. The output buffer is exclusively owned; read it through
/// [`buffer`](Writer::buffer) after the top-level call returns.
///
/// ```
/// use jsonvisit::Writer;
///
/// let mut writer = Writer::new();
/// let text = writer.object_inline(|o| {
///     o.key("on").value(true);
///     o.key("retries").value(3);
/// });
/// assert_eq!(text, r#"{ "on": true, "retries": 3 }"#);
/// ```
#[derive(Debug)]
pub struct Writer {
    buffer: String,
    indent: usize,
    level: usize,
    last_comma: Option<usize>,
    prev_key: bool,
    single_line: bool,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a writer with the default indentation width of two spaces.
    #[must_use]
    pub fn new() -> Self {
        Self::with_indent(2)
    }

    /// Creates a writer indenting by `indent` spaces per nesting level.
    #[must_use]
    pub fn with_indent(indent: usize) -> Self {
        Self {
            buffer: String::new(),
            indent,
            level: 0,
            last_comma: None,
            prev_key: false,
            single_line: false,
        }
    }

    /// The finished JSON text.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Consumes the writer, returning the output buffer.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Writes a top-level object, indented. Clears the buffer first.
    pub fn object<F>(&mut self, handler: F) -> &str
    where
        F: FnOnce(&mut ObjectScope<'_>),
    {
        self.root('{', '}', false, |writer| {
            handler(&mut ObjectScope { writer });
        })
    }

    /// Writes a top-level object on a single line. Clears the buffer first.
    pub fn object_inline<F>(&mut self, handler: F) -> &str
    where
        F: FnOnce(&mut ObjectScope<'_>),
    {
        self.root('{', '}', true, |writer| {
            handler(&mut ObjectScope { writer });
        })
    }

    /// Writes a top-level array, indented. Clears the buffer first.
    pub fn array<F>(&mut self, handler: F) -> &str
    where
        F: FnOnce(&mut ArrayScope<'_>),
    {
        self.root('[', ']', false, |writer| {
            handler(&mut ArrayScope { writer });
        })
    }

    /// Writes a top-level array on a single line. Clears the buffer first.
    pub fn array_inline<F>(&mut self, handler: F) -> &str
    where
        F: FnOnce(&mut ArrayScope<'_>),
    {
        self.root('[', ']', true, |writer| {
            handler(&mut ArrayScope { writer });
        })
    }

    fn root<F>(&mut self, open: char, close: char, inline: bool, fill: F) -> &str
    where
        F: FnOnce(&mut Writer),
    {
        self.buffer.clear();
        self.level = 0;
        self.last_comma = None;
        self.prev_key = false;
        self.single_line = inline;

        self.buffer.push(open);
        let open_len = self.buffer.len();
        self.level += 1;
        fill(self);
        self.level -= 1;
        self.close_container(open_len, close);
        self.single_line = false;
        &self.buffer
    }

    /// Nested containers get a trailing comma for the parent's bookkeeping;
    /// the parent's own comma marker is dropped at open so a close can
    /// never erase a comma outside its body.
    fn container<F>(&mut self, open: char, close: char, inline: bool, fill: F)
    where
        F: FnOnce(&mut Writer),
    {
        self.separate();
        let ambient = self.single_line;
        self.single_line = ambient || inline;
        self.buffer.push(open);
        let open_len = self.buffer.len();
        self.last_comma = None;
        self.level += 1;
        fill(self);
        self.level -= 1;
        self.close_container(open_len, close);
        self.single_line = ambient;
        self.push_comma();
    }

    /// Entry separator: newline plus indentation, or a single space in
    /// single-line mode. Suppressed right after a key, which shares its
    /// line with the value.
    fn separate(&mut self) {
        if self.prev_key {
            self.prev_key = false;
            return;
        }
        if self.single_line {
            self.buffer.push(' ');
        } else {
            self.buffer.push('\n');
            for _ in 0..self.level * self.indent {
                self.buffer.push(' ');
            }
        }
    }

    fn close_container(&mut self, open_len: usize, close: char) {
        if self.single_line {
            if self.prev_key {
                self.prev_key = false;
            } else if let Some(pos) = self.last_comma.take() {
                self.buffer.truncate(pos);
            }
            if self.buffer.len() > open_len {
                self.buffer.push(' ');
            }
        } else if self.prev_key {
            self.prev_key = false;
        } else {
            if let Some(pos) = self.last_comma.take() {
                self.buffer.replace_range(pos..=pos, " ");
            }
            self.buffer.push('\n');
            for _ in 0..self.level * self.indent {
                self.buffer.push(' ');
            }
        }
        self.buffer.push(close);
    }

    fn push_comma(&mut self) {
        self.last_comma = Some(self.buffer.len());
        self.buffer.push(',');
    }

    fn write_key(&mut self, name: &str) {
        self.separate();
        self.buffer.push('"');
        self.escape_into(name);
        self.buffer.push_str("\": ");
        self.prev_key = true;
    }

    fn write_scalar(&mut self, scalar: Scalar<'_>) {
        self.separate();
        match scalar {
            Scalar::Bool(true) => self.buffer.push_str("true"),
            Scalar::Bool(false) => self.buffer.push_str("false"),
            Scalar::Null => self.buffer.push_str("null"),
            Scalar::Str(s) => {
                self.buffer.push('"');
                self.escape_into(s);
                self.buffer.push('"');
            }
            Scalar::Float(n) => {
                if n.is_finite() {
                    // Shortest round-trip decimal form.
                    let _ = write!(self.buffer, "{n}");
                } else {
                    self.buffer.push_str("null");
                }
            }
            Scalar::Int(i) => {
                let _ = write!(self.buffer, "{i}");
            }
        }
        self.push_comma();
    }

    fn write_comment(&mut self, line: &str) {
        // Comments cannot be rendered on a single line; dropped, not errored.
        if self.single_line {
            return;
        }
        self.separate();
        self.buffer.push_str("//");
        self.escape_into(line);
    }

    fn escape_into(&mut self, src: &str) {
        for c in src.chars() {
            match c {
                '"' => self.buffer.push_str("\\\""),
                '\\' => self.buffer.push_str("\\\\"),
                '\t' => self.buffer.push_str("\\t"),
                '\n' => self.buffer.push_str("\\n"),
                '\r' => self.buffer.push_str("\\r"),
                '\u{c}' => self.buffer.push_str("\\f"),
                '\u{8}' => self.buffer.push_str("\\b"),
                _ => self.buffer.push(c),
            }
        }
    }
}

/// Builder scope for the body of an object.
#[derive(Debug)]
pub struct ObjectScope<'w> {
    writer: &'w mut Writer,
}

impl ObjectScope<'_> {
    /// Writes a quoted, escaped key followed by `: `. The returned scope
    /// must supply the member's value; it cannot outlive this entry.
    pub fn key(&mut self, name: &str) -> ValueScope<'_> {
        self.writer.write_key(name);
        ValueScope {
            writer: &mut *self.writer,
        }
    }

    /// Writes a `//` line comment. Silently dropped in single-line mode.
    pub fn comment(&mut self, line: &str) -> &mut Self {
        self.writer.write_comment(line);
        self
    }
}

/// Builder scope for a single pending value, returned by
/// [`ObjectScope::key`].
///
/// Each method consumes the scope, so exactly one value can follow a key.
#[derive(Debug)]
pub struct ValueScope<'w> {
    writer: &'w mut Writer,
}

impl ValueScope<'_> {
    /// Writes a scalar value.
    pub fn value<'s>(self, scalar: impl Into<Scalar<'s>>) {
        self.writer.write_scalar(scalar.into());
    }

    /// Writes `null`.
    pub fn null(self) {
        self.writer.write_scalar(Scalar::Null);
    }

    /// Writes a nested object, indented unless the ambient mode is
    /// single-line.
    pub fn object<F>(self, handler: F)
    where
        F: FnOnce(&mut ObjectScope<'_>),
    {
        self.writer.container('{', '}', false, |writer| {
            handler(&mut ObjectScope { writer });
        });
    }

    /// Writes a nested object rendered on a single line.
    pub fn object_inline<F>(self, handler: F)
    where
        F: FnOnce(&mut ObjectScope<'_>),
    {
        self.writer.container('{', '}', true, |writer| {
            handler(&mut ObjectScope { writer });
        });
    }

    /// Writes a nested array, indented unless the ambient mode is
    /// single-line.
    pub fn array<F>(self, handler: F)
    where
        F: FnOnce(&mut ArrayScope<'_>),
    {
        self.writer.container('[', ']', false, |writer| {
            handler(&mut ArrayScope { writer });
        });
    }

    /// Writes a nested array rendered on a single line.
    pub fn array_inline<F>(self, handler: F)
    where
        F: FnOnce(&mut ArrayScope<'_>),
    {
        self.writer.container('[', ']', true, |writer| {
            handler(&mut ArrayScope { writer });
        });
    }
}

/// Builder scope for the body of an array. All methods chain.
#[derive(Debug)]
pub struct ArrayScope<'w> {
    writer: &'w mut Writer,
}

impl ArrayScope<'_> {
    /// Appends a scalar element.
    pub fn value<'s>(&mut self, scalar: impl Into<Scalar<'s>>) -> &mut Self {
        self.writer.write_scalar(scalar.into());
        self
    }

    /// Appends `null`.
    pub fn null(&mut self) -> &mut Self {
        self.writer.write_scalar(Scalar::Null);
        self
    }

    /// Appends a nested object.
    pub fn object<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce(&mut ObjectScope<'_>),
    {
        self.writer.container('{', '}', false, |writer| {
            handler(&mut ObjectScope { writer });
        });
        self
    }

    /// Appends a nested object rendered on a single line.
    pub fn object_inline<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce(&mut ObjectScope<'_>),
    {
        self.writer.container('{', '}', true, |writer| {
            handler(&mut ObjectScope { writer });
        });
        self
    }

    /// Appends a nested array.
    pub fn array<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce(&mut ArrayScope<'_>),
    {
        self.writer.container('[', ']', false, |writer| {
            handler(&mut ArrayScope { writer });
        });
        self
    }

    /// Appends a nested array rendered on a single line.
    pub fn array_inline<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnOnce(&mut ArrayScope<'_>),
    {
        self.writer.container('[', ']', true, |writer| {
            handler(&mut ArrayScope { writer });
        });
        self
    }

    /// Writes a `//` line comment. Silently dropped in single-line mode.
    pub fn comment(&mut self, line: &str) -> &mut Self {
        self.writer.write_comment(line);
        self
    }
}
