//! Callback-driven, DOM-less JSON reading and writing.
//!
//! This crate contains two independent components that share a small value
//! model and never build an in-memory document tree:
//!
//! - [`Reader`] parses a contiguous byte buffer with a character-level state
//!   machine and reports one callback per key/value (object) or index/value
//!   (array) pair. Nested containers are reported *before* their contents;
//!   the handler decides per container whether to descend into it by calling
//!   [`Reader::parse`] again, or to let the engine discard the subtree in
//!   O(skipped bytes). Strings and keys are zero-copy slices of the input
//!   unless escapes force materialization.
//! - [`Writer`] emits indented or single-line JSON text into a growable
//!   buffer through scoped builder types ([`ObjectScope`], [`ArrayScope`],
//!   [`ValueScope`]) whose signatures make malformed output unrepresentable.
//!
//! Both sides support a non-standard extension: `//` line comments, accepted
//! by the reader wherever an entry may begin or end, and emitted by the
//! writer except in single-line mode. Consumers requiring strict RFC 8259
//! output must simply not use the comment API.
//!
//! # Example
//!
//! ```
//! use jsonvisit::{Reader, Step, Value};
//!
//! let text = br#"{"name": "gizmo", "stats": {"uses": 3}}"#;
//! let mut reader = Reader::new(text);
//! let mut uses = None;
//! reader.parse(|reader, entry, value| {
//!     if entry.as_key() == "stats" && value.is_object() {
//!         reader.parse(|_, entry, value| {
//!             if entry.as_key() == "uses" {
//!                 uses = Some(value.as_number());
//!             }
//!             Step::Skip
//!         });
//!         return Step::Consumed;
//!     }
//!     Step::Skip
//! });
//! assert_eq!(reader.error(), None);
//! assert_eq!(uses, Some(3.0));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod reader;
mod value;
mod writer;


pub use error::{ErrorKind, ReadError};
pub use reader::{Entry, Reader, ReaderOptions, RootKind, Step};
pub use value::{Number, Value};
pub use writer::{ArrayScope, ObjectScope, Scalar, ValueScope, Writer};
