//! Error-free string building.
//!
//! [`LazyBuffer`] wraps a `String` with chainable append operations that never
//! return errors, which keeps code generators and template renderers free of
//! `write!(...)?` noise. [`MaybeLazyBuffer`] extends `Option<&mut LazyBuffer>`
//! with the same operations so an absent buffer can be threaded through a call
//! chain and every operation quietly becomes a no-op.
//!
//! ```
//! use protomcp_common::LazyBuffer;
//!
//! let mut buf = LazyBuffer::new();
//! buf.write_string(["func ", "Handle"])
//!     .write_runes(['('])
//!     .printf(format_args!("ctx {}", "context.Context"))
//!     .write_runes([')']);
//!
//! assert_eq!(buf.as_str(), "func Handle(ctx context.Context)");
//! ```

use std::fmt;

/// A `String` accumulator whose appends cannot fail.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct LazyBuffer {
    buf: String,
}

impl LazyBuffer {
    /// Creates an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Appends every string in `ss`, skipping empty ones.
    pub fn write_string<I>(&mut self, ss: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for s in ss {
            let s = s.as_ref();
            if !s.is_empty() {
                self.buf.push_str(s);
            }
        }
        self
    }

    /// Appends every character in `rr`.
    pub fn write_runes<I>(&mut self, rr: I) -> &mut Self
    where
        I: IntoIterator<Item = char>,
    {
        self.buf.extend(rr);
        self
    }

    /// Appends formatted text, typically built with [`format_args!`].
    pub fn printf(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        // Writing into a String only fails if a Display impl reports an error
        let _ = fmt::Write::write_fmt(&mut self.buf, args);
        self
    }

    /// Returns the accumulated text
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Returns the accumulated length in bytes
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written since creation or the last reset
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Empties the buffer, keeping its allocation for reuse
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Consumes the buffer and returns the accumulated text
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Display for LazyBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl fmt::Write for LazyBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

impl From<LazyBuffer> for String {
    fn from(buf: LazyBuffer) -> Self {
        buf.buf
    }
}

impl AsRef<str> for LazyBuffer {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}

/// [`LazyBuffer`] operations on a buffer that may be absent.
///
/// Every method short-circuits on `None`: mutators return the same `None`
/// without allocating, [`string`](Self::string) yields `""` and
/// [`len`](Self::len) yields `0`.
///
/// ```
/// use protomcp_common::{LazyBuffer, MaybeLazyBuffer};
///
/// let absent: Option<&mut LazyBuffer> = None;
/// let absent = absent.write_string(["ignored"]).write_runes(['!']);
/// assert!(absent.is_none());
/// assert_eq!(absent.string(), "");
///
/// let mut buf = LazyBuffer::new();
/// Some(&mut buf).write_string(["hello"]).printf(format_args!(" {}", 42));
/// assert_eq!(buf.as_str(), "hello 42");
/// ```
pub trait MaybeLazyBuffer: Sized {
    /// See [`LazyBuffer::write_string`]
    fn write_string<I>(self, ss: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>;

    /// See [`LazyBuffer::write_runes`]
    fn write_runes<I>(self, rr: I) -> Self
    where
        I: IntoIterator<Item = char>;

    /// See [`LazyBuffer::printf`]
    fn printf(self, args: fmt::Arguments<'_>) -> Self;

    /// Returns the accumulated text, or `""` when absent
    fn string(&self) -> &str;

    /// Returns the accumulated length, or `0` when absent
    fn len(&self) -> usize;

    /// Empties the buffer when present
    fn reset(self) -> Self;
}

impl MaybeLazyBuffer for Option<&mut LazyBuffer> {
    fn write_string<I>(self, ss: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.map(|b| b.write_string(ss))
    }

    fn write_runes<I>(self, rr: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        self.map(|b| b.write_runes(rr))
    }

    fn printf(self, args: fmt::Arguments<'_>) -> Self {
        self.map(|b| b.printf(args))
    }

    fn string(&self) -> &str {
        self.as_deref().map_or("", LazyBuffer::as_str)
    }

    fn len(&self) -> usize {
        self.as_deref().map_or(0, LazyBuffer::len)
    }

    fn reset(self) -> Self {
        self.map(|b| {
            b.reset();
            b
        })
    }
}
