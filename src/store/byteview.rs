use std::fmt;
use std::sync::Arc;

/// Number of bytes an entry charges against the cache budget.
pub trait ByteSized {
    /// Returns the size of the stored payload in bytes.
    ///
    /// This is the amount accounted against the byte budget of an
    /// [`LruStore`](super::LruStore), not the precise heap footprint.
    fn byte_len(&self) -> usize;
}

impl ByteSized for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSized for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// An immutable view over a cached value.
///
/// Cloning a view is cheap (the underlying buffer is shared); extracting the
/// bytes with [`ByteView::to_vec`] copies them, so no caller can mutate what
/// the cache holds.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Wraps owned bytes in a view. Taking ownership is what makes the view
    /// immutable: the caller keeps no handle that could alias the buffer.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Returns the number of bytes in the view.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrows the bytes without copying.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a copy of the data as an owned byte vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl ByteSized for ByteView {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<&str> for ByteView {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteView({} bytes)", self.len())
    }
}

impl fmt::Display for ByteView {
    /// Renders the data as text, lossily if it is not valid UTF-8.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}
