use std::io::{self, Read};

use hoard_types::{DigestAlgorithm, DigestSet};

use crate::cancel::CancelToken;
use crate::context::MultiHasher;
use crate::error::{DigestError, DigestResult};

/// A `Read` adapter that digests everything read through it.
///
/// Lets a caller copy a stream somewhere (a buffer, a file) and digest it in
/// the same pass. Call [`HashingReader::finish`] after the inner reader hits
/// EOF to get the identifiers.
pub struct HashingReader<R> {
    inner: R,
    hasher: MultiHasher,
    cancel: Option<CancelToken>,
}

impl<R: Read> HashingReader<R> {
    /// Wrap `inner`, digesting with every algorithm in `algs`.
    pub fn new(inner: R, algs: &[DigestAlgorithm]) -> DigestResult<Self> {
        Ok(Self {
            inner,
            hasher: MultiHasher::new(algs)?,
            cancel: None,
        })
    }

    /// Wrap `inner`, digesting with every algorithm in the catalog.
    pub fn all_supported(inner: R) -> DigestResult<Self> {
        Ok(Self {
            inner,
            hasher: MultiHasher::all_supported()?,
            cancel: None,
        })
    }

    /// Fail subsequent reads once `token` fires.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Bytes read through the adapter so far.
    pub fn bytes_read(&self) -> u64 {
        self.hasher.bytes_hashed()
    }

    /// Finish digesting. Any bytes not yet read are ignored.
    pub fn finish(self) -> DigestResult<DigestSet> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(DigestError::Cancelled);
        }
        self.hasher.finish()
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(io::Error::other(DigestError::Cancelled));
        }
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Convert an I/O error raised while reading through a [`HashingReader`]
/// back into a [`DigestError`], recovering cancellation.
pub fn classify_read_error(err: io::Error) -> DigestError {
    let cancelled = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<DigestError>())
        .is_some_and(|e| matches!(e, DigestError::Cancelled));
    if cancelled {
        DigestError::Cancelled
    } else {
        DigestError::StreamRead(err)
    }
}
