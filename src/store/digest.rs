//! Running SHA-256 fingerprint over a byte stream
//!
//! Wraps any reader or writer, hashing every byte that passes through. The
//! fingerprint is finalized exactly once by [`DigestStream::finish`]; calling
//! it again returns the cached value instead of re-finalizing. Fingerprints
//! use the canonical `sha256:<hex>` form.

use std::io::{Read, Write};

use sha2::{Digest, Sha256};

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Stream wrapper that fingerprints consumed or produced bytes.
pub struct DigestStream<T> {
    inner: T,
    hasher: Option<Sha256>,
    fingerprint: Option<String>,
}

impl<T> DigestStream<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            hasher: Some(Sha256::new()),
            fingerprint: None,
        }
    }

    /// Finalize and return the fingerprint. Idempotent: the first call
    /// consumes the hasher, later calls return the same cached string.
    pub fn finish(&mut self) -> String {
        if let Some(hasher) = self.hasher.take() {
            self.fingerprint = Some(format!("{}{:x}", PREFIX, hasher.finalize()));
        }
        self.fingerprint.clone().unwrap_or_default()
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<R: Read> Read for DigestStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}

impl<W: Write> Write for DigestStream<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(&buf[..n]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
