//! Durable, merge-safe container for one property file
//!
//! A container is bound to a single path for its lifetime. Reads are
//! best-effort: a missing or unreadable file is normal and degrades to "no
//! data". Writes go through a temp file in the target's directory and replace
//! the target by atomic rename, and only when the content fingerprint shows
//! it actually changed since the last read. Merge-enabled stores reconcile
//! this process's values with anything another process wrote in the meantime.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::digest::DigestStream;
use crate::store::properties;

/// Result of a low-level [`ConfigurationContainer::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The target was replaced by atomic rename.
    Replaced,
    /// The produced content matched the last-read fingerprint; the target
    /// was left untouched.
    Suppressed,
}

/// Result of a [`ConfigurationContainer::store_properties`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The merged map was persisted.
    Written,
    /// Nothing changed relative to the last read; no file was touched.
    Unchanged,
}

/// Merge-safe read/write of one flat key=value file.
///
/// Not safe for concurrent calls from multiple threads; one owning caller
/// per instance. Cross-process contention is handled opportunistically: the
/// fingerprint comparison skips redundant writes and the merge path re-reads
/// fresh disk content, but the window between that re-read and the final
/// rename remains last-writer-wins.
pub struct ConfigurationContainer {
    path: PathBuf,
    last_snapshot: Option<BTreeMap<String, String>>,
    last_digest: Option<String>,
}

impl ConfigurationContainer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_snapshot: None,
            last_digest: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream the file's bytes through `consumer`, fingerprinting as they
    /// are consumed. A missing or unreadable file invokes nothing and
    /// returns `None` without error; consumer failures are swallowed here.
    /// The fingerprint is finalized exactly once when the stream closes and
    /// recorded as the last-read digest.
    pub fn read<F>(&mut self, consumer: F) -> Option<String>
    where
        F: FnOnce(&mut dyn Read) -> std::io::Result<()>,
    {
        let digest = match File::open(&self.path) {
            Ok(file) => {
                let mut stream = DigestStream::new(BufReader::new(file));
                if let Err(err) = consumer(&mut stream) {
                    debug!(path = %self.path.display(), %err, "config consumer failed");
                }
                Some(stream.finish())
            }
            Err(err) => {
                debug!(path = %self.path.display(), %err, "config file not readable");
                None
            }
        };
        self.last_digest = digest.clone();
        digest
    }

    /// Load the file's property map, starting from `prefill` (file pairs win
    /// on conflicts). Records the resulting map and the stream fingerprint
    /// as the last-read state and returns a detached copy.
    pub fn read_properties(
        &mut self,
        prefill: Option<&BTreeMap<String, String>>,
    ) -> BTreeMap<String, String> {
        let mut map = prefill.cloned().unwrap_or_default();
        let mut content = String::new();
        let digest = self.read(|stream| stream.read_to_string(&mut content).map(|_| ()));
        if digest.is_some() {
            properties::parse_into(&content, &mut map);
        }
        self.last_snapshot = Some(map.clone());
        map
    }

    /// Stream `producer` output into a temp file next to the target, then
    /// replace the target by atomic rename unless the produced fingerprint
    /// matches the last-read digest (in which case the write is suppressed).
    /// A producer failure aborts without touching the target. The temp file
    /// is removed on every path; failures are logged and returned, never
    /// panicked on.
    pub fn write<F>(&mut self, producer: F) -> Result<WriteOutcome, StoreError>
    where
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        let temp_path = self.temp_path();
        let result = self.write_via_temp(&temp_path, producer);
        if temp_path.exists() {
            if let Err(err) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), %err, "failed to remove temp file");
            }
        }
        if let Err(err) = &result {
            warn!(path = %self.path.display(), %err, "config write failed");
        }
        result
    }

    /// Persist `props`, optionally merging with external edits made since
    /// the last read.
    ///
    /// With merge enabled, keys this process saw at its last read but does
    /// not re-submit are treated as locally removed and deleted from the
    /// output even if another process still has them on disk; values in
    /// `props` win for every key submitted; everything else found on disk
    /// survives. A key removed both locally and externally stays removed.
    ///
    /// If the resulting map equals the last-read snapshot, no file is
    /// touched at all. After a successful store the snapshot is advanced so
    /// an immediately repeated identical call is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if called before any `read_properties` on this instance; that
    /// is a programming-contract violation, not a runtime condition.
    pub fn store_properties(
        &mut self,
        props: &BTreeMap<String, String>,
        allow_merge: bool,
        comment: &str,
    ) -> Result<StoreOutcome, StoreError> {
        let Some(snapshot) = self.last_snapshot.clone() else {
            panic!(
                "store_properties called before read_properties on {}",
                self.path.display()
            );
        };

        let output = if allow_merge {
            let mut merged = self.parse_fresh();
            for key in snapshot.keys() {
                if !props.contains_key(key) {
                    merged.remove(key);
                }
            }
            merged.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged
        } else {
            props.clone()
        };

        if output == snapshot {
            debug!(path = %self.path.display(), "properties unchanged since last read");
            return Ok(StoreOutcome::Unchanged);
        }

        let body = properties::serialize(&output, comment);
        let outcome = self.write(|w| w.write_all(body.as_bytes()))?;
        self.last_snapshot = Some(output);
        Ok(match outcome {
            WriteOutcome::Replaced => StoreOutcome::Written,
            WriteOutcome::Suppressed => StoreOutcome::Unchanged,
        })
    }

    /// Parse current disk content without disturbing the last-read state.
    /// Used by the merge path to pick up concurrent external writes.
    fn parse_fresh(&self) -> BTreeMap<String, String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => properties::parse(&content),
            Err(err) => {
                debug!(path = %self.path.display(), %err, "fresh re-read failed");
                BTreeMap::new()
            }
        }
    }

    // Temp file lives in the target's directory so the rename stays on one
    // filesystem.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }

    fn write_via_temp<F>(&mut self, temp_path: &Path, producer: F) -> Result<WriteOutcome, StoreError>
    where
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        let file = File::create(temp_path).map_err(|e| StoreError::io(temp_path, e))?;
        let mut stream = DigestStream::new(BufWriter::new(file));

        producer(&mut stream).map_err(|e| StoreError::io(temp_path, e))?;
        stream.flush().map_err(|e| StoreError::io(temp_path, e))?;
        let digest = stream.finish();

        let file = stream
            .into_inner()
            .into_inner()
            .map_err(|e| StoreError::io(temp_path, e.into_error()))?;
        file.sync_all().map_err(|e| StoreError::io(temp_path, e))?;
        drop(file);

        let unchanged = self.last_digest.as_deref() == Some(digest.as_str());
        if unchanged && self.path.exists() {
            debug!(path = %self.path.display(), "content unchanged, suppressing write");
            return Ok(WriteOutcome::Suppressed);
        }

        fs::rename(temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        self.last_digest = Some(digest);
        Ok(WriteOutcome::Replaced)
    }
}
