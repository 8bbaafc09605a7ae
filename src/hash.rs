//! SHA-256 file digests and digest comparison.
//!
//! [`hash_file`] digests a single file, [`files_match`] compares several,
//! and [`check_hash`] picks between the two based on how many paths it is
//! given.
use std::fmt;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest as _, Sha256};

use crate::error::HashError;

/// SHA-256 digest of a file's full content at the time it was read.
///
/// # Examples
///
/// ```
/// use devtools::hash::FileDigest;
///
/// let digest = FileDigest::of_bytes(b"hello world");
/// assert_eq!(
///     digest.to_hex(),
///     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileDigest([u8; 32]);

impl FileDigest {
    /// Digest an in-memory byte slice.
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Raw 32-byte digest.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hexadecimal rendering (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for FileDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of [`check_hash`]: a digest for one file, a verdict for several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashCheck {
    /// Exactly one file was given; this is its digest.
    Digest(FileDigest),
    /// Several files were given; `true` if all digests are identical.
    Matches(bool),
}

/// Read the whole file at `path` and return its SHA-256 digest.
///
/// # Errors
///
/// Returns [`HashError::Read`] if the file cannot be read.
pub fn hash_file(path: &Path) -> Result<FileDigest, HashError> {
    let bytes = std::fs::read(path).map_err(|source| HashError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let digest = FileDigest::of_bytes(&bytes);
    tracing::debug!("sha256 {} {}", digest, path.display());
    Ok(digest)
}

/// Return `true` if every file has the same content digest as the first.
///
/// Stops at the first mismatch; files after it are not read.
///
/// # Errors
///
/// Returns [`HashError::NotEnoughFiles`] for fewer than two paths, or
/// [`HashError::Read`] if a file that is reached cannot be read.
pub fn files_match<P: AsRef<Path>>(paths: &[P]) -> Result<bool, HashError> {
    let [first, rest @ ..] = paths else {
        return Err(HashError::NotEnoughFiles(0));
    };
    if rest.is_empty() {
        return Err(HashError::NotEnoughFiles(1));
    }

    let expected = hash_file(first.as_ref())?;
    for path in rest {
        if hash_file(path.as_ref())? != expected {
            tracing::debug!("digest mismatch at {}", path.as_ref().display());
            return Ok(false);
        }
    }
    Ok(true)
}

/// Digest one file, or compare the digests of several.
///
/// # Examples
///
/// ```no_run
/// use devtools::hash::{HashCheck, check_hash};
///
/// match check_hash(&["a.bin", "b.bin"])? {
///     HashCheck::Matches(same) => println!("identical: {same}"),
///     HashCheck::Digest(d) => println!("{d}"),
/// }
/// # Ok::<(), devtools::error::HashError>(())
/// ```
///
/// # Errors
///
/// Returns [`HashError::NoFiles`] for an empty slice, or [`HashError::Read`]
/// if a file cannot be read.
pub fn check_hash<P: AsRef<Path>>(paths: &[P]) -> Result<HashCheck, HashError> {
    match paths {
        [] => Err(HashError::NoFiles),
        [single] => hash_file(single.as_ref()).map(HashCheck::Digest),
        _ => files_match(paths).map(HashCheck::Matches),
    }
}
