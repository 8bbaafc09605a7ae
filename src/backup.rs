//! Timestamped single-file backups.
//!
//! A [`BackupRequest`] names the source file and, optionally, where the copy
//! goes and what it is called. [`BackupDescriptor::resolve`] fills in the
//! defaults and [`create_backup`] performs the copy, creating the
//! destination directory when it does not exist yet.
use std::ffi::OsString;
use std::fs::{File, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::BackupError;
use crate::locale::Locale;

/// `strftime` pattern for generated backup names, e.g. `2024-03-09 14h05`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %Hh%M";

/// What to back up and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupRequest {
    /// File to copy.
    pub source: PathBuf,
    /// Destination directory; empty means the current directory.
    pub destination_dir: String,
    /// Backup file name; generated from the local time when `None`.
    pub name: Option<String>,
    /// Language of the operator notice on permission failure.
    pub locale: Locale,
}

impl BackupRequest {
    /// Back up `source` into the current directory under a generated name.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the destination directory.
    #[must_use]
    pub fn destination_dir(mut self, dir: impl Into<String>) -> Self {
        self.destination_dir = dir.into();
        self
    }

    /// Set an explicit backup file name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the operator notice language.
    #[must_use]
    pub const fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// The resolved source, destination directory and file name of one backup.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use devtools::backup::{BackupDescriptor, BackupRequest};
///
/// let now = NaiveDate::from_ymd_opt(2024, 3, 9)
///     .unwrap()
///     .and_hms_opt(14, 5, 0)
///     .unwrap();
/// let request = BackupRequest::new("data/report.csv").destination_dir("bak");
/// let descriptor = BackupDescriptor::resolve_at(&request, now);
///
/// assert_eq!(descriptor.name(), "2024-03-09 14h05.csv");
/// assert_eq!(descriptor.destination_dir(), "bak/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupDescriptor {
    source: PathBuf,
    destination_dir: String,
    name: String,
}

impl BackupDescriptor {
    /// Resolve a request against the current local time.
    #[must_use]
    pub fn resolve(request: &BackupRequest) -> Self {
        Self::resolve_at(request, chrono::Local::now().naive_local())
    }

    /// Resolve a request against a fixed point in time.
    #[must_use]
    pub fn resolve_at(request: &BackupRequest, now: NaiveDateTime) -> Self {
        let name = match &request.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!(
                "{}{}",
                now.format(TIMESTAMP_FORMAT),
                extension_of(&request.source)
            ),
        };
        Self {
            source: request.source.clone(),
            destination_dir: normalize_dir(&request.destination_dir),
            name,
        }
    }

    /// File being backed up.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination directory, ending in a separator unless empty.
    #[must_use]
    pub fn destination_dir(&self) -> &str {
        &self.destination_dir
    }

    /// Backup file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full destination path: directory followed by file name.
    #[must_use]
    pub fn destination_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.destination_dir, self.name))
    }
}

/// What a backup call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The backup file was written.
    Copied {
        /// Path of the backup file.
        destination: PathBuf,
        /// Whether the destination directory had to be created first.
        created_directory: bool,
        /// Copy attempts made: 1 normally, 2 after creating the directory.
        attempts: u8,
    },
    /// The destination directory was missing and could not be created for
    /// lack of permission. The operator notice has been logged.
    DirectoryNotAuthorized {
        /// Directory that could not be created.
        directory: PathBuf,
    },
}

/// Copy a file to its backup location.
///
/// # Errors
///
/// Returns [`BackupError::SourceUnreadable`] if the source cannot be read,
/// [`BackupError::SameFile`] if the destination is the source itself,
/// [`BackupError::CreateDirectory`] if the missing destination directory
/// cannot be created for a reason other than permission, and
/// [`BackupError::Copy`] if writing the backup fails.
pub fn create_backup(request: &BackupRequest) -> Result<BackupOutcome, BackupError> {
    let descriptor = BackupDescriptor::resolve(request);
    execute(&descriptor, request.locale)
}

/// Perform the copy described by `descriptor`.
///
/// A single copy is attempted. If it fails because the destination
/// directory is missing, the directory is created and the copy is tried
/// once more.
///
/// # Errors
///
/// See [`create_backup`].
pub fn execute(descriptor: &BackupDescriptor, locale: Locale) -> Result<BackupOutcome, BackupError> {
    let destination = descriptor.destination_path();
    tracing::debug!(
        "backing up {} to {}",
        descriptor.source.display(),
        destination.display()
    );

    match copy_once(&descriptor.source, &destination) {
        Ok(()) => {
            return Ok(BackupOutcome::Copied {
                destination,
                created_directory: false,
                attempts: 1,
            });
        }
        Err(CopyFailure::Destination(e))
            if e.kind() == io::ErrorKind::NotFound && !descriptor.destination_dir.is_empty() =>
        {
            tracing::debug!("destination directory missing: {e}");
        }
        Err(failure) => return Err(failure.into_error(descriptor, &destination)),
    }

    let directory = PathBuf::from(&descriptor.destination_dir);
    match std::fs::create_dir_all(&directory) {
        Ok(()) => tracing::debug!("created directory {}", directory.display()),
        Err(e) => return directory_creation_failed(directory, e, locale),
    }

    copy_once(&descriptor.source, &destination)
        .map_err(|failure| failure.into_error(descriptor, &destination))?;
    Ok(BackupOutcome::Copied {
        destination,
        created_directory: true,
        attempts: 2,
    })
}

/// Map a failed `create_dir_all` to the backup result.
///
/// Permission denied logs the operator notice and yields
/// [`BackupOutcome::DirectoryNotAuthorized`]; anything else is an error.
fn directory_creation_failed(
    directory: PathBuf,
    error: io::Error,
    locale: Locale,
) -> Result<BackupOutcome, BackupError> {
    if error.kind() == io::ErrorKind::PermissionDenied {
        for line in locale.directory_not_authorized() {
            tracing::error!("{line}");
        }
        return Ok(BackupOutcome::DirectoryNotAuthorized { directory });
    }
    Err(BackupError::CreateDirectory {
        path: directory,
        source: error,
    })
}

/// Why a copy failed.
#[derive(Debug)]
enum CopyFailure {
    Source(io::Error),
    Destination(io::Error),
    SameFile,
}

impl CopyFailure {
    fn into_error(self, descriptor: &BackupDescriptor, destination: &Path) -> BackupError {
        match self {
            Self::Source(source) => BackupError::SourceUnreadable {
                path: descriptor.source.clone(),
                source,
            },
            Self::Destination(source) => BackupError::Copy {
                from: descriptor.source.clone(),
                to: destination.to_path_buf(),
                source,
            },
            Self::SameFile => BackupError::SameFile {
                path: destination.to_path_buf(),
            },
        }
    }
}

/// Copy contents and permission bits, then carry over the modification
/// time where the platform allows it.
///
/// The data is staged in a sibling file and renamed over `destination`, so
/// a failed copy leaves any previous backup untouched.
fn copy_once(source: &Path, destination: &Path) -> Result<(), CopyFailure> {
    let mut input = File::open(source).map_err(CopyFailure::Source)?;
    let metadata = input.metadata().map_err(CopyFailure::Source)?;
    if !metadata.is_file() {
        return Err(CopyFailure::Source(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    if is_same_file(source, &metadata, destination) {
        return Err(CopyFailure::SameFile);
    }

    let staging = staging_path(destination);
    let result = write_staged(&mut input, &metadata, &staging).and_then(|()| {
        std::fs::rename(&staging, destination).map_err(CopyFailure::Destination)
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&staging);
    }
    result
}

fn write_staged(input: &mut File, metadata: &Metadata, staging: &Path) -> Result<(), CopyFailure> {
    let mut output = File::create(staging).map_err(CopyFailure::Destination)?;
    io::copy(input, &mut output).map_err(CopyFailure::Destination)?;
    output
        .set_permissions(metadata.permissions())
        .map_err(CopyFailure::Destination)?;

    if let Err(e) = metadata.modified().and_then(|mtime| output.set_modified(mtime)) {
        tracing::debug!("modification time not preserved for {}: {e}", staging.display());
    }
    Ok(())
}

/// Sibling of `destination` used while the copy is in progress.
fn staging_path(destination: &Path) -> PathBuf {
    let name = destination.file_name().map_or_else(
        || OsString::from("backup.devtools_tmp"),
        |n| {
            let mut s = n.to_os_string();
            s.push(".devtools_tmp");
            s
        },
    );
    destination.with_file_name(name)
}

/// Whether `destination` already exists and is the same file as `source`,
/// through an identical, relative, `.`-laden or symlinked path.
fn is_same_file(source: &Path, source_meta: &Metadata, destination: &Path) -> bool {
    let Ok(dest_meta) = std::fs::metadata(destination) else {
        return false;
    };
    if same_inode(source_meta, &dest_meta) {
        return true;
    }
    matches!(
        (std::fs::canonicalize(source), std::fs::canonicalize(destination)),
        (Ok(a), Ok(b)) if a == b
    )
}

#[cfg(unix)]
fn same_inode(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt as _;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
const fn same_inode(_: &Metadata, _: &Metadata) -> bool {
    false
}

/// Extension of the source's file name: from its last `.` to the end, or
/// empty when the name has no `.`.
fn extension_of(source: &Path) -> &str {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    name.rfind('.')
        .and_then(|idx| name.get(idx..))
        .unwrap_or_default()
}

/// Append `/` to a non-empty directory unless it already ends in `/` or `\`.
fn normalize_dir(dir: &str) -> String {
    if dir.is_empty() || dir.ends_with(['/', '\\']) {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(9, 7, 42)
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Name and directory resolution
    // -----------------------------------------------------------------------

    #[test]
    fn generated_name_uses_timestamp_and_extension() {
        let d = BackupDescriptor::resolve_at(&BackupRequest::new("report.csv"), fixed_time());
        assert_eq!(d.name(), "2024-01-31 09h07.csv");
    }

    #[test]
    fn generated_name_without_extension() {
        let d = BackupDescriptor::resolve_at(&BackupRequest::new("Makefile"), fixed_time());
        assert_eq!(d.name(), "2024-01-31 09h07");
    }

    #[test]
    fn extension_comes_from_last_dot_of_file_name() {
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("dir.d/notes")), "");
        assert_eq!(extension_of(Path::new("dir/.profile")), ".profile");
    }

    #[test]
    fn explicit_name_is_used_verbatim() {
        let request = BackupRequest::new("report.csv").name("keep.me");
        let d = BackupDescriptor::resolve_at(&request, fixed_time());
        assert_eq!(d.name(), "keep.me");
    }

    #[test]
    fn empty_explicit_name_falls_back_to_timestamp() {
        let request = BackupRequest::new("a.txt").name("");
        let d = BackupDescriptor::resolve_at(&request, fixed_time());
        assert_eq!(d.name(), "2024-01-31 09h07.txt");
    }

    #[test]
    fn normalize_dir_appends_single_separator() {
        assert_eq!(normalize_dir(""), "");
        assert_eq!(normalize_dir("bak"), "bak/");
        assert_eq!(normalize_dir("bak/"), "bak/");
        assert_eq!(normalize_dir("C:\\bak\\"), "C:\\bak\\");
    }

    #[test]
    fn destination_path_joins_dir_and_name() {
        let request = BackupRequest::new("x.log").destination_dir("out").name("y.log");
        let d = BackupDescriptor::resolve_at(&request, fixed_time());
        assert_eq!(d.destination_path(), PathBuf::from("out/y.log"));
        assert_eq!(d.source(), Path::new("x.log"));
    }

    // -----------------------------------------------------------------------
    // Copying
    // -----------------------------------------------------------------------

    #[test]
    fn happy_path_copies_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("data.bin");
        std::fs::write(&source, b"\x00\x01payload").unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(dir.path().to_str().unwrap())
            .name("copy.bin");
        let outcome = create_backup(&request).unwrap();

        let expected = dir.path().join("copy.bin");
        assert_eq!(
            outcome,
            BackupOutcome::Copied {
                destination: PathBuf::from(format!("{}/copy.bin", dir.path().display())),
                created_directory: false,
                attempts: 1,
            }
        );
        assert_eq!(std::fs::read(expected).unwrap(), b"\x00\x01payload");
    }

    #[test]
    fn missing_directory_is_created_then_copied_once_more() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        std::fs::write(&source, "hello").unwrap();
        let target_dir = dir.path().join("a").join("b");

        let request = BackupRequest::new(&source)
            .destination_dir(target_dir.to_str().unwrap())
            .name("notes.bak");
        let outcome = create_backup(&request).unwrap();

        assert!(matches!(
            outcome,
            BackupOutcome::Copied {
                created_directory: true,
                attempts: 2,
                ..
            }
        ));
        assert_eq!(
            std::fs::read_to_string(target_dir.join("notes.bak")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn missing_source_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let request = BackupRequest::new(dir.path().join("absent.txt"))
            .destination_dir(dir.path().join("never").to_str().unwrap());
        let err = create_backup(&request).unwrap_err();
        assert!(
            matches!(err, BackupError::SourceUnreadable { .. }),
            "unexpected error: {err}"
        );
        assert!(
            !dir.path().join("never").exists(),
            "no directory should be created for a missing source"
        );
    }

    #[test]
    fn directory_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let request = BackupRequest::new(dir.path()).name("x");
        assert!(matches!(
            create_backup(&request),
            Err(BackupError::SourceUnreadable { .. })
        ));
    }

    #[test]
    fn destination_blocked_by_file_is_create_directory_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("s.txt");
        std::fs::write(&source, "s").unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(blocker.join("sub").to_str().unwrap())
            .name("s.bak");
        let err = create_backup(&request).unwrap_err();
        assert!(
            matches!(
                err,
                BackupError::CreateDirectory { .. } | BackupError::Copy { .. }
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn modification_time_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("old.txt");
        std::fs::write(&source, "old").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(dir.path().to_str().unwrap())
            .name("old.bak");
        create_backup(&request).unwrap();

        let copied = std::fs::metadata(dir.path().join("old.bak")).unwrap();
        assert_eq!(copied.modified().unwrap(), past);
    }

    #[test]
    fn backup_onto_its_own_source_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        std::fs::write(&source, "precious data").unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(dir.path().to_str().unwrap())
            .name("a.txt");
        let err = create_backup(&request).unwrap_err();

        assert!(matches!(err, BackupError::SameFile { .. }), "unexpected error: {err}");
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "precious data");
    }

    #[test]
    fn dot_segment_path_to_source_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        std::fs::write(&source, "precious data").unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(format!("{}/.", dir.path().display()))
            .name("a.txt");
        let err = create_backup(&request).unwrap_err();

        assert!(matches!(err, BackupError::SameFile { .. }), "unexpected error: {err}");
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "precious data");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_source_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        std::fs::write(&source, "precious data").unwrap();
        std::os::unix::fs::symlink(&source, dir.path().join("link.txt")).unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(dir.path().to_str().unwrap())
            .name("link.txt");
        assert!(matches!(
            create_backup(&request),
            Err(BackupError::SameFile { .. })
        ));
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "precious data");
    }

    #[test]
    fn replacing_a_backup_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("s.txt");
        std::fs::write(&source, "fresh").unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("s.bak"), "stale and longer").unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(out.to_str().unwrap())
            .name("s.bak");
        create_backup(&request).unwrap();

        assert_eq!(std::fs::read_to_string(out.join("s.bak")).unwrap(), "fresh");
        let entries: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, ["s.bak"]);
    }

    #[test]
    fn failed_copy_cleans_up_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("s.txt");
        std::fs::write(&source, "s").unwrap();
        // A directory sitting at the destination path makes the final rename fail.
        let taken = dir.path().join("taken");
        std::fs::create_dir(&taken).unwrap();

        let request = BackupRequest::new(&source)
            .destination_dir(dir.path().to_str().unwrap())
            .name("taken");
        let err = create_backup(&request).unwrap_err();

        assert!(matches!(err, BackupError::Copy { .. }), "unexpected error: {err}");
        assert!(taken.is_dir());
        assert!(!staging_path(&taken).exists());
    }

    #[test]
    fn staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("bak/2024-01-31 09h07.csv")),
            PathBuf::from("bak/2024-01-31 09h07.csv.devtools_tmp")
        );
    }

    // -----------------------------------------------------------------------
    // Directory creation failures
    // -----------------------------------------------------------------------

    #[test]
    fn permission_denied_logs_localized_notice() {
        for locale in [Locale::PtBr, Locale::En] {
            let (log, _tmp, _guard) = crate::logging::isolated_logger();
            let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");

            let outcome =
                directory_creation_failed(PathBuf::from("locked/inner/"), denied, locale).unwrap();

            assert_eq!(
                outcome,
                BackupOutcome::DirectoryNotAuthorized {
                    directory: PathBuf::from("locked/inner/"),
                }
            );
            let contents = std::fs::read_to_string(log.log_path().expect("log path")).unwrap();
            for line in locale.directory_not_authorized() {
                assert!(
                    contents.contains(&format!("[error] {line}")),
                    "notice line missing from log: {line}"
                );
            }
        }
    }

    #[test]
    fn other_creation_errors_are_reported() {
        let (log, _tmp, _guard) = crate::logging::isolated_logger();
        let busy = io::Error::new(io::ErrorKind::AlreadyExists, "file in the way");

        let err = directory_creation_failed(PathBuf::from("bak/"), busy, Locale::En).unwrap_err();

        assert!(matches!(err, BackupError::CreateDirectory { .. }), "unexpected error: {err}");
        let contents = std::fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(!contents.contains("[error]"));
    }

    #[cfg(unix)]
    #[test]
    fn permission_denied_reports_not_authorized() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("s.txt");
        std::fs::write(&source, "s").unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users bypass directory permissions; nothing to observe.
        if std::fs::create_dir(locked.join("probe")).is_ok() {
            return;
        }

        let target = locked.join("inner");
        let request = BackupRequest::new(&source)
            .destination_dir(target.to_str().unwrap())
            .name("s.bak")
            .locale(Locale::PtBr);
        let outcome = create_backup(&request).unwrap();

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(
            outcome,
            BackupOutcome::DirectoryNotAuthorized {
                directory: PathBuf::from(format!("{}/", target.display())),
            }
        );
        assert!(!target.exists());
    }
}
