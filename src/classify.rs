use crate::collision::{self, Resolution};
use crate::config::DateSource;
use crate::confirm::Confirm;
use crate::date::{self, DateKey, DateOrigin};
use crate::error::Error;
use crate::layout;
use crate::platform::TimestampSource;
use chrono::NaiveDate;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One item of the pool, as read at sweep start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Lossy UTF-8 form of `file_name`, for date extraction and logging.
    pub name: String,
    /// The name as stored on disk. Every move target is built from this.
    pub file_name: OsString,
    pub is_dir: bool,
    pub source_path: PathBuf,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, is_dir: bool, source_path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            file_name: OsString::from(&name),
            name,
            is_dir,
            source_path: source_path.into(),
        }
    }

    pub fn from_os_name(file_name: OsString, is_dir: bool, source_path: impl Into<PathBuf>) -> Self {
        Self {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            is_dir,
            source_path: source_path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsortedReason {
    IsDirectory,
    NoDateFound,
    FutureDate,
    UserDeclinedRename,
}

impl UnsortedReason {
    pub const ALL: [UnsortedReason; 4] = [
        Self::IsDirectory,
        Self::NoDateFound,
        Self::FutureDate,
        Self::UserDeclinedRename,
    ];
}

impl fmt::Display for UnsortedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::IsDirectory => "is a directory",
            Self::NoDateFound => "no date found",
            Self::FutureDate => "date is in the future",
            Self::UserDeclinedRename => "rename declined",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sorted {
        /// Full destination path, file name included.
        path: PathBuf,
        date: DateKey,
        origin: DateOrigin,
        /// Collision suffix applied to the name, if any.
        suffix: Option<u32>,
    },
    Unsorted(UnsortedReason),
}

impl Outcome {
    pub fn is_sorted(&self) -> bool {
        matches!(self, Self::Sorted { .. })
    }
}

/// Decides where each pool entry goes.
///
/// The only side effect is creating the dated directory for a file that
/// will be sorted; nothing is moved and no name slot is consumed.
pub struct Classifier<'a> {
    output_root: &'a Path,
    date_source: DateSource,
    timestamps: &'a dyn TimestampSource,
    confirm: Option<&'a dyn Confirm>,
}

impl<'a> Classifier<'a> {
    pub fn new(
        output_root: &'a Path,
        date_source: DateSource,
        timestamps: &'a dyn TimestampSource,
    ) -> Self {
        Self {
            output_root,
            date_source,
            timestamps,
            confirm: None,
        }
    }

    /// Ask `confirm` before every collision rename.
    pub fn interactive(mut self, confirm: &'a dyn Confirm) -> Self {
        self.confirm = Some(confirm);
        self
    }

    fn resolve_date(&self, entry: &FileEntry) -> Result<Option<(DateKey, DateOrigin)>, Error> {
        if self.date_source.uses_filename() {
            if let Some(date) = date::extract(&entry.name) {
                return Ok(Some((date, DateOrigin::Filename)));
            }
        }
        if self.date_source.uses_timestamp() {
            let stamp = self
                .timestamps
                .reference_timestamp(&entry.source_path)
                .map_err(|e| Error::io(&entry.source_path, e))?;
            return Ok(Some((DateKey::from_timestamp(stamp), DateOrigin::Timestamp)));
        }
        Ok(None)
    }

    pub fn classify(&self, entry: &FileEntry, today: NaiveDate) -> Result<Outcome, Error> {
        if entry.is_dir {
            return Ok(Outcome::Unsorted(UnsortedReason::IsDirectory));
        }

        let Some((date, origin)) = self.resolve_date(entry)? else {
            debug!("{}: no date found", entry.name);
            return Ok(Outcome::Unsorted(UnsortedReason::NoDateFound));
        };

        // Only user-typed dates can point into the future.
        if origin == DateOrigin::Filename && date.is_after(&DateKey::from_date(today)) {
            debug!("{}: {} is after {}", entry.name, date, today);
            return Ok(Outcome::Unsorted(UnsortedReason::FutureDate));
        }

        let dest = layout::compose(self.output_root, &date);
        layout::ensure_exists(&dest)?;

        match collision::resolve(dest.as_path(), &entry.file_name, self.confirm) {
            Resolution::Available { path, suffix } => {
                debug!("{}: sorted to {}", entry.name, path.display());
                Ok(Outcome::Sorted {
                    path,
                    date,
                    origin,
                    suffix,
                })
            }
            Resolution::Declined => Ok(Outcome::Unsorted(UnsortedReason::UserDeclinedRename)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::NeverConfirm;
    use std::fs;
    use std::io;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tempfile::tempdir;

    struct FixedTimestamp(SystemTime);

    impl TimestampSource for FixedTimestamp {
        fn reference_timestamp(&self, _path: &Path) -> io::Result<SystemTime> {
            Ok(self.0)
        }
    }

    struct BrokenTimestamp;

    impl TimestampSource for BrokenTimestamp {
        fn reference_timestamp(&self, _path: &Path) -> io::Result<SystemTime> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn file(name: &str) -> FileEntry {
        FileEntry::new(name, false, Path::new("pool").join(name))
    }

    // 2020-06-15 12:00 UTC; still June 15 from UTC-12 to UTC+11.
    fn june_2020() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_592_222_400)
    }

    #[test]
    fn test_sorted_from_extended_name() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::Filename, &stamps);

        let outcome = classifier
            .classify(&file("vacation_2023-05-04_beach.jpg"), today())
            .unwrap();

        let expected_dir = tmp.path().join("2023").join("2023_05").join("2023_05_04");
        match outcome {
            Outcome::Sorted {
                path,
                date,
                origin,
                suffix,
            } => {
                assert_eq!(path, expected_dir.join("vacation_2023-05-04_beach.jpg"));
                assert_eq!(date.day_dir(), "2023_05_04");
                assert_eq!(origin, DateOrigin::Filename);
                assert_eq!(suffix, None);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(expected_dir.is_dir());
    }

    #[test]
    fn test_directory_always_unsorted() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::FilenameOrTimestamp, &stamps);

        for name in ["2023-05-04", "IMG_20230504", "plain"] {
            let entry = FileEntry::new(name, true, Path::new("pool").join(name));
            assert_eq!(
                classifier.classify(&entry, today()).unwrap(),
                Outcome::Unsorted(UnsortedReason::IsDirectory)
            );
        }
    }

    #[test]
    fn test_no_date_in_filename_mode() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::Filename, &stamps);
        assert_eq!(
            classifier.classify(&file("notes.txt"), today()).unwrap(),
            Outcome::Unsorted(UnsortedReason::NoDateFound)
        );
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_future_date_rejected_without_side_effects() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::Filename, &stamps);
        assert_eq!(
            classifier.classify(&file("trip_2099-01-01.jpg"), today()).unwrap(),
            Outcome::Unsorted(UnsortedReason::FutureDate)
        );
        assert!(!tmp.path().join("2099").exists());
    }

    #[test]
    fn test_today_is_not_future() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::Filename, &stamps);
        assert!(classifier
            .classify(&file("new_year_2024-01-01.jpg"), today())
            .unwrap()
            .is_sorted());
    }

    #[test]
    fn test_timestamp_mode_ignores_name() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::Timestamp, &stamps);

        match classifier.classify(&file("trip_2099-01-01.jpg"), today()).unwrap() {
            Outcome::Sorted { date, origin, .. } => {
                assert_eq!(date.day_dir(), "2020_06_15");
                assert_eq!(origin, DateOrigin::Timestamp);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_fallback_prefers_name() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::FilenameOrTimestamp, &stamps);

        let named = classifier.classify(&file("IMG_20230504.jpg"), today()).unwrap();
        assert!(matches!(
            named,
            Outcome::Sorted { origin: DateOrigin::Filename, .. }
        ));

        let unnamed = classifier.classify(&file("notes.txt"), today()).unwrap();
        assert!(matches!(
            unnamed,
            Outcome::Sorted { origin: DateOrigin::Timestamp, .. }
        ));
    }

    #[test]
    fn test_fallback_rejects_future_name_date() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let classifier = Classifier::new(tmp.path(), DateSource::FilenameOrTimestamp, &stamps);

        assert_eq!(
            classifier.classify(&file("trip_2099-01-01.jpg"), today()).unwrap(),
            Outcome::Unsorted(UnsortedReason::FutureDate)
        );
        assert!(!tmp.path().join("2099").exists());
        assert!(!tmp.path().join("2020").exists());
    }

    #[test]
    fn test_timestamp_failure_is_an_error() {
        let tmp = tempdir().unwrap();
        let classifier = Classifier::new(tmp.path(), DateSource::Timestamp, &BrokenTimestamp);
        let err = classifier.classify(&file("notes.txt"), today()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_collision_suffix_and_decline() {
        let tmp = tempdir().unwrap();
        let stamps = FixedTimestamp(june_2020());
        let day = tmp.path().join("2023").join("2023_05").join("2023_05_04");
        fs::create_dir_all(&day).unwrap();
        fs::write(day.join("photo_2023-05-04.jpg"), "existing").unwrap();

        let silent = Classifier::new(tmp.path(), DateSource::Filename, &stamps);
        match silent.classify(&file("photo_2023-05-04.jpg"), today()).unwrap() {
            Outcome::Sorted { path, suffix, .. } => {
                assert_eq!(path, day.join("photo_2023-05-04_(1).jpg"));
                assert_eq!(suffix, Some(1));
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let asking =
            Classifier::new(tmp.path(), DateSource::Filename, &stamps).interactive(&NeverConfirm);
        assert_eq!(
            asking.classify(&file("photo_2023-05-04.jpg"), today()).unwrap(),
            Outcome::Unsorted(UnsortedReason::UserDeclinedRename)
        );
    }
}
