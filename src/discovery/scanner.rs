//! Directory scanning functionality
//!
//! Lists the files or sub-folders of a folder. Hidden entries and symbolic
//! links are skipped and never descended into. An entry that cannot be read,
//! or whose name is not valid unicode, is kept as an error next to the paths
//! that could be listed.

use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::debug;
use walkdir::WalkDir;

use crate::errors::{
    file_operation_error, glob_pattern_error, invalid_filename_error, Error, Result,
};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Result of listing a folder
#[derive(Debug, Default)]
pub struct Listing {
    /// Paths that matched, in lexical order
    pub paths: Vec<PathBuf>,
    /// Entries that could not be inspected
    pub errors: Vec<Error>,
}

/// Lists the regular files directly inside `folder` matching `pattern`
///
/// # Arguments
/// * `folder` - The folder to list
/// * `pattern` - Glob pattern for the file names, e.g. `*` or `*.jpg`
///
/// # Errors
/// Returns an error if the pattern is invalid
pub fn list_files(folder: &Path, pattern: &str) -> Result<Listing> {
    let matcher = Pattern::new(pattern).map_err(|e| glob_pattern_error(e, pattern))?;

    let mut listing = Listing::default();
    for entry in walk(folder, 1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                listing.errors.push(walk_error(e, folder));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) if is_hidden(name) => {}
            Some(name) => {
                if matcher.matches_with(name, MATCH_OPTIONS) {
                    listing.paths.push(entry.into_path());
                }
            }
            None => {
                if matcher.matches_with(&entry.file_name().to_string_lossy(), MATCH_OPTIONS) {
                    listing.errors.push(invalid_filename_error(entry.into_path()));
                }
            }
        }
    }

    debug!(
        "Found {} files in {}",
        listing.paths.len(),
        folder.display()
    );
    Ok(listing)
}

/// Lists the sub-folders of `root`, optionally descending into them
///
/// The root itself is not part of the listing. Symbolic links to folders
/// are neither listed nor followed, and a folder whose name is not valid
/// unicode is reported instead of being listed.
pub fn list_folders(root: &Path, recursive: bool) -> Listing {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut listing = Listing::default();
    let mut entries = walk(root, max_depth);
    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // a folder that cannot be read is reported once, not scheduled
                if e.depth() > 0 && listing.paths.last().map(PathBuf::as_path) == e.path() {
                    listing.paths.pop();
                }
                listing.errors.push(walk_error(e, root));
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let listed = match entry.file_name().to_str() {
            Some(name) if is_hidden(name) => false,
            Some(_) => {
                listing.paths.push(entry.into_path());
                true
            }
            None => {
                listing.errors.push(invalid_filename_error(entry.into_path()));
                false
            }
        };
        if !listed && recursive {
            entries.skip_current_dir();
        }
    }

    debug!(
        "Found {} folders below {}",
        listing.paths.len(),
        root.display()
    );
    listing
}

fn walk(base: &Path, max_depth: usize) -> walkdir::IntoIter {
    WalkDir::new(base)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn walk_error(err: walkdir::Error, base: &Path) -> Error {
    let path = err.path().map_or_else(|| base.to_path_buf(), Path::to_path_buf);
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    file_operation_error(source, path, "read")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, File};
    use tempfile::tempdir;

    #[test]
    fn test_list_files_is_not_recursive() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("a.txt")).unwrap();
        File::create(temp_dir.path().join("b")).unwrap();
        create_dir_all(temp_dir.path().join("sub")).unwrap();
        File::create(temp_dir.path().join("sub").join("c.txt")).unwrap();

        let listing = list_files(temp_dir.path(), "*").unwrap();

        assert_eq!(
            listing.paths,
            vec![temp_dir.path().join("a.txt"), temp_dir.path().join("b")]
        );
        assert!(listing.errors.is_empty());
    }

    #[test]
    fn test_list_files_skips_hidden_files() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join(".hidden")).unwrap();
        File::create(temp_dir.path().join("visible.txt")).unwrap();

        let listing = list_files(temp_dir.path(), "*").unwrap();

        assert_eq!(listing.paths, vec![temp_dir.path().join("visible.txt")]);
    }

    #[test]
    fn test_list_files_with_pattern() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("photo.jpg")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();

        let listing = list_files(temp_dir.path(), "*.jpg").unwrap();

        assert_eq!(listing.paths, vec![temp_dir.path().join("photo.jpg")]);
    }

    #[test]
    fn test_list_files_escapes_special_characters_in_base() {
        let temp_dir = tempdir().unwrap();
        let folder = temp_dir.path().join("[abcde-123456~] album");
        create_dir_all(&folder).unwrap();
        File::create(folder.join("track.mp3")).unwrap();

        let listing = list_files(&folder, "*").unwrap();

        assert_eq!(listing.paths, vec![folder.join("track.mp3")]);
    }

    #[test]
    fn test_list_folders_recursive() {
        let temp_dir = tempdir().unwrap();
        create_dir_all(temp_dir.path().join("A").join("nested")).unwrap();
        create_dir_all(temp_dir.path().join("B")).unwrap();
        File::create(temp_dir.path().join("file.txt")).unwrap();

        let listing = list_folders(temp_dir.path(), true);

        assert_eq!(
            listing.paths,
            vec![
                temp_dir.path().join("A"),
                temp_dir.path().join("A").join("nested"),
                temp_dir.path().join("B"),
            ]
        );
    }

    #[test]
    fn test_list_folders_non_recursive() {
        let temp_dir = tempdir().unwrap();
        create_dir_all(temp_dir.path().join("A").join("nested")).unwrap();

        let listing = list_folders(temp_dir.path(), false);

        assert_eq!(listing.paths, vec![temp_dir.path().join("A")]);
    }

    #[test]
    fn test_list_folders_skips_hidden_subtrees() {
        let temp_dir = tempdir().unwrap();
        create_dir_all(temp_dir.path().join(".git").join("objects")).unwrap();
        create_dir_all(temp_dir.path().join("A")).unwrap();

        let listing = list_folders(temp_dir.path(), true);

        assert_eq!(listing.paths, vec![temp_dir.path().join("A")]);
    }

    #[test]
    fn test_list_missing_folder_reports_error() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing");

        let listing = list_files(&missing, "*").unwrap();

        assert!(listing.paths.is_empty());
        assert_eq!(listing.errors.len(), 1);
        assert_eq!(listing.errors[0].code(), "NotFound");
        assert_eq!(listing.errors[0].path(), Some(missing.as_path()));
    }

    #[test]
    fn test_list_files_rejects_invalid_pattern() {
        let temp_dir = tempdir().unwrap();

        let error = list_files(temp_dir.path(), "[").unwrap_err();

        assert_eq!(error.code(), "GLOB");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_unicode_names_are_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = tempdir().unwrap();
        let bad_file = temp_dir.path().join(OsStr::from_bytes(b"bad\xffname.txt"));
        let bad_folder = temp_dir.path().join(OsStr::from_bytes(b"bad\xfffolder"));
        File::create(&bad_file).unwrap();
        File::create(temp_dir.path().join("good.txt")).unwrap();
        create_dir_all(bad_folder.join("inner")).unwrap();

        let files = list_files(temp_dir.path(), "*").unwrap();
        assert_eq!(files.paths, vec![temp_dir.path().join("good.txt")]);
        assert_eq!(files.errors.len(), 1);
        assert_eq!(files.errors[0].code(), "InvalidFilename");
        assert_eq!(files.errors[0].path(), Some(bad_file.as_path()));

        let folders = list_folders(temp_dir.path(), true);
        assert!(folders.paths.is_empty());
        assert_eq!(folders.errors.len(), 1);
        assert_eq!(folders.errors[0].path(), Some(bad_folder.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_folders_are_not_followed() {
        let temp_dir = tempdir().unwrap();
        create_dir_all(temp_dir.path().join("A").join("sub")).unwrap();
        File::create(temp_dir.path().join("A").join("sub").join("f.txt")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("A"), temp_dir.path().join("link")).unwrap();
        // a link back to its own parent must not loop
        std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("A").join("up")).unwrap();

        let folders = list_folders(temp_dir.path(), true);
        assert_eq!(
            folders.paths,
            vec![temp_dir.path().join("A"), temp_dir.path().join("A").join("sub")]
        );
        assert!(folders.errors.is_empty());

        let files = list_files(temp_dir.path(), "*").unwrap();
        assert!(files.paths.is_empty());
    }
}
