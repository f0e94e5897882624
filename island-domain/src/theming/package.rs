//! Theme package codec.
//!
//! A package is a directory (or a zip archive of one) with a
//! [`MANIFEST_FILE`] at its root and arbitrary asset files referenced by
//! relative path. Everything here is synchronous; the store runs it on the
//! blocking pool.

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::errors::{InvalidPackageReason, ThemeStoreError};
use super::types::Theme;

pub const MANIFEST_FILE: &str = "theme_config.json";
/// Scratch name used while the manifest is rewritten; never exported.
const MANIFEST_TMP_FILE: &str = ".theme_config.json.tmp";

/// Resolves a relative package path (archive entry or asset reference)
/// against `root`, purely lexically.
///
/// Absolute paths, drive prefixes and any `..` that would climb above `root`
/// are rejected with [`ThemeStoreError::PathTraversal`].
pub fn resolve_within(root: &Path, relative: &str) -> Result<PathBuf, ThemeStoreError> {
    let traversal = || ThemeStoreError::PathTraversal { entry: relative.to_string() };
    let normalized = relative.replace('\\', "/");
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(traversal());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(traversal()),
        }
    }
    let mut resolved = root.to_path_buf();
    resolved.extend(parts);
    Ok(resolved)
}

/// Extracts `archive` into `staging_root`.
///
/// Every entry name is checked before anything is written, so a single
/// escaping entry rejects the whole archive with nothing on disk.
pub fn extract_archive(archive: &[u8], staging_root: &Path) -> Result<usize, ThemeStoreError> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;

    let mut targets = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let entry = zip.by_index(index)?;
        let target = resolve_within(staging_root, entry.name())?;
        targets.push((target, entry.is_dir()));
    }

    let mut written = 0;
    for (index, (target, is_dir)) in targets.into_iter().enumerate() {
        if is_dir {
            fs::create_dir_all(&target)
                .map_err(|e| ThemeStoreError::storage_io("Failed to create package directory", &target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ThemeStoreError::storage_io("Failed to create package directory", parent, e))?;
        }
        let mut entry = zip.by_index(index)?;
        let mut out = fs::File::create(&target)
            .map_err(|e| ThemeStoreError::storage_io("Failed to create package file", &target, e))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| ThemeStoreError::storage_io("Failed to write package file", &target, e))?;
        written += 1;
    }
    debug!("Extracted {} files into {:?}", written, staging_root);
    Ok(written)
}

/// Parses the manifest at the root of `package_dir`.
pub fn read_manifest(package_dir: &Path) -> Result<Theme, ThemeStoreError> {
    let manifest_path = package_dir.join(MANIFEST_FILE);
    let content = match fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(InvalidPackageReason::MissingManifest(MANIFEST_FILE).into());
        }
        Err(e) => return Err(ThemeStoreError::storage_io("Failed to read manifest", manifest_path, e)),
    };
    serde_json::from_str(&content).map_err(|e| InvalidPackageReason::BadFormat(e).into())
}

/// Writes `theme` as the manifest of `package_dir`, replacing any existing one
/// via write-to-temp-then-rename.
pub fn write_manifest(package_dir: &Path, theme: &Theme) -> Result<(), ThemeStoreError> {
    let json = serde_json::to_string_pretty(theme).map_err(ThemeStoreError::Serialization)?;
    fs::create_dir_all(package_dir)
        .map_err(|e| ThemeStoreError::storage_io("Failed to create package directory", package_dir, e))?;
    let manifest_path = package_dir.join(MANIFEST_FILE);
    let tmp_path = package_dir.join(MANIFEST_TMP_FILE);
    fs::write(&tmp_path, json)
        .map_err(|e| ThemeStoreError::storage_io("Failed to write manifest", &tmp_path, e))?;
    fs::rename(&tmp_path, &manifest_path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ThemeStoreError::storage_io("Failed to replace manifest", &manifest_path, e)
    })
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<(String, PathBuf)>) -> Result<(), ThemeStoreError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ThemeStoreError::storage_io("Failed to read package directory", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ThemeStoreError::storage_io("Failed to read package directory", dir, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| ThemeStoreError::storage_io("Failed to stat package entry", &path, e))?;
        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if file_type.is_file() {
            let relative = path
                .strip_prefix(root)
                .map(|p| {
                    p.components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .unwrap_or_default();
            if !relative.is_empty() && relative != MANIFEST_TMP_FILE {
                out.push((relative, path));
            }
        }
    }
    Ok(())
}

/// Zips the package directory. The manifest is written first; other files
/// follow in lexical order so exports are reproducible.
pub fn archive_directory(package_dir: &Path) -> Result<Vec<u8>, ThemeStoreError> {
    let mut files = Vec::new();
    collect_files(package_dir, package_dir, &mut files)?;
    files.sort_by(|(a, _), (b, _)| (a != MANIFEST_FILE).cmp(&(b != MANIFEST_FILE)).then_with(|| a.cmp(b)));

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut buffer = Vec::new();
    for (name, path) in files {
        buffer.clear();
        fs::File::open(&path)
            .and_then(|mut f| f.read_to_end(&mut buffer))
            .map_err(|e| ThemeStoreError::storage_io("Failed to read package file", &path, e))?;
        writer.start_file(name.as_str(), options)?;
        writer
            .write_all(&buffer)
            .map_err(|e| ThemeStoreError::storage_io("Failed to write archive entry", &path, e))?;
    }
    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds an in-memory zip from `(name, contents)` pairs.
    pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::zip_bytes;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn resolve_within_rejects_escapes() {
        let root = Path::new("/stage");
        assert_eq!(resolve_within(root, "icons/a.png").unwrap(), PathBuf::from("/stage/icons/a.png"));
        assert_eq!(resolve_within(root, "./icons/../b.png").unwrap(), PathBuf::from("/stage/b.png"));
        assert_eq!(resolve_within(root, "icons\\c.png").unwrap(), PathBuf::from("/stage/icons/c.png"));
        for bad in ["../../escape.txt", "/etc/passwd", "a/../../b", "..\\evil.txt"] {
            assert!(
                matches!(resolve_within(root, bad), Err(ThemeStoreError::PathTraversal { .. })),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn extract_rejects_traversal_before_writing() {
        let parent = tempdir().unwrap();
        let staging = parent.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        let archive = zip_bytes(&[
            ("theme_config.json", b"{}"),
            ("../../escape.txt", b"pwned"),
        ]);

        let err = extract_archive(&archive, &staging).unwrap_err();
        assert!(matches!(err, ThemeStoreError::PathTraversal { ref entry } if entry == "../../escape.txt"));
        assert!(!staging.join("theme_config.json").exists());
        assert!(!parent.path().join("escape.txt").exists());
    }

    #[test]
    fn extract_writes_nested_files() {
        let dir = tempdir().unwrap();
        let archive = zip_bytes(&[("theme_config.json", b"{}"), ("icons/app.png", b"\x89PNG")]);
        assert_eq!(extract_archive(&archive, dir.path()).unwrap(), 2);
        assert_eq!(fs::read(dir.path().join("icons/app.png")).unwrap(), b"\x89PNG");
    }

    #[test]
    fn extract_rejects_garbage() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            extract_archive(b"not a zip", dir.path()),
            Err(ThemeStoreError::Archive(_))
        ));
    }

    #[test]
    fn manifest_missing_and_bad_format() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_manifest(dir.path()),
            Err(ThemeStoreError::InvalidPackage(InvalidPackageReason::MissingManifest(_)))
        ));
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        assert!(matches!(
            read_manifest(dir.path()),
            Err(ThemeStoreError::InvalidPackage(InvalidPackageReason::BadFormat(_)))
        ));
    }

    #[test]
    fn archive_directory_round_trips_through_extract() {
        let src = tempdir().unwrap();
        let theme = Theme::new("Neon");
        write_manifest(src.path(), &theme).unwrap();
        fs::create_dir_all(src.path().join("icons")).unwrap();
        fs::write(src.path().join("icons/app.png"), [1u8, 2, 3]).unwrap();

        let bytes = archive_directory(src.path()).unwrap();

        let dst = tempdir().unwrap();
        extract_archive(&bytes, dst.path()).unwrap();
        assert_eq!(read_manifest(dst.path()).unwrap(), theme);
        assert_eq!(fs::read(dst.path().join("icons/app.png")).unwrap(), vec![1, 2, 3]);

        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.file_names().filter(|n| *n == MANIFEST_FILE).count(), 1);
    }

    #[test]
    fn archive_directory_skips_only_manifest_scratch_file() {
        let src = tempdir().unwrap();
        write_manifest(src.path(), &Theme::new("Neon")).unwrap();
        fs::write(src.path().join(MANIFEST_TMP_FILE), "{}").unwrap();
        fs::write(src.path().join("backdrop.tmp"), [7u8]).unwrap();

        let bytes = archive_directory(src.path()).unwrap();
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<&str> = zip.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["backdrop.tmp", MANIFEST_FILE]);
    }
}
