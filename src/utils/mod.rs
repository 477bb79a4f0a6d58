//! Utilities for path collection, size formatting, and lopdf object copying.

use crate::{Result, error::PdfStitchError};
use lopdf::{Document, Object};
use std::path::PathBuf;

/// Bytes per megabyte used for every size shown to the user.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// A pattern without glob metacharacters that matches nothing is passed
/// through unchanged, so a missing file surfaces later as "file not found"
/// instead of silently disappearing.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let pattern = pattern.as_ref();
        let paths = collect_paths_for_pattern(pattern)?;

        if paths.is_empty() && !is_glob(pattern) {
            resolved_paths.push(PathBuf::from(pattern));
        } else {
            resolved_paths.extend(paths);
        }
    }

    Ok(resolved_paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand a single glob pattern into filesystem paths, sorted by glob.
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| PdfStitchError::Other {
        message: format!("Invalid pattern '{pattern}': {err}"),
    })?;

    for entry in paths {
        let path = entry.map_err(|err| PdfStitchError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Convert bytes to megabytes, rounded to one decimal place.
pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    let mb = bytes as f64 / BYTES_PER_MB as f64;
    (mb * 10.0).round() / 10.0
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const GB: u64 = BYTES_PER_MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= BYTES_PER_MB {
        format!("{:.2} MB", size as f64 / BYTES_PER_MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

/// Copy object references from one PDF document to another.
///
/// If `obj` is a reference, this walks the structure recursively and inserts
/// missing referenced objects into the `target` document. Both documents
/// must already use disjoint object ids.
///
/// `/Parent` entries are not followed: they point back up a page tree,
/// and following them would drag the whole source tree along with a
/// single page.
pub fn copy_references(target: &mut Document, source: &Document, obj: &Object) {
    match obj {
        Object::Reference(ref_id) => {
            if !target.objects.contains_key(ref_id)
                && let Ok(referenced_obj) = source.get_object(*ref_id)
            {
                target.objects.insert(*ref_id, referenced_obj.clone());
                copy_references(target, source, referenced_obj);
            }
        }
        Object::Dictionary(dict) => {
            for (key, value) in dict.iter() {
                if key.as_slice() != b"Parent" {
                    copy_references(target, source, value);
                }
            }
        }
        Object::Array(arr) => {
            for item in arr {
                copy_references(target, source, item);
            }
        }
        Object::Stream(stream) => {
            for (key, value) in stream.dict.iter() {
                if key.as_slice() != b"Parent" {
                    copy_references(target, source, value);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.0)]
    #[case(52_428, 0.0)]
    #[case(52_429 * 2, 0.1)]
    #[case(1_048_576, 1.0)]
    #[case(1_572_864, 1.5)]
    #[case(10 * 1_048_576 + 943_718, 10.9)]
    fn test_bytes_to_megabytes(#[case] bytes: u64, #[case] expected: f64) {
        assert_eq!(bytes_to_megabytes(bytes), expected);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn test_collect_paths_expands_globs_in_order() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["b.pdf", "a.pdf", "c.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let pattern = format!("{}/*.pdf", dir.path().display());
        let paths = collect_paths_for_patterns([pattern]).unwrap();

        assert_eq!(
            paths,
            vec![dir.path().join("a.pdf"), dir.path().join("b.pdf")]
        );
    }

    #[test]
    fn test_collect_paths_keeps_literal_missing_path() {
        let paths = collect_paths_for_patterns(["/nonexistent/file.pdf"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/nonexistent/file.pdf")]);
    }

    #[test]
    fn test_collect_paths_drops_unmatched_glob() {
        let paths = collect_paths_for_patterns(["/nonexistent/*.pdf"]).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_collect_paths_invalid_pattern() {
        assert!(collect_paths_for_patterns(["[unclosed"]).is_err());
    }

    #[test]
    fn test_copy_references_skips_parent() {
        let mut source = Document::with_version("1.5");
        let tree_id = source.add_object(dictionary! { "Type" => "Pages" });
        let font_id = source.add_object(dictionary! { "Type" => "Font" });
        let resources_id = source.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let page = Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => tree_id,
            "Resources" => resources_id,
        });

        let mut target = Document::with_version("1.5");
        copy_references(&mut target, &source, &page);

        assert!(target.objects.contains_key(&resources_id));
        assert!(target.objects.contains_key(&font_id));
        assert!(!target.objects.contains_key(&tree_id));
    }
}
