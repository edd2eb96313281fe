//! Relative import path resolution
//!
//! Computes the relative path a generated import statement should use to
//! reach a matched source file from the output file's directory. Only two
//! layouts are supported: same directory (`./name`) and upward traversal
//! (`../x/name`). A source file that sits strictly *below* the output's
//! directory cannot be expressed this way and is rejected with
//! [`GenError::Path`].
//!
//! Rendered paths always use forward slashes, since they end up inside
//! source-code import literals.

use std::path::{Component, Path};

use crate::error::{GenError, GenResult};

/// Compute the relative import path from `out_file`'s directory to `file`.
///
/// Both paths must share a base: either both relative to the same working
/// directory, or both absolute.
pub fn relative_import_path(file: &Path, out_file: &Path) -> GenResult<String> {
    let file_dir = file.parent().unwrap_or_else(|| Path::new(""));
    let out_dir = out_file.parent().unwrap_or_else(|| Path::new(""));

    let name = file
        .file_name()
        .ok_or_else(|| GenError::Path {
            file: file.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
        })?
        .to_string_lossy()
        .into_owned();

    // An absolute path has no expressible relation to a relative one.
    if file.is_absolute() != out_file.is_absolute() {
        return Err(GenError::Path {
            file: file.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
        });
    }

    let relative = relative_dir(out_dir, file_dir);

    if relative.is_empty() {
        return Ok(format!("./{name}"));
    }

    if relative.starts_with("..") {
        return Ok(format!("{relative}/{name}"));
    }

    Err(GenError::Path {
        file: file.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
    })
}

/// Relative walk from directory `from` to directory `to`, forward-slash
/// joined. Empty string when the directories are identical.
fn relative_dir(from: &Path, to: &Path) -> String {
    // `components()` keeps a leading `./`, which would defeat the common
    // prefix walk when only one side carries it.
    let from: Vec<Component> = from
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component> = to
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for comp in &to[common..] {
        parts.push(comp.as_os_str().to_string_lossy().into_owned());
    }

    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_directory_uses_dot_slash() {
        let rel = relative_import_path(
            Path::new("tests/testFiles/test.ts"),
            Path::new("tests/testFiles/out.ts"),
        )
        .unwrap();
        assert_eq!(rel, "./test.ts");
    }

    #[test]
    fn sibling_directory_goes_up_then_down() {
        let rel = relative_import_path(
            Path::new("./tests/results/test.ts"),
            Path::new("./tests/testFiles/out.ts"),
        )
        .unwrap();
        assert_eq!(rel, "../results/test.ts");
    }

    #[test]
    fn parent_directory_is_plain_dot_dot() {
        let rel = relative_import_path(Path::new("src/a.ts"), Path::new("src/gen/out.ts")).unwrap();
        assert_eq!(rel, "../a.ts");
    }

    #[test]
    fn leading_dot_is_ignored() {
        // "./x" and "x" refer to the same place
        let rel = relative_import_path(
            Path::new("./tests/testFiles/test.ts"),
            Path::new("tests/testFiles/out.ts"),
        )
        .unwrap();
        assert_eq!(rel, "./test.ts");
    }

    #[test]
    fn mixed_dot_prefix_still_finds_common_ancestor() {
        // one side prefixed, the other bare, across sibling directories
        let rel = relative_import_path(
            Path::new("tests/results/test.ts"),
            Path::new("./tests/testFiles/out.ts"),
        )
        .unwrap();
        assert_eq!(rel, "../results/test.ts");
    }

    #[test]
    fn mixing_absolute_and_relative_is_rejected() {
        let err = relative_import_path(
            Path::new("/project/src/a.ts"),
            Path::new("src/out.ts"),
        )
        .unwrap_err();
        assert!(matches!(err, GenError::Path { .. }));
    }

    #[test]
    fn file_below_output_directory_is_rejected() {
        let err =
            relative_import_path(Path::new("src/deep/a.ts"), Path::new("src/out.ts")).unwrap_err();
        assert!(matches!(err, GenError::Path { .. }));
    }

    #[test]
    fn bare_filenames_resolve_to_same_directory() {
        let rel = relative_import_path(Path::new("test.ts"), Path::new("out.ts")).unwrap();
        assert_eq!(rel, "./test.ts");
    }

    #[test]
    fn absolute_paths_resolve() {
        let rel = relative_import_path(
            Path::new("/project/src/a.scss"),
            Path::new("/project/src/main.scss"),
        )
        .unwrap();
        assert_eq!(rel, "./a.scss");
    }

    #[test]
    fn relative_dir_empty_for_identical() {
        assert_eq!(relative_dir(Path::new("a/b"), Path::new("a/b")), "");
    }

    #[test]
    fn relative_dir_uses_forward_slashes() {
        assert_eq!(
            relative_dir(Path::new("a/b/c"), Path::new("a/x/y")),
            "../../x/y"
        );
    }
}
