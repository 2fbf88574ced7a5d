//! Search-path style directory lists
//!
//! A path spec is a list of directories separated by `:` (`;` on Windows).
//! Each entry may use `~` and `$VAR` / `${VAR}`; an entry containing `//`
//! stands for the directory before the marker and every directory below it.

use std::env;
use std::path::PathBuf;
use walkdir::WalkDir;

#[cfg(windows)]
const SEPARATOR: char = ';';
#[cfg(not(windows))]
const SEPARATOR: char = ':';

const RECURSIVE_MARKER: &str = "//";

/// Expand a path spec into the directories it names
///
/// Entries that do not name an existing directory are skipped with a warning.
pub fn parse_path_spec(spec: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    for entry in spec.split(SEPARATOR).filter(|e| !e.is_empty()) {
        let expanded = expand_path(entry);
        let expanded = expanded.to_string_lossy();

        if let Some((base, _)) = expanded.split_once(RECURSIVE_MARKER) {
            let base = if base.is_empty() { "/" } else { base };
            let base = PathBuf::from(base);
            if !base.is_dir() {
                log::warn!("path spec entry '{}' is not a directory, skipping", entry);
                continue;
            }
            dirs.push(base.clone());
            dirs.extend(subdirectories(&base));
        } else {
            let dir = PathBuf::from(expanded.as_ref());
            if dir.is_dir() {
                dirs.push(dir);
            } else {
                log::warn!("path spec entry '{}' is not a directory, skipping", entry);
            }
        }
    }

    dirs
}

/// Every directory below `base`, in sorted walk order, skipping hidden ones
fn subdirectories(base: &std::path::Path) -> Vec<PathBuf> {
    WalkDir::new(base)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping unreadable entry under {}: {}", base.display(), err);
                None
            }
        })
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

/// Expand a leading `~` and any `$VAR` / `${VAR}` references
///
/// Unknown variables are left untouched.
pub fn expand_path(raw: &str) -> PathBuf {
    let vars = expand_vars(raw);

    if vars == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = vars.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    PathBuf::from(vars)
}

fn expand_vars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), env::var(name)) {
            (false, Ok(value)) => out.push_str(&value),
            _ => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_vars_leaves_unknown_variables() {
        assert_eq!(
            expand_vars("/a/$LATEXD_SURELY_UNSET_VAR/b"),
            "/a/$LATEXD_SURELY_UNSET_VAR/b"
        );
        assert_eq!(expand_vars("/a/${LATEXD_SURELY_UNSET_VAR}"), "/a/${LATEXD_SURELY_UNSET_VAR}");
        assert_eq!(expand_vars("cost$"), "cost$");
        assert_eq!(expand_vars("${unterminated"), "${unterminated");
    }

    #[test]
    fn test_expand_vars_substitutes_known_variable() {
        // PATH is set in every test environment
        let path = env::var("PATH").unwrap();
        assert_eq!(expand_vars("$PATH/x"), format!("{path}/x"));
        assert_eq!(expand_vars("${PATH}x"), format!("{path}x"));
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/texmf"), home.join("texmf"));
            assert_eq!(expand_path("~"), home);
        }
        assert_eq!(expand_path("a~b"), PathBuf::from("a~b"));
    }

    #[test]
    #[cfg(not(windows))]
    fn test_parse_skips_missing_and_empty_entries() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        fs::create_dir(&a).unwrap();

        let spec = format!("{}::{}:", a.display(), temp.path().join("missing").display());
        assert_eq!(parse_path_spec(&spec), vec![a]);
    }

    #[test]
    #[cfg(not(windows))]
    fn test_parse_recursive_marker_walks_subdirectories() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("tex");
        fs::create_dir_all(base.join("b/inner")).unwrap();
        fs::create_dir_all(base.join("a")).unwrap();
        fs::create_dir_all(base.join(".git/objects")).unwrap();
        fs::write(base.join("file.sty"), "").unwrap();

        let dirs = parse_path_spec(&format!("{}//", base.display()));
        assert_eq!(
            dirs,
            vec![
                base.clone(),
                base.join("a"),
                base.join("b"),
                base.join("b/inner"),
            ]
        );
    }
}
