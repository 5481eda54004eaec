//! Entry filtering functionality
//!
//! This module provides the predicate constructors behind the fluent rule
//! methods. Every rule is compiled once into a boxed closure over [`Entry`]
//! and evaluated per candidate during traversal.

use std::fs;
use std::time::SystemTime;

use glob::{MatchOptions, Pattern};
use log::warn;
use regex::Regex;

use crate::entry::Entry;
use crate::errors::{FinderError, FinderResult};
use crate::finder::time::parse_date_value;

/// A compiled rule. All registered predicates must accept an entry for it to
/// be yielded.
pub type Predicate = Box<dyn Fn(&Entry) -> bool + Send + Sync>;

pub(crate) fn compile_glob(pattern: &str) -> FinderResult<Pattern> {
    Pattern::new(pattern).map_err(|e| FinderError::malformed(pattern, e.msg))
}

pub(crate) fn compile_regex(pattern: &str) -> FinderResult<Regex> {
    Regex::new(pattern).map_err(|e| FinderError::malformed(pattern, e.to_string()))
}

/// Basename matcher tried tier by tier: exact equality, then the pattern as
/// a glob, then the pattern as a regex.
struct NameMatcher {
    exact: String,
    fold_case: bool,
    glob: Option<Pattern>,
    regex: Option<Regex>,
}

impl NameMatcher {
    fn compile(pattern: &str, fold_case: bool) -> Self {
        let exact = if fold_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        // A pattern that does not compile never matches on its tier; the
        // other tiers still apply.
        let glob = compile_glob(pattern).ok();
        let regex = if fold_case {
            compile_regex(&format!("(?i){pattern}")).ok()
        } else {
            compile_regex(pattern).ok()
        };

        Self {
            exact,
            fold_case,
            glob,
            regex,
        }
    }

    fn matches(&self, name: &str) -> bool {
        let exact_hit = if self.fold_case {
            name.to_lowercase() == self.exact
        } else {
            name == self.exact
        };
        if exact_hit {
            return true;
        }

        let glob_options = MatchOptions {
            case_sensitive: !self.fold_case,
            ..MatchOptions::default()
        };
        if let Some(glob) = &self.glob {
            if glob.matches_with(name, glob_options) {
                return true;
            }
        }

        self.regex.as_ref().map_or(false, |r| r.is_match(name))
    }
}

/// Build a basename rule.
///
/// With `positive` set the rule keeps matching entries, otherwise it drops
/// them.
pub fn name_rule(pattern: &str, positive: bool) -> Predicate {
    let matcher = NameMatcher::compile(pattern, false);
    Box::new(move |entry| matcher.matches(entry.name()) == positive)
}

/// Case-insensitive variant of [`name_rule`].
pub fn iname_rule(pattern: &str, positive: bool) -> Predicate {
    let matcher = NameMatcher::compile(pattern, true);
    Box::new(move |entry| matcher.matches(entry.name()) == positive)
}

/// Build a content rule.
///
/// The content matches when it contains the pattern literally, or when the
/// pattern as a regex matches it. Bytes that are not valid UTF-8 are
/// replaced rather than discarded, so a file of mixed encoding still
/// matches on its readable parts. Directories and entries whose content
/// cannot be read count as empty, and empty content never matches, so with
/// `positive` cleared those entries are always kept.
pub fn contains_rule(pattern: &str, positive: bool) -> Predicate {
    let literal = pattern.to_string();
    // An invalid regex leaves the literal tier in place.
    let regex = compile_regex(pattern).ok();
    Box::new(move |entry| {
        let bytes = if entry.is_file() {
            fs::read(entry.path()).unwrap_or_default()
        } else {
            Vec::new()
        };
        let content = String::from_utf8_lossy(&bytes);
        let hit = !content.is_empty()
            && (content.contains(&literal) || regex.as_ref().map_or(false, |r| r.is_match(&content)));
        hit == positive
    })
}

/// Build a full-path rule.
///
/// The pattern is matched against the slash-normalized absolute path, first
/// as a literal substring and then as a regex. With `keep` set matching
/// entries are retained, otherwise they are dropped.
pub fn path_rule(pattern: &str, keep: bool) -> Predicate {
    let literal = pattern.to_string();
    // An invalid regex leaves the literal tier in place.
    let regex = compile_regex(pattern).ok();
    Box::new(move |entry| {
        let path = entry.normalized_path();
        let hit = path.contains(&literal) || regex.as_ref().map_or(false, |r| r.is_match(&path));
        hit == keep
    })
}

/// Build a status-change-time rule keeping entries changed at or after the
/// given instant.
///
/// An unparseable value falls back to the Unix epoch, which keeps every
/// entry rather than silently dropping them all.
pub fn date_rule(value: &str) -> Predicate {
    let cutoff = match parse_date_value(value) {
        Some(instant) => instant,
        None => {
            warn!("unparseable date '{}', falling back to the epoch", value);
            SystemTime::UNIX_EPOCH
        }
    };
    Box::new(move |entry| entry.changed() >= cutoff)
}

/// Build a size rule keeping entries of at least `min` bytes.
pub fn size_rule(min: u64) -> Predicate {
    Box::new(move |entry| entry.size() >= min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn entry_named(
        dir: &TempDir,
        name: &str,
        content: &[u8],
    ) -> Result<Entry, Box<dyn std::error::Error>> {
        let path = dir.path().join(name);
        File::create(&path)?.write_all(content)?;
        Ok(Entry::snapshot(path)?)
    }

    #[test]
    fn test_name_rule_exact() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "notes.txt", b"x")?;

        assert!(name_rule("notes.txt", true)(&entry));
        assert!(!name_rule("other.txt", true)(&entry));
        Ok(())
    }

    #[test]
    fn test_name_rule_glob() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "notes.txt", b"x")?;

        assert!(name_rule("*.txt", true)(&entry));
        assert!(!name_rule("*.rs", true)(&entry));
        Ok(())
    }

    #[test]
    fn test_name_rule_regex() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "report-2024.txt", b"x")?;

        assert!(name_rule(r"report-\d{4}", true)(&entry));
        assert!(!name_rule(r"report-\d{6}", true)(&entry));
        Ok(())
    }

    #[test]
    fn test_name_rule_negated() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "notes.txt", b"x")?;

        assert!(!name_rule("*.txt", false)(&entry));
        assert!(name_rule("*.rs", false)(&entry));
        Ok(())
    }

    #[test]
    fn test_name_rule_invalid_pattern_still_matches_exactly() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = TempDir::new()?;
        // "[" is neither a valid glob nor a valid regex, so only the exact
        // tier can fire.
        let plain = entry_named(&dir, "notes.txt", b"x")?;
        assert!(!name_rule("[", true)(&plain));

        let bracket = entry_named(&dir, "[", b"x")?;
        assert!(name_rule("[", true)(&bracket));
        Ok(())
    }

    #[test]
    fn test_iname_rule_folds_case() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "README.TXT", b"x")?;

        assert!(!name_rule("readme.txt", true)(&entry));
        assert!(iname_rule("readme.txt", true)(&entry));
        assert!(iname_rule("*.txt", true)(&entry));
        assert!(iname_rule(r"read.*\.txt", true)(&entry));
        assert!(!iname_rule("*.rs", true)(&entry));
        Ok(())
    }

    #[test]
    fn test_contains_rule_literal_and_regex() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "log.txt", b"error: disk full\n")?;

        assert!(contains_rule("disk full", true)(&entry));
        assert!(contains_rule(r"error:\s+\w+", true)(&entry));
        assert!(!contains_rule("all good", true)(&entry));
        Ok(())
    }

    #[test]
    fn test_contains_rule_ignores_directories() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = Entry::snapshot(dir.path())?;

        assert!(!contains_rule("anything", true)(&entry));
        // A directory has no content, so it survives the negated rule.
        assert!(contains_rule("anything", false)(&entry));
        Ok(())
    }

    #[test]
    fn test_contains_rule_empty_file_never_matches() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "empty.txt", b"")?;

        assert!(!contains_rule(".*", true)(&entry));
        assert!(contains_rule(".*", false)(&entry));
        Ok(())
    }

    #[test]
    fn test_contains_rule_reads_non_utf8_content() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        // Latin-1 text is not valid UTF-8, yet the ASCII part must still match.
        let entry = entry_named(&dir, "latin1.txt", b"caf\xe9 TODO list")?;

        assert!(contains_rule("TODO", true)(&entry));
        assert!(!contains_rule("TODO", false)(&entry));
        assert!(contains_rule(r"TODO\s+list", true)(&entry));
        Ok(())
    }

    #[test]
    fn test_path_rule_substring() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("src"))?;
        let path = dir.path().join("src").join("main.rs");
        File::create(&path)?.write_all(b"x")?;
        let entry = Entry::snapshot(path)?;

        assert!(path_rule("src/main", true)(&entry));
        assert!(!path_rule("src/main", false)(&entry));
        assert!(path_rule(r"src/.*\.rs$", true)(&entry));
        assert!(!path_rule("tests/", true)(&entry));
        Ok(())
    }

    #[test]
    fn test_date_rule_keeps_recent_entries() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "fresh.txt", b"x")?;

        assert!(date_rule("1h")(&entry));
        assert!(!date_rule("2999-01-01T00:00:00Z")(&entry));
        // Malformed values fall back to the epoch and keep everything.
        assert!(date_rule("whenever")(&entry));
        // A relative age too large to express degrades the same way.
        assert!(date_rule("213503982334602d")(&entry));
        Ok(())
    }

    #[test]
    fn test_size_rule() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let entry = entry_named(&dir, "five.txt", b"12345")?;

        assert!(size_rule(0)(&entry));
        assert!(size_rule(5)(&entry));
        assert!(!size_rule(6)(&entry));
        Ok(())
    }
}
