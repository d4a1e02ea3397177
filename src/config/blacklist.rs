//! URL blacklist matching
//!
//! An ordered list of glob patterns (`*` wildcard, anchored full-string
//! match) that globally disables all detectors for a matching document
//! URL. Patterns are user data: an entry that fails to compile is
//! skipped with a warning instead of failing the whole list.

use regex::Regex;
use tracing::warn;

/// Compiled, ordered URL blacklist
#[derive(Debug, Clone, Default)]
pub struct UrlBlacklist {
    patterns: Vec<Regex>,
}

impl UrlBlacklist {
    /// Compile a list of glob patterns in order
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Self {
        let patterns = globs
            .iter()
            .filter_map(|glob| {
                let glob = glob.as_ref();
                match compile_glob(glob) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        warn!(pattern = glob, error = %e, "skipping unparsable blacklist pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Check whether `url` matches any pattern, in list order
    pub fn is_blacklisted(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(url))
    }

    /// Number of successfully compiled patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Compile one glob pattern to an anchored regex.
///
/// `*` matches any run of characters (including none); every other
/// character matches literally.
fn compile_glob(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push('^');
    for ch in glob.chars() {
        if ch == '*' {
            pattern.push_str(".*");
        } else {
            pattern.push_str(&regex::escape(&ch.to_string()));
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}
