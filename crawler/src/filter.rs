//! Include/exclude scope filter.
//!
//! Patterns are compiled once at `start`. `accept` implements exclude-wins:
//! an exclude match always rejects, an include match (absent an exclude
//! match) always accepts, and when nothing matches, the presence of any
//! include pattern flips the filter from open to allowlist-only.

use regex::Regex;

use crate::error::{CrawlError, Result};

pub struct Filter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl Filter {
    pub fn compile(include: &[String], exclude: &[String]) -> Result<Filter> {
        Ok(Filter {
            include: compile_patterns("include", include)?,
            exclude: compile_patterns("exclude", exclude)?,
        })
    }

    pub fn accept(&self, url: &str) -> bool {
        if self.exclude.iter().any(|r| r.is_match(url)) {
            return false;
        }
        if self.include.iter().any(|r| r.is_match(url)) {
            return true;
        }
        self.include.is_empty()
    }
}

fn compile_patterns(which: &'static str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| CrawlError::InvalidPattern {
                which,
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclude_wins_over_include() {
        let f = Filter::compile(
            &["/keep/".to_string()],
            &["/keep/skip/".to_string()],
        )
        .unwrap();
        assert!(!f.accept("https://example.com/keep/skip/x"));
    }

    #[test]
    fn include_match_accepts() {
        let f = Filter::compile(&["/keep/".to_string()], &[]).unwrap();
        assert!(f.accept("https://example.com/keep/a"));
        assert!(!f.accept("https://example.com/other"));
    }

    #[test]
    fn empty_include_accepts_everything_not_excluded() {
        let f = Filter::compile(&[], &["/skip/".to_string()]).unwrap();
        assert!(f.accept("https://example.com/anything"));
        assert!(!f.accept("https://example.com/skip/x"));
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let err = Filter::compile(&["(".to_string()], &[]).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidPattern { .. }));
    }
}
