//! Find/replace edits on project files

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use regex::{NoExpand, Regex};
use tracing::debug;

use crate::update::UpdateError;

/// One find/replace rule for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Regular expression to look for
    pub find: String,
    /// Literal replacement text
    pub replace: String,
    /// Maximum number of matches to replace; 0 replaces all
    pub limit: usize,
}

impl Substitution {
    pub fn all(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            limit: 0,
        }
    }

    pub fn first(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            limit: 1,
        }
    }

    /// Apply the rule to `content`; `None` when nothing changed
    pub fn apply_to(&self, content: &str) -> Result<Option<String>, UpdateError> {
        let regex = Regex::new(&self.find).map_err(|source| UpdateError::InvalidPattern {
            pattern: self.find.clone(),
            source,
        })?;

        let replaced = regex.replacen(content, self.limit, NoExpand(self.replace.as_str()));
        if replaced == content {
            return Ok(None);
        }
        Ok(Some(replaced.into_owned()))
    }
}

/// Applies a [`Substitution`] to a file in place
#[cfg_attr(test, automock)]
pub trait TextSubstitution {
    /// Returns whether the file content changed
    fn apply(&self, path: &Path, substitution: &Substitution) -> Result<bool, UpdateError>;
}

/// [`TextSubstitution`] backed by the `regex` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexSubstitution;

impl TextSubstitution for RegexSubstitution {
    fn apply(&self, path: &Path, substitution: &Substitution) -> Result<bool, UpdateError> {
        let content = fs::read_to_string(path).map_err(|source| io_error(path, source))?;

        let Some(updated) = substitution.apply_to(&content)? else {
            debug!("{:?}: no match for {}", path, substitution.find);
            return Ok(false);
        };

        fs::write(path, updated).map_err(|source| io_error(path, source))?;
        Ok(true)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> UpdateError {
    UpdateError::Io {
        path: PathBuf::from(path),
        source,
    }
}
