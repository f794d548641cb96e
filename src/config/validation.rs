//! Non-fatal configuration checks.
//!
//! Warnings are reported after a successful load and never stop a run; the
//! reconcilers still apply every entry exactly as declared.
use std::collections::HashSet;

use super::Config;

/// A validation warning detected after loading the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Document section, e.g. `"symlinks"`.
    pub section: &'static str,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(section: &'static str, item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            section,
            item: item.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Check the document for suspicious but legal content.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        self.validate_symlinks(&mut warnings);
        self.validate_submodules(&mut warnings);
        check_duplicates("apt.packages", &self.apt.packages, &mut warnings);
        check_duplicates("homebrew.formulae", &self.homebrew.formulae, &mut warnings);
        check_duplicates("homebrew.casks", &self.homebrew.casks, &mut warnings);
        check_duplicates("mas.app_ids", &self.mas.app_ids, &mut warnings);

        let mut names = HashSet::new();
        for source in &self.apt.sources {
            if !names.insert(source.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "apt.sources",
                    &source.name,
                    "source name declared more than once; the last one wins",
                ));
            }
            if source.name.contains(['/', '\\']) {
                warnings.push(ValidationWarning::new(
                    "apt.sources",
                    &source.name,
                    "source name contains a path separator",
                ));
            }
        }
        warnings
    }

    fn validate_symlinks(&self, warnings: &mut Vec<ValidationWarning>) {
        let mut seen = HashSet::new();
        for (i, link) in self.symlinks.iter().enumerate() {
            let item = format!("#{}", i + 1);
            if link.source.as_os_str().is_empty() {
                warnings.push(ValidationWarning::new("symlinks", &item, "empty source"));
            }
            if link.destination.as_os_str().is_empty() {
                warnings.push(ValidationWarning::new("symlinks", &item, "empty destination"));
            } else if !seen.insert(&link.destination) {
                warnings.push(ValidationWarning::new(
                    "symlinks",
                    item,
                    format!(
                        "destination {} declared more than once; the last entry wins",
                        link.destination.display()
                    ),
                ));
            }
        }
    }

    fn validate_submodules(&self, warnings: &mut Vec<ValidationWarning>) {
        let mut seen = HashSet::new();
        for module in &self.git_submodules {
            if module.url.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    "git_submodules",
                    &module.path,
                    "no url; registration will fail unless the submodule already exists",
                ));
            }
            if !seen.insert(module.path.as_str()) {
                warnings.push(ValidationWarning::new(
                    "git_submodules",
                    &module.path,
                    "path declared more than once",
                ));
            }
        }
    }
}

fn check_duplicates(section: &'static str, names: &[String], warnings: &mut Vec<ValidationWarning>) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            warnings.push(ValidationWarning::new(section, name, "listed more than once"));
        }
    }
}
