//! Filename → extension lookup used to name temp files.

/// Resolves the extension a temp file should carry for a client filename.
pub trait MimeTypeChecker: Send + Sync {
    /// Extension without the leading dot, or `None` when unknown.
    fn extension_for(&self, filename: &str) -> Option<String>;
}

/// Aliases folded onto one canonical extension.
const ALIASES: &[(&str, &str)] = &[
    ("jpeg", "jpg"),
    ("jpe", "jpg"),
    ("htm", "html"),
    ("tiff", "tif"),
    ("yml", "yaml"),
    ("mpeg", "mpg"),
    ("markdown", "md"),
];

const MAX_EXTENSION_LEN: usize = 10;

/// Table-driven checker: lowercases the filename suffix and folds known
/// aliases. Suffixes that are not plain alphanumerics are rejected.
#[derive(Debug, Clone, Default)]
pub struct ExtensionMap {
    extra: Vec<(String, String)>,
}

impl ExtensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias on top of the built-in table.
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.extra
            .push((alias.into().to_ascii_lowercase(), canonical.into()));
        self
    }

    fn canonical(&self, suffix: &str) -> String {
        if let Some((_, canonical)) = self.extra.iter().find(|(alias, _)| alias == suffix) {
            return canonical.clone();
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == suffix)
            .map(|(_, canonical)| (*canonical).to_string())
            .unwrap_or_else(|| suffix.to_string())
    }
}

impl MimeTypeChecker for ExtensionMap {
    fn extension_for(&self, filename: &str) -> Option<String> {
        let (stem, suffix) = filename.rsplit_once('.')?;
        if stem.is_empty()
            || suffix.is_empty()
            || suffix.len() > MAX_EXTENSION_LEN
            || !suffix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return None;
        }
        Some(self.canonical(&suffix.to_ascii_lowercase()))
    }
}
