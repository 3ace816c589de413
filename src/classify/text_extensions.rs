use std::collections::HashSet;

use snafu::{Snafu, ensure};
use tracing::debug;

/// Extensions whose files are always treated as text, whatever their MIME
/// type says.
///
/// Registration is additive. Entries are stored lower-cased with a leading
/// dot, so `txt` and `.TXT` are the same extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextExtensions {
    extensions: HashSet<String>,
}

impl TextExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, ext: &str) -> Result<(), RegistryError> {
        let normalized = normalize(ext)?;
        debug!("Registering text extension {}", normalized);
        self.extensions.insert(normalized);
        Ok(())
    }

    /// An empty extension is never registered, so it is never text.
    pub fn is_text_extension(&self, ext: &str) -> bool {
        normalize(ext).is_ok_and(|normalized| self.extensions.contains(&normalized))
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl<S: AsRef<str>> TryFrom<&[S]> for TextExtensions {
    type Error = RegistryError;

    fn try_from(extensions: &[S]) -> Result<Self, Self::Error> {
        let mut registry = Self::new();
        for ext in extensions {
            registry.register(ext.as_ref())?;
        }
        Ok(registry)
    }
}

fn normalize(ext: &str) -> Result<String, RegistryError> {
    ensure!(!ext.is_empty(), EmptyExtensionSnafu);

    let dotted = if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    };

    Ok(dotted.to_lowercase())
}

#[derive(Debug, Snafu)]
pub enum RegistryError {
    #[snafu(display("Expected a non empty extension"))]
    EmptyExtensionError,
}
