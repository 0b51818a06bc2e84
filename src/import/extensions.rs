//! Extensions importer

use super::ImportError;
use crate::models::ExtensionsModel;

/// Extensions Importer
///
/// Imports an extensions JSON file into an [`ExtensionsModel`]. The nested
/// extensions are kept raw so that per-process conversion can happen later.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionsImporter;

impl ExtensionsImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse extensions content
    pub fn import(&self, content: &[u8]) -> Result<ExtensionsModel, ImportError> {
        if content.is_empty() {
            return Err(ImportError::EmptyContent);
        }
        Ok(serde_json::from_slice(content)?)
    }
}

#[cfg(test)]
mod extensions_import_tests {
    use super::*;

    #[test]
    fn test_import_keeps_unknown_keys_raw() {
        let model = ExtensionsImporter::new()
            .import(br#"{"id":"process-p1","extensions":{"templates":{"a":1}}}"#)
            .unwrap();
        assert_eq!(model.id(), "process-p1");
        assert!(model.extensions.contains_key("templates"));
    }

    #[test]
    fn test_import_rejects_non_object_extensions() {
        let result = ExtensionsImporter::new().import(br#"{"id":"process-p1","extensions":[1]}"#);
        assert!(matches!(result, Err(ImportError::JsonError(_))));
    }
}
