//! Connector importer

use super::ImportError;
use crate::models::ConnectorModelContent;

/// Connector Importer
///
/// Imports connector JSON content into a [`ConnectorModelContent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectorImporter;

impl ConnectorImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parse connector content
    pub fn import(&self, content: &[u8]) -> Result<ConnectorModelContent, ImportError> {
        if content.is_empty() {
            return Err(ImportError::EmptyContent);
        }
        Ok(serde_json::from_slice(content)?)
    }
}

#[cfg(test)]
mod connector_import_tests {
    use super::*;

    #[test]
    fn test_import_connector_actions() {
        let content = br#"{
            "id": "c1",
            "name": "rest-connector",
            "actions": {
                "a1": {
                    "id": "a1",
                    "name": "POST",
                    "inputs": [{ "id": "i1", "name": "url", "type": "string" }],
                    "outputs": [{ "id": "o1", "name": "status", "type": "integer" }]
                }
            }
        }"#;

        let connector = ConnectorImporter::new().import(content).unwrap();
        assert_eq!(connector.name, "rest-connector");
        let action = connector.find_action("POST").unwrap();
        assert!(action.has_input("url"));
        assert!(action.has_output("status"));
        assert!(connector.find_action("a1").is_some());
        assert!(connector.find_action("GET").is_none());
    }

    #[test]
    fn test_import_rejects_empty_and_malformed_content() {
        assert!(matches!(
            ConnectorImporter::new().import(b""),
            Err(ImportError::EmptyContent)
        ));
        assert!(matches!(
            ConnectorImporter::new().import(b"{ not json"),
            Err(ImportError::JsonError(_))
        ));
    }
}
