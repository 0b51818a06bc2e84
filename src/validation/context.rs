//! Validation context
//!
//! The models that are visible while one piece of content is validated, e.g.
//! the other models of the same project. The context borrows the models; it
//! never owns or changes them.

use crate::models::Model;

/// Read-only view over the models available during one validation
#[derive(Debug, Clone, Default)]
pub struct ValidationContext<'a> {
    models: Vec<&'a Model>,
}

impl<'a> ValidationContext<'a> {
    /// A context without any models
    pub fn empty() -> Self {
        Self::default()
    }

    /// A context over the given models
    pub fn new<I>(models: I) -> Self
    where
        I: IntoIterator<Item = &'a Model>,
    {
        Self {
            models: models.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Models of the given type (case-insensitive), in context order
    pub fn available_models<'s>(&'s self, model_type: &'s str) -> impl Iterator<Item = &'a Model> + 's {
        self.models
            .iter()
            .copied()
            .filter(move |model| model.is_of_type(model_type))
    }

    /// First model of the given type with the given id
    pub fn find_model(&self, model_type: &str, id: &str) -> Option<&'a Model> {
        self.available_models(model_type).find(|model| model.id == id)
    }
}

#[cfg(test)]
mod context_tests {
    use super::*;

    #[test]
    fn test_available_models_filters_by_type() {
        let process = Model::new("p1", "PROCESS", b"<definitions/>".to_vec());
        let connector = Model::new("c1", "CONNECTOR", b"{}".to_vec());
        let context = ValidationContext::new([&process, &connector]);

        assert!(!context.is_empty());
        assert_eq!(context.len(), 2);
        let ids: Vec<&str> = context.available_models("process").map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["p1"]);
        assert!(context.find_model("CONNECTOR", "c1").is_some());
        assert!(context.find_model("CONNECTOR", "p1").is_none());
    }

    #[test]
    fn test_empty_context() {
        let context = ValidationContext::empty();
        assert!(context.is_empty());
        assert_eq!(context.available_models("PROCESS").count(), 0);
    }
}
