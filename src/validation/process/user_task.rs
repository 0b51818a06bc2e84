//! User task assignment

use super::BpmnModelValidator;
use crate::models::{BpmnDocument, FlowNode, FlowNodeKind};
use crate::validation::{ValidationContext, ValidationError};

/// Checks the assignment attributes of user tasks.
///
/// Expressions (`${...}` or `#{...}`) in `assignee`, `candidateUsers` and
/// `candidateGroups` must be closed, non-empty and not nested. When
/// `require_assignee` is set, a user task without any of these attributes is
/// reported as well.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserTaskAssigneeValidator {
    require_assignee: bool,
}

impl UserTaskAssigneeValidator {
    pub fn new(require_assignee: bool) -> Self {
        Self { require_assignee }
    }

    fn check_task(&self, task: &FlowNode, errors: &mut Vec<ValidationError>) {
        let attributes = [
            ("assignee", task.assignee.as_deref()),
            ("candidateUsers", task.candidate_users.as_deref()),
            ("candidateGroups", task.candidate_groups.as_deref()),
        ];

        let mut assigned = false;
        for (attribute, value) in attributes {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            assigned = true;
            if !is_well_formed(value) {
                errors.push(ValidationError::new(
                    "Invalid assignee expression",
                    format!(
                        "The {} expression '{}' on user task '{}' is not well formed",
                        attribute,
                        value,
                        task.label()
                    ),
                ));
            }
        }

        if self.require_assignee && !assigned {
            errors.push(ValidationError::new(
                "No assignee for user task",
                format!(
                    "One of the attributes 'assignee','candidateUsers' or 'candidateGroups' are mandatory on user task '{}'",
                    task.label()
                ),
            ));
        }
    }
}

impl BpmnModelValidator for UserTaskAssigneeValidator {
    fn name(&self) -> &'static str {
        "user-task"
    }

    fn validate(
        &self,
        document: &BpmnDocument,
        _context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for process in &document.processes {
            for task in process.flow_nodes_of_kind(FlowNodeKind::UserTask) {
                self.check_task(task, &mut errors);
            }
        }
        errors
    }
}

/// Every `${` or `#{` opens an expression that is closed before the next one
/// opens and holds something other than whitespace.
fn is_well_formed(value: &str) -> bool {
    let mut rest = value;
    loop {
        let start = match (rest.find("${"), rest.find("#{")) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => return !rest.contains('}'),
        };
        let body = &rest[start + 2..];
        let Some(end) = body.find('}') else {
            return false;
        };
        let inner = &body[..end];
        if inner.trim().is_empty() || inner.contains('{') {
            return false;
        }
        rest = &body[end + 1..];
    }
}

#[cfg(test)]
mod user_task_tests {
    use super::*;
    use crate::import::BpmnImporter;
    use crate::validation::process::test_support::{definitions, simple_process};

    fn run(task_attributes: &str, require: bool) -> Vec<ValidationError> {
        let xml = definitions(&format!(
            r#"<bpmn2:process id="p"><bpmn2:userTask id="t" name="Review" {} /></bpmn2:process>"#,
            task_attributes
        ));
        let document = BpmnImporter::new().import_str(&xml).unwrap();
        UserTaskAssigneeValidator::new(require).validate(&document, &ValidationContext::empty())
    }

    #[test]
    fn test_expression_shapes() {
        assert!(is_well_formed("${initiator}"));
        assert!(is_well_formed("#{user.manager}"));
        assert!(is_well_formed("alice"));
        assert!(is_well_formed("${a},${b}"));
        assert!(!is_well_formed("${initiator"));
        assert!(!is_well_formed("${}"));
        assert!(!is_well_formed("${a${b}}"));
        assert!(!is_well_formed("alice}"));
    }

    #[test]
    fn test_valid_assignee_passes() {
        let document = BpmnImporter::new().import_str(&simple_process()).unwrap();
        let errors = UserTaskAssigneeValidator::new(true).validate(&document, &ValidationContext::empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_broken_expression() {
        let errors = run(r#"activiti:assignee="${initiator""#, false);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].problem(), "Invalid assignee expression");
    }

    #[test]
    fn test_missing_assignee_only_when_required() {
        assert!(run("", false).is_empty());

        let errors = run("", true);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].description(),
            "One of the attributes 'assignee','candidateUsers' or 'candidateGroups' are mandatory on user task 'Review'"
        );
    }

    #[test]
    fn test_candidate_groups_satisfy_requirement() {
        assert!(run(r#"activiti:candidateGroups="reviewers""#, true).is_empty());
    }
}
