//! Sequence flow arity of flow nodes
//!
//! Builds the sequence flow graph of each process and checks the number of
//! incoming and outgoing flows per node:
//! - start events: no incoming, at least one outgoing
//! - end events: at least one incoming, no outgoing
//! - everything else: at least one of each
//!
//! Boundary events and event sub-processes are started by events rather than
//! flows and are not checked.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use petgraph::{Directed, Direction, Graph};

use super::BpmnModelValidator;
use crate::models::{BpmnDocument, FlowNode, FlowNodeKind, Process};
use crate::validation::{ValidationContext, ValidationError};

#[derive(Debug, Default, Clone, Copy)]
pub struct FlowArityValidator;

impl BpmnModelValidator for FlowArityValidator {
    fn name(&self) -> &'static str {
        "flows"
    }

    fn validate(
        &self,
        document: &BpmnDocument,
        _context: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        document.processes.iter().flat_map(check_process).collect()
    }
}

fn check_process(process: &Process) -> Vec<ValidationError> {
    let mut graph = Graph::<usize, usize, Directed>::new();
    let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
    let mut indices = Vec::with_capacity(process.flow_nodes.len());

    for (position, node) in process.flow_nodes.iter().enumerate() {
        let index = graph.add_node(position);
        indices.push(index);
        if let Some(id) = node.id.as_deref() {
            node_map.entry(id).or_insert(index);
        }
    }

    for (position, flow) in process.sequence_flows.iter().enumerate() {
        let source = flow.source_ref.as_deref().and_then(|id| node_map.get(id));
        let target = flow.target_ref.as_deref().and_then(|id| node_map.get(id));
        if let (Some(&source), Some(&target)) = (source, target) {
            graph.add_edge(source, target, position);
        }
    }

    let event_sub_processes: Vec<&str> = process
        .flow_nodes
        .iter()
        .filter(|n| n.kind == FlowNodeKind::SubProcess && n.triggered_by_event)
        .map(FlowNode::id)
        .collect();

    let mut errors = Vec::new();
    for (node, &index) in process.flow_nodes.iter().zip(&indices) {
        if node.kind == FlowNodeKind::BoundaryEvent
            || (node.kind == FlowNodeKind::SubProcess && node.triggered_by_event)
        {
            continue;
        }

        let incoming = graph.edges_directed(index, Direction::Incoming).count();
        let outgoing = graph.edges_directed(index, Direction::Outgoing).count();
        let in_event_sub_process = node
            .parent
            .as_deref()
            .is_some_and(|parent| event_sub_processes.contains(&parent));

        match node.kind {
            FlowNodeKind::StartEvent => {
                if incoming > 0 {
                    errors.push(flow_error(
                        "Start event has incoming flow",
                        format!("Start event [{}] cannot have incoming sequence flows", node.label()),
                    ));
                }
                if outgoing == 0 {
                    errors.push(no_outgoing(node));
                }
            }
            FlowNodeKind::EndEvent => {
                if incoming == 0 {
                    errors.push(no_incoming(node));
                }
                if outgoing > 0 {
                    errors.push(flow_error(
                        "End event has outgoing flow",
                        format!("End event [{}] cannot have outgoing sequence flows", node.label()),
                    ));
                }
            }
            _ => {
                if incoming == 0 && !in_event_sub_process {
                    errors.push(no_incoming(node));
                }
                if outgoing == 0 {
                    errors.push(no_outgoing(node));
                }
            }
        }
    }

    errors
}

fn flow_error(problem: &str, description: String) -> ValidationError {
    ValidationError::new(problem, description)
}

fn no_incoming(node: &FlowNode) -> ValidationError {
    flow_error(
        "Flow node has no incoming flow",
        format!("Flow node [{}] has to have an incoming flow", node.label()),
    )
}

fn no_outgoing(node: &FlowNode) -> ValidationError {
    flow_error(
        "Flow node has no outgoing flow",
        format!("Flow node [{}] has to have an outgoing flow", node.label()),
    )
}
