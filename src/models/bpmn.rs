//! BPMN process document model
//!
//! A reduced view of a BPMN 2.0 `definitions` document holding what the
//! structural and extensions validators look at. Sub-process contents are
//! flattened into their process; `parent` keeps the enclosing sub-process.

use serde::{Deserialize, Serialize};

/// A parsed BPMN `definitions` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BpmnDocument {
    pub id: Option<String>,
    pub target_namespace: Option<String>,
    pub processes: Vec<Process>,
    pub messages: Vec<Message>,
    /// Every semantic element id in document order, diagram interchange excluded
    pub element_ids: Vec<String>,
}

impl BpmnDocument {
    /// The main process: the first one declared
    pub fn main_process(&self) -> Option<&Process> {
        self.processes.first()
    }

    pub fn has_message(&self, id: &str) -> bool {
        self.messages.iter().any(|m| m.id.as_deref() == Some(id))
    }
}

/// A `message` declared at definitions level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A `process` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: Option<String>,
    pub name: Option<String>,
    pub is_executable: bool,
    pub flow_nodes: Vec<FlowNode>,
    pub sequence_flows: Vec<SequenceFlow>,
}

impl Default for Process {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            is_executable: true,
            flow_nodes: Vec::new(),
            sequence_flows: Vec::new(),
        }
    }
}

impl Process {
    /// Process id, or an empty string
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn find_flow_node(&self, id: &str) -> Option<&FlowNode> {
        self.flow_nodes.iter().find(|n| n.id.as_deref() == Some(id))
    }

    pub fn flow_nodes_of_kind(&self, kind: FlowNodeKind) -> impl Iterator<Item = &FlowNode> {
        self.flow_nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Sequence flows leaving the given node
    pub fn outgoing_flows<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a SequenceFlow> {
        self.sequence_flows
            .iter()
            .filter(move |f| f.source_ref.as_deref() == Some(node_id))
    }
}

/// Kind of a flow node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowNodeKind {
    StartEvent,
    EndEvent,
    IntermediateCatchEvent,
    IntermediateThrowEvent,
    BoundaryEvent,
    UserTask,
    ServiceTask,
    ScriptTask,
    /// `task`, `manualTask`, `receiveTask`, `sendTask`, `businessRuleTask`
    Task,
    CallActivity,
    SubProcess,
    ExclusiveGateway,
    ParallelGateway,
    InclusiveGateway,
    EventBasedGateway,
    ComplexGateway,
}

impl FlowNodeKind {
    /// Map a BPMN element local name to a flow node kind
    pub fn from_element_name(name: &str) -> Option<Self> {
        let kind = match name {
            "startEvent" => FlowNodeKind::StartEvent,
            "endEvent" => FlowNodeKind::EndEvent,
            "intermediateCatchEvent" => FlowNodeKind::IntermediateCatchEvent,
            "intermediateThrowEvent" => FlowNodeKind::IntermediateThrowEvent,
            "boundaryEvent" => FlowNodeKind::BoundaryEvent,
            "userTask" => FlowNodeKind::UserTask,
            "serviceTask" => FlowNodeKind::ServiceTask,
            "scriptTask" => FlowNodeKind::ScriptTask,
            "task" | "manualTask" | "receiveTask" | "sendTask" | "businessRuleTask" => {
                FlowNodeKind::Task
            }
            "callActivity" => FlowNodeKind::CallActivity,
            "subProcess" | "transaction" | "adHocSubProcess" => FlowNodeKind::SubProcess,
            "exclusiveGateway" => FlowNodeKind::ExclusiveGateway,
            "parallelGateway" => FlowNodeKind::ParallelGateway,
            "inclusiveGateway" => FlowNodeKind::InclusiveGateway,
            "eventBasedGateway" => FlowNodeKind::EventBasedGateway,
            "complexGateway" => FlowNodeKind::ComplexGateway,
            _ => return None,
        };
        Some(kind)
    }

    /// Events that wait for a trigger
    pub fn is_catching_event(&self) -> bool {
        matches!(
            self,
            FlowNodeKind::StartEvent
                | FlowNodeKind::IntermediateCatchEvent
                | FlowNodeKind::BoundaryEvent
        )
    }

    /// Events that emit a trigger
    pub fn is_throwing_event(&self) -> bool {
        matches!(
            self,
            FlowNodeKind::IntermediateThrowEvent | FlowNodeKind::EndEvent
        )
    }
}

/// Event definition carried by an event flow node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDefinition {
    Message { message_ref: Option<String> },
    Signal { signal_ref: Option<String> },
    Error { error_ref: Option<String> },
    Timer,
    Terminate,
    Other(String),
}

impl EventDefinition {
    pub fn is_message(&self) -> bool {
        matches!(self, EventDefinition::Message { .. })
    }
}

/// A flow node with the attributes the validators use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: FlowNodeKind,
    /// Enclosing sub-process id
    pub parent: Option<String>,
    /// Service task `implementation`
    pub implementation: Option<String>,
    /// Call activity `calledElement`
    pub called_element: Option<String>,
    /// User task `assignee`
    pub assignee: Option<String>,
    pub candidate_users: Option<String>,
    pub candidate_groups: Option<String>,
    /// Gateway `default` sequence flow
    pub default_flow: Option<String>,
    /// Boundary event `attachedToRef`
    pub attached_to: Option<String>,
    /// Sub-process `triggeredByEvent`
    pub triggered_by_event: bool,
    pub event_definitions: Vec<EventDefinition>,
}

impl FlowNode {
    /// Create a flow node with only an id and a kind
    pub fn new(id: impl Into<String>, kind: FlowNodeKind) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
            kind,
            parent: None,
            implementation: None,
            called_element: None,
            assignee: None,
            candidate_users: None,
            candidate_groups: None,
            default_flow: None,
            attached_to: None,
            triggered_by_event: false,
            event_definitions: Vec::new(),
        }
    }

    /// Id, or an empty string
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Label used in messages: the name when set, otherwise the id
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.id(),
        }
    }

    pub fn has_message_event_definition(&self) -> bool {
        self.event_definitions.iter().any(EventDefinition::is_message)
    }
}

/// A `sequenceFlow` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFlow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub source_ref: Option<String>,
    pub target_ref: Option<String>,
}

impl SequenceFlow {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}
