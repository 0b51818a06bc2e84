//! Model types for the validation pipeline

pub mod bpmn;
pub mod connector;
pub mod extensions;
pub mod model;

pub use bpmn::{
    BpmnDocument, EventDefinition, FlowNode, FlowNodeKind, Message, Process, SequenceFlow,
};
pub use connector::{ConnectorAction, ConnectorModelContent, ConnectorParameter};
pub use extensions::{
    Constant, Extensions, ExtensionsModel, MappingDirection, MappingType, ProcessVariable,
    ProcessVariableMapping, TaskVariableMapping,
};
pub use model::{CONNECTOR, ContentType, Model, ModelType, PROCESS};
