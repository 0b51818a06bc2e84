//! BPMN importer
//!
//! Provides functionality to import BPMN 2.0 XML process definitions into a
//! [`BpmnDocument`].

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::ImportError;
use crate::models::bpmn::{
    BpmnDocument, EventDefinition, FlowNode, FlowNodeKind, Message, Process, SequenceFlow,
};

/// BPMN namespace URI
const BPMN_NAMESPACE: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";

/// Position of the element being read within the document tree
#[derive(Debug, Clone, Copy)]
enum Frame {
    Definitions,
    Process(usize),
    FlowNode { process: usize, node: usize },
    Other,
}

/// BPMN Importer
///
/// Imports BPMN 2.0 XML content into a [`BpmnDocument`]. Diagram interchange
/// and `extensionElements` subtrees are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct BpmnImporter;

impl BpmnImporter {
    /// Create a new BpmnImporter
    pub fn new() -> Self {
        Self
    }

    /// Parse BPMN content bytes
    ///
    /// # Errors
    ///
    /// Returns an [`ImportError`] when the content is empty, not UTF-8, not
    /// well-formed XML, or not a BPMN `definitions` document.
    pub fn import(&self, content: &[u8]) -> Result<BpmnDocument, ImportError> {
        if content.is_empty() {
            return Err(ImportError::EmptyContent);
        }
        let xml_content = std::str::from_utf8(content)?;
        self.import_str(xml_content)
    }

    /// Parse BPMN XML text
    pub fn import_str(&self, xml_content: &str) -> Result<BpmnDocument, ImportError> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);

        let mut document = BpmnDocument::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut skip_depth = 0usize;
        let mut found_definitions = false;
        let mut has_bpmn_namespace = false;

        loop {
            let (element, is_empty) = match reader.read_event() {
                Ok(Event::Start(e)) => (e, false),
                Ok(Event::Empty(e)) => (e, true),
                Ok(Event::End(_)) => {
                    if skip_depth > 0 {
                        skip_depth -= 1;
                    } else {
                        stack.pop();
                    }
                    continue;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ImportError::XmlError {
                        position: reader.error_position(),
                        message: e.to_string(),
                    });
                }
                _ => continue,
            };

            if skip_depth > 0 {
                if !is_empty {
                    skip_depth += 1;
                }
                continue;
            }

            let local_name_bytes = element.local_name();
            let local_name = String::from_utf8_lossy(local_name_bytes.as_ref()).to_string();

            if local_name == "BPMNDiagram" || local_name == "extensionElements" {
                if !is_empty {
                    skip_depth = 1;
                }
                continue;
            }

            let attrs = read_attributes(&element, &reader)?;

            let frame = match stack.last().copied() {
                None => {
                    if local_name != "definitions" || found_definitions {
                        return Err(ImportError::InvalidBpmn(
                            "missing root 'definitions' element".to_string(),
                        ));
                    }
                    found_definitions = true;
                    has_bpmn_namespace = attrs
                        .values()
                        .any(|v| v.contains("omg.org/spec/BPMN") || v == BPMN_NAMESPACE);
                    document.id = attrs.get("id").cloned();
                    document.target_namespace = attrs.get("targetNamespace").cloned();
                    Frame::Definitions
                }
                Some(Frame::Definitions) => {
                    record_id(&mut document, &attrs);
                    match local_name.as_str() {
                        "process" => {
                            document.processes.push(Process {
                                id: attrs.get("id").cloned(),
                                name: attrs.get("name").cloned(),
                                is_executable: attrs
                                    .get("isExecutable")
                                    .is_none_or(|v| v.trim() != "false"),
                                ..Process::default()
                            });
                            Frame::Process(document.processes.len() - 1)
                        }
                        "message" => {
                            document.messages.push(Message {
                                id: attrs.get("id").cloned(),
                                name: attrs.get("name").cloned(),
                            });
                            Frame::Other
                        }
                        _ => Frame::Other,
                    }
                }
                Some(Frame::Process(process)) => {
                    record_id(&mut document, &attrs);
                    container_child(&mut document, process, None, &local_name, &attrs)
                }
                Some(Frame::FlowNode { process, node }) => {
                    record_id(&mut document, &attrs);
                    let parent = &document.processes[process].flow_nodes[node];
                    if parent.kind == FlowNodeKind::SubProcess {
                        let parent_id = parent.id.clone();
                        container_child(&mut document, process, parent_id, &local_name, &attrs)
                    } else {
                        if let Some(definition) = event_definition(&local_name, &attrs) {
                            document.processes[process].flow_nodes[node]
                                .event_definitions
                                .push(definition);
                        }
                        Frame::Other
                    }
                }
                Some(Frame::Other) => {
                    record_id(&mut document, &attrs);
                    Frame::Other
                }
            };

            if !is_empty {
                stack.push(frame);
            }
        }

        if !stack.is_empty() || skip_depth > 0 {
            return Err(ImportError::XmlError {
                position: reader.buffer_position(),
                message: "unexpected end of document: unclosed element".to_string(),
            });
        }

        if !found_definitions {
            return Err(ImportError::InvalidBpmn(
                "missing root 'definitions' element".to_string(),
            ));
        }

        if !has_bpmn_namespace {
            return Err(ImportError::InvalidBpmn(format!(
                "missing BPMN namespace declaration (expected {})",
                BPMN_NAMESPACE
            )));
        }

        if document.processes.is_empty() {
            // Collaboration-only documents are still well formed
            tracing::warn!("BPMN file does not contain a 'process' element");
        }

        tracing::debug!(
            processes = document.processes.len(),
            messages = document.messages.len(),
            "Imported BPMN document"
        );

        Ok(document)
    }
}

/// Collect attributes keyed by local name; the first occurrence wins
fn read_attributes(
    element: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<HashMap<String, String>, ImportError> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ImportError::XmlError {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ImportError::XmlError {
                position: reader.buffer_position(),
                message: e.to_string(),
            })?
            .to_string();
        attrs.entry(key).or_insert(value);
    }
    Ok(attrs)
}

fn record_id(document: &mut BpmnDocument, attrs: &HashMap<String, String>) {
    if let Some(id) = attrs.get("id") {
        document.element_ids.push(id.clone());
    }
}

/// Handle a child of a process or sub-process
fn container_child(
    document: &mut BpmnDocument,
    process: usize,
    parent: Option<String>,
    local_name: &str,
    attrs: &HashMap<String, String>,
) -> Frame {
    let target = &mut document.processes[process];

    if local_name == "sequenceFlow" {
        target.sequence_flows.push(SequenceFlow {
            id: attrs.get("id").cloned(),
            name: attrs.get("name").cloned(),
            source_ref: attrs.get("sourceRef").cloned(),
            target_ref: attrs.get("targetRef").cloned(),
        });
        return Frame::Other;
    }

    let Some(kind) = FlowNodeKind::from_element_name(local_name) else {
        return Frame::Other;
    };

    let node = FlowNode {
        id: attrs.get("id").cloned(),
        name: attrs.get("name").cloned(),
        kind,
        parent,
        implementation: attrs.get("implementation").cloned(),
        called_element: attrs.get("calledElement").cloned(),
        assignee: attrs.get("assignee").cloned(),
        candidate_users: attrs.get("candidateUsers").cloned(),
        candidate_groups: attrs.get("candidateGroups").cloned(),
        default_flow: attrs.get("default").cloned(),
        attached_to: attrs.get("attachedToRef").cloned(),
        triggered_by_event: attrs.get("triggeredByEvent").is_some_and(|v| v.trim() == "true"),
        event_definitions: Vec::new(),
    };
    target.flow_nodes.push(node);

    Frame::FlowNode {
        process,
        node: target.flow_nodes.len() - 1,
    }
}

fn event_definition(local_name: &str, attrs: &HashMap<String, String>) -> Option<EventDefinition> {
    let definition = match local_name {
        "messageEventDefinition" => EventDefinition::Message {
            message_ref: attrs.get("messageRef").cloned(),
        },
        "signalEventDefinition" => EventDefinition::Signal {
            signal_ref: attrs.get("signalRef").cloned(),
        },
        "errorEventDefinition" => EventDefinition::Error {
            error_ref: attrs.get("errorRef").cloned(),
        },
        "timerEventDefinition" => EventDefinition::Timer,
        "terminateEventDefinition" => EventDefinition::Terminate,
        other if other.ends_with("EventDefinition") => EventDefinition::Other(other.to_string()),
        _ => return None,
    };
    Some(definition)
}
