use crate::{
    api::{MessageNodes, SentMessages},
    diagram::{bounds_element, waypoint_element},
    error::{Error, Result},
    ids::IdGenerator,
    layout::Layout,
    model::{MessageFlow, ProcessGraph},
    xml::Element,
};
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};

/// Working copy of the message bindings. Every receiving node is handed out
/// once, front to back.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MessageQueues {
    queues: HashMap<MessageFlow, VecDeque<String>>,
}

impl MessageQueues {
    /// Nodes still queued for a key.
    pub fn peek(&self, key: &MessageFlow) -> Result<&VecDeque<String>> {
        self.queues
            .get(key)
            .ok_or_else(|| Error::UnknownMessageFlow(key.to_string()))
    }

    pub fn remaining(&self, key: &MessageFlow) -> Result<usize> {
        self.peek(key).map(VecDeque::len)
    }

    /// Consume the next node bound to a key.
    pub fn take_next(&mut self, key: &MessageFlow) -> Result<String> {
        self.queues
            .get_mut(key)
            .ok_or_else(|| Error::UnknownMessageFlow(key.to_string()))?
            .pop_front()
            .ok_or_else(|| Error::ExhaustedMessageFlow(key.to_string()))
    }
}

impl From<&MessageNodes> for MessageQueues {
    fn from(message_nodes: &MessageNodes) -> Self {
        Self {
            queues: message_nodes
                .iter()
                .map(|(key, nodes)| (key.clone(), nodes.iter().cloned().collect()))
                .collect(),
        }
    }
}

/// Inputs of the collaboration assembler that are only read.
pub struct CollaborationInput<'a> {
    pub collaboration_id: &'a str,
    pub graphs: &'a [ProcessGraph],
    pub sent_messages: &'a SentMessages,
    pub layout: &'a Layout,
    pub ids: &'a dyn IdGenerator,
    pub strict: bool,
}

/// Build `bpmn:collaboration` with one participant per graph and the message
/// flows between them. Participant shapes and message flow edges are appended
/// to `plane`.
pub fn create_collaboration_element(
    input: CollaborationInput,
    plane: &mut Element,
    queues: &mut MessageQueues,
) -> Result<Element> {
    let mut collaboration =
        Element::new("bpmn:collaboration").with_attr("id", input.collaboration_id);

    for graph in input.graphs {
        let participant_id = format!("id{}", input.ids.next_id());
        collaboration.push(
            Element::new("bpmn:participant")
                .with_attr("id", participant_id.as_str())
                .with_attr("name", graph.name())
                .with_attr("processRef", format!("id{}", graph.process_id())),
        );

        let position = input.layout.lane(graph.name())?;
        plane
            .sub_element(
                Element::new("bpmndi:BPMNShape")
                    .with_attr("bpmnElement", participant_id.as_str())
                    .with_attr("id", format!("{participant_id}_gui"))
                    .with_attr("isHorizontal", "true"),
            )
            .push(bounds_element(
                position.height,
                position.width,
                position.x,
                position.y,
            ));
    }

    let mut message_flows = 0;
    for (participant, entries) in input.sent_messages {
        for (sender, receivers) in entries {
            let key = MessageFlow::new(participant.as_str(), sender.as_str());
            let sender_nodes: Vec<String> = queues.peek(&key)?.iter().cloned().collect();

            // One slot per node currently queued for each receiver
            let mut receiver_slots = Vec::new();
            for receiver in receivers {
                let available = queues.remaining(receiver)?;
                receiver_slots.extend(std::iter::repeat_n(receiver, available));
            }

            // Receiver nodes left over stay queued for later senders
            if sender_nodes.len() > receiver_slots.len() {
                if input.strict {
                    return Err(Error::MessageFlowMismatch {
                        key: key.to_string(),
                        senders: sender_nodes.len(),
                        receivers: receiver_slots.len(),
                    });
                }
                warn!(
                    "Message flow {key}: {} sender node(s) but only {} receiver node(s), unmatched senders are dropped",
                    sender_nodes.len(),
                    receiver_slots.len()
                );
            }

            for (sender_node, receiver) in sender_nodes.iter().zip(receiver_slots) {
                let receiver_node = queues.take_next(receiver)?;
                let source = input.layout.node(sender_node)?;
                let target = input.layout.node(&receiver_node)?;

                let flow_id = format!("id{}", input.ids.next_id());
                collaboration.push(
                    Element::new("bpmn:messageFlow")
                        .with_attr("id", flow_id.as_str())
                        .with_attr("sourceRef", sender_node.as_str())
                        .with_attr("targetRef", receiver_node.as_str()),
                );

                let edge = plane.sub_element(
                    Element::new("bpmndi:BPMNEdge")
                        .with_attr("bpmnElement", flow_id.as_str())
                        .with_attr("id", format!("{flow_id}_gui")),
                );
                edge.push(waypoint_element(source.x, source.y));
                edge.push(waypoint_element(target.x, target.y));
                message_flows += 1;
            }
        }
    }

    debug!(
        "Collaboration {}: {} participants, {message_flows} message flows",
        input.collaboration_id,
        input.graphs.len()
    );
    Ok(collaboration)
}
