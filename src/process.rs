use crate::{
    error::{Error, Result},
    model::{ActivityType, GatewayDirection, GatewayType, Node, NodeKind, ProcessGraph},
    xml::Element,
};
use log::debug;

/// How a node kind is written in a `bpmn:process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ElementSpec {
    tag: &'static str,
    attributes: Attributes,
    // Nested bpmn:messageEventDefinition
    message_definition: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attributes {
    Start {
        is_interrupting: bool,
        parallel_multiple: bool,
    },
    Named,
    // Gateways are never named
    Gateway(GatewayDirection),
}

impl ElementSpec {
    const fn named(tag: &'static str, message_definition: bool) -> Self {
        Self {
            tag,
            attributes: Attributes::Named,
            message_definition,
        }
    }

    fn build(&self, node: &Node) -> Element {
        let mut element = Element::new(self.tag).with_attr("id", node.id.as_str());
        match self.attributes {
            Attributes::Start {
                is_interrupting,
                parallel_multiple,
            } => {
                element.set_attr("isInterrupting", bool_attr(is_interrupting));
                element.set_attr("name", node.name.as_str());
                element.set_attr("parallelMultiple", bool_attr(parallel_multiple));
            }
            Attributes::Named => element.set_attr("name", node.name.as_str()),
            Attributes::Gateway(direction) => {
                element.set_attr("gatewayDirection", direction.as_str());
                element.set_attr("name", "");
            }
        }

        if self.message_definition {
            element.push(
                Element::new("bpmn:messageEventDefinition")
                    .with_attr("id", format!("{}_msg", node.id)),
            );
        }
        element
    }
}

/// Export mapping of every supported node kind.
pub(crate) fn element_spec(node: &Node) -> Result<ElementSpec> {
    Ok(match node.kind {
        NodeKind::StartEvent {
            message,
            is_interrupting,
            parallel_multiple,
        } => ElementSpec {
            tag: "bpmn:startEvent",
            attributes: Attributes::Start {
                // Message start events always interrupt
                is_interrupting: is_interrupting || message,
                parallel_multiple,
            },
            message_definition: message,
        },
        NodeKind::EndEvent { message } => ElementSpec::named("bpmn:endEvent", message),
        NodeKind::IntermediateCatchEvent => {
            ElementSpec::named("bpmn:intermediateCatchEvent", true)
        }
        NodeKind::IntermediateThrowEvent => {
            ElementSpec::named("bpmn:intermediateThrowEvent", true)
        }
        NodeKind::BoundaryEvent => ElementSpec::named("bpmn:boundaryEvent", false),
        NodeKind::Activity(ActivityType::Task) => ElementSpec::named("bpmn:task", false),
        NodeKind::Activity(ActivityType::SubProcess) => {
            ElementSpec::named("bpmn:subProcess", false)
        }
        NodeKind::Gateway {
            gateway_type,
            direction,
        } => ElementSpec {
            tag: match gateway_type {
                GatewayType::Exclusive => "bpmn:exclusiveGateway",
                GatewayType::Parallel => "bpmn:parallelGateway",
                GatewayType::Inclusive => "bpmn:inclusiveGateway",
                GatewayType::EventBased | GatewayType::Complex => {
                    return Err(Error::UnsupportedNodeType(node.to_string()));
                }
            },
            attributes: Attributes::Gateway(direction),
            message_definition: false,
        },
        NodeKind::Activity(_) => return Err(Error::UnsupportedNodeType(node.to_string())),
    })
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Build the `bpmn:process` element of one participant. Nothing is returned
/// for the process if any of its nodes cannot be exported.
pub fn create_process_element(graph: &ProcessGraph) -> Result<Element> {
    let mut process = Element::new("bpmn:process")
        .with_attr("id", format!("id{}", graph.process_id()))
        .with_attr("isClosed", "false")
        .with_attr("isExecutable", "false")
        .with_attr("processType", "None");

    for node in graph.nodes() {
        let element = process.sub_element(element_spec(node)?.build(node));
        for flow_id in &node.incoming {
            element.push(Element::new("bpmn:incoming").with_text(format!("id{flow_id}")));
        }
        for flow_id in &node.outgoing {
            element.push(Element::new("bpmn:outgoing").with_text(format!("id{flow_id}")));
        }
    }

    for flow in graph.flows() {
        process.push(
            Element::new("bpmn:sequenceFlow")
                .with_attr("id", format!("id{}", flow.id))
                .with_attr("name", flow.name.as_str())
                .with_attr("sourceRef", flow.source.as_str())
                .with_attr("targetRef", flow.target.as_str()),
        );
    }

    debug!(
        "Process {}: {} nodes, {} sequence flows",
        graph.name(),
        graph.nodes().len(),
        graph.flows().len()
    );
    Ok(process)
}

/// One `bpmn:process` per graph, in input order.
pub fn create_process_elements(graphs: &[ProcessGraph]) -> Result<Vec<Element>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        graphs.par_iter().map(create_process_element).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        graphs.iter().map(create_process_element).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SequenceFlow;

    fn node_element(node: Node) -> Result<Element> {
        let mut graph = ProcessGraph::new("p", "A");
        graph.add_node(node)?;
        let process = create_process_element(&graph)?;
        Ok(process.children()[0].clone())
    }

    #[test]
    fn process_attributes() -> Result<(), Box<dyn std::error::Error>> {
        let process = create_process_element(&ProcessGraph::new("42", "A"))?;
        assert_eq!(process.tag(), "bpmn:process");
        assert_eq!(process.attr("id"), Some("id42"));
        assert_eq!(process.attr("isClosed"), Some("false"));
        assert_eq!(process.attr("isExecutable"), Some("false"));
        assert_eq!(process.attr("processType"), Some("None"));
        assert!(process.children().is_empty());
        Ok(())
    }

    #[test]
    fn start_events() -> Result<(), Box<dyn std::error::Error>> {
        let start = node_element(Node::start("s", "begin"))?;
        assert_eq!(start.tag(), "bpmn:startEvent");
        assert_eq!(start.attr("isInterrupting"), Some("true"));
        assert_eq!(start.attr("parallelMultiple"), Some("false"));
        assert_eq!(start.attr("name"), Some("begin"));
        assert!(start.children().is_empty());

        let plain = node_element(Node::new(
            "s",
            "",
            NodeKind::StartEvent {
                message: false,
                is_interrupting: false,
                parallel_multiple: true,
            },
        ))?;
        assert_eq!(plain.attr("isInterrupting"), Some("false"));
        assert_eq!(plain.attr("parallelMultiple"), Some("true"));

        let message = node_element(Node::message_start("m", "order received"))?;
        assert_eq!(message.attr("isInterrupting"), Some("true"));
        assert_eq!(message.children().len(), 1);
        assert_eq!(message.children()[0].tag(), "bpmn:messageEventDefinition");
        assert_eq!(message.children()[0].attr("id"), Some("m_msg"));
        Ok(())
    }

    #[test]
    fn end_and_intermediate_events() -> Result<(), Box<dyn std::error::Error>> {
        let end = node_element(Node::end("e", "done"))?;
        assert_eq!(end.tag(), "bpmn:endEvent");
        assert!(end.children().is_empty());

        let message_end = node_element(Node::message_end("e", "done"))?;
        assert_eq!(message_end.children()[0].attr("id"), Some("e_msg"));

        for (kind, tag) in [
            (NodeKind::IntermediateCatchEvent, "bpmn:intermediateCatchEvent"),
            (NodeKind::IntermediateThrowEvent, "bpmn:intermediateThrowEvent"),
        ] {
            let element = node_element(Node::new("i", "msg", kind))?;
            assert_eq!(element.tag(), tag);
            assert_eq!(element.attr("name"), Some("msg"));
            assert_eq!(element.children()[0].tag(), "bpmn:messageEventDefinition");
        }

        let boundary = node_element(Node::new("b", "timeout", NodeKind::BoundaryEvent))?;
        assert_eq!(boundary.tag(), "bpmn:boundaryEvent");
        assert!(boundary.children().is_empty());
        Ok(())
    }

    #[test]
    fn gateways_are_never_named() -> Result<(), Box<dyn std::error::Error>> {
        for (gateway_type, tag) in [
            (GatewayType::Exclusive, "bpmn:exclusiveGateway"),
            (GatewayType::Parallel, "bpmn:parallelGateway"),
            (GatewayType::Inclusive, "bpmn:inclusiveGateway"),
        ] {
            let mut node = Node::gateway("g", gateway_type, GatewayDirection::Diverging);
            node.name = "should not be written".into();
            let element = node_element(node)?;
            assert_eq!(element.tag(), tag);
            assert_eq!(element.attr("name"), Some(""));
            assert_eq!(element.attr("gatewayDirection"), Some("diverging"));
        }
        Ok(())
    }

    #[test]
    fn incoming_outgoing_and_sequence_flows() -> Result<(), Box<dyn std::error::Error>> {
        let mut graph = ProcessGraph::new("p", "A");
        graph
            .add_node(Node::start("s", ""))?
            .add_node(Node::task("t", "work"))?
            .add_node(Node::end("e", ""))?
            .add_flow(SequenceFlow::new("f1", "s", "t").named("go"))?
            .add_flow(SequenceFlow::new("f2", "t", "e"))?;
        let process = create_process_element(&graph)?;

        let task = &process.children()[1];
        let arcs: Vec<_> = task
            .children()
            .iter()
            .map(|child| (child.tag(), child.text()))
            .collect();
        assert_eq!(
            arcs,
            vec![
                ("bpmn:incoming", Some("idf1")),
                ("bpmn:outgoing", Some("idf2"))
            ]
        );

        let flows: Vec<_> = process
            .children()
            .iter()
            .filter(|child| child.tag() == "bpmn:sequenceFlow")
            .collect();
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].attr("id"), Some("idf1"));
        assert_eq!(flows[0].attr("name"), Some("go"));
        assert_eq!(flows[0].attr("sourceRef"), Some("s"));
        assert_eq!(flows[0].attr("targetRef"), Some("t"));
        assert_eq!(flows[1].attr("name"), Some(""));
        Ok(())
    }

    #[test]
    fn unsupported_node_type() {
        let mut graph = ProcessGraph::new("p", "A");
        graph.add_node(Node::task("t", "ok")).unwrap();
        graph
            .add_node(Node::new("u", "script", NodeKind::Activity(ActivityType::ScriptTask)))
            .unwrap();
        assert!(matches!(
            create_process_element(&graph),
            Err(Error::UnsupportedNodeType(message)) if message.contains("ScriptTask")
        ));

        let mut graph = ProcessGraph::new("p", "A");
        graph
            .add_node(Node::gateway("g", GatewayType::EventBased, GatewayDirection::Diverging))
            .unwrap();
        assert!(matches!(
            create_process_elements(&[graph]),
            Err(Error::UnsupportedNodeType(_))
        ));
    }
}
