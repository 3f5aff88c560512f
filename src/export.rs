use crate::{
    api::{ExportOptions, MessageNodes, SentMessages},
    collaboration::{CollaborationInput, MessageQueues, create_collaboration_element},
    diagram::create_diagram_element,
    error::{EMPTY_COLLABORATION, Error, Result},
    ids::{IdGenerator, UuidIds},
    layout::{LayeredLayout, LayoutProvider},
    model::ProcessGraph,
    process::create_process_elements,
    xml::{Element, to_pretty_xml},
};
use log::info;
use std::{collections::HashSet, path::Path};

const NAMESPACES: [(&str, &str); 9] = [
    ("xmlns:bpmn", "http://www.omg.org/spec/BPMN/20100524/MODEL"),
    ("xmlns:bpmndi", "http://www.omg.org/spec/BPMN/20100524/DI"),
    ("xmlns:omgdc", "http://www.omg.org/spec/DD/20100524/DC"),
    ("xmlns:omgdi", "http://www.omg.org/spec/DD/20100524/DI"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("targetNamespace", "http://www.signavio.com/bpmn20"),
    ("typeLanguage", "http://www.w3.org/2001/XMLSchema"),
    ("expressionLanguage", "http://www.w3.org/1999/XPath"),
    ("xmlns:xsd", "http://www.w3.org/2001/XMLSchema"),
];

/// Writes collaboration diagrams.
///
/// ```
/// use bpmn_collab::{BpmnWriter, ExportOptions, SequentialIds};
///
/// let writer = BpmnWriter::new()
///     .options(ExportOptions::default().task_wh(80))
///     .id_generator(SequentialIds::default());
/// ```
pub struct BpmnWriter<L = LayeredLayout, G = UuidIds> {
    layout: L,
    ids: G,
    options: ExportOptions,
}

impl BpmnWriter {
    pub fn new() -> Self {
        Self {
            layout: LayeredLayout,
            ids: UuidIds,
            options: Default::default(),
        }
    }
}

impl Default for BpmnWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, G> BpmnWriter<L, G>
where
    L: LayoutProvider,
    G: IdGenerator,
{
    /// Replace the layout provider. A precomputed [`crate::Layout`] works as one.
    pub fn layout<P: LayoutProvider>(self, layout: P) -> BpmnWriter<P, G> {
        BpmnWriter {
            layout,
            ids: self.ids,
            options: self.options,
        }
    }

    /// Replace the id generator.
    pub fn id_generator<I: IdGenerator>(self, ids: I) -> BpmnWriter<L, I> {
        BpmnWriter {
            layout: self.layout,
            ids,
            options: self.options,
        }
    }

    pub fn options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the whole document. `message_nodes` is copied; the caller's map
    /// is left untouched.
    pub fn to_bytes(
        &self,
        graphs: &[ProcessGraph],
        message_nodes: &MessageNodes,
        sent_messages: &SentMessages,
    ) -> Result<Vec<u8>> {
        check_graphs(graphs)?;

        let layout = self.layout.layout(graphs, &self.options)?;
        let collaboration_id = format!("id{}", self.ids.next_id());

        // The plane exists before the collaboration so it can take the
        // participant shapes and message flow edges.
        let mut diagram = create_diagram_element(&collaboration_id, graphs, &layout, &self.ids)?;
        let mut queues = MessageQueues::from(message_nodes);
        let collaboration = create_collaboration_element(
            CollaborationInput {
                collaboration_id: &collaboration_id,
                graphs,
                sent_messages,
                layout: &layout,
                ids: &self.ids,
                strict: self.options.strict_message_flows,
            },
            &mut diagram.plane,
            &mut queues,
        )?;

        let mut definitions = Element::new("bpmn:definitions");
        for (key, value) in NAMESPACES {
            definitions.set_attr(key, value);
        }
        definitions.push(collaboration);
        for process in create_process_elements(graphs)? {
            definitions.push(process);
        }
        definitions.push(diagram.into_element());

        to_pretty_xml(&definitions)
    }

    /// Write the document to `path`. The file is only created or truncated
    /// once the document has been built.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        graphs: &[ProcessGraph],
        message_nodes: &MessageNodes,
        sent_messages: &SentMessages,
    ) -> Result<()> {
        let bytes = self.to_bytes(graphs, message_nodes, sent_messages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            "Wrote {} participants to {} ({} bytes)",
            graphs.len(),
            path.as_ref().display(),
            bytes.len()
        );
        Ok(())
    }

    #[cfg(feature = "async")]
    pub async fn write_async(
        &self,
        path: impl AsRef<Path>,
        graphs: &[ProcessGraph],
        message_nodes: &MessageNodes,
        sent_messages: &SentMessages,
    ) -> Result<()> {
        let bytes = self.to_bytes(graphs, message_nodes, sent_messages)?;
        tokio::fs::write(path.as_ref(), &bytes).await?;
        info!(
            "Wrote {} participants to {} ({} bytes)",
            graphs.len(),
            path.as_ref().display(),
            bytes.len()
        );
        Ok(())
    }
}

// Participant names key the lanes and node ids are referenced across
// participants, so both have to be unique in the whole collaboration.
fn check_graphs(graphs: &[ProcessGraph]) -> Result<()> {
    if graphs.is_empty() {
        return Err(Error::EmptyCollaboration(EMPTY_COLLABORATION.into()));
    }

    let mut names = HashSet::new();
    let mut node_ids = HashSet::new();
    for graph in graphs {
        if !names.insert(graph.name()) {
            return Err(Error::DuplicateId(format!("participant {}", graph.name())));
        }
        for node in graph.nodes() {
            if !node_ids.insert(node.id.as_str()) {
                return Err(Error::DuplicateId(format!("node {}", node.id)));
            }
        }
    }
    Ok(())
}

/// Write a collaboration diagram to `path` with the built-in layout and random ids.
pub fn write_bpmn(
    path: impl AsRef<Path>,
    graphs: &[ProcessGraph],
    message_nodes: &MessageNodes,
    sent_messages: &SentMessages,
    options: ExportOptions,
) -> Result<()> {
    BpmnWriter::new()
        .options(options)
        .write(path, graphs, message_nodes, sent_messages)
}

/// The document [`write_bpmn`] would write, as bytes.
pub fn get_xml_string(
    graphs: &[ProcessGraph],
    message_nodes: &MessageNodes,
    sent_messages: &SentMessages,
    options: ExportOptions,
) -> Result<Vec<u8>> {
    BpmnWriter::new()
        .options(options)
        .to_bytes(graphs, message_nodes, sent_messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ids::SequentialIds,
        model::{MessageFlow, Node, SequenceFlow},
        xml::parsed::{self, named},
    };
    use std::collections::{BTreeMap, BTreeSet, HashMap};

    fn chain(process_id: &str, name: &str, prefix: &str) -> ProcessGraph {
        let mut graph = ProcessGraph::new(process_id, name);
        graph
            .add_node(Node::start(format!("{prefix}_start"), ""))
            .and_then(|g| g.add_node(Node::task(format!("{prefix}_task"), format!("{name} works"))))
            .and_then(|g| g.add_node(Node::end(format!("{prefix}_end"), "")))
            .and_then(|g| {
                g.add_flow(SequenceFlow::new(
                    format!("{prefix}1"),
                    format!("{prefix}_start"),
                    format!("{prefix}_task"),
                ))
            })
            .and_then(|g| {
                g.add_flow(SequenceFlow::new(
                    format!("{prefix}2"),
                    format!("{prefix}_task"),
                    format!("{prefix}_end"),
                ))
            })
            .unwrap();
        graph
    }

    fn scenario() -> (Vec<ProcessGraph>, MessageNodes, SentMessages) {
        let graphs = vec![chain("pa", "A", "a"), chain("pb", "B", "b")];
        let message_nodes = HashMap::from([
            (MessageFlow::new("B", "A"), vec!["b_task".to_string()]),
            (MessageFlow::new("A", "B"), vec!["a_task".to_string()]),
        ]);
        let sent_messages = BTreeMap::from([(
            "B".to_string(),
            BTreeMap::from([("A".to_string(), BTreeSet::from([MessageFlow::new("A", "B")]))]),
        )]);
        (graphs, message_nodes, sent_messages)
    }

    #[test]
    fn definitions_header() -> Result<(), Box<dyn std::error::Error>> {
        let (graphs, message_nodes, sent_messages) = scenario();
        let bytes = BpmnWriter::new()
            .id_generator(SequentialIds::default())
            .to_bytes(&graphs, &message_nodes, &sent_messages)?;
        let xml = String::from_utf8(bytes.clone())?;
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<bpmn:definitions"));

        let elements = parsed::parse(&bytes)?;
        let definitions = &elements[0];
        let keys: Vec<_> = definitions.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            NAMESPACES.iter().map(|(k, _)| *k).collect::<Vec<_>>()
        );

        // collaboration, processes, diagram
        let top: Vec<_> = elements
            .iter()
            .filter(|e| e.parent.as_deref() == Some("bpmn:definitions"))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            top,
            vec![
                "bpmn:collaboration",
                "bpmn:process",
                "bpmn:process",
                "bpmndi:BPMNDiagram"
            ]
        );
        Ok(())
    }

    #[test]
    fn caller_message_nodes_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let (graphs, message_nodes, sent_messages) = scenario();
        let before = message_nodes.clone();
        get_xml_string(&graphs, &message_nodes, &sent_messages, ExportOptions::default())?;
        assert_eq!(message_nodes, before);
        Ok(())
    }

    #[test]
    fn deterministic_with_sequential_ids() -> Result<(), Box<dyn std::error::Error>> {
        let (graphs, message_nodes, sent_messages) = scenario();
        let first = BpmnWriter::new()
            .id_generator(SequentialIds::default())
            .to_bytes(&graphs, &message_nodes, &sent_messages)?;
        let second = BpmnWriter::new()
            .id_generator(SequentialIds::default())
            .to_bytes(&graphs.clone(), &message_nodes.clone(), &sent_messages.clone())?;
        assert_eq!(first, second);

        let elements = parsed::parse(&first)?;
        let collaboration = &named(&elements, "bpmn:collaboration")[0];
        assert_eq!(collaboration.attr("id"), Some("id1"));
        let plane = &named(&elements, "bpmndi:BPMNPlane")[0];
        assert_eq!(plane.attr("bpmnElement"), Some("id1"));
        Ok(())
    }

    #[test]
    fn empty_collaboration() {
        let result = get_xml_string(&[], &HashMap::new(), &BTreeMap::new(), Default::default());
        assert!(matches!(result, Err(Error::EmptyCollaboration(_))));
    }

    #[test]
    fn duplicate_ids_across_participants() {
        let graphs = vec![chain("pa", "A", "x"), chain("pb", "B", "x")];
        let result = get_xml_string(&graphs, &HashMap::new(), &BTreeMap::new(), Default::default());
        assert!(matches!(result, Err(Error::DuplicateId(id)) if id == "node x_start"));

        let graphs = vec![chain("pa", "A", "a"), chain("pb", "A", "b")];
        let result = get_xml_string(&graphs, &HashMap::new(), &BTreeMap::new(), Default::default());
        assert!(matches!(result, Err(Error::DuplicateId(id)) if id == "participant A"));
    }

    #[test]
    fn failed_export_keeps_existing_file() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("bpmn-collab-{}.bpmn", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"previous")?;

        let (mut graphs, message_nodes, sent_messages) = scenario();
        graphs[0]
            .add_node(Node::new("bad", "", crate::model::NodeKind::Activity(crate::model::ActivityType::UserTask)))?;
        let result = write_bpmn(&path, &graphs, &message_nodes, &sent_messages, Default::default());
        assert!(matches!(result, Err(Error::UnsupportedNodeType(_))));
        assert_eq!(std::fs::read(&path)?, b"previous");

        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn write_creates_file() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("bpmn-collab-{}.bpmn", uuid::Uuid::new_v4()));
        let (graphs, message_nodes, sent_messages) = scenario();
        write_bpmn(&path, &graphs, &message_nodes, &sent_messages, Default::default())?;

        let elements = parsed::parse(&std::fs::read(&path)?)?;
        assert_eq!(named(&elements, "bpmn:messageFlow").len(), 1);
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[cfg(feature = "async")]
    #[test]
    fn write_async_creates_file() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("bpmn-collab-{}.bpmn", uuid::Uuid::new_v4()));
        let (graphs, message_nodes, sent_messages) = scenario();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(BpmnWriter::new().write_async(
            &path,
            &graphs,
            &message_nodes,
            &sent_messages,
        ))?;

        assert!(std::fs::read(&path)?.starts_with(b"<?xml"));
        std::fs::remove_file(&path)?;
        Ok(())
    }
}
