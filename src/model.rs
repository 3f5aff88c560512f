use crate::error::{Error, Result};
use std::fmt::Display;

/// One participant's process. Nodes and flows keep their insertion order,
/// which is the order they are written in.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessGraph {
    process_id: String,
    name: String,
    nodes: Vec<Node>,
    flows: Vec<SequenceFlow>,
}

impl ProcessGraph {
    pub fn new(process_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            name: name.into(),
            nodes: Default::default(),
            flows: Default::default(),
        }
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn flows(&self) -> &[SequenceFlow] {
        &self.flows
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Add a node. Ids must be unique within the graph.
    pub fn add_node(&mut self, node: Node) -> Result<&mut Self> {
        if self.node(&node.id).is_some() {
            return Err(Error::DuplicateId(node.id));
        }
        self.nodes.push(node);
        Ok(self)
    }

    /// Add a sequence flow and wire it into the outgoing list of its source
    /// and the incoming list of its target.
    pub fn add_flow(&mut self, flow: SequenceFlow) -> Result<&mut Self> {
        if self.flows.iter().any(|existing| existing.id == flow.id) {
            return Err(Error::DuplicateId(flow.id));
        }

        let source = self.position(&flow.source)?;
        let target = self.position(&flow.target)?;
        self.nodes[source].outgoing.push(flow.id.clone());
        self.nodes[target].incoming.push(flow.id.clone());
        self.flows.push(flow);
        Ok(self)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| Error::UnknownNode(format!("{id} in process {}", self.name)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    // Sequence flow ids
    pub incoming: Vec<String>,
    pub outgoing: Vec<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            incoming: Default::default(),
            outgoing: Default::default(),
        }
    }

    pub fn start(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            NodeKind::StartEvent {
                message: false,
                is_interrupting: true,
                parallel_multiple: false,
            },
        )
    }

    pub fn message_start(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            NodeKind::StartEvent {
                message: true,
                is_interrupting: false,
                parallel_multiple: false,
            },
        )
    }

    pub fn end(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::EndEvent { message: false })
    }

    pub fn message_end(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::EndEvent { message: true })
    }

    pub fn task(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Activity(ActivityType::Task))
    }

    pub fn gateway(
        id: impl Into<String>,
        gateway_type: GatewayType,
        direction: GatewayDirection,
    ) -> Self {
        Self::new(
            id,
            "",
            NodeKind::Gateway {
                gateway_type,
                direction,
            },
        )
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} ({})", self.kind, self.id)
        } else {
            write!(f, "{} {} ({})", self.kind, self.name, self.id)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    StartEvent {
        message: bool,
        is_interrupting: bool,
        parallel_multiple: bool,
    },
    EndEvent {
        message: bool,
    },
    // Always message typed
    IntermediateCatchEvent,
    IntermediateThrowEvent,
    BoundaryEvent,
    Activity(ActivityType),
    Gateway {
        gateway_type: GatewayType,
        direction: GatewayDirection,
    },
}

impl NodeKind {
    /// Drawn with the small endpoint size rather than the task size.
    pub fn is_event(&self) -> bool {
        matches!(
            self,
            NodeKind::StartEvent { .. }
                | NodeKind::EndEvent { .. }
                | NodeKind::IntermediateCatchEvent
                | NodeKind::IntermediateThrowEvent
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::StartEvent { message: true, .. } => write!(f, "MessageStartEvent"),
            NodeKind::StartEvent { .. } => write!(f, "StartEvent"),
            NodeKind::EndEvent { message: true } => write!(f, "MessageEndEvent"),
            NodeKind::EndEvent { .. } => write!(f, "EndEvent"),
            NodeKind::IntermediateCatchEvent => write!(f, "IntermediateCatchEvent"),
            NodeKind::IntermediateThrowEvent => write!(f, "IntermediateThrowEvent"),
            NodeKind::BoundaryEvent => write!(f, "BoundaryEvent"),
            NodeKind::Activity(activity_type) => write!(f, "{activity_type}"),
            NodeKind::Gateway { gateway_type, .. } => write!(f, "{gateway_type}Gateway"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Task,
    SubProcess,
    UserTask,
    ServiceTask,
    ScriptTask,
    SendTask,
    ReceiveTask,
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayType {
    Exclusive,
    Parallel,
    Inclusive,
    EventBased,
    Complex,
}

impl Display for GatewayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GatewayDirection {
    #[default]
    Unspecified,
    Converging,
    Diverging,
    Mixed,
}

impl GatewayDirection {
    /// Value of the `gatewayDirection` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayDirection::Unspecified => "unspecified",
            GatewayDirection::Converging => "converging",
            GatewayDirection::Diverging => "diverging",
            GatewayDirection::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceFlow {
    pub id: String,
    pub name: String,
    // Node ids in the same process graph
    pub source: String,
    pub target: String,
}

impl SequenceFlow {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: Default::default(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Key of a communication channel between two participants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageFlow {
    pub participant: String,
    pub counterpart: String,
}

impl MessageFlow {
    pub fn new(participant: impl Into<String>, counterpart: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            counterpart: counterpart.into(),
        }
    }
}

impl Display for MessageFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.participant, self.counterpart)
    }
}
