//! # bpmn-collab
//!
//! `bpmn-collab` writes a Business Process Model and Notation (BPMN) 2.0 collaboration diagram
//! from one process graph per participant and the message flows between them.
//!
//! - One `bpmn:participant` and one `bpmn:process` per process graph.
//! - Message flows are resolved from abstract (participant, counterpart) keys down to concrete
//!   send and receive nodes. Every receiving node is used once.
//! - Diagram interchange shapes and edges for nodes, sequence flows, lanes and message flows.
//! - Bring your own layout with [`LayoutProvider`] or use the built-in [`LayeredLayout`].
//! - Reproducible output with [`SequentialIds`].
//!
//! The output opens in Signavio, Camunda Modeler and <https://demo.bpmn.io>.
//!
//! ## Example
//!
//! ### Cargo.toml
//! ```toml
//! [dependencies]
//! bpmn-collab = "0.1"
//! log = "0.4"
//! pretty_env_logger = "0.5"
//! ```
//! ### main.rs
//!
//! ```
//! use bpmn_collab::{
//!     ExportOptions, MessageFlow, Node, ProcessGraph, SequenceFlow, SentMessages, write_bpmn,
//! };
//! use std::collections::{BTreeMap, BTreeSet, HashMap};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     pretty_env_logger::init();
//!
//!     let mut shop = ProcessGraph::new("shop", "Shop");
//!     shop.add_node(Node::start("shop_start", ""))?
//!         .add_node(Node::task("ship", "Ship order"))?
//!         .add_node(Node::end("shop_end", ""))?
//!         .add_flow(SequenceFlow::new("s1", "shop_start", "ship"))?
//!         .add_flow(SequenceFlow::new("s2", "ship", "shop_end"))?;
//!
//!     let mut customer = ProcessGraph::new("customer", "Customer");
//!     customer
//!         .add_node(Node::start("customer_start", ""))?
//!         .add_node(Node::task("receive", "Receive order"))?
//!         .add_node(Node::end("customer_end", ""))?
//!         .add_flow(SequenceFlow::new("c1", "customer_start", "receive"))?
//!         .add_flow(SequenceFlow::new("c2", "receive", "customer_end"))?;
//!
//!     // Shop sends to Customer
//!     let message_nodes = HashMap::from([
//!         (MessageFlow::new("Shop", "Customer"), vec!["ship".to_string()]),
//!         (MessageFlow::new("Customer", "Shop"), vec!["receive".to_string()]),
//!     ]);
//!     let sent_messages: SentMessages = BTreeMap::from([(
//!         "Shop".to_string(),
//!         BTreeMap::from([(
//!             "Customer".to_string(),
//!             BTreeSet::from([MessageFlow::new("Customer", "Shop")]),
//!         )]),
//!     )]);
//!
//!     write_bpmn(
//!         "collaboration.bpmn",
//!         &[shop, customer],
//!         &message_nodes,
//!         &sent_messages,
//!         ExportOptions::default(),
//!     )?;
//!     Ok(())
//! }
//! ```

mod api;
mod collaboration;
mod diagram;
mod error;
mod export;
mod ids;
mod layout;
mod model;
mod process;
mod xml;

pub use api::{ExportOptions, MessageNodes, SentMessages};
pub use collaboration::{CollaborationInput, MessageQueues, create_collaboration_element};
pub use diagram::{DiagramElements, create_diagram_element};
pub use error::{Error, Result};
pub use export::{BpmnWriter, get_xml_string, write_bpmn};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use layout::{Bounds, ClusterPosition, LayeredLayout, Layout, LayoutProvider, Point};
pub use model::{
    ActivityType, GatewayDirection, GatewayType, MessageFlow, Node, NodeKind, ProcessGraph,
    SequenceFlow,
};
pub use process::{create_process_element, create_process_elements};
pub use xml::{Element, to_pretty_xml};
