use bpmn_collab::{
    BpmnWriter, ExportOptions, GatewayDirection, GatewayType, MessageFlow, Node, NodeKind,
    ProcessGraph, SentMessages, SequenceFlow, SequentialIds,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let mut buyer = ProcessGraph::new("buyer", "Buyer");
    buyer
        .add_node(Node::start("buyer_start", "Need goods"))?
        .add_node(Node::new("order", "Send order", NodeKind::IntermediateThrowEvent))?
        .add_node(Node::new("invoice", "Receive invoice", NodeKind::IntermediateCatchEvent))?
        .add_node(Node::end("buyer_end", "Goods paid"))?
        .add_flow(SequenceFlow::new("b1", "buyer_start", "order"))?
        .add_flow(SequenceFlow::new("b2", "order", "invoice"))?
        .add_flow(SequenceFlow::new("b3", "invoice", "buyer_end"))?;

    let mut seller = ProcessGraph::new("seller", "Seller");
    seller
        .add_node(Node::message_start("seller_start", "Order received"))?
        .add_node(Node::gateway(
            "in_stock",
            GatewayType::Exclusive,
            GatewayDirection::Diverging,
        ))?
        .add_node(Node::task("restock", "Restock"))?
        .add_node(Node::gateway(
            "ready",
            GatewayType::Exclusive,
            GatewayDirection::Converging,
        ))?
        .add_node(Node::message_end("seller_end", "Invoice sent"))?
        .add_flow(SequenceFlow::new("s1", "seller_start", "in_stock"))?
        .add_flow(SequenceFlow::new("s2", "in_stock", "restock").named("no"))?
        .add_flow(SequenceFlow::new("s3", "in_stock", "ready").named("yes"))?
        .add_flow(SequenceFlow::new("s4", "restock", "ready"))?
        .add_flow(SequenceFlow::new("s5", "ready", "seller_end"))?;

    // Nodes that send or receive for each (participant, counterpart) pair
    let message_nodes = HashMap::from([
        (MessageFlow::new("Buyer", "Seller"), vec!["order".to_string()]),
        (MessageFlow::new("Seller", "Buyer"), vec!["seller_start".to_string()]),
        (MessageFlow::new("Seller", "Buyer*"), vec!["seller_end".to_string()]),
        (MessageFlow::new("Buyer", "Seller*"), vec!["invoice".to_string()]),
    ]);
    let sent_messages: SentMessages = BTreeMap::from([
        (
            "Buyer".to_string(),
            BTreeMap::from([(
                "Seller".to_string(),
                BTreeSet::from([MessageFlow::new("Seller", "Buyer")]),
            )]),
        ),
        (
            "Seller".to_string(),
            BTreeMap::from([(
                "Buyer*".to_string(),
                BTreeSet::from([MessageFlow::new("Buyer", "Seller*")]),
            )]),
        ),
    ]);

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "collaboration.bpmn".to_string());
    BpmnWriter::new()
        .id_generator(SequentialIds::default())
        .options(ExportOptions::default().task_wh(80))
        .write(&path, &[buyer, seller], &message_nodes, &sent_messages)?;
    println!("Wrote {path}");
    Ok(())
}
