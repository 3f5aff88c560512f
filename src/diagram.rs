use crate::{
    error::Result,
    ids::IdGenerator,
    layout::Layout,
    model::ProcessGraph,
    xml::Element,
};
use log::debug;

/// `bpmndi:BPMNDiagram` and its `bpmndi:BPMNPlane`.
///
/// The plane is kept apart until the document is assembled so the
/// collaboration can still add participant shapes and message flow edges.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramElements {
    pub diagram: Element,
    pub plane: Element,
}

impl DiagramElements {
    /// Diagram with the plane as its only child.
    pub fn into_element(self) -> Element {
        let Self { mut diagram, plane } = self;
        diagram.push(plane);
        diagram
    }
}

/// One shape per node and one edge per sequence flow of every graph.
/// All geometry comes from `layout`; nothing is computed here.
pub fn create_diagram_element(
    collaboration_id: &str,
    graphs: &[ProcessGraph],
    layout: &Layout,
    ids: &dyn IdGenerator,
) -> Result<DiagramElements> {
    let diagram = Element::new("bpmndi:BPMNDiagram")
        .with_attr("id", format!("id{}", ids.next_id()))
        .with_attr("name", "diagram");

    let mut plane = Element::new("bpmndi:BPMNPlane")
        .with_attr("bpmnElement", collaboration_id)
        .with_attr("id", format!("id{}", ids.next_id()));

    for graph in graphs {
        for node in graph.nodes() {
            let bounds = layout.node(&node.id)?;
            plane
                .sub_element(
                    Element::new("bpmndi:BPMNShape")
                        .with_attr("bpmnElement", node.id.as_str())
                        .with_attr("id", format!("{}_gui", node.id)),
                )
                .push(bounds_element(
                    bounds.height,
                    bounds.width,
                    bounds.x,
                    bounds.y,
                ));
        }

        for flow in graph.flows() {
            let edge = plane.sub_element(
                Element::new("bpmndi:BPMNEdge")
                    .with_attr("bpmnElement", format!("id{}", flow.id))
                    .with_attr("id", format!("id{}_gui", flow.id)),
            );
            for point in layout.waypoints(&flow.id)? {
                edge.push(waypoint_element(point.x, point.y));
            }
        }
    }

    debug!("Diagram plane with {} elements", plane.children().len());
    Ok(DiagramElements { diagram, plane })
}

pub(crate) fn bounds_element(height: f64, width: f64, x: f64, y: f64) -> Element {
    Element::new("omgdc:Bounds")
        .with_attr("height", height.to_string())
        .with_attr("width", width.to_string())
        .with_attr("x", x.to_string())
        .with_attr("y", y.to_string())
}

pub(crate) fn waypoint_element(x: f64, y: f64) -> Element {
    Element::new("omgdi:waypoint")
        .with_attr("x", x.to_string())
        .with_attr("y", y.to_string())
}
