mod layered;

pub use layered::LayeredLayout;

use crate::{
    api::ExportOptions,
    error::{Error, Result},
    model::ProcessGraph,
};
use std::{collections::HashMap, fmt::Display};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Swimlane rectangle of one participant.
pub type ClusterPosition = Bounds;

/// Presentation data of a collaboration, joined to the process graphs by
/// node id, sequence flow id and participant name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Layout {
    nodes: HashMap<String, Bounds>,
    flows: HashMap<String, Vec<Point>>,
    lanes: HashMap<String, ClusterPosition>,
}

impl Layout {
    pub fn set_node(&mut self, id: impl Into<String>, bounds: Bounds) -> &mut Self {
        self.nodes.insert(id.into(), bounds);
        self
    }

    pub fn set_flow(
        &mut self,
        id: impl Into<String>,
        waypoints: impl IntoIterator<Item = Point>,
    ) -> &mut Self {
        self.flows.insert(id.into(), waypoints.into_iter().collect());
        self
    }

    pub fn set_lane(&mut self, name: impl Into<String>, position: ClusterPosition) -> &mut Self {
        self.lanes.insert(name.into(), position);
        self
    }

    pub fn node(&self, id: &str) -> Result<&Bounds> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::MissingGeometry(format!("node {id}")))
    }

    pub fn waypoints(&self, flow_id: &str) -> Result<&[Point]> {
        self.flows
            .get(flow_id)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingGeometry(format!("sequence flow {flow_id}")))
    }

    pub fn lane(&self, name: &str) -> Result<&ClusterPosition> {
        self.lanes
            .get(name)
            .ok_or_else(|| Error::MissingGeometry(format!("participant {name}")))
    }
}

/// Computes the geometry of every node, sequence flow and participant lane.
pub trait LayoutProvider {
    fn layout(&self, graphs: &[ProcessGraph], options: &ExportOptions) -> Result<Layout>;
}

/// Geometry computed elsewhere is used as is.
impl LayoutProvider for Layout {
    fn layout(&self, _graphs: &[ProcessGraph], _options: &ExportOptions) -> Result<Layout> {
        Ok(self.clone())
    }
}

impl<L: LayoutProvider + ?Sized> LayoutProvider for &L {
    fn layout(&self, graphs: &[ProcessGraph], options: &ExportOptions) -> Result<Layout> {
        (**self).layout(graphs, options)
    }
}
