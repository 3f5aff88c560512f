use super::{Bounds, ClusterPosition, Layout, LayoutProvider, Point};
use crate::{
    api::ExportOptions,
    error::Result,
    model::{ActivityType, Node, NodeKind, ProcessGraph},
};
use log::debug;
use std::collections::{HashMap, VecDeque};

/// Left to right layout. Every node is ranked by the longest path from the
/// process sources, nodes of equal rank are stacked in rows and the
/// participants are stacked as horizontal lanes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayeredLayout;

impl LayoutProvider for LayeredLayout {
    fn layout(&self, graphs: &[ProcessGraph], options: &ExportOptions) -> Result<Layout> {
        let endpoints_wh = f64::from(options.endpoints_wh);
        let task_wh = f64::from(options.task_wh);
        let column = 3.0 * task_wh;
        let row = 2.0 * task_wh;

        let mut layout = Layout::default();
        let mut offset_y = 0.0;
        for graph in graphs {
            let ranks = rank_nodes(graph);
            let mut rows: HashMap<usize, usize> = HashMap::new();

            for (node, rank) in graph.nodes().iter().zip(&ranks) {
                let row_index = rows.entry(*rank).or_default();
                let (width, height) = node_size(node, endpoints_wh, task_wh);
                let center_x = *rank as f64 * column + column / 2.0;
                let center_y = offset_y + *row_index as f64 * row + task_wh / 2.0;
                *row_index += 1;

                layout.set_node(
                    node.id.as_str(),
                    Bounds::new(
                        (center_x - width / 2.0).round(),
                        (center_y - height / 2.0).round(),
                        width,
                        height,
                    ),
                );
            }

            let lane = cluster_position(graph, &layout, offset_y, task_wh)?;
            debug!("Lane {} at {lane}", graph.name());
            offset_y = lane.y + lane.height + 1.5 * task_wh;
            layout.set_lane(graph.name(), lane);

            for flow in graph.flows() {
                let source = *layout.node(&flow.source)?;
                let target = *layout.node(&flow.target)?;
                layout.set_flow(flow.id.as_str(), route(&source, &target, task_wh));
            }
        }
        Ok(layout)
    }
}

// Longest path rank per node, in node order. Nodes on a cycle are released in
// insertion order once nothing else is ready; edges back into ranked nodes are ignored.
fn rank_nodes(graph: &ProcessGraph) -> Vec<usize> {
    let nodes = graph.nodes();
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree = vec![0usize; nodes.len()];
    for flow in graph.flows() {
        if let (Some(&source), Some(&target)) = (
            index.get(flow.source.as_str()),
            index.get(flow.target.as_str()),
        ) {
            successors[source].push(target);
            in_degree[target] += 1;
        }
    }

    let mut ranks = vec![0usize; nodes.len()];
    let mut done = vec![false; nodes.len()];
    let mut ready: VecDeque<usize> = (0..nodes.len()).filter(|i| in_degree[*i] == 0).collect();
    let mut remaining = nodes.len();

    while remaining > 0 {
        let Some(current) = ready
            .pop_front()
            .or_else(|| (0..nodes.len()).find(|i| !done[*i]))
        else {
            break;
        };
        if done[current] {
            continue;
        }
        done[current] = true;
        remaining -= 1;

        for &next in &successors[current] {
            if done[next] {
                continue;
            }
            ranks[next] = ranks[next].max(ranks[current] + 1);
            in_degree[next] = in_degree[next].saturating_sub(1);
            if in_degree[next] == 0 {
                ready.push_back(next);
            }
        }
    }
    ranks
}

fn node_size(node: &Node, endpoints_wh: f64, task_wh: f64) -> (f64, f64) {
    match node.kind {
        kind if kind.is_event() => (endpoints_wh, endpoints_wh),
        NodeKind::Activity(activity_type) if activity_type != ActivityType::SubProcess => {
            let by_name = (2.0 * (node.name.chars().count() as f64 + 7.0) * task_wh / 22.0).round();
            ((2.0 * task_wh).round().min(by_name), task_wh)
        }
        _ => (task_wh, task_wh),
    }
}

fn cluster_position(
    graph: &ProcessGraph,
    layout: &Layout,
    offset_y: f64,
    task_wh: f64,
) -> Result<ClusterPosition> {
    let mut bounds = graph.nodes().iter().map(|node| layout.node(&node.id));
    let Some(first) = bounds.next().transpose()? else {
        return Ok(ClusterPosition::new(
            0.0,
            offset_y - task_wh,
            3.0 * task_wh,
            3.0 * task_wh,
        ));
    };

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for node in bounds {
        let node = node?;
        min_x = min_x.min(node.x);
        max_x = max_x.max(node.x);
        min_y = min_y.min(node.y);
        max_y = max_y.max(node.y);
    }

    Ok(ClusterPosition::new(
        min_x - task_wh,
        min_y - task_wh,
        (max_x - min_x).abs() + 3.0 * task_wh,
        (max_y - min_y).abs() + 3.0 * task_wh,
    ))
}

// Orthogonal route. Forward flows leave on the right and enter on the left,
// everything else goes around below both nodes.
fn route(source: &Bounds, target: &Bounds, task_wh: f64) -> Vec<Point> {
    let source_mid_y = source.y + source.height / 2.0;
    let target_mid_y = target.y + target.height / 2.0;

    if target.x >= source.x + source.width {
        let start = Point::new(source.x + source.width, source_mid_y);
        let end = Point::new(target.x, target_mid_y);
        if start.y == end.y {
            return vec![start, end];
        }
        let middle_x = (start.x + end.x) / 2.0;
        return vec![
            start,
            Point::new(middle_x, start.y),
            Point::new(middle_x, end.y),
            end,
        ];
    }

    let source_mid_x = source.x + source.width / 2.0;
    let target_mid_x = target.x + target.width / 2.0;
    let source_bottom = source.y + source.height;
    let target_bottom = target.y + target.height;
    let below = source_bottom.max(target_bottom) + task_wh / 2.0;
    vec![
        Point::new(source_mid_x, source_bottom),
        Point::new(source_mid_x, below),
        Point::new(target_mid_x, below),
        Point::new(target_mid_x, target_bottom),
    ]
}
