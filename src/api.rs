use crate::model::MessageFlow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Send and receive nodes (by node id) bound to every message flow key,
/// in the order they should be paired.
pub type MessageNodes = HashMap<MessageFlow, Vec<String>>;

/// participant → sender → receiving message flow keys.
///
/// Ordered maps keep the message flow pairing reproducible.
pub type SentMessages = BTreeMap<String, BTreeMap<String, BTreeSet<MessageFlow>>>;

/// Sizing and pairing options for one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Width and height of start, end and intermediate events.
    pub endpoints_wh: u32,
    /// Height of a task. Also the base unit for task width, other nodes and lane margins.
    pub task_wh: u32,
    /// Fail when a sender has a different number of nodes than its receivers.
    /// When `false` the longer side is truncated and a warning is logged.
    pub strict_message_flows: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            endpoints_wh: 30,
            task_wh: 60,
            strict_message_flows: true,
        }
    }
}

impl ExportOptions {
    pub fn endpoints_wh(mut self, value: u32) -> Self {
        self.endpoints_wh = value;
        self
    }

    pub fn task_wh(mut self, value: u32) -> Self {
        self.task_wh = value;
        self
    }

    pub fn strict_message_flows(mut self, value: bool) -> Self {
        self.strict_message_flows = value;
        self
    }
}
