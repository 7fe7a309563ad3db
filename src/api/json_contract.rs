use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::render::Renderer;

use super::graph::Graph;
use super::graph_snapshot::GraphSnapshot;

pub const GRAPH_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: GraphSnapshot,
}

impl GraphSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> GraphResult<String> {
        let payload = GraphSnapshotJsonContractV1 {
            schema_version: GRAPH_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        Ok(serde_json::to_string_pretty(&payload)?)
    }

    /// Accepts a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> GraphResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<GraphSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: GraphSnapshotJsonContractV1 = serde_json::from_str(input)?;
        if payload.schema_version != GRAPH_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                format!(
                    "unsupported snapshot schema version: {}",
                    payload.schema_version
                ),
            ));
        }
        Ok(payload.snapshot)
    }
}

impl<R: Renderer> Graph<R> {
    pub fn snapshot_json_contract_v1_pretty(&self) -> GraphResult<String> {
        self.snapshot()?.to_json_contract_v1_pretty()
    }
}
