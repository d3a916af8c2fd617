use serde::{Deserialize, Serialize};

use crate::core::{ConnectorGeometry, LaneScale, SegmentGeometry, SurfaceBounds};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Renderer};

use super::{Chart, ChartPhase, TooltipState};

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSnapshot {
    pub interval_index: usize,
    pub lane: usize,
    pub value: f64,
    pub color: Color,
    pub label: String,
    pub geometry: SegmentGeometry,
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub phase: ChartPhase,
    pub surface: Option<SurfaceBounds>,
    pub scale: Option<LaneScale>,
    pub segments: Vec<SegmentSnapshot>,
    pub connectors: Vec<ConnectorGeometry>,
    pub tooltip: TooltipState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl<R: Renderer> Chart<R> {
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            phase: self.phase(),
            surface: self.surface(),
            scale: self.scale(),
            segments: self
                .segments()
                .iter()
                .map(|segment| {
                    let placed = segment.placed();
                    SegmentSnapshot {
                        interval_index: placed.interval_index,
                        lane: placed.lane,
                        value: placed.value,
                        color: segment.color(),
                        label: segment.label().to_owned(),
                        geometry: placed.geometry,
                    }
                })
                .collect(),
            connectors: self.connectors().to_vec(),
            tooltip: self.tooltip_state().clone(),
        }
    }
}

impl ChartSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a v1 contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
