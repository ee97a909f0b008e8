use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of load patterns a run can drive against the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Variant {
    SubmitDrop,
    BatchSubmitDrop,
    SingleFullOkLoop,
}

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::SubmitDrop,
        Variant::BatchSubmitDrop,
        Variant::SingleFullOkLoop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::SubmitDrop => "submitDrop",
            Variant::BatchSubmitDrop => "batchSubmitDrop",
            Variant::SingleFullOkLoop => "singleFullOkLoop",
        }
    }

    /// Name of the loader class in the legacy settings module.
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Variant::SubmitDrop => "SubmitDropLoader",
            Variant::BatchSubmitDrop => "BatchSubmitDropLoader",
            Variant::SingleFullOkLoop => "SingleFullOKLoopLoader",
        }
    }

    /// Upper snake case segment used in `JOBLOAD_<VARIANT>_<FIELD>` environment keys.
    pub fn env_segment(&self) -> &'static str {
        match self {
            Variant::SubmitDrop => "SUBMIT_DROP",
            Variant::BatchSubmitDrop => "BATCH_SUBMIT_DROP",
            Variant::SingleFullOkLoop => "SINGLE_FULL_OK_LOOP",
        }
    }

    fn snake_name(&self) -> &'static str {
        match self {
            Variant::SubmitDrop => "submit_drop",
            Variant::BatchSubmitDrop => "batch_submit_drop",
            Variant::SingleFullOkLoop => "single_full_ok_loop",
        }
    }

    /// Whether this variant groups jobs into batch-submit calls.
    pub fn is_batched(&self) -> bool {
        matches!(self, Variant::BatchSubmitDrop)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown generator variant: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Variant::ALL
            .into_iter()
            .find(|v| {
                name == v.as_str() || name == v.snake_name() || name == v.legacy_name()
            })
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}
