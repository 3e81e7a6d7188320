//! Domain models for the upload/analysis workflow and the contract read API.

/// Declares a closed status enum with its wire spelling.
///
/// Parsing is case-insensitive and treats `_` like `-`, so `IN_PROGRESS`,
/// `in-progress` and `In-Progress` all resolve to the same variant. Values
/// serialize back to the canonical spelling.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace('_', "-");
                $(
                    if normalized == $wire.to_lowercase() $(|| normalized == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(anyhow::anyhow!(concat!("Invalid ", stringify!($name), ": {}"), s))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod analysis;
pub mod contract;
pub mod milestone_check;
pub mod upload;
pub mod workflow;

pub use analysis::{ActionItem, ActionStatus, ContractAnalysis, Evidence, Phase, PhaseStatus};
pub use contract::{
    ContractDetail, ContractDocument, ContractStatus, ContractSummary, ContractType,
    DocumentKind, DocumentStatus, LifecyclePhase, MemberStatus, Milestone, MilestoneStatus,
    RiskLevel, TeamMember, TeamMembership,
};
pub use milestone_check::{
    AgentStatus, MilestoneCheckRequest, MilestoneCheckResponse, ServiceStatus,
};
pub use upload::{content_type_for_filename, StorageReference, UploadedFile, PDF_CONTENT_TYPE};
pub use workflow::{RunId, WorkflowStatus};
