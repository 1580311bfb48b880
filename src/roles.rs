//! Fixed organizational role set and per-role summarization configuration.
//!
//! Every uploaded document is summarized once per role in [`RoleCode::ALL`].
//! The model, instruction prompt, and output budget for each role are static
//! reference data; callers cannot adjust them per request.

use serde::{Deserialize, Serialize};

/// Organizational roles that receive tailored summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCode {
    /// Station control room staff.
    StationCtrl,
    /// Safety officers.
    Safety,
    /// Maintenance crews.
    Maintenance,
    /// Day-to-day operations staff.
    Operations,
    /// Executive leadership.
    Executive,
}

impl RoleCode {
    /// All known roles, in fanout order.
    pub const ALL: [RoleCode; 5] = [
        RoleCode::StationCtrl,
        RoleCode::Safety,
        RoleCode::Maintenance,
        RoleCode::Operations,
        RoleCode::Executive,
    ];

    /// Stable wire code for the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StationCtrl => "STATION_CTRL",
            Self::Safety => "SAFETY",
            Self::Maintenance => "MAINTENANCE",
            Self::Operations => "OPERATIONS",
            Self::Executive => "EXECUTIVE",
        }
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STATION_CTRL" => Ok(Self::StationCtrl),
            "SAFETY" => Ok(Self::Safety),
            "MAINTENANCE" => Ok(Self::Maintenance),
            "OPERATIONS" => Ok(Self::Operations),
            "EXECUTIVE" => Ok(Self::Executive),
            _ => Err(()),
        }
    }
}

/// Static summarization parameters for one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleSummaryConfig {
    /// Model identifier passed to the summarization provider.
    pub model: &'static str,
    /// Role-specific instruction prompt prefixed to the document context.
    pub instructions: &'static str,
    /// Maximum summary length requested from the provider, in characters.
    pub max_summary_chars: usize,
}

/// Look up the static summarization configuration for a role.
pub fn summary_config(role: RoleCode) -> &'static RoleSummaryConfig {
    match role {
        RoleCode::StationCtrl => &RoleSummaryConfig {
            model: "triage-summarizer-large",
            instructions: "Summarize for the station control room. Lead with incidents, \
                           disruptions, and anything requiring immediate dispatch.",
            max_summary_chars: 400,
        },
        RoleCode::Safety => &RoleSummaryConfig {
            model: "triage-summarizer-large",
            instructions: "Summarize for safety officers. Highlight hazards, compliance \
                           findings, and required safety actions.",
            max_summary_chars: 450,
        },
        RoleCode::Maintenance => &RoleSummaryConfig {
            model: "triage-summarizer-standard",
            instructions: "Summarize for maintenance crews. Focus on equipment condition, \
                           defects, and scheduled work.",
            max_summary_chars: 350,
        },
        RoleCode::Operations => &RoleSummaryConfig {
            model: "triage-summarizer-standard",
            instructions: "Summarize for operations staff. Focus on schedules, staffing, \
                           and service changes.",
            max_summary_chars: 350,
        },
        RoleCode::Executive => &RoleSummaryConfig {
            model: "triage-summarizer-standard",
            instructions: "Summarize for executive leadership. Keep it brief: outcomes, \
                           risks, and decisions needed.",
            max_summary_chars: 250,
        },
    }
}
