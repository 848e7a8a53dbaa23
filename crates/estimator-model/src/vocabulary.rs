//! Soft vocabularies for phase names and task statuses.
//!
//! Neither is a closed set: labels outside these lists are passed through
//! unchanged. Matching is only used to normalize spelling and to decide
//! what gets logged.

use std::fmt;

/// Status given to tasks that have none.
pub const DEFAULT_STATUS: &str = "Not Started";

/// Recognized task status tokens, in canonical spelling.
pub const KNOWN_STATUSES: [&str; 4] = ["Not Started", "In Progress", "Completed", "Blocked"];

/// Canonical spelling of a known status token, matched case-insensitively
/// and ignoring `_`/`-` separators (`"in_progress"` → `"In Progress"`).
#[must_use]
pub fn canonical_status(token: &str) -> Option<&'static str> {
    let key = squash(token);
    KNOWN_STATUSES
        .iter()
        .copied()
        .find(|known| squash(known) == key)
}

/// The ten standard software-project stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalPhase {
    PlanningAnalysis,
    DesignArchitecture,
    Development,
    Database,
    TestingQa,
    Performance,
    DeploymentDevops,
    Documentation,
    ProjectManagement,
    General,
}

impl CanonicalPhase {
    pub const ALL: [CanonicalPhase; 10] = [
        Self::PlanningAnalysis,
        Self::DesignArchitecture,
        Self::Development,
        Self::Database,
        Self::TestingQa,
        Self::Performance,
        Self::DeploymentDevops,
        Self::Documentation,
        Self::ProjectManagement,
        Self::General,
    ];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PlanningAnalysis => "Planning & Analysis",
            Self::DesignArchitecture => "Design & Architecture",
            Self::Development => "Development",
            Self::Database => "Database",
            Self::TestingQa => "Testing & QA",
            Self::Performance => "Performance",
            Self::DeploymentDevops => "Deployment & DevOps",
            Self::Documentation => "Documentation",
            Self::ProjectManagement => "Project Management",
            Self::General => "General",
        }
    }

    /// What belongs in the phase; embedded in the prompt.
    #[must_use]
    pub const fn scope(&self) -> &'static str {
        match self {
            Self::PlanningAnalysis => {
                "Requirements analysis, workflow design, user journey mapping"
            }
            Self::DesignArchitecture => {
                "UI/UX design, system architecture, technical specifications"
            }
            Self::Development => "Core feature development, integrations, APIs",
            Self::Database => "Database design, migrations, data management",
            Self::TestingQa => "Test setup, quality assurance, bug fixing",
            Self::Performance => "Optimization, performance monitoring, scaling",
            Self::DeploymentDevops => "CI/CD setup, deployment, server configuration",
            Self::Documentation => "Technical documentation, user guides, API documentation",
            Self::ProjectManagement => "Project coordination, reviews, management tasks",
            Self::General => "Project setup, basic configurations, common utilities",
        }
    }

    /// Soft match of a model-supplied phase label.
    ///
    /// Accepts any case, `and` for `&`, and a trailing "Phase"
    /// (`"DESIGN AND ARCHITECTURE PHASE"`), plus a few short forms
    /// such as `"Testing"` or `"DevOps"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let key = phase_key(label);
        if key.is_empty() {
            return None;
        }
        if let Some(found) = Self::ALL.iter().find(|p| phase_key(p.label()) == key) {
            return Some(*found);
        }
        let alias = match key.as_str() {
            "planning" | "analysis" | "requirements" => Self::PlanningAnalysis,
            "design" | "architecture" => Self::DesignArchitecture,
            "dev" | "implementation" => Self::Development,
            "data" | "databases" => Self::Database,
            "testing" | "qa" | "quality assurance" | "qa & testing" => Self::TestingQa,
            "deployment" | "devops" | "devops & deployment" => Self::DeploymentDevops,
            "docs" => Self::Documentation,
            "management" | "pm" => Self::ProjectManagement,
            _ => return None,
        };
        Some(alias)
    }
}

impl fmt::Display for CanonicalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn squash(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn phase_key(label: &str) -> String {
    let lowered = label.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .map(|w| if w == "and" { "&" } else { w })
        .collect();
    let mut words = words.as_slice();
    if let [rest @ .., "phase"] = words {
        words = rest;
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_status_normalizes_spelling() {
        assert_eq!(canonical_status("not started"), Some("Not Started"));
        assert_eq!(canonical_status("IN_PROGRESS"), Some("In Progress"));
        assert_eq!(canonical_status("completed"), Some("Completed"));
        assert_eq!(canonical_status("Blocked"), Some("Blocked"));
        assert_eq!(canonical_status("Deferred"), None);
    }

    #[test]
    fn test_phase_soft_match() {
        assert_eq!(
            CanonicalPhase::from_label("DESIGN & ARCHITECTURE PHASE"),
            Some(CanonicalPhase::DesignArchitecture)
        );
        assert_eq!(
            CanonicalPhase::from_label("Planning and Analysis"),
            Some(CanonicalPhase::PlanningAnalysis)
        );
        assert_eq!(
            CanonicalPhase::from_label("Development Phase"),
            Some(CanonicalPhase::Development)
        );
        assert_eq!(
            CanonicalPhase::from_label("devops"),
            Some(CanonicalPhase::DeploymentDevops)
        );
        assert_eq!(CanonicalPhase::from_label("Marketing Launch"), None);
        assert_eq!(CanonicalPhase::from_label("   "), None);
    }

    #[test]
    fn test_every_label_round_trips() {
        for phase in CanonicalPhase::ALL {
            assert_eq!(CanonicalPhase::from_label(phase.label()), Some(phase));
            assert!(!phase.scope().is_empty());
        }
    }
}
