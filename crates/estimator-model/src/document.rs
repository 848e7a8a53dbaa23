use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Header block of an estimation. All fields are free text and default to "".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectInfo {
    pub title: String,
    pub project_name: String,
    pub client: String,
    pub date: String,
    pub version: String,
    pub prepared_by: String,
    pub assumptions: String,
}

/// A unit of estimated work.
///
/// Once produced by the coercer, `max_hours >= min_hours >= 0` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub task_name: String,
    pub resource: String,
    pub min_hours: f64,
    pub max_hours: f64,
    /// `YYYY-MM-DD` or empty
    pub start_date: String,
    /// `YYYY-MM-DD` or empty
    pub end_date: String,
    pub status: String,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            task_name: String::new(),
            resource: String::new(),
            min_hours: 0.0,
            max_hours: 0.0,
            start_date: String::new(),
            end_date: String::new(),
            status: crate::DEFAULT_STATUS.to_string(),
        }
    }
}

/// Hour range; used for phase subtotals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoursRange {
    pub min_hours: f64,
    pub max_hours: f64,
}

/// A named group of tasks. The subtotal is always recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub tasks: Vec<Task>,
    pub subtotal: HoursRange,
}

impl Phase {
    #[must_use]
    pub fn new(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            name: name.into(),
            tasks,
            subtotal: HoursRange::default(),
        }
    }

    /// Canonical phase this name refers to, if any.
    #[must_use]
    pub fn canonical(&self) -> Option<crate::CanonicalPhase> {
        crate::CanonicalPhase::from_label(&self.name)
    }
}

/// Project-wide totals derived from the phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Summary {
    pub total_min_hours: f64,
    pub total_max_hours: f64,
    pub estimated_duration_weeks: u64,
    pub recommended_team_size: u32,
    pub total_tasks: usize,
    pub total_phases: usize,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            total_min_hours: 0.0,
            total_max_hours: 0.0,
            estimated_duration_weeks: 0,
            recommended_team_size: 1,
            total_tasks: 0,
            total_phases: 0,
        }
    }
}

/// A risk entry. Only `description` is expected; other keys the model
/// supplied are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Risk {
    #[serde(alias = "risk")]
    pub description: String,
    pub phase: String,
    pub impact: String,
    pub mitigation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Risk {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Free-form recommendation: plain text or a small object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendation {
    Text(String),
    Structured(Map<String, Value>),
}

impl Recommendation {
    /// Single-line rendering for reports.
    ///
    /// Objects use their `recommendation`, `text`, `description` or `title`
    /// field when present, otherwise compact JSON.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(map) => ["recommendation", "text", "description", "title"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        }
    }
}

/// Root aggregate produced once per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimationDocument {
    pub project_info: ProjectInfo,
    pub phases: Vec<Phase>,
    pub summary: Summary,
    pub risks: Vec<Risk>,
    pub recommendations: Vec<Recommendation>,
}

impl EstimationDocument {
    /// All tasks in phase order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.phases.iter().flat_map(|phase| phase.tasks.iter())
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.tasks.len()).sum()
    }
}
