//! Schema validator and coercer
//!
//! Turns a parsed JSON value into an [`EstimationDocument`]. Only a missing
//! or malformed `phases` array (or a non-object root) is fatal; every other
//! problem is repaired locally and recorded as a [`FieldIssue`]. All issues
//! are collected before any error is returned.

use chrono::NaiveDate;
use estimator_model::{
    DEFAULT_STATUS, EstimationDocument, Phase, ProjectInfo, Recommendation, Risk, Summary, Task,
    canonical_status,
};
use estimator_utils::error::{FieldIssue, IssueKind, RecoveryError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::metrics::quantize_hours;

/// Leading decimal number in strings like `"16h"` or `"12.5 hours"`.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)").unwrap());

const DEFAULT_PHASE_NAME: &str = "General";
const DEFAULT_TASK_NAME: &str = "Untitled task";
const RISK_FIELDS: [&str; 5] = ["description", "risk", "phase", "impact", "mitigation"];

/// Coerced document plus every issue found along the way.
#[derive(Debug, Clone)]
pub struct Coerced {
    pub document: EstimationDocument,
    /// All recorded issues; every one is `recovered`.
    pub issues: Vec<FieldIssue>,
}

/// Coerce a parsed value into the domain model.
///
/// The returned document's summary carries only `recommended_team_size`;
/// the remaining summary fields and all subtotals are left for the metrics
/// calculator.
pub fn coerce(value: &Value) -> Result<Coerced, RecoveryError> {
    let mut issues = Issues::default();

    let Some(root) = value.as_object() else {
        issues.fatal("$", IssueKind::InvalidFieldValue, "expected a JSON object");
        return Err(RecoveryError::InvalidFieldValue {
            path: "$".to_string(),
            reason: format!("expected a JSON object, found {}", type_name(value)),
            issues: issues.into_vec(),
        });
    };

    // Optional sections first so a fatal `phases` error still reports them.
    let project_info = coerce_project_info(root.get("projectInfo"), &mut issues);
    let recommended_team_size = coerce_team_size(root.get("summary"), &mut issues);
    let risks = coerce_risks(root.get("risks"), &mut issues);
    let recommendations = coerce_recommendations(root.get("recommendations"), &mut issues);

    let phases = match root.get("phases") {
        None | Some(Value::Null) => {
            issues.fatal(
                "phases",
                IssueKind::MissingRequiredField,
                "top-level 'phases' array is required",
            );
            return Err(RecoveryError::MissingRequiredField {
                path: "phases".to_string(),
                issues: issues.into_vec(),
            });
        }
        Some(Value::Array(items)) => coerce_phases(items, &mut issues),
        Some(other) => {
            let reason = format!("expected an array, found {}", type_name(other));
            issues.fatal("phases", IssueKind::InvalidFieldValue, reason.clone());
            return Err(RecoveryError::InvalidFieldValue {
                path: "phases".to_string(),
                reason,
                issues: issues.into_vec(),
            });
        }
    };

    let document = EstimationDocument {
        project_info,
        phases,
        summary: Summary {
            recommended_team_size,
            ..Summary::default()
        },
        risks,
        recommendations,
    };

    if !issues.is_empty() {
        debug!(issues = issues.len(), "Recovered schema issues locally");
    }

    Ok(Coerced {
        document,
        issues: issues.into_vec(),
    })
}

#[derive(Debug, Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn recovered(&mut self, path: impl Into<String>, kind: IssueKind, message: impl Into<String>) {
        self.0.push(FieldIssue::recovered(path, kind, message));
    }

    fn fatal(&mut self, path: impl Into<String>, kind: IssueKind, message: impl Into<String>) {
        self.0.push(FieldIssue::fatal(path, kind, message));
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn into_vec(self) -> Vec<FieldIssue> {
        self.0
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strings pass through, numbers and booleans are stringified.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_project_info(value: Option<&Value>, issues: &mut Issues) -> ProjectInfo {
    let mut info = ProjectInfo::default();
    let Some(value) = value else {
        return info;
    };
    let Some(map) = value.as_object() else {
        issues.recovered(
            "projectInfo",
            IssueKind::InvalidFieldValue,
            format!("expected an object, found {}; using empty project info", type_name(value)),
        );
        return info;
    };

    let fields: [(&str, &mut String); 7] = [
        ("title", &mut info.title),
        ("projectName", &mut info.project_name),
        ("client", &mut info.client),
        ("date", &mut info.date),
        ("version", &mut info.version),
        ("preparedBy", &mut info.prepared_by),
        ("assumptions", &mut info.assumptions),
    ];
    for (key, slot) in fields {
        match map.get(key) {
            None | Some(Value::Null) => {}
            Some(v) => match scalar_text(v) {
                Some(text) => *slot = text,
                None => issues.recovered(
                    format!("projectInfo.{key}"),
                    IssueKind::InvalidFieldValue,
                    format!("expected text, found {}", type_name(v)),
                ),
            },
        }
    }

    info
}

fn coerce_team_size(summary: Option<&Value>, issues: &mut Issues) -> u32 {
    let Some(raw) = summary.and_then(|s| s.get("recommendedTeamSize")) else {
        return 1;
    };

    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(size) if size.is_finite() && size >= 1.0 => {
            size.ceil().min(f64::from(u32::MAX)) as u32
        }
        Some(size) if size.is_finite() && size > 0.0 => 1,
        _ => {
            issues.recovered(
                "summary.recommendedTeamSize",
                IssueKind::InvalidFieldValue,
                format!("expected a positive number, found {raw}; using 1"),
            );
            1
        }
    }
}

fn coerce_risks(value: Option<&Value>, issues: &mut Issues) -> Vec<Risk> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.recovered(
                "risks",
                IssueKind::InvalidFieldValue,
                format!("expected an array, found {}; ignoring", type_name(other)),
            );
            return Vec::new();
        }
    };

    let mut risks = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("risks[{i}]");
        match item {
            Value::String(text) if !text.trim().is_empty() => risks.push(Risk::new(text.trim())),
            Value::Object(map) => match coerce_risk(map) {
                Some(risk) => risks.push(risk),
                None => issues.recovered(
                    format!("{path}.description"),
                    IssueKind::MissingRequiredField,
                    "risk has no description; dropped",
                ),
            },
            other => issues.recovered(
                path,
                IssueKind::InvalidFieldValue,
                format!("expected an object or text, found {}; dropped", type_name(other)),
            ),
        }
    }
    risks
}

fn coerce_risk(map: &Map<String, Value>) -> Option<Risk> {
    let description = ["description", "risk"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(scalar_text))
        .find(|text| !text.is_empty())?;

    let text = |key: &str| map.get(key).and_then(scalar_text).unwrap_or_default();
    let extra = map
        .iter()
        .filter(|(key, _)| !RISK_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(Risk {
        description,
        phase: text("phase"),
        impact: text("impact"),
        mitigation: text("mitigation"),
        extra,
    })
}

fn coerce_recommendations(value: Option<&Value>, issues: &mut Issues) -> Vec<Recommendation> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.recovered(
                "recommendations",
                IssueKind::InvalidFieldValue,
                format!("expected an array, found {}; ignoring", type_name(other)),
            );
            return Vec::new();
        }
    };

    let mut recommendations = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(text) if !text.trim().is_empty() => {
                recommendations.push(Recommendation::Text(text.trim().to_string()));
            }
            Value::Object(map) => recommendations.push(Recommendation::Structured(map.clone())),
            other => issues.recovered(
                format!("recommendations[{i}]"),
                IssueKind::InvalidFieldValue,
                format!("expected text or an object, found {}; dropped", type_name(other)),
            ),
        }
    }
    recommendations
}

fn coerce_phases(items: &[Value], issues: &mut Issues) -> Vec<Phase> {
    let mut phases = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("phases[{i}]");
        let Some(map) = item.as_object() else {
            issues.recovered(
                path,
                IssueKind::InvalidFieldValue,
                format!("expected an object, found {}; skipped", type_name(item)),
            );
            continue;
        };
        phases.push(coerce_phase(map, &path, issues));
    }
    phases
}

fn coerce_phase(map: &Map<String, Value>, path: &str, issues: &mut Issues) -> Phase {
    let name = match map.get("name").and_then(scalar_text) {
        Some(name) if !name.is_empty() => name,
        _ => {
            issues.recovered(
                format!("{path}.name"),
                IssueKind::MissingRequiredField,
                format!("phase has no name; using '{DEFAULT_PHASE_NAME}'"),
            );
            DEFAULT_PHASE_NAME.to_string()
        }
    };

    let tasks = match map.get("tasks") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let mut tasks = Vec::with_capacity(items.len());
            for (j, item) in items.iter().enumerate() {
                let task_path = format!("{path}.tasks[{j}]");
                match item.as_object() {
                    Some(task) => tasks.push(coerce_task(task, &task_path, issues)),
                    None => issues.recovered(
                        task_path,
                        IssueKind::InvalidFieldValue,
                        format!("expected an object, found {}; skipped", type_name(item)),
                    ),
                }
            }
            tasks
        }
        Some(other) => {
            issues.recovered(
                format!("{path}.tasks"),
                IssueKind::InvalidFieldValue,
                format!("expected an array, found {}; treating as empty", type_name(other)),
            );
            Vec::new()
        }
    };

    let phase = Phase::new(name, tasks);
    if phase.canonical().is_none() {
        debug!(phase = %phase.name, "Phase name outside the canonical vocabulary");
    }
    phase
}

fn coerce_task(map: &Map<String, Value>, path: &str, issues: &mut Issues) -> Task {
    let task_name = match map.get("taskName").and_then(scalar_text) {
        Some(name) if !name.is_empty() => name,
        _ => {
            issues.recovered(
                format!("{path}.taskName"),
                IssueKind::MissingRequiredField,
                format!("task has no name; using '{DEFAULT_TASK_NAME}'"),
            );
            DEFAULT_TASK_NAME.to_string()
        }
    };

    let resource = map
        .get("resource")
        .and_then(scalar_text)
        .unwrap_or_default();

    let min_hours = coerce_hours(map.get("minHours"), &format!("{path}.minHours"), issues);
    let mut max_hours = coerce_hours(map.get("maxHours"), &format!("{path}.maxHours"), issues);
    if max_hours < min_hours {
        issues.recovered(
            format!("{path}.maxHours"),
            IssueKind::InvalidFieldValue,
            format!("maxHours {max_hours} is below minHours {min_hours}; raised to {min_hours}"),
        );
        max_hours = min_hours;
    }

    Task {
        task_name,
        resource,
        min_hours,
        max_hours,
        start_date: coerce_date(map.get("startDate"), &format!("{path}.startDate"), issues),
        end_date: coerce_date(map.get("endDate"), &format!("{path}.endDate"), issues),
        status: coerce_status(map.get("status"), path, issues),
    }
}

/// Numbers, numeric strings, or strings with a leading number (`"16h"`),
/// rounded to hundredths. Anything else becomes 0. Negative values clamp
/// to 0.
fn coerce_hours(value: Option<&Value>, path: &str, issues: &mut Issues) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => {
            issues.recovered(path, IssueKind::MissingRequiredField, "missing; using 0");
            return 0.0;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_hours_text(s),
        Some(_) => None,
    };

    match parsed {
        Some(hours) if hours.is_finite() && hours >= 0.0 => quantize_hours(hours),
        Some(hours) if hours.is_finite() => {
            issues.recovered(
                path,
                IssueKind::InvalidFieldValue,
                format!("negative value {hours}; clamped to 0"),
            );
            0.0
        }
        _ => {
            let shown = value.map(ToString::to_string).unwrap_or_default();
            issues.recovered(
                path,
                IssueKind::InvalidFieldValue,
                format!("not a number: {shown}; using 0"),
            );
            0.0
        }
    }
}

fn parse_hours_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if let Ok(hours) = trimmed.parse::<f64>() {
        return Some(hours);
    }
    LEADING_NUMBER
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// `YYYY-MM-DD` dates pass through; anything else becomes "".
fn coerce_date(value: Option<&Value>, path: &str, issues: &mut Issues) -> String {
    let text = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(s)) => s.trim(),
        Some(other) => {
            issues.recovered(
                path,
                IssueKind::InvalidFieldValue,
                format!("expected a YYYY-MM-DD date, found {}; cleared", type_name(other)),
            );
            return String::new();
        }
    };

    if text.is_empty() {
        return String::new();
    }
    if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok() {
        return text.to_string();
    }

    issues.recovered(
        path,
        IssueKind::InvalidFieldValue,
        format!("'{text}' is not a YYYY-MM-DD date; cleared"),
    );
    String::new()
}

/// Known tokens are normalized to canonical spelling; unknown tokens pass
/// through and are logged. A non-text status is replaced by the default.
fn coerce_status(value: Option<&Value>, path: &str, issues: &mut Issues) -> String {
    let token = match value {
        None | Some(Value::Null) => return DEFAULT_STATUS.to_string(),
        Some(Value::String(s)) => s.trim(),
        Some(other) => {
            issues.recovered(
                format!("{path}.status"),
                IssueKind::InvalidFieldValue,
                format!("expected text, found {}; using '{DEFAULT_STATUS}'", type_name(other)),
            );
            return DEFAULT_STATUS.to_string();
        }
    };
    if token.is_empty() {
        return DEFAULT_STATUS.to_string();
    }
    match canonical_status(token) {
        Some(known) => known.to_string(),
        None => {
            warn!(task = %path, status = %token, "Unrecognized task status passed through");
            token.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimator_utils::test_support::WELL_FORMED_RESPONSE;
    use serde_json::json;

    fn paths(issues: &[FieldIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_well_formed_document() {
        let value: Value = serde_json::from_str(WELL_FORMED_RESPONSE).unwrap();
        let coerced = coerce(&value).unwrap();
        let doc = coerced.document;

        assert!(coerced.issues.is_empty(), "{:?}", coerced.issues);
        assert_eq!(doc.project_info.project_name, "Inventory Portal");
        assert_eq!(doc.project_info.prepared_by, "Delivery Team");
        assert_eq!(doc.phases.len(), 2);
        assert_eq!(doc.phases[0].tasks.len(), 2);
        assert_eq!(doc.phases[1].tasks[0].status, "In Progress");
        assert_eq!(doc.summary.recommended_team_size, 3);
        assert_eq!(doc.risks[0].description, "Stock rules are not documented");
        assert_eq!(doc.risks[0].impact, "Medium");
        assert_eq!(doc.recommendations.len(), 2);
    }

    #[test]
    fn test_max_below_min_is_raised() {
        let value = json!({"phases":[{"name":"Development Phase","tasks":[
            {"taskName":"Build API","minHours":20,"maxHours":10}
        ]}]});
        let coerced = coerce(&value).unwrap();
        let task = &coerced.document.phases[0].tasks[0];
        assert_eq!(task.min_hours, 20.0);
        assert_eq!(task.max_hours, 20.0);
        assert_eq!(paths(&coerced.issues), vec!["phases[0].tasks[0].maxHours"]);
        assert!(coerced.issues[0].recovered);
    }

    #[test]
    fn test_missing_phases_is_fatal_and_lists_all_issues() {
        let value = json!({"projectInfo": "oops", "risks": 7});
        let err = coerce(&value).unwrap_err();
        match &err {
            RecoveryError::MissingRequiredField { path, issues } => {
                assert_eq!(path, "phases");
                assert_eq!(paths(issues), vec!["projectInfo", "risks", "phases"]);
                assert!(!issues[2].recovered);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_phases_not_array_is_fatal() {
        let err = coerce(&json!({"phases": {"name": "X"}})).unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::InvalidFieldValue { ref path, .. } if path == "phases"
        ));
    }

    #[test]
    fn test_root_not_object_is_fatal() {
        let err = coerce(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, RecoveryError::InvalidFieldValue { ref path, .. } if path == "$"));
    }

    #[test]
    fn test_empty_phases_is_valid() {
        let coerced = coerce(&json!({"phases": []})).unwrap();
        assert!(coerced.document.phases.is_empty());
        assert_eq!(coerced.document.summary.recommended_team_size, 1);
        assert!(coerced.issues.is_empty());
    }

    #[test]
    fn test_phase_without_tasks_is_retained() {
        let coerced = coerce(&json!({"phases": [{"name": "Documentation"}]})).unwrap();
        assert_eq!(coerced.document.phases.len(), 1);
        assert!(coerced.document.phases[0].tasks.is_empty());
        assert!(coerced.issues.is_empty());
    }

    #[test]
    fn test_missing_names_are_defaulted() {
        let value = json!({"phases": [{"tasks": [{"minHours": 1, "maxHours": 2}]}]});
        let coerced = coerce(&value).unwrap();
        let phase = &coerced.document.phases[0];
        assert_eq!(phase.name, "General");
        assert_eq!(phase.tasks[0].task_name, "Untitled task");
        assert_eq!(
            paths(&coerced.issues),
            vec!["phases[0].name", "phases[0].tasks[0].taskName"]
        );
        assert!(
            coerced
                .issues
                .iter()
                .all(|i| i.kind == IssueKind::MissingRequiredField)
        );
    }

    #[test]
    fn test_hours_coercion() {
        let value = json!({"phases": [{"name": "Testing", "tasks": [
            {"taskName": "a", "minHours": "16h", "maxHours": " 24.5 "},
            {"taskName": "b", "minHours": -4, "maxHours": "lots"},
            {"taskName": "c", "minHours": true},
            {"taskName": "d", "minHours": 2.5, "maxHours": 2.5},
            {"taskName": "e", "minHours": 0.333, "maxHours": "1.125h"}
        ]}]});
        let coerced = coerce(&value).unwrap();
        let tasks = &coerced.document.phases[0].tasks;

        assert_eq!((tasks[0].min_hours, tasks[0].max_hours), (16.0, 24.5));
        assert_eq!((tasks[1].min_hours, tasks[1].max_hours), (0.0, 0.0));
        assert_eq!((tasks[2].min_hours, tasks[2].max_hours), (0.0, 0.0));
        assert_eq!((tasks[3].min_hours, tasks[3].max_hours), (2.5, 2.5));
        assert_eq!((tasks[4].min_hours, tasks[4].max_hours), (0.33, 1.13));
        assert_eq!(
            paths(&coerced.issues),
            vec![
                "phases[0].tasks[1].minHours",
                "phases[0].tasks[1].maxHours",
                "phases[0].tasks[2].minHours",
                "phases[0].tasks[2].maxHours",
            ]
        );
    }

    #[test]
    fn test_status_handling() {
        let value = json!({"phases": [{"name": "Development", "tasks": [
            {"taskName": "a", "minHours": 1, "maxHours": 1},
            {"taskName": "b", "minHours": 1, "maxHours": 1, "status": "completed"},
            {"taskName": "c", "minHours": 1, "maxHours": 1, "status": "Deferred"},
            {"taskName": "d", "minHours": 1, "maxHours": 1, "status": 3}
        ]}]});
        let mut coerced = coerce(&value).unwrap();
        let tasks = coerced.document.phases.remove(0).tasks;
        let statuses: Vec<&str> = tasks.iter().map(|t| t.status.as_str()).collect();
        assert_eq!(
            statuses,
            vec!["Not Started", "Completed", "Deferred", "Not Started"]
        );

        assert_eq!(paths(&coerced.issues), vec!["phases[0].tasks[3].status"]);
        let issue = &coerced.issues[0];
        assert_eq!(issue.kind, IssueKind::InvalidFieldValue);
        assert!(issue.recovered);
        assert!(issue.message.contains("number"));
    }

    #[test]
    fn test_dates() {
        let value = json!({"phases": [{"name": "Database", "tasks": [
            {"taskName": "a", "minHours": 1, "maxHours": 1,
             "startDate": "2025-02-03", "endDate": "next week"},
            {"taskName": "b", "minHours": 1, "maxHours": 1, "startDate": "2025-02-30"}
        ]}]});
        let coerced = coerce(&value).unwrap();
        let tasks = &coerced.document.phases[0].tasks;
        assert_eq!(tasks[0].start_date, "2025-02-03");
        assert_eq!(tasks[0].end_date, "");
        assert_eq!(tasks[1].start_date, "");
        assert_eq!(tasks[1].end_date, "");
        assert_eq!(
            paths(&coerced.issues),
            vec!["phases[0].tasks[0].endDate", "phases[0].tasks[1].startDate"]
        );
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let value = json!({"phases": [
            "Planning",
            {"name": "Development", "tasks": ["Build API", {"taskName": "Ship", "minHours": 1, "maxHours": 2}]}
        ]});
        let coerced = coerce(&value).unwrap();
        assert_eq!(coerced.document.phases.len(), 1);
        assert_eq!(coerced.document.phases[0].tasks.len(), 1);
        assert_eq!(
            paths(&coerced.issues),
            vec!["phases[0]", "phases[1].tasks[0]"]
        );
    }

    #[test]
    fn test_project_info_stringifies_numbers() {
        let value = json!({"projectInfo": {"version": 1.5, "client": "Acme", "date": ["x"]}, "phases": []});
        let coerced = coerce(&value).unwrap();
        let info = coerced.document.project_info;
        assert_eq!(info.version, "1.5");
        assert_eq!(info.client, "Acme");
        assert_eq!(info.date, "");
        assert_eq!(paths(&coerced.issues), vec!["projectInfo.date"]);
    }

    #[test]
    fn test_team_size_variants() {
        let size = |raw: Value| {
            coerce(&json!({"phases": [], "summary": {"recommendedTeamSize": raw}}))
                .unwrap()
                .document
                .summary
                .recommended_team_size
        };
        assert_eq!(size(json!(4)), 4);
        assert_eq!(size(json!("5")), 5);
        assert_eq!(size(json!(2.2)), 3);
        assert_eq!(size(json!(0)), 1);
        assert_eq!(size(json!(-3)), 1);
        assert_eq!(size(json!("a few")), 1);
    }

    #[test]
    fn test_risks_and_recommendations() {
        let value = json!({
            "phases": [],
            "risks": [
                "Vendor delay",
                {"description": "Key person leaves", "owner": "HR"},
                {"impact": "High"},
                42
            ],
            "recommendations": ["Start small", {"title": "Hire QA"}, null]
        });
        let coerced = coerce(&value).unwrap();
        let doc = coerced.document;

        assert_eq!(doc.risks.len(), 2);
        assert_eq!(doc.risks[0].description, "Vendor delay");
        assert_eq!(doc.risks[1].extra.get("owner"), Some(&json!("HR")));
        assert_eq!(doc.recommendations.len(), 2);
        assert_eq!(
            paths(&coerced.issues),
            vec!["risks[2].description", "risks[3]", "recommendations[2]"]
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let value = json!({"phases": [], "grandTotal": "Grand Total", "extra": {"x": 1}});
        let coerced = coerce(&value).unwrap();
        assert!(coerced.issues.is_empty());
    }
}
