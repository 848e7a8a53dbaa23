//! End-to-end recovery scenarios on raw model text

use estimator::{EstimatorError, ExitCode, Stage, recover};
use estimator_recovery::{RepairStep, normalize};
use estimator_utils::error::RecoveryError;
use estimator_utils::test_support::{
    FENCED_RESPONSE, TRAILING_COMMA_RESPONSE, TRUNCATED_RESPONSE, WELL_FORMED_RESPONSE,
};

#[test]
fn inverted_hours_are_raised_to_min() {
    let raw = r#"{"phases":[{"name":"Development Phase","tasks":[{"taskName":"Build API","minHours":20,"maxHours":10}]}]}"#;
    let recovery = recover(raw).unwrap();
    let doc = &recovery.document;

    let task = &doc.phases[0].tasks[0];
    assert_eq!(task.min_hours, 20.0);
    assert!(task.max_hours >= 20.0);
    assert_eq!(doc.phases[0].subtotal.min_hours, 20.0);
    assert_eq!(doc.phases[0].subtotal.max_hours, 20.0);
    assert_eq!(doc.summary.total_tasks, 1);
    assert_eq!(doc.summary.total_phases, 1);
    assert!(recovery.issues.iter().any(|issue| issue.path.ends_with("maxHours")));
}

#[test]
fn missing_phases_names_the_field() {
    let err = recover(r#"{"projectInfo":{"title":"Inventory"},"summary":{}}"#).unwrap_err();
    match &err {
        RecoveryError::MissingRequiredField { path, issues } => {
            assert_eq!(path, "phases");
            assert!(issues.iter().any(|issue| issue.path == "phases" && !issue.recovered));
        }
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }

    let err = EstimatorError::from(err);
    assert_eq!(err.stage(), Stage::Validate);
    assert_eq!(err.to_exit_code(), ExitCode::RECOVERY_FAILURE);
}

#[test]
fn fenced_empty_estimation() {
    assert_eq!(normalize(FENCED_RESPONSE).unwrap(), r#"{"phases":[]}"#);

    let doc = recover(FENCED_RESPONSE).unwrap().document;
    assert!(doc.phases.is_empty());
    assert_eq!(doc.summary.total_min_hours, 0.0);
    assert_eq!(doc.summary.total_max_hours, 0.0);
    assert_eq!(doc.summary.total_tasks, 0);
    assert_eq!(doc.summary.total_phases, 0);
    assert_eq!(doc.summary.estimated_duration_weeks, 0);
}

#[test]
fn truncated_payload_is_closed_in_nesting_order() {
    let recovery = recover(TRUNCATED_RESPONSE).unwrap();
    assert_eq!(recovery.repaired.steps, vec![RepairStep::CloseContainers]);
    assert!(recovery.repaired.text.ends_with("}]}]}"));

    let doc = &recovery.document;
    assert_eq!(doc.phases.len(), 1);
    assert_eq!(doc.phases[0].tasks.len(), 1);
    assert_eq!(doc.phases[0].tasks[0].task_name, "A");
    assert_eq!(doc.summary.total_max_hours, 8.0);
}

#[test]
fn trailing_commas_are_stripped() {
    let recovery = recover(TRAILING_COMMA_RESPONSE).unwrap();
    assert_eq!(recovery.repaired.steps, vec![RepairStep::StripTrailingCommas]);
    assert_eq!(recovery.document.phases[0].name, "Testing & QA");
    assert_eq!(recovery.document.summary.total_min_hours, 4.0);
}

#[test]
fn model_summary_is_recomputed() {
    let doc = recover(WELL_FORMED_RESPONSE).unwrap().document;
    let subtotal_max: f64 = doc.phases.iter().map(|p| p.subtotal.max_hours).sum();
    assert_eq!(doc.summary.total_max_hours, subtotal_max);
    assert_eq!(doc.summary.total_tasks, doc.task_count());
}

#[test]
fn prose_without_json_fails_in_normalize() {
    let err = recover("I'm sorry, I can't produce an estimate for this document.").unwrap_err();
    assert!(matches!(err, RecoveryError::NoJsonFound));
    assert_eq!(EstimatorError::from(err).stage(), Stage::Normalize);
}

#[test]
fn fractional_hours_total_the_same_in_any_order() {
    let forward = recover(
        r#"{"phases":[{"name":"Development","tasks":[
            {"taskName":"a","minHours":0.1,"maxHours":0.1},
            {"taskName":"b","minHours":0.2,"maxHours":0.2},
            {"taskName":"c","minHours":0.3,"maxHours":"0.3"}]}]}"#,
    )
    .unwrap()
    .document;
    let reversed = recover(
        r#"{"phases":[{"name":"Development","tasks":[
            {"taskName":"c","minHours":0.3,"maxHours":"0.3"},
            {"taskName":"b","minHours":0.2,"maxHours":0.2},
            {"taskName":"a","minHours":0.1,"maxHours":0.1}]}]}"#,
    )
    .unwrap()
    .document;

    assert_eq!(forward.summary.total_max_hours, 0.6);
    assert_eq!(forward.summary, reversed.summary);
    assert_eq!(forward.phases[0].subtotal, reversed.phases[0].subtotal);
}

#[test]
fn python_style_payload_is_recovered() {
    let raw = "Sure!\n{phases: [{'name': 'Development', tasks: [\
               {'taskName': 'Build API', 'minHours': 4, 'maxHours': 6, 'billable': True, 'owner': None}]}]}";
    let recovery = recover(raw).unwrap();

    assert_eq!(
        recovery.repaired.steps,
        vec![
            RepairStep::SingleQuotes,
            RepairStep::QuoteBareKeys,
            RepairStep::PythonLiterals
        ]
    );
    let doc = &recovery.document;
    assert_eq!(doc.phases[0].name, "Development");
    assert_eq!(doc.phases[0].tasks[0].task_name, "Build API");
    assert_eq!(doc.summary.total_max_hours, 6.0);
}

#[test]
fn truncated_mid_key_keeps_complete_phases() {
    let raw = r#"{"phases":[{"name":"Testing & QA","tasks":[{"taskName":"Write tests","minHours":4,"maxHours":6}]}],"summary":{"recommendedTe"#;
    let recovery = recover(raw).unwrap();

    assert!(
        recovery
            .repaired
            .steps
            .contains(&RepairStep::TrimIncompleteValue)
    );
    assert_eq!(recovery.document.phases.len(), 1);
    assert_eq!(recovery.document.summary.total_max_hours, 6.0);
    assert_eq!(recovery.document.summary.recommended_team_size, 1);
}
