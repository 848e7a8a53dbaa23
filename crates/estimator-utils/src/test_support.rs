//! Fixtures shared by tests across the workspace.
//!
//! Enabled with the `test-utils` feature.

const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn make_from(alphabet: &[u8], len: usize, seed: usize) -> String {
    let mut output = String::with_capacity(len);
    let mut idx = seed % alphabet.len();

    for _ in 0..len {
        output.push(alphabet[idx] as char);
        idx = (idx + 7) % alphabet.len();
    }

    output
}

/// Check whether tests against a real provider should run.
///
/// `ESTIMATOR_SKIP_LLM_TESTS=1` always disables them.
/// `ESTIMATOR_REAL_LLM_TESTS=1` enables them.
#[must_use]
pub fn llm_tests_enabled() -> bool {
    let flag = |name: &str| {
        std::env::var(name)
            .ok()
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
    if flag("ESTIMATOR_SKIP_LLM_TESTS") {
        return false;
    }
    flag("ESTIMATOR_REAL_LLM_TESTS")
}

/// Synthetic Groq-shaped key, never a real credential.
pub fn groq_api_key() -> String {
    format!("gsk_{}", make_from(ALNUM, 40, 3))
}

/// Synthetic Anthropic-shaped key, never a real credential.
pub fn anthropic_api_key() -> String {
    format!("sk-ant-{}", make_from(ALNUM, 40, 11))
}

/// A complete, well-formed model answer.
///
/// Task hours sum to 64 min / 96 max over three tasks in two phases. The
/// model's own summary deliberately disagrees with the task data.
pub const WELL_FORMED_RESPONSE: &str = r#"{
  "projectInfo": {
    "title": "Inventory Portal Estimate",
    "projectName": "Inventory Portal",
    "client": "Acme Logistics",
    "date": "2025-01-06",
    "version": "1.0",
    "preparedBy": "Delivery Team",
    "assumptions": "Single warehouse, existing ERP exposes a REST API"
  },
  "phases": [
    {
      "name": "PLANNING & ANALYSIS PHASE",
      "tasks": [
        {
          "taskName": "Gather requirements",
          "resource": "Business Analyst",
          "minHours": 16,
          "maxHours": 24,
          "startDate": "2025-01-06",
          "endDate": "2025-01-10",
          "status": "Not Started"
        },
        {
          "taskName": "Define scope",
          "resource": "Project Manager",
          "minHours": 8,
          "maxHours": 12,
          "startDate": "2025-01-08",
          "endDate": "2025-01-10",
          "status": "Not Started"
        }
      ],
      "subtotal": "Planning Subtotal"
    },
    {
      "name": "DEVELOPMENT PHASE",
      "tasks": [
        {
          "taskName": "Build inventory API",
          "resource": "Backend Developer",
          "minHours": 40,
          "maxHours": 60,
          "startDate": "2025-01-13",
          "endDate": "2025-01-24",
          "status": "In Progress"
        }
      ],
      "subtotal": "Development Subtotal"
    }
  ],
  "grandTotal": "Grand Total",
  "summary": {
    "totalMinHours": 1000,
    "totalMaxHours": 2000,
    "estimatedDurationWeeks": 12,
    "recommendedTeamSize": 3,
    "totalTasks": 9,
    "totalPhases": 10
  },
  "risks": [
    {
      "risk": "Stock rules are not documented",
      "phase": "Planning & Analysis",
      "impact": "Medium",
      "mitigation": "Run a workshop with warehouse staff"
    }
  ],
  "recommendations": [
    "Pilot with a single warehouse before rollout",
    "Automate ERP sync tests early"
  ]
}"#;

/// Model answer wrapped in prose and a ```json fence.
pub const FENCED_RESPONSE: &str = "Here is the result:\n```json\n{\"phases\":[]}\n```\nLet me know if needed.";

/// Model answer cut off mid-task with three containers still open.
pub const TRUNCATED_RESPONSE: &str =
    r#"{"phases":[{"name":"X","tasks":[{"taskName":"A","minHours":5,"maxHours":8}"#;

/// Model answer with trailing commas before closing brackets.
pub const TRAILING_COMMA_RESPONSE: &str = r#"{"phases":[{"name":"Testing & QA","tasks":[{"taskName":"Write tests","minHours":4,"maxHours":6,},],},],}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_keys_have_provider_prefixes() {
        assert!(groq_api_key().starts_with("gsk_"));
        assert!(anthropic_api_key().starts_with("sk-ant-"));
        assert_eq!(groq_api_key(), groq_api_key());
    }

    #[test]
    fn test_well_formed_response_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(WELL_FORMED_RESPONSE).unwrap();
        assert_eq!(value["phases"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_fixtures_do_not_parse() {
        assert!(serde_json::from_str::<serde_json::Value>(TRUNCATED_RESPONSE).is_err());
        assert!(serde_json::from_str::<serde_json::Value>(TRAILING_COMMA_RESPONSE).is_err());
    }
}
