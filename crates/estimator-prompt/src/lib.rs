//! Estimation prompt construction
//!
//! Builds the single instruction prompt sent to the model: the document
//! text, the estimation criteria, the ten canonical phases, and the JSON
//! shape the recovery layer expects back.

use estimator_model::{CanonicalPhase, KNOWN_STATUSES};

/// Placeholder replaced by the extracted document text.
pub const DOCUMENT_PLACEHOLDER: &str = "{document_content}";

const PREAMBLE: &str = "You are an expert software project manager and technical lead with \
extensive experience in project estimation and planning. Analyze the following project \
specification document and provide a detailed breakdown with accurate estimations organized \
by project phases.";

const INSTRUCTIONS: [&str; 7] = [
    "Carefully read and understand the entire project specification",
    "Identify all major features, modules, and components",
    "Break down the project into logical phases and tasks within each phase",
    "Organize tasks according to standard software development phases",
    "Provide realistic time estimations based on industry standards",
    "Consider technical complexity, dependencies, and potential risks",
    "Include all necessary skills and expertise required for each task",
];

const CRITERIA: [&str; 7] = [
    "Use person-hours for all estimates",
    "minHours: optimistic scenario (best case)",
    "maxHours: pessimistic scenario including potential issues",
    "Hours are plain numbers, never text",
    "Include the specific resource or skill required for each task",
    "Dates use the YYYY-MM-DD format",
    "Tasks start as \"Not Started\" unless the document says otherwise",
];

const GUIDELINES: [&str; 6] = [
    "Place every task in the phase it belongs to; omit phases with no tasks",
    "Consider dependencies between phases and tasks when choosing dates",
    "Include a risk assessment with a mitigation for each risk",
    "Base estimates on the requirements actually stated in the document",
    "Return only the JSON object, with no commentary before or after it",
    "Make sure the JSON is complete and every bracket is closed",
];

/// Prompt template with a single [`DOCUMENT_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::estimation()
    }
}

impl PromptTemplate {
    /// The standard project-estimation template.
    #[must_use]
    pub fn estimation() -> Self {
        let mut text = String::new();
        text.push_str(PREAMBLE);
        text.push_str("\n\nDOCUMENT:\n");
        text.push_str(DOCUMENT_PLACEHOLDER);

        text.push_str("\n\nINSTRUCTIONS:\n");
        for (i, line) in INSTRUCTIONS.iter().enumerate() {
            text.push_str(&format!("{}. {line}\n", i + 1));
        }

        text.push_str("\nESTIMATION CRITERIA:\n");
        push_bullets(&mut text, &CRITERIA);

        text.push_str("\nPHASES TO CONSIDER:\n");
        for phase in CanonicalPhase::ALL {
            text.push_str(&format!("- {} Phase: {}\n", phase.label(), phase.scope()));
        }

        text.push_str("\nReturn your response as a valid JSON object with the following structure:\n\n");
        text.push_str(&output_shape());

        text.push_str("\n\nIMPORTANT GUIDELINES:\n");
        push_bullets(&mut text, &GUIDELINES);

        Self { text }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Substitute the document text. Placeholder-like text inside the
    /// document is left alone.
    #[must_use]
    pub fn render(&self, document_content: &str) -> String {
        self.text.replacen(DOCUMENT_PLACEHOLDER, document_content, 1)
    }
}

/// Render the standard template for `document_content`.
#[must_use]
pub fn build_prompt(document_content: &str) -> String {
    PromptTemplate::estimation().render(document_content)
}

fn push_bullets(text: &mut String, lines: &[&str]) {
    for line in lines {
        text.push_str("- ");
        text.push_str(line);
        text.push('\n');
    }
}

fn output_shape() -> String {
    let statuses = KNOWN_STATUSES.join("/");
    let phases: Vec<String> = CanonicalPhase::ALL
        .iter()
        .map(|phase| {
            format!(
                r#"    {{
      "name": "{name} PHASE",
      "tasks": [
        {{
          "taskName": "Name of task",
          "resource": "Role required (e.g., UI Designer, Backend Developer)",
          "minHours": 0,
          "maxHours": 0,
          "startDate": "YYYY-MM-DD",
          "endDate": "YYYY-MM-DD",
          "status": "{statuses}"
        }}
      ],
      "subtotal": {{ "minHours": 0, "maxHours": 0 }}
    }}"#,
                name = phase.label().to_uppercase(),
            )
        })
        .collect();

    format!(
        r#"{{
  "projectInfo": {{
    "title": "Title of project or application",
    "projectName": "Name of project or application",
    "client": "Client name if specified",
    "date": "YYYY-MM-DD",
    "version": "1.0",
    "preparedBy": "Your name or team",
    "assumptions": "Key global assumptions for the project"
  }},
  "phases": [
{phases}
  ],
  "summary": {{
    "totalMinHours": 0,
    "totalMaxHours": 0,
    "estimatedDurationWeeks": 0,
    "recommendedTeamSize": 0,
    "totalTasks": 0,
    "totalPhases": 0
  }},
  "risks": [
    {{
      "risk": "Risk description",
      "phase": "Affected phase",
      "impact": "High/Medium/Low",
      "mitigation": "Mitigation strategy"
    }}
  ],
  "recommendations": [
    "Recommendation 1",
    "Recommendation 2"
  ]
}}"#,
        phases = phases.join(",\n")
    )
}
