use crate::gateway::FunctionResponse;
use kokoro_entity::journal_entry::{Insights, Tags};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

fn decode_entities(values: &mut [String]) {
    for value in values {
        *value = html_escape::decode_html_entities(value).to_string();
    }
}

/// Structured analysis of one journal entry. The wire keys follow the
/// function-call contract (camelCase), validated here once so the rest of the
/// system only ever sees typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAnalysis {
    #[serde(default)]
    pub tags: Vec<String>,
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

impl EntryAnalysis {
    #[must_use]
    pub fn into_parts(self) -> (Tags, Insights) {
        (
            Tags(self.tags),
            Insights {
                emotional_state: self.emotional_state,
                themes: self.themes,
                suggested_actions: self.suggested_actions,
            },
        )
    }
}

impl FunctionResponse for EntryAnalysis {
    fn function_name() -> &'static str {
        "record_entry_analysis"
    }

    fn function_description() -> &'static str {
        "Records the analysis of a journal entry: relevant tags, the primary emotional state, the main themes and suggested supportive actions."
    }

    fn function_definition() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "3-5 relevant tags for the entry."
                },
                "emotionalState": {
                    "type": "string",
                    "description": "The primary emotional state, e.g. \"anxious\", \"hopeful\", \"content\"."
                },
                "themes": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "2-3 main themes identified in the entry."
                },
                "suggestedActions": {
                    "type": "array",
                    "items": { "type": "string", "enum": ["affirmation", "script", "coach"] },
                    "description": "Supportive follow-up actions that fit the entry."
                }
            },
            "required": ["tags", "emotionalState", "themes"]
        })
    }

    fn fix_escapes(&mut self) {
        decode_entities(&mut self.tags);
        decode_entities(&mut self.themes);
        decode_entities(&mut self.suggested_actions);
        if let Some(state) = &self.emotional_state {
            self.emotional_state = Some(html_escape::decode_html_entities(state).to_string());
        }
    }
}

/// A batch of generated affirmations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffirmationBatch {
    #[serde(default)]
    pub affirmations: Vec<String>,
}

impl FunctionResponse for AffirmationBatch {
    fn function_name() -> &'static str {
        "record_affirmations"
    }

    fn function_description() -> &'static str {
        "Records the generated list of positive affirmations."
    }

    fn function_definition() -> Value {
        json!({
            "type": "object",
            "properties": {
                "affirmations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "The affirmations, each a single concise first-person sentence."
                }
            },
            "required": ["affirmations"]
        })
    }

    fn fix_escapes(&mut self) {
        decode_entities(&mut self.affirmations);
    }
}

pub(crate) fn analysis_prompt(content: &str, mood: &str) -> String {
    format!(
        "\
Analyze the following journal entry and provide insights.

Journal entry:
{content}

Mood: {mood}

Focus on:
1. Identifying key emotions and patterns
2. Recognizing areas of growth or concern
3. Suggesting appropriate supportive actions
4. Being empathetic and constructive

Record the analysis with the function call you were given: 3-5 relevant tags, \
the primary emotional state, 2-3 main themes, and suggested actions chosen \
from \"affirmation\", \"script\" and \"coach\"."
    )
}

pub(crate) fn affirmation_prompt(context: &str, count: usize, style: &str, tone: &str) -> String {
    format!(
        "\
Generate {count} positive affirmations based on the following context:

Context: {context}
Style: {style}
Tone: {tone}

Requirements:
1. Create powerful, personal affirmations in first person (I am, I have, I can)
2. Make them specific to the given context
3. Keep them concise and memorable
4. Make them positive and present-tense
5. Match the requested style (e.g. motivational = energetic and action-oriented)
6. Match the requested tone (e.g. powerful = strong and assertive, gentle = soft and nurturing)

Record the affirmations with the function call you were given."
    )
}
