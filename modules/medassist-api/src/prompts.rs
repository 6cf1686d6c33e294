//! Prompt templates keyed by task and language.
//!
//! Templates use `{name}` placeholders. Lookups for a language without a
//! template fall back to English, so selection never fails.

use std::sync::LazyLock;

use medassist_common::{AnalysisFindings, Language, MedAssistError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Chat,
    TextAnalysis,
    ImageAnalysis,
    TextExtraction,
    ResearchSummary,
}

impl Task {
    pub const ALL: [Task; 5] = [
        Task::Chat,
        Task::TextAnalysis,
        Task::ImageAnalysis,
        Task::TextExtraction,
        Task::ResearchSummary,
    ];

    /// Placeholders every template for this task must contain.
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            Task::Chat => &["question"],
            Task::TextAnalysis => &["context", "text", "format_instructions"],
            Task::ImageAnalysis => &["context", "format_instructions"],
            Task::TextExtraction => &[],
            Task::ResearchSummary => &["query", "sources"],
        }
    }
}

pub const FALLBACK_LANGUAGE: Language = Language::En;

static TEMPLATES: &[(Task, Language, &str)] = &[
    (
        Task::Chat,
        Language::En,
        "You are a medical AI assistant. Answer the following question in English, \
clearly and accurately. Remind the user to consult a healthcare professional for \
decisions about their own care.

Question: {question}

Answer:",
    ),
    (
        Task::Chat,
        Language::Fr,
        "Vous êtes un assistant médical IA. Répondez à la question suivante en français, \
de manière claire et précise. Rappelez à l'utilisateur de consulter un professionnel \
de santé pour toute décision concernant ses propres soins.

Question : {question}

Réponse :",
    ),
    (
        Task::TextAnalysis,
        Language::En,
        "Analyze the following medical text and provide a summary, key findings, \
recommendations, and next steps. Write every value in English.

Context: {context}

Text: {text}

{format_instructions}",
    ),
    (
        Task::TextAnalysis,
        Language::Fr,
        "Analysez le texte médical suivant et fournissez un résumé, les principales \
conclusions, les recommandations et les prochaines étapes. Rédigez toutes les valeurs \
en français.

Contexte : {context}

Texte : {text}

{format_instructions}",
    ),
    (
        Task::ImageAnalysis,
        Language::En,
        "Analyze the attached medical image and provide a summary, key findings, \
recommendations, and next steps. Write every value in English.

Context: {context}

{format_instructions}",
    ),
    (
        Task::ImageAnalysis,
        Language::Fr,
        "Analysez l'image médicale jointe et fournissez un résumé, les principales \
conclusions, les recommandations et les prochaines étapes. Rédigez toutes les valeurs \
en français.

Contexte : {context}

{format_instructions}",
    ),
    (
        Task::TextExtraction,
        Language::En,
        "Extract all readable text from this image. Preserve line breaks and reading \
order. Return only the extracted text, without commentary.",
    ),
    (
        Task::TextExtraction,
        Language::Fr,
        "Extrayez tout le texte lisible de cette image. Conservez les retours à la ligne \
et l'ordre de lecture. Renvoyez uniquement le texte extrait, sans commentaire.",
    ),
    (
        Task::ResearchSummary,
        Language::En,
        "You are a medical research assistant. Using only the sources below, write a \
concise summary in English that answers the query. Cite sources by their number, \
for example [1].

Query: {query}

Sources:
{sources}

Summary:",
    ),
    (
        Task::ResearchSummary,
        Language::Fr,
        "Vous êtes un assistant de recherche médicale. En vous appuyant uniquement sur les \
sources ci-dessous, rédigez en français un résumé concis qui répond à la requête. Citez \
les sources par leur numéro, par exemple [1].

Requête : {query}

Sources :
{sources}

Résumé :",
    ),
];

fn lookup(task: Task, language: Language) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(t, l, _)| *t == task && *l == language)
        .map(|(_, _, template)| *template)
}

/// Check that every task has a template in every language and that each
/// template carries the task's placeholders. Run once at startup.
pub fn verify_templates() -> Result<()> {
    for task in Task::ALL {
        for language in Language::ALL {
            let template = lookup(task, language).ok_or_else(|| {
                MedAssistError::Config(format!("no {task:?} prompt for language {language}"))
            })?;
            let missing = missing_placeholders(task, template);
            if !missing.is_empty() {
                return Err(MedAssistError::Config(format!(
                    "{task:?}/{language} prompt is missing placeholders: {}",
                    missing.join(", ")
                )));
            }
        }
    }
    Ok(())
}

fn missing_placeholders(task: Task, template: &str) -> Vec<&'static str> {
    let found = placeholders(template);
    task.placeholders()
        .iter()
        .copied()
        .filter(|required| !found.contains(required))
        .collect()
}

/// Template for a task in a supported language.
pub fn template(task: Task, language: Language) -> &'static str {
    lookup(task, language)
        .or_else(|| lookup(task, FALLBACK_LANGUAGE))
        .unwrap_or_default()
}

/// Template for a task given a free-form language tag. Unsupported tags get English.
pub fn select(task: Task, tag: &str) -> &'static str {
    template(task, Language::from_tag(tag))
}

static FORMAT_INSTRUCTIONS: LazyLock<String> = LazyLock::new(|| {
    let schema = ai_client::json_schema::<AnalysisFindings>();
    let schema = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string());
    format!(
        "Respond with a single JSON object that conforms to the JSON schema below. \
Do not include any text outside the JSON object.\n```json\n{schema}\n```"
    )
});

/// Instructions describing the JSON object an analysis prompt must return.
pub fn format_instructions() -> &'static str {
    &FORMAT_INSTRUCTIONS
}

/// Fill `{name}` placeholders in a single pass.
///
/// Braces that do not enclose a known identifier are copied through, and
/// substituted values are never scanned again.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let name = identifier_prefix(after);

        if !name.is_empty() && after[name.len()..].starts_with('}') {
            if let Some((_, value)) = vars.iter().find(|(k, _)| *k == name) {
                out.push_str(value);
                rest = &after[name.len() + 1..];
                continue;
            }
        }

        out.push('{');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Names of all `{name}` placeholders in a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let name = identifier_prefix(after);
        if !name.is_empty() && after[name.len()..].starts_with('}') {
            names.push(name);
        }
        rest = after;
    }

    names
}

fn identifier_prefix(s: &str) -> &str {
    let len = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    &s[..len]
}
