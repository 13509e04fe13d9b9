use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use log::{ info, warn };

use crate::models::chat::{ Lang, Mode };

/// Separator placed between the mode instructions and the user's question.
pub const MESSAGE_SEPARATOR: &str = "\n\n---\n\n";
pub const QUESTION_LABEL: &str = "Întrebarea utilizatorului: ";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt file IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Prompt JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Prompt file defines no '{0}' template for language '{1}'")]
    MissingFallback(&'static str, &'static str),
    #[error("Prompt file defines a blank '{0}' template for language '{1}'")]
    EmptyTemplate(&'static str, &'static str),
}

const RO_VINDECARE: &str =
    "Modul VINDECARE activat.

Folosește DOAR informațiile din documentele Corpusului Triboi pentru:
- Codurile Universale (Observare, Acceptare, Iertare, Reconectare)
- Tehnici practice din cărți (respirație 4-6, grounding 5-4-3-2-1)
- Exemple și pași din metodologia Triboi

IMPORTANT:
- Citează din documente când e relevant
- Structurează în PAȘI numerotați (PASUL 1, PASUL 2, etc.)
- Menționează CODURILE TRIBOI folosite
- Oferă EXEMPLU FINAL concret

NU inventa informații care nu sunt în Corpusul Triboi!";

const RO_EDUCATIE: &str =
    "Modul EDUCAȚIE activat.

Folosește DOAR informațiile din documentele Corpusului Triboi pentru:
- 41+17 Coduri CET (Coduri Educaționale Triboi)
- Educația ca antidot al crizelor
- Metode practice pentru profesori/părinți/elevi

NU inventa coduri sau metode care nu sunt în documente!";

const RO_PERFORMANTA: &str =
    "Modul PERFORMANȚĂ activat.

Folosește DOAR informațiile din documentele Corpusului Triboi pentru:
- Leadership conștient
- Simbioza Umanistă
- Tehnici pentru sportivi și echipe

NU inventa principii care nu sunt în Corpusul Triboi!";

const EN_VINDECARE: &str =
    "HEALING mode activated.

Use ONLY information from Triboi Corpus documents for:
- Universal Codes (Observation, Acceptance, Forgiveness, Reconnection)
- Practical techniques from books (4-6 breathing, 5-4-3-2-1 grounding)
- Examples and steps from Triboi methodology

DO NOT invent information not in Triboi Corpus!";

const EN_EDUCATIE: &str =
    "EDUCATION mode activated.

Use ONLY information from Triboi Corpus for CET Codes and educational methods.

DO NOT invent codes not in documents!";

const EN_PERFORMANTA: &str =
    "PERFORMANCE mode activated.

Use ONLY information from Triboi Corpus for conscious leadership and symbiosis.

DO NOT invent principles not in Triboi Corpus!";

/// Override file layout: `{ "ro": { "vindecare": "...", ... }, "en": { ... } }`.
/// Unknown language or mode keys are ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PromptConfig {
    #[serde(flatten)]
    pub languages: HashMap<String, HashMap<String, String>>,
}

/// Mode instructions keyed by (lang, mode). Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    templates: HashMap<(Lang, Mode), String>,
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptRegistry {
    pub fn builtin() -> Self {
        let templates = [
            ((Lang::Ro, Mode::Vindecare), RO_VINDECARE),
            ((Lang::Ro, Mode::Educatie), RO_EDUCATIE),
            ((Lang::Ro, Mode::Performanta), RO_PERFORMANTA),
            ((Lang::En, Mode::Vindecare), EN_VINDECARE),
            ((Lang::En, Mode::Educatie), EN_EDUCATIE),
            ((Lang::En, Mode::Performanta), EN_PERFORMANTA),
        ]
            .into_iter()
            .map(|(key, text)| (key, text.to_string()))
            .collect();
        Self { templates }
    }

    /// Builds a registry from an override file. Languages present in the file replace the
    /// built-in set for that language entirely, so each must define `vindecare`. Blank
    /// templates are rejected.
    pub fn from_config(config: &PromptConfig) -> Result<Self, PromptError> {
        let mut registry = Self::builtin();

        for lang in Lang::ALL {
            let Some(modes) = config.languages.get(lang.as_str()) else {
                continue;
            };
            if !modes.contains_key(Mode::Vindecare.as_str()) {
                return Err(PromptError::MissingFallback(Mode::Vindecare.as_str(), lang.as_str()));
            }
            registry.templates.retain(|(l, _), _| *l != lang);
            for mode in Mode::ALL {
                if let Some(text) = modes.get(mode.as_str()) {
                    if text.trim().is_empty() {
                        return Err(PromptError::EmptyTemplate(mode.as_str(), lang.as_str()));
                    }
                    registry.templates.insert((lang, mode), text.clone());
                }
            }
        }

        for key in config.languages.keys() {
            if Lang::parse(key).is_none() {
                warn!("Ignoring prompt templates for unsupported language '{}'", key);
            }
        }

        Ok(registry)
    }

    /// Instructions for `(lang, mode)`, falling back to the language's `vindecare` entry.
    pub fn lookup(&self, lang: Lang, mode: Mode) -> &str {
        self.templates
            .get(&(lang, mode))
            .or_else(|| self.templates.get(&(lang, Mode::Vindecare)))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn compose(&self, lang: Lang, mode: Mode, query: &str) -> String {
        compose_message(self.lookup(lang, mode), query)
    }
}

pub fn compose_message(template: &str, query: &str) -> String {
    format!("{}{}{}{}", template, MESSAGE_SEPARATOR, QUESTION_LABEL, query)
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptRegistry>, PromptError> {
    let file_content = fs::read_to_string(&path)?;
    let config: PromptConfig = serde_json::from_str(&file_content)?;
    let registry = PromptRegistry::from_config(&config)?;
    info!("Loaded prompt templates from '{}'", path.as_ref().display());
    Ok(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_covers_every_pair() {
        let registry = PromptRegistry::builtin();
        for lang in Lang::ALL {
            for mode in Mode::ALL {
                assert!(!registry.lookup(lang, mode).is_empty(), "{lang}/{mode}");
            }
        }
        assert!(registry.lookup(Lang::En, Mode::Educatie).starts_with("EDUCATION mode"));
        assert!(registry.lookup(Lang::Ro, Mode::Performanta).starts_with("Modul PERFORMANȚĂ"));
    }

    #[test]
    fn missing_mode_falls_back_to_vindecare() {
        let config: PromptConfig = serde_json::from_value(json!({
            "en": { "vindecare": "heal first" }
        })).unwrap();
        let registry = PromptRegistry::from_config(&config).unwrap();

        assert_eq!(registry.lookup(Lang::En, Mode::Performanta), "heal first");
        assert_eq!(registry.lookup(Lang::En, Mode::Educatie), "heal first");
        assert_eq!(registry.lookup(Lang::Ro, Mode::Educatie), RO_EDUCATIE);
    }

    #[test]
    fn override_without_vindecare_is_rejected() {
        let config: PromptConfig = serde_json::from_value(json!({
            "ro": { "educatie": "only this" }
        })).unwrap();
        assert!(matches!(
            PromptRegistry::from_config(&config),
            Err(PromptError::MissingFallback("vindecare", "ro"))
        ));
    }

    #[test]
    fn blank_override_template_is_rejected() {
        let config: PromptConfig = serde_json::from_value(json!({
            "en": { "vindecare": "heal first", "educatie": "  \n" }
        })).unwrap();
        assert!(matches!(
            PromptRegistry::from_config(&config),
            Err(PromptError::EmptyTemplate("educatie", "en"))
        ));

        let config: PromptConfig = serde_json::from_value(json!({
            "ro": { "vindecare": "" }
        })).unwrap();
        assert!(matches!(
            PromptRegistry::from_config(&config),
            Err(PromptError::EmptyTemplate("vindecare", "ro"))
        ));
    }

    #[test]
    fn compose_places_query_after_separator() {
        let registry = PromptRegistry::builtin();
        let message = registry.compose(Lang::Ro, Mode::Vindecare, "ce este codul observarii");
        assert!(message.starts_with(RO_VINDECARE));
        assert!(message.ends_with("\n\n---\n\nÎntrebarea utilizatorului: ce este codul observarii"));
    }

    #[test]
    fn load_prompts_reads_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            r#"{ "ro": { "vindecare": "Vindecă", "educatie": "Educă" }, "fr": { "vindecare": "x" } }"#.as_bytes()
        ).unwrap();

        let registry = load_prompts(file.path()).unwrap();
        assert_eq!(registry.lookup(Lang::Ro, Mode::Educatie), "Educă");
        assert_eq!(registry.lookup(Lang::Ro, Mode::Performanta), "Vindecă");
        assert_eq!(registry.lookup(Lang::En, Mode::Vindecare), EN_VINDECARE);
    }

    #[test]
    fn load_prompts_surfaces_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{ not json").unwrap();
        assert!(matches!(load_prompts(file.path()), Err(PromptError::JsonError(_))));
        assert!(matches!(load_prompts("/definitely/missing.json"), Err(PromptError::IoError(_))));
    }
}
