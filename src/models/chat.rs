use serde::{ Serialize, Deserialize };
use std::fmt;

pub const MODEL_TAG: &str = "assistant";

fn default_mode() -> String {
    Mode::Vindecare.as_str().to_string()
}

fn default_lang() -> String {
    Lang::Ro.as_str().to_string()
}

/// Body of `POST /api/chat`. `mode` and `lang` are kept raw here and normalised by
/// [`crate::validation::validate`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
    pub mode: Mode,
    pub lang: Lang,
    pub model: String,
    pub sources_used: bool,
}

/// Persona preset selecting which instructions prefix the user query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Vindecare,
    Educatie,
    Performanta,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Vindecare, Mode::Educatie, Mode::Performanta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Vindecare => "vindecare",
            Mode::Educatie => "educatie",
            Mode::Performanta => "performanta",
        }
    }

    /// Exact, case-sensitive match against the known presets.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ro,
    En,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::Ro, Lang::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ro => "ro",
            Lang::En => "en",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == raw)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
