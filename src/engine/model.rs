use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Wire protocol a model is served on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// `/chat/completions`, role-tagged message list.
    Chat,
    /// `/completions`, single prompt string.
    Completion,
}

/// Recognized model identifiers.
/// See https://platform.openai.com/docs/models/model-endpoint-compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    Gpt4,
    Gpt4_0314,
    Gpt35Turbo,
    Gpt35Turbo0301,
    TextDavinci003,
    TextDavinci002,
    TextAda001,
    TextCurie001,
    TextBabbage001,
}

impl ModelType {
    pub const ALL: [ModelType; 9] = [
        ModelType::Gpt4,
        ModelType::Gpt4_0314,
        ModelType::Gpt35Turbo,
        ModelType::Gpt35Turbo0301,
        ModelType::TextDavinci003,
        ModelType::TextDavinci002,
        ModelType::TextAda001,
        ModelType::TextCurie001,
        ModelType::TextBabbage001,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelType::Gpt4 => "gpt-4",
            ModelType::Gpt4_0314 => "gpt-4-0314",
            ModelType::Gpt35Turbo => "gpt-3.5-turbo",
            ModelType::Gpt35Turbo0301 => "gpt-3.5-turbo-0301",
            ModelType::TextDavinci003 => "text-davinci-003",
            ModelType::TextDavinci002 => "text-davinci-002",
            ModelType::TextAda001 => "text-ada-001",
            ModelType::TextCurie001 => "text-curie-001",
            ModelType::TextBabbage001 => "text-babbage-001",
        }
    }

    pub fn protocol(self) -> Protocol {
        match self {
            ModelType::Gpt4
            | ModelType::Gpt4_0314
            | ModelType::Gpt35Turbo
            | ModelType::Gpt35Turbo0301 => Protocol::Chat,
            ModelType::TextDavinci003
            | ModelType::TextDavinci002
            | ModelType::TextAda001
            | ModelType::TextCurie001
            | ModelType::TextBabbage001 => Protocol::Completion,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, EngineError> {
        ModelType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| EngineError::UnknownModel(s.to_owned()))
    }
}
