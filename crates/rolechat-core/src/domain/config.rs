//! Chat configuration types.
//!
//! A configuration describes how the system prompt for a conversation is
//! built. It is immutable once constructed and carries no infrastructure
//! concerns (model name, temperature and limits live in
//! [`ChatSettings`](crate::settings::ChatSettings)).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chat::{Session, SessionKind};

/// Errors raised while constructing a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required configuration field: {0}")]
    MissingField(&'static str),
}

/// Learner proficiency used by roleplay configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All difficulty levels, easiest first.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Parse a difficulty from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Parse a difficulty, falling back to [`Difficulty::Beginner`] for
    /// unrecognised input.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(difficulty = s, "Unknown difficulty, using beginner");
            Self::default()
        })
    }

    /// Convert difficulty to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Human-readable phrase interpolated into the roleplay prompt.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Beginner => "a beginner",
            Self::Intermediate => "an intermediate learner",
            Self::Advanced => "an advanced learner",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plain instruction configuration: the system prompt is the instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleConfig {
    instruction: String,
}

impl SimpleConfig {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn build_system_prompt(&self) -> String {
        self.instruction.clone()
    }
}

/// Roleplay configuration for language practice scenarios.
///
/// Deserialization goes through [`RolePlayConfig::new`], so the same
/// required-field checks apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RolePlayConfigFields")]
pub struct RolePlayConfig {
    language: String,
    user_role: String,
    gpt_role: String,
    difficulty: Difficulty,
    role_template: String,
}

impl RolePlayConfig {
    /// Create a roleplay configuration.
    ///
    /// `language` and `role_template` must be non-blank.
    pub fn new(
        language: impl Into<String>,
        user_role: impl Into<String>,
        gpt_role: impl Into<String>,
        difficulty: Difficulty,
        role_template: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let language = language.into();
        let role_template = role_template.into();

        if language.trim().is_empty() {
            return Err(ConfigError::MissingField("language"));
        }
        if role_template.trim().is_empty() {
            return Err(ConfigError::MissingField("role_template"));
        }

        Ok(Self {
            language,
            user_role: user_role.into(),
            gpt_role: gpt_role.into(),
            difficulty,
            role_template,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn user_role(&self) -> &str {
        &self.user_role
    }

    pub fn gpt_role(&self) -> &str {
        &self.gpt_role
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn role_template(&self) -> &str {
        &self.role_template
    }

    /// Render the roleplay system prompt.
    pub fn build_system_prompt(&self) -> String {
        format!(
            "You are a helpful assistant supporting people learning **{language}**.\n\
             Please assume that the user you are assisting is **{difficulty}** in {language}.\n\
             \n\
             User context: **{user_role}**\n\
             Assistant role: **{gpt_role}**\n\
             \n\
             {role_template}\n\
             \n\
             IMPORTANT INSTRUCTIONS:\n\
             1. Always respond according to the context and role\n\
             2. Keep your responses natural and conversational\n\
             3. Use appropriate level of language complexity based on the user's proficiency\n\
             4. Additionally provide 3-5 similar or follow-up phrases that the user could use to continue the conversation",
            language = self.language,
            difficulty = self.difficulty.description(),
            user_role = self.user_role,
            gpt_role = self.gpt_role,
            role_template = self.role_template,
        )
    }
}

#[derive(Deserialize)]
struct RolePlayConfigFields {
    language: String,
    user_role: String,
    gpt_role: String,
    difficulty: Difficulty,
    role_template: String,
}

impl TryFrom<RolePlayConfigFields> for RolePlayConfig {
    type Error = ConfigError;

    fn try_from(fields: RolePlayConfigFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.language,
            fields.user_role,
            fields.gpt_role,
            fields.difficulty,
            fields.role_template,
        )
    }
}

/// Configuration for a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatConfig {
    Simple(SimpleConfig),
    RolePlay(RolePlayConfig),
}

impl ChatConfig {
    /// Build the system prompt for this configuration.
    ///
    /// Pure: the same configuration always yields the same prompt.
    pub fn build_system_prompt(&self) -> String {
        match self {
            Self::Simple(config) => config.build_system_prompt(),
            Self::RolePlay(config) => config.build_system_prompt(),
        }
    }

    /// The kind of session record this configuration persists into.
    pub const fn session_kind(&self) -> SessionKind {
        match self {
            Self::Simple(_) => SessionKind::General,
            Self::RolePlay(_) => SessionKind::RolePlay,
        }
    }
}

/// Rebuild the configuration a stored session was created with.
///
/// General sessions carry their instruction; roleplay sessions carry the
/// parameters and template their prompt was rendered from.
impl TryFrom<&Session> for ChatConfig {
    type Error = ConfigError;

    fn try_from(session: &Session) -> Result<Self, Self::Error> {
        match &session.roleplay {
            None => Ok(SimpleConfig::new(session.instruction.clone()).into()),
            Some(profile) => RolePlayConfig::new(
                profile.language.clone(),
                profile.user_role.clone(),
                profile.gpt_role.clone(),
                profile.difficulty,
                profile.role_template.clone(),
            )
            .map(Into::into),
        }
    }
}

impl From<SimpleConfig> for ChatConfig {
    fn from(config: SimpleConfig) -> Self {
        Self::Simple(config)
    }
}

impl From<RolePlayConfig> for ChatConfig {
    fn from(config: RolePlayConfig) -> Self {
        Self::RolePlay(config)
    }
}
