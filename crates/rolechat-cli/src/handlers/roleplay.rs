//! Roleplay command handler.
//!
//! Builds a roleplay configuration from a built-in scenario, a template
//! file or a stored session and hands it to the shared conversation loop.

use std::io;

use anyhow::{Context, Result};
use rolechat_core::{
    ChatConfig, Difficulty, RolePlayConfig, Scenario, SessionKey, SessionKind,
};

use crate::bootstrap::{CliContext, HistoryMode};
use crate::commands::RoleplayArgs;
use crate::error::CliError;

use super::chat::run_conversation;

/// Execute the roleplay command.
pub async fn execute(ctx: &CliContext, args: &RoleplayArgs) -> Result<()> {
    let scenario = args.scenario.map(Scenario::from);
    let mode = HistoryMode::from_args(args.memory, args.session);
    let config = resolve_config(ctx, args, mode).await?;

    println!(
        "Roleplay: you are {}, talking to {} in {} as {}.",
        config.user_role(),
        config.gpt_role(),
        config.language(),
        config.difficulty().description()
    );
    println!("Type 'exit' or press Ctrl-D to quit.\n");

    let speaker = config.gpt_role().to_string();
    let conversation = ctx.conversation(
        ChatConfig::from(config),
        mode,
        scenario.as_ref().map(Scenario::name),
    )?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_conversation(&conversation, &speaker, &mut stdin.lock(), &mut stdout).await
}

/// Roleplay configuration for a run: the stored one when resuming,
/// otherwise built from the arguments.
pub async fn resolve_config(
    ctx: &CliContext,
    args: &RoleplayArgs,
    mode: HistoryMode,
) -> Result<RolePlayConfig> {
    let HistoryMode::Resume(id) = mode else {
        return build_config(args);
    };

    let key = SessionKey::new(SessionKind::RolePlay, id);
    match ctx.stored_config(key).await? {
        ChatConfig::RolePlay(config) => Ok(config),
        ChatConfig::Simple(_) => {
            Err(CliError::Config(format!("session {key} has no roleplay profile")).into())
        }
    }
}

/// Build the roleplay configuration from the given arguments.
///
/// Roles default to the scenario's; with a template file both roles must
/// be given. Unknown difficulty names fall back to beginner.
pub fn build_config(args: &RoleplayArgs) -> Result<RolePlayConfig> {
    let scenario = args.scenario.map(Scenario::from);

    let template = match (&args.template_file, scenario) {
        (Some(path), _) => std::fs::read_to_string(path)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to read template file {}", path.display()))?,
        (None, Some(scenario)) => scenario.template().to_string(),
        (None, None) => {
            return Err(CliError::Arguments(
                "one of --scenario, --template-file or --session is required".to_string(),
            )
            .into());
        }
    };

    let user_role = resolve_role(
        args.user_role.as_deref(),
        scenario.map(|s| s.user_role()),
        "--user-role",
    )?;
    let gpt_role = resolve_role(
        args.gpt_role.as_deref(),
        scenario.map(|s| s.gpt_role()),
        "--gpt-role",
    )?;

    let config = RolePlayConfig::new(
        args.language.trim(),
        user_role,
        gpt_role,
        Difficulty::parse_or_default(&args.difficulty),
        template,
    )
    .map_err(|e| CliError::Arguments(e.to_string()))?;

    Ok(config)
}

fn resolve_role(
    given: Option<&str>,
    fallback: Option<&'static str>,
    flag: &str,
) -> Result<String, CliError> {
    given
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .or(fallback)
        .map(str::to_string)
        .ok_or_else(|| CliError::Arguments(format!("{flag} is required with --template-file")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ScenarioArg;
    use std::io::Write;

    fn args() -> RoleplayArgs {
        RoleplayArgs {
            scenario: None,
            template_file: None,
            language: "English".to_string(),
            user_role: None,
            gpt_role: None,
            difficulty: "beginner".to_string(),
            session: None,
            memory: false,
        }
    }

    #[tokio::test]
    async fn test_resume_restores_stored_roleplay() {
        use crate::bootstrap::bootstrap_with;
        use rolechat_core::{ChatSettings, SessionRepository, new_session_for};
        use rolechat_db::TestDb;

        let original = build_config(&RoleplayArgs {
            scenario: Some(ScenarioArg::Hotel),
            language: "Korean".to_string(),
            difficulty: "advanced".to_string(),
            ..args()
        })
        .unwrap();
        let db = TestDb::new().await.unwrap();
        let repo = db.session_repository();
        let settings = ChatSettings::default();
        let key = repo
            .create_session(new_session_for(&ChatConfig::from(original.clone()), &settings))
            .await
            .unwrap();
        let ctx = bootstrap_with(repo, settings);

        let resume = RoleplayArgs {
            session: Some(key.id),
            ..args()
        };
        let mode = HistoryMode::from_args(resume.memory, resume.session);
        let restored = resolve_config(&ctx, &resume, mode).await.unwrap();

        assert_eq!(restored, original);
        assert_eq!(restored.language(), "Korean");
        assert_eq!(restored.difficulty(), Difficulty::Advanced);
    }

    #[test]
    fn test_scenario_supplies_template_and_roles() {
        let config = build_config(&RoleplayArgs {
            scenario: Some(ScenarioArg::Hotel),
            difficulty: "intermediate".to_string(),
            ..args()
        })
        .unwrap();

        assert_eq!(config.gpt_role(), Scenario::Hotel.gpt_role());
        assert_eq!(config.user_role(), Scenario::Hotel.user_role());
        assert_eq!(config.role_template(), Scenario::Hotel.template());
        assert_eq!(config.difficulty(), Difficulty::Intermediate);
    }

    #[test]
    fn test_explicit_roles_override_scenario() {
        let config = build_config(&RoleplayArgs {
            scenario: Some(ScenarioArg::Cafe),
            gpt_role: Some("a grumpy barista".to_string()),
            ..args()
        })
        .unwrap();
        assert_eq!(config.gpt_role(), "a grumpy barista");
        assert_eq!(config.user_role(), Scenario::Cafe.user_role());
    }

    #[test]
    fn test_template_file_requires_roles() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Play {{gpt_role}} for {{user_role}}.").unwrap();

        let missing = build_config(&RoleplayArgs {
            template_file: Some(file.path().to_path_buf()),
            ..args()
        });
        assert!(missing.unwrap_err().to_string().contains("--user-role"));

        let config = build_config(&RoleplayArgs {
            template_file: Some(file.path().to_path_buf()),
            user_role: Some("tourist".to_string()),
            gpt_role: Some("guide".to_string()),
            ..args()
        })
        .unwrap();
        assert!(config.role_template().starts_with("Play "));
        assert_eq!(config.gpt_role(), "guide");
    }

    #[test]
    fn test_unknown_difficulty_falls_back_to_beginner() {
        let config = build_config(&RoleplayArgs {
            scenario: Some(ScenarioArg::Starbucks),
            difficulty: "expert".to_string(),
            ..args()
        })
        .unwrap();
        assert_eq!(config.difficulty(), Difficulty::Beginner);
    }

    #[test]
    fn test_missing_template_file_is_io_error() {
        let err = build_config(&RoleplayArgs {
            template_file: Some("/nonexistent/template.txt".into()),
            user_role: Some("a".to_string()),
            gpt_role: Some("b".to_string()),
            ..args()
        })
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Io(_))));
    }
}
