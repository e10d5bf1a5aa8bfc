use anyhow::Result;

use crate::cli::handlers::{self, commons::HandlerContext};

// --- Command Definition and Registry ---

/// Defines a built-in action, its aliases, and its handler.
#[derive(Debug)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    handler: fn(Vec<String>, &HandlerContext) -> Result<()>,
}

/// The single source of truth for all built-in actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        aliases: &[],
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "remove",
        aliases: &["rm"],
        handler: handlers::remove::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &[],
        handler: handlers::show::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes the raw arguments:
/// 1. No arguments lists the visible scripts.
/// 2. `cmdr <action> [args...]` runs a built-in action.
/// 3. Anything else is a script invocation, `cmdr <name...> [args...]`.
pub fn dispatch(all_args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(first) = args.next() else {
        return handlers::list::handle(Vec::new(), ctx);
    };

    match find_command(&first) {
        Some(command) => (command.handler)(args.collect(), ctx),
        None => {
            let mut tokens = vec![first];
            tokens.extend(args);
            handlers::run::run_invocation(&tokens, false, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::commons::test_support::{context_in, to_cli_params};
    use crate::cli::handlers::run::RunError;
    use crate::models::Scope;
    use tempfile::TempDir;

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("ls").map(|c| c.name), Some("list"));
        assert_eq!(find_command("rm").map(|c| c.name), Some("remove"));
        assert_eq!(find_command("show").map(|c| c.name), Some("show"));
        assert!(find_command("deploy").is_none());
    }

    #[test]
    fn test_dispatch_add_list_remove() {
        let temp = TempDir::new().unwrap();
        let ctx = context_in(&temp);

        dispatch(
            to_cli_params(&["add", "greet", "--global", "--command", "echo hi %who::world%"]),
            &ctx,
        )
        .unwrap();
        assert!(ctx.load_store().unwrap().find_in_scope(&Scope::Global, "greet").is_some());

        dispatch(vec![], &ctx).unwrap();
        dispatch(to_cli_params(&["run", "--dry-run", "greet", "--who", "you"]), &ctx).unwrap();

        dispatch(to_cli_params(&["rm", "greet", "-g"]), &ctx).unwrap();
        assert!(ctx.load_store().unwrap().scopes.is_empty());
    }

    #[test]
    fn test_unknown_first_word_is_a_script_invocation() {
        let temp = TempDir::new().unwrap();
        let ctx = context_in(&temp);
        let err = dispatch(to_cli_params(&["deploy", "prod"]), &ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::ScriptNotFound { .. })
        ));
    }
}
