use clap::Parser;

pub mod dispatcher;
pub mod handlers;

const AFTER_HELP: &str = "\
Actions:
  <name...> [args...]                 Run a script (same as `run`)
  run [--dry-run] <name...> [args...] Run a script, or print it with --dry-run
  add <name> [-d DESC] [-g] [-c CMD]  Save a command template
  list, ls [--all]                    List scripts visible from here
  show <name...>                      Show a script and its placeholders
  remove, rm <name...> [-g] [-y]      Remove a script

Placeholders:
  %name%  %name:description%  %name:description:default%  %%  (positional)

Arguments are given as --name=value, --name value, or positionally.";

/// cmdr: save shell command templates and run them again by name.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    after_help = AFTER_HELP,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// An action, or a script name followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
