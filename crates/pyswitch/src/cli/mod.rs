mod clear;
mod config;
mod exec;
mod list;
mod status;
mod switch;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pyswitch_platform::env::{Export, Vars};
use pyswitch_profile::{Profile, ProfileLoader};
use pyswitch_shim::{Failure, Session};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

/// Per-shell Python interpreter selection.
///
/// State changes are printed as shell statements; run them through `eval`
/// (`eval "$(pyswitch use 3.12)"`) to keep them for the rest of the session.
#[derive(Debug, Parser)]
#[command(name = "pyswitch", version, about)]
pub struct Cli {
    /// Configuration file (default: <config dir>/pyswitch/config.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Exec(exec::Exec),
    Use(switch::Use),
    Clear(clear::Clear),
    #[command(visible_alias = "ls")]
    List(list::List),
    Status(status::Status),
    Config(config::Config),
}

impl Cli {
    pub fn run(self) -> anyhow::Result<ExitCode> {
        let app = App::load(self.config.as_deref())?;
        match self.command {
            Commands::Exec(cmd) => cmd.run(&app),
            Commands::Use(cmd) => cmd.run(&app),
            Commands::Clear(cmd) => cmd.run(&app),
            Commands::List(cmd) => cmd.run(&app),
            Commands::Status(cmd) => cmd.run(&app),
            Commands::Config(cmd) => cmd.run(&app),
        }
    }
}

/// Everything a command needs to build a session.
pub struct App {
    pub profile: Profile,
    pub vars:    Vars,
    pub home:    PathBuf,
}

impl App {
    fn load(config: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let loader = match config {
            Some(path) => ProfileLoader::new().file(path),
            None => ProfileLoader::new(),
        };
        let profile = loader.load().context("failed to load configuration")?;
        let vars = Vars::from_process();
        let home = vars
            .home()
            .context("cannot determine the home directory; set HOME")?;
        Ok(Self {
            profile,
            vars,
            home,
        })
    }

    pub fn session(&self) -> Session {
        let config = self.profile.session_config(&self.home, is_interactive());
        Session::new(config, self.vars.clone())
    }
}

/// Requests count as interactive when a terminal is attached on either end
/// the user sees.
fn is_interactive() -> bool { std::io::stdin().is_terminal() || std::io::stderr().is_terminal() }

/// Shell statements on stdout, for `eval`.
pub fn print_exports(exports: &[Export]) {
    for export in exports {
        println!("{}", export.to_shell());
    }
}

pub fn report(failure: &Failure) -> ExitCode {
    eprintln!("pyswitch: {failure}");
    eprintln!("  {}", failure.remediation());
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use std::ffi::OsString;

    #[test]
    fn test_cli_definition() { Cli::command().debug_assert(); }

    fn exec_argv(line: &[&str]) -> Vec<OsString> {
        let cli = Cli::try_parse_from(line).unwrap();
        let Commands::Exec(exec) = cli.command else {
            panic!("expected exec");
        };
        exec.argv
    }

    fn os(list: &[&str]) -> Vec<OsString> { list.iter().map(OsString::from).collect() }

    #[test]
    fn test_exec_forwards_hyphenated_args() {
        assert_eq!(
            exec_argv(&["pyswitch", "exec", "python", "-m", "pip", "install", "-U", "rich"]),
            os(&["python", "-m", "pip", "install", "-U", "rich"])
        );
        assert_eq!(
            exec_argv(&["pyswitch", "exec", "python3", "-h", "-v"]),
            os(&["python3", "-h", "-v"])
        );
    }

    #[test]
    fn test_exec_keeps_double_dash() {
        assert_eq!(
            exec_argv(&["pyswitch", "exec", "python", "--", "-x"]),
            os(&["python", "--", "-x"])
        );
        assert_eq!(
            exec_argv(&["pyswitch", "exec", "python", "-c", "pass", "--", "a"]),
            os(&["python", "-c", "pass", "--", "a"])
        );
    }

    #[test]
    fn test_exec_requires_a_command() {
        assert!(Cli::try_parse_from(["pyswitch", "exec"]).is_err());
    }

    #[test]
    fn test_use_and_clear_flags() {
        let cli = Cli::try_parse_from(["pyswitch", "-v", "use", "3.12", "--build"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Commands::Use(ref u) if u.build && u.version == "3.12"));

        let cli = Cli::try_parse_from(["pyswitch", "clear", "--remove-links"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear(ref c) if c.remove_links));
    }
}
