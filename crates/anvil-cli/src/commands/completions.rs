//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};

use crate::cli::{Cli, CompletionsArgs, Shell};

const BIN_NAME: &str = "anvil";

pub fn execute(args: CompletionsArgs) -> crate::error::CliResult<()> {
    match args.shell {
        Shell::Bash => write_completions(shells::Bash, &mut std::io::stdout()),
        Shell::Zsh => write_completions(shells::Zsh, &mut std::io::stdout()),
        Shell::Fish => write_completions(shells::Fish, &mut std::io::stdout()),
        Shell::PowerShell => write_completions(shells::PowerShell, &mut std::io::stdout()),
        Shell::Elvish => write_completions(shells::Elvish, &mut std::io::stdout()),
    }
    Ok(())
}

fn write_completions<G: Generator>(shell: G, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut buf = Vec::new();
        write_completions(shells::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("anvil"));
        assert!(script.contains("new"));
        assert!(script.contains("completions"));
    }
}
