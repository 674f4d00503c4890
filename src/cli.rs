use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aroi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the aroi scripting language", long_about = None)]
pub struct Args {
    /// Script to run; starts an interactive prompt when omitted
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Print the scanned tokens or the parsed tree instead of running
    #[arg(long = "dump", value_name = "STAGE", requires = "script")]
    pub dump: Option<DumpStage>,

    /// Emit the token dump as JSON lines
    #[arg(long = "json", requires = "dump")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a shell completion script
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpStage {
    Tokens,
    Ast,
}

impl std::str::FromStr for DumpStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tokens" => Ok(DumpStage::Tokens),
            "ast" => Ok(DumpStage::Ast),
            _ => Err(format!("Invalid dump stage: {}. Must be 'tokens' or 'ast'", s)),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_and_flags() {
        let args = Args::try_parse_from(["aroi", "main.aroi", "--color", "never", "-v"]).unwrap();
        assert_eq!(args.script, Some(PathBuf::from("main.aroi")));
        assert_eq!(args.color, ColorChoice::Never);
        assert!(args.verbose);
        assert_eq!(args.dump, None);
    }

    #[test]
    fn test_dump_requires_script() {
        assert!(Args::try_parse_from(["aroi", "--dump", "tokens"]).is_err());
        let args = Args::try_parse_from(["aroi", "a.aroi", "--dump", "AST"]).unwrap();
        assert_eq!(args.dump, Some(DumpStage::Ast));
    }

    #[test]
    fn test_json_requires_dump() {
        assert!(Args::try_parse_from(["aroi", "a.aroi", "--json"]).is_err());
    }

    #[test]
    fn test_invalid_color_choice() {
        assert!("sometimes".parse::<ColorChoice>().is_err());
        assert_eq!("ALWAYS".parse::<ColorChoice>(), Ok(ColorChoice::Always));
    }
}
