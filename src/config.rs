use crate::cli::{Args, ColorChoice, DumpStage};

/// Runtime switches resolved from the command line.
pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub dump: Option<DumpStage>,
    pub json: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            dump: args.dump,
            json: args.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_color_choice_wins() {
        let args = Args::try_parse_from(["aroi", "--color", "always"]).unwrap();
        assert!(AppConfig::from_args(&args).color_enabled);

        let args = Args::try_parse_from(["aroi", "--color", "never"]).unwrap();
        assert!(!AppConfig::from_args(&args).color_enabled);
    }

    #[test]
    fn test_dump_switches_carried_over() {
        let args = Args::try_parse_from(["aroi", "s.aroi", "--dump", "tokens", "--json"]).unwrap();
        let config = AppConfig::from_args(&args);
        assert_eq!(config.dump, Some(DumpStage::Tokens));
        assert!(config.json);
        assert!(!config.verbose);
    }
}
