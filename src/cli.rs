use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::constants::{DEFAULT_WORKING_DIR, MAX_ITERATIONS, get_default_model};

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    pub verbose: bool,
    pub model: String,
    pub working_dir: String,
    pub max_iterations: usize,
}

impl Config {
    pub fn from_args() -> Self {
        Self::from_matches(Self::build_cli().get_matches())
    }

    fn build_cli() -> Command {
        Command::new("gemcode")
            .version(env!("CARGO_PKG_VERSION"))
            .about("AI coding agent over a sandboxed project directory (Google Gemini)")
            .arg(
                Arg::new("prompt")
                    .help("Prompt text for the agent")
                    .num_args(1..)
                    .required(true),
            )
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .action(ArgAction::SetTrue)
                    .help("Print tool calls with arguments, raw tool results and token usage"),
            )
            .arg(
                Arg::new("model")
                    .long("model")
                    .short('m')
                    .value_name("MODEL")
                    .default_value(Box::leak(get_default_model().into_boxed_str()) as &str)
                    .help("Model to use (also via GEMCODE_MODEL)"),
            )
            .arg(
                Arg::new("working-dir")
                    .long("working-dir")
                    .short('w')
                    .value_name("DIR")
                    .default_value(DEFAULT_WORKING_DIR)
                    .help("Sandbox directory all tool calls are confined to"),
            )
            .arg(
                Arg::new("max-iterations")
                    .long("max-iterations")
                    .value_name("N")
                    .help("Maximum number of model turns before the loop stops"),
            )
    }

    fn from_matches(matches: ArgMatches) -> Self {
        let prompt_parts: Vec<String> = matches
            .get_many::<String>("prompt")
            .unwrap_or_default()
            .cloned()
            .collect();

        Self {
            prompt: prompt_parts.join(" "),
            verbose: matches.get_flag("verbose"),
            model: matches.get_one::<String>("model").unwrap().clone(),
            working_dir: matches.get_one::<String>("working-dir").unwrap().clone(),
            max_iterations: matches
                .get_one::<String>("max-iterations")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_ITERATIONS),
        }
    }
}
