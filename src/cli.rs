use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "brandkit",
    about = "Brand personality registry exposed as agent tool functions",
    version,
    after_help = "Logs are written to: ~/.local/share/brandkit/logs/brandkit.log (or $BRANDKIT_DIR/logs)"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to brandkit.yaml config file")]
    pub config: Option<PathBuf>,

    /// Brand table JSON file (overrides brands.path)
    #[arg(long, global = true)]
    pub brands: Option<PathBuf>,

    /// Initial brand key (overrides the environment)
    #[arg(long, global = true)]
    pub brand: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available brands
    List {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show a brand's configuration
    Show {
        /// Brand key (defaults to the current brand)
        key: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print personality instructions for the current brand
    Personality,

    /// Print the current brand name
    Name,

    /// Switch the current brand (not persisted)
    Set {
        /// Brand key
        key: String,
    },

    /// List the functions exposed to agent hosts
    Functions {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Invoke a single function
    Call {
        /// Function name
        function: String,

        /// Function arguments, bound to parameters in order
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Serve JSON-lines function calls on stdin/stdout
    Session,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Config key (e.g., brands.path)
        key: String,
    },
}
