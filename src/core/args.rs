use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::kv::{ToValue, Value};

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Combine CSV files with a header row into one spreadsheet.
    Combine {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long, default_value = "combined_data.xlsx")]
        output: PathBuf,
    },
    /// Combine headerless CSV files and keep only the rows of one MPAN.
    Filter {
        #[arg(short, long)]
        mpan: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Defaults to `<MPAN>_filtered.xlsx`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl CliArgs {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = CliArgs::parse_from(["self", "--config", "foo"]);
        assert_eq!(
            args,
            CliArgs {
                config: Some("foo".to_string()),
                command: None,
            }
        );
        assert_eq!(args.command(), &Command::Serve);
    }

    #[test]
    fn test_combine_args() {
        let args = CliArgs::parse_from(["self", "combine", "a.csv", "b.csv"]);
        assert_eq!(
            args.command(),
            &Command::Combine {
                files: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
                output: PathBuf::from("combined_data.xlsx"),
            }
        );
    }

    #[test]
    fn test_filter_args() {
        let args = CliArgs::parse_from(["self", "filter", "--mpan", "123", "a.csv", "-o", "x.xlsx"]);
        assert_eq!(
            args.command(),
            &Command::Filter {
                mpan: "123".to_string(),
                files: vec![PathBuf::from("a.csv")],
                output: Some(PathBuf::from("x.xlsx")),
            }
        );
    }

    #[test]
    fn test_combine_requires_files() {
        assert!(CliArgs::try_parse_from(["self", "combine"]).is_err());
    }
}
