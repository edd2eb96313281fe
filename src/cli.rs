use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use barrelgen::{import_statement, stylesheet_import, Formatter};

/// barrelgen - watch-driven barrel file generator
#[derive(Parser, Debug)]
#[command(name = "barrelgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output events as NDJSON (for CI)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the barrel file once and exit
    Gen {
        /// Glob pattern selecting the source files
        #[arg(short, long)]
        glob: String,

        /// Output file to generate
        #[arg(short, long)]
        out: PathBuf,

        /// Entry format (defaults to one picked from the output extension)
        #[arg(short, long)]
        format: Option<EntryFormat>,
    },

    /// Watch the glob and regenerate the barrel file on changes
    Watch {
        /// Glob pattern selecting the source files
        #[arg(short, long)]
        glob: String,

        /// Output file to regenerate
        #[arg(short, long)]
        out: PathBuf,

        /// Entry format (defaults to one picked from the output extension)
        #[arg(short, long)]
        format: Option<EntryFormat>,
    },
}

/// Built-in entry formats selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum EntryFormat {
    /// `import './a';` lines, extensionless for .ts/.tsx
    Import,
    /// `@import './a.scss';` lines
    Stylesheet,
}

impl EntryFormat {
    pub fn formatter(self) -> Formatter {
        match self {
            EntryFormat::Import => import_statement,
            EntryFormat::Stylesheet => stylesheet_import,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_gen() {
        let cli = Cli::try_parse_from([
            "barrelgen",
            "gen",
            "--glob",
            "src/**/*.ts",
            "--out",
            "src/index.ts",
        ])
        .unwrap();
        match cli.command {
            Commands::Gen { glob, out, format } => {
                assert_eq!(glob, "src/**/*.ts");
                assert_eq!(out, PathBuf::from("src/index.ts"));
                assert!(format.is_none());
            }
            _ => panic!("expected gen"),
        }
    }

    #[test]
    fn test_cli_parse_watch_with_format() {
        let cli = Cli::try_parse_from([
            "barrelgen",
            "watch",
            "--glob",
            "styles/*.scss",
            "--out",
            "styles/main.scss",
            "--format",
            "stylesheet",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Watch { format, .. } => {
                assert!(matches!(format, Some(EntryFormat::Stylesheet)));
            }
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["barrelgen"]).is_err());
    }
}
