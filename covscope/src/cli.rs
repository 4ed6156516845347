use std::path::PathBuf;

use clap::Parser;

/// covscope: browse a coverage report in the terminal.
#[derive(Debug, Parser)]
#[command(name = "covscope", version, about)]
pub struct Cli {
    /// Path to the coverage report JSON.
    pub report: PathBuf,

    /// Location to open, e.g. `file-3:line-10-20` (a leading `#` is accepted).
    #[arg(long)]
    pub location: Option<String>,

    /// Start with syntax colouring off.
    #[arg(long)]
    pub no_syntax: bool,

    /// Preferences database (default: $XDG_STATE_HOME/covscope/prefs.db).
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    /// Keep preference changes in memory only.
    #[arg(long)]
    pub no_persist: bool,

    /// Log file (default: $XDG_STATE_HOME/covscope/covscope.log).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "covscope",
            "cov.json",
            "--location",
            "#file-2:line-4",
            "--no-syntax",
            "--prefs",
            "/tmp/p.db",
            "--no-persist",
        ])
        .unwrap();
        assert_eq!(cli.report, PathBuf::from("cov.json"));
        assert_eq!(cli.location.as_deref(), Some("#file-2:line-4"));
        assert!(cli.no_syntax);
        assert!(cli.no_persist);
        assert_eq!(cli.prefs, Some(PathBuf::from("/tmp/p.db")));
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn report_is_required() {
        assert!(Cli::try_parse_from(["covscope"]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
