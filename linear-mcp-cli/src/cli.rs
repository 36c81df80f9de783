use clap::{Args, Parser, Subcommand, ValueEnum};
use linear_mcp::stale::{StaleProjectsOptions, DEFAULT_STALENESS_MONTHS};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "linear-mcp")]
#[command(version)]
#[command(about = "An MCP server for analyzing Linear workspaces")]
#[command(long_about = "
linear-mcp is an MCP (Model Context Protocol) server that exposes Linear
workspace analysis as tools. It reads the Linear API key from LINEAR_API_KEY.

Example usage:
  linear-mcp serve                 # Run as MCP server
  linear-mcp stale --months 3      # Print a stale project report
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs linear-mcp as an MCP server on stdin/stdout. When stdin is not a
terminal, logs are written to ~/.linear-mcp/mcp.log (override the file name
with LINEAR_MCP_LOG_FILE).

Example:
  linear-mcp serve
")]
    Serve,
    /// Report projects without an initiative and without recent activity
    #[command(long_about = "
Finds projects that have no initiative, whose own record has not changed
within the staleness window, and whose issues have not changed either.

Output formats:
  table  - Stale projects grouped by reason (default)
  json   - The same report the linear_getStaleProjects tool returns

Exit codes:
  0 - Report complete
  1 - Some projects could not be checked
  2 - Configuration or API failure

Examples:
  linear-mcp stale
  linear-mcp stale --months 3 --include-archived
  linear-mcp stale --no-initiative-only --limit 100 --format json
")]
    Stale(StaleArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct StaleArgs {
    /// Months without activity before a project counts as stale
    #[arg(short, long, default_value_t = DEFAULT_STALENESS_MONTHS, allow_negative_numbers = true)]
    pub months: i32,

    /// Include archived projects
    #[arg(long)]
    pub include_archived: bool,

    /// Only list projects without an initiative, skipping issue checks
    #[arg(long)]
    pub no_initiative_only: bool,

    /// Analyze at most this many projects
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    /// Whether this invocation serves MCP to a client rather than a terminal
    pub fn is_mcp_mode(&self, stdin_is_terminal: bool) -> bool {
        matches!(self.command, Some(Commands::Serve)) && !stdin_is_terminal
    }
}

impl StaleArgs {
    /// Detector options for this invocation
    pub fn options(&self) -> StaleProjectsOptions {
        StaleProjectsOptions {
            staleness_months: self.months,
            include_archived: self.include_archived,
            no_initiative_only: self.no_initiative_only,
            limit: self.limit,
        }
    }
}
