use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tagcomp",
    version,
    about = "Tag-file completion source",
    after_help = r#"Examples:
  tagcomp gather Vec --buffer src/main.rs
  tagcomp gather get_ --buffer src/db/mod.rs --tags tags --tags ../tags --max-size 20
  tagcomp scope --buffer src/main.rs --tags-option './tags;,tags'
  tagcomp request --method gather --params '{"completeStr":"Ind","bufferPath":"src/lib.rs"}'
  tagcomp serve
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// Editor state shared by commands that need a current buffer.
#[derive(ClapArgs, Debug, Clone)]
pub struct BufferArgs {
    /// File being edited; tag files must live in one of its ancestor directories.
    #[arg(long)]
    pub buffer: PathBuf,
    /// Working directory for relative paths (defaults to the process cwd).
    #[arg(long)]
    pub cwd: Option<PathBuf>,
    /// Explicit tag file reference. Repeatable; overrides --tags-option.
    #[arg(long = "tags")]
    pub tags: Vec<String>,
    /// Vim-style `tags` option, e.g. "./tags;,tags".
    #[arg(long)]
    pub tags_option: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print completion candidates for a prefix as JSON.
    Gather {
        /// Partial identifier being completed.
        complete_str: String,
        #[command(flatten)]
        buffer: BufferArgs,
        /// Source params as JSON: {"cmd":[...],"args":[...],"maxSize":N}.
        #[arg(long)]
        params: Option<String>,
        /// Source params from a YAML or JSON file.
        #[arg(long)]
        params_file: Option<PathBuf>,
        /// Shortcut for the maxSize param.
        #[arg(long, allow_negative_numbers = true)]
        max_size: Option<i64>,
        /// Also print searched tag files and collected line count.
        #[arg(long)]
        report: bool,
    },
    /// List in-scope tag files for a buffer.
    Scope {
        #[command(flatten)]
        buffer: BufferArgs,
    },
    /// Print the default source params.
    Params,
    /// Run JSONL RPC server over stdin/stdout.
    Serve,
    /// Run a single JSONL request and exit.
    Request {
        #[arg(long)]
        method: String,
        #[arg(long, default_value = "{}")]
        params: String,
        #[arg(long)]
        params_file: Option<PathBuf>,
        #[arg(long, default_value = "1")]
        id: String,
    },
}
