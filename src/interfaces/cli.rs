use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nlq")]
#[command(about = "Ask a question in plain language, get the answer from a GraphQL schema.")]
#[command(version)]
pub struct Cli {
    /// Output the wire response as JSON
    #[arg(long)]
    pub json: bool,

    /// Dataset file (schema + data), overrides the config
    #[arg(short = 'd', long)]
    pub dataset: Option<PathBuf>,

    /// Reference tables file, overrides the config
    #[arg(short = 'r', long)]
    pub reference: Option<PathBuf>,

    /// Print the schema the model sees and exit
    #[arg(long)]
    pub print_schema: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Question text
    #[arg(num_args = 1..)]
    pub question: Vec<String>,
}
