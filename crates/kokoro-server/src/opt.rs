use clap::{Args, Parser, Subcommand};
use kokoro_utils::args::llm::LlmService;
use std::net::IpAddr;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "kokoro", about = "Run the journaling backend")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Run(Run),
}

#[derive(Debug, Clone, Args)]
#[group(multiple = true, required = false)]
pub(crate) struct Db {
    #[arg(long, help = "Min connections")]
    pub(crate) db_min_connections: Option<u32>,

    #[arg(long, help = "Max connections")]
    pub(crate) db_max_connections: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct Run {
    #[arg(long)]
    pub(crate) host: Option<IpAddr>,

    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    #[arg(long, env = "DATABASE_URL", help = "Database url (sqlite or postgresql)")]
    pub(crate) database_url: Url,

    #[command(flatten)]
    pub(crate) llm: LlmService,

    #[arg(long)]
    pub(crate) origins: Vec<String>,

    #[arg(
        long,
        default_value = "600",
        help = "Seconds after which a stuck processing attempt is requeued"
    )]
    pub(crate) reclaim_stale_secs: u64,

    #[arg(long, default_value = "60", help = "Seconds between recovery sweeps")]
    pub(crate) reclaim_sweep_secs: u64,

    #[command(flatten)]
    pub(crate) db: Db,

    #[arg(long = "sentry-dsn", help = "Sentry url")]
    pub(crate) sentry_dsn: Option<String>,

    #[arg(long, default_value = "dev", help = "Environment name used by sentry and tracing")]
    pub(crate) env: String,

    #[arg(long, help = "OTLP endpoint for traces")]
    pub(crate) otlp_endpoint: Option<String>,
}
