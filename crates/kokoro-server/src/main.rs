use crate::opt::{Commands, Run};
use anyhow::Result;
use axum::serve;
use clap::Parser;
use kokoro_core::dispatch::{spawn_reclaimer, spawn_worker};
use kokoro_core::gateway::{Gateway, OpenAiGateway};
use kokoro_core::journal::JournalService;
use kokoro_core::llm_config::LlmConfig;
use kokoro_db::schema::setup_schema;
use kokoro_db::sea_orm::{ConnectOptions, Database};
use kokoro_utils::net::create_listener;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

mod app;
mod opt;
mod routes;
mod user;


const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3030;

async fn run(opt: Run) -> Result<()> {
    let _guard = kokoro_utils::tracing::setup(
        kokoro_utils::tracing::TracingConfig::builder()
            .package(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .otlp_endpoint(opt.otlp_endpoint.clone())
            .sentry_dsn(opt.sentry_dsn.clone())
            .env(opt.env.clone())
            .build(),
    )?;

    let mut pool_options = ConnectOptions::new(opt.database_url.to_string());
    if let Some(min_connections) = opt.db.db_min_connections {
        pool_options.min_connections(min_connections);
    }
    if let Some(max_connections) = opt.db.db_max_connections {
        pool_options.max_connections(max_connections);
    }
    pool_options.sqlx_logging_level(log::LevelFilter::Debug);

    let conn = Database::connect(pool_options).await?;
    setup_schema(&conn).await?;

    let llm_config: LlmConfig = opt.llm.clone().into();
    let gateway: Arc<dyn Gateway> = Arc::new(OpenAiGateway::new(llm_config));

    let dispatcher = spawn_worker(conn.clone(), Arc::clone(&gateway));
    spawn_reclaimer(
        conn.clone(),
        dispatcher.clone(),
        Duration::from_secs(opt.reclaim_stale_secs),
        Duration::from_secs(opt.reclaim_sweep_secs),
    );

    let service = JournalService::new(conn.clone(), gateway, dispatcher);
    let app = app::create_app(service, conn, &opt.origins)?;

    let listener = create_listener((opt.host, opt.port), (DEFAULT_HOST, DEFAULT_PORT)).await?;

    tracing::info!(local_addr = %listener.local_addr()?, "starting app");
    serve::serve(listener, app.into_make_service()).await?;
    Ok(())
}

fn main() -> Result<()> {
    unsafe { env::set_var("RUST_BACKTRACE", "1") };

    let main = async {
        let opt = opt::Cli::parse();

        match opt.command {
            Commands::Run(o) => run(o).await?,
        }
        Ok(())
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main)
}
