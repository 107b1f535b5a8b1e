use clap::Parser;
use entrega_server::{start_entrega_server, CmdArgs};
use entrega_utils::error::EntregaResult;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> EntregaResult<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = CmdArgs::parse();
  start_entrega_server(args).await
}
