pub mod api_routes;

use actix_web::{middleware, web::Data, App, HttpServer};
use clap::{Parser, Subcommand};
use entrega_api_utils::context::EntregaContext;
use entrega_db_schema::utils::build_db_pool;
use entrega_utils::{error::EntregaResult, settings::SETTINGS, VERSION};
use tokio::signal::unix::SignalKind;
use tracing_actix_web::TracingLogger;

#[derive(Parser, Debug)]
#[command(
  version,
  about = "Delivery fulfillment and courier earnings backend",
  long_about = "The entrega backend API server. Connects to PostgreSQL, runs any pending \
                migrations and starts accepting API requests."
)]
pub struct CmdArgs {
  /// Don't run database migrations on startup.
  #[arg(long, default_value_t = false, env = "ENTREGA_DISABLE_MIGRATIONS")]
  disable_migrations: bool,
  #[command(subcommand)]
  subcommand: Option<CmdSubcommand>,
}

#[derive(Subcommand, Debug)]
enum CmdSubcommand {
  /// Run pending migrations, then exit.
  Migration,
}

/// Placing the main function in lib.rs allows other crates to import and embed the server.
pub async fn start_entrega_server(args: CmdArgs) -> EntregaResult<()> {
  if let Some(CmdSubcommand::Migration) = args.subcommand {
    entrega_db_schema_setup::run(&SETTINGS.get_database_url())?;
    return Ok(());
  }

  tracing::info!("starting entrega v{VERSION}");

  if !args.disable_migrations {
    entrega_db_schema_setup::run(&SETTINGS.get_database_url())?;
  }

  let pool = build_db_pool(&SETTINGS)?;
  let context = EntregaContext::create(pool);

  tracing::info!("starting HTTP server at {}:{}", SETTINGS.bind, SETTINGS.port);

  let server = HttpServer::new(move || {
    App::new()
      .wrap(middleware::Logger::new(
        // Default log format save for %{r}a over %a, to record the client's
        // forwarded IP instead of the last peer address.
        "%{r}a '%r' %s %b '%{Referer}i' '%{User-Agent}i' %T",
      ))
      .wrap(middleware::Compress::default())
      .wrap(TracingLogger::default())
      .app_data(Data::new(context.clone()))
      .configure(api_routes::config)
  })
  .disable_signals()
  .bind((SETTINGS.bind, SETTINGS.port))?
  .run();
  let handle = server.handle();
  tokio::task::spawn(server);

  let mut interrupt = tokio::signal::unix::signal(SignalKind::interrupt())?;
  let mut terminate = tokio::signal::unix::signal(SignalKind::terminate())?;

  tokio::select! {
    _ = tokio::signal::ctrl_c() => {
      tracing::warn!("Received ctrl-c, shutting down gracefully...");
    }
    _ = interrupt.recv() => {
      tracing::warn!("Received interrupt, shutting down gracefully...");
    }
    _ = terminate.recv() => {
      tracing::warn!("Received terminate, shutting down gracefully...");
    }
  }
  handle.stop(true).await;

  Ok(())
}
