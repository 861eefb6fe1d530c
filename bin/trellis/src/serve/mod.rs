use std::path::PathBuf;

use tokio::sync::broadcast;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use trellis_config::ServerConfig;
use trellis_server::types::BoxedError;
use trellis_server::{Dispatcher, HttpServer, Operator};

pub fn register(command: clap::Command) -> clap::Command {
    command.subcommand(
        clap::Command::new("serve")
            .about("runs the http server for a site's public assets and templates")
            .arg(
                clap::Arg::new("config")
                    .long("config")
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                clap::Arg::new("address")
                    .long("address")
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(String)),
            )
            .arg(
                clap::Arg::new("port")
                    .long("port")
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                clap::Arg::new("log_level")
                    .long("log-level")
                    .action(clap::ArgAction::Set)
                    .value_parser(["error", "warn", "info", "debug", "trace"])
                    .default_value("info"),
            ),
    )
}

fn load_config(args: &clap::ArgMatches) -> std::result::Result<ServerConfig, BoxedError> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::load(path.clone())?,
        None => ServerConfig::default(),
    };

    if let Some(address) = args.get_one::<String>("address") {
        config = config.with_address(address.clone());
    }

    if let Some(port) = args.get_one::<u16>("port") {
        config = config.with_port(*port);
    }

    Ok(config)
}

pub async fn run(args: &clap::ArgMatches) -> std::result::Result<(), BoxedError> {
    let level = args
        .get_one::<String>("log_level")
        .map_or("info", String::as_str)
        .parse::<Level>()?;

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(args)?;
    trellis_trace::info!("Starting trellis server on {}", config);

    let dispatcher = Dispatcher::from_config(&config);
    let server = HttpServer::shared(config, dispatcher);

    let (cancel_sender, cancel_receiver) = broadcast::channel::<()>(1);

    ctrlc::set_handler(move || {
        if cancel_sender.send(()).is_err() {
            trellis_trace::warn!("Server already stopped");
        }
    })?;

    server.run(cancel_receiver).await??;

    trellis_trace::info!("Trellis server stopped");
    Ok(())
}
