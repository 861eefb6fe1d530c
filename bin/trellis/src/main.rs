mod serve;

use trellis_server::types::BoxedError;

#[tokio::main]
async fn main() -> std::result::Result<(), BoxedError> {
    let commander = serve::register(
        clap::Command::new("trellis")
            .about("Serves static assets, page templates and api routes over http")
            .arg_required_else_help(true),
    );

    let matches = commander.get_matches();
    if let Some(("serve", arguments)) = matches.subcommand() {
        serve::run(arguments).await?;
    }

    Ok(())
}
