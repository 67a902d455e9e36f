use std::sync::Arc;

use meshsub::config;
use meshsub::transport::{ServerContext, tcp};
use meshsub::utils::logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let settings = config::load_config().expect("Failed to load configuration");
    let settings = match config::apply_cli_overrides(settings, std::env::args().skip(1).collect())
    {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: meshsub [<port>] [-b <addr:port> [<addr:port> ...] <advertised>]");
            std::process::exit(2);
        }
    };
    logging::init(&settings.log.level);

    let ctx = Arc::new(ServerContext::new(settings));
    if let Err(err) = tcp::start(ctx).await {
        error!(%err, "broker terminated");
        std::process::exit(1);
    }
}
