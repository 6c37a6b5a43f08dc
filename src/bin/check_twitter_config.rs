use idp_twitter_authn::flow::{attempt_ttl, integration_from_config};
use log::{error, info};
use service::{config::Config, logging::Logger};

fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        std::process::exit(1);
    }

    info!(
        "Checking Twitter login for flow {} [{}]...",
        config.twitter_flow_id,
        config.runtime_env()
    );

    match integration_from_config(&config) {
        Ok(integration) => info!(
            "Consumer key {} is configured, attempts expire after {}s",
            integration.consumer_key(),
            attempt_ttl(&config).num_seconds()
        ),
        Err(e) => {
            error!("Twitter login cannot start: {e}");
            std::process::exit(1);
        }
    }
}
