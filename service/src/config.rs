use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default lifetime of an authentication attempt parked while the user is at Twitter.
pub const DEFAULT_ATTEMPT_TTL_SECONDS: u64 = 600;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The OAuth consumer key of the Twitter application.
    #[arg(long, env)]
    twitter_consumer_key: Option<String>,

    /// The OAuth consumer secret of the Twitter application.
    #[arg(long, env, hide_env_values = true)]
    twitter_consumer_secret: Option<String>,

    /// Identifier of the login flow the Twitter steps run under.
    #[arg(long, env, default_value = "authn/Twitter")]
    pub twitter_flow_id: String,

    /// Seconds an authentication attempt may wait for the user to return from Twitter
    #[arg(long, env, default_value_t = DEFAULT_ATTEMPT_TTL_SECONDS)]
    pub attempt_ttl_seconds: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_twitter_consumer_key(mut self, consumer_key: String) -> Self {
        self.twitter_consumer_key = Some(consumer_key);
        self
    }

    pub fn set_twitter_consumer_secret(mut self, consumer_secret: String) -> Self {
        self.twitter_consumer_secret = Some(consumer_secret);
        self
    }

    /// Returns the Twitter consumer key, if configured.
    pub fn twitter_consumer_key(&self) -> Option<String> {
        self.twitter_consumer_key.clone()
    }

    /// Returns the Twitter consumer secret, if configured.
    pub fn twitter_consumer_secret(&self) -> Option<String> {
        self.twitter_consumer_secret.clone()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
