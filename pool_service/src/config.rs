use anyhow::Context;

/// Deployment environment, read from `ENVIRONMENT`. Anything unrecognized
/// is treated as production so a misconfigured deploy never gets the
/// chattier local defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Develop,
    Production,
}

impl Environment {
    pub fn new_or_prod() -> Self {
        match std::env::var("ENVIRONMENT").as_deref() {
            Ok("local") => Environment::Local,
            Ok("develop") => Environment::Develop,
            _ => Environment::Production,
        }
    }
}

/// The configuration parameters for the application.
///
/// Pulled from environment variables once at startup; see `.env.sample`
/// for details. All clients are constructed in `main` from this and
/// injected through the app state.
pub struct Config {
    /// The port to listen for HTTP requests on.
    pub port: usize,
    /// The environment we are in.
    pub environment: Environment,
    /// SendGrid API key for outbound notification email.
    pub sendgrid_api_key: String,
    /// Verified sender address for outbound email.
    pub sendgrid_from_email: String,
    /// Front-end origin used to build notification links.
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port: usize = std::env::var("PORT")
            .unwrap_or("8080".to_string())
            .parse::<usize>()
            .context("PORT must be a number")?;
        let environment = Environment::new_or_prod();

        let sendgrid_api_key =
            std::env::var("SENDGRID_API_KEY").context("SENDGRID_API_KEY must be provided")?;
        let sendgrid_from_email =
            std::env::var("SENDGRID_FROM_EMAIL").context("SENDGRID_FROM_EMAIL must be provided")?;
        let base_url = std::env::var("BASE_URL").context("BASE_URL must be provided")?;

        Ok(Config {
            port,
            environment,
            sendgrid_api_key,
            sendgrid_from_email,
            base_url,
        })
    }
}
