//! Standardized binary initialization: dotenv, panic hook, and the
//! tracing subscriber. Pretty output with file/line locally; JSON with
//! flattened events everywhere else.

use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Proof that [`init`] ran before anything started logging.
#[derive(Debug)]
pub struct InitializedEntrypoint(());

pub fn init(env: Environment) -> InitializedEntrypoint {
    dotenv::dotenv().ok();
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    match env {
        Environment::Local => {
            tracing_subscriber::fmt()
                .with_ansi(true)
                .with_env_filter(EnvFilter::from_default_env())
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .init();
        }
        Environment::Develop | Environment::Production => {
            tracing_subscriber::fmt()
                .with_ansi(false)
                .with_env_filter(EnvFilter::from_default_env())
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .init();
        }
    }

    InitializedEntrypoint(())
}
