use crate::agents::router::mermaid;
use crate::agents::{CalendarAgent, Capability, RigModel, Router};
use crate::components::google_calendar::{CalendarService, FileTokenStore, GoogleCalendarClient};
use crate::config::Config;
use crate::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Temperature of the routing classifier
const CLASSIFIER_TEMPERATURE: f64 = 0.0;

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn,rig=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the calendar service on the Google Calendar API with the file token store
pub fn build_calendar_service(config: &Config) -> miette::Result<Arc<CalendarService>> {
    let credentials = Arc::new(FileTokenStore::new(
        &config.token_path,
        &config.google_client_id,
        &config.google_client_secret,
    ));
    let client = GoogleCalendarClient::new(credentials)?;

    let service = CalendarService::new(Arc::new(client))
        .with_selection(config.calendars.clone())
        .with_concurrent_fetch(config.concurrent_fetch);

    Ok(Arc::new(service))
}

/// Handlers [`build_router`] registers, by capability
pub const ROUTES: [(Capability, &str); 1] = [(Capability::Calendar, CalendarAgent::NAME)];

/// Routing graph of [`build_router`], without credentials or network access
pub fn routing_graph() -> String {
    mermaid(&ROUTES)
}

/// Build the router with every available handler registered
pub fn build_router(config: &Config, service: Arc<CalendarService>) -> miette::Result<Router> {
    let api_key = config.require_llm_api_key()?;

    let classifier = Arc::new(RigModel::new(
        config.llm_provider,
        api_key,
        &config.llm_model,
        CLASSIFIER_TEMPERATURE,
    ));
    let agent_model = Arc::new(RigModel::new(
        config.llm_provider,
        api_key,
        &config.llm_model,
        config.agent_temperature,
    ));

    let router = Router::new(classifier).with_handler(
        Capability::Calendar,
        Arc::new(CalendarAgent::new(service, agent_model)),
    );
    info!("Router ready: {:?}", router);

    Ok(router)
}
