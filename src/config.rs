use crate::agents::LlmProvider;
use crate::components::google_calendar::CalendarSelection;
use crate::error::{config_error, env_error, BotResult};
use dotenvy::dotenv;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the OAuth token file
pub const DEFAULT_TOKEN_PATH: &str = "config/token.json";

/// Optional calendar selection overrides
pub const CALENDARS_CONFIG_PATH: &str = "config/calendars.toml";

/// Default sampling temperature of the calendar agent
pub const DEFAULT_AGENT_TEMPERATURE: f64 = 0.7;

/// Main configuration structure for the assistant
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Where the OAuth token is stored
    pub token_path: PathBuf,
    /// Language model family
    pub llm_provider: LlmProvider,
    /// API key for the language model, only needed to answer questions
    pub llm_api_key: Option<String>,
    /// Model name
    pub llm_model: String,
    /// Sampling temperature of the calendar agent
    pub agent_temperature: f64,
    /// Which calendars are reported
    pub calendars: CalendarSelection,
    /// Fetch calendars concurrently
    pub concurrent_fetch: bool,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

        let token_path = env::var("GOOGLE_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_PATH));

        let llm_provider = match env::var("LLM_PROVIDER") {
            Ok(value) => value.parse::<LlmProvider>()?,
            Err(_) => LlmProvider::OpenAi,
        };
        let llm_api_key = env::var(llm_provider.api_key_var()).ok();
        let llm_model =
            env::var("LLM_MODEL").unwrap_or_else(|_| llm_provider.default_model().to_string());

        let agent_temperature = match env::var("AGENT_TEMPERATURE") {
            Ok(value) => value
                .parse::<f64>()
                .map_err(|_| config_error("Invalid AGENT_TEMPERATURE format"))?,
            Err(_) => DEFAULT_AGENT_TEMPERATURE,
        };

        let concurrent_fetch = match env::var("CONCURRENT_FETCH") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| config_error("Invalid CONCURRENT_FETCH format"))?,
            Err(_) => false,
        };

        let calendars = load_calendar_selection(Path::new(CALENDARS_CONFIG_PATH))?;

        Ok(Config {
            google_client_id,
            google_client_secret,
            token_path,
            llm_provider,
            llm_api_key,
            llm_model,
            agent_temperature,
            calendars,
            concurrent_fetch,
        })
    }

    /// API key for the language model, required to answer questions
    pub fn require_llm_api_key(&self) -> BotResult<&str> {
        self.llm_api_key
            .as_deref()
            .ok_or_else(|| env_error(self.llm_provider.api_key_var()))
    }
}

/// Read calendar selection overrides, falling back to the defaults when the
/// file does not exist. Missing keys keep their default.
pub fn load_calendar_selection(path: &Path) -> BotResult<CalendarSelection> {
    match fs::read_to_string(path) {
        Ok(content) => parse_calendar_selection(&content),
        Err(_) => Ok(CalendarSelection::default()),
    }
}

pub fn parse_calendar_selection(content: &str) -> BotResult<CalendarSelection> {
    Ok(toml::from_str::<CalendarSelection>(content)?)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
