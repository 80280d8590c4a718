use agendabot::agents::LlmProvider;
use agendabot::components::google_calendar::CalendarSelection;
use agendabot::config::Config;
use agendabot::error::Error;
use agendabot::startup;
use std::path::PathBuf;

fn test_config() -> Config {
    Config {
        google_client_id: "test_client_id".to_string(),
        google_client_secret: "test_client_secret".to_string(),
        token_path: PathBuf::from("config/token.json"),
        llm_provider: LlmProvider::OpenAi,
        llm_api_key: None,
        llm_model: "gpt-4o-mini".to_string(),
        agent_temperature: 0.7,
        calendars: CalendarSelection::default(),
        concurrent_fetch: false,
    }
}

/// Smoke test to verify that the config can be built
#[test]
fn test_config_defaults() {
    let config = test_config();

    assert_eq!(config.calendars.primary_label, "Paul");
    assert_eq!(config.calendars.shared_calendar_name, "Eventos");
    assert!(matches!(
        config.require_llm_api_key(),
        Err(Error::Environment(message)) if message.contains("OPENAI_API_KEY")
    ));
}

/// The calendar service can be assembled without touching the network
#[test]
fn test_calendar_service_builds() {
    let config = test_config();
    assert!(startup::build_calendar_service(&config).is_ok());
}

/// Answering questions needs a model API key
#[test]
fn test_router_requires_api_key() {
    let config = test_config();
    let service = startup::build_calendar_service(&config).unwrap();
    assert!(startup::build_router(&config, service).is_err());
}

#[test]
fn test_router_builds_with_api_key() {
    let config = Config {
        llm_api_key: Some("sk-test".to_string()),
        ..test_config()
    };
    let service = startup::build_calendar_service(&config).unwrap();
    let router = startup::build_router(&config, service).unwrap();

    assert!(router.to_mermaid().contains("decide -.->|calendar_agent| calendar_agent;"));
    assert_eq!(router.to_mermaid(), startup::routing_graph());
}

/// The routing graph is printed without any configuration
#[test]
fn test_routing_graph_needs_no_config() {
    let graph = startup::routing_graph();

    assert!(graph.starts_with("graph TD;\n"));
    assert!(graph.contains("decide -.->|calendar_agent| calendar_agent;"));
    assert!(graph.contains("calendar_agent --> __end__([END]);"));
}
