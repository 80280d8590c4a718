use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{last_user_message, ChatMessage, Handler, LanguageModel};
use crate::error::{classification_error, config_error, other_error, BotResult};

const CLASSIFIER_PROMPT: &str = "Analiza esta pregunta y decide qué agente debe manejarla.

Agentes disponibles:
{agents}

Responde solo en formato: \"X_agent\"

Pregunta: {question}";

/// Capabilities a question can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Calendar,
}

impl Capability {
    /// Every capability, in classifier listing order
    pub const ALL: [Capability; 1] = [Capability::Calendar];

    /// Capability used when the classifier answer names none.
    // Fail-open is only sound while a single capability exists.
    pub const DEFAULT: Capability = Capability::Calendar;

    /// Keyword the classifier answer is matched against
    pub fn keyword(&self) -> &'static str {
        match self {
            Capability::Calendar => "calendar",
        }
    }

    /// Agent name the classifier is asked to answer with
    pub fn agent_name(&self) -> &'static str {
        match self {
            Capability::Calendar => "calendar_agent",
        }
    }

    /// Topics listed to the classifier
    pub fn topics(&self) -> &'static str {
        match self {
            Capability::Calendar => "calendario, eventos, reuniones, citas, recordatorios",
        }
    }

    /// Map a classifier answer to a capability, falling back to the default
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        match Self::ALL.iter().find(|c| label.contains(c.keyword())) {
            Some(capability) => *capability,
            None => {
                warn!(
                    "Unrecognized classifier output '{}', routing to {}",
                    label,
                    Self::DEFAULT
                );
                Self::DEFAULT
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.agent_name())
    }
}

/// Progress of one routed turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    AwaitingClassification,
    Dispatched(Capability),
    Done(Capability),
}

/// Classifies the latest user message and hands it to one handler
pub struct Router {
    classifier: Arc<dyn LanguageModel>,
    handlers: HashMap<Capability, Arc<dyn Handler>>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

impl Router {
    pub fn new(classifier: Arc<dyn LanguageModel>) -> Self {
        Self {
            classifier,
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for a capability, replacing any previous one
    pub fn register(&mut self, capability: Capability, handler: Arc<dyn Handler>) {
        info!("Registering handler {} for {}", handler.name(), capability);
        self.handlers.insert(capability, handler);
    }

    /// Builder-style [`Router::register`]
    pub fn with_handler(mut self, capability: Capability, handler: Arc<dyn Handler>) -> Self {
        self.register(capability, handler);
        self
    }

    /// Instruction sent to the classifier for `question`
    pub fn classification_prompt(question: &str) -> String {
        let agents = Capability::ALL
            .iter()
            .map(|c| format!("- {}: {}", c.agent_name(), c.topics()))
            .collect::<Vec<_>>()
            .join("\n");

        CLASSIFIER_PROMPT
            .replace("{agents}", &agents)
            .replace("{question}", question)
    }

    /// Decide which capability handles `question`.
    ///
    /// A failing classifier call is fatal; an answer naming no capability
    /// falls back to [`Capability::DEFAULT`].
    pub async fn classify(&self, question: &str) -> BotResult<Capability> {
        let answer = self
            .classifier
            .complete("", &Self::classification_prompt(question))
            .await
            .map_err(|e| classification_error(&e.to_string()))?;

        let capability = Capability::from_label(&answer);
        debug!("Classifier answered '{}', routing to {}", answer.trim(), capability);
        Ok(capability)
    }

    /// Route one turn: classify the latest user message, dispatch it to the
    /// selected handler and append the reply to `history`.
    pub async fn handle(&self, history: &mut Vec<ChatMessage>) -> BotResult<Capability> {
        let mut state = RouteState::AwaitingClassification;
        debug!("Route state: {:?}", state);

        let question = last_user_message(history)
            .ok_or_else(|| other_error("No user message to route"))?
            .content
            .clone();

        let capability = self.classify(&question).await?;
        let handler = self.handlers.get(&capability).ok_or_else(|| {
            config_error(&format!("No handler registered for {}", capability))
        })?;

        state = RouteState::Dispatched(capability);
        debug!("Route state: {:?}", state);
        let reply = handler.respond(history).await?;
        history.push(reply);

        state = RouteState::Done(capability);
        debug!("Route state: {:?}", state);
        Ok(capability)
    }

    /// Routing graph as a Mermaid flowchart
    pub fn to_mermaid(&self) -> String {
        let routes: Vec<(Capability, &str)> = Capability::ALL
            .iter()
            .filter_map(|c| self.handlers.get(c).map(|handler| (*c, handler.name())))
            .collect();

        mermaid(&routes)
    }
}

/// Mermaid flowchart of the classifier dispatching to each `(capability, handler)` route
pub fn mermaid(routes: &[(Capability, &str)]) -> String {
    let mut graph = String::from("graph TD;\n");
    graph.push_str("\t__start__([START]) --> decide;\n");

    for (capability, handler) in routes {
        graph.push_str(&format!(
            "\tdecide -.->|{}| {};\n",
            capability.agent_name(),
            handler
        ));
        graph.push_str(&format!("\t{} --> __end__([END]);\n", handler));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(Capability::from_label("calendar_agent"), Capability::Calendar);
        assert_eq!(Capability::from_label("  Calendar_Agent\n"), Capability::Calendar);
        assert_eq!(Capability::from_label("\"calendar_agent\""), Capability::Calendar);
    }

    #[test]
    fn test_from_label_fails_open() {
        assert_eq!(Capability::from_label("unknown_agent"), Capability::Calendar);
        assert_eq!(Capability::from_label(""), Capability::Calendar);
    }

    #[test]
    fn test_mermaid_routes() {
        assert_eq!(
            mermaid(&[(Capability::Calendar, "calendar_agent")]),
            "graph TD;\n\t__start__([START]) --> decide;\n\tdecide -.->|calendar_agent| calendar_agent;\n\tcalendar_agent --> __end__([END]);\n"
        );
        assert_eq!(mermaid(&[]), "graph TD;\n\t__start__([START]) --> decide;\n");
    }

    #[test]
    fn test_classification_prompt_lists_agents() {
        let prompt = Router::classification_prompt("¿Qué tengo el miércoles?");
        assert!(prompt.contains("- calendar_agent: calendario, eventos, reuniones, citas, recordatorios"));
        assert!(prompt.ends_with("Pregunta: ¿Qué tengo el miércoles?"));
    }
}
