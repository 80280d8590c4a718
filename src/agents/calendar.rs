use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::{earlier_turns, last_user_message, ChatMessage, Handler, LanguageModel};
use crate::components::google_calendar::{CalendarService, ReportKind};
use crate::error::{handler_error, other_error, BotResult, Error};

/// System instructions of the calendar agent
pub const CALENDAR_PREAMBLE: &str = "Eres un asistente especializado en gestión de calendarios.
Tu función es ayudar al usuario con sus eventos y recordatorios.
Cuando el usuario pregunta por eventos, siempre incluye los calendarios:
Paul (todas las tareas) y Eventos (solamente algunos eventos a los que asistirá presencialmente).
Proporciona información clara y útil sobre eventos, horarios y descripciones.
Normalmente, los eventos importantes son entre las 6:00h y las 23:59h. Los que están de madrugada suelen haber sido descartados,
no hace falta que los incluyas a menos que el usuario lo pida explícitamente.";

/// Answers calendar questions from the daytime and early-hours reports
pub struct CalendarAgent {
    service: Arc<CalendarService>,
    model: Arc<dyn LanguageModel>,
}

impl CalendarAgent {
    /// Handler name in the routing graph
    pub const NAME: &'static str = "calendar_agent";

    pub fn new(service: Arc<CalendarService>, model: Arc<dyn LanguageModel>) -> Self {
        Self { service, model }
    }

    /// Prompt carrying the question and both reports
    pub fn build_prompt(question: &str, now: DateTime<Utc>, events: &str, reminders: &str) -> String {
        format!(
            "Fecha actual (UTC): {}\n\n\
             Eventos (6:00-24:00):\n{}\n\n\
             Recordatorios de madrugada (0:00-6:00):\n{}\n\n\
             Pregunta: {}",
            now.format("%Y-%m-%d %H:%M, %A"),
            events.trim_end(),
            reminders.trim_end(),
            question
        )
    }

    async fn reports(&self, now: DateTime<Utc>) -> BotResult<(String, String)> {
        let events = self.service.report_at(ReportKind::Events, now).await?;
        let reminders = self.service.report_at(ReportKind::Reminders, now).await?;
        Ok((events, reminders))
    }
}

#[async_trait]
impl Handler for CalendarAgent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn respond(&self, history: &[ChatMessage]) -> BotResult<ChatMessage> {
        let question = last_user_message(history)
            .ok_or_else(|| other_error("No user message for the calendar agent"))?;

        let now = Utc::now();
        let (events, reminders) = match self.reports(now).await {
            Ok(reports) => reports,
            Err(Error::Retrieval(reason)) => {
                warn!("Calendar retrieval failed: {}", reason);
                return Ok(ChatMessage::assistant(format!(
                    "No he podido consultar tus calendarios: {}",
                    reason
                )));
            }
            Err(e) => return Err(e),
        };

        info!("Asking the calendar agent model");
        let prompt = Self::build_prompt(&question.content, now, &events, &reminders);
        let answer = self
            .model
            .chat(CALENDAR_PREAMBLE, &prompt, earlier_turns(history))
            .await
            .map_err(|e| handler_error(&e.to_string()))?;

        Ok(ChatMessage::assistant(answer.trim()))
    }
}
