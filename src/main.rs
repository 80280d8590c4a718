use agendabot::agents::ChatMessage;
use agendabot::startup;
use clap::{Parser, Subcommand};
use tracing::info;

/// Question asked when none is given
const DEFAULT_QUESTION: &str = "¿Qué eventos tengo próximamente en mis calendarios?";

#[derive(Parser)]
#[command(name = "agendabot", about = "Ask questions about your calendars")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Route a question to the matching agent and print the answer
    Ask {
        /// The question, in free text
        question: Vec<String>,
    },
    /// Print the daytime events report (6:00-24:00)
    Events,
    /// Print the early-hours reminders report (0:00-6:00)
    Reminders,
    /// Print the routing graph as a Mermaid diagram
    Graph,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Ask { question: Vec::new() }) {
        // Static, no configuration needed
        Command::Graph => println!("{}", startup::routing_graph()),
        command => run(command).await?,
    }

    Ok(())
}

async fn run(command: Command) -> miette::Result<()> {
    info!("Starting agendabot");

    // Load configuration
    let config = startup::load_config()?;
    let service = startup::build_calendar_service(&config)?;

    match command {
        Command::Events => println!("{}", service.get_events().await?),
        Command::Reminders => println!("{}", service.get_reminders().await?),
        Command::Graph => println!("{}", startup::routing_graph()),
        Command::Ask { question } => {
            let question = if question.is_empty() {
                DEFAULT_QUESTION.to_string()
            } else {
                question.join(" ")
            };

            let router = startup::build_router(&config, service)?;
            let mut history = vec![ChatMessage::user(question)];
            let capability = router.handle(&mut history).await?;
            info!("Answered by {}", capability);

            if let Some(reply) = history.last() {
                println!("{}", reply.content);
            }
        }
    }

    Ok(())
}
