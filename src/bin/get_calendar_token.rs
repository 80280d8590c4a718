use agendabot::components::google_calendar::FileTokenStore;
use agendabot::config::Config;
use agendabot::error::{other_error, BotResult};
use url::Url;

const REDIRECT_URI: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> miette::Result<()> {
    run().await?;
    Ok(())
}

async fn run() -> BotResult<()> {
    // Load configuration
    let config = Config::load()?;

    let token_store = FileTokenStore::new(
        &config.token_path,
        &config.google_client_id,
        &config.google_client_secret,
    );

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let auth_url = Url::parse_with_params(
        "https://accounts.google.com/o/oauth2/v2/auth",
        &[
            ("client_id", config.google_client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("scope", "https://www.googleapis.com/auth/calendar.readonly"),
            ("state", state.as_str()),
        ],
    )?;

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser, visit this URL instead:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http("127.0.0.1:8080")
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback = Url::parse(&format!("{}{}", REDIRECT_URI, request.url()))?;

    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(state.as_str()) {
        return Err(other_error("State mismatch in authorization callback"));
    }

    // Parse the authorization code from the URL
    let code = param("code")
        .ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens and store them
    let token = token_store.exchange_code(&code, REDIRECT_URI).await?;
    token_store.save(&token).await?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("Token successfully saved to {}!", token_store.path().display());

    Ok(())
}
