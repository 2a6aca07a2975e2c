//! Ollama Chat - terminal front end for a local Ollama server
//!
//! This is the CLI entry point for the ollama-chat tool.
//! Run with: cargo run --bin ollama-chat

use anyhow::Context as _;
use ollama_client::{AppSettings, ClientError, OllamaClient};
use std::env;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Initialize tracing, quiet unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let save_settings = take_flag(&mut args, "--save-settings");

    // Saved settings first, environment on top
    let mut settings = AppSettings::load();
    apply_env_overrides(&mut settings);

    if save_settings {
        let path = settings.save().context("saving settings")?;
        println!("Settings saved to {}", path.display());
        return Ok(());
    }

    let mut client = OllamaClient::new(settings.client_config());
    client.temperature = settings.temperature;
    client.max_tokens = settings.max_tokens;

    // One-shot mode when a prompt is given on the command line
    if !args.is_empty() {
        client.prompt = args.join(" ");
        return run_once(&client);
    }

    println!("Ollama Chat");
    println!("================================================");
    println!("Model: {} @ {}", client.model(), client.base_url());
    println!(
        "Temperature: {}, max tokens: {}",
        client.temperature, client.max_tokens
    );
    println!("================================================");
    println!("Commands: /image <path>, /images, /clear, /clear-images,");
    println!("          /history, /generate <text>, /save, quit\n");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "exit" {
            println!("Goodbye!");
            break;
        }

        if let Some(command) = input.strip_prefix('/') {
            run_command(&mut client, &settings, command);
            continue;
        }

        client.prompt = input.to_string();
        report(client.chat());
    }

    Ok(())
}

/// Answer a single prompt and exit.
fn run_once(client: &OllamaClient) -> anyhow::Result<()> {
    let answer = client.generate().context("generate request")?;
    print_answer(answer);
    Ok(())
}

/// Handle a slash command typed at the prompt.
fn run_command(client: &mut OllamaClient, settings: &AppSettings, command: &str) {
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name {
        "image" if !rest.is_empty() => match client.add_image(rest) {
            Ok(()) => println!("Attached {} ({} pending)", rest, client.images().len()),
            Err(e) => eprintln!("Error: {}", e),
        },
        "images" => println!("{} image(s) pending", client.images().len()),
        "clear" => {
            client.clear_history();
            println!("History cleared");
        }
        "clear-images" => {
            client.clear_images();
            println!("Images cleared");
        }
        "history" => {
            if client.history().is_empty() {
                println!("(empty)");
            }
            for message in client.history() {
                println!("[{}] {}", message.role, message.content);
            }
        }
        "generate" if !rest.is_empty() => {
            client.prompt = rest.to_string();
            report(client.generate());
        }
        "save" => match settings.save() {
            Ok(path) => println!("Settings saved to {}", path.display()),
            Err(e) => eprintln!("Error: {}", e),
        },
        _ => eprintln!("Unknown command: /{}", command),
    }
}

fn report(result: Result<Option<String>, ClientError>) {
    match result {
        Ok(answer) => print_answer(answer),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn print_answer(answer: Option<String>) {
    match answer {
        Some(text) => println!("{}", text),
        None => println!("(no response)"),
    }
}

/// Remove `flag` from `args`, returning whether it was present.
fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|arg| arg != flag);
    args.len() != before
}

fn apply_env_overrides(settings: &mut AppSettings) {
    if let Ok(base_url) = env::var("OLLAMA_BASE_URL") {
        settings.base_url = base_url;
    }
    if let Ok(model_name) = env::var("OLLAMA_MODEL") {
        settings.model_name = model_name;
    }
    if let Some(temperature) = env::var("OLLAMA_TEMPERATURE").ok().and_then(|s| s.parse().ok()) {
        settings.temperature = temperature;
    }
    if let Some(max_tokens) = env::var("OLLAMA_MAX_TOKENS").ok().and_then(|s| s.parse().ok()) {
        settings.max_tokens = max_tokens;
    }
    if let Some(timeout) = env::var("OLLAMA_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()) {
        settings.timeout_secs = timeout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ollama_client::ClientConfig;

    #[test]
    fn test_run_once_propagates_transport_error() {
        let mut client = OllamaClient::new(ClientConfig::default().with_base_url("not a url"));
        client.prompt = "hello".to_string();

        let err = run_once(&client).unwrap_err();
        assert_eq!(err.to_string(), "generate request");
        assert!(err.downcast_ref::<ClientError>().is_some());
    }

    #[test]
    fn test_take_flag() {
        let mut args = vec!["--save-settings".to_string(), "hi".to_string()];
        assert!(take_flag(&mut args, "--save-settings"));
        assert_eq!(args, vec!["hi".to_string()]);
        assert!(!take_flag(&mut args, "--save-settings"));
    }
}
