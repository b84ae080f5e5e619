use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use newsgenie_core::category::NO_CATEGORY;
use newsgenie_core::{Category, ChatMessage, ChatRole, Config, QueryRequest, Transcript};

use crate::app::App;

const ACTIONS: [&str; 6] = [
    "Ask NewsGenie anything",
    "Pick a news category",
    "Show conversation",
    "Clear conversation",
    "Change Gemini API key",
    "Exit",
];

pub async fn run(app: &mut App) -> Result<()> {
    println!("\n{}", "📰 NewsGenie: Your AI News & Search Assistant".bold().blue());
    println!("Ask for the latest news (by category), or any web information!");
    println!("{}", "=".repeat(50).dimmed());

    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let text: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Ask NewsGenie anything")
                    .allow_empty(true)
                    .interact_text()?;
                submit(app, &QueryRequest::text(text)).await;
            }
            1 => {
                let request = pick_category()?;
                submit(app, &request).await;
            }
            2 => print_transcript(&app.transcript),
            3 => {
                app.transcript.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            4 => {
                let key = prompt_gemini_api_key()?;
                app.set_gemini_api_key(&key);
                println!("{}", "✅ API key set successfully!".green());
            }
            _ => break,
        }
    }

    Ok(())
}

fn pick_category() -> Result<QueryRequest> {
    let mut options = vec![NO_CATEGORY];
    options.extend(Category::all().iter().map(|c| c.display_name()));

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Pick a news category")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(QueryRequest::parse(options[selection], "")?)
}

pub async fn submit(app: &mut App, request: &QueryRequest) {
    if !request.is_empty() {
        println!("{}", "Fetching response...".dimmed());
    }

    match app.submit(request).await {
        Ok(_) => {
            if let [.., user, assistant] = app.transcript.messages() {
                print_message(user);
                print_message(assistant);
            }
        }
        Err(e) => println!("{}", e.to_string().yellow()),
    }
}

/// Ask for a Gemini key on the terminal, optionally saving it to the config
/// file.
pub fn prompt_gemini_api_key() -> Result<String> {
    println!("{}", "To use NewsGenie, you need a Gemini API key:".bold());
    println!("  1. Go to https://aistudio.google.com/app/apikey");
    println!("  2. Create a free account and generate an API key");
    println!("  3. Paste it below\n");

    let key: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your Gemini API key")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a valid API key")
            } else {
                Ok(())
            }
        })
        .interact()?;
    let key = key.trim().to_string();

    let save = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save this key to the config file?")
        .default(false)
        .interact()?;
    if save {
        match Config::save_gemini_api_key(&key) {
            Ok(()) => println!("{}", "Key saved.".dimmed()),
            Err(e) => println!("{}: {}", "Could not save key".red(), e),
        }
    }

    Ok(key)
}

pub fn print_message(message: &ChatMessage) {
    let label = format!("{}:", message.role.display_name());
    match message.role {
        ChatRole::User => println!("\n{} {}", label.bold().cyan(), message.content),
        ChatRole::Assistant => {
            println!("{} {}", label.bold().green(), message.content);
            println!("{}", "---".dimmed());
        }
    }
}

fn print_transcript(transcript: &Transcript) {
    if transcript.is_empty() {
        println!("{}", "No conversation yet.".dimmed());
        return;
    }

    println!("\n{}", "💬 Conversation".bold().blue());
    for message in transcript.messages() {
        print_message(message);
    }
}
