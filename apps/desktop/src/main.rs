use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use client_core::{ChatSession, HttpChatTransport, SendOutcome};

mod settings;
mod validate;

#[derive(Parser, Debug)]
struct Args {
    /// Chat backend base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    server_url: Option<String>,
    /// User identifier the backend scopes the conversation to.
    #[arg(long)]
    user_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = settings::load_settings(args.server_url, args.user_id)?;

    let transport = Arc::new(HttpChatTransport::new(settings.server_url.clone()));
    let session = ChatSession::new(settings.user_id.clone(), transport);

    println!(
        "Connected to {} as {}. Type a message, /quit to exit.",
        settings.server_url, settings.user_id
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "/quit" {
            break;
        }

        let text = match validate::validate_message(line) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match session.send(text).await {
            Ok(SendOutcome::Delivered(assistant)) => println!("{}", assistant.text),
            Ok(SendOutcome::Failed(error)) => {
                eprintln!("{error}");
                session.clear_error().await;
            }
            // Unreachable while input is read serially, but the
            // controller enforces single-flight regardless.
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}
