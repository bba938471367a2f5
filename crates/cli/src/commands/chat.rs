//! `freightdesk chat` — Interactive or single-message chat mode.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use freightdesk_assistant::{Assistant, Session};
use freightdesk_config::AppConfig;
use freightdesk_core::message::ConversationId;
use freightdesk_core::transcript::TranscriptStore;
use freightdesk_providers::GroqProvider;
use freightdesk_transcripts::FileStore;

pub async fn run(
    message: Option<String>,
    data: Option<PathBuf>,
    conversation: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for the credential early — give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GROQ_API_KEY        (recommended)");
        eprintln!("    FREIGHTDESK_API_KEY");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let api_key = config.require_api_key()?.to_string();
    let provider = GroqProvider::new("groq", &config.base_url, api_key)?;
    let store = FileStore::new(&config.history_dir);
    let assistant = Assistant::new(Arc::new(provider), config.clone());

    let mut session = match conversation {
        Some(id) => {
            let id = ConversationId::from(&id);
            let saved = store
                .load(&id)
                .await?
                .ok_or_else(|| format!("No saved conversation with id {id}"))?;
            Session::resume(saved)
        }
        None => Session::new(),
    };

    if let Some(path) = &data {
        attach_dataset(&mut session, path, &config)?;
    }

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = session.send(&assistant, &store, &msg).await?;
        eprint!("\r              \r");
        println!("{reply}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  FreightDesk — Logistics Assistant");
    println!();
    println!("  Model:        {}", config.default_model);
    match session.dataset() {
        Some(ds) => println!(
            "  Dataset:      {} ({} rows × {} columns)",
            ds.file_name,
            ds.table.row_count(),
            ds.table.column_count()
        ),
        None => println!("  Dataset:      none (use --data to attach one)"),
    }
    println!("  Conversation: {}", session.id());
    println!();
    println!("  Type a question, or 'exit' to quit.");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt == "exit" || prompt == "quit" {
            break;
        }

        match session.send(&assistant, &store, prompt).await {
            Ok(reply) => println!("\n{reply}\n"),
            Err(e) => eprintln!("\n  error: {e}\n"),
        }
    }

    println!("  Conversation saved as {}", session.id());
    Ok(())
}

fn attach_dataset(
    session: &mut Session,
    path: &Path,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = freightdesk_loader::load(path, config.max_file_size_mb)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("dataset")
        .to_string();
    session.attach_table(file_name, table)?;
    Ok(())
}
