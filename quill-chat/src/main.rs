use anyhow::{Context, Result, bail};
use clap::Parser;
use quill_chat::{BackendRegistry, ChatConfig, ChatSession};
use quill_context::TextSplitter;
use quill_embed::{EmbedConfig, FastEmbedProvider};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Chat with a Markdown document using retrieval-augmented generation
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Markdown file to load
    file: PathBuf,

    /// Completion backend: openai, gemini, github, or lm-studio
    #[arg(short, long, default_value = "lm-studio")]
    backend: String,

    /// Override CHUNK_SIZE from the environment
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Override CHUNK_OVERLAP from the environment
    #[arg(long)]
    chunk_overlap: Option<usize>,

    /// Override TOP_K_CHUNKS from the environment
    #[arg(long)]
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = ChatConfig::from_env();

    let registry = BackendRegistry::from_config(&config);
    let Some(backend) = registry.get(&args.backend) else {
        bail!(
            "unknown backend '{}', available: {}",
            args.backend,
            registry.names().join(", ")
        );
    };

    let chunk_size = args.chunk_size.unwrap_or(config.chunk_size);
    let chunk_overlap = args.chunk_overlap.unwrap_or(config.chunk_overlap);
    let top_k = args.top_k.unwrap_or(config.top_k_chunks);

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    println!("Loading embedding model...");
    let provider = FastEmbedProvider::create(EmbedConfig::new(&config.embedding_model)).await?;

    let splitter = TextSplitter::new(chunk_size, chunk_overlap);
    let mut session = ChatSession::new(Arc::new(provider), splitter, top_k);

    let chunk_count = session
        .load_document(&content)
        .await
        .with_context(|| format!("failed to index {}", args.file.display()))?;
    println!(
        "Indexed {chunk_count} chunks from {} (backend: {})",
        args.file.display(),
        backend.backend_name()
    );
    println!("Ask a question, :clear to reset the conversation, :quit to exit.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        match question {
            ":quit" | ":q" => break,
            ":clear" => {
                session.clear_history();
                println!("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        match session.ask(backend.as_ref(), question).await {
            Ok(turn) => {
                println!("\n{}\n", turn.answer);
                for (i, hit) in turn.retrieved.iter().enumerate() {
                    println!(
                        "  [chunk {} | distance {:.2}] {}",
                        i + 1,
                        hit.distance,
                        preview(&hit.text)
                    );
                }
                println!();
            }
            Err(error) => eprintln!("error: {error}"),
        }
    }

    Ok(())
}

/// First line of a chunk, truncated for terminal display.
fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.len() > 80 {
        let cut = first_line
            .char_indices()
            .take_while(|(i, _)| *i < 80)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &first_line[..cut])
    } else {
        first_line.to_string()
    }
}
