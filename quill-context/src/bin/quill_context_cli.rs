use clap::Parser;
use quill_context::text::TextSplitter;
use std::fs;
use std::io::{self, Read};

/// A CLI tool to split a document into retrieval chunks as JSON output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Target size for each chunk in characters.
    #[arg(short, long, default_value_t = 500)]
    chunk_size: usize,

    /// Number of words carried over between adjacent chunks.
    #[arg(short, long, default_value_t = 50)]
    overlap: usize,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let document = if let Some(input_path) = args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let splitter = TextSplitter::new(args.chunk_size, args.overlap);
    let chunks = splitter.split(&document);

    let json_output = serde_json::to_string_pretty(&chunks)?;
    println!("{}", json_output);

    Ok(())
}
