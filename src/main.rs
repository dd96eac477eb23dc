use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use tonality::analysis::{self, SentimentRecord};
use tonality::{AppConfig, RuntimeConfig, SentimentClassifier, VkClient};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding model.onnx, tokenizer.json and labels.json
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Run on the CPU even when an accelerator is available
    #[arg(long)]
    cpu: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a single text
    Text { text: String },
    /// Fetch and classify posts from a group wall
    Group {
        /// Group link, e.g. https://vk.com/themovieblog
        url: String,
        #[arg(short, long, default_value_t = 100)]
        max_count: usize,
    },
    /// Fetch and classify comments under a wall post
    Post {
        /// Post link, e.g. https://vk.com/wall-12345_678
        url: String,
        #[arg(short, long, default_value_t = 100)]
        max_count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let config = AppConfig::from_env()?;
    let model_dir = args.model_dir.unwrap_or_else(|| config.model_dir.clone());

    info!("Building sentiment classifier from {:?}...", model_dir);
    let start = Instant::now();

    let runtime_config = RuntimeConfig {
        prefer_accelerated: !args.cpu,
        ..RuntimeConfig::default()
    };

    // One classifier for the whole process; every command below borrows it.
    let classifier = SentimentClassifier::builder()
        .with_runtime_config(runtime_config)
        .with_artifact_dir(&model_dir)?
        .build()?;
    info!(
        "Classifier ready (took {:.2?}), device: {}",
        start.elapsed(),
        classifier.device()
    );

    match args.command {
        Command::Text { text } => {
            let label = classifier.predict(&text)?;
            println!("Тональность: {label}");
        }
        Command::Group { url, max_count } => {
            let vk = VkClient::new(config.vk_token).with_progress(|p| info!("Loading: {p}%"));
            let posts = vk.get_posts(&url, max_count).await?;
            let records = analysis::analyze_posts(&classifier, &posts);
            print_records(&records, posts.len());
        }
        Command::Post { url, max_count } => {
            let vk = VkClient::new(config.vk_token).with_progress(|p| info!("Loading: {p}%"));
            let comments = vk.get_comments(&url, max_count).await?;
            let records = analysis::analyze_comments(&classifier, &comments);
            print_records(&records, comments.len());
        }
    }

    Ok(())
}

fn print_records(records: &[SentimentRecord], fetched: usize) {
    for record in records {
        println!(
            "{}  {:<18}  {}",
            record.formatted_date(),
            record.sentiment,
            preview(&record.text)
        );
    }

    let counts = analysis::count_by_sentiment(records);
    let percentages = analysis::sentiment_percentages(&counts);
    println!();
    println!(
        "Распределение тональности ({} из {} записей):",
        records.len(),
        fetched
    );
    for (label, count) in &counts {
        println!("  {:<18} {:>4}  ({:.1}%)", label, count, percentages[label]);
    }
}

/// First line of the text, clipped for table output.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut clipped: String = line.chars().take(80).collect();
    if clipped.len() < line.len() {
        clipped.push('…');
    }
    clipped
}
