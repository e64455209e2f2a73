use rust_chat_bot::bot::ChatBot;
use rust_chat_bot::logic::LogicAdapterConfig;
use rust_chat_bot::repl::{self, ChatSession};
use rust_chat_bot::storage;
use rust_chat_bot::training::{CorpusTrainer, ListTrainer};
use std::path::Path;
use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dotenv::dotenv;
use log::warn;

const BOT_NAME: &str = "TerminalBot";
const DATABASE_FILE: &str = "chatbot.sqlite3";
const STORAGE_ADAPTER: &str = "storage.sqlite";
const LOGIC_ADAPTER: &str = "logic.best_match";
const CORPUS_DATASET: &str = "corpus.english";

const LIST_TRAINING_DATA: [&str; 8] = [
    "Hello! How are you doing?",
    "I am doing very well, thank you for asking.",
    "Who made you?",
    "I was put together as a terminal chat assistant.",
    "What can you do?",
    "I can chat in the terminal and learn from examples.",
    "Thanks!",
    "You're welcome!",
];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a terminal chat session with the bot.
    Chat {
        /// Train on the built-in English corpus before starting the chat.
        #[arg(long)]
        train: bool,

        /// Delete the bot's SQLite database before starting.
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colored::control::set_override(true);

    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Chat { train, reset } => run_chat(train, reset).await,
    }
}

async fn run_chat(train: bool, reset: bool) -> anyhow::Result<()> {
    if reset {
        let removed = storage::reset_database(Path::new(DATABASE_FILE))
            .with_context(|| format!("Failed to remove {DATABASE_FILE}"))?;
        if removed {
            warn!("Removed {DATABASE_FILE}");
            println!("{}", format!("Removed {DATABASE_FILE}").yellow());
        }
    }

    let bot = ChatBot::new(
        BOT_NAME,
        STORAGE_ADAPTER,
        &format!("sqlite:///{DATABASE_FILE}"),
        &[LogicAdapterConfig::new(LOGIC_ADAPTER)],
        false, // allow learning during the session
    )
    .await
    .context("Failed to start the chat bot")?;

    if train {
        println!("{}", "Training on the English corpus...".cyan());

        CorpusTrainer::new(bot.storage())
            .train(CORPUS_DATASET)
            .await
            .context("Corpus training failed")?;

        ListTrainer::new(bot.storage())
            .train(&LIST_TRAINING_DATA)
            .await
            .context("List training failed")?;

        println!("{}", "Training complete.".green());
    }

    let session = ChatSession::new(bot);
    repl::run(&session).await?;

    Ok(())
}
