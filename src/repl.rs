use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::bot::ChatBot;
use crate::logic::Reply;

const EXIT_KEYWORDS: [&str; 2] = ["exit", "quit"];
const FAREWELL: &str = "Bye! 👋";
const REPLY_LABEL: &str = "bot:";
const PROMPT: &str = "you: ";

/// Outcome of one input line.
#[derive(Debug)]
pub enum Turn {
    /// An exit keyword was entered.
    Exit,
    /// Empty input, nothing to do.
    Skip,
    Reply(Reply),
    /// Response generation failed; the session stays usable.
    Failed(String),
}

pub struct ChatSession {
    bot: ChatBot,
}

impl ChatSession {
    pub fn new(bot: ChatBot) -> Self {
        Self { bot }
    }

    pub async fn handle_line(&self, line: &str) -> Turn {
        let input = line.trim();

        if input.is_empty() {
            return Turn::Skip;
        }

        if EXIT_KEYWORDS.contains(&input.to_lowercase().as_str()) {
            return Turn::Exit;
        }

        match self.bot.get_response(input).await {
            Ok(reply) => Turn::Reply(reply),
            Err(e) => Turn::Failed(e.to_string()),
        }
    }
}

fn print_farewell() {
    println!("{} {}", REPLY_LABEL.green().bold(), FAREWELL);
}

/// Blocking read-eval-print loop. Returns cleanly on an exit keyword,
/// Ctrl-C or Ctrl-D.
pub async fn run(session: &ChatSession) -> Result<(), ReadlineError> {
    let mut rl = Editor::<(), DefaultHistory>::new()?;

    println!(
        "{}",
        "Chat ready. Type 'exit' or 'quit' to leave.\n".cyan()
    );

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());

                match session.handle_line(&line).await {
                    Turn::Exit => {
                        print_farewell();
                        break;
                    }
                    Turn::Skip => continue,
                    Turn::Reply(reply) => {
                        println!(
                            "{} {}",
                            REPLY_LABEL.green().bold(),
                            reply.to_string().truecolor(255, 236, 179)
                        );
                    }
                    Turn::Failed(message) => {
                        eprintln!("{}", format!("Error generating response: {message}").red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                print_farewell();
                break;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}
