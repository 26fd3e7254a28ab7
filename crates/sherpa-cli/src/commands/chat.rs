//! Interactive chat with the AI Sherpa.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use sherpa_core::chat::{
    ChatMessage, ChatSession, MessageRole, MysteryOracle, ReasoningMode, SendOutcome,
};
use sherpa_core::speech::{SpeakOutcome, SpeechPlayer};
use crate::context::{AppContext, SpeechOutput};

const COMMANDS: &[&str] = &[
    "/speak", "/deep", "/fast", "/mode", "/history", "/clue", "/help", "/quit",
];

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Message(String),
    /// Speak a history entry; `None` means the latest assistant reply.
    Speak(Option<usize>),
    Mode(ReasoningMode),
    ToggleMode,
    History,
    Clue,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return match trimmed {
                "quit" | "exit" => Self::Quit,
                _ => Self::Message(line.to_string()),
            };
        }

        let mut parts = trimmed.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let arg = parts.next();
        match (command, arg) {
            ("/speak", None) => Self::Speak(None),
            ("/speak", Some(index)) => match index.parse() {
                Ok(index) => Self::Speak(Some(index)),
                Err(_) => Self::Unknown(trimmed.to_string()),
            },
            ("/deep", None) => Self::Mode(ReasoningMode::Deep),
            ("/fast", None) => Self::Mode(ReasoningMode::Fast),
            ("/mode", None) => Self::ToggleMode,
            ("/history", None) => Self::History,
            ("/clue", None) => Self::Clue,
            ("/help", None) => Self::Help,
            ("/quit" | "/exit", None) => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

fn print_message(index: usize, message: &ChatMessage) {
    let time = message.created_at.format("%H:%M");
    match message.role {
        MessageRole::User => {
            println!("{}", format!("[{index}] {time} you").green());
            println!("{}", message.text.green());
        }
        MessageRole::Assistant => {
            println!("{}", format!("[{index}] {time} sherpa").bright_magenta());
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

fn print_help() {
    println!("{}", "Type a question, or one of:".bright_black());
    println!("{}", "  /speak [N]   read reply N aloud (default: latest)".bright_black());
    println!("{}", "  /deep        careful reasoning (slower)".bright_black());
    println!("{}", "  /fast        quick answers".bright_black());
    println!("{}", "  /mode        switch between the two".bright_black());
    println!("{}", "  /history     show the conversation".bright_black());
    println!("{}", "  /clue        a hint about the Mystery Day".bright_black());
    println!("{}", "  /quit        leave".bright_black());
}

fn print_mode(mode: ReasoningMode) {
    let label = if mode.is_deep() { "deep reasoning" } else { "fast" };
    println!("{}", format!("Mode: {label}").bright_black());
}

fn latest_reply(history: &[ChatMessage]) -> Option<usize> {
    history
        .iter()
        .rposition(|message| message.role == MessageRole::Assistant)
}

async fn speak(
    session: &ChatSession,
    player: &SpeechPlayer,
    output: &SpeechOutput,
    index: Option<usize>,
) {
    let history = session.history().await;
    let Some(index) = index.or_else(|| latest_reply(&history)) else {
        println!("{}", "Nothing to speak yet.".yellow());
        return;
    };
    let Some(message) = history.get(index) else {
        println!("{}", format!("No message {index}. See /history.").yellow());
        return;
    };

    println!("{}", format!("Speaking message {index}...").bright_black());
    match player.speak(&message.text, index).await {
        SpeakOutcome::Played => {
            if let Some(note) = output.played_note() {
                println!("{}", note.bright_black());
            }
        }
        SpeakOutcome::NoAudio => println!("{}", "Speech is unavailable right now.".yellow()),
        SpeakOutcome::Failed(err) => println!("{}", format!("Could not play audio: {err}").red()),
        SpeakOutcome::Ignored => println!("{}", "Already speaking.".yellow()),
    }
}

pub async fn run(ctx: &AppContext, deep: bool) -> Result<()> {
    let generator = ctx.text_generator().await?;
    let (player, output) = ctx.speech_player().await?;
    let session = ChatSession::new(Arc::clone(&generator));
    let oracle = MysteryOracle::new(generator);

    if deep {
        session.set_mode(ReasoningMode::Deep).await;
    }
    tracing::info!("[Chat {}] Session started", session.id());

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== AI Sherpa ===".bright_magenta().bold());
    println!("{}", "Type /help for commands, /quit to leave.".bright_black());
    println!();
    for (index, message) in session.history().await.iter().enumerate() {
        print_message(index, message);
    }

    loop {
        let prompt = match session.mode().await {
            ReasoningMode::Fast => ">> ",
            ReasoningMode::Deep => "deep>> ",
        };

        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.as_str());
        }

        match ReplCommand::parse(&line) {
            ReplCommand::Message(text) => {
                session.set_draft(text).await;
                println!("{}", "thinking...".bright_black());
                if let SendOutcome::Replied { reply_index } = session.submit_draft().await {
                    if let Some(reply) = session.message(reply_index).await {
                        print_message(reply_index, &reply);
                    }
                }
            }
            ReplCommand::Speak(index) => speak(&session, &player, &output, index).await,
            ReplCommand::Mode(mode) => {
                session.set_mode(mode).await;
                print_mode(mode);
            }
            ReplCommand::ToggleMode => print_mode(session.toggle_deep_reasoning().await),
            ReplCommand::History => {
                for (index, message) in session.history().await.iter().enumerate() {
                    print_message(index, message);
                }
            }
            ReplCommand::Clue => {
                if let Some(clue) = oracle.reveal_clue().await {
                    for line in clue.lines() {
                        println!("{}", line.bright_magenta().italic());
                    }
                }
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(input) => {
                println!("{}", format!("Unknown command: {input}").bright_black());
            }
        }
    }

    println!("{}", "Namaste! Safe travels.".bright_green());
    Ok(())
}
