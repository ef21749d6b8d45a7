//! A terminal front end for chatting with the little-chat backend.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::pin::pin;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use little_chat::command::HELP;
use little_chat::interrupt::listen_for_interrupts;
use little_chat::settings::{KNOWN_MODELS, model_display_name};
use little_chat::{Command, Settings};
use little_chat_core::{
    Conversation, ConversationBuilder, Role, TranscriptEvent, TurnOutcome,
};
use little_chat_http::HttpProvider;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// What the terminal needs to know about transcript changes.
enum ChatEvent {
    ReplyStarted,
    Fragment(String),
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::from_env();
    let provider = HttpProvider::new(settings.backend.clone());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut conversation = ConversationBuilder::with_provider(provider)
        .on_change(move |event, messages| match event {
            TranscriptEvent::Appended(id) => {
                let is_reply = messages
                    .iter()
                    .any(|m| m.id() == *id && m.role() == Role::Assistant);
                if is_reply {
                    event_tx.send(ChatEvent::ReplyStarted).ok();
                }
            }
            TranscriptEvent::ContentAppended { fragment, .. } => {
                event_tx.send(ChatEvent::Fragment(fragment.to_string())).ok();
            }
            _ => {}
        })
        .build();

    let mut interrupt_rx = listen_for_interrupts();

    print_welcome(&settings);
    if let Err(err) = conversation.check_health().await {
        warn!("health check failed: {err}");
        println!(
            "{}",
            format!(
                "⚠️  Backend server is not running at {}. Please start it first.",
                settings.backend.base_url()
            )
            .bright_yellow()
        );
    }

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let line = select! {
            line = read_line() => line,
            Some(()) = interrupt_rx.recv() => {
                // Stdin is still being read on a blocking thread, which
                // would keep the runtime from shutting down.
                println!();
                std::process::exit(130);
            }
        };
        let Some(line) = line else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Submit(text) => {
                run_turn(
                    &mut conversation,
                    &settings,
                    &text,
                    &mut event_rx,
                    &mut interrupt_rx,
                )
                .await;
            }
            Command::SetCredential(credential) => {
                settings.chat.set_credential(credential);
                println!("API key: {}", settings.masked_credential());
            }
            Command::SetModel(model) => {
                if model_display_name(&model).is_none() {
                    println!("Note: {model} is not a known model.");
                }
                settings.chat.set_model(model);
            }
            Command::SetSystemInstruction(instruction) => {
                settings.chat.set_system_instruction(instruction);
            }
            Command::ShowSettings => print_settings(&settings),
            Command::ListModels => {
                for (id, name) in KNOWN_MODELS {
                    let marker = if *id == settings.chat.model() {
                        "*"
                    } else {
                        " "
                    };
                    println!("{marker} {id:<16} {name}");
                }
            }
            Command::Clear => {
                conversation.clear();
                println!("Conversation cleared.");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Usage(usage) => println!("Usage: {usage}"),
            Command::Unknown(name) => {
                println!("Unknown command /{name}, try /help.");
            }
        }
    }
}

async fn run_turn(
    conversation: &mut Conversation,
    settings: &Settings,
    text: &str,
    event_rx: &mut mpsc::UnboundedReceiver<ChatEvent>,
    interrupt_rx: &mut mpsc::UnboundedReceiver<()>,
) {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut progress_bar: Option<ProgressBar> = None;
    let mut printed_any = false;

    let mut handle_event = |event: ChatEvent,
                            progress_bar: &mut Option<ProgressBar>| {
        match event {
            ChatEvent::ReplyStarted => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(progress_style.clone());
                bar.set_message("🤔 Thinking...");
                *progress_bar = Some(bar);
            }
            ChatEvent::Fragment(fragment) => {
                // Finish the progress bar before printing anything else.
                if let Some(bar) = progress_bar.take() {
                    bar.finish_and_clear();
                }
                if !printed_any {
                    print!("{}🤖 ", BAR_CHAR.bright_cyan());
                    printed_any = true;
                }
                print!("{}", fragment.bright_white());
                std::io::stdout().flush().ok();
            }
        }
    };

    // Ctrl-C presses from before this turn are not meant for it.
    while interrupt_rx.try_recv().is_ok() {}

    let outcome = {
        let mut turn = pin!(conversation.submit_turn(text, &settings.chat));
        loop {
            if let Some(bar) = &progress_bar {
                bar.inc(1);
            }
            select! {
                outcome = &mut turn => break Some(outcome),
                event = event_rx.recv() => {
                    if let Some(event) = event {
                        handle_event(event, &mut progress_bar);
                    }
                }
                Some(()) = interrupt_rx.recv() => break None,
                _ = sleep(Duration::from_millis(100)) => {}
            }
        }
    };

    // Changes made by the last poll of the turn may still be queued.
    while let Ok(event) = event_rx.try_recv() {
        handle_event(event, &mut progress_bar);
    }
    if let Some(bar) = progress_bar.take() {
        bar.finish_and_clear();
    }
    if printed_any {
        println!();
    }

    match outcome {
        None => println!("{}", "(stopped)".dimmed()),
        Some(outcome @ TurnOutcome::Success(_)) => {
            debug!("turn finished: {outcome:?}");
        }
        Some(outcome) => {
            if let Some(message) = outcome.user_message() {
                println!("{}", format!("❌ {message}").bright_red());
            }
        }
    }
}

fn print_welcome(settings: &Settings) {
    println!("{}", "💬 Welcome to little-chat!".bold());
    println!("Start a conversation by typing a message, or /help.");
    if settings.chat.has_credential() {
        println!("✅ API key configured successfully");
    } else {
        println!("❌ Please configure your API key with /key <api key>");
    }
}

fn print_settings(settings: &Settings) {
    let model = settings.chat.model();
    println!("API key:        {}", settings.masked_credential());
    match model_display_name(model) {
        Some(name) => println!("Model:          {name} ({model})"),
        None => println!("Model:          {model}"),
    }
    println!("System message: {}", settings.chat.system_instruction());
    println!("Backend:        {}", settings.backend.base_url());
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
