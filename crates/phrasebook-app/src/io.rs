use std::io::BufRead;

use kanal::{AsyncReceiver, AsyncSender};
use phrasebook_types::{AppEvent, UiEvent};
use tokio_util::sync::CancellationToken;

pub const HELP: &str = "\
Type to search. Commands:
  /first /prev /next /last   move between pages
  /page <n>                  open page n
  /go <n>                    go to page n (checked)
  /say <card>                speak a card's Italian phrase
  /slow <card>               speak it slowly, word by word
  /stop                      stop speaking
  /install /dismiss          answer the install offer
  /clear                     clear the search
  /help /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ui(UiEvent),
    Help,
    Unknown(String),
}

/// Map one input line to a command. Anything not starting with `/` is search input.
pub fn parse_command(line: &str) -> Command {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Ui(UiEvent::SearchInput(line.to_string()));
    };

    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let card = |arg: &str| arg.parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1);

    let event = match name {
        "first" => UiEvent::FirstPage,
        "prev" => UiEvent::PreviousPage,
        "next" => UiEvent::NextPage,
        "last" => UiEvent::LastPage,
        "page" => match arg.parse::<usize>() {
            Ok(page) => UiEvent::SelectPage(page),
            Err(_) => return Command::Unknown(line.to_string()),
        },
        "go" => UiEvent::JumpToPage(arg.to_string()),
        "say" => match card(arg) {
            Some(index) => UiEvent::Speak(index),
            None => return Command::Unknown(line.to_string()),
        },
        "slow" => match card(arg) {
            Some(index) => UiEvent::SpeakSlowly(index),
            None => return Command::Unknown(line.to_string()),
        },
        "stop" => UiEvent::StopSpeech,
        "install" => UiEvent::Install,
        "dismiss" => UiEvent::DismissInstall,
        "clear" => UiEvent::SearchInput(String::new()),
        "quit" | "exit" => UiEvent::Quit,
        "help" => return Command::Help,
        _ => return Command::Unknown(line.to_string()),
    };

    Command::Ui(event)
}

/// Read stdin lines on a plain thread so a pending read never holds up shutdown
pub fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::unbounded_async::<String>();

    let spawned = std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.try_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            tracing::debug!("stdin closed");
        });

    if let Err(e) = spawned {
        tracing::error!("Failed to spawn stdin reader: {}", e);
    }

    rx
}

/// Turn input lines into events for the app
pub async fn watcher_io(
    lines: AsyncReceiver<String>,
    cancel: CancellationToken,
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Input watcher stopping");
                return Ok(());
            }
            line = lines.recv() => line,
        };

        let Ok(line) = line else {
            // end of input behaves like /quit
            ui_to_app_tx.send(AppEvent::UiEvent(UiEvent::Quit)).await?;
            return Ok(());
        };

        match parse_command(&line) {
            Command::Ui(event) => {
                ui_to_app_tx.send(AppEvent::UiEvent(event)).await?;
            }
            Command::Help => {
                app_to_ui_tx.send(AppEvent::Notice(HELP.to_string())).await?;
            }
            Command::Unknown(input) => {
                app_to_ui_tx
                    .send(AppEvent::Notice(format!(
                        "Unknown command: {input} (type /help)"
                    )))
                    .await?;
            }
        }
    }
}
