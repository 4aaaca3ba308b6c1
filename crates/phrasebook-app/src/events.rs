use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use phrasebook_core::{BrowseState, Debouncer, DeferredInstall};
use phrasebook_speech::{PlaybackSettings, SpeechEngine, SpeechPlayer};
use phrasebook_types::{AppEvent, InstallOutcome, UiEvent};
use tokio_util::sync::CancellationToken;

use crate::install::CacheInstallOffer;
use crate::state::AppState;

pub mod install;
pub mod navigation;
pub mod search;
pub mod speech;

use install::handle_install;
use navigation::{handle_jump, handle_navigation};
use search::{handle_search_input, handle_search_settled};
use speech::{handle_speech, handle_stop};

/// Everything the event loop owns for the lifetime of the app
pub struct Session {
    pub browse: BrowseState,
    pub player: SpeechPlayer,
    pub install: DeferredInstall,
    pub debouncer: Debouncer<AppEvent>,
}

impl Session {
    /// Send the current page to the UI
    pub async fn render(&self, app_to_ui_tx: &AsyncSender<AppEvent>) -> anyhow::Result<()> {
        let view = self.browse.view(self.install.is_installable());
        app_to_ui_tx.send(AppEvent::ShowPage(view)).await?;
        Ok(())
    }
}

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    engine: Arc<dyn SpeechEngine>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let config = state.config.read().await.clone();

    let browse = BrowseState::new(state.store.clone(), config.ui.page_size)?;
    let player = SpeechPlayer::new(engine, PlaybackSettings::from(&config.speech));

    let mut install = DeferredInstall::new();
    if let Some(cache) = &state.cache
        && !config.cache.assets.is_empty()
    {
        if cache.is_installed().await {
            tracing::debug!("Cache {} already installed", cache.name());
        } else {
            tracing::info!("App can be installed into {}", cache.name());
            install.store(Box::new(CacheInstallOffer::new(
                cache.clone(),
                config.cache.assets.clone(),
            )));
        }
    }

    // settled terms come back through our own queue
    let debouncer = Debouncer::with_cancel(
        Duration::from_millis(config.ui.debounce_ms),
        ui_to_app_tx,
        cancel.child_token(),
    );

    let mut session = Session {
        browse,
        player,
        install,
        debouncer,
    };

    app_to_ui_tx.send(AppEvent::BackendReady).await?;
    session.render(&app_to_ui_tx).await?;

    tracing::info!("Event loop started with {} phrases", state.store.len());
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Event loop stopping");
                session.player.stop();
                return Ok(());
            }
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("Event received: {:?}", event);
        if !handle_events(&mut session, &app_to_ui_tx, event).await? {
            session.player.stop();
            app_to_ui_tx.send(AppEvent::Shutdown).await?;
            return Ok(());
        }
    }
}

/// Returns false once the user asked to quit
async fn handle_events(
    session: &mut Session,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::UiEvent(event) => match event {
            UiEvent::SearchInput(term) => {
                handle_search_input(session, term).await?;
            }
            UiEvent::FirstPage
            | UiEvent::PreviousPage
            | UiEvent::NextPage
            | UiEvent::LastPage
            | UiEvent::SelectPage(_) => {
                handle_navigation(session, &event, app_to_ui_tx).await?;
            }
            UiEvent::JumpToPage(input) => {
                handle_jump(session, &input, app_to_ui_tx).await?;
            }
            UiEvent::Speak(index) => {
                handle_speech(session, index, false, app_to_ui_tx).await?;
            }
            UiEvent::SpeakSlowly(index) => {
                handle_speech(session, index, true, app_to_ui_tx).await?;
            }
            UiEvent::StopSpeech => handle_stop(session),
            UiEvent::Install => {
                handle_install(session, InstallOutcome::Accepted, app_to_ui_tx).await?;
            }
            UiEvent::DismissInstall => {
                handle_install(session, InstallOutcome::Dismissed, app_to_ui_tx).await?;
            }
            UiEvent::Quit => {
                tracing::info!("Quit requested");
                return Ok(false);
            }
        },
        AppEvent::SearchSettled(term) => {
            handle_search_settled(session, &term, app_to_ui_tx).await?;
        }
        AppEvent::ShowPage(_)
        | AppEvent::Notice(_)
        | AppEvent::InstallAvailable(_)
        | AppEvent::BackendReady => {
            // UI-only events
        }
        AppEvent::Shutdown => return Ok(false),
    }

    Ok(true)
}
