use kanal::AsyncSender;
use phrasebook_types::AppEvent;

use super::Session;

/// Speak the Italian text of a card on the current page
pub async fn handle_speech(
    session: &mut Session,
    index: usize,
    slowly: bool,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(phrase) = session.browse.phrase_on_page(index) else {
        app_to_ui_tx
            .send(AppEvent::Notice(format!("No card {} on this page.", index + 1)))
            .await?;
        return Ok(());
    };
    let text = phrase.target.clone();

    let result = if slowly {
        session.player.speak_slowly(&text)
    } else {
        session.player.speak(&text)
    };

    if let Err(e) = result {
        app_to_ui_tx.send(AppEvent::Notice(e.to_string())).await?;
    }

    Ok(())
}

pub fn handle_stop(session: &mut Session) {
    session.player.stop();
}
