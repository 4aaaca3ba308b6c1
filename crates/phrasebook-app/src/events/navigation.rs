use kanal::AsyncSender;
use phrasebook_types::{AppEvent, UiEvent};

use super::Session;

pub async fn handle_navigation(
    session: &mut Session,
    event: &UiEvent,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let browse = &mut session.browse;
    let page = match event {
        UiEvent::FirstPage => browse.first_page(),
        UiEvent::PreviousPage => browse.previous_page(),
        UiEvent::NextPage => browse.next_page(),
        UiEvent::LastPage => browse.last_page(),
        UiEvent::SelectPage(page) => browse.set_page(*page),
        _ => return Ok(()),
    };
    tracing::debug!("Showing page {}", page);

    session.render(app_to_ui_tx).await
}

/// Manual "go to page": invalid input leaves the page untouched
pub async fn handle_jump(
    session: &mut Session,
    input: &str,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match session.browse.jump_to(input) {
        Ok(page) => {
            tracing::debug!("Jumped to page {}", page);
            session.render(app_to_ui_tx).await
        }
        Err(e) => {
            tracing::debug!("Rejected page jump {:?}: {:?}", input, e);
            app_to_ui_tx.send(AppEvent::Notice(e.to_string())).await?;
            Ok(())
        }
    }
}
