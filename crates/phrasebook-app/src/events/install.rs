use kanal::AsyncSender;
use phrasebook_types::{AppEvent, InstallOutcome};

use super::Session;

pub async fn handle_install(
    session: &mut Session,
    choice: InstallOutcome,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if session.install.replay(choice).await.is_none() {
        app_to_ui_tx
            .send(AppEvent::Notice(
                "There is no install offer right now.".to_string(),
            ))
            .await?;
        return Ok(());
    }

    app_to_ui_tx.send(AppEvent::InstallAvailable(false)).await?;
    session.render(app_to_ui_tx).await
}
