use kanal::AsyncSender;
use phrasebook_types::AppEvent;

use super::Session;

/// Record the raw term and restart the debounce window
pub async fn handle_search_input(session: &mut Session, term: String) -> anyhow::Result<()> {
    session.browse.set_search_input(term.clone());
    session.debouncer.push(AppEvent::SearchSettled(term)).await?;
    Ok(())
}

pub async fn handle_search_settled(
    session: &mut Session,
    term: &str,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    session.browse.apply_search(term);
    tracing::debug!(
        "Search {:?}: {} matches over {} pages",
        term,
        session.browse.match_count(),
        session.browse.total_pages()
    );
    session.render(app_to_ui_tx).await
}
