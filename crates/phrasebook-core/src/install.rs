use async_trait::async_trait;
use phrasebook_types::InstallOutcome;

/// An "install this app" offer from the host, replayed later on user action
#[async_trait]
pub trait InstallOffer: Send + Sync {
    /// Present the offer with the user's choice and report the outcome.
    /// Failures while installing are the offer's own concern.
    async fn prompt(&self, choice: InstallOutcome) -> InstallOutcome;
}

/// Holds at most one pending offer
#[derive(Default)]
pub struct DeferredInstall {
    offer: Option<Box<dyn InstallOffer>>,
}

impl DeferredInstall {
    pub fn new() -> Self {
        Self { offer: None }
    }

    /// Keep the offer for later, replacing any earlier one
    pub fn store(&mut self, offer: Box<dyn InstallOffer>) {
        self.offer = Some(offer);
    }

    pub fn is_installable(&self) -> bool {
        self.offer.is_some()
    }

    /// Replay the stored offer. The offer is consumed whatever the outcome.
    pub async fn replay(&mut self, choice: InstallOutcome) -> Option<InstallOutcome> {
        let offer = self.offer.take()?;
        let outcome = offer.prompt(choice).await;
        tracing::info!("User response to the install prompt: {}", outcome.as_str());
        Some(outcome)
    }
}
