use std::fmt;

use serde::{Deserialize, Serialize};

/// One phrasebook entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: u32,
    /// Source-language text (Bengali)
    pub source: String,
    /// Gloss (English)
    pub gloss: String,
    /// Target-language text (Italian)
    pub target: String,
    /// Phonetic pronunciation of the target text
    pub pronunciation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Entry of the pagination display list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Everything the presentation layer needs to draw one screen
#[derive(Debug, Clone, Default)]
pub struct PageView {
    /// Raw (not debounced) search term, echoed in the empty-result message
    pub search_term: String,
    pub phrases: Vec<Phrase>,
    /// Number of phrases matching the debounced term
    pub match_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_items: Vec<PageItem>,
    pub installable: bool,
}

impl PageView {
    /// Pagination controls are only drawn when there is more than one page
    pub fn show_controls(&self) -> bool {
        self.total_pages > 1
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallOutcome::Accepted => "accepted",
            InstallOutcome::Dismissed => "dismissed",
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    /// Search term that survived the debounce window
    SearchSettled(String),
    ShowPage(PageView),
    /// Non-fatal message for the user
    Notice(String),
    InstallAvailable(bool),
    BackendReady,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SearchInput(String),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    SelectPage(usize),
    /// Raw text typed into the "go to page" input
    JumpToPage(String),
    /// Index of the card on the current page (0-based)
    Speak(usize),
    SpeakSlowly(usize),
    StopSpeech,
    Install,
    DismissInstall,
    Quit,
}
