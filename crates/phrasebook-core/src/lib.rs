pub mod debounce;
pub mod error;
pub mod filter;
pub mod install;
pub mod pagination;
pub mod state;
pub mod store;

pub use debounce::Debouncer;
pub use error::{DebounceError, JumpError, LoadError, PaginationError};
pub use filter::filter;
pub use install::{DeferredInstall, InstallOffer};
pub use pagination::{Page, page_items, paginate, parse_page_jump};
pub use state::BrowseState;
pub use store::PhraseStore;
