use std::fmt::Write;

use kanal::AsyncReceiver;
use phrasebook_config::ui::UiConfig;
use phrasebook_types::{AppEvent, PageItem, PageView, Phrase};
use tokio_util::sync::CancellationToken;

const FOOTER: &str = "Created with ♥ for language learners.";

/// ANSI styling, a no-op when disabled
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Colors only when asked for and stdout is a terminal
    pub fn detect(config: &UiConfig) -> Self {
        Self::new(config.color && atty::is(atty::Stream::Stdout))
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    fn accent(&self, text: &str) -> String {
        self.paint("1;34", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }
}

/// Draw one screen: header, cards or the empty message, controls, footer
pub fn render_page(view: &PageView, config: &UiConfig, palette: Palette) -> String {
    let mut out = String::new();

    let mut title = palette.bold(&config.title);
    if view.installable {
        title.push_str("  ");
        title.push_str(&palette.accent("[Install App: /install]"));
    }
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", palette.dim(&config.subtitle));
    out.push('\n');

    if view.phrases.is_empty() {
        let _ = writeln!(out, "No phrases found for \"{}\".", view.search_term);
        let _ = writeln!(out, "{}", palette.dim("Try searching for a different term."));
    } else {
        for (index, phrase) in view.phrases.iter().enumerate() {
            render_card(&mut out, index + 1, phrase, palette);
        }
    }

    if view.show_controls() {
        out.push('\n');
        let _ = writeln!(out, "{}", render_controls(view, palette));
        let _ = writeln!(
            out,
            "{}",
            palette.dim(&format!(
                "Page {} of {} | Go to page: /go <n>",
                view.current_page, view.total_pages
            ))
        );
    }

    out.push('\n');
    let _ = writeln!(out, "{}", palette.dim(FOOTER));
    out
}

fn render_card(out: &mut String, number: usize, phrase: &Phrase, palette: Palette) {
    let _ = writeln!(out, "{:>3}. {}", number, palette.bold(&phrase.source));
    let _ = writeln!(out, "     {}", phrase.gloss);
    let _ = writeln!(
        out,
        "     {}  \"{}\"",
        palette.accent(&phrase.target),
        phrase.pronunciation
    );
    if let Some(note) = &phrase.note {
        let _ = writeln!(out, "     {}", palette.dim(&format!("Note: {note}")));
    }
    let _ = writeln!(
        out,
        "     {}",
        palette.dim(&format!("/say {number}  /slow {number}"))
    );
}

fn render_controls(view: &PageView, palette: Palette) -> String {
    let control = |label: &str, enabled: bool| {
        if enabled {
            label.to_string()
        } else {
            palette.dim(label)
        }
    };

    let mut parts = vec![
        control("«", view.can_go_back()),
        control("‹", view.can_go_back()),
    ];

    for item in &view.page_items {
        match item {
            PageItem::Page(n) if *n == view.current_page => {
                parts.push(palette.accent(&format!("[{n}]")));
            }
            PageItem::Page(n) => parts.push(n.to_string()),
            PageItem::Ellipsis => parts.push(palette.dim("...")),
        }
    }

    parts.push(control("›", view.can_go_forward()));
    parts.push(control("»", view.can_go_forward()));
    parts.join(" ")
}

/// Print whatever the app sends until shutdown
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    config: UiConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let palette = Palette::detect(&config);

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => event?,
        };

        match event {
            AppEvent::ShowPage(view) => {
                println!("{}", render_page(&view, &config, palette));
            }
            AppEvent::Notice(message) => {
                println!("{}", palette.accent(&message));
            }
            AppEvent::BackendReady => {
                tracing::debug!("Backend ready");
            }
            AppEvent::Shutdown => {
                tracing::info!("UI loop stopping");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
