use dioxus::prelude::*;

/// Accent colour of a stat tile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StatTone {
    #[default]
    Neutral,
    Success,
    Warning,
    Info,
}

impl StatTone {
    fn class(&self) -> &'static str {
        match self {
            StatTone::Neutral => "neutral",
            StatTone::Success => "success",
            StatTone::Warning => "warning",
            StatTone::Info => "info",
        }
    }
}

/// Dashboard counter: a large value over a short label.
#[component]
pub fn StatTile(label: String, value: String, #[props(default)] tone: StatTone) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "stat-tile", "data-tone": tone.class(),
            span { class: "stat-value", "{value}" }
            span { class: "stat-label", "{label}" }
        }
    }
}

/// Grid wrapper for a row of stat tiles.
#[component]
pub fn StatGrid(children: Element) -> Element {
    rsx! {
        div { class: "stat-grid", {children} }
    }
}
