//! Interaction controller for the "CPU Wars: Intel vs AMD" comparison page.
//!
//! The page behaviors (navbar and nav-link tracking, reveal animations,
//! proportional bars, benchmark filters, flip cards, the recommendation
//! selector, ripples, the comparison highlighter, ambient effects and the
//! Konami Easter egg) live in [`PageController`] and talk to the page through
//! the [`View`] trait. [`Harness`] pairs the controller with an in-memory
//! [`Dom`] parsed from HTML so the whole page can be driven from tests.

use std::collections::{HashMap, VecDeque};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("numeric pattern error: {0}")]
    Pattern(#[from] fancy_regex::Error),
    #[error("timer error: {0}")]
    Timer(String),
    #[error("timer queue exceeded max task steps: {0}")]
    TimerStepLimit(String),
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

mod bars;
mod config;
mod controller;
mod dom;
mod effects;
mod events;
mod filter;
mod flip;
mod harness;
mod highlight;
mod html;
mod konami;
mod nav;
mod numbers;
mod recommend;
mod reveal;
mod ripple;
mod runtime_state;
mod selector;
mod timers;
mod view;

pub use bars::benchmark_widths;
pub use config::{
    EffectsConfig, LayoutConfig, PageConfig, RevealConfig, ScrollConfig, TimingConfig,
};
pub use controller::PageController;
pub use dom::Dom;
pub use events::{EventOutcome, PageEvent};
pub use filter::card_matches;
pub use harness::Harness;
pub use highlight::{Side, lower_is_better};
pub use konami::{KONAMI_SEQUENCE, KonamiDetector};
pub use nav::{current_section, is_scrolled};
pub use numbers::{format_number, parse_float};
pub use reveal::{intersection_ratio, is_intersecting};
pub use ripple::{RippleGeometry, ripple_geometry};
pub use timers::{DeferredAction, PendingTimer, TimerId, TimerQueue};
pub use view::{NodeId, Point, Rect, View, Viewport};

use effects::{CursorGlow, EasterEgg};
use events::{EventKind, EventState, Handler, ListenerStore};
use filter::BenchmarkFilter;
use flip::FlipCards;
use highlight::Highlighter;
use html::parse_html;
use nav::NavReactor;
use numbers::{NumericStripper, with_unit};
use recommend::RecommendationSelector;
use reveal::RevealTrigger;
use runtime_state::TraceState;

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
