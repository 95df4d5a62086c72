use super::*;

/// Everything the page reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    DomContentLoaded,
    /// Window `load`; carries the measured navigation-to-load duration.
    Load { load_time_ms: i64 },
    Scroll,
    Click { target: NodeId, point: Point },
    KeyDown { key: String },
    KeyPress { target: NodeId, key: String },
    MouseMove { target: NodeId, point: Point },
    MouseLeave { target: NodeId },
    BeforeUnload,
}

impl PageEvent {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Load { .. } => "load",
            Self::Scroll => "scroll",
            Self::Click { .. } => "click",
            Self::KeyDown { .. } => "keydown",
            Self::KeyPress { .. } => "keypress",
            Self::MouseMove { .. } => "mousemove",
            Self::MouseLeave { .. } => "mouseleave",
            Self::BeforeUnload => "beforeunload",
        }
    }
}

/// Element-level event types that listeners are registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventKind {
    Click,
    KeyPress,
    MouseMove,
    MouseLeave,
}

impl EventKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyPress => "keypress",
            Self::MouseMove => "mousemove",
            Self::MouseLeave => "mouseleave",
        }
    }

    pub(crate) fn bubbles(self) -> bool {
        !matches!(self, Self::MouseLeave)
    }
}

/// Element-level handlers installed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    AnchorScroll,
    ExploreButton,
    BenchmarkFilter,
    FlipCard,
    RecommendationButton,
    KeyboardActivate,
    CursorGlowFollow,
    CursorGlowHide,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<EventKind, Vec<Handler>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, kind: EventKind, handler: Handler) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(kind)
            .or_default()
            .push(handler);
    }

    pub(crate) fn get(&self, node_id: NodeId, kind: EventKind) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(&kind))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.map
            .values()
            .filter_map(|events| events.get(&kind))
            .map(Vec::len)
            .sum()
    }
}

/// Dispatch bookkeeping for one element event.
#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) point: Point,
    pub(crate) key: Option<String>,
    pub(crate) default_prevented: bool,
}

impl EventState {
    pub(crate) fn new(target: NodeId, point: Point, key: Option<String>) -> Self {
        Self {
            target,
            current_target: target,
            point,
            key,
            default_prevented: false,
        }
    }
}

/// What the caller learns once every handler for an event has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub handlers_run: usize,
}
