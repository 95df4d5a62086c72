use super::*;

/// Whether a card with `category` stays visible under `filter`.
///
/// A missing attribute on both sides compares equal.
pub fn card_matches(filter: Option<&str>, category: Option<&str>) -> bool {
    filter == Some("all") || filter == category
}

/// Single-select `.benchmark-filter` group over the `.benchmark-card`s.
#[derive(Debug)]
pub(crate) struct BenchmarkFilter {
    controls: Vec<NodeId>,
    cards: Vec<NodeId>,
    active: Option<String>,
    pending: HashMap<NodeId, TimerId>,
    reveal_ms: i64,
    collapse_ms: i64,
}

impl BenchmarkFilter {
    pub(crate) fn install(view: &dyn View, timing: &TimingConfig) -> Result<Self> {
        Ok(Self {
            controls: view.query_all(".benchmark-filter")?,
            cards: view.query_all(".benchmark-card")?,
            active: None,
            pending: HashMap::new(),
            reveal_ms: timing.filter_reveal_ms,
            collapse_ms: timing.filter_collapse_ms,
        })
    }

    pub(crate) fn controls(&self) -> &[NodeId] {
        &self.controls
    }

    pub(crate) fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub(crate) fn activate(
        &mut self,
        view: &mut dyn View,
        timers: &mut TimerQueue,
        control: NodeId,
    ) -> Result<()> {
        for other in &self.controls {
            view.remove_class(*other, "active")?;
        }
        view.add_class(control, "active")?;

        let filter = view.attr(control, "data-filter");
        for card in &self.cards {
            if let Some(superseded) = self.pending.remove(card) {
                timers.cancel(superseded);
            }
            let category = view.attr(*card, "data-category");
            let timer = if card_matches(filter.as_deref(), category.as_deref()) {
                view.remove_class(*card, "hidden")?;
                view.set_style(*card, "display", "block")?;
                timers.schedule(self.reveal_ms, DeferredAction::RevealBenchmarkCard(*card))
            } else {
                view.add_class(*card, "hidden")?;
                view.remove_class(*card, "aos-animate")?;
                timers.schedule(self.collapse_ms, DeferredAction::CollapseBenchmarkCard(*card))
            };
            self.pending.insert(*card, timer);
        }
        tracing::debug!(filter = ?filter, cards = self.cards.len(), "benchmark filter applied");
        self.active = filter;
        Ok(())
    }
}

pub(crate) fn reveal_card(view: &mut dyn View, card: NodeId) -> Result<()> {
    view.add_class(card, "aos-animate")?;
    bars::render_benchmark_bars(view, card)
}

pub(crate) fn collapse_card(view: &mut dyn View, card: NodeId) -> Result<()> {
    view.set_style(card, "display", "none")
}
