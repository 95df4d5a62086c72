use super::*;

/// Single-select `.selector-btn` group choosing which `.result-card` shows.
#[derive(Debug)]
pub(crate) struct RecommendationSelector {
    buttons: Vec<NodeId>,
    results: Vec<NodeId>,
    selected: Option<String>,
    pending: Vec<TimerId>,
    reveal_ms: i64,
    ripple_ms: i64,
}

impl RecommendationSelector {
    pub(crate) fn install(view: &dyn View, timing: &TimingConfig) -> Result<Self> {
        Ok(Self {
            buttons: view.query_all(".selector-btn")?,
            results: view.query_all(".result-card")?,
            selected: None,
            pending: Vec::new(),
            reveal_ms: timing.result_reveal_ms,
            ripple_ms: timing.ripple_lifetime_ms,
        })
    }

    pub(crate) fn buttons(&self) -> &[NodeId] {
        &self.buttons
    }

    pub(crate) fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(crate) fn select(
        &mut self,
        view: &mut dyn View,
        timers: &mut TimerQueue,
        button: NodeId,
        pointer: Point,
    ) -> Result<()> {
        for other in &self.buttons {
            view.remove_class(*other, "active")?;
        }
        view.add_class(button, "active")?;

        for superseded in self.pending.drain(..) {
            timers.cancel(superseded);
        }

        let use_case = view.attr(button, "data-use");
        let result_class = use_case.as_deref().map(|name| format!("{name}-result"));
        for card in &self.results {
            view.remove_class(*card, "active")?;
            if result_class
                .as_deref()
                .is_some_and(|class_name| view.has_class(*card, class_name))
            {
                self.pending.push(
                    timers.schedule(self.reveal_ms, DeferredAction::ActivateResultCard(*card)),
                );
            }
        }

        ripple::spawn(view, timers, button, pointer, self.ripple_ms)?;
        tracing::debug!(use_case = ?use_case, "recommendation selected");
        self.selected = use_case;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <button class="selector-btn active" data-use="gaming">Gaming</button>
        <button class="selector-btn" data-use="workstation">Workstation</button>
        <div class="result-card gaming-result active"></div>
        <div class="result-card workstation-result"></div>
    "#;

    #[test]
    fn selection_clears_results_then_schedules_the_match() -> Result<()> {
        let mut dom = parse_html(PAGE)?;
        let mut timers = TimerQueue::default();
        let mut selector = RecommendationSelector::install(&dom, &TimingConfig::default())?;
        let workstation = selector.buttons()[1];
        selector.select(&mut dom, &mut timers, workstation, Point::default())?;

        assert_eq!(dom.query_all(".selector-btn.active")?, vec![workstation]);
        assert!(dom.query_all(".result-card.active")?.is_empty());
        assert_eq!(selector.selected(), Some("workstation"));

        let result = dom
            .query_first(".workstation-result")?
            .ok_or_else(|| Error::SelectorNotFound(".workstation-result".into()))?;
        let pending = timers.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].due_at, 100);
        assert_eq!(pending[0].action, DeferredAction::ActivateResultCard(result));
        assert!(matches!(pending[1].action, DeferredAction::RemoveNode(_)));
        Ok(())
    }

    #[test]
    fn newer_selection_cancels_pending_reveal() -> Result<()> {
        let mut dom = parse_html(PAGE)?;
        let mut timers = TimerQueue::default();
        let mut selector = RecommendationSelector::install(&dom, &TimingConfig::default())?;
        let (gaming, workstation) = (selector.buttons()[0], selector.buttons()[1]);
        selector.select(&mut dom, &mut timers, workstation, Point::default())?;
        selector.select(&mut dom, &mut timers, gaming, Point::default())?;

        let gaming_result = dom
            .query_first(".gaming-result")?
            .ok_or_else(|| Error::SelectorNotFound(".gaming-result".into()))?;
        let activations = timers
            .pending()
            .into_iter()
            .filter(|timer| matches!(timer.action, DeferredAction::ActivateResultCard(_)))
            .map(|timer| timer.action)
            .collect::<Vec<_>>();
        assert_eq!(
            activations,
            vec![DeferredAction::ActivateResultCard(gaming_result)]
        );
        Ok(())
    }
}
