use super::*;

/// Owns every page behavior and routes [`PageEvent`]s to them.
///
/// Install it once the document is parsed, then feed it events. Handlers run
/// to completion; delayed visual steps are queued as [`DeferredAction`]s on a
/// virtual clock that only moves when the caller advances it. Callers that
/// change layout or scroll position should follow up with
/// [`evaluate_visibility`](Self::evaluate_visibility).
#[derive(Debug)]
pub struct PageController {
    config: PageConfig,
    listeners: ListenerStore,
    timers: TimerQueue,
    trace: TraceState,
    nav: NavReactor,
    reveal: RevealTrigger,
    filter: BenchmarkFilter,
    flips: FlipCards,
    selector: RecommendationSelector,
    highlighter: Highlighter,
    konami: KonamiDetector,
    glow: CursorGlow,
    easter_egg: EasterEgg,
}

impl PageController {
    pub fn install(view: &mut dyn View, config: PageConfig) -> Result<Self> {
        config.validate()?;
        let mut listeners = ListenerStore::default();

        for anchor in view.query_all(r##"a[href^="#"]"##)? {
            listeners.add(anchor, EventKind::Click, Handler::AnchorScroll);
        }
        let nav = NavReactor::install(view, &config.scroll)?;
        if let Some(explore) = view.by_id("exploreBtn") {
            listeners.add(explore, EventKind::Click, Handler::ExploreButton);
        }

        effects::apply_floating(view, &config.effects)?;
        let reveal = RevealTrigger::install(view, &config.reveal)?;

        let filter = BenchmarkFilter::install(view, &config.timing)?;
        for control in filter.controls() {
            listeners.add(*control, EventKind::Click, Handler::BenchmarkFilter);
        }

        let flips = FlipCards::install(view, &config.layout)?;
        for card in flips.cards() {
            listeners.add(*card, EventKind::Click, Handler::FlipCard);
        }

        let selector = RecommendationSelector::install(view, &config.timing)?;
        for button in selector.buttons() {
            listeners.add(*button, EventKind::Click, Handler::RecommendationButton);
        }
        effects::inject_style(view, ripple::RIPPLE_CSS)?;

        let highlighter = Highlighter::new()?;

        let glow = CursorGlow::install(view, &config.layout, &config.effects)?;
        if let Some(hero) = glow.hero() {
            listeners.add(hero, EventKind::MouseMove, Handler::CursorGlowFollow);
            listeners.add(hero, EventKind::MouseLeave, Handler::CursorGlowHide);
        }

        effects::inject_style(view, effects::NAV_ACTIVE_CSS)?;

        for control in view.query_all(".selector-btn, .benchmark-filter")? {
            listeners.add(control, EventKind::KeyPress, Handler::KeyboardActivate);
        }

        tracing::info!("{}", effects::LOAD_BANNER);
        tracing::debug!(
            click_listeners = listeners.count(EventKind::Click),
            observed = reveal.observed(),
            "page controller installed"
        );

        Ok(Self {
            config,
            listeners,
            timers: TimerQueue::default(),
            trace: TraceState::default(),
            nav,
            reveal,
            filter,
            flips,
            selector,
            highlighter,
            konami: KonamiDetector::new(),
            glow,
            easter_egg: EasterEgg::default(),
        })
    }

    /// Runs every handler registered for `event`.
    ///
    /// A failing handler does not stop the others; each failure is logged and
    /// the first one is returned once all handlers have run.
    pub fn handle(&mut self, view: &mut dyn View, event: PageEvent) -> Result<EventOutcome> {
        tracing::debug!(event = event.name(), "dispatch");
        let mut outcome = EventOutcome::default();
        let mut first_error = None;

        match &event {
            PageEvent::Click { target, point } => {
                return self.dispatch(view, EventKind::Click, *target, *point, None);
            }
            PageEvent::KeyPress { target, key } => {
                return self.dispatch(
                    view,
                    EventKind::KeyPress,
                    *target,
                    Point::default(),
                    Some(key.clone()),
                );
            }
            PageEvent::MouseMove { target, point } => {
                return self.dispatch(view, EventKind::MouseMove, *target, *point, None);
            }
            PageEvent::MouseLeave { target } => {
                return self.dispatch(
                    view,
                    EventKind::MouseLeave,
                    *target,
                    Point::default(),
                    None,
                );
            }
            PageEvent::DomContentLoaded => {
                let result = self.highlighter.apply(view).map(|rows| {
                    tracing::debug!(rows, "comparison rows highlighted");
                });
                settle("highlight", result, &mut outcome, &mut first_error);
            }
            PageEvent::Load { load_time_ms } => {
                let result = effects::start_page_load(
                    view,
                    &mut self.timers,
                    self.config.timing.hero_stagger_ms,
                    *load_time_ms,
                );
                settle("page_load", result, &mut outcome, &mut first_error);
            }
            PageEvent::Scroll => {
                let result = self.nav.update_navbar(view);
                settle("navbar", result, &mut outcome, &mut first_error);
                let result = effects::apply_parallax(view, &self.config.effects);
                settle("parallax", result, &mut outcome, &mut first_error);
                let result = self.nav.update_active_link(view);
                settle("nav_links", result, &mut outcome, &mut first_error);
            }
            PageEvent::KeyDown { key } => {
                let result = if self.konami.feed(key) {
                    self.easter_egg
                        .activate(view, &mut self.timers, &self.config.timing)
                        .map(|_| ())
                } else {
                    Ok(())
                };
                settle("konami", result, &mut outcome, &mut first_error);
            }
            PageEvent::BeforeUnload => {
                let result = self.glow.remove(view);
                settle("cursor_glow_cleanup", result, &mut outcome, &mut first_error);
            }
        }

        self.trace.event_line(format!(
            "[event] done {} handlers={} outcome={}",
            event.name(),
            outcome.handlers_run,
            if first_error.is_some() { "failed" } else { "completed" }
        ));
        first_error.map_or(Ok(outcome), Err)
    }

    fn dispatch(
        &mut self,
        view: &mut dyn View,
        kind: EventKind,
        target: NodeId,
        point: Point,
        key: Option<String>,
    ) -> Result<EventOutcome> {
        let mut event = EventState::new(target, point, key);
        let mut outcome = EventOutcome::default();
        let mut first_error = None;

        let mut path = vec![target];
        if kind.bubbles() {
            let mut cursor = view.parent(target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = view.parent(node);
            }
        }

        for node in path {
            event.current_target = node;
            for handler in self.listeners.get(node, kind) {
                if self.trace.enabled {
                    self.trace.event_line(format!(
                        "[event] {} target={} current={} handler={:?} default_prevented={}",
                        kind.name(),
                        node_label(view, event.target),
                        node_label(view, event.current_target),
                        handler,
                        event.default_prevented
                    ));
                }
                let result = self.run_handler(view, handler, &mut event);
                settle(kind.name(), result, &mut outcome, &mut first_error);
            }
        }

        outcome.default_prevented = event.default_prevented;
        if self.trace.enabled {
            self.trace.event_line(format!(
                "[event] done {} target={} handlers={} default_prevented={}",
                kind.name(),
                node_label(view, event.target),
                outcome.handlers_run,
                event.default_prevented
            ));
        }
        first_error.map_or(Ok(outcome), Err)
    }

    fn run_handler(
        &mut self,
        view: &mut dyn View,
        handler: Handler,
        event: &mut EventState,
    ) -> Result<()> {
        let control = event.current_target;
        match handler {
            Handler::AnchorScroll => {
                event.default_prevented = true;
                nav::scroll_to_anchor(view, control).map(|_| ())
            }
            Handler::ExploreButton => nav::scroll_to_overview(view).map(|_| ()),
            Handler::BenchmarkFilter => self.filter.activate(view, &mut self.timers, control),
            Handler::FlipCard => self.flips.tap(view, control),
            Handler::RecommendationButton => {
                self.selector
                    .select(view, &mut self.timers, control, event.point)
            }
            Handler::KeyboardActivate => {
                if !matches!(event.key.as_deref(), Some("Enter" | " ")) {
                    return Ok(());
                }
                event.default_prevented = true;
                // Synthetic clicks carry no pointer position.
                self.dispatch(view, EventKind::Click, control, Point::default(), None)
                    .map(|_| ())
            }
            Handler::CursorGlowFollow => self.glow.follow(view, event.point),
            Handler::CursorGlowHide => self.glow.hide(view),
        }
    }

    /// Reports visibility changes to the reveal and lazy-image watchers.
    /// Returns how many targets were newly revealed.
    pub fn evaluate_visibility(&mut self, view: &mut dyn View) -> Result<usize> {
        self.reveal.evaluate(view)
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn now_ms(&self) -> i64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.timers.pending()
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        self.timers.set_step_limit(max_steps)
    }

    pub fn clear_timer(&mut self, timer_id: TimerId) -> bool {
        let existed = self.timers.cancel(timer_id);
        self.trace.timer_line(format!(
            "[timer] clear id={timer_id} existed={existed}"
        ));
        existed
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.timers.cancel_all();
        self.trace
            .timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn advance_time(&mut self, view: &mut dyn View, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Timer(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.timers.now_ms();
        self.timers.set_now(from.saturating_add(delta_ms));
        let ran = self.run_timer_queue(view, Some(self.timers.now_ms()), false)?;
        self.trace.timer_line(format!(
            "[timer] advance delta_ms={} from={} to={} ran_due={}",
            delta_ms,
            from,
            self.timers.now_ms(),
            ran
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, view: &mut dyn View, target_ms: i64) -> Result<()> {
        let from = self.timers.now_ms();
        if target_ms < from {
            return Err(Error::Timer(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={from})"
            )));
        }
        self.timers.set_now(target_ms);
        let ran = self.run_timer_queue(view, Some(target_ms), false)?;
        self.trace.timer_line(format!(
            "[timer] advance_to from={from} to={target_ms} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs every pending timer, jumping the clock forward as needed.
    pub fn flush(&mut self, view: &mut dyn View) -> Result<()> {
        let from = self.timers.now_ms();
        let ran = self.run_timer_queue(view, None, true)?;
        self.trace.timer_line(format!(
            "[timer] flush from={} to={} ran={}",
            from,
            self.timers.now_ms(),
            ran
        ));
        Ok(())
    }

    pub fn run_due_timers(&mut self, view: &mut dyn View) -> Result<usize> {
        let now = self.timers.now_ms();
        let ran = self.run_timer_queue(view, Some(now), false)?;
        self.trace
            .timer_line(format!("[timer] run_due now_ms={now} ran={ran}"));
        Ok(ran)
    }

    fn run_timer_queue(
        &mut self,
        view: &mut dyn View,
        due_limit: Option<i64>,
        advance_clock: bool,
    ) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(timer) = self.timers.pop_next(due_limit, advance_clock) {
            steps += 1;
            if steps > self.timers.step_limit() {
                return Err(self.timers.step_limit_error(steps, due_limit));
            }
            self.run_deferred(view, timer)?;
        }
        Ok(steps)
    }

    fn run_deferred(&mut self, view: &mut dyn View, timer: PendingTimer) -> Result<()> {
        let target = timer.action.target();
        self.trace.timer_line(format!(
            "[timer] run id={} due_at={} action={} now_ms={}",
            timer.id,
            timer.due_at,
            timer.action.label(),
            self.timers.now_ms()
        ));
        if !view.is_connected(target) {
            self.trace.timer_line(format!(
                "[timer] skip id={} reason=detached",
                timer.id
            ));
            return Ok(());
        }

        match timer.action {
            DeferredAction::RevealBenchmarkCard(card) => filter::reveal_card(view, card),
            DeferredAction::CollapseBenchmarkCard(card) => filter::collapse_card(view, card),
            DeferredAction::ActivateResultCard(card) => view.add_class(card, "active"),
            DeferredAction::AnimateHeroElement(element) => view.add_class(element, "aos-animate"),
            DeferredAction::DismissNotification(notification) => effects::dismiss_notification(
                view,
                &mut self.timers,
                notification,
                self.config.timing.notification_exit_ms,
            ),
            DeferredAction::RemoveNode(node) => view.remove(node),
        }
    }

    pub fn konami_progress(&self) -> usize {
        self.konami.progress()
    }

    pub fn easter_eggs_fired(&self) -> usize {
        self.easter_egg.fired()
    }

    pub fn active_filter(&self) -> Option<&str> {
        self.filter.active()
    }

    pub fn selected_use_case(&self) -> Option<&str> {
        self.selector.selected()
    }

    pub fn is_flipped(&self, card: NodeId) -> bool {
        self.flips.is_flipped(card)
    }

    pub fn last_scroll(&self) -> f64 {
        self.nav.last_scroll()
    }

    pub fn cursor_glow(&self) -> Option<NodeId> {
        self.glow.element()
    }

    pub fn pending_lazy_images(&self) -> usize {
        self.reveal.pending_images()
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace.timers = enabled;
    }

    /// Controls whether trace lines are also emitted as `tracing` debug events.
    pub fn set_trace_echo(&mut self, enabled: bool) {
        self.trace.echo = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace.set_log_limit(max_entries)
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.take()
    }
}

fn settle(
    handler: &str,
    result: Result<()>,
    outcome: &mut EventOutcome,
    first_error: &mut Option<Error>,
) {
    outcome.handlers_run += 1;
    if let Err(err) = result {
        tracing::warn!(handler, error = %err, "page handler failed");
        if first_error.is_none() {
            *first_error = Some(err);
        }
    }
}

fn node_label(view: &dyn View, node: NodeId) -> String {
    match view.attr(node, "id") {
        Some(id) if !id.is_empty() => format!("#{id}"),
        _ => format!("node:{}", node.index()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <nav class="navbar"><a class="nav-link" href="#overview">Overview</a></nav>
        <section class="hero-section"><h1><span class="title-line">CPU Wars</span></h1>
          <button id="exploreBtn">Explore</button></section>
        <section id="overview"></section>
        <button class="benchmark-filter" data-filter="all">All</button>
        <button class="benchmark-filter" data-filter="gaming">Gaming</button>
        <div class="benchmark-card" data-category="gaming"></div>
        <button class="selector-btn" data-use="gaming"><span class="label">Gaming</span></button>
        <div class="result-card gaming-result"></div>
    "##;

    fn install() -> Result<(Dom, PageController)> {
        let mut dom = parse_html(PAGE)?;
        let overview = dom.by_id("overview").ok_or_else(|| Error::SelectorNotFound("#overview".into()))?;
        dom.set_layout(overview, Rect::new(0.0, 900.0, 1024.0, 600.0));
        let controller = PageController::install(&mut dom, PageConfig::default())?;
        Ok((dom, controller))
    }

    fn first(dom: &Dom, selector: &str) -> Result<NodeId> {
        dom.query_first(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    #[test]
    fn install_injects_styles_and_cursor_glow() -> Result<()> {
        let (dom, controller) = install()?;
        assert_eq!(dom.query_all("head style")?.len(), 2);
        assert_eq!(controller.cursor_glow(), dom.query_first("body > .cursor-glow")?);
        assert_eq!(controller.listeners.count(EventKind::KeyPress), 3);
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected_at_install() -> Result<()> {
        let mut dom = parse_html(PAGE)?;
        let mut config = PageConfig::default();
        config.reveal.threshold = 2.0;
        assert!(matches!(
            PageController::install(&mut dom, config),
            Err(Error::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn click_bubbles_from_inner_span_to_selector_button() -> Result<()> {
        let (mut dom, mut controller) = install()?;
        let label = first(&dom, ".label")?;
        let outcome = controller.handle(
            &mut dom,
            PageEvent::Click {
                target: label,
                point: Point::default(),
            },
        )?;
        assert_eq!(outcome.handlers_run, 1);
        assert_eq!(controller.selected_use_case(), Some("gaming"));
        controller.advance_time(&mut dom, 100)?;
        assert!(dom.query_first(".gaming-result.active")?.is_some());
        controller.flush(&mut dom)?;
        assert!(dom.query_first(".ripple-effect")?.is_none());
        Ok(())
    }

    #[test]
    fn anchor_click_prevents_default_and_scrolls() -> Result<()> {
        let (mut dom, mut controller) = install()?;
        let link = first(&dom, ".nav-link")?;
        let outcome = controller.handle(
            &mut dom,
            PageEvent::Click {
                target: link,
                point: Point::default(),
            },
        )?;
        assert!(outcome.default_prevented);
        assert_eq!(dom.scroll_y(), 900.0);
        Ok(())
    }

    #[test]
    fn keyboard_activation_clicks_controls() -> Result<()> {
        let (mut dom, mut controller) = install()?;
        let gaming = dom.query_all(".benchmark-filter")?[1];
        let ignored = controller.handle(
            &mut dom,
            PageEvent::KeyPress {
                target: gaming,
                key: "x".into(),
            },
        )?;
        assert!(!ignored.default_prevented);
        assert_eq!(controller.active_filter(), None);

        let outcome = controller.handle(
            &mut dom,
            PageEvent::KeyPress {
                target: gaming,
                key: "Enter".into(),
            },
        )?;
        assert!(outcome.default_prevented);
        assert_eq!(controller.active_filter(), Some("gaming"));
        Ok(())
    }

    #[test]
    fn deferred_actions_skip_detached_targets() -> Result<()> {
        let (mut dom, mut controller) = install()?;
        let card = first(&dom, ".benchmark-card")?;
        let gaming = dom.query_all(".benchmark-filter")?[1];
        controller.handle(
            &mut dom,
            PageEvent::Click {
                target: gaming,
                point: Point::default(),
            },
        )?;
        dom.remove(card)?;
        controller.enable_trace(true);
        controller.set_trace_echo(false);
        controller.flush(&mut dom)?;
        assert!(!dom.has_class(card, "aos-animate"));
        let logs = controller.take_trace_logs();
        assert!(logs.iter().any(|line| line.contains("reason=detached")));
        Ok(())
    }

    #[test]
    fn advance_time_rejects_going_backwards() -> Result<()> {
        let (mut dom, mut controller) = install()?;
        assert!(matches!(
            controller.advance_time(&mut dom, -1),
            Err(Error::Timer(_))
        ));
        controller.advance_time(&mut dom, 50)?;
        assert!(matches!(
            controller.advance_time_to(&mut dom, 10),
            Err(Error::Timer(_))
        ));
        Ok(())
    }

    #[test]
    fn step_limit_stops_runaway_queues() -> Result<()> {
        let (mut dom, mut controller) = install()?;
        let filter = dom.query_all(".benchmark-filter")?[0];
        controller.handle(
            &mut dom,
            PageEvent::Click {
                target: filter,
                point: Point::default(),
            },
        )?;
        let selector = first(&dom, ".selector-btn")?;
        controller.handle(
            &mut dom,
            PageEvent::Click {
                target: selector,
                point: Point::default(),
            },
        )?;
        controller.set_timer_step_limit(1)?;
        assert!(matches!(
            controller.flush(&mut dom),
            Err(Error::TimerStepLimit(_))
        ));
        Ok(())
    }

    #[test]
    fn konami_sequence_fires_easter_egg_once() -> Result<()> {
        let (mut dom, mut controller) = install()?;
        for key in KONAMI_SEQUENCE {
            controller.handle(&mut dom, PageEvent::KeyDown { key: key.into() })?;
        }
        assert_eq!(controller.easter_eggs_fired(), 1);
        assert_eq!(controller.konami_progress(), 0);
        controller.advance_time(&mut dom, 2000)?;
        controller.advance_time(&mut dom, 500)?;
        assert!(!dom.text_content(dom.root()).contains("ULTRA MODE"));
        Ok(())
    }

    #[test]
    fn handler_failures_are_isolated() -> Result<()> {
        let mut dom = parse_html(
            r##"<nav class="navbar"><a class="nav-link" href="#specs">Specs</a></nav>
                <section id="specs"></section>"##,
        )?;
        let mut controller = PageController::install(&mut dom, PageConfig::default())?;
        // A stale node id stands in for a page element that vanished.
        controller.nav.navbar = Some(NodeId(9_999));
        dom.scroll_to(400.0);
        let err = controller.handle(&mut dom, PageEvent::Scroll);
        assert!(matches!(err, Err(Error::Dom(_))));
        assert_eq!(controller.last_scroll(), 0.0);
        assert!(dom.query_first(".nav-link.active")?.is_some());
        Ok(())
    }
}
