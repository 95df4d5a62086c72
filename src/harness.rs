use super::*;

/// Parses a page, installs a [`PageController`] on it and drives it like a
/// browser would.
///
/// Construction fires `DOMContentLoaded` and evaluates visibility once.
/// Window `load` is left to [`load`](Self::load) so tests decide when the hero
/// entrance timers start. Every user action re-evaluates visibility, and a
/// programmatic scroll (anchor links, the explore button) is followed by a
/// `scroll` event.
#[derive(Debug)]
pub struct Harness {
    dom: Dom,
    controller: PageController,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_options(html, PageConfig::default(), Viewport::default())
    }

    pub fn from_html_with_config(html: &str, config: PageConfig) -> Result<Self> {
        Self::from_html_with_options(html, config, Viewport::default())
    }

    pub fn from_html_with_viewport(html: &str, viewport: Viewport) -> Result<Self> {
        Self::from_html_with_options(html, PageConfig::default(), viewport)
    }

    pub fn from_html_with_options(
        html: &str,
        config: PageConfig,
        viewport: Viewport,
    ) -> Result<Self> {
        let mut dom = parse_html(html)?;
        dom.set_viewport(viewport);
        let controller = PageController::install(&mut dom, config)?;
        let mut harness = Self { dom, controller };
        harness.dispatch(PageEvent::DomContentLoaded)?;
        Ok(harness)
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    /// Clicks at the center of the element's box.
    pub fn click(&mut self, selector: &str) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        let rect = self.dom.bounding_rect(target);
        let point = Point::new(rect.left + rect.width / 2.0, rect.top + rect.height / 2.0);
        self.dispatch(PageEvent::Click { target, point })
    }

    pub fn click_at(&mut self, selector: &str, x: f64, y: f64) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        self.dispatch(PageEvent::Click {
            target,
            point: Point::new(x, y),
        })
    }

    /// Presses a key while `selector` has focus: `keydown` then `keypress`.
    pub fn press_key(&mut self, selector: &str, key: &str) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        self.dispatch(PageEvent::KeyDown { key: key.into() })?;
        self.dispatch(PageEvent::KeyPress {
            target,
            key: key.into(),
        })
    }

    /// Document-level keydown with nothing focused.
    pub fn key_down(&mut self, key: &str) -> Result<EventOutcome> {
        self.dispatch(PageEvent::KeyDown { key: key.into() })
    }

    pub fn key_sequence<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for key in keys {
            self.key_down(key)?;
        }
        Ok(())
    }

    pub fn hover(&mut self, selector: &str, x: f64, y: f64) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        self.dispatch(PageEvent::MouseMove {
            target,
            point: Point::new(x, y),
        })
    }

    pub fn mouse_leave(&mut self, selector: &str) -> Result<EventOutcome> {
        let target = self.select_one(selector)?;
        self.dispatch(PageEvent::MouseLeave { target })
    }

    pub fn scroll_to(&mut self, y: f64) -> Result<EventOutcome> {
        self.dom.scroll_to(y);
        self.dispatch(PageEvent::Scroll)
    }

    pub fn scroll_y(&self) -> f64 {
        self.dom.scroll_y()
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<()> {
        self.dom.set_viewport(Viewport { width, height });
        self.settle_visibility()
    }

    /// Places the first match of `selector` in document coordinates.
    pub fn set_rect(&mut self, selector: &str, rect: Rect) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_layout(target, rect);
        self.settle_visibility()
    }

    /// Lays out every match of `selector` top to bottom, one `height` apart.
    pub fn stack_rects(&mut self, selector: &str, top: f64, height: f64) -> Result<usize> {
        let targets = self.dom.query_all(selector)?;
        let width = self.dom.viewport().width;
        for (index, target) in targets.iter().enumerate() {
            self.dom.set_layout(
                *target,
                Rect::new(0.0, top + index as f64 * height, width, height),
            );
        }
        self.settle_visibility()?;
        Ok(targets.len())
    }

    pub fn load(&mut self, load_time_ms: i64) -> Result<EventOutcome> {
        self.dispatch(PageEvent::Load { load_time_ms })
    }

    pub fn unload(&mut self) -> Result<EventOutcome> {
        self.dispatch(PageEvent::BeforeUnload)
    }

    fn dispatch(&mut self, event: PageEvent) -> Result<EventOutcome> {
        let result = self.controller.handle(&mut self.dom, event);
        let settled = self.settle_scroll();
        let outcome = result?;
        settled?;
        Ok(outcome)
    }

    fn settle_scroll(&mut self) -> Result<()> {
        if self.dom.take_scroll_request() {
            self.controller.handle(&mut self.dom, PageEvent::Scroll)?;
        }
        self.settle_visibility()
    }

    fn settle_visibility(&mut self) -> Result<()> {
        self.controller.evaluate_visibility(&mut self.dom)?;
        Ok(())
    }

    pub fn now_ms(&self) -> i64 {
        self.controller.now_ms()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.controller.pending_timers()
    }

    pub fn clear_timer(&mut self, timer_id: TimerId) -> bool {
        self.controller.clear_timer(timer_id)
    }

    pub fn clear_all_timers(&mut self) -> usize {
        self.controller.clear_all_timers()
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        self.controller.set_timer_step_limit(max_steps)
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        self.controller.advance_time(&mut self.dom, delta_ms)?;
        self.settle_visibility()
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        self.controller.advance_time_to(&mut self.dom, target_ms)?;
        self.settle_visibility()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.controller.flush(&mut self.dom)?;
        self.settle_visibility()
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.controller.run_due_timers(&mut self.dom)?;
        self.settle_visibility()?;
        Ok(ran)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.controller.enable_trace(enabled);
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.controller.set_trace_events(enabled);
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.controller.set_trace_timers(enabled);
    }

    pub fn set_trace_echo(&mut self, enabled: bool) {
        self.controller.set_trace_echo(enabled);
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.controller.set_trace_log_limit(max_entries)
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.controller.take_trace_logs()
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_all(selector)?.len())
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.has_class(target, class_name))
    }

    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.style(target, property))
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn is_flipped(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.controller.is_flipped(target))
    }

    /// Compares the trimmed text content of the first match.
    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual.trim() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_absent(&self, selector: &str) -> Result<()> {
        if let Some(found) = self.dom.query_first(selector)? {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".into(),
                actual: "match".into(),
                dom_snippet: self.node_snippet(found),
            });
        }
        Ok(())
    }

    pub fn assert_count(&self, selector: &str, expected: usize) -> Result<()> {
        let actual = self.count(selector)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: String::new(),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.has_class(target, class_name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present={expected}"),
                actual: format!("class {class_name} present={actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style(target, property);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected}"),
                actual: format!("{property}: {actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual.as_deref() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{name}={expected:?}"),
                actual: format!("{name}={actual:?}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_first(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }
}
