use super::*;

/// Share of `target` that lies inside `root`, in `[0, 1]`.
///
/// Zero-area targets report 0.
pub fn intersection_ratio(target: Rect, root: Rect) -> f64 {
    let area = target.area();
    if area <= 0.0 {
        return 0.0;
    }
    target
        .intersection(&root)
        .map(|visible| (visible.area() / area).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// A target intersects once some of it is visible and the ratio reaches
/// `threshold`.
pub fn is_intersecting(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio >= threshold
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IntersectionEntry {
    pub(crate) target: NodeId,
    pub(crate) ratio: f64,
    pub(crate) is_intersecting: bool,
}

/// Viewport visibility watcher with a bottom root margin.
///
/// `take_entries` reports every observed target whose intersecting state
/// changed since the previous evaluation; the first evaluation after
/// `observe` always reports.
#[derive(Debug, Default)]
pub(crate) struct VisibilityWatcher {
    threshold: f64,
    bottom_margin: f64,
    targets: Vec<NodeId>,
    state: HashMap<NodeId, Option<bool>>,
}

impl VisibilityWatcher {
    pub(crate) fn new(threshold: f64, bottom_margin: f64) -> Self {
        Self {
            threshold,
            bottom_margin,
            ..Self::default()
        }
    }

    pub(crate) fn observe(&mut self, target: NodeId) {
        if self.state.contains_key(&target) {
            return;
        }
        self.targets.push(target);
        self.state.insert(target, None);
    }

    pub(crate) fn unobserve(&mut self, target: NodeId) {
        self.targets.retain(|node| *node != target);
        self.state.remove(&target);
    }

    pub(crate) fn len(&self) -> usize {
        self.targets.len()
    }

    fn root(&self, view: &dyn View) -> Rect {
        let viewport = view.viewport();
        Rect::new(
            0.0,
            0.0,
            viewport.width,
            (viewport.height - self.bottom_margin).max(0.0),
        )
    }

    pub(crate) fn take_entries(&mut self, view: &dyn View) -> Vec<IntersectionEntry> {
        let root = self.root(view);
        let mut entries = Vec::new();
        for target in &self.targets {
            let ratio = if view.is_connected(*target) {
                intersection_ratio(view.bounding_rect(*target), root)
            } else {
                0.0
            };
            let now = is_intersecting(ratio, self.threshold);
            let previous = self.state.insert(*target, Some(now)).flatten();
            if previous != Some(now) {
                entries.push(IntersectionEntry {
                    target: *target,
                    ratio,
                    is_intersecting: now,
                });
            }
        }
        entries
    }
}

/// Entrance animations and lazy images, both driven by visibility.
#[derive(Debug)]
pub(crate) struct RevealTrigger {
    animations: VisibilityWatcher,
    images: VisibilityWatcher,
}

impl RevealTrigger {
    pub(crate) fn install(view: &dyn View, config: &RevealConfig) -> Result<Self> {
        let mut animations = VisibilityWatcher::new(config.threshold, config.bottom_margin);
        for selector in ["[data-aos]", ".feature-card", ".benchmark-card"] {
            for target in view.query_all(selector)? {
                animations.observe(target);
            }
        }
        if let Some(table) = view.query_first(".comparison-table-wrapper")? {
            animations.observe(table);
        }

        let mut images = VisibilityWatcher::new(0.0, 0.0);
        for image in view.query_all("img[data-src]")? {
            images.observe(image);
        }

        Ok(Self { animations, images })
    }

    pub(crate) fn observed(&self) -> usize {
        self.animations.len()
    }

    pub(crate) fn pending_images(&self) -> usize {
        self.images.len()
    }

    /// Applies newly intersecting entries; returns how many targets were revealed.
    pub(crate) fn evaluate(&mut self, view: &mut dyn View) -> Result<usize> {
        let mut revealed = 0;
        for entry in self.animations.take_entries(view) {
            if !entry.is_intersecting {
                continue;
            }
            tracing::debug!(node = entry.target.index(), ratio = entry.ratio, "reveal");
            view.add_class(entry.target, "aos-animate")?;
            if view.has_class(entry.target, "feature-card") {
                bars::render_stat_bars(view, entry.target)?;
            }
            if view.has_class(entry.target, "benchmark-card") {
                bars::render_benchmark_bars(view, entry.target)?;
            }
            revealed += 1;
        }

        for entry in self.images.take_entries(view) {
            if !entry.is_intersecting {
                continue;
            }
            if let Some(src) = view.attr(entry.target, "data-src") {
                view.set_attr(entry.target, "src", &src)?;
            }
            view.add_class(entry.target, "loaded")?;
            self.images.unobserve(entry.target);
        }

        Ok(revealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_visible_share_of_target() {
        let root = Rect::new(0.0, 0.0, 1024.0, 668.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 0.0, 100.0, 100.0), root), 1.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 618.0, 100.0, 100.0), root), 0.5);
        assert_eq!(intersection_ratio(Rect::new(0.0, 900.0, 100.0, 100.0), root), 0.0);
        assert_eq!(intersection_ratio(Rect::default(), root), 0.0);
    }

    #[test]
    fn intersecting_needs_threshold_and_some_area() {
        assert!(is_intersecting(0.1, 0.1));
        assert!(!is_intersecting(0.09, 0.1));
        assert!(!is_intersecting(0.0, 0.0));
        assert!(is_intersecting(0.01, 0.0));
    }

    #[test]
    fn watcher_reports_state_changes_only() -> Result<()> {
        let mut dom = parse_html("<div id=\"card\"></div>")?;
        let card = dom.by_id("card").ok_or_else(|| Error::SelectorNotFound("#card".into()))?;
        dom.set_layout(card, Rect::new(0.0, 1000.0, 200.0, 200.0));

        let mut watcher = VisibilityWatcher::new(0.1, 100.0);
        watcher.observe(card);
        watcher.observe(card);
        assert_eq!(watcher.len(), 1);

        let first = watcher.take_entries(&dom);
        assert_eq!(first.len(), 1);
        assert!(!first[0].is_intersecting);
        assert!(watcher.take_entries(&dom).is_empty());

        // 1000..1200 scrolled by 600 sits at 400..600, inside the 0..668 root.
        dom.scroll_to(600.0);
        let entries = watcher.take_entries(&dom);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
        assert_eq!(entries[0].ratio, 1.0);
        Ok(())
    }

    #[test]
    fn bottom_margin_trims_the_viewport() -> Result<()> {
        let mut dom = parse_html("<div id=\"card\"></div>")?;
        let card = dom.by_id("card").ok_or_else(|| Error::SelectorNotFound("#card".into()))?;
        // 700..800 lies entirely in the trimmed 668..768 band and below it.
        dom.set_layout(card, Rect::new(0.0, 700.0, 100.0, 100.0));
        let mut watcher = VisibilityWatcher::new(0.1, 100.0);
        watcher.observe(card);
        assert!(!watcher.take_entries(&dom)[0].is_intersecting);
        Ok(())
    }

    #[test]
    fn lazy_images_load_once_and_stop_being_watched() -> Result<()> {
        let mut dom = parse_html(r#"<img id="chip" data-src="/chip.png">"#)?;
        let img = dom.by_id("chip").ok_or_else(|| Error::SelectorNotFound("#chip".into()))?;
        dom.set_layout(img, Rect::new(0.0, 10.0, 50.0, 50.0));
        let mut reveal = RevealTrigger::install(&dom, &RevealConfig::default())?;
        assert_eq!(reveal.pending_images(), 1);
        reveal.evaluate(&mut dom)?;
        assert_eq!(dom.attr(img, "src").as_deref(), Some("/chip.png"));
        assert!(dom.has_class(img, "loaded"));
        assert_eq!(reveal.pending_images(), 0);
        Ok(())
    }
}
