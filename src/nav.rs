use super::*;

/// Whether the navbar should carry `scrolled` at `offset`.
pub fn is_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Picks the current section from `(id, top)` pairs in document order.
///
/// The last section whose `top - section_offset` has been reached wins.
pub fn current_section<'a>(
    offset: f64,
    sections: &[(&'a str, f64)],
    section_offset: f64,
) -> Option<&'a str> {
    sections
        .iter()
        .filter(|(_, top)| offset >= top - section_offset)
        .map(|(id, _)| *id)
        .last()
}

/// Scroll-driven navbar state and active nav-link tracking.
#[derive(Debug)]
pub(crate) struct NavReactor {
    pub(crate) navbar: Option<NodeId>,
    sections: Vec<NodeId>,
    links: Vec<NodeId>,
    last_scroll: f64,
    scrolled_threshold: f64,
    section_offset: f64,
}

impl NavReactor {
    pub(crate) fn install(view: &dyn View, config: &ScrollConfig) -> Result<Self> {
        Ok(Self {
            navbar: view.query_first(".navbar")?,
            sections: view.query_all("section[id]")?,
            links: view.query_all(".nav-link")?,
            last_scroll: 0.0,
            scrolled_threshold: config.scrolled_threshold,
            section_offset: config.section_offset,
        })
    }

    pub(crate) fn last_scroll(&self) -> f64 {
        self.last_scroll
    }

    pub(crate) fn update_navbar(&mut self, view: &mut dyn View) -> Result<()> {
        let offset = view.scroll_y();
        if let Some(navbar) = self.navbar {
            if is_scrolled(offset, self.scrolled_threshold) {
                view.add_class(navbar, "scrolled")?;
            } else {
                view.remove_class(navbar, "scrolled")?;
            }
        }
        self.last_scroll = offset;
        Ok(())
    }

    pub(crate) fn update_active_link(&mut self, view: &mut dyn View) -> Result<()> {
        let offset = view.scroll_y();
        let ids = self
            .sections
            .iter()
            .map(|section| {
                (
                    view.attr(*section, "id").unwrap_or_default(),
                    view.layout_rect(*section).top,
                )
            })
            .collect::<Vec<_>>();
        let sections = ids
            .iter()
            .map(|(id, top)| (id.as_str(), *top))
            .collect::<Vec<_>>();
        let current_href =
            current_section(offset, &sections, self.section_offset).map(|id| format!("#{id}"));

        for link in &self.links {
            view.remove_class(*link, "active")?;
            if current_href.is_some() && view.attr(*link, "href") == current_href {
                view.add_class(*link, "active")?;
            }
        }
        Ok(())
    }
}

/// Smooth-scrolls to the element an in-page anchor points at.
///
/// Returns false when the href does not name an element in the document.
pub(crate) fn scroll_to_anchor(view: &mut dyn View, anchor: NodeId) -> Result<bool> {
    let href = view.attr(anchor, "href").unwrap_or_default();
    let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
        return Ok(false);
    };
    let Some(target) = view.by_id(id) else {
        return Ok(false);
    };
    view.scroll_into_view(target)?;
    Ok(true)
}

pub(crate) fn scroll_to_overview(view: &mut dyn View) -> Result<bool> {
    let Some(overview) = view.by_id("overview") else {
        return Ok(false);
    };
    view.scroll_into_view(overview)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <nav class="navbar">
          <a class="nav-link" href="#overview">Overview</a>
          <a class="nav-link" href="#specs">Specs</a>
          <a class="nav-link" href="#">Top</a>
        </nav>
        <section id="overview"></section>
        <section id="specs"></section>
    "##;

    fn page() -> Result<Dom> {
        let mut dom = parse_html(PAGE)?;
        let overview = dom.by_id("overview").ok_or_else(|| Error::SelectorNotFound("#overview".into()))?;
        let specs = dom.by_id("specs").ok_or_else(|| Error::SelectorNotFound("#specs".into()))?;
        dom.set_layout(overview, Rect::new(0.0, 800.0, 1024.0, 600.0));
        dom.set_layout(specs, Rect::new(0.0, 1400.0, 1024.0, 600.0));
        Ok(dom)
    }

    fn active_links(dom: &Dom) -> Result<Vec<String>> {
        Ok(dom
            .query_all(".nav-link.active")?
            .into_iter()
            .filter_map(|link| dom.attr(link, "href"))
            .collect())
    }

    #[test]
    fn scrolled_threshold_is_strict() {
        assert!(!is_scrolled(100.0, 100.0));
        assert!(is_scrolled(100.5, 100.0));
        assert!(!is_scrolled(0.0, 100.0));
    }

    #[test]
    fn last_qualifying_section_wins() {
        let sections = [("overview", 800.0), ("specs", 1400.0)];
        assert_eq!(current_section(0.0, &sections, 200.0), None);
        assert_eq!(current_section(600.0, &sections, 200.0), Some("overview"));
        assert_eq!(current_section(1199.0, &sections, 200.0), Some("overview"));
        assert_eq!(current_section(1200.0, &sections, 200.0), Some("specs"));
    }

    #[test]
    fn navbar_and_links_follow_the_scroll_offset() -> Result<()> {
        let mut dom = page()?;
        let mut nav = NavReactor::install(&dom, &ScrollConfig::default())?;

        dom.scroll_to(1250.0);
        nav.update_navbar(&mut dom)?;
        nav.update_active_link(&mut dom)?;
        assert!(dom.query_first(".navbar.scrolled")?.is_some());
        assert_eq!(active_links(&dom)?, vec!["#specs".to_string()]);
        assert_eq!(nav.last_scroll(), 1250.0);

        dom.scroll_to(50.0);
        nav.update_navbar(&mut dom)?;
        nav.update_active_link(&mut dom)?;
        assert!(dom.query_first(".navbar.scrolled")?.is_none());
        assert!(active_links(&dom)?.is_empty());
        Ok(())
    }

    #[test]
    fn anchor_scroll_ignores_unknown_targets() -> Result<()> {
        let mut dom = page()?;
        let links = dom.query_all(".nav-link")?;
        assert!(scroll_to_anchor(&mut dom, links[1])?);
        assert_eq!(dom.scroll_y(), 1400.0);
        assert!(!scroll_to_anchor(&mut dom, links[2])?);
        assert_eq!(dom.scroll_y(), 1400.0);
        assert!(!scroll_to_overview(&mut Dom::new())?);
        Ok(())
    }
}
