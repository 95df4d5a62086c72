use super::*;

pub(crate) const NAV_ACTIVE_CSS: &str = "
    .nav-link.active {
        color: var(--text-primary);
    }

    .nav-link.active::after {
        width: 100%;
    }
";

const RAINBOW_CSS: &str = "
    @keyframes rainbow {
        0% { filter: hue-rotate(0deg); }
        100% { filter: hue-rotate(360deg); }
    }
";

const SCALE_IN_CSS: &str = "
    @keyframes scaleIn {
        0% { transform: translate(-50%, -50%) scale(0); }
        100% { transform: translate(-50%, -50%) scale(1); }
    }
";

const SCALE_OUT_CSS: &str = "
    @keyframes scaleOut {
        0% { transform: translate(-50%, -50%) scale(1); opacity: 1; }
        100% { transform: translate(-50%, -50%) scale(0); opacity: 0; }
    }
";

const NOTIFICATION_CSS: &str = "
    position: fixed;
    top: 50%;
    left: 50%;
    transform: translate(-50%, -50%);
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    padding: 30px 60px;
    border-radius: 20px;
    font-family: 'Orbitron', sans-serif;
    font-size: 24px;
    font-weight: 900;
    color: white;
    z-index: 10000;
    box-shadow: 0 20px 60px rgba(0, 0, 0, 0.5);
    animation: scaleIn 0.5s cubic-bezier(0.68, -0.55, 0.265, 1.55);
";

pub(crate) const ULTRA_MODE_MESSAGE: &str = "🎮 ULTRA MODE ACTIVATED! 🎮";

pub(crate) const LOAD_BANNER: &str = "🚀 CPU Wars - Intel vs AMD comparison loaded successfully!";

/// Appends a `<style>` element with `css` to `<head>`.
pub(crate) fn inject_style(view: &mut dyn View, css: &str) -> Result<Option<NodeId>> {
    let Some(head) = view.head() else {
        return Ok(None);
    };
    let style = view.create_element("style");
    view.set_text_content(style, css)?;
    view.append_child(head, style)?;
    Ok(Some(style))
}

/// Staggers the idle float animation of `.floating` cards.
pub(crate) fn apply_floating(view: &mut dyn View, effects: &EffectsConfig) -> Result<usize> {
    let cards = view.query_all(".floating")?;
    for (index, card) in cards.iter().enumerate() {
        let speed = view
            .attr(*card, "data-float-speed")
            .map(|raw| parse_float(&raw))
            .filter(|speed| speed.is_finite())
            .unwrap_or(effects.float_speed);
        view.set_style(
            *card,
            "animation-duration",
            &with_unit(speed * effects.float_duration_factor, "s"),
        )?;
        view.set_style(
            *card,
            "animation-delay",
            &with_unit(index as f64 * effects.float_delay_step, "s"),
        )?;
    }
    Ok(cards.len())
}

/// Shifts each `.gradient-orb` by a growing fraction of the scroll offset.
pub(crate) fn apply_parallax(view: &mut dyn View, effects: &EffectsConfig) -> Result<()> {
    let offset = view.scroll_y();
    for (index, orb) in view.query_all(".gradient-orb")?.into_iter().enumerate() {
        let speed = (index + 1) as f64 * effects.parallax_step;
        view.set_style(
            orb,
            "transform",
            &format!("translateY({})", with_unit(offset * speed, "px")),
        )?;
    }
    Ok(())
}

/// Marks the body loaded and queues the hero entrance animations.
pub(crate) fn start_page_load(
    view: &mut dyn View,
    timers: &mut TimerQueue,
    stagger_ms: i64,
    load_time_ms: i64,
) -> Result<()> {
    if let Some(body) = view.body() {
        view.add_class(body, "loaded")?;
    }
    let hero_elements = view.query_all(".hero-section [data-aos]")?;
    for (index, element) in hero_elements.into_iter().enumerate() {
        let delay = (index as i64).saturating_mul(stagger_ms);
        timers.schedule(delay, DeferredAction::AnimateHeroElement(element));
    }
    tracing::info!("Page Load Time: {load_time_ms}ms");
    Ok(())
}

/// Radial glow that trails the pointer across the hero section.
#[derive(Debug, Default)]
pub(crate) struct CursorGlow {
    hero: Option<NodeId>,
    element: Option<NodeId>,
    offset: f64,
}

impl CursorGlow {
    /// Only wide viewports with a hero section get a glow.
    pub(crate) fn install(
        view: &mut dyn View,
        layout: &LayoutConfig,
        effects: &EffectsConfig,
    ) -> Result<Self> {
        let Some(hero) = view.query_first(".hero-section")? else {
            return Ok(Self::default());
        };
        if view.viewport().width <= layout.mobile_breakpoint {
            return Ok(Self::default());
        }
        let Some(body) = view.body() else {
            return Ok(Self::default());
        };

        let size = with_unit(effects.cursor_glow_size, "px");
        let glow = view.create_element("div");
        view.set_attr(glow, "class", "cursor-glow")?;
        view.set_css_text(
            glow,
            &format!(
                "position: fixed; width: {size}; height: {size}; border-radius: 50%; \
                 background: radial-gradient(circle, rgba(0, 168, 255, 0.15) 0%, transparent 70%); \
                 pointer-events: none; z-index: 9999; transition: opacity 0.3s ease; \
                 opacity: 0; mix-blend-mode: screen;"
            ),
        )?;
        view.append_child(body, glow)?;

        Ok(Self {
            hero: Some(hero),
            element: Some(glow),
            offset: effects.cursor_glow_size / 2.0,
        })
    }

    pub(crate) fn hero(&self) -> Option<NodeId> {
        self.hero
    }

    pub(crate) fn element(&self) -> Option<NodeId> {
        self.element
    }

    pub(crate) fn follow(&self, view: &mut dyn View, pointer: Point) -> Result<()> {
        let Some(glow) = self.element else {
            return Ok(());
        };
        view.set_style(glow, "opacity", "1")?;
        view.set_style(glow, "left", &with_unit(pointer.x - self.offset, "px"))?;
        view.set_style(glow, "top", &with_unit(pointer.y - self.offset, "px"))
    }

    pub(crate) fn hide(&self, view: &mut dyn View) -> Result<()> {
        match self.element {
            Some(glow) => view.set_style(glow, "opacity", "0"),
            None => Ok(()),
        }
    }

    pub(crate) fn remove(&self, view: &mut dyn View) -> Result<()> {
        match self.element {
            Some(glow) => view.remove(glow),
            None => Ok(()),
        }
    }
}

/// The Konami reward: rainbow title plus a transient notification.
#[derive(Debug, Default)]
pub(crate) struct EasterEgg {
    fired: usize,
}

impl EasterEgg {
    pub(crate) fn fired(&self) -> usize {
        self.fired
    }

    pub(crate) fn activate(
        &mut self,
        view: &mut dyn View,
        timers: &mut TimerQueue,
        timing: &TimingConfig,
    ) -> Result<Option<NodeId>> {
        self.fired += 1;
        tracing::info!(times = self.fired, "ultra mode activated");

        if let Some(title) = view.query_first(".title-line")? {
            view.set_style(title, "animation", "rainbow 2s linear infinite")?;
        }
        inject_style(view, RAINBOW_CSS)?;

        let notification = view.create_element("div");
        view.set_text_content(notification, ULTRA_MODE_MESSAGE)?;
        view.set_css_text(notification, NOTIFICATION_CSS)?;
        inject_style(view, SCALE_IN_CSS)?;

        let Some(body) = view.body() else {
            return Ok(None);
        };
        view.append_child(body, notification)?;
        timers.schedule(
            timing.notification_visible_ms,
            DeferredAction::DismissNotification(notification),
        );
        Ok(Some(notification))
    }
}

/// Starts the notification's exit animation and queues its removal.
pub(crate) fn dismiss_notification(
    view: &mut dyn View,
    timers: &mut TimerQueue,
    notification: NodeId,
    exit_ms: i64,
) -> Result<()> {
    view.set_style(notification, "animation", "scaleOut 0.5s ease-out forwards")?;
    inject_style(view, SCALE_OUT_CSS)?;
    timers.schedule(exit_ms, DeferredAction::RemoveNode(notification));
    Ok(())
}
