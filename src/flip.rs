use super::*;

/// Tap-to-flip for `.flip-card`s on touch-sized viewports.
#[derive(Debug)]
pub(crate) struct FlipCards {
    cards: Vec<NodeId>,
    flipped: HashMap<NodeId, bool>,
    breakpoint: f64,
}

impl FlipCards {
    pub(crate) fn install(view: &dyn View, layout: &LayoutConfig) -> Result<Self> {
        Ok(Self {
            cards: view.query_all(".flip-card")?,
            flipped: HashMap::new(),
            breakpoint: layout.mobile_breakpoint,
        })
    }

    pub(crate) fn cards(&self) -> &[NodeId] {
        &self.cards
    }

    pub(crate) fn is_flipped(&self, card: NodeId) -> bool {
        self.flipped.get(&card).copied().unwrap_or(false)
    }

    /// Above the breakpoint taps are left to the hover styles.
    pub(crate) fn tap(&mut self, view: &mut dyn View, card: NodeId) -> Result<()> {
        if view.viewport().width > self.breakpoint {
            return Ok(());
        }
        let flipped = !self.is_flipped(card);
        self.flipped.insert(card, flipped);

        let Some(inner) = view.query_first_within(card, ".flip-card-inner")? else {
            return Ok(());
        };
        let transform = if flipped {
            "rotateY(180deg)"
        } else {
            "rotateY(0deg)"
        };
        view.set_style(inner, "transform", transform)
    }
}
