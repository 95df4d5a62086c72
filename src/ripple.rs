use super::*;

pub(crate) const RIPPLE_CSS: &str = "
    .selector-btn {
        position: relative;
        overflow: hidden;
    }

    .ripple-effect {
        position: absolute;
        border-radius: 50%;
        background: rgba(255, 255, 255, 0.3);
        transform: scale(0);
        animation: ripple-animation 0.6s ease-out;
        pointer-events: none;
    }

    @keyframes ripple-animation {
        to {
            transform: scale(4);
            opacity: 0;
        }
    }
";

/// Square ripple box, relative to the host's padding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

/// Centers a square covering the host's longer side on the pointer.
pub fn ripple_geometry(host: Rect, pointer: Point) -> RippleGeometry {
    let size = host.width.max(host.height);
    RippleGeometry {
        size,
        left: pointer.x - host.left - size / 2.0,
        top: pointer.y - host.top - size / 2.0,
    }
}

/// Appends a `span.ripple-effect` to `host` and schedules its removal.
pub(crate) fn spawn(
    view: &mut dyn View,
    timers: &mut TimerQueue,
    host: NodeId,
    pointer: Point,
    lifetime_ms: i64,
) -> Result<NodeId> {
    let geometry = ripple_geometry(view.bounding_rect(host), pointer);
    let ripple = view.create_element("span");
    let size = with_unit(geometry.size, "px");
    view.set_style(ripple, "width", &size)?;
    view.set_style(ripple, "height", &size)?;
    view.set_style(ripple, "left", &with_unit(geometry.left, "px"))?;
    view.set_style(ripple, "top", &with_unit(geometry.top, "px"))?;
    view.add_class(ripple, "ripple-effect")?;
    view.append_child(host, ripple)?;
    timers.schedule(lifetime_ms, DeferredAction::RemoveNode(ripple));
    Ok(ripple)
}
