use super::*;

/// Bar widths in percent for one benchmark card.
///
/// Normal cards scale each value against the card maximum. Reverse cards
/// (lower raw value is better) use `(max - value + min) / max`. Any width that
/// is not finite, including every width of a card whose maximum is zero, is
/// reported as 0.
pub fn benchmark_widths(values: &[f64], reverse: bool) -> Vec<f64> {
    // A single NaN poisons the extremes, like `Math.max(...values)`.
    let poisoned = values.iter().any(|value| value.is_nan());
    let (max, min) = if poisoned {
        (f64::NAN, f64::NAN)
    } else {
        (
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            values.iter().copied().fold(f64::INFINITY, f64::min),
        )
    };

    values
        .iter()
        .map(|value| {
            let percentage = if reverse {
                (max - value + min) / max * 100.0
            } else {
                value / max * 100.0
            };
            if percentage.is_finite() { percentage } else { 0.0 }
        })
        .collect()
}

/// Writes `--stat-width` from each `.stat-fill`'s `data-value` inside `card`.
pub(crate) fn render_stat_bars(view: &mut dyn View, card: NodeId) -> Result<()> {
    for fill in view.query_within(card, ".stat-fill")? {
        let Some(value) = view.attr(fill, "data-value") else {
            continue;
        };
        view.set_style(fill, "--stat-width", &format!("{value}%"))?;
    }
    Ok(())
}

/// Writes `--bar-width` on every `.bar-fill` inside a benchmark card.
pub(crate) fn render_benchmark_bars(view: &mut dyn View, card: NodeId) -> Result<()> {
    let fills = view.query_within(card, ".bar-fill")?;
    let values = fills
        .iter()
        .map(|fill| parse_float(&view.attr(*fill, "data-value").unwrap_or_default()))
        .collect::<Vec<_>>();
    let widths = benchmark_widths(&values, view.has_class(card, "reverse"));
    for (fill, width) in fills.into_iter().zip(widths) {
        view.set_style(fill, "--bar-width", &with_unit(width, "%"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_card_scales_against_max() {
        assert_eq!(
            benchmark_widths(&[10.0, 20.0, 40.0], false),
            vec![25.0, 50.0, 100.0]
        );
    }

    #[test]
    fn reverse_card_keeps_the_offset_formula() {
        assert_eq!(
            benchmark_widths(&[10.0, 20.0, 40.0], true),
            vec![100.0, 75.0, 25.0]
        );
    }

    #[test]
    fn zero_max_renders_zero_width() {
        assert_eq!(benchmark_widths(&[0.0, 0.0], false), vec![0.0, 0.0]);
        assert_eq!(benchmark_widths(&[0.0, 0.0], true), vec![0.0, 0.0]);
        assert_eq!(benchmark_widths(&[-5.0, 0.0], false), vec![0.0, 0.0]);
    }

    #[test]
    fn unparsable_value_zeroes_the_whole_card() {
        assert_eq!(
            benchmark_widths(&[10.0, f64::NAN, 40.0], false),
            vec![0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn empty_card_has_no_widths() {
        assert!(benchmark_widths(&[], true).is_empty());
    }

    #[test]
    fn renders_custom_properties_on_fills() -> Result<()> {
        let mut dom = parse_html(
            r#"<div class="benchmark-card reverse">
                 <div class="chart-bar"><div class="bar-fill" data-value="10"></div></div>
                 <div class="chart-bar"><div class="bar-fill" data-value="40"></div></div>
               </div>
               <div class="feature-card"><div class="stat-fill" data-value="85"></div><div class="stat-fill"></div></div>"#,
        )?;
        let card = dom.query_first(".benchmark-card")?.ok_or_else(|| Error::SelectorNotFound(".benchmark-card".into()))?;
        render_benchmark_bars(&mut dom, card)?;
        let fills = dom.query_all(".bar-fill")?;
        assert_eq!(dom.style(fills[0], "--bar-width"), "100%");
        assert_eq!(dom.style(fills[1], "--bar-width"), "25%");

        let feature = dom.query_first(".feature-card")?.ok_or_else(|| Error::SelectorNotFound(".feature-card".into()))?;
        render_stat_bars(&mut dom, feature)?;
        let stats = dom.query_all(".stat-fill")?;
        assert_eq!(dom.style(stats[0], "--stat-width"), "85%");
        assert_eq!(dom.style(stats[1], "--stat-width"), "");
        Ok(())
    }
}
