use cpu_wars_page::{Error, Harness, PageConfig, Rect, Result, Viewport};

const PAGE: &str = include_str!("fixtures/cpu_wars.html");

fn laid_out(harness: &mut Harness) -> Result<()> {
    harness.set_trace_echo(false);
    harness.stack_rects("section[id]", 0.0, 800.0)?;
    Ok(())
}

#[test]
fn custom_timing_config_is_honoured() -> Result<()> {
    let config = PageConfig::from_json(
        r#"{
            "timing": { "result_reveal_ms": 250, "ripple_lifetime_ms": 1000 },
            "scroll": { "scrolled_threshold": 10 }
        }"#,
    )?;
    let mut harness = Harness::from_html_with_config(PAGE, config)?;
    laid_out(&mut harness)?;

    harness.scroll_to(20.0)?;
    harness.assert_class(".navbar", "scrolled", true)?;

    harness.click(r#".selector-btn[data-use="content"]"#)?;
    harness.advance_time(249)?;
    harness.assert_count(".result-card.active", 0)?;
    harness.advance_time(1)?;
    harness.assert_class(".content-result", "active", true)?;
    harness.advance_time(749)?;
    harness.assert_exists(".ripple-effect")?;
    harness.advance_time(1)?;
    harness.assert_absent(".ripple-effect")?;
    Ok(())
}

#[test]
fn invalid_config_is_rejected_before_install() {
    let config = PageConfig::from_json(r#"{ "reveal": { "threshold": 1.5 } }"#);
    let result = config.and_then(|config| Harness::from_html_with_config(PAGE, config));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn rapid_selector_clicks_leave_one_result_active() -> Result<()> {
    let mut harness = Harness::from_html(PAGE)?;
    laid_out(&mut harness)?;
    harness.click(r#".selector-btn[data-use="content"]"#)?;
    harness.advance_time(50)?;
    harness.click(r#".selector-btn[data-use="budget"]"#)?;
    harness.flush()?;

    harness.assert_count(".selector-btn.active", 1)?;
    harness.assert_count(".result-card.active", 1)?;
    harness.assert_class(".budget-result", "active", true)?;
    harness.assert_count(".ripple-effect", 0)?;
    Ok(())
}

#[test]
fn clicking_inside_a_selector_button_bubbles_to_it() -> Result<()> {
    let mut harness = Harness::from_html(PAGE)?;
    laid_out(&mut harness)?;
    harness.click(r#".selector-btn[data-use="budget"]"#)?;
    harness.click(".btn-label")?;
    harness.flush()?;
    harness.assert_class(r#".selector-btn[data-use="gaming"]"#, "active", true)?;
    harness.assert_class(".gaming-result", "active", true)?;
    assert_eq!(harness.controller().selected_use_case(), Some("gaming"));
    Ok(())
}

#[test]
fn explore_button_scrolls_to_overview() -> Result<()> {
    let mut harness = Harness::from_html(PAGE)?;
    laid_out(&mut harness)?;
    harness.click("#exploreBtn")?;
    assert_eq!(harness.scroll_y(), 800.0);
    harness.assert_class(".navbar", "scrolled", true)?;
    harness.assert_attr(".nav-link.active", "href", Some("#overview"))?;
    Ok(())
}

#[test]
fn filtered_out_cards_stay_hidden_after_scrolling_into_view() -> Result<()> {
    let mut harness = Harness::from_html(PAGE)?;
    laid_out(&mut harness)?;
    harness.click(r#".benchmark-filter[data-filter="productivity"]"#)?;
    harness.flush()?;
    harness.assert_style("#bench-fps", "display", "none")?;
    harness.assert_style("#bench-idle", "display", "none")?;
    harness.assert_style("#bench-render", "display", "block")?;
    harness.assert_class("#bench-render", "aos-animate", true)?;
    harness.assert_style("#bench-render .bar-fill.intel", "--bar-width", "100%")?;
    Ok(())
}

#[test]
fn whole_page_session_on_a_phone() -> Result<()> {
    let mut harness = Harness::from_html_with_viewport(
        PAGE,
        Viewport {
            width: 390.0,
            height: 844.0,
        },
    )?;
    laid_out(&mut harness)?;
    harness.load(615)?;
    harness.flush()?;
    harness.assert_count(".hero-section .aos-animate", 3)?;
    harness.assert_absent(".cursor-glow")?;

    harness.click(".flip-card-front")?;
    assert!(harness.is_flipped("#flip-intel")?);

    harness.set_rect("#die-shot", Rect::new(0.0, 3300.0, 390.0, 200.0))?;
    harness.assert_attr("#die-shot", "src", None)?;
    harness.scroll_to(3200.0)?;
    harness.assert_attr("#die-shot", "src", Some("images/die-shot.webp"))?;

    harness.unload()?;
    Ok(())
}

#[test]
fn trace_log_limit_keeps_latest_lines() -> Result<()> {
    let mut harness = Harness::from_html(PAGE)?;
    laid_out(&mut harness)?;
    harness.enable_trace(true);
    harness.set_trace_log_limit(2)?;
    harness.click(r#".benchmark-filter[data-filter="gaming"]"#)?;
    harness.flush()?;
    let logs = harness.take_trace_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[1].starts_with("[timer] flush"));
    assert!(harness.take_trace_logs().is_empty());
    assert!(harness.set_trace_log_limit(0).is_err());
    Ok(())
}

#[test]
fn timer_step_limit_stops_runaway_flushes() -> Result<()> {
    let mut harness = Harness::from_html(PAGE)?;
    laid_out(&mut harness)?;
    harness.set_timer_step_limit(2)?;
    harness.click(r#".benchmark-filter[data-filter="gaming"]"#)?;
    let result = harness.flush();
    assert!(matches!(result, Err(Error::TimerStepLimit(_))));
    assert!(harness.advance_time(-1).is_err());
    Ok(())
}
