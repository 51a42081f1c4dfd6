use std::time::Duration;

use bag_config_adapters::{present_asset_metrics, present_cache_stats, CachedAssetLoader};
use bag_config_application::{
    ApplicationService, AssetMetricsQuery, ControlsQuery, NextTemplateCommand, OrbitCommand,
    PollCommand, PrevTemplateCommand, RenderFrameCommand, SetIndexCommand, StartCommand,
    ViewportStatusQuery, ZoomCommand,
};
use bag_config_domain::{CatalogStatus, ControlPanel, RenderedFrame, SliderView, ViewportStatus};
use font8x8::UnicodeFonts;
use log::warn;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::config::AppConfig;

const PANEL_WIDTH: usize = 420;
const PANEL_PADDING: usize = 20;
const TITLE_TOP: usize = 20;
const SUBTITLE_TOP: usize = 52;
const TEMPLATE_ROW_TOP: usize = 92;
const SLIDER_TOP: usize = 110;
const SLIDER_HEIGHT: usize = 24;
const HEADLINE_TOP: usize = 146;
const BUTTON_TOP: usize = 168;
const BUTTON_WIDTH: usize = 72;
const BUTTON_HEIGHT: usize = 26;
const BUTTON_GAP: usize = 10;
const RULE_TOP: usize = 214;
const NOTE_TOP: usize = 232;
const LINE_HEIGHT: usize = 14;
const GLYPH_WIDTH: usize = 8;
const KNOB_WIDTH: usize = 12;

const PANEL_BACKGROUND: u32 = 0xFFFFFF;
const PANEL_BORDER: u32 = 0xDDDDDD;
const TEXT_COLOR: u32 = 0x1B1F26;
const MUTED_TEXT: u32 = 0x7A7A7A;
const DISABLED_TEXT: u32 = 0xB4B4B4;
const ACCENT: u32 = 0x2F6FE4;
const ERROR_TEXT: u32 = 0xC0392B;

const SUBTITLE: &str = "Template slider swaps pre-made models (fast MVP).";
const UPGRADE_NOTES: [&str; 4] = [
    "Later upgrades:",
    "• drag/scale logo",
    "• front/back toggle",
    "• morph sliders (stretch)",
];

/// Radians per dragged pixel.
const ORBIT_SPEED: f32 = 0.01;
const ZOOM_STEP: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

impl Rect {
    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left as f32
            && y >= self.top as f32
            && x < (self.left + self.width) as f32
            && y < (self.top + self.height) as f32
    }

    fn right(&self) -> usize {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    width: usize,
    height: usize,
    slider: Rect,
    prev_button: Rect,
    next_button: Rect,
    viewport: Rect,
}

impl Layout {
    fn new(width: usize, height: usize) -> Self {
        let panel_inner = PANEL_WIDTH - 2 * PANEL_PADDING;
        Self {
            width,
            height,
            slider: Rect {
                left: PANEL_PADDING,
                top: SLIDER_TOP,
                width: panel_inner,
                height: SLIDER_HEIGHT,
            },
            prev_button: Rect {
                left: PANEL_PADDING,
                top: BUTTON_TOP,
                width: BUTTON_WIDTH,
                height: BUTTON_HEIGHT,
            },
            next_button: Rect {
                left: PANEL_PADDING + BUTTON_WIDTH + BUTTON_GAP,
                top: BUTTON_TOP,
                width: BUTTON_WIDTH,
                height: BUTTON_HEIGHT,
            },
            viewport: Rect {
                left: PANEL_WIDTH,
                top: 0,
                width: width.saturating_sub(PANEL_WIDTH).max(1),
                height,
            },
        }
    }

    fn track_left(&self) -> usize {
        self.slider.left + KNOB_WIDTH / 2
    }

    fn track_right(&self) -> usize {
        self.slider.right().saturating_sub(KNOB_WIDTH / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Slider,
    Orbit { last_x: f32, last_y: f32 },
}

pub fn launch_window(
    mut service: ApplicationService,
    cache: &CachedAssetLoader,
    config: &AppConfig,
) -> Result<(), String> {
    let layout = Layout::new(config.window_width, config.window_height);
    let mut window = Window::new(
        "Bag configurator",
        layout.width,
        layout.height,
        WindowOptions::default(),
    )
    .map_err(|error| format!("failed to start UI window: {error}"))?;
    window.limit_update_rate(Some(Duration::from_micros(16_000)));

    service
        .start(StartCommand)
        .map_err(|error| format!("catalog request failed: {error}"))?;

    let mut buffer = vec![PANEL_BACKGROUND; layout.width * layout.height];
    let mut frame: Option<RenderedFrame> = None;
    let mut needs_render = true;
    let mut last_status = service.viewport_status(ViewportStatusQuery);
    let mut drag: Option<Drag> = None;
    let mut was_mouse_down = false;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let report = service
            .poll(PollCommand)
            .map_err(|error| format!("poll failed: {error}"))?;
        let status = service.viewport_status(ViewportStatusQuery);
        if report.asset_swapped || status != last_status {
            needs_render = true;
            last_status = status;
        }

        let panel = service.controls(ControlsQuery);

        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            step(&mut service, false)?;
        }
        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            step(&mut service, true)?;
        }
        if window.is_key_pressed(Key::Home, KeyRepeat::No) {
            select(&mut service, 0)?;
        }
        if window.is_key_pressed(Key::End, KeyRepeat::No) {
            select(&mut service, i64::MAX)?;
        }

        let mouse_down = window.get_mouse_down(MouseButton::Left);
        let mouse_pos = window.get_mouse_pos(MouseMode::Clamp);
        if let Some((mouse_x, mouse_y)) = mouse_pos {
            if mouse_down && !was_mouse_down {
                drag = None;
                if layout.slider.contains(mouse_x, mouse_y) && panel.slider.enabled {
                    drag = Some(Drag::Slider);
                } else if layout.prev_button.contains(mouse_x, mouse_y) && panel.prev_enabled {
                    step(&mut service, false)?;
                } else if layout.next_button.contains(mouse_x, mouse_y) && panel.next_enabled {
                    step(&mut service, true)?;
                } else if layout.viewport.contains(mouse_x, mouse_y) {
                    drag = Some(Drag::Orbit {
                        last_x: mouse_x,
                        last_y: mouse_y,
                    });
                }
            }

            match drag {
                Some(Drag::Slider) if mouse_down => {
                    let index = slider_index_at(
                        mouse_x,
                        layout.track_left(),
                        layout.track_right(),
                        panel.slider.max,
                    );
                    select(&mut service, index)?;
                }
                Some(Drag::Orbit { last_x, last_y }) if mouse_down => {
                    let (dx, dy) = (mouse_x - last_x, mouse_y - last_y);
                    if dx != 0.0 || dy != 0.0 {
                        service.orbit(OrbitCommand {
                            delta_yaw: -dx * ORBIT_SPEED,
                            delta_pitch: dy * ORBIT_SPEED,
                        });
                        needs_render = true;
                    }
                    drag = Some(Drag::Orbit {
                        last_x: mouse_x,
                        last_y: mouse_y,
                    });
                }
                _ => {}
            }

            if let Some((_, scroll_y)) = window.get_scroll_wheel() {
                if scroll_y != 0.0 && layout.viewport.contains(mouse_x, mouse_y) {
                    service.zoom(ZoomCommand {
                        factor: zoom_factor(scroll_y),
                    });
                    needs_render = true;
                }
            }
        }
        if !mouse_down {
            drag = None;
        }
        was_mouse_down = mouse_down;

        if needs_render {
            needs_render = false;
            match service.render_frame(RenderFrameCommand {
                width: layout.viewport.width as u32,
                height: layout.viewport.height as u32,
            }) {
                Ok(rendered) => frame = Some(rendered),
                Err(error) => warn!("viewport render failed: {error}"),
            }
        }

        let panel = service.controls(ControlsQuery);
        let status = service.viewport_status(ViewportStatusQuery);
        draw_panel(&mut buffer, &layout, &panel, &status, drag == Some(Drag::Slider));
        draw_viewport(&mut buffer, &layout, frame.as_ref());

        let metrics = service
            .asset_metrics(AssetMetricsQuery)
            .map_err(|error| format!("asset metrics failed: {error}"))?;
        let cache_stats = cache
            .stats()
            .map_err(|error| format!("asset cache stats failed: {error}"))?;
        window.set_title(&build_window_title(
            &panel,
            &status,
            &format!(
                "{} | {}",
                present_asset_metrics(&metrics),
                present_cache_stats(&cache_stats)
            ),
            service.renderer_backend(),
            frame.as_ref(),
        ));

        window
            .update_with_buffer(&buffer, layout.width, layout.height)
            .map_err(|error| format!("failed to update UI window: {error}"))?;
    }

    Ok(())
}

fn step(service: &mut ApplicationService, forward: bool) -> Result<(), String> {
    let result = if forward {
        service.next(NextTemplateCommand)
    } else {
        service.prev(PrevTemplateCommand)
    };
    result
        .map(|_| ())
        .map_err(|error| format!("template switch failed: {error}"))
}

fn select(service: &mut ApplicationService, index: i64) -> Result<(), String> {
    service
        .set_index(SetIndexCommand { index })
        .map(|_| ())
        .map_err(|error| format!("template switch failed: {error}"))
}

/// Nearest slider stop under `x`; the service clamps anything out of range.
fn slider_index_at(x: f32, track_left: usize, track_right: usize, max: usize) -> i64 {
    if max == 0 || track_right <= track_left {
        return 0;
    }
    let t = (x - track_left as f32) / (track_right - track_left) as f32;
    (t * max as f32).round() as i64
}

fn knob_x(slider: &SliderView, track_left: usize, track_right: usize) -> usize {
    if slider.max == slider.min {
        return track_left;
    }
    let t = (slider.value - slider.min) as f32 / (slider.max - slider.min) as f32;
    track_left + (t * (track_right - track_left) as f32).round() as usize
}

fn zoom_factor(scroll_y: f32) -> f32 {
    if scroll_y > 0.0 {
        ZOOM_STEP
    } else {
        1.0 / ZOOM_STEP
    }
}

fn draw_panel(
    buffer: &mut [u32],
    layout: &Layout,
    panel: &ControlPanel,
    status: &ViewportStatus,
    slider_active: bool,
) {
    let width = layout.width;
    fill_rect(buffer, width, 0, 0, PANEL_WIDTH, layout.height, PANEL_BACKGROUND);
    fill_rect(buffer, width, PANEL_WIDTH - 1, 0, 1, layout.height, PANEL_BORDER);

    let left = PANEL_PADDING;
    let inner_width = PANEL_WIDTH - 2 * PANEL_PADDING;
    let max_chars = inner_width / GLYPH_WIDTH;

    draw_text_scaled(buffer, width, left, TITLE_TOP, "Bag configurator", TEXT_COLOR, 2);
    for (line, text) in wrap_text(SUBTITLE, max_chars).iter().enumerate() {
        draw_text(buffer, width, left, SUBTITLE_TOP + line * LINE_HEIGHT, text, MUTED_TEXT);
    }

    draw_bold_text(buffer, width, left, TEMPLATE_ROW_TOP, "Template", TEXT_COLOR);
    let label_x = (left + inner_width).saturating_sub(text_width(&panel.index_label));
    draw_text(buffer, width, label_x, TEMPLATE_ROW_TOP, &panel.index_label, MUTED_TEXT);

    draw_slider(buffer, layout, &panel.slider, slider_active);

    let headline = ascii_fallback(&panel.headline);
    if panel.status == CatalogStatus::Ready {
        draw_bold_text(buffer, width, left, HEADLINE_TOP, &headline, TEXT_COLOR);
    } else {
        draw_text(buffer, width, left, HEADLINE_TOP, &headline, TEXT_COLOR);
    }

    draw_button(buffer, width, layout.prev_button, "Prev", panel.prev_enabled);
    draw_button(buffer, width, layout.next_button, "Next", panel.next_enabled);

    fill_rect(buffer, width, left, RULE_TOP, inner_width, 1, PANEL_BORDER);
    for (line, note) in UPGRADE_NOTES.iter().enumerate() {
        draw_text(
            buffer,
            width,
            left,
            NOTE_TOP + line * LINE_HEIGHT,
            &ascii_fallback(note),
            MUTED_TEXT,
        );
    }

    let (status_text, status_color) = status_line(&panel.status, status);
    let status_top = layout.height.saturating_sub(PANEL_PADDING + LINE_HEIGHT * 2);
    for (line, text) in wrap_text(&status_text, max_chars).iter().take(2).enumerate() {
        draw_text(
            buffer,
            width,
            left,
            status_top + line * LINE_HEIGHT,
            text,
            status_color,
        );
    }
}

fn status_line(catalog: &CatalogStatus, viewport: &ViewportStatus) -> (String, u32) {
    match (catalog, viewport) {
        (CatalogStatus::Unavailable(reason), _) => {
            (format!("Catalog unavailable: {reason}"), ERROR_TEXT)
        }
        (CatalogStatus::NoTemplates, _) => ("Catalog has no templates.".to_string(), MUTED_TEXT),
        (_, ViewportStatus::Failed { name, reason }) => {
            (format!("Could not load {name}: {reason}"), ERROR_TEXT)
        }
        (_, ViewportStatus::Loading { name }) => (format!("Loading {name}..."), MUTED_TEXT),
        (_, ViewportStatus::Showing { .. }) => (
            "Drag to orbit, scroll to zoom, arrows to switch.".to_string(),
            MUTED_TEXT,
        ),
        (_, ViewportStatus::Idle) => (String::new(), MUTED_TEXT),
    }
}

fn draw_slider(buffer: &mut [u32], layout: &Layout, slider: &SliderView, active: bool) {
    let width = layout.width;
    let rect = layout.slider;
    let center_y = rect.top + rect.height / 2;
    let track_left = layout.track_left();
    let track_right = layout.track_right();
    let color = if !slider.enabled {
        DISABLED_TEXT
    } else if active {
        darken_color(ACCENT, 30)
    } else {
        ACCENT
    };

    fill_rect(
        buffer,
        width,
        track_left,
        center_y.saturating_sub(2),
        track_right.saturating_sub(track_left),
        4,
        0xE2E2E2,
    );
    let knob = knob_x(slider, track_left, track_right);
    if slider.enabled {
        fill_rect(
            buffer,
            width,
            track_left,
            center_y.saturating_sub(2),
            knob.saturating_sub(track_left),
            4,
            color,
        );
    }
    fill_rect(
        buffer,
        width,
        knob.saturating_sub(KNOB_WIDTH / 2),
        rect.top + 4,
        KNOB_WIDTH,
        rect.height.saturating_sub(8),
        color,
    );
}

fn draw_button(buffer: &mut [u32], width: usize, rect: Rect, label: &str, enabled: bool) {
    let (fill, border, text) = if enabled {
        (0xF4F4F4, 0x9A9A9A, TEXT_COLOR)
    } else {
        (0xFAFAFA, 0xDDDDDD, DISABLED_TEXT)
    };
    fill_rect(buffer, width, rect.left, rect.top, rect.width, rect.height, fill);
    draw_rect(buffer, width, rect.left, rect.top, rect.width, rect.height, border);
    let text_x = rect.left + rect.width.saturating_sub(text_width(label)) / 2;
    let text_y = rect.top + rect.height.saturating_sub(8) / 2;
    draw_text(buffer, width, text_x, text_y, label, text);
}

fn draw_viewport(buffer: &mut [u32], layout: &Layout, frame: Option<&RenderedFrame>) {
    let rect = layout.viewport;
    let Some(frame) = frame.filter(|frame| {
        frame.width > 0 && frame.height > 0 && !frame.pixels.is_empty()
    }) else {
        fill_rect(buffer, layout.width, rect.left, rect.top, rect.width, rect.height, 0xF5F5F5);
        return;
    };

    let src_width = frame.width as usize;
    let src_height = frame.height as usize;
    for y in 0..rect.height {
        let src_y = y * src_height / rect.height;
        for x in 0..rect.width {
            let src_x = x * src_width / rect.width;
            let color = frame.pixels[src_y * src_width + src_x];
            set_pixel(buffer, layout.width, rect.left + x, rect.top + y, color);
        }
    }
}

fn build_window_title(
    panel: &ControlPanel,
    status: &ViewportStatus,
    metrics: &str,
    backend: &str,
    frame: Option<&RenderedFrame>,
) -> String {
    let viewport = match status {
        ViewportStatus::Idle => "viewport idle".to_string(),
        ViewportStatus::Loading { name } => format!("loading {name}"),
        ViewportStatus::Showing { name } => format!("showing {name}"),
        ViewportStatus::Failed { name, .. } => format!("failed {name}"),
    };
    let frame_info = frame
        .map(|frame| format!("{}x{} {}ms", frame.width, frame.height, frame.render_time_ms))
        .unwrap_or_else(|| "no frame".to_string());
    format!(
        "Bag configurator | template {} | {} | {} | {} {} | esc quit",
        panel.index_label, viewport, metrics, backend, frame_info
    )
}

/// The 8x8 font only covers basic Latin.
fn ascii_fallback(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '…' => out.push_str("..."),
            '•' => out.push('-'),
            '–' | '—' => out.push('-'),
            other => out.push(other),
        }
    }
    out
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn text_width(text: &str) -> usize {
    ascii_fallback(text).chars().count() * GLYPH_WIDTH
}

fn fill_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    for y in top..top.saturating_add(h) {
        for x in left..left.saturating_add(w) {
            set_pixel(buffer, width, x, y, color);
        }
    }
}

fn draw_rect(buffer: &mut [u32], width: usize, left: usize, top: usize, w: usize, h: usize, color: u32) {
    if w == 0 || h == 0 {
        return;
    }
    let right = left + w - 1;
    let bottom = top + h - 1;
    for x in left..=right {
        set_pixel(buffer, width, x, top, color);
        set_pixel(buffer, width, x, bottom, color);
    }
    for y in top..=bottom {
        set_pixel(buffer, width, left, y, color);
        set_pixel(buffer, width, right, y, color);
    }
}

fn darken_color(color: u32, amount: u8) -> u32 {
    let r = ((color >> 16) & 0xFF).saturating_sub(amount as u32);
    let g = ((color >> 8) & 0xFF).saturating_sub(amount as u32);
    let b = (color & 0xFF).saturating_sub(amount as u32);
    (r << 16) | (g << 8) | b
}

fn set_pixel(buffer: &mut [u32], width: usize, x: usize, y: usize, color: u32) {
    let height = buffer.len() / width;
    if x < width && y < height {
        buffer[y * width + x] = color;
    }
}

fn draw_text(buffer: &mut [u32], width: usize, x: usize, y: usize, text: &str, color: u32) {
    draw_text_scaled(buffer, width, x, y, text, color, 1);
}

fn draw_bold_text(buffer: &mut [u32], width: usize, x: usize, y: usize, text: &str, color: u32) {
    draw_text(buffer, width, x, y, text, color);
    draw_text(buffer, width, x + 1, y, text, color);
}

fn draw_text_scaled(
    buffer: &mut [u32],
    width: usize,
    x: usize,
    y: usize,
    text: &str,
    color: u32,
    scale: usize,
) {
    let mut cursor_x = x;
    for ch in ascii_fallback(text).chars() {
        if ch == '\n' {
            continue;
        }
        draw_char(buffer, width, cursor_x, y, ch, color, scale);
        cursor_x = cursor_x.saturating_add(GLYPH_WIDTH * scale);
    }
}

fn draw_char(buffer: &mut [u32], width: usize, x: usize, y: usize, ch: char, color: u32, scale: usize) {
    let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0; 8]);
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8 {
            if (bits >> col) & 1 == 1 {
                fill_rect(
                    buffer,
                    width,
                    x + col * scale,
                    y + row * scale,
                    scale,
                    scale,
                    color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bag_config_domain::{Catalog, TemplateDescriptor, ViewerState, LOADING_LABEL};

    fn ready_panel() -> ControlPanel {
        let mut state = ViewerState::default();
        state.begin_loading().expect("request");
        state.finish_loading(Ok(Catalog::new(vec![
            TemplateDescriptor::new("Tote", "/m/a.glb"),
            TemplateDescriptor::new("Duffel", "/m/b.glb"),
            TemplateDescriptor::new("Backpack", "/m/c.glb"),
        ])));
        ControlPanel::from_state(&state)
    }

    #[test]
    fn slider_positions_map_to_nearest_index() {
        let layout = Layout::new(1280, 800);
        let (left, right) = (layout.track_left(), layout.track_right());
        assert_eq!(slider_index_at(left as f32, left, right, 2), 0);
        assert_eq!(slider_index_at(right as f32, left, right, 2), 2);
        let middle = (left + right) as f32 / 2.0;
        assert_eq!(slider_index_at(middle, left, right, 2), 1);
        assert_eq!(slider_index_at(0.0, left, right, 2), 0);
        assert_eq!(slider_index_at(middle, left, right, 0), 0);
    }

    #[test]
    fn knob_tracks_slider_value() {
        let panel = ready_panel();
        let knob = knob_x(&panel.slider, 100, 300);
        assert_eq!(knob, 100);
        let last = SliderView {
            value: panel.slider.max,
            ..panel.slider
        };
        assert_eq!(knob_x(&last, 100, 300), 300);
    }

    #[test]
    fn layout_splits_panel_and_viewport() {
        let layout = Layout::new(1280, 800);
        assert_eq!(layout.viewport.left, 420);
        assert_eq!(layout.viewport.width, 860);
        assert!(layout.slider.right() <= PANEL_WIDTH);
        assert!(layout.prev_button.right() < layout.next_button.left);
        assert!(layout.viewport.contains(421.0, 10.0));
        assert!(!layout.viewport.contains(419.0, 10.0));
    }

    #[test]
    fn text_falls_back_to_ascii() {
        assert_eq!(ascii_fallback("Loading templates…"), "Loading templates...");
        assert_eq!(ascii_fallback("• front/back toggle"), "- front/back toggle");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text(SUBTITLE, 47);
        assert_eq!(
            lines,
            vec![
                "Template slider swaps pre-made models (fast".to_string(),
                "MVP).".to_string()
            ]
        );
        assert!(wrap_text("", 10).is_empty());
    }

    #[test]
    fn status_line_surfaces_failures() {
        let (text, color) = status_line(
            &CatalogStatus::Ready,
            &ViewportStatus::Failed {
                name: "Duffel".to_string(),
                reason: "not found: /m/b.glb".to_string(),
            },
        );
        assert_eq!(text, "Could not load Duffel: not found: /m/b.glb");
        assert_eq!(color, ERROR_TEXT);

        let (text, _) = status_line(
            &CatalogStatus::Unavailable("404".to_string()),
            &ViewportStatus::Idle,
        );
        assert!(text.contains("404"));
    }

    #[test]
    fn title_reports_loading_label_before_catalog() {
        let panel = ControlPanel::from_state(&ViewerState::Loading);
        let title = build_window_title(&panel, &ViewportStatus::Idle, "assets", "cpu", None);
        assert!(title.contains(LOADING_LABEL));
        assert!(title.contains("no frame"));
    }

    #[test]
    fn zoom_direction_follows_wheel() {
        assert!(zoom_factor(1.0) < 1.0);
        assert!(zoom_factor(-1.0) > 1.0);
    }
}
