/// Floating widget rendering
///
/// Draws a small bordered box at the persisted window position, over a dim
/// backdrop. When always-on-top is enabled the box clears the cells beneath
/// it; when disabled the backdrop shows through.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::core::settings::WindowPosition;
use crate::utils::{clamp_position, WIDGET_HEIGHT, WIDGET_WIDTH};

pub fn render(f: &mut Frame, app: &App) {
    let area = f.size();

    render_backdrop(f, area);

    let widget_area = widget_rect(app.settings().window_position, area);
    if app.settings().always_on_top {
        f.render_widget(Clear, widget_area);
    }
    render_widget_box(f, app, widget_area);
}

fn render_backdrop(f: &mut Frame, area: Rect) {
    let hint = Paragraph::new(vec![
        Line::from(Span::styled(
            "SwapWatch",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "[q] quit  [↑↓←→] move  [a] on-top  [d] drag  [r] ram",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Left);
    f.render_widget(hint, area);
}

/// Clamp the persisted position into the current terminal size; a widget
/// dragged off-screen in a previous, larger session snaps back inside.
fn widget_rect(position: WindowPosition, area: Rect) -> Rect {
    let x = clamp_position(position.x, WIDGET_WIDTH, area.width) as u16;
    let y = clamp_position(position.y, WIDGET_HEIGHT, area.height) as u16;
    Rect::new(
        x,
        y,
        WIDGET_WIDTH.min(area.width),
        WIDGET_HEIGHT.min(area.height),
    )
}

fn render_widget_box(f: &mut Frame, app: &App, area: Rect) {
    let swap = app.swap();

    // Color-coded alert on swap pressure: >80% red, >60% yellow
    let swap_color = if swap.percent() > 80.0 {
        Color::Red
    } else if swap.percent() > 60.0 {
        Color::Yellow
    } else {
        Color::Green
    };

    let settings = app.settings();
    let footer = Line::from(vec![
        Span::styled("[a]", Style::default().fg(Color::Gray)),
        Span::raw(format!("top:{} ", on_off(settings.always_on_top))),
        Span::styled("[d]", Style::default().fg(Color::Gray)),
        Span::raw(format!("drag:{} ", on_off(settings.draggable))),
        Span::styled("[r]", Style::default().fg(Color::Gray)),
        Span::raw(format!("ram:{} ", on_off(settings.track_ram_usage))),
        Span::styled(
            app.last_refresh_clock().format("%H:%M:%S").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let body = vec![
        Line::from(Span::styled(
            app.header_text(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.swap_text(),
            Style::default().fg(swap_color),
        )),
        footer,
    ];

    let widget = Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" SwapWatch "),
        );
    f.render_widget(widget, area);
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_rect_snaps_into_small_terminal() {
        let area = Rect::new(0, 0, 50, 10);
        let rect = widget_rect(WindowPosition { x: 400, y: 400 }, area);

        assert!(rect.x + rect.width <= area.width);
        assert!(rect.y + rect.height <= area.height);
    }

    #[test]
    fn test_widget_rect_keeps_position_inside_area() {
        let area = Rect::new(0, 0, 120, 40);
        let rect = widget_rect(WindowPosition { x: 10, y: 5 }, area);

        assert_eq!((rect.x, rect.y), (10, 5));
        assert_eq!((rect.width, rect.height), (WIDGET_WIDTH, WIDGET_HEIGHT));
    }
}
