//! Key bindings and status legend, drawn as a modal over the dashboard

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use uptime_checker::data::MonitorStatus;

use super::format::status_presenter;

const OVERLAY_WIDTH: u16 = 52;

/// Key bindings grouped by section
const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("↑ k / ↓ j", "Select previous / next"),
            ("g / G", "Jump to first / last"),
        ],
    ),
    (
        "Data",
        &[
            ("r", "Refresh now (rate limited)"),
            ("?", "Show or hide this help"),
            ("q / Esc", "Quit"),
        ],
    ),
];

/// Statuses listed in the legend, in display order
const LEGEND: [MonitorStatus; 5] = [
    MonitorStatus::Up,
    MonitorStatus::SeemsDown,
    MonitorStatus::Down,
    MonitorStatus::Pending,
    MonitorStatus::Paused,
];

/// Draws the help modal centered over whatever is on screen
pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    // Two border rows
    let height = lines.len() as u16 + 2;
    let area = centered_rect(OVERLAY_WIDTH, height, frame.area());

    let block = Block::default()
        .title(" Help ")
        .title_bottom(Line::from(" ? or Esc to close ").right_aligned())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for (section, keys) in BINDINGS {
        lines.push(Line::styled(*section, heading));
        lines.extend(keys.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!(" {:<11}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        }));
        lines.push(Line::default());
    }

    lines.push(Line::styled("Status", heading));
    let legend: Vec<Span> = LEGEND
        .iter()
        .flat_map(|status| {
            let (label, color) = status_presenter(*status);
            [
                Span::styled(" ● ", Style::default().fg(color)),
                Span::raw(label),
            ]
        })
        .collect();
    lines.push(Line::from(legend));

    lines
}

/// Centers a `width` x `height` rect inside `area`, shrinking it to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_lists_refresh_key_and_legend() {
        let content = rendered(80, 24);

        assert!(content.contains("Help"));
        assert!(content.contains("Refresh now"));
        assert!(content.contains("Status"));
    }

    #[test]
    fn test_every_binding_gets_a_line() {
        let bindings: usize = BINDINGS.iter().map(|(_, keys)| keys.len()).sum();
        // Heading and trailing blank per section, plus the legend heading and row
        let expected = bindings + BINDINGS.len() * 2 + 2;
        assert_eq!(help_lines().len(), expected);
    }

    #[test]
    fn test_renders_in_tiny_terminal() {
        let content = rendered(20, 5);
        assert!(content.contains("Help"));
    }

    #[test]
    fn test_centered_rect_fits_small_area() {
        let area = Rect::new(0, 0, 30, 10);
        let rect = centered_rect(50, 16, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }
}
