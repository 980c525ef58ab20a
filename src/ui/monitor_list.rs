//! Monitor list screen rendering
//!
//! Renders one row per monitor with its status badge, identity, uptime
//! figures, last outage and a response-time sparkline, plus a header and a
//! footer carrying the cache notice and key hints.

use chrono::{Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use uptime_checker::data::{Monitor, MonitorStatus};

use super::format::{
    format_date, format_duration, response_time_label, short_url, status_presenter,
    uptime_ratio_label,
};
use super::widgets::ResponseSparkline;
use crate::app::App;

/// Lines per monitor row, including the separator
const ROW_HEIGHT: u16 = 4;

/// Width of the uptime figures column
const STATS_WIDTH: u16 = 28;

/// Renders the full dashboard screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state holding the latest snapshot
pub fn render(frame: &mut Frame, app: &App) {
    let [header, list, notice, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, app, header);
    render_list(frame, app, list);
    render_notice(frame, app, notice);
    render_help(frame, app, help);
}

/// Renders the title line with the time and status counts
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let monitors = app.monitors();
    let up = count_status(monitors, |s| s == MonitorStatus::Up);
    let down = count_status(monitors, |s| {
        matches!(s, MonitorStatus::Down | MonitorStatus::SeemsDown)
    });

    let mut spans = vec![
        Span::styled(
            "UPTIME CHECKER",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            Local::now().format("%a %b %d, %H:%M").to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(format!("● {} up", up), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(format!("● {} down", down), Style::default().fg(Color::Red)),
    ];

    if app.refreshing {
        spans.push(Span::styled(
            "  Refreshing...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn count_status(monitors: &[Monitor], pred: impl Fn(MonitorStatus) -> bool) -> usize {
    monitors.iter().filter(|m| pred(m.status)).count()
}

/// Renders the bordered list of monitor rows
fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Monitors ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let monitors = app.monitors();
    if monitors.is_empty() {
        let (message, color) = match &app.snapshot.error {
            Some(error) => (error.as_str(), Color::Red),
            None => ("No monitors found.", Color::Gray),
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, inner);
        return;
    }

    // Scroll so the selected row is always visible
    let visible = (inner.height / ROW_HEIGHT).max(1) as usize;
    let first = app.selected_index.saturating_sub(visible - 1);
    let now_secs = Utc::now().timestamp();

    for (slot, (index, monitor)) in monitors
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .enumerate()
    {
        let y = inner.y + slot as u16 * ROW_HEIGHT;
        let row = Rect::new(inner.x, y, inner.width, ROW_HEIGHT - 1).intersection(inner);
        if row.height == 0 {
            break;
        }
        render_row(frame, monitor, row, index == app.selected_index, now_secs);

        let is_last = slot + 1 == visible || index + 1 == monitors.len();
        if !is_last {
            let separator = Rect::new(inner.x, y + ROW_HEIGHT - 1, inner.width, 1).intersection(inner);
            frame.render_widget(
                Paragraph::new("─".repeat(inner.width as usize))
                    .style(Style::default().fg(Color::DarkGray)),
                separator,
            );
        }
    }
}

/// Renders a single monitor row
fn render_row(frame: &mut Frame, monitor: &Monitor, area: Rect, selected: bool, now_secs: i64) {
    let [status, ident, stats, outage, trend] = Layout::horizontal([
        Constraint::Length(16),
        Constraint::Length(26),
        Constraint::Length(STATS_WIDTH),
        Constraint::Length(14),
        Constraint::Min(0),
    ])
    .spacing(1)
    .areas(area);

    // Status badge
    let (status_text, status_color) = status_presenter(monitor.status);
    let badge = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(status_color));
    frame.render_widget(
        Paragraph::new(Span::styled(
            status_text,
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(badge),
        status,
    );

    // Name, URL, type
    let name_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let ident_lines = vec![
        Line::from(Span::styled(monitor.friendly_name.clone(), name_style)),
        Line::from(Span::styled(
            short_url(&monitor.url).to_string(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            format!(
                "{} every {}",
                monitor.monitor_type.label(),
                format_duration(monitor.interval)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(ident_lines), ident);

    // Uptime figures
    let stats_lines = vec![
        label_value("Up for: ", monitor.up_for(now_secs).map(format_duration)),
        label_value(
            "Uptime (1mo): ",
            uptime_ratio_label(monitor.custom_uptime_ratio.as_deref()),
        ),
        label_value(
            "Avg speed (1d): ",
            response_time_label(monitor.average_response_time),
        ),
    ];
    frame.render_widget(Paragraph::new(stats_lines), stats);

    // Last outage
    let last_outage = monitor.most_recent_outage();
    let outage_lines = vec![
        Line::from(Span::styled(
            "Last outage:",
            Style::default().fg(Color::Gray),
        )),
        match last_outage {
            Some(entry) => Line::from(format_date(entry.datetime)),
            None => Line::from(Span::styled("-", Style::default().fg(Color::DarkGray))),
        },
        Line::from(
            last_outage
                .map(|entry| format_duration(entry.duration))
                .unwrap_or_default(),
        ),
    ];
    frame.render_widget(
        Paragraph::new(outage_lines).alignment(Alignment::Right),
        outage,
    );

    // Response-time trend
    if trend.width == 0 {
        return;
    }
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Response",
            Style::default().fg(Color::DarkGray),
        )),
        trend,
    );
    let spark_area = Rect::new(trend.x, trend.y + 1, trend.width.min(20), 1).intersection(trend);
    if monitor.response_times.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("-", Style::default().fg(Color::DarkGray))),
            spark_area,
        );
    } else {
        let sparkline = ResponseSparkline::new(&monitor.response_times)
            .style(Style::default().fg(trend_color(monitor.status)));
        frame.render_widget(sparkline, spark_area);
    }
}

/// Sparkline color: cyan while healthy, the status color otherwise
fn trend_color(status: MonitorStatus) -> Color {
    match status {
        MonitorStatus::Up => Color::Cyan,
        other => status_presenter(other).1,
    }
}

/// A gray label followed by a right-aligned value, or a gray "-" when absent
fn label_value(label: &'static str, value: Option<String>) -> Line<'static> {
    let value_width = (STATS_WIDTH as usize).saturating_sub(label.chars().count());
    let (value, style) = match value {
        Some(v) => (v, Style::default().fg(Color::White)),
        None => ("-".to_string(), Style::default().fg(Color::DarkGray)),
    };

    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Gray)),
        Span::styled(format!("{:>width$}", value, width = value_width), style),
    ])
}

/// Renders the cache notice line
fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    if !app.snapshot.using_cache {
        return;
    }
    let notice = Paragraph::new(Span::styled(
        "Using cached data: rate limit reached or API unavailable.",
        Style::default().fg(Color::Yellow),
    ));
    frame.render_widget(notice, area);
}

/// Renders the help text at the bottom of the screen with data freshness
fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut help_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let mins_ago = elapsed.num_minutes();
        let freshness_text = if mins_ago < 1 {
            " │ Data: just now".to_string()
        } else if mins_ago < 60 {
            format!(" │ Data: {}m ago", mins_ago)
        } else {
            format!(" │ Data: {}h ago", elapsed.num_hours())
        };
        help_spans.push(Span::styled(
            freshness_text,
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
