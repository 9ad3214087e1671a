use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::ui::AppState;

pub const TAGLINE: &str = "Add new meal to your cookbook right now!";

pub fn draw_header(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let lines = vec![
        Line::from(Span::styled(
            state.config.title.clone(),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(TAGLINE, Style::default().fg(theme.secondary))),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(p, area);
}
