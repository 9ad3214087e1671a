use crate::widgets::chrome::panel_block;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub const EMPTY_HINT: &str = "Saved dishes appear here.";

/// Read-only, scrollable view of the last server response.
pub struct JsonViewerWidget {
    pub title: String,
    pub text: String,
    pub scroll_y: u16,
    pub wrap: bool,
    last_viewport_h: u16,
}

impl Default for JsonViewerWidget {
    fn default() -> Self {
        Self::from_text("Response", "")
    }
}

impl JsonViewerWidget {
    pub fn from_text(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            scroll_y: 0,
            wrap: false,
            last_viewport_h: 0,
        }
    }
}

impl crate::widgets::Widget for JsonViewerWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, _tick: u64) {
        let lines: Vec<Line> = if self.text.is_empty() {
            vec![Line::from(EMPTY_HINT).style(crate::theme::text_muted())]
        } else {
            self.text.lines().map(|l| Line::from(l.to_string())).collect()
        };
        // viewport
        self.last_viewport_h = area.height.saturating_sub(2);
        let total_lines = lines.len() as u16;
        let max_scroll = total_lines.saturating_sub(self.last_viewport_h);
        if self.scroll_y > max_scroll {
            self.scroll_y = max_scroll;
        }
        let block = panel_block(&self.title, focused);
        let p = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: !self.wrap })
            .scroll((self.scroll_y, 0));
        f.render_widget(p, area);
    }
    fn on_key(&mut self, key: KeyCode) -> Vec<crate::app::Effect> {
        match key {
            KeyCode::Up => {
                if self.scroll_y > 0 {
                    self.scroll_y -= 1;
                }
            }
            KeyCode::Down => {
                self.scroll_y = self.scroll_y.saturating_add(1);
            }
            KeyCode::PageUp => {
                let step = self.last_viewport_h;
                self.scroll_y = self.scroll_y.saturating_sub(step);
            }
            KeyCode::PageDown => {
                let step = self.last_viewport_h;
                self.scroll_y = self.scroll_y.saturating_add(step);
            }
            KeyCode::Home => {
                self.scroll_y = 0;
            }
            KeyCode::End => {
                let total = self.text.lines().count() as u16;
                self.scroll_y = total.saturating_sub(self.last_viewport_h);
            }
            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.wrap = !self.wrap;
            }
            _ => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Widget; // bring trait in scope for render/on_key
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(w: &mut JsonViewerWidget) -> String {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let _ = terminal.draw(|f| {
            let area = ratatui::layout::Rect {
                x: 0,
                y: 0,
                width: 40,
                height: 12,
            };
            w.render(f, area, true, 0);
        });
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn end_jumps_to_bottom_and_w_toggles_wrap() {
        let text = (0..30)
            .map(|i| format!("line-{i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut w = JsonViewerWidget::from_text("Dish added", text);
        // 12 rows high, 10 inside the border
        let _ = draw(&mut w);
        let _ = w.on_key(KeyCode::End);
        let expected_max = (30u16).saturating_sub(w.last_viewport_h);
        assert_eq!(w.scroll_y, expected_max);
        assert!(draw(&mut w).contains("line-29"));
        assert!(!w.wrap);
        let _ = w.on_key(KeyCode::Char('w'));
        assert!(w.wrap);
    }

    #[test]
    fn empty_viewer_shows_hint() {
        let mut w = JsonViewerWidget::default();
        assert!(draw(&mut w).contains(EMPTY_HINT));
    }
}
