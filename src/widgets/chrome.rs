use ratatui::widgets::{Block, Borders};

pub fn panel_block<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let mut b = Block::default().borders(Borders::ALL).title(title);
    b = if focused {
        b.border_style(crate::theme::border_focused())
    } else {
        b.border_style(crate::theme::border_unfocused())
    };
    b
}
