use crate::app::controller::FormController;
use crate::app::Effect;
use crate::dish::{DishType, FormField};
use crate::widgets::chrome::panel_block;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormRow {
    Field(FormField),
    Save,
    Cancel,
}

/// Terminal presentation of the dish form. Holds cursor and edit-buffer state;
/// all form semantics live in the controller.
#[derive(Default)]
pub struct DishFormWidget {
    pub controller: FormController,
    pub title: String,
    pub selected: usize,
    pub editing: bool,
    pub message: Option<String>,
    buffer: String,
}

impl DishFormWidget {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            controller: FormController::new(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Base fields, then the active type's group, then the buttons.
    pub fn rows(&self) -> Vec<FormRow> {
        let mut rows: Vec<FormRow> = FormField::visible_fields(self.controller.values.dish_type)
            .into_iter()
            .map(FormRow::Field)
            .collect();
        rows.push(FormRow::Save);
        rows.push(FormRow::Cancel);
        rows
    }

    pub fn current_row(&self) -> FormRow {
        let rows = self.rows();
        rows[self.selected.min(rows.len() - 1)]
    }

    pub fn save_index(&self) -> usize {
        self.rows().len() - 2
    }

    fn current_field(&self) -> Option<FormField> {
        match self.current_row() {
            FormRow::Field(f) => Some(f),
            _ => None,
        }
    }

    fn leave_current_field(&mut self) {
        if let Some(field) = self.current_field() {
            self.controller.on_field_blur(field);
        }
    }

    fn begin_edit(&mut self, field: FormField) {
        self.buffer = self.controller.input_text(field);
        self.editing = true;
    }

    fn end_edit(&mut self) {
        self.editing = false;
        self.buffer.clear();
        self.leave_current_field();
    }

    fn change_type(&mut self, to: DishType) {
        self.controller.on_field_change(FormField::Type, to.as_str());
        self.controller.on_field_blur(FormField::Type);
        let last = self.rows().len() - 1;
        self.selected = self.selected.min(last);
    }

    fn push_char(&mut self, field: FormField, c: char) {
        if field.is_numeric() {
            let accept = c.is_ascii_digit()
                || (c == '.' && !self.buffer.contains('.'))
                || (c == '-' && self.buffer.is_empty());
            if !accept {
                return;
            }
        }
        self.buffer.push(c);
        self.controller.on_field_change(field, &self.buffer);
    }

    /// Integers step exactly; floats step through `f64`. No-op at the i64 bounds.
    fn step_number(&mut self, field: FormField, dir: i64) {
        let next = match self.controller.values.number(field) {
            None => Some(dir.to_string()),
            Some(n) if n.is_f64() => n.as_f64().map(|f| (f + dir as f64).to_string()),
            Some(n) => n
                .as_i64()
                .and_then(|i| i.checked_add(dir))
                .map(|i| i.to_string()),
        };
        if let Some(next) = next {
            self.buffer = next;
            self.controller.on_field_change(field, &self.buffer);
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.controller.submitting {
            self.message = Some("Submission in progress".into());
            return Vec::new();
        }
        match self.controller.on_submit() {
            Some(dish) => {
                self.message = Some("Submitting...".into());
                vec![Effect::SubmitDish { dish }]
            }
            None => {
                self.message = Some("Please fix the highlighted errors".into());
                Vec::new()
            }
        }
    }

    fn reset(&mut self) -> Vec<Effect> {
        self.controller.on_reset();
        self.selected = 0;
        self.message = Some("Reset to defaults".into());
        vec![Effect::ShowToast {
            text: "Reset".into(),
            level: crate::ui::ToastLevel::Info,
            seconds: 2,
        }]
    }

    fn value_text(&self, field: FormField, row_selected: bool, cursor_on: bool) -> String {
        if self.editing && row_selected {
            let mut val = self.buffer.clone();
            if cursor_on {
                val.push('▏');
            }
            return val;
        }
        match field {
            FormField::Type => format!("‹ {} ›", self.controller.values.dish_type),
            _ => self.controller.input_text(field),
        }
    }
}

pub fn draw_dish_form(
    f: &mut Frame,
    area: Rect,
    form: &DishFormWidget,
    highlight: bool,
    cursor_on: bool,
) {
    let ctl = &form.controller;
    let mut lines: Vec<Line> = Vec::new();
    let group_style = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let rows = form.rows();
    let selected = form.selected.min(rows.len() - 1);
    for (i, row) in rows.iter().enumerate() {
        let FormRow::Field(fld) = *row else {
            continue;
        };
        if fld == FormField::Name {
            lines.push(Line::from(Span::styled("-- Dish --", group_style)));
        } else if fld.variant().is_some()
            && FormField::variant_fields(ctl.values.dish_type).first() == Some(&fld)
        {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "-- Customize your meal --",
                group_style,
            )));
        }
        let sel = if i == selected { '›' } else { ' ' };
        let value_style = if i == selected {
            if form.editing {
                crate::theme::text_editing_bold()
            } else {
                crate::theme::text_active_bold()
            }
        } else {
            Style::default()
        };
        let editing_here = form.editing && i == selected;
        let mut spans = vec![Span::raw(format!("{sel} {} *: ", fld.label()))];
        if let Some(prefix) = fld.prefix() {
            spans.push(Span::styled(
                format!("{prefix} "),
                crate::theme::text_muted(),
            ));
        }
        let value = form.value_text(fld, i == selected, cursor_on);
        match fld.placeholder() {
            Some(hint) if value.is_empty() && !editing_here => {
                spans.push(Span::styled(hint, crate::theme::text_muted()));
            }
            _ => spans.push(Span::styled(value, value_style)),
        }
        lines.push(Line::from(spans));
        if let Some(err) = ctl.visible_error(fld) {
            lines.push(Line::from(Span::styled(
                format!("  ! {err}"),
                crate::theme::text_error(),
            )));
        }
    }
    // Buttons: Save | Cancel
    lines.push(Line::from(""));
    let save_idx = form.save_index();
    let cancel_idx = save_idx + 1;
    let can_save = !ctl.submitting;
    let save_label = if can_save { "[ Save ]" } else { "[ Saving… ]" };
    let mut save_style = if can_save {
        crate::theme::text_active_bold()
    } else {
        crate::theme::text_muted()
    };
    let mut cancel_style = crate::theme::text_muted();
    if selected == save_idx {
        save_style = if can_save {
            crate::theme::list_cursor_style()
        } else {
            Style::default()
                .fg(crate::theme::MUTED)
                .bg(crate::theme::ACCENT)
        };
    }
    if selected == cancel_idx {
        cancel_style = crate::theme::list_cursor_style();
    }
    lines.push(Line::from(vec![
        Span::styled(format!("  {save_label}  "), save_style),
        Span::styled("Cancel", cancel_style),
    ]));
    if let Some(err) = &ctl.api_error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            crate::theme::text_error(),
        )));
    }
    if let Some(msg) = &form.message {
        lines.push(Line::from(Span::styled(
            msg.clone(),
            crate::theme::text_muted(),
        )));
    }
    let title = if form.editing {
        format!("{} (editing)", form.title)
    } else {
        form.title.clone()
    };
    let block = panel_block(&title, highlight);
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

impl crate::widgets::Widget for DishFormWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64) {
        draw_dish_form(f, area, self, focused, tick % 2 == 0);
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let mut effects: Vec<Effect> = Vec::new();
        let row = self.current_row();
        match key {
            KeyCode::Up | KeyCode::Down => {
                let up = key == KeyCode::Up;
                if self.editing {
                    if let FormRow::Field(fld) = row {
                        if fld.is_numeric() {
                            self.step_number(fld, if up { 1 } else { -1 });
                        }
                    }
                } else {
                    self.leave_current_field();
                    let last = self.rows().len() - 1;
                    if up && self.selected > 0 {
                        self.selected -= 1;
                    } else if !up && self.selected < last {
                        self.selected += 1;
                    }
                }
            }
            KeyCode::Left | KeyCode::Right if !self.editing => {
                let forward = key == KeyCode::Right;
                match row {
                    FormRow::Field(FormField::Type) => {
                        let cur = self.controller.values.dish_type;
                        self.change_type(if forward { cur.next() } else { cur.prev() });
                    }
                    FormRow::Save if forward => self.selected += 1,
                    FormRow::Cancel if !forward => self.selected -= 1,
                    _ => {}
                }
            }
            KeyCode::Enter => {
                if self.editing {
                    self.end_edit();
                    return effects;
                }
                match row {
                    FormRow::Field(FormField::Type) => {
                        let next = self.controller.values.dish_type.next();
                        self.change_type(next);
                    }
                    FormRow::Field(fld) => self.begin_edit(fld),
                    FormRow::Save => effects.extend(self.submit()),
                    FormRow::Cancel => effects.extend(self.reset()),
                }
            }
            KeyCode::Esc if self.editing => self.end_edit(),
            KeyCode::Backspace if self.editing => {
                if let FormRow::Field(fld) = row {
                    self.buffer.pop();
                    self.controller.on_field_change(fld, &self.buffer);
                }
            }
            KeyCode::Char(c) if self.editing => {
                if let FormRow::Field(fld) = row {
                    self.push_char(fld, c);
                }
            }
            _ => {}
        }
        effects
    }
}
