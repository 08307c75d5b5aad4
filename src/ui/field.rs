//! Input widgets for the wizard forms

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::wizard::forms::{FieldKind, FieldSpec, SelectOption};
use crate::wizard::validation::Marker;

/// An input widget, one per form field
pub enum FormField {
    /// Single-line text input
    Text { value: String, cursor_pos: usize },
    /// Multi-line input using tui-textarea
    Area { textarea: Box<TextArea<'static>> },
    /// Numeric input (digits, one decimal point)
    Number { value: String, cursor_pos: usize },
    /// One-of selection rendered as a list
    Select {
        options: &'static [SelectOption],
        selected: usize,
        list_state: ListState,
    },
    /// Masked single-line input
    Password { value: String, cursor_pos: usize },
}

impl FormField {
    pub fn from_spec(spec: &FieldSpec) -> Self {
        match spec.kind {
            FieldKind::Text => FormField::Text {
                value: String::new(),
                cursor_pos: 0,
            },
            FieldKind::TextArea => FormField::Area {
                textarea: Box::new(TextArea::default()),
            },
            FieldKind::Number => FormField::Number {
                value: String::new(),
                cursor_pos: 0,
            },
            FieldKind::Select => {
                let mut list_state = ListState::default();
                list_state.select(Some(0));
                FormField::Select {
                    options: spec.options,
                    selected: 0,
                    list_state,
                }
            }
            FieldKind::Password => FormField::Password {
                value: String::new(),
                cursor_pos: 0,
            },
        }
    }

    /// Current value as it would be posted to the server
    pub fn value(&self) -> String {
        match self {
            FormField::Text { value, .. }
            | FormField::Number { value, .. }
            | FormField::Password { value, .. } => value.clone(),
            FormField::Area { textarea } => textarea.lines().join("\n"),
            FormField::Select {
                options, selected, ..
            } => options
                .get(*selected)
                .map(|o| o.value.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::Text { value, cursor_pos }
            | FormField::Number { value, cursor_pos }
            | FormField::Password { value, cursor_pos } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::Area { textarea } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
            FormField::Select {
                options,
                selected,
                list_state,
            } => {
                if let Some(idx) = options.iter().position(|o| o.value == new_value) {
                    *selected = idx;
                    list_state.select(Some(idx));
                }
            }
        }
    }

    /// Character count of the current value
    pub fn char_count(&self) -> usize {
        match self {
            FormField::Area { textarea } => {
                let lines = textarea.lines();
                let chars: usize = lines.iter().map(|l| l.chars().count()).sum();
                // count the newlines between lines too
                chars + lines.len().saturating_sub(1)
            }
            other => other.value().chars().count(),
        }
    }

    /// Whether the widget consumes Left/Right for cursor movement,
    /// which means those keys cannot double as step navigation.
    pub fn is_text_entry(&self) -> bool {
        !matches!(self, FormField::Select { .. })
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::Text { value, cursor_pos }
            | FormField::Password { value, cursor_pos } => {
                handle_line_key(value, cursor_pos, key, |_| true)
            }
            FormField::Number { value, cursor_pos } => {
                let has_point = value.contains('.');
                let allow = move |c: char| c.is_ascii_digit() || (c == '.' && !has_point);
                handle_line_key(value, cursor_pos, key, allow)
            }
            FormField::Area { textarea } => {
                textarea.input(crossterm::event::KeyEvent::new(
                    key,
                    crossterm::event::KeyModifiers::NONE,
                ));
                true
            }
            FormField::Select {
                options,
                selected,
                list_state,
            } => match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    if *selected > 0 {
                        *selected -= 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected < options.len().saturating_sub(1) {
                        *selected += 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                _ => false,
            },
        }
    }

    pub fn render_height(&self) -> u16 {
        match self {
            FormField::Area { .. } => 5,
            FormField::Select { options, .. } => (options.len() as u16).min(5),
            _ => 3,
        }
    }

    /// Render the widget. The validity marker drives the border color
    /// the same way the is-valid / is-invalid styles do on the web form.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, marker: Option<Marker>) {
        let border_color = match marker {
            Some(Marker::Invalid) => Color::Red,
            Some(Marker::Valid) => Color::Green,
            None if focused => Color::Cyan,
            None => Color::Gray,
        };

        match self {
            FormField::Text { value, cursor_pos } | FormField::Number { value, cursor_pos } => {
                let text = line_with_cursor(value, *cursor_pos, focused);
                let para = Paragraph::new(Line::from(text)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );
                frame.render_widget(para, area);
            }
            FormField::Password { value, cursor_pos } => {
                let masked: String = "*".repeat(value.chars().count());
                let text = line_with_cursor(&masked, *cursor_pos, focused);
                let para = Paragraph::new(Line::from(text)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );
                frame.render_widget(para, area);
            }
            FormField::Area { textarea } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );
                frame.render_widget(&**textarea, area);
            }
            FormField::Select {
                options,
                selected,
                list_state,
            } => {
                let items: Vec<ListItem> = options
                    .iter()
                    .enumerate()
                    .map(|(i, opt)| {
                        let style = if i == *selected {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        let mut spans = vec![Span::styled(opt.label, style)];
                        if !opt.description.is_empty() {
                            spans.push(Span::styled(
                                format!("  {}", opt.description),
                                Style::default().fg(Color::DarkGray),
                            ));
                        }
                        ListItem::new(Line::from(spans))
                    })
                    .collect();

                let list = List::new(items)
                    .highlight_style(
                        Style::default()
                            .add_modifier(Modifier::REVERSED)
                            .fg(Color::Cyan),
                    )
                    .highlight_symbol("> ");

                frame.render_stateful_widget(list, area, list_state);
            }
        }
    }
}

fn handle_line_key(
    value: &mut String,
    cursor_pos: &mut usize,
    key: KeyCode,
    allow: impl Fn(char) -> bool,
) -> bool {
    match key {
        KeyCode::Char(c) => {
            if allow(c) {
                let byte = byte_index(value, *cursor_pos);
                value.insert(byte, c);
                *cursor_pos += 1;
            }
            true
        }
        KeyCode::Backspace => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
                let byte = byte_index(value, *cursor_pos);
                value.remove(byte);
            }
            true
        }
        KeyCode::Delete => {
            if *cursor_pos < value.chars().count() {
                let byte = byte_index(value, *cursor_pos);
                value.remove(byte);
            }
            true
        }
        KeyCode::Left => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
            }
            true
        }
        KeyCode::Right => {
            if *cursor_pos < value.chars().count() {
                *cursor_pos += 1;
            }
            true
        }
        KeyCode::Home => {
            *cursor_pos = 0;
            true
        }
        KeyCode::End => {
            *cursor_pos = value.chars().count();
            true
        }
        _ => false,
    }
}

fn byte_index(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map_or(value.len(), |(i, _)| i)
}

fn line_with_cursor(value: &str, cursor_pos: usize, focused: bool) -> Vec<Span<'static>> {
    let mut text = value.to_string();
    if focused {
        let byte = byte_index(&text, cursor_pos);
        text.insert(byte, '|');
    }
    vec![Span::raw(text)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::forms;

    fn text_field() -> FormField {
        FormField::Text {
            value: String::new(),
            cursor_pos: 0,
        }
    }

    #[test]
    fn test_text_handles_chars() {
        let mut field = text_field();
        assert!(field.handle_key(KeyCode::Char('h')));
        assert!(field.handle_key(KeyCode::Char('i')));
        assert_eq!(field.value(), "hi");
        assert_eq!(field.char_count(), 2);
    }

    #[test]
    fn test_number_rejects_letters_and_double_point() {
        let mut field = FormField::Number {
            value: String::new(),
            cursor_pos: 0,
        };
        field.handle_key(KeyCode::Char('1'));
        field.handle_key(KeyCode::Char('x'));
        field.handle_key(KeyCode::Char('.'));
        field.handle_key(KeyCode::Char('.'));
        field.handle_key(KeyCode::Char('5'));
        assert_eq!(field.value(), "1.5");
    }

    #[test]
    fn test_select_cycles_options() {
        let form = forms::registration();
        let spec = form.field("user_type").unwrap();
        let mut field = FormField::from_spec(spec);
        assert_eq!(field.value(), "candidate");

        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "company");

        // stays on the last option
        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "company");

        field.handle_key(KeyCode::Up);
        assert_eq!(field.value(), "candidate");
    }

    #[test]
    fn test_select_does_not_capture_left_right() {
        let form = forms::registration();
        let spec = form.field("user_type").unwrap();
        let mut field = FormField::from_spec(spec);
        assert!(!field.is_text_entry());
        assert!(!field.handle_key(KeyCode::Left));
        assert!(!field.handle_key(KeyCode::Right));
    }

    #[test]
    fn test_area_counts_newlines() {
        let mut field = FormField::Area {
            textarea: Box::new(tui_textarea::TextArea::default()),
        };
        field.set_value("ab\ncd");
        assert_eq!(field.char_count(), 5);
        assert_eq!(field.value(), "ab\ncd");
    }

    #[test]
    fn test_unicode_editing_stays_on_char_boundaries() {
        let mut field = text_field();
        field.set_value("ingeniería");
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "ingenierí");
        field.handle_key(KeyCode::Home);
        field.handle_key(KeyCode::Delete);
        assert_eq!(field.value(), "ngenierí");
    }
}
