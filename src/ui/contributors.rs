//! Project contributors screen.
//!
//! The repository owner gets a fixed creator card rendered before the
//! fetch resolves; everyone else comes from the GitHub API.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::{github::exclude_owner, ApiError, Contributor};

enum Fetch {
    Loading,
    Loaded(Vec<Contributor>),
    Failed(ApiError),
}

pub struct ContributorsScreen {
    owner: String,
    repo: String,
    fetch: Fetch,
    scroll: usize,
}

impl ContributorsScreen {
    pub fn new(owner: String, repo: String) -> Self {
        Self {
            owner,
            repo,
            fetch: Fetch::Loading,
            scroll: 0,
        }
    }

    /// Apply the fetch outcome. The owner is dropped from the list
    /// since the creator card already shows them.
    pub fn apply_result(&mut self, result: Result<Vec<Contributor>, ApiError>) {
        self.fetch = match result {
            Ok(list) => Fetch::Loaded(exclude_owner(list, &self.owner)),
            Err(err) => {
                tracing::warn!(
                    provider = err.provider_name(),
                    error = %err,
                    "contributors fetch failed"
                );
                Fetch::Failed(err)
            }
        };
    }

    /// Returns true when the screen should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Fetch::Loaded(list) = &self.fetch {
                    if self.scroll + 1 < list.len() {
                        self.scroll += 1;
                    }
                }
                false
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(frame.area());

        let title = Paragraph::new(format!("{}/{}", self.owner, self.repo)).block(
            Block::default()
                .title(" Project contributors ")
                .borders(Borders::ALL),
        );
        frame.render_widget(title, chunks[0]);

        self.render_creator_card(frame, chunks[1]);
        self.render_list(frame, chunks[2]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("↑/↓ ", Style::default().fg(Color::Cyan)),
            Span::raw("Scroll   "),
            Span::styled("q ", Style::default().fg(Color::Cyan)),
            Span::raw("Close"),
        ]))
        .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, chunks[3]);
    }

    fn render_creator_card(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    self.owner.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  Creator", Style::default().fg(Color::Yellow)),
            ]),
            Line::from(Span::styled(
                format!("https://github.com/{}", self.owner),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let para = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(para, area);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = match &self.fetch {
            Fetch::Loading => vec![Line::from(Span::styled(
                "Loading contributors...",
                Style::default().fg(Color::DarkGray),
            ))],
            Fetch::Failed(err) => vec![Line::from(Span::styled(
                failure_line(err),
                Style::default().fg(Color::Red),
            ))],
            Fetch::Loaded(list) if list.is_empty() => vec![Line::from(Span::styled(
                "The creator is the only contributor so far.",
                Style::default().fg(Color::DarkGray),
            ))],
            Fetch::Loaded(list) => list
                .iter()
                .skip(self.scroll)
                .flat_map(|c| {
                    vec![
                        Line::from(vec![
                            Span::styled(
                                c.login.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                format!("  {} contribution(s)", c.contributions),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]),
                        Line::from(Span::styled(
                            c.html_url.clone(),
                            Style::default().fg(Color::DarkGray),
                        )),
                        Line::from(""),
                    ]
                })
                .collect(),
        };

        let para = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(para, area);
    }
}

/// Error line for a failed fetch; names the status when the API
/// answered at all.
fn failure_line(err: &ApiError) -> String {
    match err.status() {
        Some(status) => {
            format!("Could not load contributors (HTTP {status}). Please try again later.")
        }
        None => "Could not load contributors. Please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn contributor(login: &str) -> Contributor {
        Contributor {
            login: login.to_string(),
            avatar_url: format!("https://a/{login}"),
            html_url: format!("https://github.com/{login}"),
            contributions: 1,
        }
    }

    #[test]
    fn test_owner_excluded_from_loaded_list() {
        let mut screen = ContributorsScreen::new("Tossy06".into(), "Bolsa-De-Empleo".into());
        screen.apply_result(Ok(vec![contributor("Tossy06"), contributor("alice")]));
        match &screen.fetch {
            Fetch::Loaded(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].login, "alice");
            }
            _ => panic!("expected loaded state"),
        }
    }

    #[test]
    fn test_failure_keeps_screen_usable() {
        let mut screen = ContributorsScreen::new("Tossy06".into(), "Bolsa-De-Empleo".into());
        screen.apply_result(Err(ApiError::http("github", 403)));
        assert!(matches!(screen.fetch, Fetch::Failed(_)));

        let quit = screen.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(quit);
    }

    #[test]
    fn test_failure_line_names_status_when_answered() {
        assert!(failure_line(&ApiError::http("github", 403)).contains("HTTP 403"));
        assert!(!failure_line(&ApiError::network("github", "refused")).contains("HTTP"));
    }

    #[test]
    fn test_scroll_clamped_to_list() {
        let mut screen = ContributorsScreen::new("o".into(), "r".into());
        screen.apply_result(Ok(vec![contributor("a"), contributor("b")]));
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        for _ in 0..5 {
            screen.handle_key(down);
        }
        assert_eq!(screen.scroll, 1);

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        screen.handle_key(up);
        screen.handle_key(up);
        assert_eq!(screen.scroll, 0);
    }
}
