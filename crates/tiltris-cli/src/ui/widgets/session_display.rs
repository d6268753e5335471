use std::path::Path;

use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use tiltris_engine::{SessionController, SessionState};

use crate::ui::widgets::{BoardDisplay, SessionStatsDisplay, color, style};

#[derive(Debug)]
pub struct SessionDisplay<'a> {
    controller: &'a SessionController,
    socket: &'a Path,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(controller: &'a SessionController, socket: &'a Path) -> Self {
        Self {
            controller,
            socket,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_style(&self) -> Style {
        let color = match self.controller.session().state() {
            SessionState::Idle => color::YELLOW,
            SessionState::Playing => color::WHITE,
            SessionState::GameOver => color::RED,
        };
        Style::new().fg(color)
    }

    fn board_display(&self) -> BoardDisplay<'a> {
        let session = self.controller.session();
        let widget = BoardDisplay::new(session.board()).block(
            Block::bordered()
                .border_style(self.border_style())
                .style(style::DEFAULT),
        );
        // The piece only exists on screen while a game is running.
        if session.state().is_playing() {
            widget.falling_piece(session.falling_piece())
        } else {
            widget
        }
    }

    fn stats_display(&self) -> SessionStatsDisplay<'a> {
        let socket = self
            .socket
            .file_name()
            .map_or_else(|| self.socket.display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            });
        SessionStatsDisplay::new(self.controller).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .title_bottom(Line::from(socket).centered())
                .padding(Padding::symmetric(
                    self.horizontal_padding,
                    self.vertical_padding,
                ))
                .border_style(self.border_style())
                .style(style::DEFAULT),
        )
    }

    pub fn height(&self) -> u16 {
        u16::max(self.board_display().height(), self.stats_display().height())
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board_display();
        let session_stats = self.stats_display();

        let [board_column, stats_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(session_stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(board_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(stats_column);

        let game_board_width = game_board.width();
        game_board.render(board_area, buf);
        session_stats.render(stats_area, buf);

        let popup = match self.controller.session().state() {
            SessionState::Playing => None,
            SessionState::Idle => Some((
                "PRESS ENTER",
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
