use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tiltris_engine::SessionController;

use crate::ui::widgets::style;

pub struct SessionStatsDisplay<'a> {
    controller: &'a SessionController,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(controller: &'a SessionController) -> Self {
        Self {
            controller,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&SessionController) -> String),
    LabelValue(&'static str, &'static dyn Fn(&SessionController) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|c| c.session().stats().score().to_string()),
    Row::Empty,
    Row::LabelValue("LINES:", &|c| c.session().stats().cleared_lines().to_string()),
    Row::LabelValue("PIECES:", &|c| {
        c.session().stats().completed_pieces().to_string()
    }),
    Row::LabelValue("SPAWN:", &|c| c.session().spawner().policy().to_string()),
    Row::Empty,
    Row::LabelValue("PEER:", &|c| {
        if c.peer().is_connected() {
            "online".to_owned()
        } else {
            "offline".to_owned()
        }
    }),
    Row::LabelValue("FRAMES:", &|c| c.peer().frames_received().to_string()),
    Row::FullLabel("TILT:"),
    Row::FullValue(&|c| c.gesture().last_label().as_str().to_owned()),
    Row::LabelValue("VOICE:", &|c| {
        if c.voice().is_open(c.now()) {
            "ready".to_owned()
        } else {
            "cooldown".to_owned()
        }
    }),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.controller), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.controller), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
