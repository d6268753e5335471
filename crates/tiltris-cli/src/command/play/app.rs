use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tiltris_engine::{Action, Command, GameConfig, SessionController, SessionSnapshot, SessionState};
use tiltris_runtime::{App, RenderMode, Runtime};

use crate::ui::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay};

const TICK_RATE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyInput {
    Command(Command),
    Quit,
}

fn key_input(code: KeyCode) -> Option<KeyInput> {
    let command = match code {
        KeyCode::Left => Action::MoveLeft.into(),
        KeyCode::Right => Action::MoveRight.into(),
        KeyCode::Up => Action::Rotate.into(),
        KeyCode::Down => Action::Drop.into(),
        KeyCode::Enter => Command::Start,
        KeyCode::Char('r') => Command::Reset,
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyInput::Quit),
        _ => return None,
    };
    Some(KeyInput::Command(command))
}

#[derive(Debug)]
pub struct PlayApp {
    controller: SessionController,
    origin: Instant,
    socket: PathBuf,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(config: &GameConfig, socket: &Path) -> Self {
        Self {
            controller: SessionController::new(config),
            origin: Instant::now(),
            socket: socket.to_owned(),
            is_exiting: false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.controller.snapshot()
    }

    fn key_bindings(&self) -> &'static [KeyBinding<'static>] {
        match self.controller.session().state() {
            SessionState::Idle => &[(&["Enter"], "Start"), (&["Q"], "Quit")],
            SessionState::Playing => &[
                (&["←", "→"], "Move"),
                (&["↑"], "Rotate"),
                (&["↓"], "Drop"),
                (&["R"], "Reset"),
                (&["Q"], "Quit"),
            ],
            SessionState::GameOver => &[(&["Enter", "R"], "Play Again"), (&["Q"], "Quit")],
        }
    }
}

impl App for PlayApp {
    type Message = Command;

    fn init(&mut self, runtime: &mut Runtime<Command>) {
        runtime.set_tick_rate(Some(TICK_RATE));
        runtime.set_render_mode(RenderMode::throttled_from_rate(TICK_RATE));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime<Command>, event: Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        if event.kind != KeyEventKind::Press {
            return;
        }
        match key_input(event.code) {
            Some(KeyInput::Command(command)) => self.controller.push(command),
            Some(KeyInput::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn handle_message(&mut self, _runtime: &mut Runtime<Command>, message: Command) {
        self.controller.push(message);
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.controller, &self.socket);
        let help = KeyBindingDisplay::new(self.key_bindings());

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime<Command>) {
        self.controller.tick(self.origin.elapsed());
    }
}
