//! Front-end state: the session plus cursor, mouse drag and feedback.

use std::io::{self, Write};

use rand::Rng;

use pathviz_core::{Endpoint, Pos, Status};
use pathviz_playback::{PlaybackState, Scheduler, Session, SessionError, Tick};

use crate::input::{Action, Gesture};
use crate::render::{self, Overlay};

/// Density change per `[` or `]`.
const DENSITY_NOTCH: u8 = 5;

/// What a held left button is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    /// Painting (`true`) or erasing walls.
    Walls(bool),
    Endpoint(Endpoint),
}

pub struct App<S: Scheduler, R: Rng> {
    session: Session<S>,
    rng: R,
    cursor: Pos,
    drag: Option<Drag>,
    note: Option<String>,
    quit: bool,
}

impl<S: Scheduler, R: Rng> App<S, R> {
    pub fn new(session: Session<S>, rng: R) -> Self {
        let cursor = session.grid().start();
        Self {
            session,
            rng,
            cursor,
            drag: None,
            note: None,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Forward a scheduler tick. Returns whether the frame changed.
    pub fn tick(&mut self, tick: Tick) -> bool {
        self.session.tick(tick)
    }

    pub fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        let overlay = Overlay {
            algorithm: self.session.algorithm(),
            wall_density: self.session.wall_density(),
            cursor: self.cursor,
            note: self.note.as_deref(),
        };
        render::draw(out, &self.session.view(), &overlay)
    }

    pub fn generate_walls(&mut self) {
        let result = self.session.generate_walls(&mut self.rng).map(drop);
        self.report(result);
    }

    /// Carry out a key action.
    pub fn apply(&mut self, action: Action) {
        self.note = None;
        let result = match action {
            Action::ToggleRun => {
                if self.session.state() == PlaybackState::Running {
                    self.session.pause();
                    Ok(())
                } else {
                    self.session.start().map(drop)
                }
            }
            Action::Step => self.session.step().map(drop),
            Action::FastForward => self.session.fast_forward(),
            Action::JumpToEnd => self.session.jump_to_end().map(drop),
            Action::Reset => {
                self.session.reset();
                Ok(())
            }
            Action::Clear => self.session.clear(),
            Action::GenerateWalls => {
                self.generate_walls();
                Ok(())
            }
            Action::Select(algorithm) => self.session.set_algorithm(algorithm),
            Action::Faster => {
                self.session.set_speed(self.session.speed().faster());
                Ok(())
            }
            Action::Slower => {
                self.session.set_speed(self.session.speed().slower());
                Ok(())
            }
            Action::DenserWalls => {
                let d = self.session.wall_density().saturating_add(DENSITY_NOTCH);
                self.session.set_wall_density(d);
                Ok(())
            }
            Action::SparserWalls => {
                let d = self.session.wall_density().saturating_sub(DENSITY_NOTCH);
                self.session.set_wall_density(d);
                Ok(())
            }
            Action::Cursor(drow, dcol) => {
                self.move_cursor(drow, dcol);
                Ok(())
            }
            Action::ToggleWall => self.session.toggle_wall(self.cursor).map(drop),
            Action::PlaceStart => self.session.move_endpoint(Endpoint::Start, self.cursor),
            Action::PlaceEnd => self.session.move_endpoint(Endpoint::End, self.cursor),
            Action::Quit => {
                self.quit = true;
                Ok(())
            }
        };
        self.report(result);
    }

    /// Handle a mouse gesture at terminal position (`x`, `y`). Returns
    /// whether the frame changed.
    pub fn mouse(&mut self, gesture: Gesture, x: u16, y: u16) -> bool {
        if gesture == Gesture::Release {
            self.drag = None;
            return false;
        }
        let grid = self.session.grid();
        let Some(p) = render::cell_at(x, y, grid.rows(), grid.cols()) else {
            return false;
        };
        self.cursor = p;
        match (gesture, self.drag) {
            (Gesture::Press, _) => self.press(p),
            (Gesture::Drag, Some(Drag::Walls(wall))) => {
                // Dragging across endpoints or while running is a no-op.
                let _ = self.session.set_wall(p, wall);
            }
            (Gesture::Drag, Some(Drag::Endpoint(which))) => {
                let _ = self.session.move_endpoint(which, p);
            }
            _ => {}
        }
        true
    }

    fn press(&mut self, p: Pos) {
        self.note = None;
        let drag = match self.session.grid().status(p) {
            Some(Status::Start) => Ok(Drag::Endpoint(Endpoint::Start)),
            Some(Status::End) => Ok(Drag::Endpoint(Endpoint::End)),
            _ => self
                .session
                .toggle_wall(p)
                .map(|status| Drag::Walls(status == Status::Wall)),
        };
        match drag {
            Ok(drag) => self.drag = Some(drag),
            Err(e) => self.report(Err(e)),
        }
    }

    fn move_cursor(&mut self, drow: i32, dcol: i32) {
        let grid = self.session.grid();
        let p = self.cursor.shift(drow, dcol);
        if grid.contains(p) {
            self.cursor = p;
        }
    }

    fn report(&mut self, result: Result<(), SessionError>) {
        if let Err(e) = result {
            log::debug!("refused: {e}");
            self.note = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use pathviz_playback::{ManualScheduler, SessionConfig};
    use pathviz_search::AlgorithmId;

    use super::*;
    use crate::render::{ORIGIN_X, ORIGIN_Y};

    fn app() -> App<ManualScheduler, SmallRng> {
        let config = SessionConfig {
            rows: 6,
            cols: 6,
            start: Pos::new(0, 0),
            end: Pos::new(5, 5),
            ..SessionConfig::default()
        };
        let session = Session::new(config, ManualScheduler::new()).unwrap();
        App::new(session, SmallRng::seed_from_u64(3))
    }

    /// Terminal position of the left half of cell `p`.
    fn screen(p: Pos) -> (u16, u16) {
        (ORIGIN_X + 2 * p.col as u16, ORIGIN_Y + p.row as u16)
    }

    #[test]
    fn cursor_edits() {
        let mut a = app();
        a.apply(Action::Cursor(1, 0));
        a.apply(Action::ToggleWall);
        assert_eq!(a.session.grid().status(Pos::new(1, 0)), Some(Status::Wall));
        a.apply(Action::Cursor(0, 1));
        a.apply(Action::PlaceEnd);
        assert_eq!(a.session.grid().end(), Pos::new(1, 1));
        // The cursor stays on the grid.
        a.apply(Action::Cursor(-5, -5));
        assert_eq!(a.cursor, Pos::new(1, 1));
    }

    #[test]
    fn refused_edits_leave_a_note() {
        let mut a = app();
        a.apply(Action::ToggleWall);
        assert!(a.note.is_some());
        a.apply(Action::Cursor(0, 1));
        assert!(a.note.is_none());

        a.apply(Action::ToggleRun);
        assert_eq!(a.session.state(), PlaybackState::Running);
        a.apply(Action::Select(AlgorithmId::Dfs));
        assert_eq!(a.note.as_deref(), Some(SessionError::Busy.to_string().as_str()));
        a.apply(Action::ToggleRun);
        assert_eq!(a.session.state(), PlaybackState::Paused);
    }

    #[test]
    fn mouse_paints_and_erases_walls() {
        let mut a = app();
        let (x, y) = screen(Pos::new(2, 1));
        assert!(a.mouse(Gesture::Press, x, y));
        let (x, y) = screen(Pos::new(2, 2));
        a.mouse(Gesture::Drag, x + 1, y);
        a.mouse(Gesture::Release, x, y);
        assert_eq!(a.session.grid().count(Status::Wall), 2);

        // Pressing a wall erases along the drag.
        let (x, y) = screen(Pos::new(2, 1));
        a.mouse(Gesture::Press, x, y);
        let (x, y) = screen(Pos::new(2, 2));
        a.mouse(Gesture::Drag, x, y);
        assert_eq!(a.session.grid().count(Status::Wall), 0);
    }

    #[test]
    fn mouse_drags_endpoints() {
        let mut a = app();
        let (x, y) = screen(Pos::new(0, 0));
        a.mouse(Gesture::Press, x, y);
        let (x, y) = screen(Pos::new(3, 2));
        a.mouse(Gesture::Drag, x, y);
        assert_eq!(a.session.grid().start(), Pos::new(3, 2));
        assert_eq!(a.session.grid().count(Status::Wall), 0);
    }

    #[test]
    fn density_and_speed_keys() {
        let mut a = app();
        a.apply(Action::DenserWalls);
        assert_eq!(a.session.wall_density(), 25);
        a.apply(Action::Faster);
        assert_eq!(a.session.speed().get(), 75);
        a.apply(Action::GenerateWalls);
        assert!(a.note.is_none());
    }

    #[test]
    fn draws_without_error() {
        let mut a = app();
        a.apply(Action::JumpToEnd);
        let mut buf = Vec::new();
        a.draw(&mut buf).unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("Breadth-First Search"));
        assert!(text.contains("Found shortest path"));
    }
}
