use ratatui::Frame;

use crate::{
    app::App,
    session::{Clock, SessionState},
    ui::{render_challenge, render_complete, render_idle, render_intro},
};

/// A UI Screen boundary: renders one session state
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, f: &mut Frame);
}

pub struct IdleScreen;

impl<C: Clock> Screen<C> for IdleScreen {
    fn render(&self, _app: &App<C>, f: &mut Frame) {
        let area = f.area();
        render_idle(area, f.buffer_mut());
    }
}

pub struct IntroScreen;

impl<C: Clock> Screen<C> for IntroScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        let area = f.area();
        render_intro(app, area, f.buffer_mut());
    }
}

/// Active challenge, and its result once decided
pub struct ChallengeScreen;

impl<C: Clock> Screen<C> for ChallengeScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        let area = f.area();
        render_challenge(app, area, f.buffer_mut());
    }
}

pub struct CompleteScreen;

impl<C: Clock> Screen<C> for CompleteScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        let area = f.area();
        render_complete(app, area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<C: Clock + 'static>(state: SessionState) -> Box<dyn Screen<C>> {
    match state {
        SessionState::Idle => Box::new(IdleScreen),
        SessionState::Intro => Box::new(IntroScreen),
        SessionState::Active | SessionState::Result => Box::new(ChallengeScreen),
        SessionState::Complete => Box::new(CompleteScreen),
    }
}
