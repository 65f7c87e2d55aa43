use crate::{api::{ClusterState, Session}, error::Result, memory::*};
use tracing::debug;

/// An RGB display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    pub const RED: Color = Color::rgb(230, 41, 55);
    pub const GREEN: Color = Color::rgb(0, 228, 48);
    pub const YELLOW: Color = Color::rgb(253, 249, 0);
    pub const PINK: Color = Color::rgb(255, 109, 194);

    /// Fully saturated color with the given hue (in degrees).
    fn from_hue(hue: f64) -> Self {
        let h = (hue.rem_euclid(360.0)) / 60.0;
        let x = 1.0 - (h % 2.0 - 1.0).abs();
        let (r, g, b) = match h as u32 {
            0 => (1.0, x, 0.0),
            1 => (x, 1.0, 0.0),
            2 => (0.0, 1.0, x),
            3 => (0.0, x, 1.0),
            4 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        let to_u8 = |v: f64| (v * 255.0).round() as u8;
        Color::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Maps cluster indices to display colors.
///
/// The first clusters use a fixed list of colors (red, green, yellow by default). Indices beyond that
/// list get a generated hue, stepped by the golden angle so neighbouring indices stay distinguishable.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub clusters: Vec<Color>,
    pub unassigned: Color,
}
impl Default for Palette {
    fn default() -> Self {
        Self {
            clusters: vec![Color::RED, Color::GREEN, Color::YELLOW],
            unassigned: Color::PINK,
        }
    }
}
impl Palette {
    const GOLDEN_ANGLE: f64 = 137.507_764;

    pub fn color_for(&self, cluster: Option<usize>) -> Color {
        match cluster {
            None => self.unassigned,
            Some(ci) => match self.clusters.get(ci) {
                Some(&c) => c,
                None => Color::from_hue(ci as f64 * Self::GOLDEN_ANGLE),
            },
        }
    }
}


/// The frame-loop collaborator that presents the state of a [`Session`].
pub trait Renderer<T: Primitive> {
    /// Whether the frame loop should end.
    fn should_close(&self) -> bool;
    /// Time passed since the previous frame.
    fn frame_time(&mut self) -> T;
    /// Present one frame showing **state**.
    fn draw(&mut self, state: &ClusterState<T>, palette: &Palette) -> Result<()>;
}

/// Drive **session** from **renderer** until the renderer asks to close.
/// Every frame takes the frame time, draws the current state, then feeds the time into the session.
///
/// ## Returns
/// The amount of frames presented.
pub fn run<T: Primitive, R: Renderer<T> + ?Sized>(session: &mut Session<'_, T>, renderer: &mut R, palette: &Palette) -> Result<usize> {
    let mut frames = 0;
    while !renderer.should_close() {
        let dt = renderer.frame_time();
        renderer.draw(session.state(), palette)?;
        let tick = session.tick(dt);
        if tick.ends_run() {
            debug!(frame = frames, ?tick, "convergence run ended");
        }
        frames += 1;
    }
    Ok(frames)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{helpers::testing::rng, Point, SessionConfig, Error};

    struct RecordingRenderer {
        frames_left: usize,
        dt: f64,
        drawn: Vec<Vec<Point<f64>>>,
        fail_at: Option<usize>,
    }
    impl Renderer<f64> for RecordingRenderer {
        fn should_close(&self) -> bool { self.frames_left == 0 }
        fn frame_time(&mut self) -> f64 { self.frames_left -= 1; self.dt }
        fn draw(&mut self, state: &ClusterState<f64>, palette: &Palette) -> Result<()> {
            if self.fail_at == Some(self.drawn.len()) {
                return Err(Error::Render("display lost".into()));
            }
            state.samples().iter().for_each(|s| { palette.color_for(s.cluster); });
            self.drawn.push(state.centroids().to_vec());
            Ok(())
        }
    }

    fn session<'a>() -> Session<'a, f64> {
        let mut session = Session::new(SessionConfig::build().random_generator(rng()).build()).unwrap();
        session.seed_reference_clusters().unwrap();
        session
    }

    #[test]
    fn reference_palette() {
        let p = Palette::default();
        assert_eq!(p.color_for(None), Color::PINK);
        assert_eq!(p.color_for(Some(0)), Color::RED);
        assert_eq!(p.color_for(Some(1)), Color::GREEN);
        assert_eq!(p.color_for(Some(2)), Color::YELLOW);
    }

    #[test]
    fn generated_colors_beyond_palette() {
        let p = Palette::default();
        let extra: Vec<Color> = (3..10).map(|i| p.color_for(Some(i))).collect();
        for (i, c) in extra.iter().enumerate() {
            assert_eq!(*c, p.color_for(Some(i + 3)), "generated colors must be stable");
            assert_ne!(*c, extra[(i + 1) % extra.len()]);
        }
    }

    #[test]
    fn hue_wheel() {
        assert_eq!(Color::from_hue(0.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hue(120.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hue(240.0), Color::rgb(0, 0, 255));
        assert_eq!(Color::from_hue(360.0 + 60.0), Color::rgb(255, 255, 0));
    }

    #[test]
    fn frame_loop_draws_before_ticking() {
        let mut session = session();
        let initial = session.centroids().to_vec();
        let mut renderer = RecordingRenderer { frames_left: 180, dt: 1.0 / 60.0, drawn: Vec::new(), fail_at: None };

        let frames = run(&mut session, &mut renderer, &Palette::default()).unwrap();
        assert_eq!(frames, 180);
        assert_eq!(renderer.drawn.len(), 180);
        // nothing moves before the first pacing period passed
        assert!(renderer.drawn[..59].iter().all(|c| *c == initial));
        assert!(session.samples().iter().all(|s| s.cluster.is_some()));
        assert_ne!(session.centroids(), &initial[..]);
    }

    #[test]
    fn renderer_errors_abort_the_loop() {
        let mut session = session();
        let mut renderer = RecordingRenderer { frames_left: 10, dt: 0.1, drawn: Vec::new(), fail_at: Some(3) };
        assert!(matches!(run(&mut session, &mut renderer, &Palette::default()), Err(Error::Render(_))));
        assert_eq!(renderer.drawn.len(), 3);
    }
}
