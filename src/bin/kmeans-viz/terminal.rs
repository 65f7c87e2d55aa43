use kmeans_viz::{ClusterState, Color, Palette, Renderer, Result, Error};
use std::{io::Write, time::Duration};

const SAMPLE_GLYPH: char = '•';
const CENTROID_GLYPH: char = '@';

/// Draws the session as a grid of colored glyphs on an ANSI terminal.
///
/// The frame clock is simulated: every frame reports `1 / fps` seconds. With **realtime** set, the
/// renderer also sleeps that long, so the pacing can be watched as it would play out in a window.
/// Frames identical to the previously presented one are not printed again.
pub struct TerminalRenderer<W: Write> {
    out: W,
    width: f64,
    height: f64,
    cols: usize,
    rows: usize,
    frame_time: f64,
    realtime: bool,
    frames_left: usize,
    last_frame: String,
    presented: usize,
}
impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, region: (f64, f64), grid: (usize, usize), fps: u32, realtime: bool, frames: usize) -> Self {
        Self {
            out,
            width: region.0,
            height: region.1,
            cols: grid.0.max(1),
            rows: grid.1.max(1),
            frame_time: 1.0 / f64::from(fps.max(1)),
            realtime,
            frames_left: frames,
            last_frame: String::new(),
            presented: 0,
        }
    }

    /// Amount of distinct frames written to the terminal.
    pub fn presented(&self) -> usize { self.presented }

    fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return None;
        }
        let col = (x / self.width * self.cols as f64) as usize;
        let row = (y / self.height * self.rows as f64) as usize;
        Some((col.min(self.cols - 1), row.min(self.rows - 1)))
    }

    fn compose(&self, state: &ClusterState<f64>, palette: &Palette) -> String {
        let mut grid: Vec<Option<(char, Color)>> = vec![None; self.cols * self.rows];
        for s in state.samples() {
            if let Some((c, r)) = self.cell(s.x, s.y) {
                grid[r * self.cols + c] = Some((SAMPLE_GLYPH, palette.color_for(s.cluster)));
            }
        }
        for (ci, p) in state.centroids().iter().enumerate() {
            if let Some((c, r)) = self.cell(p.x, p.y) {
                grid[r * self.cols + c] = Some((CENTROID_GLYPH, palette.color_for(Some(ci))));
            }
        }

        let mut frame = String::with_capacity(grid.len() * 4);
        for row in grid.chunks_exact(self.cols) {
            for cell in row {
                match cell {
                    Some((glyph, Color { r, g, b })) => frame.push_str(&format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, glyph)),
                    None => frame.push(' '),
                }
            }
            frame.push('\n');
        }
        frame
    }
}
impl<W: Write> Renderer<f64> for TerminalRenderer<W> {
    fn should_close(&self) -> bool { self.frames_left == 0 }

    fn frame_time(&mut self) -> f64 {
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.realtime {
            std::thread::sleep(Duration::from_secs_f64(self.frame_time));
        }
        self.frame_time
    }

    fn draw(&mut self, state: &ClusterState<f64>, palette: &Palette) -> Result<()> {
        let frame = self.compose(state, palette);
        if frame == self.last_frame {
            return Ok(());
        }
        // clear screen, cursor home
        write!(self.out, "\x1b[2J\x1b[H{}", frame)
            .and_then(|_| self.out.flush())
            .map_err(|e| Error::Render(e.to_string()))?;
        self.last_frame = frame;
        self.presented += 1;
        Ok(())
    }
}
