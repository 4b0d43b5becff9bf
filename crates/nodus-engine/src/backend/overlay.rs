use std::time::Instant;

use crate::scene::HudParams;

use super::render::Rgba8;

/// Height of the composited graph strip, in pixels.
const GRAPH_H: u32 = 24;

/// Bar color for frame-interval columns.
const BAR_COLOR: Rgba8 = Rgba8::new(64, 240, 136, 220);

/// Frame-interval measures and rasterization for one HUD node.
///
/// Keeps a ring of wall-clock intervals between consecutive draws over a
/// fixed measure window and composites them as a bar graph strip in the
/// top-left corner of the target, one column per sample, oldest to newest.
pub(crate) struct HudOverlay {
    window: usize,
    times: Vec<f64>,
    pos: usize,
    count: usize,
    last: Option<Instant>,
}

impl HudOverlay {
    pub fn new(measure_window: usize) -> Self {
        let window = measure_window.max(1);
        Self {
            window,
            times: vec![0.0; window],
            pos: 0,
            count: 0,
            last: None,
        }
    }

    /// Records the wall-clock interval since the previous frame.
    pub fn record_frame(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last.replace(now) {
            self.record((now - last).as_secs_f64());
        }
    }

    fn record(&mut self, dt: f64) {
        self.times[self.pos] = dt;
        self.pos = (self.pos + 1) % self.window;
        self.count = (self.count + 1).min(self.window);
    }

    /// Samples in chronological order, oldest first.
    fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        let start = (self.pos + self.window - self.count) % self.window;
        (0..self.count).map(move |i| self.times[(start + i) % self.window])
    }

    /// Blends the overlay strip onto `pixels` (row-major, `width * height`).
    pub fn composite(&self, params: &HudParams, pixels: &mut [Rgba8], width: u32, height: u32) {
        let graph_w = (self.window as u32).min(width);
        let graph_h = GRAPH_H.min(height);
        if graph_w == 0 || graph_h == 0 {
            return;
        }

        let [r, g, b, a] = params.bg_color;
        let bg = Rgba8::new(r, g, b, a);
        for y in 0..graph_h {
            let row = (y * width) as usize;
            for x in 0..graph_w {
                let px = &mut pixels[row + x as usize];
                *px = px.blend(bg);
            }
        }

        let peak = self.samples().fold(0.0_f64, f64::max);
        if peak <= 0.0 {
            return;
        }

        // Narrow targets show a prefix of the window rather than wrapping.
        for (x, dt) in self.samples().enumerate().take(graph_w as usize) {
            let bar = ((dt / peak) * graph_h as f64).round() as u32;
            // Columns grow upward from the strip's bottom edge.
            for y in graph_h.saturating_sub(bar)..graph_h {
                let idx = (y * width + x as u32) as usize;
                pixels[idx] = pixels[idx].blend(BAR_COLOR);
            }
        }
    }
}
