//! Rendering collaborator seam for the particle life simulation.
//!
//! The core never depends on a concrete presentation mechanism; the driving
//! loop talks to a [`Renderer`], which supplies the per-frame `dt` and
//! consumes position/type snapshots. [`ConsoleRenderer`] prints to any
//! writer, and [`NullRenderer`] is the no-display test double.

use particle_life_core::Vec2;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render output failed: {0}")]
    Io(#[from] io::Error),
}

/// Capability interface between the driving loop and the presentation side.
pub trait Renderer {
    /// Pace to the target frame rate and return the elapsed frame time in
    /// seconds. Called once per loop iteration, before stepping.
    fn tick(&mut self, target_fps: u32) -> f32;

    /// Draw the current population snapshot. `fps` is a measured
    /// frames-per-second figure for display, when one is available.
    fn render(
        &mut self,
        positions: &[Vec2],
        types: &[usize],
        fps: Option<f32>,
    ) -> Result<(), RenderError>;
}

/// Prints the first few particles of every frame to a writer.
///
/// Useful for headless runs and debugging without any GUI.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    limit: usize,
    step: u64,
    last_tick: Option<Instant>,
}

impl ConsoleRenderer<io::Stdout> {
    /// Console renderer writing to standard output.
    pub fn stdout(limit: usize) -> Self {
        ConsoleRenderer::new(io::stdout(), limit)
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, limit: usize) -> Self {
        Self {
            out,
            limit,
            step: 0,
            last_tick: None,
        }
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn tick(&mut self, target_fps: u32) -> f32 {
        let frame_budget = Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)));
        let dt = match self.last_tick {
            Some(prev) => {
                let elapsed = prev.elapsed();
                if elapsed < frame_budget {
                    spin_sleep::sleep(frame_budget - elapsed);
                }
                prev.elapsed()
            }
            // First frame has no history; report one nominal frame.
            None => frame_budget,
        };
        self.last_tick = Some(Instant::now());
        dt.as_secs_f32()
    }

    fn render(
        &mut self,
        positions: &[Vec2],
        types: &[usize],
        fps: Option<f32>,
    ) -> Result<(), RenderError> {
        let shown = self.limit.min(positions.len());
        match fps {
            Some(fps) => writeln!(
                self.out,
                "step {} ({fps:.1} fps) - showing first {shown} of {} particles:",
                self.step,
                positions.len()
            )?,
            None => writeln!(
                self.out,
                "step {} - showing first {shown} of {} particles:",
                self.step,
                positions.len()
            )?,
        }
        for (i, (pos, kind)) in positions.iter().zip(types).take(shown).enumerate() {
            writeln!(
                self.out,
                "  [{i}] type={kind}, pos=({:.2}, {:.2})",
                pos.x, pos.y
            )?;
        }
        self.out.flush()?;
        self.step += 1;
        Ok(())
    }
}

/// Renderer that draws nothing and reports a fixed `dt`.
///
/// Lets tests and benchmarks drive the loop deterministically without
/// pacing or output.
pub struct NullRenderer {
    pub dt: f32,
    pub render_calls: u64,
}

impl NullRenderer {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            render_calls: 0,
        }
    }
}

impl Renderer for NullRenderer {
    fn tick(&mut self, _target_fps: u32) -> f32 {
        self.dt
    }

    fn render(
        &mut self,
        _positions: &[Vec2],
        _types: &[usize],
        _fps: Option<f32>,
    ) -> Result<(), RenderError> {
        self.render_calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_renderer_prints_limited_particles() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), 2);
        let positions = vec![
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(30.0, 30.0),
        ];
        let types = vec![0, 1, 2];
        renderer.render(&positions, &types, None).unwrap();

        let output = String::from_utf8(renderer.out.clone()).unwrap();
        assert!(output.contains("step 0"));
        assert!(output.contains("[0] type=0, pos=(10.00, 10.00)"));
        assert!(output.contains("[1] type=1"));
        // Third particle is beyond the limit.
        assert!(!output.contains("[2]"));
    }

    #[test]
    fn console_renderer_counts_steps_and_shows_fps() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), 1);
        renderer.render(&[], &[], Some(59.7)).unwrap();
        renderer.render(&[], &[], Some(60.2)).unwrap();
        let output = String::from_utf8(renderer.out.clone()).unwrap();
        assert!(output.contains("step 0 (59.7 fps)"));
        assert!(output.contains("step 1 (60.2 fps)"));
    }

    #[test]
    fn first_tick_reports_the_nominal_frame() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), 1);
        let dt = renderer.tick(50);
        assert!((dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn null_renderer_is_a_fixed_clock() {
        let mut renderer = NullRenderer::new(0.1);
        assert_eq!(renderer.tick(60), 0.1);
        renderer.render(&[], &[], None).unwrap();
        renderer.render(&[], &[], None).unwrap();
        assert_eq!(renderer.render_calls, 2);
    }
}
