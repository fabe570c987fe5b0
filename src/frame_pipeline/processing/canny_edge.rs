//! Canny edge detection on GRAYSCALE frames.
//!
//! Every step runs sequentially in raster order over fixed-size buffers: integer Gaussian
//! smoothing, integer Sobel gradients, `f32` magnitudes from a single `sqrt` per pixel,
//! non-maximum suppression and stack-based hysteresis. Identical input therefore yields
//! byte-identical output.

use crate::frame_pipeline::common::error::{ProcessingError, ProcessingResult, StageFailure};
use crate::frame_pipeline::frame::{Frame, PixelFormat};
use crate::frame_pipeline::processing::FrameProcessor;
use crate::frame_pipeline::processing::processor::{output_frame, require_format};

const STAGE_NAME: &str = "canny_edge";

const EDGE: u8 = u8::MAX;

/// 5x5 Gaussian, sigma ~1.4.
const GAUSSIAN: [[u32; 5]; 5] = [
    [2, 4, 5, 4, 2],
    [4, 9, 12, 9, 4],
    [5, 12, 15, 12, 5],
    [4, 9, 12, 9, 4],
    [2, 4, 5, 4, 2],
];
const GAUSSIAN_SUM: u32 = 159;

/// tan(22.5deg) and tan(67.5deg) scaled by 1000 for integer direction binning.
const TAN_22_5_X1000: i64 = 414;
const TAN_67_5_X1000: i64 = 2414;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

#[derive(Debug, Clone)]
pub struct CannyEdgeProcessor {
    low: f32,
    high: f32,
}

impl CannyEdgeProcessor {
    /// Gradient magnitudes at or above `high` seed edges; those at or above `low` extend them.
    pub fn new(low: f32, high: f32) -> ProcessingResult<Self> {
        let invalid =
            |reason: String| ProcessingError::new(STAGE_NAME, StageFailure::InvalidParameters(reason));
        if !low.is_finite() || !high.is_finite() {
            return Err(invalid(format!("thresholds must be finite (low={low}, high={high})")));
        }
        if low < 0.0 {
            return Err(invalid(format!("low threshold {low} is negative")));
        }
        if low > high {
            return Err(invalid(format!("low threshold {low} exceeds high threshold {high}")));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }
}

impl FrameProcessor for CannyEdgeProcessor {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    fn process(&self, frame: &Frame) -> ProcessingResult<Frame> {
        require_format(STAGE_NAME, frame, &[PixelFormat::Grayscale])?;

        let width = frame.width();
        let height = frame.height();

        let smoothed = gaussian_blur(frame.data(), width, height);
        let (magnitude, direction) = sobel(&smoothed, width, height);
        let thinned = non_max_suppression(&magnitude, &direction, width, height);
        let edges = hysteresis(&thinned, width, height, self.low, self.high);

        output_frame(STAGE_NAME, frame, PixelFormat::Grayscale, edges)
    }
}

#[inline]
fn clamp_index(v: isize, len: usize) -> usize {
    v.clamp(0, len as isize - 1) as usize
}

fn gaussian_blur(src: &[u8], width: usize, height: usize) -> Vec<i32> {
    let mut out = vec![0i32; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u32;
            for (ky, row) in GAUSSIAN.iter().enumerate() {
                let sy = clamp_index(y as isize + ky as isize - 2, height);
                for (kx, &weight) in row.iter().enumerate() {
                    let sx = clamp_index(x as isize + kx as isize - 2, width);
                    acc += weight * src[sy * width + sx] as u32;
                }
            }
            out[y * width + x] = ((acc + GAUSSIAN_SUM / 2) / GAUSSIAN_SUM) as i32;
        }
    }
    out
}

fn sobel(src: &[i32], width: usize, height: usize) -> (Vec<f32>, Vec<Direction>) {
    let mut magnitude = vec![0f32; width * height];
    let mut direction = vec![Direction::Horizontal; width * height];

    let at = |x: isize, y: isize| src[clamp_index(y, height) * width + clamp_index(x, width)];

    for y in 0..height as isize {
        for x in 0..width as isize {
            let gx = (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1));
            let gy = (at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x, y - 1) + at(x + 1, y - 1));

            let idx = y as usize * width + x as usize;
            let squared = (gx as i64 * gx as i64 + gy as i64 * gy as i64) as f32;
            magnitude[idx] = squared.sqrt();
            direction[idx] = bin_direction(gx as i64, gy as i64);
        }
    }

    (magnitude, direction)
}

fn bin_direction(gx: i64, gy: i64) -> Direction {
    let ax = gx.abs();
    let ay = gy.abs();
    if ay * 1000 <= ax * TAN_22_5_X1000 {
        Direction::Horizontal
    } else if ay * 1000 >= ax * TAN_67_5_X1000 {
        Direction::Vertical
    } else if (gx > 0) == (gy > 0) {
        // Image rows grow downwards, so equal signs point along the main diagonal.
        Direction::Diagonal
    } else {
        Direction::AntiDiagonal
    }
}

fn non_max_suppression(
    magnitude: &[f32],
    direction: &[Direction],
    width: usize,
    height: usize,
) -> Vec<f32> {
    let mut out = vec![0f32; width * height];

    let at = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0.0
        } else {
            magnitude[y as usize * width + x as usize]
        }
    };

    for y in 0..height as isize {
        for x in 0..width as isize {
            let idx = y as usize * width + x as usize;
            let m = magnitude[idx];
            if m == 0.0 {
                continue;
            }
            // Neighbours along the gradient, not along the edge.
            let (a, b) = match direction[idx] {
                Direction::Horizontal => (at(x - 1, y), at(x + 1, y)),
                Direction::Vertical => (at(x, y - 1), at(x, y + 1)),
                Direction::Diagonal => (at(x - 1, y - 1), at(x + 1, y + 1)),
                Direction::AntiDiagonal => (at(x + 1, y - 1), at(x - 1, y + 1)),
            };
            if m >= a && m >= b {
                out[idx] = m;
            }
        }
    }

    out
}

fn hysteresis(thinned: &[f32], width: usize, height: usize, low: f32, high: f32) -> Vec<u8> {
    let mut out = vec![0u8; width * height];
    let mut stack = Vec::new();

    for (idx, &m) in thinned.iter().enumerate() {
        if m > 0.0 && m >= high {
            out[idx] = EDGE;
            stack.push(idx);
        }
    }

    while let Some(idx) = stack.pop() {
        let x = (idx % width) as isize;
        let y = (idx / width) as isize;
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let n = ny as usize * width + nx as usize;
                if out[n] == 0 && thinned[n] > 0.0 && thinned[n] >= low {
                    out[n] = EDGE;
                    stack.push(n);
                }
            }
        }
    }

    out
}
