//! Pure frame effects: dissolves, pixel slides, and dot fades.
//!
//! Nothing here touches a display. Callers render the returned frames with
//! whatever pacing they like.

use crate::core::{Grid, SimpleRng};
use crate::led::PixelFrame;
use crate::types::{Direction, MATRIX_SIZE, TILE_EMPTY};

/// Frames of a dissolve from `from` to `to`, ending exactly at `to`.
///
/// Frame `k` (1-based) has opacity `k / steps`. Zero steps yields no frames.
pub fn fade_frames(from: &PixelFrame, to: &PixelFrame, steps: u32) -> Vec<PixelFrame> {
    (1..=steps)
        .map(|step| from.blend(to, step as f32 / steps as f32))
        .collect()
}

/// Move every pixel that has a dark pixel in front of it one step toward
/// the leading edge of `direction`.
///
/// Each line is scanned once from the leading edge; a dark pixel swaps with
/// the one behind it, so a gap travels all the way back in one pass while
/// lit pixels advance by one. Returns `None` once nothing can move.
pub fn slide_step(frame: &PixelFrame, direction: Direction) -> Option<PixelFrame> {
    let mut next = *frame;
    for line in 0..MATRIX_SIZE {
        for pos in 0..MATRIX_SIZE - 1 {
            let here = direction.canonical_cell(MATRIX_SIZE, line, pos);
            let behind = direction.canonical_cell(MATRIX_SIZE, line, pos + 1);
            if next.get(here.0, here.1).is_black() {
                next.swap(here, behind);
            }
        }
    }
    (next != *frame).then_some(next)
}

/// All frames of a slide animation, stopping when pixels settle.
pub fn slide_frames(frame: &PixelFrame, direction: Direction) -> Vec<PixelFrame> {
    let mut frames = Vec::new();
    let mut current = *frame;
    while let Some(next) = slide_step(&current, direction) {
        frames.push(next);
        current = next;
    }
    frames
}

/// Tiles that are the same in both grids; changed cells become empty.
///
/// Used to fade out merged tiles before fading the new ones in.
pub fn unchanged_tiles(old: &Grid, new: &Grid) -> Grid {
    let mut kept = old.clone();
    let n = old.size();
    for row in 0..n {
        for col in 0..n {
            if old.get(row, col) != new.get(row, col) {
                kept.set(row, col, TILE_EMPTY);
            }
        }
    }
    kept
}

/// Every pixel coordinate in a shuffled order.
pub fn dot_order(rng: &mut SimpleRng) -> Vec<(usize, usize)> {
    let mut coords: Vec<(usize, usize)> = (0..MATRIX_SIZE * MATRIX_SIZE)
        .map(|i| (i / MATRIX_SIZE, i % MATRIX_SIZE))
        .collect();
    rng.shuffle(&mut coords);
    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::Rgb;

    fn frame_with(pixels: &[(usize, usize)]) -> PixelFrame {
        let mut frame = PixelFrame::blank();
        for &(row, col) in pixels {
            frame.set(row, col, Rgb::WHITE);
        }
        frame
    }

    #[test]
    fn test_fade_frames_end_at_target() {
        let from = PixelFrame::blank();
        let to = PixelFrame::filled(Rgb::new(200, 100, 0));
        let frames = fade_frames(&from, &to, 8);
        assert_eq!(frames.len(), 8);
        assert_eq!(frames[0].get(0, 0), Rgb::new(25, 13, 0));
        assert_eq!(frames[7], to);
        assert!(fade_frames(&from, &to, 0).is_empty());
    }

    #[test]
    fn test_slide_step_moves_pixels_one_step() {
        let frame = frame_with(&[(0, 3), (0, 5)]);
        let next = slide_step(&frame, Direction::Left).unwrap();
        assert_eq!(next, frame_with(&[(0, 2), (0, 4)]));
    }

    #[test]
    fn test_slide_frames_settle_at_leading_edge() {
        let frame = frame_with(&[(7, 2), (4, 2)]);
        let frames = slide_frames(&frame, Direction::Up);
        assert_eq!(frames.last().copied(), Some(frame_with(&[(0, 2), (1, 2)])));
        assert!(slide_step(&frame_with(&[(0, 0)]), Direction::Up).is_none());
    }

    #[test]
    fn test_slide_down_and_right() {
        let frame = frame_with(&[(0, 0)]);
        assert_eq!(
            slide_frames(&frame, Direction::Down).last().copied(),
            Some(frame_with(&[(7, 0)]))
        );
        assert_eq!(
            slide_frames(&frame, Direction::Right).last().copied(),
            Some(frame_with(&[(0, 7)]))
        );
    }

    #[test]
    fn test_unchanged_tiles_clears_merged_cells() {
        let old = Grid::from_rows(&[[2, 2], [4, 0]]).unwrap();
        let new = Grid::from_rows(&[[4, 0], [4, 0]]).unwrap();
        assert_eq!(
            unchanged_tiles(&old, &new),
            Grid::from_rows(&[[0, 0], [4, 0]]).unwrap()
        );
    }

    #[test]
    fn test_dot_order_is_a_permutation() {
        let mut rng = SimpleRng::new(7);
        let mut order = dot_order(&mut rng);
        assert_eq!(order.len(), 64);
        order.sort_unstable();
        order.dedup();
        assert_eq!(order.len(), 64);
    }
}
