//! Sprite-sheet sequence selection and frame advancement.

use crate::bird::BirdState;

/// One animation sequence: a row in the sprite grid, how many frames that
/// row holds, and the playback rate in frames per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sequence {
    pub row: u32,
    pub frame_count: u32,
    pub fps: f32,
}

/// Maps simulation states to their animation sequences.
///
/// Flying, perched and fleeing sequences are required; searching and
/// approaching reuse the flying sequence when the sheet has no dedicated
/// row for them. The constructor bakes the fallback in so lookups are
/// total.
#[derive(Debug, Clone, Copy)]
pub struct SequenceTable {
    flying: Sequence,
    searching: Sequence,
    approaching: Sequence,
    perched: Sequence,
    fleeing: Sequence,
}

impl SequenceTable {
    pub fn new(
        flying: Sequence,
        searching: Option<Sequence>,
        approaching: Option<Sequence>,
        perched: Sequence,
        fleeing: Sequence,
    ) -> Self {
        Self {
            flying,
            searching: searching.unwrap_or(flying),
            approaching: approaching.unwrap_or(flying),
            perched,
            fleeing,
        }
    }

    pub fn for_state(&self, state: BirdState) -> &Sequence {
        match state {
            BirdState::Flying => &self.flying,
            BirdState::Searching => &self.searching,
            BirdState::Approaching => &self.approaching,
            BirdState::Perched => &self.perched,
            BirdState::Fleeing => &self.fleeing,
        }
    }
}

/// Advances `frame`/`timer` by `dt` seconds against `sequence`.
///
/// The timer keeps its remainder when a frame flips, so a slow tick can
/// advance more than one frame instead of dropping them. The returned frame
/// is always within `[0, frame_count)`.
pub fn advance_frame(frame: u32, timer: f32, dt: f32, sequence: &Sequence) -> (u32, f32) {
    if sequence.frame_count == 0 || sequence.fps <= 0.0 {
        return (0, 0.0);
    }

    let period = 1.0 / sequence.fps;
    let mut frame = frame % sequence.frame_count;
    let mut timer = timer + dt;
    while timer >= period {
        timer -= period;
        frame = (frame + 1) % sequence.frame_count;
    }
    (frame, timer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQ: Sequence = Sequence {
        row: 1,
        frame_count: 4,
        fps: 10.0,
    };

    #[test]
    fn test_advance_within_period_holds_frame() {
        let (frame, timer) = advance_frame(2, 0.0, 0.05, &SEQ);
        assert_eq!(frame, 2);
        assert!((timer - 0.05).abs() < 0.0001);
    }

    #[test]
    fn test_advance_flips_frame_and_keeps_remainder() {
        let (frame, timer) = advance_frame(0, 0.09, 0.02, &SEQ);
        assert_eq!(frame, 1);
        assert!((timer - 0.01).abs() < 0.0001);
    }

    #[test]
    fn test_advance_wraps_modulo_frame_count() {
        let (frame, _) = advance_frame(3, 0.0, 0.1, &SEQ);
        assert_eq!(frame, 0);
    }

    #[test]
    fn test_large_delta_advances_multiple_frames() {
        // 0.35s at 10fps is three full frames plus a remainder.
        let (frame, timer) = advance_frame(0, 0.0, 0.35, &SEQ);
        assert_eq!(frame, 3);
        assert!((timer - 0.05).abs() < 0.0001);
    }

    #[test]
    fn test_frame_always_in_range() {
        let mut frame = 0;
        let mut timer = 0.0;
        for i in 0..200 {
            let dt = 0.001 * (i % 40) as f32;
            let (f, t) = advance_frame(frame, timer, dt, &SEQ);
            frame = f;
            timer = t;
            assert!(frame < SEQ.frame_count);
            assert!(timer >= 0.0);
        }
    }

    #[test]
    fn test_degenerate_sequence_pins_frame_zero() {
        let empty = Sequence {
            row: 0,
            frame_count: 0,
            fps: 10.0,
        };
        assert_eq!(advance_frame(5, 0.3, 0.1, &empty), (0, 0.0));
    }

    #[test]
    fn test_table_falls_back_to_flying() {
        let flying = SEQ;
        let perched = Sequence {
            row: 2,
            frame_count: 2,
            fps: 4.0,
        };
        let fleeing = Sequence {
            row: 3,
            frame_count: 4,
            fps: 16.0,
        };
        let table = SequenceTable::new(flying, None, None, perched, fleeing);

        assert_eq!(*table.for_state(BirdState::Searching), flying);
        assert_eq!(*table.for_state(BirdState::Approaching), flying);
        assert_eq!(*table.for_state(BirdState::Perched), perched);
        assert_eq!(*table.for_state(BirdState::Fleeing), fleeing);
    }
}
