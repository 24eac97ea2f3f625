//! Cursor — a screen position and how keys move it.
//!
//! The cursor is a plain value: `(row, col)`, 0-indexed, always inside the
//! viewport. [`Cursor::moved`] is the whole movement model. It is a pure
//! function of the current position, the key, and the viewport, so the main
//! loop just replaces its cursor with the result.
//!
//! # Clamping
//!
//! Every single step is clamped at the edges: Left at column 0 and Up at
//! row 0 do nothing, Right and Down stop at the last column/row. Page keys
//! are `rows` single steps in a row, each clamped the same way, so a page
//! move can never land somewhere a sequence of arrow presses couldn't.

use tilde_term::input::Key;
use tilde_term::probe::Viewport;

/// A position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cursor {
    pub row: u16,
    pub col: u16,
}

impl Cursor {
    /// The top-left cell.
    #[must_use]
    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// A cursor at `(row, col)`, pulled inside `viewport` if it lies outside.
    #[must_use]
    pub fn clamped(row: u16, col: u16, viewport: Viewport) -> Self {
        Self {
            row: row.min(viewport.last_row()),
            col: col.min(viewport.last_col()),
        }
    }

    /// The position after pressing `key`.
    ///
    /// Keys that don't move the cursor return it unchanged.
    #[must_use]
    pub fn moved(self, key: Key, viewport: Viewport) -> Self {
        match key {
            Key::Left | Key::Right | Key::Up | Key::Down => self.step(key, viewport),
            Key::Home => Self { col: 0, ..self },
            Key::End => Self {
                col: viewport.last_col(),
                ..self
            },
            Key::PageUp => self.repeat(Key::Up, viewport.rows(), viewport),
            Key::PageDown => self.repeat(Key::Down, viewport.rows(), viewport),
            _ => self,
        }
    }

    /// One clamped arrow step.
    fn step(self, key: Key, viewport: Viewport) -> Self {
        let mut next = self;
        match key {
            Key::Left if self.col > 0 => next.col -= 1,
            Key::Right if self.col < viewport.last_col() => next.col += 1,
            Key::Up if self.row > 0 => next.row -= 1,
            Key::Down if self.row < viewport.last_row() => next.row += 1,
            _ => {}
        }
        next
    }

    fn repeat(self, key: Key, times: u16, viewport: Viewport) -> Self {
        (0..times).fold(self, |cursor, _| cursor.step(key, viewport))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(rows: u16, cols: u16) -> Viewport {
        Viewport::new(rows, cols).unwrap()
    }

    fn at(row: u16, col: u16) -> Cursor {
        Cursor { row, col }
    }

    // ── Arrows ───────────────────────────────────────────────────────

    #[test]
    fn arrows_move_one_cell() {
        let v = vp(24, 80);
        let c = at(5, 5);
        assert_eq!(c.moved(Key::Left, v), at(5, 4));
        assert_eq!(c.moved(Key::Right, v), at(5, 6));
        assert_eq!(c.moved(Key::Up, v), at(4, 5));
        assert_eq!(c.moved(Key::Down, v), at(6, 5));
    }

    #[test]
    fn left_and_up_stop_at_origin() {
        let v = vp(24, 80);
        assert_eq!(Cursor::origin().moved(Key::Left, v), Cursor::origin());
        assert_eq!(Cursor::origin().moved(Key::Up, v), Cursor::origin());
    }

    #[test]
    fn right_stops_at_last_column() {
        let v = vp(24, 80);
        assert_eq!(at(0, 79).moved(Key::Right, v), at(0, 79));
        assert_eq!(at(0, 78).moved(Key::Right, v), at(0, 79));
    }

    #[test]
    fn down_stops_at_last_row() {
        let v = vp(24, 80);
        assert_eq!(at(23, 0).moved(Key::Down, v), at(23, 0));
    }

    #[test]
    fn row_and_column_limits_are_independent() {
        // A wide, short viewport: row limit is 2, column limit is 99.
        let v = vp(3, 100);
        assert_eq!(at(2, 50).moved(Key::Down, v), at(2, 50));
        assert_eq!(at(2, 50).moved(Key::Right, v), at(2, 51));
    }

    // ── Home / End ───────────────────────────────────────────────────

    #[test]
    fn home_goes_to_column_zero() {
        assert_eq!(at(7, 42).moved(Key::Home, vp(24, 80)), at(7, 0));
    }

    #[test]
    fn end_goes_to_last_column() {
        assert_eq!(at(7, 3).moved(Key::End, vp(24, 80)), at(7, 79));
    }

    // ── Paging ───────────────────────────────────────────────────────

    #[test]
    fn page_down_from_top_lands_on_last_row() {
        assert_eq!(Cursor::origin().moved(Key::PageDown, vp(24, 80)), at(23, 0));
    }

    #[test]
    fn page_up_from_bottom_lands_on_first_row() {
        assert_eq!(at(23, 9).moved(Key::PageUp, vp(24, 80)), at(0, 9));
    }

    #[test]
    fn page_down_matches_repeated_arrows() {
        let v = vp(10, 10);
        let start = at(4, 2);
        let stepped = (0..10).fold(start, |c, _| c.moved(Key::Down, v));
        assert_eq!(start.moved(Key::PageDown, v), stepped);
    }

    #[test]
    fn single_cell_viewport_never_moves() {
        let v = vp(1, 1);
        for key in [
            Key::Up,
            Key::Down,
            Key::Left,
            Key::Right,
            Key::Home,
            Key::End,
            Key::PageUp,
            Key::PageDown,
        ] {
            assert_eq!(Cursor::origin().moved(key, v), Cursor::origin(), "{key:?}");
        }
    }

    // ── Non-movement ─────────────────────────────────────────────────

    #[test]
    fn other_keys_leave_cursor_alone() {
        let v = vp(24, 80);
        let c = at(3, 3);
        for key in [Key::Char(b'x'), Key::Delete, Key::Insert, Key::Escape] {
            assert_eq!(c.moved(key, v), c);
        }
    }

    #[test]
    fn clamped_pulls_inside() {
        assert_eq!(Cursor::clamped(100, 100, vp(24, 80)), at(23, 79));
        assert_eq!(Cursor::clamped(1, 2, vp(24, 80)), at(1, 2));
    }
}
