//! Built-in stroke font covering printable ASCII.
//!
//! Coordinates are font units with `y` pointing up from the baseline. Capitals
//! reach [`CAP_HEIGHT`], lowercase letters sit on an x-height of 8 and
//! descenders reach `-DESCENT`. Each stroke is an open polyline.

/// Height of capital letters above the baseline.
pub(crate) const CAP_HEIGHT: i32 = 12;
/// Depth of descenders below the baseline.
pub(crate) const DESCENT: i32 = 4;
/// Blank space added on both sides of every glyph's ink box.
pub(crate) const BEARING: i32 = 2;

type Stroke = &'static [(i8, i8)];

/// A single glyph: ink box width and the polylines that draw it.
pub(crate) struct Glyph {
    pub(crate) width: i8,
    pub(crate) strokes: &'static [Stroke],
}

impl Glyph {
    /// Horizontal distance the pen moves after this glyph.
    pub(crate) fn advance(&self) -> i32 {
        i32::from(self.width) + 2 * BEARING
    }
}

const fn g(width: i8, strokes: &'static [Stroke]) -> Glyph {
    Glyph { width, strokes }
}

/// Look up the glyph for `ch`; characters outside the table render as `?`.
pub(crate) fn glyph(ch: char) -> &'static Glyph {
    let idx = (ch as u32).wrapping_sub(0x20) as usize;
    GLYPHS.get(idx).unwrap_or(&GLYPHS[usize::from(b'?' - 0x20)])
}

const BOWL_RIGHT: Stroke = &[(7, 6), (5, 8), (2, 8), (0, 6), (0, 2), (2, 0), (5, 0), (7, 2)];
const BOWL_LEFT: Stroke = &[(0, 6), (2, 8), (5, 8), (7, 6), (7, 2), (5, 0), (2, 0), (0, 2)];
const RING: Stroke = &[
    (3, 12),
    (1, 11),
    (0, 8),
    (0, 4),
    (1, 1),
    (3, 0),
    (6, 0),
    (8, 1),
    (9, 4),
    (9, 8),
    (8, 11),
    (6, 12),
    (3, 12),
];
const S_CURVE: Stroke = &[
    (8, 10),
    (6, 12),
    (2, 12),
    (0, 10),
    (0, 8),
    (2, 6),
    (6, 6),
    (8, 4),
    (8, 2),
    (6, 0),
    (2, 0),
    (0, 2),
];

#[rustfmt::skip]
static GLYPHS: [Glyph; 95] = [
    g(4, &[]),                                                              // ' '
    g(0, &[&[(0, 12), (0, 4)], &[(0, 1), (0, 0)]]),                         // '!'
    g(3, &[&[(0, 12), (0, 9)], &[(3, 12), (3, 9)]]),                        // '"'
    g(8, &[&[(2, 12), (1, 0)], &[(7, 12), (6, 0)], &[(0, 8), (8, 8)], &[(0, 4), (8, 4)]]), // '#'
    g(8, &[S_CURVE, &[(4, 14), (4, -2)]]),                                  // '$'
    g(8, &[&[(8, 12), (0, 0)], &[(0, 12), (2, 12), (2, 10), (0, 10), (0, 12)],
           &[(6, 2), (8, 2), (8, 0), (6, 0), (6, 2)]]),                     // '%'
    g(9, &[&[(9, 0), (2, 9), (2, 11), (3, 12), (5, 12), (6, 11), (6, 9), (0, 4),
             (0, 2), (2, 0), (5, 0), (9, 5)]]),                             // '&'
    g(0, &[&[(0, 12), (0, 9)]]),                                            // '\''
    g(3, &[&[(3, 14), (1, 11), (0, 6), (1, 1), (3, -2)]]),                  // '('
    g(3, &[&[(0, 14), (2, 11), (3, 6), (2, 1), (0, -2)]]),                  // ')'
    g(6, &[&[(3, 11), (3, 5)], &[(0, 10), (6, 6)], &[(6, 10), (0, 6)]]),    // '*'
    g(8, &[&[(4, 10), (4, 2)], &[(0, 6), (8, 6)]]),                         // '+'
    g(1, &[&[(1, 1), (1, 0), (0, -2)]]),                                    // ','
    g(8, &[&[(0, 6), (8, 6)]]),                                             // '-'
    g(0, &[&[(0, 1), (0, 0)]]),                                             // '.'
    g(8, &[&[(8, 14), (0, -2)]]),                                           // '/'
    g(8, &[&[(3, 12), (1, 11), (0, 8), (0, 4), (1, 1), (3, 0), (5, 0), (7, 1),
             (8, 4), (8, 8), (7, 11), (5, 12), (3, 12)]]),                  // '0'
    g(3, &[&[(0, 9), (3, 12), (3, 0)]]),                                    // '1'
    g(8, &[&[(0, 10), (2, 12), (6, 12), (8, 10), (8, 8), (0, 0), (8, 0)]]), // '2'
    g(8, &[&[(0, 12), (8, 12), (4, 7), (6, 7), (8, 5), (8, 2), (6, 0), (2, 0), (0, 2)]]), // '3'
    g(8, &[&[(6, 0), (6, 12), (0, 4), (8, 4)]]),                            // '4'
    g(8, &[&[(8, 12), (0, 12), (0, 7), (2, 8), (6, 8), (8, 6), (8, 2), (6, 0),
             (2, 0), (0, 2)]]),                                             // '5'
    g(8, &[&[(7, 12), (3, 12), (1, 10), (0, 7), (0, 2), (2, 0), (6, 0), (8, 2),
             (8, 5), (6, 7), (2, 7), (0, 5)]]),                             // '6'
    g(8, &[&[(0, 12), (8, 12), (3, 0)]]),                                   // '7'
    g(8, &[&[(2, 12), (6, 12), (8, 10), (8, 8), (6, 6), (2, 6), (0, 4), (0, 2),
             (2, 0), (6, 0), (8, 2), (8, 4), (6, 6)],
           &[(2, 6), (0, 8), (0, 10), (2, 12)]]),                           // '8'
    g(8, &[&[(8, 7), (6, 5), (2, 5), (0, 7), (0, 10), (2, 12), (6, 12), (8, 10),
             (8, 5), (7, 2), (5, 0), (1, 0)]]),                             // '9'
    g(0, &[&[(0, 8), (0, 7)], &[(0, 1), (0, 0)]]),                          // ':'
    g(1, &[&[(1, 8), (1, 7)], &[(1, 1), (1, 0), (0, -2)]]),                 // ';'
    g(8, &[&[(8, 11), (0, 6), (8, 1)]]),                                    // '<'
    g(8, &[&[(0, 8), (8, 8)], &[(0, 4), (8, 4)]]),                          // '='
    g(8, &[&[(0, 11), (8, 6), (0, 1)]]),                                    // '>'
    g(8, &[&[(0, 10), (2, 12), (6, 12), (8, 10), (8, 8), (4, 6), (4, 4)],
           &[(4, 1), (4, 0)]]),                                             // '?'
    g(10, &[&[(7, 4), (6, 3), (4, 3), (3, 4), (3, 7), (4, 8), (6, 8), (7, 7),
              (7, 3), (9, 3), (10, 5), (10, 8), (8, 11), (5, 12), (3, 12), (1, 11),
              (0, 9), (0, 3), (1, 1), (3, 0), (7, 0)]]),                    // '@'
    g(8, &[&[(0, 0), (4, 12), (8, 0)], &[(1, 4), (7, 4)]]),                 // 'A'
    g(8, &[&[(0, 0), (0, 12), (6, 12), (8, 10), (8, 8), (6, 6), (0, 6)],
           &[(6, 6), (8, 4), (8, 2), (6, 0), (0, 0)]]),                     // 'B'
    g(8, &[&[(8, 10), (6, 12), (2, 12), (0, 10), (0, 2), (2, 0), (6, 0), (8, 2)]]), // 'C'
    g(8, &[&[(0, 0), (0, 12), (5, 12), (8, 9), (8, 3), (5, 0), (0, 0)]]),   // 'D'
    g(7, &[&[(7, 12), (0, 12), (0, 0), (7, 0)], &[(0, 6), (5, 6)]]),        // 'E'
    g(7, &[&[(7, 12), (0, 12), (0, 0)], &[(0, 6), (5, 6)]]),                // 'F'
    g(8, &[&[(8, 10), (6, 12), (2, 12), (0, 10), (0, 2), (2, 0), (6, 0), (8, 2),
             (8, 5), (5, 5)]]),                                             // 'G'
    g(8, &[&[(0, 0), (0, 12)], &[(8, 0), (8, 12)], &[(0, 6), (8, 6)]]),     // 'H'
    g(0, &[&[(0, 0), (0, 12)]]),                                            // 'I'
    g(6, &[&[(6, 12), (6, 2), (4, 0), (2, 0), (0, 2), (0, 4)]]),            // 'J'
    g(8, &[&[(0, 0), (0, 12)], &[(8, 12), (0, 4)], &[(3, 7), (8, 0)]]),     // 'K'
    g(7, &[&[(0, 12), (0, 0), (7, 0)]]),                                    // 'L'
    g(10, &[&[(0, 0), (0, 12), (5, 0), (10, 12), (10, 0)]]),                // 'M'
    g(8, &[&[(0, 0), (0, 12), (8, 0), (8, 12)]]),                           // 'N'
    g(9, &[RING]),                                                          // 'O'
    g(8, &[&[(0, 0), (0, 12), (6, 12), (8, 10), (8, 7), (6, 5), (0, 5)]]),  // 'P'
    g(9, &[RING, &[(5, 3), (9, -1)]]),                                      // 'Q'
    g(8, &[&[(0, 0), (0, 12), (6, 12), (8, 10), (8, 8), (6, 6), (0, 6)],
           &[(4, 6), (8, 0)]]),                                             // 'R'
    g(8, &[S_CURVE]),                                                       // 'S'
    g(8, &[&[(0, 12), (8, 12)], &[(4, 12), (4, 0)]]),                       // 'T'
    g(8, &[&[(0, 12), (0, 3), (2, 0), (6, 0), (8, 3), (8, 12)]]),           // 'U'
    g(8, &[&[(0, 12), (4, 0), (8, 12)]]),                                   // 'V'
    g(10, &[&[(0, 12), (2, 0), (5, 9), (8, 0), (10, 12)]]),                 // 'W'
    g(8, &[&[(0, 12), (8, 0)], &[(8, 12), (0, 0)]]),                        // 'X'
    g(8, &[&[(0, 12), (4, 6), (8, 12)], &[(4, 6), (4, 0)]]),                // 'Y'
    g(8, &[&[(0, 12), (8, 12), (0, 0), (8, 0)]]),                           // 'Z'
    g(3, &[&[(3, 14), (0, 14), (0, -2), (3, -2)]]),                         // '['
    g(8, &[&[(0, 14), (8, -2)]]),                                           // '\\'
    g(3, &[&[(0, 14), (3, 14), (3, -2), (0, -2)]]),                         // ']'
    g(6, &[&[(0, 9), (3, 12), (6, 9)]]),                                    // '^'
    g(8, &[&[(0, -2), (8, -2)]]),                                           // '_'
    g(2, &[&[(0, 12), (2, 10)]]),                                           // '`'
    g(7, &[&[(7, 8), (7, 0)], BOWL_RIGHT]),                                 // 'a'
    g(7, &[&[(0, 12), (0, 0)], BOWL_LEFT]),                                 // 'b'
    g(7, &[BOWL_RIGHT]),                                                    // 'c'
    g(7, &[&[(7, 12), (7, 0)], BOWL_RIGHT]),                                // 'd'
    g(7, &[&[(0, 4), (7, 4), (7, 6), (5, 8), (2, 8), (0, 6), (0, 2), (2, 0),
             (5, 0), (7, 2)]]),                                             // 'e'
    g(5, &[&[(5, 12), (3, 12), (2, 11), (2, 0)], &[(0, 8), (5, 8)]]),       // 'f'
    g(7, &[&[(7, 8), (7, -2), (5, -4), (2, -4), (0, -2)], BOWL_RIGHT]),     // 'g'
    g(7, &[&[(0, 12), (0, 0)], &[(0, 6), (2, 8), (5, 8), (7, 6), (7, 0)]]), // 'h'
    g(0, &[&[(0, 8), (0, 0)], &[(0, 12), (0, 11)]]),                        // 'i'
    g(3, &[&[(3, 8), (3, -2), (1, -4), (0, -4)], &[(3, 12), (3, 11)]]),     // 'j'
    g(7, &[&[(0, 12), (0, 0)], &[(6, 8), (0, 3)], &[(2, 5), (7, 0)]]),      // 'k'
    g(0, &[&[(0, 12), (0, 0)]]),                                            // 'l'
    g(12, &[&[(0, 8), (0, 0)], &[(0, 6), (2, 8), (4, 8), (6, 6), (6, 0)],
            &[(6, 6), (8, 8), (10, 8), (12, 6), (12, 0)]]),                 // 'm'
    g(7, &[&[(0, 8), (0, 0)], &[(0, 6), (2, 8), (5, 8), (7, 6), (7, 0)]]),  // 'n'
    g(7, &[&[(2, 8), (0, 6), (0, 2), (2, 0), (5, 0), (7, 2), (7, 6), (5, 8), (2, 8)]]), // 'o'
    g(7, &[&[(0, 8), (0, -4)], BOWL_LEFT]),                                 // 'p'
    g(7, &[&[(7, 8), (7, -4)], BOWL_RIGHT]),                                // 'q'
    g(5, &[&[(0, 8), (0, 0)], &[(0, 5), (3, 8), (5, 8)]]),                  // 'r'
    g(6, &[&[(6, 7), (5, 8), (1, 8), (0, 7), (0, 5), (1, 4), (5, 4), (6, 3),
             (6, 1), (5, 0), (1, 0), (0, 1)]]),                             // 's'
    g(5, &[&[(2, 12), (2, 1), (3, 0), (5, 0)], &[(0, 8), (5, 8)]]),         // 't'
    g(7, &[&[(0, 8), (0, 2), (2, 0), (5, 0), (7, 2)], &[(7, 8), (7, 0)]]),  // 'u'
    g(6, &[&[(0, 8), (3, 0), (6, 8)]]),                                     // 'v'
    g(10, &[&[(0, 8), (2, 0), (5, 6), (8, 0), (10, 8)]]),                   // 'w'
    g(7, &[&[(0, 8), (7, 0)], &[(7, 8), (0, 0)]]),                          // 'x'
    g(7, &[&[(0, 8), (4, 0)], &[(7, 8), (4, 0), (2, -4), (0, -4)]]),        // 'y'
    g(7, &[&[(0, 8), (7, 8), (0, 0), (7, 0)]]),                             // 'z'
    g(4, &[&[(4, 14), (2, 13), (2, 7), (0, 6), (2, 5), (2, -1), (4, -2)]]), // '{'
    g(0, &[&[(0, 14), (0, -2)]]),                                           // '|'
    g(4, &[&[(0, 14), (2, 13), (2, 7), (4, 6), (2, 5), (2, -1), (0, -2)]]), // '}'
    g(8, &[&[(0, 5), (2, 7), (6, 5), (8, 7)]]),                             // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_printable_ascii() {
        for b in 0x20u8..=0x7e {
            let glyph = glyph(char::from(b));
            assert!(glyph.advance() >= 2 * BEARING);
        }
    }

    #[test]
    fn strokes_stay_inside_their_ink_box() {
        for b in 0x20u8..=0x7e {
            let glyph = glyph(char::from(b));
            for stroke in glyph.strokes {
                assert!(!stroke.is_empty());
                for &(x, y) in *stroke {
                    assert!(
                        (0..=glyph.width).contains(&x),
                        "{:?} x={x} outside width {}",
                        char::from(b),
                        glyph.width
                    );
                    assert!((-DESCENT..=CAP_HEIGHT + 2).contains(&i32::from(y)));
                }
            }
        }
    }

    #[test]
    fn unknown_characters_fall_back_to_question_mark() {
        let fallback = glyph('?');
        assert!(std::ptr::eq(glyph('风'), fallback));
        assert!(std::ptr::eq(glyph('\n'), fallback));
        assert!(std::ptr::eq(glyph('\u{7f}'), fallback));
    }
}
