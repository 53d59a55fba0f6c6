//! Single-stroke engraving font.
//!
//! Each glyph is a list of pen strokes on a 9-unit-tall design grid with
//! the baseline at y = 0. Coordinates are local to the glyph cell; the
//! text renderer advances the cursor by `advance` units after each glyph
//! and scales everything to the requested text height.
//!
//! The font covers uppercase letters, digits, and the handful of symbols
//! needed by the calibration documents. Lowercase input is uppercased
//! before lookup.

/// One pen instruction in a glyph outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    /// Raise the pen (laser off, travel speed).
    Up,
    /// Lower the pen (laser on, cutting speed).
    Down,
    /// Move to a point in glyph-local units.
    At(f64, f64),
}

/// A single engraved character.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// Cursor advance after this glyph, in grid units.
    pub advance: f64,
    /// Pen strokes. The pen always starts raised.
    pub strokes: &'static [Stroke],
}

/// Design-grid height of every glyph cell.
pub const GLYPH_HEIGHT: f64 = 9.0;

use Stroke::{At, Down, Up};

const A: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 7.0),
        At(1.0, 8.0),
        At(2.0, 9.0),
        At(3.0, 9.0),
        At(4.0, 8.0),
        At(5.0, 7.0),
        At(5.0, 0.0),
        Up,
        At(5.0, 4.0),
        Down,
        At(0.0, 4.0),
        Up,
    ],
};

const B: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        At(3.0, 9.0),
        At(4.0, 8.0),
        At(5.0, 7.0),
        At(5.0, 6.0),
        At(4.0, 5.0),
        At(3.0, 4.0),
        At(0.0, 4.0),
        Up,
        At(3.0, 4.0),
        Down,
        At(4.0, 3.0),
        At(5.0, 2.0),
        At(5.0, 1.0),
        At(4.0, 0.0),
        At(0.0, 0.0),
        Up,
    ],
};

const C: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(5.0, 1.0),
        Down,
        At(4.0, 0.0),
        At(1.0, 0.0),
        At(0.0, 1.0),
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(4.0, 9.0),
        At(5.0, 8.0),
        Up,
    ],
};

const D: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        At(3.0, 9.0),
        At(4.0, 8.0),
        At(5.0, 7.0),
        At(5.0, 2.0),
        At(4.0, 1.0),
        At(3.0, 0.0),
        At(0.0, 0.0),
        Up,
    ],
};

const E: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        At(5.0, 9.0),
        Up,
        At(5.0, 5.0),
        Down,
        At(0.0, 5.0),
        Up,
        At(5.0, 0.0),
        Down,
        At(0.0, 0.0),
        Up,
    ],
};

const F: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        At(5.0, 9.0),
        Up,
        At(5.0, 5.0),
        Down,
        At(0.0, 5.0),
        Up,
    ],
};

const G: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(5.0, 8.0),
        Down,
        At(4.0, 9.0),
        At(1.0, 9.0),
        At(0.0, 8.0),
        At(0.0, 1.0),
        At(1.0, 0.0),
        At(4.0, 0.0),
        At(5.0, 1.0),
        At(5.0, 4.0),
        At(4.0, 4.0),
        Up,
    ],
};

const H: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        Up,
        At(5.0, 9.0),
        Down,
        At(5.0, 0.0),
        Up,
        At(0.0, 5.0),
        Down,
        At(5.0, 5.0),
        Up,
    ],
};

const I: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(4.0, 0.0),
        Up,
        At(4.0, 9.0),
        Down,
        At(0.0, 9.0),
        Up,
        At(2.0, 9.0),
        Down,
        At(2.0, 0.0),
        Up,
    ],
};

const J: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 1.0),
        Down,
        At(1.0, 0.0),
        At(2.0, 1.0),
        At(2.0, 9.0),
        At(0.0, 9.0),
        Up,
        At(2.0, 9.0),
        Down,
        At(4.0, 9.0),
        Up,
    ],
};

const K: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        Up,
        At(5.0, 9.0),
        Down,
        At(5.0, 7.0),
        At(4.0, 6.0),
        At(3.0, 5.0),
        At(2.0, 4.0),
        At(0.0, 4.0),
        Up,
        At(2.0, 4.0),
        Down,
        At(3.0, 3.0),
        At(4.0, 2.0),
        At(5.0, 1.0),
        At(5.0, 0.0),
        Up,
    ],
};

const L: Glyph = Glyph {
    advance: 8.0,
    strokes: &[At(0.0, 9.0), Down, At(0.0, 0.0), At(5.0, 0.0), Up],
};

const M: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        At(1.0, 8.0),
        At(2.0, 7.0),
        At(3.0, 6.0),
        At(3.0, 5.0),
        At(3.0, 6.0),
        At(4.0, 7.0),
        At(5.0, 8.0),
        At(6.0, 9.0),
        At(6.0, 0.0),
        Up,
    ],
};

const N: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 9.0),
        At(5.0, 0.0),
        At(5.0, 9.0),
        Up,
    ],
};

const O: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 1.0),
        Down,
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(4.0, 9.0),
        At(5.0, 8.0),
        At(5.0, 1.0),
        At(4.0, 0.0),
        At(1.0, 0.0),
        At(0.0, 1.0),
        Up,
    ],
};

const P: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(4.0, 9.0),
        At(5.0, 8.0),
        At(5.0, 5.0),
        At(4.0, 4.0),
        At(0.0, 4.0),
        Up,
    ],
};

const Q: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 1.0),
        Down,
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(4.0, 9.0),
        At(5.0, 8.0),
        At(5.0, 2.0),
        At(4.0, 1.0),
        At(5.0, 0.0),
        Up,
        At(4.0, 1.0),
        Down,
        At(3.0, 0.0),
        At(1.0, 0.0),
        At(0.0, 1.0),
        Up,
    ],
};

const R: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(3.0, 9.0),
        At(4.0, 8.0),
        At(5.0, 7.0),
        At(5.0, 6.0),
        At(4.0, 5.0),
        At(3.0, 4.0),
        At(0.0, 4.0),
        Up,
        At(3.0, 4.0),
        Down,
        At(4.0, 3.0),
        At(5.0, 2.0),
        At(5.0, 0.0),
        Up,
    ],
};

const S: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(4.0, 0.0),
        At(5.0, 1.0),
        At(5.0, 3.0),
        At(4.0, 4.0),
        At(1.0, 4.0),
        At(0.0, 5.0),
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(5.0, 9.0),
        Up,
    ],
};

const T: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(2.0, 0.0),
        Down,
        At(2.0, 9.0),
        Up,
        At(0.0, 9.0),
        Down,
        At(4.0, 9.0),
        Up,
    ],
};

const U: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 9.0),
        Down,
        At(0.0, 1.0),
        At(1.0, 0.0),
        At(4.0, 0.0),
        At(5.0, 1.0),
        At(5.0, 9.0),
        Up,
    ],
};

const V: Glyph = Glyph {
    advance: 7.0,
    strokes: &[At(0.0, 9.0), Down, At(2.0, 0.0), At(4.0, 9.0), Up],
};

const W: Glyph = Glyph {
    advance: 9.0,
    strokes: &[
        At(0.0, 9.0),
        Down,
        At(2.0, 0.0),
        At(3.0, 9.0),
        At(4.0, 0.0),
        At(6.0, 9.0),
        Up,
    ],
};

const X: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 0.0),
        Down,
        At(4.0, 9.0),
        Up,
        At(0.0, 9.0),
        Down,
        At(4.0, 0.0),
        Up,
    ],
};

const Y: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(2.0, 0.0),
        Down,
        At(2.0, 4.0),
        At(0.0, 6.0),
        At(0.0, 9.0),
        Up,
        At(4.0, 9.0),
        Down,
        At(4.0, 6.0),
        At(2.0, 4.0),
        Up,
    ],
};

const Z: Glyph = Glyph {
    advance: 8.0,
    strokes: &[
        At(0.0, 9.0),
        Down,
        At(5.0, 9.0),
        At(0.0, 0.0),
        At(5.0, 0.0),
        Up,
    ],
};

const D0: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 1.0),
        Down,
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(3.0, 9.0),
        At(4.0, 8.0),
        At(4.0, 1.0),
        At(3.0, 0.0),
        At(1.0, 0.0),
        At(0.0, 1.0),
        Up,
    ],
};

const D1: Glyph = Glyph {
    advance: 7.0,
    strokes: &[At(2.0, 0.0), Down, At(2.0, 9.0), Up],
};

const D2: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(4.0, 0.0),
        Down,
        At(0.0, 0.0),
        At(4.0, 8.0),
        At(2.0, 9.0),
        At(0.0, 8.0),
        Up,
    ],
};

const D3: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 1.0),
        Down,
        At(2.0, 0.0),
        At(4.0, 1.0),
        At(4.0, 4.0),
        At(3.0, 5.0),
        At(1.0, 5.0),
        Up,
        At(3.0, 5.0),
        Down,
        At(4.0, 6.0),
        At(4.0, 8.0),
        At(2.0, 9.0),
        At(0.0, 8.0),
        Up,
    ],
};

const D4: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 9.0),
        Down,
        At(0.0, 5.0),
        At(4.0, 5.0),
        Up,
        At(4.0, 9.0),
        Down,
        At(4.0, 0.0),
        Up,
    ],
};

const D5: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(4.0, 9.0),
        Down,
        At(0.0, 9.0),
        At(0.0, 5.0),
        At(2.0, 5.0),
        At(4.0, 3.0),
        At(4.0, 1.0),
        At(3.0, 0.0),
        At(0.0, 0.0),
        Up,
    ],
};

const D6: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(4.0, 9.0),
        Down,
        At(2.0, 9.0),
        At(0.0, 7.0),
        At(0.0, 1.0),
        At(1.0, 0.0),
        At(3.0, 0.0),
        At(4.0, 2.0),
        At(4.0, 3.0),
        At(2.0, 5.0),
        At(0.0, 4.0),
        Up,
    ],
};

const D7: Glyph = Glyph {
    advance: 7.0,
    strokes: &[At(0.0, 0.0), Down, At(4.0, 9.0), At(0.0, 9.0), Up],
};

const D8: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(2.0, 0.0),
        Down,
        At(3.0, 0.0),
        At(4.0, 1.0),
        At(4.0, 4.0),
        At(3.0, 5.0),
        At(1.0, 5.0),
        At(0.0, 6.0),
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(3.0, 9.0),
        At(4.0, 8.0),
        At(4.0, 6.0),
        At(3.0, 5.0),
        At(1.0, 5.0),
        At(0.0, 4.0),
        At(0.0, 1.0),
        At(1.0, 0.0),
        At(2.0, 0.0),
        Up,
    ],
};

const D9: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(4.0, 0.0),
        Down,
        At(4.0, 7.0),
        At(3.0, 9.0),
        At(1.0, 9.0),
        At(0.0, 7.0),
        At(1.0, 4.0),
        At(4.0, 4.0),
        Up,
    ],
};

const PLUS: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 5.0),
        Down,
        At(4.0, 5.0),
        Up,
        At(2.0, 3.0),
        Down,
        At(2.0, 7.0),
        Up,
    ],
};

const MINUS: Glyph = Glyph {
    advance: 7.0,
    strokes: &[At(0.0, 5.0), Down, At(4.0, 5.0), Up],
};

// Drawn as a short tick tucked under the previous glyph, so the advance
// is zero and the strokes sit left of the cursor.
const PERIOD: Glyph = Glyph {
    advance: 0.0,
    strokes: &[At(-1.5, 0.0), Down, At(-1.0, 0.0), Up],
};

const PERCENT: Glyph = Glyph {
    advance: 7.0,
    strokes: &[
        At(0.0, 7.0),
        Down,
        At(0.0, 8.0),
        At(1.0, 9.0),
        At(2.0, 8.0),
        At(2.0, 7.0),
        At(1.0, 6.0),
        At(0.0, 7.0),
        Up,
        At(0.0, 2.0),
        Down,
        At(5.0, 8.0),
        Up,
        At(3.0, 0.0),
        Down,
        At(3.0, 2.0),
        At(4.0, 3.0),
        At(5.0, 2.0),
        At(5.0, 1.0),
        At(4.0, 0.0),
        At(3.0, 1.0),
        Up,
    ],
};

const SPACE: Glyph = Glyph {
    advance: 12.0,
    strokes: &[],
};

/// Looks up the glyph for a character. Lowercase letters map to their
/// uppercase strokes; unknown characters return `None`.
pub fn lookup(ch: char) -> Option<&'static Glyph> {
    let glyph = match ch.to_ascii_uppercase() {
        'A' => &A,
        'B' => &B,
        'C' => &C,
        'D' => &D,
        'E' => &E,
        'F' => &F,
        'G' => &G,
        'H' => &H,
        'I' => &I,
        'J' => &J,
        'K' => &K,
        'L' => &L,
        'M' => &M,
        'N' => &N,
        'O' => &O,
        'P' => &P,
        'Q' => &Q,
        'R' => &R,
        'S' => &S,
        'T' => &T,
        'U' => &U,
        'V' => &V,
        'W' => &W,
        'X' => &X,
        'Y' => &Y,
        'Z' => &Z,
        '0' => &D0,
        '1' => &D1,
        '2' => &D2,
        '3' => &D3,
        '4' => &D4,
        '5' => &D5,
        '6' => &D6,
        '7' => &D7,
        '8' => &D8,
        '9' => &D9,
        '+' => &PLUS,
        '-' => &MINUS,
        '.' => &PERIOD,
        '%' => &PERCENT,
        ' ' => &SPACE,
        _ => return None,
    };
    Some(glyph)
}
