//! Deterministic, never-reused display colours.

use std::cell::Cell;
use std::rc::Rc;

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hands out palette colours from a counter that only ever grows.
///
/// Clones share one counter, so stores built from clones of the same allocator never hand
/// out the same colour twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorAllocator {
    counter: Rc<Cell<usize>>,
    offset: usize,
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::with_offset(9)
    }
}

impl ColorAllocator {
    pub fn with_offset(offset: usize) -> Self {
        Self {
            counter: Rc::new(Cell::new(0)),
            offset,
        }
    }

    /// Colours allocated so far, across every clone.
    pub fn allocated(&self) -> usize {
        self.counter.get()
    }

    /// Colour the next call to [`next_color`](Self::next_color) will return.
    pub fn peek(&self) -> Rgb {
        palette_color(self.counter.get() + self.offset)
    }

    pub fn next_color(&self) -> Rgb {
        let color = self.peek();
        self.counter.set(self.counter.get() + 1);
        color
    }
}

/// Golden-ratio-ish hue walk at fixed saturation and value.
pub fn palette_color(index: usize) -> Rgb {
    let hue = (0.19 * (index as f64 + 2.0)).rem_euclid(1.0);
    hsv_to_rgb(hue, 0.8, 0.8)
}

/// `h`, `s`, `v` in `[0, 1]`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_u8 = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn allocator_is_monotonic_and_distinct() {
        let alloc = ColorAllocator::default();
        let first = alloc.peek();
        let colors: Vec<_> = (0..20).map(|_| alloc.next_color()).collect();
        assert_eq!(colors[0], first);
        assert_eq!(alloc.allocated(), 20);
        assert_eq!(colors.iter().collect::<HashSet<_>>().len(), colors.len());
    }

    #[test]
    fn clones_draw_from_one_counter() {
        let a = ColorAllocator::default();
        let b = a.clone();
        let first = a.next_color();
        let second = b.next_color();
        assert_ne!(first, second);
        assert_eq!(a.allocated(), 2);
        assert_eq!(a.peek(), b.peek());
    }
}
