//! Software frame buffer and the ways a frame is carved up between workers.
//!
//! Pixels are stored top-down, row-major. The deck pass hands each worker
//! whole rows ([`split_ranges_mut`]); the wall pass hands each worker a
//! band of columns ([`ColumnStrip`]). Either way every worker owns a
//! disjoint region, which is the only thing that makes sharing the buffer
//! across threads sound.

use std::{marker::PhantomData, ops::Range};

use super::{Color, Rgba};
use crate::config::RowOrder;

#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// (Re)allocate for a new resolution; contents are unspecified afterwards.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height, Color::BLACK);
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: Color) {
        self.pixels[y * self.width + x] = c;
    }

    pub fn fill(&mut self, c: Color) {
        self.pixels.fill(c);
    }

    /// Split into one [`ColumnStrip`] per range.
    ///
    /// # Panics
    /// If the ranges are not ascending, disjoint and within the width.
    pub fn column_strips(&mut self, ranges: &[Range<usize>]) -> Vec<ColumnStrip<'_>> {
        let mut next = 0;
        for r in ranges {
            assert!(
                r.start >= next && r.start <= r.end && r.end <= self.width,
                "column ranges must be ascending, disjoint and inside 0..{}",
                self.width
            );
            next = r.end;
        }
        let ptr = self.pixels.as_mut_ptr();
        ranges
            .iter()
            .map(|r| ColumnStrip {
                ptr,
                width: self.width,
                height: self.height,
                cols: r.clone(),
                _buf: PhantomData,
            })
            .collect()
    }

    /// Pack to `0xAARRGGBB` words for presentation, flipping rows if asked.
    pub fn pack_argb(&self, out: &mut Vec<Rgba>, order: RowOrder) {
        out.clear();
        out.reserve(self.pixels.len());
        if self.width == 0 {
            return;
        }
        match order {
            RowOrder::TopDown => out.extend(self.pixels.iter().map(|c| c.to_argb())),
            RowOrder::BottomUp => {
                for row in self.pixels.chunks_exact(self.width).rev() {
                    out.extend(row.iter().map(|c| c.to_argb()));
                }
            }
        }
    }
}

/// Exclusive access to the columns `cols` of a [`FrameBuffer`], all rows.
///
/// Strips made by one [`FrameBuffer::column_strips`] call never overlap,
/// and the frame buffer stays mutably borrowed while any strip lives.
pub struct ColumnStrip<'a> {
    ptr: *mut Color,
    width: usize,
    height: usize,
    cols: Range<usize>,
    _buf: PhantomData<&'a mut [Color]>,
}

// SAFETY: a strip only touches pixels in its own column band (checked on
// every access), bands are disjoint, and the parent buffer is borrowed
// mutably for `'a`, so no two threads can reach the same pixel.
unsafe impl Send for ColumnStrip<'_> {}

impl ColumnStrip<'_> {
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        self.cols.clone()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            self.cols.contains(&x) && y < self.height,
            "pixel ({x}, {y}) outside strip {:?}",
            self.cols
        );
        y * self.width + x
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Color {
        let i = self.index(x, y);
        // SAFETY: `index` checked (x, y) lies in this strip, hence inside the buffer.
        unsafe { *self.ptr.add(i) }
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, c: Color) {
        let i = self.index(x, y);
        // SAFETY: as in `get`; `&mut self` makes the write exclusive within the strip.
        unsafe { *self.ptr.add(i) = c }
    }
}

/// Split `data` into disjoint mutable pieces, one per range.
///
/// # Panics
/// If the ranges are not ascending, disjoint and within `data`.
pub fn split_ranges_mut<'a, T>(mut data: &'a mut [T], ranges: &[Range<usize>]) -> Vec<&'a mut [T]> {
    let mut out = Vec::with_capacity(ranges.len());
    let mut consumed = 0;
    for r in ranges {
        assert!(r.start >= consumed && r.start <= r.end, "ranges must be ascending and disjoint");
        let rest = std::mem::take(&mut data);
        let (_, rest) = rest.split_at_mut(r.start - consumed);
        let (piece, rest) = rest.split_at_mut(r.end - r.start);
        out.push(piece);
        data = rest;
        consumed = r.end;
    }
    out
}
