//! Per-pixel occupancy masks for exact collision
//!
//! A mask marks which pixels of a sprite are opaque. Two masks collide when
//! their bounding boxes intersect and at least one pixel is set in both.

use glam::IVec2;

/// Opaque/transparent bitmap, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Fully opaque mask (rectangular sprites)
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask by evaluating `solid(x, y)` at every pixel
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from RGBA8 pixels: alpha above `threshold` is opaque.
    /// Missing trailing pixels are treated as transparent.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8], threshold: u8) -> Self {
        Self::from_fn(width, height, |x, y| {
            let idx = ((y * width + x) * 4 + 3) as usize;
            rgba.get(idx).is_some_and(|&a| a > threshold)
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the pixel is opaque (out of range is transparent)
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = solid;
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Rotate around the center by `degrees`, growing the bounds to fit.
    ///
    /// Nearest-neighbour inverse mapping: every destination pixel samples the
    /// source pixel its center rotates back onto.
    pub fn rotated(&self, degrees: f32) -> Mask {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = self.width as f32;
        let h = self.height as f32;
        // Shave float noise so 0/90/180 degrees keep exact bounds
        let new_w = ((w * cos.abs() + h * sin.abs()) - 1e-3).ceil().max(1.0) as u32;
        let new_h = ((w * sin.abs() + h * cos.abs()) - 1e-3).ceil().max(1.0) as u32;

        let (src_cx, src_cy) = (w / 2.0, h / 2.0);
        let (dst_cx, dst_cy) = (new_w as f32 / 2.0, new_h as f32 / 2.0);

        Mask::from_fn(new_w, new_h, |x, y| {
            let dx = x as f32 + 0.5 - dst_cx;
            let dy = y as f32 + 0.5 - dst_cy;
            let sx = cos * dx + sin * dy + src_cx;
            let sy = -sin * dx + cos * dy + src_cy;
            self.get(sx.floor() as i32, sy.floor() as i32)
        })
    }

    /// Exact overlap test.
    ///
    /// `offset` is the other mask's top-left corner relative to this mask's
    /// top-left corner.
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (self.width as i32).min(offset.x + other.width as i32);
        let y1 = (self.height as i32).min(offset.y + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return true;
                }
            }
        }
        false
    }
}
