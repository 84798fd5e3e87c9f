/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_w: f32, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
        }
    }
}
