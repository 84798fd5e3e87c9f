// Format-agnostic repository of already-decoded square textures.
// The casters interact through `TextureId` only.

use std::collections::HashMap;

use crate::renderer::Color;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` of the magenta placeholder.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Edge length used by the built-in generators.
pub const TEX_SIZE: usize = 32;

/// Square RGBA texel grid in row-major order (`pixels[v * size + u]`).
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub size: usize,
    pub pixels: Vec<Color>,
}

/// Solid magenta: what a texture that failed to decode turns into.
impl Default for Texture {
    fn default() -> Self {
        Texture::solid("MISSING", TEX_SIZE, Color::MAGENTA)
    }
}

impl Texture {
    /// Wrap decoded pixels, checking they form a `size × size` square.
    pub fn new<S: Into<String>>(
        name: S,
        size: usize,
        pixels: Vec<Color>,
    ) -> Result<Self, TextureError> {
        if size == 0 || pixels.len() != size * size {
            return Err(TextureError::BadSize {
                size,
                len: pixels.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            size,
            pixels,
        })
    }

    pub fn solid<S: Into<String>>(name: S, size: usize, color: Color) -> Self {
        Self {
            name: name.into(),
            size,
            pixels: vec![color; size * size],
        }
    }

    /// Build a texture from a per-texel generator `f(u, v)`.
    pub fn from_fn<S, F>(name: S, size: usize, mut f: F) -> Self
    where
        S: Into<String>,
        F: FnMut(usize, usize) -> Color,
    {
        let mut pixels = Vec::with_capacity(size * size);
        for v in 0..size {
            for u in 0..size {
                pixels.push(f(u, v));
            }
        }
        Self {
            name: name.into(),
            size,
            pixels,
        }
    }

    /// Two-colour checkerboard with `cell`-texel squares.
    pub fn checker<S: Into<String>>(name: S, size: usize, cell: usize, a: Color, b: Color) -> Self {
        let cell = cell.max(1);
        Self::from_fn(name, size, |u, v| {
            if (u / cell + v / cell) % 2 == 0 { a } else { b }
        })
    }

    /// Texel at `(u, v)`, wrapping both coordinates into range.
    #[inline(always)]
    pub fn texel(&self, u: i32, v: i32) -> Color {
        let n = self.size as i32;
        let u = u.rem_euclid(n) as usize;
        let v = v.rem_euclid(n) as usize;
        self.pixels[v * self.size + u]
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Pixel buffer is not a non-empty square of the stated size.
    #[error("texture of size {size} cannot hold {len} pixels")]
    BadSize { size: usize, len: usize },
}

/// Read-only (once built) cache of textures shared by every render worker.
///
/// * Textures are generated or decoded elsewhere; the bank only stores them.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” placeholder.
#[derive(Debug)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::new(Texture::default())
    }
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only placeholder

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe lookup used on the render path: bad ids draw the placeholder.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Store `tex` at exactly `id`, growing the bank with placeholders.
    ///
    /// Tile registry entries reference fixed slots, so loaders fill slots
    /// rather than take whatever id comes next.
    pub fn insert_at(&mut self, id: TextureId, tex: Texture) -> Result<(), TextureError> {
        if id == NO_TEXTURE {
            return Err(TextureError::BadId(id));
        }
        if let Some(&existing) = self.by_name.get(&tex.name) {
            if existing != id {
                return Err(TextureError::Duplicate(tex.name));
            }
        }
        while self.data.len() <= id as usize {
            self.data.push(self.data[NO_TEXTURE as usize].clone());
        }
        if let Some(old) = self.data.get(id as usize) {
            if self.by_name.get(&old.name) == Some(&id) {
                self.by_name.remove(&old.name);
            }
        }
        self.by_name.insert(tex.name.clone(), id);
        self.data[id as usize] = tex;
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
