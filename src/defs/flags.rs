use bitflags::bitflags;

bitflags! {
    /// Render / collision flags carried by every tile registry entry.
    ///
    /// A wall face is only drawn when the side the ray struck is listed in
    /// the flags, which is how thin one-sided panes such as glass are built
    /// out of whole grid cells.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TileFlags: u8 {
        // Face is drawn when the ray reached the cell by an X step.
        const VERTICAL   = 0x01;
        // Face is drawn when the ray reached the cell by a Y step.
        const HORIZONTAL = 0x02;
        // Blocks camera movement.
        const SOLID      = 0x04;
        // Semi-transparent: the ray keeps going to find what lies behind.
        const ALPHA      = 0x08;
        // Only ever used as a billboard texture source.
        const SPRITE     = 0x10;

        const FACES      = Self::VERTICAL.bits() | Self::HORIZONTAL.bits();
    }
}
