//! Named colors of the nebula and the star particle palette.

use glam::Vec3;

/// Unpack `0xRRGGBB` into components in `[0, 1]`.
pub const fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Colors available to nebula clouds and shooting stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NebulaColor {
    HotPink,
    ElectricPink,
    NeonMagenta,
    RosePink,
    LightPink,
    ElectricCyan,
    NeonAqua,
    BrightTurquoise,
    SkyBlue,
    NeonMint,
    ElectricLime,
    MintGreen,
    ElectricPurple,
    NeonViolet,
    DeepPurple,
    NeonOrange,
    ElectricGold,
    Peach,
}

impl NebulaColor {
    pub const ALL: [NebulaColor; 18] = [
        NebulaColor::HotPink,
        NebulaColor::ElectricPink,
        NebulaColor::NeonMagenta,
        NebulaColor::RosePink,
        NebulaColor::LightPink,
        NebulaColor::ElectricCyan,
        NebulaColor::NeonAqua,
        NebulaColor::BrightTurquoise,
        NebulaColor::SkyBlue,
        NebulaColor::NeonMint,
        NebulaColor::ElectricLime,
        NebulaColor::MintGreen,
        NebulaColor::ElectricPurple,
        NebulaColor::NeonViolet,
        NebulaColor::DeepPurple,
        NebulaColor::NeonOrange,
        NebulaColor::ElectricGold,
        NebulaColor::Peach,
    ];

    pub const fn hex(self) -> u32 {
        match self {
            NebulaColor::HotPink | NebulaColor::RosePink => 0xff1493,
            NebulaColor::ElectricPink => 0xff69b4,
            NebulaColor::NeonMagenta => 0xff00ff,
            NebulaColor::LightPink => 0xffb6c1,
            NebulaColor::ElectricCyan => 0x00ffff,
            NebulaColor::NeonAqua => 0x00fff7,
            NebulaColor::BrightTurquoise => 0x40e0d0,
            NebulaColor::SkyBlue => 0x87ceeb,
            NebulaColor::NeonMint => 0x00ff9f,
            NebulaColor::ElectricLime => 0xccff00,
            NebulaColor::MintGreen => 0x98ff98,
            NebulaColor::ElectricPurple => 0x9d00ff,
            NebulaColor::NeonViolet => 0x8a2be2,
            NebulaColor::DeepPurple => 0x9400d3,
            NebulaColor::NeonOrange => 0xff6600,
            NebulaColor::ElectricGold => 0xffd700,
            NebulaColor::Peach => 0xffdab9,
        }
    }

    pub fn rgb(self) -> Vec3 {
        Vec3::from_array(hex_to_rgb(self.hex()))
    }

    /// Pick a color from a uniform sample in `[0, 1)`.
    pub fn from_unit(u: f32) -> NebulaColor {
        let index = (u * Self::ALL.len() as f32) as usize;
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// Star particle colors: pinks, cyans, mint, gold, orange, purple, lime, white.
pub const STAR_PALETTE: [u32; 9] = [
    0xff1493, 0x00ffff, 0x00ff9f, 0xff00ff, 0xffd700, 0xff6600, 0x9d00ff, 0xccff00, 0xffffff,
];

/// Pick a star color from a uniform sample in `[0, 1)`.
pub fn star_color(u: f32) -> [f32; 3] {
    let index = ((u * STAR_PALETTE.len() as f32) as usize).min(STAR_PALETTE.len() - 1);
    hex_to_rgb(STAR_PALETTE[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0x00ff00), [0.0, 1.0, 0.0]);
        let gold = hex_to_rgb(0xffd700);
        assert!((gold[1] - 215.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_palette_has_eighteen_named_colors() {
        assert_eq!(NebulaColor::ALL.len(), 18);
        // Two names share the same hot pink.
        assert_eq!(NebulaColor::HotPink.hex(), NebulaColor::RosePink.hex());
    }

    #[test]
    fn test_from_unit_covers_whole_palette() {
        assert_eq!(NebulaColor::from_unit(0.0), NebulaColor::HotPink);
        assert_eq!(NebulaColor::from_unit(0.9999), NebulaColor::Peach);
        // Out-of-range input is clamped rather than panicking.
        assert_eq!(NebulaColor::from_unit(1.0), NebulaColor::Peach);
    }

    #[test]
    fn test_star_color_picks() {
        assert_eq!(star_color(0.0), [1.0, 20.0 / 255.0, 147.0 / 255.0]);
        assert_eq!(star_color(0.99), [1.0, 1.0, 1.0]);
    }
}
