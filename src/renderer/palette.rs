//! Color palette shared by both games

use super::Color;
use crate::sim::effects::Tint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub spark: Color,
    pub wave: Color,
    pub glider: Color,
    pub platform: Color,
    pub platform_edge: Color,
    pub hazard_fire: Color,
    pub hazard_water: Color,
    pub goal: Color,
    pub gate: Color,
    pub switch_idle: Color,
    pub accent: Color,
    pub pipe: Color,
    pub pipe_cap: Color,
    pub background_top: Color,
    pub background_bottom: Color,
    pub stripe: Color,
    pub text: Color,
    pub confetti: [Color; 5],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            spark: Color::rgb(0xff, 0x7b, 0x2f),
            wave: Color::rgb(0x2f, 0xb3, 0xff),
            glider: Color::rgb(0xf5, 0xf0, 0xe1),
            platform: Color::rgb(0x1e, 0x2b, 0x4f),
            platform_edge: Color::rgb(0x31, 0x42, 0x6d),
            hazard_fire: Color::rgb(0xc2, 0x1d, 0x5d),
            hazard_water: Color::rgb(0x24, 0x63, 0xb3),
            goal: Color::rgb(0x52, 0xd2, 0x73),
            gate: Color::rgb(0xd9, 0xb6, 0x4a),
            switch_idle: Color::rgb(0x6b, 0x75, 0x94),
            accent: Color::rgb(0xff, 0xbf, 0x3c),
            pipe: Color::rgb(0x3a, 0x8f, 0x5c),
            pipe_cap: Color::rgb(0x52, 0xd2, 0x73),
            background_top: Color::rgb(0x10, 0x18, 0x33),
            background_bottom: Color::rgb(0x07, 0x0b, 0x17),
            stripe: Color::rgb(0x31, 0x42, 0x6d).with_alpha(0.25),
            text: Color::rgb(0xe8, 0xee, 0xff),
            confetti: [
                Color::rgb(0xff, 0xbf, 0x3c),
                Color::rgb(0xff, 0x7b, 0x2f),
                Color::rgb(0x2f, 0xb3, 0xff),
                Color::rgb(0x52, 0xd2, 0x73),
                Color::rgb(0xe0, 0x5c, 0xff),
            ],
        }
    }
}

impl Palette {
    /// Resolve a particle tint
    pub fn tint(&self, tint: Tint) -> Color {
        match tint {
            Tint::Spark => self.spark,
            Tint::Wave => self.wave,
            Tint::Glider => self.glider,
            Tint::Accent => self.accent,
            Tint::Confetti(i) => self.confetti[i as usize % self.confetti.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::CONFETTI_COLORS;

    #[test]
    fn test_every_confetti_index_resolves() {
        let palette = Palette::default();
        assert_eq!(palette.confetti.len(), CONFETTI_COLORS as usize);
        for i in 0..CONFETTI_COLORS {
            assert_eq!(palette.tint(Tint::Confetti(i)), palette.confetti[i as usize]);
        }
        // Out-of-range indices wrap instead of panicking
        assert_eq!(palette.tint(Tint::Confetti(5)), palette.confetti[0]);
    }

    #[test]
    fn test_robot_tints() {
        let palette = Palette::default();
        assert_eq!(palette.tint(Tint::Spark).to_css(), "#ff7b2f");
        assert_eq!(palette.tint(Tint::Wave).to_css(), "#2fb3ff");
    }
}
