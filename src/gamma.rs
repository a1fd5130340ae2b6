// sRGB <-> linear lookup tables so translucent blending happens in linear
// light without a powf per pixel.
// Visual: the semi-transparent live stroke darkens the paper evenly, no
// muddy fringe where it overlaps committed ink.

use crate::types::Rgb;

pub struct GammaLut {
    to_linear: [f32; 256],  // sRGB byte -> linear [0,1]
    to_srgb: [u8; 4096],    // linear quantized to 4096 steps -> sRGB byte
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn linear_to_srgb(l: f32) -> f32 {
    if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 }
}

impl GammaLut {
    pub fn new() -> Self {
        let mut to_linear = [0.0f32; 256];
        for (v, slot) in to_linear.iter_mut().enumerate() {
            *slot = srgb_to_linear(v as f32 / 255.0);
        }

        let mut to_srgb = [0u8; 4096];
        for (i, slot) in to_srgb.iter_mut().enumerate() {
            let s = linear_to_srgb(i as f32 / 4095.0);
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { to_linear, to_srgb }
    }

    #[inline]
    fn linear(&self, v: u32) -> f32 {
        self.to_linear[(v & 0xFF) as usize]
    }

    #[inline]
    fn encode(&self, l: f32) -> u32 {
        self.to_srgb[(l.clamp(0.0, 1.0) * 4095.0).round() as usize] as u32
    }

    /// Composite `src` (an sRGB color in [0,1]) over the packed `dst` pixel
    /// with coverage `alpha`, mixing in linear light.
    pub fn blend_over(&self, dst: u32, src: Rgb, alpha: f32) -> u32 {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |d: u32, s: f32| {
            let dl = self.linear(d);
            let sl = srgb_to_linear(s.clamp(0.0, 1.0));
            self.encode(dl + (sl - dl) * a)
        };
        let r = mix(dst >> 16, src.r);
        let g = mix(dst >> 8, src.g);
        let b = mix(dst, src.b);
        (r << 16) | (g << 8) | b
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_and_transparent_extremes() {
        let lut = GammaLut::new();
        assert_eq!(lut.blend_over(0x00FF_FFFF, Rgb::BLACK, 1.0), 0x0000_0000);
        assert_eq!(lut.blend_over(0x00FF_FFFF, Rgb::BLACK, 0.0), 0x00FF_FFFF);
        assert_eq!(lut.blend_over(0x0000_0000, Rgb::new(1.0, 1.0, 1.0), 1.0), 0x00FF_FFFF);
    }

    #[test]
    fn partial_cover_lands_between() {
        let lut = GammaLut::new();
        let px = lut.blend_over(0x00FF_FFFF, Rgb::BLACK, 0.8);
        let r = (px >> 16) & 0xFF;
        assert!(r > 0 && r < 255);
        assert_eq!(r, px & 0xFF);
    }
}
