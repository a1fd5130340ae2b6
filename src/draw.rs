// Window + small software overlays.
// Visual effects provided here:
// 1) A window that shows the canvas framebuffer.
// 2) A crosshair that follows your mouse.
// 3) A tiny 5x7 bitmap font for the HUD line.

use ribbon_sketch::{Error, FrameBuffer, Vec2};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// One-shot keyboard commands the host cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    Clear,
    Palette(usize),
}

const PALETTE_KEYS: [Key; 6] = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5, Key::Key6];

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create the drawing window.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // ~60 Hz is plenty for pointer sampling and keeps the loop from spinning
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in window coordinates, `None` while it is off the window.
    /// Visual: a release reported as `None` cancels the stroke in progress.
    pub fn mouse_pos(&self) -> Option<Vec2> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Vec2::new(x, y))
    }

    /// Unclamped position, used to learn where the pointer was released.
    pub fn mouse_pos_raw(&self) -> Option<Vec2> {
        self.window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| Vec2::new(x, y))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Key presses since last frame (no auto-repeat).
    pub fn commands(&self) -> Vec<KeyCommand> {
        let mut out = Vec::new();
        let pressed = |k| self.window.is_key_pressed(k, KeyRepeat::No);
        if pressed(Key::Z) { out.push(KeyCommand::Undo); }
        if pressed(Key::Y) { out.push(KeyCommand::Redo); }
        if pressed(Key::C) { out.push(KeyCommand::Clear); }
        for (i, key) in PALETTE_KEYS.iter().enumerate() {
            if pressed(*key) { out.push(KeyCommand::Palette(i)); }
        }
        out
    }
}

/* ---------- Software overlays: pixels, crosshair, tiny bitmap font ---------- */

#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Axis-aligned run of pixels; the crosshair only needs horizontal/vertical lines.
fn draw_hline(fb: &mut FrameBuffer, x0: i32, x1: i32, y: i32, color: u32) {
    for x in x0.min(x1)..=x0.max(x1) {
        put_pixel(fb, x, y, color);
    }
}

fn draw_vline(fb: &mut FrameBuffer, x: i32, y0: i32, y1: i32, color: u32) {
    for y in y0.min(y1)..=y0.max(y1) {
        put_pixel(fb, x, y, color);
    }
}

/// Draw a small crosshair centered at (cx,cy), gap in the middle so the
/// nib itself stays visible.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_hline(fb, cx - size, cx - 3, cy, color);
    draw_hline(fb, cx + 3, cx + size, cy, color);
    draw_vline(fb, cx, cy - size, cy - 3, color);
    draw_vline(fb, cx, cy + 3, cy + size, color);
}

/// A filled square; used as the current-color swatch next to the HUD.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for yy in y..y + h {
        draw_hline(fb, x, x + w - 1, yy, color);
    }
}

/* ---------- 5x7 bitmap font (digits + what the HUD spells) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters of "STROKES REDO UNDO CLEAR COLOR FPS Z Y C"
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel light halo so it
/// reads on both paper and ink.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, halo: u32) {
    let Some(rows) = glyph5x7(ch) else {
        return;
    };
    for (pass_color, off) in [(halo, 1), (color, 0)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + off, y + ry as i32 + off, pass_color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, 0x00_E0_E0_E0);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}
