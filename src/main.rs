// What you SEE:
// • A white sheet. Hold Left Mouse and drag to draw; faster = thinner.
// • The stroke you are drawing is slightly see-through until you let go.
// • Z undoes the last stroke, Y redoes it, C clears the sheet.
// • 1-6 pick an ink color. ESC quits.

mod draw;

use clap::Parser;
use draw::{draw_crosshair, draw_text_5x7, fill_rect, Drawer, KeyCommand};
use ribbon_sketch::raster::Rasterizer;
use ribbon_sketch::{logging, BrushConfig, Canvas, Error, InputEvent, PointerEvent, Rgb};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const PALETTE: [u32; 6] = [
    0x00_10_10_10, // ink black
    0x00_D0_30_30, // red
    0x00_2E_8B_57, // green
    0x00_25_5F_D0, // blue
    0x00_E0_8A_1E, // orange
    0x00_7B_3F_A0, // purple
];

#[derive(Parser, Debug)]
#[command(about = "Pressure-sensitive ribbon sketchpad")]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = 960)]
    width: usize,
    /// Window height in pixels
    #[arg(long, default_value_t = 640)]
    height: usize,
    /// Brush width at the lightest pressure
    #[arg(long, default_value_t = 1.0)]
    min_thickness: f32,
    /// Brush width at full pressure
    #[arg(long, default_value_t = 5.0)]
    max_thickness: f32,
    /// How strongly pointer speed thins the line (0 = not at all)
    #[arg(long, default_value_t = 0.5)]
    speed_sensitivity: f32,
    /// Verbose logging (RUST_LOG overrides the level)
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    logging::init(args.debug);

    let brush = BrushConfig::new(args.min_thickness, args.max_thickness, args.speed_sensitivity)?;
    info!(?brush, width = args.width, height = args.height, "starting sketchpad");

    /* --- Window + canvas setup ---
       Visual: window opens with an empty white sheet. */
    let mut drawer = Drawer::new("Ribbon Sketch", args.width, args.height)?;
    let mut canvas = Canvas::new(args.width as f32, args.height as f32, brush);
    let mut raster = Rasterizer::new(args.width, args.height);
    canvas.set_color(Rgb::from_u32(PALETTE[0]));

    /* --- Pointer edge detection ---
       minifb only tells us "is the button down now"; we turn that into
       down/move/up events by remembering last frame's state. */
    let epoch = Instant::now();
    let mut was_down = false;

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut fps = 0.0f32;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let stamp = now.duration_since(epoch);

        /* 1) Pointer -> canvas events */
        let down = drawer.left_mouse_down();
        let pos = drawer.mouse_pos();
        match (was_down, down) {
            (false, true) => {
                if let Some(p) = pos {
                    canvas.handle_input(InputEvent::PointerDown(PointerEvent::mouse(p, stamp)));
                }
            }
            (true, true) => {
                if let Some(p) = pos {
                    canvas.handle_input(InputEvent::PointerMove(PointerEvent::mouse(p, stamp)));
                }
            }
            (true, false) => match drawer.mouse_pos_raw() {
                // off-window releases are rejected by the canvas bounds check
                Some(p) => canvas.handle_input(InputEvent::PointerUp(PointerEvent::mouse(p, stamp))),
                None => canvas.handle_input(InputEvent::PointerLost),
            },
            (false, false) => {}
        }
        was_down = down;

        /* 2) Keys */
        for cmd in drawer.commands() {
            match cmd {
                KeyCommand::Undo => canvas.handle_input(InputEvent::Undo),
                KeyCommand::Redo => canvas.handle_input(InputEvent::Redo),
                KeyCommand::Clear => canvas.handle_input(InputEvent::Clear),
                KeyCommand::Palette(i) => {
                    if let Some(&packed) = PALETTE.get(i) {
                        canvas.set_color(Rgb::from_u32(packed));
                        debug!(index = i, "ink changed");
                    }
                }
            }
        }

        /* 3) Render: committed strokes (re-uploaded only when dirty) + live stroke.
           Visual: every stroke is its own ribbon, never bridged to the next. */
        raster.begin_frame();
        canvas.render(&mut raster);

        /* 4) Overlays: crosshair, color swatch, HUD */
        let hud = format!(
            "STROKES: {} | REDO: {} | FPS: {:.1} | Z UNDO  Y REDO  C CLEAR  1-6 COLOR",
            canvas.history().strokes().len(),
            canvas.history().redo_stack().len(),
            fps,
        );
        let swatch = PALETTE
            .iter()
            .copied()
            .find(|&c| Rgb::from_u32(c) == canvas.color())
            .unwrap_or(PALETTE[0]);
        let frame = raster.frame_mut();
        if let Some(p) = pos {
            draw_crosshair(frame, p.x as i32, p.y as i32, 10, 0x00_80_80_80);
        }
        fill_rect(frame, 8, 8, 7, 7, swatch);
        draw_text_5x7(frame, 20, 8, &hud, 0x00_30_30_30);

        /* 5) Present */
        drawer.present(raster.frame())?;

        /* 6) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        let elapsed = now.duration_since(last_fps_time);
        if elapsed >= Duration::from_secs(1) {
            fps = frames_this_second as f32 / elapsed.as_secs_f32();
            debug!(fps, "frame rate");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!(strokes = canvas.history().strokes().len(), "sketchpad closed");
    Ok(())
}
