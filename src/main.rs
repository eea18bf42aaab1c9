//! Demo binary: a minifb window hosting the digit pad.
//!
//! Drag the mouse to draw, press R to recognize, C to clear, Esc to quit.
//! Both controls are ignored while a request is in flight.

use clap::Parser;

use digitpad::ui::{draw_ring, draw_text, text_width, Frame, PadWindow};
use digitpad::{PadConfig, RecognizerConfig, Session};

const PAGE_BG: u32 = 0x000F_172A;
const BORDER: u32 = 0x0033_415E;
const HUD_TEXT: u32 = 0x0094_A3B8;
const ERROR_TEXT: u32 = 0x00F8_7171;
const RESULT_TEXT: u32 = 0x004A_DE80;

const MARGIN: usize = 16;
const HUD_H: usize = 28;
const RESULT_H: usize = 84;

#[derive(Parser, Debug)]
#[command(name = "digitpad", version, about = "Draw a digit and let a vision model identify it")]
struct Args {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 280)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 280)]
    height: u32,

    /// Stroke width in pixels
    #[arg(long, default_value_t = 20)]
    stroke_width: u32,

    /// Model identifier to request
    #[arg(long, default_value = "gemini-2.5-flash")]
    model: String,

    /// Override the recognition endpoint, e.g. a trusted proxy that holds
    /// the credential server-side
    #[arg(long)]
    endpoint: Option<String>,

    /// Environment variable holding the API credential
    #[arg(long, default_value = "GEMINI_API_KEY")]
    api_key_env: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let api_key = std::env::var(&args.api_key_env).unwrap_or_default();
    if api_key.is_empty() {
        log::warn!(
            "{} is not set; the recognition service will reject requests",
            args.api_key_env
        );
    }

    let mut recognizer = RecognizerConfig {
        model: args.model,
        api_key,
        ..Default::default()
    };
    if let Some(endpoint) = args.endpoint {
        recognizer.endpoint = endpoint;
    }

    let pad = PadConfig {
        width: args.width,
        height: args.height,
        stroke_width: args.stroke_width,
        ..Default::default()
    };

    let canvas_w = pad.width as usize;
    let canvas_h = pad.height as usize;
    let win_w = canvas_w + MARGIN * 2;
    let win_h = HUD_H + canvas_h + RESULT_H;

    let mut session = Session::new(&pad, recognizer)?;
    session.canvas_mut().set_origin(MARGIN as i32, HUD_H as i32);

    let mut window = PadWindow::new("digitpad", win_w, win_h)?;
    let mut frame = Frame::new(win_w, win_h, PAGE_BG);
    let mut was_down = false;

    while window.is_open() && !window.esc_pressed() {
        // Pointer stream: edge-detect press/release, feed moves while held.
        let down = window.left_mouse_down();
        if let Some((mx, my)) = window.mouse_pos() {
            if down && !was_down {
                session.canvas_mut().pointer_down(mx, my);
            } else if down {
                session.canvas_mut().pointer_moved(mx, my);
            }
        }
        if was_down && !down {
            session.canvas_mut().pointer_up();
        }
        was_down = down;

        // Controls are disabled while a request is outstanding; drawing is
        // still allowed.
        if !session.is_waiting() {
            if window.recognize_pressed() {
                session.recognize();
            }
            if window.clear_pressed() {
                session.clear();
            }
        }

        session.poll();

        compose(&mut frame, &session, canvas_w, canvas_h);

        // Brush cursor while hovering the canvas.
        if let Some((mx, my)) = window.mouse_pos() {
            let (mx, my) = (mx as i32, my as i32);
            let over_canvas = mx >= MARGIN as i32
                && mx < (MARGIN + canvas_w) as i32
                && my >= HUD_H as i32
                && my < (HUD_H + canvas_h) as i32;
            if over_canvas {
                draw_ring(&mut frame, mx, my, (args.stroke_width / 2) as i32, BORDER);
            }
        }

        window.present(&frame)?;
    }

    Ok(())
}

/// Rebuild the whole frame for this tick: HUD line, canvas blit, result
/// strip.
fn compose(frame: &mut Frame, session: &Session, canvas_w: usize, canvas_h: usize) {
    frame.fill(PAGE_BG);

    draw_text(
        frame,
        MARGIN as i32,
        8,
        "DRAW A DIGIT 0-9 | R: RECOGNIZE C: CLEAR",
        HUD_TEXT,
        1,
    );

    frame.fill_rect(
        MARGIN as i32 - 2,
        HUD_H as i32 - 2,
        canvas_w + 4,
        canvas_h + 4,
        BORDER,
    );
    frame.blit(
        session.canvas().pixels(),
        canvas_w,
        canvas_h,
        MARGIN as i32,
        HUD_H as i32,
    );

    let strip_y = (HUD_H + canvas_h + 14) as i32;
    let frame_w = frame.width as i32;
    let center = move |text: &str, scale: i32| (frame_w - text_width(text, scale)) / 2;

    if session.is_waiting() {
        let text = "THINKING...";
        draw_text(frame, center(text, 2), strip_y, text, HUD_TEXT, 2);
    } else if let Some(error) = session.error() {
        draw_text(frame, center(error, 1), strip_y, error, ERROR_TEXT, 1);
    } else if let Some(digit) = session.result() {
        draw_text(
            frame,
            center("RECOGNIZED DIGIT", 1),
            strip_y,
            "RECOGNIZED DIGIT",
            HUD_TEXT,
            1,
        );
        let big = digit.to_string();
        draw_text(frame, center(&big, 5), strip_y + 14, &big, RESULT_TEXT, 5);
    } else {
        let text = "THE RESULT WILL BE SHOWN HERE.";
        draw_text(frame, center(text, 1), strip_y, text, HUD_TEXT, 1);
    }
}
