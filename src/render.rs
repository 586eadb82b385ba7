//! Terminal renderer. The 400x600 playfield is scaled onto a pixel buffer two
//! pixels per terminal cell and written with upper half-block glyphs. Menu
//! text is printed on top as plain terminal text.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::session::{Frame, Phase};
use crate::sim::{Physics, Snapshot};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    const fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(78, 192, 202);
const SKY_BOT: Rgb = Rgb(200, 236, 240);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(115, 204, 72);
const DIRT: Rgb = Rgb(222, 216, 149);
const DIRT_DARK: Rgb = Rgb(200, 190, 120);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(150, 220, 70);
const CAP_DARK: Rgb = Rgb(55, 90, 20);
const BIRD_BODY: Rgb = Rgb(250, 200, 50);
const BIRD_HI: Rgb = Rgb(255, 235, 120);
const BIRD_WING: Rgb = Rgb(235, 160, 30);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(235, 90, 40);
const HILL_FAR: Rgb = Rgb(140, 210, 110);
const HILL_NEAR: Rgb = Rgb(100, 185, 70);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(222, 216, 149);
const PANEL_EDGE: Rgb = Rgb(140, 100, 60);
const ORANGE: Rgb = Rgb(255, 165, 0);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

struct PixelBuf {
    w: usize,
    h: usize, // terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn dim(&mut self) {
        for c in &mut self.px {
            *c = c.dim();
        }
    }

    /// Queues the whole buffer starting at the top-left cell. Color changes
    /// are only emitted when the color actually differs from the last cell.
    fn queue_to(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg: Option<Rgb> = None;
        let mut prev_bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.term()))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(top.term()))?;
                        prev_fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Draws `n` with its left edge at `x`.
fn draw_number(buf: &mut PixelBuf, x: i32, y: i32, n: u32, fg: Rgb) {
    for (i, ch) in n.to_string().bytes().enumerate() {
        draw_digit(buf, x + i as i32 * 4, y, ch - b'0', fg); // 3px glyph + 1px spacing
    }
}

fn number_width(n: u32) -> i32 {
    n.to_string().len() as i32 * 4 - 1
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

// ── World to pixel mapping ──────────────────────────────────────────────────

/// Maps playfield coordinates onto the pixel buffer. Each axis is scaled on
/// its own so the playfield always fills the terminal.
#[derive(Debug, Clone, Copy)]
struct View {
    sx: f64,
    sy: f64,
}

impl View {
    fn new(pw: usize, ph: usize, physics: &Physics) -> Self {
        Self {
            sx: pw as f64 / physics.window_width,
            sy: ph as f64 / physics.window_height,
        }
    }

    fn x(&self, wx: f64) -> i32 {
        (wx * self.sx).floor() as i32
    }

    fn y(&self, wy: f64) -> i32 {
        (wy * self.sy).floor() as i32
    }

    fn w(&self, ww: f64) -> i32 {
        ((ww * self.sx).round() as i32).max(1)
    }

    fn h(&self, wh: f64) -> i32 {
        ((wh * self.sy).round() as i32).max(1)
    }
}

// ── Renderer ────────────────────────────────────────────────────────────────

pub struct Renderer {
    buf: PixelBuf,
    view: View,
    physics: Physics,
    cols: u16,
    rows: u16,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16, physics: Physics) -> Self {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        Self {
            buf: PixelBuf::new(pw, ph),
            view: View::new(pw, ph, &physics),
            physics,
            cols,
            rows,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        self.buf.resize(pw, ph);
        self.view = View::new(pw, ph, &self.physics);
        self.cols = cols;
        self.rows = rows;
    }

    /// Paints `frame` into the pixel buffer. `wing` picks one of three wing
    /// positions.
    pub fn draw(&mut self, frame: &Frame, wing: usize) {
        let s = &frame.sim;
        let scroll = s.ticks as f64 * self.physics.pipe_speed * self.view.sx;

        self.draw_sky();
        self.draw_hills(scroll);
        self.draw_obstacle(s);
        self.draw_ground(scroll);
        self.draw_player(s, wing);

        match frame.phase {
            Phase::StartMenu => self.draw_title(),
            Phase::Running => self.draw_hud(s),
            Phase::Paused => {
                self.draw_hud(s);
                self.buf.dim();
            }
            Phase::GameOver { score, high_score } => {
                self.buf.dim();
                self.draw_score_panel(score, high_score);
            }
        }
    }

    /// Writes the pixel buffer and the phase's text overlay, then flushes.
    pub fn present(&self, out: &mut impl Write, frame: &Frame) -> io::Result<()> {
        self.buf.queue_to(out)?;
        match frame.phase {
            Phase::StartMenu => {
                let mid = self.rows / 2;
                self.text(out, mid + 1, "Press ENTER or SPACE to start", WHITE)?;
                self.text(out, mid + 3, "W / SPACE / UP flap    ESC pause", BIRD_HI)?;
            }
            Phase::Running => {}
            Phase::Paused => {
                let mid = self.rows / 2;
                self.text(out, mid.saturating_sub(2), "PAUSED", WHITE)?;
                self.text(out, mid, "[ESC] Resume", WHITE)?;
                self.text(out, mid + 1, "[R] Restart", WHITE)?;
                self.text(out, mid + 2, "[Q] Exit", Rgb(255, 110, 110))?;
            }
            Phase::GameOver { score, high_score } => {
                let top = self.rows / 4;
                self.text(out, top, "GAME OVER", WHITE)?;
                let bottom = self.rows - self.rows / 4;
                self.text(
                    out,
                    bottom,
                    &format!("Your Score: {score}   High Score: {high_score}"),
                    WHITE,
                )?;
                self.text(out, bottom + 1, "Play again? [Y]es / [N]o", ORANGE)?;
            }
        }
        out.flush()
    }

    fn text(&self, out: &mut impl Write, row: u16, msg: &str, fg: Rgb) -> io::Result<()> {
        if row >= self.rows {
            return Ok(());
        }
        let len = msg.chars().count() as u16;
        let col = self.cols.saturating_sub(len) / 2;
        queue!(
            out,
            cursor::MoveTo(col, row),
            style::SetForegroundColor(fg.term()),
            style::SetBackgroundColor(SHADOW.term()),
            style::Print(msg),
            style::ResetColor
        )
    }

    fn ground_px(&self) -> i32 {
        self.view.y(self.physics.ground_y)
    }

    fn draw_sky(&mut self) {
        let sky_h = self.ground_px().max(1);
        for y in 0..sky_h {
            let t = (y * 256 / sky_h) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            for x in 0..self.buf.w as i32 {
                self.buf.set(x, y, c);
            }
        }
    }

    fn draw_hills(&mut self, scroll: f64) {
        let base = self.ground_px();
        let amp = self.view.sy * 40.0;
        for x in 0..self.buf.w as i32 {
            let fx = (x as f64 + scroll * 0.2) * 0.04;
            let h = ((fx.sin() + 1.0) * 0.5 + (fx * 1.7).sin() * 0.25) * amp + amp * 0.5;
            for y in (base - h as i32)..base {
                self.buf.set(x, y, HILL_FAR);
            }
        }
        for x in 0..self.buf.w as i32 {
            let fx = (x as f64 + scroll * 0.4) * 0.06;
            let h = ((fx.sin() + 1.0) * 0.35 + (fx * 2.3).sin() * 0.15) * amp + amp * 0.3;
            for y in (base - h as i32)..base {
                self.buf.set(x, y, HILL_NEAR);
            }
        }
    }

    fn draw_ground(&mut self, scroll: f64) {
        let gy = self.ground_px();
        let ph = self.buf.h as i32;
        for x in 0..self.buf.w as i32 {
            let alt = ((x as f64 + scroll) as i32 / 3) % 2 == 0;
            self.buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
            self.buf.set(x, gy + 1, GRASS);
        }
        for y in (gy + 2)..ph {
            for x in 0..self.buf.w as i32 {
                let stripe = ((x as f64 + scroll) as i32 + (y - gy) * 2) % 12 < 6;
                self.buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }

    fn draw_obstacle(&mut self, s: &Snapshot) {
        let v = self.view;
        let px = v.x(s.obstacle_x);
        let pw = v.w(s.obstacle_width);
        let gap_top = v.y(f64::from(s.gap_top));
        let gap_bot = v.y(f64::from(s.gap_top + s.gap_size));
        let ground = self.ground_px();
        let cap_extra = (pw / 8).max(1);
        let cap_h = v.h(24.0).min(4);

        // Bodies
        for x in 0..pw {
            let c = pipe_shade(x, pw);
            for y in 0..gap_top - cap_h {
                self.buf.set(px + x, y, c);
            }
            for y in (gap_bot + cap_h)..ground {
                self.buf.set(px + x, y, c);
            }
        }
        // Caps
        let cap_w = pw + cap_extra * 2;
        for x in -cap_extra..(pw + cap_extra) {
            let c = pipe_shade(x + cap_extra, cap_w);
            for y in (gap_top - cap_h)..gap_top {
                self.buf.set(px + x, y, c);
            }
            for y in gap_bot..(gap_bot + cap_h) {
                self.buf.set(px + x, y, c);
            }
            self.buf.set(px + x, gap_top - 1, CAP_DARK);
            self.buf.set(px + x, gap_bot, CAP_DARK);
        }
    }

    fn draw_player(&mut self, s: &Snapshot, wing: usize) {
        let v = self.view;
        let p = &self.physics;
        let x = v.x(p.player_x);
        let y = v.y(s.player_y);
        let w = v.w(p.player_width).max(3);
        let h = v.h(p.player_height).max(2);

        // Nose up while climbing, down while falling.
        let tilt = (s.player_velocity / 8.0).clamp(-1.0, 1.0) as i32;

        // Body and highlight
        self.buf.fill_rect(x, y, w, h, BIRD_BODY);
        self.buf.fill_rect(x + 1, y, w - 2, 1.max(h / 4), BIRD_HI);

        // Wing: up, mid, down
        let wing_dy = [-1, 0, 1][wing % 3];
        let wing_w = (w / 3).max(1);
        let wing_h = (h / 3).max(1);
        self.buf
            .fill_rect(x, y + h / 2 + wing_dy, wing_w, wing_h, BIRD_WING);

        // Eye
        let eye = (w / 6).max(1);
        let ex = x + w - eye - 1 - w / 8;
        let ey = y + (h / 5).max(0);
        self.buf.fill_rect(ex, ey, eye, eye, BIRD_EYE);
        self.buf.set(ex + eye - 1, ey + eye - 1, BIRD_PUPIL);

        // Beak
        let beak_w = (w / 4).max(1);
        let beak_h = (h / 4).max(1);
        self.buf
            .fill_rect(x + w - 1, y + h / 2 + tilt, beak_w, beak_h, BIRD_BEAK);
    }

    fn draw_hud(&mut self, s: &Snapshot) {
        let x = self.view.x(20.0).max(1);
        let y = self.view.y(20.0).max(1);
        draw_number(&mut self.buf, x, y, s.score, WHITE);
        draw_number(&mut self.buf, x, y + 7, s.high_score, BIRD_BODY);
    }

    fn draw_title(&mut self) {
        let cx = self.buf.w as i32 / 2;
        let cy = self.buf.h as i32 / 4;
        let text = "FLAPPY";
        let char_w = 5;
        let char_h = 6;
        let sx = cx - text.len() as i32 * char_w / 2;
        for i in 0..text.len() as i32 {
            let bx = sx + i * char_w;
            self.buf.fill_rect(bx + 1, cy + 1, char_w - 1, char_h, SHADOW);
            self.buf.fill_rect(bx, cy, char_w - 1, char_h, ORANGE);
            self.buf.fill_rect(bx, cy, char_w - 1, 1, BIRD_HI);
        }
    }

    fn draw_score_panel(&mut self, score: u32, high_score: u32) {
        let cx = self.buf.w as i32 / 2;
        let cy = self.buf.h as i32 / 2;
        let panel_w = (number_width(score.max(high_score)) + 10).max(20);
        let panel_h = 18;
        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;

        self.buf
            .fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
        self.buf.fill_rect(px, py, panel_w, panel_h, PANEL);

        draw_number(&mut self.buf, cx - number_width(score) / 2, py + 3, score, WHITE);
        draw_number(
            &mut self.buf,
            cx - number_width(high_score) / 2,
            py + 10,
            high_score,
            ORANGE,
        );
    }
}
