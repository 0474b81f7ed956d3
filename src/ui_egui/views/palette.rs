use crate::scheduling::MeetingStatus;
use egui::Color32;

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Colors shared by the time grid and the month grid.
#[derive(Clone, Copy)]
pub struct GridPalette {
    pub background: Color32,
    pub today_bg: Color32,
    pub other_month_bg: Color32,
    pub line: Color32,
    pub text: Color32,
    pub muted_text: Color32,
    pub drop_target: Color32,
    pub now_line: Color32,
    pub chip_text: Color32,
}

impl GridPalette {
    pub fn new(is_dark: bool) -> Self {
        let (background, line, text) = if is_dark {
            (
                Color32::from_rgb(32, 33, 36),
                Color32::from_rgb(70, 72, 78),
                Color32::from_rgb(225, 225, 230),
            )
        } else {
            (
                Color32::from_rgb(252, 252, 253),
                Color32::from_rgb(218, 220, 224),
                Color32::from_rgb(40, 40, 45),
            )
        };
        let accent = Color32::from_rgb(66, 133, 244);

        Self {
            background,
            today_bg: blend(background, accent, if is_dark { 0.18 } else { 0.08 }),
            other_month_bg: blend(background, line, 0.35),
            line,
            text,
            muted_text: blend(text, background, 0.5),
            drop_target: with_alpha(accent, if is_dark { 90 } else { 60 }),
            now_line: Color32::from_rgb(234, 67, 53),
            chip_text: Color32::WHITE,
        }
    }

    /// Chip fill for a derived status. Terminal meetings are faded.
    pub fn status_fill(&self, status: MeetingStatus) -> Color32 {
        let (r, g, b) = status.rgb();
        let fill = Color32::from_rgb(r, g, b);
        if status.is_terminal() {
            blend(fill, self.background, 0.35)
        } else {
            fill
        }
    }
}
