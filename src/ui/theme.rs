//! Color themes and styling for the viewer.
//!
//! Surfaces are layered from the app background (`surface[0]`) up to hover
//! and selection states (`surface[4]`).

use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct ViewerTheme {
    pub name: String,
    pub surface: [Color32; 5],
    pub accent: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub border_medium: Color32,
    /// Highlight behind the entry message.
    pub entry_highlight: Color32,
}

impl ViewerTheme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            surface: [
                Color32::from_rgb(10, 10, 15), // app background
                Color32::from_rgb(19, 19, 26), // sidebar
                Color32::from_rgb(28, 28, 38), // timeline
                Color32::from_rgb(37, 37, 50), // hover, attachment cards
                Color32::from_rgb(46, 46, 62), // selection
            ],
            accent: Color32::from_rgb(88, 101, 242),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(185, 187, 190),
            text_muted: Color32::from_rgb(114, 118, 125),
            border_medium: Color32::from_rgb(47, 49, 54),
            entry_highlight: Color32::from_rgba_unmultiplied(250, 166, 26, 28),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            surface: [
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(246, 246, 247),
                Color32::from_rgb(242, 243, 245),
                Color32::from_rgb(227, 229, 232),
                Color32::from_rgb(212, 215, 220),
            ],
            accent: Color32::from_rgb(88, 101, 242),
            text_primary: Color32::from_rgb(6, 6, 7),
            text_secondary: Color32::from_rgb(79, 86, 96),
            text_muted: Color32::from_rgb(116, 127, 141),
            border_medium: Color32::from_rgb(210, 213, 219),
            entry_highlight: Color32::from_rgba_unmultiplied(250, 166, 26, 48),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn visuals(&self) -> egui::Visuals {
        if self.name == "Light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        }
    }
}

pub fn configure_text_styles() -> BTreeMap<TextStyle, FontId> {
    use FontFamily::{Monospace, Proportional};

    [
        (TextStyle::Small, FontId::new(10.0, Proportional)),
        (TextStyle::Body, FontId::new(14.0, Proportional)),
        (TextStyle::Button, FontId::new(13.0, Proportional)),
        (TextStyle::Heading, FontId::new(16.0, Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, Monospace)),
        (TextStyle::Name("timestamp".into()), FontId::new(11.0, Monospace)),
        (TextStyle::Name("section_header".into()), FontId::new(11.0, Proportional)),
    ]
    .into()
}

/// Apply fonts and spacing once at startup.
pub fn apply_app_style(ctx: &egui::Context, theme: &ViewerTheme) {
    ctx.set_visuals(theme.visuals());
    let mut style = (*ctx.style()).clone();
    style.text_styles = configure_text_styles();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.visuals.selection.bg_fill = Color32::from_rgba_unmultiplied(88, 101, 242, 100);
    ctx.set_style(style);
}

const USER_COLORS: [Color32; 8] = [
    Color32::from_rgb(231, 76, 60),
    Color32::from_rgb(46, 204, 113),
    Color32::from_rgb(52, 152, 219),
    Color32::from_rgb(155, 89, 182),
    Color32::from_rgb(241, 196, 15),
    Color32::from_rgb(230, 126, 34),
    Color32::from_rgb(26, 188, 156),
    Color32::from_rgb(236, 100, 166),
];

/// Stable color for a user name (FNV-1a).
pub fn user_color(name: &str) -> Color32 {
    let mut hash: u64 = 1469598103934665603u64;
    for b in name.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(1099511628211u64);
    }
    USER_COLORS[(hash as usize) % USER_COLORS.len()]
}

/// Circular avatar with the user's initial.
pub fn render_avatar(ui: &mut egui::Ui, name: &str, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), size / 2.0, user_color(name));

    let initial: String = name.chars().next().unwrap_or('?').to_uppercase().collect();
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initial,
        FontId::new(size * 0.45, FontFamily::Proportional),
        Color32::WHITE,
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_color_deterministic() {
        assert_eq!(user_color("alice"), user_color("alice"));
    }

    #[test]
    fn test_theme_by_name() {
        assert_eq!(ViewerTheme::from_name("light").name, "Light");
        assert_eq!(ViewerTheme::from_name("whatever").name, "Dark");
        assert!(!ViewerTheme::light().visuals().dark_mode);
    }
}
