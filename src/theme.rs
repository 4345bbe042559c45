use eframe::egui;
use egui::{Color32, CornerRadius, Stroke, Visuals};

/// Colors the story list draws with, layered over egui's stock visuals.
pub struct AppTheme {
    pub is_dark: bool,
    pub card_background: Color32,
    pub text: Color32,
    pub secondary_text: Color32,
    pub highlight: Color32,
    pub error: Color32,
    pub separator: Color32,
    pub points_high: Color32,
    pub points_medium: Color32,
    pub points_low: Color32,
    pub button_background: Color32,
    pub button_foreground: Color32,
}

impl AppTheme {
    pub fn for_mode(is_dark: bool) -> Self {
        let base = Self::base_visuals(is_dark);
        let text = base.text_color();
        let separator = base.widgets.noninteractive.bg_stroke.color;
        let button_background = base.widgets.inactive.weak_bg_fill;

        if is_dark {
            Self {
                is_dark,
                card_background: base.extreme_bg_color,
                text,
                secondary_text: base.weak_text_color(),
                highlight: Color32::from_rgb(255, 110, 20),
                error: Color32::from_rgb(229, 92, 92),
                separator,
                points_high: Color32::from_rgb(102, 187, 106),
                points_medium: Color32::from_rgb(240, 180, 40),
                points_low: base.weak_text_color(),
                button_background,
                button_foreground: text,
            }
        } else {
            Self {
                is_dark,
                card_background: Color32::WHITE,
                text,
                secondary_text: base.weak_text_color(),
                highlight: Color32::from_rgb(214, 84, 0),
                error: Color32::from_rgb(176, 32, 32),
                separator,
                points_high: Color32::from_rgb(36, 120, 48),
                points_medium: Color32::from_rgb(170, 116, 0),
                points_low: base.weak_text_color(),
                button_background,
                button_foreground: text,
            }
        }
    }

    fn base_visuals(is_dark: bool) -> Visuals {
        if is_dark {
            Visuals::dark()
        } else {
            Visuals::light()
        }
    }

    pub fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut visuals = Self::base_visuals(self.is_dark);

        visuals.hyperlink_color = self.highlight;
        visuals.selection.bg_fill = self.highlight;
        visuals.selection.stroke = Stroke::new(1.0, self.highlight);
        visuals.widgets.active.bg_fill = self.highlight;
        visuals.window_corner_radius = CornerRadius::same(8);
        visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        visuals.widgets.hovered.corner_radius = CornerRadius::same(4);

        ctx.set_visuals(visuals);
    }

    pub fn points_color(&self, points: i64) -> Color32 {
        if points >= 300 {
            self.points_high
        } else if points >= 100 {
            self.points_medium
        } else {
            self.points_low
        }
    }

    pub fn card_stroke(&self, points: i64) -> Stroke {
        if points >= 300 {
            Stroke::new(1.5, self.points_high)
        } else {
            Stroke::new(1.0, self.separator)
        }
    }
}
