use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(6, 6, 8);
pub const BG_WIDGET: Color32 = Color32::from_rgb(16, 16, 20);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(26, 26, 34);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(170, 170, 174);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(108, 108, 114);

/// Filter colours of the glasses.
pub const ACCENT_RED: Color32 = Color32::from_rgb(214, 48, 48);
pub const ACCENT_CYAN: Color32 = Color32::from_rgb(40, 196, 214);

pub const ACCENT_GREEN: Color32 = Color32::from_rgb(46, 172, 35);
pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(172, 117, 35);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(40, 60, 70, 77);

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.extreme_bg_color = Color32::BLACK;
    visuals.faint_bg_color = BG_PANEL;
    visuals.error_fg_color = ACCENT_RED;
    visuals.warn_fg_color = ACCENT_ORANGE;
    visuals.slider_trailing_fill = true;
    visuals.selection.bg_fill = ACCENT_CYAN.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_CYAN);

    let widgets = &mut visuals.widgets;
    for (w, fill) in [
        (&mut widgets.noninteractive, BG_PANEL),
        (&mut widgets.inactive, BG_WIDGET),
        (&mut widgets.hovered, BG_WIDGET_HOVER),
        (&mut widgets.active, BG_WIDGET_HOVER),
        (&mut widgets.open, BG_WIDGET_HOVER),
    ] {
        w.bg_fill = BG_WIDGET;
        w.weak_bg_fill = fill;
        w.rounding = Rounding::same(4.0);
    }
    widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT_CYAN);
    widgets.active.bg_stroke = Stroke::new(2.0, ACCENT_RED);

    let mut style = (*ctx.style()).clone();
    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);
    style.spacing.slider_width = 180.0;
    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
