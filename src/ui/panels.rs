use egui::{Color32, Context, RichText, ScrollArea, Ui};

use crate::ui::state::{
    CONVERGENCE_RANGE, EYE_SEPARATION_RANGE, FOV_RANGE, FrameStats, MAX_R_RANGE, NEAR_RANGE,
    STEP_RANGE, UiState,
};
use crate::ui::theme::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiActions {
    pub rebuild_surface: bool,
    pub reset_rotation: bool,
    pub vsync_changed: bool,
}

pub fn draw_side_panel(ctx: &Context, state: &mut UiState, stats: &FrameStats) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(280.0)
        .max_width(380.0)
        .default_width(300.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Anaglyph").strong().color(ACCENT_RED));
                    ui.heading(RichText::new("Surface").strong().color(ACCENT_CYAN));
                });
                ui.label(
                    RichText::new("Use red/cyan glasses")
                        .color(TEXT_MUTED)
                        .size(11.0),
                );
                ui.add_space(16.0);

                section_header(ui, "SURFACE");
                let mut geometry_changed = false;
                ui.horizontal(|ui| {
                    ui.label("Max r:");
                    geometry_changed |= ui
                        .add(egui::Slider::new(&mut state.max_r, MAX_R_RANGE).fixed_decimals(2))
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Step:");
                    geometry_changed |= ui
                        .add(
                            egui::Slider::new(&mut state.step, STEP_RANGE)
                                .logarithmic(true)
                                .fixed_decimals(3),
                        )
                        .changed();
                });
                if geometry_changed {
                    state.surface_needs_rebuild = true;
                    actions.rebuild_surface = true;
                }
                ui.add_space(16.0);

                section_header(ui, "STEREO");
                egui::Grid::new("stereo")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Eye separation");
                        ui.add(egui::Slider::new(
                            &mut state.eye_separation,
                            EYE_SEPARATION_RANGE,
                        ));
                        ui.end_row();

                        ui.label("Convergence");
                        ui.add(egui::Slider::new(&mut state.convergence, CONVERGENCE_RANGE));
                        ui.end_row();

                        ui.label("FOV");
                        ui.add(egui::Slider::new(&mut state.fov, FOV_RANGE).suffix(" rad"));
                        ui.end_row();

                        ui.label("Near");
                        ui.add(egui::Slider::new(&mut state.near, NEAR_RANGE));
                        ui.end_row();
                    });
                ui.add_space(8.0);
                if ui.button("Reset rotation").clicked() {
                    actions.reset_rotation = true;
                }
                ui.add_space(16.0);

                ui.separator();
                ui.add_space(12.0);

                section_header(ui, "DISPLAY");
                ui.horizontal(|ui| {
                    if ui.checkbox(&mut state.vsync_enabled, "VSync").changed() {
                        actions.vsync_changed = true;
                    }
                    ui.checkbox(&mut state.show_stats, "Stats");
                });
                ui.add_space(16.0);

                if state.show_stats {
                    stats_panel(ui, stats);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn stats_panel(ui: &mut Ui, stats: &FrameStats) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id =
                Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

            egui::Grid::new("stats")
                .num_columns(2)
                .spacing([20.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("FPS").color(TEXT_MUTED));
                    ui.label(RichText::new(format!("{:.0}", stats.fps)).color(fps_color(stats.fps)));
                    ui.end_row();

                    ui.label(RichText::new("Frame ms").color(TEXT_MUTED));
                    ui.label(format!("{:.2}", stats.frame_ms));
                    ui.end_row();

                    ui.label(RichText::new("Triangles").color(TEXT_MUTED));
                    ui.label(RichText::new(fmt_num(stats.triangles)).color(ACCENT_CYAN));
                    ui.end_row();

                    ui.label(RichText::new("Video").color(TEXT_MUTED));
                    if stats.video_live {
                        ui.label(format!("{}x{}", stats.video_size.0, stats.video_size.1));
                    } else {
                        ui.label(RichText::new("waiting").color(ACCENT_ORANGE));
                    }
                    ui.end_row();
                });
        });
}

fn fps_color(fps: f32) -> Color32 {
    if fps >= 60.0 {
        ACCENT_GREEN
    } else if fps >= 30.0 {
        ACCENT_ORANGE
    } else {
        ACCENT_RED
    }
}

pub fn draw_help_overlay(ctx: &Context, yaw: f32, pitch: f32) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id =
                        Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(
                        RichText::new("LMB+Drag - Rotate | Double-click/R - Reset | Esc - Quit")
                            .color(TEXT_MUTED),
                    );
                    ui.label(
                        RichText::new(format!(
                            "Yaw: {:.0}° | Pitch: {:.0}°",
                            yaw.to_degrees(),
                            pitch.to_degrees()
                        ))
                        .color(TEXT_MUTED),
                    );
                });
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn idle_panel_requests_no_rebuild() {
        let args = crate::config::Args::try_parse_from(["anaglyph-surface"]).unwrap();
        let mut state = UiState::from_args(&args);
        assert!(state.surface_needs_rebuild);

        let ctx = Context::default();
        let mut actions = UiActions::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = draw_side_panel(ctx, &mut state, &FrameStats::default());
        });

        assert_eq!(actions, UiActions::default());
        assert!(state.surface_needs_rebuild);
    }

    #[test]
    fn formats_counts() {
        assert_eq!(fmt_num(999), "999");
        assert_eq!(fmt_num(12_340), "12.3K");
        assert_eq!(fmt_num(2_500_000), "2.50M");
    }

    #[test]
    fn fps_color_thresholds() {
        assert_eq!(fps_color(120.0), ACCENT_GREEN);
        assert_eq!(fps_color(45.0), ACCENT_ORANGE);
        assert_eq!(fps_color(10.0), ACCENT_RED);
    }
}
