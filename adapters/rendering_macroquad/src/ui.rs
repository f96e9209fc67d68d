//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use facility_narrative_core::DashboardStatus;
use facility_narrative_rendering::DashboardPresentation;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

const CARD_WIDTH: f32 = 340.0;
const CARD_HEIGHT: f32 = 190.0;
const CARD_MARGIN: f32 = 32.0;
const CARD_BACKGROUND: Color = Color::new(0.08, 0.11, 0.14, 0.86);
const SUBTEXT_SHADE: f32 = 0.78;

/// Data needed to lay out the dashboard card for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DashboardUiContext<'scene> {
    /// Width of the screen, used to pin the card to the right edge.
    pub screen_width: f32,
    /// Card content.
    pub card: &'scene DashboardPresentation,
    /// Whether the user holds the camera, reflected on the button label.
    pub manual_camera: bool,
}

pub(crate) fn status_color(status: DashboardStatus) -> Color {
    match status {
        DashboardStatus::None => Color::new(0.5, 0.5, 0.5, 0.0),
        DashboardStatus::Red => Color::from_rgba(229, 72, 77, 255),
        DashboardStatus::Amber => Color::from_rgba(245, 165, 36, 255),
        DashboardStatus::Green => Color::from_rgba(48, 164, 108, 255),
    }
}

fn status_label(status: DashboardStatus) -> &'static str {
    match status {
        DashboardStatus::None => "",
        DashboardStatus::Red => "Status: critical",
        DashboardStatus::Amber => "Status: investigating",
        DashboardStatus::Green => "Status: nominal",
    }
}

/// Draws the dashboard card; returns whether the camera button was pressed.
pub(crate) fn draw_dashboard_ui(ui: &mut Ui, context: DashboardUiContext<'_>) -> bool {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;
    skin.window_style = ui
        .style_builder()
        .color(CARD_BACKGROUND)
        .color_hovered(CARD_BACKGROUND)
        .color_clicked(CARD_BACKGROUND)
        .color_selected(CARD_BACKGROUND)
        .color_selected_hovered(CARD_BACKGROUND)
        .color_inactive(CARD_BACKGROUND)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(8.0, 8.0, 4.0, 4.0))
        .build();
    ui.push_skin(&skin);

    let origin = Vec2::new(
        (context.screen_width - CARD_WIDTH - CARD_MARGIN).max(0.0),
        CARD_MARGIN,
    );
    let card = context.card;
    let mut pressed = false;
    let _ = ui.window(
        hash!("dashboard"),
        origin,
        Vec2::new(CARD_WIDTH, CARD_HEIGHT),
        |ui| {
            label(ui, status_label(card.status), status_color(card.status));
            for field in &card.fields {
                if field.title_opacity > f32::EPSILON {
                    label(ui, field.title, Color::new(1.0, 1.0, 1.0, field.title_opacity));
                }
            }
            for field in &card.fields {
                if field.subtext_opacity > f32::EPSILON {
                    let shade = SUBTEXT_SHADE;
                    label(
                        ui,
                        field.subtext,
                        Color::new(shade, shade, shade, field.subtext_opacity),
                    );
                }
            }
            let button = if context.manual_camera {
                "Follow story (O)"
            } else {
                "Free camera (O)"
            };
            pressed = ui.button(None, button);
        },
    );

    ui.pop_skin();
    pressed
}

/// Label in its own skin so every line can carry its own fade.
fn label(ui: &mut Ui, text: &str, color: Color) {
    let mut skin = ui.default_skin();
    skin.label_style = ui
        .style_builder()
        .text_color(color)
        .text_color_hovered(color)
        .text_color_clicked(color)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    ui.push_skin(&skin);
    ui.label(None, text);
    ui.pop_skin();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_status_is_transparent() {
        assert_eq!(status_color(DashboardStatus::None).a, 0.0);
        assert_eq!(status_label(DashboardStatus::None), "");
    }

    #[test]
    fn every_visible_status_has_a_distinct_colour() {
        let colors = [
            status_color(DashboardStatus::Red),
            status_color(DashboardStatus::Amber),
            status_color(DashboardStatus::Green),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(colors.iter().all(|color| color.a == 1.0));
    }
}
