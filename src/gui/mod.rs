//! GUI panels
//!
//! Two egui windows: "Physics Settings" edits the live [`PhysicsSettings`]
//! in place, "Controls" spawns and clears objects. Button presses are
//! returned as [`GuiAction`]s, which [`apply_action`] carries out on the
//! world once the frame is done.

mod integration;

pub use integration::{EguiFrameOutput, EguiIntegration};

use egui::{CollapsingHeader, Slider};
use shakebox_physics::{PhysicsSettings, PhysicsWorld, ShapeKind};

/// Something the user asked for in the GUI this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiAction {
    Spawn(ShapeKind),
    ClearAll,
}

/// Draw both panels, returning the actions requested this frame
pub fn show(
    ctx: &egui::Context,
    settings: &mut PhysicsSettings,
    object_count: usize,
) -> Vec<GuiAction> {
    let mut actions = Vec::new();

    egui::Window::new("Physics Settings")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| settings_panel(ui, settings));

    egui::Window::new("Controls")
        .default_pos([10.0, 420.0])
        .show(ctx, |ui| controls_panel(ui, object_count, &mut actions));

    actions
}

/// Carry out a GUI action on the world; spawns appear at `spawn_position`
pub fn apply_action(
    action: GuiAction,
    world: &mut PhysicsWorld,
    settings: &PhysicsSettings,
    spawn_position: [f32; 3],
) {
    match action {
        GuiAction::Spawn(kind) => {
            world.spawn(kind, spawn_position, settings);
        }
        GuiAction::ClearAll => {
            world.clear_objects();
        }
    }
}

fn settings_panel(ui: &mut egui::Ui, settings: &mut PhysicsSettings) {
    CollapsingHeader::new("Force Settings")
        .default_open(true)
        .show(ui, |ui| {
            ui.add(
                Slider::new(&mut settings.force_scale, 0.001..=0.01)
                    .text("Force Scale")
                    .fixed_decimals(5),
            );
            ui.add(Slider::new(&mut settings.horizontal_scale, 0.1..=2.0).text("Horizontal Force"));
            ui.add(Slider::new(&mut settings.vertical_scale, 0.1..=2.0).text("Vertical Force"));
            ui.add(Slider::new(&mut settings.z_scale, 0.1..=2.0).text("Z Force"));
            ui.add(Slider::new(&mut settings.max_torque, 0.5..=20.0).text("Max Torque"));
        });

    CollapsingHeader::new("Physics Properties")
        .default_open(true)
        .show(ui, |ui| {
            ui.add(Slider::new(&mut settings.restitution, 0.0..=1.0).text("Restitution"));
            ui.add(Slider::new(&mut settings.friction, 0.0..=1.0).text("Friction"));
            ui.add(
                Slider::new(&mut settings.rolling_friction, 0.0..=1.0).text("Rolling Friction"),
            );
            ui.add(
                Slider::new(&mut settings.spinning_friction, 0.0..=1.0).text("Spinning Friction"),
            );
            ui.add(Slider::new(&mut settings.damping, 0.0..=1.0).text("Air Resistance"));
        });

    CollapsingHeader::new("Object Properties")
        .default_open(true)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Cube Color");
                ui.color_edit_button_rgb(&mut settings.cube_color);
            });
            ui.add(Slider::new(&mut settings.mass_scale, 0.1..=2.0).text("Mass Scale"));
        });
}

fn controls_panel(ui: &mut egui::Ui, object_count: usize, actions: &mut Vec<GuiAction>) {
    ui.horizontal(|ui| {
        for kind in ShapeKind::ALL {
            if ui.button(format!("Spawn {}", kind.label())).clicked() {
                actions.push(GuiAction::Spawn(kind));
            }
        }
    });
    if ui.button("Clear All Objects").clicked() {
        actions.push(GuiAction::ClearAll);
    }
    ui.separator();
    ui.label(format!("Objects: {}", object_count));
}
