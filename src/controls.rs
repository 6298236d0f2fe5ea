//! Viewer controls.
//!
//! Each [`ViewerControl`] mutates exactly one light or camera property and
//! returns the value that was actually applied, formatted for display.

use log::{debug, warn};

use crate::{
    data_structures::light::Color,
    lights::RigLight,
    resources::ModelFormat,
    session::ViewerSession,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewerControl {
    /// Selects the format. The caller starts the load afterwards.
    SwitchFormat(ModelFormat),
    AmbientIntensity(f32),
    DirectionalIntensity(f32),
    AmbientColor(Color),
    DirectionalColor(Color),
    /// One coordinate of the directional light.
    LightPosition(Axis, f32),
    /// Back to the pose of the last framing pass.
    ResetCamera,
}

fn clamp(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

impl ViewerSession {
    pub fn apply(&mut self, control: ViewerControl) -> String {
        let ranges = self.config.controls;
        let lights = self.lights;
        let shown = match control {
            ViewerControl::SwitchFormat(format) => {
                self.format = format;
                format.to_string()
            }
            ViewerControl::AmbientIntensity(value) => {
                self.set_intensity(RigLight::Ambient, clamp(value, ranges.intensity))
            }
            ViewerControl::DirectionalIntensity(value) => {
                self.set_intensity(RigLight::Directional, clamp(value, ranges.intensity))
            }
            ViewerControl::AmbientColor(color) => self.set_color(RigLight::Ambient, color),
            ViewerControl::DirectionalColor(color) => self.set_color(RigLight::Directional, color),
            ViewerControl::LightPosition(axis, value) => {
                let value = clamp(value, ranges.position);
                if let Some(position) = lights.directional_position_mut(&mut self.scene) {
                    match axis {
                        Axis::X => position.x = value,
                        Axis::Y => position.y = value,
                        Axis::Z => position.z = value,
                    }
                }
                format!("{value:.1}")
            }
            ViewerControl::ResetCamera => match self.framed {
                Some(framed) => {
                    framed.apply_to(&mut self.camera);
                    let p = framed.position;
                    format!("{:.2}, {:.2}, {:.2}", p.x, p.y, p.z)
                }
                None => {
                    warn!("Nothing to reset: no model has been framed yet.");
                    String::new()
                }
            },
        };
        debug!("{:?} -> {}", control, shown);
        shown
    }

    fn set_intensity(&mut self, which: RigLight, value: f32) -> String {
        if let Some(light) = self.lights.light_mut(&mut self.scene, which) {
            light.intensity = value;
        }
        format!("{value:.1}")
    }

    fn set_color(&mut self, which: RigLight, color: Color) -> String {
        if let Some(light) = self.lights.light_mut(&mut self.scene, which) {
            light.color = color;
        }
        color.to_string()
    }
}
