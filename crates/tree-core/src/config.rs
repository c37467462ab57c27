//! Startup configuration for the scene.
//!
//! All options are plain numbers so front-ends can map them onto flags or
//! sliders one to one. Values are fixed for a session except through the
//! explicit rebuild operations on `Scene` and `FallingField`.

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub tree_count: usize,
    pub dust_count: usize,
    pub tree_height: f32,
    pub tree_radius: f32,

    pub falling_count: usize,
    pub falling_speed: f32,
    pub falling_range_x: f32,
    pub falling_range_z: f32,
    pub falling_top_y: f32,
    pub falling_bottom_y: f32,

    pub camera_z: f32,
    pub rotation_speed: f32,
    pub grab_radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tree_count: 3000,
            dust_count: 5000,
            tree_height: 24.0,
            tree_radius: 8.0,
            falling_count: 1000,
            falling_speed: 2.5,
            falling_range_x: 60.0,
            falling_range_z: 30.0,
            falling_top_y: 40.0,
            falling_bottom_y: -20.0,
            camera_z: 50.0,
            rotation_speed: 1.4,
            grab_radius: 0.55,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("tree_height", self.tree_height),
            ("tree_radius", self.tree_radius),
            ("falling_speed", self.falling_speed),
            ("falling_range_x", self.falling_range_x),
            ("falling_range_z", self.falling_range_z),
            ("falling_top_y", self.falling_top_y),
            ("falling_bottom_y", self.falling_bottom_y),
            ("camera_z", self.camera_z),
            ("rotation_speed", self.rotation_speed),
            ("grab_radius", self.grab_radius),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        positive("tree_height", self.tree_height)?;
        positive("grab_radius", self.grab_radius)?;
        positive("camera_z", self.camera_z)?;
        non_negative("tree_radius", self.tree_radius)?;
        non_negative("falling_speed", self.falling_speed)?;
        non_negative("falling_range_x", self.falling_range_x)?;
        non_negative("falling_range_z", self.falling_range_z)?;
        non_negative("rotation_speed", self.rotation_speed)?;

        if self.falling_top_y <= self.falling_bottom_y {
            return Err(ConfigError::InvertedFallBounds {
                top: self.falling_top_y,
                bottom: self.falling_bottom_y,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value <= 0.0 {
        return Err(ConfigError::TooSmall {
            name,
            min: 0.0,
            value,
        });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
