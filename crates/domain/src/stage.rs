/// Fixed lighting and framing for the template viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub background: u32,
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    /// Translation applied to every loaded model.
    pub model_offset: [f32; 3],
    pub ground: Option<GroundPlane>,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Shines from here toward the origin.
    pub position: [f32; 3],
    pub intensity: f32,
    pub cast_shadow: bool,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light.
    pub fn to_light(&self) -> [f32; 3] {
        let [x, y, z] = self.position;
        let length = (x * x + y * y + z * z).sqrt();
        if length <= f32::EPSILON {
            return [0.0, 1.0, 0.0];
        }
        [x / length, y / length, z / length]
    }
}

/// Horizontal shadow catcher under the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub height: f32,
    pub half_extent: f32,
    pub color: [f32; 4],
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            background: 0xF5F5F5,
            ambient: AmbientLight { intensity: 0.6 },
            directional: DirectionalLight {
                position: [2.0, 4.0, 2.0],
                intensity: 1.1,
                cast_shadow: true,
            },
            model_offset: [0.0, -0.25, 0.0],
            ground: Some(GroundPlane {
                height: -0.25,
                half_extent: 2.5,
                color: [0.96, 0.96, 0.96, 1.0],
            }),
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_direction_is_normalized() {
        let stage = Stage::default();
        let [x, y, z] = stage.directional.to_light();
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-5);
        assert!(y > x && y > z);
    }
}
