//! Static object placements

use crate::core::types::{Mat4, Vec3};

/// Every placed object in the diorama
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneObject {
    Airplane,
    Island,
    Lamp,
    Boat,
    Table,
    ChairA,
    ChairB,
    HouseLamp,
    Apple,
    ParallaxFloor,
}

impl SceneObject {
    pub const ALL: [SceneObject; 10] = [
        SceneObject::Airplane,
        SceneObject::Island,
        SceneObject::Lamp,
        SceneObject::Boat,
        SceneObject::Table,
        SceneObject::ChairA,
        SceneObject::ChairB,
        SceneObject::HouseLamp,
        SceneObject::Apple,
        SceneObject::ParallaxFloor,
    ];

    /// Opaque model pass, in draw order
    pub const MODELS: [SceneObject; 9] = [
        SceneObject::Airplane,
        SceneObject::Island,
        SceneObject::Lamp,
        SceneObject::Boat,
        SceneObject::Table,
        SceneObject::ChairA,
        SceneObject::ChairB,
        SceneObject::HouseLamp,
        SceneObject::Apple,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// OBJ file relative to the objects directory. The floor is a generated quad.
    pub fn model_path(self) -> Option<&'static str> {
        match self {
            SceneObject::Airplane => Some("airplane/piper_pa18.obj"),
            SceneObject::Island => Some("SmallTropicalIsland/Small_Tropical_Island.obj"),
            SceneObject::Lamp => Some("Street_lamp_7_OBJ/Street_Lamp_7.obj"),
            SceneObject::Boat => Some("boat/boat.obj"),
            SceneObject::Table => Some("table/table.obj"),
            // Both chairs share one mesh
            SceneObject::ChairA | SceneObject::ChairB => Some("chair/chair.obj"),
            SceneObject::HouseLamp => Some("house_lamp/lamp.obj"),
            SceneObject::Apple => Some("apple/apple.obj"),
            SceneObject::ParallaxFloor => None,
        }
    }
}

/// Order the placement factors are multiplied in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOrder {
    /// `translate * scale * rotate`
    Tsr,
    /// `translate * rotate * scale`
    Trs,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub scale: f32,
    /// Euler angles in degrees
    pub rotation_degrees: Vec3,
    pub order: TransformOrder,
}

impl Placement {
    const fn tsr(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale,
            rotation_degrees: Vec3::ZERO,
            order: TransformOrder::Tsr,
        }
    }

    const fn trs(position: Vec3, scale: f32, rotation_degrees: Vec3) -> Self {
        Self {
            position,
            scale,
            rotation_degrees,
            order: TransformOrder::Trs,
        }
    }

    fn rotation(&self) -> Mat4 {
        let r = self.rotation_degrees;
        Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_z(r.z.to_radians())
    }

    pub fn model_matrix(&self) -> Mat4 {
        let t = Mat4::from_translation(self.position);
        let s = Mat4::from_scale(Vec3::splat(self.scale));
        match self.order {
            TransformOrder::Tsr => t * s * self.rotation(),
            TransformOrder::Trs => t * self.rotation() * s,
        }
    }
}

fn default_placement(object: SceneObject) -> Placement {
    match object {
        // Orbit base; the flight controller builds the full transform
        SceneObject::Airplane => Placement::tsr(Vec3::new(200.0, 150.0, 30.0), 3.5),
        SceneObject::Island => Placement::tsr(Vec3::new(0.0, -100.0, 0.0), 0.7),
        SceneObject::Lamp => Placement::tsr(Vec3::new(-10.0, -80.0, -10.0), 10.0),
        SceneObject::Boat => Placement::trs(Vec3::new(60.0, -99.0, 40.0), 2.0, Vec3::new(0.0, -30.0, 0.0)),
        SceneObject::Table => Placement::tsr(Vec3::new(5.0, -86.5, 12.0), 3.0),
        SceneObject::ChairA => Placement::trs(Vec3::new(2.0, -86.5, 14.0), 3.0, Vec3::new(0.0, 90.0, 0.0)),
        SceneObject::ChairB => Placement::trs(Vec3::new(8.0, -86.5, 10.0), 3.0, Vec3::new(0.0, -90.0, 0.0)),
        SceneObject::HouseLamp => Placement::tsr(Vec3::new(5.0, -80.0, 12.0), 1.0),
        SceneObject::Apple => Placement::tsr(Vec3::new(5.0, -83.1, 12.0), 0.5),
        SceneObject::ParallaxFloor => {
            Placement::trs(Vec3::new(5.0, -86.9, 12.0), 6.0, Vec3::new(-90.0, 0.0, 0.0))
        }
    }
}

pub const HEIGHT_SCALE_RANGE: (f32, f32) = (0.0, 1.0);

/// Placement table plus the parallax floor depth scale
#[derive(Debug, Clone)]
pub struct SceneComposer {
    placements: [Placement; SceneObject::ALL.len()],
    height_scale: f32,
    height_scale_step: f32,
}

impl SceneComposer {
    pub fn new(height_scale: f32, height_scale_step: f32) -> Self {
        Self {
            placements: SceneObject::ALL.map(default_placement),
            height_scale: height_scale.clamp(HEIGHT_SCALE_RANGE.0, HEIGHT_SCALE_RANGE.1),
            height_scale_step,
        }
    }

    pub fn placement(&self, object: SceneObject) -> &Placement {
        &self.placements[object.index()]
    }

    pub fn placement_mut(&mut self, object: SceneObject) -> &mut Placement {
        &mut self.placements[object.index()]
    }

    /// Model matrix for a static object
    pub fn model_matrix(&self, object: SceneObject) -> Mat4 {
        self.placement(object).model_matrix()
    }

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    /// Step the height scale up (`+1`) or down (`-1`), clamped
    pub fn step_height_scale(&mut self, direction: f32) {
        let next = self.height_scale + direction.signum() * self.height_scale_step;
        self.height_scale = next.clamp(HEIGHT_SCALE_RANGE.0, HEIGHT_SCALE_RANGE.1);
    }
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self::new(0.1, 0.005)
    }
}
