//! Cascaded sun-light shadow camera
//!
//! Fits one orthographic light camera per cascade around a slice of the
//! viewer frustum. Fitting runs in four steps:
//!
//! 1. **Depth range** - the scene bound's faces are clipped against the
//!    viewer frustum and the survivors give the depth range that actually
//!    holds geometry, usually much tighter than the camera's near/far.
//! 2. **Splits** - the range is cut into cascades by blending a
//!    logarithmic and a uniform split.
//! 3. **Light cameras** - each cascade's eight corners are boxed in the
//!    light frame; the light backs away along the sun direction until the
//!    whole box is in front of it.
//! 4. **Scene crop** - each light projection is rescaled so the projected
//!    scene bound fills clip space, then texture-coordinate transforms from
//!    cascade 0 to every other cascade are derived.

use crate::bounding::BoundingVolume;
use crate::config::CascadeConfig;
use crate::error::KernelError;
use crate::foundation::math::{constants, Mat4, Mat4Ext, Vec3, Vec4};
use crate::geometry::{Plane3, Triangle3};

use super::camera::Camera;
use super::clipper::clip_triangles;
use super::frustum::Frustum;

/// Corner indices of the twelve outward-facing triangles of a box
const BOX_FACES: [[usize; 3]; 12] = [
    [0, 2, 1], [0, 3, 2], [4, 5, 6], [4, 6, 7],
    [3, 6, 2], [3, 7, 6], [0, 1, 5], [0, 5, 4],
    [4, 7, 3], [4, 3, 0], [1, 2, 6], [1, 6, 5],
];

/// View matrix whose rows are `axes`, placing `origin` at zero
fn view_from_axes(axes: &[Vec3; 3], origin: &Vec3) -> Mat4 {
    let [x, y, z] = axes;
    Mat4::new(
        x.x, x.y, x.z, -x.dot(origin),
        y.x, y.y, y.z, -y.dot(origin),
        z.x, z.y, z.z, -z.dot(origin),
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Component-wise bounds of a point set
fn min_max(points: impl IntoIterator<Item = Vec3>) -> Option<(Vec3, Vec3)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p))))
}

/// Directional-light camera with cascaded shadow fitting
#[derive(Debug, Clone)]
pub struct CsmSunLightCamera {
    config: CascadeConfig,
    sun_direction: Vec3,
    viewer: Option<Camera>,
    scene_bound: BoundingVolume,
    clip_planes: Option<Vec<Plane3>>,

    adjusted_near: f32,
    adjusted_far: f32,
    cascade_distances: Vec<f32>,
    light_views: Vec<Mat4>,
    light_positions: Vec<Vec3>,
    light_frusta: Vec<Mat4>,
    scene_crops: Vec<Mat4>,
    proj_scene_crops: Vec<Mat4>,
    light_view_projections: Vec<Mat4>,
    texture_coord_transforms: Vec<Mat4>,
}

impl CsmSunLightCamera {
    /// Light camera for `config.cascade_count` cascades, sun pointing down
    pub fn new(config: CascadeConfig) -> Result<Self, KernelError> {
        config.validate().map_err(KernelError::InvalidConfig)?;
        let count = config.cascade_count;
        Ok(Self {
            config,
            sun_direction: -Vec3::y(),
            viewer: None,
            scene_bound: BoundingVolume::Empty,
            clip_planes: None,
            adjusted_near: config.default_near,
            adjusted_far: config.default_far,
            cascade_distances: vec![0.0; count],
            light_views: vec![Mat4::identity(); count],
            light_positions: vec![Vec3::zeros(); count],
            light_frusta: vec![Mat4::identity(); count],
            scene_crops: vec![Mat4::identity(); count],
            proj_scene_crops: vec![Mat4::identity(); count],
            light_view_projections: vec![Mat4::identity(); count],
            texture_coord_transforms: vec![Mat4::identity(); count],
        })
    }

    /// Settings in use
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Number of cascades
    pub fn cascade_count(&self) -> usize {
        self.config.cascade_count
    }

    /// Direction the light travels in; normalized, zero is ignored
    pub fn set_sun_direction(&mut self, direction: Vec3) {
        match direction.try_normalize(constants::ZERO_TOLERANCE) {
            Some(direction) => self.sun_direction = direction,
            None => log::warn!("ignoring zero sun direction"),
        }
    }

    /// Unit sun direction
    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    /// Camera whose view is being shadowed
    pub fn set_viewer_camera(&mut self, camera: &Camera) {
        self.viewer = Some(camera.clone());
    }

    /// World bound of the shadow casters and receivers
    pub fn set_scene_bound(&mut self, bound: BoundingVolume) {
        self.scene_bound = bound;
    }

    /// Clip the scene bound against these planes instead of the viewer
    /// camera's own frustum
    pub fn set_clip_planes(&mut self, planes: Vec<Plane3>) {
        self.clip_planes = Some(planes);
    }

    /// Clip the scene bound against `frustum`
    pub fn set_clip_frustum(&mut self, frustum: &Frustum) {
        self.set_clip_planes(frustum.planes().to_vec());
    }

    /// Refit every cascade to the current viewer, sun and scene
    ///
    /// Without a viewer camera nothing is recomputed.
    pub fn calculate(&mut self) {
        let Some(viewer) = self.viewer.clone() else {
            log::warn!("sun light camera has no viewer camera to fit");
            return;
        };

        self.scene_bound_frustum_range(&viewer);
        self.light_camera_frusta(&viewer);
        self.scene_crop();
        self.refresh_texture_coord_transforms();
        log::debug!(
            "fitted {} cascades over {:.3}..{:.3}: {:?}",
            self.cascade_count(),
            self.adjusted_near,
            self.adjusted_far,
            self.cascade_distances
        );
    }

    /// Depth range of the viewer that holds scene geometry
    fn scene_bound_frustum_range(&mut self, viewer: &Camera) {
        self.adjusted_near = viewer.near;
        self.adjusted_far = viewer.far;

        if self.scene_bound.is_empty() {
            return;
        }
        let scene_box = self.scene_bound.enclosing_box();
        let eye_in_scene = self.scene_bound.point_inside(&viewer.position);

        let corners = scene_box.compute_vertices();
        let faces: Vec<Triangle3> = BOX_FACES
            .iter()
            .map(|&[a, b, c]| Triangle3::new(corners[a], corners[b], corners[c]))
            .collect();
        let planes = match &self.clip_planes {
            Some(planes) => planes.clone(),
            None => Frustum::from_camera(viewer).planes().to_vec(),
        };
        let clipped = clip_triangles(&planes, &faces);

        let view = viewer.view_matrix();
        let Some((min, max)) = min_max(
            clipped
                .iter()
                .flat_map(|triangle| triangle.vertices)
                .map(|vertex| view.transform_position(&vertex)),
        ) else {
            log::trace!("scene bound lies outside the viewer frustum");
            return;
        };

        if self.adjusted_near < min.z && !eye_in_scene {
            self.adjusted_near = min.z;
        }
        if self.adjusted_far > max.z {
            self.adjusted_far = max.z;
        }
        if self.adjusted_far <= self.adjusted_near {
            log::debug!(
                "scene depth range {:.3}..{:.3} collapsed, using the viewer range",
                self.adjusted_near,
                self.adjusted_far
            );
            self.adjusted_near = viewer.near;
            self.adjusted_far = viewer.far;
        }
    }

    /// `[x, y, z]` frame looking along the sun
    fn light_camera_frame(&self) -> [Vec3; 3] {
        let z = self.sun_direction;
        let up = if z.y.abs() >= 1.0 - constants::ZERO_TOLERANCE { Vec3::x() } else { Vec3::y() };
        let x = up.cross(&z).normalize();
        let y = z.cross(&x).normalize();
        [x, y, z]
    }

    /// Far distance of cascade `index`
    fn split_distance(&self, index: usize) -> f32 {
        let count = self.cascade_count();
        if index + 1 >= count {
            return self.adjusted_far;
        }
        let (near, far) = (self.adjusted_near, self.adjusted_far);
        let fraction = (index + 1) as f32 / count as f32;
        let logarithmic = near * (far / near).powf(fraction);
        let uniform = near + (far - near) * fraction;
        let blend = self.config.split_blend;
        blend * logarithmic + (1.0 - blend) * uniform
    }

    /// World-space corners of cascade `index`, near face first
    ///
    /// Each face walks `(-x -y) (-x +y) (+x +y) (+x -y)`.
    fn cascade_corners(&self, viewer: &Camera, index: usize) -> [Vec3; 8] {
        let near = if index == 0 { self.adjusted_near } else { self.cascade_distances[index - 1] };
        let far = self.cascade_distances[index];

        let z = viewer.eye_to_lookat();
        let x = viewer.right_vector();
        let y = viewer.up_vector();
        let tan_half = (viewer.fov * 0.5).tan();

        let mut corners = [Vec3::zeros(); 8];
        for (face, distance) in [near, far].into_iter().enumerate() {
            let center = viewer.position + z * distance;
            let half_height = tan_half * distance;
            let half_width = half_height * viewer.aspect;
            let (dx, dy) = (x * half_width, y * half_height);
            corners[face * 4] = center - dx - dy;
            corners[face * 4 + 1] = center - dx + dy;
            corners[face * 4 + 2] = center + dx + dy;
            corners[face * 4 + 3] = center + dx - dy;
        }
        corners
    }

    /// Light view and orthographic projection of every cascade
    fn light_camera_frusta(&mut self, viewer: &Camera) {
        let axes = self.light_camera_frame();
        for index in 0..self.cascade_count() {
            self.cascade_distances[index] = self.split_distance(index);
        }

        for index in 0..self.cascade_count() {
            self.scene_crops[index] = Mat4::identity();
            let corners = self.cascade_corners(viewer, index);
            let center = corners.iter().sum::<Vec3>() / 8.0;

            let centered_view = view_from_axes(&axes, &center);
            let Some((min, max)) = min_max(corners.iter().map(|c| centered_view.transform_position(c))) else {
                continue;
            };

            let move_back = -min.z + self.config.move_back_margin;
            let position = center - self.sun_direction * move_back;
            let width = 2.0 * (-min.x).max(max.x);
            let height = 2.0 * (-min.y).max(max.y);
            // corners span [margin, far_z] in the light view
            let far_z = max.z - min.z + self.config.move_back_margin;

            self.light_positions[index] = position;
            self.light_views[index] = view_from_axes(&axes, &position);
            self.light_frusta[index] = Mat4::ortho_lh(width, height, self.config.light_near, far_z);
            self.proj_scene_crops[index] = self.scene_crops[index] * self.light_frusta[index];
            self.light_view_projections[index] = self.proj_scene_crops[index] * self.light_views[index];
        }
    }

    /// Rescale each light projection to the projected scene bound
    fn scene_crop(&mut self) {
        if self.scene_bound.is_empty() {
            return;
        }
        let scene_corners = self.scene_bound.enclosing_box().compute_vertices();

        for index in 0..self.cascade_count() {
            let light_view_proj = self.light_frusta[index] * self.light_views[index];
            let Some((min, max)) = min_max(scene_corners.iter().map(|c| light_view_proj.transform_position(c))) else {
                continue;
            };
            let span_x = max.x - min.x;
            let span_y = max.y - min.y;
            if span_x <= constants::ZERO_TOLERANCE || span_y <= constants::ZERO_TOLERANCE {
                log::debug!("scene bound projects to a line in cascade {index}, skipping crop");
                continue;
            }

            let scale_x = 2.0 / span_x;
            let scale_y = 2.0 / span_y;
            let offset_x = -0.5 * (max.x + min.x) * scale_x;
            let offset_y = -0.5 * (max.y + min.y) * scale_y;
            self.scene_crops[index] = Mat4::new(
                scale_x, 0.0, 0.0, offset_x,
                0.0, scale_y, 0.0, offset_y,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            );
            self.proj_scene_crops[index] = self.scene_crops[index] * self.light_frusta[index];
            self.light_view_projections[index] = self.proj_scene_crops[index] * self.light_views[index];
        }
    }

    /// Transforms from cascade 0 shadow coordinates to each cascade's
    fn refresh_texture_coord_transforms(&mut self) {
        self.texture_coord_transforms[0] = Mat4::identity();
        let Some(first_inverse) = self.light_view_projections[0].try_inverse() else {
            log::warn!("first cascade light transform is singular");
            return;
        };
        for index in 1..self.cascade_count() {
            self.texture_coord_transforms[index] = self.light_view_projections[index] * first_inverse;
        }
    }

    /// World-to-light view transform of each cascade
    pub fn light_view_transforms(&self) -> &[Mat4] {
        &self.light_views
    }

    /// Scene-cropped light projection of each cascade
    pub fn light_projections(&self) -> &[Mat4] {
        &self.proj_scene_crops
    }

    /// `projection * view` of each cascade
    pub fn light_view_projections(&self) -> &[Mat4] {
        &self.light_view_projections
    }

    /// World position of each cascade's light camera
    pub fn light_positions(&self) -> &[Vec3] {
        &self.light_positions
    }

    /// Far distance of each cascade from the viewer eye
    pub fn cascade_distances(&self) -> &[f32] {
        &self.cascade_distances
    }

    /// Maps cascade 0 light clip space to each cascade's
    pub fn texture_coord_transforms(&self) -> &[Mat4] {
        &self.texture_coord_transforms
    }

    /// Viewer depth range the cascades were split over
    pub fn adjusted_near_far(&self) -> (f32, f32) {
        (self.adjusted_near, self.adjusted_far)
    }

    /// First four cascade distances for a shader, padded with the last
    pub fn light_frusta_distances(&self) -> Vec4 {
        let last = self.cascade_distances.last().copied().unwrap_or(0.0);
        Vec4::from_fn(|i, _| self.cascade_distances.get(i).copied().unwrap_or(last))
    }
}
