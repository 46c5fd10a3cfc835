//! # Object Picking System
//!
//! Mouse ray-casting against the scene graph.
//!
//! ## How it works
//!
//! 1. **Pointer to NDC**: [`Viewport::to_ndc`] maps window pixels into `[-1, 1]` per axis
//! 2. **NDC to Ray**: [`Ray::from_camera`] shoots a world-space ray from the camera eye
//! 3. **Ray-Scene Intersection**: [`Raycaster::intersect_scene`] tests every renderable node,
//!    first against its bounding box and then triangle by triangle
//! 4. **Nearest first**: hits come back sorted by distance
//!
//! ## Usage
//!
//! ```rust,no_run
//! use room_planner::gfx::picking::{Ray, Raycaster, Viewport};
//! # fn demo(camera: &room_planner::gfx::camera::OrbitCamera, scene: &room_planner::gfx::scene::SceneGraph) {
//! let viewport = Viewport::new(1200.0, 800.0);
//! let ray = Ray::from_camera(viewport.to_ndc(600.0, 400.0), camera);
//! if let Some(hit) = Raycaster::new().intersect_scene(scene, &ray).first() {
//!     println!("Hit {:?} at {:?}", hit.node, hit.point);
//! }
//! # }
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, Vector3, Vector4, Zero};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{NodeId, SceneGraph, Side},
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Builds the ray leaving the camera eye through a point in normalized device coordinates
    pub fn from_camera(ndc: (f32, f32), camera: &OrbitCamera) -> Self {
        let basis = CameraBasis::from_camera(camera);
        let direction = basis.forward
            + basis.right * (ndc.0 * basis.tan_half_fovy * camera.aspect)
            + basis.up * (ndc.1 * basis.tan_half_fovy);
        Self::new(camera.eye, direction)
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Camera frame shared by ray construction and projection so the two stay exact inverses
struct CameraBasis {
    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    tan_half_fovy: f32,
}

impl CameraBasis {
    fn from_camera(camera: &OrbitCamera) -> Self {
        let forward = (camera.target - camera.eye).normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward).normalize();
        Self {
            forward,
            right,
            up,
            tan_half_fovy: (camera.fovy.0 * 0.5).tan(),
        }
    }
}

/// Infinite plane `normal . p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub constant: f32,
}

impl Plane {
    pub fn new(normal: Vector3<f32>, constant: f32) -> Self {
        Self {
            normal: normal.normalize(),
            constant,
        }
    }

    /// Horizontal plane at the given height
    pub fn horizontal(height: f32) -> Self {
        Self::new(Vector3::unit_y(), -height)
    }

    pub fn distance_to_point(&self, point: Vector3<f32>) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Point where the ray crosses the plane
    ///
    /// Returns `None` when the ray runs parallel to the plane without lying in it, or when
    /// the crossing is behind the ray origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vector3<f32>> {
        let denominator = self.normal.dot(ray.direction);
        if denominator.abs() < f32::EPSILON {
            return (self.distance_to_point(ray.origin).abs() < f32::EPSILON)
                .then_some(ray.origin);
        }

        let t = -self.distance_to_point(ray.origin) / denominator;
        (t >= 0.0).then(|| ray.point_at(t))
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Padding applied to boxes so flat geometry keeps a non-zero thickness
    const PADDING: f32 = 1e-4;

    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            min.x = min.x.min(vertex[0]);
            min.y = min.y.min(vertex[1]);
            min.z = min.z.min(vertex[2]);
            max.x = max.x.max(vertex[0]);
            max.y = max.y.max(vertex[1]);
            max.z = max.z.max(vertex[2]);
        }

        Self::new(min, max)
    }

    pub fn padded(&self) -> Self {
        let pad = Vector3::new(Self::PADDING, Self::PADDING, Self::PADDING);
        Self::new(self.min - pad, self.max + pad)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t_near = t_min
            .x
            .min(t_max.x)
            .max(t_min.y.min(t_max.y))
            .max(t_min.z.min(t_max.z));
        let t_far = t_min
            .x
            .max(t_max.x)
            .min(t_min.y.max(t_max.y))
            .min(t_min.z.max(t_max.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            [self.min.x, self.min.y, self.min.z],
            [self.max.x, self.min.y, self.min.z],
            [self.min.x, self.max.y, self.min.z],
            [self.min.x, self.min.y, self.max.z],
            [self.max.x, self.max.y, self.min.z],
            [self.max.x, self.min.y, self.max.z],
            [self.min.x, self.max.y, self.max.z],
            [self.max.x, self.max.y, self.max.z],
        ];

        let transformed: Vec<[f32; 3]> = corners
            .iter()
            .map(|corner| transform_point(matrix, Vector3::from(*corner)).into())
            .collect();

        Self::from_vertices(&transformed)
    }
}

fn transform_point(matrix: &Matrix4<f32>, point: Vector3<f32>) -> Vector3<f32> {
    let homogeneous = *matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    homogeneous.truncate() / homogeneous.w
}

/// Möller-Trumbore ray/triangle test; returns the distance along the ray
fn intersect_triangle(ray: &Ray, triangle: [Vector3<f32>; 3], side: Side) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = triangle[1] - triangle[0];
    let edge2 = triangle[2] - triangle[0];
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);

    // det > 0 means the ray approaches the counter-clockwise (front) face
    let accepted = match side {
        Side::Front => det > EPSILON,
        Side::Double => det.abs() > EPSILON,
    };
    if !accepted {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - triangle[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// A single ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The renderable node that was hit
    pub node: NodeId,
    /// Distance from the ray origin
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Ray-casts against every renderable node attached to the scene root
#[derive(Debug, Clone, Copy, Default)]
pub struct Raycaster {
    /// Hits closer than this are ignored
    pub near: f32,
    /// Hits farther than this are ignored
    pub far: Option<f32>,
}

impl Raycaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits hits to the camera's visible depth range
    pub fn for_camera(camera: &OrbitCamera) -> Self {
        Self {
            near: camera.znear,
            far: Some(camera.zfar),
        }
    }

    /// All intersections of `ray` with the scene, nearest first
    ///
    /// A node contributes at most one intersection: its closest triangle.
    pub fn intersect_scene(&self, scene: &SceneGraph, ray: &Ray) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = scene
            .renderables()
            .into_iter()
            .filter_map(|(node, world)| {
                let renderable = scene[node].renderable()?;
                let geometry = &renderable.geometry;

                let world_bounds = Aabb::from_vertices(&geometry.vertices)
                    .transform(&world)
                    .padded();
                world_bounds.intersect_ray(ray)?;

                let distance = geometry
                    .triangles()
                    .filter_map(|tri| {
                        let world_tri = tri.map(|v| transform_point(&world, Vector3::from(v)));
                        intersect_triangle(ray, world_tri, renderable.material.side)
                    })
                    .filter(|&t| t >= self.near && self.far.map_or(true, |far| t <= far))
                    .min_by(|a, b| a.total_cmp(b))?;

                Some(Intersection {
                    node,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest intersection, if any
    pub fn pick(&self, scene: &SceneGraph, ray: &Ray) -> Option<Intersection> {
        self.intersect_scene(scene, ray).into_iter().next()
    }
}

/// Pixel dimensions of the surface pointer events are reported against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Maps a pointer position in pixels (origin top-left) to normalized device coordinates
    pub fn to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        (
            2.0 * x / self.width - 1.0,
            -(2.0 * y / self.height - 1.0),
        )
    }

    /// Inverse of [`Viewport::to_ndc`]
    pub fn from_ndc(&self, ndc: (f32, f32)) -> (f32, f32) {
        (
            (ndc.0 + 1.0) * 0.5 * self.width,
            (1.0 - ndc.1) * 0.5 * self.height,
        )
    }

    /// Pixel position a world point appears at, or `None` when it is behind the camera
    pub fn project(&self, point: Vector3<f32>, camera: &OrbitCamera) -> Option<(f32, f32)> {
        let basis = CameraBasis::from_camera(camera);
        let relative = point - camera.eye;
        let depth = relative.dot(basis.forward);
        if depth <= f32::EPSILON {
            return None;
        }

        let ndc = (
            relative.dot(basis.right) / (depth * basis.tan_half_fovy * camera.aspect),
            relative.dot(basis.up) / (depth * basis.tan_half_fovy),
        );
        Some(self.from_ndc(ndc))
    }
}
