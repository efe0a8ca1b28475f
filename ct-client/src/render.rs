//! This module draws the scene with the `egui` painter.
//!
//! Every element is projected through the camera's view-projection matrix and turned into a 2D
//! [`Shape`]. Shapes are then painted back to front.

use ct_animator::{wind_sway, Animator, CameraController};
use ct_geometry::{RGBArray, SceneConfig};
use egui::{pos2, Color32, Painter, Pos2, Rect, Shape, Stroke};
use glam::{Mat4, Quat, Vec3};

/// Foliage points are `scale * FOLIAGE_POINT_SIZE / depth` pixels across.
const FOLIAGE_POINT_SIZE: f32 = 50.;

/// The radius of an ornament with a scale of 1.
const ORNAMENT_RADIUS: f32 = 0.25;

/// The width and height of a photo with a scale of 1.
const PHOTO_SIZE: (f32, f32) = (0.8, 1.);

/// Anything closer to the camera than this isn't drawn.
const NEAR_DEPTH: f32 = 0.1;

/// Light shining from above and in front of the tree, used to shade gift faces.
const LIGHT_DIRECTION: Vec3 = Vec3::new(0.3, 0.8, 0.5);

/// Convert a config colour to an `egui` colour.
pub fn color(rgb: RGBArray) -> Color32 {
    let [r, g, b] = rgb;
    Color32::from_rgb(r, g, b)
}

/// Linearly interpolate between two colours.
pub fn mix(a: RGBArray, b: RGBArray, t: f32) -> RGBArray {
    let t = t.clamp(0., 1.);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    [channel(a[0], b[0]), channel(a[1], b[1]), channel(a[2], b[2])]
}

/// Multiply a colour by a brightness factor.
fn shade(rgb: RGBArray, brightness: f32) -> Color32 {
    let scale = |c: u8| (c as f32 * brightness.clamp(0., 1.)).round() as u8;
    Color32::from_rgb(scale(rgb[0]), scale(rgb[1]), scale(rgb[2]))
}

/// A point after projection onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// The position on the screen.
    pub pos: Pos2,

    /// The distance in front of the camera.
    pub depth: f32,
}

/// Projects world points onto a screen rectangle.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    view_projection: Mat4,
    rect: Rect,

    /// Pixels per world unit at a depth of 1.
    focal_length: f32,
}

impl Projector {
    /// Create a projector for the camera's current position.
    pub fn new(camera: &CameraController, fov_degrees: f32, rect: Rect) -> Self {
        let height = rect.height().max(1.);
        Self {
            view_projection: camera.view_projection(rect.width().max(1.) / height),
            rect,
            focal_length: height / (2. * (fov_degrees.to_radians() / 2.).tan()),
        }
    }

    /// Project a world point, or return `None` if it's behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        let clip = self.view_projection * world.extend(1.);
        if clip.w < NEAR_DEPTH {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        let center = self.rect.center();
        Some(Projected {
            pos: pos2(
                center.x + ndc.x * self.rect.width() / 2.,
                center.y - ndc.y * self.rect.height() / 2.,
            ),
            depth: clip.w,
        })
    }

    /// The size in pixels of something `size` world units across at the given depth.
    #[inline]
    pub fn size_on_screen(&self, size: f32, depth: f32) -> f32 {
        size * self.focal_length / depth
    }

    /// Project a polygon, returning `None` if any corner is behind the camera.
    fn project_polygon(&self, corners: &[Vec3]) -> Option<(Vec<Pos2>, f32)> {
        let mut points = Vec::with_capacity(corners.len());
        let mut depth = 0.;
        for &corner in corners {
            let projected = self.project(corner)?;
            points.push(projected.pos);
            depth += projected.depth;
        }
        Some((points, depth / corners.len() as f32))
    }
}

/// The four corners of a `width`×`height` rectangle in the local xy plane, rotated and moved to
/// `center`.
pub fn oriented_quad(center: Vec3, orientation: Quat, width: f32, height: f32) -> [Vec3; 4] {
    let (w, h) = (width / 2., height / 2.);
    [
        Vec3::new(-w, -h, 0.),
        Vec3::new(w, -h, 0.),
        Vec3::new(w, h, 0.),
        Vec3::new(-w, h, 0.),
    ]
    .map(|corner| center + orientation * corner)
}

/// The six faces of a cube, as corners wound anticlockwise when seen from outside, along with
/// the outward normal.
fn cube_faces(center: Vec3, orientation: Quat, size: f32) -> [([Vec3; 4], Vec3); 6] {
    let h = size / 2.;
    let corner = |x: f32, y: f32, z: f32| center + orientation * Vec3::new(x * h, y * h, z * h);
    let normal = |n: Vec3| orientation * n;

    [
        (
            [corner(-1., -1., 1.), corner(1., -1., 1.), corner(1., 1., 1.), corner(-1., 1., 1.)],
            normal(Vec3::Z),
        ),
        (
            [corner(1., -1., -1.), corner(-1., -1., -1.), corner(-1., 1., -1.), corner(1., 1., -1.)],
            normal(Vec3::NEG_Z),
        ),
        (
            [corner(1., -1., 1.), corner(1., -1., -1.), corner(1., 1., -1.), corner(1., 1., 1.)],
            normal(Vec3::X),
        ),
        (
            [corner(-1., -1., -1.), corner(-1., -1., 1.), corner(-1., 1., 1.), corner(-1., 1., -1.)],
            normal(Vec3::NEG_X),
        ),
        (
            [corner(-1., 1., 1.), corner(1., 1., 1.), corner(1., 1., -1.), corner(-1., 1., -1.)],
            normal(Vec3::Y),
        ),
        (
            [corner(-1., -1., -1.), corner(1., -1., -1.), corner(1., -1., 1.), corner(-1., -1., 1.)],
            normal(Vec3::NEG_Y),
        ),
    ]
}

/// Shapes waiting to be painted, each with its depth.
#[derive(Default)]
struct DepthSortedShapes(Vec<(f32, Shape)>);

impl DepthSortedShapes {
    fn push(&mut self, depth: f32, shape: Shape) {
        self.0.push((depth, shape));
    }

    /// Every shape, furthest first. Shapes at the same depth keep the order they were pushed in.
    fn into_back_to_front(mut self) -> impl Iterator<Item = Shape> {
        self.0.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        self.0.into_iter().map(|(_, shape)| shape)
    }
}

/// Everything needed to draw one frame.
pub struct SceneView<'a> {
    pub animator: &'a Animator,
    pub camera: &'a CameraController,
    pub config: &'a SceneConfig,

    /// Seconds since the animation started.
    pub elapsed: f32,
}

impl SceneView<'_> {
    /// Paint the whole scene into `rect`.
    pub fn paint(&self, painter: &Painter, rect: Rect) {
        let projector = Projector::new(self.camera, self.config.camera.fov_degrees, rect);
        let offset = self.camera.tree_offset();
        let mut shapes = DepthSortedShapes::default();

        self.foliage(&projector, offset, &mut shapes);
        self.ornaments(&projector, offset, &mut shapes);
        self.gifts(&projector, offset, &mut shapes);
        self.photos(&projector, offset, &mut shapes);

        painter.extend(shapes.into_back_to_front());
    }

    fn foliage(&self, projector: &Projector, offset: Vec3, shapes: &mut DepthSortedShapes) {
        let palette = &self.config.palette;
        let foliage = self.animator.foliage();
        let amplitude = self.config.motion.wind_amplitude;

        for (&position, &scale) in foliage.current().iter().zip(foliage.scales()) {
            let world = wind_sway(position + offset, self.elapsed, amplitude);
            let Some(Projected { pos, depth }) = projector.project(world) else {
                continue;
            };

            let radius = (scale * FOLIAGE_POINT_SIZE / depth / 2.).max(0.5);
            shapes.push(
                depth,
                Shape::circle_filled(pos, radius, color(palette.emerald_deep)),
            );
            shapes.push(
                depth,
                Shape::circle_filled(
                    pos,
                    radius * 0.4,
                    color(mix(palette.emerald_light, palette.gold_high, 0.5)),
                ),
            );
        }
    }

    fn ornaments(&self, projector: &Projector, offset: Vec3, shapes: &mut DepthSortedShapes) {
        let palette = &self.config.palette;
        let ornaments = self.animator.ornaments();

        for (&position, &scale) in ornaments.current().iter().zip(ornaments.scales()) {
            let Some(Projected { pos, depth }) = projector.project(position + offset) else {
                continue;
            };

            let radius = projector.size_on_screen(ORNAMENT_RADIUS * scale, depth);
            shapes.push(
                depth,
                Shape::circle_filled(pos, radius, color(palette.gold_high)),
            );
            shapes.push(
                depth,
                Shape::circle_stroke(
                    pos,
                    radius,
                    Stroke::new((radius * 0.15).max(0.5), color(palette.gold_dark)),
                ),
            );
        }
    }

    fn gifts(&self, projector: &Projector, offset: Vec3, shapes: &mut DepthSortedShapes) {
        let palette = &self.config.palette;
        let gifts = self.animator.gifts();
        let light = LIGHT_DIRECTION.normalize();
        let eye = self.camera.position();

        for (index, (&position, &scale)) in gifts.current().iter().zip(gifts.scales()).enumerate() {
            let center = position + offset;
            for (corners, normal) in cube_faces(center, gifts.orientation(index), scale) {
                let face_center = corners.iter().copied().sum::<Vec3>() / 4.;
                if normal.dot(eye - face_center) <= 0. {
                    continue;
                }

                let Some((points, depth)) = projector.project_polygon(&corners) else {
                    continue;
                };
                let brightness = 0.35 + 0.65 * normal.dot(light).max(0.);
                shapes.push(
                    depth,
                    Shape::convex_polygon(
                        points,
                        shade(palette.red_velvet, brightness),
                        Stroke::new(1., color(palette.gold_dark)),
                    ),
                );
            }
        }
    }

    fn photos(&self, projector: &Projector, offset: Vec3, shapes: &mut DepthSortedShapes) {
        let palette = &self.config.palette;
        let photos = self.animator.photos();

        for (index, (&position, &scale)) in
            photos.current().iter().zip(photos.scales()).enumerate()
        {
            let orientation = photos.orientation(index);
            let (width, height) = (PHOTO_SIZE.0 * scale, PHOTO_SIZE.1 * scale);

            let frame = oriented_quad(position + offset, orientation, width, height);
            let Some((points, depth)) = projector.project_polygon(&frame) else {
                continue;
            };
            shapes.push(
                depth,
                Shape::convex_polygon(points, color(palette.warm_white), Stroke::NONE),
            );

            // The picture sits in the top of the frame, like a polaroid
            let picture_center = position + offset + orientation * Vec3::new(0., height * 0.08, 0.);
            let picture = oriented_quad(picture_center, orientation, width * 0.8, height * 0.65);
            if let Some((points, depth)) = projector.project_polygon(&picture) {
                shapes.push(
                    depth,
                    Shape::convex_polygon(points, color(palette.emerald_deep), Stroke::NONE),
                );
            }
        }
    }
}
