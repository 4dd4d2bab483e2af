#![warn(missing_docs)]
//! Player body physics: an axis-aligned bounding box, swept collision
//! against the chunk store, water/air vertical integration, and a smoothed
//! camera-height offset for clean single-block step-ups.

use glam::Vec3;
use voxelcraft_world::ChunkStore;

/// Half the player's horizontal footprint, in blocks.
pub const HALF_WIDTH: f32 = 0.3;
/// Player body height, in blocks.
pub const HEIGHT: f32 = 1.62;
/// Eye height above the feet position.
pub const EYE_HEIGHT: f32 = 1.52;
/// Horizontal walking speed, blocks/second.
pub const WALK_SPEED: f32 = 4.3;
/// Horizontal sprinting speed, blocks/second.
pub const SPRINT_SPEED: f32 = 7.0;
/// Horizontal swimming speed, blocks/second.
pub const SWIM_SPEED: f32 = 3.0;
/// Gravity acceleration applied in air, blocks/second^2.
pub const GRAVITY_AIR: f32 = 25.0;
/// Gravity acceleration applied while submerged, blocks/second^2.
pub const GRAVITY_WATER: f32 = 5.0;
/// Per-tick multiplicative damping applied to vertical velocity in water.
pub const WATER_DAMPING: f32 = 0.85;
/// Clamp applied to vertical velocity while submerged.
pub const WATER_VY_CLAMP: f32 = 3.0;
/// Vertical velocity imparted by a jump, blocks/second.
pub const JUMP_VELOCITY: f32 = 9.0;
/// Vertical velocity imparted by holding jump or sneak while submerged.
pub const WATER_VERTICAL_KICK: f32 = 3.0;
/// Exponential approach rate for the smoothed step-up camera offset.
pub const CAMERA_SMOOTH_RATE: f32 = 15.0;
/// Slack kept between a resolved collision boundary and the body, to avoid
/// the body re-penetrating the very next tick due to float rounding.
pub const COLLISION_EPSILON: f32 = 0.001;

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: [f32; 3],
    /// Maximum corner (x, y, z).
    pub max: [f32; 3],
}

impl Aabb {
    /// Create a new AABB. `min` must be componentwise `<= max`.
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        debug_assert!(min[0] <= max[0] && min[1] <= max[1] && min[2] <= max[2]);
        Self { min, max }
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min[0] <= other.max[0]
            && self.max[0] >= other.min[0]
            && self.min[1] <= other.max[1]
            && self.max[1] >= other.min[1]
            && self.min[2] <= other.max[2]
            && self.max[2] >= other.min[2]
    }

    /// Whether this AABB overlaps any solid block in `store`.
    pub fn overlaps_solid(&self, store: &ChunkStore) -> bool {
        let min_x = self.min[0].floor() as i32;
        let max_x = (self.max[0] - COLLISION_EPSILON).floor() as i32;
        let min_y = self.min[1].floor() as i32;
        let max_y = (self.max[1] - COLLISION_EPSILON).floor() as i32;
        let min_z = self.min[2].floor() as i32;
        let max_z = (self.max[2] - COLLISION_EPSILON).floor() as i32;

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                for z in min_z..=max_z {
                    if store.is_solid(x, y, z) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Horizontal movement input, in the player's local frame: `forward` is
/// positive looking-direction, `strafe` is positive to the right.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveInput {
    /// Forward/back axis, expected in `[-1, 1]`.
    pub forward: f32,
    /// Left/right strafe axis, expected in `[-1, 1]`.
    pub strafe: f32,
    /// Whether sprint is held.
    pub sprint: bool,
    /// Whether jump was pressed this frame.
    pub jump: bool,
    /// Whether sneak is held.
    pub sneak: bool,
}

/// A physically simulated first-person player body.
#[derive(Debug, Clone)]
pub struct PlayerBody {
    /// World-space feet position (bottom-center of the body).
    pub position: Vec3,
    /// Current velocity, blocks/second.
    pub velocity: Vec3,
    /// Whether the body is resting on a solid block this frame.
    pub on_ground: bool,
    /// Whether the body's center is inside a water block this frame.
    pub in_water: bool,
    /// Whether the eye-height cell is inside a water block this frame.
    pub head_in_water: bool,
    smoothed_step_offset: f32,
    target_step_offset: f32,
}

impl PlayerBody {
    /// Spawn a body with feet at `position`, at rest.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            on_ground: false,
            in_water: false,
            head_in_water: false,
            smoothed_step_offset: 0.0,
            target_step_offset: 0.0,
        }
    }

    /// The AABB occupied by the body at its current position.
    pub fn aabb(&self) -> Aabb {
        aabb_at(self.position)
    }

    /// Eye position this frame, including the smoothed step-up offset so a
    /// single-block step doesn't snap the camera.
    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + EYE_HEIGHT + self.smoothed_step_offset,
            self.position.z,
        )
    }

    /// Advance the body one tick: apply horizontal input, vertical gravity
    /// (air or water), resolve collisions axis-by-axis with single-block
    /// step-up, and smooth the camera height offset toward the step target.
    pub fn integrate(&mut self, dt: f32, input: MoveInput, yaw: f32, store: &ChunkStore) {
        self.in_water = self.center_is_water(store);
        self.head_in_water = self.head_is_water(store);

        let speed = if self.in_water {
            SWIM_SPEED
        } else if input.sprint {
            SPRINT_SPEED
        } else {
            WALK_SPEED
        };

        let forward_dir = Vec3::new(yaw.cos(), 0.0, yaw.sin());
        let right_dir = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
        let horizontal = (forward_dir * input.forward + right_dir * input.strafe)
            .normalize_or_zero()
            * speed;
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;

        if self.in_water {
            self.velocity.y += -GRAVITY_WATER * dt;
            self.velocity.y *= WATER_DAMPING;
            if input.jump {
                self.velocity.y = WATER_VERTICAL_KICK;
            } else if input.sneak {
                self.velocity.y = -WATER_VERTICAL_KICK;
            }
            self.velocity.y = self.velocity.y.clamp(-WATER_VY_CLAMP, WATER_VY_CLAMP);
        } else {
            self.velocity.y += -GRAVITY_AIR * dt;
            if self.on_ground && input.jump {
                self.velocity.y = JUMP_VELOCITY;
            }
        }

        let delta = self.velocity * dt;
        self.move_and_collide(delta, store);

        let rate = (CAMERA_SMOOTH_RATE * dt).min(1.0);
        self.smoothed_step_offset += (self.target_step_offset - self.smoothed_step_offset) * rate;
    }

    fn center_is_water(&self, store: &ChunkStore) -> bool {
        let center = self.position + Vec3::new(0.0, HEIGHT * 0.5, 0.0);
        store.get_block(
            center.x.floor() as i32,
            center.y.floor() as i32,
            center.z.floor() as i32,
        ) == voxelcraft_core::block::WATER
    }

    fn head_is_water(&self, store: &ChunkStore) -> bool {
        let eye = self.position + Vec3::new(0.0, EYE_HEIGHT, 0.0);
        store.get_block(eye.x.floor() as i32, eye.y.floor() as i32, eye.z.floor() as i32)
            == voxelcraft_core::block::WATER
    }

    fn move_and_collide(&mut self, delta: Vec3, store: &ChunkStore) {
        self.on_ground = false;

        self.move_axis(Vec3::new(0.0, delta.y, 0.0), store);
        self.move_axis(Vec3::new(delta.x, 0.0, 0.0), store);
        self.move_axis(Vec3::new(0.0, 0.0, delta.z), store);
    }

    fn move_axis(&mut self, delta: Vec3, store: &ChunkStore) {
        if delta == Vec3::ZERO {
            return;
        }
        let candidate = self.position + delta;
        let candidate_aabb = aabb_at(candidate);

        if !candidate_aabb.overlaps_solid(store) {
            self.position = candidate;
            if delta.y < 0.0 {
                self.settle_ground(store);
            }
            return;
        }

        if delta.y == 0.0
            && self.on_ground
            && !self.in_water
            && self.blocked_exactly_at_foot_level(&candidate_aabb, store)
        {
            let stepped = candidate + Vec3::new(0.0, 1.0, 0.0);
            if !aabb_at(stepped).overlaps_solid(store) {
                self.position = stepped;
                self.target_step_offset = -1.0;
                self.settle_ground(store);
                return;
            }
        }

        if delta.y < 0.0 {
            self.on_ground = true;
            self.velocity.y = 0.0;
            return;
        }
        if delta.y > 0.0 {
            self.velocity.y = 0.0;
            return;
        }
        self.velocity.x = if delta.x != 0.0 { 0.0 } else { self.velocity.x };
        self.velocity.z = if delta.z != 0.0 { 0.0 } else { self.velocity.z };
    }

    /// Whether every solid cell overlapping `aabb` sits at the player's foot
    /// row, i.e. the obstruction is a single-block curb rather than a wall
    /// that also blocks at higher rows.
    fn blocked_exactly_at_foot_level(&self, aabb: &Aabb, store: &ChunkStore) -> bool {
        let foot_y = self.position.y.floor() as i32;
        let min_x = aabb.min[0].floor() as i32;
        let max_x = (aabb.max[0] - COLLISION_EPSILON).floor() as i32;
        let min_y = aabb.min[1].floor() as i32;
        let max_y = (aabb.max[1] - COLLISION_EPSILON).floor() as i32;
        let min_z = aabb.min[2].floor() as i32;
        let max_z = (aabb.max[2] - COLLISION_EPSILON).floor() as i32;

        let mut blocked_at_foot = false;
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                for z in min_z..=max_z {
                    if !store.is_solid(x, y, z) {
                        continue;
                    }
                    if y == foot_y {
                        blocked_at_foot = true;
                    } else {
                        return false;
                    }
                }
            }
        }
        blocked_at_foot
    }

    fn settle_ground(&mut self, store: &ChunkStore) {
        let probe = aabb_at(self.position - Vec3::new(0.0, COLLISION_EPSILON, 0.0));
        if probe.overlaps_solid(store) {
            self.on_ground = true;
        }
        self.target_step_offset = 0.0;
    }
}

fn aabb_at(position: Vec3) -> Aabb {
    Aabb::new(
        [position.x - HALF_WIDTH, position.y, position.z - HALF_WIDTH],
        [position.x + HALF_WIDTH, position.y + HEIGHT, position.z + HALF_WIDTH],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelcraft_core::block;
    use voxelcraft_world::chunk::ChunkPos;

    fn flat_store() -> ChunkStore {
        let mut store = ChunkStore::new(1);
        store.generate_or_get(ChunkPos::new(0, 0));
        for x in 0..16 {
            for z in 0..16 {
                for y in 1..10 {
                    store.set_block(x, y, z, block::STONE);
                }
            }
        }
        store
    }

    #[test]
    fn body_rests_on_ground_after_falling() {
        let store = flat_store();
        let mut body = PlayerBody::new(Vec3::new(8.0, 20.0, 8.0));
        for _ in 0..300 {
            body.integrate(1.0 / 60.0, MoveInput::default(), 0.0, &store);
        }
        assert!(body.on_ground);
        assert!((body.position.y - 10.0).abs() < 0.05);
    }

    #[test]
    fn body_never_penetrates_solid_ground() {
        let store = flat_store();
        let mut body = PlayerBody::new(Vec3::new(8.0, 50.0, 8.0));
        for _ in 0..600 {
            body.integrate(1.0 / 60.0, MoveInput::default(), 0.0, &store);
            assert!(body.position.y >= 10.0 - 0.01);
        }
    }

    #[test]
    fn jump_only_applies_while_grounded() {
        let store = flat_store();
        let mut body = PlayerBody::new(Vec3::new(8.0, 10.0, 8.0));
        let input = MoveInput { jump: true, ..Default::default() };
        body.integrate(1.0 / 60.0, input, 0.0, &store);
        assert!(body.velocity.y > 0.0);
    }

    #[test]
    fn water_vertical_velocity_stays_within_clamp() {
        let mut store = flat_store();
        for x in 0..16 {
            for z in 0..16 {
                store.set_block(x, 11, z, block::WATER);
                store.set_block(x, 12, z, block::WATER);
            }
        }
        let mut body = PlayerBody::new(Vec3::new(8.0, 11.0, 8.0));
        for _ in 0..200 {
            body.integrate(1.0 / 60.0, MoveInput::default(), 0.0, &store);
            assert!(body.velocity.y.abs() <= WATER_VY_CLAMP + 1e-3);
        }
    }

    #[test]
    fn aabb_intersects_detects_overlap() {
        let a = Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = Aabb::new([0.5, 0.5, 0.5], [1.5, 1.5, 1.5]);
        let c = Aabb::new([2.0, 2.0, 2.0], [3.0, 3.0, 3.0]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    proptest::proptest! {
        #[test]
        fn falling_body_never_tunnels_through_the_floor(start_y in 10.5f32..60.0) {
            let store = flat_store();
            let mut body = PlayerBody::new(Vec3::new(8.0, start_y, 8.0));
            for _ in 0..900 {
                body.integrate(1.0 / 60.0, MoveInput::default(), 0.0, &store);
                proptest::prop_assert!(body.position.y >= 10.0 - 0.01);
            }
        }
    }
}
