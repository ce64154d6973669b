// ============================================================================
// world.rs — Ping, Pong!
// WorldState: paddles, ball, per-frame integration, collision response and
// the round-over condition.
// ============================================================================

use glam::{Mat4, Vec2, Vec3};

use crate::config::GameConfig;

// ======================== Entities ========================

#[derive(Clone, Debug)]
pub struct Paddle {
    pub position: Vec2,
    /// Full width/height.
    pub size: Vec2,
    /// Per-frame direction, reset by input sampling every frame.
    pub movement: Vec2,
    pub model: Mat4,
}

impl Paddle {
    fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            movement: Vec2::ZERO,
            model: model_matrix(position, size),
        }
    }

    pub fn half_height(&self) -> f32 {
        self.size.y / 2.0
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.half_height()
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.half_height()
    }
}

#[derive(Clone, Debug)]
pub struct Ball {
    pub position: Vec2,
    pub size: Vec2,
    pub movement: Vec2,
    /// Quad scale; may differ from `size` in sign.
    pub scale: Vec2,
    pub model: Mat4,
}

impl Ball {
    /// True when the two boxes overlap on both axes.
    pub fn overlaps(&self, paddle: &Paddle) -> bool {
        let x_distance = collision_distance(
            self.position.x,
            paddle.position.x,
            self.size.x,
            paddle.size.x,
        );
        let y_distance = collision_distance(
            self.position.y,
            paddle.position.y,
            self.size.y,
            paddle.size.y,
        );
        x_distance < 0.0 && y_distance < 0.0
    }
}

/// Signed gap between two boxes on one axis: centre distance minus combined
/// half-lengths. Negative means overlap.
pub fn collision_distance(a_pos: f32, b_pos: f32, a_len: f32, b_len: f32) -> f32 {
    (a_pos - b_pos).abs() - (a_len + b_len) / 2.0
}

/// translate(position) ∘ scale(scale), built from identity every call.
pub fn model_matrix(position: Vec2, scale: Vec2) -> Mat4 {
    Mat4::from_translation(position.extend(0.0)) * Mat4::from_scale(Vec3::new(scale.x, scale.y, 1.0))
}

// ======================== Round State ========================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnd {
    /// Window closed or quit key pressed.
    QuitRequested,
    /// Ball left the field past the right paddle.
    LeftScored,
    /// Ball left the field past the left paddle.
    RightScored,
}

impl GameEnd {
    pub fn describe(self) -> &'static str {
        match self {
            GameEnd::QuitRequested => "quit requested",
            GameEnd::LeftScored => "left player scored",
            GameEnd::RightScored => "right player scored",
        }
    }
}

// ======================== WorldState ========================

pub struct WorldState {
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,

    pub speed: f32,
    pub field_half_extents: Vec2,
    pub out_of_bounds_x: f32,

    end: Option<GameEnd>,
    pub frame: u64,
}

impl WorldState {
    pub fn new(config: &GameConfig) -> Self {
        let paddle_size = Vec2::from(config.paddle_size);
        let ball_position = Vec2::from(config.ball_start);
        let ball_scale = Vec2::from(config.ball_scale);

        Self {
            left: Paddle::new(Vec2::from(config.left_paddle_start), paddle_size),
            right: Paddle::new(Vec2::from(config.right_paddle_start), paddle_size),
            ball: Ball {
                position: ball_position,
                size: Vec2::from(config.ball_size),
                movement: Vec2::from(config.ball_movement),
                scale: ball_scale,
                model: model_matrix(ball_position, ball_scale),
            },
            speed: config.speed,
            field_half_extents: Vec2::from(config.field_half_extents),
            out_of_bounds_x: config.out_of_bounds_x,
            end: None,
            frame: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    pub fn end(&self) -> Option<GameEnd> {
        self.end
    }

    /// The first end condition wins; later ones are ignored.
    pub fn request_quit(&mut self) {
        self.finish(GameEnd::QuitRequested);
    }

    fn finish(&mut self, end: GameEnd) {
        if self.end.is_none() {
            self.end = Some(end);
        }
    }

    /// Advance one frame by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }

        // Round over: no further movement once the ball has left the field.
        if self.ball.position.x > self.out_of_bounds_x {
            self.finish(GameEnd::LeftScored);
            return;
        }
        if self.ball.position.x < -self.out_of_bounds_x {
            self.finish(GameEnd::RightScored);
            return;
        }

        let step = self.speed * dt.max(0.0);
        self.right.position += self.right.movement * step;
        self.left.position += self.left.movement * step;
        self.ball.position += self.ball.movement * step;

        self.right.model = model_matrix(self.right.position, self.right.size);
        self.left.model = model_matrix(self.left.position, self.left.size);
        self.ball.model = model_matrix(self.ball.position, self.ball.scale);

        // Independent checks, right then left then walls.
        if self.ball.overlaps(&self.right) {
            self.ball.movement.x = -self.ball.movement.x;
        }
        if self.ball.overlaps(&self.left) {
            self.ball.movement.x = -self.ball.movement.x;
        }

        let half_ball = self.ball.size.y / 2.0;
        let field_top = self.field_half_extents.y;
        if self.ball.position.y - half_ball < -field_top
            || self.ball.position.y + half_ball > field_top
        {
            self.ball.movement.y = -self.ball.movement.y;
        }

        self.frame += 1;
    }

    /// Model matrices in draw order: right paddle, left paddle, ball.
    pub fn model_matrices(&self) -> [Mat4; 3] {
        [self.right.model, self.left.model, self.ball.model]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn world() -> WorldState {
        WorldState::new(&GameConfig::default())
    }

    #[test]
    fn starts_in_classic_layout() {
        let w = world();
        assert!(w.is_running());
        assert_eq!(w.right.position, Vec2::new(5.0, 0.0));
        assert_eq!(w.left.position, Vec2::new(-5.0, 0.0));
        assert_eq!(w.ball.position, Vec2::new(-3.0, 0.0));
        assert_eq!(w.ball.movement, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn collision_distance_is_signed_gap() {
        assert!((collision_distance(0.0, 1.0, 0.5, 0.5) - 0.5).abs() < EPS);
        assert!((collision_distance(1.0, 0.0, 0.5, 0.5) - 0.5).abs() < EPS);
        assert!(collision_distance(0.0, 0.2, 0.5, 0.5) < 0.0);
    }

    #[test]
    fn ball_moves_linearly() {
        for dt in [0.0, 0.004, 0.016, 0.25] {
            let mut w = world();
            let before = w.ball.position;
            let movement = w.ball.movement;
            w.update(dt);
            let expected = before + movement * w.speed * dt;
            assert!((w.ball.position - expected).length() < EPS, "dt={dt}");
        }
    }

    #[test]
    fn negative_dt_is_treated_as_zero() {
        let mut w = world();
        let before = w.ball.position;
        w.update(-1.0);
        assert_eq!(w.ball.position, before);
    }

    #[test]
    fn ball_past_right_edge_ends_round_without_moving() {
        let mut w = world();
        w.ball.position = Vec2::new(6.1, 0.0);
        w.left.movement = Vec2::Y;
        w.update(0.016);
        assert!(!w.is_running());
        assert_eq!(w.end(), Some(GameEnd::LeftScored));
        assert_eq!(w.ball.position, Vec2::new(6.1, 0.0));
        assert_eq!(w.left.position, Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn ball_past_left_edge_scores_for_right() {
        let mut w = world();
        w.ball.position = Vec2::new(-6.5, 1.0);
        w.update(0.016);
        assert_eq!(w.end(), Some(GameEnd::RightScored));
    }

    #[test]
    fn overlap_with_right_paddle_flips_horizontal_once() {
        let mut w = world();
        w.ball.position = Vec2::new(4.7, 0.3);
        w.ball.movement = Vec2::new(1.0, 1.0);
        w.update(0.0);
        assert_eq!(w.ball.movement, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn overlap_with_left_paddle_flips_horizontal() {
        let mut w = world();
        w.ball.position = Vec2::new(-4.8, -0.5);
        w.ball.movement = Vec2::new(-1.0, 1.0);
        w.update(0.0);
        assert_eq!(w.ball.movement, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn overlap_on_one_axis_only_is_not_a_hit() {
        let mut w = world();
        // Same x as the right paddle, well above it.
        w.ball.position = Vec2::new(5.0, 2.5);
        w.ball.movement = Vec2::new(1.0, 1.0);
        w.update(0.0);
        assert_eq!(w.ball.movement.x, 1.0);
    }

    #[test]
    fn ball_below_floor_flips_vertical() {
        let mut w = world();
        w.ball.position = Vec2::new(0.0, -3.8);
        w.ball.movement = Vec2::new(1.0, -1.0);
        w.update(0.0);
        assert_eq!(w.ball.movement, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn ball_above_ceiling_flips_vertical() {
        let mut w = world();
        w.ball.position = Vec2::new(0.0, 3.6);
        w.ball.movement = Vec2::new(-1.0, 1.0);
        w.update(0.0);
        assert_eq!(w.ball.movement, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn paddle_and_wall_hits_flip_both_axes_independently() {
        let mut w = world();
        w.right.position = Vec2::new(5.0, 2.75);
        w.ball.position = Vec2::new(4.7, 3.6);
        w.ball.movement = Vec2::new(1.0, 1.0);
        w.update(0.0);
        assert_eq!(w.ball.movement, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn overlapping_both_paddles_cancels_out() {
        // Paddles pulled together so the ball touches both in one frame.
        let mut w = world();
        w.left.position = Vec2::new(-0.3, 0.0);
        w.right.position = Vec2::new(0.3, 0.0);
        w.ball.position = Vec2::ZERO;
        w.ball.movement = Vec2::new(1.0, 1.0);
        w.update(0.0);
        assert_eq!(w.ball.movement.x, 1.0);
    }

    #[test]
    fn model_matrices_are_rebuilt_not_accumulated() {
        let mut w = world();
        w.ball.movement = Vec2::ZERO;
        for _ in 0..100 {
            w.update(0.016);
        }
        let expected = model_matrix(w.ball.position, w.ball.scale);
        assert!(w.ball.model.abs_diff_eq(expected, EPS));
        let paddle = model_matrix(Vec2::new(5.0, 0.0), Vec2::new(0.5, 2.0));
        assert!(w.right.model.abs_diff_eq(paddle, EPS));
    }

    #[test]
    fn ball_model_mirrors_the_quad() {
        let w = world();
        let corner = w.ball.model.transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert!((corner - Vec3::new(-3.25, -0.25, 0.0)).length() < EPS);
    }

    #[test]
    fn draw_order_is_right_left_ball() {
        let w = world();
        let [right, left, ball] = w.model_matrices();
        assert_eq!(right.w_axis.x, 5.0);
        assert_eq!(left.w_axis.x, -5.0);
        assert_eq!(ball.w_axis.x, -3.0);
    }

    #[test]
    fn quit_is_sticky_and_first_end_wins() {
        let mut w = world();
        w.request_quit();
        w.ball.position = Vec2::new(7.0, 0.0);
        w.update(0.016);
        assert_eq!(w.end(), Some(GameEnd::QuitRequested));
        assert_eq!(w.frame, 0);
    }
}
