//! Per-frame orchestration: owns the window, GPU context, and the
//! simulation's world loop/player body/interaction state, and ties input to
//! edits to remeshing to draw calls.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use glam::Vec3;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoopWindowTarget;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window};

use voxelcraft_assets::TextureAtlas;
use voxelcraft_camera::Camera;
use voxelcraft_core::block::{self, BlockId};
use voxelcraft_input::InputState;
use voxelcraft_physics::{MoveInput, PlayerBody};
use voxelcraft_render::{
    remesh_dirty_chunks, ChunkManager, Frustum, GpuAtlas, RenderCategory, RenderContext,
    VoxelPipeline, WindowConfig, WindowManager,
};
use voxelcraft_world::interaction::InteractionState;
use voxelcraft_world::{ChunkPos, WorldLoop};

use crate::config::Config;

/// Block ids cycled through by the number row, in hotbar order.
const HOTBAR_BLOCKS: [BlockId; 9] = [
    block::STONE,
    block::DIRT,
    block::COBBLESTONE,
    block::OAK_PLANKS,
    block::OAK_LOG,
    block::GLASS,
    block::BRICK,
    block::SAND,
    block::GRAVEL,
];

/// Maximum simulated step per frame; a stalled or debugger-paused frame
/// still advances physics by at most this much.
const MAX_FRAME_DT: f32 = 0.1;

/// How game world changes are communicated back to the event loop.
pub enum GameAction {
    /// Keep running.
    Continue,
    /// The window was closed; exit the process.
    Quit,
}

/// Owns everything needed to simulate and draw one running game session.
pub struct GameWorld {
    window: Arc<Window>,
    ctx: RenderContext,
    pipeline: VoxelPipeline,
    atlas: TextureAtlas,
    chunk_manager: ChunkManager,
    world_loop: WorldLoop,
    player: PlayerBody,
    camera: Camera,
    input: InputState,
    interaction: InteractionState,
    last_frame: Instant,
}

impl GameWorld {
    /// Build the window, GPU device, atlas, and pipeline, generate the
    /// spawn region, and place the player at the spawn village.
    pub fn new(event_loop: &EventLoopWindowTarget<()>, config: &Config) -> Result<Self> {
        tracing::info!(seed = config.world_seed, "starting voxelcraft");

        let window_manager = WindowManager::new_with_event_loop(
            WindowConfig {
                title: "voxelcraft".to_string(),
                width: config.width,
                height: config.height,
                vsync: true,
            },
            event_loop,
        )?;
        let window = window_manager.into_window();

        let ctx = pollster::block_on(RenderContext::new(window.clone()))?;
        let gpu_atlas = GpuAtlas::upload(&ctx.device, &ctx.queue);
        let pipeline = VoxelPipeline::new(&ctx, &gpu_atlas)?;
        let atlas = TextureAtlas::generate();

        let mut world_loop = WorldLoop::new(config.world_seed);
        // Prime the spawn neighborhood so the village is stamped and a
        // surface height is available before the player is placed.
        world_loop.tick(ChunkPos::new(0, 0));

        let spawn_surface = world_loop.store().surface_height(40, 40);
        let player = PlayerBody::new(Vec3::new(40.5, spawn_surface as f32 + 2.0, 40.5));

        let mut camera = Camera::new(player.eye_position());
        camera.set_aspect(ctx.size.0, ctx.size.1);

        let chunk_manager = ChunkManager::new();

        Ok(Self {
            window,
            ctx,
            pipeline,
            atlas,
            chunk_manager,
            world_loop,
            player,
            camera,
            input: InputState::new(),
            interaction: InteractionState::new(),
            last_frame: Instant::now(),
        })
    }

    /// Dispatch one winit event, driving a redraw on `RedrawRequested` and a
    /// continuous frame loop via `AboutToWait`.
    pub fn handle_event(
        &mut self,
        event: &Event<()>,
        _elwt: &EventLoopWindowTarget<()>,
    ) -> GameAction {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                self.input.handle_event(event);
                match event {
                    WindowEvent::CloseRequested => return GameAction::Quit,
                    WindowEvent::KeyboardInput {
                        event: key_event, ..
                    } => {
                        if key_event.state.is_pressed()
                            && key_event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                        {
                            self.set_cursor_locked(!self.input.cursor_locked);
                        }
                    }
                    WindowEvent::Resized(new_size) => {
                        self.ctx.resize((new_size.width, new_size.height));
                        self.pipeline.resize(&self.ctx.device, (new_size.width, new_size.height));
                        self.camera.set_aspect(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => self.update_and_render(),
                    _ => {}
                }
            }
            Event::DeviceEvent { event, .. } => {
                if self.input.cursor_locked {
                    self.input.handle_device_event(event);
                }
            }
            Event::AboutToWait => self.window.request_redraw(),
            _ => {}
        }
        GameAction::Continue
    }

    fn set_cursor_locked(&mut self, locked: bool) {
        self.input.cursor_locked = locked;
        let mode = if locked { CursorGrabMode::Locked } else { CursorGrabMode::None };
        if self.window.set_cursor_grab(mode).is_err() {
            let _ = self.window.set_cursor_grab(CursorGrabMode::Confined);
        }
        self.window.set_cursor_visible(!locked);
    }

    fn update_and_render(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = now;

        self.update_camera_rotation();

        let (forward, right) = self.input.movement_input();
        let jump = self.input.key_pressed(KeyCode::Space);
        let move_input = MoveInput {
            forward,
            strafe: right,
            sprint: self.input.is_sprinting(),
            jump,
            sneak: self.input.is_sneaking(),
        };
        self.player.integrate(dt, move_input, self.camera.yaw, self.world_loop.store());
        self.camera.position = self.player.eye_position();

        self.interaction.tick(dt);
        self.handle_interaction();

        let player_chunk = ChunkPos::containing(self.player.position.x as i32, self.player.position.z as i32);
        let dirty = self.world_loop.tick(player_chunk);
        remesh_dirty_chunks(
            &self.ctx.device,
            self.world_loop.store(),
            &self.atlas,
            &dirty,
            &self.pipeline.chunk_bind_group_layout,
            &mut self.chunk_manager,
        );

        self.render();
        self.input.begin_frame();
    }

    fn update_camera_rotation(&mut self) {
        if !self.input.cursor_locked {
            return;
        }
        const SENSITIVITY: f32 = 0.002;
        let (dx, dy) = self.input.mouse_delta;
        self.camera.rotate(dx as f32 * SENSITIVITY, -dy as f32 * SENSITIVITY);
    }

    fn handle_interaction(&mut self) {
        if !self.input.cursor_locked {
            return;
        }
        let origin = self.camera.position;
        let direction = self.camera.forward();

        if self.input.just_broke() {
            self.interaction.try_break(self.world_loop.store_mut(), origin, direction);
        } else if self.input.just_placed() {
            let block_id = HOTBAR_BLOCKS[self.input.selected_slot as usize % HOTBAR_BLOCKS.len()];
            let aabb = self.player.aabb();
            let player_min = Vec3::new(aabb.min[0], aabb.min[1], aabb.min[2]);
            let player_max = Vec3::new(aabb.max[0], aabb.max[1], aabb.max[2]);
            self.interaction.try_place(
                self.world_loop.store_mut(),
                origin,
                direction,
                block_id,
                player_min,
                player_max,
            );
        }
    }

    fn render(&mut self) {
        let frame = match self.ctx.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.ctx.resize(self.ctx.size);
                return;
            }
            Err(err) => {
                tracing::error!(%err, "failed to acquire a surface frame");
                return;
            }
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.pipeline.update_camera(&self.ctx.queue, &self.camera);

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("voxelcraft frame encoder"),
        });

        let frustum = Frustum::from_matrix(&self.camera.view_projection_matrix());

        {
            let mut pass = self.pipeline.begin_render_pass(&mut encoder, &view);
            pass.set_bind_group(0, self.pipeline.camera_bind_group(), &[]);
            pass.set_bind_group(2, self.pipeline.atlas_bind_group(), &[]);

            for category in [RenderCategory::Opaque, RenderCategory::Water, RenderCategory::Glass] {
                pass.set_pipeline(self.pipeline.pipeline(category));
                for (pos, meshes) in self.chunk_manager.iter() {
                    if !frustum.is_chunk_visible(*pos) {
                        continue;
                    }
                    let stream = match category {
                        RenderCategory::Opaque => &meshes.opaque,
                        RenderCategory::Water => &meshes.water,
                        RenderCategory::Glass => &meshes.glass,
                    };
                    let Some(gpu_mesh) = stream else { continue };

                    pass.set_bind_group(1, &gpu_mesh.bind_group, &[]);
                    pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
                }
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
