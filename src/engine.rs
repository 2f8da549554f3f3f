use anyhow::Result;
use log::{error, info};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use crate::flight::{binding_for, PressedKeys};
use crate::world::World;

/// Seam to the actual renderer, which lives outside this crate. The engine
/// hands it the world once per frame after the update.
pub trait Renderer {
    fn render(&mut self, world: &World) -> Result<()>;
}

/// Renderer that draws nothing; used by the headless binary and in tests
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _world: &World) -> Result<()> {
        Ok(())
    }
}

pub struct Engine {
    event_loop: EventLoop<()>,
    window: Window,
}

impl Engine {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title("Drone Engine")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?;

        Ok(Self { event_loop, window })
    }

    pub fn run<R: Renderer + 'static>(self, mut world: World, mut renderer: R) -> Result<()> {
        let Self { event_loop, window } = self;

        let mut pressed = PressedKeys::new();
        let mut last_update_time = std::time::Instant::now();
        let mut frame_count: u32 = 0;
        let mut fps_timer = std::time::Instant::now();
        let mut current_fps: f32 = 0.0;

        info!("entering render loop");

        event_loop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    target.exit();
                }
                Event::WindowEvent {
                    event: WindowEvent::Focused(false),
                    ..
                } => {
                    // Keys released while unfocused never reach us; drop them
                    pressed.clear();
                }
                Event::WindowEvent {
                    event:
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key_code),
                                    state,
                                    repeat,
                                    ..
                                },
                            ..
                        },
                    ..
                } => match state {
                    ElementState::Pressed => {
                        if binding_for(key_code).is_some() {
                            pressed.press(key_code);
                        } else if !repeat {
                            // One-shot camera actions on the press edge
                            match key_code {
                                KeyCode::KeyC => {
                                    if let Err(e) = world.cycle_camera() {
                                        error!("camera cycle failed: {:#}", e);
                                    }
                                }
                                KeyCode::KeyR => {
                                    if let Err(e) = world.reset_camera() {
                                        error!("camera reset failed: {:#}", e);
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    ElementState::Released => {
                        pressed.release(key_code);
                    }
                },
                Event::AboutToWait => {
                    window.request_redraw();
                }
                Event::WindowEvent {
                    event: WindowEvent::RedrawRequested,
                    ..
                } => {
                    let now = std::time::Instant::now();
                    let delta_time = now.duration_since(last_update_time).as_secs_f32();
                    last_update_time = now;

                    if let Err(e) = world.update(delta_time, &pressed) {
                        error!("world update failed: {:#}", e);
                    }

                    // Update FPS counter
                    frame_count += 1;
                    let elapsed = fps_timer.elapsed().as_secs_f32();
                    if elapsed >= 1.0 {
                        current_fps = frame_count as f32 / elapsed;
                        frame_count = 0;
                        fps_timer = std::time::Instant::now();
                    }

                    let title = format!(
                        "Drone Engine - {:.0} FPS - {} - {}",
                        current_fps,
                        world.registry.active().kind().name(),
                        if world.scheduler.is_day() { "day" } else { "night" },
                    );
                    window.set_title(&title);

                    if let Err(e) = renderer.render(&world) {
                        error!("render error: {:#}", e);
                        target.exit();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
