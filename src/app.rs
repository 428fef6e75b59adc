//! The winit frame loop.
//!
//! [`run`] opens the window, creates the GPU context and renderer on the first
//! `resumed` event, and then, every redraw, applies input to the [`SceneState`], runs the
//! per-frame rules, composes the frame, and renders it.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::config::ViewerConfig;
use crate::controls::{Command, command_for};
use crate::error::ViewerError;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::renderer::Renderer;
use crate::scene::{SceneComposer, SceneState};

/// Runs the viewer until the window closes or Esc is pressed.
///
/// Initialisation errors end the loop and are returned to the caller.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = BathyscopeApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        BathyscopeApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum BathyscopeApp {
    Pending {
        config: ViewerConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        renderer: Renderer,
        state: SceneState,
        composer: SceneComposer,
        input: Input,
        start_time: Instant,
        last_frame: Instant,
    },
    Failed(ViewerError),
}

impl BathyscopeApp {
    fn start(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .with_fullscreen(
                config
                    .window
                    .fullscreen
                    .then_some(Fullscreen::Borderless(None)),
            );

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;

        let mut state = SceneState::new(config);
        state.resize(gpu.width(), gpu.height());
        info!(
            seed = ?state.scenery.seed,
            instances = state.scenery.len(),
            "scenery generated"
        );

        let renderer = Renderer::new(&gpu, &config.asset_dir, &state.view_volume().geometry());

        Ok(BathyscopeApp::Running {
            window,
            gpu,
            renderer,
            state,
            composer: SceneComposer::new(),
            input: Input::new(),
            start_time: Instant::now(),
            last_frame: Instant::now(),
        })
    }
}

impl ApplicationHandler for BathyscopeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let BathyscopeApp::Pending { config } = self {
            *self = match Self::start(event_loop, config) {
                Ok(app) => app,
                Err(err) => {
                    event_loop.exit();
                    BathyscopeApp::Failed(err)
                }
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let BathyscopeApp::Running {
            window,
            gpu,
            renderer,
            state,
            composer,
            input,
            start_time,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                if size.width > 0 && size.height > 0 {
                    state.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let time = start_time.elapsed().as_secs_f32();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                for &key in input.pressed() {
                    let Some(command) = command_for(key) else {
                        continue;
                    };
                    if !state.apply(command) {
                        event_loop.exit();
                        return;
                    }
                    if command == Command::ToggleFullscreen {
                        window.set_fullscreen(
                            state.fullscreen.then_some(Fullscreen::Borderless(None)),
                        );
                    }
                }

                state.drive(|key| input.key_down(key), dt);
                if let Some(delta) = input.look_delta() {
                    state.look(delta.x, delta.y);
                }
                if input.scroll_delta() != 0.0 {
                    state.scroll(input.scroll_delta());
                }
                state.update(time);

                let plan = composer.compose(state);
                renderer.render(gpu, &plan, state);

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}
