use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use winit::event::{ModifiersState, VirtualKeyCode};

use crate::graphics::Canvas;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixel surface failed: {0}")]
    Pixels(#[from] pixels::Error),
}

pub struct AppConfig {
    pub title: String,
    /// Logical frame size; the window is created at this size and the frame is
    /// scaled to fit on resize.
    pub frame_size: PhysicalSize<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: VirtualKeyCode,
    pub pressed: bool,
    pub modifiers: ModifiersState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A game driven by the windowed loop: keys and frame deltas in, pixels out.
pub trait GameApp {
    fn on_key(&mut self, event: KeyEvent) -> AppControl;

    /// Printable characters typed, after keyboard layout is applied.
    fn on_text(&mut self, _ch: char) {}

    fn update(&mut self, dt: Duration) -> AppControl;

    fn render(&mut self, canvas: &mut Canvas<'_>);
}

pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), AppError> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(config.frame_size)
        .build(&event_loop)?;

    let frame_size = config.frame_size;
    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels = Pixels::new(frame_size.width, frame_size.height, surface_texture)?;

    let mut modifiers = ModifiersState::empty();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if let Err(err) = resize_surface(&mut pixels, size) {
                        tracing::warn!("resize failed: {err}");
                    }
                }
                WindowEvent::ModifiersChanged(state) => {
                    modifiers = state;
                }
                WindowEvent::ReceivedCharacter(ch) if !ch.is_control() => {
                    game.on_text(ch);
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    let event = KeyEvent {
                        key,
                        pressed: state == ElementState::Pressed,
                        modifiers,
                    };
                    if game.on_key(event) == AppControl::Exit {
                        *control_flow = ControlFlow::Exit;
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                if game.update(dt) == AppControl::Exit {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                if let Some(mut canvas) =
                    Canvas::new(pixels.frame_mut(), frame_size.width, frame_size.height)
                {
                    game.render(&mut canvas);
                }
                if let Err(err) = pixels.render() {
                    tracing::error!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }
    });
}

fn resize_surface(pixels: &mut Pixels, size: PhysicalSize<u32>) -> Result<(), pixels::Error> {
    if size.width == 0 || size.height == 0 {
        return Ok(());
    }
    pixels.resize_surface(size.width, size.height)?;
    Ok(())
}
