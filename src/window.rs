//! winit host for the frame scheduler.

use std::sync::Arc;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::error::BackgroundError;
use crate::gpu::GpuRenderer;
use crate::resize::Viewport;
use crate::scheduler::{Animation, FramePacer, FrameScheduler};

/// Frame pacing through the window's redraw requests.
pub struct WindowPacer {
    window: Arc<Window>,
}

impl WindowPacer {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl FramePacer for WindowPacer {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

type HostedScheduler = FrameScheduler<Box<dyn Animation>, GpuRenderer, WindowPacer>;

pub(crate) struct App {
    title: String,
    /// Taken when the window is created.
    animation: Option<Box<dyn Animation>>,
    window: Option<Arc<Window>>,
    scheduler: Option<HostedScheduler>,
    /// First startup failure, reported once the event loop returns.
    startup_error: Option<BackgroundError>,
}

impl App {
    pub fn new(title: impl Into<String>, animation: Box<dyn Animation>) -> Self {
        Self {
            title: title.into(),
            animation: Some(animation),
            window: None,
            scheduler: None,
            startup_error: None,
        }
    }

    pub fn take_startup_error(&mut self) -> Option<BackgroundError> {
        self.startup_error.take()
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackgroundError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let renderer = pollster::block_on(GpuRenderer::new(window.clone()))?;
        let viewport = renderer.viewport();

        if let Some(animation) = self.animation.take() {
            self.scheduler = Some(FrameScheduler::start(
                animation,
                renderer,
                WindowPacer::new(window),
                viewport,
            ));
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.start(event_loop) {
                error!("{}", e);
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.resize(Viewport::new(physical_size.width, physical_size.height));
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(scheduler) = &mut self.scheduler {
                    if let Err(e) = scheduler.tick() {
                        // No retry: the loop ends and the window stays up
                        error!("frame loop stopped after {} frames: {}", scheduler.frames(), e);
                        self.scheduler = None;
                    }
                }
            }
            _ => {}
        }
    }
}
