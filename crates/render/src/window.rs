//! Window creation and the winit event loop driver. Keyboard/mouse state
//! tracking lives in the `voxelcraft-input` crate, not here.

use anyhow::Result;
use winit::{
    event::Event,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width
    pub width: u32,
    /// Initial height
    pub height: u32,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "voxelcraft".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Window manager wrapping winit.
pub struct WindowManager {
    window: std::sync::Arc<Window>,
    event_loop: Option<EventLoop<()>>,
}

impl WindowManager {
    /// Create a new window with the given configuration.
    pub fn new(config: WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        let window = WindowBuilder::new()
            .with_title(config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .build(&event_loop)?;

        Ok(Self {
            window: std::sync::Arc::new(window),
            event_loop: Some(event_loop),
        })
    }

    /// Create a new window with an existing event loop.
    pub fn new_with_event_loop(
        config: WindowConfig,
        event_loop: &winit::event_loop::EventLoopWindowTarget<()>,
    ) -> Result<Self> {
        let window = WindowBuilder::new()
            .with_title(config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .build(event_loop)?;

        Ok(Self {
            window: std::sync::Arc::new(window),
            event_loop: None,
        })
    }

    /// Convert into just the window (consuming self).
    pub fn into_window(self) -> std::sync::Arc<Window> {
        self.window
    }

    /// Get Arc reference to the window.
    pub fn window(&self) -> std::sync::Arc<Window> {
        self.window.clone()
    }

    /// Get the current window size.
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Run the event loop with a callback.
    ///
    /// The callback receives events and returns whether to continue running.
    pub fn run<F>(mut self, mut callback: F) -> Result<()>
    where
        F: FnMut(Event<()>, &Window) -> bool + 'static,
    {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("Event loop already consumed"))?;

        let window = self.window;

        event_loop.run(move |event, elwt| {
            let should_continue = callback(event, &window);

            if !should_continue {
                elwt.exit();
            }
        })?;

        Ok(())
    }
}

