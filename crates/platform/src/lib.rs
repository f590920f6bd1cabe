//! Platform layer: windowing, GL context creation, event loop glue.
//!
//! Owns the startup sequence: every loader/builder failure propagates out
//! of [`run`] before the event loop starts, so a broken configuration
//! exits nonzero without ever showing a window frame.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glutin::{
    event::{Event, WindowEvent},
    event_loop::ControlFlow,
};

use asset::ply::{self, PlyCounts};
use renderer::{RenderContext, ShaderProgram};

pub mod gl;

pub use gl::GlowApi;

/// Everything the viewer needs to start, assembled by the CLI layer.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vert_path: PathBuf,
    pub frag_path: PathBuf,
    /// `None` renders the built-in demo triangle instead of a mesh.
    pub mesh_path: Option<PathBuf>,
    pub counts: PlyCounts,
    /// Cross-check header-declared counts and face arity while loading.
    pub strict_header: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "plyspin".to_owned(),
            width: 640,
            height: 480,
            vert_path: PathBuf::from("shaders/main.vert"),
            frag_path: PathBuf::from("shaders/main.frag"),
            mesh_path: None,
            counts: ply::BUNNY_COUNTS,
            strict_header: false,
        }
    }
}

/// Create the window and GL context, run the startup sequence, then hand
/// control to the event loop. Only returns early, on a startup error.
pub fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = glutin::event_loop::EventLoop::new();
    let window_builder = glutin::window::WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(glutin::dpi::LogicalSize::new(
            config.width as f64,
            config.height as f64,
        ));
    let windowed = glutin::ContextBuilder::new()
        .with_vsync(true)
        .build_windowed(window_builder, &event_loop)
        .context("Failed to create window and GL context")?;
    let windowed = unsafe {
        windowed
            .make_current()
            .map_err(|(_, e)| anyhow::anyhow!("Failed to make GL context current: {e}"))?
    };
    let gl = unsafe {
        glow::Context::from_loader_function(|s| windowed.get_proc_address(s) as *const _)
    };
    let mut api = GlowApi::new(gl)?;

    log::info!(
        "Window created: {}x{}",
        windowed.window().inner_size().width,
        windowed.window().inner_size().height
    );

    // Startup sequence: shaders first, then the mesh if one was asked for.
    let program = ShaderProgram::from_files(&mut api, &config.vert_path, &config.frag_path)?;
    let context = match &config.mesh_path {
        Some(path) => {
            let mesh = if config.strict_header {
                ply::load_ply_checked_from_path(path, config.counts)?
            } else {
                ply::load_ply_from_path(path, config.counts)?
            };
            RenderContext::for_mesh(&mut api, program, &mesh)?
        }
        None => RenderContext::for_triangle(&mut api, program)?,
    };
    let mut context = Some(context);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::info!("Close requested. Exiting event loop.");
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(new_size) => {
                    windowed.resize(new_size);
                    api.viewport(new_size.width, new_size.height);
                }
                _ => {}
            },
            // Keep spinning: request the next frame as soon as the queue
            // drains, like an idle-callback redisplay.
            Event::MainEventsCleared => windowed.window().request_redraw(),
            Event::RedrawRequested(_) => {
                if let Some(context) = context.as_mut() {
                    context.render_frame(&mut api);
                }
                if let Err(e) = windowed.swap_buffers() {
                    log::error!("swap_buffers failed: {e}");
                }
            }
            Event::LoopDestroyed => {
                if let Some(context) = context.take() {
                    context.destroy(&mut api);
                }
                log::info!("Render loop finished.");
            }
            _ => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_bunny_counts() {
        let config = ViewerConfig::default();
        assert_eq!(config.counts, ply::BUNNY_COUNTS);
        assert!(config.mesh_path.is_none());
        assert!(!config.strict_header);
    }
}
