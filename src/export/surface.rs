use std::sync::{Arc, Mutex, PoisonError};

use ratatui::buffer::Buffer;

use crate::error::CaptureError;

/// Something that can hand over the most recently rendered frame.
pub trait RenderSurface: Send + Sync {
    fn capture(&self) -> Result<Buffer, CaptureError>;
}

/// The last frame the UI finished drawing. The draw loop publishes into it
/// after every completed frame; captures copy it out.
#[derive(Clone, Default)]
pub struct SharedSurface {
    frame: Arc<Mutex<Option<Buffer>>>,
}

impl SharedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, buffer: &Buffer) {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        match frame.as_mut() {
            Some(existing) if existing.area == buffer.area => existing.clone_from(buffer),
            _ => *frame = Some(buffer.clone()),
        }
    }

    pub fn has_frame(&self) -> bool {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl RenderSurface for SharedSurface {
    fn capture(&self) -> Result<Buffer, CaptureError> {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CaptureError::SurfaceUnavailable)
    }
}
