use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::backend::BYTES_PER_PIXEL;

struct Shared {
    bytes: Mutex<Box<[u8]>>,
    generation: AtomicU64,
}

/// Caller-owned pixel memory a viewer renders into when offscreen.
///
/// The buffer is *lent* to a viewer, never transferred: the viewer holds a
/// [`CaptureView`] (a non-owning handle) and the caller keeps this value
/// alive for as long as the registration should last. Dropping the buffer,
/// or calling [`invalidate`](Self::invalidate), makes every outstanding view
/// stale; a draw through a stale view fails with a deterministic
/// `InvalidState` error instead of touching dead memory.
pub struct CaptureBuffer {
    shared: Arc<Shared>,
}

impl CaptureBuffer {
    /// Allocates a zeroed buffer of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                bytes: Mutex::new(vec![0u8; len].into_boxed_slice()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Allocates a buffer sized for a `width` x `height` RGBA8 frame.
    pub fn for_size(width: u32, height: u32) -> Self {
        Self::new(width as usize * height as usize * BYTES_PER_PIXEL)
    }

    pub fn len(&self) -> usize {
        self.shared.bytes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a non-owning view at the current generation.
    pub fn view(&self) -> CaptureView {
        CaptureView {
            shared: Arc::downgrade(&self.shared),
            len: self.len(),
            generation: self.shared.generation.load(Ordering::Acquire),
        }
    }

    /// Unregisters every outstanding view without freeing the memory.
    ///
    /// Equivalent, for viewers, to the buffer having been dropped: the next
    /// draw through an old view fails. Fresh views may be handed out again
    /// afterwards.
    pub fn invalidate(&self) {
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Copies the current contents out.
    pub fn to_vec(&self) -> Vec<u8> {
        self.shared.bytes.lock().unwrap().to_vec()
    }
}

/// Non-owning, generation-tagged handle to a [`CaptureBuffer`].
///
/// Held by a configured viewer for the duration of the registration. Stale
/// when the buffer was dropped or invalidated after the view was taken.
#[derive(Debug, Clone)]
pub struct CaptureView {
    shared: Weak<Shared>,
    len: usize,
    generation: u64,
}

impl CaptureView {
    /// Length the view was taken at, in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the underlying buffer is still alive at this generation.
    pub fn is_live(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.generation.load(Ordering::Acquire) == self.generation,
            None => false,
        }
    }

    /// Copies `src` into the front of the buffer. Returns `false` when the
    /// view is stale, in which case nothing is written.
    pub(crate) fn copy_from(&self, src: &[u8]) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        if shared.generation.load(Ordering::Acquire) != self.generation {
            return false;
        }
        let mut bytes = shared.bytes.lock().unwrap();
        let n = src.len().min(bytes.len());
        bytes[..n].copy_from_slice(&src[..n]);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_tracks_buffer_lifetime() {
        let buffer = CaptureBuffer::new(64);
        let view = buffer.view();
        assert!(view.is_live());

        drop(buffer);
        assert!(!view.is_live());
        assert!(!view.copy_from(&[1, 2, 3]));
    }

    #[test]
    fn invalidate_stales_existing_views_only() {
        let buffer = CaptureBuffer::new(64);
        let old = buffer.view();
        buffer.invalidate();

        assert!(!old.is_live());
        assert!(buffer.view().is_live());
    }

    #[test]
    fn copy_lands_in_buffer() {
        let buffer = CaptureBuffer::new(4);
        assert!(buffer.view().copy_from(&[9, 8, 7, 6]));
        assert_eq!(buffer.to_vec(), vec![9, 8, 7, 6]);
    }

    #[test]
    fn for_size_matches_pixel_math() {
        let buffer = CaptureBuffer::for_size(16, 16);
        assert_eq!(buffer.len(), 16 * 16 * BYTES_PER_PIXEL);
    }
}
