//! Disposal bookkeeping for GPU resources.
//!
//! Every buffer and texture the backdrop creates is recorded here. Teardown
//! releases them in reverse creation order, exactly once.

use std::fmt;

type Release = Box<dyn FnOnce() + Send>;

struct Entry {
    label: String,
    release: Release,
}

#[derive(Default)]
pub struct ResourceLedger {
    entries: Vec<Entry>,
    disposed: usize,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arbitrary release action.
    pub fn record(&mut self, label: impl Into<String>, release: impl FnOnce() + Send + 'static) {
        self.entries.push(Entry {
            label: label.into(),
            release: Box::new(release),
        });
    }

    pub fn track_buffer(&mut self, label: impl Into<String>, buffer: &wgpu::Buffer) {
        let buffer = buffer.clone();
        self.record(label, move || buffer.destroy());
    }

    pub fn track_texture(&mut self, label: impl Into<String>, texture: &wgpu::Texture) {
        let texture = texture.clone();
        self.record(label, move || texture.destroy());
    }

    /// Release everything still outstanding, newest first. Returns how many
    /// entries were released by this call; a second call returns 0.
    pub fn dispose_all(&mut self) -> usize {
        let count = self.entries.len();
        while let Some(entry) = self.entries.pop() {
            log::trace!("Releasing {}", entry.label);
            (entry.release)();
        }
        self.disposed += count;
        if count > 0 {
            log::debug!("Released {count} GPU resources");
        }
        count
    }

    /// Entries recorded but not yet released.
    pub fn outstanding(&self) -> usize {
        self.entries.len()
    }

    /// Total entries released over the ledger's lifetime.
    pub fn disposed(&self) -> usize {
        self.disposed
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }
}

impl fmt::Debug for ResourceLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLedger")
            .field("outstanding", &self.entries.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Drop for ResourceLedger {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            log::warn!(
                "ResourceLedger dropped with {} outstanding resources - releasing",
                self.entries.len()
            );
            self.dispose_all();
        }
    }
}
