//! Hub configuration

/// Hub configuration options
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Number of subscribers to pre-allocate registry space for
    pub initial_capacity: usize,

    /// Channel capacity used by [`Hub::channel`](super::Hub::channel)
    pub buffer_size: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            buffer_size: 64,
        }
    }
}

impl HubConfig {
    /// Set the registry pre-allocation
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the default subscriber buffer size (at least 1)
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}
