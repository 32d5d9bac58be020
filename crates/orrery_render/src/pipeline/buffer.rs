//! Growable GPU buffers for data rebuilt every frame

/// A buffer rewritten each frame that grows when the data outgrows it
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u32,
    usage: wgpu::BufferUsages,
    label: &'static str,
}

impl DynamicBuffer {
    /// Create an empty buffer with room for `initial_capacity` bytes
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        initial_capacity: u64,
    ) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let capacity = initial_capacity.max(wgpu::COPY_BUFFER_ALIGNMENT);
        Self {
            buffer: Self::allocate(device, label, usage, capacity),
            capacity,
            len: 0,
            usage,
            label,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, usage: wgpu::BufferUsages, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }

    /// Replace the contents with `items`
    pub fn write<T: bytemuck::Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, items: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(items);
        let size = bytes.len() as u64;
        if size > self.capacity {
            let capacity = grown_capacity(self.capacity, size);
            log::debug!("Growing {} to {} bytes", self.label, capacity);
            self.buffer = Self::allocate(device, self.label, self.usage, capacity);
            self.capacity = capacity;
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = items.len() as u32;
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of items from the last write
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Double the capacity until `needed` fits
fn grown_capacity(current: u64, needed: u64) -> u64 {
    let mut capacity = current.max(wgpu::COPY_BUFFER_ALIGNMENT);
    while capacity < needed {
        capacity *= 2;
    }
    capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(64, 10), 64);
        assert_eq!(grown_capacity(64, 65), 128);
        assert_eq!(grown_capacity(64, 1000), 1024);
        assert_eq!(grown_capacity(0, 5), 8);
    }
}
