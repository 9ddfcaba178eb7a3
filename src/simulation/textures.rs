//! The generation image pair
//!
//! Two same-sized `R32Float` images. One holds the current generation, the
//! other receives the next one; [`GenerationTextures::swap`] flips the roles
//! after every step. Nothing here reacts to window resizes: a new size means
//! an explicit [`GenerationTextures::reallocate`].

use futures::channel::oneshot;

use super::grid::CellGrid;
use crate::error::{LifeError, LifeResult};
use crate::gfx::resources::TextureResource;

pub struct GenerationTextures {
    textures: [TextureResource; 2],
    current: usize,
    width: u32,
    height: u32,
}

impl GenerationTextures {
    /// Allocates the pair and uploads `first` as the current generation
    ///
    /// The next-generation image starts zeroed.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, first: &CellGrid) -> Self {
        let (width, height) = first.dimensions();
        let textures = Self::allocate(device, width, height);
        textures[0].write_cells(queue, &first.to_texels());

        log::debug!("Allocated {}x{} generation pair", width, height);

        Self {
            textures,
            current: 0,
            width,
            height,
        }
    }

    fn allocate(device: &wgpu::Device, width: u32, height: u32) -> [TextureResource; 2] {
        [
            TextureResource::create_cell_texture(device, width, height, "Generation A"),
            TextureResource::create_cell_texture(device, width, height, "Generation B"),
        ]
    }

    /// Replaces both images with zeroed ones of a new size
    ///
    /// Bind groups built against the old images are invalid afterwards.
    pub fn reallocate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        log::info!(
            "Reallocating generation pair {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.textures = Self::allocate(device, width, height);
        self.current = 0;
        self.width = width;
        self.height = height;
    }

    /// Overwrites the current generation
    ///
    /// # Panics
    /// Panics if the grid size differs from the pair's size
    pub fn upload(&self, queue: &wgpu::Queue, grid: &CellGrid) {
        assert_eq!(
            grid.dimensions(),
            self.dimensions(),
            "Generation upload size mismatch"
        );
        self.current().write_cells(queue, &grid.to_texels());
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Index (0 or 1) of the image holding the current generation
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &TextureResource {
        &self.textures[self.current]
    }

    pub fn texture(&self, index: usize) -> &TextureResource {
        &self.textures[index]
    }

    /// The image just written becomes current
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    /// Copies the current generation back to the host (blocking)
    pub fn read_current(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> LifeResult<CellGrid> {
        let unpadded_bytes_per_row = 4 * self.width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;
        let buffer_size = (padded_bytes_per_row * self.height) as u64;

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Generation Readback Buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Generation Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.current().texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            self.current().texture.size(),
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging_buffer.slice(..);
        let (tx, rx) = oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| LifeError::Readback(e.to_string()))?;

        match futures::executor::block_on(rx) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(LifeError::Readback(e.to_string())),
            Err(_) => return Err(LifeError::Readback("map callback dropped".to_string())),
        }

        let mut texels = Vec::with_capacity((self.width * self.height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks_exact(padded_bytes_per_row as usize) {
                let row: &[f32] = bytemuck::cast_slice(&row[..unpadded_bytes_per_row as usize]);
                texels.extend_from_slice(row);
            }
        }
        staging_buffer.unmap();

        Ok(CellGrid::from_texels(self.width, self.height, &texels))
    }
}

/// Size the pair should take when the window becomes `width`x`height`
///
/// `None` for a minimized window or a size the pair already has, so the
/// current generation survives resize events that change nothing.
pub fn reallocation_target(current: (u32, u32), width: u32, height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || (width, height) == current {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_keeps_generation() {
        assert_eq!(reallocation_target((256, 256), 256, 256), None);
    }

    #[test]
    fn minimized_window_keeps_generation() {
        assert_eq!(reallocation_target((256, 256), 0, 0), None);
        assert_eq!(reallocation_target((256, 256), 0, 480), None);
        assert_eq!(reallocation_target((256, 256), 640, 0), None);
    }

    #[test]
    fn new_size_reallocates() {
        assert_eq!(reallocation_target((256, 256), 640, 480), Some((640, 480)));
        assert_eq!(reallocation_target((256, 256), 256, 257), Some((256, 257)));
    }
}
