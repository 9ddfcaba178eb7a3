//! Runs `life_step.wgsl` on a real adapter and checks it against `CellGrid`.
//!
//! Every test returns early when the machine has no compute-capable adapter.

use gpu_life::gfx::shaders::{compile_shader, LIFE_STEP_WGSL};
use gpu_life::simulation::{Brush, CellGrid, LifeSimulation, StepUniforms};
use gpu_life::LifeError;
use rand::{rngs::StdRng, Rng, SeedableRng};

struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    shader: wgpu::ShaderModule,
}

fn gpu() -> Option<Gpu> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .ok()?;
        if !adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            return None;
        }
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Test Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .ok()?;
        let shader = compile_shader(&device, "life_step", LIFE_STEP_WGSL).ok()?;
        Some(Gpu {
            device,
            queue,
            shader,
        })
    })
}

/// Steps `first` on the GPU `steps` times with fixed uniforms and reads it back
fn run(gpu: &Gpu, first: &CellGrid, steps: usize, mouse: [f32; 4], radius: f32) -> CellGrid {
    let mut simulation =
        LifeSimulation::new(&gpu.device, &gpu.queue, &gpu.shader, first, radius).unwrap();
    for _ in 0..steps {
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        let _ = simulation.step_with(
            &mut encoder,
            &gpu.queue,
            StepUniforms::new(mouse, radius, 0.0),
        );
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
    simulation.read_current(&gpu.device, &gpu.queue).unwrap()
}

fn random_grid(width: u32, height: u32, seed: u64) -> CellGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = CellGrid::new(width, height);
    grid.fill_with(|_, _| rng.random_bool(0.35));
    grid
}

#[test]
fn random_soup_matches_reference() {
    let Some(gpu) = gpu() else { return };

    // Not a multiple of the workgroup size in either direction
    let first = random_grid(37, 21, 7);
    let mut expected = first.clone();
    for _ in 0..5 {
        expected = expected.step();
    }

    assert_eq!(run(&gpu, &first, 5, [0.0; 4], 5.0), expected);
}

#[test]
fn still_life_and_oscillator() {
    let Some(gpu) = gpu() else { return };

    let block = CellGrid::with_live_cells(16, 16, &[(4, 4), (5, 4), (4, 5), (5, 5)]);
    assert_eq!(run(&gpu, &block, 1, [0.0; 4], 5.0), block);

    let blinker = CellGrid::with_live_cells(16, 16, &[(7, 6), (7, 7), (7, 8)]);
    let once = run(&gpu, &blinker, 1, [0.0; 4], 5.0);
    assert_ne!(once, blinker);
    assert_eq!(once, blinker.step());
    assert_eq!(run(&gpu, &blinker, 2, [0.0; 4], 5.0), blinker);
}

#[test]
fn empty_grid_stays_empty() {
    let Some(gpu) = gpu() else { return };

    let empty = CellGrid::new(24, 24);
    assert!(run(&gpu, &empty, 3, [0.5, 0.5, 0.0, 0.0], 5.0).is_dead());
}

#[test]
fn blinker_wraps_across_corner() {
    let Some(gpu) = gpu() else { return };

    let first = CellGrid::with_live_cells(8, 8, &[(7, 0), (0, 0), (1, 0)]);
    let next = run(&gpu, &first, 1, [0.0; 4], 5.0);
    assert_eq!(next, first.step());
    assert!(next.get(0, 7) && next.get(0, 0) && next.get(0, 1));
    assert_eq!(next.population(), 3);
}

#[test]
fn brush_paints_and_erases() {
    let Some(gpu) = gpu() else { return };

    let empty = CellGrid::new(32, 32);
    let paint = [0.5, 0.5, 1.0, 0.0];
    let painted = run(&gpu, &empty, 1, paint, 3.0);
    assert_eq!(painted, empty.step_with(Some(&Brush::new(paint, 3.0))));
    assert!(painted.get(16, 16));
    assert!(!painted.get(20, 16));

    let full = {
        let mut grid = CellGrid::new(32, 32);
        grid.fill_with(|x, _| x % 2 == 0);
        grid
    };
    let erase = [0.25, 0.75, 0.0, 1.0];
    let erased = run(&gpu, &full, 1, erase, 3.0);
    assert_eq!(erased, full.step_with(Some(&Brush::new(erase, 3.0))));
    assert!(!erased.get(8, 24));

    // Both buttons held: painting wins
    let both = [0.5, 0.5, 1.0, 1.0];
    assert!(run(&gpu, &empty, 1, both, 3.0).get(16, 16));
}

#[test]
fn reallocation_clears_and_resizes() {
    let Some(gpu) = gpu() else { return };

    let first = random_grid(16, 16, 3);
    let mut simulation =
        LifeSimulation::new(&gpu.device, &gpu.queue, &gpu.shader, &first, 5.0).unwrap();
    simulation.reallocate(&gpu.device, 40, 12);
    assert_eq!(simulation.dimensions(), (40, 12));
    assert_eq!(simulation.dispatch(), (5, 2));

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
    let uniforms = StepUniforms::new([0.0; 4], 5.0, 0.0);
    let output = simulation.step_with(&mut encoder, &gpu.queue, uniforms);
    gpu.queue.submit(std::iter::once(encoder.finish()));
    assert_eq!(output.generation, 1);

    let after = simulation.read_current(&gpu.device, &gpu.queue).unwrap();
    assert_eq!(after.dimensions(), (40, 12));
    assert!(after.is_dead());
}

#[test]
fn upload_replaces_current_generation() {
    let Some(gpu) = gpu() else { return };

    let simulation = LifeSimulation::new(
        &gpu.device,
        &gpu.queue,
        &gpu.shader,
        &CellGrid::new(20, 10),
        5.0,
    )
    .unwrap();
    let glider = CellGrid::with_live_cells(20, 10, &[(1, 2), (2, 1), (0, 0), (1, 0), (2, 0)]);
    simulation.upload(&gpu.queue, &glider);
    assert_eq!(simulation.read_current(&gpu.device, &gpu.queue).unwrap(), glider);
}

#[test]
fn resize_to_unchanged_size_keeps_generation() {
    let Some(gpu) = gpu() else { return };

    let glider = CellGrid::with_live_cells(20, 10, &[(1, 2), (2, 1), (0, 0), (1, 0), (2, 0)]);
    let mut simulation =
        LifeSimulation::new(&gpu.device, &gpu.queue, &gpu.shader, &glider, 5.0).unwrap();

    assert!(!simulation.resize_to(&gpu.device, 20, 10));
    assert!(!simulation.resize_to(&gpu.device, 0, 0));
    assert_eq!(simulation.read_current(&gpu.device, &gpu.queue).unwrap(), glider);

    assert!(simulation.resize_to(&gpu.device, 30, 10));
    assert_eq!(simulation.dimensions(), (30, 10));
    assert!(simulation.read_current(&gpu.device, &gpu.queue).unwrap().is_dead());
}

#[test]
fn missing_entry_point_is_reported_as_shader_error() {
    let Some(gpu) = gpu() else { return };

    let source = "@compute @workgroup_size(8, 8) fn other() {}";
    let shader = compile_shader(&gpu.device, "life_step", source).unwrap();
    let result = LifeSimulation::new(&gpu.device, &gpu.queue, &shader, &CellGrid::new(8, 8), 5.0);
    match result {
        Err(LifeError::ShaderCompile { label, .. }) => assert_eq!(label, "life_step"),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("pipeline without `main` was accepted"),
    }
}
