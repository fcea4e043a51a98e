use crate::data::{GpuReading, TelemetryEvent};
use crossbeam_channel::Sender;
use log::{info, warn};
use nvml_wrapper::Nvml;
use std::thread;
use std::time::Duration;
use sysinfo::System;
use thiserror::Error;

pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("NVML query failed: {0}")]
    Nvml(#[from] nvml_wrapper::error::NvmlError),
    #[error("no GPU device found at index {0}")]
    DeviceNotFound(u32),
}

pub trait GpuTelemetry: Send {
    fn sample(&self) -> Result<GpuReading, MonitorError>;
}

pub struct NvmlSampler {
    nvml: Nvml,
    device_index: u32,
}

impl NvmlSampler {
    pub fn new(device_index: u32) -> Result<Self, MonitorError> {
        let nvml = Nvml::init()?;
        if nvml.device_count()? <= device_index {
            return Err(MonitorError::DeviceNotFound(device_index));
        }
        // Validate the device up front so a missing GPU surfaces here and not
        // on the first sampling tick.
        nvml.device_by_index(device_index)?;
        Ok(Self { nvml, device_index })
    }
}

impl GpuTelemetry for NvmlSampler {
    fn sample(&self) -> Result<GpuReading, MonitorError> {
        let device = self.nvml.device_by_index(self.device_index)?;
        let util = device.utilization_rates()?;
        let mem = device.memory_info()?;
        Ok(GpuReading {
            gpu_percent: util.gpu as f32,
            vram_percent: percent_of(mem.used, mem.total),
        })
    }
}

pub fn create_gpu_sampler() -> Option<Box<dyn GpuTelemetry>> {
    match NvmlSampler::new(0) {
        Ok(sampler) => {
            info!("NVML sampler initialized");
            Some(Box::new(sampler))
        }
        Err(err) => {
            warn!("GPU telemetry unavailable: {err}");
            None
        }
    }
}

// CPU and physical-memory utilization from the OS. Assumed to always work on
// a supported host; there is no per-sample error path.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    // The first reading reports 0% CPU: utilization is computed against the
    // previous refresh, and there is none yet.
    pub fn sample(&mut self) -> (f32, f32) {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        let cpu = self.system.global_cpu_usage();
        let ram = percent_of(self.system.used_memory(), self.system.total_memory());
        (cpu, ram)
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

fn percent_of(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        used as f32 / total as f32 * 100.0
    }
}

// Vendor errors stop at this boundary; the UI only ever sees a reading or an
// absent one.
fn gpu_event(sampler: &dyn GpuTelemetry) -> TelemetryEvent {
    match sampler.sample() {
        Ok(reading) => TelemetryEvent::Gpu(Some(reading)),
        Err(err) => {
            warn!("GPU sample failed: {err}");
            TelemetryEvent::Gpu(None)
        }
    }
}

// Two independent workers, each "sample, send, sleep" until the receiver is
// dropped. They never touch UI state; the UI thread drains the channel.
pub fn spawn_samplers(tx: Sender<TelemetryEvent>) {
    spawn_cpu_ram_worker(tx.clone());
    spawn_gpu_worker(tx);
}

fn spawn_cpu_ram_worker(tx: Sender<TelemetryEvent>) {
    thread::spawn(move || {
        let mut sampler = SystemSampler::new();
        loop {
            let (cpu_percent, ram_percent) = sampler.sample();
            if tx
                .send(TelemetryEvent::CpuRam {
                    cpu_percent,
                    ram_percent,
                })
                .is_err()
            {
                break;
            }
            thread::sleep(SAMPLE_INTERVAL);
        }
    });
}

fn spawn_gpu_worker(tx: Sender<TelemetryEvent>) {
    thread::spawn(move || {
        let Some(sampler) = create_gpu_sampler() else {
            // No device and no driver appearing mid-run: pin the readouts at
            // zero once and stop polling.
            let _ = tx.send(TelemetryEvent::Gpu(None));
            return;
        };
        loop {
            if tx.send(gpu_event(sampler.as_ref())).is_err() {
                break;
            }
            thread::sleep(SAMPLE_INTERVAL);
        }
    });
}
