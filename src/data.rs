use serde::Serialize;

// One GPU snapshot; both values in [0, 100].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GpuReading {
    pub gpu_percent: f32,
    pub vram_percent: f32,
}

// What a sampling worker hands to the UI thread. The CPU/RAM worker and the
// GPU/VRAM worker each produce their own variant, so the two readouts stay
// independent: a stalled vendor query never delays CPU/RAM freshness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum TelemetryEvent {
    CpuRam { cpu_percent: f32, ram_percent: f32 },
    // `None` means no device, or the vendor query failed.
    Gpu(Option<GpuReading>),
}

// Last-known values behind the four readouts. Overwrite-on-write: each event
// replaces only the fields it carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DisplayStats {
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub gpu: Option<GpuReading>,
}

impl DisplayStats {
    pub fn apply(&mut self, event: TelemetryEvent) {
        match event {
            TelemetryEvent::CpuRam {
                cpu_percent,
                ram_percent,
            } => {
                self.cpu_percent = cpu_percent;
                self.ram_percent = ram_percent;
            }
            TelemetryEvent::Gpu(reading) => self.gpu = reading,
        }
    }

    pub fn cpu_label(&self) -> String {
        format!("CPU: {:.1}%", self.cpu_percent)
    }

    pub fn ram_label(&self) -> String {
        format!("RAM: {:.1}%", self.ram_percent)
    }

    // An absent GPU renders the same as an idle one.
    pub fn gpu_label(&self) -> String {
        format!("GPU: {:.1}%", self.gpu.map_or(0.0, |g| g.gpu_percent))
    }

    pub fn vram_label(&self) -> String {
        format!("VRAM: {:.1}%", self.gpu.map_or(0.0, |g| g.vram_percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_one_decimal_digit() {
        let mut stats = DisplayStats::default();
        stats.apply(TelemetryEvent::CpuRam {
            cpu_percent: 37.77,
            ram_percent: 100.0,
        });
        assert_eq!(stats.cpu_label(), "CPU: 37.8%");
        assert_eq!(stats.ram_label(), "RAM: 100.0%");

        stats.apply(TelemetryEvent::CpuRam {
            cpu_percent: 0.0,
            ram_percent: 5.0,
        });
        assert_eq!(stats.cpu_label(), "CPU: 0.0%");
        assert_eq!(stats.ram_label(), "RAM: 5.0%");
    }

    #[test]
    fn absent_gpu_renders_as_zero() {
        let mut stats = DisplayStats::default();
        stats.apply(TelemetryEvent::Gpu(None));
        assert_eq!(stats.gpu_label(), "GPU: 0.0%");
        assert_eq!(stats.vram_label(), "VRAM: 0.0%");
    }

    #[test]
    fn absent_gpu_overwrites_a_previous_reading() {
        let mut stats = DisplayStats::default();
        stats.apply(TelemetryEvent::Gpu(Some(GpuReading {
            gpu_percent: 55.0,
            vram_percent: 60.0,
        })));
        stats.apply(TelemetryEvent::Gpu(None));
        assert_eq!(stats.gpu_label(), "GPU: 0.0%");
    }

    #[test]
    fn events_touch_only_their_own_fields() {
        let mut stats = DisplayStats::default();
        stats.apply(TelemetryEvent::CpuRam {
            cpu_percent: 10.0,
            ram_percent: 20.0,
        });
        stats.apply(TelemetryEvent::Gpu(Some(GpuReading {
            gpu_percent: 30.0,
            vram_percent: 40.0,
        })));
        assert_eq!(stats.cpu_label(), "CPU: 10.0%");
        assert_eq!(stats.ram_label(), "RAM: 20.0%");

        // A fresh CPU/RAM sample leaves the GPU readouts alone.
        stats.apply(TelemetryEvent::CpuRam {
            cpu_percent: 15.0,
            ram_percent: 25.0,
        });
        assert_eq!(stats.gpu_label(), "GPU: 30.0%");
        assert_eq!(stats.vram_label(), "VRAM: 40.0%");
        assert_eq!(stats.cpu_label(), "CPU: 15.0%");
    }
}
