//! # Pipeline
//!
//! One iteration of the control loop: read the sensor, convert, sample the
//! inputs, encode and publish.

use tracing::{debug, warn};

use crate::error::Result;
use crate::input::led::Heartbeat;
use crate::input::pins::InputPins;
use crate::input::InputSampler;
use crate::packet::encoder::encode_packet;
use crate::packet::layout::PacketLayout;
use crate::sensor::bus::RegisterBus;
use crate::sensor::convert::SampleConverter;
use crate::sensor::sample::GyroBias;
use crate::sensor::ImuSensor;
use crate::transport::{Frame, TelemetrySink};

/// What happened to one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Frame built and delivered
    Sent,
    /// Sensor read failed, nothing was built
    Skipped,
    /// Frame built but the sink rejected it
    Dropped,
}

/// Per-outcome frame counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounters {
    pub sent: u64,
    pub skipped: u64,
    pub dropped: u64,
}

impl StepCounters {
    /// Total iterations run
    pub fn total(&self) -> u64 {
        self.sent + self.skipped + self.dropped
    }
}

/// Owns every collaborator of the control loop
pub struct Pipeline<B, P> {
    sensor: ImuSensor<B>,
    converter: SampleConverter,
    bias: GyroBias,
    inputs: InputSampler<P>,
    layout: PacketLayout,
    sink: Box<dyn TelemetrySink>,
    heartbeat: Option<Heartbeat>,
    counters: StepCounters,
}

impl<B: RegisterBus, P: InputPins> Pipeline<B, P> {
    /// Assemble a pipeline from an initialized sensor and its calibrated bias
    pub fn new(
        sensor: ImuSensor<B>,
        converter: SampleConverter,
        bias: GyroBias,
        inputs: InputSampler<P>,
        layout: PacketLayout,
        sink: Box<dyn TelemetrySink>,
    ) -> Self {
        Self {
            sensor,
            converter,
            bias,
            inputs,
            layout,
            sink,
            heartbeat: None,
            counters: StepCounters::default(),
        }
    }

    /// Flip `heartbeat` once per iteration
    pub fn with_heartbeat(mut self, heartbeat: Heartbeat) -> Self {
        self.heartbeat = Some(heartbeat);
        self
    }

    /// Run one iteration.
    ///
    /// A recoverable fault while reading skips the iteration; while publishing
    /// it drops the frame. Neither stops the loop.
    ///
    /// # Errors
    ///
    /// Returns any error for which
    /// [`is_recoverable`](crate::error::MotionRemoteError::is_recoverable) is false.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        if let Some(heartbeat) = self.heartbeat.as_mut() {
            heartbeat.toggle();
        }

        let raw = match self.sensor.read_raw_sample() {
            Ok(raw) => raw,
            Err(e) if e.is_recoverable() => {
                warn!("Skipping iteration, sensor read failed: {}", e);
                self.counters.skipped += 1;
                return Ok(StepOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        let sample = self.converter.convert(&raw, &self.bias);
        let input = self.inputs.sample();
        let packet = encode_packet(&self.layout, &sample, &input);

        let frame = Frame {
            raw,
            sample,
            input,
            packet,
        };

        match self.sink.publish(&frame).await {
            Ok(()) => {
                self.counters.sent += 1;
                Ok(StepOutcome::Sent)
            }
            Err(e) if e.is_recoverable() => {
                debug!("Dropped frame: {}", e);
                self.counters.dropped += 1;
                Ok(StepOutcome::Dropped)
            }
            Err(e) => Err(e),
        }
    }

    pub fn counters(&self) -> StepCounters {
        self.counters
    }

    pub fn layout(&self) -> &PacketLayout {
        &self.layout
    }

    pub fn bias(&self) -> GyroBias {
        self.bias
    }

    /// Destination description of the sink
    pub fn destination(&self) -> String {
        self.sink.describe()
    }
}
