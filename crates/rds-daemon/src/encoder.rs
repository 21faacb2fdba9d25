//! Encoder session
//!
//! [`RdsEncoder`] binds a station identity to a [`Transmitter`] and turns
//! each field update into one frame on the wire.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info};
use uecp_protocol::{
    hex_string, AfPayload, AfPolicy, ClockVariant, EncodeCommand, StationConfig, UecpCommand,
};

use crate::error::{DaemonError, TransportError};
use crate::transport::{Connector, Transmitter};

/// Sends station data to one encoder
pub struct RdsEncoder<C: Connector> {
    transmitter: Arc<Transmitter<C>>,
    station: StationConfig,
    clock_variant: ClockVariant,
}

impl<C: Connector> RdsEncoder<C> {
    pub fn new(
        transmitter: Arc<Transmitter<C>>,
        station: StationConfig,
        clock_variant: ClockVariant,
    ) -> Self {
        Self {
            transmitter,
            station,
            clock_variant,
        }
    }

    /// Underlying transmitter
    pub fn transmitter(&self) -> &Arc<Transmitter<C>> {
        &self.transmitter
    }

    /// Encode and transmit a single command
    pub async fn send(&self, command: &UecpCommand) -> Result<(), TransportError> {
        let frame = command.encode();
        debug!(
            "{} frame: {}",
            command.element_code().name(),
            hex_string(&frame)
        );
        self.transmitter.send(&frame).await
    }

    /// Send TP/TA, PI, PTY, MS and DI in that order
    ///
    /// Stops at the first failure.
    pub async fn send_static_init(&self) -> Result<(), TransportError> {
        for command in self.station.static_init_commands() {
            self.send(&command).await?;
        }
        info!(
            "Static data sent: PI=0x{:04X}, PTY={}, TP={}, TA={}, DI=0x{:02X}",
            self.station.pi,
            self.station.pty,
            self.station.tp,
            self.station.ta,
            self.station.di.bits()
        );
        Ok(())
    }

    /// Send a Programme Service name
    pub async fn send_ps(&self, text: &str) -> Result<(), TransportError> {
        self.send(&UecpCommand::ProgramService(text.to_string()))
            .await
    }

    /// Send a RadioText message
    pub async fn send_rt(&self, text: &str) -> Result<(), TransportError> {
        self.send(&UecpCommand::RadioText(text.to_string())).await
    }

    /// Send the Alternative Frequencies list
    ///
    /// Returns the number of entries sent, or `None` when no valid entry
    /// remained and nothing was transmitted.
    pub async fn send_af(
        &self,
        frequencies: &[f64],
        policy: AfPolicy,
    ) -> Result<Option<usize>, DaemonError> {
        let Some(payload) = AfPayload::from_frequencies(frequencies, policy)? else {
            debug!("No valid AF entries, nothing sent");
            return Ok(None);
        };
        let count = payload.count();
        self.send(&UecpCommand::AlternativeFrequencies(payload))
            .await?;
        Ok(Some(count))
    }

    /// Send the clock group for `timestamp`
    pub async fn send_clock(&self, timestamp: OffsetDateTime) -> Result<(), TransportError> {
        self.send(&UecpCommand::Clock {
            timestamp,
            variant: self.clock_variant,
        })
        .await
    }
}
