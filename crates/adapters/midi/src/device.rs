//! Hardware MIDI input through `midir`.

use midir::{Ignore, MidiInput, MidiInputConnection};

use midiauto_app::ports::MidiReceiver;

use crate::error::MidiAdapterError;

const CLIENT_NAME: &str = "midiauto";

/// An open hardware input. Messages flow to the receiver until dropped.
pub struct MidirInput {
    port_name: String,
    _connection: MidiInputConnection<()>,
}

impl MidirInput {
    /// Open the first input port whose name contains `device`, or the
    /// first port at all when `device` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`MidiAdapterError`] when the backend cannot start, no port
    /// matches, or the port cannot be opened.
    pub fn connect<R>(device: Option<&str>, receiver: R) -> Result<Self, MidiAdapterError>
    where
        R: MidiReceiver + 'static,
    {
        let mut midi_in = MidiInput::new(CLIENT_NAME).map_err(MidiAdapterError::Init)?;
        midi_in.ignore(Ignore::None);

        let (port, port_name) = midi_in
            .ports()
            .into_iter()
            .find_map(|port| {
                let name = midi_in.port_name(&port).ok()?;
                device
                    .is_none_or(|device| name.contains(device))
                    .then_some((port, name))
            })
            .ok_or_else(|| MidiAdapterError::DeviceNotFound(device.unwrap_or("*").to_string()))?;

        let connection = midi_in
            .connect(
                &port,
                "midiauto-input",
                move |timestamp, message, _| receiver.receive(message, timestamp),
                (),
            )
            .map_err(|err| MidiAdapterError::Connect {
                port: port_name.clone(),
                reason: err.to_string(),
            })?;

        tracing::info!(port = %port_name, "midi input connected");
        Ok(Self {
            port_name,
            _connection: connection,
        })
    }

    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

/// Names of every available input port, for diagnostics.
///
/// # Errors
///
/// Returns [`MidiAdapterError::Init`] when the backend cannot start.
pub fn input_port_names() -> Result<Vec<String>, MidiAdapterError> {
    let midi_in = MidiInput::new(CLIENT_NAME).map_err(MidiAdapterError::Init)?;
    Ok(midi_in
        .ports()
        .iter()
        .filter_map(|port| midi_in.port_name(port).ok())
        .collect())
}
