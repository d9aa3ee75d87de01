//! High-level device interface

use std::time::Duration;

use bytes::Bytes;
use chrono::NaiveDateTime;
use tracing::{debug, info, trace, warn};

use soyal_core::{
    constants::{card, DEFAULT_NODE_ID, DEFAULT_PORT, DEFAULT_TIMEOUT, REBOOT_SUBCODE},
    fields, Command, Frame, Response,
};
use soyal_transport::{TcpTransport, Transport};
use soyal_types::{CardAddress, CardMode, CardRecord, LogRecord};

use crate::error::{Error, Result};

/// Soyal AR-727 terminal
///
/// High-level interface for one terminal behind one connection. Every
/// operation is a single request/response exchange; methods take `&mut self`
/// so a device can never have two requests in flight.
///
/// # Examples
///
/// ```no_run
/// use soyal::Device;
///
/// #[tokio::main]
/// async fn main() -> soyal::Result<()> {
///     let mut device = Device::new("192.168.1.127", 1621);
///     
///     device.connect().await?;
///     println!("Connected!");
///     
///     let card = device.get_card(12).await?;
///     println!("{}", card);
///     
///     device.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    transport: Box<dyn Transport>,
    node_id: u8,
    card_mode: CardMode,
}

impl Device {
    /// Create a new device instance (TCP transport)
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let transport = TcpTransport::new(host, port)
            .with_connect_timeout(DEFAULT_TIMEOUT)
            .with_read_timeout(DEFAULT_TIMEOUT);
        Self::with_transport(transport)
    }
    
    /// Create a device on the default port
    pub fn with_host(host: impl Into<String>) -> Self {
        Self::new(host, DEFAULT_PORT)
    }
    
    /// Create a device over any transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            node_id: DEFAULT_NODE_ID,
            card_mode: CardMode::default(),
        }
    }
    
    /// Set target node id (default: 1)
    pub fn with_node_id(mut self, node_id: u8) -> Self {
        self.node_id = node_id;
        self
    }
    
    /// Set connect and read timeout of the transport
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport.set_timeout(timeout);
        self
    }
    
    /// Set the status byte written for enabled cards (default: 88)
    pub fn with_card_mode(mut self, mode: CardMode) -> Self {
        self.card_mode = mode;
        self
    }
    
    pub fn node_id(&self) -> u8 {
        self.node_id
    }
    
    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }
    
    /// Connect to device
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {} (node {})...", self.transport.remote_addr(), self.node_id);
        
        self.transport.connect().await?;
        
        info!("Connected");
        Ok(())
    }
    
    /// Disconnect from device
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }
        
        info!("Disconnecting from {}...", self.transport.remote_addr());
        
        self.transport.disconnect().await?;
        
        info!("Disconnected");
        Ok(())
    }
    
    /// Query controller status
    ///
    /// Returns the validated status frame as sent by the device.
    pub async fn get_status(&mut self) -> Result<Response> {
        debug!("Getting device status...");
        
        self.exchange(Command::GetStatus, Bytes::new()).await
    }
    
    /// Read the card stored at `address` (0..=16383)
    pub async fn get_card(&mut self, address: u16) -> Result<CardRecord> {
        let address = CardAddress::new(address)?;
        
        debug!("Getting card {}...", address);
        
        let response = self
            .exchange(Command::GetCard, fields::card_query_payload(address))
            .await?;
        let card = fields::decode_card(address, &response)?;
        
        debug!("Card: {}", card);
        
        Ok(card)
    }
    
    /// Write a card record at `address`
    ///
    /// Enabled cards get the configured [`CardMode`], disabled cards 0. The
    /// record is written with open groups and a 2099-12-31 expiry.
    pub async fn set_card(&mut self, address: u16, uid1: u16, uid2: u16, enabled: bool) -> Result<()> {
        let address = CardAddress::new(address)?;
        let mode = if enabled { self.card_mode } else { CardMode::DISABLED };
        
        debug!(
            "Setting card {} (uid={}:{}, mode={})...",
            address,
            uid1,
            uid2,
            mode.raw()
        );
        
        let payload = fields::card_write_payload(address, uid1, uid2, mode);
        self.exchange(Command::SetCard, payload).await?;
        Ok(())
    }
    
    /// Blank and disable the card at `address`
    pub async fn disable_card(&mut self, address: u16) -> Result<()> {
        self.set_card(address, card::BLANK_UID, card::BLANK_UID, false).await
    }
    
    /// Reset the card table from `start` to `end` (default: `start + 1`)
    ///
    /// The default end is sent as-is, so resetting from the last slot sends
    /// an end of 16384.
    pub async fn reset_cards(&mut self, start: u16, end: Option<u16>) -> Result<()> {
        let start = CardAddress::new(start)?;
        let end = match end {
            Some(end) => CardAddress::new(end)?.get(),
            None => start.get() + 1,
        };
        
        debug!("Resetting cards {}..{:05}...", start, end);
        
        self.exchange(Command::ResetCards, fields::card_reset_payload(start, end))
            .await?;
        Ok(())
    }
    
    /// Reboot the controller
    pub async fn reboot(&mut self) -> Result<Response> {
        warn!("Rebooting device...");
        
        self.exchange(Command::Reboot, Bytes::from_static(&[REBOOT_SUBCODE])).await
    }
    
    /// Read the device clock
    pub async fn get_time(&mut self) -> Result<NaiveDateTime> {
        debug!("Getting device time...");
        
        let response = self.exchange(Command::GetTime, Bytes::new()).await?;
        let time = fields::decode_clock(&response)?;
        
        debug!("Device time: {}", time);
        
        Ok(time)
    }
    
    /// Set the device clock
    pub async fn set_time(&mut self, time: NaiveDateTime) -> Result<()> {
        debug!("Setting device time to {}...", time);
        
        self.exchange(Command::SetTime, fields::clock_payload(time))
            .await?;
        Ok(())
    }
    
    /// Set the device clock to the host's local time
    pub async fn sync_time(&mut self) -> Result<()> {
        self.set_time(chrono::Local::now().naive_local()).await
    }
    
    /// Read the oldest event log entry; `None` when the log is empty
    pub async fn get_oldest_log(&mut self) -> Result<Option<LogRecord>> {
        debug!("Getting oldest event log...");
        
        let response = self.exchange(Command::GetOldestLog, Bytes::new()).await?;
        let log = fields::decode_log(&response)?;
        
        match &log {
            Some(log) => debug!("Oldest log: {}", log),
            None => debug!("Event log empty"),
        }
        
        Ok(log)
    }
    
    /// Delete the oldest event log entry
    pub async fn delete_oldest_log(&mut self) -> Result<()> {
        debug!("Deleting oldest event log...");
        
        self.exchange(Command::DeleteOldestLog, Bytes::new()).await?;
        Ok(())
    }
    
    // Helper methods
    
    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
    
    fn ensure_accepted(command: Command, response: &Response) -> Result<()> {
        if command.fails_on_nack() && response.response_code().is_nack() {
            warn!("Device rejected {}", command);
            return Err(soyal_core::Error::DeviceRejected { command }.into());
        }
        Ok(())
    }
    
    async fn exchange(&mut self, command: Command, payload: Bytes) -> Result<Response> {
        self.ensure_connected()?;
        
        let frame = Frame::try_with_payload(self.node_id, command, payload)?;
        trace!("Sending: {:?}", frame);
        self.transport.send(&frame.encode()).await?;
        
        let buf = self.transport.receive().await?;
        let response = Response::decode(buf)?;
        
        trace!("Received: {:?}", response);
        
        Self::ensure_accepted(command, &response)?;
        
        Ok(response)
    }
}
