//! Stub transports shared by the unit tests.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeBusError(pub ErrorKind);

impl i2c::Error for FakeBusError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

#[derive(Default)]
struct BusState {
    writes: Vec<(u8, Vec<u8>)>,
    probes: Vec<u8>,
    acked: Vec<u8>,
    nacked: Vec<u8>,
    reads: BTreeMap<u8, VecDeque<Vec<u8>>>,
    mux: Option<u8>,
    selected_mask: u8,
    channel_devices: Vec<(usize, u8)>,
}

impl BusState {
    fn probe_acknowledged(&self, address: u8) -> bool {
        if self.acked.contains(&address) {
            return true;
        }
        self.mux.is_some()
            && self
                .channel_devices
                .iter()
                .any(|&(ch, dev)| dev == address && self.selected_mask & (1 << ch) != 0)
    }
}

/// In-memory I2C bus. Clones share state, so a test can keep one handle to
/// inspect traffic while the code under test owns another.
#[derive(Clone, Default)]
pub struct FakeBus {
    state: Rc<RefCell<BusState>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus behind a multiplexer at `mux_address`; probe answers depend on
    /// the channel last selected.
    pub fn with_mux(mux_address: u8) -> Self {
        let bus = Self::new();
        bus.state.borrow_mut().mux = Some(mux_address);
        bus
    }

    /// Wire a device answering at `address` to mux `channel`.
    pub fn populate(&self, channel: usize, address: u8) {
        self.state.borrow_mut().channel_devices.push((channel, address));
    }

    pub fn ack_probe(&self, address: u8) {
        self.state.borrow_mut().acked.push(address);
    }

    pub fn set_nack(&self, address: u8, nack: bool) {
        let mut state = self.state.borrow_mut();
        state.nacked.retain(|&a| a != address);
        if nack {
            state.nacked.push(address);
        }
    }

    pub fn queue_read(&self, address: u8, bytes: Vec<u8>) {
        self.state
            .borrow_mut()
            .reads
            .entry(address)
            .or_default()
            .push_back(bytes);
    }

    /// Non-empty writes in order.
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.state.borrow().writes.clone()
    }

    /// Addresses hit by zero-length probe writes, in order.
    pub fn probes(&self) -> Vec<u8> {
        self.state.borrow().probes.clone()
    }
}

impl ErrorType for FakeBus {
    type Error = FakeBusError;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let nack = FakeBusError(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));

        for operation in operations {
            match operation {
                Operation::Write(bytes) if bytes.is_empty() => {
                    state.probes.push(address);
                    if !state.probe_acknowledged(address) {
                        return Err(nack);
                    }
                }
                Operation::Write(bytes) => {
                    if state.nacked.contains(&address) {
                        return Err(nack);
                    }
                    if state.mux == Some(address) {
                        state.selected_mask = bytes[0];
                    }
                    state.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buffer) => {
                    if state.nacked.contains(&address) {
                        return Err(nack);
                    }
                    let response = state
                        .reads
                        .get_mut(&address)
                        .and_then(VecDeque::pop_front)
                        .ok_or(FakeBusError(ErrorKind::NoAcknowledge(
                            NoAcknowledgeSource::Data,
                        )))?;
                    buffer.copy_from_slice(&response[..buffer.len()]);
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately and remembers what was asked of it.
#[derive(Clone, Default)]
pub struct NoDelay {
    calls: Rc<RefCell<Vec<u32>>>,
}

impl NoDelay {
    /// Requested delays, in nanoseconds.
    pub fn calls(&self) -> Vec<u32> {
        self.calls.borrow().clone()
    }

    pub fn total_ms(&self) -> u64 {
        self.calls.borrow().iter().map(|&ns| u64::from(ns)).sum::<u64>() / 1_000_000
    }
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.borrow_mut().push(ns);
    }
}
