//! Test doubles for driving the sample loop without hardware

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use tilt_core::DisplaySink;
use tilt_core::registers::{ACCEL_XOUT_H, EXPECTED_IDENTITY, WHO_AM_I};

pub const MPU_ADDRESS: u8 = 0x68;

/// Register level operation seen by the fake sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Write { register: u8, data: Vec<u8> },
    Read { register: u8, len: usize },
}

type ReadHook = Box<dyn FnMut(usize)>;
type PauseHook = Box<dyn FnMut(usize)>;

struct FakeMpuState {
    registers: [u8; 128],
    pointer: u8,
    operations: Vec<BusOp>,
    accel_sequence: VecDeque<[u16; 3]>,
    accel_reads: usize,
    /// Fail every read once this many acceleration reads have succeeded.
    fail_after_accel_reads: Option<usize>,
}

/// Register-level MPU6050 stand-in.
///
/// Clones share state, so a test can keep one handle for inspection while
/// the driver owns another.
#[derive(Clone)]
pub struct FakeMpu {
    state: Rc<RefCell<FakeMpuState>>,
    read_hook: Rc<RefCell<Option<ReadHook>>>,
}

impl FakeMpu {
    pub fn new() -> Self {
        let mut registers = [0u8; 128];
        registers[WHO_AM_I as usize] = EXPECTED_IDENTITY;

        Self {
            state: Rc::new(RefCell::new(FakeMpuState {
                registers,
                pointer: 0,
                operations: Vec::new(),
                accel_sequence: VecDeque::new(),
                accel_reads: 0,
                fail_after_accel_reads: None,
            })),
            read_hook: Rc::new(RefCell::new(None)),
        }
    }

    pub fn with_identity(self, identity: u8) -> Self {
        self.set_register(WHO_AM_I, identity);
        self
    }

    pub fn set_register(&self, register: u8, value: u8) {
        self.state.borrow_mut().registers[register as usize] = value;
    }

    pub fn register(&self, register: u8) -> u8 {
        self.state.borrow().registers[register as usize]
    }

    /// Raw X/Y/Z words returned by successive acceleration reads. Once the
    /// queue is empty the last words keep being returned.
    pub fn push_accel(&self, words: [u16; 3]) {
        self.state.borrow_mut().accel_sequence.push_back(words);
    }

    pub fn fail_after_accel_reads(&self, reads: usize) {
        self.state.borrow_mut().fail_after_accel_reads = Some(reads);
    }

    /// Called with the running count after every successful acceleration
    /// read, e.g. to raise an edge "mid-cycle".
    pub fn on_accel_read(&self, hook: impl FnMut(usize) + 'static) {
        *self.read_hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn operations(&self) -> Vec<BusOp> {
        self.state.borrow().operations.clone()
    }

    pub fn accel_reads(&self) -> usize {
        self.state.borrow().accel_reads
    }

    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                BusOp::Write { register, data } => Some((register, data)),
                BusOp::Read { .. } => None,
            })
            .collect()
    }

    fn write_bytes(&self, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        let Some((&register, data)) = bytes.split_first() else {
            return;
        };

        state.pointer = register;
        for (offset, value) in data.iter().enumerate() {
            let at = (register as usize + offset) % state.registers.len();
            state.registers[at] = *value;
        }
        if !data.is_empty() {
            state.operations.push(BusOp::Write {
                register,
                data: data.to_vec(),
            });
        }
    }

    fn read_bytes(&self, buffer: &mut [u8]) -> Result<(), ErrorKind> {
        let accel_reads = {
            let mut state = self.state.borrow_mut();
            let register = state.pointer;

            if register == ACCEL_XOUT_H {
                if let Some(limit) = state.fail_after_accel_reads
                    && state.accel_reads >= limit
                {
                    return Err(ErrorKind::Other);
                }

                if let Some(words) = state.accel_sequence.pop_front() {
                    for (i, word) in words.iter().enumerate() {
                        let [hi, lo] = word.to_be_bytes();
                        state.registers[ACCEL_XOUT_H as usize + 2 * i] = hi;
                        state.registers[ACCEL_XOUT_H as usize + 2 * i + 1] = lo;
                    }
                    if state.accel_sequence.is_empty() {
                        state.accel_sequence.push_back(words);
                    }
                }
            }

            for (offset, slot) in buffer.iter_mut().enumerate() {
                *slot = state.registers[(register as usize + offset) % state.registers.len()];
            }
            state.operations.push(BusOp::Read {
                register,
                len: buffer.len(),
            });

            if register != ACCEL_XOUT_H {
                return Ok(());
            }
            state.accel_reads += 1;
            state.accel_reads
        };

        if let Some(hook) = self.read_hook.borrow_mut().as_mut() {
            hook(accel_reads);
        }
        Ok(())
    }
}

impl ErrorType for FakeMpu {
    type Error = ErrorKind;
}

impl I2c for FakeMpu {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != MPU_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.write_bytes(bytes),
                Operation::Read(buffer) => self.read_bytes(buffer)?,
            }
        }
        Ok(())
    }
}

/// What the display was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOp {
    Clear,
    Text { text: String, x: i32, y: i32 },
    Present,
}

#[derive(Clone, Default)]
pub struct RecordingDisplay {
    ops: Rc<RefCell<Vec<DisplayOp>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<DisplayOp> {
        self.ops.borrow().clone()
    }

    /// Text of every presented frame, one `Vec` of (text, x, y) per frame.
    pub fn frames(&self) -> Vec<Vec<(String, i32, i32)>> {
        let mut frames = Vec::new();
        let mut current = Vec::new();
        for op in self.ops.borrow().iter() {
            match op {
                DisplayOp::Clear => current.clear(),
                DisplayOp::Text { text, x, y } => current.push((text.clone(), *x, *y)),
                DisplayOp::Present => frames.push(std::mem::take(&mut current)),
            }
        }
        frames
    }

    /// Single-line frames, i.e. status messages.
    pub fn messages(&self) -> Vec<String> {
        self.frames()
            .into_iter()
            .filter(|frame| frame.len() == 1)
            .map(|frame| frame[0].0.clone())
            .collect()
    }
}

impl DisplaySink for RecordingDisplay {
    type Error = core::convert::Infallible;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.ops.borrow_mut().push(DisplayOp::Clear);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error> {
        self.ops.borrow_mut().push(DisplayOp::Text {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.ops.borrow_mut().push(DisplayOp::Present);
        Ok(())
    }
}

/// Records requested pauses in milliseconds instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    pauses_ms: Rc<RefCell<Vec<u32>>>,
    pause_hook: Rc<RefCell<Option<PauseHook>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses_ms(&self) -> Vec<u32> {
        self.pauses_ms.borrow().clone()
    }

    /// Called with the running count while each pause is in progress.
    pub fn on_pause(&self, hook: impl FnMut(usize) + 'static) {
        *self.pause_hook.borrow_mut() = Some(Box::new(hook));
    }

    fn record(&self, ms: u32) {
        let pauses = {
            let mut pauses_ms = self.pauses_ms.borrow_mut();
            pauses_ms.push(ms);
            pauses_ms.len()
        };
        if let Some(hook) = self.pause_hook.borrow_mut().as_mut() {
            hook(pauses);
        }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(ms);
    }
}
