//! Shared test doubles.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use lipow_console::hal::{Busy, PeripheralId, TxDriver};
use lipow_console::lock::TickClock;
use lipow_console::{Interpreter, Transmit, TxCompletion, TxError};

/// Records every transmit call, in order.
#[derive(Default)]
pub struct RecordingTx {
    pub calls: RefCell<Vec<Vec<u8>>>,
}

impl RecordingTx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, as one string.
    pub fn text(&self) -> String {
        self.calls
            .borrow()
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect()
    }

    /// Each transmit call as a string.
    pub fn chunks(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Transmit for RecordingTx {
    fn transmit(&self, data: &[u8]) -> Result<(), TxError> {
        self.calls.borrow_mut().push(data.to_vec());
        Ok(())
    }
}

/// Replies with a fixed list of chunks, one per call, for any line.
pub struct ScriptedInterpreter {
    pub chunks: Vec<&'static str>,
    pub lines: Vec<String>,
    next: usize,
}

impl ScriptedInterpreter {
    pub fn new(chunks: &[&'static str]) -> Self {
        Self {
            chunks: chunks.to_vec(),
            lines: Vec::new(),
            next: 0,
        }
    }
}

impl Interpreter for ScriptedInterpreter {
    fn process(&mut self, line: &str, out: &mut dyn Write) -> bool {
        self.lines.push(line.to_string());
        if let Some(chunk) = self.chunks.get(self.next) {
            let _ = out.write_str(chunk);
        }
        self.next += 1;
        let more = self.next < self.chunks.len();
        if !more {
            self.next = 0;
        }
        more
    }
}

/// 1 tick = 1 ms.
pub struct MsClock(pub Instant);

impl MsClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }
}

impl TickClock for MsClock {
    fn ticks(&self) -> u32 {
        self.0.elapsed().as_millis() as u32
    }
}

pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// Driver whose completions come from a separate "interrupt" thread.
///
/// Counts any transfer issued while another is still in flight.
pub struct IsrTx {
    pub instance: PeripheralId,
    pub wire: Arc<Mutex<Vec<Vec<u8>>>>,
    pub in_flight: Arc<AtomicBool>,
    pub overlaps: Arc<AtomicUsize>,
    irq: Sender<PeripheralId>,
}

impl IsrTx {
    /// Spawn the interrupt thread for `completion` and return the driver.
    pub fn spawn(completion: &'static TxCompletion, latency: Duration) -> Self {
        let (irq, pending) = mpsc::channel::<PeripheralId>();
        let in_flight = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&in_flight);
        thread::spawn(move || {
            for instance in pending {
                thread::sleep(latency);
                flag.store(false, Ordering::SeqCst);
                completion.notify(instance);
            }
        });

        Self {
            instance: completion.instance(),
            wire: Arc::new(Mutex::new(Vec::new())),
            in_flight,
            overlaps: Arc::new(AtomicUsize::new(0)),
            irq,
        }
    }
}

impl TxDriver for IsrTx {
    fn begin_send(&mut self, data: &[u8]) -> Result<(), Busy> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.wire.lock().unwrap().push(data.to_vec());
        self.irq.send(self.instance).map_err(|_| Busy)
    }

    fn instance(&self) -> PeripheralId {
        self.instance
    }
}

/// Driver that never completes on its own; the test raises completion.
pub struct ManualTx {
    pub instance: PeripheralId,
    pub wire: Arc<Mutex<Vec<Vec<u8>>>>,
    pub issued: Arc<AtomicUsize>,
}

impl ManualTx {
    pub fn new(instance: PeripheralId) -> Self {
        Self {
            instance,
            wire: Arc::new(Mutex::new(Vec::new())),
            issued: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl TxDriver for ManualTx {
    fn begin_send(&mut self, data: &[u8]) -> Result<(), Busy> {
        self.wire.lock().unwrap().push(data.to_vec());
        self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn instance(&self) -> PeripheralId {
        self.instance
    }
}

/// Poll `cond` for up to a second.
pub fn wait_until(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(1);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}
