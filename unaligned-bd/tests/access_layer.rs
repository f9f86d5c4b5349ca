//! End-to-end tests for the unaligned access layer
//!
//! These tests drive the public API against a page device that records
//! every call, covering:
//! - Requests that straddle page boundaries
//! - The one-page cache (hits, eviction, invalidation by erase)
//! - Erase emulation and its page range
//! - Failure propagation and partial progress
//! - (Re-)initialization

use std::sync::{Arc, Mutex};

use anyhow::Result;
use unaligned_bd::{
    PageDevice, PageNumber, UnalignedBlockDevice, UnalignedError, ERASE_VALUE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Init,
    Read(u64),
    Program(u64),
}

#[derive(Debug, PartialEq, Eq)]
enum TestDeviceError {
    Injected(&'static str),
    BadAccess { addr: u64, len: usize },
}

impl std::fmt::Display for TestDeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Injected(what) => write!(f, "injected {} failure", what),
            Self::BadAccess { addr, len } => write!(f, "bad access at {} len {}", addr, len),
        }
    }
}

impl std::error::Error for TestDeviceError {}

#[derive(Default)]
struct Faults {
    init: bool,
    read_at: Option<u64>,
    program_at: Option<u64>,
}

/// Test page device sharing its memory and call log with the test body
#[derive(Clone)]
struct TestPageDevice {
    page_size: usize,
    memory: Arc<Mutex<Vec<u8>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    faults: Arc<Mutex<Faults>>,
}

impl TestPageDevice {
    fn new(page_size: usize, pages: usize) -> Self {
        Self {
            page_size,
            memory: Arc::new(Mutex::new(vec![ERASE_VALUE; page_size * pages])),
            calls: Arc::new(Mutex::new(Vec::new())),
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn memory(&self) -> Vec<u8> {
        self.memory.lock().unwrap().clone()
    }

    fn check(&self, addr: u64, len: usize) -> Result<usize, TestDeviceError> {
        let start = addr as usize;
        if addr % self.page_size as u64 != 0
            || len != self.page_size
            || start + len > self.memory.lock().unwrap().len()
        {
            return Err(TestDeviceError::BadAccess { addr, len });
        }
        Ok(start)
    }
}

impl PageDevice for TestPageDevice {
    type Error = TestDeviceError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.calls.lock().unwrap().push(Call::Init);
        if self.faults.lock().unwrap().init {
            return Err(TestDeviceError::Injected("init"));
        }
        Ok(())
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn total_size(&self) -> u64 {
        self.memory.lock().unwrap().len() as u64
    }

    fn read(&mut self, addr: u64, dest: &mut [u8]) -> Result<(), Self::Error> {
        self.calls.lock().unwrap().push(Call::Read(addr));
        if self.faults.lock().unwrap().read_at == Some(addr) {
            return Err(TestDeviceError::Injected("read"));
        }
        let start = self.check(addr, dest.len())?;
        dest.copy_from_slice(&self.memory.lock().unwrap()[start..start + dest.len()]);
        Ok(())
    }

    fn program(&mut self, addr: u64, src: &[u8]) -> Result<(), Self::Error> {
        self.calls.lock().unwrap().push(Call::Program(addr));
        if self.faults.lock().unwrap().program_at == Some(addr) {
            return Err(TestDeviceError::Injected("program"));
        }
        let start = self.check(addr, src.len())?;
        self.memory.lock().unwrap()[start..start + src.len()].copy_from_slice(src);
        Ok(())
    }
}

fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

/// 528-byte pages, 2112 bytes total
fn setup() -> Result<(TestPageDevice, UnalignedBlockDevice<TestPageDevice>)> {
    init_logging();

    let device = TestPageDevice::new(528, 4);
    let mut bd = UnalignedBlockDevice::new(device.clone());
    bd.init()?;
    device.take_calls();

    Ok((device, bd))
}

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

#[test]
fn straddling_program_touches_two_pages() -> Result<()> {
    let (device, mut bd) = setup()?;
    let data = pattern(600, 1);

    bd.program(100, &data)?;

    let programs: Vec<_> = device
        .take_calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Program(_)))
        .collect();
    assert_eq!(programs, vec![Call::Program(0), Call::Program(528)]);

    let memory = device.memory();
    assert_eq!(&memory[100..700], &data[..]);
    assert!(memory[..100].iter().all(|&b| b == ERASE_VALUE));
    assert!(memory[700..].iter().all(|&b| b == ERASE_VALUE));

    Ok(())
}

#[test]
fn straddling_read_returns_programmed_bytes() -> Result<()> {
    let (_device, mut bd) = setup()?;
    let data = pattern(600, 2);

    bd.program(100, &data)?;
    let mut out = vec![0u8; 600];
    bd.read(100, &mut out)?;

    assert_eq!(out, data);
    Ok(())
}

#[test]
fn read_modify_write_keeps_neighbors() -> Result<()> {
    let (device, mut bd) = setup()?;
    device.memory.lock().unwrap().copy_from_slice(&pattern(2112, 3));
    let before = device.memory();

    bd.program(1000, &[0u8; 10])?;

    let after = device.memory();
    assert_eq!(&after[..1000], &before[..1000]);
    assert_eq!(&after[1000..1010], &[0u8; 10]);
    assert_eq!(&after[1010..], &before[1010..]);
    Ok(())
}

#[test]
fn cached_page_skips_device_read() -> Result<()> {
    let (device, mut bd) = setup()?;

    bd.program(10, &[1, 2, 3, 4])?;
    bd.program(20, &[5, 6, 7, 8])?;
    let mut out = [0u8; 14];
    bd.read(10, &mut out)?;

    assert_eq!(
        device.take_calls(),
        vec![Call::Read(0), Call::Program(0), Call::Program(0)]
    );
    assert_eq!(out, [1, 2, 3, 4, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 5, 6, 7, 8]);
    assert_eq!(bd.cached_page(), Some(PageNumber::new(0)));
    Ok(())
}

#[test]
fn erase_single_page_programs_once() -> Result<()> {
    let (device, mut bd) = setup()?;
    device.memory.lock().unwrap().fill(0x00);

    bd.erase(0, 528)?;

    assert_eq!(device.take_calls(), vec![Call::Program(0)]);
    let memory = device.memory();
    assert!(memory[..528].iter().all(|&b| b == ERASE_VALUE));
    assert!(memory[528..].iter().all(|&b| b == 0x00));
    Ok(())
}

#[test]
fn erase_covers_partial_pages_whole() -> Result<()> {
    let (device, mut bd) = setup()?;
    device.memory.lock().unwrap().fill(0x00);

    // Bytes 1000..1100 live in pages 1 and 2
    bd.erase(1000, 100)?;

    assert_eq!(device.take_calls(), vec![Call::Program(528), Call::Program(1056)]);
    let memory = device.memory();
    assert!(memory[528..1584].iter().all(|&b| b == ERASE_VALUE));
    assert!(memory[..528].iter().all(|&b| b == 0x00));
    assert!(memory[1584..].iter().all(|&b| b == 0x00));
    Ok(())
}

#[test]
fn erase_then_read_rereads_device() -> Result<()> {
    let (device, mut bd) = setup()?;

    bd.program(0, &[1, 2, 3, 4])?;
    bd.erase(0, 528)?;
    device.take_calls();

    let mut out = [0u8; 4];
    bd.read(0, &mut out)?;

    assert_eq!(out, [ERASE_VALUE; 4]);
    assert_eq!(device.take_calls(), vec![Call::Read(0)]);
    Ok(())
}

#[test]
fn zero_length_requests_are_noops() -> Result<()> {
    let (device, mut bd) = setup()?;

    bd.read(300, &mut [])?;
    bd.program(300, &[])?;
    bd.erase(300, 0)?;

    assert!(device.take_calls().is_empty());
    Ok(())
}

#[test]
fn uninitialized_layer_refuses_io() {
    init_logging();
    let device = TestPageDevice::new(528, 4);
    let mut bd = UnalignedBlockDevice::new(device.clone());

    assert!(matches!(bd.read(0, &mut [0u8; 4]), Err(UnalignedError::NotInitialized)));
    assert!(matches!(bd.program(0, &[0u8; 4]), Err(UnalignedError::NotInitialized)));
    assert!(matches!(bd.erase(0, 4), Err(UnalignedError::NotInitialized)));
    assert!(device.take_calls().is_empty());
}

#[test]
fn init_failure_is_returned_unchanged() {
    init_logging();
    let device = TestPageDevice::new(528, 4);
    device.faults.lock().unwrap().init = true;
    let mut bd = UnalignedBlockDevice::new(device.clone());

    let err = bd.init().unwrap_err();

    assert_eq!(err.into_device_error(), Some(TestDeviceError::Injected("init")));
    assert!(!bd.is_initialized());
    assert_eq!(device.take_calls(), vec![Call::Init]);
}

#[test]
fn reinit_recovers_after_failure() -> Result<()> {
    let (device, mut bd) = setup()?;
    bd.program(0, &[7; 4])?;

    device.faults.lock().unwrap().init = true;
    assert!(bd.init().is_err());
    assert!(matches!(bd.read(0, &mut [0u8; 4]), Err(UnalignedError::NotInitialized)));

    device.faults.lock().unwrap().init = false;
    bd.init()?;
    assert_eq!(bd.cached_page(), None);

    let mut out = [0u8; 4];
    bd.read(0, &mut out)?;
    assert_eq!(out, [7; 4]);
    Ok(())
}

#[test]
fn program_failure_keeps_earlier_pages() -> Result<()> {
    let (device, mut bd) = setup()?;
    device.faults.lock().unwrap().program_at = Some(528);
    let data = pattern(600, 4);

    let err = bd.program(100, &data).unwrap_err();

    assert_eq!(err.device_error(), Some(&TestDeviceError::Injected("program")));
    let memory = device.memory();
    assert_eq!(&memory[100..528], &data[..428]);
    assert!(memory[528..700].iter().all(|&b| b == ERASE_VALUE));

    // The failed patch must not be served from the cache
    device.faults.lock().unwrap().program_at = None;
    device.take_calls();
    let mut out = [0u8; 8];
    bd.read(528, &mut out)?;
    assert_eq!(out, [ERASE_VALUE; 8]);
    assert_eq!(device.take_calls(), vec![Call::Read(528)]);
    Ok(())
}

#[test]
fn read_failure_stops_at_failing_page() -> Result<()> {
    let (device, mut bd) = setup()?;
    device.faults.lock().unwrap().read_at = Some(528);

    let mut out = vec![0u8; 600];
    let err = bd.read(100, &mut out).unwrap_err();

    assert!(matches!(err, UnalignedError::Device(TestDeviceError::Injected("read"))));
    assert_eq!(device.take_calls(), vec![Call::Read(0), Call::Read(528)]);
    assert!(out[..428].iter().all(|&b| b == ERASE_VALUE));
    Ok(())
}

#[test]
fn erase_failure_keeps_erased_pages() -> Result<()> {
    let (device, mut bd) = setup()?;
    device.memory.lock().unwrap().fill(0x00);
    device.faults.lock().unwrap().program_at = Some(1056);

    assert!(bd.erase(0, 2112).is_err());

    assert_eq!(
        device.take_calls(),
        vec![Call::Program(0), Call::Program(528), Call::Program(1056)]
    );
    let memory = device.memory();
    assert!(memory[..1056].iter().all(|&b| b == ERASE_VALUE));
    assert!(memory[1056..].iter().all(|&b| b == 0x00));
    Ok(())
}

#[test]
fn whole_device_round_trip() -> Result<()> {
    let (device, mut bd) = setup()?;
    let data = pattern(2112, 5);

    // Uneven chunks so that most writes straddle a boundary
    let mut addr = 0;
    for chunk in data.chunks(97) {
        bd.program(addr, chunk)?;
        addr += chunk.len() as u64;
    }

    assert_eq!(device.memory(), data);

    let mut out = vec![0u8; 2112];
    bd.read(0, &mut out)?;
    assert_eq!(out, data);
    Ok(())
}
