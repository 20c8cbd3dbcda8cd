//! Shared test doubles for driving [`breakwire_bp::Manager`] end-to-end
//! without real ptrace/Mach plumbing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use breakwire_bp::{Address, BreakpointError, Result, ThreadId, ThreadState, TracedProcess, TracedThread};

#[derive(Clone)]
pub struct MockThread
{
    id: ThreadId,
    pub state: ThreadState,
    pub ip: Address,
    regs: Rc<RefCell<[u64; 8]>>,
}

impl MockThread
{
    pub fn stopped(id: u64) -> Self
    {
        Self {
            id: ThreadId(id),
            state: ThreadState::Stopped,
            ip: Address::NULL,
            regs: Rc::new(RefCell::new([0; 8])),
        }
    }

    pub fn debug_reg(&self, idx: usize) -> u64
    {
        self.regs.borrow()[idx]
    }

    pub fn set_debug_reg(&self, idx: usize, value: u64)
    {
        self.regs.borrow_mut()[idx] = value;
    }
}

impl TracedThread for MockThread
{
    fn id(&self) -> ThreadId
    {
        self.id
    }

    fn state(&self) -> ThreadState
    {
        self.state
    }

    fn read_debug_reg(&self, idx: usize) -> Result<u64>
    {
        Ok(self.regs.borrow()[idx])
    }

    fn write_debug_reg(&mut self, idx: usize, value: u64) -> Result<()>
    {
        self.regs.borrow_mut()[idx] = value;
        Ok(())
    }

    fn instruction_pointer(&self) -> Result<Address>
    {
        Ok(self.ip)
    }

    fn set_instruction_pointer(&mut self, address: Address) -> Result<()>
    {
        self.ip = address;
        Ok(())
    }
}

pub struct MockProcess
{
    bytes: HashMap<u64, u8>,
    pub threads: Vec<MockThread>,
}

impl MockProcess
{
    pub fn new() -> Self
    {
        Self {
            bytes: HashMap::new(),
            threads: Vec::new(),
        }
    }

    pub fn with_byte(mut self, address: u64, value: u8) -> Self
    {
        self.bytes.insert(address, value);
        self
    }

    pub fn with_thread(mut self, thread: MockThread) -> Self
    {
        self.threads.push(thread);
        self
    }

    pub fn byte_at(&self, address: u64) -> u8
    {
        self.bytes[&address]
    }
}

impl Default for MockProcess
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl TracedProcess for MockProcess
{
    fn enumerate_threads(
        &mut self,
        visit: &mut dyn FnMut(&mut dyn TracedThread) -> Result<()>,
    ) -> Result<()>
    {
        for thread in &mut self.threads {
            visit(thread)?;
        }
        Ok(())
    }

    fn read_memory(&self, address: Address, len: usize) -> Result<Vec<u8>>
    {
        (0..len as u64)
            .map(|i| {
                self.bytes
                    .get(&(address.value() + i))
                    .copied()
                    .ok_or_else(|| BreakpointError::NoMemory {
                        address,
                        details: "unmapped byte in mock process".to_string(),
                    })
            })
            .collect()
    }

    fn write_memory(&mut self, address: Address, data: &[u8]) -> Result<()>
    {
        for (i, b) in data.iter().enumerate() {
            self.bytes.insert(address.value() + i as u64, *b);
        }
        Ok(())
    }
}
