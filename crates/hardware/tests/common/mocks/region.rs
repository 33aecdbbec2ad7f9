use mockall::automock;
use rvbringup_core::soc::Device;

/// Register-level traffic of a region, mocked with `mockall`.
#[automock]
pub trait RegisterFile {
    fn read(&mut self, offset: u64) -> u32;
    fn write(&mut self, offset: u64, val: u32);
}

/// A `Device` whose word traffic goes to a `MockRegisterFile`.
pub struct MockedRegion {
    name: &'static str,
    size: u64,
    pub mock: MockRegisterFile,
}

impl MockedRegion {
    pub fn new(name: &'static str, size: u64, mock: MockRegisterFile) -> Self {
        Self { name, size, mock }
    }
}

impl Device for MockedRegion {
    fn name(&self) -> &str {
        self.name
    }

    fn address_range(&self) -> (u64, u64) {
        (0, self.size)
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        self.mock.read(offset)
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        self.mock.write(offset, val);
    }
}
