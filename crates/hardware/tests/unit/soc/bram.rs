//! # Block RAM Tests

use rvbringup_core::BringupError;
use rvbringup_core::soc::Device;
use rvbringup_core::soc::memory::Bram;
use rvbringup_core::soc::traits::check_block;

#[test]
fn test_starts_zeroed() {
    let mut bram = Bram::new("DRAM", 0x4200_0000, 0x4000);
    assert_eq!(bram.len(), 0x4000);
    assert!(!bram.is_empty());
    assert_eq!(bram.read_u32(0x3FFC), 0);
    assert!(bram.words().iter().all(|&w| w == 0));
}

#[test]
fn test_address_range_and_name() {
    let bram = Bram::new("IRAM", 0x4000_0000, 0x4000);
    assert_eq!(bram.name(), "IRAM");
    assert_eq!(bram.address_range(), (0x4000_0000, 0x4000));
}

#[test]
fn test_size_rounds_down_to_words() {
    let bram = Bram::new("odd", 0, 10);
    assert_eq!(bram.len(), 8);
    assert!(Bram::new("none", 0, 3).is_empty());
}

#[test]
fn test_word_round_trip_and_bulk() {
    let mut bram = Bram::new("DRAM", 0, 0x40);
    bram.write_u32(0x8, 0xDEAD_BEEF);
    assert_eq!(bram.read_u32(0x8), 0xDEAD_BEEF);

    bram.write_words(0x10, &[1, 2, 3]);
    assert_eq!(bram.read_words(0x10, 3), vec![1, 2, 3]);
    assert_eq!(bram.words()[4], 1);
}

#[test]
#[should_panic(expected = "misaligned")]
fn test_misaligned_access_panics() {
    let mut bram = Bram::new("DRAM", 0, 0x40);
    let _ = bram.read_u32(0x2);
}

#[test]
#[should_panic(expected = "outside region")]
fn test_out_of_range_access_panics() {
    let mut bram = Bram::new("DRAM", 0, 0x40);
    bram.write_u32(0x40, 1);
}

#[test]
fn test_boxed_device_delegates() {
    let mut boxed: Box<dyn Device> = Box::new(Bram::new("GPIO", 0x4120_0000, 0x10));
    boxed.write_u32(0x4, 7);
    assert_eq!(boxed.read_u32(0x4), 7);
    assert_eq!(boxed.name(), "GPIO");
    assert_eq!(boxed.address_range(), (0x4120_0000, 0x10));
}

#[test]
fn test_check_block_bounds() {
    let bram = Bram::new("DRAM", 0x4200_0000, 0x20);
    assert!(check_block(&bram, 0, 8).is_ok());
    assert!(check_block(&bram, 0x1C, 1).is_ok());
    assert!(check_block(&bram, 0x20, 0).is_ok());
    assert!(matches!(
        check_block(&bram, 0x1C, 2),
        Err(BringupError::OutOfRange { offset: 0x1C, words: 2, size: 0x20, .. })
    ));
    assert!(matches!(
        check_block(&bram, u64::MAX - 3, 1),
        Err(BringupError::OutOfRange { .. })
    ));
    assert!(matches!(
        check_block(&bram, 0x2, 1),
        Err(BringupError::Misaligned { offset: 0x2, .. })
    ));
}
