// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic.
use super::*;

const INDX: &[u8; 16] = b"\0\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";

/// runs one arbitrary operation on a brand new machine
/// returns the machine for inspection
fn run_single_op(op: &[u8]) -> Machine<StepRng> {
    let mut vm = setup_environment();
    vm.load_program(op).unwrap();
    vm.v = *INDX;
    vm.step().unwrap(); // will panic if unimplemented
    vm
}

#[rustfmt::skip]
mod sys {
    use super::*;
    #[test]                 fn cls()   { run_single_op(b"\x00\xe0"); }
    #[test] #[should_panic] fn ret()   { run_single_op(b"\x00\xee"); }
    #[test] #[should_panic] fn u0420() { run_single_op(b"\x04\x20"); }
    #[test] #[should_panic] fn u00ff() { run_single_op(b"\x00\xff"); }
}
#[rustfmt::skip]
mod jump {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x12\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x12\x31").pc); }
}
#[rustfmt::skip]
mod call {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x22\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x22\x31").pc); }
    #[test] fn pushes()    { assert_eq!(&[0x202], run_single_op(b"\x22\x30").stack()); }
}
#[rustfmt::skip]
mod skeb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x30\x00").pc); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x30\x01").pc); }
}
#[rustfmt::skip]
mod sneb {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x40\x01").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x40\x00").pc); }
}
#[rustfmt::skip]
mod se {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x50\x00").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x50\x10").pc); }
    #[test] #[should_panic] fn u5ff1() { run_single_op(b"\x5f\xf1"); }
    #[test] #[should_panic] fn u5ff2() { run_single_op(b"\x5f\xf2"); }
    #[test] #[should_panic] fn u5ff3() { run_single_op(b"\x5f\xf3"); }
    #[test] #[should_panic] fn u5fff() { run_single_op(b"\x5f\xff"); }
}
#[rustfmt::skip]
mod mov {
    use super::*;
    #[test] fn movb()  { assert_eq!(0x42, run_single_op(b"\x6a\x42").v[0xa]); }
    #[test] fn addb()  { assert_eq!(0x4c, run_single_op(b"\x7a\x42").v[0xa]); }
    #[test] fn mov()   { assert_eq!(0x03, run_single_op(b"\x8a\x30").v[0xa]); }
    #[test] fn or()    { assert_eq!(0x0b, run_single_op(b"\x8a\x31").v[0xa]); }
    #[test] fn and()   { assert_eq!(0x02, run_single_op(b"\x8a\x32").v[0xa]); }
    #[test] fn xor()   { assert_eq!(0x09, run_single_op(b"\x8a\x33").v[0xa]); }
    #[test] fn add()   { assert_eq!(0x0d, run_single_op(b"\x8a\x34").v[0xa]); }
    #[test] fn sub()   { assert_eq!(0x07, run_single_op(b"\x8a\x35").v[0xa]); }
    #[test] fn shr()   { assert_eq!(0x05, run_single_op(b"\x8a\x36").v[0xa]); }
    #[test] fn bsub()  { assert_eq!(0xf9, run_single_op(b"\x8a\x37").v[0xa]); }
    #[test] fn shl()   { assert_eq!(0x14, run_single_op(b"\x8a\x3e").v[0xa]); }
    #[test] #[should_panic] fn u8ff8() { run_single_op(b"\x8f\xf8"); }
    #[test] #[should_panic] fn u8fff() { run_single_op(b"\x8f\xff"); }
}
#[rustfmt::skip]
mod sne {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x90\x10").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x90\x00").pc); }
    #[test] #[should_panic] fn u9ff1() { run_single_op(b"\x9f\xf1"); }
}
#[rustfmt::skip]
mod i {
    use super::*;
    #[test] fn movi()  { assert_eq!(0x123, run_single_op(b"\xa1\x23").i); }
    #[test] fn jmpr()  { assert_eq!(0x123, run_single_op(b"\xb1\x23").pc); }
    #[test] fn addi()  { assert_eq!(0x00f, run_single_op(b"\xff\x1e").i); }
    #[test] fn font()  { assert_eq!(0x032, run_single_op(b"\xfa\x29").i); }
}
#[rustfmt::skip]
mod rand {
    use super::*;
    #[test] fn rand()  { assert_eq!(0xa5 & 0x3c, run_single_op(b"\xc7\x3c").v[7]); }
}
#[rustfmt::skip]
mod draw {
    use super::*;
    #[test] fn draw()  { assert!(!run_single_op(b"\xd0\x15").screen.is_blank()); }
}
#[rustfmt::skip]
mod key {
    use super::*;
    #[test] fn sek()   { assert_eq!(0x202, run_single_op(b"\xe0\x9e").pc); }
    #[test] fn snek()  { assert_eq!(0x204, run_single_op(b"\xe0\xa1").pc); }
    #[test] fn waitk() { assert_eq!(0x200, run_single_op(b"\xf0\x0a").pc); }
    #[test] #[should_panic] fn ue09f() { run_single_op(b"\xe0\x9f"); }
    #[test] #[should_panic] fn uf0ff() { run_single_op(b"\xf0\xff"); }
}
#[rustfmt::skip]
mod timers {
    use super::*;
    #[test] fn getdt() { assert_eq!(0x00, run_single_op(b"\xf5\x07").v[5]); }
    #[test] fn setdt() { assert_eq!(0x05, run_single_op(b"\xf5\x15").delay); }
    #[test] fn movst() { assert_eq!(0x05, run_single_op(b"\xf5\x18").sound); }
}
#[rustfmt::skip]
mod dma {
    use super::*;
    #[test] fn bcd()   { assert_eq!(0x01, run_single_op(b"\xfa\x33").mem.read(0x001)); }
    #[test] fn dmao()  { assert_eq!(0x03, run_single_op(b"\xf3\x55").mem.read(0x003)); }
    #[test] fn dmai()  { assert_eq!(0xf0, run_single_op(b"\xf1\x65").v[0]); }
}
