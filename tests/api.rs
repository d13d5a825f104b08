//! Testing methods on chipvm's public API
use chipvm::prelude::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

#[test]
fn machine() {
    let vm = Machine::seeded(1); // constructor
    let vm2 = vm.clone(); // Clone
    assert_eq!(vm, vm2); // PartialEq
    println!("{vm:?}"); // Debug
}

#[test]
fn independent_machines() {
    let (mut a, mut b) = (Machine::seeded(1), Machine::seeded(1));
    a.load_program(&[0x60, 0x11]).unwrap();
    b.load_program(&[0x60, 0x22]).unwrap();
    a.step().unwrap();
    b.step().unwrap();
    assert_eq!(0x11, a.v()[0]);
    assert_eq!(0x22, b.v()[0]);
}

mod error {
    use super::*;
    #[test]
    fn display() {
        let err = Error::UnknownOpcode {
            word: 0xf0ff,
            addr: 0x204,
        };
        assert_eq!("opcode f0ff at 204 not recognized", err.to_string());
        let err = Error::ProgramTooLarge {
            len: 4000,
            max: 3584,
        };
        assert!(err.to_string().contains("4000"));
    }
    #[test]
    fn from_io() {
        let err: Error = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(matches!(err, Error::IoError(_)));
        assert!(err.is_fatal());
    }
    #[test]
    fn missing_rom() {
        let mut vm = Machine::seeded(0);
        vm.load_program_file("this/rom/does/not/exist.ch8")
            .expect_err("Loading a missing file should fail");
    }
}

mod mem {
    use super::*;
    mod region {
        use super::*;
        #[test]
        #[allow(clippy::clone_on_copy)]
        fn clone() {
            let r1 = Program;
            let r2 = r1.clone();
            assert_eq!(r1, r2);
        }
        #[test]
        fn display() {
            assert_eq!("CharsetProgram", format!("{Charset}{Program}"));
        }
        #[test]
        fn ord() {
            assert!(Charset < Program);
        }
        #[test]
        fn hash() {
            let mut hasher = DefaultHasher::new();
            Program.hash(&mut hasher);
            println!("{hasher:?}");
        }
        #[test]
        fn ranges() {
            assert_eq!(0x000..0x050, Charset.range());
            assert_eq!(0x200..0x1000, Program.range());
        }
    }
    #[test]
    fn addresses_are_masked() {
        let mut mem = Mem::new();
        mem.write(0x1234, 0xab);
        assert_eq!(0xab, mem.read(0x234));
        assert_eq!(0xab, mem.read(0xf234));
    }
    #[test]
    fn from_image() {
        let mut image = vec![0u8; 0x1000];
        image[0x200] = 0x12;
        let mem = Mem::try_from(image).unwrap();
        assert_eq!(0x1200, mem.fetch(0x200).unwrap());
    }
    #[test]
    fn from_short_image() {
        let err = Mem::try_from(vec![0u8; 0x210]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLength {
                what: "memory",
                len: 0x210,
                expected: 0x1000
            }
        ));
    }
}

mod machine {
    use super::*;

    #[test]
    fn press_invalid_key() {
        let mut vm = Machine::seeded(0);
        let vm2 = vm.clone();
        vm.press(0x21345134)
            .expect_err("This should produce an Error::InvalidKey");
        // no change has been made, everything is safe.
        assert_eq!(vm, vm2);
    }

    #[test]
    fn release_invalid_key() {
        let mut vm = Machine::seeded(0);
        let vm2 = vm.clone();
        vm.release(0x10)
            .expect_err("This should produce an Error::InvalidKey");
        assert_eq!(vm, vm2);
    }

    #[test]
    fn set_invalid_reg() {
        let mut vm = Machine::seeded(0);
        let vm2 = vm.clone();
        vm.set_v(0x21345134, 0xff)
            .expect_err("This should produce an Error::InvalidRegister");
        // no change has been made
        assert_eq!(vm, vm2);
    }

    #[test]
    fn keys() {
        let mut vm = Machine::seeded(0);
        assert!(vm.set_key(0xa, true).unwrap());
        assert!(!vm.set_key(0xa, true).unwrap());
        assert!(vm.keys()[0xa]);
        assert_eq!(1, vm.keys().iter().filter(|&&k| k).count());
    }

    #[test]
    fn stack_accessors() {
        let mut vm = Machine::seeded(0);
        vm.load_program(&[0x22, 0x04, 0x00, 0x00, 0x22, 0x08]).unwrap();
        vm.step().unwrap();
        vm.step().unwrap();
        assert_eq!(2, vm.sp());
        assert_eq!(&[0x202, 0x206], vm.stack());
    }

    mod flags {
        use super::*;
        #[test]
        fn clone() {
            let f1 = Flags {
                debug: false,
                keypause: false,
                quirks: Quirks::default(),
            };
            let f2 = f1.clone();
            assert_eq!(f1, f2)
        }
        #[test]
        fn debug() {
            println!("{:?}", Flags::default());
        }
        #[test]
        fn default() {
            assert_eq!(
                Flags::default(),
                Flags {
                    debug: false,
                    keypause: false,
                    quirks: Quirks::from(false),
                }
            )
        }
    }

    mod quirks {
        use super::*;
        #[test]
        fn from_true() {
            let q = Quirks::from(true);
            assert!(q.shift_source_vy && q.logic_resets_vf && q.dma_increments_i && q.clip_sprites);
        }
        #[test]
        fn default_is_modern() {
            assert_eq!(Quirks::from(false), Quirks::default());
            assert_eq!(Quirks::default(), "modern".parse().unwrap());
        }
        #[test]
        fn parse_vip() {
            assert_eq!(Quirks::from(true), "Cosmac".parse().unwrap());
        }
        #[test]
        fn parse_invalid() {
            let err = "schip".parse::<Quirks>().unwrap_err();
            assert!(matches!(err, Error::InvalidQuirks { name } if name == "schip"));
        }
    }
}

mod screen {
    use super::*;
    #[test]
    fn display() {
        let mut vm = Machine::seeded(0);
        // v0 = 0, v1 = 0, I = glyph 0, draw 5 rows
        vm.load_program(&[0xd0, 0x15]).unwrap();
        vm.step().unwrap();
        let text = vm.screen().to_string();
        assert_eq!(32, text.lines().count());
        assert!(text.lines().next().unwrap().starts_with("00|████ "));
    }
    #[test]
    fn from_pixels() {
        let mut pixels = vec![0u8; 64 * 32];
        pixels[64 + 3] = 0xff;
        let screen = Screen::try_from(pixels).unwrap();
        assert_eq!(Some(1), screen.pixel(3, 1));
        assert!(Screen::try_from(vec![0u8; 64]).is_err());
    }
    #[test]
    fn rows() {
        let screen = Screen::default();
        assert_eq!(32, screen.rows().count());
        assert!(screen.rows().all(|row| row.len() == 64));
        assert_eq!(64 * 32, screen.pixels().len());
    }
}

mod disassembler {
    use super::*;
    #[test]
    fn display() {
        assert_eq!("cls    ", Insn::cls.to_string());
        assert_eq!("draw   #5, v1, v2", Insn::from_word(0xd125).unwrap().to_string());
        assert_eq!("mov    $123, I", Insn::from_word(0xa123).unwrap().to_string());
    }
    #[test]
    fn every_word_decodes_or_not() {
        // 35 canonical opcodes (less 0nnn) cover exactly this many words
        let valid = (0..=0xffff_u16)
            .filter(|&w| Insn::from_word(w).is_some())
            .count();
        let expected = 2 // 00e0, 00ee
            + 7 * 0x1000 // 1nnn 2nnn 3xnn 4xnn 6xnn 7xnn annn
            + 2 * 0x1000 // bnnn cxnn
            + 0x1000 // dxyn
            + 2 * 0x100 // 5xy0 9xy0
            + 9 * 0x100 // 8xy0..8xye
            + 2 * 0x10 // ex9e exa1
            + 9 * 0x10; // fx07..fx65
        assert_eq!(expected, valid);
    }
    #[test]
    fn styled() {
        let dis = Dis::default();
        assert!(dis.once(0x00e0).contains("cls"));
        assert!(dis.once(0x5001).contains("inval  5001"));
    }
}

#[cfg(feature = "serde")]
mod serde {
    use super::*;
    #[test]
    fn save_state_round_trip() {
        let mut vm = Machine::seeded(0);
        vm.load_program(&[0x6a, 0x05, 0xa2, 0x34, 0x22, 0x00]).unwrap();
        vm.multistep(3).unwrap();
        let state = serde_json::to_string(&vm).unwrap();
        let restored: Machine = serde_json::from_str(&state).unwrap();
        assert_eq!(vm.v(), restored.v());
        assert_eq!(vm.pc(), restored.pc());
        assert_eq!(vm.i(), restored.i());
        assert_eq!(vm.stack(), restored.stack());
        assert_eq!(vm.mem(), restored.mem());
        assert_eq!(vm.screen(), restored.screen());
    }

    fn saved_state() -> serde_json::Value {
        let mut vm = Machine::seeded(0);
        vm.load_program(&[0x00, 0xee, 0xa3, 0x00, 0xd0, 0x01]).unwrap();
        serde_json::to_value(&vm).unwrap()
    }

    #[test]
    fn rejects_deep_stack_pointer() {
        let mut state = saved_state();
        state["sp"] = 20.into();
        assert!(serde_json::from_value::<Machine>(state).is_err());
    }

    #[test]
    fn accepts_full_stack() {
        let mut state = saved_state();
        state["sp"] = 16.into();
        let mut vm: Machine = serde_json::from_value(state).unwrap();
        assert_eq!(16, vm.stack().len());
        // 00ee pops the top of the (zeroed) stack
        vm.step().unwrap();
        assert_eq!((0, 15), (vm.pc(), vm.sp()));
    }

    #[test]
    fn rejects_short_memory() {
        let mut state = saved_state();
        state["mem"] = serde_json::json!(vec![0u8; 0x210]);
        assert!(serde_json::from_value::<Machine>(state).is_err());
    }

    #[test]
    fn rejects_short_screen() {
        let mut state = saved_state();
        state["screen"] = serde_json::json!(vec![0u8; 10]);
        assert!(serde_json::from_value::<Machine>(state).is_err());
    }
}
