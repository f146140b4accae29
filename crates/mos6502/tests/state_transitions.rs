//! Single-instruction state-transition tests from JSON vectors.
//!
//! Each case pins the full register file and the touched RAM before and
//! after exactly one `step()`, plus the cycles the step must report.
//! The vector format mirrors the JSON single-step suites used to
//! validate 6502 cores, with the cases inlined.

use mos6502::{Cpu, Status};
use serde::Deserialize;

#[derive(Deserialize)]
struct Case {
    name: String,
    initial: State,
    #[serde(rename = "final")]
    expected: State,
    cycles: u8,
}

#[derive(Deserialize)]
struct State {
    pc: u16,
    sp: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn apply(cpu: &mut Cpu, state: &State) {
    cpu.regs.pc = state.pc;
    cpu.regs.sp = state.sp;
    cpu.regs.a = state.a;
    cpu.regs.x = state.x;
    cpu.regs.y = state.y;
    cpu.regs.p = Status(state.p);
    for &(addr, value) in &state.ram {
        cpu.memory.write(addr, value);
    }
}

fn check(cpu: &Cpu, expected: &State, name: &str) {
    assert_eq!(cpu.regs.pc, expected.pc, "{name}: PC");
    assert_eq!(cpu.regs.sp, expected.sp, "{name}: SP");
    assert_eq!(cpu.regs.a, expected.a, "{name}: A");
    assert_eq!(cpu.regs.x, expected.x, "{name}: X");
    assert_eq!(cpu.regs.y, expected.y, "{name}: Y");
    assert_eq!(cpu.regs.p.0, expected.p, "{name}: P");
    for &(addr, value) in &expected.ram {
        assert_eq!(cpu.memory.read(addr), value, "{name}: ram[${addr:04X}]");
    }
}

#[test]
fn single_step_vectors() {
    let cases: Vec<Case> = serde_json::from_str(VECTORS).expect("vectors parse");
    for case in cases {
        let mut cpu = Cpu::new();
        apply(&mut cpu, &case.initial);
        let spent = cpu.step().unwrap_or_else(|e| panic!("{}: {e}", case.name));
        assert_eq!(spent, case.cycles, "{}: cycles", case.name);
        check(&cpu, &case.expected, &case.name);
    }
}

// Addresses and bytes are decimal, as in the published JSON suites.
const VECTORS: &str = r#"[
    {
        "name": "A5 LDA zero page",
        "initial": { "pc": 32768, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 0,
                     "ram": [[32768, 165], [32769, 16], [16, 66]] },
        "final":   { "pc": 32770, "sp": 255, "a": 66, "x": 0, "y": 0, "p": 0,
                     "ram": [[16, 66]] },
        "cycles": 3
    },
    {
        "name": "8D STA absolute preserves flags",
        "initial": { "pc": 32768, "sp": 255, "a": 153, "x": 0, "y": 0, "p": 128,
                     "ram": [[32768, 141], [32769, 0], [32770, 2]] },
        "final":   { "pc": 32771, "sp": 255, "a": 153, "x": 0, "y": 0, "p": 128,
                     "ram": [[512, 153]] },
        "cycles": 4
    },
    {
        "name": "69 ADC immediate with carry in",
        "initial": { "pc": 32768, "sp": 255, "a": 15, "x": 0, "y": 0, "p": 1,
                     "ram": [[32768, 105], [32769, 16]] },
        "final":   { "pc": 32770, "sp": 255, "a": 32, "x": 0, "y": 0, "p": 0,
                     "ram": [] },
        "cycles": 2
    },
    {
        "name": "20 JSR pushes the return point",
        "initial": { "pc": 32768, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 0,
                     "ram": [[32768, 32], [32769, 0], [32770, 144]] },
        "final":   { "pc": 36864, "sp": 253, "a": 0, "x": 0, "y": 0, "p": 0,
                     "ram": [[511, 128], [510, 2]] },
        "cycles": 6
    },
    {
        "name": "F0 BEQ taken across a page",
        "initial": { "pc": 33008, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 2,
                     "ram": [[33008, 240], [33009, 32]] },
        "final":   { "pc": 33042, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 2,
                     "ram": [] },
        "cycles": 4
    },
    {
        "name": "E6 INC zero page rolls over to zero",
        "initial": { "pc": 32768, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 0,
                     "ram": [[32768, 230], [32769, 32], [32, 255]] },
        "final":   { "pc": 32770, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 2,
                     "ram": [[32, 0]] },
        "cycles": 5
    },
    {
        "name": "6C JMP indirect with the page-wrap bug",
        "initial": { "pc": 32768, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 0,
                     "ram": [[32768, 108], [32769, 255], [32770, 48],
                             [12543, 0], [12288, 64], [12544, 80]] },
        "final":   { "pc": 16384, "sp": 255, "a": 0, "x": 0, "y": 0, "p": 0,
                     "ram": [] },
        "cycles": 5
    },
    {
        "name": "B1 LDA indirect indexed with page cross",
        "initial": { "pc": 32768, "sp": 255, "a": 0, "x": 0, "y": 16, "p": 0,
                     "ram": [[32768, 177], [32769, 134], [134, 248], [135, 32],
                             [8456, 119]] },
        "final":   { "pc": 32770, "sp": 255, "a": 119, "x": 0, "y": 16, "p": 0,
                     "ram": [] },
        "cycles": 6
    }
]"#;
