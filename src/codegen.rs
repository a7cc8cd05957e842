//! Hack assembly emission for every VM command.
//!
//! The writer owns the only mutable translation state: the current source
//! unit (namespaces statics), the current function (namespaces labels) and
//! a label counter that is reset on every `function` command. Comparisons
//! and calls share the counter, so generated labels embed
//! `<function>.<counter>` and stay unique across the whole output.

use crate::memory::{SegmentKind, pointer_symbol, segment_kind, temp_address};
use crate::parser::{ArithmeticOp, Command, Segment};

/// Jump mnemonics driving one ordering comparison (`gt` or `lt`).
///
/// The sign dispatch keeps `x - y` free of overflow: subtraction is only
/// performed once the operand signs are known to agree.
struct OrderingJumps {
    /// Taken on y to enter the second sign check.
    sign_check: &'static str,
    /// Taken on x when the result is decided false.
    false_check: &'static str,
    /// Taken on x when the result is decided true.
    true_check: &'static str,
    /// Taken on `x - y` once signs agree.
    value_check: &'static str,
}

const GT_JUMPS: OrderingJumps = OrderingJumps {
    sign_check: "JLT",
    false_check: "JLE",
    true_check: "JGE",
    value_check: "JGT",
};

const LT_JUMPS: OrderingJumps = OrderingJumps {
    sign_check: "JGT",
    false_check: "JGE",
    true_check: "JLE",
    value_check: "JLT",
};

/// Translator state plus per-command emission.
pub struct CodeWriter {
    /// Counter for generated labels, shared by comparisons and calls.
    /// Reset to 0 on every function declaration.
    label_counter: usize,
    /// Base name of the source file being translated.
    current_unit: String,
    /// Most recently declared function; empty before the first one.
    current_function: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            label_counter: 0,
            current_unit: String::new(),
            current_function: String::new(),
        }
    }

    /// Announce the source unit now being translated.
    /// Must be called before each file so static slots do not collide.
    pub fn set_unit(&mut self, unit: &str) {
        self.current_unit = unit.to_string();
    }

    /// Emit the assembly for one command.
    pub fn translate(&mut self, cmd: &Command, buf: &mut String) {
        match cmd {
            Command::Arithmetic(op) => self.write_arithmetic(*op, buf),
            Command::Push { segment, index } => self.write_push(*segment, *index, buf),
            Command::Pop { segment, index } => self.write_pop(*segment, *index, buf),
            Command::Label { name } => self.write_label(name, buf),
            Command::Goto { label } => self.write_goto(label, buf),
            Command::IfGoto { label } => self.write_if_goto(label, buf),
            Command::Function { name, num_locals } => self.write_function(name, *num_locals, buf),
            Command::Call { name, num_args } => self.write_call(name, *num_args, buf),
            Command::Return => self.write_return(buf),
        }
    }

    // =========================================================================
    // Arithmetic and logic
    // =========================================================================

    fn write_arithmetic(&mut self, op: ArithmeticOp, buf: &mut String) {
        match op {
            ArithmeticOp::Add => write_binary("D+M", buf),
            ArithmeticOp::Sub => write_binary("M-D", buf),
            ArithmeticOp::And => write_binary("D&M", buf),
            ArithmeticOp::Or => write_binary("D|M", buf),
            ArithmeticOp::Neg => write_unary("-M", buf),
            ArithmeticOp::Not => write_unary("!M", buf),
            ArithmeticOp::Eq => self.write_eq(buf),
            ArithmeticOp::Gt => self.write_ordering(&GT_JUMPS, buf),
            ArithmeticOp::Lt => self.write_ordering(&LT_JUMPS, buf),
        }
    }

    /// `eq`: pop both operands, subtract, branch on zero.
    fn write_eq(&mut self, buf: &mut String) {
        buf.push_str("@SP\nAM=M-1\nD=M\n");
        buf.push_str("@SP\nAM=M-1\nD=M-D\n");
        buf.push('@');
        self.push_generated_label("IF_TRUE_", buf);
        buf.push_str("\nD;JEQ\n@");
        self.push_generated_label("APPEND_TO_STACK_", buf);
        buf.push_str("\nD=0;JMP\n(");
        self.push_generated_label("IF_TRUE_", buf);
        buf.push_str(")\nD=-1\n(");
        self.push_generated_label("APPEND_TO_STACK_", buf);
        buf.push_str(")\n");
        write_append(buf);
        self.label_counter += 1;
    }

    /// `gt`/`lt`: dispatch on operand signs before ever subtracting, so the
    /// comparison is correct across the whole signed 16-bit range.
    fn write_ordering(&mut self, jumps: &OrderingJumps, buf: &mut String) {
        // pop y
        buf.push_str("@SP\nAM=M-1\nD=M\n@");
        self.push_generated_label("SECOND_CHECK_", buf);
        buf.push_str("\nD;");
        buf.push_str(jumps.sign_check);
        // y's sign settles nothing yet: pop x and decide or fall through
        buf.push_str("\n@SP\nAM=M-1\nD=M\n@");
        self.push_generated_label("IF_FALSE_", buf);
        buf.push_str("\nD;");
        buf.push_str(jumps.false_check);
        buf.push_str("\n@");
        self.push_generated_label("COMPARE_BY_VALUE_", buf);
        buf.push_str("\n0;JMP\n(");
        self.push_generated_label("SECOND_CHECK_", buf);
        // y's sign alone could decide: pop x and check
        buf.push_str(")\n@SP\nAM=M-1\nD=M\n@");
        self.push_generated_label("IF_TRUE_", buf);
        buf.push_str("\nD;");
        buf.push_str(jumps.true_check);
        // signs agree: x - y cannot overflow
        buf.push_str("\n(");
        self.push_generated_label("COMPARE_BY_VALUE_", buf);
        buf.push_str(")\n@SP\nA=M+1\nD=D-M\n@");
        self.push_generated_label("IF_TRUE_", buf);
        buf.push_str("\nD;");
        buf.push_str(jumps.value_check);
        buf.push_str("\n(");
        self.push_generated_label("IF_FALSE_", buf);
        buf.push_str(")\n@");
        self.push_generated_label("APPEND_TO_STACK_", buf);
        buf.push_str("\nD=0;JMP\n(");
        self.push_generated_label("IF_TRUE_", buf);
        buf.push_str(")\nD=-1\n(");
        self.push_generated_label("APPEND_TO_STACK_", buf);
        buf.push_str(")\n");
        write_append(buf);
        self.label_counter += 1;
    }

    // =========================================================================
    // Memory access
    // =========================================================================

    fn write_push(&self, segment: Segment, index: u16, buf: &mut String) {
        match segment_kind(segment) {
            SegmentKind::Immediate => {
                buf.push('@');
                push_number(index as usize, buf);
                buf.push_str("\nD=A\n");
            }
            SegmentKind::Pointed(base) => {
                buf.push('@');
                buf.push_str(base);
                buf.push_str("\nD=M\n@");
                push_number(index as usize, buf);
                buf.push_str("\nA=D+A\nD=M\n");
            }
            SegmentKind::Fixed => {
                buf.push('@');
                if segment == Segment::Temp {
                    push_number(temp_address(index) as usize, buf);
                } else {
                    buf.push_str(pointer_symbol(index));
                }
                buf.push_str("\nD=M\n");
            }
            SegmentKind::Unit => {
                buf.push('@');
                self.push_static_symbol(index, buf);
                buf.push_str("\nD=M\n");
            }
        }
        write_append(buf);
    }

    fn write_pop(&self, segment: Segment, index: u16, buf: &mut String) {
        match segment_kind(segment) {
            SegmentKind::Immediate => {
                // The parser rejects pop-to-constant before it reaches here.
                debug_assert!(false, "pop constant must be caught by the parser");
            }
            SegmentKind::Pointed(base) => {
                // Destination address goes to R13 before the pop: D is the
                // only carry register and the popped value needs it.
                buf.push('@');
                buf.push_str(base);
                buf.push_str("\nD=M\n@");
                push_number(index as usize, buf);
                buf.push_str("\nD=D+A\n@R13\nM=D\n");
                buf.push_str("@SP\nAM=M-1\nD=M\n@R13\nA=M\nM=D\n");
            }
            SegmentKind::Fixed => {
                buf.push_str("@SP\nAM=M-1\nD=M\n@");
                if segment == Segment::Temp {
                    push_number(temp_address(index) as usize, buf);
                } else {
                    buf.push_str(pointer_symbol(index));
                }
                buf.push_str("\nM=D\n");
            }
            SegmentKind::Unit => {
                buf.push_str("@SP\nAM=M-1\nD=M\n@");
                self.push_static_symbol(index, buf);
                buf.push_str("\nM=D\n");
            }
        }
    }

    // =========================================================================
    // Program flow
    // =========================================================================

    fn write_label(&self, name: &str, buf: &mut String) {
        buf.push('(');
        self.push_scoped_label(name, buf);
        buf.push_str(")\n");
    }

    fn write_goto(&self, label: &str, buf: &mut String) {
        buf.push('@');
        self.push_scoped_label(label, buf);
        buf.push_str("\n0;JMP\n");
    }

    fn write_if_goto(&self, label: &str, buf: &mut String) {
        buf.push_str("@SP\nAM=M-1\nD=M\n@");
        self.push_scoped_label(label, buf);
        buf.push_str("\nD;JNE\n");
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn write_function(&mut self, name: &str, num_locals: u16, buf: &mut String) {
        buf.push('(');
        buf.push_str(name);
        buf.push_str(")\n");

        if num_locals == 1 {
            buf.push_str("@SP\nAM=M+1\nA=A-1\nM=0\n");
        } else if num_locals > 1 {
            // Advance SP once, then walk the reserved range zeroing it.
            buf.push('@');
            push_number(num_locals as usize, buf);
            buf.push_str("\nD=A\n@SP\nAM=D+M\nA=A-D\nM=0\n");
            for _ in 1..num_locals {
                buf.push_str("A=A+1\nM=0\n");
            }
        }

        self.current_function = name.to_string();
        self.label_counter = 0;
    }

    fn write_call(&mut self, name: &str, num_args: u16, buf: &mut String) {
        // return address
        buf.push('@');
        self.push_generated_label("RET_ADDR$", buf);
        buf.push_str("\nD=A\n");
        write_append(buf);

        // caller frame
        for pointer in ["LCL", "ARG", "THIS", "THAT"] {
            buf.push('@');
            buf.push_str(pointer);
            buf.push_str("\nD=M\n");
            write_append(buf);
        }

        // ARG = SP - 5 - num_args
        buf.push_str("@SP\nD=M\n@");
        push_number(num_args as usize + 5, buf);
        buf.push_str("\nD=D-A\n@ARG\nM=D\n");

        // LCL = SP
        buf.push_str("@SP\nD=M\n@LCL\nM=D\n");

        buf.push('@');
        buf.push_str(name);
        buf.push_str("\n0;JMP\n(");
        self.push_generated_label("RET_ADDR$", buf);
        buf.push_str(")\n");
        self.label_counter += 1;
    }

    fn write_return(&self, buf: &mut String) {
        // R14 = frame, R15 = return address. The address is saved before
        // SP moves: with zero arguments the slot overlaps *ARG.
        buf.push_str("@LCL\nD=M\n@R14\nM=D\n");
        buf.push_str("@5\nA=D-A\nD=M\n@R15\nM=D\n");

        // *ARG = pop(), SP = ARG + 1
        buf.push_str("@SP\nAM=M-1\nD=M\n@ARG\nA=M\nM=D\n");
        buf.push_str("D=A+1\n@SP\nM=D\n");

        // walk R14 down through the saved frame
        for pointer in ["THAT", "THIS", "ARG", "LCL"] {
            buf.push_str("@R14\nAM=M-1\nD=M\n@");
            buf.push_str(pointer);
            buf.push_str("\nM=D\n");
        }

        buf.push_str("@R15\nA=M\n0;JMP\n");
    }

    // =========================================================================
    // Label helpers
    // =========================================================================

    /// `<prefix><current_function>.<counter>`
    fn push_generated_label(&self, prefix: &str, buf: &mut String) {
        buf.push_str(prefix);
        buf.push_str(&self.current_function);
        buf.push('.');
        push_number(self.label_counter, buf);
    }

    /// `<current_function>$<label>`
    fn push_scoped_label(&self, label: &str, buf: &mut String) {
        buf.push_str(&self.current_function);
        buf.push('$');
        buf.push_str(label);
    }

    /// `<current_unit>.<index>`
    fn push_static_symbol(&self, index: u16, buf: &mut String) {
        buf.push_str(&self.current_unit);
        buf.push('.');
        push_number(index as usize, buf);
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Binary op: pop y into D, then fold into the new stack top in place.
fn write_binary(comp: &str, buf: &mut String) {
    buf.push_str("@SP\nAM=M-1\nD=M\nA=A-1\nM=");
    buf.push_str(comp);
    buf.push('\n');
}

/// Unary op: rewrite the stack top in place.
fn write_unary(comp: &str, buf: &mut String) {
    buf.push_str("@SP\nA=M-1\nM=");
    buf.push_str(comp);
    buf.push('\n');
}

/// Append D to the stack: increment SP, store at the slot below it.
fn write_append(buf: &mut String) {
    buf.push_str("@SP\nAM=M+1\nA=A-1\nM=D\n");
}

/// Append a decimal number without going through the formatter.
fn push_number(mut n: usize, buf: &mut String) {
    let mut digits = [0u8; 20];
    let mut len = 0;
    loop {
        digits[len] = b'0' + (n % 10) as u8;
        n /= 10;
        len += 1;
        if n == 0 {
            break;
        }
    }
    while len > 0 {
        len -= 1;
        buf.push(digits[len] as char);
    }
}
