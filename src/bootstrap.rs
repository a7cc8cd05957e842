//! The fixed prologue emitted once at the start of every output program.

/// Write the bootstrap sequence.
///
/// Sets `SP = 256` and performs an abbreviated call of `Sys.init`: no
/// return frame is pushed because there is no caller to restore and
/// `Sys.init` never returns. Instead, `SP` is advanced by five words
/// (the size of a saved frame), `ARG` is left at 256 and `LCL` at the
/// new `SP`, exactly as a real `call Sys.init 0` would, then control
/// jumps to `Sys.init`.
pub fn write_bootstrap(buf: &mut String) {
    // SP = 256, ARG = 256
    buf.push_str("@256\nD=A\n@SP\nM=D\n@ARG\nM=D\n");

    // SP += 5 (pseudo-frame), LCL = SP
    buf.push_str("@5\nD=A\n@SP\nMD=D+M\n@LCL\nM=D\n");

    buf.push_str("@Sys.init\n0;JMP\n");
}
