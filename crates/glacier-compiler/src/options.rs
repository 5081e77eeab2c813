//! Configuration options for compilation.

/// Width of numeric operands in the instruction stream.
///
/// The reference VM reads every operand as a single byte, which caps slots,
/// ids, jump targets and string lengths at 255. `Wide` lifts that cap to
/// `u32::MAX` at the cost of VM compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperandWidth {
    /// One byte per operand. Integer literals are one unsigned byte.
    Byte,
    /// Four little-endian bytes per operand. Integer literals are eight
    /// little-endian bytes.
    #[default]
    Wide,
}

impl OperandWidth {
    /// Bytes taken by one operand.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            OperandWidth::Byte => 1,
            OperandWidth::Wide => 4,
        }
    }

    /// Largest value an operand can hold.
    #[inline]
    pub const fn max(self) -> u64 {
        match self {
            OperandWidth::Byte => u8::MAX as u64,
            OperandWidth::Wide => u32::MAX as u64,
        }
    }

    /// Bytes taken by the payload of an integer literal.
    #[inline]
    pub const fn int_bytes(self) -> usize {
        match self {
            OperandWidth::Byte => 1,
            OperandWidth::Wide => 8,
        }
    }

    /// Decode the width byte stored in the preamble.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(OperandWidth::Byte),
            4 => Some(OperandWidth::Wide),
            _ => None,
        }
    }
}

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use glacier_compiler::{CompileOptions, OperandWidth};
///
/// let options = CompileOptions::default();
/// assert_eq!(options.operand_width, OperandWidth::Wide);
/// assert!(options.emit_preamble);
///
/// // Byte-for-byte layout the reference VM can load.
/// let compat = CompileOptions::compatible();
/// assert_eq!(compat.operand_width, OperandWidth::Byte);
/// assert!(!compat.emit_preamble);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Operand encoding for every instruction.
    ///
    /// Default: `OperandWidth::Wide`
    pub operand_width: OperandWidth,

    /// Prefix the artifact with magic, format version, operand width and
    /// header length.
    ///
    /// Default: true
    pub emit_preamble: bool,
}

impl CompileOptions {
    /// Options that reproduce the reference on-disk layout exactly.
    pub fn compatible() -> Self {
        Self {
            operand_width: OperandWidth::Byte,
            emit_preamble: false,
        }
    }

    pub fn with_operand_width(mut self, width: OperandWidth) -> Self {
        self.operand_width = width;
        self
    }

    pub fn with_preamble(mut self, emit: bool) -> Self {
        self.emit_preamble = emit;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            operand_width: OperandWidth::Wide,
            emit_preamble: true,
        }
    }
}
