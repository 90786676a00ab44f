use alloc::vec::Vec;

pub type FountResult<T> = Result<T, FountError>;

/// The malformed input that caused an `InvalidConfig` rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigFault {
    /// K was zero.
    NoSources,
    /// A symbol of length zero.
    EmptySymbol,
    SymbolLength { expected: usize, got: usize },
    LengthMismatch { expected: usize, got: usize },
    /// Unit degree outside `[1, max]`.
    Degree { unit: u32, degree: usize, max: usize },
    DuplicateNeighbor { unit: u32, index: u32 },
    NeighborOutOfRange { unit: u32, index: u32, k: usize },
    /// A decode position outside `[0, k)`.
    IndexOutOfRange { index: u32, k: usize },
    DegreeBounds { min: usize, max: usize },
    Distribution(&'static str),
    /// A parameter too large for its wire field.
    Overflow { field: &'static str, value: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFault {
    Truncated { needed: usize, got: usize },
    BadMagic(u32),
    UnsupportedVersion(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FountError {
    InvalidConfig(ConfigFault),
    /// Exact solver: fewer independent rows than unknowns.
    RankDeficient { rank: usize, pivots: Vec<usize> },
    /// Belief propagation ran out of degree-1 units.
    DecodeStalled { resolved: usize, unresolved: usize },
    /// Constraint repair reached a fixpoint with sources still unknown.
    PrecodeExhausted { resolved: usize, unresolved: usize },
    /// A fully reduced row reads `0 = value` with a nonzero value.
    Inconsistent { row: usize },
    WireFormat(WireFault),
}

impl From<ConfigFault> for FountError {
    fn from(fault: ConfigFault) -> Self {
        FountError::InvalidConfig(fault)
    }
}

impl From<WireFault> for FountError {
    fn from(fault: WireFault) -> Self {
        FountError::WireFormat(fault)
    }
}

impl core::fmt::Display for ConfigFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigFault::NoSources => write!(f, "source count must be at least 1"),
            ConfigFault::EmptySymbol => write!(f, "zero-length symbol"),
            ConfigFault::SymbolLength { expected, got } => {
                write!(f, "symbol length {} (expected {})", got, expected)
            }
            ConfigFault::LengthMismatch { expected, got } => {
                write!(f, "vector length {} (expected {})", got, expected)
            }
            ConfigFault::Degree { unit, degree, max } => {
                write!(f, "unit {} has degree {} outside [1, {}]", unit, degree, max)
            }
            ConfigFault::DuplicateNeighbor { unit, index } => {
                write!(f, "unit {} lists index {} twice", unit, index)
            }
            ConfigFault::NeighborOutOfRange { unit, index, k } => {
                write!(f, "unit {} references index {} outside [0, {})", unit, index, k)
            }
            ConfigFault::IndexOutOfRange { index, k } => {
                write!(f, "index {} outside [0, {})", index, k)
            }
            ConfigFault::DegreeBounds { min, max } => {
                write!(f, "degree bounds [{}, {}] are empty or start at zero", min, max)
            }
            ConfigFault::Distribution(reason) => write!(f, "degree distribution: {}", reason),
            ConfigFault::Overflow { field, value } => {
                write!(f, "{} = {} exceeds what its field allows", field, value)
            }
        }
    }
}

impl core::fmt::Display for WireFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WireFault::Truncated { needed, got } => {
                write!(f, "truncated: need {} bytes, got {}", needed, got)
            }
            WireFault::BadMagic(magic) => write!(f, "bad magic {:#010x}", magic),
            WireFault::UnsupportedVersion(v) => write!(f, "unsupported wire version {}", v),
        }
    }
}

impl core::fmt::Display for FountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FountError::InvalidConfig(fault) => write!(f, "invalid config: {}", fault),
            FountError::RankDeficient { rank, pivots } => {
                write!(f, "rank deficient: rank {} (pivot columns {:?})", rank, pivots)
            }
            FountError::DecodeStalled { resolved, unresolved } => {
                write!(f, "decode stalled: {} resolved, {} unresolved", resolved, unresolved)
            }
            FountError::PrecodeExhausted { resolved, unresolved } => {
                write!(f, "precode exhausted: {} resolved, {} unresolved", resolved, unresolved)
            }
            FountError::Inconsistent { row } => write!(f, "inconsistent system at row {}", row),
            FountError::WireFormat(fault) => write!(f, "wire format: {}", fault),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FountError {}
