//! Operation kinds, constant payloads, and comparison predicates.

/// Payload of a `Constant` operation.
///
/// The result type decides the shape: a scalar result holds the value once,
/// a tensor result holds it splatted across every element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstValue {
    Int(i64),
    Bool(bool),
    /// IEEE bits, kept as `u64` so the payload stays `Eq + Hash`.
    Float(u64),
}

impl ConstValue {
    /// The integer interpretation of this constant (`true` is 1).
    /// `None` for floats.
    pub fn as_int(self) -> Option<i64> {
        match self {
            ConstValue::Int(v) => Some(v),
            ConstValue::Bool(b) => Some(i64::from(b)),
            ConstValue::Float(_) => None,
        }
    }
}

/// Integer comparison predicate.
///
/// Unsigned variants compare the two's-complement bit patterns as `u64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CmpPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

impl CmpPredicate {
    /// Evaluate the predicate on two 64-bit integers.
    #[expect(clippy::cast_sign_loss, reason = "unsigned predicates reinterpret bits")]
    pub fn evaluate(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpPredicate::Eq => lhs == rhs,
            CmpPredicate::Ne => lhs != rhs,
            CmpPredicate::Slt => lhs < rhs,
            CmpPredicate::Sle => lhs <= rhs,
            CmpPredicate::Sgt => lhs > rhs,
            CmpPredicate::Sge => lhs >= rhs,
            CmpPredicate::Ult => (lhs as u64) < (rhs as u64),
            CmpPredicate::Ule => (lhs as u64) <= (rhs as u64),
            CmpPredicate::Ugt => (lhs as u64) > (rhs as u64),
            CmpPredicate::Uge => (lhs as u64) >= (rhs as u64),
        }
    }

    /// `sge` or `uge`.
    pub fn is_greater_or_equal(self) -> bool {
        matches!(self, CmpPredicate::Sge | CmpPredicate::Uge)
    }

    /// `sle` or `ule`.
    pub fn is_less_or_equal(self) -> bool {
        matches!(self, CmpPredicate::Sle | CmpPredicate::Ule)
    }
}

/// The kind of an operation, with its kind-specific payload.
///
/// Closed set: analyses match on it exhaustively or dispatch on its
/// payload-free [`OpCode`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpKind {
    // ── Value-preserving casts ──────────────────────────────────
    ExtSI,
    ExtUI,
    TruncI,
    IndexCast,
    PtrToInt,
    IntToPtr,
    /// Change the tensor layout without changing any element.
    ConvertLayout,
    Bitcast,
    /// Placeholder cast left behind by partial lowering.
    UnrealizedCast,

    // ── Value producers ─────────────────────────────────────────
    /// The 1-D tensor `[start, start + 1, ..., end - 1]`.
    MakeRange { start: i64, end: i64 },
    Constant(ConstValue),

    // ── Integer arithmetic ──────────────────────────────────────
    AddI,
    /// Pointer plus element offset.
    AddPtr,
    SubI,
    MulI,
    DivSI,
    DivUI,
    RemSI,
    RemUI,
    AndI,
    OrI,
    XorI,
    CmpI { predicate: CmpPredicate },
    /// `select(cond, on_true, on_false)`.
    Select,

    // ── Shape manipulation ──────────────────────────────────────
    /// Broadcast size-1 dimensions to the result extents (same rank).
    Broadcast,
    /// Scalar to tensor, every element equal.
    Splat,
    /// Insert a size-1 dimension at `axis`.
    ExpandDims { axis: u32 },

    // ── Memory ──────────────────────────────────────────────────
    /// `load(ptr [, mask [, other]])`.
    Load,
    /// `store(ptr, value [, mask])`.
    Store,

    /// Any operation this crate does not model.
    Opaque { name: String },
}

/// Payload-free discriminant of [`OpKind`], usable as a table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCode {
    ExtSI,
    ExtUI,
    TruncI,
    IndexCast,
    PtrToInt,
    IntToPtr,
    ConvertLayout,
    Bitcast,
    UnrealizedCast,
    MakeRange,
    Constant,
    AddI,
    AddPtr,
    SubI,
    MulI,
    DivSI,
    DivUI,
    RemSI,
    RemUI,
    AndI,
    OrI,
    XorI,
    CmpI,
    Select,
    Broadcast,
    Splat,
    ExpandDims,
    Load,
    Store,
    Opaque,
}

impl OpCode {
    /// Lowercase mnemonic, for logs and dumps.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::ExtSI => "extsi",
            OpCode::ExtUI => "extui",
            OpCode::TruncI => "trunci",
            OpCode::IndexCast => "index_cast",
            OpCode::PtrToInt => "ptr_to_int",
            OpCode::IntToPtr => "int_to_ptr",
            OpCode::ConvertLayout => "convert_layout",
            OpCode::Bitcast => "bitcast",
            OpCode::UnrealizedCast => "unrealized_cast",
            OpCode::MakeRange => "make_range",
            OpCode::Constant => "constant",
            OpCode::AddI => "addi",
            OpCode::AddPtr => "addptr",
            OpCode::SubI => "subi",
            OpCode::MulI => "muli",
            OpCode::DivSI => "divsi",
            OpCode::DivUI => "divui",
            OpCode::RemSI => "remsi",
            OpCode::RemUI => "remui",
            OpCode::AndI => "andi",
            OpCode::OrI => "ori",
            OpCode::XorI => "xori",
            OpCode::CmpI => "cmpi",
            OpCode::Select => "select",
            OpCode::Broadcast => "broadcast",
            OpCode::Splat => "splat",
            OpCode::ExpandDims => "expand_dims",
            OpCode::Load => "load",
            OpCode::Store => "store",
            OpCode::Opaque => "opaque",
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl OpKind {
    /// The payload-free discriminant of this kind.
    pub fn code(&self) -> OpCode {
        match self {
            OpKind::ExtSI => OpCode::ExtSI,
            OpKind::ExtUI => OpCode::ExtUI,
            OpKind::TruncI => OpCode::TruncI,
            OpKind::IndexCast => OpCode::IndexCast,
            OpKind::PtrToInt => OpCode::PtrToInt,
            OpKind::IntToPtr => OpCode::IntToPtr,
            OpKind::ConvertLayout => OpCode::ConvertLayout,
            OpKind::Bitcast => OpCode::Bitcast,
            OpKind::UnrealizedCast => OpCode::UnrealizedCast,
            OpKind::MakeRange { .. } => OpCode::MakeRange,
            OpKind::Constant(_) => OpCode::Constant,
            OpKind::AddI => OpCode::AddI,
            OpKind::AddPtr => OpCode::AddPtr,
            OpKind::SubI => OpCode::SubI,
            OpKind::MulI => OpCode::MulI,
            OpKind::DivSI => OpCode::DivSI,
            OpKind::DivUI => OpCode::DivUI,
            OpKind::RemSI => OpCode::RemSI,
            OpKind::RemUI => OpCode::RemUI,
            OpKind::AndI => OpCode::AndI,
            OpKind::OrI => OpCode::OrI,
            OpKind::XorI => OpCode::XorI,
            OpKind::CmpI { .. } => OpCode::CmpI,
            OpKind::Select => OpCode::Select,
            OpKind::Broadcast => OpCode::Broadcast,
            OpKind::Splat => OpCode::Splat,
            OpKind::ExpandDims { .. } => OpCode::ExpandDims,
            OpKind::Load => OpCode::Load,
            OpKind::Store => OpCode::Store,
            OpKind::Opaque { .. } => OpCode::Opaque,
        }
    }

    /// Returns `true` if `n` operands are well-formed for this kind.
    pub fn accepts_operands(&self, n: usize) -> bool {
        match self {
            OpKind::ExtSI
            | OpKind::ExtUI
            | OpKind::TruncI
            | OpKind::IndexCast
            | OpKind::PtrToInt
            | OpKind::IntToPtr
            | OpKind::ConvertLayout
            | OpKind::Bitcast
            | OpKind::UnrealizedCast
            | OpKind::Broadcast
            | OpKind::Splat
            | OpKind::ExpandDims { .. } => n == 1,

            OpKind::MakeRange { .. } | OpKind::Constant(_) => n == 0,

            OpKind::AddI
            | OpKind::AddPtr
            | OpKind::SubI
            | OpKind::MulI
            | OpKind::DivSI
            | OpKind::DivUI
            | OpKind::RemSI
            | OpKind::RemUI
            | OpKind::AndI
            | OpKind::OrI
            | OpKind::XorI
            | OpKind::CmpI { .. } => n == 2,

            OpKind::Select => n == 3,
            OpKind::Load => (1..=3).contains(&n),
            OpKind::Store => (2..=3).contains(&n),
            OpKind::Opaque { .. } => true,
        }
    }

    /// Number of results this kind produces, or `None` if any count is
    /// allowed (opaque operations).
    pub fn result_count(&self) -> Option<usize> {
        match self {
            OpKind::Store => Some(0),
            OpKind::Opaque { .. } => None,
            _ => Some(1),
        }
    }

    /// Returns `true` for operations that forward their operand unchanged
    /// apart from type or layout.
    pub fn is_identity_cast(&self) -> bool {
        matches!(
            self,
            OpKind::ExtSI
                | OpKind::ExtUI
                | OpKind::TruncI
                | OpKind::IndexCast
                | OpKind::PtrToInt
                | OpKind::IntToPtr
                | OpKind::ConvertLayout
                | OpKind::Bitcast
                | OpKind::UnrealizedCast
        )
    }
}
