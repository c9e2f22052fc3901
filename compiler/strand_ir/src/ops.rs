//! Operators carried by unary, binary, comparison and branch instructions.

use std::fmt;

/// Binary arithmetic, bitwise and shift operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    /// Unsigned (logical) right shift.
    Ushr,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Rem => "rem",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::Shr => "shr",
            BinaryOp::Ushr => "ushr",
        }
    }

    /// Integer division and remainder can trap on a zero divisor.
    #[inline]
    pub fn may_trap(self) -> bool {
        matches!(self, BinaryOp::Div | BinaryOp::Rem)
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    /// Logical not.
    Not,
    /// Bitwise complement.
    BitNot,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Not => "not",
            UnaryOp::BitNot => "bitnot",
        }
    }
}

/// Value-producing comparisons.
///
/// `Cmp`, `Cmpl` and `Cmpg` are the three-way comparisons of bytecode
/// languages; the relational forms produce a boolean in dynamic languages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Cmp,
    Cmpl,
    Cmpg,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    StrictEq,
    StrictNe,
}

impl ComparisonOp {
    pub fn name(self) -> &'static str {
        match self {
            ComparisonOp::Cmp => "cmp",
            ComparisonOp::Cmpl => "cmpl",
            ComparisonOp::Cmpg => "cmpg",
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Le => "le",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Ge => "ge",
            ComparisonOp::StrictEq => "stricteq",
            ComparisonOp::StrictNe => "strictne",
        }
    }
}

/// Conditional branch predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchOp {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl BranchOp {
    pub fn name(self) -> &'static str {
        match self {
            BranchOp::Eq => "eq",
            BranchOp::Ne => "ne",
            BranchOp::Lt => "lt",
            BranchOp::Ge => "ge",
            BranchOp::Gt => "gt",
            BranchOp::Le => "le",
        }
    }

    /// The predicate taken on the other edge.
    #[must_use]
    pub fn negate(self) -> BranchOp {
        match self {
            BranchOp::Eq => BranchOp::Ne,
            BranchOp::Ne => BranchOp::Eq,
            BranchOp::Lt => BranchOp::Ge,
            BranchOp::Ge => BranchOp::Lt,
            BranchOp::Gt => BranchOp::Le,
            BranchOp::Le => BranchOp::Gt,
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(BinaryOp, UnaryOp, ComparisonOp, BranchOp);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_division_traps() {
        assert!(BinaryOp::Div.may_trap());
        assert!(BinaryOp::Rem.may_trap());
        assert!(!BinaryOp::Add.may_trap());
        assert!(!BinaryOp::Shl.may_trap());
    }

    #[test]
    fn branch_negation_is_involutive() {
        for op in [
            BranchOp::Eq,
            BranchOp::Ne,
            BranchOp::Lt,
            BranchOp::Ge,
            BranchOp::Gt,
            BranchOp::Le,
        ] {
            assert_eq!(op.negate().negate(), op);
            assert_ne!(op.negate(), op);
        }
    }

    #[test]
    fn operators_display_by_name() {
        assert_eq!(BinaryOp::Ushr.to_string(), "ushr");
        assert_eq!(ComparisonOp::StrictEq.to_string(), "stricteq");
    }
}
