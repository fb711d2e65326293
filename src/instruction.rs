use std::fmt::{Display, Formatter};

use paste::paste;

use crate::error::{Error, Result};
use crate::state::VmState;
use crate::value::{coerce, Numeric, ValType, WasmValue};

/// The closed instruction set. Binary instructions take the value below the top as their
/// left-hand operand and the top as their right-hand operand.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Instruction {
    Push(Numeric, ValType),
    Pop,
    Drop,
    Grow,
    Add(ValType),
    Sub(ValType),
    Mul(ValType),
    Div(ValType),
    Eq(ValType),
    /// Integer types only.
    Eqz(ValType),
    // Ordered comparisons put both operands back, coerced to the instruction type, beneath the result.
    Lt(ValType),
    Gt(ValType),
    Le(ValType),
    Ge(ValType),
    /// Integer types only.
    And(ValType),
    /// Integer types only.
    Or(ValType),
    /// Integer types only.
    Xor(ValType),
}

#[inline]
fn integer_only(ty: ValType) -> Result<ValType> {
    if ty.is_integer() { Ok(ty) } else { Err(Error::unsupported(ty.name())) }
}

macro_rules! constructors {
    (any: $($any:ident),*; integer: $($int:ident),*) => {
        paste! {
            $(
                #[inline]
                pub fn [<$any:lower>](ty: ValType) -> Self { Instruction::$any(ty) }
            )*
            $(
                pub fn [<$int:lower>](ty: ValType) -> Result<Self> { integer_only(ty).map(Instruction::$int) }
            )*
        }
    };
}

impl Instruction {
    pub const MNEMONICS: [&'static str; 17] = [
        "add", "and", "div", "drop", "eq", "eqz", "ge", "grow", "gt",
        "le", "lt", "mul", "or", "pop", "push", "sub", "xor",
    ];

    #[inline]
    pub fn push(value: impl Into<Numeric>, ty: ValType) -> Self { Instruction::Push(value.into(), ty) }

    constructors!(any: Add, Sub, Mul, Div, Eq, Lt, Gt, Le, Ge; integer: Eqz, And, Or, Xor);

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Push(..) => "push",
            Instruction::Pop => "pop",
            Instruction::Drop => "drop",
            Instruction::Grow => "grow",
            Instruction::Add(_) => "add",
            Instruction::Sub(_) => "sub",
            Instruction::Mul(_) => "mul",
            Instruction::Div(_) => "div",
            Instruction::Eq(_) => "eq",
            Instruction::Eqz(_) => "eqz",
            Instruction::Lt(_) => "lt",
            Instruction::Gt(_) => "gt",
            Instruction::Le(_) => "le",
            Instruction::Ge(_) => "ge",
            Instruction::And(_) => "and",
            Instruction::Or(_) => "or",
            Instruction::Xor(_) => "xor",
        }
    }

    pub fn ty(&self) -> Option<ValType> {
        match *self {
            Instruction::Pop | Instruction::Drop | Instruction::Grow => None,
            Instruction::Push(_, ty)
            | Instruction::Add(ty)
            | Instruction::Sub(ty)
            | Instruction::Mul(ty)
            | Instruction::Div(ty)
            | Instruction::Eq(ty)
            | Instruction::Eqz(ty)
            | Instruction::Lt(ty)
            | Instruction::Gt(ty)
            | Instruction::Le(ty)
            | Instruction::Ge(ty)
            | Instruction::And(ty)
            | Instruction::Or(ty)
            | Instruction::Xor(ty) => Some(ty),
        }
    }

    /// Applies the instruction to `state`. Only `Pop` produces a value.
    ///
    /// Operand counts and divisors are checked before anything is removed, so a failing
    /// instruction leaves the stack as it found it.
    pub fn execute(&self, state: &mut VmState) -> Result<Option<WasmValue>> {
        macro_rules! operands { () => {{
            let b = state.peek(0)?.numeric();
            let a = state.peek(1)?.numeric();
            (a, b)
        }} }
        macro_rules! replace_two { ($ty:expr, $result:expr) => {{
            let len = state.stack.len();
            state.stack.truncate(len - 2);
            state.push(coerce($ty, $result));
        }} }
        macro_rules! binary { ($ty:expr, $op:tt) => {{
            let (a, b) = operands!();
            replace_two!($ty, a $op b);
        }} }
        macro_rules! compare { ($ty:expr, $op:tt) => {{
            let (a, b) = operands!();
            let len = state.stack.len();
            state.stack.truncate(len - 2);
            state.push(coerce($ty, a));
            state.push(coerce($ty, b));
            state.push(coerce($ty, Numeric::from((a $op b) as i32)));
        }} }
        macro_rules! bitwise { ($ty:expr, $op:tt) => {{
            let ty = integer_only($ty)?;
            let (a, b) = operands!();
            let a = coerce(ty, a).numeric().as_int();
            let b = coerce(ty, b).numeric().as_int();
            replace_two!(ty, Numeric::Int(a $op b));
        }} }

        match *self {
            Instruction::Push(value, ty) => state.push(coerce(ty, value)),
            Instruction::Pop => return state.pop().map(Some),
            Instruction::Drop => { state.pop()?; }
            Instruction::Grow => { state.memory.grow(); }
            Instruction::Add(ty) => binary!(ty, +),
            Instruction::Sub(ty) => binary!(ty, -),
            Instruction::Mul(ty) => binary!(ty, *),
            Instruction::Div(ty) => {
                let (a, b) = operands!();
                let quotient = a.divide(b, ty).ok_or(Error::DivisionByZero)?;
                replace_two!(ty, quotient);
            }
            Instruction::Eq(ty) => {
                let (a, b) = operands!();
                replace_two!(ty, Numeric::from((a == b) as i32));
            }
            Instruction::Eqz(ty) => {
                let ty = integer_only(ty)?;
                let top = state.pop()?;
                state.push(coerce(ty, Numeric::from(top.numeric().is_zero() as i32)));
            }
            Instruction::Lt(ty) => compare!(ty, <),
            Instruction::Gt(ty) => compare!(ty, >),
            Instruction::Le(ty) => compare!(ty, <=),
            Instruction::Ge(ty) => compare!(ty, >=),
            Instruction::And(ty) => bitwise!(ty, &),
            Instruction::Or(ty) => bitwise!(ty, |),
            Instruction::Xor(ty) => bitwise!(ty, ^),
        }
        Ok(None)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self, self.ty()) {
            (Instruction::Push(value, ty), _) => write!(f, "push {} {}", ty, value),
            (_, Some(ty)) => write!(f, "{} {}", self.mnemonic(), ty),
            (_, None) => f.write_str(self.mnemonic()),
        }
    }
}
