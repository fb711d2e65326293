//! Instruction records as they arrive from outside the engine:
//! `{"name": "push", "type": "i32", "value": 2}`.

use serde::Deserialize;

use crate::error::*;
use crate::instruction::Instruction;
use crate::value::{Numeric, ValType};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonNumber {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<JsonNumber> for Numeric {
    fn from(n: JsonNumber) -> Self {
        match n {
            JsonNumber::Int(v) => Numeric::from(v),
            JsonNumber::UInt(v) => Numeric::from(v),
            JsonNumber::Float(v) => Numeric::from(v),
        }
    }
}

/// One undecoded instruction. Type names stay strings here so that an unknown name surfaces
/// as `UnsupportedType` rather than a JSON error.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InstructionRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl InstructionRecord {
    pub fn new(name: &str, ty: Option<&str>, value: Option<serde_json::Value>) -> Self {
        Self { name: name.to_string(), ty: ty.map(str::to_string), value }
    }

    fn value_type(&self) -> Result<ValType> {
        self.ty.as_deref().ok_or_else(|| Error::malformed(MISSING_TYPE))?.parse()
    }

    fn literal(&self) -> Result<Numeric> {
        let value = self.value.clone().ok_or_else(|| Error::malformed(MISSING_VALUE))?;
        serde_json::from_value::<JsonNumber>(value)
            .map(Numeric::from)
            .map_err(|_| Error::malformed(INVALID_VALUE))
    }
}

/// Names accepted by [`decode`], sorted.
pub fn mnemonics() -> &'static [&'static str] { &Instruction::MNEMONICS }

pub fn decode(record: &InstructionRecord) -> Result<Instruction> {
    Ok(match record.name.as_str() {
        "push" => {
            let ty = record.value_type()?;
            Instruction::push(record.literal()?, ty)
        }
        "pop" => Instruction::Pop,
        "drop" => Instruction::Drop,
        "grow" => Instruction::Grow,
        "add" => Instruction::add(record.value_type()?),
        "sub" => Instruction::sub(record.value_type()?),
        "mul" => Instruction::mul(record.value_type()?),
        "div" => Instruction::div(record.value_type()?),
        "eq" => Instruction::eq(record.value_type()?),
        "lt" => Instruction::lt(record.value_type()?),
        "gt" => Instruction::gt(record.value_type()?),
        "le" => Instruction::le(record.value_type()?),
        "ge" => Instruction::ge(record.value_type()?),
        "eqz" => Instruction::eqz(record.value_type()?)?,
        "and" => Instruction::and(record.value_type()?)?,
        "or" => Instruction::or(record.value_type()?)?,
        "xor" => Instruction::xor(record.value_type()?)?,
        other => return Err(Error::malformed(format!("{} '{}'", UNKNOWN_INSTRUCTION, other))),
    })
}

/// Parses a JSON array of instruction records.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>> {
    let records: Vec<InstructionRecord> =
        serde_json::from_str(text).map_err(|e| Error::malformed(e.to_string()))?;
    records.iter().map(decode).collect()
}
