use std::{env, fs, path::{Path, PathBuf}};
use serde::Deserialize;
use wasmvm::{decode, Error, InstructionRecord, StackVm, WasmValue};

#[derive(Deserialize, Clone, Debug)]
struct ValueJSON {
    r#type: String,
    value: String,
}

#[derive(Deserialize, Clone)]
#[serde(tag = "type")]
enum Act {
    #[serde(rename = "run")]
    Run,
    #[serde(rename = "execute")]
    Execute { instruction: InstructionRecord },
}

#[derive(Deserialize, Clone)]
#[serde(tag = "type")]
enum TestCmd {
    #[serde(rename = "append")]
    Append { line: u32, program: Vec<InstructionRecord> },
    #[serde(rename = "action")]
    Action { line: u32, action: Act },
    #[serde(rename = "rewind")]
    Rewind { line: u32 },
    #[serde(rename = "assert_stack")]
    AssertStack { line: u32, expected: Vec<ValueJSON> },
    #[serde(rename = "assert_return")]
    AssertReturn { line: u32, action: Act, expected: Option<ValueJSON> },
    #[serde(rename = "assert_error")]
    AssertError { line: u32, action: Act, text: String },
    #[serde(rename = "assert_invalid")]
    AssertInvalid { line: u32, instruction: InstructionRecord, text: String },
    #[serde(rename = "assert_state")]
    AssertState { line: u32, pc: Option<usize>, pages: Option<usize> },
}

impl TestCmd {
    fn line(&self) -> u32 {
        match self {
            TestCmd::Append { line, .. }
            | TestCmd::Action { line, .. }
            | TestCmd::Rewind { line }
            | TestCmd::AssertStack { line, .. }
            | TestCmd::AssertReturn { line, .. }
            | TestCmd::AssertError { line, .. }
            | TestCmd::AssertInvalid { line, .. }
            | TestCmd::AssertState { line, .. } => *line,
        }
    }
}

#[derive(Deserialize)]
struct ScriptJSON {
    #[serde(default)]
    pages: usize,
    #[serde(default)]
    max_pages: usize,
    commands: Vec<TestCmd>,
}

fn to_wasm_value(v: &ValueJSON) -> WasmValue {
    match v.r#type.as_str() {
        "i32" => WasmValue::I32(v.value.parse().unwrap()),
        "i64" => WasmValue::I64(v.value.parse().unwrap()),
        "f32" => WasmValue::F32(v.value.parse().unwrap()),
        "f64" => WasmValue::F64(v.value.parse().unwrap()),
        _ => panic!("unknown value type: {}", v.r#type),
    }
}

fn exec_action(vm: &mut StackVm, action: &Act) -> Result<Option<WasmValue>, Error> {
    match action {
        Act::Run => vm.run().map(|_| None),
        Act::Execute { instruction } => vm.execute(&decode(instruction)?),
    }
}

fn check_stack(stack: &[WasmValue], expected: &[ValueJSON]) -> Result<(), String> {
    let expected: Vec<WasmValue> = expected.iter().map(to_wasm_value).collect();
    if stack != expected.as_slice() {
        return Err(format!("stack mismatch: expected {:?}, got {:?}", expected, stack));
    }
    Ok(())
}

fn run_script(path: &Path) -> Result<u32, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("failed to read script: {}", e))?;
    let script: ScriptJSON =
        serde_json::from_str(&text).map_err(|e| format!("failed to parse script: {}", e))?;
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("?");

    let mut vm = StackVm::new(script.pages, script.max_pages);
    let mut failures = 0u32;

    for cmd in &script.commands {
        let result = match cmd {
            TestCmd::Append { program, .. } => program
                .iter()
                .map(decode)
                .collect::<Result<Vec<_>, _>>()
                .map(|instructions| vm.append_instructions(instructions))
                .map_err(|e| e.to_string()),

            TestCmd::Action { action, .. } => {
                exec_action(&mut vm, action).map(|_| ()).map_err(|e| e.to_string())
            }

            TestCmd::Rewind { .. } => {
                vm.rewind();
                Ok(())
            }

            TestCmd::AssertStack { expected, .. } => check_stack(vm.inspect(), expected),

            TestCmd::AssertReturn { action, expected, .. } => {
                match exec_action(&mut vm, action) {
                    Ok(returned) => {
                        let expected = expected.as_ref().map(to_wasm_value);
                        if returned == expected {
                            Ok(())
                        } else {
                            Err(format!("return mismatch: expected {:?}, got {:?}", expected, returned))
                        }
                    }
                    Err(e) => Err(format!("unexpected error: {}", e)),
                }
            }

            TestCmd::AssertError { action, text, .. } => match exec_action(&mut vm, action) {
                Err(e) if e.to_string() == *text => Ok(()),
                Err(e) => Err(format!("message mismatch: expected '{}', got '{}'", text, e)),
                Ok(_) => Err(format!("expected error: '{}'", text)),
            },

            TestCmd::AssertInvalid { instruction, text, .. } => match decode(instruction) {
                Err(e) if e.to_string().starts_with(text.as_str()) => Ok(()),
                Err(e) => Err(format!("message mismatch: expected '{}', got '{}'", text, e)),
                Ok(i) => Err(format!("expected decode error, got '{}'", i)),
            },

            TestCmd::AssertState { pc, pages, .. } => {
                let state = vm.state();
                if pc.is_some_and(|pc| pc != state.pc()) {
                    Err(format!("pc mismatch: expected {:?}, got {}", pc, state.pc()))
                } else if pages.is_some_and(|p| p != state.memory().size()) {
                    Err(format!("page mismatch: expected {:?}, got {}", pages, state.memory().size()))
                } else {
                    Ok(())
                }
            }
        };

        if let Err(e) = result {
            eprintln!("[{}:{}] {}", name, cmd.line(), e);
            failures += 1;
        }
    }

    Ok(failures)
}

fn scripts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/scripts")
}

#[test]
fn run_script_tests() {
    let filter = env::var("SCRIPT_FILTER").ok();
    let mut entries: Vec<PathBuf> = fs::read_dir(scripts_dir())
        .expect("failed to read scripts directory")
        .map(|entry| entry.expect("failed to read entry").path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort();
    assert!(!entries.is_empty(), "no scripts found");

    let mut total_failures = 0u32;
    for path in &entries {
        let stem = path.file_stem().unwrap().to_str().unwrap();
        if let Some(ref f) = filter {
            if !stem.contains(f) {
                continue;
            }
        }
        println!("Running {}", stem);
        match run_script(path) {
            Ok(failures) => total_failures += failures,
            Err(e) => {
                eprintln!("  Error: {}", e);
                total_failures += 1;
            }
        }
    }

    if total_failures > 0 {
        panic!("{} script assertions failed", total_failures);
    }
}
