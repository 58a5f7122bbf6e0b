//! WebAssembly bindings for the number path maze engine
//!
//! Exposes a `MazeBuilder` that carries the previous maze's opening between
//! builds, optionally persisted to `localStorage`.

use numpath_core::{
    generate_question, BuiltMaze, Grade, MazeGenerator, MazeOrigin, Operation, PathPrefix,
    SimpleRng,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod storage;


// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Grade from a UI string, grade 5 when missing or out of range
pub fn parse_grade(value: &str) -> Grade {
    value.parse().unwrap_or_default()
}

/// Operation from a UI string, mixed when unrecognised
pub fn parse_operation(value: &str) -> Operation {
    value.parse().unwrap_or_default()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Builds mazes and remembers the opening of the last one
#[wasm_bindgen]
pub struct MazeBuilder {
    generator: MazeGenerator,
    last_prefix: Option<PathPrefix>,
    storage_key: Option<String>,
}

impl Default for MazeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl MazeBuilder {
    /// Builder with in-memory prefix tracking only
    #[wasm_bindgen(constructor)]
    pub fn new() -> MazeBuilder {
        MazeBuilder {
            generator: MazeGenerator::new(),
            last_prefix: None,
            storage_key: None,
        }
    }

    /// Builder whose prefix survives page reloads under `key` in localStorage
    #[wasm_bindgen]
    pub fn with_storage(key: &str) -> MazeBuilder {
        MazeBuilder {
            generator: MazeGenerator::new(),
            last_prefix: storage::load_prefix(key),
            storage_key: Some(key.to_string()),
        }
    }

    /// Build the next maze; returns `{ maze, prefix }`
    #[wasm_bindgen]
    pub fn build(&mut self, grade: &str, operation: &str) -> Result<JsValue, JsValue> {
        let built = self.next(grade, operation);
        to_js(&built)
    }

    /// Build the next maze as a JSON string
    #[wasm_bindgen]
    pub fn build_json(&mut self, grade: &str, operation: &str) -> String {
        let built = self.next(grade, operation);
        serde_json::to_string(&built).unwrap_or_default()
    }

    /// Opening of the last maze, ids joined by `|`
    #[wasm_bindgen]
    pub fn last_prefix(&self) -> Option<String> {
        self.last_prefix.as_ref().map(|p| p.to_string())
    }

    /// Restore a prefix saved by the page; false if it doesn't parse
    #[wasm_bindgen]
    pub fn set_last_prefix(&mut self, text: &str) -> bool {
        match text.parse::<PathPrefix>() {
            Ok(prefix) => {
                self.remember(Some(prefix));
                true
            }
            Err(_) => false,
        }
    }

    /// Forget the last opening
    #[wasm_bindgen]
    pub fn clear_prefix(&mut self) {
        self.remember(None);
    }
}

impl MazeBuilder {
    fn next(&mut self, grade: &str, operation: &str) -> BuiltMaze {
        let built = self
            .generator
            .build(parse_grade(grade), parse_operation(operation), self.last_prefix.as_ref());
        if built.maze.origin == MazeOrigin::Fallback {
            web_sys::console::warn_1(&"numpath: using straight-line fallback maze".into());
        }
        self.remember(Some(built.prefix.clone()));
        built
    }

    fn remember(&mut self, prefix: Option<PathPrefix>) {
        if let Some(key) = &self.storage_key {
            storage::store_prefix(key, prefix.as_ref());
        }
        self.last_prefix = prefix;
    }
}

/// One question for the given grade and operation, as `{ text, answer }`
#[wasm_bindgen]
pub fn preview_question(grade: &str, operation: &str) -> Result<JsValue, JsValue> {
    let question = generate_question(
        parse_grade(grade),
        parse_operation(operation),
        SimpleRng::new(),
    );
    to_js(&question)
}

/// Operation ids accepted by `build`
#[wasm_bindgen]
pub fn operations() -> js_sys::Array {
    Operation::all().iter().map(|op| JsValue::from_str(op.id())).collect()
}

/// Grades accepted by `build`
#[wasm_bindgen]
pub fn grades() -> js_sys::Array {
    Grade::all().map(|g| JsValue::from(g.value())).collect()
}
