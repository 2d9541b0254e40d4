// StepView - Step-through Execution Viewer
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Variable bindings visible at a stopped execution position.
///
/// Names are kept sorted so every consumer lists variables in the same order.
pub type Scope = BTreeMap<String, Value>;

/// A single recorded execution position: the raw source line and the scope at that line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// 1-based line number across the whole concatenated source
    pub line: usize,
    /// Variable bindings when execution reached `line`
    #[serde(default)]
    pub scope: Scope,
}

impl TraceStep {
    /// Create a step at `line` with the given bindings
    pub fn new(line: usize, scope: Scope) -> Self {
        Self { line, scope }
    }

    /// Create a step at `line` with no bindings
    pub fn at(line: usize) -> Self {
        Self { line, scope: Scope::new() }
    }

    /// Builder-style helper to add one binding
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.scope.insert(name.into(), value.into());
        self
    }
}

/// Render a scope value the way a learner expects to read it (strings without quotes)
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "undefined".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_step_deserializes_without_scope() {
        let step: TraceStep = serde_json::from_value(json!({ "line": 4 })).unwrap();
        assert_eq!(step, TraceStep::at(4));
    }

    #[test]
    fn test_trace_step_builder() {
        let step = TraceStep::at(2).with("x", 1).with("name", "bob");
        assert_eq!(step.scope.get("x"), Some(&json!(1)));
        assert_eq!(step.scope.keys().collect::<Vec<_>>(), vec!["name", "x"]);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("hi")), "hi");
        assert_eq!(display_value(&json!([1, 2])), "[1,2]");
        assert_eq!(display_value(&Value::Null), "undefined");
    }
}
