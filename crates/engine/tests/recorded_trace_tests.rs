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

use std::io::Write;

use stepview_common::TraceStep;
use stepview_engine::{RecordedTrace, ReversibleEngine, TraceError};

const TRACE_JSON: &str = r#"{
    "steps": [
        { "line": 1, "scope": { "x": 1 } },
        { "line": 2, "scope": { "x": 1, "y": 2 } },
        { "line": 3 }
    ]
}"#;

#[test]
fn test_from_json() {
    let mut engine = RecordedTrace::from_json(TRACE_JSON).unwrap();
    assert_eq!(engine.len(), 3);

    assert!(engine.step());
    assert!(engine.step());
    assert_eq!(engine.line(), Some(2));
    let scope = engine.scope().unwrap();
    assert_eq!(scope.get("y"), Some(&serde_json::json!(2)));
}

#[test]
fn test_from_path() -> eyre::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(TRACE_JSON.as_bytes())?;

    let engine = RecordedTrace::from_path(file.path())?;
    assert_eq!(engine.steps()[2], TraceStep::at(3));
    Ok(())
}

#[test]
fn test_missing_file_reports_path() {
    let err = RecordedTrace::from_path("/definitely/not/here.json").unwrap_err();
    match err {
        TraceError::Io { path, .. } => assert!(path.ends_with("here.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_json() {
    let err = RecordedTrace::from_json("{ \"steps\": [ { \"line\": \"one\" } ] }").unwrap_err();
    assert!(matches!(err, TraceError::Json(_)));
}

#[test]
fn test_validation_against_source() {
    let source = "a = 1\nb = 2\n";
    let steps = vec![TraceStep::at(1), TraceStep::at(2)];
    assert!(RecordedTrace::for_source(steps, source).is_ok());

    let err = RecordedTrace::for_source(vec![TraceStep::at(1), TraceStep::at(3)], source)
        .unwrap_err();
    assert!(matches!(err, TraceError::LineOutOfRange { index: 1, line: 3, line_count: 2 }));

    let err = RecordedTrace::for_source(vec![TraceStep::at(0)], source).unwrap_err();
    assert!(matches!(err, TraceError::ZeroLine { index: 0 }));
}

#[test]
fn test_engine_through_mut_reference() {
    fn drain(mut engine: impl ReversibleEngine) -> Vec<usize> {
        let mut lines = Vec::new();
        while engine.step() {
            lines.extend(engine.line());
        }
        lines
    }

    let mut engine = RecordedTrace::from_json(TRACE_JSON).unwrap();
    assert_eq!(drain(&mut engine), vec![1, 2, 3]);
    // The borrowed engine was advanced in place
    assert!(!engine.step());
}
