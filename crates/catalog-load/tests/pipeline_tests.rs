//! Integration tests for the streaming pipeline
//!
//! These tests validate:
//! - Every record lands in exactly one log
//! - Identifier/locator precedence
//! - Record counting
//! - Pause/resume ordering around routing
//! - Completion on end of stream and on decode failure

use async_trait::async_trait;
use catalog_common::types::WorkRecord;
use catalog_load::config::LoadConfig;
use catalog_load::context::{LoadOptions, PipelineContext};
use catalog_load::error::{LoadError, Result};
use catalog_load::pipeline::{FlowState, Pipeline};
use catalog_load::sink::{FileSink, RecordSink};
use catalog_load::source::{NdjsonSource, RecordSource};
use serde_json::json;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

type Events = Arc<Mutex<Vec<String>>>;

/// Source that replays scripted results and records flow-control calls
struct ScriptedSource {
    items: VecDeque<Result<WorkRecord>>,
    paused: bool,
    events: Events,
}

impl ScriptedSource {
    fn new(items: Vec<Result<WorkRecord>>, events: Events) -> Self {
        Self {
            items: items.into(),
            paused: false,
            events,
        }
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn next_record(&mut self) -> Result<Option<WorkRecord>> {
        assert!(!self.paused, "record delivered while paused");

        match self.items.pop_front() {
            Some(Ok(record)) => {
                self.events.lock().unwrap().push("deliver".to_string());
                Ok(Some(record))
            },
            Some(Err(e)) => {
                self.events.lock().unwrap().push("fail".to_string());
                Err(e)
            },
            None => {
                self.events.lock().unwrap().push("end".to_string());
                Ok(None)
            },
        }
    }

    fn pause(&mut self) {
        self.paused = true;
        self.events.lock().unwrap().push("pause".to_string());
    }

    fn resume(&mut self) {
        self.paused = false;
        self.events.lock().unwrap().push("resume".to_string());
    }
}

/// Sink that records each append into the shared event log
struct RecordingSink {
    name: &'static str,
    events: Events,
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn append(&mut self, record: &WorkRecord) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("{} {}", self.name, record.raw()));
        Ok(())
    }
}

fn recording_pipeline(events: &Events) -> Pipeline<RecordingSink> {
    Pipeline::new(
        RecordingSink {
            name: "output",
            events: events.clone(),
        },
        RecordingSink {
            name: "errors",
            events: events.clone(),
        },
        PipelineContext::default(),
        LoadOptions::default(),
    )
}

fn file_pipeline(dir: &Path) -> Pipeline<FileSink> {
    Pipeline::new(
        FileSink::new(dir.join("output.json")),
        FileSink::new(dir.join("errors.json")),
        PipelineContext::default(),
        LoadOptions::default(),
    )
}

fn identified(uri: &str) -> String {
    json!({"annotations": [{"propertyName": "identifier", "identifierLink": uri}]}).to_string()
}

fn located(uri: &str) -> String {
    json!({"annotations": [{"propertyName": "locator", "locatorLink": uri}]}).to_string()
}

fn read_lines(path: &Path) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_every_record_written_exactly_once() {
    for n in [0usize, 1, 2, 7, 50] {
        let dir = tempfile::tempdir().unwrap();
        let lines: Vec<String> = (0..n)
            .map(|i| match i % 3 {
                0 => identified(&format!("urn:work:{}", i)),
                1 => located(&format!("http://example.org/{}", i)),
                _ => json!({"annotations": [], "n": i}).to_string(),
            })
            .collect();
        let input = lines.iter().map(|l| format!("{}\n", l)).collect::<String>();

        let mut pipeline = file_pipeline(dir.path());
        let summary = pipeline
            .run(NdjsonSource::new(input.as_bytes()))
            .await
            .unwrap();

        let output = read_lines(&dir.path().join("output.json"));
        let errors = read_lines(&dir.path().join("errors.json"));

        assert_eq!(summary.records, n as u64);
        assert_eq!(output.len() + errors.len(), n);
        assert_eq!(summary.accepted as usize, output.len());
        assert_eq!(summary.rejected as usize, errors.len());

        let mut written: Vec<String> = output.into_iter().chain(errors).collect();
        let mut expected = lines.clone();
        written.sort();
        expected.sort();
        assert_eq!(written, expected);
    }
}

#[tokio::test]
async fn test_identifier_wins_over_locator() {
    let line = json!({
        "annotations": [
            {"propertyName": "locator", "locatorLink": "Y"},
            {"propertyName": "identifier", "identifierLink": "X"}
        ]
    })
    .to_string();

    let events: Events = Arc::default();
    let mut pipeline = recording_pipeline(&events);
    let record = WorkRecord::from_json(line.clone()).unwrap();
    pipeline
        .run(ScriptedSource::new(vec![Ok(record)], events.clone()))
        .await
        .unwrap();

    assert!(events
        .lock()
        .unwrap()
        .contains(&format!("output {}", line)));
}

#[tokio::test]
async fn test_missing_annotations_go_to_error_log() {
    let dir = tempfile::tempdir().unwrap();
    let input = format!(
        "{}\n{}\n{}\n",
        json!({"annotations": []}),
        json!({"title": "no annotations"}),
        located("Y"),
    );

    let mut pipeline = file_pipeline(dir.path());
    let summary = pipeline
        .run(NdjsonSource::new(input.as_bytes()))
        .await
        .unwrap();

    assert_eq!((summary.accepted, summary.rejected), (1, 2));
    assert_eq!(
        read_lines(&dir.path().join("errors.json")),
        vec![
            r#"{"annotations":[]}"#.to_string(),
            r#"{"title":"no annotations"}"#.to_string()
        ]
    );
    assert_eq!(read_lines(&dir.path().join("output.json")), vec![located("Y")]);
}

#[tokio::test]
async fn test_raw_json_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let line = r#"{ "annotations" : [ {"propertyName":"identifier", "identifierLink":"urn:x"} ], "zeta": 1.50, "alpha": null }"#;

    let mut pipeline = file_pipeline(dir.path());
    pipeline
        .run(NdjsonSource::new(format!("{}\n", line).as_bytes()))
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("output.json")).unwrap(),
        format!("{}\n", line)
    );
}

// ============================================================================
// Flow control
// ============================================================================

#[tokio::test]
async fn test_pause_brackets_routing() {
    let events: Events = Arc::default();
    let records = vec![
        Ok(WorkRecord::from_json(identified("urn:1")).unwrap()),
        Ok(WorkRecord::from_json(r#"{"annotations":[]}"#).unwrap()),
    ];

    let mut pipeline = recording_pipeline(&events);
    let summary = pipeline
        .run(ScriptedSource::new(records, events.clone()))
        .await
        .unwrap();

    assert_eq!(summary.records, 2);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "deliver".to_string(),
            "pause".to_string(),
            format!("output {}", identified("urn:1")),
            "resume".to_string(),
            "deliver".to_string(),
            "pause".to_string(),
            r#"errors {"annotations":[]}"#.to_string(),
            "resume".to_string(),
            "end".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_state_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = file_pipeline(dir.path());
    assert_eq!(pipeline.state(), FlowState::Idle);

    let input = format!("{}\n", identified("urn:1"));
    pipeline
        .run(NdjsonSource::new(input.as_bytes()))
        .await
        .unwrap();
    assert_eq!(pipeline.state(), FlowState::Completed);
}

// ============================================================================
// Completion
// ============================================================================

#[tokio::test]
async fn test_empty_stream_completes() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = file_pipeline(dir.path());

    let summary = pipeline.run(NdjsonSource::new(&b""[..])).await.unwrap();

    assert_eq!(summary.records, 0);
    assert!(!dir.path().join("output.json").exists());
    assert!(!dir.path().join("errors.json").exists());
}

#[tokio::test]
async fn test_decode_error_after_records_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = format!(
        "{}\n{}\n{}\nnot json\n{}\n",
        identified("urn:1"),
        json!({"annotations": []}),
        located("http://example.org/3"),
        identified("urn:never"),
    );

    let mut pipeline = file_pipeline(dir.path());
    let err = pipeline
        .run(NdjsonSource::new(input.as_bytes()))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Decode { line: 4, .. }));
    assert_eq!(pipeline.state(), FlowState::Failed);

    // Everything before the bad line is already on disk
    assert_eq!(
        read_lines(&dir.path().join("output.json")),
        vec![identified("urn:1"), located("http://example.org/3")]
    );
    assert_eq!(
        read_lines(&dir.path().join("errors.json")),
        vec![r#"{"annotations":[]}"#.to_string()]
    );
}

#[tokio::test]
async fn test_sink_failure_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let mut pipeline = file_pipeline(&missing);

    let input = format!("{}\n", identified("urn:1"));
    let err = pipeline
        .run(NdjsonSource::new(input.as_bytes()))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Sink { .. }));
    assert_eq!(pipeline.state(), FlowState::Failed);
}

#[tokio::test]
async fn test_run_resolves_only_once() {
    let events: Events = Arc::default();
    let mut pipeline = recording_pipeline(&events);

    pipeline
        .run(ScriptedSource::new(Vec::new(), events.clone()))
        .await
        .unwrap();
    let calls = events.lock().unwrap().len();

    let second = pipeline
        .run(ScriptedSource::new(Vec::new(), events.clone()))
        .await;

    assert!(matches!(second, Err(LoadError::AlreadyStarted(FlowState::Completed))));
    assert_eq!(events.lock().unwrap().len(), calls);
}

#[tokio::test]
async fn test_scripted_failure_surfaces_error() {
    let events: Events = Arc::default();
    let decode_error = LoadError::Decode {
        line: 2,
        source: WorkRecord::from_json("{").unwrap_err(),
    };
    let records = vec![
        Ok(WorkRecord::from_json(identified("urn:1")).unwrap()),
        Err(decode_error),
    ];

    let mut pipeline = recording_pipeline(&events);
    let result = pipeline
        .run(ScriptedSource::new(records, events.clone()))
        .await;

    assert!(result.is_err());
    assert_eq!(
        events.lock().unwrap().last().map(String::as_str),
        Some("fail")
    );
}

#[tokio::test]
async fn test_datapackage_pipeline_uses_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoadConfig {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let (mut pipeline, artifacts) =
        Pipeline::datapackage(&config, PipelineContext::default(), LoadOptions::default());
    let input = format!("{}\n", identified("urn:1"));
    pipeline
        .run(NdjsonSource::new(input.as_bytes()))
        .await
        .unwrap();

    assert!(artifacts.output_path.starts_with(dir.path()));
    assert_eq!(read_lines(&artifacts.output_path), vec![identified("urn:1")]);
    assert!(!artifacts.error_path.exists());
}
