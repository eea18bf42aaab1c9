//! Recognition client tests against a local mock model server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use digitpad::{Digit, Error, Recognizer, RecognizerConfig};
use tiny_http::{Response, Server};

/// A canned model endpoint that counts the requests it receives.
struct MockModel {
    url: String,
    hits: Arc<AtomicUsize>,
}

fn spawn_model(status: u16, body: String, delay: Duration) -> MockModel {
    let server = Server::http("127.0.0.1:0").unwrap();
    let url = format!("http://{}", server.server_addr());
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_server = hits.clone();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            hits_in_server.fetch_add(1, Ordering::SeqCst);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            let response = Response::from_string(body.clone()).with_status_code(status);
            let _ = request.respond(response);
        }
    });

    MockModel { url, hits }
}

/// A well-formed generateContent reply carrying `text` as the answer.
fn candidate_json(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string()
}

fn recognizer_for(url: &str) -> Recognizer {
    Recognizer::new(RecognizerConfig {
        endpoint: url.to_string(),
        model: "test-model".to_string(),
        api_key: "test-key".to_string(),
        timeout_ms: 5000,
    })
    .expect("recognizer")
}

const IMAGE: &str = "data:image/png;base64,aGVsbG8=";

#[test]
fn recognizes_a_digit_answer() {
    let mock = spawn_model(200, candidate_json("7"), Duration::ZERO);
    let recognizer = recognizer_for(&mock.url);

    let digit = recognizer.recognize(IMAGE).expect("recognize");
    assert_eq!(digit, Digit::Recognized('7'));
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn whitespace_around_the_answer_is_trimmed() {
    let mock = spawn_model(200, candidate_json("\n 4 "), Duration::ZERO);
    let recognizer = recognizer_for(&mock.url);
    assert_eq!(recognizer.recognize(IMAGE).unwrap(), Digit::Recognized('4'));
}

#[test]
fn junk_answers_coerce_to_the_sentinel() {
    for junk in ["abc", "", " ", "42"] {
        let mock = spawn_model(200, candidate_json(junk), Duration::ZERO);
        let recognizer = recognizer_for(&mock.url);
        assert_eq!(
            recognizer.recognize(IMAGE).unwrap(),
            Digit::Unrecognized,
            "answer {:?}",
            junk
        );
    }
}

#[test]
fn explicit_sentinel_is_a_valid_result() {
    let mock = spawn_model(200, candidate_json("?"), Duration::ZERO);
    let recognizer = recognizer_for(&mock.url);
    assert_eq!(recognizer.recognize(IMAGE).unwrap(), Digit::Unrecognized);
}

#[test]
fn missing_candidates_degrade_to_the_sentinel() {
    let mock = spawn_model(200, "{}".to_string(), Duration::ZERO);
    let recognizer = recognizer_for(&mock.url);
    assert_eq!(recognizer.recognize(IMAGE).unwrap(), Digit::Unrecognized);
}

#[test]
fn service_error_status_is_reported_opaquely() {
    let mock = spawn_model(500, "internal".to_string(), Duration::ZERO);
    let recognizer = recognizer_for(&mock.url);
    let err = recognizer.recognize(IMAGE).unwrap_err();
    assert!(matches!(err, Error::RecognitionFailed));
    // The user-visible message carries no transport detail.
    assert_eq!(
        err.to_string(),
        "An error occurred while communicating with the AI service."
    );
}

#[test]
fn transport_failure_is_reported_opaquely() {
    // Nothing listens here.
    let recognizer = recognizer_for("http://127.0.0.1:9");
    let err = recognizer.recognize(IMAGE).unwrap_err();
    assert!(matches!(err, Error::RecognitionFailed));
}

#[test]
fn malformed_image_makes_no_model_call() {
    let mock = spawn_model(200, candidate_json("7"), Duration::ZERO);
    let recognizer = recognizer_for(&mock.url);

    let err = recognizer.recognize("not a data url").unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
    assert_eq!(mock.hits.load(Ordering::SeqCst), 0);
}
