//! End-to-end tests of the interaction policy: empty-canvas short circuit,
//! single outstanding request, and display-state handling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use digitpad::{Digit, PadConfig, RecognizerConfig, Session};
use tiny_http::{Response, Server};

struct MockModel {
    url: String,
    hits: Arc<AtomicUsize>,
}

fn spawn_model(answer: &str, delay: Duration) -> MockModel {
    let body = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": answer }] } }]
    })
    .to_string();

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
            let _ = request.respond(Response::from_string(body.clone()));
        }
    });

    MockModel { url, hits }
}

fn session_for(url: &str) -> Session {
    let pad = PadConfig {
        width: 64,
        height: 64,
        stroke_width: 8,
        ..Default::default()
    };
    let recognizer = RecognizerConfig {
        endpoint: url.to_string(),
        model: "test-model".to_string(),
        api_key: "test-key".to_string(),
        timeout_ms: 5000,
    };
    Session::new(&pad, recognizer).expect("session")
}

fn draw_something(session: &mut Session) {
    session.canvas_mut().pointer_down(20.0, 20.0);
    session.canvas_mut().pointer_moved(40.0, 44.0);
    session.canvas_mut().pointer_up();
    assert!(!session.canvas().is_blank());
}

/// Poll until the in-flight request resolves.
fn pump(session: &mut Session, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while session.is_waiting() {
        assert!(Instant::now() < deadline, "timed out waiting for recognition");
        session.poll();
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn blank_canvas_is_reported_inline_without_a_model_call() {
    let mock = spawn_model("7", Duration::ZERO);
    let mut session = session_for(&mock.url);

    session.recognize();

    assert!(!session.is_waiting());
    assert_eq!(
        session.error(),
        Some("Canvas is empty. Please draw a digit first.")
    );
    assert!(session.result().is_none());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 0);
}

#[test]
fn a_drawn_digit_round_trips_to_the_display() {
    let mock = spawn_model("7", Duration::ZERO);
    let mut session = session_for(&mock.url);
    draw_something(&mut session);

    session.recognize();
    assert!(session.is_waiting());
    pump(&mut session, Duration::from_secs(5));

    assert_eq!(session.result(), Some(Digit::Recognized('7')));
    assert!(session.error().is_none());
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn retriggering_while_waiting_issues_no_second_call() {
    let mock = spawn_model("7", Duration::from_millis(300));
    let mut session = session_for(&mock.url);
    draw_something(&mut session);

    session.recognize();
    assert!(session.is_waiting());
    // The control is disabled while a request is outstanding; extra
    // triggers must not reach the model.
    session.recognize();
    session.recognize();

    pump(&mut session, Duration::from_secs(5));
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
    assert_eq!(session.result(), Some(Digit::Recognized('7')));
}

#[test]
fn inline_failure_clears_a_previous_result() {
    let mock = spawn_model("7", Duration::ZERO);
    let mut session = session_for(&mock.url);
    draw_something(&mut session);

    session.recognize();
    pump(&mut session, Duration::from_secs(5));
    assert_eq!(session.result(), Some(Digit::Recognized('7')));

    // Wipe the raster only, then trigger again: the inline error must not
    // leave the old digit displayed next to it.
    session.canvas_mut().clear();
    session.recognize();

    assert_eq!(
        session.error(),
        Some("Canvas is empty. Please draw a digit first.")
    );
    assert!(session.result().is_none());
}

#[test]
fn clear_does_not_cancel_an_in_flight_request() {
    let mock = spawn_model("5", Duration::from_millis(300));
    let mut session = session_for(&mock.url);
    draw_something(&mut session);

    session.recognize();
    assert!(session.is_waiting());

    // Clearing affects the raster and the display only; the pending reply
    // still arrives and is shown afterwards.
    session.clear();
    assert!(session.canvas().is_blank());
    assert!(session.is_waiting());

    pump(&mut session, Duration::from_secs(5));
    assert_eq!(session.result(), Some(Digit::Recognized('5')));
}

#[test]
fn transport_failure_surfaces_the_generic_message() {
    let mut session = session_for("http://127.0.0.1:9");
    draw_something(&mut session);

    session.recognize();
    pump(&mut session, Duration::from_secs(10));

    assert_eq!(
        session.error(),
        Some("An error occurred while communicating with the AI service.")
    );
    assert!(session.result().is_none());
}

#[test]
fn sentinel_answers_display_like_results_not_errors() {
    let mock = spawn_model("?", Duration::ZERO);
    let mut session = session_for(&mock.url);
    draw_something(&mut session);

    session.recognize();
    pump(&mut session, Duration::from_secs(5));

    assert_eq!(session.result(), Some(Digit::Unrecognized));
    assert!(session.error().is_none());
}
