//! Map interaction session.
//!
//! A [`MapSession`] owns the selection state machine, the hover cursor, and
//! the location scorer. It turns map events into transitions, turns the
//! current selection into [`InferenceTicket`]s, and turns completed
//! [`InferenceOutcome`]s into user-facing [`Notice`]s, dropping outcomes that
//! belong to an earlier selection.

use log::{debug, warn};
use thiserror::Error;

use crate::{
    FeatureError, FeatureVector, InferenceKind, InferenceOutcome, InferenceReply,
    InferenceTicket, LocationScorer, MapEvent, MapEventKind, PopupView, Selection,
    SelectionMachine, SelectionState, Transition, build_feature_vector,
};

/// Pointer style requested from the map canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    /// The platform default cursor.
    #[default]
    Default,
    /// A pointing hand over clickable establishments.
    Pointer,
}

/// Errors returned when a request cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Predict or explain was requested with nothing selected.
    #[error("no establishment is selected")]
    NoSelection,
    /// The selection could not be turned into model input.
    #[error("cannot build features for the selected establishment: {0}")]
    InvalidFeatures(#[from] FeatureError),
}

/// Non-blocking message for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Prediction label, `"opened"` or `"closed"`.
    Prediction(&'static str),
    /// Explanation text, verbatim.
    Explanation(String),
    /// A failed request, described for the user.
    Failure(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prediction(label) => write!(f, "Prediction: {label}"),
            Self::Explanation(text) => write!(f, "Explanation: {text}"),
            Self::Failure(message) => f.write_str(message),
        }
    }
}

/// Interactive session over one map.
pub struct MapSession {
    selection: SelectionMachine,
    cursor: CursorStyle,
    scorer: Box<dyn LocationScorer>,
}

impl std::fmt::Debug for MapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("selection", &self.selection)
            .field("cursor", &self.cursor)
            .field("scorer", &"<dyn LocationScorer>")
            .finish()
    }
}

impl MapSession {
    /// Create an idle session scoring locations with `scorer`.
    pub fn new(scorer: impl LocationScorer + 'static) -> Self {
        Self {
            selection: SelectionMachine::new(),
            cursor: CursorStyle::Default,
            scorer: Box::new(scorer),
        }
    }

    /// Apply a map event.
    ///
    /// Hover events only touch the cursor; clicks go to the selection state
    /// machine.
    pub fn handle_event(&mut self, event: &MapEvent) -> Transition {
        match event.kind {
            MapEventKind::MouseEnter => {
                self.cursor = CursorStyle::Pointer;
                Transition::Unchanged
            }
            MapEventKind::MouseLeave => {
                self.cursor = CursorStyle::Default;
                Transition::Unchanged
            }
            MapEventKind::Click => self.selection.apply(event),
        }
    }

    /// Close the popup.
    pub fn dismiss(&mut self) -> Transition {
        self.selection.dismiss()
    }

    /// Current selection state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Current selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.selection()
    }

    /// Popup to render, if any.
    #[must_use]
    pub fn popup(&self) -> Option<&PopupView> {
        self.selection().map(Selection::popup)
    }

    /// Current cursor style.
    #[must_use]
    pub const fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Build the feature vector for the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NoSelection`] while idle and
    /// [`RequestError::InvalidFeatures`] when the selection cannot be encoded.
    pub fn features(&self) -> Result<FeatureVector, RequestError> {
        let Some(selection) = self.selection() else {
            warn!("feature vector requested with no establishment selected");
            return Err(RequestError::NoSelection);
        };
        Ok(build_feature_vector(
            selection.establishment(),
            self.scorer.as_ref(),
        )?)
    }

    /// Prepare a request of `kind` for the current selection.
    ///
    /// The session state is not modified; calling this repeatedly yields
    /// independent tickets.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NoSelection`] while idle, in which case no
    /// request must be sent, and [`RequestError::InvalidFeatures`] when the
    /// selection holds an unparseable score or date.
    pub fn request(&self, kind: InferenceKind) -> Result<InferenceTicket, RequestError> {
        let Some(selection) = self.selection() else {
            warn!("{kind} requested with no establishment selected");
            return Err(RequestError::NoSelection);
        };
        let features = build_feature_vector(selection.establishment(), self.scorer.as_ref())
            .map_err(|err| {
                warn!("{kind} rejected before sending: {err}");
                RequestError::from(err)
            })?;
        Ok(InferenceTicket {
            generation: selection.generation(),
            kind,
            features,
        })
    }

    /// Present a completed request.
    ///
    /// Returns `None` when the outcome was built for a selection that has
    /// since been replaced or cleared.
    pub fn resolve(&self, outcome: InferenceOutcome) -> Option<Notice> {
        let current = self.selection().map(Selection::generation);
        if current != Some(outcome.generation) {
            debug!(
                "discarding stale {} result from generation {}",
                outcome.kind, outcome.generation
            );
            return None;
        }
        Some(match outcome.result {
            Ok(InferenceReply::Prediction(prediction)) => {
                Notice::Prediction(prediction.status.label())
            }
            Ok(InferenceReply::Explanation(explanation)) => {
                Notice::Explanation(explanation.to_string())
            }
            Err(err) => {
                warn!("{} request failed: {err}", outcome.kind);
                Notice::Failure(format!("{} failed: {err}", outcome.kind))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedLocationScorer, background_click, click_on, point_feature};
    use crate::{Explanation, InferenceError, Prediction, ScreenPoint};
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn restaurant_click(name: &str) -> MapEvent {
        click_on(
            point_feature(
                -74.006,
                40.7128,
                [
                    ("name", json!(name)),
                    ("cuisine", json!("Pizza")),
                    ("critical_flag", json!("Critical")),
                    ("score", json!("13")),
                    ("inspection_date", json!("2023-02-16")),
                ],
            ),
            -74.0,
            ScreenPoint { x: 100.0, y: 80.0 },
        )
    }

    #[fixture]
    fn session() -> MapSession {
        MapSession::new(FixedLocationScorer::new(0.5))
    }

    /// Records warnings emitted by any test in this binary.
    struct WarningLog;

    static WARNINGS: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());
    static LOGGER: WarningLog = WarningLog;

    impl log::Log for WarningLog {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                WARNINGS
                    .lock()
                    .expect("warning log poisoned")
                    .push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn captured_warnings() -> Vec<String> {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Warn);
        }
        WARNINGS.lock().expect("warning log poisoned").clone()
    }

    #[rstest]
    fn features_while_idle_logs_the_precondition_failure(session: MapSession) {
        captured_warnings();

        assert_eq!(session.features(), Err(RequestError::NoSelection));
        assert!(
            captured_warnings()
                .iter()
                .any(|line| line == "feature vector requested with no establishment selected"),
            "missing precondition warning"
        );
    }

    #[rstest]
    fn request_while_idle_fails_without_ticket(session: MapSession) {
        assert_eq!(
            session.request(InferenceKind::Predict),
            Err(RequestError::NoSelection)
        );
    }

    #[rstest]
    fn request_carries_selection_generation(mut session: MapSession) {
        session.handle_event(&restaurant_click("Joe's"));

        let ticket = session
            .request(InferenceKind::Explain)
            .expect("ticket should build");

        assert_eq!(ticket.kind, InferenceKind::Explain);
        assert_eq!(
            Some(ticket.generation),
            session.selection().map(Selection::generation)
        );
        assert_eq!(ticket.features.critical_flag, 1);
        assert_eq!(ticket.features.location_score, 0.5);
    }

    #[rstest]
    fn repeated_requests_are_independent(mut session: MapSession) {
        session.handle_event(&restaurant_click("Joe's"));
        let before = session.state().clone();

        let first = session.request(InferenceKind::Predict).expect("first");
        let second = session.request(InferenceKind::Predict).expect("second");

        assert_eq!(first, second);
        assert_eq!(session.state(), &before);
    }

    #[rstest]
    fn request_rejects_unparseable_score(mut session: MapSession) {
        let event = click_on(
            point_feature(
                0.0,
                0.0,
                [("score", json!("n/a")), ("inspection_date", json!("2020-01-01"))],
            ),
            0.0,
            ScreenPoint::default(),
        );
        session.handle_event(&event);

        let err = session
            .request(InferenceKind::Predict)
            .expect_err("invalid score should be rejected");
        assert!(matches!(
            err,
            RequestError::InvalidFeatures(FeatureError::InvalidScore { .. })
        ));
    }

    #[rstest]
    fn resolve_presents_current_results(mut session: MapSession) {
        session.handle_event(&restaurant_click("Joe's"));
        let ticket = session.request(InferenceKind::Predict).expect("ticket");

        let notice = session.resolve(
            ticket.complete(Ok(InferenceReply::Prediction(Prediction::from_raw(1, None)))),
        );

        assert_eq!(notice, Some(Notice::Prediction("opened")));
    }

    #[rstest]
    fn resolve_drops_results_for_replaced_selection(mut session: MapSession) {
        session.handle_event(&restaurant_click("Joe's"));
        let ticket = session.request(InferenceKind::Explain).expect("ticket");
        session.handle_event(&restaurant_click("Luigi's"));

        let notice = session.resolve(
            ticket.complete(Ok(InferenceReply::Explanation(Explanation::new("stale")))),
        );

        assert_eq!(notice, None);
    }

    #[rstest]
    fn resolve_drops_results_after_clearing(mut session: MapSession) {
        session.handle_event(&restaurant_click("Joe's"));
        let ticket = session.request(InferenceKind::Predict).expect("ticket");
        session.handle_event(&background_click());

        let notice = session.resolve(
            ticket.complete(Ok(InferenceReply::Prediction(Prediction::from_raw(0, None)))),
        );

        assert_eq!(notice, None);
    }

    #[rstest]
    fn failures_become_notices_and_keep_selection(mut session: MapSession) {
        session.handle_event(&restaurant_click("Joe's"));
        let ticket = session.request(InferenceKind::Predict).expect("ticket");
        let before = session.state().clone();

        let notice = session.resolve(ticket.complete(Err(InferenceError::NetworkError {
            url: "http://localhost:8000/predict".into(),
            message: "connection refused".into(),
        })));

        assert!(matches!(notice, Some(Notice::Failure(message)) if message.starts_with("predict failed")));
        assert_eq!(session.state(), &before);
    }

    #[rstest]
    fn hover_switches_cursor_only(mut session: MapSession) {
        session.handle_event(&MapEvent::hover(MapEventKind::MouseEnter));
        assert_eq!(session.cursor(), CursorStyle::Pointer);
        assert!(session.popup().is_none());

        session.handle_event(&MapEvent::hover(MapEventKind::MouseLeave));
        assert_eq!(session.cursor(), CursorStyle::Default);
    }
}
