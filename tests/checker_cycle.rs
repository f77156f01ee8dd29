// tests/checker_cycle.rs
//
// Poll-cycle behaviour with in-memory source/notifier fakes (no sockets).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use vaccine_checker::search::decode_feature_collection;
use vaccine_checker::{
    Checker, CheckerConfig, FetchError, NearbySite, Notifier, NotifyError, NotifyOutcome, Point,
    SearchResult, SiteSource,
};

const FIXTURE: &str = include_str!("fixtures/sites.json");

fn home() -> Point {
    Point::new(-71.0589, 42.3601)
}

fn fixture() -> SearchResult {
    decode_feature_collection(FIXTURE).expect("fixture decodes")
}

/// Hands out queued responses in order.
struct QueuedSource {
    queue: Mutex<VecDeque<Result<SearchResult, FetchError>>>,
}

impl QueuedSource {
    fn new(responses: Vec<Result<SearchResult, FetchError>>) -> Self {
        Self {
            queue: Mutex::new(responses.into()),
        }
    }
}

#[async_trait::async_trait]
impl SiteSource for QueuedSource {
    async fn fetch(&self) -> Result<SearchResult, FetchError> {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("queue exhausted".into())))
    }

    fn name(&self) -> &'static str {
        "queued"
    }
}

/// Records the ids of every batch it is asked to send.
#[derive(Clone, Default)]
struct RecordingNotifier {
    calls: Arc<Mutex<Vec<Vec<Option<i64>>>>>,
    fail_with: Option<NotifyError>,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, new_sites: &[NearbySite]) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push(new_sites.iter().map(NearbySite::id).collect());
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

fn checker(
    responses: Vec<Result<SearchResult, FetchError>>,
    notifier: RecordingNotifier,
    silent: bool,
) -> Checker {
    let cfg = CheckerConfig {
        location: home(),
        radius_m: 10_000.0,
        include_second_dose_only: false,
        silent,
    };
    Checker::new(
        cfg,
        Box::new(QueuedSource::new(responses)),
        Box::new(notifier),
    )
}

fn ids(sites: &[NearbySite]) -> Vec<Option<i64>> {
    sites.iter().map(NearbySite::id).collect()
}

#[tokio::test]
async fn fixture_cycle_finds_one_of_two_available_from_three() {
    let notifier = RecordingNotifier::default();
    let mut c = checker(vec![Ok(fixture())], notifier.clone(), false);

    let report = c.check().await.expect("cycle ok");
    assert_eq!(report.found, 1);
    assert_eq!(report.available, 2);
    assert_eq!(report.total, 3);
    assert_eq!(report.new, 1);
    assert_eq!(report.notification, NotifyOutcome::Sent);

    assert_eq!(*notifier.calls.lock().unwrap(), vec![vec![Some(1001)]]);
    assert_eq!(ids(c.last_found()), vec![Some(1001)]);
}

#[tokio::test]
async fn identical_second_cycle_does_not_notify() {
    let notifier = RecordingNotifier::default();
    let mut c = checker(vec![Ok(fixture()), Ok(fixture())], notifier.clone(), false);

    c.check().await.unwrap();
    let second = c.check().await.unwrap();

    assert_eq!(second.found, 1);
    assert_eq!(second.new, 0);
    assert_eq!(second.notification, NotifyOutcome::NothingNew);
    assert_eq!(notifier.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn only_newly_appeared_sites_are_sent() {
    let mut grown = fixture();
    let mut extra = grown.sites[0].clone();
    extra.id = Some(2002);
    extra.point = Some(Point::new(-71.0995, 42.3751));
    grown.sites.push(extra);

    let notifier = RecordingNotifier::default();
    let mut c = checker(vec![Ok(fixture()), Ok(grown)], notifier.clone(), false);

    c.check().await.unwrap();
    let second = c.check().await.unwrap();

    assert_eq!(second.found, 2);
    assert_eq!(second.new, 1);
    assert_eq!(
        *notifier.calls.lock().unwrap(),
        vec![vec![Some(1001)], vec![Some(2002)]]
    );
}

#[tokio::test]
async fn id_less_sites_are_re_sent_every_cycle() {
    let mut anonymous = fixture();
    anonymous.sites[0].id = None;

    let notifier = RecordingNotifier::default();
    let mut c = checker(
        vec![Ok(anonymous.clone()), Ok(anonymous)],
        notifier.clone(),
        false,
    );

    c.check().await.unwrap();
    let second = c.check().await.unwrap();

    assert_eq!(second.new, 1);
    assert_eq!(notifier.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn silent_never_calls_notifier() {
    let notifier = RecordingNotifier::default();
    let mut c = checker(vec![Ok(fixture())], notifier.clone(), true);

    let report = c.check().await.expect("silent cycle is not an error");
    assert_eq!(report.new, 1);
    assert_eq!(report.notification, NotifyOutcome::Silent);
    assert!(notifier.calls.lock().unwrap().is_empty());
    assert_eq!(ids(c.last_found()), vec![Some(1001)]);
}

#[tokio::test]
async fn failed_notification_still_rolls_state_forward() {
    let notifier = RecordingNotifier {
        fail_with: Some(NotifyError::Status(500)),
        ..RecordingNotifier::default()
    };
    let mut c = checker(vec![Ok(fixture()), Ok(fixture())], notifier.clone(), false);

    let first = c.check().await.expect("notify failure is not a cycle failure");
    assert_eq!(
        first.notification,
        NotifyOutcome::Failed(NotifyError::Status(500))
    );
    assert_eq!(ids(c.last_found()), vec![Some(1001)]);

    // Baseline moved on, so the same site is not retried.
    let second = c.check().await.unwrap();
    assert_eq!(second.notification, NotifyOutcome::NothingNew);
    assert_eq!(notifier.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn fetch_error_aborts_cycle_and_keeps_previous_set() {
    let notifier = RecordingNotifier::default();
    let mut c = checker(
        vec![
            Ok(fixture()),
            Err(FetchError::Status(503)),
            Ok(fixture()),
        ],
        notifier.clone(),
        false,
    );

    c.check().await.unwrap();
    let err = c.check().await.unwrap_err();
    assert_eq!(err, FetchError::Status(503));
    assert_eq!(ids(c.last_found()), vec![Some(1001)]);

    // Still deduped against the cycle before the failure.
    let third = c.check().await.unwrap();
    assert_eq!(third.notification, NotifyOutcome::NothingNew);
    assert_eq!(notifier.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_result_clears_baseline() {
    let notifier = RecordingNotifier::default();
    let mut c = checker(
        vec![Ok(fixture()), Ok(SearchResult::default()), Ok(fixture())],
        notifier.clone(),
        false,
    );

    c.check().await.unwrap();
    let empty = c.check().await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(c.last_found().is_empty());

    // Reappearing after a gap counts as new again.
    let again = c.check().await.unwrap();
    assert_eq!(again.new, 1);
    assert_eq!(notifier.calls.lock().unwrap().len(), 2);
}
