use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Context;
use cucumber::{gherkin::Step, given, then, when, World as _};
use tempfile::TempDir;
use tugboat::{
    error::AppError,
    export,
    filter::{self, StatusFilter},
    models::{form::TripForm, invoice::InvoiceUpload, trip::Trip},
    services::{
        invoices::InvoiceStore, storage::JsonTripStore, trips::TripRepository, verification,
    },
};

#[derive(Debug, cucumber::World, Default)]
struct TripWorld {
    state: Option<TestState>,
    form: TripForm,
    last_error: Option<AppError>,
}

impl TripWorld {
    fn state(&mut self) -> &mut TestState {
        self.state
            .as_mut()
            .expect("trip log must be initialised first")
    }
}

struct TestState {
    repo: TripRepository,
    invoices: InvoiceStore,
    slot: PathBuf,
    quota: Option<usize>,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState")
            .field("trips", &self.repo.len())
            .finish()
    }
}

impl TestState {
    async fn new(quota: Option<usize>) -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let slot = root.path().join("tugboat_trips.json");
        let invoices = InvoiceStore::new(root.path().join("invoices"));
        invoices.ensure_structure().await?;
        let repo = TripRepository::open(Arc::new(JsonTripStore::new(slot.clone(), quota))).await;
        Ok(Self {
            repo,
            invoices,
            slot,
            quota,
            _root: root,
        })
    }

    async fn reload(&mut self) {
        let store = JsonTripStore::new(self.slot.clone(), self.quota);
        self.repo = TripRepository::open(Arc::new(store)).await;
    }
}

fn parse_filter(raw: &str) -> StatusFilter {
    raw.parse().expect("valid status filter")
}

fn contractors(trips: Vec<&Trip>) -> Vec<String> {
    trips.into_iter().map(|t| t.contractor.clone()).collect()
}

#[given("an empty trip log")]
async fn given_empty_log(world: &mut TripWorld) {
    world.state = Some(TestState::new(None).await.expect("state"));
}

#[given(regex = r"^an empty trip log limited to (\d+) bytes$")]
async fn given_limited_log(world: &mut TripWorld, quota: usize) {
    world.state = Some(TestState::new(Some(quota)).await.expect("state"));
}

#[given(regex = r#"^the trip slot contains "([^"]*)"$"#)]
async fn given_slot_contents(world: &mut TripWorld, contents: String) {
    let slot = world.state().slot.clone();
    tokio::fs::write(&slot, contents).await.expect("write slot");
}

#[when(regex = r#"^I fill in "([^"]+)" with "([^"]*)"$"#)]
async fn when_fill_field(world: &mut TripWorld, name: String, value: String) {
    world.form.set_field(&name, value);
}

#[when(regex = r#"^I attach the invoice "([^"]+)" of type "([^"]+)" containing "([^"]*)"$"#)]
async fn when_attach_invoice(
    world: &mut TripWorld,
    file_name: String,
    content_type: String,
    body: String,
) {
    world
        .form
        .attach(InvoiceUpload::new(file_name, content_type, body.into_bytes()));
}

#[when("I submit the trip form")]
async fn when_submit_form(world: &mut TripWorld) {
    submit_form(world).await;
}

#[when(regex = r#"^I log a trip for "([^"]+)"$"#)]
async fn when_log_trip(world: &mut TripWorld, contractor: String) {
    fill_trip(world, &contractor);
    submit_form(world).await;
}

#[when(regex = r#"^I log a trip for "([^"]+)" with an invoice$"#)]
async fn when_log_trip_with_invoice(world: &mut TripWorld, contractor: String) {
    fill_trip(world, &contractor);
    world.form.attach(InvoiceUpload::new(
        format!("{contractor}.pdf"),
        "application/pdf",
        format!("%PDF invoice for {contractor}").into_bytes(),
    ));
    submit_form(world).await;
}

#[when(regex = r"^I (approve|reject) the invoice of trip (\d+)$")]
async fn when_decide(world: &mut TripWorld, decision: String, index: usize) {
    let approved = decision == "approve";
    let outcome = verification::verify(&mut world.state().repo, index, approved).await;
    world.last_error = outcome.err();
}

#[when("I reload the trip log")]
async fn when_reload(world: &mut TripWorld) {
    world.state().reload().await;
}

#[then(regex = r"^the trip log holds (\d+) trips?$")]
async fn then_trip_count(world: &mut TripWorld, expected: usize) {
    assert_eq!(world.state().repo.len(), expected);
}

#[then("the trip form is blank")]
async fn then_form_blank(world: &mut TripWorld) {
    assert_eq!(world.form, TripForm::default());
}

#[then(regex = r#"^trip (\d+) has status "([^"]+)"$"#)]
async fn then_trip_status(world: &mut TripWorld, index: usize, status: String) {
    let trip = world.state().repo.get(index).expect("trip exists");
    assert_eq!(trip.status().as_str(), status);
    assert_eq!(trip.invoice_status().as_str(), status);
}

#[then(regex = r#"^the invoice of trip (\d+) reads "([^"]*)"$"#)]
async fn then_invoice_contents(world: &mut TripWorld, index: usize, expected: String) {
    let state = world.state();
    let invoice = state
        .repo
        .get(index)
        .expect("trip exists")
        .invoice
        .clone()
        .expect("trip has an invoice");
    let bytes = state.invoices.read(&invoice).await.expect("read invoice");
    assert_eq!(String::from_utf8(bytes).expect("utf8"), expected);
}

#[then(regex = r#"^the last decision failed because (.+)$"#)]
async fn then_last_error(world: &mut TripWorld, reason: String) {
    let err = world.last_error.as_ref().expect("an error was recorded");
    let matched = match reason.as_str() {
        "it was already verified" => matches!(err, AppError::AlreadyVerified { .. }),
        "there is no invoice" => matches!(err, AppError::MissingInvoice { .. }),
        "the trip does not exist" => matches!(err, AppError::IndexOutOfBounds { .. }),
        other => panic!("unknown failure reason: {other}"),
    };
    assert!(matched, "unexpected error: {err}");
}

#[then(regex = r#"^filtering by "([^"]+)" lists "([^"]*)"$"#)]
async fn then_filter_lists(world: &mut TripWorld, status: String, expected: String) {
    let selected = parse_filter(&status);
    let expected: Vec<String> = expected
        .split(", ")
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    let trips = world.state().repo.all();
    assert_eq!(contractors(filter::filter(trips, selected)), expected);
}

#[then(regex = r#"^exporting "([^"]+)" trips produces:$"#)]
async fn then_export_produces(world: &mut TripWorld, status: String, step: &Step) {
    let selected = parse_filter(&status);
    let expected = step
        .docstring
        .as_deref()
        .expect("docstring")
        .trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    let csv = export::to_csv(filter::filter(world.state().repo.all(), selected)).expect("csv");
    assert_eq!(csv, expected);
}

#[then("the trip log warns that it could not save")]
async fn then_save_warning(world: &mut TripWorld) {
    let warning = world.state().repo.save_warning().map(str::to_string);
    assert!(
        warning.as_deref().is_some_and(|w| w.contains("storage full")),
        "expected a storage warning, got {warning:?}"
    );
}

fn fill_trip(world: &mut TripWorld, contractor: &str) {
    world.form.set_field("contractor", contractor);
    world.form.set_field("date", "2024-01-01");
    world.form.set_field("location", "Port A");
    world.form.set_field("serviceType", "Tow");
}

async fn submit_form(world: &mut TripWorld) {
    let submitted = world.form.submit();
    let state = world.state();
    let invoice = match submitted.invoice {
        Some(upload) => Some(state.invoices.store(&upload).await.expect("store invoice")),
        None => None,
    };
    state
        .repo
        .append(Trip::pending(submitted.details, invoice))
        .await;
}

#[tokio::main]
async fn main() {
    TripWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
