//! Behaviour-driven step definitions driving the venues CLI scenarios.

use super::helpers::{StubVenueSourcesBuilder, read_utf8, restaurant, sample_profile, utf8_tempdir};
use super::*;
use crate::venues::run_venues_with;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;
use wayfarer_core::Venue;
use wayfarer_data::{TransportError, VenueFetchError};

const LE_BISTRO_IMAGE: &str = "https://commons.wikimedia.org/wiki/Special:FilePath/Bistro.jpg";

#[derive(Debug)]
struct VenuesWorld {
    _tmp: TempDir,
    output_path: Utf8PathBuf,
    builder: RefCell<StubVenueSourcesBuilder>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl VenuesWorld {
    fn new() -> Self {
        let (tmp, root) = utf8_tempdir();
        Self {
            _tmp: tmp,
            output_path: root.join("out").join("venues.json"),
            builder: RefCell::new(StubVenueSourcesBuilder::default()),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn push_args<const N: usize>(&self, args: [&str; N]) {
        self.cli_args
            .borrow_mut()
            .extend(args.iter().map(|arg| (*arg).to_owned()));
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["wayfarer".to_owned(), "venues".to_owned()];
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn printed_venues(&self) -> Vec<Venue> {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, got {err}");
        }
        serde_json::from_slice(&self.stdout.borrow()).expect("stdout holds a venue array")
    }
}

#[fixture]
fn world() -> VenuesWorld {
    VenuesWorld::new()
}

#[given("the Overpass stub returns two named restaurants")]
fn overpass_returns_two_restaurants(#[from(world)] world: &VenuesWorld) {
    let mut builder = world.builder.borrow_mut();
    builder.country_elements = vec![
        restaurant(1, "Chez Anne").with_tag("cuisine", "french"),
        restaurant(2, "Le Bistro").with_tag("wikidata", "Q42"),
    ];
    builder.images = vec![("Q42".to_owned(), LE_BISTRO_IMAGE.to_owned())];
}

#[given("the Overpass stub returns nothing for the country")]
fn overpass_returns_nothing(#[from(world)] world: &VenuesWorld) {
    let mut builder = world.builder.borrow_mut();
    builder.country_elements = Vec::new();
    builder.radius_elements = vec![restaurant(3, "Cervejaria Ramiro")];
    builder.profile = Some(sample_profile());
}

#[given("the Overpass stub fails with a gateway timeout")]
fn overpass_fails(#[from(world)] world: &VenuesWorld) {
    world.builder.borrow_mut().overpass_error = Some(TransportError::Http {
        url: "https://overpass.example/api/interpreter".to_owned(),
        status: 504,
        message: "gateway timeout".to_owned(),
    });
}

#[given("I search restaurants in Portugal")]
fn search_restaurants_in_portugal(#[from(world)] world: &VenuesWorld) {
    world.push_args([
        "--kind",
        "restaurant",
        "--country",
        "PT",
        "--overpass-url",
        "https://overpass.example/api/interpreter",
    ]);
}

#[given("I enable the capital fallback")]
fn enable_fallback(#[from(world)] world: &VenuesWorld) {
    world.push_args(["--fallback"]);
}

#[given("I also pass coordinates")]
fn also_pass_coordinates(#[from(world)] world: &VenuesWorld) {
    world.push_args(["--lat", "38.72", "--lng", "-9.14"]);
}

#[given("I ask for the output to be written to a file")]
fn write_output_to_file(#[from(world)] world: &VenuesWorld) {
    let path = world.output_path.to_string();
    world.push_args(["--output", path.as_str()]);
}

#[when("I run the venues command")]
fn run_venues_command(#[from(world)] world: &VenuesWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Venues(args) => {
            let builder = world.builder.borrow();
            let mut buffer = world.stdout.borrow_mut();
            run_venues_with(args, &*builder, &mut *buffer)
        }
        other => panic!("expected venues command, got {other:?}"),
    });

    world.result.replace(Some(outcome));
}

#[then("the command prints both restaurants as JSON")]
fn prints_both_restaurants(#[from(world)] world: &VenuesWorld) {
    let names: Vec<String> = world
        .printed_venues()
        .into_iter()
        .map(|venue| venue.name)
        .collect();
    assert_eq!(names, ["Chez Anne", "Le Bistro"]);
}

#[then("the second restaurant carries its Wikidata image")]
fn second_restaurant_has_image(#[from(world)] world: &VenuesWorld) {
    let venues = world.printed_venues();
    let bistro = venues.get(1).expect("second venue");
    assert_eq!(bistro.image_url.as_deref(), Some(LE_BISTRO_IMAGE));
    let anne = venues.first().expect("first venue");
    assert_eq!(anne.image_url, None);
    assert_eq!(anne.cuisine.as_deref(), Some("french"));
}

#[then("the output file holds both restaurants and stdout is empty")]
fn output_file_holds_restaurants(#[from(world)] world: &VenuesWorld) {
    let borrowed = world.result.borrow();
    if let Some(Err(err)) = borrowed.as_ref() {
        panic!("expected success, got {err}");
    }
    assert!(world.stdout.borrow().is_empty());
    let written = read_utf8(&world.output_path);
    let venues: Vec<Venue> = serde_json::from_str(&written).expect("file holds a venue array");
    assert_eq!(venues.len(), 2);
    assert!(written.ends_with('\n'));
}

#[then("the command prints the restaurant found near the capital")]
fn prints_fallback_restaurant(#[from(world)] world: &VenuesWorld) {
    let venues = world.printed_venues();
    assert_eq!(venues.len(), 1);
    assert_eq!(
        venues.first().map(|venue| venue.name.as_str()),
        Some("Cervejaria Ramiro")
    );
}

#[then("the command fails because the search areas conflict")]
fn fails_with_conflict(#[from(world)] world: &VenuesWorld) {
    match &*world.error() {
        CliError::ConflictingArguments { first, second } => {
            assert_eq!(*first, ARG_VENUES_COUNTRY);
            assert_eq!(*second, ARG_VENUES_LAT);
        }
        other => panic!("expected ConflictingArguments, found {other:?}"),
    }
}

#[then("the command fails with the Overpass error")]
fn fails_with_overpass_error(#[from(world)] world: &VenuesWorld) {
    match &*world.error() {
        CliError::FetchVenues(VenueFetchError::Overpass(source)) => {
            assert_eq!(source.status(), Some(504));
        }
        other => panic!("expected an Overpass failure, found {other:?}"),
    }
}

macro_rules! register_venues_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/venues_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: VenuesWorld) {
            let _ = world;
        }
    };
}

register_venues_scenario!(venues_country_search, "printing restaurants found in a country");
register_venues_scenario!(venues_output_file, "writing venues to an output file");
register_venues_scenario!(
    venues_capital_fallback,
    "falling back to the capital when the country search is empty"
);
register_venues_scenario!(venues_conflicting_areas, "rejecting a country search with coordinates");
register_venues_scenario!(venues_overpass_failure, "reporting an Overpass failure");
