//! Unit tests for the places module.

use super::enrichment::{EnrichmentError, RiseSet, parse_rise_set, parse_time_zone};
use super::form::PlaceForm;
use super::place::{Detail, DetailId, Place, PlaceId};
use super::store::{PlaceStore, StoreError};
use super::systems::{apply_rise_set, apply_time_zone};
use crate::constants::{EMPTY_DETAIL_TEXT, UNNAMED_PLACE};

fn named_place(store: &mut PlaceStore, name: &str) -> PlaceId {
    let id = store.create_place();
    store.place_mut(id).unwrap().set_name(name);
    id
}

// Place text views
#[test]
fn test_place_latitude_text_scenario() {
    let mut place = Place::new(PlaceId(0));

    place.set_latitude_text("45").unwrap();
    assert_eq!(place.latitude_text(), "45.00000");

    assert!(place.set_latitude_text("91").is_err());
    assert_eq!(place.latitude, 45.0);
    assert_eq!(place.latitude_text(), "45.00000");

    place.set_latitude_text("-20.555556").unwrap();
    assert_eq!(place.latitude, -20.555556);
    assert_eq!(place.latitude_text(), "-20.55556");
}

#[test]
fn test_place_longitude_rejects_out_of_range() {
    let mut place = Place::new(PlaceId(0));
    place.set_longitude_text("152").unwrap();
    assert!(place.set_longitude_text("181").is_err());
    assert!(place.set_longitude_text("east").is_err());
    assert_eq!(place.longitude, 152.0);
    assert_eq!(place.longitude_text(), "152.00000");
}

#[test]
fn test_place_numeric_setters_keep_invariant() {
    let mut place = Place::new(PlaceId(0));
    place.set_latitude(-27.0).unwrap();
    assert!(place.set_latitude(-95.0).is_err());
    assert!(place.set_longitude(f64::NAN).is_err());
    assert_eq!(place.coordinate().latitude, -27.0);
    assert_eq!(place.coordinate().longitude, 0.0);
}

#[test]
fn test_place_delta_text() {
    let mut place = Place::new(PlaceId(0));
    place.set_delta_text("0.2").unwrap();
    assert_eq!(place.delta_text(), "0.2");
    assert!(place.set_delta_text("wide").is_err());
    assert_eq!(place.delta, 0.2);
}

#[test]
fn test_place_name_default() {
    let mut place = Place::new(PlaceId(0));
    assert_eq!(place.display_name(), UNNAMED_PLACE);
    place.set_name("Home");
    assert_eq!(place.display_name(), "Home");
}

#[test]
fn test_place_url_text() {
    let mut place = Place::new(PlaceId(0));
    assert_eq!(place.url_text(), "");

    place.set_url_text("https://example.com/photo.jpg").unwrap();
    assert_eq!(place.url_text(), "https://example.com/photo.jpg");

    assert!(place.set_url_text("not a url").is_err());
    assert_eq!(place.url_text(), "https://example.com/photo.jpg");
}

#[test]
fn test_detail_display_text() {
    let mut detail = Detail {
        id: DetailId(1),
        text: String::new(),
        place: PlaceId(0),
    };
    assert_eq!(detail.display_text(), EMPTY_DETAIL_TEXT);
    detail.text = "Great coffee".to_string();
    assert_eq!(detail.display_text(), "Great coffee");
}

// Store
#[test]
fn test_fetch_sorted_by_name() {
    let mut store = PlaceStore::in_memory();
    named_place(&mut store, "Zoo");
    named_place(&mut store, "Beach");
    let unnamed = store.create_place();
    named_place(&mut store, "Home");

    let names: Vec<Option<&str>> = store
        .fetch_sorted_by_name()
        .iter()
        .map(|p| p.name.as_deref())
        .collect();
    assert_eq!(names, vec![None, Some("Beach"), Some("Home"), Some("Zoo")]);
    assert_eq!(store.fetch_sorted_by_name()[0].id, unnamed);
}

#[test]
fn test_delete_place_cascades_details() {
    let mut store = PlaceStore::in_memory();
    let home = named_place(&mut store, "Home");
    let work = named_place(&mut store, "Work");
    store.add_detail(home, "Front door is blue").unwrap();
    store.add_detail(home, "Parking out back").unwrap();
    let kept = store.add_detail(work, "Level 3").unwrap();

    assert!(store.delete_place(home));

    assert!(store.place(home).is_none());
    assert!(store.details_of(home).is_empty());
    assert_eq!(store.detail_count(), 1);
    assert!(store.detail(kept).is_some());
}

#[test]
fn test_delete_detail_keeps_place() {
    let mut store = PlaceStore::in_memory();
    let home = named_place(&mut store, "Home");
    let first = store.add_detail(home, "one").unwrap();
    store.add_detail(home, "two").unwrap();

    assert!(store.delete_detail(first));

    assert!(store.place(home).is_some());
    let remaining: Vec<&str> = store
        .details_of(home)
        .iter()
        .map(|d| d.text.as_str())
        .collect();
    assert_eq!(remaining, vec!["two"]);
}

#[test]
fn test_delete_missing_entities() {
    let mut store = PlaceStore::in_memory();
    assert!(!store.delete_place(PlaceId(42)));
    assert!(!store.delete_detail(DetailId(42)));
}

#[test]
fn test_detail_requires_parent() {
    let mut store = PlaceStore::in_memory();
    let result = store.create_detail(PlaceId(7), "orphan");
    assert!(matches!(result, Err(StoreError::MissingPlace(PlaceId(7)))));
    assert_eq!(store.detail_count(), 0);
}

#[test]
fn test_details_in_creation_order() {
    let mut store = PlaceStore::in_memory();
    let home = named_place(&mut store, "Home");
    for text in ["a", "b", "c"] {
        store.add_detail(home, text).unwrap();
    }
    let texts: Vec<&str> = store
        .details_of(home)
        .iter()
        .map(|d| d.text.as_str())
        .collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn test_commit_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("places.json");

    let mut store = PlaceStore::open(&path).unwrap();
    assert_eq!(store.place_count(), 0);
    let home = named_place(&mut store, "Home");
    {
        let place = store.place_mut(home).unwrap();
        place.set_latitude_text("-27.0").unwrap();
        place.set_longitude_text("152.0").unwrap();
        place.set_url_text("https://example.com/home.png").unwrap();
    }
    store.add_detail(home, "Front door is blue").unwrap();

    let reopened = PlaceStore::open(&path).unwrap();
    let place = reopened.place(home).unwrap();
    assert_eq!(place.display_name(), "Home");
    assert_eq!(place.latitude, -27.0);
    assert_eq!(place.longitude, 152.0);
    assert_eq!(place.url_text(), "https://example.com/home.png");
    assert_eq!(reopened.details_of(home).len(), 1);

    // Ids keep increasing after a reopen
    let mut reopened = reopened;
    let next = reopened.create_place();
    assert!(next > home);
    assert!(!dir.path().join("places.json.tmp").exists());
}

#[test]
fn test_open_corrupt_store_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("places.json");
    std::fs::write(&path, "[[[").unwrap();

    let result = PlaceStore::open(&path);
    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
}

#[test]
fn test_commit_into_missing_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("places.json");

    let mut store = PlaceStore::open(&path).unwrap();
    named_place(&mut store, "Home");
    store.commit().unwrap();
    assert!(path.exists());
}

#[test]
fn test_open_unreadable_store_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("places.json");
    std::fs::create_dir(&path).unwrap();

    let store = PlaceStore::open(&path);
    assert!(matches!(store, Err(StoreError::Io { .. })));
}

// Form submission
#[test]
fn test_form_from_place() {
    let mut place = Place::new(PlaceId(3));
    place.set_name("Home");
    place.set_latitude(-27.0).unwrap();
    place.set_longitude(152.0).unwrap();

    let form = PlaceForm::from_place(&place);
    assert_eq!(form.name, "Home");
    assert_eq!(form.url, "");
    assert_eq!(form.latitude, "-27.00000");
    assert_eq!(form.longitude, "152.00000");
    assert!(form.new_detail.is_empty());
}

#[test]
fn test_form_apply_commits_valid_fields() {
    let mut store = PlaceStore::in_memory();
    let id = named_place(&mut store, "Old");

    let form = PlaceForm {
        name: "Lighthouse".to_string(),
        url: "https://example.com/lighthouse.jpg".to_string(),
        latitude: "-28.6".to_string(),
        longitude: "200".to_string(),
        new_detail: "Open at dawn".to_string(),
    };
    assert!(form.apply(&mut store, id).unwrap());

    let place = store.place(id).unwrap();
    assert_eq!(place.display_name(), "Lighthouse");
    assert_eq!(place.url_text(), "https://example.com/lighthouse.jpg");
    assert_eq!(place.latitude, -28.6);
    // Out-of-range longitude keeps the previous value
    assert_eq!(place.longitude, 0.0);
    assert_eq!(store.details_of(id).len(), 1);
}

#[test]
fn test_form_apply_skips_empty_detail() {
    let mut store = PlaceStore::in_memory();
    let id = named_place(&mut store, "Home");
    let form = PlaceForm {
        name: "Home".to_string(),
        ..Default::default()
    };
    assert!(form.apply(&mut store, id).unwrap());
    assert!(store.details_of(id).is_empty());
}

#[test]
fn test_form_apply_missing_place() {
    let mut store = PlaceStore::in_memory();
    let form = PlaceForm::default();
    assert!(!form.apply(&mut store, PlaceId(99)).unwrap());
}

// Remote contracts
#[test]
fn test_parse_rise_set() {
    let json = r#"{
        "results": {
            "date": "2023-05-31",
            "sunrise": "7:06:43 AM",
            "sunset": "5:02:17 PM",
            "timezone": "UTC"
        },
        "status": "OK"
    }"#;
    let rise_set = parse_rise_set(json).unwrap();
    assert_eq!(rise_set.sunrise, "7:06:43 AM");
    assert_eq!(rise_set.sunset, "5:02:17 PM");
}

#[test]
fn test_parse_rise_set_malformed() {
    assert!(parse_rise_set(r#"{"status": "ERROR"}"#).is_err());
    assert!(parse_rise_set(r#"{"results": {"sunrise": "", "sunset": ""}}"#).is_err());
    assert!(parse_rise_set("<html>").is_err());
}

#[test]
fn test_parse_time_zone() {
    let json = r#"{"timeZone": "Australia/Brisbane", "currentLocalTime": "2023-05-31T10:00:00"}"#;
    assert_eq!(parse_time_zone(json).unwrap(), "Australia/Brisbane");
    assert!(parse_time_zone(r#"{"zone": "UTC"}"#).is_err());
}

// Applying enrichment results
#[test]
fn test_apply_time_zone_success() {
    let mut store = PlaceStore::in_memory();
    let id = named_place(&mut store, "Home");
    assert!(apply_time_zone(&mut store, id, Ok("Australia/Brisbane".to_string())));
    assert_eq!(
        store.place(id).unwrap().timezone.as_deref(),
        Some("Australia/Brisbane")
    );
}

#[test]
fn test_apply_time_zone_failure_leaves_unset() {
    let mut store = PlaceStore::in_memory();
    let id = named_place(&mut store, "Home");
    let failed = Err(EnrichmentError::Malformed("missing timeZone".to_string()));
    assert!(!apply_time_zone(&mut store, id, failed));
    assert!(store.place(id).unwrap().timezone.is_none());
}

#[test]
fn test_apply_rise_set_to_deleted_place() {
    let mut store = PlaceStore::in_memory();
    let id = named_place(&mut store, "Home");
    store.delete_place(id);
    let result = Ok(RiseSet {
        sunrise: "6:00:00 AM".to_string(),
        sunset: "6:00:00 PM".to_string(),
    });
    assert!(!apply_rise_set(&mut store, id, result));
}

#[test]
fn test_apply_rise_set_success() {
    let mut store = PlaceStore::in_memory();
    let id = named_place(&mut store, "Home");
    let result = Ok(RiseSet {
        sunrise: "6:00:00 AM".to_string(),
        sunset: "6:00:00 PM".to_string(),
    });
    assert!(apply_rise_set(&mut store, id, result));
    let place = store.place(id).unwrap();
    assert_eq!(place.sunrise.as_deref(), Some("6:00:00 AM"));
    assert_eq!(place.sunset.as_deref(), Some("6:00:00 PM"));
}

// Systems driven through a headless app
mod app {
    use bevy::prelude::*;
    use std::path::Path;
    use std::sync::Arc;

    use crate::assets::ResolveImageRequest;
    use crate::config::{AppConfig, AppConfigData};
    use crate::coordinates::Coordinate;
    use crate::places::{
        AddPlaceRequest, DeletePlacesRequest, EnrichPlaceRequest, EnrichmentError,
        EnrichmentService, EnrichmentServices, PlaceId, PlaceStore, PlacesDeleted, PlacesPlugin,
        RiseSet, RiseSetTask, TimeZoneTask,
    };
    use crate::test_support::{count, update_until};

    struct FixedEnrichment;

    impl EnrichmentService for FixedEnrichment {
        fn time_zone(&self, _: Coordinate) -> Result<String, EnrichmentError> {
            Ok("Australia/Brisbane".to_string())
        }

        fn rise_set(&self, _: Coordinate) -> Result<RiseSet, EnrichmentError> {
            Ok(RiseSet {
                sunrise: "7:06:43 PM".to_string(),
                sunset: "8:12:01 AM".to_string(),
            })
        }
    }

    struct OfflineEnrichment;

    impl EnrichmentService for OfflineEnrichment {
        fn time_zone(&self, _: Coordinate) -> Result<String, EnrichmentError> {
            Err(EnrichmentError::Malformed("offline".to_string()))
        }

        fn rise_set(&self, _: Coordinate) -> Result<RiseSet, EnrichmentError> {
            Err(EnrichmentError::Malformed("offline".to_string()))
        }
    }

    #[derive(Resource, Default)]
    struct DeletedPlaces(Vec<PlaceId>);

    fn record_deleted(mut events: MessageReader<PlacesDeleted>, mut seen: ResMut<DeletedPlaces>) {
        for event in events.read() {
            seen.0.extend(event.ids.iter().copied());
        }
    }

    /// App with the places plugin, a store at `store_path` and `service`
    /// standing in for the remote lookups.
    fn places_app(store_path: &Path, service: Arc<dyn EnrichmentService>) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, PlacesPlugin))
            .add_message::<ResolveImageRequest>()
            .init_resource::<DeletedPlaces>()
            .add_systems(Update, record_deleted)
            .insert_resource(AppConfig {
                data: AppConfigData {
                    store_path: Some(store_path.to_path_buf()),
                    ..Default::default()
                },
                config_path: store_path.with_file_name("config.json"),
                dirty: false,
            });
        // Startup opens the store and installs the HTTP service
        app.update();
        app.insert_resource(EnrichmentServices(service));
        app
    }

    fn create_place(app: &mut App) -> PlaceId {
        let mut store = app.world_mut().resource_mut::<PlaceStore>();
        let id = store.create_place();
        store.commit().unwrap();
        id
    }

    #[test]
    fn test_add_place_request_commits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        let mut app = places_app(&path, Arc::new(FixedEnrichment));

        app.world_mut().write_message(AddPlaceRequest);
        app.update();

        let reopened = PlaceStore::open(&path).unwrap();
        let places = reopened.fetch_sorted_by_name();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].display_name(), "New Place");
        assert!(app.should_exit().is_none());
    }

    #[test]
    fn test_enrichment_writes_results_and_commits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        let mut app = places_app(&path, Arc::new(FixedEnrichment));
        let id = create_place(&mut app);

        app.world_mut().write_message(EnrichPlaceRequest { place: id });
        update_until(&mut app, |world| {
            let place = world.resource::<PlaceStore>().place(id).unwrap();
            place.timezone.is_some() && place.sunset.is_some()
        });

        let reopened = PlaceStore::open(&path).unwrap();
        let place = reopened.place(id).unwrap();
        assert_eq!(place.timezone.as_deref(), Some("Australia/Brisbane"));
        assert_eq!(place.sunrise.as_deref(), Some("7:06:43 PM"));
        assert_eq!(place.sunset.as_deref(), Some("8:12:01 AM"));
    }

    #[test]
    fn test_failed_enrichment_leaves_fields_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        let mut app = places_app(&path, Arc::new(OfflineEnrichment));
        let id = create_place(&mut app);

        app.world_mut().write_message(EnrichPlaceRequest { place: id });
        app.update();
        update_until(&mut app, |world| {
            count::<TimeZoneTask>(world) == 0 && count::<RiseSetTask>(world) == 0
        });

        let place = app.world().resource::<PlaceStore>().place(id).unwrap().clone();
        assert!(place.timezone.is_none());
        assert!(place.sunrise.is_none());
        assert!(place.sunset.is_none());
        assert!(app.should_exit().is_none());
    }

    #[test]
    fn test_failed_commit_exits_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        let mut app = places_app(&path, Arc::new(FixedEnrichment));

        // A directory where the store file should go makes the rename fail
        std::fs::create_dir(&path).unwrap();
        app.world_mut().write_message(AddPlaceRequest);
        app.update();

        assert_eq!(app.should_exit(), Some(AppExit::error()));
    }

    #[test]
    fn test_delete_places_reports_removed_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        let mut app = places_app(&path, Arc::new(FixedEnrichment));
        let kept = create_place(&mut app);
        let gone = create_place(&mut app);

        app.world_mut().write_message(DeletePlacesRequest {
            ids: vec![gone, PlaceId(999)],
        });
        app.update();
        app.update();

        assert_eq!(app.world().resource::<DeletedPlaces>().0, vec![gone]);
        let reopened = PlaceStore::open(&path).unwrap();
        assert!(reopened.place(kept).is_some());
        assert!(reopened.place(gone).is_none());
    }
}
