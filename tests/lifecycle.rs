//! End-to-end lifecycle tests: startup load, interactive edits, merge-enabled
//! shutdown store, and survival of concurrent external edits.

use std::collections::BTreeMap;
use std::fs;

use tempfile::TempDir;

use setpoint::commands::{self, SetOutcome};
use setpoint::property::{PropertyHolder, PropertyRegistry};
use setpoint::store::ConfigurationContainer;

fn tool_registry() -> PropertyRegistry {
    let mut registry = PropertyRegistry::new();
    registry.register("color", PropertyHolder::boolean(true, "colored output"));
    registry.register(
        "format",
        PropertyHolder::enumerated(["table", "vertical", "csv"], "table", "output format"),
    );
    registry.register("prompt", PropertyHolder::string("> ", "prompt text"));
    registry
}

#[test]
fn first_run_persists_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");

    let mut registry = tool_registry();
    let mut container = ConfigurationContainer::new(&path);
    registry.load_from(&mut container);
    registry.store_to(&mut container, "tool settings");

    let mut fresh = ConfigurationContainer::new(&path);
    let stored = fresh.read_properties(None);
    assert_eq!(stored["color"], "true");
    assert_eq!(stored["format"], "table");
    assert_eq!(stored["prompt"], "> ");
}

#[test]
fn stored_values_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");

    {
        let mut registry = tool_registry();
        let mut container = ConfigurationContainer::new(&path);
        registry.load_from(&mut container);
        commands::set_command(&mut registry, "format vert").unwrap();
        commands::set_command(&mut registry, "color off").unwrap();
        registry.store_to(&mut container, "tool settings");
    }

    let mut registry = tool_registry();
    let mut container = ConfigurationContainer::new(&path);
    registry.load_from(&mut container);
    assert_eq!(registry.get("format").unwrap().value(), "vertical");
    assert_eq!(registry.get("color").unwrap().value(), "false");
}

#[test]
fn unknown_and_invalid_stored_entries_are_dropped_silently() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");
    fs::write(
        &path,
        "color=true\nformat=nonsense\nleftover.from.old.version=1\n",
    )
    .unwrap();

    let mut registry = tool_registry();
    let mut container = ConfigurationContainer::new(&path);
    registry.load_from(&mut container);

    // The parsable, valid entry applies; the rest fall back to defaults.
    assert_eq!(registry.get("color").unwrap().value(), "true");
    assert_eq!(registry.get("format").unwrap().value(), "table");
    assert!(registry.get("leftover.from.old.version").is_none());
}

#[test]
fn corrupt_file_degrades_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");
    fs::write(&path, b"\x00\xffgarbage without structure").unwrap();

    let mut registry = tool_registry();
    let mut container = ConfigurationContainer::new(&path);
    registry.load_from(&mut container);
    assert_eq!(registry.get("format").unwrap().value(), "table");
}

#[test]
fn two_instances_merge_instead_of_clobbering() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");

    // Instance one starts up and reads.
    let mut registry_one = tool_registry();
    let mut container_one = ConfigurationContainer::new(&path);
    registry_one.load_from(&mut container_one);

    // Instance two starts, changes the prompt, and shuts down first. It also
    // leaves behind a key instance one's registry does not know about.
    {
        let mut container_two = ConfigurationContainer::new(&path);
        let mut on_disk = container_two.read_properties(None);
        on_disk.insert("prompt".to_string(), "two> ".to_string());
        on_disk.insert("window.title".to_string(), "session two".to_string());
        container_two.store_properties(&on_disk, true, "instance two").unwrap();
    }

    // Instance one changes the format and shuts down afterwards.
    commands::set_command(&mut registry_one, "format csv").unwrap();
    registry_one.store_to(&mut container_one, "instance one");

    let mut fresh = ConfigurationContainer::new(&path);
    let stored = fresh.read_properties(None);
    assert_eq!(stored["format"], "csv");
    // Instance one re-submits prompt, so its value wins for that key; the
    // key it never saw survives untouched.
    assert_eq!(stored["prompt"], "> ");
    assert_eq!(stored["window.title"], "session two");
}

#[test]
fn shutdown_with_no_changes_leaves_the_file_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");

    let mut registry = tool_registry();
    let mut container = ConfigurationContainer::new(&path);
    registry.load_from(&mut container);
    registry.store_to(&mut container, "tool settings");
    let first_bytes = fs::read(&path).unwrap();

    // Same process, second store with nothing changed.
    registry.store_to(&mut container, "tool settings");
    assert_eq!(fs::read(&path).unwrap(), first_bytes);
}

#[test]
fn listing_reflects_interactive_changes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");

    let mut registry = tool_registry();
    let mut container = ConfigurationContainer::new(&path);
    registry.load_from(&mut container);

    commands::set_command(&mut registry, "color 0").unwrap();
    let listing = match commands::set_command(&mut registry, "").unwrap() {
        SetOutcome::Listing(rows) => rows,
        other => panic!("expected Listing, got {other:?}"),
    };
    let color = listing.iter().find(|r| r.name == "color").unwrap();
    assert_eq!(color.value, "false");
}

#[test]
fn merge_reconciles_with_hand_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tool.properties");
    fs::write(&path, "A=1\nB=2\n").unwrap();

    let mut container = ConfigurationContainer::new(&path);
    container.read_properties(None);

    // A hand edit lands while we hold our snapshot.
    fs::write(&path, "A=1\nB=2\nC=3\n").unwrap();

    let props = BTreeMap::from([("A".to_string(), "9".to_string())]);
    container.store_properties(&props, true, "merge").unwrap();

    let mut fresh = ConfigurationContainer::new(&path);
    let stored = fresh.read_properties(None);
    assert_eq!(
        stored,
        BTreeMap::from([
            ("A".to_string(), "9".to_string()),
            ("C".to_string(), "3".to_string()),
        ])
    );
}
