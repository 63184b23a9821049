mod common;

use caterpillar::Error;
use common::Fixture;

/// Scenario 6: plugin lifecycle. Set, overwrite (dropping keys absent from
/// the new state), then delete by type, after which the slot is gone.
#[test]
fn set_overwrite_then_delete_plugin_state() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();

    writer.set_plugin_state("x", "{}", vec![("k1".to_string(), "v1".to_string()), ("k2".to_string(), "v2".to_string())]);
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    let mut state = reader.get_plugin_state("x", "{}").unwrap();
    state.sort();
    assert_eq!(state, vec![("k1".to_string(), "v1".to_string()), ("k2".to_string(), "v2".to_string())]);
    drop(reader);

    let mut writer = fixture.index.writer().unwrap();
    writer.set_plugin_state("x", "{}", vec![("k1".to_string(), "v3".to_string())]);
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    let state = reader.get_plugin_state("x", "{}").unwrap();
    assert_eq!(state, vec![("k1".to_string(), "v3".to_string())]);
    drop(reader);

    let mut writer = fixture.index.writer().unwrap();
    writer.delete_plugin_state("x", None);
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    let err = reader.get_plugin_state("x", "{}").unwrap_err();
    assert!(matches!(err, Error::PluginMissing { .. }));
}

/// Deleting a plugin slot by `(type, settings)` leaves other settings under
/// the same type untouched; deleting by type alone clears all of them.
#[test]
fn delete_by_settings_is_scoped_to_that_slot() {
    let fixture = Fixture::new();
    let mut writer = fixture.index.writer().unwrap();
    writer.set_plugin_state("sentiment", "{\"model\":\"a\"}", vec![("score".to_string(), "0.5".to_string())]);
    writer.set_plugin_state("sentiment", "{\"model\":\"b\"}", vec![("score".to_string(), "0.9".to_string())]);
    writer.commit().unwrap();

    let mut writer = fixture.index.writer().unwrap();
    writer.delete_plugin_state("sentiment", Some("{\"model\":\"a\"}".to_string()));
    writer.commit().unwrap();

    let reader = fixture.index.reader().unwrap();
    assert!(reader.get_plugin_state("sentiment", "{\"model\":\"a\"}").is_err());
    assert!(reader.get_plugin_state("sentiment", "{\"model\":\"b\"}").is_ok());
}
