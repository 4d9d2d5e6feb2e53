//! SensorHub driving Haar modules through the `Sensor` trait object.

use crate::mock_hw::{MockBus, Rig};

use haar::SensorHub;

fn positions(doc: &serde_json::Value, key: &str) -> Vec<serde_json::Value> {
    doc[key]
        .as_array()
        .map(|members| members.iter().map(|m| m["HAAR"]["Pos"].clone()).collect())
        .unwrap_or_default()
}

#[test]
fn hub_collects_valid_json_from_every_module() {
    let healthy = Rig::healthy();
    let mut absent = Rig::healthy();
    absent.bus = MockBus::with_devices(&[]);

    let mut hub = SensorHub::new();
    hub.add(Box::new(healthy.haar_at(1, 1)));
    hub.add(Box::new(absent.haar_at(2, 1)));
    hub.begin_all();

    assert_eq!(hub.present_count(), 1);

    let data: serde_json::Value = serde_json::from_str(&hub.read_all()).expect("valid JSON");
    assert_eq!(
        positions(&data, "Data"),
        vec![serde_json::json!([1, 1]), serde_json::json!([2, 1])]
    );
    assert_eq!(data["Data"][0]["HAAR"]["DPS368"]["Pressure"], 1013.25);
    assert!(data["Data"][1]["HAAR"]["DPS368"]["Pressure"].is_null());

    let meta: serde_json::Value = serde_json::from_str(&hub.metadata()).expect("valid JSON");
    assert_eq!(positions(&meta, "Metadata").len(), 2);
    assert_eq!(meta["Metadata"][1]["HAAR"]["Firmware"], "0.2.0");
}

#[test]
fn same_kind_modules_keep_separate_reports() {
    let a = Rig::healthy();
    let b = Rig::healthy();
    b.dps.state.borrow_mut().pressure = Err(-1);

    let mut hub = SensorHub::new();
    hub.add(Box::new(a.haar_at(1, 1)));
    hub.add(Box::new(b.haar_at(2, 1)));
    hub.begin_all();

    let data: serde_json::Value = serde_json::from_str(&hub.read_all()).expect("valid JSON");
    assert_eq!(
        positions(&data, "Data"),
        vec![serde_json::json!([1, 1]), serde_json::json!([2, 1])]
    );

    let errors: serde_json::Value = serde_json::from_str(&hub.errors()).expect("valid JSON");
    assert_eq!(errors["Errors"][0]["HAAR"]["NUM"], 0);
    assert_eq!(
        errors["Errors"][1]["HAAR"]["CODES"],
        serde_json::json!(["0x80012021"])
    );
}

#[test]
fn hub_errors_drain_each_module() {
    let mut absent = Rig::healthy();
    absent.bus = MockBus::with_devices(&[]);
    absent.sht.state.borrow_mut().answers_at.clear();

    let mut hub = SensorHub::new();
    hub.add(Box::new(absent.haar_at(3, 2)));
    hub.begin_all();
    let _ = hub.read_all();

    let errors = hub.errors();
    let v: serde_json::Value = serde_json::from_str(&errors).expect("valid JSON");
    let codes = v["Errors"][0]["HAAR"]["CODES"].as_array().cloned().unwrap_or_default();
    assert_eq!(
        codes,
        vec!["0x10010032", "0x10030032", "0x10050032"]
    );

    let again: serde_json::Value = serde_json::from_str(&hub.errors()).expect("valid JSON");
    assert_eq!(again["Errors"][0]["HAAR"]["NUM"], 0);
}
