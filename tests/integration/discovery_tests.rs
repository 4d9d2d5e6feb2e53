//! Discovery and presence: address fallback, init failures, re-probing.

use crate::mock_hw::{MockBus, Rig, drain_codes};

use haar::sensors::haar::{ADR_DPS368, ADR_DPS368_ALT, ADR_SHT31, ADR_SHT31_ALT};

#[test]
fn begin_uses_primary_addresses() {
    let rig = Rig::healthy();
    let mut haar = rig.haar();

    assert!(!haar.is_initialized());
    haar.begin();

    assert!(haar.is_initialized());
    assert_eq!(haar.resolved_address(), Some(ADR_DPS368));
    assert_eq!(rig.bus.probes(), vec![ADR_DPS368], "alt must not be probed");
    assert_eq!(rig.dps.state.borrow().begun_at, vec![ADR_DPS368]);
    assert_eq!(rig.sht.state.borrow().begun_at, vec![ADR_SHT31]);
    assert_eq!(haar.error_count(), 0);
}

#[test]
fn begin_falls_back_to_alternate_addresses() {
    let mut rig = Rig::healthy();
    rig.bus = MockBus::with_devices(&[ADR_DPS368_ALT, ADR_SHT31_ALT]);
    rig.sht.state.borrow_mut().answers_at = vec![ADR_SHT31_ALT];
    let mut haar = rig.haar();

    haar.begin();

    assert_eq!(
        haar.resolved_address(),
        Some(ADR_DPS368_ALT),
        "the address that answered must be recorded"
    );
    assert_eq!(rig.bus.probes(), vec![ADR_DPS368, ADR_DPS368_ALT]);
    assert_eq!(rig.dps.state.borrow().begun_at, vec![ADR_DPS368_ALT]);
    assert_eq!(rig.sht.state.borrow().begun_at, vec![ADR_SHT31, ADR_SHT31_ALT]);
    assert_eq!(haar.error_count(), 0);
}

#[test]
fn begin_with_nothing_attached_logs_both_init_failures() {
    let mut rig = Rig::healthy();
    rig.bus = MockBus::with_devices(&[]);
    rig.sht.state.borrow_mut().answers_at.clear();
    let mut haar = rig.haar();

    haar.begin();

    assert!(haar.is_initialized(), "partial init is not fatal");
    assert_eq!(haar.resolved_address(), None);
    assert!(rig.dps.state.borrow().begun_at.is_empty());
    assert_eq!(drain_codes(&mut haar), vec![0x1001_0021, 0x1003_0021]);
}

#[test]
fn missing_sht31_only_logs_humidity_init() {
    let rig = Rig::healthy();
    rig.sht.state.borrow_mut().answers_at.clear();
    let mut haar = rig.haar();

    haar.begin();

    assert_eq!(haar.resolved_address(), Some(ADR_DPS368));
    assert_eq!(drain_codes(&mut haar), vec![0x1003_0021]);
}

#[test]
fn is_present_probes_both_dps368_addresses() {
    let rig = Rig::healthy();
    let mut haar = rig.haar();

    assert!(haar.is_present());
    assert_eq!(rig.bus.probes(), vec![ADR_DPS368_ALT, ADR_DPS368]);
    assert!(
        rig.sht.state.borrow().begun_at.is_empty(),
        "presence check must not touch the SHT31"
    );
}

#[test]
fn is_present_accepts_alternate_only() {
    let mut rig = Rig::healthy();
    rig.bus = MockBus::with_devices(&[ADR_DPS368_ALT]);
    let mut haar = rig.haar();
    assert!(haar.is_present());
}

#[test]
fn is_present_ignores_sht31() {
    let mut rig = Rig::healthy();
    rig.bus = MockBus::with_devices(&[ADR_SHT31]);
    let mut haar = rig.haar();
    assert!(!haar.is_present());
    assert_eq!(haar.error_count(), 0, "presence check never logs");
}

#[test]
fn every_acquisition_reruns_discovery() {
    let rig = Rig::healthy();
    let mut haar = rig.haar();

    let _ = haar.acquire();
    let _ = haar.acquire();

    assert_eq!(rig.dps.state.borrow().begun_at, vec![ADR_DPS368, ADR_DPS368]);
    assert_eq!(rig.sht.state.borrow().begun_at, vec![ADR_SHT31, ADR_SHT31]);
}

#[test]
fn release_returns_the_hardware() {
    let rig = Rig::healthy();
    let mut haar = rig.haar();
    haar.begin();
    let (bus, _dps, _sht) = haar.release();
    assert_eq!(bus.probes(), vec![ADR_DPS368]);
}
