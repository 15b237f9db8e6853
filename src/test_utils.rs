/*
 * Test utilities for hf-sensors
 *
 * Fixture chip tables for the in-memory backend, shared by the unit tests of
 * the entity modules.
 */

use crate::backend::memory::{MemoryBackend, MemoryChip, MemoryFeature, MemoryTally, MemorySubfeature};
use crate::backend::{BusRecord, ChipRecord, FeatureRecord, MockSensorsBackend, RecordKey};
use crate::ffi::*;
use crate::handle;

pub const CORETEMP_PATH: &str = "/sys/class/hwmon/hwmon0";
pub const NCT6775_PATH: &str = "/sys/class/hwmon/hwmon1";
pub const JC42_PATH: &str = "/sys/class/hwmon/hwmon10";

pub const SMBUS_ADAPTER: &str = "SMBus I801 adapter at efa0";

/// Creates the CPU package sensor found on most Intel machines
pub fn coretemp() -> MemoryChip {
    MemoryChip::new("coretemp", CORETEMP_PATH)
        .feature(
            MemoryFeature::new("temp1", SENSORS_FEATURE_TEMP)
                .label("Package id 0")
                .subfeature(MemorySubfeature::new("temp1_input", SENSORS_SUBFEATURE_TEMP_INPUT).value(42.0))
                .subfeature(MemorySubfeature::new("temp1_max", SENSORS_SUBFEATURE_TEMP_MAX).value(84.0))
                .subfeature(MemorySubfeature::new("temp1_crit", SENSORS_SUBFEATURE_TEMP_CRIT).value(100.0))
                .subfeature(MemorySubfeature::new("temp1_crit_alarm", SENSORS_SUBFEATURE_TEMP_CRIT_ALARM)),
        )
        .feature(
            MemoryFeature::new("temp2", SENSORS_FEATURE_TEMP)
                .label("Core 0")
                .subfeature(MemorySubfeature::new("temp2_input", SENSORS_SUBFEATURE_TEMP_INPUT).value(40.0)),
        )
}

/// Creates a Super I/O chip with voltage, fan and writable limits
pub fn nct6775() -> MemoryChip {
    MemoryChip::new("nct6775", NCT6775_PATH)
        .address(0x290)
        .feature(
            MemoryFeature::new("in0", SENSORS_FEATURE_IN)
                .label("Vcore")
                .subfeature(MemorySubfeature::new("in0_input", SENSORS_SUBFEATURE_IN_INPUT).value(1.02))
                .subfeature(MemorySubfeature::new("in0_min", SENSORS_SUBFEATURE_IN_MIN).writable())
                .subfeature(MemorySubfeature::new("in0_max", SENSORS_SUBFEATURE_IN_MAX).value(1.74).writable()),
        )
        .feature(
            MemoryFeature::new("fan1", SENSORS_FEATURE_FAN)
                .subfeature(MemorySubfeature::new("fan1_input", SENSORS_SUBFEATURE_FAN_INPUT).value(1180.0))
                .subfeature(MemorySubfeature::new("fan1_min", SENSORS_SUBFEATURE_FAN_MIN).value(300.0).writable())
                .subfeature(MemorySubfeature::new("fan1_alarm", SENSORS_SUBFEATURE_FAN_ALARM)),
        )
        .feature(
            MemoryFeature::new("temp7", SENSORS_FEATURE_TEMP)
                .label("PCH_CHIP_TEMP")
                .subfeature(
                    MemorySubfeature::new("temp7_input", SENSORS_SUBFEATURE_TEMP_INPUT)
                        .read_error(-SENSORS_ERR_KERNEL),
                ),
        )
        .feature(
            MemoryFeature::new("intrusion0", SENSORS_FEATURE_INTRUSION).subfeature(
                MemorySubfeature::new("intrusion0_alarm", SENSORS_SUBFEATURE_INTRUSION_ALARM)
                    .value(1.0)
                    .writable(),
            ),
        )
        .feature(
            MemoryFeature::new("beep_enable", SENSORS_FEATURE_BEEP_ENABLE)
                .subfeature(MemorySubfeature::new("beep_enable", SENSORS_SUBFEATURE_BEEP_ENABLE).writable()),
        )
}

/// Creates a DIMM temperature sensor behind an I2C adapter
pub fn jc42() -> MemoryChip {
    MemoryChip::new("jc42", JC42_PATH)
        .bus(SENSORS_BUS_TYPE_I2C, 3)
        .address(0x18)
        .feature(
            MemoryFeature::new("temp1", SENSORS_FEATURE_TEMP).subfeature(
                MemorySubfeature::new("temp1_input", SENSORS_SUBFEATURE_TEMP_INPUT).value(35.5),
            ),
        )
}

/// Creates a backend holding all fixture chips, in hwmon order
pub fn fixture_backend() -> MemoryBackend {
    MemoryBackend::new()
        .i2c_adapter(3, SMBUS_ADAPTER)
        .version(Some("3.6.0".to_string()))
        .chip(coretemp())
        .chip(nct6775())
        .chip(jc42())
}

/// Installs the fixture backend as the process-wide library
pub fn install_fixture() -> MemoryTally {
    install(fixture_backend())
}

pub fn install(backend: MemoryBackend) -> MemoryTally {
    let tally = backend.tally();
    handle::set_backend(Box::new(backend));
    tally
}

pub const MOCK_CHIP_PATH: &str = "/sys/class/hwmon/hwmon3";

/// Creates a mock library holding one ISA chip with a single `temp1`
/// feature. Callers add expectations for the live calls under test.
pub fn mock_single_chip() -> MockSensorsBackend {
    let chip = ChipRecord {
        prefix: "it8728".into(),
        bus: BusRecord { kind: SENSORS_BUS_TYPE_ISA, nr: 0 },
        addr: 0xa30,
        path: MOCK_CHIP_PATH.into(),
        key: RecordKey(0x1000),
    };
    let feature = FeatureRecord {
        name: "temp1".into(),
        number: 0,
        kind: SENSORS_FEATURE_TEMP,
        first_subfeature: 0,
        key: RecordKey(0x2000),
    };

    let mut mock = MockSensorsBackend::new();
    mock.expect_init().returning(|_| Ok(()));
    mock.expect_cleanup().return_const(());
    mock.expect_strerror().returning(|code| strerror(code).to_string());
    mock.expect_next_detected_chip().returning(move |nr| {
        let record = (*nr == 0).then(|| chip.clone());
        *nr += 1;
        record
    });
    mock.expect_next_feature().returning(move |_, nr| {
        let record = (*nr == 0).then(|| feature.clone());
        *nr += 1;
        record
    });
    mock
}

/// Drops an installed mock so its call counts are verified
pub fn release_mock() {
    handle::cleanup();
    handle::set_backend(Box::new(MemoryBackend::new()));
}
