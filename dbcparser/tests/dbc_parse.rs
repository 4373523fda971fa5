/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

use dbcparser::prelude::*;
use pretty_assertions::assert_eq;

const SAMPLE_DBC: &str = r#"VERSION ""


NS_ :
	NS_DESC_
	CM_
	BA_DEF_

BS_:

BU_: FSM BMS

VAL_TABLE_ Health 1 "FAULT" 0 "OK" ;


BO_ 100 FsmStatus: 8 FSM
 SG_ Speed : 0|16@1+ (0.1,0) [0|6553.5] "km/h" BMS
 SG_ State : 16|2@1+ (1,0) [0|3] "" BMS
 SG_ Temperature : 24|8@1- (1,-40) [-40|87] "degC" BMS

BO_ 2147484672 BmsVoltage: 4 BMS
 SG_ Voltage : 7|16@0+ (0.01,0) [0|655.35] "V" FSM
 SG_ Current : 23|16@0- (1,0) [0|0] "A" FSM

BO_TX_BU_ 100 : FSM,BMS;

EV_ Ignition: 0 [0|1] "" 0 1 DUMMY_NODE_VECTOR0 Vector__XXX;

CM_ BO_ 100 "Periodic FSM status.";
CM_ SG_ 100 Speed "Vehicle speed.";
CM_ BU_ FSM "Front sensor module";
BA_DEF_ BO_  "GenMsgCycleTime" INT 0 65535;
BA_DEF_DEF_  "GenMsgCycleTime" 0;
BA_ "GenMsgCycleTime" BO_ 100 100;
VAL_ 100 State 0 "OK" 1 "UNDERFLOW" 2 "OVERFLOW" ;
SIG_VALTYPE_ 2147484672 Voltage : 0;
"#;

#[test]
fn parse_sample_database() {
    let dbc = dbc_from_str(SAMPLE_DBC).expect("sample dbc should parse");

    assert_eq!(dbc.version, Some(Version(String::new())));
    assert_eq!(dbc.new_symbols.len(), 3);
    assert_eq!(dbc.nodes, vec!["FSM".to_string(), "BMS".to_string()]);
    assert_eq!(dbc.value_tables.len(), 1);
    assert_eq!(dbc.messages.len(), 2);
    assert_eq!(dbc.message_transmitters.len(), 1);
    assert_eq!(dbc.ignored, vec!["EV_".to_string()]);

    let status = &dbc.messages[0];
    assert_eq!(status.name, "FsmStatus");
    assert_eq!(status.size, 8);
    assert_eq!(status.transmitter, Transmitter::NodeName("FSM".to_string()));
    assert_eq!(status.signals.len(), 3);
    assert_eq!(status.signals[0].factor, 0.1);
    assert_eq!(status.signals[0].unit, "km/h");
}

#[test]
fn extended_frame_id() {
    let dbc = dbc_from_str(SAMPLE_DBC).expect("sample dbc should parse");
    let voltage = &dbc.messages[1];

    assert!(voltage.id.is_extended());
    assert_eq!(voltage.id.frame_id(), 0x400);
    assert!(!dbc.messages[0].id.is_extended());
    assert_eq!(dbc.messages[0].id.frame_id(), 100);
}

#[test]
fn lookups() {
    let dbc = dbc_from_str(SAMPLE_DBC).expect("sample dbc should parse");
    let status = MessageId(100);

    assert_eq!(dbc.message_comment(status), Some("Periodic FSM status."));
    assert_eq!(dbc.signal_comment(status, "Speed"), Some("Vehicle speed."));
    assert_eq!(dbc.signal_comment(status, "State"), None);

    let choices = dbc.value_descriptions_for_signal(status, "State").expect("State choices");
    let names: Vec<&str> = choices.iter().map(|choice| choice.b.as_str()).collect();
    assert_eq!(names, vec!["OK", "UNDERFLOW", "OVERFLOW"]);

    assert_eq!(dbc.message_cycle_time(status), Some(100));
    assert_eq!(dbc.message_cycle_time(MessageId(2_147_484_672)), None);

    assert_eq!(
        dbc.signal_extended_value_type(MessageId(2_147_484_672), "Voltage"),
        Some(SignalExtendedValueType::SignedOrUnsignedInteger)
    );
}

#[test]
fn statements_in_any_order() {
    let dbc = dbc_from_str(
        "CM_ BO_ 1 \"late message\";\r\nBO_ 1 Late: 1 Vector__XXX\r\n SG_ Flag : 0|1@1+ (1,0) [0|1] \"\" Vector__XXX\r\nVERSION \"1.0\"",
    )
    .expect("reordered dbc should parse");

    assert_eq!(dbc.version, Some(Version("1.0".to_string())));
    assert_eq!(dbc.messages[0].transmitter, Transmitter::VectorXXX);
    assert_eq!(dbc.message_comment(MessageId(1)), Some("late message"));
}

#[test]
fn reject_garbage() {
    let error = dbc_from_str("VERSION \"\"\nBO_ 12 Broken 8 FSM\n").expect_err("broken message");
    assert!(matches!(error, DbcError::Incomplete { .. }));
}

#[test]
fn missing_file() {
    let error = DbcObject::from_file("/nonexistent/database.dbc").expect_err("no such file");
    assert!(matches!(error, DbcError::Io(_)));
}

#[cfg(feature = "serde")]
#[test]
fn serialize_to_json() {
    let dbc = dbc_from_str(SAMPLE_DBC).expect("sample dbc should parse");
    let json = serde_json::to_string(&dbc.messages[0]).expect("json");
    assert!(json.contains("\"name\":\"FsmStatus\""));
}
