/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

//! C identifiers built from DBC names.

use dbcparser::data::{Message, Signal, ValDescription};
use heck::{ToShoutySnakeCase, ToSnakeCase};

const KEYWORDS: [&str; 47] = [
    // C11 keywords
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local",
    // stdbool.h
    "bool", "true", "false",
];

fn escape_name(name: &str) -> String {
    if KEYWORDS.contains(&name.to_lowercase().as_str())
        || !name.starts_with(|c: char| c.is_ascii_alphabetic())
    {
        format!("X{name}")
    } else {
        name.to_owned()
    }
}

/// Snake/upper case names used for generated C symbols
pub trait CNaming {
    fn get_c_snake(&self) -> String;

    fn get_c_upper(&self) -> String {
        self.get_c_snake().to_uppercase()
    }
}

impl CNaming for Message {
    fn get_c_snake(&self) -> String {
        escape_name(&self.name).to_snake_case()
    }
}

impl CNaming for Signal {
    fn get_c_snake(&self) -> String {
        escape_name(&self.name).to_snake_case()
    }
}

impl CNaming for ValDescription {
    fn get_c_snake(&self) -> String {
        self.get_c_upper().to_lowercase()
    }

    fn get_c_upper(&self) -> String {
        escape_name(self.b.trim()).to_shouty_snake_case()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbcparser::data::{ByteOrder, MessageId, MultiplexIndicator, Transmitter, ValueType};

    fn message(name: &str) -> Message {
        Message {
            id: MessageId(1),
            name: name.to_owned(),
            size: 8,
            transmitter: Transmitter::VectorXXX,
            signals: Vec::new(),
        }
    }

    fn signal(name: &str) -> Signal {
        Signal {
            name: name.to_owned(),
            multiplexer_indicator: MultiplexIndicator::Plain,
            start_bit: 0,
            size: 8,
            byte_order: ByteOrder::LittleEndian,
            value_type: ValueType::Unsigned,
            factor: 1.0,
            offset: 0.0,
            min: 0.0,
            max: 0.0,
            unit: String::new(),
            receivers: Vec::new(),
        }
    }

    #[test]
    fn message_names() {
        assert_eq!(message("FsmStatus").get_c_snake(), "fsm_status");
        assert_eq!(message("FSM_NON_CRITICAL_ERRORS").get_c_upper(), "FSM_NON_CRITICAL_ERRORS");
    }

    #[test]
    fn keywords_are_escaped() {
        assert_eq!(signal("default").get_c_snake(), "xdefault");
        assert_eq!(signal("int").get_c_snake(), "xint");
    }

    #[test]
    fn choice_names() {
        let choice = ValDescription { a: 3.0, b: "Not Available".to_owned() };
        assert_eq!(choice.get_c_upper(), "NOT_AVAILABLE");
        let choice = ValDescription { a: 0.0, b: "0 deg".to_owned() };
        assert_eq!(choice.get_c_upper(), "X0_DEG");
    }
}
