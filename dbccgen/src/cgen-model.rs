/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Source code derivate from: (MIT License)
 *  - https://github.com/cantools/cantools Copyright: Erik Moqvist (c_source generator)
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

//! Messages and signals as seen by the C generator: C names, C types and
//! the byte segments each signal occupies in its frame.

use crate::error::CgenError;
use crate::naming::CNaming;
use dbcparser::data::{
    ByteOrder, DbcObject, Message, MultiplexIndicator, Signal, SignalExtendedValueType, ValueType,
};
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftDirection::Left => "left",
            ShiftDirection::Right => "right",
        }
    }
}

/// Part of a signal stored in one frame byte
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub index: u64,
    pub shift: u64,
    pub direction: ShiftDirection,
    pub mask: u8,
}

pub struct CSignal<'a> {
    pub signal: &'a Signal,
    pub snake_name: String,
    pub upper_name: String,
    pub comment: Option<&'a str>,
    /// (C name, raw value)
    pub choices: Vec<(String, i64)>,
    pub is_float: bool,
    /// width of the C storage type: 8, 16, 32 or 64
    pub type_length: u64,
}

impl<'a> CSignal<'a> {
    /// # Errors
    /// `CgenError::SignalLayout` when the signal cannot live in the message frame.
    pub fn new(dbc: &'a DbcObject, msg: &'a Message, signal: &'a Signal) -> Result<Self, CgenError> {
        let layout_error = |reason: String| CgenError::SignalLayout {
            message: msg.name.clone(),
            signal: signal.name.clone(),
            reason,
        };

        if signal.size == 0 || signal.size > 64 {
            return Err(layout_error(format!("size {} not in [1..64] bits", signal.size)));
        }

        let is_float = match dbc.signal_extended_value_type(msg.id, &signal.name) {
            Some(SignalExtendedValueType::IEEEfloat32Bit) => {
                if signal.size != 32 {
                    return Err(layout_error(format!("float signal is {} bits, not 32", signal.size)));
                }
                true
            }
            Some(SignalExtendedValueType::IEEEdouble64bit) => {
                if signal.size != 64 {
                    return Err(layout_error(format!("double signal is {} bits, not 64", signal.size)));
                }
                true
            }
            _ => false,
        };

        let type_length = match signal.size {
            n if n <= 8 => 8,
            n if n <= 16 => 16,
            n if n <= 32 => 32,
            _ => 64,
        };

        let mut choices: Vec<(String, i64)> = Vec::new();
        if let Some(variants) = dbc.value_descriptions_for_signal(msg.id, &signal.name) {
            for variant in variants {
                #[allow(clippy::cast_possible_truncation)]
                let value = variant.a as i64;
                let mut name = variant.get_c_upper();
                if choices.iter().any(|(other, _)| *other == name) {
                    name = format!("{name}_{}", value.unsigned_abs());
                }
                choices.push((name, value));
            }
        }

        let csignal = CSignal {
            signal,
            snake_name: signal.get_c_snake(),
            upper_name: signal.get_c_upper(),
            comment: dbc.signal_comment(msg.id, &signal.name),
            choices,
            is_float,
            type_length,
        };

        if let Some(last) = csignal.segments(false).last() {
            if last.index >= msg.size {
                return Err(layout_error(format!(
                    "ends in byte {}, but message is only {} bytes",
                    last.index, msg.size
                )));
            }
        }

        Ok(csignal)
    }

    #[must_use]
    pub fn is_signed(&self) -> bool {
        !self.is_float && self.signal.value_type == ValueType::Signed
    }

    #[must_use]
    pub fn type_name(&self) -> String {
        if self.is_float {
            if self.type_length == 32 { "float".to_owned() } else { "double".to_owned() }
        } else if self.is_signed() {
            format!("int{}_t", self.type_length)
        } else {
            format!("uint{}_t", self.type_length)
        }
    }

    /// Literal suffix for the unsigned conversion type
    #[must_use]
    pub fn conversion_suffix(&self) -> &'static str {
        if self.type_length == 64 { "ull" } else { "u" }
    }

    /// Literal suffix for the declared type
    #[must_use]
    pub fn literal_suffix(&self) -> &'static str {
        match (self.is_signed(), self.type_length == 64) {
            (true, true) => "ll",
            (true, false) => "",
            (false, true) => "ull",
            (false, false) => "u",
        }
    }

    /// Bytes touched by the signal, in frame order. Shift directions are for
    /// packing; `invert_shift` flips them for unpacking.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn segments(&self, invert_shift: bool) -> Vec<Segment> {
        let size = self.signal.size;
        let mut index = self.signal.start_bit / 8;
        let mut pos = self.signal.start_bit % 8;
        let mut left = size;
        let mut segments = Vec::new();

        while left > 0 {
            let length: u64;
            let shift: i64;
            let mask: u64;

            match self.signal.byte_order {
                ByteOrder::BigEndian => {
                    if left > pos {
                        length = pos + 1;
                        pos = 7;
                        shift = -((left - length) as i64);
                        mask = (1 << length) - 1;
                    } else {
                        length = left;
                        shift = (pos + 1 - length) as i64;
                        mask = ((1 << length) - 1) << (pos + 1 - length);
                    }
                }
                ByteOrder::LittleEndian => {
                    shift = left as i64 - size as i64 + pos as i64;
                    if left >= 8 - pos {
                        length = 8 - pos;
                        mask = ((1 << length) - 1) << pos;
                        pos = 0;
                    } else {
                        length = left;
                        mask = ((1 << length) - 1) << pos;
                    }
                }
            }

            let direction = if (shift < 0) == invert_shift {
                ShiftDirection::Left
            } else {
                ShiftDirection::Right
            };

            segments.push(Segment { index, shift: shift.unsigned_abs(), direction, mask: mask as u8 });
            left -= length;
            index += 1;
        }
        segments
    }

    /// Sign extension mask applied after unpacking, `None` when the signal fills its type.
    #[must_use]
    pub fn sign_extension_mask(&self) -> Option<u64> {
        let fill = self.type_length - self.signal.size;
        if !self.is_signed() || fill == 0 {
            return None;
        }
        Some(((1u64 << fill) - 1) << self.signal.size)
    }

    /// Lowest and highest raw values the signal bits can hold
    #[must_use]
    pub fn raw_limits(&self) -> (i128, i128) {
        let size = self.signal.size;
        if self.is_signed() {
            (-(1i128 << (size - 1)), (1i128 << (size - 1)) - 1)
        } else {
            (0, (1i128 << size) - 1)
        }
    }

    /// DBC physical range converted back to raw values, `None` when the DBC leaves it open.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn raw_range(&self) -> Option<(i128, i128)> {
        let signal = self.signal;
        if self.is_float || signal.factor == 0.0 || (signal.min == 0.0 && signal.max == 0.0) {
            return None;
        }
        let low = ((signal.min - signal.offset) / signal.factor).round() as i128;
        let high = ((signal.max - signal.offset) / signal.factor).round() as i128;
        Some(if low <= high { (low, high) } else { (high, low) })
    }

    /// C conditions for `_is_in_range`, empty when every raw value is accepted
    #[must_use]
    pub fn range_checks(&self) -> Vec<String> {
        let Some((low, high)) = self.raw_range() else {
            return Vec::new();
        };
        let (type_min, type_max) = self.raw_limits();
        let suffix = self.literal_suffix();
        let mut checks = Vec::new();
        if low > type_min {
            checks.push(format!("(value >= {low}{suffix})"));
        }
        if high < type_max {
            checks.push(format!("(value <= {high}{suffix})"));
        }
        checks
    }
}

pub struct CMessage<'a> {
    pub message: &'a Message,
    pub snake_name: String,
    pub upper_name: String,
    pub comment: Option<&'a str>,
    pub cycle_time: Option<u64>,
    pub signals: Vec<CSignal<'a>>,
}

impl<'a> CMessage<'a> {
    /// # Errors
    /// Propagates signal layout errors.
    pub fn new(dbc: &'a DbcObject, message: &'a Message) -> Result<Self, CgenError> {
        let signals = message
            .signals
            .iter()
            .map(|signal| CSignal::new(dbc, message, signal))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CMessage {
            message,
            snake_name: message.get_c_snake(),
            upper_name: message.get_c_upper(),
            comment: dbc.message_comment(message.id),
            cycle_time: dbc.message_cycle_time(message.id),
            signals,
        })
    }

    #[must_use]
    pub fn multiplexor(&self) -> Option<&CSignal<'a>> {
        self.signals
            .iter()
            .find(|sig| sig.signal.multiplexer_indicator == MultiplexIndicator::Multiplexor)
    }

    fn mux_value(signal: &Signal) -> Option<u64> {
        match signal.multiplexer_indicator {
            MultiplexIndicator::MultiplexedSignal(value)
            | MultiplexIndicator::MultiplexorAndMultiplexedSignal(value) => Some(value),
            MultiplexIndicator::Multiplexor | MultiplexIndicator::Plain => None,
        }
    }

    /// Signals always present in the frame. Without a multiplexor every signal is plain.
    #[must_use]
    pub fn plain_signals(&self) -> Vec<&CSignal<'a>> {
        let has_mux = self.multiplexor().is_some();
        self.signals
            .iter()
            .filter(|sig| !has_mux || Self::mux_value(sig.signal).is_none())
            .collect()
    }

    /// Multiplexed signals grouped by multiplexor value
    #[must_use]
    pub fn multiplexed_signals(&self) -> BTreeMap<u64, Vec<&CSignal<'a>>> {
        let mut groups: BTreeMap<u64, Vec<&CSignal<'a>>> = BTreeMap::new();
        if self.multiplexor().is_none() {
            return groups;
        }
        for sig in &self.signals {
            if let Some(value) = Self::mux_value(sig.signal) {
                if let MultiplexIndicator::MultiplexorAndMultiplexedSignal(_) =
                    sig.signal.multiplexer_indicator
                {
                    log::warn!(
                        "{}::{} nested multiplexing not supported, handled as multiplexed signal",
                        self.message.name,
                        sig.signal.name
                    );
                }
                groups.entry(value).or_default().push(sig);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbcparser::data::{MessageId, Transmitter};
    use pretty_assertions::assert_eq;

    fn build(start_bit: u64, size: u64, byte_order: ByteOrder, value_type: ValueType) -> (DbcObject, Message) {
        let signal = Signal {
            name: "Value".to_owned(),
            multiplexer_indicator: MultiplexIndicator::Plain,
            start_bit,
            size,
            byte_order,
            value_type,
            factor: 1.0,
            offset: 0.0,
            min: 0.0,
            max: 0.0,
            unit: String::new(),
            receivers: Vec::new(),
        };
        let msg = Message {
            id: MessageId(10),
            name: "Test".to_owned(),
            size: 8,
            transmitter: Transmitter::VectorXXX,
            signals: vec![signal],
        };
        (DbcObject::default(), msg)
    }

    fn seg(index: u64, shift: u64, direction: ShiftDirection, mask: u8) -> Segment {
        Segment { index, shift, direction, mask }
    }

    #[test]
    fn little_endian_segments() {
        let (dbc, msg) = build(4, 12, ByteOrder::LittleEndian, ValueType::Unsigned);
        let sig = CSignal::new(&dbc, &msg, &msg.signals[0]).expect("valid layout");

        assert_eq!(
            sig.segments(false),
            vec![seg(0, 4, ShiftDirection::Left, 0xf0), seg(1, 4, ShiftDirection::Right, 0xff)]
        );
        assert_eq!(
            sig.segments(true),
            vec![seg(0, 4, ShiftDirection::Right, 0xf0), seg(1, 4, ShiftDirection::Left, 0xff)]
        );
        assert_eq!(sig.type_name(), "uint16_t");
    }

    #[test]
    fn big_endian_segments() {
        let (dbc, msg) = build(7, 16, ByteOrder::BigEndian, ValueType::Unsigned);
        let sig = CSignal::new(&dbc, &msg, &msg.signals[0]).expect("valid layout");

        assert_eq!(
            sig.segments(false),
            vec![seg(0, 8, ShiftDirection::Right, 0xff), seg(1, 0, ShiftDirection::Left, 0xff)]
        );
    }

    #[test]
    fn big_endian_partial_byte() {
        let (dbc, msg) = build(5, 3, ByteOrder::BigEndian, ValueType::Unsigned);
        let sig = CSignal::new(&dbc, &msg, &msg.signals[0]).expect("valid layout");

        assert_eq!(sig.segments(false), vec![seg(0, 3, ShiftDirection::Left, 0x38)]);
    }

    #[test]
    fn signed_signal_extension() {
        let (dbc, msg) = build(0, 12, ByteOrder::LittleEndian, ValueType::Signed);
        let sig = CSignal::new(&dbc, &msg, &msg.signals[0]).expect("valid layout");

        assert_eq!(sig.type_name(), "int16_t");
        assert_eq!(sig.sign_extension_mask(), Some(0xf000));
        assert_eq!(sig.raw_limits(), (-2048, 2047));
    }

    #[test]
    fn signal_outside_frame() {
        let (dbc, msg) = build(60, 8, ByteOrder::LittleEndian, ValueType::Unsigned);
        let error = CSignal::new(&dbc, &msg, &msg.signals[0]).err().expect("layout error");
        assert!(matches!(error, CgenError::SignalLayout { .. }));
    }

    #[test]
    fn range_checks() {
        let (dbc, mut msg) = build(0, 8, ByteOrder::LittleEndian, ValueType::Signed);
        msg.signals[0].offset = -40.0;
        msg.signals[0].min = -40.0;
        msg.signals[0].max = 80.0;
        let sig = CSignal::new(&dbc, &msg, &msg.signals[0]).expect("valid layout");

        assert_eq!(sig.range_checks(), vec!["(value >= 0)".to_owned(), "(value <= 120)".to_owned()]);
    }
}
