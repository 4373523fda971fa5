/*
 * Copyright (C) 2018 Marcel Buesing (MIT License)
 * Origin: https://github.com/marcelbuesing/can-dbc
 *
 * Adaptation (2022) to Redpesk and LibAfb model
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Extended (29 bits) frames carry this flag in the DBC message id.
pub const EXTENDED_FRAME_FLAG: u32 = 0x8000_0000;
const FRAME_ID_MASK: u32 = 0x1FFF_FFFF;

/// Attribute carrying the message period in milliseconds.
pub const CYCLE_TIME_ATTRIBUTE: &str = "GenMsgCycleTime";

#[derive(Debug, Error)]
pub enum DbcError {
    #[error("fail to read dbc file: {0}")]
    Io(#[from] std::io::Error),

    #[error("fail to parse dbc input: {0}")]
    Parsing(String),

    #[error("parsing not completed, unprocessed dbc: {remaining}")]
    Incomplete { remaining: String },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u32);

impl MessageId {
    /// Raw id as written in the DBC file, extended flag included.
    #[must_use]
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// CAN identifier without the extended frame flag.
    #[must_use]
    pub fn frame_id(&self) -> u32 {
        self.0 & FRAME_ID_MASK
    }

    #[must_use]
    pub fn is_extended(&self) -> bool {
        self.0 & EXTENDED_FRAME_FLAG != 0
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Version(pub String);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol(pub String);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Baudrate(pub u64);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueType {
    Signed,
    Unsigned,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MultiplexIndicator {
    /// Multiplexor switch
    Multiplexor,
    /// Signal is only present when the multiplexor holds this value
    MultiplexedSignal(u64),
    /// Multiplexor switch that is itself multiplexed (extended multiplexing)
    MultiplexorAndMultiplexedSignal(u64),
    Plain,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transmitter {
    NodeName(String),
    /// `Vector__XXX`, no sender
    VectorXXX,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    pub name: String,
    pub multiplexer_indicator: MultiplexIndicator,
    pub start_bit: u64,
    pub size: u64,
    pub byte_order: ByteOrder,
    pub value_type: ValueType,
    pub factor: f64,
    pub offset: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub receivers: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub name: String,
    /// frame length in bytes
    pub size: u64,
    pub transmitter: Transmitter,
    pub signals: Vec<Signal>,
}

impl Message {
    #[must_use]
    pub fn multiplexor(&self) -> Option<&Signal> {
        self.signals.iter().find(|signal| {
            matches!(
                signal.multiplexer_indicator,
                MultiplexIndicator::Multiplexor
                    | MultiplexIndicator::MultiplexorAndMultiplexedSignal(_)
            )
        })
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageTransmitter {
    pub message_id: MessageId,
    pub transmitter: Vec<Transmitter>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ValDescription {
    pub a: f64,
    pub b: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTable {
    pub value_table_name: String,
    pub value_descriptions: Vec<ValDescription>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum ValueDescription {
    Signal { message_id: MessageId, signal_name: String, value_descriptions: Vec<ValDescription> },
    EnvironmentVariable { env_var_name: String, value_descriptions: Vec<ValDescription> },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Comment {
    Node { node_name: String, comment: String },
    Message { message_id: MessageId, comment: String },
    Signal { message_id: MessageId, signal_name: String, comment: String },
    EnvVar { env_var_name: String, comment: String },
    Plain { comment: String },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    AttributeValueF64(f64),
    AttributeValueCharString(String),
}

impl AttributeValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::AttributeValueF64(value) => Some(*value),
            AttributeValue::AttributeValueCharString(_) => None,
        }
    }
}

/// Object an attribute definition applies to, with its raw type declaration
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeDefinition {
    Node(String),
    Message(String),
    Signal(String),
    EnvironmentVariable(String),
    Plain(String),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDefault {
    pub attribute_name: String,
    pub attribute_value: AttributeValue,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValuedForObjectType {
    RawAttributeValue(AttributeValue),
    NetworkNodeAttributeValue(String, AttributeValue),
    MessageDefinitionAttributeValue(MessageId, Option<AttributeValue>),
    SignalAttributeValue(MessageId, String, AttributeValue),
    EnvVariableAttributeValue(String, AttributeValue),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeValueForObject {
    pub attribute_name: String,
    pub attribute_value: AttributeValuedForObjectType,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignalExtendedValueType {
    SignedOrUnsignedInteger,
    IEEEfloat32Bit,
    IEEEdouble64bit,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalExtendedValueTypeList {
    pub message_id: MessageId,
    pub signal_name: String,
    pub signal_extended_value_type: SignalExtendedValueType,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExtendedMultiplexMapping {
    pub min_value: u64,
    pub max_value: u64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedMultiplex {
    pub message_id: MessageId,
    pub signal_name: String,
    pub multiplexor_signal_name: String,
    pub mappings: Vec<ExtendedMultiplexMapping>,
}

/// Parsed content of a DBC file
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DbcObject {
    pub version: Option<Version>,
    pub new_symbols: Vec<Symbol>,
    pub bit_timing: Option<Vec<Baudrate>>,
    pub nodes: Vec<String>,
    pub value_tables: Vec<ValueTable>,
    pub messages: Vec<Message>,
    pub message_transmitters: Vec<MessageTransmitter>,
    pub comments: Vec<Comment>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub attribute_defaults: Vec<AttributeDefault>,
    pub attribute_values: Vec<AttributeValueForObject>,
    pub value_descriptions: Vec<ValueDescription>,
    pub signal_extended_value_types: Vec<SignalExtendedValueTypeList>,
    pub extended_multiplex: Vec<ExtendedMultiplex>,
    /// keywords of statements skipped by the parser
    pub ignored: Vec<String>,
}

impl FromStr for DbcObject {
    type Err = DbcError;

    fn from_str(dbc_str: &str) -> Result<DbcObject, DbcError> {
        crate::parser::dbc_from_str(dbc_str)
    }
}

impl DbcObject {
    /// Read then parse a DBC file.
    ///
    /// # Errors
    /// I/O errors reading the file, then parsing errors.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DbcObject, DbcError> {
        let path = path.as_ref();
        log::debug!("loading dbc file {}", path.display());
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    #[must_use]
    pub fn message_by_id(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|msg| msg.id == id)
    }

    #[must_use]
    pub fn message_comment(&self, message_id: MessageId) -> Option<&str> {
        self.comments.iter().find_map(|comment| match comment {
            Comment::Message { message_id: id, comment } if *id == message_id => {
                Some(comment.as_str())
            }
            _ => None,
        })
    }

    #[must_use]
    pub fn signal_comment(&self, message_id: MessageId, signal_name: &str) -> Option<&str> {
        self.comments.iter().find_map(|comment| match comment {
            Comment::Signal { message_id: id, signal_name: name, comment }
                if *id == message_id && name == signal_name =>
            {
                Some(comment.as_str())
            }
            _ => None,
        })
    }

    #[must_use]
    pub fn value_descriptions_for_signal(
        &self,
        message_id: MessageId,
        signal_name: &str,
    ) -> Option<&[ValDescription]> {
        self.value_descriptions.iter().find_map(|desc| match desc {
            ValueDescription::Signal { message_id: id, signal_name: name, value_descriptions }
                if *id == message_id && name == signal_name =>
            {
                Some(value_descriptions.as_slice())
            }
            _ => None,
        })
    }

    #[must_use]
    pub fn signal_extended_value_type(
        &self,
        message_id: MessageId,
        signal_name: &str,
    ) -> Option<SignalExtendedValueType> {
        self.signal_extended_value_types
            .iter()
            .find(|ext| ext.message_id == message_id && ext.signal_name == signal_name)
            .map(|ext| ext.signal_extended_value_type)
    }

    #[must_use]
    pub fn attribute_default(&self, attribute_name: &str) -> Option<&AttributeValue> {
        self.attribute_defaults
            .iter()
            .find(|def| def.attribute_name == attribute_name)
            .map(|def| &def.attribute_value)
    }

    /// Message attribute value, or the attribute default when the message does not set it.
    #[must_use]
    pub fn message_attribute(
        &self,
        message_id: MessageId,
        attribute_name: &str,
    ) -> Option<&AttributeValue> {
        let value = self.attribute_values.iter().find_map(|attr| {
            match &attr.attribute_value {
                AttributeValuedForObjectType::MessageDefinitionAttributeValue(id, value)
                    if *id == message_id && attr.attribute_name == attribute_name =>
                {
                    value.as_ref()
                }
                _ => None,
            }
        });
        value.or_else(|| self.attribute_default(attribute_name))
    }

    /// Message period in milliseconds, `None` when unset or zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn message_cycle_time(&self, message_id: MessageId) -> Option<u64> {
        self.message_attribute(message_id, CYCLE_TIME_ATTRIBUTE)
            .and_then(AttributeValue::as_f64)
            .filter(|value| *value > 0.0)
            .map(|value| value as u64)
    }
}
