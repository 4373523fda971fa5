/*
 * Copyright (C) 2018 Marcel Buesing (MIT License)
 * Origin: https://github.com/marcelbuesing/can-dbc
 *
 * Adaptation (2022) to Redpesk and LibAfb model
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 */

use crate::data::*;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{self, char, line_ending, multispace0, space0, space1},
    combinator::{eof, map, opt, value, verify},
    error::{ErrorKind, ParseError},
    multi::{many0, many_till, separated_list0},
    number::complete::double,
    sequence::preceded,
    AsChar, IResult, InputTakeAtPosition,
};

// statements with a dedicated parser, never skipped silently
const KEYWORDS: [&str; 15] = [
    "VERSION",
    "NS_",
    "BS_",
    "BU_",
    "BO_",
    "SG_",
    "CM_",
    "BA_DEF_",
    "BA_DEF_DEF_",
    "BA_",
    "VAL_",
    "VAL_TABLE_",
    "BO_TX_BU_",
    "SIG_VALTYPE_",
    "SG_MUL_VAL_",
];

/// One top level DBC statement
enum Statement {
    Version(Version),
    NewSymbols(Vec<Symbol>),
    BitTiming(Vec<Baudrate>),
    Nodes(Vec<String>),
    ValueTable(ValueTable),
    Message(Message),
    MessageTransmitter(MessageTransmitter),
    Comment(Comment),
    AttributeDefinition(AttributeDefinition),
    AttributeDefault(AttributeDefault),
    AttributeValue(AttributeValueForObject),
    ValueDescription(ValueDescription),
    SignalExtendedValueType(SignalExtendedValueTypeList),
    ExtendedMultiplex(ExtendedMultiplex),
    Ignored(String),
}

fn is_semi_colon(chr: char) -> bool {
    chr == ';'
}

fn is_c_string_char(chr: char) -> bool {
    chr.is_ascii_digit() || chr.is_alphabetic() || chr == '_'
}

fn is_c_ident_head(chr: char) -> bool {
    chr.is_alphabetic() || chr == '_'
}

fn is_quote(chr: char) -> bool {
    chr == '"'
}

/// Multispace zero or more
fn ms0<T, E: ParseError<T>>(input: T) -> IResult<T, T, E>
where
    T: InputTakeAtPosition,
    <T as InputTakeAtPosition>::Item: AsChar + Clone,
{
    input.split_at_position_complete(|item| {
        let c = item.as_char();
        c != ' '
    })
}

/// Multi space one or more
fn ms1<T, E: ParseError<T>>(input: T) -> IResult<T, T, E>
where
    T: InputTakeAtPosition,
    <T as InputTakeAtPosition>::Item: AsChar + Clone,
{
    input.split_at_position1_complete(
        |item| {
            let c = item.as_char();
            c != ' '
        },
        ErrorKind::MultiSpace,
    )
}

/// End of line, trailing blanks allowed, end of input accepted
fn eol(s: &str) -> IResult<&str, &str> {
    let (s, _) = space0(s)?;
    alt((line_ending, eof))(s)
}

fn colon(s: &str) -> IResult<&str, char> {
    char(':')(s)
}

fn comma(s: &str) -> IResult<&str, char> {
    char(',')(s)
}

fn semi_colon(s: &str) -> IResult<&str, char> {
    char(';')(s)
}

fn quote(s: &str) -> IResult<&str, char> {
    char('"')(s)
}

fn pipe(s: &str) -> IResult<&str, char> {
    char('|')(s)
}

fn at(s: &str) -> IResult<&str, char> {
    char('@')(s)
}

fn brc_open(s: &str) -> IResult<&str, char> {
    char('(')(s)
}

fn brc_close(s: &str) -> IResult<&str, char> {
    char(')')(s)
}

fn brk_open(s: &str) -> IResult<&str, char> {
    char('[')(s)
}

fn brk_close(s: &str) -> IResult<&str, char> {
    char(']')(s)
}

/// A valid C_identifier. C_identifiers start with a  alphacharacter or an underscore
/// and may further consist of alpha-numeric, characters and underscore
fn c_ident(s: &str) -> IResult<&str, String> {
    let (s, head) = take_while1(is_c_ident_head)(s)?;
    let (s, remaining) = take_while(is_c_string_char)(s)?;
    Ok((s, [head, remaining].concat()))
}

fn c_ident_vec(s: &str) -> IResult<&str, Vec<String>> {
    separated_list0(comma, c_ident)(s)
}

fn char_string(s: &str) -> IResult<&str, &str> {
    let (s, _) = quote(s)?;
    let (s, char_string_value) = take_till(is_quote)(s)?;
    let (s, _) = quote(s)?;
    Ok((s, char_string_value))
}

fn byte_order(s: &str) -> IResult<&str, ByteOrder> {
    alt((
        value(ByteOrder::LittleEndian, char('1')),
        value(ByteOrder::BigEndian, char('0')),
    ))(s)
}

fn value_type(s: &str) -> IResult<&str, ValueType> {
    alt((value(ValueType::Signed, char('-')), value(ValueType::Unsigned, char('+'))))(s)
}

fn message_id(s: &str) -> IResult<&str, MessageId> {
    map(complete::u32, MessageId)(s)
}

fn multiplexer(s: &str) -> IResult<&str, MultiplexIndicator> {
    let (s, _) = ms1(s)?;
    let (s, _) = char('m')(s)?;
    let (s, d) = complete::u64(s)?;
    let (s, _) = ms1(s)?;
    Ok((s, MultiplexIndicator::MultiplexedSignal(d)))
}

fn multiplexor(s: &str) -> IResult<&str, MultiplexIndicator> {
    let (s, _) = ms1(s)?;
    let (s, _) = char('M')(s)?;
    let (s, _) = ms1(s)?;
    Ok((s, MultiplexIndicator::Multiplexor))
}

fn multiplexor_and_multiplexed(s: &str) -> IResult<&str, MultiplexIndicator> {
    let (s, _) = ms1(s)?;
    let (s, _) = char('m')(s)?;
    let (s, d) = complete::u64(s)?;
    let (s, _) = char('M')(s)?;
    let (s, _) = ms1(s)?;
    Ok((s, MultiplexIndicator::MultiplexorAndMultiplexedSignal(d)))
}

fn plain(s: &str) -> IResult<&str, MultiplexIndicator> {
    let (s, _) = ms1(s)?;
    Ok((s, MultiplexIndicator::Plain))
}

fn multiplexer_indicator(s: &str) -> IResult<&str, MultiplexIndicator> {
    alt((multiplexer, multiplexor, multiplexor_and_multiplexed, plain))(s)
}

fn version(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("VERSION")(s)?;
    let (s, _) = ms1(s)?;
    let (s, v) = char_string(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::Version(Version(v.to_string()))))
}

fn symbol(s: &str) -> IResult<&str, Symbol> {
    let (s, _) = space1(s)?;
    let (s, symbol) = c_ident(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Symbol(symbol)))
}

fn new_symbols(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("NS_")(s)?;
    let (s, _) = ms0(s)?;
    let (s, _) = colon(s)?;
    let (s, _) = eol(s)?;
    let (s, symbols) = many0(symbol)(s)?;
    Ok((s, Statement::NewSymbols(symbols)))
}

fn bit_timing(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("BS_:")(s)?;
    let (s, baudrates) =
        opt(preceded(ms1, separated_list0(comma, map(complete::u64, Baudrate))))(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::BitTiming(baudrates.unwrap_or_default())))
}

/// Network nodes
fn nodes(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("BU_:")(s)?;
    let (s, li) = opt(preceded(ms1, separated_list0(ms1, c_ident)))(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::Nodes(li.unwrap_or_default())))
}

fn value_description(s: &str) -> IResult<&str, ValDescription> {
    let (s, a) = double(s)?;
    let (s, _) = ms1(s)?;
    let (s, b) = char_string(s)?;
    Ok((s, ValDescription { a, b: b.to_string() }))
}

fn value_table(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("VAL_TABLE_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, value_table_name) = c_ident(s)?;
    let (s, (value_descriptions, _)) =
        many_till(preceded(ms0, value_description), preceded(ms0, semi_colon))(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::ValueTable(ValueTable { value_table_name, value_descriptions })))
}

fn transmitter(s: &str) -> IResult<&str, Transmitter> {
    alt((value(Transmitter::VectorXXX, tag("Vector__XXX")), map(c_ident, Transmitter::NodeName)))(
        s,
    )
}

fn signal(s: &str) -> IResult<&str, Signal> {
    let (s, _) = multispace0(s)?;
    let (s, _) = tag("SG_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, name) = c_ident(s)?;
    let (s, multiplexer_indicator) = multiplexer_indicator(s)?;
    let (s, _) = colon(s)?;
    let (s, _) = ms1(s)?;
    let (s, start_bit) = complete::u64(s)?;
    let (s, _) = pipe(s)?;
    let (s, size) = complete::u64(s)?;
    let (s, _) = at(s)?;
    let (s, byte_order) = byte_order(s)?;
    let (s, value_type) = value_type(s)?;
    let (s, _) = ms1(s)?;
    let (s, _) = brc_open(s)?;
    let (s, factor) = double(s)?;
    let (s, _) = comma(s)?;
    let (s, offset) = double(s)?;
    let (s, _) = brc_close(s)?;
    let (s, _) = ms1(s)?;
    let (s, _) = brk_open(s)?;
    let (s, min) = double(s)?;
    let (s, _) = pipe(s)?;
    let (s, max) = double(s)?;
    let (s, _) = brk_close(s)?;
    let (s, _) = ms1(s)?;
    let (s, unit) = char_string(s)?;
    let (s, _) = ms1(s)?;
    let (s, receivers) = c_ident_vec(s)?;
    let (s, _) = eol(s)?;
    Ok((
        s,
        Signal {
            name,
            multiplexer_indicator,
            start_bit,
            size,
            byte_order,
            value_type,
            factor,
            offset,
            min,
            max,
            unit: unit.to_string(),
            receivers,
        },
    ))
}

fn message(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("BO_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, name) = c_ident(s)?;
    let (s, _) = ms0(s)?;
    let (s, _) = colon(s)?;
    let (s, _) = ms1(s)?;
    let (s, size) = complete::u64(s)?;
    let (s, _) = ms1(s)?;
    let (s, transmitter) = transmitter(s)?;
    let (s, _) = eol(s)?;
    let (s, signals) = many0(signal)(s)?;
    Ok((s, Statement::Message(Message { id, name, size, transmitter, signals })))
}

fn message_transmitter(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("BO_TX_BU_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, _) = colon(s)?;
    let (s, _) = ms0(s)?;
    let (s, transmitter) = separated_list0(comma, transmitter)(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::MessageTransmitter(MessageTransmitter { message_id, transmitter })))
}

fn node_comment(s: &str) -> IResult<&str, Comment> {
    let (s, _) = tag("BU_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, node_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, comment) = char_string(s)?;
    Ok((s, Comment::Node { node_name, comment: comment.to_string() }))
}

fn message_comment(s: &str) -> IResult<&str, Comment> {
    let (s, _) = tag("BO_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, comment) = char_string(s)?;
    Ok((s, Comment::Message { message_id, comment: comment.to_string() }))
}

fn signal_comment(s: &str) -> IResult<&str, Comment> {
    let (s, _) = tag("SG_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, signal_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, comment) = char_string(s)?;
    Ok((s, Comment::Signal { message_id, signal_name, comment: comment.to_string() }))
}

fn env_var_comment(s: &str) -> IResult<&str, Comment> {
    let (s, _) = tag("EV_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, env_var_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, comment) = char_string(s)?;
    Ok((s, Comment::EnvVar { env_var_name, comment: comment.to_string() }))
}

fn comment_plain(s: &str) -> IResult<&str, Comment> {
    let (s, comment) = char_string(s)?;
    Ok((s, Comment::Plain { comment: comment.to_string() }))
}

fn comment(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("CM_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, comment) =
        alt((node_comment, message_comment, env_var_comment, signal_comment, comment_plain))(s)?;
    let (s, _) = ms0(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::Comment(comment)))
}

fn attribute_value(s: &str) -> IResult<&str, AttributeValue> {
    alt((
        map(double, AttributeValue::AttributeValueF64),
        map(char_string, |x| AttributeValue::AttributeValueCharString(x.to_string())),
    ))(s)
}

fn attribute_definition(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("BA_DEF_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, object) = opt(alt((tag("BU_"), tag("BO_"), tag("SG_"), tag("EV_"))))(s)?;
    let (s, _) = ms0(s)?;
    let (s, body) = take_till(is_semi_colon)(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    let body = body.trim_end().to_string();
    let definition = match object {
        Some("BU_") => AttributeDefinition::Node(body),
        Some("BO_") => AttributeDefinition::Message(body),
        Some("SG_") => AttributeDefinition::Signal(body),
        Some(_) => AttributeDefinition::EnvironmentVariable(body),
        None => AttributeDefinition::Plain(body),
    };
    Ok((s, Statement::AttributeDefinition(definition)))
}

fn attribute_default(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("BA_DEF_DEF_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, attribute_name) = char_string(s)?;
    let (s, _) = ms1(s)?;
    let (s, attribute_value) = attribute_value(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    Ok((
        s,
        Statement::AttributeDefault(AttributeDefault {
            attribute_name: attribute_name.to_string(),
            attribute_value,
        }),
    ))
}

fn network_node_attribute_value(s: &str) -> IResult<&str, AttributeValuedForObjectType> {
    let (s, _) = tag("BU_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, node_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, value) = attribute_value(s)?;
    Ok((s, AttributeValuedForObjectType::NetworkNodeAttributeValue(node_name, value)))
}

fn message_definition_attribute_value(s: &str) -> IResult<&str, AttributeValuedForObjectType> {
    let (s, _) = tag("BO_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, value) = opt(attribute_value)(s)?;
    Ok((s, AttributeValuedForObjectType::MessageDefinitionAttributeValue(message_id, value)))
}

fn signal_attribute_value(s: &str) -> IResult<&str, AttributeValuedForObjectType> {
    let (s, _) = tag("SG_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, signal_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, value) = attribute_value(s)?;
    Ok((s, AttributeValuedForObjectType::SignalAttributeValue(message_id, signal_name, value)))
}

fn env_variable_attribute_value(s: &str) -> IResult<&str, AttributeValuedForObjectType> {
    let (s, _) = tag("EV_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, env_var_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, value) = attribute_value(s)?;
    Ok((s, AttributeValuedForObjectType::EnvVariableAttributeValue(env_var_name, value)))
}

fn attribute_value_for_object(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("BA_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, attribute_name) = char_string(s)?;
    let (s, _) = ms1(s)?;
    let (s, attribute_value) = alt((
        network_node_attribute_value,
        message_definition_attribute_value,
        signal_attribute_value,
        env_variable_attribute_value,
        map(attribute_value, AttributeValuedForObjectType::RawAttributeValue),
    ))(s)?;
    let (s, _) = ms0(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    Ok((
        s,
        Statement::AttributeValue(AttributeValueForObject {
            attribute_name: attribute_name.to_string(),
            attribute_value,
        }),
    ))
}

fn value_description_for_signal(s: &str) -> IResult<&str, ValueDescription> {
    let (s, _) = tag("VAL_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, signal_name) = c_ident(s)?;
    let (s, (value_descriptions, _)) =
        many_till(preceded(ms1, value_description), preceded(ms0, semi_colon))(s)?;
    Ok((s, ValueDescription::Signal { message_id, signal_name, value_descriptions }))
}

fn value_description_for_env_var(s: &str) -> IResult<&str, ValueDescription> {
    let (s, _) = tag("VAL_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, env_var_name) = c_ident(s)?;
    let (s, (value_descriptions, _)) =
        many_till(preceded(ms1, value_description), preceded(ms0, semi_colon))(s)?;
    Ok((s, ValueDescription::EnvironmentVariable { env_var_name, value_descriptions }))
}

fn value_descriptions(s: &str) -> IResult<&str, Statement> {
    let (s, vd) = alt((value_description_for_signal, value_description_for_env_var))(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::ValueDescription(vd)))
}

fn signal_extended_value_type(s: &str) -> IResult<&str, SignalExtendedValueType> {
    alt((
        value(SignalExtendedValueType::SignedOrUnsignedInteger, char('0')),
        value(SignalExtendedValueType::IEEEfloat32Bit, char('1')),
        value(SignalExtendedValueType::IEEEdouble64bit, char('2')),
    ))(s)
}

fn signal_extended_value_type_list(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("SIG_VALTYPE_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, signal_name) = c_ident(s)?;
    let (s, _) = ms0(s)?;
    let (s, _) = opt(colon)(s)?;
    let (s, _) = ms0(s)?;
    let (s, signal_extended_value_type) = signal_extended_value_type(s)?;
    let (s, _) = ms0(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    Ok((
        s,
        Statement::SignalExtendedValueType(SignalExtendedValueTypeList {
            message_id,
            signal_name,
            signal_extended_value_type,
        }),
    ))
}

fn extended_multiplex_mapping(s: &str) -> IResult<&str, ExtendedMultiplexMapping> {
    let (s, _) = ms0(s)?;
    let (s, min_value) = complete::u64(s)?;
    let (s, _) = char('-')(s)?;
    let (s, max_value) = complete::u64(s)?;
    Ok((s, ExtendedMultiplexMapping { min_value, max_value }))
}

fn extended_multiplex(s: &str) -> IResult<&str, Statement> {
    let (s, _) = tag("SG_MUL_VAL_")(s)?;
    let (s, _) = ms1(s)?;
    let (s, message_id) = message_id(s)?;
    let (s, _) = ms1(s)?;
    let (s, signal_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, multiplexor_signal_name) = c_ident(s)?;
    let (s, _) = ms1(s)?;
    let (s, mappings) = separated_list0(comma, extended_multiplex_mapping)(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    Ok((
        s,
        Statement::ExtendedMultiplex(ExtendedMultiplex {
            message_id,
            signal_name,
            multiplexor_signal_name,
            mappings,
        }),
    ))
}

/// Any other `KEYWORD ... ;` statement (EV_, SGTYPE_, SIG_GROUP_, BU_SG_REL_, ...)
fn ignored_statement(s: &str) -> IResult<&str, Statement> {
    let (s, keyword) = verify(c_ident, |keyword: &str| !KEYWORDS.contains(&keyword))(s)?;
    let (s, _) = take_till(is_semi_colon)(s)?;
    let (s, _) = semi_colon(s)?;
    let (s, _) = eol(s)?;
    Ok((s, Statement::Ignored(keyword)))
}

fn statement(s: &str) -> IResult<&str, Statement> {
    let (s, _) = multispace0(s)?;
    alt((
        version,
        new_symbols,
        bit_timing,
        nodes,
        value_table,
        message_transmitter,
        message,
        comment,
        attribute_default,
        attribute_definition,
        attribute_value_for_object,
        value_descriptions,
        signal_extended_value_type_list,
        extended_multiplex,
        ignored_statement,
    ))(s)
}

fn dbc_collect(statements: Vec<Statement>) -> DbcObject {
    let mut dbc = DbcObject::default();
    for statement in statements {
        match statement {
            Statement::Version(version) => dbc.version = Some(version),
            Statement::NewSymbols(symbols) => dbc.new_symbols.extend(symbols),
            Statement::BitTiming(baudrates) => dbc.bit_timing = Some(baudrates),
            Statement::Nodes(nodes) => dbc.nodes.extend(nodes),
            Statement::ValueTable(table) => dbc.value_tables.push(table),
            Statement::Message(message) => dbc.messages.push(message),
            Statement::MessageTransmitter(tx) => dbc.message_transmitters.push(tx),
            Statement::Comment(comment) => dbc.comments.push(comment),
            Statement::AttributeDefinition(def) => dbc.attribute_definitions.push(def),
            Statement::AttributeDefault(def) => dbc.attribute_defaults.push(def),
            Statement::AttributeValue(attr) => dbc.attribute_values.push(attr),
            Statement::ValueDescription(desc) => dbc.value_descriptions.push(desc),
            Statement::SignalExtendedValueType(ext) => dbc.signal_extended_value_types.push(ext),
            Statement::ExtendedMultiplex(mux) => dbc.extended_multiplex.push(mux),
            Statement::Ignored(keyword) => {
                log::warn!("dbc statement {} not supported, skipped", keyword);
                dbc.ignored.push(keyword);
            }
        }
    }
    dbc
}

fn dbc_parse_str(dbc_str: &str) -> IResult<&str, DbcObject> {
    let (dbc_str, statements) = many0(statement)(dbc_str)?;
    let (dbc_str, _) = multispace0(dbc_str)?;
    Ok((dbc_str, dbc_collect(statements)))
}

/// Parse a full DBC document, statements may come in any order.
///
/// # Errors
/// `DbcError::Parsing` when nom fails, `DbcError::Incomplete` when text remains unparsed.
pub fn dbc_from_str(dbc_str: &str) -> Result<DbcObject, DbcError> {
    match dbc_parse_str(dbc_str) {
        Ok((remaining, object)) => {
            if remaining.is_empty() {
                return Ok(object);
            }
            let remaining: String = remaining.lines().next().unwrap_or_default().to_string();
            log::error!("unprocessed dbc: {}", remaining);
            Err(DbcError::Incomplete { remaining })
        }
        Err(error) => Err(DbcError::Parsing(error.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn signal_line() {
        let line = " SG_ Temperature : 24|8@1- (1,-40) [-40|87] \"degC\" BMS,FSM\n";
        let (remaining, signal) = signal(line).expect("valid signal");
        assert!(remaining.is_empty());
        assert_eq!(signal.name, "Temperature");
        assert_eq!(signal.start_bit, 24);
        assert_eq!(signal.size, 8);
        assert_eq!(signal.value_type, ValueType::Signed);
        assert_eq!(signal.byte_order, ByteOrder::LittleEndian);
        assert_eq!(signal.offset, -40.0);
        assert_eq!(signal.receivers, vec!["BMS".to_string(), "FSM".to_string()]);
    }

    #[test]
    fn multiplexed_signal_line() {
        let line = " SG_ Cell m3 : 8|16@0+ (0.001,0) [0|5] \"V\" Vector__XXX\n";
        let (_, signal) = signal(line).expect("valid signal");
        assert_eq!(signal.multiplexer_indicator, MultiplexIndicator::MultiplexedSignal(3));
        assert_eq!(signal.byte_order, ByteOrder::BigEndian);
    }

    #[test]
    fn ignored_statement_keeps_keyword() {
        let (_, stmt) = statement("EV_ Env: 0 [0|1] \"\" 0 1 DUMMY_NODE_VECTOR0 Vector__XXX;\n")
            .expect("skipped statement");
        assert!(matches!(stmt, Statement::Ignored(keyword) if keyword == "EV_"));
    }

    #[test]
    fn known_keyword_is_not_ignored() {
        assert!(ignored_statement("BO_ 12 broken;\n").is_err());
    }

    #[test]
    fn value_descriptions_without_trailing_newline() {
        let (_, stmt) = statement("VAL_ 100 State 0 \"OK\" 1 \"KO\" ;").expect("value description");
        match stmt {
            Statement::ValueDescription(ValueDescription::Signal {
                value_descriptions, ..
            }) => assert_eq!(value_descriptions.len(), 2),
            _ => panic!("unexpected statement"),
        }
    }
}
